use dotenvy::dotenv;
use tracing::{error, info, warn};
use uuid::Uuid;

fn main() -> std::process::ExitCode {
    // .env first so RUST_LOG, CONFIG_PATH and DATABASE_URL take effect
    dotenv().ok();

    let cfg = match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(e) => {
            // logging is not configured yet
            eprintln!("invalid configuration: {e:#}");
            return std::process::ExitCode::FAILURE;
        }
    };
    common::utils::logging::init_logging(cfg.logging.format);
    info!(service = "journal", event = "logger_init", "tracing subscriber initialized");
    if !cfg.ignored_env.is_empty() {
        warn!(
            service = "journal",
            event = "env_ignored",
            vars = ?cfg.ignored_env,
            "config file present; these environment overrides were ignored"
        );
    }

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(
            service = "journal",
            event = "panic",
            %service_id,
            pid,
            message = %info,
            "unhandled panic occurred"
        );
    }));

    let worker_threads = cfg.server.worker_threads;
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads {
        builder.worker_threads(w);
    }

    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = "journal", event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return std::process::ExitCode::FAILURE;
        }
    };

    info!(
        service = "journal",
        event = "start",
        %service_id,
        pid,
        version,
        threads = worker_threads.unwrap_or_default(),
        backend = %cfg.storage.backend,
        "journal service starting"
    );

    match rt.block_on(server::run(cfg)) {
        Ok(()) => {
            info!(service = "journal", event = "stop", %service_id, pid, "journal service stopped normally");
            std::process::ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = "journal", event = "run_failed", error = %e, "server::run returned error");
            std::process::ExitCode::FAILURE
        }
    }
}
