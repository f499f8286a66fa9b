use serde::Serialize;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntryDoc {
    pub id: Uuid,
    pub content: String,
    /// RFC 3339 UTC timestamp with millisecond precision
    #[schema(example = "2025-01-01T12:00:00.123Z")]
    pub created_at: String,
}

#[derive(Serialize, ToSchema)]
pub struct NewJournalEntryDoc {
    /// Must contain at least one non-whitespace character
    pub content: String,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    pub details: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::journal::list_entries,
        crate::routes::journal::create_entry,
    ),
    components(schemas(HealthResponse, JournalEntryDoc, NewJournalEntryDoc, ErrorBody)),
    tags((name = "health"), (name = "journal"))
)]
pub struct ApiDoc;
