//! Shared plumbing for the journal service crates: logging setup, runtime
//! directory checks and small wire types.

pub mod env;
pub mod types;
pub mod utils;
