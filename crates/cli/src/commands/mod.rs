//! CLI command implementations.

pub mod data;
pub mod user;

use std::path::PathBuf;
use std::time::Duration;

/// Save timeout applied to CLI-driven mutations.
pub const SAVE_TIMEOUT: Duration = Duration::from_secs(5);

/// Resolve the data file path, same as the server does.
pub fn data_path() -> PathBuf {
    dotenvy::dotenv().ok();
    PathBuf::from(
        std::env::var("CLOTHESLINE_DATA_PATH").unwrap_or_else(|_| "clothesline.json".to_owned()),
    )
}
