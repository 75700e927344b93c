//! Application configuration management

use std::env;

use anyhow::Result;

/// Default code pattern: `LETTERS(3-5)-DIGITS(3)`, `LETTERS(3-4)DIGITS(3)`,
/// or `LETTERS(3-5)_DIGITS(3)`. The first alternative that matches anywhere
/// in a filename wins.
pub const DEFAULT_CODE_PATTERN: &str =
    r"[a-zA-Z]{3,5}-\d{3}|[a-zA-Z]{3,4}\d{3}|[a-zA-Z]{3,5}_\d{3}";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/130.0.0.0 Safari/537.36 Edg/130.0.0.0";

/// Application configuration loaded from environment variables, with CLI
/// overrides applied by main. Built once at startup and passed by reference;
/// there is no process-wide mutable state.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root directory scanned for media files
    pub root_dir: String,

    /// Ledger file recording per-directory outcomes
    pub ledger_path: String,

    /// Regex extracting catalog codes from filenames
    pub code_pattern: String,

    /// Catalog site base URL
    pub base_url: String,

    /// Static-asset host serving cover images
    pub image_base_url: String,

    /// Desktop-browser user agent sent on every request
    pub user_agent: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            root_dir: env::var("JAVNFO_ROOT").unwrap_or_else(|_| ".".to_string()),

            ledger_path: env::var("JAVNFO_LEDGER")
                .unwrap_or_else(|_| "./result.json".to_string()),

            code_pattern: env::var("JAVNFO_CODE_PATTERN")
                .unwrap_or_else(|_| DEFAULT_CODE_PATTERN.to_string()),

            base_url: env::var("JAVNFO_BASE_URL")
                .unwrap_or_else(|_| "https://javdb.com".to_string()),

            image_base_url: env::var("JAVNFO_IMAGE_BASE_URL")
                .unwrap_or_else(|_| "https://c0.jdbstatic.com".to_string()),

            user_agent: env::var("JAVNFO_USER_AGENT")
                .unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string()),
        })
    }
}
