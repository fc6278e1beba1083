use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://linkdinclone-1.onrender.com";
pub const API_PREFIX: &str = "/api";
pub const AUTH_HEADER: &str = "x-auth-token";

// Persisted session keys
pub const TOKEN_KEY: &str = "token";
pub const USER_NAME_KEY: &str = "userName";
pub const USER_ID_KEY: &str = "userId";

// Profile fallbacks
pub const DEFAULT_BIO: &str = "No bio set yet.";
pub const DEFAULT_LOCATION: &str = "Earth";

pub const REGISTER_FAILED: &str = "Registration failed.";
pub const LOGIN_FAILED: &str = "Login failed.";
pub const LOGIN_REQUIRED: &str = "Please log in to view your profile.";
pub const FETCH_FAILED: &str = "Could not fetch profile data or posts.";
pub const UPDATE_FAILED: &str = "Failed to update post.";
pub const DELETE_FAILED: &str = "Failed to delete post.";

pub fn api_base() -> String {
    std::env::var("LINKBOARD_API_BASE")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string())
}

/// Request timeout. Unset means requests may wait indefinitely.
pub fn request_timeout() -> Option<Duration> {
    std::env::var("LINKBOARD_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs)
}

/// Returns the linkboard home directory.
///
/// Checks LINKBOARD_HOME first, falls back to ~/.config/linkboard, then to
/// the working directory when no home directory can be determined.
pub fn linkboard_home() -> PathBuf {
    if let Ok(home) = std::env::var("LINKBOARD_HOME") {
        return PathBuf::from(home);
    }

    dirs::home_dir()
        .map(|h| h.join(".config").join("linkboard"))
        .unwrap_or_else(|| PathBuf::from(".linkboard"))
}

pub fn session_file() -> PathBuf {
    std::env::var("LINKBOARD_SESSION_FILE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| linkboard_home().join("session.json"))
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base: String,
    pub session_file: PathBuf,
    pub timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self {
            api_base: api_base(),
            session_file: session_file(),
            timeout: request_timeout(),
        }
    }
}
