/// Configuration management
use crate::error::{ChatError, Result};
use std::time::Duration;

const DEFAULT_API_URL: &str = "http://localhost:5000";
const DEFAULT_TIMEOUT_MS: u64 = 10_000;

/// Widget configuration
///
/// The session identity (`user_id`, `username`) is an explicit input here
/// rather than ambient state, so a widget's behavior is fully determined
/// by its construction arguments.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the chat backend
    pub api_url: String,

    /// Current user's opaque id (empty disables the widget)
    pub user_id: String,

    /// Current user's display name, used as the local-echo author
    pub username: String,

    /// Per-request timeout for backend calls
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            user_id: String::new(),
            username: String::new(),
            request_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl Config {
    /// Create config from command line arguments
    pub fn from_args(args: &[String]) -> Result<Self> {
        if args.len() < 3 {
            return Err(ChatError::Config(format!(
                "Usage: {} <user_id> <username> [--api-url <url>] [--timeout-ms <ms>]",
                args.first().map(|s| s.as_str()).unwrap_or("sidechat")
            )));
        }

        let user_id = args[1].clone();
        let username = args[2].clone();

        let mut api_url: Option<String> = None;
        let mut timeout_ms: Option<u64> = None;

        let mut i = 3;
        while i < args.len() {
            match args[i].as_str() {
                "--api-url" => {
                    let url = args.get(i + 1).ok_or_else(|| {
                        ChatError::Config("--api-url requires a URL argument".to_string())
                    })?;
                    api_url = Some(url.clone());
                    i += 2;
                }
                "--timeout-ms" => {
                    let ms = args.get(i + 1).ok_or_else(|| {
                        ChatError::Config("--timeout-ms requires a number argument".to_string())
                    })?;
                    timeout_ms = Some(ms.parse::<u64>().map_err(|_| {
                        ChatError::Config("--timeout-ms must be a valid number".to_string())
                    })?);
                    i += 2;
                }
                other => {
                    return Err(ChatError::Config(format!("Unknown argument: {}", other)));
                }
            }
        }

        // Env overrides (nice for scripts)
        if let Ok(url) = std::env::var("SIDECHAT_API_URL") {
            api_url = Some(url);
        }
        if let Some(ms) = std::env::var("SIDECHAT_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
        {
            timeout_ms = Some(ms);
        }

        Ok(Self {
            api_url: api_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            user_id,
            username,
            request_timeout: Duration::from_millis(timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS)),
        })
    }
}
