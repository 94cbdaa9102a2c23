//! Configuration validation logic.

use crate::config::loader::Config;
use crate::error::{Error, Result};
use regex::Regex;

/// Minimum length for user agent.
const MIN_USER_AGENT_LENGTH: usize = 40;

/// Upper bound for the per-post cooldown.
const MAX_COOLDOWN_SECONDS: u64 = 600;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_user_agent(&config.session.user_agent)?;
    if let Some(session_id) = &config.session.session_id {
        validate_session_id(session_id)?;
    }
    validate_options(config)?;

    Ok(())
}

/// Validate the user agent string.
pub fn validate_user_agent(user_agent: &str) -> Result<()> {
    if user_agent.is_empty() {
        return Err(Error::MissingConfig("user_agent".to_string()));
    }

    if user_agent.len() < MIN_USER_AGENT_LENGTH {
        return Err(Error::ConfigValidation {
            field: "user_agent".to_string(),
            message: format!(
                "User agent must be at least {} characters (got {})",
                MIN_USER_AGENT_LENGTH,
                user_agent.len()
            ),
        });
    }

    Ok(())
}

/// Validate the browser session cookie value.
pub fn validate_session_id(session_id: &str) -> Result<()> {
    let trimmed = session_id.trim();

    if trimmed.is_empty() {
        return Err(Error::ConfigValidation {
            field: "session_id".to_string(),
            message: "Session id is empty. Remove it to archive public posts only.".to_string(),
        });
    }

    let lower = trimmed.to_lowercase();
    if lower.contains("replaceme") || lower.contains("your_session") {
        return Err(Error::ConfigValidation {
            field: "session_id".to_string(),
            message: "Session id appears to be a placeholder. Copy FANBOXSESSID from your browser."
                .to_string(),
        });
    }

    // Cookie values cannot carry separators
    if trimmed.contains(';') || trimmed.contains(char::is_whitespace) {
        return Err(Error::ConfigValidation {
            field: "session_id".to_string(),
            message: "Session id must be the bare cookie value, not a cookie header".to_string(),
        });
    }

    Ok(())
}

fn validate_options(config: &Config) -> Result<()> {
    if config.options.cooldown_seconds > MAX_COOLDOWN_SECONDS {
        return Err(Error::ConfigValidation {
            field: "cooldown_seconds".to_string(),
            message: format!("Cooldown must be at most {} seconds", MAX_COOLDOWN_SECONDS),
        });
    }

    if config.options.list_limit == 0 {
        return Err(Error::ConfigValidation {
            field: "list_limit".to_string(),
            message: "List limit must be positive".to_string(),
        });
    }

    if config.options.asset_max_attempts == Some(0) {
        return Err(Error::ConfigValidation {
            field: "asset_max_attempts".to_string(),
            message: "At least one attempt is required".to_string(),
        });
    }

    Ok(())
}

/// Validate a creator id and return it normalized.
///
/// Accepts a bare id, an `@id` handle or a `https://<id>.fanbox.cc` URL.
pub fn parse_creator_id(input: &str) -> Result<String> {
    let input = input.trim();

    let candidate = if input.starts_with("http://") || input.starts_with("https://") {
        let url = url::Url::parse(input)?;
        let host = url.host_str().unwrap_or_default();
        match host.strip_suffix(".fanbox.cc") {
            Some(sub) if sub != "www" && sub != "api" => sub.to_string(),
            _ => {
                // https://www.fanbox.cc/@creator
                let path = url.path().trim_start_matches('/');
                path.split('/')
                    .next()
                    .and_then(|seg| seg.strip_prefix('@'))
                    .map(str::to_string)
                    .ok_or_else(|| Error::ConfigValidation {
                        field: "creator_id".to_string(),
                        message: format!("Could not extract creator id from URL: {}", input),
                    })?
            }
        }
    } else {
        input.trim_start_matches('@').to_string()
    };

    let pattern = Regex::new(r"^[a-zA-Z0-9][a-zA-Z0-9_-]{0,63}$").unwrap();
    if !pattern.is_match(&candidate) {
        return Err(Error::ConfigValidation {
            field: "creator_id".to_string(),
            message: format!(
                "Creator id '{}' contains invalid characters. Only alphanumeric, hyphens, and underscores allowed.",
                candidate
            ),
        });
    }

    Ok(candidate)
}
