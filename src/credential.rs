//! Startup credential gate. The realtime API key is read exactly once, before
//! any terminal-mode initialization, and a missing or empty value halts the
//! process with a plain-text notice that does not depend on the TUI stack.

pub const PRIMARY_API_KEY_VAR: &str = "SIDEKICK_API_KEY";
pub const FALLBACK_API_KEY_VAR: &str = "GEMINI_API_KEY";

#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error("environment variable {PRIMARY_API_KEY_VAR} (or {FALLBACK_API_KEY_VAR}) is not set")]
    Missing,
    #[error("environment variable {0} is set but empty")]
    Empty(String),
}

#[derive(Clone)]
pub struct ApiCredential(String);

impl ApiCredential {
    /// Single-shot gate: resolves the key from the environment, preferring
    /// `SIDEKICK_API_KEY` over `GEMINI_API_KEY`. Never re-evaluated after
    /// startup.
    pub fn from_env() -> Result<Self, CredentialError> {
        for var in [PRIMARY_API_KEY_VAR, FALLBACK_API_KEY_VAR] {
            match std::env::var(var) {
                Ok(raw) if raw.trim().is_empty() => {
                    return Err(CredentialError::Empty(var.to_string()));
                }
                Ok(raw) => return Ok(Self(raw.trim().to_string())),
                Err(_) => continue,
            }
        }
        Err(CredentialError::Missing)
    }

    pub fn from_value(raw: &str) -> Result<Self, CredentialError> {
        if raw.trim().is_empty() {
            return Err(CredentialError::Empty(PRIMARY_API_KEY_VAR.to_string()));
        }
        Ok(Self(raw.trim().to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Keeps only the last four characters visible, for diagnostics output.
    pub fn masked(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 4 {
            return "****".to_string();
        }
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("****{tail}")
    }
}

impl std::fmt::Debug for ApiCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ApiCredential({})", self.masked())
    }
}

/// The fatal-notice rendering path. This is deliberately dependency-free: it
/// runs before raw mode or the alternate screen, so it must not assume any
/// interactive surface beyond a writable stderr.
pub fn render_fatal_notice(err: &CredentialError) -> String {
    let detail = match err {
        CredentialError::Missing => format!(
            "The {PRIMARY_API_KEY_VAR} environment variable (or {FALLBACK_API_KEY_VAR}) for the realtime API is not set."
        ),
        CredentialError::Empty(var) => {
            format!("The {var} environment variable is set but contains no value.")
        }
    };
    [
        "================================================================",
        "  Critical configuration error",
        "",
        &format!("  {detail}"),
        "  Make sure the API key is configured in the launch environment.",
        "",
        "  This application cannot start without a valid API key.",
        "================================================================",
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::{
        render_fatal_notice, ApiCredential, CredentialError, FALLBACK_API_KEY_VAR,
        PRIMARY_API_KEY_VAR,
    };

    #[test]
    fn from_value_rejects_empty_and_whitespace_keys() {
        assert!(matches!(
            ApiCredential::from_value(""),
            Err(CredentialError::Empty(_))
        ));
        assert!(matches!(
            ApiCredential::from_value("   "),
            Err(CredentialError::Empty(_))
        ));
        assert!(ApiCredential::from_value("abc123").is_ok());
    }

    #[test]
    fn from_value_trims_surrounding_whitespace() {
        let credential = ApiCredential::from_value("  key-value  ").expect("valid key");
        assert_eq!(credential.expose(), "key-value");
    }

    #[test]
    fn masked_hides_all_but_last_four_characters() {
        let credential = ApiCredential::from_value("abcdef123456").expect("valid key");
        assert_eq!(credential.masked(), "****3456");
        let short = ApiCredential::from_value("ab").expect("valid key");
        assert_eq!(short.masked(), "****");
    }

    #[test]
    fn debug_output_never_contains_the_raw_key() {
        let credential = ApiCredential::from_value("super-secret-key").expect("valid key");
        let rendered = format!("{credential:?}");
        assert!(!rendered.contains("super-secret-key"));
    }

    #[test]
    fn fatal_notice_names_the_missing_variable() {
        let missing = render_fatal_notice(&CredentialError::Missing);
        assert!(missing.contains(PRIMARY_API_KEY_VAR));
        assert!(missing.contains(FALLBACK_API_KEY_VAR));
        assert!(missing.contains("Critical configuration error"));

        let empty = render_fatal_notice(&CredentialError::Empty(PRIMARY_API_KEY_VAR.to_string()));
        assert!(empty.contains("set but contains no value"));
    }
}
