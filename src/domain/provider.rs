//! Model provider identifier value object

use std::fmt;
use std::str::FromStr;

use crate::domain::error::InvalidProviderError;

/// All available providers
pub const ALL_PROVIDERS: &[ProviderId] = &[ProviderId::Claude, ProviderId::Gemini];

/// LLM vendors that can synthesize reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProviderId {
    #[default]
    Claude,
    Gemini,
}

impl ProviderId {
    /// Get the human-readable label for this provider
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Claude => "Anthropic Claude",
            Self::Gemini => "Google Gemini",
        }
    }

    /// Model used when none is configured
    pub const fn default_model(&self) -> &'static str {
        match self {
            Self::Claude => "claude-sonnet-4-20250514",
            Self::Gemini => "gemini-2.0-flash",
        }
    }

    /// Environment variable holding this provider's API key
    pub const fn api_key_env(&self) -> &'static str {
        match self {
            Self::Claude => "ANTHROPIC_API_KEY",
            Self::Gemini => "GEMINI_API_KEY",
        }
    }

    /// Get the string identifier for this provider
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Claude => "claude",
            Self::Gemini => "gemini",
        }
    }
}

impl FromStr for ProviderId {
    type Err = InvalidProviderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "claude" | "anthropic" => Ok(Self::Claude),
            "gemini" | "google" => Ok(Self::Gemini),
            _ => Err(InvalidProviderError {
                input: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_all_providers() {
        assert_eq!("claude".parse::<ProviderId>().unwrap(), ProviderId::Claude);
        assert_eq!("gemini".parse::<ProviderId>().unwrap(), ProviderId::Gemini);
    }

    #[test]
    fn parse_vendor_aliases() {
        assert_eq!("anthropic".parse::<ProviderId>().unwrap(), ProviderId::Claude);
        assert_eq!("Google".parse::<ProviderId>().unwrap(), ProviderId::Gemini);
    }

    #[test]
    fn parse_case_insensitive_with_whitespace() {
        assert_eq!("  GEMINI ".parse::<ProviderId>().unwrap(), ProviderId::Gemini);
    }

    #[test]
    fn parse_invalid() {
        assert!("openai".parse::<ProviderId>().is_err());
        assert!("".parse::<ProviderId>().is_err());
    }

    #[test]
    fn display_round_trips() {
        for provider in ALL_PROVIDERS {
            assert_eq!(provider.to_string().parse::<ProviderId>().unwrap(), *provider);
        }
    }

    #[test]
    fn api_key_env_vars() {
        assert_eq!(ProviderId::Claude.api_key_env(), "ANTHROPIC_API_KEY");
        assert_eq!(ProviderId::Gemini.api_key_env(), "GEMINI_API_KEY");
    }

    #[test]
    fn default_is_claude() {
        assert_eq!(ProviderId::default(), ProviderId::Claude);
    }
}
