//! Session tokens and the outcome of validating one.

use serde::Serialize;

/// Opaque signed bearer token handed out at login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: String) -> Self {
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of `validate_session`: always a value, never an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ValidationResult {
    pub fn valid(subject: String, name: String) -> Self {
        Self {
            valid: true,
            subject: Some(subject),
            name: Some(name),
        }
    }

    pub fn invalid() -> Self {
        Self {
            valid: false,
            subject: None,
            name: None,
        }
    }
}
