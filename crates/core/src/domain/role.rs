use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Short organizational position identifier such as `CEO` or `SSE`.
///
/// Codes are trimmed and upper-cased on construction, so every lookup keyed by a
/// `RoleCode` is case-insensitive with respect to the caller's input.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoleCode(String);

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("role code must not be blank")]
pub struct BlankRoleCode;

impl RoleCode {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, BlankRoleCode> {
        let normalized = normalize_code(raw.as_ref());
        if normalized.is_empty() {
            return Err(BlankRoleCode);
        }
        Ok(Self(normalized))
    }

    /// Blank input is read as "no role", the way unassigned employees are reported.
    pub fn parse_optional(raw: Option<&str>) -> Option<Self> {
        raw.and_then(|value| Self::new(value).ok())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RoleCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoleCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RoleCode {
    type Error = BlankRoleCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RoleCode> for String {
    fn from(value: RoleCode) -> Self {
        value.0
    }
}

pub fn normalize_code(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleType {
    Administration,
    HumanResource,
    Technical,
    Sales,
    Finance,
}

impl RoleType {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Administration => "Administration",
            Self::HumanResource => "Human Resource",
            Self::Technical => "Technical",
            Self::Sales => "Sales",
            Self::Finance => "Finance",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDefinition {
    pub code: RoleCode,
    pub description: String,
    pub parent: Option<RoleCode>,
    /// Depth in the hierarchy, root = 1.
    pub level: u32,
    pub role_type: Option<RoleType>,
}

impl RoleDefinition {
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::{BlankRoleCode, RoleCode};

    #[test]
    fn role_codes_are_trimmed_and_uppercased() {
        let code = RoleCode::new("  sse ").expect("non-blank code");
        assert_eq!(code.as_str(), "SSE");
        assert_eq!(code, RoleCode::new("SSE").expect("non-blank code"));
    }

    #[test]
    fn blank_role_codes_are_rejected() {
        assert_eq!(RoleCode::new("   "), Err(BlankRoleCode));
        assert_eq!(RoleCode::parse_optional(Some("")), None);
        assert_eq!(RoleCode::parse_optional(None), None);
    }

    #[test]
    fn deserialization_normalizes_codes() {
        let code: RoleCode = serde_json::from_str("\"cto\"").expect("valid code");
        assert_eq!(code.as_str(), "CTO");
        assert!(serde_json::from_str::<RoleCode>("\" \"").is_err());
    }
}
