use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Username recorded when no authenticated principal is present.
pub const ANONYMOUS: &str = "anonymous";

/// The acting identity stamped onto every operation log entry.
///
/// Supplied explicitly by the calling layer (CLI flag, request context).
/// A missing or blank name collapses to [`ANONYMOUS`], so a log entry never
/// carries an empty username.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Principal {
    user_name: Option<String>,
}

impl Principal {
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { user_name: None }
    }

    #[must_use]
    pub fn named(user_name: impl Into<String>) -> Self {
        let user_name = user_name.into();
        let trimmed = user_name.trim();
        if trimmed.is_empty() {
            Self::anonymous()
        } else {
            Self {
                user_name: Some(trimmed.to_string()),
            }
        }
    }

    /// Build from an optional name, e.g. an unset CLI flag.
    #[must_use]
    pub fn from_optional(user_name: Option<&str>) -> Self {
        user_name.map_or_else(Self::anonymous, Self::named)
    }

    /// The name written to `OperationLog::username`.
    #[must_use]
    pub fn username(&self) -> &str {
        self.user_name.as_deref().unwrap_or(ANONYMOUS)
    }

    #[must_use]
    pub const fn is_anonymous(&self) -> bool {
        self.user_name.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_uses_marker() {
        let p = Principal::anonymous();
        assert!(p.is_anonymous());
        assert_eq!(p.username(), ANONYMOUS);
    }

    #[test]
    fn blank_name_is_anonymous() {
        assert_eq!(Principal::named("   ").username(), ANONYMOUS);
        assert_eq!(Principal::from_optional(None).username(), ANONYMOUS);
    }

    #[test]
    fn named_principal_is_trimmed() {
        let p = Principal::named(" admin ");
        assert!(!p.is_anonymous());
        assert_eq!(p.username(), "admin");
    }
}
