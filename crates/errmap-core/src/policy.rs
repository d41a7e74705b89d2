use crate::error::PolicyError;

/// Environment variable that sets `hide_details` for `errmap serve`.
pub const HIDE_DETAILS_ENV: &str = "ERRMAP_HIDE_DETAILS";

/// Process-wide rendering policy, decided once at startup.
///
/// Defaults to hiding details: the error chain only reaches clients when a
/// deployment opts in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverPolicy {
    pub hide_details: bool,
}

impl Default for ResolverPolicy {
    fn default() -> Self {
        Self { hide_details: true }
    }
}

impl ResolverPolicy {
    pub fn hiding_details() -> Self {
        Self { hide_details: true }
    }

    pub fn showing_details() -> Self {
        Self {
            hide_details: false,
        }
    }

    /// Parse a [`HIDE_DETAILS_ENV`] value. `None` (unset) means the default.
    pub fn from_env_value(value: Option<&str>) -> Result<Self, PolicyError> {
        let Some(raw) = value else {
            return Ok(Self::default());
        };
        match parse_bool(raw) {
            Some(hide_details) => Ok(Self { hide_details }),
            None => Err(PolicyError::InvalidBool {
                var: HIDE_DETAILS_ENV,
                value: raw.to_string(),
            }),
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_hides_details() {
        let policy = ResolverPolicy::from_env_value(None).unwrap();
        assert!(policy.hide_details);
        assert_eq!(policy, ResolverPolicy::default());
    }

    #[test]
    fn accepts_common_spellings() {
        for raw in ["1", "true", "TRUE", " yes ", "on"] {
            assert!(ResolverPolicy::from_env_value(Some(raw)).unwrap().hide_details, "{raw}");
        }
        for raw in ["0", "false", "No", "off"] {
            assert!(!ResolverPolicy::from_env_value(Some(raw)).unwrap().hide_details, "{raw}");
        }
    }

    #[test]
    fn rejects_garbage() {
        let err = ResolverPolicy::from_env_value(Some("maybe")).unwrap_err();
        assert_eq!(
            err,
            PolicyError::InvalidBool {
                var: HIDE_DETAILS_ENV,
                value: "maybe".into()
            }
        );
        assert!(err.to_string().contains(HIDE_DETAILS_ENV));
    }
}
