//! Service-config documents and fetch outcomes.
//!
//! The service config is an optional routing/policy document fetched
//! alongside address resolution. Its contents are opaque to this crate:
//! resolution only produces a parsed JSON value or an error for it.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::status::Status;

/// A service-level routing/config document, held as uninterpreted JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceConfig(Value);

impl ServiceConfig {
    /// Parses raw text into a config document.
    ///
    /// # Errors
    ///
    /// Returns an `INVALID_ARGUMENT` status if the text is not valid JSON.
    pub fn from_json(raw: &str) -> Result<Self, Status> {
        serde_json::from_str(raw).map(ServiceConfig).map_err(|e| {
            Status::invalid_argument(format!("could not parse service config: {e}"))
        })
    }

    /// The underlying JSON value.
    pub fn as_json(&self) -> &Value {
        &self.0
    }
}

/// Result of fetching and parsing the optional service-config document.
///
/// The variants are mutually exclusive; `Absent` means no document was
/// found, which is not an error. A malformed document never fails address
/// resolution: it travels as `Invalid` alongside a successful address list.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceConfigOutcome {
    /// A document was found and parsed.
    Value(ServiceConfig),
    /// A document was found but could not be parsed.
    Invalid(Status),
    /// No document was published for the target.
    Absent,
}

impl ServiceConfigOutcome {
    /// Splits the outcome into the `(config, config_error)` pair delivered
    /// through the listener callback. At most one side is `Some`.
    pub fn into_parts(self) -> (Option<ServiceConfig>, Option<Status>) {
        match self {
            ServiceConfigOutcome::Value(config) => (Some(config), None),
            ServiceConfigOutcome::Invalid(status) => (None, Some(status)),
            ServiceConfigOutcome::Absent => (None, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StatusCode;

    #[test]
    fn test_from_json_valid() {
        let config = ServiceConfig::from_json(r#"{"loadBalancingPolicy":"round_robin"}"#).unwrap();
        assert_eq!(
            config.as_json()["loadBalancingPolicy"],
            serde_json::json!("round_robin")
        );
    }

    #[test]
    fn test_from_json_malformed() {
        let err = ServiceConfig::from_json("{not json").unwrap_err();
        assert_eq!(err.code, StatusCode::InvalidArgument);
    }

    #[test]
    fn test_into_parts_is_mutually_exclusive() {
        let value = ServiceConfig::from_json("{}").unwrap();
        let (config, error) = ServiceConfigOutcome::Value(value).into_parts();
        assert!(config.is_some() && error.is_none());

        let (config, error) =
            ServiceConfigOutcome::Invalid(Status::invalid_argument("bad")).into_parts();
        assert!(config.is_none() && error.is_some());

        let (config, error) = ServiceConfigOutcome::Absent.into_parts();
        assert!(config.is_none() && error.is_none());
    }
}
