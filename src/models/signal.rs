//! Signal models - incoming webhook payloads

use serde::{Deserialize, Serialize};

/// Trade direction requested by a signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Buy,
    Sell,
}

impl Action {
    /// Parse an action string; only the exact values `buy` and `sell` are accepted
    pub fn parse(value: &str) -> Option<Action> {
        match value {
            "buy" => Some(Action::Buy),
            "sell" => Some(Action::Sell),
            _ => None,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Buy => write!(f, "buy"),
            Action::Sell => write!(f, "sell"),
        }
    }
}

/// Incoming webhook payload
///
/// The action arrives as a plain string and is validated separately so an
/// unknown value produces a clean rejection instead of a body decode error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalPayload {
    /// Requested trade direction: "buy" or "sell"
    pub action: String,
}

impl SignalPayload {
    /// Validate the payload, returning the parsed action
    pub fn validate(&self) -> Result<Action, String> {
        Action::parse(&self.action).ok_or_else(|| {
            format!(
                "unsupported action '{}', expected 'buy' or 'sell'",
                self.action
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_actions() {
        assert_eq!(Action::parse("buy"), Some(Action::Buy));
        assert_eq!(Action::parse("sell"), Some(Action::Sell));
    }

    #[test]
    fn test_parse_rejects_other_values() {
        assert_eq!(Action::parse("hold"), None);
        assert_eq!(Action::parse("BUY"), None);
        assert_eq!(Action::parse("Sell"), None);
        assert_eq!(Action::parse(""), None);
        assert_eq!(Action::parse(" buy"), None);
    }

    #[test]
    fn test_payload_parsing() {
        let payload: SignalPayload = serde_json::from_str(r#"{"action": "sell"}"#).unwrap();
        assert_eq!(payload.validate(), Ok(Action::Sell));
    }

    #[test]
    fn test_payload_validation_error_names_value() {
        let payload = SignalPayload {
            action: "hold".to_string(),
        };
        let err = payload.validate().unwrap_err();
        assert!(err.contains("hold"));
    }

    #[test]
    fn test_action_display() {
        assert_eq!(Action::Buy.to_string(), "buy");
        assert_eq!(Action::Sell.to_string(), "sell");
    }
}
