//! Message bridge between the popup and page contexts
//!
//! Requests travel as JSON values over a per-tab channel and each one gets
//! exactly one response back on a oneshot channel.

mod tabs;

pub use tabs::{run_page, Envelope, TabId, Tabs};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::theme::{AppliedTheme, Theme};

/// Requests sent from the popup to a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ThemeRequest {
    ApplyTheme { theme: Theme, mood: String },
    ResetTheme,
    GetCurrentTheme,
}

/// Actions a page understands
const KNOWN_ACTIONS: [&str; 3] = ["applyTheme", "resetTheme", "getCurrentTheme"];

/// Responses sent from a page back to the popup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ThemeResponse {
    Ack {
        success: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
    Current {
        theme: Option<AppliedTheme>,
    },
}

impl ThemeResponse {
    pub fn ok() -> Self {
        ThemeResponse::Ack {
            success: true,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        ThemeResponse::Ack {
            success: false,
            error: Some(error.into()),
        }
    }

    /// True only for a successful acknowledgement
    pub fn is_success(&self) -> bool {
        matches!(self, ThemeResponse::Ack { success: true, .. })
    }
}

/// Decode a raw request, distinguishing unknown actions from malformed bodies
pub fn decode_request(raw: serde_json::Value) -> Result<ThemeRequest, ThemeResponse> {
    let known = raw
        .get("action")
        .and_then(|a| a.as_str())
        .is_some_and(|a| KNOWN_ACTIONS.contains(&a));
    if !known {
        return Err(ThemeResponse::failure("unknown action"));
    }
    serde_json::from_value(raw)
        .map_err(|e| ThemeResponse::failure(format!("malformed request: {}", e)))
}

/// Bridge errors
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("no active tab")]
    NoActiveTab,

    #[error("unknown tab {0}")]
    UnknownTab(TabId),

    /// The page has no live listener: closed, navigated away, or never scriptable
    #[error("page in tab {0} is unreachable")]
    PageUnreachable(TabId),

    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_wire_format() {
        let req = ThemeRequest::ApplyTheme {
            theme: Theme::focus(),
            mood: "focus".to_string(),
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["action"], "applyTheme");
        assert_eq!(json["mood"], "focus");
        assert_eq!(json["theme"]["background"], "#E0E0E0");

        assert_eq!(
            serde_json::to_value(ThemeRequest::ResetTheme).unwrap(),
            json!({"action": "resetTheme"})
        );
    }

    #[test]
    fn test_response_wire_format() {
        assert_eq!(
            serde_json::to_value(ThemeResponse::ok()).unwrap(),
            json!({"success": true})
        );
        assert_eq!(
            serde_json::to_value(ThemeResponse::failure("unknown action")).unwrap(),
            json!({"success": false, "error": "unknown action"})
        );
        assert_eq!(
            serde_json::to_value(ThemeResponse::Current { theme: None }).unwrap(),
            json!({"theme": null})
        );
    }

    #[test]
    fn test_response_decoding() {
        let ack: ThemeResponse = serde_json::from_value(json!({"success": true})).unwrap();
        assert!(ack.is_success());

        let none: ThemeResponse = serde_json::from_value(json!({"theme": null})).unwrap();
        assert_eq!(none, ThemeResponse::Current { theme: None });
        assert!(!none.is_success());
    }

    #[test]
    fn test_decode_request() {
        assert_eq!(
            decode_request(json!({"action": "getCurrentTheme"})),
            Ok(ThemeRequest::GetCurrentTheme)
        );
        assert_eq!(
            decode_request(json!({"action": "explode"})),
            Err(ThemeResponse::failure("unknown action"))
        );
        assert_eq!(
            decode_request(json!({"theme": {}})),
            Err(ThemeResponse::failure("unknown action"))
        );

        let malformed = decode_request(json!({"action": "applyTheme", "mood": "focus"}));
        match malformed {
            Err(ThemeResponse::Ack { success: false, error: Some(e) }) => {
                assert!(e.starts_with("malformed request:"), "{e}")
            }
            other => panic!("unexpected: {other:?}"),
        }
    }
}
