//! # Wire Payload Decoding
//!
//! Decodes the raw fetch payload into an ordered placement snapshot.
//!
//! ## Wire Format
//! ```json
//! {
//!   "placements": [
//!     {
//!       "placementId": 0,
//!       "embeddedMessages": [
//!         {
//!           "metadata": { "messageId": "abc", "placementId": 0 },
//!           "elements": { "title": "...", "buttons": [] },
//!           "payload": { "anything": true }
//!         }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! ## Absence Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  payload shape                      │  result                           │
//! │  ───────────────────────────────────│────────────────────────────────── │
//! │  no "placements" key                │  Ok(vec![])  (clear everything)   │
//! │  "placements": []                   │  Ok(vec![])  (clear everything)   │
//! │  "placements": [ valid objects ]    │  Ok(snapshot)                     │
//! │  "placements": "not-an-array" / bad │  Err(MalformedPayload)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! An absent array is a deliberate "nothing is live" signal from the
//! server, not a parse failure; the engine treats it as a full clear.

use serde_json::Value;

use crate::error::CoreError;
use crate::types::Placement;

/// Key holding the placement array in the fetch payload.
const PLACEMENTS_KEY: &str = "placements";

/// Decodes a raw fetch payload into an ordered placement snapshot.
///
/// Returns an empty snapshot when the payload has no `placements` array;
/// returns [`CoreError::MalformedPayload`] when the array is present but
/// structurally invalid.
pub fn parse_snapshot(payload: &Value) -> Result<Vec<Placement>, CoreError> {
    match payload.get(PLACEMENTS_KEY) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(placements) => {
            let snapshot: Vec<Placement> = serde_json::from_value(placements.clone())?;
            Ok(snapshot)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_placements_is_empty_snapshot() {
        let snapshot = parse_snapshot(&json!({})).unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_null_placements_is_empty_snapshot() {
        let snapshot = parse_snapshot(&json!({ "placements": null })).unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_empty_array_is_empty_snapshot() {
        let snapshot = parse_snapshot(&json!({ "placements": [] })).unwrap();
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_malformed_placements_is_error() {
        let err = parse_snapshot(&json!({ "placements": "nope" })).unwrap_err();
        assert!(matches!(err, CoreError::MalformedPayload(_)));
    }

    #[test]
    fn test_placement_missing_id_is_error() {
        let payload = json!({ "placements": [{ "embeddedMessages": [] }] });
        assert!(parse_snapshot(&payload).is_err());
    }

    #[test]
    fn test_full_snapshot_decodes_in_order() {
        let payload = json!({
            "placements": [
                {
                    "placementId": 1,
                    "embeddedMessages": [
                        {
                            "metadata": { "messageId": "m2", "placementId": 1 },
                            "elements": { "title": "Second" }
                        },
                        {
                            "metadata": { "messageId": "m1", "placementId": 1 },
                            "elements": { "title": "First", "buttons": [
                                { "id": "btn", "title": "Go", "action": { "type": "action://buy" } }
                            ]}
                        }
                    ]
                },
                { "placementId": 2, "embeddedMessages": [] }
            ]
        });

        let snapshot = parse_snapshot(&payload).unwrap();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].id, 1);
        assert_eq!(snapshot[0].message_ids(), vec!["m2", "m1"]);
        assert_eq!(snapshot[1].id, 2);
        assert!(snapshot[1].messages.is_empty());

        let buttons = &snapshot[0].messages[1].elements.as_ref().unwrap().buttons;
        assert_eq!(buttons[0].id, "btn");
        assert_eq!(buttons[0].action.as_ref().unwrap().action_type, "action://buy");
    }

    #[test]
    fn test_manifest_entry_without_elements_decodes() {
        let payload = json!({
            "placements": [{
                "placementId": 0,
                "embeddedMessages": [
                    { "metadata": { "messageId": "ghost", "placementId": 0 } }
                ]
            }]
        });

        let snapshot = parse_snapshot(&payload).unwrap();
        assert!(!snapshot[0].messages[0].has_content());
    }
}
