//! # Domain Types
//!
//! Core domain types for placement-scoped embedded messages.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   Placement     │   │ EmbeddedMessage │   │ MessageMetadata │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │──►│  metadata       │──►│  message_id     │       │
//! │  │  messages[]     │   │  elements?      │   │  placement_id   │       │
//! │  │  (server order) │   │  payload?       │   │  campaign_id?   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │ MessageElements │   │ ElementButton   │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  title?         │   │  id             │                             │
//! │  │  body?          │   │  title?         │                             │
//! │  │  media_url?     │   │  action?        │                             │
//! │  │  buttons[]      │   └─────────────────┘                             │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity Rules
//! - A message is identified by its string `message_id`; two messages with
//!   the same id are the same message regardless of content revisions.
//! - A placement is identified by its integer id and owns its messages in
//!   the exact order the server returned them (UI rendering order).
//! - A message with `elements: None` is a transport-only manifest entry:
//!   it never enters the cache and never counts toward diffing.

use serde::{Deserialize, Serialize};

/// Placement identifier assigned by the server.
pub type PlacementId = i64;

// =============================================================================
// Message Metadata
// =============================================================================

/// Stable identity and routing data for one embedded message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageMetadata {
    /// Unique message identifier (stable across syncs and placements).
    pub message_id: String,

    /// Placement this message was delivered for.
    pub placement_id: PlacementId,

    /// Campaign the message belongs to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub campaign_id: Option<i64>,

    /// Whether this is a proof (preview) send rather than a live one.
    #[serde(default)]
    pub is_proof: bool,
}

impl MessageMetadata {
    /// Creates metadata with just the required identity fields.
    pub fn new(message_id: impl Into<String>, placement_id: PlacementId) -> Self {
        MessageMetadata {
            message_id: message_id.into(),
            placement_id,
            campaign_id: None,
            is_proof: false,
        }
    }
}

// =============================================================================
// Message Elements (structured rendering content)
// =============================================================================

/// An action attached to an element (tapping the body or a button).
///
/// `action_type` carries the raw target: `action://name`, `itbl://name`,
/// or a plain URL. Resolution into a dispatchable action happens in the
/// engine crate; the model keeps it verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementAction {
    /// Raw action target exactly as sent by the server.
    #[serde(rename = "type")]
    pub action_type: String,

    /// Optional action data (deep-link payload, etc.).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}

/// A tappable button inside a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementButton {
    /// Button identifier reported back on click.
    pub id: String,

    /// Button label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Action performed on tap.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<ElementAction>,
}

/// A named text entry inside a message (auxiliary copy blocks).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementText {
    /// Text entry identifier.
    pub id: String,

    /// Text content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Structured rendering content for one message.
///
/// Absence of this whole block marks a transport-only manifest entry
/// (see module docs): the engine skips such messages entirely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageElements {
    /// Headline text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Body text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,

    /// Image or video URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,

    /// Action performed when the message body itself is tapped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_action: Option<ElementAction>,

    /// Buttons rendered with the message, in server order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub buttons: Vec<ElementButton>,

    /// Auxiliary text entries, in server order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub text: Vec<ElementText>,
}

// =============================================================================
// Embedded Message
// =============================================================================

/// One embedded content unit delivered for a placement.
///
/// Immutable after construction: syncs replace messages wholesale, they
/// never patch fields in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedMessage {
    /// Identity and routing data.
    pub metadata: MessageMetadata,

    /// Structured rendering content. `None` marks a transport-only
    /// manifest entry that must never enter the cache.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elements: Option<MessageElements>,

    /// Arbitrary custom payload, opaque to the engine.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

impl EmbeddedMessage {
    /// Creates a message with content but no custom payload.
    pub fn new(metadata: MessageMetadata, elements: MessageElements) -> Self {
        EmbeddedMessage {
            metadata,
            elements: Some(elements),
            payload: None,
        }
    }

    /// Returns the stable message id.
    #[inline]
    pub fn id(&self) -> &str {
        &self.metadata.message_id
    }

    /// Returns true when the message carries structured rendering content.
    ///
    /// Content-less messages are manifest entries only: they are skipped by
    /// reconciliation and never tracked as received.
    #[inline]
    pub fn has_content(&self) -> bool {
        self.elements.is_some()
    }
}

// =============================================================================
// Placement
// =============================================================================

/// A placement: one named slot in the host UI and the ordered messages
/// currently delivered for it.
///
/// A placement is fetched wholesale each sync and only ever replaced via
/// reconciliation. Message order is the server-provided order and must be
/// preserved; it determines UI rendering order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    /// Unique placement identifier.
    #[serde(rename = "placementId")]
    pub id: PlacementId,

    /// Messages for this placement, in server order.
    #[serde(rename = "embeddedMessages", default)]
    pub messages: Vec<EmbeddedMessage>,
}

impl Placement {
    /// Creates a placement from an ordered message list.
    pub fn new(id: PlacementId, messages: Vec<EmbeddedMessage>) -> Self {
        Placement { id, messages }
    }

    /// Returns the ids of all messages in this placement, in order.
    pub fn message_ids(&self) -> Vec<&str> {
        self.messages.iter().map(|m| m.id()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(id: &str, placement: PlacementId) -> EmbeddedMessage {
        EmbeddedMessage::new(
            MessageMetadata::new(id, placement),
            MessageElements {
                title: Some("Hello".into()),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_message_identity() {
        let m = message("msg-1", 0);
        assert_eq!(m.id(), "msg-1");
        assert!(m.has_content());
    }

    #[test]
    fn test_manifest_entry_has_no_content() {
        let m = EmbeddedMessage {
            metadata: MessageMetadata::new("msg-2", 0),
            elements: None,
            payload: None,
        };
        assert!(!m.has_content());
    }

    #[test]
    fn test_placement_preserves_order() {
        let p = Placement::new(3, vec![message("b", 3), message("a", 3)]);
        assert_eq!(p.message_ids(), vec!["b", "a"]);
    }

    #[test]
    fn test_wire_field_names() {
        let p = Placement::new(7, vec![message("m", 7)]);
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.contains("\"placementId\":7"));
        assert!(json.contains("\"embeddedMessages\""));
        assert!(json.contains("\"messageId\":\"m\""));
    }

    #[test]
    fn test_message_without_optional_fields_deserializes() {
        let json = r#"{"metadata":{"messageId":"m1","placementId":0}}"#;
        let m: EmbeddedMessage = serde_json::from_str(json).unwrap();
        assert_eq!(m.id(), "m1");
        assert!(m.elements.is_none());
        assert!(!m.metadata.is_proof);
    }
}
