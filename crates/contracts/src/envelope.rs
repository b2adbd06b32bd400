//! CapturedEvent - the backend's native envelope
//!
//! One logical record per original activity, wrapping the full
//! transcript body with capture metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Activity, ActivityType};

/// An activity snapshot wrapped for transmission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturedEvent {
    /// Message text, when the activity carried one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Capture instant (assigned here, not the host's timestamp)
    pub timestamp: DateTime<Utc>,

    pub channel_id: String,

    #[serde(rename = "type")]
    pub activity_type: ActivityType,

    /// The full conversational turn, deep-copied at interception
    pub transcript: Activity,
}

impl CapturedEvent {
    /// Snapshot an activity into an envelope, stamping the capture time
    pub fn capture(activity: &Activity) -> Self {
        Self {
            message: activity.text.clone(),
            timestamp: Utc::now(),
            channel_id: activity.channel_id.clone(),
            activity_type: activity.activity_type,
            transcript: activity.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ConversationAccount;

    #[test]
    fn test_capture_copies_metadata() {
        let activity = Activity::message("slack", "lunch?")
            .with_conversation(ConversationAccount::new("c1"));

        let event = CapturedEvent::capture(&activity);
        assert_eq!(event.message.as_deref(), Some("lunch?"));
        assert_eq!(event.channel_id, "slack");
        assert_eq!(event.activity_type, ActivityType::Message);
        assert_eq!(event.transcript, activity);
    }

    #[test]
    fn test_envelope_wire_shape() {
        let activity = Activity::message("slack", "hi")
            .with_conversation(ConversationAccount::new("c1"));
        let event = CapturedEvent::capture(&activity);

        let json = serde_json::to_value(&event).unwrap();
        assert!(json.get("message").is_some());
        assert!(json.get("timestamp").is_some());
        assert!(json.get("channelId").is_some());
        assert_eq!(json.get("type").unwrap(), "message");
        assert!(json.get("transcript").is_some());
    }
}
