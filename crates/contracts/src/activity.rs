//! Activity record model - the normalized unit of work in the pipeline
//!
//! An [`Activity`] is an immutable snapshot taken at interception time.
//! The host runtime keeps mutating its own live objects after the
//! interception call returns, so every field here is owned: `Clone`
//! produces a fully independent value, never a reference into
//! host-owned memory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of conversational exchange an activity represents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityType {
    /// A user or bot message
    Message,
    /// A previously sent message was edited
    MessageUpdate,
    /// A previously sent message was removed
    MessageDelete,
    /// A non-message signal (telemetry, custom events)
    Event,
    /// Typing indicator
    Typing,
    /// Conversation ended
    EndOfConversation,
    /// Diagnostic trace
    Trace,
}

impl ActivityType {
    /// Wire name used inside transmitted envelopes
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::MessageUpdate => "messageUpdate",
            Self::MessageDelete => "messageDelete",
            Self::Event => "event",
            Self::Typing => "typing",
            Self::EndOfConversation => "endOfConversation",
            Self::Trace => "trace",
        }
    }
}

/// Role of a channel participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Bot,
}

/// A participant on a channel (user or bot side)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelAccount {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Absent on some channels; the interceptor defaults it to `User`
    /// for incoming activities
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl ChannelAccount {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            role: None,
        }
    }

    pub fn with_role(mut self, role: Role) -> Self {
        self.role = Some(role);
        self
    }
}

/// The conversation an activity belongs to
///
/// Only activities carrying a conversation are eligible for relay;
/// the batcher silently drops the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationAccount {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ConversationAccount {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
        }
    }
}

/// A single unit of conversational exchange passing through the bot pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Source-assigned or generated identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(rename = "type")]
    pub activity_type: ActivityType,

    pub channel_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<ChannelAccount>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recipient: Option<ChannelAccount>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conversation: Option<ConversationAccount>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to_id: Option<String>,

    /// Opaque structured payload supplied by the channel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<serde_json::Value>,

    /// Channel-specific extension payload, relayed untouched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_data: Option<serde_json::Value>,
}

impl Activity {
    /// Create a bare activity of the given type on a channel
    pub fn new(activity_type: ActivityType, channel_id: impl Into<String>) -> Self {
        Self {
            id: None,
            activity_type,
            channel_id: channel_id.into(),
            timestamp: None,
            text: None,
            from: None,
            recipient: None,
            conversation: None,
            reply_to_id: None,
            value: None,
            channel_data: None,
        }
    }

    /// Create a message activity with generated id and current timestamp
    pub fn message(channel_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: Some(uuid::Uuid::new_v4().to_string()),
            timestamp: Some(Utc::now()),
            text: Some(text.into()),
            ..Self::new(ActivityType::Message, channel_id)
        }
    }

    /// Whether this activity belongs to an active conversation
    /// (eligibility bit for relay)
    pub fn has_conversation(&self) -> bool {
        self.conversation.is_some()
    }

    /// Default a missing sender role to `User`
    ///
    /// Some channels omit the role on incoming activities; the
    /// interceptor normalizes the live activity before snapshotting.
    pub fn normalize_from_role(&mut self) {
        if let Some(ref mut from) = self.from {
            if from.role.is_none() {
                from.role = Some(Role::User);
            }
        }
    }

    pub fn with_conversation(mut self, conversation: ConversationAccount) -> Self {
        self.conversation = Some(conversation);
        self
    }

    pub fn with_from(mut self, from: ChannelAccount) -> Self {
        self.from = Some(from);
        self
    }

    pub fn with_recipient(mut self, recipient: ChannelAccount) -> Self {
        self.recipient = Some(recipient);
        self
    }

    pub fn with_reply_to(mut self, reply_to_id: impl Into<String>) -> Self {
        self.reply_to_id = Some(reply_to_id.into());
        self
    }
}

/// Address of an activity inside a conversation
///
/// Carries just enough to reconstruct a minimal record after the
/// original activity is gone (delete interception).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<ChannelAccount>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bot: Option<ChannelAccount>,

    pub conversation: ConversationAccount,

    pub channel_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_url: Option<String>,
}

impl ConversationReference {
    /// Extract the reference from an activity
    ///
    /// Returns `None` when the activity carries no conversation.
    pub fn from_activity(activity: &Activity) -> Option<Self> {
        let conversation = activity.conversation.clone()?;
        Some(Self {
            activity_id: activity.id.clone(),
            user: activity.from.clone(),
            bot: activity.recipient.clone(),
            conversation,
            channel_id: activity.channel_id.clone(),
            service_url: None,
        })
    }

    /// Synthesize the minimal tombstone logged after a delete
    ///
    /// Carries only the deleted activity's identifier and the
    /// conversation it belonged to. The outbound direction of the
    /// record means `from` is the bot and `recipient` the user.
    pub fn delete_record(&self) -> Activity {
        Activity {
            id: self.activity_id.clone(),
            from: self.bot.clone(),
            recipient: self.user.clone(),
            conversation: Some(self.conversation.clone()),
            ..Activity::new(ActivityType::MessageDelete, self.channel_id.clone())
        }
    }
}
