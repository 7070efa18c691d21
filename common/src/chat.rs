use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::avatar;
use crate::identity::{Identity, RecordId, UserId};

/// Placeholder shown when the feed has no messages.
pub const EMPTY_FEED_HEADING: &str = "Start the conversation!";
pub const EMPTY_FEED_BODY: &str = "Be the first to share something with your fellow students.";

/// Time label for a message whose write is still in flight.
pub const PENDING_TIME_LABEL: &str = "Sending...";

/// A chat message as stored in the shared feed.
///
/// The wire keys for the author are `userId`/`userEmail`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    #[serde(default)]
    pub id: RecordId,
    pub content: String,
    #[serde(rename = "userId")]
    pub author_id: UserId,
    #[serde(rename = "userEmail")]
    pub author_email: String,
    /// Assigned by the store; `None` until the write round-trips.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default)]
    pub anonymous: bool,
}

impl ChatMessage {
    /// Whether this message was written by the given session identity.
    pub fn is_own(&self, session: &UserId) -> bool {
        &self.author_id == session
    }
}

/// Client-composed message body. The store assigns id and timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDraft {
    pub content: String,
    #[serde(rename = "userId")]
    pub author_id: UserId,
    #[serde(rename = "userEmail")]
    pub author_email: String,
    pub anonymous: bool,
}

impl MessageDraft {
    /// Build a draft from composer input. Whitespace-only input yields
    /// `None`; sending nothing is a silent no-op, not an error.
    pub fn compose(input: &str, author: &Identity) -> Option<MessageDraft> {
        let content = input.trim();
        if content.is_empty() {
            return None;
        }
        Some(MessageDraft {
            content: content.to_owned(),
            author_id: author.uid.clone(),
            author_email: author.email.clone(),
            anonymous: true,
        })
    }
}

/// Everything the chat renderer needs for one bubble.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageView {
    pub id: RecordId,
    pub own: bool,
    pub avatar_color: &'static str,
    pub avatar_initial: char,
    pub content: String,
    pub time_label: String,
}

impl MessageView {
    /// Project a stored message for display. Pure; avatar fields derive
    /// from the author id alone.
    pub fn project(message: &ChatMessage, session: &UserId) -> MessageView {
        MessageView {
            id: message.id.clone(),
            own: message.is_own(session),
            avatar_color: avatar::avatar_color(message.author_id.as_str()),
            avatar_initial: avatar::avatar_initial(message.author_id.as_str()),
            content: message.content.clone(),
            time_label: match message.timestamp {
                Some(ts) => ts.format("%H:%M").to_string(),
                None => PENDING_TIME_LABEL.to_owned(),
            },
        }
    }

    pub fn bubble_class(&self) -> &'static str {
        if self.own {
            "message own"
        } else {
            "message"
        }
    }
}

/// Project a whole snapshot, preserving delivered order.
pub fn project_feed(messages: &[ChatMessage], session: &UserId) -> Vec<MessageView> {
    messages
        .iter()
        .map(|m| MessageView::project(m, session))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn author() -> Identity {
        Identity {
            uid: UserId("u1".into()),
            email: "pat@campus.edu".into(),
            display_name: None,
        }
    }

    fn message(id: &str, author_id: &str, content: &str) -> ChatMessage {
        ChatMessage {
            id: RecordId(id.into()),
            content: content.into(),
            author_id: UserId(author_id.into()),
            author_email: format!("{author_id}@campus.edu"),
            timestamp: Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).single(),
            anonymous: true,
        }
    }

    #[test]
    fn compose_trims_and_rejects_blank_input() {
        assert_eq!(MessageDraft::compose("   \n", &author()), None);
        let draft = MessageDraft::compose("  hi there ", &author()).unwrap();
        assert_eq!(draft.content, "hi there");
        assert_eq!(draft.author_id, UserId("u1".into()));
        assert!(draft.anonymous);
    }

    #[test]
    fn own_message_projects_own_bubble() {
        let view = MessageView::project(&message("1", "u1", "hi"), &UserId("u1".into()));
        assert!(view.own);
        assert_eq!(view.bubble_class(), "message own");
        assert_eq!(view.content, "hi");
        assert_eq!(view.time_label, "09:30");
        assert_eq!(view.avatar_color, "#98D8C8");
        assert_eq!(view.avatar_initial, 'K');
    }

    #[test]
    fn foreign_message_is_not_own() {
        let view = MessageView::project(&message("1", "u2", "hey"), &UserId("u1".into()));
        assert!(!view.own);
        assert_eq!(view.bubble_class(), "message");
    }

    #[test]
    fn pending_timestamp_renders_sending_label() {
        let mut msg = message("1", "u1", "hi");
        msg.timestamp = None;
        let view = MessageView::project(&msg, &UserId("u1".into()));
        assert_eq!(view.time_label, PENDING_TIME_LABEL);
    }

    #[test]
    fn feed_keeps_delivered_order() {
        let feed = [
            message("b", "u2", "second"),
            message("a", "u1", "first"),
            message("c", "u3", "third"),
        ];
        let views = project_feed(&feed, &UserId("u1".into()));
        let ids: Vec<&str> = views.iter().map(|v| v.id.0.as_str()).collect();
        assert_eq!(ids, ["b", "a", "c"]);
    }

    #[test]
    fn markup_in_content_stays_verbatim() {
        let msg = message("1", "u2", "<script>alert('hi')</script>");
        let view = MessageView::project(&msg, &UserId("u1".into()));
        assert_eq!(view.content, "<script>alert('hi')</script>");
    }

    #[test]
    fn draft_uses_the_feed_wire_keys() {
        let draft = MessageDraft::compose("hi", &author()).unwrap();
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["userEmail"], "pat@campus.edu");
        assert_eq!(json["anonymous"], true);
    }

    #[test]
    fn message_decodes_without_id_or_timestamp() {
        let msg: ChatMessage = serde_json::from_value(serde_json::json!({
            "content": "hi",
            "userId": "u2",
            "userEmail": "sam@campus.edu",
        }))
        .unwrap();
        assert_eq!(msg.id, RecordId::default());
        assert_eq!(msg.timestamp, None);
        assert!(!msg.anonymous);
    }
}
