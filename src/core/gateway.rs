//! Chat gateway boundary.
//!
//! The roster core renders nothing itself; it hands structured content to a
//! gateway that owns the platform-specific surface. Implementations live in
//! [`crate::infra::gateway`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::model::{ChannelId, MessageId};
use crate::core::RosterError;

/// Platform-neutral structured message content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent {
    /// Short heading.
    pub title: String,
    /// Main body text.
    pub body: String,
    /// Opaque action tags the platform renders as interactive controls
    /// (for example a check-in button).
    pub actions: Vec<String>,
}

impl MessageContent {
    /// Content with a title and body and no actions.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            actions: Vec::new(),
        }
    }

    /// Attach an action tag.
    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.actions.push(action.into());
        self
    }
}

/// Abstraction over the chat platform used for display surfaces and alerts.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Create a channel named `name` under a parent category.
    async fn create_channel(
        &self,
        parent: ChannelId,
        name: &str,
    ) -> Result<ChannelId, RosterError>;

    /// Destroy a channel and its messages.
    async fn delete_channel(&self, channel: ChannelId) -> Result<(), RosterError>;

    /// Post a message; returns its id for later edits.
    async fn send_message(
        &self,
        channel: ChannelId,
        content: MessageContent,
    ) -> Result<MessageId, RosterError>;

    /// Replace the content of an existing message.
    async fn edit_message(
        &self,
        channel: ChannelId,
        message: MessageId,
        content: MessageContent,
    ) -> Result<(), RosterError>;
}
