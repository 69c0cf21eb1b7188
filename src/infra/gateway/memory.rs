//! Recording in-memory gateway for development and testing.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::core::gateway::{ChatGateway, MessageContent};
use crate::core::model::{ChannelId, MessageId};
use crate::core::RosterError;

/// One message the gateway accepted, for inspection.
#[derive(Debug, Clone)]
pub struct SentMessage {
    /// Channel the message was posted to.
    pub channel: ChannelId,
    /// Id assigned to the message.
    pub message: MessageId,
    /// Content as handed over by the core.
    pub content: MessageContent,
}

/// In-memory gateway that records every call and can be told to fail sends.
#[derive(Default)]
pub struct RecordingGateway {
    next_channel: AtomicU64,
    next_message: AtomicU64,
    channels: Mutex<Vec<(ChannelId, String)>>,
    deleted: Mutex<Vec<ChannelId>>,
    sent: Mutex<Vec<SentMessage>>,
    edited: Mutex<Vec<SentMessage>>,
    fail_sends: AtomicBool,
}

impl RecordingGateway {
    /// Create a gateway with empty recordings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent sends and edits fail, to exercise emission-failure paths.
    pub fn set_fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    /// Channels created so far, as (id, name) pairs.
    pub fn created_channels(&self) -> Vec<(ChannelId, String)> {
        self.channels.lock().clone()
    }

    /// Channels deleted so far.
    pub fn deleted_channels(&self) -> Vec<ChannelId> {
        self.deleted.lock().clone()
    }

    /// Messages accepted so far.
    pub fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.lock().clone()
    }

    /// Edits accepted so far.
    pub fn edited_messages(&self) -> Vec<SentMessage> {
        self.edited.lock().clone()
    }

    fn check_send(&self) -> Result<(), RosterError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(RosterError::Gateway("send failed (injected)".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ChatGateway for RecordingGateway {
    async fn create_channel(
        &self,
        _parent: ChannelId,
        name: &str,
    ) -> Result<ChannelId, RosterError> {
        let id = ChannelId(1000 + self.next_channel.fetch_add(1, Ordering::SeqCst));
        self.channels.lock().push((id, name.to_string()));
        Ok(id)
    }

    async fn delete_channel(&self, channel: ChannelId) -> Result<(), RosterError> {
        self.deleted.lock().push(channel);
        Ok(())
    }

    async fn send_message(
        &self,
        channel: ChannelId,
        content: MessageContent,
    ) -> Result<MessageId, RosterError> {
        self.check_send()?;
        let message = MessageId(self.next_message.fetch_add(1, Ordering::SeqCst));
        self.sent.lock().push(SentMessage {
            channel,
            message,
            content,
        });
        Ok(message)
    }

    async fn edit_message(
        &self,
        channel: ChannelId,
        message: MessageId,
        content: MessageContent,
    ) -> Result<(), RosterError> {
        self.check_send()?;
        self.edited.lock().push(SentMessage {
            channel,
            message,
            content,
        });
        Ok(())
    }
}
