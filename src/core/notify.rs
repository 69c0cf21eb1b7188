//! Pre-shift notification emitter.

use std::sync::Arc;

use chrono::{DateTime, Timelike, Utc};
use uuid::Uuid;

use crate::config::ConfigHandle;
use crate::core::gateway::{ChatGateway, MessageContent};
use crate::core::model::{Attendee, NotificationEvent, PeriodDate, Slot};
use crate::core::store::RosterStore;
use crate::core::RosterError;
use crate::util::clock;

/// Emits one aggregated alert per (period, slot) shortly before the slot starts.
///
/// At-most-once is guarded by the notification row's `sent` flag. A failed
/// emission leaves the row unsent and is not retried: the next tick targets
/// a different rounded slot. Ticks are serialized by the job harness.
pub struct NotificationScheduler {
    store: Arc<dyn RosterStore>,
    gateway: Arc<dyn ChatGateway>,
    config: ConfigHandle,
}

impl NotificationScheduler {
    /// Create a scheduler over the shared store and gateway.
    pub fn new(
        store: Arc<dyn RosterStore>,
        gateway: Arc<dyn ChatGateway>,
        config: ConfigHandle,
    ) -> Self {
        Self {
            store,
            gateway,
            config,
        }
    }

    /// Scan for a slot starting within the lead window and alert its roster.
    ///
    /// Returns the emitted event, or `None` when the target slot has no
    /// bookings or was already notified.
    pub async fn tick(&self, now: DateTime<Utc>) -> Result<Option<NotificationEvent>, RosterError> {
        let cfg = self.config.snapshot();
        let target_at = clock::floor_to_hour(clock::plus_minutes(now, cfg.lead_minutes));
        let slot = Slot::from_hour(target_at.hour() as u8)?;
        let date = PeriodDate::containing(now);

        let bookings = self.store.bookings_for_slot(date, slot)?;
        if bookings.is_empty() {
            return Ok(None);
        }
        if self.store.ensure_notification(date, slot)? {
            // Already sent for this (period, slot).
            return Ok(None);
        }

        let attendees: Vec<Attendee> = bookings
            .iter()
            .map(|b| Attendee {
                user: b.user,
                role: b.role.clone(),
            })
            .collect();
        let event = NotificationEvent {
            event_id: Uuid::new_v4(),
            date,
            slot,
            attendees,
        };

        let roster_line = bookings
            .iter()
            .map(|b| format!("{} ({})", b.username, b.role))
            .collect::<Vec<_>>()
            .join(", ");
        let content = MessageContent::new(
            format!("Shift reminder: {date} {slot}"),
            format!(
                "Shift at {slot} UTC starts in {} minute(s): {roster_line}",
                cfg.lead_minutes
            ),
        )
        .with_action(format!("shift_checkin_{date}_{slot}"));

        if let Err(e) = self
            .gateway
            .send_message(cfg.notification_channel, content)
            .await
        {
            tracing::error!(%date, %slot, error = %e, "notification emission failed, row left unsent");
            return Err(e);
        }

        self.store.mark_notification_sent(date, slot)?;
        tracing::info!(%date, %slot, attendees = event.attendees.len(), "notification emitted");
        Ok(Some(event))
    }
}
