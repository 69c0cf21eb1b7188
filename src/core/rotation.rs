//! Rolling-window period lifecycle.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::ConfigHandle;
use crate::core::gateway::{ChatGateway, MessageContent};
use crate::core::ledger::BookingLedger;
use crate::core::model::{
    Period, PeriodDate, PeriodStatus, RosterView, RotationEvent, Slot, SlotAvailability,
};
use crate::core::store::RosterStore;
use crate::core::RosterError;

/// Maintains the rolling window of daily periods.
///
/// `rotate` is idempotent for a given `now`: a second call finds nothing to
/// create and nothing to retire. A period whose cascading delete fails stays
/// active and is retried on the next rotation; it is never silently dropped.
pub struct DailyPeriodManager {
    store: Arc<dyn RosterStore>,
    gateway: Arc<dyn ChatGateway>,
    ledger: Arc<BookingLedger>,
    config: ConfigHandle,
}

impl DailyPeriodManager {
    /// Create a manager over the shared store and gateway.
    pub fn new(
        store: Arc<dyn RosterStore>,
        gateway: Arc<dyn ChatGateway>,
        ledger: Arc<BookingLedger>,
        config: ConfigHandle,
    ) -> Self {
        Self {
            store,
            gateway,
            ledger,
            config,
        }
    }

    /// Ensure periods exist for today through today plus the window, retiring
    /// anything older. Returns the lifecycle events of this run.
    pub async fn rotate(&self, now: DateTime<Utc>) -> Result<Vec<RotationEvent>, RosterError> {
        let cfg = self.config.snapshot();
        let today = PeriodDate::containing(now);
        let mut events = Vec::new();

        // Retire strictly-past periods first so the window only ever grows
        // forward.
        for period in self.store.list_periods()? {
            if period.date >= today {
                continue;
            }
            if let Err(e) = self.store.clear_period_data(period.date) {
                tracing::warn!(date = %period.date, error = %e, "cascade failed, period kept for retry");
                continue;
            }
            self.store.remove_period(period.date)?;
            if let Some(channel) = period.channel {
                if let Err(e) = self.gateway.delete_channel(channel).await {
                    tracing::warn!(date = %period.date, error = %e, "channel teardown failed");
                }
            }
            tracing::info!(date = %period.date, "period retired");
            events.push(RotationEvent::PeriodRetired(period.date));
        }

        for offset in 0..u64::from(cfg.rolling_window_days) {
            let date = today.plus_days(offset);
            if self.store.get_period(date)?.is_some() {
                continue;
            }
            let channel = match self
                .gateway
                .create_channel(cfg.schedule_category, &date.to_string())
                .await
            {
                Ok(id) => id,
                Err(e) => {
                    tracing::error!(%date, error = %e, "channel creation failed, retried next rotation");
                    continue;
                }
            };
            // A send failure leaves the period without a pinned roster; a
            // later refresh posts it.
            let roster_message = match self
                .gateway
                .send_message(channel, empty_roster_content(date, cfg.capacity_per_slot))
                .await
            {
                Ok(id) => Some(id),
                Err(e) => {
                    tracing::warn!(%date, error = %e, "initial roster post failed");
                    None
                }
            };
            self.store.create_period(Period {
                date,
                status: PeriodStatus::Active,
                channel: Some(channel),
                roster_message,
            })?;
            tracing::info!(%date, %channel, "period created");
            events.push(RotationEvent::PeriodCreated(date));
        }

        Ok(events)
    }

    /// Re-render the period's roster into its pinned message.
    pub async fn refresh_roster(&self, date: PeriodDate) -> Result<(), RosterError> {
        let period = self
            .store
            .get_period(date)?
            .ok_or_else(|| RosterError::NotFound(format!("no period for {date}")))?;
        let channel = period
            .channel
            .ok_or_else(|| RosterError::NotFound(format!("period {date} has no channel")))?;

        let view = self.ledger.roster_view(date)?;
        let capacity = self.config.snapshot().capacity_per_slot;
        let content = roster_content(&view, capacity);

        match period.roster_message {
            Some(message) => self.gateway.edit_message(channel, message, content).await,
            None => {
                let message = self.gateway.send_message(channel, content).await?;
                self.store.set_roster_message(date, message)
            }
        }
    }
}

fn empty_roster_content(date: PeriodDate, capacity: u32) -> MessageContent {
    let view = RosterView {
        date,
        slots: Default::default(),
    };
    roster_content(&view, capacity)
}

fn roster_content(view: &RosterView, capacity: u32) -> MessageContent {
    let mut body = String::new();
    for slot in Slot::all() {
        let entries = view.slots.get(&slot);
        let avail = SlotAvailability {
            count: entries.map_or(0, |e| e.len() as u32),
            capacity,
        };
        let names = entries
            .map(|e| {
                e.iter()
                    .map(|entry| format!("{} ({})", entry.username, entry.role))
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_else(|| "open".to_string());
        body.push_str(&format!(
            "{slot} [{}/{}] {names}\n",
            avail.count, avail.capacity
        ));
    }
    MessageContent::new(format!("Roster for {}", view.date), body)
        .with_action(format!("roster_add_{}", view.date))
        .with_action(format!("roster_edit_{}", view.date))
        .with_action(format!("roster_cancel_{}", view.date))
}
