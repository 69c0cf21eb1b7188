//! Integration tests for the multi-step selection session flow.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use shift_roster::builders::{build_roster, RosterService};
use shift_roster::config::RosterConfig;
use shift_roster::core::model::{
    ChannelId, CommitOutcome, Period, PeriodDate, PeriodStatus, Slot, UserId,
};
use shift_roster::core::store::RosterStore;
use shift_roster::core::{RosterError, SessionState};
use shift_roster::infra::{MemoryStore, RecordingGateway};

fn test_config() -> RosterConfig {
    RosterConfig {
        capacity_per_slot: 2,
        lead_minutes: 5,
        rolling_window_days: 7,
        selection_ttl_minutes: 15,
        schedule_category: ChannelId(100),
        notification_channel: ChannelId(200),
        default_role: "member".to_string(),
    }
}

fn service_with_period(date: &str) -> RosterService {
    let store = Arc::new(MemoryStore::new());
    let gateway = Arc::new(RecordingGateway::new());
    let store_dyn: Arc<dyn RosterStore> = store.clone();
    let service = build_roster(test_config(), store_dyn, gateway).unwrap();
    store
        .create_period(Period {
            date: date.parse().unwrap(),
            status: PeriodStatus::Active,
            channel: None,
            roster_message: None,
        })
        .unwrap();
    service
}

fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap()
}

fn slot(hour: u8) -> Slot {
    Slot::from_hour(hour).unwrap()
}

#[test]
fn range_selection_computes_inclusive_slots_and_confirm_commits_each() {
    let service = service_with_period("2024-01-10");
    let user = UserId(1);
    let date: PeriodDate = "2024-01-10".parse().unwrap();

    service.sessions.select_date(user, "alice", date, t0()).unwrap();
    service.sessions.select_start(user, slot(9), t0()).unwrap();
    let range = service.sessions.select_end(user, slot(11), t0()).unwrap();
    assert_eq!(
        range.iter().map(ToString::to_string).collect::<Vec<_>>(),
        vec!["09:00", "10:00", "11:00"]
    );
    assert_eq!(
        service.sessions.peek(user).unwrap().state,
        SessionState::RangeChosen
    );

    let outcomes = service.sessions.confirm(user).unwrap();
    assert_eq!(outcomes.len(), 3);
    assert!(outcomes.values().all(|&o| o == CommitOutcome::Booked));

    let availability = service.ledger.availability(date).unwrap();
    for hour in [9, 10, 11] {
        assert_eq!(availability[&slot(hour)].count, 1);
    }
}

#[test]
fn inverted_range_is_rejected_and_the_session_survives() {
    let service = service_with_period("2024-01-10");
    let user = UserId(1);
    let date: PeriodDate = "2024-01-10".parse().unwrap();

    service.sessions.select_date(user, "alice", date, t0()).unwrap();
    service.sessions.select_start(user, slot(11), t0()).unwrap();

    let err = service.sessions.select_end(user, slot(9), t0()).unwrap_err();
    assert!(matches!(err, RosterError::Validation(_)));

    // Still in DateChosen with no slots; the retained start allows a retry.
    let snapshot = service.sessions.peek(user).unwrap();
    assert_eq!(snapshot.state, SessionState::DateChosen);
    assert!(snapshot.slots.is_empty());

    let range = service.sessions.select_end(user, slot(12), t0()).unwrap();
    assert_eq!(range.len(), 2);
}

#[test]
fn end_without_start_is_a_validation_error() {
    let service = service_with_period("2024-01-10");
    let user = UserId(1);
    let date: PeriodDate = "2024-01-10".parse().unwrap();

    service.sessions.select_date(user, "alice", date, t0()).unwrap();
    assert!(matches!(
        service.sessions.select_end(user, slot(9), t0()),
        Err(RosterError::Validation(_))
    ));
}

#[test]
fn discrete_picks_accumulate_and_duplicates_collapse() {
    let service = service_with_period("2024-01-10");
    let user = UserId(1);
    let date: PeriodDate = "2024-01-10".parse().unwrap();

    service.sessions.select_date(user, "alice", date, t0()).unwrap();
    // Two pages of a paginated slot picker, overlapping on 10:00.
    service
        .sessions
        .add_slots(user, [slot(9), slot(10)], t0())
        .unwrap();
    service
        .sessions
        .add_slots(user, [slot(10), slot(21)], t0())
        .unwrap();

    let snapshot = service.sessions.peek(user).unwrap();
    assert_eq!(snapshot.state, SessionState::MultiSlotChosen);
    assert_eq!(snapshot.slots.len(), 3);

    let outcomes = service.sessions.confirm(user).unwrap();
    assert_eq!(outcomes.len(), 3);
}

#[test]
fn confirm_without_slots_is_rejected_and_session_survives() {
    let service = service_with_period("2024-01-10");
    let user = UserId(1);
    let date: PeriodDate = "2024-01-10".parse().unwrap();

    service.sessions.select_date(user, "alice", date, t0()).unwrap();
    assert!(matches!(
        service.sessions.confirm(user),
        Err(RosterError::Validation(_))
    ));
    assert!(service.sessions.peek(user).is_some());
}

#[test]
fn confirm_consumes_the_session_exactly_once() {
    let service = service_with_period("2024-01-10");
    let user = UserId(1);
    let date: PeriodDate = "2024-01-10".parse().unwrap();

    service.sessions.select_date(user, "alice", date, t0()).unwrap();
    service.sessions.add_slots(user, [slot(9)], t0()).unwrap();
    service.sessions.confirm(user).unwrap();

    // The session is gone: a second confirm is stale, not a duplicate commit.
    assert!(matches!(
        service.sessions.confirm(user),
        Err(RosterError::NotFound(_))
    ));
    assert_eq!(service.ledger.availability(date).unwrap()[&slot(9)].count, 1);
}

#[test]
fn selecting_a_new_date_resets_accumulated_slots() {
    let service = service_with_period("2024-01-10");
    let user = UserId(1);
    let date: PeriodDate = "2024-01-10".parse().unwrap();

    service.sessions.select_date(user, "alice", date, t0()).unwrap();
    service.sessions.add_slots(user, [slot(9)], t0()).unwrap();

    service.sessions.select_date(user, "alice", date, t0()).unwrap();
    let snapshot = service.sessions.peek(user).unwrap();
    assert_eq!(snapshot.state, SessionState::DateChosen);
    assert!(snapshot.slots.is_empty());
}

#[test]
fn cancel_clears_unconditionally() {
    let service = service_with_period("2024-01-10");
    let user = UserId(1);
    let date: PeriodDate = "2024-01-10".parse().unwrap();

    service.sessions.select_date(user, "alice", date, t0()).unwrap();
    assert!(service.sessions.cancel(user));
    assert!(service.sessions.peek(user).is_none());
    // Cancelling with no session is a quiet no-op.
    assert!(!service.sessions.cancel(user));
}

#[test]
fn sweep_drops_only_idle_sessions() {
    let service = service_with_period("2024-01-10");
    let date: PeriodDate = "2024-01-10".parse().unwrap();

    service
        .sessions
        .select_date(UserId(1), "alice", date, t0())
        .unwrap();
    let later = t0() + chrono::Duration::minutes(10);
    service
        .sessions
        .select_date(UserId(2), "bob", date, later)
        .unwrap();

    // 16 minutes after t0: only the first session exceeded the 15 minute TTL.
    let sweep_at = t0() + chrono::Duration::minutes(16);
    assert_eq!(service.sessions.sweep_expired(sweep_at), 1);
    assert!(service.sessions.peek(UserId(1)).is_none());
    assert!(service.sessions.peek(UserId(2)).is_some());
}

#[test]
fn operations_without_a_session_are_not_found() {
    let service = service_with_period("2024-01-10");
    let user = UserId(9);

    assert!(matches!(
        service.sessions.select_start(user, slot(9), t0()),
        Err(RosterError::NotFound(_))
    ));
    assert!(matches!(
        service.sessions.add_slots(user, [slot(9)], t0()),
        Err(RosterError::NotFound(_))
    ));
    assert!(matches!(
        service.sessions.confirm(user),
        Err(RosterError::NotFound(_))
    ));
}
