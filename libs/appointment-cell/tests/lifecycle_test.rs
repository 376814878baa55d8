use assert_matches::assert_matches;

use appointment_cell::models::AppointmentStatus::{Cancelled, Completed, Confirmed, Pending};
use appointment_cell::models::{AppointmentError, AppointmentStatus};
use appointment_cell::services::lifecycle::AppointmentLifecycleService;

#[test]
fn pending_can_be_confirmed_or_cancelled() {
    let lifecycle = AppointmentLifecycleService::new();

    assert!(lifecycle.validate_status_transition(Pending, Confirmed).is_ok());
    assert!(lifecycle.validate_status_transition(Pending, Cancelled).is_ok());
}

#[test]
fn confirmed_can_complete_or_cancel() {
    let lifecycle = AppointmentLifecycleService::new();

    assert!(lifecycle.validate_status_transition(Confirmed, Completed).is_ok());
    assert!(lifecycle.validate_status_transition(Confirmed, Cancelled).is_ok());
}

#[test]
fn pending_cannot_jump_straight_to_completed() {
    let lifecycle = AppointmentLifecycleService::new();

    assert_matches!(
        lifecycle.validate_status_transition(Pending, Completed),
        Err(AppointmentError::InvalidStatusTransition {
            from: Pending,
            to: Completed
        })
    );
}

#[test]
fn confirmed_cannot_go_back_to_pending() {
    let lifecycle = AppointmentLifecycleService::new();

    assert_matches!(
        lifecycle.validate_status_transition(Confirmed, Pending),
        Err(AppointmentError::InvalidStatusTransition { .. })
    );
}

#[test]
fn terminal_states_allow_no_transitions() {
    let lifecycle = AppointmentLifecycleService::new();

    for target in [Pending, Confirmed, Completed, Cancelled] {
        assert_matches!(
            lifecycle.validate_status_transition(Completed, target),
            Err(AppointmentError::InvalidStatusTransition { .. }),
            "completed must be terminal"
        );
        assert_matches!(
            lifecycle.validate_status_transition(Cancelled, target),
            Err(AppointmentError::InvalidStatusTransition { .. }),
            "cancelled must be terminal"
        );
    }
}

#[test]
fn self_transitions_are_rejected() {
    let lifecycle = AppointmentLifecycleService::new();

    for status in [Pending, Confirmed, Completed, Cancelled] {
        assert!(lifecycle.validate_status_transition(status, status).is_err());
    }
}

#[test]
fn transition_table_matches_expected_shape() {
    let lifecycle = AppointmentLifecycleService::new();

    assert_eq!(lifecycle.valid_transitions(Pending), &[Confirmed, Cancelled]);
    assert_eq!(lifecycle.valid_transitions(Confirmed), &[Completed, Cancelled]);
    assert!(lifecycle.valid_transitions(Completed).is_empty());
    assert!(lifecycle.valid_transitions(Cancelled).is_empty());
}

#[test]
fn only_cancellation_frees_a_slot() {
    assert!(Pending.blocks_slot());
    assert!(Confirmed.blocks_slot());
    assert!(Completed.blocks_slot());
    assert!(!Cancelled.blocks_slot());
}

#[test]
fn status_round_trips_through_text() {
    for status in [Pending, Confirmed, Completed, Cancelled] {
        let parsed: AppointmentStatus = status.as_str().parse().unwrap();
        assert_eq!(parsed, status);
    }

    assert!("rejected".parse::<AppointmentStatus>().is_err());
    assert!("".parse::<AppointmentStatus>().is_err());
}
