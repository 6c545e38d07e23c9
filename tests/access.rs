mod common;

use arena::contest::{
    derive, AccessInputs, AccessPolicy, ContestPhase, CountdownTarget, RegistrationStatus,
    TimeWindow, Urgency,
};
use common::{CONTEST_END, CONTEST_START, REG_END, REG_START};

fn windows() -> (TimeWindow, TimeWindow) {
    (
        TimeWindow::new(REG_START, REG_END).expect("registration window"),
        TimeWindow::new(CONTEST_START, CONTEST_END).expect("contest window"),
    )
}

fn access_at(now: u64, is_registered: bool, authenticated: bool) -> arena::contest::ContestAccessState {
    let (registration, contest) = windows();
    let status = RegistrationStatus {
        is_registered,
        last_error: None,
    };
    derive(
        &AccessInputs {
            registration_window: &registration,
            contest_window: &contest,
            status: &status,
            authenticated,
        },
        now,
    )
}

#[test]
fn phases_are_total_and_exclusive() {
    let window = TimeWindow::new(10, 20).expect("window");
    for now in 0..40 {
        let phase = window.phase(now);
        let expected = if now < 10 {
            ContestPhase::Upcoming
        } else if now <= 20 {
            ContestPhase::Open
        } else {
            ContestPhase::Closed
        };
        assert_eq!(phase, expected, "now={now}");
        assert_eq!(window.contains(now), phase == ContestPhase::Open);
    }
}

#[test]
fn boundaries_are_inclusive() {
    let window = TimeWindow::new(10, 20).expect("window");
    assert_eq!(window.phase(10), ContestPhase::Open);
    assert_eq!(window.phase(20), ContestPhase::Open);
    assert_eq!(window.phase(9), ContestPhase::Upcoming);
    assert_eq!(window.phase(21), ContestPhase::Closed);
}

#[test]
fn remaining_only_while_open_and_decreasing() {
    let (_, contest) = windows();
    assert_eq!(contest.remaining(CONTEST_START - 1), None);
    assert_eq!(contest.remaining(CONTEST_END + 1), None);
    let mut previous = u64::MAX;
    for now in (CONTEST_START..=CONTEST_END).step_by(250_000) {
        let remaining = contest.remaining(now).expect("open");
        assert_eq!(remaining, (CONTEST_END - now) / 1_000);
        assert!(remaining < previous);
        previous = remaining;
    }
}

#[test]
fn unauthenticated_viewer_cannot_register() {
    let access = access_at(1_500_000, false, false);
    assert_eq!(access.registration_phase, ContestPhase::Open);
    assert!(!access.can_register);
    assert!(!access.can_enter);
}

#[test]
fn authenticated_unregistered_viewer_may_register() {
    let access = access_at(1_500_000, false, true);
    assert!(access.can_register);
    assert!(!access.can_unregister);
    assert_eq!(access.contest_phase, ContestPhase::Upcoming);
    assert_eq!(access.seconds_to_contest_start, Some(500));
    assert_eq!(
        access.countdown_target(),
        CountdownTarget::ContestStart(500)
    );
}

#[test]
fn registered_viewer_enters_running_contest() {
    let access = access_at(3_000_000, true, true);
    assert_eq!(access.contest_phase, ContestPhase::Open);
    assert!(access.can_enter);
    assert_eq!(access.seconds_remaining_in_contest, Some(2_000));
    assert_eq!(access.seconds_to_contest_start, None);
    assert_eq!(access.countdown_target(), CountdownTarget::ContestEnd(2_000));
    assert!(!access.is_read_only());
}

#[test]
fn closed_contest_blocks_entry_regardless_of_registration() {
    for registered in [true, false] {
        let access = access_at(6_000_000, registered, true);
        assert_eq!(access.contest_phase, ContestPhase::Closed);
        assert!(!access.can_enter);
        assert_eq!(access.seconds_remaining_in_contest, None);
        assert_eq!(access.seconds_to_contest_start, None);
        assert_eq!(access.countdown_target(), CountdownTarget::None);
        assert!(access.is_read_only());
    }
}

#[test]
fn entry_requires_registration_and_open_contest() {
    assert!(access_at(3_000_000, true, true).can_enter);
    assert!(!access_at(3_000_000, false, true).can_enter);
    assert!(!access_at(1_500_000, true, true).can_enter);
}

#[test]
fn closing_registration_keeps_existing_registration() {
    // Registration window closed, contest running.
    let access = access_at(2_500_000, true, true);
    assert_eq!(access.registration_phase, ContestPhase::Closed);
    assert!(!access.can_unregister);
    assert!(!access.can_register);
    assert!(access.can_enter);
}

#[test]
fn shared_boundary_is_open_for_both_windows() {
    let access = access_at(REG_END, true, true);
    assert_eq!(access.registration_phase, ContestPhase::Open);
    assert_eq!(access.contest_phase, ContestPhase::Open);
    assert!(access.can_unregister);
    assert!(access.can_enter);
}

#[test]
fn urgency_rises_as_contest_ends() {
    assert_eq!(access_at(3_000_000, true, true).urgency, Urgency::Normal);
    assert_eq!(access_at(CONTEST_END - 600_000, true, true).urgency, Urgency::Warning);
    assert_eq!(access_at(CONTEST_END - 60_000, true, true).urgency, Urgency::Critical);
    assert_eq!(access_at(6_000_000, true, true).urgency, Urgency::Normal);
}

#[test]
fn facade_matches_free_function() {
    let (registration, contest) = windows();
    let status = RegistrationStatus::registered();
    let inputs = AccessInputs {
        registration_window: &registration,
        contest_window: &contest,
        status: &status,
        authenticated: true,
    };
    assert_eq!(AccessPolicy.derive(&inputs, 3_500_000), derive(&inputs, 3_500_000));
    assert_eq!(AccessPolicy.derive(&inputs, 3_500_000).progress_percent, 50.0);
}
