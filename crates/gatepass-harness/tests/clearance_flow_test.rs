//! Supervisor roster and clearance-toggle flows through the real runtime.
//!
//! # Oracle Pattern
//!
//! Each test asserts in two places: the frames the operator saw, and the
//! rows the store actually holds afterwards. A toggle that only looked
//! right on screen would fail the second half.

use std::sync::Arc;

use chrono::TimeDelta;
use gatepass_app::{KeyInput, Route, Runtime};
use gatepass_core::AuthError;
use gatepass_core::store::{MemoryStore, ProfileStore};
use gatepass_harness::{
    FlakyStore, ManualClock, Observations, PASSWORD, Script, ScriptError, ScriptedDriver, Staff,
    seeded_store, shift_start,
};
use gatepass_proto::ClearanceStatus;

fn setup() -> Result<(Arc<FlakyStore<MemoryStore>>, Staff, Arc<ManualClock>), AuthError> {
    let clock = Arc::new(ManualClock::default());
    let (store, staff) = seeded_store(clock.clone())?;
    Ok((Arc::new(FlakyStore::new(store)), staff, clock))
}

async fn run_session(
    store: &Arc<FlakyStore<MemoryStore>>,
    clock: &Arc<ManualClock>,
    script: Script,
) -> Result<Observations, ScriptError> {
    let driver = ScriptedDriver::new(script);
    let observations = driver.observations();
    Runtime::new(driver, Arc::clone(store), clock.clone()).run().await?;
    Ok(observations)
}

fn supervisor_sign_in() -> Script {
    Script::new().sign_in("priya@example.com", PASSWORD)
}

#[tokio::test]
async fn supervisor_lands_on_a_loaded_roster() {
    let (store, _, clock) = setup().unwrap();

    let observations = run_session(&store, &clock, supervisor_sign_in()).await.unwrap();

    let last = observations.last().unwrap();
    assert_eq!(last.route, Route::SupervisorHome);
    assert_eq!(last.roster_names, ["Ivan Petrov", "Rosa Vale"]);
    assert!(last.roster_notice.is_none());
    observations.assert_role_screens_backed();
}

#[tokio::test]
async fn revoking_a_cleared_driver_persists_with_a_fresh_stamp() {
    let (store, staff, clock) = setup().unwrap();

    let shift_clock = Arc::clone(&clock);
    let script = supervisor_sign_in()
        .key(KeyInput::Down)
        .enter()
        .then(move || shift_clock.advance(TimeDelta::hours(2)))
        .press('r')
        .settle();
    let observations = run_session(&store, &clock, script).await.unwrap();

    let last = observations.last().unwrap();
    let details = last.details.unwrap();
    assert_eq!(details.name, "Rosa Vale");
    assert_eq!(details.clearance, Some(ClearanceStatus::NotCleared));
    assert_eq!(details.notice.as_deref(), Some("Rosa Vale is now not cleared for exit"));

    let row = store.fetch_profile(&staff.cleared_driver.id).await.unwrap();
    assert_eq!(row.clearance, Some(ClearanceStatus::NotCleared));
    assert_eq!(row.last_updated, Some(shift_start() + TimeDelta::hours(2)));
    assert_eq!(store.clearance_writes(), 1);
}

#[tokio::test]
async fn re_marking_an_unchanged_driver_writes_nothing() {
    let (store, staff, clock) = setup().unwrap();

    // Rosa is already cleared; `c` must not touch the store.
    let script = supervisor_sign_in().key(KeyInput::Down).enter().press('c').settle();
    let observations = run_session(&store, &clock, script).await.unwrap();

    assert_eq!(store.clearance_writes(), 0);
    let row = store.fetch_profile(&staff.cleared_driver.id).await.unwrap();
    assert_eq!(row.last_updated, staff.cleared_driver.last_updated);
    assert_eq!(observations.last().unwrap().route, Route::DriverDetails);
}

#[tokio::test]
async fn failed_write_keeps_the_stored_row() {
    let (store, staff, clock) = setup().unwrap();

    let flaky = Arc::clone(&store);
    let script = supervisor_sign_in()
        .enter()
        .then(move || flaky.fail_next(1))
        .press('c')
        .settle();
    let observations = run_session(&store, &clock, script).await.unwrap();

    let last = observations.last().unwrap();
    let details = last.details.unwrap();
    assert_eq!(details.name, "Ivan Petrov");
    assert_eq!(details.clearance, Some(ClearanceStatus::NotCleared));
    assert!(details.notice.is_some_and(|notice| notice.starts_with("Update failed")));

    let row = store.fetch_profile(&staff.held_driver.id).await.unwrap();
    assert_eq!(row.clearance, Some(ClearanceStatus::NotCleared));
}

#[tokio::test]
async fn search_narrows_the_roster_until_the_query_is_erased() {
    let (store, _, clock) = setup().unwrap();

    // Esc only leaves capture mode; the filter stays until erased.
    let script = supervisor_sign_in()
        .press('/')
        .type_text("rosa")
        .esc()
        .press('/')
        .key(KeyInput::Backspace)
        .key(KeyInput::Backspace)
        .key(KeyInput::Backspace)
        .key(KeyInput::Backspace)
        .esc();
    let observations = run_session(&store, &clock, script).await.unwrap();

    assert!(
        observations.frames().iter().any(|frame| frame.roster_names == ["Rosa Vale"]),
        "search never narrowed the roster"
    );
    assert_eq!(observations.last().unwrap().roster_names, ["Ivan Petrov", "Rosa Vale"]);
}
