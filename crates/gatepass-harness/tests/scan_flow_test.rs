//! Gate-scan flows through the real runtime.
//!
//! The centerpiece is a relay across three operator sessions sharing one
//! store: a driver prints a badge, a supervisor revokes the clearance, and
//! the gate scan of the now-stale badge must come back as a hold. The
//! remaining tests pin down each scan verdict the operator can see.

use std::sync::Arc;

use gatepass_app::{AppEvent, KeyInput, Route, Runtime};
use gatepass_core::store::MemoryStore;
use gatepass_core::{AuthError, Profile, ProfileId, issue_pass};
use gatepass_harness::{
    FlakyStore, ManualClock, Observations, PASSWORD, ScanGlimpse, Script, ScriptError,
    ScriptedDriver, Staff, seeded_store,
};
use gatepass_proto::{ClearanceStatus, Role};

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

/// Sign in as the security officer, arm the scanner, and scan `raw`.
fn gate_scan(raw: String) -> Script {
    Script::new()
        .sign_in("omar@example.com", PASSWORD)
        .press('s')
        .event(AppEvent::Scanned { raw })
        .settle()
}

#[tokio::test]
async fn revoked_badge_relays_to_a_stale_hold() {
    let (store, _, clock) = setup().unwrap();

    // Shift start: Rosa prints her badge while cleared, then signs out.
    let driver_shift = Script::new()
        .sign_in("rosa@example.com", PASSWORD)
        .press('b')
        .esc()
        .press('l')
        .settle();
    let observations = run_session(&store, &clock, driver_shift).await.unwrap();
    let encoded = observations
        .frames()
        .iter()
        .rev()
        .find_map(|frame| frame.badge_encoded.clone())
        .unwrap();

    // Mid-shift: the supervisor revokes her clearance.
    let revocation = Script::new()
        .sign_in("priya@example.com", PASSWORD)
        .key(KeyInput::Down)
        .enter()
        .press('r')
        .settle()
        .esc()
        .press('l')
        .settle();
    run_session(&store, &clock, revocation).await.unwrap();

    // Gate: the printed badge still says cleared, the live record says no.
    let observations = run_session(&store, &clock, gate_scan(encoded)).await.unwrap();

    let last = observations.last().unwrap();
    assert_eq!(last.route, Route::Scan);
    assert_eq!(last.scan, ScanGlimpse::Held { name: "Rosa Vale".to_owned(), stale: true });
    observations.assert_role_screens_backed();
}

#[tokio::test]
async fn fresh_cleared_badge_scans_cleared() {
    let (store, staff, clock) = setup().unwrap();
    let pass = issue_pass(&staff.cleared_driver, clock.as_ref());

    let observations =
        run_session(&store, &clock, gate_scan(pass.encoded().to_owned())).await.unwrap();

    let last = observations.last().unwrap();
    assert_eq!(last.scan, ScanGlimpse::Cleared { name: "Rosa Vale".to_owned(), stale: false });
}

#[tokio::test]
async fn garbage_capture_settles_without_a_lookup() {
    let (store, _, clock) = setup().unwrap();

    let observations =
        run_session(&store, &clock, gate_scan("not a pass".to_owned())).await.unwrap();

    assert!(matches!(observations.last().unwrap().scan, ScanGlimpse::Invalid { .. }));
    // The one read is the officer's own profile at sign-in.
    assert_eq!(store.profile_reads(), 1);
}

#[tokio::test]
async fn outage_reports_unavailable_and_a_rescan_recovers() {
    let (store, staff, clock) = setup().unwrap();
    let pass = issue_pass(&staff.cleared_driver, clock.as_ref());
    let raw = pass.encoded().to_owned();

    let offline = Arc::clone(&store);
    let restored = Arc::clone(&store);
    let script = Script::new()
        .sign_in("omar@example.com", PASSWORD)
        .press('s')
        .then(move || offline.set_offline(true))
        .event(AppEvent::Scanned { raw: raw.clone() })
        .settle()
        .then(move || restored.set_offline(false))
        .press('n')
        .event(AppEvent::Scanned { raw })
        .settle();
    let observations = run_session(&store, &clock, script).await.unwrap();

    assert!(
        observations.frames().iter().any(|frame| frame.scan == ScanGlimpse::Unavailable),
        "the outage never surfaced as unavailable"
    );
    let last = observations.last().unwrap();
    assert_eq!(last.scan, ScanGlimpse::Cleared { name: "Rosa Vale".to_owned(), stale: false });
}

#[tokio::test]
async fn unknown_subject_is_rejected_outright() {
    let (store, _, clock) = setup().unwrap();
    let ghost = Profile {
        id: ProfileId::new("drv-0999"),
        email: "ghost@example.com".to_owned(),
        display_name: "Ghost Driver".to_owned(),
        role: Role::Driver,
        clearance: Some(ClearanceStatus::Cleared),
        last_updated: None,
    };
    let pass = issue_pass(&ghost, clock.as_ref());

    let observations =
        run_session(&store, &clock, gate_scan(pass.encoded().to_owned())).await.unwrap();

    match &observations.last().unwrap().scan {
        ScanGlimpse::Rejected { message } => assert!(message.contains("no record")),
        other => panic!("expected a rejection, saw {other:?}"),
    }
}

#[tokio::test]
async fn role_change_after_issue_rejects_the_badge() {
    let (store, staff, clock) = setup().unwrap();

    // The badge was printed while Rosa was a driver.
    let pass = issue_pass(&staff.cleared_driver, clock.as_ref());

    // She has since been promoted; the live record is no longer a driver's.
    let mut promoted = staff.cleared_driver.clone();
    promoted.role = Role::Supervisor;
    store.inner().insert_profile(promoted);

    let observations =
        run_session(&store, &clock, gate_scan(pass.encoded().to_owned())).await.unwrap();

    match &observations.last().unwrap().scan {
        ScanGlimpse::Rejected { message } => assert!(message.contains("not a driver")),
        other => panic!("expected a rejection, saw {other:?}"),
    }
}
