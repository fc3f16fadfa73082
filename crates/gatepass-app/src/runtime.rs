//! Generic runtime for application orchestration.
//!
//! The Runtime drives the application event loop, coordinating between:
//! - [`App`]: UI state machine
//! - [`ProfileStore`]: backend for accounts, profiles, and the session feed
//! - [`Driver`]: platform-specific I/O
//!
//! Store calls run as detached tasks so the loop never blocks on the
//! backend; each completion comes back as an [`AppEvent`] and the machine
//! decides whether it still applies.

use std::sync::Arc;

use gatepass_core::store::{ProfileStore, SessionWatch};
use gatepass_core::{Clock, ProfileId, issue_pass, verify};
use tokio::sync::mpsc;

use crate::{App, AppAction, AppEvent, Driver};

/// Store-call completions queued between loop iterations.
const EVENT_QUEUE_DEPTH: usize = 64;

/// Generic runtime that orchestrates App, store, and Driver.
///
/// # Type Parameters
///
/// - `S`: Backend store (usually held as `dyn ProfileStore`)
/// - `D`: Platform-specific I/O driver
pub struct Runtime<S, D>
where
    S: ProfileStore + ?Sized + 'static,
    D: Driver,
{
    driver: D,
    app: App,
    store: Arc<S>,
    clock: Arc<dyn Clock>,
    completions: mpsc::Sender<AppEvent>,
    events: mpsc::Receiver<AppEvent>,
    session_watch: SessionWatch,
    session_feed_open: bool,
}

impl<S, D> Runtime<S, D>
where
    S: ProfileStore + ?Sized + 'static,
    D: Driver,
{
    /// Create a new runtime over a driver, a store, and a clock.
    pub fn new(driver: D, store: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        let session_watch = store.subscribe_session();
        let (completions, events) = mpsc::channel(EVENT_QUEUE_DEPTH);
        Self {
            driver,
            app: App::new(),
            store,
            clock,
            completions,
            events,
            session_watch,
            session_feed_open: true,
        }
    }

    /// Run the main event loop.
    ///
    /// This is the core orchestration loop that:
    /// 1. Polls for input events from the driver
    /// 2. Receives store-call completions and session transitions
    /// 3. Feeds them to the App and executes the actions it returns
    ///
    /// # Errors
    ///
    /// Returns an error if the driver encounters an I/O error.
    pub async fn run(mut self) -> Result<(), D::Error> {
        self.driver.render(&self.app)?;

        let initial = self.session_watch.current();
        let actions = self.app.handle(AppEvent::SessionChanged(initial));
        if self.process_actions(actions)? {
            self.driver.stop();
            return Ok(());
        }

        loop {
            let event = tokio::select! {
                polled = self.driver.poll_event() => match polled? {
                    Some(event) => event,
                    None => break,
                },
                Some(event) = self.events.recv() => event,
                changed = self.session_watch.changed(), if self.session_feed_open => {
                    match changed {
                        Some(identity) => AppEvent::SessionChanged(identity),
                        None => {
                            // The store is gone; stop polling the feed.
                            self.session_feed_open = false;
                            continue;
                        },
                    }
                },
            };

            let actions = self.app.handle(event);
            if self.process_actions(actions)? {
                break;
            }
        }

        self.driver.stop();
        Ok(())
    }

    /// Process actions returned by the App.
    ///
    /// Returns `true` if should quit.
    fn process_actions(&mut self, initial_actions: Vec<AppAction>) -> Result<bool, D::Error> {
        let mut pending_actions = initial_actions;

        while !pending_actions.is_empty() {
            let actions = std::mem::take(&mut pending_actions);

            for action in actions {
                match action {
                    AppAction::Render => self.driver.render(&self.app)?,
                    AppAction::Quit => return Ok(true),

                    // Pass encoding is pure; complete it inline.
                    AppAction::IssuePass { profile } => {
                        let pass = issue_pass(&profile, self.clock.as_ref());
                        let new_actions = self.app.handle(AppEvent::PassIssued { pass });
                        pending_actions.extend(new_actions);
                    },

                    // Store calls run detached; completions come back as
                    // events through the queue.
                    AppAction::SignIn { .. }
                    | AppAction::Register { .. }
                    | AppAction::SignOut
                    | AppAction::FetchProfile { .. }
                    | AppAction::Verify { .. }
                    | AppAction::LoadRoster
                    | AppAction::SaveClearance { .. } => self.spawn_store_call(action),
                }
            }
        }
        Ok(false)
    }

    /// Start one store call as a detached task.
    fn spawn_store_call(&self, action: AppAction) {
        let store = Arc::clone(&self.store);
        let completions = self.completions.clone();

        match action {
            AppAction::SignIn { email, password } => {
                tokio::spawn(async move {
                    let result = store.authenticate(&email, &password).await;
                    let _ = completions.send(AppEvent::SignInFinished { result }).await;
                });
            },
            AppAction::Register { account } => {
                tokio::spawn(async move {
                    let result = store.register(account).await;
                    let _ = completions.send(AppEvent::RegisterFinished { result }).await;
                });
            },
            AppAction::SignOut => {
                tokio::spawn(async move {
                    let result = store.end_session().await;
                    let _ = completions.send(AppEvent::SignOutFinished { result }).await;
                });
            },
            AppAction::FetchProfile { id } => {
                tokio::spawn(async move {
                    let result = store.fetch_profile(&id).await;
                    let _ = completions.send(AppEvent::SessionProfile { id, result }).await;
                });
            },
            AppAction::Verify { payload } => {
                tokio::spawn(async move {
                    let subject_id = ProfileId::new(payload.subject_id.clone());
                    let result = verify(store.as_ref(), &payload).await;
                    let _ = completions.send(AppEvent::VerifyFinished { subject_id, result }).await;
                });
            },
            AppAction::LoadRoster => {
                tokio::spawn(async move {
                    let result = store.list_drivers().await;
                    let _ = completions.send(AppEvent::RosterLoaded { result }).await;
                });
            },
            AppAction::SaveClearance { id, status } => {
                tokio::spawn(async move {
                    let result = store.update_clearance(&id, status).await;
                    let _ =
                        completions.send(AppEvent::ClearanceSaved { id, status, result }).await;
                });
            },
            AppAction::Render | AppAction::Quit | AppAction::IssuePass { .. } => {
                tracing::warn!(?action, "not a store call");
            },
        }
    }

    /// Get a reference to the App
    pub fn app(&self) -> &App {
        &self.app
    }

    /// Get a mutable reference to the App
    pub fn app_mut(&mut self) -> &mut App {
        &mut self.app
    }
}
