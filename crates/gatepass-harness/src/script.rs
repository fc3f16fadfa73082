//! Scripted input for runtime tests.
//!
//! A [`Script`] is a recorded operator: key presses, injected events, quiet
//! points, and hooks. [`ScriptedDriver`] replays it through the same
//! [`Driver`] seam the terminal uses, so a whole session runs under the real
//! runtime with no terminal attached.
//!
//! # Settling
//!
//! Store calls complete on the runtime's own queue, racing the driver in
//! its select loop. A [`Script::settle`] step holds the next input until no
//! completion has arrived for a short window, which is how a test says
//! "wait for the store round-trip" without reaching into the runtime.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use gatepass_app::{App, AppEvent, Driver, KeyInput, Route};

use crate::snapshot::ScreenSnapshot;

/// How long the runtime must stay quiet for a settle step to pass.
const QUIET_WINDOW: Duration = Duration::from_millis(25);

enum Step {
    Event(AppEvent),
    Settle,
    Run(Box<dyn FnOnce() + Send>),
}

/// A recorded sequence of operator input.
#[derive(Default)]
pub struct Script {
    steps: VecDeque<Step>,
}

impl Script {
    /// Starts an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one key press.
    #[must_use]
    pub fn key(mut self, key: KeyInput) -> Self {
        self.steps.push_back(Step::Event(AppEvent::Key(key)));
        self
    }

    /// Appends one printable character.
    #[must_use]
    pub fn press(self, c: char) -> Self {
        self.key(KeyInput::Char(c))
    }

    /// Types `text` one character at a time.
    #[must_use]
    pub fn type_text(mut self, text: &str) -> Self {
        for c in text.chars() {
            self.steps.push_back(Step::Event(AppEvent::Key(KeyInput::Char(c))));
        }
        self
    }

    /// Appends Enter.
    #[must_use]
    pub fn enter(self) -> Self {
        self.key(KeyInput::Enter)
    }

    /// Appends Tab.
    #[must_use]
    pub fn tab(self) -> Self {
        self.key(KeyInput::Tab)
    }

    /// Appends Escape.
    #[must_use]
    pub fn esc(self) -> Self {
        self.key(KeyInput::Esc)
    }

    /// Appends a raw event, as if the platform produced it.
    #[must_use]
    pub fn event(mut self, event: AppEvent) -> Self {
        self.steps.push_back(Step::Event(event));
        self
    }

    /// Holds the next step until the runtime has been quiet for a window.
    #[must_use]
    pub fn settle(mut self) -> Self {
        self.steps.push_back(Step::Settle);
        self
    }

    /// Runs a hook between inputs (toggle an outage, move the clock).
    #[must_use]
    pub fn then(mut self, hook: impl FnOnce() + Send + 'static) -> Self {
        self.steps.push_back(Step::Run(Box::new(hook)));
        self
    }

    /// Email, Tab, password, Enter, then settle until the profile lands.
    #[must_use]
    pub fn sign_in(self, email: &str, password: &str) -> Self {
        self.type_text(email).tab().type_text(password).enter().settle()
    }
}

/// Shared view of what the driver saw.
///
/// [`gatepass_app::Runtime::run`] consumes the runtime, so tests keep this
/// handle and read it after the run finishes.
#[derive(Clone, Default)]
pub struct Observations {
    frames: Arc<Mutex<Vec<ScreenSnapshot>>>,
    stopped: Arc<AtomicBool>,
}

impl Observations {
    /// Every rendered frame, in order.
    #[allow(clippy::expect_used)]
    #[must_use]
    pub fn frames(&self) -> Vec<ScreenSnapshot> {
        self.frames.lock().expect("Mutex poisoned").clone()
    }

    /// The last rendered frame.
    #[must_use]
    pub fn last(&self) -> Option<ScreenSnapshot> {
        self.frames().into_iter().next_back()
    }

    /// Whether any frame showed `route`.
    #[must_use]
    pub fn visited(&self, route: Route) -> bool {
        self.frames().iter().any(|frame| frame.route == route)
    }

    /// Whether the runtime released the driver on shutdown.
    #[must_use]
    pub fn stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Panics if any frame put a role-gated screen up without a loaded
    /// profile behind it. Flow tests run this over whole sessions; it is
    /// the render gate the TUI applies, checked across every frame instead
    /// of one.
    pub fn assert_role_screens_backed(&self) {
        for (index, frame) in self.frames().iter().enumerate() {
            assert!(
                !frame.route.requires_session() || frame.profile_name.is_some() || frame.loading,
                "frame {index} shows {:?} with no profile",
                frame.route
            );
        }
    }
}

/// Replays a [`Script`] through the [`Driver`] seam.
pub struct ScriptedDriver {
    steps: VecDeque<Step>,
    observations: Observations,
}

impl ScriptedDriver {
    /// Creates a driver that will replay `script`, then ask for shutdown.
    #[must_use]
    pub fn new(script: Script) -> Self {
        Self { steps: script.steps, observations: Observations::default() }
    }

    /// Handle for reading frames after the runtime finishes.
    #[must_use]
    pub fn observations(&self) -> Observations {
        self.observations.clone()
    }
}

/// The error type the driver seam demands; replaying a script cannot fail.
#[derive(Debug, Clone)]
pub struct ScriptError;

impl fmt::Display for ScriptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("scripted driver failed")
    }
}

impl std::error::Error for ScriptError {}

impl Driver for ScriptedDriver {
    type Error = ScriptError;

    async fn poll_event(&mut self) -> Result<Option<AppEvent>, ScriptError> {
        loop {
            if matches!(self.steps.front(), Some(Step::Settle)) {
                // The runtime cancels this future whenever a completion
                // arrives and the wait starts over; the step is consumed
                // only after a full quiet window.
                tokio::time::sleep(QUIET_WINDOW).await;
                self.steps.pop_front();
                continue;
            }
            let Some(step) = self.steps.pop_front() else {
                // One last quiet window so trailing completions land
                // before the shutdown request.
                tokio::time::sleep(QUIET_WINDOW).await;
                return Ok(None);
            };
            match step {
                Step::Event(event) => return Ok(Some(event)),
                Step::Run(hook) => hook(),
                Step::Settle => {}, // consumed above
            }
        }
    }

    fn render(&mut self, app: &App) -> Result<(), ScriptError> {
        #[allow(clippy::expect_used)]
        self.observations
            .frames
            .lock()
            .expect("Mutex poisoned")
            .push(ScreenSnapshot::capture(app));
        Ok(())
    }

    fn stop(&mut self) {
        self.observations.stopped.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn events_replay_in_order() {
        let mut driver = ScriptedDriver::new(Script::new().press('a').enter());

        assert!(matches!(
            driver.poll_event().await.unwrap(),
            Some(AppEvent::Key(KeyInput::Char('a')))
        ));
        assert!(matches!(driver.poll_event().await.unwrap(), Some(AppEvent::Key(KeyInput::Enter))));
        assert!(driver.poll_event().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn settle_delays_but_does_not_drop_the_next_event() {
        let mut driver = ScriptedDriver::new(Script::new().settle().press('x'));

        assert!(matches!(
            driver.poll_event().await.unwrap(),
            Some(AppEvent::Key(KeyInput::Char('x')))
        ));
    }

    #[tokio::test]
    async fn hooks_run_before_the_following_event() {
        let flag = Arc::new(AtomicBool::new(false));
        let seen = Arc::clone(&flag);
        let mut driver = ScriptedDriver::new(
            Script::new().then(move || seen.store(true, Ordering::SeqCst)).press('x'),
        );

        driver.poll_event().await.unwrap();
        assert!(flag.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn render_records_frames_and_stop_marks_shutdown() {
        let mut driver = ScriptedDriver::new(Script::new());
        let observations = driver.observations();

        driver.render(&App::new()).unwrap();
        driver.stop();

        assert_eq!(observations.frames().len(), 1);
        assert!(observations.visited(Route::Login));
        assert!(observations.stopped());
    }
}
