//! Deterministic test harness for gatepass flows.
//!
//! The production binary wires the runtime to a terminal and a backend.
//! This crate swaps both ends for test doubles so whole sessions run inside
//! a single test:
//!
//! - [`ScriptedDriver`] replays a [`Script`] of key presses, events, and
//!   quiet points through the same driver seam the terminal uses, and
//!   records a [`ScreenSnapshot`] on every render.
//! - [`FlakyStore`] wraps any store and injects outages at the adapter
//!   boundary.
//! - [`ManualClock`] pins the timestamps on issued passes and clearance
//!   writes.
//! - [`fixtures`] seeds a store with a known warehouse staff.
//!
//! # Observation
//!
//! Running the runtime consumes it, so tests keep the [`Observations`]
//! handle a driver hands out and read rendered frames from it afterwards;
//! persisted effects are read back from the store itself.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod clock;
pub mod fixtures;
pub mod flaky;
pub mod script;
pub mod snapshot;

pub use clock::{ManualClock, shift_start};
pub use fixtures::{PASSWORD, Staff, seeded_store};
pub use flaky::FlakyStore;
pub use script::{Observations, Script, ScriptError, ScriptedDriver};
pub use snapshot::{DetailsGlimpse, ScanGlimpse, ScreenSnapshot};
