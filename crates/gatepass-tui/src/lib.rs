//! Terminal UI for Gatepass
//!
//! A thin shell over [`gatepass_app::Driver`] that provides terminal-specific
//! I/O. All orchestration logic lives in the generic [`gatepass_app::Runtime`]
//!
//! This crate only handles terminal rendering and backend selection.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod demo;
pub mod terminal;
pub mod ui;

pub use gatepass_app::{App, AppAction, AppEvent, Driver, KeyInput, Route, Runtime};
pub use terminal::{TerminalDriver, TerminalError};
