//! Application layer for Gatepass
//!
//! Pure state machine and generic runtime for screen and store
//! orchestration, enabling deterministic scripted testing with the same
//! code that runs in production.
//!
//! # Components
//!
//! - [`App`]: UI state machine (routing, forms, badge, roster, scanner)
//! - [`Driver`]: Trait for platform-specific I/O abstraction
//! - [`Runtime`]: Generic orchestration loop using Driver and a store

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod app;
mod driver;
mod event;
mod input;
mod route;
mod runtime;
mod state;

pub use action::AppAction;
pub use app::App;
pub use driver::Driver;
pub use event::AppEvent;
pub use input::KeyInput;
pub use route::Route;
pub use runtime::Runtime;
pub use state::{
    DriverDetails, LoginField, LoginForm, RegisterField, RegisterForm, Roster, ScanPhase,
    ScanResult,
};
