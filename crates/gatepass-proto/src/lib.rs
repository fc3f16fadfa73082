//! Wire format for warehouse exit-clearance passes.
//!
//! A clearance pass is a canonical JSON document carried inside a QR code.
//! Drivers present the QR at the gate; the security console decodes it with
//! [`ClearancePayload::from_scan`] and verifies the claim against the live
//! profile record. The payload is a point-in-time snapshot of the driver's
//! clearance and carries no authority of its own.
//!
//! # Components
//!
//! - [`ClearancePayload`]: the scanned document (subject, role, status, encode time)
//! - [`ClearanceStatus`] / [`Role`]: closed vocabularies shared across the system
//! - [`MalformedPayload`]: decode rejection taxonomy
//! - [`render`]: QR output for badge display (feature `render`)

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod payload;
#[cfg(feature = "render")]
pub mod render;

pub use payload::{ClearancePayload, ClearanceStatus, MalformedPayload, Role};
