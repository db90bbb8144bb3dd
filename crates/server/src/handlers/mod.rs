//! # API Route Handlers
//!
//! The handlers are split by concern: `general` serves the upload page and the
//! health check, `presentation` runs the PDF summary pipeline.

pub mod general;
pub mod presentation;

pub use general::*;
pub use presentation::*;
