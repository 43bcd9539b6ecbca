//! The rotation service.
//!
//! This module provides:
//! - Host events and boundary messages ([`Event`], [`Request`], [`Response`])
//! - The dispatch table running the rotation pipeline ([`Rotator`])
//! - The unified error type for pipeline runs ([`ServiceError`])
//!
//! # Pipeline
//!
//! Every settings save, manual rotation, reset and install runs
//! generate → build → install → reschedule. A rotation alarm firing runs
//! generate → build → install and refreshes the cached next firing.

mod error;
mod message;
mod rotator;


pub use error::ServiceError;
pub use message::{Event, InstallReason, Request, Response, SAVED_STATUS};
pub use rotator::Rotator;
