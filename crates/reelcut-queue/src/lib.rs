//! Publish scheduling.
//!
//! This crate provides:
//! - Validated, ordered daily engagement windows
//! - A cursor that walks window starts day after day
//! - Idempotent assignment of clips to free slots

pub mod error;
pub mod schedule;
pub mod windows;

pub use error::{QueueError, QueueResult};
pub use schedule::ScheduleQueue;
pub use windows::{EngagementWindows, WindowCursor, DEFAULT_WINDOWS};
