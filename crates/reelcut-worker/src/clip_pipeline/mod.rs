//! Per-segment clip processing.
//!
//! A segment flows through [`boundary::reconcile`], the external cut,
//! classification, [`moderation::moderate`] and optional remediation before
//! its record is appended to the store.

pub mod boundary;
pub mod clip;
pub mod metadata;
pub mod moderation;
pub mod segment;

pub use boundary::reconcile;
pub use clip::{combination_order, process_segment, SegmentOutcome, VideoContext};
pub use metadata::{classify_emotion, extract_keywords};
pub use moderation::moderate;
pub use segment::validate_segments;
