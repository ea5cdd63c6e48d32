//! Process-wide shared state: the anchor registry and survey progress.
//!
//! Each resource carries its own lock; the two are never locked together.

pub mod anchors;
pub mod progress;

pub use anchors::AnchorRegistry;
pub use progress::GridProgressTracker;
