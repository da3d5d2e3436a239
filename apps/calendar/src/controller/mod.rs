//! Controller layer: UI events, reducer state transitions, merge rules and command orchestration.

pub mod events;
pub mod merge;
pub mod orchestration;
pub mod reducer;
