//! Controller layer: UI events, error modeling, and command dispatch to the backend worker.

pub mod events;
pub mod orchestration;
