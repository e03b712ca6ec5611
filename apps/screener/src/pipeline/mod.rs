// Screening pipeline: the staged engine that drives one application from
// upload to notification, plus the HTTP handlers that start runs.
// Collaborators are injected as trait objects so the engine stays free of I/O.

pub mod engine;
pub mod handlers;
pub mod state;

#[cfg(test)]
pub mod testing;

pub use engine::Pipeline;
pub use state::{RunState, ScreeningInput, Stage};
