//! Simulated dialog traffic generation.
//!
//! Synthesizes scripted multi-step dialogs and drives them through
//! the transcript middleware exactly as a live bot runtime would:
//! incoming user turns, outgoing bot replies, and occasional
//! update/delete interceptions.

mod driver;
mod script;

pub use driver::{run_simulation, SimulationConfig, SimulationStats, MIN_USERS};
pub use script::{dialog_catalog, DialogScript, StepScript};
