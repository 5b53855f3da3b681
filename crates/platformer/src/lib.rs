//! Side-scrolling platformer simulation: a player, a companion that joins
//! after enough loot, follower pets, breakable boxes and a scroll to read.
//!
//! [`sim`] is the headless kernel; [`tuning`] holds its parameters.

pub mod sim;
pub mod tuning;

pub use sim::{FrameSnapshot, SimEvent, StepIntents, ViewportSize, World};
pub use tuning::{Tuning, TuningError, TUNING_ENV_VAR};
