//! Simulation module
//!
//! All animation logic lives here. This module has no rendering or platform
//! dependencies:
//! - One step per animation frame, unit time step
//! - Seeded RNG only
//! - Side effects leave through `BounceSink`

pub mod arc;
pub mod collision;
pub mod state;
pub mod tick;

pub use arc::Opening;
pub use collision::{BallEvent, advance, reflect_velocity};
pub use state::{Ball, BallColor, Boundary, SimState};
pub use tick::{BounceSink, DriverState, FrameReport, Session, run_frame_step};
