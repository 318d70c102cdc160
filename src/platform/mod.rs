//! Platform abstraction layer
//!
//! Host-facing plumbing that is not part of the simulation:
//! - Input events (keyboard, virtual joystick)
//! - Frame timing and the fixed enemy tick accumulator

pub mod clock;
pub mod input;

pub use clock::{FixedStep, FrameClock};
pub use input::{Joystick, Key, KeyboardState};
