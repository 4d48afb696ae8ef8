//! NES core.
//!
//! The CPU runs at crystal/12 and the PPU at crystal/4, so the PPU runs
//! three dots per CPU cycle. [`Nes::step`] executes one CPU instruction and
//! then advances the PPU; one frame is 341 dots x 262 scanlines.

mod bus;
mod config;
mod error;
mod frame;
mod nes;

pub use bus::NesBus;
pub use config::{NesConfig, StepMode};
pub use error::NesError;
pub use frame::{Frame, FrameHandoff};
pub use nes::Nes;
