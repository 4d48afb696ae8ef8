//! Core traits shared by the NES chip crates.
//!
//! Components never hold handles to each other. Whatever a component needs
//! to reach (the bus for a CPU, the CPU's interrupt line for a PPU) is passed
//! in by the owner at call time.

mod bus;
mod cpu;
mod observable;

pub use bus::{Bus, SimpleBus};
pub use cpu::Cpu;
pub use observable::{Observable, Value};
