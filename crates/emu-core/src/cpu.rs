//! CPU core trait.

use crate::Bus;

/// A CPU core that executes one instruction per step.
///
/// The bus is passed in rather than owned, so the same bus can route
/// accesses into other chips (the PPU register window, DMA) that live next
/// to the CPU in the owning machine.
pub trait Cpu {
    /// Register snapshot type.
    type Registers;
    /// Error raised when an instruction cannot be executed.
    type Error;

    /// Execute one instruction (or service a pending interrupt).
    ///
    /// Returns the number of CPU cycles consumed.
    fn step<B: Bus>(&mut self, bus: &mut B) -> Result<u32, Self::Error>;

    /// Signal reset: reload the program counter from the reset vector.
    fn reset<B: Bus>(&mut self, bus: &mut B);

    /// Assert the non-maskable interrupt line.
    ///
    /// The interrupt is serviced at the start of the next `step`.
    fn nmi(&mut self);

    /// Assert the maskable interrupt line.
    fn irq(&mut self);

    /// Current program counter.
    fn pc(&self) -> u16;

    /// Snapshot of all registers, without side effects.
    fn registers(&self) -> Self::Registers;
}
