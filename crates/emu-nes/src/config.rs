//! NES configuration.

/// How many PPU dots follow each CPU step.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StepMode {
    /// Three dots per instruction regardless of its cycle count.
    #[default]
    Fixed,
    /// Three dots per CPU cycle consumed, OAM DMA stall included.
    Scaled,
}

impl StepMode {
    /// PPU dots to run after a step that took `cpu_cycles`.
    #[must_use]
    pub const fn dots(self, cpu_cycles: u32) -> u32 {
        match self {
            Self::Fixed => 3,
            Self::Scaled => cpu_cycles * 3,
        }
    }
}

/// NES configuration.
#[derive(Debug, Clone)]
pub struct NesConfig {
    /// iNES file contents.
    pub rom_data: Vec<u8>,
    pub step_mode: StepMode,
    /// Fail the step on an invalid PPU register access. When false the
    /// access is logged and reads return the PPU's open-bus value.
    pub strict_registers: bool,
}

impl Default for NesConfig {
    fn default() -> Self {
        Self {
            rom_data: Vec::new(),
            step_mode: StepMode::default(),
            strict_registers: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = NesConfig::default();
        assert_eq!(config.step_mode, StepMode::Fixed);
        assert!(config.strict_registers);
        assert!(config.rom_data.is_empty());
    }

    #[test]
    fn dots_per_step() {
        assert_eq!(StepMode::Fixed.dots(7), 3);
        assert_eq!(StepMode::Scaled.dots(7), 21);
        assert_eq!(StepMode::Scaled.dots(517), 1551);
    }
}
