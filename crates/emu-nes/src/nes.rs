//! Top-level NES system.
//!
//! `Nes` owns the CPU and the bus; the bus owns the PPU and the cartridge.
//! Each `step` runs one CPU instruction (or interrupt entry) and then the
//! PPU dots that belong to it, so NMI raised by the PPU is taken at the
//! start of the following step.

use emu_core::{Cpu, Observable, Value};
use log::debug;
use mos_6502::Mos6502;
use nes_cartridge::{Mapper, parse_ines};
use ricoh_ppu_2c02::{DOTS_PER_SCANLINE, Ppu, SCANLINES_PER_FRAME};

use crate::bus::NesBus;
use crate::config::{NesConfig, StepMode};
use crate::error::NesError;
use crate::frame::FrameHandoff;

/// CPU cycles the 2A03 is halted for by OAM DMA, plus one when the
/// transfer starts on an odd cycle.
const OAM_DMA_CYCLES: u32 = 513;

/// NES system.
pub struct Nes {
    cpu: Mos6502,
    bus: NesBus,
    step_mode: StepMode,
    /// CPU cycles consumed by `step` since power-up.
    cycles: u64,
    /// Completed frame counter.
    frame_count: u64,
    handoff: Option<FrameHandoff>,
}

impl Nes {
    /// Create a new NES from the given configuration and power it up.
    ///
    /// # Errors
    ///
    /// Returns an error if the ROM data is invalid or needs a mapper other
    /// than NROM.
    pub fn new(config: &NesConfig) -> Result<Self, NesError> {
        let mapper = parse_ines(&config.rom_data)?;
        Ok(Self::from_mapper(mapper, config.step_mode, config.strict_registers))
    }

    /// Create a new NES around an already-built cartridge and power it up.
    #[must_use]
    pub fn from_mapper(mapper: Box<dyn Mapper>, step_mode: StepMode, strict_registers: bool) -> Self {
        let mut nes = Self {
            cpu: Mos6502::new_2a03(),
            bus: NesBus::new(mapper, strict_registers),
            step_mode,
            cycles: 0,
            frame_count: 0,
            handoff: None,
        };
        nes.power_up();
        nes
    }

    /// One CPU step followed by its PPU dots. Returns the CPU cycles
    /// consumed, including any OAM DMA stall.
    ///
    /// # Errors
    ///
    /// An unsupported opcode, or (with strict registers) an invalid PPU
    /// register access made by the instruction. A failed step leaves the
    /// CPU at the faulting instruction and the PPU where it was.
    pub fn step(&mut self) -> Result<u32, NesError> {
        let before = self.cpu.clone();
        let mut cycles = self.cpu.step(&mut self.bus)?;
        if let Some(fault) = self.bus.take_fault() {
            // Registers and cycle count roll back to the previous boundary.
            self.cpu = before;
            return Err(fault.into());
        }

        if self.bus.take_oam_dma() {
            let start = self.cycles + u64::from(cycles);
            cycles += OAM_DMA_CYCLES + u32::from(start % 2 == 1);
        }

        for _ in 0..self.step_mode.dots(cycles) {
            self.bus.tick_ppu(&mut self.cpu);
            if self.bus.ppu.scanline() == 0 && self.bus.ppu.cycle() == 0 {
                self.end_frame();
            }
        }

        self.cycles += u64::from(cycles);
        Ok(cycles)
    }

    fn end_frame(&mut self) {
        self.frame_count += 1;
        debug!("frame {} complete at CPU cycle {}", self.frame_count, self.cycles);
        if let Some(handoff) = &self.handoff {
            handoff.publish(self.frame_count, self.bus.ppu.framebuffer());
        }
    }

    /// Step until the PPU finishes a frame, then consume the frame-complete
    /// latch. Returns the CPU cycles consumed.
    ///
    /// # Errors
    ///
    /// The first failing step.
    pub fn run_frame(&mut self) -> Result<u64, NesError> {
        let start = self.cycles;
        while !self.bus.ppu.frame_complete() {
            self.step()?;
        }
        self.bus.ppu.clear_frame_complete();
        Ok(self.cycles - start)
    }

    /// Assert the CPU reset line: PC is loaded from the reset vector.
    pub fn power_up(&mut self) {
        self.cpu.reset(&mut self.bus);
        debug!("NES power-up, PC=${:04X}", self.cpu.pc());
    }

    /// Return CPU, PPU and bus to their power-up state without running the
    /// reset sequence.
    pub fn clear(&mut self) {
        self.cpu.clear();
        self.bus.clear();
        self.bus.ppu.clear();
        self.cycles = 0;
        self.frame_count = 0;
    }

    /// `clear` followed by `power_up`.
    pub fn reset(&mut self) {
        self.clear();
        self.power_up();
    }

    #[must_use]
    pub fn frame_complete(&self) -> bool {
        self.bus.ppu.frame_complete()
    }

    pub fn clear_frame_complete(&mut self) {
        self.bus.ppu.clear_frame_complete();
    }

    /// Read and clear the frame-complete latch.
    pub fn take_frame_complete(&mut self) -> bool {
        let complete = self.bus.ppu.frame_complete();
        self.bus.ppu.clear_frame_complete();
        complete
    }

    /// Handle that receives a copy of every completed frame from now on.
    pub fn frame_handoff(&mut self) -> FrameHandoff {
        self.handoff.get_or_insert_with(FrameHandoff::new).clone()
    }

    /// Reference to the framebuffer (`0x00RRGGBB`, 256x240).
    #[must_use]
    pub fn framebuffer(&self) -> &[u32] {
        self.bus.ppu.framebuffer()
    }

    #[must_use]
    pub fn cpu(&self) -> &Mos6502 {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut Mos6502 {
        &mut self.cpu
    }

    #[must_use]
    pub fn ppu(&self) -> &Ppu {
        &self.bus.ppu
    }

    #[must_use]
    pub fn bus(&self) -> &NesBus {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut NesBus {
        &mut self.bus
    }

    #[must_use]
    pub fn step_mode(&self) -> StepMode {
        self.step_mode
    }

    /// CPU cycles consumed by `step` since power-up.
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Completed frame count.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// PPU dots in one frame.
    #[must_use]
    pub const fn dots_per_frame() -> u32 {
        DOTS_PER_SCANLINE as u32 * SCANLINES_PER_FRAME as u32
    }
}

/// Parse `0x1234`, `$1234` or decimal.
fn parse_address(text: &str) -> Option<u16> {
    if let Some(hex) = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .or_else(|| text.strip_prefix('$'))
    {
        u16::from_str_radix(hex, 16).ok()
    } else {
        text.parse().ok()
    }
}

impl Observable for Nes {
    fn query(&self, path: &str) -> Option<Value> {
        if let Some(rest) = path.strip_prefix("cpu.") {
            self.cpu.query(rest)
        } else if let Some(rest) = path.strip_prefix("ppu.") {
            self.bus.ppu.query(rest)
        } else if let Some(rest) = path.strip_prefix("memory.") {
            parse_address(rest).map(|address| Value::U8(self.bus.peek(address)))
        } else {
            match path {
                "cycles" => Some(self.cycles.into()),
                "frame_count" => Some(self.frame_count.into()),
                _ => None,
            }
        }
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "cpu.<6502_paths>",
            "ppu.<2c02_paths>",
            "memory.<address>",
            "cycles",
            "frame_count",
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nes_cartridge::Nrom;
    use ricoh_ppu_2c02::Mirroring;

    fn make_nes(step_mode: StepMode) -> Nes {
        // 32K PRG filled with NOPs, reset vector at $8000
        let mut prg = vec![0xEA; 32768];
        prg[0x7FFC] = 0x00;
        prg[0x7FFD] = 0x80;
        let chr = vec![0; 8192];
        let mapper = Box::new(Nrom::new(prg, chr, Mirroring::Horizontal));
        Nes::from_mapper(mapper, step_mode, true)
    }

    #[test]
    fn power_up_reads_reset_vector() {
        let nes = make_nes(StepMode::Fixed);
        assert_eq!(nes.cpu().pc(), 0x8000);
        assert_eq!(nes.cpu().sp(), 0xFD);
        assert_eq!((nes.ppu().scanline(), nes.ppu().cycle()), (0, 0));
    }

    #[test]
    fn fixed_mode_runs_three_dots() {
        let mut nes = make_nes(StepMode::Fixed);
        assert_eq!(nes.step().expect("step"), 2);
        assert_eq!(nes.ppu().cycle(), 3);
        assert_eq!(nes.cycles(), 2);
    }

    #[test]
    fn scaled_mode_runs_three_dots_per_cycle() {
        let mut nes = make_nes(StepMode::Scaled);
        nes.step().expect("step");
        assert_eq!(nes.ppu().cycle(), 6);
    }

    #[test]
    fn run_frame_counts_frames() {
        let mut nes = make_nes(StepMode::Scaled);
        let cycles = nes.run_frame().expect("frame");
        // 89,342 dots / 3, rounded up to whole NOPs.
        assert!((29_780..=29_782).contains(&cycles), "{cycles}");
        assert_eq!(nes.frame_count(), 1);
        assert!(!nes.frame_complete(), "latch consumed");
    }

    #[test]
    fn observable_paths() {
        let mut nes = make_nes(StepMode::Fixed);
        nes.bus_mut().ram[0x10] = 0xAB;
        assert_eq!(nes.query("cpu.pc"), Some(Value::U16(0x8000)));
        assert_eq!(nes.query("memory.0x0010"), Some(Value::U8(0xAB)));
        assert_eq!(nes.query("memory.$0810"), Some(Value::U8(0xAB)));
        assert_eq!(nes.query("memory.16"), Some(Value::U8(0xAB)));
        assert_eq!(nes.query("ppu.scanline"), Some(Value::U16(0)));
        assert_eq!(nes.query("frame_count"), Some(Value::U64(0)));
        assert_eq!(nes.query("memory.zz"), None);
    }

    #[test]
    fn reset_returns_to_power_up_state() {
        let mut nes = make_nes(StepMode::Fixed);
        for _ in 0..100 {
            nes.step().expect("step");
        }
        nes.bus_mut().ram[0] = 0x55;
        nes.reset();
        assert_eq!(nes.cpu().pc(), 0x8000);
        assert_eq!(nes.cycles(), 0);
        assert_eq!(nes.bus().peek(0x0000), 0);
        assert_eq!(nes.ppu().cycle(), 0);
    }

    #[test]
    fn dots_per_frame() {
        assert_eq!(Nes::dots_per_frame(), 89_342);
    }
}
