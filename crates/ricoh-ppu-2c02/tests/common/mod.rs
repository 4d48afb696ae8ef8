#![allow(dead_code)]

use emu_core::{Bus, Cpu};
use ricoh_ppu_2c02::{Mirroring, Ppu, PpuMemory};

/// 8 KB of CHR RAM with a fixed mirroring mode.
pub struct ChrRam {
    pub data: Vec<u8>,
    pub mirroring: Mirroring,
}

impl ChrRam {
    pub fn new(mirroring: Mirroring) -> Self {
        Self {
            data: vec![0; 0x2000],
            mirroring,
        }
    }
}

impl PpuMemory for ChrRam {
    fn chr_read(&mut self, address: u16) -> u8 {
        self.data[usize::from(address & 0x1FFF)]
    }

    fn chr_write(&mut self, address: u16, value: u8) {
        self.data[usize::from(address & 0x1FFF)] = value;
    }

    fn mirroring(&self) -> Mirroring {
        self.mirroring
    }
}

/// Counts NMI assertions from the PPU.
#[derive(Default)]
pub struct NmiCounter {
    pub nmis: u32,
}

impl Cpu for NmiCounter {
    type Registers = ();
    type Error = std::convert::Infallible;

    fn step<B: Bus>(&mut self, _bus: &mut B) -> Result<u32, Self::Error> {
        Ok(1)
    }

    fn reset<B: Bus>(&mut self, _bus: &mut B) {}

    fn nmi(&mut self) {
        self.nmis += 1;
    }

    fn irq(&mut self) {}

    fn pc(&self) -> u16 {
        0
    }

    fn registers(&self) {}
}

pub fn write(ppu: &mut Ppu, mem: &mut ChrRam, address: u16, value: u8) {
    ppu.write_register(address, value, mem)
        .expect("register should be writable");
}

pub fn read(ppu: &mut Ppu, mem: &mut ChrRam, address: u16) -> u8 {
    ppu.read_register(address, mem)
        .expect("register should be readable")
}

/// Point `v` at `address` through $2006.
pub fn set_address(ppu: &mut Ppu, mem: &mut ChrRam, address: u16) {
    write(ppu, mem, 0x2006, (address >> 8) as u8);
    write(ppu, mem, 0x2006, address as u8);
}

/// Tick until the PPU sits at (`scanline`, `cycle`).
pub fn run_to(ppu: &mut Ppu, mem: &mut ChrRam, cpu: &mut NmiCounter, scanline: u16, cycle: u16) {
    for _ in 0..(341 * 262) {
        if ppu.scanline() == scanline && ppu.cycle() == cycle {
            return;
        }
        ppu.tick(mem, cpu);
    }
    panic!("never reached scanline {scanline} cycle {cycle}");
}
