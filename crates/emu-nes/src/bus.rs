//! NES bus: CPU address routing.
//!
//! - `$0000-$1FFF`: 2 KB work RAM, mirrored every `$0800`
//! - `$2000-$3FFF`: PPU registers, mirrored every 8 bytes
//! - `$4000-$401F`: APU and I/O registers (stored, not emulated); `$4014`
//!   also starts OAM DMA
//! - `$4020-$FFFF`: cartridge

use emu_core::{Bus, Cpu};
use log::{debug, warn};
use nes_cartridge::Mapper;
use ricoh_ppu_2c02::{Ppu, PpuError};

const OAM_DMA: u16 = 0x4014;

/// The NES bus, implementing `emu_core::Bus`.
pub struct NesBus {
    /// 2K internal RAM ($0000-$07FF, mirrored to $1FFF).
    pub ram: [u8; 0x800],
    pub ppu: Ppu,
    pub cartridge: Box<dyn Mapper>,
    /// $4000-$401F as last written.
    io: [u8; 0x20],
    strict_registers: bool,
    /// First PPU register fault since the last `take_fault`.
    fault: Option<PpuError>,
    /// Set by a $4014 write, consumed by the orchestrator to add the stall.
    oam_dma_started: bool,
}

impl NesBus {
    #[must_use]
    pub fn new(cartridge: Box<dyn Mapper>, strict_registers: bool) -> Self {
        Self {
            ram: [0; 0x800],
            ppu: Ppu::new(),
            cartridge,
            io: [0; 0x20],
            strict_registers,
            fault: None,
            oam_dma_started: false,
        }
    }

    /// Zero work RAM and the I/O registers. The PPU and cartridge are left
    /// alone.
    pub fn clear(&mut self) {
        self.ram.fill(0);
        self.io.fill(0);
        self.fault = None;
        self.oam_dma_started = false;
    }

    /// Read without side effects (for observation).
    #[must_use]
    pub fn peek(&self, address: u16) -> u8 {
        match address {
            0x0000..=0x1FFF => self.ram[usize::from(address & 0x07FF)],
            0x2000..=0x3FFF => match address & 0x07 {
                2 => self.ppu.status().to_byte() | (self.ppu.open_bus() & 0x1F),
                4 => self.ppu.oam()[usize::from(self.ppu.oam_addr())],
                _ => self.ppu.open_bus(),
            },
            0x4000..=0x401F => self.io[usize::from(address & 0x1F)],
            0x4020..=0xFFFF => self.cartridge.cpu_read(address),
        }
    }

    /// Advance the PPU one dot, delivering NMI to `cpu`.
    pub fn tick_ppu<C: Cpu>(&mut self, cpu: &mut C) {
        self.ppu.tick(self.cartridge.as_mut(), cpu);
    }

    /// The register fault raised by the last accesses, if any.
    pub fn take_fault(&mut self) -> Option<PpuError> {
        self.fault.take()
    }

    /// Whether a $4014 write happened since the last call.
    pub fn take_oam_dma(&mut self) -> bool {
        std::mem::take(&mut self.oam_dma_started)
    }

    #[must_use]
    pub fn strict_registers(&self) -> bool {
        self.strict_registers
    }

    /// Record a register fault; returns the open-bus value for reads.
    fn register_fault(&mut self, error: PpuError) -> u8 {
        if self.strict_registers {
            self.fault.get_or_insert(error);
        } else {
            warn!("{error}");
        }
        self.ppu.open_bus()
    }

    /// Copy CPU page `page` into OAM.
    fn oam_dma(&mut self, page: u8) {
        debug!("OAM DMA from ${page:02X}00");
        let base = u16::from(page) << 8;
        let mut buffer = [0u8; 256];
        for (offset, byte) in (0u16..).zip(buffer.iter_mut()) {
            *byte = self.read(base | offset);
        }
        self.ppu.oam_dma(&buffer);
        self.oam_dma_started = true;
    }
}

impl Bus for NesBus {
    fn read(&mut self, address: u16) -> u8 {
        match address {
            0x0000..=0x1FFF => self.ram[usize::from(address & 0x07FF)],
            0x2000..=0x3FFF => match self.ppu.read_register(address, self.cartridge.as_mut()) {
                Ok(value) => value,
                Err(error) => self.register_fault(error),
            },
            0x4000..=0x401F => self.io[usize::from(address & 0x1F)],
            0x4020..=0xFFFF => self.cartridge.cpu_read(address),
        }
    }

    fn write(&mut self, address: u16, value: u8) {
        // A faulted instruction commits no further writes.
        if self.fault.is_some() {
            return;
        }
        match address {
            0x0000..=0x1FFF => self.ram[usize::from(address & 0x07FF)] = value,
            0x2000..=0x3FFF => {
                if let Err(error) =
                    self.ppu
                        .write_register(address, value, self.cartridge.as_mut())
                {
                    self.register_fault(error);
                }
            }
            0x4000..=0x401F => {
                self.io[usize::from(address & 0x1F)] = value;
                if address == OAM_DMA {
                    self.oam_dma(value);
                }
            }
            0x4020..=0xFFFF => self.cartridge.cpu_write(address, value),
        }
    }
}
