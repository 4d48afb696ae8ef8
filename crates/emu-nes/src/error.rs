use mos_6502::CpuError;
use nes_cartridge::CartridgeError;
use ricoh_ppu_2c02::PpuError;
use thiserror::Error;

/// Anything that can stop the machine.
#[derive(Debug, Error)]
pub enum NesError {
    #[error(transparent)]
    Cpu(#[from] CpuError),
    #[error(transparent)]
    Ppu(#[from] PpuError),
    #[error(transparent)]
    Cartridge(#[from] CartridgeError),
}
