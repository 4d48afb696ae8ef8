mod common;

use common::{nes, nes_with};
use emu_core::{Observable, Value};
use emu_nes::{NesError, StepMode};
use mos_6502::CpuError;
use ricoh_ppu_2c02::PpuError;

#[test]
fn oam_dma_stall_in_scaled_mode() {
    // LDA #$03 ; STA $4014
    let mut nes = nes_with(&[0xA9, 0x03, 0x8D, 0x14, 0x40], StepMode::Scaled, true);
    assert_eq!(nes.step().expect("LDA"), 2);
    assert_eq!(nes.step().expect("STA"), 4 + 513);
    assert_eq!(nes.cycles(), 519);
    // (2 + 517) * 3 = 1557 dots
    assert_eq!(nes.ppu().scanline(), 4);
    assert_eq!(nes.ppu().cycle(), 193);
}

#[test]
fn oam_dma_stall_parity() {
    // LDA #$03 ; NOP ; STA $4014: 4 + 4 cycles, even
    let mut nes = nes_with(&[0xA9, 0x03, 0xEA, 0x8D, 0x14, 0x40], StepMode::Scaled, true);
    nes.step().expect("LDA");
    nes.step().expect("NOP");
    assert_eq!(nes.step().expect("STA"), 517);

    // LDA #$03 ; LDX $00 ; STA $4014: 5 + 4 cycles, odd
    let mut nes = nes_with(&[0xA9, 0x03, 0xA6, 0x00, 0x8D, 0x14, 0x40], StepMode::Scaled, true);
    nes.step().expect("LDA");
    nes.step().expect("LDX");
    assert_eq!(nes.step().expect("STA"), 518);
}

#[test]
fn fixed_mode_runs_three_dots_per_step() {
    let mut nes = nes(&[0xA9, 0x03, 0x8D, 0x14, 0x40]);
    nes.step().expect("LDA");
    assert_eq!(nes.step().expect("STA"), 517);
    assert_eq!(nes.ppu().cycle(), 6);
}

#[test]
fn nmi_handler_runs_once_per_frame() {
    // $8000: LDA #$80 ; STA $2000 ; JMP $8005
    // $9000: INC $0200 ; RTI
    let rom = common::RomBuilder::new()
        .code(0x8000, &[0xA9, 0x80, 0x8D, 0x00, 0x20, 0x4C, 0x05, 0x80])
        .code(0x9000, &[0xEE, 0x00, 0x02, 0x40])
        .build();
    let config = emu_nes::NesConfig {
        rom_data: rom,
        step_mode: StepMode::Scaled,
        strict_registers: true,
    };
    let mut nes = emu_nes::Nes::new(&config).expect("ROM");
    for frame in 1..=3u8 {
        nes.run_frame().expect("frame");
        assert_eq!(nes.bus().peek(0x0200), frame);
    }
    assert_eq!(nes.frame_count(), 3);
}

#[test]
fn write_to_status_register_fails_the_step() {
    // LDA #$00 ; STA $2002
    let mut nes = nes(&[0xA9, 0x00, 0x8D, 0x02, 0x20]);
    nes.step().expect("LDA");
    let dot = nes.ppu().cycle();
    let err = nes.step().expect_err("STA $2002");
    assert!(matches!(
        err,
        NesError::Ppu(PpuError::InvalidRegisterAccess {
            address: 0x2002,
            write: true
        })
    ));
    assert_eq!(nes.ppu().cycle(), dot, "PPU does not advance on a fault");
}

#[test]
fn faulting_load_leaves_registers_untouched() {
    // LDA #$77 ; LDA $2000
    let mut nes = nes(&[0xA9, 0x77, 0xAD, 0x00, 0x20]);
    nes.step().expect("LDA #$77");
    let cpu_cycles = nes.cpu().total_cycles();

    nes.step().expect_err("LDA $2000");
    assert_eq!(nes.cpu().a(), 0x77);
    assert_eq!(nes.cpu().pc(), 0x8002);
    assert_eq!(nes.cycles(), 2);
    assert_eq!(nes.cpu().total_cycles(), cpu_cycles);
}

#[test]
fn faulting_read_modify_write_commits_nothing() {
    // INC $2000
    let mut nes = nes(&[0xEE, 0x00, 0x20]);
    nes.step().expect_err("INC $2000");
    assert_eq!(nes.ppu().ctrl().to_byte(), 0);
    assert_eq!(nes.cpu().pc(), 0x8000);

    // the same fault again: nothing was left pending
    nes.step().expect_err("INC $2000");
}

#[test]
fn read_of_write_only_mirror_reports_folded_address() {
    // LDA $3FF8
    let mut nes = nes(&[0xAD, 0xF8, 0x3F]);
    let err = nes.step().expect_err("LDA $3FF8");
    assert!(matches!(
        err,
        NesError::Ppu(PpuError::InvalidRegisterAccess {
            address: 0x2000,
            write: false
        })
    ));
}

#[test]
fn lenient_registers_return_open_bus() {
    // LDA #$5A ; STA $2003 ; LDA $2000 ; STA $2002
    let mut nes = nes_with(
        &[0xA9, 0x5A, 0x8D, 0x03, 0x20, 0xAD, 0x00, 0x20, 0x8D, 0x02, 0x20],
        StepMode::Fixed,
        false,
    );
    for _ in 0..4 {
        nes.step().expect("lenient step");
    }
    assert_eq!(nes.cpu().a(), 0x5A);
}

#[test]
fn unsupported_opcode_is_reported() {
    // NOP ; $02 (KIL)
    let mut nes = nes(&[0xEA, 0x02]);
    nes.step().expect("NOP");
    let err = nes.step().expect_err("KIL");
    assert!(matches!(
        err,
        NesError::Cpu(CpuError::UnsupportedOpcode {
            address: 0x8001,
            opcode: 0x02
        })
    ));
    assert_eq!(nes.cpu().pc(), 0x8001);
    assert!(err.to_string().contains("$02"), "{err}");
}

#[test]
fn frame_handoff_receives_completed_frames() {
    // JMP $8000
    let mut nes = nes_with(&[0x4C, 0x00, 0x80], StepMode::Scaled, true);
    let handoff = nes.frame_handoff();
    assert!(handoff.take().is_none());
    nes.run_frame().expect("frame");
    let frame = handoff.take().expect("published frame");
    assert_eq!(frame.number, 1);
    assert_eq!(frame.pixels.len(), 256 * 240);
    assert!(handoff.take().is_none(), "slot emptied");

    nes.run_frame().expect("frame");
    nes.run_frame().expect("frame");
    assert_eq!(handoff.take().expect("latest frame").number, 3);
}

#[test]
fn observes_nested_paths() {
    let mut nes = nes(&[0xA9, 0x42, 0x85, 0x10]);
    nes.step().expect("LDA");
    nes.step().expect("STA");
    assert_eq!(nes.query("cpu.a"), Some(Value::U8(0x42)));
    assert_eq!(nes.query("memory.$0010"), Some(Value::U8(0x42)));
    assert_eq!(nes.query("cycles"), Some(Value::U64(5)));
    assert_eq!(nes.query("unknown"), None);
}
