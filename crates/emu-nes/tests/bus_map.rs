mod common;

use common::nes;
use emu_core::Bus;

#[test]
fn work_ram_mirrors_every_2k() {
    let mut nes = nes(&[]);
    let bus = nes.bus_mut();
    for address in 0..0x0800u16 {
        bus.write(address, (address as u8) ^ 0x5A);
    }
    for address in 0..0x2000u16 {
        assert_eq!(
            bus.read(address),
            ((address & 0x07FF) as u8) ^ 0x5A,
            "${address:04X}"
        );
    }
}

#[test]
fn ppu_registers_mirror_every_8_bytes() {
    let mut nes = nes(&[]);
    for k in 0..1024u16 {
        let value = k as u8;
        nes.bus_mut().write(0x2000 + 8 * k, value);
        assert_eq!(nes.ppu().ctrl().to_byte(), value, "mirror {k}");
    }
}

#[test]
fn cartridge_space_reads_prg() {
    let mut nes = nes(&[0xA9, 0x42]);
    assert_eq!(nes.bus_mut().read(0x8000), 0xA9);
    assert_eq!(nes.bus_mut().read(0x8001), 0x42);
    assert_eq!(nes.bus_mut().read(0xFFFC), 0x00);
    assert_eq!(nes.bus_mut().read(0xFFFD), 0x80);
}

#[test]
fn prg_ram_is_writable() {
    let mut nes = nes(&[]);
    nes.bus_mut().write(0x6000, 0x77);
    assert_eq!(nes.bus_mut().read(0x6000), 0x77);
}

#[test]
fn oam_dma_copies_page_with_wrap() {
    let mut nes = nes(&[]);
    let bus = nes.bus_mut();
    for i in 0..256u16 {
        bus.write(0x0200 + i, i as u8);
    }
    bus.write(0x2003, 0x10);
    bus.write(0x4014, 0x02);
    assert!(bus.take_oam_dma());
    assert!(!bus.take_oam_dma(), "flag consumed");
    let oam = nes.ppu().oam();
    assert_eq!(oam[0x10], 0x00);
    assert_eq!(oam[0xFF], 0xEF);
    assert_eq!(oam[0x00], 0xF0);
    assert_eq!(oam[0x0F], 0xFF);
}
