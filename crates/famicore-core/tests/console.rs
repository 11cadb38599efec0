//! End-to-end console tests over in-memory iNES images.
//!
//! Each test assembles a small NROM program by hand, boots the console and
//! observes the machine the way a host driver would: registers, RAM, PPU
//! state and the frame loop.

use famicore_core::{Console, ConsoleError, Status};

/// Build a 32 KiB NROM-256 image. `program` lands at $8000, the optional
/// NMI handler at $9000, and unused PRG is NOP-filled. Vectors: RESET ->
/// $8000, NMI -> $9000.
fn build_image(program: &[u8], nmi_handler: &[u8]) -> Vec<u8> {
    let mut prg = vec![0xEA; 32768];
    prg[..program.len()].copy_from_slice(program);
    prg[0x1000..0x1000 + nmi_handler.len()].copy_from_slice(nmi_handler);
    prg[0x7FFA] = 0x00;
    prg[0x7FFB] = 0x90;
    prg[0x7FFC] = 0x00;
    prg[0x7FFD] = 0x80;

    let mut data = vec![0x4E, 0x45, 0x53, 0x1A, 2, 0];
    data.resize(16, 0);
    data.extend_from_slice(&prg);
    data
}

fn boot(program: &[u8], nmi_handler: &[u8]) -> Console {
    let mut console = Console::new(&build_image(program, nmi_handler)).unwrap();
    console.reset();
    console
}

#[test]
fn reset_enters_at_the_vector() {
    let console = boot(&[], &[]);
    assert_eq!(console.cpu().pc, 0x8000);
    assert_eq!(console.cpu().sp, 0xFD);
    assert!(console.cpu().status.contains(Status::I));
}

#[test]
fn program_writes_ppu_memory_through_the_window() {
    // LDA #$21, STA $2006, LDA #$08, STA $2006, LDA #$5A, STA $2007
    let program = [
        0xA9, 0x21, 0x8D, 0x06, 0x20, //
        0xA9, 0x08, 0x8D, 0x06, 0x20, //
        0xA9, 0x5A, 0x8D, 0x07, 0x20, //
    ];
    let mut console = boot(&program, &[]);

    for _ in 0..6 {
        console.step().unwrap();
    }

    assert_eq!(console.ppu().peek_mem(0x2108), 0x5A);
    assert_eq!(console.ppu().vram_addr(), 0x2109);
}

#[test]
fn nmi_handler_runs_once_per_frame() {
    // Main: LDA #$80, STA $2000 (enable NMI), then spin: JMP $8005.
    let program = [
        0xA9, 0x80, 0x8D, 0x00, 0x20, //
        0x4C, 0x05, 0x80, //
    ];
    // Handler: INC $00, RTI.
    let handler = [0xE6, 0x00, 0x40];
    let mut console = boot(&program, &handler);

    // Frame 1 raises the first NMI at its end; every later frame both
    // services one and raises the next.
    for _ in 0..4 {
        console.run_frame().unwrap();
    }

    assert_eq!(console.peek_memory(0x0000), 3);
}

#[test]
fn nmi_stays_quiet_when_disabled() {
    let program = [0x4C, 0x00, 0x80]; // spin without touching PPUCTRL
    let handler = [0xE6, 0x00, 0x40];
    let mut console = boot(&program, &handler);

    for _ in 0..3 {
        console.run_frame().unwrap();
    }

    assert_eq!(console.peek_memory(0x0000), 0);
    assert!(console.ppu().in_vblank(), "flag still sets without NMI");
}

#[test]
fn program_reads_controller_serially() {
    // Strobe the latch, then shift all eight buttons into $10-$17.
    #[rustfmt::skip]
    let program = [
        0xA9, 0x01, 0x8D, 0x16, 0x40, // LDA #$01, STA $4016
        0xA9, 0x00, 0x8D, 0x16, 0x40, // LDA #$00, STA $4016
        0xAD, 0x16, 0x40, 0x85, 0x10, // LDA $4016, STA $10
        0xAD, 0x16, 0x40, 0x85, 0x11,
        0xAD, 0x16, 0x40, 0x85, 0x12,
        0xAD, 0x16, 0x40, 0x85, 0x13,
        0xAD, 0x16, 0x40, 0x85, 0x14,
        0xAD, 0x16, 0x40, 0x85, 0x15,
        0xAD, 0x16, 0x40, 0x85, 0x16,
        0xAD, 0x16, 0x40, 0x85, 0x17,
    ];
    let mut console = boot(&program, &[]);
    // A, Select, Down, Right.
    console.set_controller(0b1010_0101);

    for _ in 0..20 {
        console.step().unwrap();
    }

    let bits: Vec<u8> = (0..8).map(|i| console.peek_memory(0x10 + i)).collect();
    assert_eq!(bits, [1, 0, 1, 0, 0, 1, 0, 1]);
}

#[test]
fn vblank_flag_is_observable_between_frames() {
    let program = [0x4C, 0x00, 0x80]; // spin
    let mut console = boot(&program, &[]);

    console.run_frame().unwrap();
    assert!(console.ppu().in_vblank());

    // A $2002 read through the bus returns the flag and clears it, the
    // way pre-frame setup code observes vertical blank.
    let status = famicore_core::Bus::read(console.bus_mut(), 0x2002);
    assert_eq!(status & 0x80, 0x80);
    assert!(!console.ppu().in_vblank());

    // The next frame sets it again.
    console.run_frame().unwrap();
    assert!(console.ppu().in_vblank());
}

#[test]
fn chr_rom_lands_in_pattern_tables() {
    let mut data = vec![0x4E, 0x45, 0x53, 0x1A, 1, 1];
    data.resize(16, 0);
    let mut prg = vec![0xEA; 16384];
    prg[0x3FFC] = 0x00;
    prg[0x3FFD] = 0x80;
    data.extend_from_slice(&prg);
    data.extend_from_slice(&vec![0xA7; 8192]);

    let console = Console::new(&data).unwrap();

    assert_eq!(console.ppu().peek_mem(0x0000), 0xA7);
    assert_eq!(console.ppu().peek_mem(0x1FFF), 0xA7);
    assert_eq!(console.ppu().peek_mem(0x2000), 0x00);
}

#[test]
fn sixteen_kib_image_mirrors_vectors() {
    // NROM-128: the reset vector lives in the mirrored upper half.
    let mut data = vec![0x4E, 0x45, 0x53, 0x1A, 1, 0];
    data.resize(16, 0);
    let mut prg = vec![0xEA; 16384];
    prg[0x3FFC] = 0x34;
    prg[0x3FFD] = 0x82;
    data.extend_from_slice(&prg);

    let mut console = Console::new(&data).unwrap();
    console.reset();

    assert_eq!(console.cpu().pc, 0x8234);
    assert_eq!(console.peek_memory(0x8000), console.peek_memory(0xC000));
}

#[test]
fn undefined_opcode_surfaces_through_the_console() {
    let program = [0x02]; // undocumented
    let mut console = boot(&program, &[]);

    let err = console.step().unwrap_err();
    match err {
        ConsoleError::Cpu(cpu_err) => {
            assert_eq!(cpu_err.to_string(), "undefined opcode $02 at $8000");
        }
        ConsoleError::Rom(_) => panic!("expected a CPU error"),
    }
}

#[test]
fn oam_dma_feeds_sprite_page_from_ram() {
    // Fill $0200-$02FF via X-indexed stores, then trigger DMA:
    //   LDX #$00
    // loop: TXA, STA $0200,X, INX, BNE loop
    //   LDA #$02, STA $4014
    #[rustfmt::skip]
    let program = [
        0xA2, 0x00,             // LDX #$00
        0x8A,                   // TXA
        0x9D, 0x00, 0x02,       // STA $0200,X
        0xE8,                   // INX
        0xD0, 0xFA,             // BNE loop
        0xA9, 0x02, 0x8D, 0x14, 0x40, // LDA #$02, STA $4014
    ];
    let mut console = boot(&program, &[]);

    // 1 + 256 * 4 + 2 instructions, generously.
    for _ in 0..1100 {
        console.step().unwrap();
    }

    assert_eq!(console.ppu().oam()[0x00], 0x00);
    assert_eq!(console.ppu().oam()[0x42], 0x42);
    assert_eq!(console.ppu().oam()[0xFF], 0xFF);
}
