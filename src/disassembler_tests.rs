#[cfg(test)]
mod tests {
    use crate::config::{AddressRange, Console, Options};
    use crate::disassembler::Disassembler;
    use crate::image::RomImage;
    use test_log::test;

    /// 4K 2600 image: program at the window base, start vector pointing at
    /// `start`, everything else zero.
    fn rom_4k(program: &[u8], start: u16) -> Vec<u8> {
        let mut bytes = vec![0u8; 4096];
        bytes[..program.len()].copy_from_slice(program);
        bytes[0xffc] = (start & 0xff) as u8;
        bytes[0xffd] = (start >> 8) as u8;
        bytes
    }

    fn run(bytes: Vec<u8>, options: Options) -> String {
        let image = RomImage::load(bytes, options.console).unwrap();
        Disassembler::new(&image, options).run()
    }

    #[test]
    fn start_banner_labels_and_register_names() {
        // LDA #$02 / STA WSYNC / JMP $F000
        let rom = rom_4k(&[0xa9, 0x02, 0x85, 0x02, 0x4c, 0x00, 0xf0], 0xf000);
        let out = run(rom, Options::default());

        assert!(out.contains("\nSTART:\n"));
        // The JMP references $F000, so the first line carries a label.
        assert!(out.contains("LF000: LDA    #$02"));
        assert!(out.contains("STA    WSYNC"));
        assert!(out.contains("JMP    LF000"));
        // Only the touched register gets an equate.
        assert!(out.contains("WSYNC   =  $02\n"));
        assert!(!out.contains("VSYNC"));
        assert!(out.contains("       ORG $F000\n"));
    }

    #[test]
    fn unreachable_bytes_render_as_data_runs() {
        let rom = rom_4k(&[0xa9, 0x02, 0x4c, 0x00, 0xf0], 0xf000);
        let out = run(rom, Options::default());

        // The byte after the JMP starts a data run.
        assert!(out.contains("LF005: .byte $00,$00"));
        // Long runs wrap to unlabeled continuation lines of sixteen bytes.
        assert!(out.contains("\n       .byte $00,$00"));
    }

    #[test]
    fn discrimination_off_decodes_everything_as_code() {
        let rom = rom_4k(&[0xa9, 0x02, 0x4c, 0x00, 0xf0], 0xf000);
        let mut options = Options::default();
        options.discriminate = false;
        let out = run(rom, options);

        assert!(!out.contains(".byte $00,"));
        // The zero filler decodes as BRK instructions.
        assert!(out.contains("BRK"));
    }

    #[test]
    fn conditional_branches_open_new_traces() {
        // LDX #$00 / BNE $F006 / RTS / <dead byte> / LDA #$01 / RTS
        let rom = rom_4k(
            &[0xa2, 0x00, 0xd0, 0x02, 0x60, 0x00, 0xa9, 0x01, 0x60],
            0xf000,
        );
        let out = run(rom, Options::default());

        assert!(out.contains("BNE    LF006"));
        // The branch target was traced as code and labeled.
        assert!(out.contains("LF006: LDA    #$01"));
        // The byte the branch skipped stays data.
        assert!(out.contains("LF005: .byte $00\n"));
    }

    #[test]
    fn jmp_into_a_mirror_relocates_and_traces() {
        // JMP $1234 aliases $F234 on a 4K cart.
        let mut program = vec![0u8; 0x235];
        program[0] = 0x4c;
        program[1] = 0x34;
        program[2] = 0x12;
        program[0x234] = 0x60;
        let rom = rom_4k(&program, 0xf000);
        let mut options = Options::default();
        options.relocate_mirrors = true;
        let out = run(rom, options);

        assert!(out.contains("JMP    LF234"));
        assert!(out.contains("LF234: RTS"));
    }

    #[test]
    fn mirror_rendering_without_relocation_keeps_raw_hex() {
        let mut program = vec![0u8; 0x235];
        program[0] = 0x4c;
        program[1] = 0x34;
        program[2] = 0x12;
        program[0x234] = 0x60;
        let rom = rom_4k(&program, 0xf000);
        let out = run(rom, Options::default());

        // Still traced through the mirror, but rendered as written.
        assert!(out.contains("JMP    $1234"));
        assert!(out.contains("LF234: RTS"));
    }

    #[test]
    fn mirror_floor_is_exclusive() {
        // $1000 itself is not a mirror on the 2600; the operand stays raw
        // and no label lands on the window base.
        let rom = rom_4k(&[0x4c, 0x00, 0x10], 0xf000);
        let out = run(rom, Options::default());

        assert!(out.contains("JMP    $1000"));
        assert!(!out.contains("LF000"));
    }

    #[test]
    fn referenced_mid_instruction_addresses_get_equates() {
        // LDA $F001 references the middle of its own operand.
        let rom = rom_4k(&[0xad, 0x01, 0xf0, 0x60], 0xf000);
        let out = run(rom, Options::default());

        assert!(out.contains("LF001   =   $F001\n"));
        assert!(out.contains("LDA    $F001"));
    }

    #[test]
    fn undocumented_opcodes_render_as_commented_bytes() {
        let rom = rom_4k(&[0x02, 0x60], 0xf000);
        let mut options = Options::default();
        options.discriminate = false;
        let out = run(rom, options);

        assert!(out.contains(".byte $02 ;.JAM"));
    }

    #[test]
    fn graphics_ranges_render_bit_pictures() {
        let mut program = vec![0u8; 0x502];
        program[0] = 0x60;
        program[0x500] = 0xaa;
        program[0x501] = 0xf0;
        let rom = rom_4k(&program, 0xf000);
        let mut options = Options::default();
        options.gfx_ranges.push(AddressRange {
            start: 0xf500,
            end: 0xf501,
        });
        let out = run(rom, options);

        assert!(out.contains(".byte $AA ; |X X X X | $F500"));
        assert!(out.contains(".byte $F0 ; |XXXX    | $F501"));
    }

    #[test]
    fn configured_data_ranges_stay_data() {
        let rom = rom_4k(&[0x60], 0xf000);
        let mut options = Options::default();
        options.discriminate = false;
        options.data_ranges.push(AddressRange {
            start: 0xf010,
            end: 0xf011,
        });
        let out = run(rom, options);

        // Even without the reachability sweep the pre-marked range renders
        // as data.
        assert!(out.contains("LF010: .byte $00,$00\n"));
    }

    #[test]
    fn cycle_counts_follow_the_operand_column() {
        let rom = rom_4k(&[0xa9, 0x02, 0x60], 0xf000);
        let mut options = Options::default();
        options.cycle_counts = true;
        let out = run(rom, options);

        assert!(out.contains("LDA    #$02    ;2\n"));
        assert!(out.contains("RTS            ;6\n"));
    }

    #[test]
    fn word_prefix_marks_absolute_operands_below_0x100() {
        let rom = rom_4k(&[0xad, 0x82, 0x00, 0x60], 0xf000);
        let mut options = Options::default();
        options.word_prefixes = true;
        let out = run(rom, options);

        // LDA $0082 must not reassemble as zero-page.
        assert!(out.contains("LDA.w  $0082"));
    }

    #[test]
    fn accumulator_operand_can_be_suppressed() {
        let rom = rom_4k(&[0x0a, 0x60], 0xf000);
        let out = run(rom.clone(), Options::default());
        assert!(out.contains("ASL    A"));

        let mut options = Options::default();
        options.accumulator_text = false;
        let out = run(rom, options);
        assert!(!out.contains("ASL    A"));
        assert!(out.contains("ASL"));
    }

    #[test]
    fn truncated_absolute_at_window_edge_flushes_bytes() {
        // Start vector points at $FFFE; the LDA there has no room for its
        // operand.
        let mut bytes = vec![0u8; 4096];
        bytes[0xffc] = 0xfe;
        bytes[0xffd] = 0xff;
        bytes[0xffe] = 0xad;
        bytes[0xfff] = 0x99;
        let out = run(bytes, Options::default());

        assert!(out.contains("       .byte $AD\n       .byte $99\n"));
        assert!(!out.contains("LDA"));
    }

    #[test]
    fn truncated_immediate_at_window_edge_flushes_opcode() {
        let mut bytes = vec![0u8; 4096];
        bytes[0xffc] = 0xff;
        bytes[0xffd] = 0xff;
        bytes[0xfff] = 0xa9;
        let out = run(bytes, Options::default());

        assert!(out.contains("       .byte $A9\n"));
        assert!(!out.contains("LDA"));
    }

    #[test]
    fn brk_vector_traced_on_request() {
        let mut bytes = vec![0u8; 4096];
        bytes[0] = 0x60; // START: RTS
        bytes[0x100] = 0x60; // BRK routine: RTS
        bytes[0xffc] = 0x00;
        bytes[0xffd] = 0xf0;
        bytes[0xffe] = 0x00;
        bytes[0xfff] = 0xf1;

        let out = run(bytes.clone(), Options::default());
        assert!(!out.contains("BRK_ROUTINE"));

        let mut options = Options::default();
        options.trace_brk = true;
        let out = run(bytes, options);
        assert!(out.contains("\nBRK_ROUTINE:\n"));
        assert!(out.contains("LF100: RTS"));
    }

    #[test]
    fn pokey_registers_resolve_on_7800() {
        // 16K 7800 image at $C000: LDA $4000 / RTS.
        let mut bytes = vec![0u8; 16384];
        bytes[0] = 0xad;
        bytes[1] = 0x00;
        bytes[2] = 0x40;
        bytes[3] = 0x60;
        bytes[0x3ffc] = 0x00;
        bytes[0x3ffd] = 0xc0;
        let mut options = Options::new(Console::Atari7800);
        options.pokey = true;
        let out = run(bytes, options);

        assert!(out.contains("LDA    AUDF2"));
        assert!(out.contains("AUDF2   =  $4000\n"));
    }

    /// Headered 16K 7800 image at $C000: LDA $4000 / RTS, with the given
    /// capability byte.
    fn rom_16k_headered(capability: u8) -> Vec<u8> {
        let mut bytes = vec![0u8; 16512];
        bytes[100..128].copy_from_slice(b"ACTUAL CART DATA STARTS HERE");
        bytes[54] = capability;
        bytes[128] = 0xad;
        bytes[129] = 0x00;
        bytes[130] = 0x40;
        bytes[131] = 0x60;
        bytes[128 + 0x3ffc] = 0x00;
        bytes[128 + 0x3ffd] = 0xc0;
        bytes
    }

    #[test]
    fn header_capability_byte_overrides_pokey_request() {
        // Bit 0 clear: not a POKEY cart, no matter what the caller asked.
        let mut options = Options::new(Console::Atari7800);
        options.pokey = true;
        let out = run(rom_16k_headered(0xfe), options);

        assert!(out.contains("LDA    $4000"));
        assert!(!out.contains("AUDF2"));
    }

    #[test]
    fn header_capability_byte_enables_pokey_names() {
        let out = run(rom_16k_headered(0x01), Options::new(Console::Atari7800));

        assert!(out.contains("LDA    AUDF2"));
        assert!(out.contains("AUDF2   =  $4000\n"));
    }

    #[test]
    fn forty_eight_k_images_never_use_pokey_names() {
        // On a 48K cart $4000 is the window base, so a $4000 operand is
        // code, not a POKEY register, even with the options forced on.
        let mut bytes = vec![0u8; 49152];
        bytes[0] = 0xad; // LDA $4000
        bytes[1] = 0x00;
        bytes[2] = 0x40;
        bytes[3] = 0x60;
        bytes[0xbffc] = 0x00;
        bytes[0xbffd] = 0x40;
        let mut options = Options::new(Console::Atari7800);
        options.pokey = true;
        options.relocate_mirrors = true;
        let out = run(bytes, options);

        assert!(out.contains("       ORG $4000\n"));
        assert!(out.contains("L4000: LDA    L4000"));
        assert!(!out.contains("AUDF2"));
    }

    #[test]
    fn truncated_indirect_at_window_edge_flushes_bytes() {
        // LDA (zp,X) at $FFFE has no room for its operand byte.
        let mut bytes = vec![0u8; 4096];
        bytes[0xffc] = 0xfe;
        bytes[0xffd] = 0xff;
        bytes[0xffe] = 0xa1;
        bytes[0xfff] = 0x7f;
        let out = run(bytes, Options::default());

        assert!(out.contains("       .byte $A1\n       .byte $7F\n"));
        assert!(!out.contains("LDA"));
    }

    #[test]
    fn interrupt_vector_traced_on_7800() {
        let mut bytes = vec![0u8; 16384];
        bytes[0] = 0x60;
        bytes[0x200] = 0x40; // ISR: RTI
        bytes[0x3ffa] = 0x00; // isr vector $C200
        bytes[0x3ffb] = 0xc2;
        bytes[0x3ffc] = 0x00; // start vector $C000
        bytes[0x3ffd] = 0xc0;
        let mut options = Options::new(Console::Atari7800);
        options.trace_interrupt = true;
        let out = run(bytes, options);

        assert!(out.contains("\nINTERRUPT_ROUTINE:\n"));
        assert!(out.contains("LC200: RTI"));
    }

    #[test]
    fn rts_gets_a_blank_separator_line() {
        let rom = rom_4k(&[0xa9, 0x01, 0x60], 0xf000);
        let out = run(rom, Options::default());
        let rts_at = out.find("RTS").unwrap();
        assert!(out[rts_at..].contains("\n\n"));
    }
}
