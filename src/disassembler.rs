//! The three-pass trace engine and text renderer.
//!
//! A run walks the window three times with the same decode loop:
//!
//! * Discover: drain the entry-point queue, following the statically known
//!   control transfers (conditional branches, `JMP`/`JSR` absolute) and
//!   marking every traced byte `REACHABLE`. A trace ends at `RTS`, `JMP`
//!   or `RTI`, or at the end of the window. Bytes never reached are then
//!   swept with the `DATA` flag.
//! * Classify: one linear walk that stamps `VALID_ENTRY` on the first byte
//!   of every decoded unit, so label placement and the orphaned-reference
//!   equates can be derived.
//! * Render: the same linear walk again, this time emitting text.
//!
//! Decoding is identical in all three passes, so the passes cannot disagree
//! about instruction boundaries.

use std::collections::VecDeque;
use std::fmt::Write as _;

use log::debug;

use crate::config::{Console, Options};
use crate::equates::{io_reg_name, system_reg_name, POKEY_REGS};
use crate::image::{AddressWindow, RomImage};
use crate::labels::{LabelFlags, LabelMap, MarkKind};
use crate::opcodes::{AddressMode, LOOKUP};

/// Which of the three passes the decode loop is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TraceMode {
    Discover,
    Classify,
    Render,
}

/// One disassembly run over a loaded image.
pub struct Disassembler<'a> {
    image: &'a RomImage,
    options: Options,
    window: AddressWindow,
    labels: LabelMap,
    queue: VecDeque<u16>,
    start_adr: u16,
    brk_adr: u16,
    isr_adr: u16,
    /// Window index of the next byte to decode.
    pc: usize,
    /// Absolute address of the last byte the current trace consumed.
    pcend: u16,
    output: String,
    nextline: String,
}

impl<'a> Disassembler<'a> {
    pub fn new(image: &'a RomImage, mut options: Options) -> Self {
        if image.header_present() {
            // The header's capability byte decides POKEY either way,
            // overriding whatever the caller asked for.
            options.pokey = image.pokey_capable();
        }
        let window = AddressWindow::for_image(image);
        if window.end == 0xbfff {
            // 48K images fill $4000-$FFFF: there is nothing left to mirror,
            // and the POKEY block would sit inside the code window.
            options.relocate_mirrors = false;
            options.pokey = false;
        }
        let labels = LabelMap::new(window, options.console, options.pokey);
        Disassembler {
            image,
            options,
            window,
            labels,
            queue: VecDeque::new(),
            start_adr: 0,
            brk_adr: 0,
            isr_adr: 0,
            pc: 0,
            pcend: 0,
            output: String::new(),
            nextline: String::new(),
        }
    }

    /// Runs all passes and returns the complete assembly listing.
    pub fn run(mut self) -> String {
        self.start_adr = self.image.start_vector();
        self.brk_adr = self.image.brk_vector();
        if self.options.console == Console::Atari7800 && self.options.trace_interrupt {
            self.isr_adr = self.image.interrupt_vector();
        }
        debug!(
            "start ${:04X}, brk ${:04X}, isr ${:04X}",
            self.start_adr, self.brk_adr, self.isr_adr
        );

        self.apply_configured_ranges();
        self.seed_entry_points();

        if self.options.discriminate {
            self.discover();
            // Whatever no trace reached is data.
            for k in 0..=self.window.end as usize {
                if !self.labels.has(k, LabelFlags::REACHABLE) {
                    self.labels
                        .mark(k as u16 + self.window.offset, LabelFlags::DATA);
                }
            }
        }

        self.trace(self.window.offset, TraceMode::Classify);

        let header = self.header();
        self.nextline.clear();
        self.trace(self.window.offset, TraceMode::Render);

        header + &self.output
    }

    /// Pre-marks the address ranges named in the config file so the trace
    /// passes treat them as data or graphics regardless of reachability.
    fn apply_configured_ranges(&mut self) {
        let data = self.options.data_ranges.clone();
        let gfx = self.options.gfx_ranges.clone();
        for range in data {
            for address in range.start..=range.end {
                self.labels.mark(address, LabelFlags::DATA);
            }
        }
        for range in gfx {
            for address in range.start..=range.end {
                self.labels.mark(address, LabelFlags::GFX);
            }
        }
    }

    fn seed_entry_points(&mut self) {
        self.queue.push_back(self.start_adr);
        if self.options.trace_brk {
            self.queue.push_back(self.brk_adr);
            self.labels.mark(self.brk_adr, LabelFlags::REFERENCED);
        }
        if self.options.console == Console::Atari7800 && self.options.trace_interrupt {
            self.queue.push_back(self.isr_adr);
            self.labels.mark(self.isr_adr, LabelFlags::REFERENCED);
        }
    }

    /// Drains the entry-point queue, tracing each entry and marking the
    /// consumed span reachable. Every enqueued target is marked `REACHABLE`
    /// up front, so each window byte enters the queue at most once and the
    /// drain terminates.
    fn discover(&mut self) {
        while let Some(entry) = self.queue.pop_front() {
            if !self.window.contains(entry) {
                debug!(
                    "entry point ${:04X} outside the code window, skipped",
                    entry
                );
                continue;
            }
            debug!("tracing from ${:04X}", entry);
            let pcbeg = entry;
            self.trace(entry, TraceMode::Discover);
            for k in pcbeg..=self.pcend {
                self.labels.mark(k, LabelFlags::REACHABLE);
            }
        }
    }

    /// The shared decode loop. Starts at an absolute in-window address and
    /// walks forward until the window ends or, in discovery, until the flow
    /// of control cannot continue past an instruction.
    fn trace(&mut self, distart: u16, mode: TraceMode) {
        let end = self.window.end as usize;
        self.pc = self.window.index_of(distart);
        while self.pc <= end {
            let here = self.pc as u16 + self.window.offset;
            if mode == TraceMode::Render {
                if here == self.start_adr {
                    self.output.push_str("\nSTART:\n");
                }
                if here == self.brk_adr && self.options.trace_brk {
                    self.output.push_str("\nBRK_ROUTINE:\n");
                }
                if here == self.isr_adr
                    && self.options.console == Console::Atari7800
                    && self.options.trace_interrupt
                {
                    self.output.push_str("\nINTERRUPT_ROUTINE:\n");
                }
            }

            if self.labels.has(self.pc, LabelFlags::GFX) {
                self.emit_gfx_byte(mode, here);
            } else if self.labels.has(self.pc, LabelFlags::DATA) {
                self.emit_data_run(mode, here, end);
            } else if self.trace_instruction(mode, here, end) {
                return;
            }
        }
        self.pcend = self.window.end + self.window.offset;
    }

    /// One graphics byte: `.byte` plus a pixel picture of the bit pattern.
    fn emit_gfx_byte(&mut self, mode: TraceMode, here: u16) {
        if mode == TraceMode::Classify {
            self.labels.insert(self.pc, LabelFlags::VALID_ENTRY);
        }
        if mode == TraceMode::Render {
            if self.labels.has(self.pc, LabelFlags::REFERENCED) {
                let _ = write!(self.output, "L{:04X}: ", here);
            } else {
                self.output.push_str("       ");
            }
            let byte = self.image.byte(self.pc);
            let _ = write!(self.output, ".byte ${:02X} ; ", byte);
            self.output.push('|');
            for bit in (0..8).rev() {
                self.output
                    .push(if byte & (1 << bit) != 0 { 'X' } else { ' ' });
            }
            self.output.push('|');
            let _ = writeln!(self.output, " ${:04X}", here);
        }
        self.pc += 1;
    }

    /// A data byte, aggregated when rendering into runs of up to sixteen
    /// `.byte` operands per line. A run breaks at a referenced or graphics
    /// byte so labels stay placeable.
    fn emit_data_run(&mut self, mode: TraceMode, here: u16, end: usize) {
        self.labels.insert(self.pc, LabelFlags::VALID_ENTRY);
        if mode == TraceMode::Render {
            let _ = write!(
                self.output,
                "L{:04X}: .byte ${:02X}",
                here,
                self.image.byte(self.pc)
            );
        }
        self.pc += 1;
        if mode != TraceMode::Render {
            return;
        }
        let mut bytes = 1;
        while self.pc <= end
            && self.labels.has(self.pc, LabelFlags::DATA)
            && !self.labels.has(self.pc, LabelFlags::REFERENCED)
            && !self.labels.has(self.pc, LabelFlags::GFX)
        {
            bytes += 1;
            if bytes == 17 {
                let _ = write!(
                    self.output,
                    "\n       .byte ${:02X}",
                    self.image.byte(self.pc)
                );
                bytes = 1;
            } else {
                let _ = write!(self.output, ",${:02X}", self.image.byte(self.pc));
            }
            self.pc += 1;
        }
        self.output.push('\n');
    }

    /// Decodes one instruction. Returns true when the current trace is
    /// finished: a terminator in discovery, or an instruction truncated by
    /// the end of the window.
    fn trace_instruction(&mut self, mode: TraceMode, here: u16, end: usize) -> bool {
        let op = self.image.byte(self.pc);
        let entry = LOOKUP[op as usize];

        if mode == TraceMode::Classify {
            self.labels.insert(self.pc, LabelFlags::VALID_ENTRY);
        }
        if mode == TraceMode::Render {
            if self.labels.has(self.pc, LabelFlags::REFERENCED) {
                let _ = write!(self.output, "L{:04X}: ", here);
            } else {
                self.output.push_str("       ");
            }
        }

        let mut amode = entry.mode;
        if self.options.dump_bytes && mode == TraceMode::Render {
            for i in 0..amode.length() {
                if self.pc + i <= end {
                    let _ = write!(self.output, "{:02X} ", self.image.byte(self.pc + i));
                }
            }
            self.output.push_str("  ");
        }

        self.pc += 1;

        // Undocumented opcodes render as data with the mnemonic in a
        // comment, and never consume operand bytes.
        if entry.is_undocumented() {
            amode = AddressMode::Implied;
            if mode == TraceMode::Render {
                let _ = write!(self.nextline, ".byte ${:02X} ;", op);
            }
        }

        let mut addbranch = false;
        match mode {
            TraceMode::Discover => addbranch = entry.source.is_control_transfer(),
            TraceMode::Render => self.nextline.push_str(entry.mnemonic),
            TraceMode::Classify => {}
        }

        // Operand truncated by the window edge: flush raw bytes instead of
        // decoding past the image.
        if self.pc >= end {
            match amode {
                AddressMode::Absolute
                | AddressMode::AbsoluteX
                | AddressMode::AbsoluteY
                | AddressMode::IndirectX
                | AddressMode::IndirectY
                | AddressMode::AbsIndirect => {
                    if mode == TraceMode::Render {
                        let _ = writeln!(self.output, ".byte ${:02X}", op);
                        if self.pc == end {
                            if self.labels.has(self.pc, LabelFlags::REFERENCED) {
                                let _ = write!(
                                    self.output,
                                    "L{:04X}: ",
                                    self.pc as u16 + self.window.offset
                                );
                            } else {
                                self.output.push_str("       ");
                            }
                            let last = self.image.byte(self.pc);
                            self.pc += 1;
                            let _ = writeln!(self.output, ".byte ${:02X}", last);
                        }
                        self.nextline.clear();
                    }
                    self.pcend = self.window.end + self.window.offset;
                    return true;
                }
                AddressMode::ZeroPage
                | AddressMode::Immediate
                | AddressMode::ZeroPageX
                | AddressMode::ZeroPageY
                | AddressMode::Relative
                    if self.pc > end =>
                {
                    if mode == TraceMode::Render {
                        self.nextline.clear();
                        let _ = write!(self.nextline, ".byte ${:02X}", op);
                        self.output.push_str(&self.nextline);
                        self.output.push('\n');
                        self.nextline.clear();
                    }
                    self.pc += 1;
                    self.pcend = self.window.end + self.window.offset;
                    return true;
                }
                _ => {}
            }
        }

        match amode {
            AddressMode::Implied => {}
            AddressMode::Accumulator => {
                if mode == TraceMode::Render && self.options.accumulator_text {
                    self.nextline.push_str("    A");
                }
            }
            AddressMode::Absolute => {
                let ad = self.read_adr();
                let labfound = self.labels.mark(ad, LabelFlags::REFERENCED);
                match mode {
                    TraceMode::Discover => {
                        let fold = (ad & self.window.end) as usize;
                        if addbranch && !self.labels.has(fold, LabelFlags::REACHABLE) {
                            if ad > 0xfff {
                                self.queue
                                    .push_back((ad & self.window.end) + self.window.offset);
                            }
                            self.labels.mark(ad, LabelFlags::REACHABLE);
                        }
                    }
                    TraceMode::Render => {
                        self.push_word_prefix(ad, ".w  ");
                        self.push_absolute_operand(ad, labfound, "");
                    }
                    TraceMode::Classify => {}
                }
            }
            AddressMode::AbsoluteX => {
                let ad = self.read_adr();
                let labfound = self.labels.mark(ad, LabelFlags::REFERENCED);
                if mode == TraceMode::Render {
                    self.push_word_prefix(ad, ".wx ");
                    self.push_absolute_operand(ad, labfound, ",X");
                }
            }
            AddressMode::AbsoluteY => {
                let ad = self.read_adr();
                let labfound = self.labels.mark(ad, LabelFlags::REFERENCED);
                if mode == TraceMode::Render {
                    self.push_word_prefix(ad, ".wy ");
                    self.push_absolute_operand(ad, labfound, ",Y");
                }
            }
            AddressMode::AbsIndirect => {
                let ad = self.read_adr();
                let labfound = self.labels.mark(ad, LabelFlags::REFERENCED);
                if mode == TraceMode::Render {
                    self.push_word_prefix(ad, ".ind ");
                    match labfound {
                        MarkKind::InWindow => {
                            let _ = write!(self.nextline, "(L{:04X})", ad);
                        }
                        MarkKind::IoReg => {
                            let name = io_reg_name(self.options.console, (ad - 0x280) as usize);
                            let _ = write!(self.nextline, "({})", name);
                        }
                        MarkKind::PokeyReg => {
                            let _ =
                                write!(self.nextline, "({})", POKEY_REGS[(ad - 0x4000) as usize]);
                        }
                        _ => {
                            let _ = write!(self.nextline, "(${:04X})", ad);
                        }
                    }
                }
            }
            AddressMode::ZeroPage => {
                let d1 = self.image.byte(self.pc);
                self.pc += 1;
                let labfound = self.labels.mark(u16::from(d1), LabelFlags::REFERENCED);
                if mode == TraceMode::Render {
                    if labfound == MarkKind::SystemReg {
                        let name = system_reg_name(self.options.console, d1 as usize);
                        let _ = write!(self.nextline, "    {}", name);
                    } else {
                        let _ = write!(self.nextline, "    ${:02X} ", d1);
                    }
                }
            }
            AddressMode::ZeroPageX => {
                let d1 = self.image.byte(self.pc);
                self.pc += 1;
                let labfound = self.labels.mark(u16::from(d1), LabelFlags::REFERENCED);
                if mode == TraceMode::Render {
                    if labfound == MarkKind::SystemReg {
                        let name = system_reg_name(self.options.console, d1 as usize);
                        let _ = write!(self.nextline, "    {},X", name);
                    } else {
                        let _ = write!(self.nextline, "    ${:02X},X", d1);
                    }
                }
            }
            AddressMode::ZeroPageY => {
                let d1 = self.image.byte(self.pc);
                self.pc += 1;
                let labfound = self.labels.mark(u16::from(d1), LabelFlags::REFERENCED);
                if mode == TraceMode::Render {
                    if labfound == MarkKind::SystemReg {
                        let name = system_reg_name(self.options.console, d1 as usize);
                        let _ = write!(self.nextline, "    {},Y", name);
                    } else {
                        let _ = write!(self.nextline, "    ${:02X},Y", d1);
                    }
                }
            }
            AddressMode::Immediate => {
                let d1 = self.image.byte(self.pc);
                self.pc += 1;
                if mode == TraceMode::Render {
                    let _ = write!(self.nextline, "    #${:02X} ", d1);
                }
            }
            AddressMode::IndirectX => {
                let d1 = self.image.byte(self.pc);
                self.pc += 1;
                if mode == TraceMode::Render {
                    let _ = write!(self.nextline, "    (${:02X},X)", d1);
                }
            }
            AddressMode::IndirectY => {
                let d1 = self.image.byte(self.pc);
                self.pc += 1;
                if mode == TraceMode::Render {
                    let _ = write!(self.nextline, "    (${:02X}),Y", d1);
                }
            }
            AddressMode::Relative => {
                let d1 = self.image.byte(self.pc);
                self.pc += 1;
                let delta = i32::from(d1 as i8);
                let target_index = self.pc as i32 + delta;
                let target = (i32::from(self.window.offset) + target_index) as u16;
                let labfound = self.labels.mark(target, LabelFlags::REFERENCED);
                match mode {
                    TraceMode::Discover => {
                        if addbranch
                            && (0..=self.window.end as i32).contains(&target_index)
                            && !self
                                .labels
                                .has(target_index as usize, LabelFlags::REACHABLE)
                        {
                            self.queue.push_back(target);
                            self.labels.mark(target, LabelFlags::REACHABLE);
                        }
                    }
                    TraceMode::Render => {
                        if labfound == MarkKind::InWindow {
                            let _ = write!(self.nextline, "    L{:04X}", target);
                        } else {
                            let _ = write!(self.nextline, "    ${:04X}", target);
                        }
                    }
                    TraceMode::Classify => {}
                }
            }
        }

        match mode {
            TraceMode::Discover => {
                // Execution cannot fall through these; the trace is done.
                if matches!(entry.mnemonic, "RTS" | "JMP" | "RTI") {
                    self.pcend = (self.pc - 1) as u16 + self.window.offset;
                    return true;
                }
            }
            TraceMode::Render => {
                self.output.push_str(&self.nextline);
                // Pad the operand column so trailing cycle counts line up.
                if self.nextline.len() <= 15 {
                    for _ in self.nextline.len()..15 {
                        self.output.push(' ');
                    }
                }
                if self.options.cycle_counts {
                    let _ = write!(self.output, ";{}", entry.cycles);
                }
                self.output.push('\n');
                if op == 0x40 || op == 0x60 {
                    self.output.push('\n');
                }
                self.nextline.clear();
            }
            TraceMode::Classify => {}
        }
        false
    }

    /// Emits the pseudo-op prefix for absolute-family operands that resolve
    /// below $100 and would otherwise reassemble as zero-page.
    fn push_word_prefix(&mut self, ad: u16, prefix: &str) {
        if ad < 0x100 && self.options.word_prefixes {
            self.nextline.push_str(prefix);
        } else {
            self.nextline.push_str("    ");
        }
    }

    /// Renders an absolute-family operand according to how its address
    /// resolved: window label, named register, relocated mirror, or raw hex.
    fn push_absolute_operand(&mut self, ad: u16, labfound: MarkKind, suffix: &str) {
        match labfound {
            MarkKind::InWindow => {
                let _ = write!(self.nextline, "L{:04X}{}", ad, suffix);
            }
            MarkKind::IoReg => {
                let name = io_reg_name(self.options.console, (ad - 0x280) as usize);
                let _ = write!(self.nextline, "{}{}", name, suffix);
            }
            MarkKind::PokeyReg => {
                let _ = write!(
                    self.nextline,
                    "{}{}",
                    POKEY_REGS[(ad - 0x4000) as usize],
                    suffix
                );
            }
            MarkKind::Mirror if self.options.relocate_mirrors => {
                let relocated = (ad & self.window.end) + self.window.offset;
                let _ = write!(self.nextline, "L{:04X}{}", relocated, suffix);
            }
            _ => {
                let _ = write!(self.nextline, "${:04X}{}", ad, suffix);
            }
        }
    }

    /// Little-endian operand word at the current position.
    fn read_adr(&mut self) -> u16 {
        let lo = self.image.byte(self.pc);
        let hi = self.image.byte(self.pc + 1);
        self.pc += 2;
        u16::from(lo) | (u16::from(hi) << 8)
    }

    /// The listing header: comments, the optional processor directive, the
    /// used hardware equates, orphaned-reference equates, and the ORG line.
    fn header(&self) -> String {
        let mut header = String::new();
        header.push_str("; Disassembly by cartdis\n");
        if self.options.echo_config && !self.options.config_echo.is_empty() {
            header.push_str(";\n; Configuration file contents:\n");
            for line in &self.options.config_echo {
                let _ = writeln!(header, ";      {}", line);
            }
        }
        header.push('\n');
        if self.options.processor_directive {
            header.push_str("      processor 6502\n");
        }
        header.push_str(
            &self
                .labels
                .reserved
                .equate_lines(self.options.console, self.options.pokey),
        );
        // Addresses referenced from somewhere but buried inside a decoded
        // unit cannot carry an inline label; give them explicit equates.
        for i in 0..=self.window.end as usize {
            let flags = self.labels.get(i);
            if flags & (LabelFlags::REFERENCED | LabelFlags::VALID_ENTRY) == LabelFlags::REFERENCED
            {
                let address = i as u16 + self.window.offset;
                let _ = writeln!(header, "L{:04X}   =   ${:04X}", address, address);
            }
        }
        header.push('\n');
        let _ = writeln!(header, "       ORG ${:04X}", self.window.offset);
        header
    }
}
