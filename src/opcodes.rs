//! The NMOS 6502 opcode table.
//!
//! One entry per raw opcode byte, covering the documented instruction set
//! plus the undocumented/illegal opcodes (mnemonics starting with `.`).
//! Illegal opcodes are never rendered as executable instructions; the
//! renderer emits them as `.byte` data with the mnemonic in a comment.

/// The thirteen addressing modes of the 6502.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressMode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    /// `JMP (addr)` only.
    AbsIndirect,
    IndirectX,
    IndirectY,
    Relative,
}

impl AddressMode {
    /// Total instruction length in bytes, opcode included.
    pub fn length(self) -> usize {
        match self {
            AddressMode::Implied | AddressMode::Accumulator => 1,
            AddressMode::Immediate
            | AddressMode::ZeroPage
            | AddressMode::ZeroPageX
            | AddressMode::ZeroPageY
            | AddressMode::IndirectX
            | AddressMode::IndirectY
            | AddressMode::Relative => 2,
            AddressMode::Absolute
            | AddressMode::AbsoluteX
            | AddressMode::AbsoluteY
            | AddressMode::AbsIndirect => 3,
        }
    }
}

/// Logical operand classes, used as the source and destination columns of
/// the opcode table.
///
/// The analyzer only cares about three of these: `Rel` (conditional
/// branches), `Addr` (JMP/JSR absolute) and `AbsInd` (JMP indirect) mark an
/// instruction as a control transfer. The rest describe register and memory
/// operands, including the bus-collision behavior of several illegal
/// opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandClass {
    None,
    /// Accumulator.
    Ac,
    /// X index register.
    Xr,
    /// Y index register.
    Yr,
    /// Stack pointer.
    Sp,
    /// Status register.
    Sr,
    /// Program counter.
    Pc,
    Imm,
    Zero,
    ZeroX,
    ZeroY,
    Abs,
    AbsX,
    AbsY,
    /// Absolute-indirect jump vector.
    AbsInd,
    IndX,
    IndY,
    /// Relative branch displacement.
    Rel,
    FlagC,
    FlagD,
    FlagI,
    FlagV,
    /// Fixed absolute jump/call target (JMP/JSR).
    Addr,
    /// AC & immediate (bus collision).
    AcImm,
    /// AC & XR (bus collision).
    AcAndXr,
    /// (AC | $EE) & XR & immediate (bus collision).
    AxIm,
    /// AC with carry taking the negative flag.
    AcNc,
    /// Both AC and XR.
    AcXr,
    /// ABS,Y & SP (bus collision).
    SpAbsY,
    /// AC, XR and SP together.
    AcXrSp,
    /// Store (src & addr_hi+1) to (addr + $100), variants 0-3.
    StoreHi0,
    StoreHi1,
    StoreHi2,
    StoreHi3,
}

impl OperandClass {
    /// True for the operand classes that make an instruction a statically
    /// followable control transfer: relative branches, absolute jumps and
    /// calls, and the absolute-indirect jump.
    pub fn is_control_transfer(self) -> bool {
        matches!(
            self,
            OperandClass::Rel | OperandClass::Addr | OperandClass::AbsInd
        )
    }
}

/// A single opcode table row.
#[derive(Debug, Clone, Copy)]
pub struct OpEntry {
    pub mnemonic: &'static str,
    pub mode: AddressMode,
    pub source: OperandClass,
    pub destination: OperandClass,
    /// Base cycle count.
    pub cycles: u8,
    /// One extra cycle when the operand crosses a page boundary.
    pub page_cross: bool,
}

impl OpEntry {
    /// Undocumented opcodes carry a `.` marker in front of the mnemonic.
    pub fn is_undocumented(&self) -> bool {
        self.mnemonic.starts_with('.')
    }
}

fn op(
    mnemonic: &'static str,
    mode: AddressMode,
    source: OperandClass,
    destination: OperandClass,
    cycles: u8,
    page_cross: bool,
) -> OpEntry {
    OpEntry {
        mnemonic,
        mode,
        source,
        destination,
        cycles,
        page_cross,
    }
}

lazy_static! {
    /// The full 256-entry decode table, indexed by raw opcode byte.
    pub static ref LOOKUP: [OpEntry; 256] = build_lookup();
}

#[rustfmt::skip]
fn build_lookup() -> [OpEntry; 256] {
    use AddressMode::*;
    use OperandClass::*;
    [
        op("BRK", Implied, None, Pc, 7, false),                 // 00
        op("ORA", IndirectX, IndX, Ac, 6, false),               // 01
        op(".JAM", Implied, None, None, 0, false),              // 02
        op(".SLO", IndirectX, IndX, IndX, 8, false),            // 03

        op(".NOOP", ZeroPage, None, None, 3, false),            // 04
        op("ORA", ZeroPage, Zero, Ac, 3, false),                // 05
        op("ASL", ZeroPage, Zero, Zero, 5, false),              // 06
        op(".SLO", ZeroPage, Zero, Zero, 5, false),             // 07

        op("PHP", Implied, Sr, None, 3, false),                 // 08
        op("ORA", Immediate, Imm, Ac, 2, false),                // 09
        op("ASL", Accumulator, Ac, Ac, 2, false),               // 0a
        op(".ANC", Immediate, AcImm, AcNc, 2, false),           // 0b

        op(".NOOP", Absolute, None, None, 4, false),            // 0c
        op("ORA", Absolute, Abs, Ac, 4, false),                 // 0d
        op("ASL", Absolute, Abs, Abs, 6, false),                // 0e
        op(".SLO", Absolute, Abs, Abs, 6, false),               // 0f

        op("BPL", Relative, Rel, None, 2, false),               // 10
        op("ORA", IndirectY, IndY, Ac, 5, true),                // 11
        op(".JAM", Implied, None, None, 0, false),              // 12
        op(".SLO", IndirectY, IndY, IndY, 8, false),            // 13

        op(".NOOP", ZeroPageX, None, None, 4, false),           // 14
        op("ORA", ZeroPageX, ZeroX, Ac, 4, false),              // 15
        op("ASL", ZeroPageX, ZeroX, ZeroX, 6, false),           // 16
        op(".SLO", ZeroPageX, ZeroX, ZeroX, 6, false),          // 17

        op("CLC", Implied, None, FlagC, 2, false),              // 18
        op("ORA", AbsoluteY, AbsY, Ac, 4, true),                // 19
        op(".NOOP", Implied, None, None, 2, false),             // 1a
        op(".SLO", AbsoluteY, AbsY, AbsY, 7, false),            // 1b

        op(".NOOP", AbsoluteX, None, None, 4, true),            // 1c
        op("ORA", AbsoluteX, AbsX, Ac, 4, true),                // 1d
        op("ASL", AbsoluteX, AbsX, AbsX, 7, false),             // 1e
        op(".SLO", AbsoluteX, AbsX, AbsX, 7, false),            // 1f

        op("JSR", Absolute, Addr, Pc, 6, false),                // 20
        op("AND", IndirectX, IndX, Ac, 6, false),               // 21
        op(".JAM", Implied, None, None, 0, false),              // 22
        op(".RLA", IndirectX, IndX, IndX, 8, false),            // 23

        op("BIT", ZeroPage, Zero, None, 3, false),              // 24
        op("AND", ZeroPage, Zero, Ac, 3, false),                // 25
        op("ROL", ZeroPage, Zero, Zero, 5, false),              // 26
        op(".RLA", ZeroPage, Zero, Zero, 5, false),             // 27

        op("PLP", Implied, None, Sr, 4, false),                 // 28
        op("AND", Immediate, Imm, Ac, 2, false),                // 29
        op("ROL", Accumulator, Ac, Ac, 2, false),               // 2a
        op(".ANC", Immediate, AcImm, AcNc, 2, false),           // 2b

        op("BIT", Absolute, Abs, None, 4, false),               // 2c
        op("AND", Absolute, Abs, Ac, 4, false),                 // 2d
        op("ROL", Absolute, Abs, Abs, 6, false),                // 2e
        op(".RLA", Absolute, Abs, Abs, 6, false),               // 2f

        op("BMI", Relative, Rel, None, 2, false),               // 30
        op("AND", IndirectY, IndY, Ac, 5, true),                // 31
        op(".JAM", Implied, None, None, 0, false),              // 32
        op(".RLA", IndirectY, IndY, IndY, 8, false),            // 33

        op(".NOOP", ZeroPageX, None, None, 4, false),           // 34
        op("AND", ZeroPageX, ZeroX, Ac, 4, false),              // 35
        op("ROL", ZeroPageX, ZeroX, ZeroX, 6, false),           // 36
        op(".RLA", ZeroPageX, ZeroX, ZeroX, 6, false),          // 37

        op("SEC", Implied, None, FlagC, 2, false),              // 38
        op("AND", AbsoluteY, AbsY, Ac, 4, true),                // 39
        op(".NOOP", Implied, None, None, 2, false),             // 3a
        op(".RLA", AbsoluteY, AbsY, AbsY, 7, false),            // 3b

        op(".NOOP", AbsoluteX, None, None, 4, true),            // 3c
        op("AND", AbsoluteX, AbsX, Ac, 4, true),                // 3d
        op("ROL", AbsoluteX, AbsX, AbsX, 7, false),             // 3e
        op(".RLA", AbsoluteX, AbsX, AbsX, 7, false),            // 3f

        op("RTI", Implied, None, Pc, 6, false),                 // 40
        op("EOR", IndirectX, IndX, Ac, 6, false),               // 41
        op(".JAM", Implied, None, None, 0, false),              // 42
        op(".SRE", IndirectX, IndX, IndX, 8, false),            // 43

        op(".NOOP", ZeroPage, None, None, 3, false),            // 44
        op("EOR", ZeroPage, Zero, Ac, 3, false),                // 45
        op("LSR", ZeroPage, Zero, Zero, 5, false),              // 46
        op(".SRE", ZeroPage, Zero, Zero, 5, false),             // 47

        op("PHA", Implied, Ac, None, 3, false),                 // 48
        op("EOR", Immediate, Imm, Ac, 2, false),                // 49
        op("LSR", Accumulator, Ac, Ac, 2, false),               // 4a
        op(".ASR", Immediate, AcImm, Ac, 2, false),             // 4b

        op("JMP", Absolute, Addr, Pc, 3, false),                // 4c
        op("EOR", Absolute, Abs, Ac, 4, false),                 // 4d
        op("LSR", Absolute, Abs, Abs, 6, false),                // 4e
        op(".SRE", Absolute, Abs, Abs, 6, false),               // 4f

        op("BVC", Relative, Rel, None, 2, false),               // 50
        op("EOR", IndirectY, IndY, Ac, 5, true),                // 51
        op(".JAM", Implied, None, None, 0, false),              // 52
        op(".SRE", IndirectY, IndY, IndY, 8, false),            // 53

        op(".NOOP", ZeroPageX, None, None, 4, false),           // 54
        op("EOR", ZeroPageX, ZeroX, Ac, 4, false),              // 55
        op("LSR", ZeroPageX, ZeroX, ZeroX, 6, false),           // 56
        op(".SRE", ZeroPageX, ZeroX, ZeroX, 6, false),          // 57

        op("CLI", Implied, None, FlagI, 2, false),              // 58
        op("EOR", AbsoluteY, AbsY, Ac, 4, true),                // 59
        op(".NOOP", Implied, None, None, 2, false),             // 5a
        op(".SRE", AbsoluteY, AbsY, AbsY, 7, false),            // 5b

        op(".NOOP", AbsoluteX, None, None, 4, true),            // 5c
        op("EOR", AbsoluteX, AbsX, Ac, 4, true),                // 5d
        op("LSR", AbsoluteX, AbsX, AbsX, 7, false),             // 5e
        op(".SRE", AbsoluteX, AbsX, AbsX, 7, false),            // 5f

        op("RTS", Implied, None, Pc, 6, false),                 // 60
        op("ADC", IndirectX, IndX, Ac, 6, false),               // 61
        op(".JAM", Implied, None, None, 0, false),              // 62
        op(".RRA", IndirectX, IndX, IndX, 8, false),            // 63

        op(".NOOP", ZeroPage, None, None, 3, false),            // 64
        op("ADC", ZeroPage, Zero, Ac, 3, false),                // 65
        op("ROR", ZeroPage, Zero, Zero, 5, false),              // 66
        op(".RRA", ZeroPage, Zero, Zero, 5, false),             // 67

        op("PLA", Implied, None, Ac, 4, false),                 // 68
        op("ADC", Immediate, Imm, Ac, 2, false),                // 69
        op("ROR", Accumulator, Ac, Ac, 2, false),               // 6a
        op(".ARR", Immediate, AcImm, Ac, 2, false),             // 6b

        op("JMP", AbsIndirect, AbsInd, Pc, 5, false),           // 6c
        op("ADC", Absolute, Abs, Ac, 4, false),                 // 6d
        op("ROR", Absolute, Abs, Abs, 6, false),                // 6e
        op(".RRA", Absolute, Abs, Abs, 6, false),               // 6f

        op("BVS", Relative, Rel, None, 2, false),               // 70
        op("ADC", IndirectY, IndY, Ac, 5, true),                // 71
        op(".JAM", Implied, None, None, 0, false),              // 72
        op(".RRA", IndirectY, IndY, IndY, 8, false),            // 73

        op(".NOOP", ZeroPageX, None, None, 4, false),           // 74
        op("ADC", ZeroPageX, ZeroX, Ac, 4, false),              // 75
        op("ROR", ZeroPageX, ZeroX, ZeroX, 6, false),           // 76
        op(".RRA", ZeroPageX, ZeroX, ZeroX, 6, false),          // 77

        op("SEI", Implied, None, FlagI, 2, false),              // 78
        op("ADC", AbsoluteY, AbsY, Ac, 4, true),                // 79
        op(".NOOP", Implied, None, None, 2, false),             // 7a
        op(".RRA", AbsoluteY, AbsY, AbsY, 7, false),            // 7b

        op(".NOOP", AbsoluteX, None, None, 4, true),            // 7c
        op("ADC", AbsoluteX, AbsX, Ac, 4, true),                // 7d
        op("ROR", AbsoluteX, AbsX, AbsX, 7, false),             // 7e
        op(".RRA", AbsoluteX, AbsX, AbsX, 7, false),            // 7f

        op(".NOOP", Immediate, None, None, 2, false),           // 80
        op("STA", IndirectX, Ac, IndX, 6, false),               // 81
        op(".NOOP", Immediate, None, None, 2, false),           // 82
        op(".SAX", IndirectX, AcAndXr, IndX, 6, false),         // 83

        op("STY", ZeroPage, Yr, Zero, 3, false),                // 84
        op("STA", ZeroPage, Ac, Zero, 3, false),                // 85
        op("STX", ZeroPage, Xr, Zero, 3, false),                // 86
        op(".SAX", ZeroPage, AcAndXr, Zero, 3, false),          // 87

        op("DEY", Implied, Yr, Yr, 2, false),                   // 88
        op(".NOOP", Immediate, None, None, 2, false),           // 89
        op("TXA", Implied, Xr, Ac, 2, false),                   // 8a
        op(".ANE", Immediate, AxIm, Ac, 2, false),              // 8b

        op("STY", Absolute, Yr, Abs, 4, false),                 // 8c
        op("STA", Absolute, Ac, Abs, 4, false),                 // 8d
        op("STX", Absolute, Xr, Abs, 4, false),                 // 8e
        op(".SAX", Absolute, AcAndXr, Abs, 4, false),           // 8f

        op("BCC", Relative, Rel, None, 2, false),               // 90
        op("STA", IndirectY, Ac, IndY, 6, false),               // 91
        op(".JAM", Implied, None, None, 0, false),              // 92
        op(".SHA", IndirectY, AcAndXr, StoreHi0, 6, false),     // 93

        op("STY", ZeroPageX, Yr, ZeroX, 4, false),              // 94
        op("STA", ZeroPageX, Ac, ZeroX, 4, false),              // 95
        op("STX", ZeroPageY, Xr, ZeroY, 4, false),              // 96
        op(".SAX", ZeroPageY, AcAndXr, ZeroY, 4, false),        // 97

        op("TYA", Implied, Yr, Ac, 2, false),                   // 98
        op("STA", AbsoluteY, Ac, AbsY, 5, false),               // 99
        op("TXS", Implied, Xr, Sp, 2, false),                   // 9a
        op(".SHS", AbsoluteY, AcAndXr, StoreHi3, 5, false),     // 9b

        op(".SHY", AbsoluteX, Yr, StoreHi2, 5, false),          // 9c
        op("STA", AbsoluteX, Ac, AbsX, 5, false),               // 9d
        op(".SHX", AbsoluteY, Xr, StoreHi1, 5, false),          // 9e
        op(".SHA", AbsoluteY, AcAndXr, StoreHi1, 5, false),     // 9f

        op("LDY", Immediate, Imm, Yr, 2, false),                // a0
        op("LDA", IndirectX, IndX, Ac, 6, false),               // a1
        op("LDX", Immediate, Imm, Xr, 2, false),                // a2
        op(".LAX", IndirectX, IndX, AcXr, 6, false),            // a3

        op("LDY", ZeroPage, Zero, Yr, 3, false),                // a4
        op("LDA", ZeroPage, Zero, Ac, 3, false),                // a5
        op("LDX", ZeroPage, Zero, Xr, 3, false),                // a6
        op(".LAX", ZeroPage, Zero, AcXr, 3, false),             // a7

        op("TAY", Implied, Ac, Yr, 2, false),                   // a8
        op("LDA", Immediate, Imm, Ac, 2, false),                // a9
        op("TAX", Implied, Ac, Xr, 2, false),                   // aa
        op(".LXA", Immediate, AcImm, AcXr, 2, false),           // ab

        op("LDY", Absolute, Abs, Yr, 4, false),                 // ac
        op("LDA", Absolute, Abs, Ac, 4, false),                 // ad
        op("LDX", Absolute, Abs, Xr, 4, false),                 // ae
        op(".LAX", Absolute, Abs, AcXr, 4, false),              // af

        op("BCS", Relative, Rel, None, 2, false),               // b0
        op("LDA", IndirectY, IndY, Ac, 5, true),                // b1
        op(".JAM", Implied, None, None, 0, false),              // b2
        op(".LAX", IndirectY, IndY, AcXr, 5, true),             // b3

        op("LDY", ZeroPageX, ZeroX, Yr, 4, false),              // b4
        op("LDA", ZeroPageX, ZeroX, Ac, 4, false),              // b5
        op("LDX", ZeroPageY, ZeroY, Xr, 4, false),              // b6
        op(".LAX", ZeroPageY, ZeroY, AcXr, 4, false),           // b7

        op("CLV", Implied, None, FlagV, 2, false),              // b8
        op("LDA", AbsoluteY, AbsY, Ac, 4, true),                // b9
        op("TSX", Implied, Sp, Xr, 2, false),                   // ba
        op(".LAS", AbsoluteY, SpAbsY, AcXrSp, 4, true),         // bb

        op("LDY", AbsoluteX, AbsX, Yr, 4, true),                // bc
        op("LDA", AbsoluteX, AbsX, Ac, 4, true),                // bd
        op("LDX", AbsoluteY, AbsY, Xr, 4, true),                // be
        op(".LAX", AbsoluteY, AbsY, AcXr, 4, true),             // bf

        op("CPY", Immediate, Imm, None, 2, false),              // c0
        op("CMP", IndirectX, IndX, None, 6, false),             // c1
        op(".NOOP", Immediate, None, None, 2, false),           // c2
        op(".DCP", IndirectX, IndX, IndX, 8, false),            // c3

        op("CPY", ZeroPage, Zero, None, 3, false),              // c4
        op("CMP", ZeroPage, Zero, None, 3, false),              // c5
        op("DEC", ZeroPage, Zero, Zero, 5, false),              // c6
        op(".DCP", ZeroPage, Zero, Zero, 5, false),             // c7

        op("INY", Implied, Yr, Yr, 2, false),                   // c8
        op("CMP", Immediate, Imm, None, 2, false),              // c9
        op("DEX", Implied, Xr, Xr, 2, false),                   // ca
        op(".SBX", Immediate, Imm, Xr, 2, false),               // cb

        op("CPY", Absolute, Abs, None, 4, false),               // cc
        op("CMP", Absolute, Abs, None, 4, false),               // cd
        op("DEC", Absolute, Abs, Abs, 6, false),                // ce
        op(".DCP", Absolute, Abs, Abs, 6, false),               // cf

        op("BNE", Relative, Rel, None, 2, false),               // d0
        op("CMP", IndirectY, IndY, None, 5, true),              // d1
        op(".JAM", Implied, None, None, 0, false),              // d2
        op(".DCP", IndirectY, IndY, IndY, 8, false),            // d3

        op(".NOOP", ZeroPageX, None, None, 4, false),           // d4
        op("CMP", ZeroPageX, ZeroX, None, 4, false),            // d5
        op("DEC", ZeroPageX, ZeroX, ZeroX, 6, false),           // d6
        op(".DCP", ZeroPageX, ZeroX, ZeroX, 6, false),          // d7

        op("CLD", Implied, None, FlagD, 2, false),              // d8
        op("CMP", AbsoluteY, AbsY, None, 4, true),              // d9
        op(".NOOP", Implied, None, None, 2, false),             // da
        op(".DCP", AbsoluteY, AbsY, AbsY, 7, false),            // db

        op(".NOOP", AbsoluteX, None, None, 4, true),            // dc
        op("CMP", AbsoluteX, AbsX, None, 4, true),              // dd
        op("DEC", AbsoluteX, AbsX, AbsX, 7, false),             // de
        op(".DCP", AbsoluteX, AbsX, AbsX, 7, false),            // df

        op("CPX", Immediate, Imm, None, 2, false),              // e0
        op("SBC", IndirectX, IndX, Ac, 6, false),               // e1
        op(".NOOP", Immediate, None, None, 2, false),           // e2
        op(".ISB", IndirectX, IndX, IndX, 8, false),            // e3

        op("CPX", ZeroPage, Zero, None, 3, false),              // e4
        op("SBC", ZeroPage, Zero, Ac, 3, false),                // e5
        op("INC", ZeroPage, Zero, Zero, 5, false),              // e6
        op(".ISB", ZeroPage, Zero, Zero, 5, false),             // e7

        op("INX", Implied, Xr, Xr, 2, false),                   // e8
        op("SBC", Immediate, Imm, Ac, 2, false),                // e9
        op("NOP", Implied, None, None, 2, false),               // ea
        op(".USBC", Immediate, Imm, Ac, 2, false),              // eb

        op("CPX", Absolute, Abs, None, 4, false),               // ec
        op("SBC", Absolute, Abs, Ac, 4, false),                 // ed
        op("INC", Absolute, Abs, Abs, 6, false),                // ee
        op(".ISB", Absolute, Abs, Abs, 6, false),               // ef

        op("BEQ", Relative, Rel, None, 2, false),               // f0
        op("SBC", IndirectY, IndY, Ac, 5, true),                // f1
        op(".JAM", Implied, None, None, 0, false),              // f2
        op(".ISB", IndirectY, IndY, IndY, 8, false),            // f3

        op(".NOOP", ZeroPageX, None, None, 4, false),           // f4
        op("SBC", ZeroPageX, ZeroX, Ac, 4, false),              // f5
        op("INC", ZeroPageX, ZeroX, ZeroX, 6, false),           // f6
        op(".ISB", ZeroPageX, ZeroX, ZeroX, 6, false),          // f7

        op("SED", Implied, None, FlagD, 2, false),              // f8
        op("SBC", AbsoluteY, AbsY, Ac, 4, true),                // f9
        op(".NOOP", Implied, None, None, 2, false),             // fa
        op(".ISB", AbsoluteY, AbsY, AbsY, 7, false),            // fb

        op(".NOOP", AbsoluteX, None, None, 4, true),            // fc
        op("SBC", AbsoluteX, AbsX, Ac, 4, true),                // fd
        op("INC", AbsoluteX, AbsX, AbsX, 7, false),             // fe
        op(".ISB", AbsoluteX, AbsX, AbsX, 7, false),            // ff
    ]
}
