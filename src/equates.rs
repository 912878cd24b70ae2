//! Symbolic names for the fixed hardware registers outside the code window.
//!
//! Three groups exist per console: the page-zero system registers (TIA on
//! the 2600, MARIA on the 7800), the extended I/O block at $0280, and the
//! optional POKEY block at $4000 (7800 carts with POKEY support only).
//! Slots with no documented register keep a raw hex placeholder so table
//! indexing stays 1:1 with the address range.

use crate::config::Console;

/// TIA and 2600 system registers, $00-$3D.
pub const TIA_REGS: [&str; 62] = [
    "VSYNC", "VBLANK", "WSYNC", "RSYNC", "NUSIZ0", "NUSIZ1", "COLUP0", "COLUP1", "COLUPF",
    "COLUBK", "CTRLPF", "REFP0", "REFP1", "PF0", "PF1", "PF2", "RESP0", "RESP1", "RESM0", "RESM1",
    "RESBL", "AUDC0", "AUDC1", "AUDF0", "AUDF1", "AUDV0", "AUDV1", "GRP0", "GRP1", "ENAM0",
    "ENAM1", "ENABL", "HMP0", "HMP1", "HMM0", "HMM1", "HMBL", "VDELP0", "VDELP1", "VDELBL",
    "RESMP0", "RESMP1", "HMOVE", "HMCLR", "CXCLR", "$2D", "$2E", "$2F", "CXM0P", "CXM1P", "CXP0FB",
    "CXP1FB", "CXM0FB", "CXM1FB", "CXBLPF", "CXPPMM", "INPT0", "INPT1", "INPT2", "INPT3", "INPT4",
    "INPT5",
];

/// RIOT I/O and timer registers, $0280-$0297 (2600).
pub const RIOT_REGS: [&str; 24] = [
    "SWCHA", "SWACNT", "SWCHB", "SWBCNT", "INTIM", "$0285", "$0286", "$0287", "$0288", "$0289",
    "$028A", "$028B", "$028C", "$028D", "$028E", "$028F", "$0290", "$0291", "$0292", "$0293",
    "TIM1T", "TIM8T", "TIM64T", "T1024T",
];

/// MARIA and 7800 system registers, $00-$3F.
pub const MARIA_REGS: [&str; 64] = [
    "$00", "INPTCTRL", "$02", "$03", "$04", "$05", "$06", "$07", "INPT0", "INPT1", "INPT2",
    "INPT3", "INPT4", "INPT5", "$0E", "$0F", "$10", "$11", "$12", "$13", "$14", "AUDC0", "AUDC1",
    "AUDF0", "AUDF1", "AUDV0", "AUDV1", "$1B", "$1C", "$1D", "$1E", "$1F", "BACKGRND", "P0C1",
    "P0C2", "P0C3", "WSYNC", "P1C1", "P1C2", "P1C3", "MSTAT", "P2C1", "P2C2", "P2C3", "DPPH",
    "P3C1", "P3C2", "P3C3", "DPPL", "P4C1", "P4C2", "P4C3", "CHBASE", "P5C1", "P5C2", "P5C3",
    "OFFSET", "P6C1", "P6C2", "P6C3", "CTRL", "P7C1", "P7C2", "P7C3",
];

/// 7800 I/O registers, $0280-$0283.
pub const MARIA_IO_REGS: [&str; 4] = ["SWCHA", "SWACNT", "SWCHB", "SWBCNT"];

/// POKEY registers, $4000-$400F (7800 POKEY carts only).
pub const POKEY_REGS: [&str; 16] = [
    "AUDF2", "AUDC2", "AUDF3", "AUDC3", "AUDF4", "AUDC4", "AUDF5", "AUDC5", "AUDCTL", "$4009",
    "RANDOM", "$400B", "$400C", "$400D", "$400E", "SKCTLS",
];

/// Returns the symbolic name of a page-zero system register.
pub fn system_reg_name(console: Console, index: usize) -> &'static str {
    match console {
        Console::Atari2600 => TIA_REGS[index],
        Console::Atari7800 => MARIA_REGS[index],
    }
}

/// Returns the symbolic name of an extended I/O register ($0280 block).
pub fn io_reg_name(console: Console, index: usize) -> &'static str {
    match console {
        Console::Atari2600 => RIOT_REGS[index],
        Console::Atari7800 => MARIA_IO_REGS[index],
    }
}

/// Tracks which reserved registers an operand actually resolved to, so the
/// output header only carries equates for registers the program touches.
#[derive(Debug)]
pub struct ReservedRegisters {
    pub system: [bool; 64],
    pub io: [bool; 24],
    pub pokey: [bool; 16],
}

impl ReservedRegisters {
    pub fn new() -> Self {
        ReservedRegisters {
            system: [false; 64],
            io: [false; 24],
            pokey: [false; 16],
        }
    }

    /// Emits one `NAME     =  $ADDR` line per used register, names padded
    /// to a 7-column field. System registers print as two hex digits, the
    /// I/O and POKEY blocks as four.
    pub fn equate_lines(&self, console: Console, pokey_enabled: bool) -> String {
        let mut out = String::new();
        let system_top = match console {
            Console::Atari2600 => 0x3d,
            Console::Atari7800 => 0x3f,
        };
        for addr in 0..=system_top {
            if self.system[addr] {
                out.push_str(&equate_line(system_reg_name(console, addr), addr as u16, 2));
            }
        }
        let io_top = match console {
            Console::Atari2600 => 0x297,
            Console::Atari7800 => 0x283,
        };
        for addr in 0x280..=io_top {
            if self.io[addr - 0x280] {
                out.push_str(&equate_line(io_reg_name(console, addr - 0x280), addr as u16, 4));
            }
        }
        if console == Console::Atari7800 && pokey_enabled {
            for addr in 0x4000..=0x400f_usize {
                if self.pokey[addr - 0x4000] {
                    out.push_str(&equate_line(POKEY_REGS[addr - 0x4000], addr as u16, 4));
                }
            }
        }
        out
    }
}

impl Default for ReservedRegisters {
    fn default() -> Self {
        Self::new()
    }
}

fn equate_line(name: &str, value: u16, hex_width: usize) -> String {
    let mut line = String::from(name);
    while line.len() < 7 {
        line.push(' ');
    }
    if hex_width == 2 {
        line.push_str(&format!(" =  ${:02X}\n", value));
    } else {
        line.push_str(&format!(" =  ${:04X}\n", value));
    }
    line
}
