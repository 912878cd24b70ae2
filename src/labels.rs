//! Per-address attribute flags and absolute-address classification.
//!
//! Every byte of the code window carries a small bitmask describing what
//! the analysis learned about it. [`LabelMap::mark`] is the single entry
//! point for attaching a flag to an *absolute* address: it decides whether
//! the address is inside the window, one of the fixed hardware register
//! blocks, a hardware mirror of the window, or nothing at all, and tells
//! the caller which, so the renderer can pick a symbolic spelling.

use crate::config::Console;
use crate::equates::ReservedRegisters;
use crate::image::AddressWindow;

bitflags! {
    /// Attribute bits for one window byte.
    #[derive(Default)]
    pub struct LabelFlags: u8 {
        /// Some operand somewhere references this address.
        const REFERENCED = 0x01;
        /// First byte of a decoded unit; a label may be placed here.
        /// An address inside a multi-byte instruction never gets this.
        const VALID_ENTRY = 0x02;
        const DATA = 0x04;
        const GFX = 0x08;
        /// Proven executable by the reachability pass.
        const REACHABLE = 0x10;
    }
}

/// What kind of address a `mark` call resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkKind {
    InWindow,
    SystemReg,
    IoReg,
    PokeyReg,
    Mirror,
    Invalid,
}

/// The label bitmask table plus the three reserved-register used-flag
/// tables, all keyed off one address window.
#[derive(Debug)]
pub struct LabelMap {
    labels: Vec<LabelFlags>,
    window: AddressWindow,
    console: Console,
    pokey: bool,
    pub reserved: ReservedRegisters,
}

impl LabelMap {
    pub fn new(window: AddressWindow, console: Console, pokey: bool) -> Self {
        LabelMap {
            labels: vec![LabelFlags::default(); window.end as usize + 1],
            window,
            console,
            pokey,
            reserved: ReservedRegisters::new(),
        }
    }

    /// Classifies an absolute address and applies `bit` to the matching
    /// table. Resolution order matters: the window wins over everything,
    /// the register blocks win over mirror folding, and mirror ranges are
    /// specific to the console and cartridge size.
    pub fn mark(&mut self, address: u16, bit: LabelFlags) -> MarkKind {
        let w = self.window;
        if address >= w.offset && address <= w.offset + w.end {
            self.labels[(address - w.offset) as usize] |= bit;
            MarkKind::InWindow
        } else if self.console == Console::Atari2600 && address <= 0x3d {
            self.reserved.system[address as usize] = true;
            MarkKind::SystemReg
        } else if self.console == Console::Atari2600 && (0x280..=0x297).contains(&address) {
            self.reserved.io[(address - 0x280) as usize] = true;
            MarkKind::IoReg
        } else if self.console == Console::Atari7800 && address <= 0x3f {
            self.reserved.system[address as usize] = true;
            MarkKind::SystemReg
        } else if self.console == Console::Atari7800 && (0x280..=0x283).contains(&address) {
            self.reserved.io[(address - 0x280) as usize] = true;
            MarkKind::IoReg
        } else if self.console == Console::Atari7800
            && self.pokey
            && (0x4000..=0x400f).contains(&address)
        {
            self.reserved.pokey[(address - 0x4000) as usize] = true;
            MarkKind::PokeyReg
        } else if self.console == Console::Atari7800 && w.end == 0x3fff && address > 0x8000 {
            // 16K carts: the upper half of the bus mirrors the window.
            self.labels[(address & w.end) as usize] |= bit;
            MarkKind::Mirror
        } else if self.console == Console::Atari7800
            && w.end == 0x7fff
            && address > 0x4000
            && address <= 0x7fff
        {
            // 32K carts: $4000-$7FFF aliases the lower half of the window.
            self.labels[(address - 0x4000) as usize] |= bit;
            MarkKind::Mirror
        } else if self.console == Console::Atari2600 && address > 0x1000 {
            // 2K and 4K carts: only 13 address lines are decoded.
            self.labels[(address & w.end) as usize] |= bit;
            MarkKind::Mirror
        } else {
            MarkKind::Invalid
        }
    }

    pub fn window(&self) -> AddressWindow {
        self.window
    }

    pub fn get(&self, index: usize) -> LabelFlags {
        self.labels[index]
    }

    pub fn has(&self, index: usize, flag: LabelFlags) -> bool {
        self.labels[index].contains(flag)
    }

    pub fn insert(&mut self, index: usize, flag: LabelFlags) {
        self.labels[index] |= flag;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_2600_4k() -> LabelMap {
        LabelMap::new(
            AddressWindow {
                offset: 0xf000,
                end: 0xfff,
            },
            Console::Atari2600,
            false,
        )
    }

    #[test]
    fn in_window_addresses_hit_the_label_table() {
        let mut map = map_2600_4k();
        assert_eq!(map.mark(0xf123, LabelFlags::REFERENCED), MarkKind::InWindow);
        assert!(map.has(0x123, LabelFlags::REFERENCED));
    }

    #[test]
    fn system_and_io_registers_resolve_before_mirrors() {
        let mut map = map_2600_4k();
        assert_eq!(map.mark(0x02, LabelFlags::REFERENCED), MarkKind::SystemReg);
        assert!(map.reserved.system[0x02]);
        assert_eq!(map.mark(0x296, LabelFlags::REFERENCED), MarkKind::IoReg);
        assert!(map.reserved.io[0x16]);
        // $3E is past the 2600 system block and below the mirror floor.
        assert_eq!(map.mark(0x3e, LabelFlags::REFERENCED), MarkKind::Invalid);
    }

    #[test]
    fn mirrors_fold_into_the_window_2600() {
        let mut map = map_2600_4k();
        assert_eq!(map.mark(0x1234, LabelFlags::REFERENCED), MarkKind::Mirror);
        assert!(map.has(0x234, LabelFlags::REFERENCED));
        assert_eq!(map.mark(0xd234, LabelFlags::DATA), MarkKind::Mirror);
        assert!(map.has(0x234, LabelFlags::DATA));
    }

    #[test]
    fn seven_eight_hundred_register_ranges() {
        let mut map = LabelMap::new(
            AddressWindow {
                offset: 0xc000,
                end: 0x3fff,
            },
            Console::Atari7800,
            true,
        );
        assert_eq!(map.mark(0x3f, LabelFlags::REFERENCED), MarkKind::SystemReg);
        assert_eq!(map.mark(0x283, LabelFlags::REFERENCED), MarkKind::IoReg);
        assert_eq!(map.mark(0x284, LabelFlags::REFERENCED), MarkKind::Invalid);
        assert_eq!(map.mark(0x4005, LabelFlags::REFERENCED), MarkKind::PokeyReg);
        assert!(map.reserved.pokey[0x05]);
    }

    #[test]
    fn pokey_range_is_dead_without_the_flag() {
        let mut map = LabelMap::new(
            AddressWindow {
                offset: 0xc000,
                end: 0x3fff,
            },
            Console::Atari7800,
            false,
        );
        assert_eq!(map.mark(0x4005, LabelFlags::REFERENCED), MarkKind::Invalid);
    }

    #[test]
    fn sixteen_k_mirror_folds_by_mask() {
        let mut map = LabelMap::new(
            AddressWindow {
                offset: 0xc000,
                end: 0x3fff,
            },
            Console::Atari7800,
            false,
        );
        assert_eq!(map.mark(0x8123, LabelFlags::REFERENCED), MarkKind::Mirror);
        assert!(map.has(0x0123, LabelFlags::REFERENCED));
        // $8000 itself is outside the mirror range.
        assert_eq!(map.mark(0x8000, LabelFlags::REFERENCED), MarkKind::Invalid);
    }

    #[test]
    fn thirty_two_k_mirror_folds_by_subtraction() {
        let mut map = LabelMap::new(
            AddressWindow {
                offset: 0x8000,
                end: 0x7fff,
            },
            Console::Atari7800,
            false,
        );
        assert_eq!(map.mark(0x5000, LabelFlags::REFERENCED), MarkKind::Mirror);
        assert!(map.has(0x1000, LabelFlags::REFERENCED));
    }

    #[test]
    fn marking_is_idempotent() {
        let mut map = map_2600_4k();
        map.mark(0xf100, LabelFlags::REFERENCED);
        map.mark(0xf100, LabelFlags::REFERENCED);
        map.mark(0xf100, LabelFlags::REACHABLE);
        assert_eq!(
            map.get(0x100),
            LabelFlags::REFERENCED | LabelFlags::REACHABLE
        );
    }
}
