//! Cartridge image loading and the analyzed address window.
//!
//! An image is validated and fully materialized before any analysis runs.
//! The only accepted sizes are the stock cartridge sizes per console, plus
//! the `+128` variants for 7800 images carrying an a78 header; the header
//! is validated and stripped here so the analysis passes only ever see the
//! bare code window.

use crate::config::Console;
use log::debug;

/// Size of the a78 header prepended to dumped 7800 images.
pub const A78_HEADER_LEN: usize = 128;

/// ASCII signature found at header offset 100.
const A78_SIGNATURE: &[u8; 28] = b"ACTUAL CART DATA STARTS HERE";

/// Offset of the controller/capability byte carrying the POKEY bit.
const A78_POKEY_BYTE: usize = 54;

const SIZE_ERROR: &str = "Error: image must be 2048 or 4096 bytes for 2600 carts; \
    7800 carts must be 8192, 16384, 32768 or 49152 bytes \
    (+128 bytes if an a78 header is appended). \
    Check that the 7800 option matches the image.";

/// A validated, header-stripped cartridge image.
#[derive(Debug)]
pub struct RomImage {
    mem: Vec<u8>,
    /// Window size minus one (0x7FF, 0xFFF, 0x1FFF, 0x3FFF, 0x7FFF or 0xBFFF).
    end: u16,
    console: Console,
    header_present: bool,
    pokey_capable: bool,
}

impl RomImage {
    /// Validates the image size for the selected console, checks and strips
    /// an a78 header when present, and takes ownership of the bytes.
    pub fn load(bytes: Vec<u8>, console: Console) -> Result<Self, String> {
        let (end, header_present) = match console {
            Console::Atari2600 => match bytes.len() {
                2048 => (0x7ffu16, false),
                4096 => (0xfff, false),
                _ => return Err(SIZE_ERROR.to_string()),
            },
            Console::Atari7800 => match bytes.len() {
                8192 => (0x1fff, false),
                8320 => (0x1fff, true),
                16384 => (0x3fff, false),
                16512 => (0x3fff, true),
                32768 => (0x7fff, false),
                32896 => (0x7fff, true),
                49152 => (0xbfff, false),
                49280 => (0xbfff, true),
                _ => return Err(SIZE_ERROR.to_string()),
            },
        };

        let mut pokey_capable = false;
        let mem = if header_present {
            let header = &bytes[..A78_HEADER_LEN];
            if &header[100..100 + A78_SIGNATURE.len()] != A78_SIGNATURE {
                return Err("a78 file has incorrect header".to_string());
            }
            // Bit 0 of the capability byte selects POKEY support.
            pokey_capable = header[A78_POKEY_BYTE] & 0x01 != 0;
            bytes[A78_HEADER_LEN..].to_vec()
        } else {
            bytes
        };

        debug!(
            "Loaded {} byte window, end={:04x}, header={}, pokey={}",
            mem.len(),
            end,
            header_present,
            pokey_capable
        );

        Ok(RomImage {
            mem,
            end,
            console,
            header_present,
            pokey_capable,
        })
    }

    pub fn bytes(&self) -> &[u8] {
        &self.mem
    }

    pub fn byte(&self, index: usize) -> u8 {
        self.mem[index]
    }

    /// Little-endian word at a window index.
    pub fn read_word(&self, index: usize) -> u16 {
        u16::from(self.mem[index]) | (u16::from(self.mem[index + 1]) << 8)
    }

    /// Window size minus one.
    pub fn end(&self) -> u16 {
        self.end
    }

    pub fn console(&self) -> Console {
        self.console
    }

    pub fn header_present(&self) -> bool {
        self.header_present
    }

    pub fn pokey_capable(&self) -> bool {
        self.pokey_capable
    }

    /// The program start vector, second-to-last word of the window.
    pub fn start_vector(&self) -> u16 {
        self.read_word(self.end as usize - 3)
    }

    /// The BRK vector, last word of the window.
    pub fn brk_vector(&self) -> u16 {
        self.read_word(self.end as usize - 1)
    }

    /// The 7800 interrupt vector, third-to-last word of the window.
    pub fn interrupt_vector(&self) -> u16 {
        self.read_word(self.end as usize - 5)
    }
}

/// The contiguous analyzed address range `[offset, offset+end]`.
///
/// The offset is derived from the start vector, masked to the power-of-two
/// boundary matching the cartridge size. Incomplete address decoding on the
/// target hardware means a 2K or 4K 2600 image can sit at many bases; the
/// start vector tells us which one the program believes it runs at. The 32K
/// and 48K 7800 layouts are fixed.
#[derive(Debug, Clone, Copy)]
pub struct AddressWindow {
    pub offset: u16,
    pub end: u16,
}

impl AddressWindow {
    pub fn for_image(image: &RomImage) -> AddressWindow {
        let start = image.start_vector();
        let offset = match image.end() {
            0x7ff => start & 0xf800,
            0xfff => start - start % 0x1000,
            0x1fff => start & 0xe000,
            0x3fff => start & 0xc000,
            0x7fff => 0x8000,
            0xbfff => 0x4000,
            _ => unreachable!("window size validated at load"),
        };
        debug!(
            "Code window ${:04X}-${:04X} (start vector ${:04X})",
            offset,
            offset + image.end(),
            start
        );
        AddressWindow {
            offset,
            end: image.end(),
        }
    }

    pub fn contains(&self, address: u16) -> bool {
        address >= self.offset && address <= self.offset + self.end
    }

    /// Buffer index of an in-window address.
    pub fn index_of(&self, address: u16) -> usize {
        (address - self.offset) as usize
    }
}
