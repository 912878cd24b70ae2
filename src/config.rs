//! Run options and the optional TOML configuration file.
//!
//! The config file carries address ranges to pre-mark as data or graphics
//! before the discovery pass runs, plus nothing else; every behavioral
//! switch lives on [`Options`] and is set by the caller (the bin parses
//! them from the command line).

use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Which console's address map the image belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Console {
    Atari2600,
    Atari7800,
}

/// Behavioral switches for a disassembly run. Each is independently
/// togglable, except that 48K 7800 images force `relocate_mirrors` and
/// `pokey` off during window setup.
#[derive(Debug, Clone)]
pub struct Options {
    pub console: Console,
    /// Render accumulator-mode operands as an explicit `A`.
    pub accumulator_text: bool,
    /// Echo the config file into the output header as comments.
    pub echo_config: bool,
    /// Emit `.w`/`.wx`/`.wy`/`.ind` pseudo-op prefixes when an
    /// absolute-family operand resolves below $100.
    pub word_prefixes: bool,
    /// Decode the POKEY register block (7800 only).
    pub pokey: bool,
    /// Emit a `processor 6502` directive in the header.
    pub processor_directive: bool,
    /// Append per-instruction cycle counts as comments.
    pub cycle_counts: bool,
    /// Render mirror-resolved operands as relocated labels instead of raw
    /// hex literals.
    pub relocate_mirrors: bool,
    /// Run the code/data discrimination passes. When off, the whole window
    /// renders as code.
    pub discriminate: bool,
    /// Trace the BRK vector as an entry point.
    pub trace_brk: bool,
    /// Trace the 7800 interrupt vector as an entry point.
    pub trace_interrupt: bool,
    /// Dump the raw instruction bytes ahead of each line.
    pub dump_bytes: bool,
    /// Pre-marked ranges from the config file.
    pub data_ranges: Vec<AddressRange>,
    pub gfx_ranges: Vec<AddressRange>,
    /// Raw config-file lines, echoed under `echo_config`.
    pub config_echo: Vec<String>,
}

impl Options {
    pub fn new(console: Console) -> Self {
        Options {
            console,
            accumulator_text: true,
            echo_config: false,
            word_prefixes: false,
            pokey: false,
            processor_directive: false,
            cycle_counts: false,
            relocate_mirrors: false,
            discriminate: true,
            trace_brk: false,
            trace_interrupt: false,
            dump_bytes: false,
            data_ranges: Vec::new(),
            gfx_ranges: Vec::new(),
            config_echo: Vec::new(),
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        Options::new(Console::Atari2600)
    }
}

/// An inclusive absolute address range.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AddressRange {
    pub start: u16,
    pub end: u16,
}

/// The parsed config file: `[[data]]` and `[[gfx]]` tables of address
/// ranges, e.g.
///
/// ```toml
/// [[gfx]]
/// start = 0xF500
/// end = 0xF5FF
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub data: Vec<AddressRange>,
    #[serde(default)]
    pub gfx: Vec<AddressRange>,
}

impl ConfigFile {
    pub fn parse(text: &str) -> Result<Self, String> {
        toml::from_str(text).map_err(|e| format!("Bad config file: {e}"))
    }

    pub fn load(path: &Path) -> Result<(Self, Vec<String>), String> {
        let text = fs::read_to_string(path)
            .map_err(|e| format!("Cannot read config file {}: {e}", path.display()))?;
        let parsed = Self::parse(&text)?;
        let echo = text.lines().map(|l| l.to_string()).collect();
        Ok((parsed, echo))
    }

    /// Folds the parsed ranges and echo lines into the options.
    pub fn apply(self, echo: Vec<String>, options: &mut Options) {
        options.data_ranges.extend(self.data);
        options.gfx_ranges.extend(self.gfx);
        options.config_echo = echo;
    }
}
