#![crate_name = "cartdis"]

//! Static disassembler for Atari 2600 and 7800 cartridge ROM images.
//!
//! The image is loaded and validated ([`image`]), mapped to the address
//! window its start vector implies, and then traced in three passes
//! ([`disassembler`]): reachability discovery from the cartridge vectors,
//! code/data classification, and text rendering. Operand addresses outside
//! the window resolve to the console's hardware registers ([`equates`]) or
//! to mirrors of the window ([`labels`]).

#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate lazy_static;

pub mod config;
pub mod disassembler;
pub mod equates;
pub mod image;
pub mod labels;
pub mod opcodes;

#[cfg(test)]
mod disassembler_tests;
