//! Cycle-aware CHIP-8 interpreter core.
//!
//! The interpreter owns registers, memory, stack and timers, and drives a
//! [`Display`] and a [`Keypad`] port once per [`Interpreter::do_cycle`]
//! call. It never sleeps or measures wall time: every cycle returns an
//! abstract cost in COSMAC VIP clocks that the host uses for pacing.

pub mod config;
pub mod display;
mod fault;
pub mod interpreter;
pub mod keypad;
mod snapshot;
pub mod timing;

pub use config::{AluProfile, Config};
pub use display::{Display, FrameBuffer, Rect};
pub use fault::Fault;
pub use interpreter::{Interpreter, RunState};
pub use keypad::{Keypad, PadKeys, SharedKeypad};
pub use snapshot::Snapshot;

/// Number of general purpose registers; the last one doubles as VF.
pub const REGISTER_COUNT: usize = 0x10;
/// Index of the flag register.
pub const FLAG_REGISTER: usize = REGISTER_COUNT - 1;
/// Depth of the return address stack.
pub const STACK_DEPTH: usize = 0x20;

/// Default memory size, the full 12-bit address space.
pub const DEFAULT_MEMORY_SIZE: usize = 0x1000;
/// Largest supported memory size.
pub const MAX_MEMORY_SIZE: usize = 0x1000;
/// Programs are loaded (and start executing) here.
pub const PROGRAM_START: u16 = 0x200;
/// Every opcode is two bytes wide.
pub const INSTRUCTION_WIDTH: u16 = 2;
/// Smallest memory that can hold the font and one instruction.
pub const MIN_MEMORY_SIZE: usize = PROGRAM_START as usize + INSTRUCTION_WIDTH as usize;

/// Logical screen width in pixels.
pub const SCREEN_WIDTH: usize = 64;
/// Logical screen height in pixels.
pub const SCREEN_HEIGHT: usize = 32;

/// Where the built-in hexadecimal font lives in memory.
pub const FONT_OFFSET: u16 = 0x000;
/// Bytes per font glyph.
pub const FONT_GLYPH_HEIGHT: u16 = 5;
pub const FONT_SIZE: usize = 80;

pub const FONT: [u8; FONT_SIZE] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
