use std::fmt;

use crate::display::Display;
use crate::keypad::Keypad;
use crate::timing;
use crate::{Fault, FONT_GLYPH_HEIGHT, FONT_OFFSET, INSTRUCTION_WIDTH};

use super::{rng, Interpreter, TIMER_DELAY, TIMER_SOUND};

/// A fetched big-endian instruction word.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Opcode(pub(crate) u16);

impl Opcode {
    #[inline]
    pub(crate) fn family(self) -> u8 {
        (self.0 >> 12) as u8
    }

    #[inline]
    pub(crate) fn x(self) -> usize {
        usize::from((self.0 >> 8) & 0x0F)
    }

    #[inline]
    pub(crate) fn y(self) -> usize {
        usize::from((self.0 >> 4) & 0x0F)
    }

    #[inline]
    pub(crate) fn n(self) -> u8 {
        (self.0 & 0x0F) as u8
    }

    #[inline]
    pub(crate) fn nn(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    #[inline]
    pub(crate) fn nnn(self) -> u16 {
        self.0 & 0x0FFF
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04X}", self.0)
    }
}

impl<D: Display, K: Keypad> Interpreter<D, K> {
    /// Execute an already fetched opcode (PC points past it) and return its
    /// execution cost in machine cycles, excluding the fetch.
    pub(super) fn execute(&mut self, op: Opcode) -> Result<u32, Fault> {
        match op.family() {
            0x0 => self.exec_system(op),
            0x1 => {
                self.pc = op.nnn();
                Ok(timing::JP)
            }
            0x2 => {
                self.push(self.pc)?;
                self.pc = op.nnn();
                Ok(timing::CALL)
            }
            0x3 => Ok(self.skip_if(self.registers[op.x()] == op.nn(), timing::SKIP)),
            0x4 => Ok(self.skip_if(self.registers[op.x()] != op.nn(), timing::SKIP)),
            0x5 => self.exec_skip_registers(op, true),
            0x6 => {
                self.registers[op.x()] = op.nn();
                Ok(timing::LD_IMM)
            }
            0x7 => {
                let x = op.x();
                self.registers[x] = self.registers[x].wrapping_add(op.nn());
                Ok(timing::ADD_IMM)
            }
            0x8 => self.exec_alu(op),
            0x9 => self.exec_skip_registers(op, false),
            0xA => {
                self.index = op.nnn();
                Ok(timing::LD_I)
            }
            0xB => {
                self.pc = op.nnn() + u16::from(self.registers[0]);
                Ok(timing::JP_V0)
            }
            0xC => {
                let (value, seed) = rng::feedback(self.seed, self.pc, &self.memory);
                self.seed = seed;
                self.registers[op.x()] = value & op.nn();
                Ok(timing::RND)
            }
            0xD => self.draw_sprite(op.x(), op.y(), op.n()),
            0xE => self.exec_skip_key(op),
            _ => self.exec_misc(op),
        }
    }

    /// `00E0`, `00EE` and machine-code calls.
    fn exec_system(&mut self, op: Opcode) -> Result<u32, Fault> {
        match op.0 {
            0x00E0 => {
                self.clear_display();
                Ok(timing::CLS)
            }
            0x00EE => {
                self.pc = self.pop()?;
                Ok(timing::RET)
            }
            _ if self.config.strict => Err(Fault::UnexpectedOpcode),
            _ => {
                log::debug!("ignoring machine code call {op}");
                Ok(timing::SYS)
            }
        }
    }

    /// `5XY0` / `9XY0`.
    fn exec_skip_registers(&mut self, op: Opcode, equal: bool) -> Result<u32, Fault> {
        if op.n() != 0 {
            return Err(Fault::UnexpectedOpcode);
        }
        let same = self.registers[op.x()] == self.registers[op.y()];
        Ok(self.skip_if(same == equal, timing::SKIP_REG))
    }

    /// `EX9E` / `EXA1`. Values past `0xF` name no key and are never pressed.
    fn exec_skip_key(&mut self, op: Opcode) -> Result<u32, Fault> {
        let pressed = self.kb.is_pressed(self.registers[op.x()]);
        match op.nn() {
            0x9E => Ok(self.skip_if(pressed, timing::SKIP_KEY)),
            0xA1 => Ok(self.skip_if(!pressed, timing::SKIP_KEY)),
            _ => Err(Fault::UnexpectedOpcode),
        }
    }

    /// The `FXNN` family: timers, key wait, index arithmetic and memory blocks.
    fn exec_misc(&mut self, op: Opcode) -> Result<u32, Fault> {
        let x = op.x();
        match op.nn() {
            0x07 => {
                self.registers[x] = self.timers[TIMER_DELAY].value();
                Ok(timing::LD_DT)
            }
            0x0A => {
                // Resolved by do_cycle on the next release; a key already
                // down on this cycle counts as pressed.
                self.key_halt = Some(x);
                self.key_latch = self.kb;
                Ok(timing::WAIT_KEY)
            }
            0x15 => {
                self.timers[TIMER_DELAY].load(self.registers[x], self.cycles);
                Ok(timing::SET_TIMER)
            }
            0x18 => {
                // The VIP tone generator cannot sound for a single tick.
                let value = match self.registers[x] {
                    1 => 0,
                    v => v,
                };
                self.timers[TIMER_SOUND].load(value, self.cycles);
                Ok(timing::SET_TIMER)
            }
            0x1E => {
                self.index = self.index.wrapping_add(u16::from(self.registers[x]));
                Ok(timing::ADD_I)
            }
            0x29 => {
                let glyph = u16::from(self.registers[x] & 0x0F);
                self.index = FONT_OFFSET + glyph * FONT_GLYPH_HEIGHT;
                Ok(timing::LD_FONT)
            }
            0x33 => {
                let range = self.memory_range(self.index, 3)?;
                let value = self.registers[x];
                self.memory[range].copy_from_slice(&[value / 100, value / 10 % 10, value % 10]);
                Ok(timing::BCD)
            }
            0x55 => {
                let range = self.memory_range(self.index, x + 1)?;
                self.memory[range].copy_from_slice(&self.registers[..=x]);
                self.index = self.index.wrapping_add(x as u16 + 1);
                Ok(timing::block(x as u32 + 1))
            }
            0x65 => {
                let range = self.memory_range(self.index, x + 1)?;
                self.registers[..=x].copy_from_slice(&self.memory[range]);
                self.index = self.index.wrapping_add(x as u16 + 1);
                Ok(timing::block(x as u32 + 1))
            }
            _ => Err(Fault::UnexpectedOpcode),
        }
    }

    /// Skip the next instruction when `taken`; returns the skip cost.
    #[inline]
    fn skip_if(&mut self, taken: bool, base: u32) -> u32 {
        if taken {
            self.pc += INSTRUCTION_WIDTH;
        }
        timing::skip(base, taken)
    }
}
