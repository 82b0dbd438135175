use crate::display::Display;
use crate::keypad::Keypad;
use crate::timing;
use crate::Fault;

use super::dispatch::Opcode;
use super::Interpreter;

/// `a + b`; flag is 1 on overflow.
#[inline]
pub(super) fn add_with_carry(a: u8, b: u8) -> (u8, u8) {
    let (result, carry) = a.overflowing_add(b);
    (result, u8::from(carry))
}

/// `a - b`; flag is 1 when no borrow occurred.
#[inline]
pub(super) fn sub_with_borrow(a: u8, b: u8) -> (u8, u8) {
    let (result, borrow) = a.overflowing_sub(b);
    (result, u8::from(!borrow))
}

impl<D: Display, K: Keypad> Interpreter<D, K> {
    /// The `8XYN` family.
    pub(super) fn exec_alu(&mut self, op: Opcode) -> Result<u32, Fault> {
        let (x, y) = (op.x(), op.y());
        let vx = self.registers[x];
        let vy = self.registers[y];
        let profile = self.config.alu_profile;

        let (result, flag) = match op.n() {
            0x0 => (vy, None),
            0x1 => (vx | vy, None),
            0x2 => (vx & vy, None),
            0x3 => (vx ^ vy, None),
            0x4 => with_flag(add_with_carry(vx, vy)),
            0x5 => with_flag(sub_with_borrow(vx, vy)),
            0x6 => with_flag(profile.shift_right(vx, vy)),
            0x7 => with_flag(sub_with_borrow(vy, vx)),
            0xE => with_flag(profile.shift_left(vx, vy)),
            _ => return Err(Fault::UnexpectedOpcode),
        };

        self.registers[x] = result;
        if let Some(flag) = flag {
            self.set_flag(flag);
        }
        Ok(timing::ALU)
    }
}

#[inline]
fn with_flag((result, flag): (u8, u8)) -> (u8, Option<u8>) {
    (result, Some(flag))
}
