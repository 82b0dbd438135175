use crate::display::{Display, Rect};
use crate::keypad::Keypad;
use crate::timing;
use crate::Fault;

use super::Interpreter;

/// Sprites are always one byte wide.
const SPRITE_WIDTH: usize = 8;

impl<D: Display, K: Keypad> Interpreter<D, K> {
    pub(super) fn clear_display(&mut self) {
        for row in 0..self.display.height() {
            self.display.line_mut(row, 0).fill(0x00);
        }
        self.display.invalidate();
    }

    /// `DXYN`: XOR `rows` bytes from `I` onto the screen at `(VX, VY)`.
    ///
    /// The origin wraps around the screen, the sprite itself is clipped at
    /// the right and bottom edges. VF receives 1 if any lit pixel was
    /// turned off.
    pub(super) fn draw_sprite(&mut self, x: usize, y: usize, rows: u8) -> Result<u32, Fault> {
        let rows = usize::from(rows);
        let width = self.display.width();
        let height = self.display.height();
        if rows == 0 || width == 0 || height == 0 {
            self.set_flag(0);
            return Ok(timing::draw(rows as u32));
        }
        // Checked up front so a faulting draw leaves the screen untouched.
        let source = self.memory_range(self.index, rows)?;

        let left = usize::from(self.registers[x]) % width;
        let top = usize::from(self.registers[y]) % height;
        let visible_cols = SPRITE_WIDTH.min(width - left);
        let visible_rows = rows.min(height - top);

        let mut collision = false;
        for (row, &bits) in self.memory[source].iter().take(visible_rows).enumerate() {
            let line = self.display.line_mut(top + row, left);
            for (col, pixel) in line.iter_mut().take(visible_cols).enumerate() {
                if bits & (0x80 >> col) != 0 {
                    *pixel ^= 0xFF;
                    collision |= *pixel == 0x00;
                }
            }
        }

        self.display
            .invalidate_rect(Rect::new(left, top, visible_cols, visible_rows));
        self.set_flag(u8::from(collision));
        Ok(timing::draw(rows as u32))
    }
}
