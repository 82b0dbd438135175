//! Turning a monochrome [`Display`] into something a host can show.

use vipchip_core::{Display, Rect};

use crate::Color;

/// Bytes per pixel of an RGB24 surface.
pub const RGB24_BYTES: usize = 3;

/// Colors for lit and dark pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    pub on: Color,
    pub off: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            on: Color::VIP_GREEN,
            off: Color::VIP_BACKGROUND,
        }
    }
}

impl Palette {
    pub const fn new(on: Color, off: Color) -> Self {
        Self { on, off }
    }

    #[inline]
    pub fn color(&self, pixel: u8) -> Color {
        if pixel != 0 {
            self.on
        } else {
            self.off
        }
    }
}

/// Size in bytes of an RGB24 surface covering `display`.
pub fn rgb24_len<D: Display + ?Sized>(display: &D) -> usize {
    display.area() * RGB24_BYTES
}

/// Copy `area` of `display` into `screen`, an RGB24 surface of the same
/// dimensions as the display. Pixels outside `area` are left alone.
///
/// Returns the clipped region actually written.
pub fn blit_rgb24<D: Display + ?Sized>(
    display: &D,
    area: Rect,
    palette: &Palette,
    screen: &mut [u8],
) -> Rect {
    let width = display.width();
    let area = area.clip(width, display.height());
    if area.is_empty() || screen.len() < rgb24_len(display) {
        return Rect::default();
    }

    for row in area.y..area.bottom() {
        let line = &display.line(row, area.x)[..area.w];
        let start = (row * width + area.x) * RGB24_BYTES;
        let out = &mut screen[start..start + area.w * RGB24_BYTES];
        for (&pixel, rgb) in line.iter().zip(out.chunks_exact_mut(RGB24_BYTES)) {
            rgb.copy_from_slice(&palette.color(pixel).to_rgb24());
        }
    }
    area
}

/// Render the whole display as text, one line per row.
pub fn to_ascii<D: Display + ?Sized>(display: &D, on: char, off: char) -> String {
    let mut text = String::with_capacity((display.width() + 1) * display.height());
    for row in 0..display.height() {
        text.extend(
            display
                .line(row, 0)
                .iter()
                .map(|&pixel| if pixel != 0 { on } else { off }),
        );
        text.push('\n');
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use vipchip_core::FrameBuffer;

    fn lit(display: &mut FrameBuffer, x: usize, y: usize) {
        display.line_mut(y, x)[0] = 0xFF;
    }

    #[test]
    fn blit_writes_only_the_area() {
        let mut display = FrameBuffer::new(4, 2);
        lit(&mut display, 1, 0);
        lit(&mut display, 3, 1);

        let palette = Palette::new(Color::WHITE, Color::BLACK);
        let mut screen = vec![0x55; rgb24_len(&display)];
        let written = blit_rgb24(&display, Rect::new(0, 0, 2, 1), &palette, &mut screen);

        assert_eq!(written, Rect::new(0, 0, 2, 1));
        assert_eq!(&screen[..6], &[0, 0, 0, 255, 255, 255]);
        // Untouched outside the area.
        assert!(screen[6..].iter().all(|&b| b == 0x55));
    }

    #[test]
    fn blit_clips_to_the_display() {
        let mut display = FrameBuffer::new(4, 2);
        lit(&mut display, 3, 1);

        let mut screen = vec![0; rgb24_len(&display)];
        let written = blit_rgb24(
            &display,
            Rect::new(2, 1, 10, 10),
            &Palette::default(),
            &mut screen,
        );
        assert_eq!(written, Rect::new(2, 1, 2, 1));

        let last = screen.len() - RGB24_BYTES;
        assert_eq!(&screen[last..], &Color::VIP_GREEN.to_rgb24());
        assert_eq!(
            &screen[last - RGB24_BYTES..last],
            &Color::VIP_BACKGROUND.to_rgb24()
        );
    }

    #[test]
    fn blit_rejects_short_surfaces() {
        let display = FrameBuffer::new(4, 2);
        let mut screen = vec![0; 5];
        let written = blit_rgb24(&display, Rect::new(0, 0, 4, 2), &Palette::default(), &mut screen);
        assert!(written.is_empty());
        assert!(screen.iter().all(|&b| b == 0));
    }

    #[test]
    fn ascii_has_one_line_per_row() {
        let mut display = FrameBuffer::new(3, 2);
        lit(&mut display, 0, 0);
        lit(&mut display, 2, 1);
        assert_eq!(to_ascii(&display, '#', '.'), "#..\n..#\n");
    }
}
