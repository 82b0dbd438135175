//! Display port: a byte-per-pixel monochrome framebuffer with dirty
//! rectangle tracking.
//!
//! Lit pixels hold `0xFF`, dark pixels `0x00`. The interpreter only ever
//! XORs rows in place and marks what it touched; presenting the frame and
//! calling [`Display::validate`] afterwards is up to the host.

use crate::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Axis-aligned region of the framebuffer, in pixels.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: usize,
    pub y: usize,
    pub w: usize,
    pub h: usize,
}

impl Rect {
    pub const fn new(x: usize, y: usize, w: usize, h: usize) -> Self {
        Rect { x, y, w, h }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    #[inline]
    pub fn right(&self) -> usize {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> usize {
        self.y + self.h
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect {
            x,
            y,
            w: self.right().max(other.right()) - x,
            h: self.bottom().max(other.bottom()) - y,
        }
    }

    /// Clip to a `width` x `height` surface anchored at the origin.
    pub fn clip(&self, width: usize, height: usize) -> Rect {
        let x = self.x.min(width);
        let y = self.y.min(height);
        Rect {
            x,
            y,
            w: self.right().min(width) - x,
            h: self.bottom().min(height) - y,
        }
    }
}

/// Framebuffer the interpreter draws into.
pub trait Display {
    fn width(&self) -> usize;
    fn height(&self) -> usize;

    /// Size of the framebuffer in bytes.
    fn area(&self) -> usize {
        self.width() * self.height()
    }

    /// Row `row`, starting at column `offset`, up to the right edge.
    fn line(&self, row: usize, offset: usize) -> &[u8];

    /// Writable view of row `row`, starting at column `offset`.
    fn line_mut(&mut self, row: usize, offset: usize) -> &mut [u8];

    /// Mark the whole framebuffer dirty.
    fn invalidate(&mut self) {
        let rect = Rect::new(0, 0, self.width(), self.height());
        self.invalidate_rect(rect);
    }

    /// Mark a region dirty. Pending dirty regions accumulate until the
    /// display is validated.
    fn invalidate_rect(&mut self, rect: Rect);

    /// The accumulated dirty region, if any.
    fn invalid_area(&self) -> Option<Rect>;

    fn is_invalid(&self) -> bool {
        self.invalid_area().is_some()
    }

    /// Forget the dirty region after the host presented it.
    fn validate(&mut self);
}

impl<D: Display + ?Sized> Display for &mut D {
    fn width(&self) -> usize {
        (**self).width()
    }

    fn height(&self) -> usize {
        (**self).height()
    }

    fn area(&self) -> usize {
        (**self).area()
    }

    fn line(&self, row: usize, offset: usize) -> &[u8] {
        (**self).line(row, offset)
    }

    fn line_mut(&mut self, row: usize, offset: usize) -> &mut [u8] {
        (**self).line_mut(row, offset)
    }

    fn invalidate(&mut self) {
        (**self).invalidate()
    }

    fn invalidate_rect(&mut self, rect: Rect) {
        (**self).invalidate_rect(rect)
    }

    fn invalid_area(&self) -> Option<Rect> {
        (**self).invalid_area()
    }

    fn is_invalid(&self) -> bool {
        (**self).is_invalid()
    }

    fn validate(&mut self) {
        (**self).validate()
    }
}

/// Default single-buffered framebuffer.
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
    dirty: Option<Rect>,
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new(SCREEN_WIDTH, SCREEN_HEIGHT)
    }
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
            dirty: None,
        }
    }

    /// All pixels, row-major.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.pixels[y * self.width + x] != 0
    }

    /// Number of lit pixels.
    pub fn lit(&self) -> usize {
        self.pixels.iter().filter(|&&p| p != 0).count()
    }
}

impl Display for FrameBuffer {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn line(&self, row: usize, offset: usize) -> &[u8] {
        let start = row * self.width;
        &self.pixels[start + offset..start + self.width]
    }

    fn line_mut(&mut self, row: usize, offset: usize) -> &mut [u8] {
        let start = row * self.width;
        &mut self.pixels[start + offset..start + self.width]
    }

    fn invalidate_rect(&mut self, rect: Rect) {
        let rect = rect.clip(self.width, self.height);
        if rect.is_empty() {
            return;
        }
        self.dirty = Some(match self.dirty {
            Some(dirty) => dirty.union(&rect),
            None => rect,
        });
    }

    fn invalid_area(&self) -> Option<Rect> {
        self.dirty
    }

    fn validate(&mut self) {
        self.dirty = None;
    }
}
