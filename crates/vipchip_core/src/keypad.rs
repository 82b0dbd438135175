//! Keypad port: the 16-key hexadecimal keypad as a bit mask.

use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::Arc;

use bitflags::bitflags;

bitflags! {
    /// Pressed keys, bit `k` set means hex key `k` is down.
    #[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
    pub struct PadKeys: u16 {
        const KEY_0 = 0x0001;
        const KEY_1 = 0x0002;
        const KEY_2 = 0x0004;
        const KEY_3 = 0x0008;
        const KEY_4 = 0x0010;
        const KEY_5 = 0x0020;
        const KEY_6 = 0x0040;
        const KEY_7 = 0x0080;
        const KEY_8 = 0x0100;
        const KEY_9 = 0x0200;
        const KEY_A = 0x0400;
        const KEY_B = 0x0800;
        const KEY_C = 0x1000;
        const KEY_D = 0x2000;
        const KEY_E = 0x4000;
        const KEY_F = 0x8000;
    }
}

impl PadKeys {
    /// Mask for a single hex key; `None` past `0xF`.
    pub fn key(index: u8) -> Option<PadKeys> {
        (index < 0x10).then(|| PadKeys::from_bits_retain(1 << index))
    }

    pub fn is_pressed(self, index: u8) -> bool {
        PadKeys::key(index).is_some_and(|key| self.contains(key))
    }

    /// Lowest-numbered pressed key.
    pub fn lowest(self) -> Option<u8> {
        (!self.is_empty()).then(|| self.bits().trailing_zeros() as u8)
    }
}

/// Source of the current key state, sampled once per interpreter cycle.
pub trait Keypad {
    fn state(&self) -> PadKeys;
}

impl<K: Keypad + ?Sized> Keypad for &K {
    fn state(&self) -> PadKeys {
        (**self).state()
    }
}

impl<K: Keypad + ?Sized> Keypad for Arc<K> {
    fn state(&self) -> PadKeys {
        (**self).state()
    }
}

/// A fixed key state.
impl Keypad for PadKeys {
    fn state(&self) -> PadKeys {
        *self
    }
}

/// Key state cell that can be written from one thread (input handling) and
/// sampled from another (the interpreter).
#[derive(Debug, Default)]
pub struct SharedKeypad {
    state: AtomicU16,
}

impl SharedKeypad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, keys: PadKeys) {
        self.state.store(keys.bits(), Ordering::Relaxed);
    }

    pub fn press(&self, index: u8) {
        if let Some(key) = PadKeys::key(index) {
            self.state.fetch_or(key.bits(), Ordering::Relaxed);
        }
    }

    pub fn release(&self, index: u8) {
        if let Some(key) = PadKeys::key(index) {
            self.state.fetch_and(!key.bits(), Ordering::Relaxed);
        }
    }

    pub fn release_all(&self) {
        self.set(PadKeys::empty());
    }
}

impl Keypad for SharedKeypad {
    fn state(&self) -> PadKeys {
        PadKeys::from_bits_retain(self.state.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_masks_follow_hex_index() {
        assert_eq!(PadKeys::key(0x0), Some(PadKeys::KEY_0));
        assert_eq!(PadKeys::key(0xA), Some(PadKeys::KEY_A));
        assert_eq!(PadKeys::key(0x10), None);
    }

    #[test]
    fn lowest_pressed_key() {
        assert_eq!(PadKeys::empty().lowest(), None);
        assert_eq!((PadKeys::KEY_7 | PadKeys::KEY_C).lowest(), Some(0x7));
        assert_eq!(PadKeys::KEY_F.lowest(), Some(0xF));
    }

    #[test]
    fn shared_keypad_press_and_release() {
        let keypad = Arc::new(SharedKeypad::new());
        keypad.press(0x3);
        keypad.press(0xE);
        assert_eq!(keypad.state(), PadKeys::KEY_3 | PadKeys::KEY_E);
        assert!(keypad.state().is_pressed(0xE));

        keypad.release(0x3);
        assert_eq!(keypad.state(), PadKeys::KEY_E);
        assert!(!keypad.state().is_pressed(0x3));
        assert!(!keypad.state().is_pressed(0x42));

        keypad.release_all();
        assert!(keypad.state().is_empty());
    }
}
