use std::sync::Arc;

use vipchip_common::render::{self, Palette};
use vipchip_core::{Config, Display, Fault, FrameBuffer, Interpreter, Rect, SharedKeypad};

use crate::keyscript::KeyScript;
use crate::HostConfig;

pub type HostInterpreter = Interpreter<FrameBuffer, Arc<SharedKeypad>>;

/// What happened during one [`Session::run_frame`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FrameReport {
    /// Zero-based frame number.
    pub frame: u64,
    /// Clocks spent; at least the frame budget unless the core faulted.
    pub cycles: u64,
    /// Whether the tone is on at the end of the frame.
    pub sound: bool,
    /// Region copied to the screen surface, if anything changed.
    pub presented: Option<Rect>,
    pub fault: Option<Fault>,
}

/// Headless host: runs the interpreter in frame sized slices and keeps
/// an RGB24 copy of the screen.
pub struct Session {
    interpreter: HostInterpreter,
    keypad: Arc<SharedKeypad>,
    script: KeyScript,
    palette: Palette,
    cycles_per_frame: u32,
    frame: u64,
    screen: Vec<u8>,
}

impl Session {
    pub fn new(config: Config, host: &HostConfig) -> Self {
        let keypad = Arc::new(SharedKeypad::new());
        let interpreter = Interpreter::new(FrameBuffer::default(), Arc::clone(&keypad), config);

        let mut screen = Vec::with_capacity(render::rgb24_len(interpreter.display()));
        for _ in 0..interpreter.display().area() {
            screen.extend_from_slice(&host.palette.off.to_rgb24());
        }

        Self {
            interpreter,
            keypad,
            script: host.keys.clone(),
            palette: host.palette,
            cycles_per_frame: host.cycles_per_frame,
            frame: 0,
            screen,
        }
    }

    /// Load a program and restart from frame 0.
    pub fn load(&mut self, rom: &[u8]) -> Result<(), Fault> {
        self.frame = 0;
        self.keypad.release_all();
        self.interpreter.reset(rom)
    }

    pub fn run_frame(&mut self) -> FrameReport {
        if let Some(keys) = self.script.keys_at(self.frame) {
            log::debug!("frame {}: keys {:?}", self.frame, keys);
            self.keypad.set(keys);
        }

        let budget = u64::from(self.cycles_per_frame);
        let mut cycles = 0;
        while cycles < budget && self.interpreter.is_ok() {
            cycles += u64::from(self.interpreter.do_cycle());
        }

        let presented = self.present();
        let report = FrameReport {
            frame: self.frame,
            cycles,
            sound: self.interpreter.is_playing_sound(),
            presented,
            fault: self.interpreter.last_error(),
        };
        self.frame += 1;
        report
    }

    fn present(&mut self) -> Option<Rect> {
        let area = self.interpreter.display().invalid_area()?;
        let written = render::blit_rgb24(
            self.interpreter.display(),
            area,
            &self.palette,
            &mut self.screen,
        );
        self.interpreter.display_mut().validate();
        Some(written)
    }

    pub fn interpreter(&self) -> &HostInterpreter {
        &self.interpreter
    }

    /// RGB24 copy of the screen as of the last presented frame.
    pub fn screen(&self) -> &[u8] {
        &self.screen
    }

    /// Number of frames run since the last load.
    pub fn frame(&self) -> u64 {
        self.frame
    }
}
