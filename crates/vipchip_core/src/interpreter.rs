use std::io::Read;
use std::ops::Range;

use crate::config::Config;
use crate::display::Display;
use crate::keypad::{Keypad, PadKeys};
use crate::snapshot::Snapshot;
use crate::timing;
use crate::{
    Fault, FLAG_REGISTER, FONT, FONT_OFFSET, FONT_SIZE, INSTRUCTION_WIDTH, MAX_MEMORY_SIZE,
    MIN_MEMORY_SIZE, PROGRAM_START, REGISTER_COUNT, STACK_DEPTH,
};

mod alu;
mod dispatch;
mod rng;
mod sprite;
mod timer;


use dispatch::Opcode;
use timer::CountdownTimer;

const TIMER_DELAY: usize = 0;
const TIMER_SOUND: usize = 1;

/// Sound timer value held while a key is down during `FX0A`.
const KEY_WAIT_TONE: u8 = 4;

/// Whether the interpreter is executing or parked in `FX0A`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RunState {
    Running,
    AwaitingKey,
}

/// CHIP-8 interpreter bound to a display and a keypad.
///
/// The interpreter is a plain synchronous state machine: the host calls
/// [`Interpreter::do_cycle`] repeatedly from one thread and uses the returned
/// cost to pace itself. Faults are never panics; they are recorded and gate
/// further cycles until the next reset.
pub struct Interpreter<D, K> {
    display: D,
    keypad: K,
    config: Config,
    fault: Option<Fault>,
    timers: [CountdownTimer; 2],
    /// Clocks accumulated since the last reset.
    cycles: u64,
    /// Stack pointer; `STACK_DEPTH` means empty, `CALL` counts down.
    sp: usize,
    /// Register waiting for a key release because of `FX0A`.
    key_halt: Option<usize>,
    /// Last non-empty key state observed during the wait.
    key_latch: PadKeys,
    /// Key state sampled at the start of the current cycle.
    kb: PadKeys,
    index: u16,
    pc: u16,
    seed: u16,
    stack: [u16; STACK_DEPTH],
    registers: [u8; REGISTER_COUNT],
    memory: Box<[u8]>,
}

impl<D: Display, K: Keypad> Interpreter<D, K> {
    /// Create an interpreter with no program loaded.
    ///
    /// The fail state starts as [`Fault::NoProgram`]; load a program with
    /// [`Interpreter::reset`] or [`Interpreter::reset_from_reader`].
    pub fn new(display: D, keypad: K, config: Config) -> Self {
        let memory_size = config.memory_size.clamp(MIN_MEMORY_SIZE, MAX_MEMORY_SIZE);
        if memory_size != config.memory_size {
            log::warn!(
                "memory size {:#X} out of range, using {:#X}",
                config.memory_size,
                memory_size
            );
        }
        let config = Config {
            memory_size,
            ..config
        };
        let mut interpreter = Self {
            display,
            keypad,
            fault: None,
            timers: [CountdownTimer::default(); 2],
            cycles: 0,
            sp: STACK_DEPTH,
            key_halt: None,
            key_latch: PadKeys::empty(),
            kb: PadKeys::empty(),
            index: 0,
            pc: PROGRAM_START,
            seed: config.seed,
            stack: [0; STACK_DEPTH],
            registers: [0; REGISTER_COUNT],
            memory: vec![0; memory_size].into_boxed_slice(),
            config,
        };
        // Nothing to load yet; this records NoProgram.
        let _ = interpreter.reset(&[]);
        interpreter
    }

    /// Reinitialize all state and load `program` at [`PROGRAM_START`].
    ///
    /// The outcome is both returned and recorded in the fail state. On
    /// failure the program area stays zero-filled and the display blank.
    pub fn reset(&mut self, program: &[u8]) -> Result<(), Fault> {
        self.reset_state();

        let outcome = check_program(program.len(), self.capacity());
        if outcome.is_ok() {
            let start = usize::from(PROGRAM_START);
            self.memory[start..start + program.len()].copy_from_slice(program);
        }

        match outcome {
            Ok(()) => log::debug!(
                "loaded {} byte program ({} bytes free)",
                program.len(),
                self.capacity() - program.len()
            ),
            Err(fault) => {
                log::warn!("program of {} bytes rejected: {fault}", program.len());
                self.fault = Some(fault);
            }
        }
        outcome
    }

    /// Like [`Interpreter::reset`], reading the program from a stream.
    ///
    /// At most one byte more than fits is read, so oversized streams are
    /// rejected without being consumed to the end. A read error ends the
    /// stream; whatever arrived before it counts as the program.
    pub fn reset_from_reader<R: Read>(&mut self, reader: R) -> Result<(), Fault> {
        let limit = self.capacity() as u64 + 1;
        let mut program = Vec::with_capacity(self.capacity());
        if let Err(err) = reader.take(limit).read_to_end(&mut program) {
            log::warn!("program stream failed after {} bytes: {err}", program.len());
        }
        self.reset(&program)
    }

    fn reset_state(&mut self) {
        self.memory.fill(0);
        let font = usize::from(FONT_OFFSET);
        self.memory[font..font + FONT_SIZE].copy_from_slice(&FONT);

        self.fault = None;
        self.timers = [CountdownTimer::default(); 2];
        self.cycles = 0;
        self.sp = STACK_DEPTH;
        self.key_halt = None;
        self.key_latch = PadKeys::empty();
        self.kb = PadKeys::empty();
        self.index = 0;
        self.pc = PROGRAM_START;
        self.seed = self.config.seed;
        self.stack = [0; STACK_DEPTH];
        self.registers = [0; REGISTER_COUNT];

        self.clear_display();
    }

    /// Bytes available for a program.
    pub fn capacity(&self) -> usize {
        self.memory.len() - usize::from(PROGRAM_START)
    }

    /// Run one cycle and return its cost in clocks.
    ///
    /// Returns 0 without touching any state while a fault is pending.
    pub fn do_cycle(&mut self) -> u32 {
        if !self.is_ok() {
            return 0;
        }

        self.kb = self.keypad.state();

        let cost = match self.key_halt {
            Some(register) => {
                self.poll_key(register);
                timing::clocks(timing::KEY_POLL)
            }
            None => match self.step() {
                Ok(machine_cycles) => timing::clocks(timing::FETCH + machine_cycles),
                Err(fault) => {
                    self.fail(fault);
                    timing::clocks(timing::FETCH)
                }
            },
        };

        self.seed = self.seed.wrapping_add(1);
        self.cycles += u64::from(cost);
        self.refresh_timers();

        cost
    }

    fn step(&mut self) -> Result<u32, Fault> {
        let opcode = self.fetch()?;
        log::trace!("{:03X}: {opcode}", self.pc - INSTRUCTION_WIDTH);

        let cost = self.execute(opcode)?;
        if usize::from(self.pc) >= self.memory.len() {
            return Err(Fault::IndexOutOfBounds);
        }
        Ok(cost)
    }

    fn fetch(&mut self) -> Result<Opcode, Fault> {
        let pc = usize::from(self.pc);
        let bytes = self
            .memory
            .get(pc..pc + usize::from(INSTRUCTION_WIDTH))
            .ok_or(Fault::IndexOutOfBounds)?;
        let opcode = Opcode(u16::from_be_bytes([bytes[0], bytes[1]]));
        self.pc += INSTRUCTION_WIDTH;
        Ok(opcode)
    }

    /// Resolve `FX0A` on a press-then-release edge.
    fn poll_key(&mut self, register: usize) {
        if self.kb.is_empty() {
            if let Some(key) = self.key_latch.lowest() {
                log::debug!("key {key:X} released into V{register:X}");
                self.registers[register] = key;
                self.key_halt = None;
                self.key_latch = PadKeys::empty();
            }
        } else {
            self.key_latch = self.kb;
            if self.config.key_wait_tone {
                self.timers[TIMER_SOUND].sustain(KEY_WAIT_TONE, self.cycles);
            }
        }
    }

    fn refresh_timers(&mut self) {
        for timer in &mut self.timers {
            timer.refresh(self.cycles);
        }
    }

    fn fail(&mut self, fault: Fault) {
        log::error!(
            "{fault} at {:#05X} after {} cycles",
            self.pc.wrapping_sub(INSTRUCTION_WIDTH),
            self.cycles
        );
        self.fault = Some(fault);
    }

    fn push(&mut self, value: u16) -> Result<(), Fault> {
        if self.sp == 0 {
            return Err(Fault::StackOverflow);
        }
        self.sp -= 1;
        self.stack[self.sp] = value;
        Ok(())
    }

    fn pop(&mut self) -> Result<u16, Fault> {
        if self.sp >= STACK_DEPTH {
            return Err(Fault::StackUnderflow);
        }
        let value = self.stack[self.sp];
        self.sp += 1;
        Ok(value)
    }

    /// Memory range `[start, start + len)`, if it lies inside memory.
    fn memory_range(&self, start: u16, len: usize) -> Result<Range<usize>, Fault> {
        let start = usize::from(start);
        let end = start + len;
        if end > self.memory.len() {
            return Err(Fault::IndexOutOfBounds);
        }
        Ok(start..end)
    }

    /// VF is always written after the data register, so a flag-producing
    /// instruction targeting VF ends up holding the flag.
    #[inline]
    fn set_flag(&mut self, flag: u8) {
        self.registers[FLAG_REGISTER] = flag;
    }

    pub fn last_error(&self) -> Option<Fault> {
        self.fault
    }

    pub fn is_ok(&self) -> bool {
        self.fault.is_none()
    }

    pub fn is_playing_sound(&self) -> bool {
        self.timers[TIMER_SOUND].is_running()
    }

    pub fn is_key_awaited(&self) -> bool {
        self.key_halt.is_some()
    }

    pub fn is_frame_updated(&self) -> bool {
        self.display.is_invalid()
    }

    pub fn state(&self) -> RunState {
        if self.is_key_awaited() {
            RunState::AwaitingKey
        } else {
            RunState::Running
        }
    }

    /// Clocks accumulated since the last reset.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn keypad(&self) -> &K {
        &self.keypad
    }

    /// Read-only view of the machine state.
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            registers: &self.registers,
            stack: &self.stack,
            memory: &self.memory,
            pc: self.pc,
            index: self.index,
            sp: self.sp,
            key_halt: self.key_halt,
            keyboard: self.kb,
            delay: self.timers[TIMER_DELAY].value(),
            sound: self.timers[TIMER_SOUND].value(),
            cycles: self.cycles,
            seed: self.seed,
        }
    }
}

fn check_program(len: usize, capacity: usize) -> Result<(), Fault> {
    if len == 0 {
        Err(Fault::NoProgram)
    } else if len < usize::from(INSTRUCTION_WIDTH) {
        Err(Fault::ProgramTooSmall)
    } else if len > capacity {
        Err(Fault::ProgramTooLarge)
    } else {
        Ok(())
    }
}
