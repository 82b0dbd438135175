use crate::keypad::PadKeys;
use crate::{FLAG_REGISTER, REGISTER_COUNT, STACK_DEPTH};

/// Read-only view of interpreter internals, for tests and debuggers.
///
/// Obtained from [`crate::Interpreter::snapshot`]; it borrows the
/// interpreter, so it always reflects a single point between cycles.
#[derive(Copy, Clone, Debug)]
pub struct Snapshot<'a> {
    pub(crate) registers: &'a [u8; REGISTER_COUNT],
    pub(crate) stack: &'a [u16; STACK_DEPTH],
    pub(crate) memory: &'a [u8],
    pub(crate) pc: u16,
    pub(crate) index: u16,
    pub(crate) sp: usize,
    pub(crate) key_halt: Option<usize>,
    pub(crate) keyboard: PadKeys,
    pub(crate) delay: u8,
    pub(crate) sound: u8,
    pub(crate) cycles: u64,
    pub(crate) seed: u16,
}

impl<'a> Snapshot<'a> {
    pub fn register(&self, index: usize) -> u8 {
        self.registers[index]
    }

    pub fn registers(&self) -> &'a [u8; REGISTER_COUNT] {
        self.registers
    }

    /// VF.
    pub fn flag(&self) -> u8 {
        self.registers[FLAG_REGISTER]
    }

    pub fn program_counter(&self) -> u16 {
        self.pc
    }

    pub fn index(&self) -> u16 {
        self.index
    }

    /// `STACK_DEPTH` when the stack is empty.
    pub fn stack_pointer(&self) -> usize {
        self.sp
    }

    /// Number of return addresses on the stack.
    pub fn stack_len(&self) -> usize {
        STACK_DEPTH - self.sp
    }

    /// Most recently pushed return address.
    pub fn stack_top(&self) -> Option<u16> {
        self.stack.get(self.sp).copied()
    }

    pub fn stack(&self) -> &'a [u16; STACK_DEPTH] {
        self.stack
    }

    pub fn key_halt_register(&self) -> Option<usize> {
        self.key_halt
    }

    /// Key state sampled by the latest cycle.
    pub fn keyboard(&self) -> PadKeys {
        self.keyboard
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound
    }

    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn seed(&self) -> u16 {
        self.seed
    }

    pub fn memory(&self) -> &'a [u8] {
        self.memory
    }

    pub fn memory_at(&self, address: u16) -> Option<u8> {
        self.memory.get(usize::from(address)).copied()
    }
}
