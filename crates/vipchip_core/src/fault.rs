use std::fmt;

/// Reasons the interpreter refuses to keep cycling.
///
/// A fault is recorded at the offending access (or at load time) and stays
/// in place until the next successful reset.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Fault {
    /// Nothing was loaded, or the program was empty.
    NoProgram,
    /// The program is shorter than one instruction.
    ProgramTooSmall,
    /// The program does not fit between the program start and the end of memory.
    ProgramTooLarge,
    /// `CALL` with every stack slot in use.
    StackOverflow,
    /// `RET` with an empty stack.
    StackUnderflow,
    /// A fetch, draw, load or store touched memory past its end.
    IndexOutOfBounds,
    /// A byte pattern that is not an instruction of its family.
    UnexpectedOpcode,
}

impl Fault {
    /// Whether the fault was raised while loading rather than executing.
    pub fn is_load_fault(self) -> bool {
        matches!(
            self,
            Fault::NoProgram | Fault::ProgramTooSmall | Fault::ProgramTooLarge
        )
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Fault::NoProgram => "no program loaded",
            Fault::ProgramTooSmall => "program is smaller than one instruction",
            Fault::ProgramTooLarge => "program does not fit into memory",
            Fault::StackOverflow => "stack overflow",
            Fault::StackUnderflow => "stack underflow",
            Fault::IndexOutOfBounds => "memory access out of bounds",
            Fault::UnexpectedOpcode => "unexpected opcode",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for Fault {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_faults_are_told_apart() {
        assert!(Fault::NoProgram.is_load_fault());
        assert!(Fault::ProgramTooLarge.is_load_fault());
        assert!(!Fault::StackOverflow.is_load_fault());
        assert_eq!(Fault::StackUnderflow.to_string(), "stack underflow");
    }
}
