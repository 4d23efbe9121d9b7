pub mod bytecode;

pub use bytecode::BracketTable;

/// The closed set of instructions the vm understands.
/// Every other byte is filler and executes as a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// `>`: Move the data pointer right (wrapping)
    Increment,
    /// `<`: Move the data pointer left (wrapping)
    Decrement,

    /// `+`: Add one to the cell at the data pointer (wrapping)
    DerefIncrement,
    /// `-`: Subtract one from the cell at the data pointer (wrapping)
    DerefDecrement,

    /// `.`: Append the cell at the data pointer to the output
    Write,
    /// `,`: Pop the next input byte into the cell at the data pointer
    Read,

    /// `[`: If the cell is zero jump past the matching `]`
    JumpStart,
    /// `]`: If the cell is non-zero jump back past the matching `[`
    JumpEnd,
}

impl Opcode {
    pub const ALL: [Opcode; 8] = [
        Opcode::Increment,
        Opcode::Decrement,
        Opcode::DerefIncrement,
        Opcode::DerefDecrement,
        Opcode::Write,
        Opcode::Read,
        Opcode::JumpStart,
        Opcode::JumpEnd,
    ];

    pub fn decode(byte: u8) -> Option<Opcode> {
        match byte {
            b'>' => Some(Opcode::Increment),
            b'<' => Some(Opcode::Decrement),
            b'+' => Some(Opcode::DerefIncrement),
            b'-' => Some(Opcode::DerefDecrement),
            b'.' => Some(Opcode::Write),
            b',' => Some(Opcode::Read),
            b'[' => Some(Opcode::JumpStart),
            b']' => Some(Opcode::JumpEnd),
            _ => None,
        }
    }

    pub fn as_byte(self) -> u8 {
        match self {
            Opcode::Increment => b'>',
            Opcode::Decrement => b'<',
            Opcode::DerefIncrement => b'+',
            Opcode::DerefDecrement => b'-',
            Opcode::Write => b'.',
            Opcode::Read => b',',
            Opcode::JumpStart => b'[',
            Opcode::JumpEnd => b']',
        }
    }

    pub fn is_opcode(byte: u8) -> bool {
        Self::decode(byte).is_some()
    }
}
