use thiserror::Error;

use crate::bytecode::Opcode;

pub mod lexer;

#[derive(Debug, Clone, PartialEq)]
pub enum LexerTokenKind {
    // `>`: Increment the `data pointer` by one
    Increment,
    // `<`: Decrement the `data pointer` by one
    Decrement,

    // `+`: Increment the byte at the `data pointer` by one
    DerefIncrement,
    // `-`: Decrement the byte at the `data pointer` by one
    DerefDecrement,

    // `.`: Append the byte at the `data pointer` to the output
    Write,
    // `,`: Read the next queued input byte into the `data pointer`
    Read,

    // `[`: If the byte at the `data pointer` is zero, jump past the matching `]`
    JumpStart,
    // `]`: If the byte at the `data pointer` is non-zero, jump back past the matching `[`
    JumpEnd,

    // End of program: no more tokens left
    EOF,

    // A run of filler bytes, these double as genome padding
    Comment(Vec<u8>),
}

impl From<Opcode> for LexerTokenKind {
    fn from(op: Opcode) -> Self {
        match op {
            Opcode::Increment => LexerTokenKind::Increment,
            Opcode::Decrement => LexerTokenKind::Decrement,
            Opcode::DerefIncrement => LexerTokenKind::DerefIncrement,
            Opcode::DerefDecrement => LexerTokenKind::DerefDecrement,
            Opcode::Write => LexerTokenKind::Write,
            Opcode::Read => LexerTokenKind::Read,
            Opcode::JumpStart => LexerTokenKind::JumpStart,
            Opcode::JumpEnd => LexerTokenKind::JumpEnd,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LexerToken {
    pub kind: LexerTokenKind,
    /// Byte offset of the token's first byte in the program
    pub offset: usize,
    pub line: usize,
    pub col: usize,
}

#[derive(Error, Debug)]
pub enum LexerError {
    #[error("Can't find other symbol ({other:}) for {symbol:} at byte {offset:}")]
    MisbalancedSymbol {
        symbol: char,
        other: char,
        offset: usize,
    },
}
