//! A tiny Brainf**k style vm for swarms of evolving programs.
//!
//! Each entity owns a [`ByteCodeVM`], loads its tape, runs it for a bounded
//! number of steps and reads back an [`ExecutionReport`].

pub mod bytecode;
pub mod genome;
pub mod interpreter;
pub mod lexer;

pub use bytecode::{BracketTable, Opcode};
pub use interpreter::{ByteCodeVM, ExecutionReport, VmState, DEFAULT_MAX_STEPS, TAPE_LEN};
