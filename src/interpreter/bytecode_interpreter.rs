use tracing::{debug, trace, warn};

use crate::bytecode::{BracketTable, Opcode};

use super::{ExecutionReport, Runtime};

/// Step budget used when a caller doesn't pick one
pub const DEFAULT_MAX_STEPS: usize = 1000;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VmState {
    /// Freshly constructed or just reset
    Idle,
    /// A program has been loaded but not stepped yet
    Loaded,
    Running,
    /// Code pointer ran off the program or the last run used up its budget
    Halted,
}

/// A small self-contained vm that runs raw program bytes against its own tape.
///
/// Nothing is shared between instances, so callers can keep one per entity and
/// reuse it with `reset` + `load` instead of reallocating the tape.
#[derive(Clone, Debug)]
pub struct ByteCodeVM {
    runtime: Runtime,
    program: Vec<u8>,
    brackets: BracketTable,
    pc: usize,
    operation_count: usize,
    state: VmState,
}

impl ByteCodeVM {
    pub fn new() -> Self {
        Self {
            runtime: Runtime::new(),
            program: vec![],
            brackets: BracketTable::default(),
            pc: 0,
            operation_count: 0,
            state: VmState::Idle,
        }
    }

    pub fn with_input(bytes: &[u8]) -> Self {
        let mut vm = Self::new();
        vm.push_input(bytes);
        vm
    }

    /// Clear the tape, pointers, counter and output. The loaded program and its
    /// bracket table are kept, as is any pending input.
    pub fn reset(&mut self) {
        self.runtime.reset();
        self.pc = 0;
        self.operation_count = 0;
        self.state = VmState::Idle;
    }

    /// Swap in a new program and rebuild the bracket table for it.
    /// Memory and pointers are left as they are; call `reset` first for a clean run.
    pub fn load(&mut self, program: &[u8]) {
        self.program.clear();
        self.program.extend_from_slice(program);
        self.brackets = BracketTable::build(&self.program);
        self.state = VmState::Loaded;

        debug!(
            len = self.program.len(),
            pairs = self.brackets.len(),
            aborted_at = ?self.brackets.aborted_at(),
            "loaded program"
        );
    }

    /// Execute the instruction under the code pointer.
    /// Returns false, without touching any state, once the pointer is past the end.
    pub fn step(&mut self) -> bool {
        let Some(&byte) = self.program.get(self.pc) else {
            return false;
        };
        self.operation_count += 1;

        match Opcode::decode(byte) {
            Some(Opcode::Increment) => self.runtime.shift_data_pointer(1),
            Some(Opcode::Decrement) => self.runtime.shift_data_pointer(-1),
            Some(Opcode::DerefIncrement) => self.runtime.deref_and_add_value(1),
            Some(Opcode::DerefDecrement) => self.runtime.deref_and_sub_value(1),
            Some(Opcode::Write) => self.runtime.write(),
            Some(Opcode::Read) => self.runtime.read(),
            Some(Opcode::JumpStart) => {
                if self.runtime.value_is_zero() {
                    // no partner means there's nothing to loop over, run off the end
                    self.pc = self.brackets.partner(self.pc).unwrap_or(self.program.len());
                }
            }
            Some(Opcode::JumpEnd) => {
                if !self.runtime.value_is_zero() {
                    // no partner restarts the program instead
                    self.pc = self.brackets.partner(self.pc).unwrap_or(0);
                }
            }
            None => {}
        }

        // jumps land on a bracket so this also moves us past it
        self.pc += 1;

        self.state = if self.pc >= self.program.len() {
            VmState::Halted
        } else {
            VmState::Running
        };
        true
    }

    /// Step until the program ends or `max_steps` instructions have run.
    /// Memory and pointers carry over from before; only the counter restarts.
    pub fn run(&mut self, max_steps: usize) -> usize {
        self.operation_count = 0;
        let limit = max_steps.saturating_mul(10);

        let mut steps = 0;
        while self.pc < self.program.len() && steps < max_steps {
            self.step();
            steps += 1;
            if self.operation_count > limit {
                warn!(
                    operations = self.operation_count,
                    max_steps, "operation count passed the secondary limit"
                );
                break;
            }
        }

        self.state = VmState::Halted;
        trace!(
            operations = self.operation_count,
            pc = self.pc,
            output = self.runtime.output().len(),
            "run finished"
        );
        self.operation_count
    }

    pub fn run_default(&mut self) -> usize {
        self.run(DEFAULT_MAX_STEPS)
    }

    /// The full caller cycle: reset, load, run and snapshot the result
    pub fn execute(&mut self, program: &[u8], max_steps: usize) -> ExecutionReport {
        self.reset();
        self.load(program);
        self.run(max_steps);
        ExecutionReport::capture(self, ExecutionReport::DEFAULT_PATTERN_LEN)
    }

    pub fn push_input(&mut self, bytes: &[u8]) {
        self.runtime.push_input(bytes);
    }

    pub fn memory(&self) -> &[u8] {
        self.runtime.heap()
    }

    /// Direct access to the tape, for seeding cells before a run
    pub fn memory_mut(&mut self) -> &mut [u8] {
        self.runtime.heap_mut()
    }

    pub fn data_pointer(&self) -> usize {
        self.runtime.data_pointer()
    }

    pub fn code_pointer(&self) -> usize {
        self.pc
    }

    pub fn operation_count(&self) -> usize {
        self.operation_count
    }

    pub fn output(&self) -> &[u8] {
        self.runtime.output()
    }

    pub fn program(&self) -> &[u8] {
        &self.program
    }

    pub fn bracket_table(&self) -> &BracketTable {
        &self.brackets
    }

    pub fn state(&self) -> VmState {
        self.state
    }
}

impl Default for ByteCodeVM {
    fn default() -> Self {
        Self::new()
    }
}
