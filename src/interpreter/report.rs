use super::ByteCodeVM;

/// What callers read back from a vm after a run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExecutionReport {
    /// Instructions executed in the last run, i.e. how active the program was
    pub operations: usize,
    /// Sum over every cell of the tape
    pub memory_sum: u64,
    /// Leading cells of the tape
    pub memory_pattern: Vec<u8>,
    pub output: Vec<u8>,
}

impl ExecutionReport {
    pub const DEFAULT_PATTERN_LEN: usize = 8;

    pub fn capture(vm: &ByteCodeVM, pattern_len: usize) -> Self {
        let memory = vm.memory();
        let pattern_len = pattern_len.min(memory.len());

        Self {
            operations: vm.operation_count(),
            memory_sum: memory.iter().map(|c| u64::from(*c)).sum(),
            memory_pattern: memory[..pattern_len].to_vec(),
            output: vm.output().to_vec(),
        }
    }
}
