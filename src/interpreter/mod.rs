pub mod bytecode_interpreter;
pub mod report;

use std::collections::VecDeque;

pub use bytecode_interpreter::{ByteCodeVM, VmState, DEFAULT_MAX_STEPS};
pub use report::ExecutionReport;

/// Number of cells on the circular memory tape
pub const TAPE_LEN: usize = 30_000;

/// Memory and I/O state the vm operates on. Each vm owns exactly one.
#[derive(Clone, Debug)]
pub struct Runtime {
    /// Pointer into the heap, always in `0..TAPE_LEN`
    data_pointer: usize,

    /// Our statically sized heap
    heap: Box<[u8; TAPE_LEN]>,

    input: VecDeque<u8>,
    output: Vec<u8>,
}

impl Runtime {
    pub fn new() -> Self {
        Self {
            data_pointer: 0,
            heap: Box::new([0; TAPE_LEN]),
            input: VecDeque::new(),
            output: vec![],
        }
    }

    /// Zero the heap, rewind the data pointer and drop any output.
    /// Pending input is kept.
    pub fn reset(&mut self) {
        self.heap.fill(0);
        self.data_pointer = 0;
        self.output.clear();
    }

    /// Pop the next input byte into the cell under the data pointer.
    /// With nothing queued the cell is left alone.
    pub fn read(&mut self) {
        if let Some(byte) = self.input.pop_front() {
            self.heap[self.data_pointer] = byte;
        }
    }

    /// Append the cell under the data pointer to the output
    pub fn write(&mut self) {
        self.output.push(self.heap[self.data_pointer]);
    }

    pub fn deref_and_add_value(&mut self, by: u8) {
        self.heap[self.data_pointer] = self.heap[self.data_pointer].wrapping_add(by);
    }

    pub fn deref_and_sub_value(&mut self, by: u8) {
        self.heap[self.data_pointer] = self.heap[self.data_pointer].wrapping_sub(by);
    }

    /// Move the data pointer, wrapping around both ends of the tape
    pub fn shift_data_pointer(&mut self, by: isize) {
        let len = TAPE_LEN as isize;
        self.data_pointer = (self.data_pointer as isize + by).rem_euclid(len) as usize;
    }

    /// is the value at the data pointer zero?
    pub fn value_is_zero(&self) -> bool {
        self.heap[self.data_pointer] == 0
    }

    pub fn data_pointer(&self) -> usize {
        self.data_pointer
    }

    pub fn heap(&self) -> &[u8] {
        &self.heap[..]
    }

    pub fn heap_mut(&mut self) -> &mut [u8] {
        &mut self.heap[..]
    }

    pub fn output(&self) -> &[u8] {
        &self.output
    }

    pub fn push_input(&mut self, bytes: &[u8]) {
        self.input.extend(bytes);
    }

    pub fn pending_input(&self) -> usize {
        self.input.len()
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::{Runtime, TAPE_LEN};

    #[test]
    fn data_pointer_wraps_both_ways() {
        let mut runtime = Runtime::new();
        runtime.shift_data_pointer(-1);
        assert_eq!(runtime.data_pointer(), TAPE_LEN - 1);
        runtime.shift_data_pointer(1);
        assert_eq!(runtime.data_pointer(), 0);
    }

    #[test]
    fn cells_wrap_modulo_256() {
        let mut runtime = Runtime::new();
        runtime.deref_and_sub_value(1);
        assert_eq!(runtime.heap()[0], 255);
        runtime.deref_and_add_value(1);
        assert!(runtime.value_is_zero());
    }

    #[test]
    fn read_without_input_leaves_cell() {
        let mut runtime = Runtime::new();
        runtime.heap_mut()[0] = 7;
        runtime.read();
        assert_eq!(runtime.heap()[0], 7);

        runtime.push_input(&[42, 43]);
        runtime.read();
        assert_eq!(runtime.heap()[0], 42);
        assert_eq!(runtime.pending_input(), 1);
    }

    #[test]
    fn reset_keeps_pending_input() {
        let mut runtime = Runtime::new();
        runtime.push_input(&[1]);
        runtime.deref_and_add_value(3);
        runtime.write();
        runtime.shift_data_pointer(5);
        runtime.reset();

        assert!(runtime.heap().iter().all(|c| *c == 0));
        assert_eq!(runtime.data_pointer(), 0);
        assert!(runtime.output().is_empty());
        assert_eq!(runtime.pending_input(), 1);
    }
}
