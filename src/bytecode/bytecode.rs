use std::collections::HashMap;

/// Bidirectional map between the positions of matching `[` and `]`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BracketTable {
    pairs: HashMap<usize, usize>,
    /// set when the scan stopped at a `]` with nothing to close
    aborted_at: Option<usize>,
}

impl BracketTable {
    /// Single left-to-right scan with a stack of pending `[` positions.
    ///
    /// A stray `]` stops the scan where it stands, so any brackets after it stay
    /// unpaired. Unclosed `[` are simply left out of the table.
    pub fn build(program: &[u8]) -> Self {
        let mut pairs = HashMap::new();
        let mut stack = vec![];

        for (i, byte) in program.iter().enumerate() {
            match byte {
                b'[' => stack.push(i),
                b']' => match stack.pop() {
                    Some(start) => {
                        pairs.insert(start, i);
                        pairs.insert(i, start);
                    }
                    None => {
                        return Self {
                            pairs,
                            aborted_at: Some(i),
                        }
                    }
                },
                _ => {}
            }
        }

        Self {
            pairs,
            aborted_at: None,
        }
    }

    /// The matching bracket for the bracket at `pc`, if one was recorded
    pub fn partner(&self, pc: usize) -> Option<usize> {
        self.pairs.get(&pc).copied()
    }

    /// Number of matched pairs
    pub fn len(&self) -> usize {
        self.pairs.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Position of the unmatched `]` that stopped the scan, if any
    pub fn aborted_at(&self) -> Option<usize> {
        self.aborted_at
    }
}
