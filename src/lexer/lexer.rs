use tracing::warn;

use crate::bytecode::Opcode;

use super::{LexerError, LexerToken, LexerTokenKind};

/// Splits a program into opcodes and runs of filler bytes, checking that the
/// brackets balance along the way. The vm itself tolerates anything, this is
/// for inspecting programs.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    /** Human Readable positions in the program, counting `\n` as a line break */
    pub cur_line: usize,
    pub cur_col: usize,

    /** 'raw' offset within the program in bytes */
    pub offset: usize,

    bytes: std::iter::Peekable<std::slice::Iter<'a, u8>>,
    /// offsets of the `[` still waiting for a `]`
    open_brackets: Vec<usize>,
}

impl<'a> Lexer<'a> {
    pub fn new(bytes: &'a [u8]) -> Lexer<'a> {
        Lexer {
            cur_col: 1,
            cur_line: 1,

            offset: 0,

            bytes: bytes.iter().peekable(),
            open_brackets: vec![],
        }
    }

    fn transform_to_type(&mut self, b: u8, start: usize) -> Result<LexerTokenKind, LexerError> {
        match Opcode::decode(b) {
            Some(Opcode::JumpStart) => {
                self.open_brackets.push(start);
                Ok(LexerTokenKind::JumpStart)
            }
            Some(Opcode::JumpEnd) => {
                if self.open_brackets.pop().is_some() {
                    Ok(LexerTokenKind::JumpEnd)
                } else {
                    Err(LexerError::MisbalancedSymbol {
                        symbol: ']',
                        other: '[',
                        offset: start,
                    })
                }
            }
            Some(op) => Ok(op.into()),
            None => {
                // Simplify the filler stream down to runs
                let mut comment = vec![b];
                while let Some(next) = self.bytes.peek() {
                    if Opcode::is_opcode(**next) {
                        break;
                    }
                    if let Some(next) = self.consume_byte() {
                        comment.push(next);
                    }
                }

                Ok(LexerTokenKind::Comment(comment))
            }
        }
    }

    fn consume_byte(&mut self) -> Option<u8> {
        match self.bytes.next() {
            Some(&b) => {
                self.cur_col += 1;
                if b == b'\n' {
                    self.cur_line += 1;
                    self.cur_col = 1;
                }
                self.offset += 1;
                Some(b)
            }
            None => None,
        }
    }

    pub fn next_token(&mut self) -> Result<LexerToken, LexerError> {
        let (offset, line, col) = (self.offset, self.cur_line, self.cur_col);

        let kind = if let Some(b) = self.consume_byte() {
            self.transform_to_type(b, offset)?
        } else if let Some(open) = self.open_brackets.pop() {
            // report each unclosed `[` once, then fall through to EOF
            return Err(LexerError::MisbalancedSymbol {
                symbol: '[',
                other: ']',
                offset: open,
            });
        } else {
            LexerTokenKind::EOF
        };

        Ok(LexerToken {
            kind,
            offset,
            line,
            col,
        })
    }

    /// Every token up to EOF, stopping at the first imbalance
    pub fn collect_results(&mut self) -> Result<Vec<LexerToken>, LexerError> {
        let mut v = vec![];
        loop {
            match self.next_token() {
                Ok(LexerToken {
                    kind: LexerTokenKind::EOF,
                    ..
                }) => return Ok(v),
                Err(e) => return Err(e),
                Ok(tok) => v.push(tok),
            }
        }
    }

    /// Every token up to EOF, logging imbalances instead of stopping
    pub fn collect(&mut self) -> (Vec<LexerToken>, Vec<LexerError>) {
        let mut v = vec![];
        let mut errors = vec![];
        loop {
            match self.next_token() {
                Ok(LexerToken {
                    kind: LexerTokenKind::EOF,
                    ..
                }) => break (v, errors),
                Err(e) => {
                    warn!("{e}");
                    errors.push(e);
                }
                Ok(x) => v.push(x),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Lexer;
    use crate::lexer::{LexerError, LexerTokenKind};

    fn kinds(program: &[u8]) -> Vec<LexerTokenKind> {
        Lexer::new(program)
            .collect_results()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn groups_filler_into_runs() {
        assert_eq!(
            kinds(&[b'+', 1, 2, 3, b'>', 200]),
            vec![
                LexerTokenKind::DerefIncrement,
                LexerTokenKind::Comment(vec![1, 2, 3]),
                LexerTokenKind::Increment,
                LexerTokenKind::Comment(vec![200]),
            ]
        );
    }

    #[test]
    fn tracks_offsets_and_lines() {
        let tokens = Lexer::new(b"+\n-").collect_results().unwrap();
        assert_eq!(tokens[2].kind, LexerTokenKind::DerefDecrement);
        assert_eq!(tokens[2].offset, 2);
        assert_eq!(tokens[2].line, 2);
        assert_eq!(tokens[2].col, 1);
    }

    #[test]
    fn stray_close_is_an_error() {
        let err = Lexer::new(b"+]").collect_results().unwrap_err();
        assert!(matches!(
            err,
            LexerError::MisbalancedSymbol {
                symbol: ']',
                offset: 1,
                ..
            }
        ));
    }

    #[test]
    fn unclosed_open_is_an_error() {
        let err = Lexer::new(b"[[]").collect_results().unwrap_err();
        assert!(matches!(
            err,
            LexerError::MisbalancedSymbol {
                symbol: '[',
                offset: 0,
                ..
            }
        ));
    }

    #[test]
    fn collect_keeps_going_past_errors() {
        let (tokens, errors) = Lexer::new(b"]+[[").collect();
        assert_eq!(tokens.len(), 3);
        assert_eq!(errors.len(), 3);
    }
}
