//! Line Editor
//!
//! Assembles one line of input from the bytes the control loop drains out
//! of the receive queue. Only digits, the restart marker, carriage return,
//! and backspace are meaningful here; anything else was either filtered at
//! the receive boundary or is silently ignored.

use crate::line::{LineBuffer, LINE_CAPACITY};
use crate::{BACKSPACE_BYTE, RESTART_MARKER, SUBMIT_BYTE};
use tracing::debug;

/// Outcome of feeding one byte to the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedResult {
    /// Byte is not part of the line grammar; nothing to do
    Ignored,
    /// Byte was applied to the line; echo it back verbatim
    Echo(u8),
    /// The line is complete. `echo` is still echoed; `overflow` marks
    /// completion by capacity exhaustion rather than carriage return.
    Completed { echo: u8, overflow: bool },
}

/// Editor assembling the current input line
pub struct LineEditor {
    line: LineBuffer,
}

impl LineEditor {
    /// Create an editor with an empty line
    pub fn new() -> Self {
        Self {
            line: LineBuffer::new(),
        }
    }

    /// Feed one received byte.
    ///
    /// Completion happens on carriage return, or when storing the byte
    /// would exhaust the buffer: the terminator slot reclaims that byte, so
    /// it is echoed but not kept, and the completion is flagged as an
    /// overflow.
    pub fn feed(&mut self, byte: u8) -> FeedResult {
        match byte {
            BACKSPACE_BYTE => {
                if self.line.backspace() {
                    FeedResult::Echo(BACKSPACE_BYTE)
                } else {
                    FeedResult::Ignored
                }
            }
            b'0'..=b'9' | RESTART_MARKER | SUBMIT_BYTE => {
                if self.line.len() == LINE_CAPACITY - 1 {
                    debug!(len = self.line.len(), "line completed by overflow");
                    return FeedResult::Completed {
                        echo: byte,
                        overflow: true,
                    };
                }
                if byte == SUBMIT_BYTE {
                    return FeedResult::Completed {
                        echo: byte,
                        overflow: false,
                    };
                }
                self.line.push(byte);
                FeedResult::Echo(byte)
            }
            _ => FeedResult::Ignored,
        }
    }

    /// Bytes accepted so far
    pub fn line(&self) -> &LineBuffer {
        &self.line
    }

    /// Hand off the completed line and reset for the next one
    pub fn take_line(&mut self) -> LineBuffer {
        std::mem::take(&mut self.line)
    }
}

impl Default for LineEditor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn feed_all(editor: &mut LineEditor, bytes: &[u8]) -> Option<FeedResult> {
        let mut completed = None;
        for &byte in bytes {
            let result = editor.feed(byte);
            if matches!(result, FeedResult::Completed { .. }) {
                completed = Some(result);
                break;
            }
        }
        completed
    }

    #[test]
    fn test_digits_are_stored_and_echoed() {
        let mut editor = LineEditor::new();
        assert_eq!(editor.feed(b'1'), FeedResult::Echo(b'1'));
        assert_eq!(editor.feed(b'-'), FeedResult::Echo(b'-'));
        assert_eq!(editor.feed(b'2'), FeedResult::Echo(b'2'));
        assert_eq!(editor.line().as_bytes(), b"1-2");
    }

    #[test]
    fn test_unaccepted_bytes_are_ignored() {
        let mut editor = LineEditor::new();
        assert_eq!(editor.feed(b'x'), FeedResult::Ignored);
        assert_eq!(editor.feed(b' '), FeedResult::Ignored);
        assert_eq!(editor.feed(0x1B), FeedResult::Ignored);
        assert!(editor.line().is_empty());
    }

    #[test]
    fn test_backspace_removes_last_byte() {
        let mut editor = LineEditor::new();
        editor.feed(b'1');
        editor.feed(b'2');
        assert_eq!(editor.feed(BACKSPACE_BYTE), FeedResult::Echo(BACKSPACE_BYTE));
        assert_eq!(editor.line().as_bytes(), b"1");
    }

    #[test]
    fn test_backspace_on_empty_line_is_noop() {
        let mut editor = LineEditor::new();
        assert_eq!(editor.feed(BACKSPACE_BYTE), FeedResult::Ignored);
        assert!(editor.line().is_empty());
    }

    #[test]
    fn test_submit_completes_without_storing() {
        let mut editor = LineEditor::new();
        editor.feed(b'4');
        assert_eq!(
            editor.feed(SUBMIT_BYTE),
            FeedResult::Completed {
                echo: SUBMIT_BYTE,
                overflow: false
            }
        );
        assert_eq!(editor.take_line().as_bytes(), b"4");
        assert!(editor.line().is_empty());
    }

    #[test]
    fn test_capacity_minus_one_digits_plus_submit_overflows() {
        let mut editor = LineEditor::new();
        for _ in 0..LINE_CAPACITY - 1 {
            assert!(matches!(editor.feed(b'5'), FeedResult::Echo(_)));
        }
        assert_eq!(
            editor.feed(SUBMIT_BYTE),
            FeedResult::Completed {
                echo: SUBMIT_BYTE,
                overflow: true
            }
        );
        assert_eq!(editor.take_line().len(), LINE_CAPACITY - 1);
    }

    #[test]
    fn test_shorter_line_does_not_overflow() {
        let mut editor = LineEditor::new();
        for _ in 0..LINE_CAPACITY - 2 {
            editor.feed(b'5');
        }
        assert_eq!(
            editor.feed(SUBMIT_BYTE),
            FeedResult::Completed {
                echo: SUBMIT_BYTE,
                overflow: false
            }
        );
    }

    #[test]
    fn test_overflowing_digit_is_echoed_but_dropped() {
        let mut editor = LineEditor::new();
        for _ in 0..LINE_CAPACITY - 1 {
            editor.feed(b'1');
        }
        assert_eq!(
            editor.feed(b'9'),
            FeedResult::Completed {
                echo: b'9',
                overflow: true
            }
        );
        let line = editor.take_line();
        assert_eq!(line.len(), LINE_CAPACITY - 1);
        assert!(line.as_bytes().iter().all(|&b| b == b'1'));
    }

    proptest! {
        /// The completed line equals the typed bytes minus backspaced ones.
        #[test]
        fn prop_line_is_typed_minus_backspaced(
            keys in prop::collection::vec(
                prop_oneof![
                    prop::sample::select(b"0123456789-".to_vec()),
                    Just(BACKSPACE_BYTE),
                ],
                0..100,
            )
        ) {
            let mut editor = LineEditor::new();
            let mut model: Vec<u8> = Vec::new();
            for &key in &keys {
                editor.feed(key);
                if key == BACKSPACE_BYTE {
                    model.pop();
                } else {
                    model.push(key);
                }
            }
            let completed = feed_all(&mut editor, &[SUBMIT_BYTE]);
            let completed_without_overflow = matches!(
                completed,
                Some(FeedResult::Completed { overflow: false, .. })
            );
            prop_assert!(completed_without_overflow);
            let completed_line = editor.take_line();
            prop_assert_eq!(completed_line.as_bytes(), model.as_slice());
        }
    }
}
