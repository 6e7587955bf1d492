//! Classical backtracking execution engine

use crate::api::Match;
use crate::charclasses;
use crate::insn::{CompiledRegex, Insn};
use crate::types::BlockID;
use core::ops::Range;
use std::rc::Rc;

/// The state of the single logical thread: where it is in the block graph,
/// where it is in the input, and what it has captured.
///
/// Capture data is structurally shared with saved states on the backtrack
/// stack; `Rc::make_mut` gives copy-on-write at the first mutation, so a
/// split costs two refcount bumps instead of a deep copy.
#[derive(Debug, Clone)]
struct ThreadState {
    block: BlockID,
    pc: usize,
    pos: usize,

    /// The not-yet-tried secondary arm of the nearest enclosing split.
    next_split: Option<BlockID>,

    /// Start positions of capture groups entered but not yet exited.
    capture_stack: Rc<Vec<usize>>,

    /// Completed capture spans, by group.
    captures: Rc<Vec<Option<Range<usize>>>>,
}

impl ThreadState {
    fn initial(pos: usize, groups: usize) -> Self {
        Self {
            block: 0,
            pc: 0,
            pos,
            next_split: None,
            capture_stack: Rc::new(Vec::new()),
            captures: Rc::new(vec![None; groups]),
        }
    }
}

/// A single match attempt driver: interprets the block graph, maintaining
/// the current thread state, the backtrack stack, the loop-progress table,
/// and the start position of the unanchored search.
#[derive(Debug)]
pub(crate) struct MatchAttempter<'r, 't> {
    re: &'r CompiledRegex,
    input: &'t [u8],
    s: ThreadState,
    stack: Vec<ThreadState>,

    /// Input position at the last visit of each loop head.
    progress: Vec<Option<usize>>,

    /// Start position of the current attempt.
    match_from: usize,
}

impl<'r, 't> MatchAttempter<'r, 't> {
    pub(crate) fn new(re: &'r CompiledRegex, input: &'t [u8]) -> Self {
        Self {
            re,
            input,
            s: ThreadState::initial(0, re.groups as usize),
            stack: Vec::new(),
            progress: vec![None; re.progress_slots as usize],
            match_from: 0,
        }
    }

    /// Search for a match starting at or after \p start.
    pub(crate) fn next_match(&mut self, start: usize) -> Option<Match<'t>> {
        let first = self.re.start_pred.first_candidate(self.input, start)?;
        self.reset_at(first);
        self.run()
    }

    fn reset_at(&mut self, pos: usize) {
        self.match_from = pos;
        self.s = ThreadState::initial(pos, self.re.groups as usize);
        self.stack.clear();
    }

    /// \return the byte at the current position, or None at the end.
    #[inline(always)]
    fn peek(&self) -> Option<u8> {
        self.input.get(self.s.pos).copied()
    }

    fn run(&mut self) -> Option<Match<'t>> {
        loop {
            let insn = match self.re.blocks[self.s.block as usize]
                .insns
                .get(self.s.pc)
                .copied()
            {
                Some(insn) => insn,
                None => {
                    // Ran off the end of a block: this alternative failed.
                    if self.unwind() {
                        continue;
                    } else {
                        return None;
                    }
                }
            };
            if self.re.flags.trace_execution {
                eprintln!(
                    "block {} pc {} pos {} {:?}",
                    self.s.block, self.s.pc, self.s.pos, insn
                );
            }

            // Consume one input byte, or fail this alternative.
            macro_rules! one_byte_or_unwind {
                ($matched:expr) => {
                    if $matched {
                        self.s.pos += 1;
                        self.s.pc += 1;
                        continue;
                    } else if self.unwind() {
                        continue;
                    } else {
                        return None;
                    }
                };
            }

            // Zero-width test, or fail this alternative.
            macro_rules! test_or_unwind {
                ($ok:expr) => {
                    if $ok {
                        self.s.pc += 1;
                        continue;
                    } else if self.unwind() {
                        continue;
                    } else {
                        return None;
                    }
                };
            }

            match insn {
                Insn::Byte(b) => one_byte_or_unwind!(self.peek() == Some(b)),

                Insn::MatchAny => one_byte_or_unwind!(self.peek().is_some()),

                Insn::Digits { negate } => one_byte_or_unwind!(
                    matches!(self.peek(), Some(b) if charclasses::is_digit(b) != negate)
                ),

                Insn::Spaces { negate } => one_byte_or_unwind!(
                    matches!(self.peek(), Some(b) if charclasses::is_space(b) != negate)
                ),

                Insn::Words { negate } => one_byte_or_unwind!(
                    matches!(self.peek(), Some(b) if charclasses::is_word(b) != negate)
                ),

                Insn::ByteRange { lo, hi } => one_byte_or_unwind!(
                    matches!(self.peek(), Some(b) if lo <= b && b <= hi)
                ),

                Insn::Bracket { bracket, negate } => one_byte_or_unwind!(matches!(
                    self.peek(),
                    Some(b) if self.re.brackets[bracket as usize].matches(b) != negate
                )),

                Insn::StartOfText => test_or_unwind!(self.s.pos == 0),

                Insn::EndOfText => test_or_unwind!(self.s.pos == self.input.len()),

                Insn::Jump { target } => {
                    self.s.block = target;
                    self.s.pc = 0;
                }

                Insn::Split { primary, secondary } => {
                    // Advance past the split before saving, so a state
                    // popped from the stack resumes after it.
                    self.s.pc += 1;
                    self.stack.push(self.s.clone());
                    self.s.next_split = Some(secondary);
                    self.s.block = primary;
                    self.s.pc = 0;
                }

                Insn::BeginCaptureGroup(..) => {
                    let pos = self.s.pos;
                    Rc::make_mut(&mut self.s.capture_stack).push(pos);
                    self.s.pc += 1;
                }

                Insn::EndCaptureGroup(group) => {
                    let start = Rc::make_mut(&mut self.s.capture_stack)
                        .pop()
                        .expect("capture stack underflow");
                    let span = start..self.s.pos;
                    Rc::make_mut(&mut self.s.captures)[group as usize] = Some(span);
                    self.s.pc += 1;
                }

                Insn::Progress { id } => {
                    if self.progress[id as usize] == Some(self.s.pos) {
                        // The loop consumed nothing since the last visit;
                        // cut this path off.
                        if self.unwind() {
                            continue;
                        } else {
                            return None;
                        }
                    }
                    self.progress[id as usize] = Some(self.s.pos);
                    self.s.pc += 1;
                }

                Insn::Goal => {
                    let captures = self.s.captures.as_ref().clone();
                    return Some(Match::new(
                        self.match_from..self.s.pos,
                        captures,
                        self.input,
                    ));
                }
            }
        }
    }

    /// Failure propagation: enter a saved alternative, restart the search
    /// at the next viable position, or give up.
    /// \return false when the search is exhausted.
    fn unwind(&mut self) -> bool {
        if self.stack.is_empty() {
            // Unanchored search: restart one past the current attempt.
            match self
                .re
                .start_pred
                .first_candidate(self.input, self.match_from + 1)
            {
                Some(next) => {
                    self.reset_at(next);
                    true
                }
                None => false,
            }
        } else if let Some(secondary) = self.s.next_split.take() {
            // Enter the not-yet-tried arm of the nearest enclosing split,
            // restoring position and captures from its saved parent.
            let parent = self.stack.last().expect("stack checked non-empty");
            self.s.block = secondary;
            self.s.pc = 0;
            self.s.pos = parent.pos;
            self.s.captures = Rc::clone(&parent.captures);
            self.s.capture_stack = Rc::clone(&parent.capture_stack);
            true
        } else {
            self.s = self.stack.pop().expect("stack checked non-empty");
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Flags;
    use crate::insn::{Block, StartPredicate};

    /// A hand-assembled graph for "anchored 'a'". The parser has no surface
    /// syntax for StartOfText, but the instruction must still behave.
    fn anchored_a() -> CompiledRegex {
        let mut block = Block::default();
        block.push(Insn::StartOfText);
        block.push(Insn::Byte(b'a'));
        block.push(Insn::Goal);
        CompiledRegex {
            blocks: vec![block],
            brackets: Vec::new(),
            start_pred: StartPredicate::StartAnchored,
            progress_slots: 0,
            groups: 0,
            flags: Flags::default(),
        }
    }

    #[test]
    fn start_of_text_only_matches_at_zero() {
        let re = anchored_a();
        let mut vm = MatchAttempter::new(&re, b"abc");
        let m = vm.next_match(0).expect("should match at the start");
        assert_eq!(m.range, 0..1);

        let mut vm = MatchAttempter::new(&re, b"xab");
        assert!(vm.next_match(0).is_none());
    }

    #[test]
    fn start_of_text_fails_from_an_offset() {
        let re = anchored_a();
        let mut vm = MatchAttempter::new(&re, b"abc");
        assert!(vm.next_match(1).is_none());
    }
}
