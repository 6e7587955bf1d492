//! Execution engine bits: iteration over successive matches.

use crate::api::Match;
use crate::classicalbacktrack::MatchAttempter;
use crate::insn::CompiledRegex;

/// An iterator over the non-overlapping matches in an input.
/// Each step runs a fresh VM instance against the remaining input.
#[derive(Debug)]
pub struct Matches<'r, 't> {
    re: &'r CompiledRegex,
    input: &'t [u8],
    offset: Option<usize>,
}

impl<'r, 't> Matches<'r, 't> {
    pub(crate) fn new(re: &'r CompiledRegex, input: &'t [u8], start: usize) -> Self {
        Self {
            re,
            input,
            offset: Some(start),
        }
    }
}

impl<'t> Iterator for Matches<'_, 't> {
    type Item = Match<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.offset?;
        match MatchAttempter::new(self.re, self.input).next_match(start) {
            Some(m) => {
                // An empty match must still advance the start, or the
                // iterator would never terminate.
                self.offset = Some(if m.range.is_empty() {
                    m.range.end + 1
                } else {
                    m.range.end
                });
                Some(m)
            }
            None => {
                self.offset = None;
                None
            }
        }
    }
}
