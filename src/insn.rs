//! Bytecode instructions and blocks for a compiled regex

use crate::api::Flags;
use crate::types::{BlockID, BracketContents, BracketID, CaptureGroupID, ProgressID};
use core::fmt;
use memchr::memmem;
use smallvec::SmallVec;

/// The list of bytecode instructions.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Insn {
    /// Match a single byte.
    Byte(u8),

    /// Match any byte; emitted by '.'.
    MatchAny,

    /// Match an ASCII digit, or any other byte if negated.
    Digits { negate: bool },

    /// Match a whitespace byte, or any other byte if negated.
    Spaces { negate: bool },

    /// Match a word byte, or any other byte if negated.
    Words { negate: bool },

    /// Match a byte in the inclusive range lo..=hi.
    ByteRange { lo: u8, hi: u8 },

    /// Match the next byte against the bracket stored at the given index in
    /// the CompiledRegex; negate inverts the result.
    Bracket { bracket: BracketID, negate: bool },

    /// Succeed only at the start of the input.
    StartOfText,

    /// Succeed only at the end of the input; emitted by '$'.
    EndOfText,

    /// Enter a capture group: save the current position.
    BeginCaptureGroup(CaptureGroupID),

    /// Exit a capture group: record the span since the matching Begin.
    EndCaptureGroup(CaptureGroupID),

    /// Continue in another block.
    Jump { target: BlockID },

    /// Try the primary block first; on backtrack, the secondary.
    Split { primary: BlockID, secondary: BlockID },

    /// Abort this path if the position has not advanced since the last
    /// visit of this loop head.
    Progress { id: ProgressID },

    /// The match was successful.
    Goal,
}

/// A basic block: an ordered instruction sequence.
/// Most blocks hold one or two instructions, hence the inline storage.
#[derive(Debug, Clone, Default)]
pub struct Block {
    pub insns: SmallVec<[Insn; 4]>,
}

impl Block {
    pub fn push(&mut self, insn: Insn) {
        self.insns.push(insn);
    }
}

/// The peeled prefix start predicate.
/// This is a fast way of locating the first potential match.
#[derive(Debug, Clone)]
pub enum StartPredicate {
    /// May match at an arbitrary position.
    Arbitrary,

    /// Look for the first instance of this byte.
    Byte(u8),

    /// Look for a byte sequence.
    ByteSeq(Box<memmem::Finder<'static>>),

    /// The regex only matches at the start of the input.
    StartAnchored,
}

#[derive(Debug, Clone)]
pub struct CompiledRegex {
    /// The block graph. The entry point is block 0.
    pub blocks: Vec<Block>,

    /// The bracket contents, indexed by the value of Bracket instructions.
    pub brackets: Vec<BracketContents>,

    /// Predicate to rapidly find the first potential match.
    pub start_pred: StartPredicate,

    /// Number of loop-progress slots, used to size the VM's progress table.
    pub progress_slots: u32,

    /// Number of capture groups.
    pub groups: u16,

    /// Flags controlling debug output.
    pub flags: Flags,
}

impl fmt::Display for CompiledRegex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (idx, block) in self.blocks.iter().enumerate() {
            writeln!(f, "block {}:", idx)?;
            for (pc, insn) in block.insns.iter().enumerate() {
                writeln!(f, "  {}: {:?}", pc, insn)?;
            }
        }
        Ok(())
    }
}
