use crate::emit;
use crate::exec;
use crate::insn::CompiledRegex;
use crate::optimizer;
use crate::parse;
use crate::startpredicate;
use core::str::FromStr;

pub use crate::parse::Error;

/// Flags used to control compilation debugging.
/// The default flags compile silently with optimization enabled.
#[derive(Debug, Copy, Clone, Default)]
pub struct Flags {
    /// If set, skip the jump-coalescing pass.
    pub no_opt: bool,

    /// If set, dump the parsed tree to stderr.
    pub dump_ast: bool,

    /// If set, dump the compiled block graph to stderr.
    pub dump_blocks: bool,

    /// If set, print every instruction the VM dispatches to stderr.
    pub trace_execution: bool,
}

/// Range is used to express the extent of a match, as byte indexes into the
/// input.
pub type Range = core::ops::Range<usize>;

/// An iterator type which yields `Match`es found in an input.
pub type Matches<'r, 't> = exec::Matches<'r, 't>;

/// A capture: the matched byte slice and its start index in the input.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Capture<'t> {
    /// Start position of the capture in the input.
    pub index: usize,

    /// The captured bytes, borrowed from the input.
    pub bytes: &'t [u8],
}

/// A Match represents a portion of the input which was found to match a
/// Regex. Captures borrow from the input, so a Match cannot outlive it.
#[derive(Debug, Clone)]
pub struct Match<'t> {
    /// The total range of the match. Note this may be empty, if the regex
    /// matched an empty string.
    pub range: Range,

    /// The list of capture spans. This has length equal to the number of
    /// capture groups in the regex. A None means the group did not take
    /// part in the match (for example, it sat in a not-taken branch of an
    /// alternation).
    pub captures: Vec<Option<Range>>,

    input: &'t [u8],
}

impl<'t> Match<'t> {
    pub(crate) fn new(range: Range, captures: Vec<Option<Range>>, input: &'t [u8]) -> Self {
        Self {
            range,
            captures,
            input,
        }
    }

    /// \return the whole match as a capture.
    #[inline]
    pub fn whole(&self) -> Capture<'t> {
        Capture {
            index: self.range.start,
            bytes: &self.input[self.range.clone()],
        }
    }

    /// Access a group by index, using the convention of Python's group()
    /// function: index 0 is the whole match, index 1 the first capture
    /// group.
    #[inline]
    pub fn group(&self, idx: usize) -> Option<Capture<'t>> {
        if idx == 0 {
            return Some(self.whole());
        }
        let range = self.captures.get(idx - 1)?.clone()?;
        Some(Capture {
            index: range.start,
            bytes: &self.input[range],
        })
    }

    /// \return an iterator over all capture groups in index order; groups
    /// which did not participate yield None.
    #[inline]
    pub fn groups(&self) -> Groups<'_, 't> {
        Groups { mat: self, i: 0 }
    }

    /// Returns the range over the starting and ending byte offsets of the
    /// match in the input.
    #[inline]
    pub fn range(&self) -> Range {
        self.range.clone()
    }

    /// Returns the starting byte offset of the match in the input.
    #[inline]
    pub fn start(&self) -> usize {
        self.range.start
    }

    /// Returns the ending byte offset of the match in the input.
    #[inline]
    pub fn end(&self) -> usize {
        self.range.end
    }
}

/// An iterator over the capture groups of a [`Match`].
///
/// This struct is created by the [`groups`] method on [`Match`].
///
/// [`groups`]: struct.Match.html#method.groups
#[derive(Debug, Clone)]
pub struct Groups<'m, 't> {
    mat: &'m Match<'t>,
    i: usize,
}

impl<'t> Iterator for Groups<'_, 't> {
    type Item = Option<Capture<'t>>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.i < self.mat.captures.len() {
            self.i += 1;
            Some(self.mat.group(self.i))
        } else {
            None
        }
    }
}

/// A Regex is the compiled version of a pattern.
#[derive(Debug, Clone)]
pub struct Regex {
    cr: CompiledRegex,
}

impl Regex {
    /// Construct a regex by parsing \p pattern with the default flags.
    /// An Error may be returned if the syntax is invalid.
    /// Note that compilation is comparatively expensive; prefer to cache a
    /// Regex which is intended to be used more than once.
    #[inline]
    pub fn new(pattern: &str) -> Result<Regex, Error> {
        Self::compile(pattern.as_bytes(), Flags::default())
    }

    /// Construct a regex by parsing \p pattern with \p flags.
    #[inline]
    pub fn with_flags(pattern: &str, flags: Flags) -> Result<Regex, Error> {
        Self::compile(pattern.as_bytes(), flags)
    }

    /// Construct a regex from pattern bytes, running the full pipeline:
    /// tokenize, parse, lower to blocks, coalesce jumps, and compute the
    /// start predicate.
    pub fn compile(pattern: &[u8], flags: Flags) -> Result<Regex, Error> {
        let ast = parse::parse(pattern)?;
        if flags.dump_ast {
            eprintln!("{}", ast);
        }
        let mut cr = emit::emit(&ast, flags);
        if !flags.no_opt {
            optimizer::optimize(&mut cr);
        }
        cr.start_pred = startpredicate::predicate_for_re(&cr);
        if flags.dump_blocks {
            eprintln!("{}", cr);
        }
        Ok(Regex { cr })
    }

    /// Searches \p input to find the first match.
    #[inline]
    pub fn find<'t>(&self, input: &'t [u8]) -> Option<Match<'t>> {
        self.find_iter(input).next()
    }

    /// Searches \p input, returning an iterator over non-overlapping
    /// matches. Note the result borrows both the regex `'r` and the input
    /// `'t`.
    #[inline]
    pub fn find_iter<'r, 't>(&'r self, input: &'t [u8]) -> Matches<'r, 't> {
        self.find_from(input, 0)
    }

    /// Returns an iterator over matches found in \p input starting at byte
    /// index \p start.
    #[inline]
    pub fn find_from<'r, 't>(&'r self, input: &'t [u8], start: usize) -> Matches<'r, 't> {
        exec::Matches::new(&self.cr, input, start)
    }
}

impl FromStr for Regex {
    type Err = Error;

    /// Attempts to parse a string into a regular expression
    #[inline]
    fn from_str(s: &str) -> Result<Self, Error> {
        Self::new(s)
    }
}
