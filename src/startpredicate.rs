//! Start predicate computation: peel the leading literal bytes of the block
//! graph so match starts can be located with fast byte search instead of a
//! position-by-position scan.

use crate::insn::{CompiledRegex, Insn, StartPredicate};
use memchr::memmem;

/// Cap on the number of peeled prefix bytes.
const MAX_PREFIX_BYTES: usize = 16;

/// \return a predicate for rapidly locating the first potential match of
/// \p cr. Walks the entry chain collecting literal bytes; capture markers
/// are zero-width and skipped.
pub fn predicate_for_re(cr: &CompiledRegex) -> StartPredicate {
    let mut bytes = Vec::new();
    let mut block: usize = 0;
    let mut pc: usize = 0;
    let mut hops = 0;
    loop {
        match cr.blocks[block].insns.get(pc) {
            Some(&Insn::Byte(b)) if bytes.len() < MAX_PREFIX_BYTES => {
                bytes.push(b);
                pc += 1;
            }
            Some(Insn::BeginCaptureGroup(..)) | Some(Insn::EndCaptureGroup(..)) => pc += 1,
            Some(&Insn::Jump { target }) if hops < cr.blocks.len() => {
                block = target as usize;
                pc = 0;
                hops += 1;
            }
            Some(Insn::StartOfText) if bytes.is_empty() => return StartPredicate::StartAnchored,
            _ => break,
        }
    }
    match bytes.len() {
        0 => StartPredicate::Arbitrary,
        1 => StartPredicate::Byte(bytes[0]),
        _ => StartPredicate::ByteSeq(Box::new(memmem::Finder::new(&bytes).into_owned())),
    }
}

impl StartPredicate {
    /// \return the next position at or after \p from where a match could
    /// start, or None if the input is exhausted.
    pub(crate) fn first_candidate(&self, input: &[u8], from: usize) -> Option<usize> {
        if from > input.len() {
            return None;
        }
        match self {
            StartPredicate::Arbitrary => Some(from),
            &StartPredicate::Byte(b) => memchr::memchr(b, &input[from..]).map(|off| from + off),
            StartPredicate::ByteSeq(finder) => finder.find(&input[from..]).map(|off| from + off),
            StartPredicate::StartAnchored => {
                if from == 0 {
                    Some(0)
                } else {
                    None
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Flags;
    use crate::emit;
    use crate::optimizer;
    use crate::parse::parse;

    fn predicate(pattern: &str) -> StartPredicate {
        let ast = parse(pattern.as_bytes()).unwrap();
        let mut cr = emit::emit(&ast, Flags::default());
        optimizer::optimize(&mut cr);
        predicate_for_re(&cr)
    }

    #[test]
    fn peeled_prefixes() {
        assert!(matches!(predicate("abc"), StartPredicate::ByteSeq(..)));
        assert!(matches!(predicate("a+"), StartPredicate::Byte(b'a')));
        assert!(matches!(predicate("(ab)c"), StartPredicate::ByteSeq(..)));
        assert!(matches!(predicate("[ab]c"), StartPredicate::Arbitrary));
        assert!(matches!(predicate("a|b"), StartPredicate::Arbitrary));
        assert!(matches!(predicate(""), StartPredicate::Arbitrary));
    }

    #[test]
    fn candidates() {
        let p = predicate("bc");
        assert_eq!(p.first_candidate(b"abcabc", 0), Some(1));
        assert_eq!(p.first_candidate(b"abcabc", 2), Some(4));
        assert_eq!(p.first_candidate(b"ab", 0), None);
        assert_eq!(p.first_candidate(b"", 1), None);

        let arbitrary = StartPredicate::Arbitrary;
        assert_eq!(arbitrary.first_candidate(b"ab", 2), Some(2));
        assert_eq!(arbitrary.first_candidate(b"ab", 3), None);

        let anchored = StartPredicate::StartAnchored;
        assert_eq!(anchored.first_candidate(b"ab", 0), Some(0));
        assert_eq!(anchored.first_candidate(b"ab", 1), None);
    }
}
