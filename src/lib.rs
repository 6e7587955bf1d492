/*!

# rebyte - byte-oriented regexes with a backtracking block bytecode

This crate compiles a textual pattern into a block-structured bytecode and
executes it against byte-string inputs with a backtracking virtual machine.
It supports capture groups, character classes, greedy and lazy quantifiers,
alternation, and the `$` end-of-input anchor. The engine is byte-oriented:
`.` matches any single byte and classes describe byte sets, so it works on
arbitrary (not necessarily UTF-8) data.

# Example: test if an input contains a match

```rust
use rebyte::Regex;
let re = Regex::new(r"[0-9]+").unwrap();
assert!(re.find(b"built in 1959").is_some());
```

# Example: using capture groups

Capture groups are available in the `Match` object produced by a successful
match. A capture borrows a slice of the input together with its start
offset.

```rust
use rebyte::Regex;
let re = Regex::new(r"(\w+)@(\w+)").unwrap();
let m = re.find(b"mail fish@example please").unwrap();
assert_eq!(m.whole().bytes, &b"fish@example"[..]);
assert_eq!(m.group(1).unwrap().bytes, &b"fish"[..]);
assert_eq!(m.group(2).unwrap().bytes, &b"example"[..]);
```

# Example: iterating over matches

```rust
use rebyte::Regex;
let re = Regex::new(r"<(.+?)>").unwrap();
let starts: Vec<_> = re
    .find_iter(b"<a><b>")
    .map(|m| m.group(1).unwrap().index)
    .collect();
assert_eq!(starts, vec![1, 4]);
```

# Supported syntax

- Metacharacters `. ( ) [ ] | ? * + $ \` — `^` and `-` are literal outside
  classes
- `$` anchors to the end of the input; there is no start anchor
- Escapes `\d \D \s \S \w \W`, hex bytes `\xH`/`\xHH`, and `\` before any
  other byte for that literal byte
- Classes `[abc]`, `[^abc]`, ranges `a-z`, class escapes like `[\d]`
- Quantifiers `?`, `*`, `+`, each with a lazy form `??`, `*?`, `+?`
- `( … )` groups always capture, numbered in opening order
- Alternation `|`, binding lowest within a group

Matching is an unanchored sub-string search returning the leftmost match;
within it, quantifier greediness decides which alternative wins.

# Architecture

rebyte has a tokenizer, a parser producing an arena-backed syntax tree, a
compiler lowering the tree to a graph of instruction blocks, a
jump-coalescing pass, and a single execution backend: a classical
backtracking interpreter with an explicit saved-state stack, copy-on-write
capture data, and loop progress tracking to forbid zero-width iteration.

*/

#![warn(clippy::all)]
#![allow(clippy::match_like_matches_macro, clippy::manual_range_contains)]

pub use crate::api::*;

mod api;
mod charclasses;
mod classicalbacktrack;
mod emit;
mod exec;
mod insn;
mod ir;
mod optimizer;
mod parse;
mod startpredicate;
mod tokenizer;
mod types;
