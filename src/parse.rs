//! Parser from token streams to the arena syntax tree.

use crate::ir::{Ast, Node, NodeListID};
use crate::tokenizer::{self, Token, TokenKind, TokenStream};
use crate::types::{CaptureGroupID, MAX_CAPTURE_GROUPS};
use thiserror::Error;

/// Represents an error encountered during regex compilation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The pattern is structurally invalid.
    #[error("parse error: {0}")]
    Parse(String),

    /// The pattern ends in a lone backslash.
    #[error("unterminated escape at end of pattern")]
    UnterminatedEscape,

    /// A bracket range whose end byte precedes its start byte.
    #[error("invalid range in character class")]
    InvalidRange,

    /// The token stream ran out mid-construct.
    #[error("unexpected end of pattern")]
    OutOfBounds,
}

fn error<S, T>(text: S) -> Result<T, Error>
where
    S: ToString,
{
    Err(Error::Parse(text.to_string()))
}

fn hex_digit(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        b'A'..=b'F' => b - b'A' + 10,
        _ => unreachable!("caller checked for a hex digit"),
    }
}

/// Parser state, saved and restored around '(' and '['.
#[derive(Debug, Copy, Clone)]
struct ParseState {
    /// Whether an alternation has rewritten this level.
    in_alternation: bool,

    /// Whether this level is a bracket.
    in_list: bool,

    /// Whether the bracket was opened as [^.
    negated: bool,

    /// The list holding the alternation root, when in_alternation.
    alternation_index: NodeListID,

    /// The capture group to assign when this level closes, for '(' levels.
    group: Option<CaptureGroupID>,

    /// The list new nodes are appended to.
    nodes: NodeListID,
}

impl ParseState {
    fn new(nodes: NodeListID) -> Self {
        Self {
            in_alternation: false,
            in_list: false,
            negated: false,
            alternation_index: 0,
            group: None,
            nodes,
        }
    }
}

/// Parse \p pattern into an Ast.
pub fn parse(pattern: &[u8]) -> Result<Ast, Error> {
    let toks = tokenizer::tokenize(pattern)?;
    Parser::new(toks).parse()
}

struct Parser {
    toks: TokenStream,
    ast: Ast,
    state: ParseState,
    stack: Vec<ParseState>,
    group_count: u16,
}

impl Parser {
    fn new(toks: TokenStream) -> Self {
        let mut ast = Ast::default();
        let root = ast.alloc_list();
        Self {
            toks,
            ast,
            state: ParseState::new(root),
            stack: Vec::new(),
            group_count: 0,
        }
    }

    fn parse(mut self) -> Result<Ast, Error> {
        while self.toks.available() > 0 {
            let tok = self.toks.consume()?;
            self.handle(tok)?;
        }
        if !self.stack.is_empty() {
            return if self.state.in_list {
                error("unbalanced bracket")
            } else {
                error("unbalanced parenthesis")
            };
        }
        self.ast.root = self.root_list();
        self.ast.group_count = self.group_count;
        Ok(self.ast)
    }

    /// The list a finished level should expose: the alternation root when an
    /// alternation rewrote the level, else the plain append list.
    fn root_list(&self) -> NodeListID {
        if self.state.in_alternation {
            self.state.alternation_index
        } else {
            self.state.nodes
        }
    }

    fn push_node(&mut self, node: Node) {
        self.ast.node_lists[self.state.nodes as usize].push(node);
    }

    fn handle(&mut self, tok: Token) -> Result<(), Error> {
        if self.state.in_list {
            return self.handle_in_list(tok);
        }
        match tok.kind {
            // '-' and '^' are literal outside brackets.
            TokenKind::Literal | TokenKind::Caret | TokenKind::Dash => {
                self.push_node(Node::Byte(tok.value));
                self.maybe_wrap_quantifier()
            }
            TokenKind::Dollar => {
                self.push_node(Node::EndOfText);
                self.maybe_wrap_quantifier()
            }
            TokenKind::Wildcard => {
                self.push_node(Node::MatchAny);
                self.maybe_wrap_quantifier()
            }
            TokenKind::Escaped => {
                let node = self.escaped_node(tok.value);
                self.push_node(node);
                self.maybe_wrap_quantifier()
            }
            TokenKind::LSquare => self.open_bracket(),
            TokenKind::RSquare => error("unbalanced bracket"),
            TokenKind::LParen => self.open_group(),
            TokenKind::RParen => self.close_group(),
            TokenKind::Alternation => self.begin_alternation(),
            TokenKind::ZeroOrOne | TokenKind::ZeroOrMore | TokenKind::OneOrMore => {
                error("nothing to repeat")
            }
        }
    }

    /// Interpret an escape outside a bracket.
    fn escaped_node(&mut self, value: u8) -> Node {
        match value {
            b'd' => Node::Digit { negate: false },
            b'D' => Node::Digit { negate: true },
            b's' => Node::Whitespace { negate: false },
            b'S' => Node::Whitespace { negate: true },
            b'w' => Node::Word { negate: false },
            b'W' => Node::Word { negate: true },
            b'x' => Node::Byte(self.consume_hex_byte()),
            // Any other escaped byte matches itself.
            _ => Node::Byte(value),
        }
    }

    /// Consume up to two hex-digit tokens after \x.
    /// Missing digits default the high nibble to zero.
    fn consume_hex_byte(&mut self) -> u8 {
        let mut value: u8 = 0;
        for _ in 0..2 {
            match self.toks.peek(0) {
                Some(t) if t.kind == TokenKind::Literal && t.value.is_ascii_hexdigit() => {
                    let _ = self.toks.consume();
                    value = (value << 4) | hex_digit(t.value);
                }
                _ => break,
            }
        }
        value
    }

    /// If the next token is a quantifier, consume it and wrap the most
    /// recently appended node, moving it to the orphan arena. A '?' after
    /// the quantifier selects the lazy form.
    fn maybe_wrap_quantifier(&mut self) -> Result<(), Error> {
        let kind = match self.toks.peek(0) {
            Some(t)
                if matches!(
                    t.kind,
                    TokenKind::ZeroOrOne | TokenKind::ZeroOrMore | TokenKind::OneOrMore
                ) =>
            {
                self.toks.consume()?;
                t.kind
            }
            _ => return Ok(()),
        };
        let greedy = !self.toks.try_consume(TokenKind::ZeroOrOne);
        let quantifee = match self.ast.node_lists[self.state.nodes as usize].pop() {
            Some(node) => node,
            None => return error("nothing to repeat"),
        };
        let child = self.ast.alloc_orphan(quantifee);
        let node = match kind {
            TokenKind::ZeroOrOne => Node::ZeroOrOne { child, greedy },
            TokenKind::ZeroOrMore => Node::ZeroOrMore { child, greedy },
            TokenKind::OneOrMore => Node::OneOrMore { child, greedy },
            _ => unreachable!("checked above"),
        };
        self.push_node(node);
        Ok(())
    }

    fn open_bracket(&mut self) -> Result<(), Error> {
        self.stack.push(self.state);
        let nodes = self.ast.alloc_list();
        self.state = ParseState::new(nodes);
        self.state.in_list = true;
        self.state.negated = self.toks.try_consume(TokenKind::Caret);
        Ok(())
    }

    fn handle_in_list(&mut self, tok: Token) -> Result<(), Error> {
        match tok.kind {
            TokenKind::RSquare => self.close_bracket(),
            TokenKind::Escaped => match tok.value {
                b'd' => {
                    self.push_node(Node::Digit { negate: false });
                    Ok(())
                }
                b'D' => {
                    self.push_node(Node::Digit { negate: true });
                    Ok(())
                }
                b's' => {
                    self.push_node(Node::Whitespace { negate: false });
                    Ok(())
                }
                b'S' => {
                    self.push_node(Node::Whitespace { negate: true });
                    Ok(())
                }
                b'w' => {
                    self.push_node(Node::Word { negate: false });
                    Ok(())
                }
                b'W' => {
                    self.push_node(Node::Word { negate: true });
                    Ok(())
                }
                b'x' => {
                    let b = self.consume_hex_byte();
                    self.list_byte(b)
                }
                _ => self.list_byte(tok.value),
            },
            // Any other token contributes its literal byte: [a*|(] has four
            // members.
            _ => self.list_byte(tok.value),
        }
    }

    /// Append a literal byte to the open bracket, forming a range when a
    /// dash and a viable end byte follow. A dash directly before ']' stays
    /// literal.
    fn list_byte(&mut self, lo: u8) -> Result<(), Error> {
        let is_range = matches!(self.toks.peek(0), Some(t) if t.kind == TokenKind::Dash)
            && matches!(self.toks.peek(1), Some(t) if t.kind != TokenKind::RSquare);
        if !is_range {
            self.push_node(Node::Byte(lo));
            return Ok(());
        }
        self.toks.consume()?; // the dash
        let end = self.toks.consume()?;
        let hi = self.range_end_byte(end)?;
        if hi < lo {
            return Err(Error::InvalidRange);
        }
        self.push_node(Node::ByteRange { lo, hi });
        Ok(())
    }

    /// Resolve the end token of a bracket range to a byte.
    fn range_end_byte(&mut self, tok: Token) -> Result<u8, Error> {
        match tok.kind {
            TokenKind::Escaped => match tok.value {
                b'x' => Ok(self.consume_hex_byte()),
                b'd' | b'D' | b's' | b'S' | b'w' | b'W' => {
                    error("character class is not a valid range end")
                }
                _ => Ok(tok.value),
            },
            _ => Ok(tok.value),
        }
    }

    fn close_bracket(&mut self) -> Result<(), Error> {
        let nodes = self.state.nodes;
        let negate = self.state.negated;
        if self.ast.list(nodes).is_empty() {
            return error("empty character class");
        }
        self.state = self.stack.pop().expect("bracket state was pushed");
        self.push_node(Node::Bracket { nodes, negate });
        self.maybe_wrap_quantifier()
    }

    fn open_group(&mut self) -> Result<(), Error> {
        if self.group_count as usize >= MAX_CAPTURE_GROUPS {
            return error("capture group count limit exceeded");
        }
        let group = self.group_count as CaptureGroupID;
        self.group_count += 1;
        self.stack.push(self.state);
        let nodes = self.ast.alloc_list();
        self.state = ParseState::new(nodes);
        self.state.group = Some(group);
        Ok(())
    }

    fn close_group(&mut self) -> Result<(), Error> {
        let group = match self.state.group {
            Some(g) => g,
            None => return error("unbalanced parenthesis"),
        };
        // Clone the finished level's list (the alternation root if one was
        // formed) into a fresh arena entry for the group node.
        let src = self.root_list();
        let fresh = self.ast.alloc_list();
        self.ast.node_lists[fresh as usize] = self.ast.node_lists[src as usize].clone();
        self.state = self.stack.pop().expect("group state was pushed");
        self.push_node(Node::Group {
            nodes: fresh,
            group,
        });
        self.maybe_wrap_quantifier()
    }

    /// Flat left-factoring of '|': the accumulated list becomes the left
    /// branch of an alternation node which replaces the list's contents;
    /// appends are redirected to a fresh right branch. Chained '|' repeats
    /// this on the right branch, producing a rightwards chain under the
    /// original list.
    fn begin_alternation(&mut self) -> Result<(), Error> {
        let current = self.state.nodes;
        let left = self.ast.alloc_list();
        self.ast.node_lists[left as usize] = self.ast.node_lists[current as usize].clone();
        let right = self.ast.alloc_list();
        let list = &mut self.ast.node_lists[current as usize];
        list.clear();
        list.push(Node::Alternation { left, right });
        if !self.state.in_alternation {
            self.state.in_alternation = true;
            self.state.alternation_index = current;
        }
        self.state.nodes = right;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dense_group_numbering() {
        let ast = parse(b"(a)((b)c)").unwrap();
        assert_eq!(ast.group_count, 3);
        let root = ast.list(ast.root);
        assert!(matches!(root[0], Node::Group { group: 0, .. }));
        assert!(matches!(root[1], Node::Group { group: 1, .. }));
    }

    #[test]
    fn quantified_node_moves_to_orphan_arena() {
        let ast = parse(b"ab*").unwrap();
        let root = ast.list(ast.root);
        assert_eq!(root[0], Node::Byte(b'a'));
        assert!(matches!(root[1], Node::ZeroOrMore { greedy: true, .. }));
        assert_eq!(ast.orphans.len(), 1);
        assert_eq!(ast.orphans[0], Node::Byte(b'b'));
    }

    #[test]
    fn lazy_quantifier_flag() {
        let ast = parse(b"a+?").unwrap();
        assert!(matches!(
            ast.list(ast.root)[0],
            Node::OneOrMore { greedy: false, .. }
        ));
    }

    #[test]
    fn alternation_chains_rightwards() {
        let ast = parse(b"a|b|c").unwrap();
        let root = ast.list(ast.root);
        assert_eq!(root.len(), 1);
        let (left, right) = match root[0] {
            Node::Alternation { left, right } => (left, right),
            _ => panic!("expected an alternation"),
        };
        assert_eq!(ast.list(left), &[Node::Byte(b'a')]);
        let (bleft, bright) = match ast.list(right)[0] {
            Node::Alternation { left, right } => (left, right),
            _ => panic!("expected a nested alternation"),
        };
        assert_eq!(ast.list(bleft), &[Node::Byte(b'b')]);
        assert_eq!(ast.list(bright), &[Node::Byte(b'c')]);
    }

    #[test]
    fn hex_escape_nibbles() {
        let ast = parse(br"\x41\x9").unwrap();
        assert_eq!(ast.list(ast.root), &[Node::Byte(0x41), Node::Byte(0x09)]);
    }

    #[test]
    fn class_ranges() {
        let ast = parse(b"[a-z-]").unwrap();
        let nodes = match ast.list(ast.root)[0] {
            Node::Bracket { nodes, .. } => nodes,
            _ => panic!("expected a bracket"),
        };
        assert_eq!(
            ast.list(nodes),
            &[
                Node::ByteRange { lo: b'a', hi: b'z' },
                Node::Byte(b'-'),
            ]
        );
        assert_eq!(parse(b"[z-a]").unwrap_err(), Error::InvalidRange);
    }
}
