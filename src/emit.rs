//! Regex compiler back-end: lowers the syntax tree into a block graph

use crate::api::Flags;
use crate::insn::{Block, CompiledRegex, Insn, StartPredicate};
use crate::ir::{Ast, Node, NodeListID, OrphanID};
use crate::types::{
    BlockID, BracketContents, BracketID, BracketItem, CaptureGroupID, CharacterClassType,
    ProgressID,
};

/// Type which wraps up the context needed to emit a CompiledRegex.
struct Emitter<'a> {
    ast: &'a Ast,
    result: CompiledRegex,

    // Number of loop-progress slots handed out so far.
    next_progress_id: ProgressID,
}

impl<'a> Emitter<'a> {
    /// Allocate a fresh empty block, returning its index.
    fn create_block(&mut self) -> BlockID {
        let id = self.result.blocks.len() as BlockID;
        self.result.blocks.push(Block::default());
        id
    }

    fn push(&mut self, block: BlockID, insn: Insn) {
        self.result.blocks[block as usize].push(insn);
    }

    fn fresh_progress_id(&mut self) -> ProgressID {
        let id = self.next_progress_id;
        self.next_progress_id += 1;
        id
    }

    /// Emit the nodes of \p list in order, starting in \p block.
    /// \return the terminal block.
    fn emit_list(&mut self, list: NodeListID, mut block: BlockID) -> BlockID {
        let ast = self.ast;
        for &node in ast.list(list) {
            block = self.emit_node(node, block);
        }
        block
    }

    /// Emit the instructions for \p node into \p current.
    /// \return the block subsequent instructions belong in.
    fn emit_node(&mut self, node: Node, current: BlockID) -> BlockID {
        match node {
            Node::Byte(b) => {
                self.push(current, Insn::Byte(b));
                current
            }
            Node::MatchAny => {
                self.push(current, Insn::MatchAny);
                current
            }
            Node::Digit { negate } => {
                self.push(current, Insn::Digits { negate });
                current
            }
            Node::Whitespace { negate } => {
                self.push(current, Insn::Spaces { negate });
                current
            }
            Node::Word { negate } => {
                self.push(current, Insn::Words { negate });
                current
            }
            Node::ByteRange { lo, hi } => {
                self.push(current, Insn::ByteRange { lo, hi });
                current
            }
            Node::EndOfText => {
                self.push(current, Insn::EndOfText);
                current
            }
            Node::Bracket { nodes, negate } => self.emit_bracket(nodes, negate, current),
            Node::Group { nodes, group } => self.emit_group(nodes, group, current),
            Node::Alternation { left, right } => self.emit_alternation(left, right, current),
            Node::ZeroOrOne { child, greedy } => self.emit_zero_or_one(child, greedy, current),
            Node::ZeroOrMore { child, greedy } => self.emit_zero_or_more(child, greedy, current),
            Node::OneOrMore { child, greedy } => self.emit_one_or_more(child, greedy, current),
        }
    }

    fn emit_bracket(&mut self, nodes: NodeListID, negate: bool, current: BlockID) -> BlockID {
        let mut contents = BracketContents::default();
        for &node in self.ast.list(nodes) {
            contents.items.push(match node {
                Node::Byte(b) => BracketItem::Byte(b),
                Node::ByteRange { lo, hi } => BracketItem::Range(lo, hi),
                Node::Digit { negate } => BracketItem::Class {
                    class_type: CharacterClassType::Digits,
                    negate,
                },
                Node::Whitespace { negate } => BracketItem::Class {
                    class_type: CharacterClassType::Spaces,
                    negate,
                },
                Node::Word { negate } => BracketItem::Class {
                    class_type: CharacterClassType::Words,
                    negate,
                },
                _ => unreachable!("node not allowed in a bracket: {:?}", node),
            });
        }
        let bracket = self.result.brackets.len() as BracketID;
        self.result.brackets.push(contents);
        let next = self.create_block();
        self.push(current, Insn::Bracket { bracket, negate });
        self.push(current, Insn::Jump { target: next });
        next
    }

    fn emit_group(
        &mut self,
        nodes: NodeListID,
        group: CaptureGroupID,
        current: BlockID,
    ) -> BlockID {
        let content = self.create_block();
        let end_cap = self.create_block();
        let next = self.create_block();
        self.push(current, Insn::BeginCaptureGroup(group));
        self.push(current, Insn::Jump { target: content });
        let terminal = self.emit_list(nodes, content);
        self.push(terminal, Insn::Jump { target: end_cap });
        self.push(end_cap, Insn::EndCaptureGroup(group));
        self.push(end_cap, Insn::Jump { target: next });
        next
    }

    fn emit_alternation(
        &mut self,
        left_list: NodeListID,
        right_list: NodeListID,
        current: BlockID,
    ) -> BlockID {
        let next = self.create_block();
        let left = self.create_block();
        let right = self.create_block();
        let terminal = self.emit_list(left_list, left);
        self.push(terminal, Insn::Jump { target: next });
        let terminal = self.emit_list(right_list, right);
        self.push(terminal, Insn::Jump { target: next });
        self.push(
            current,
            Insn::Split {
                primary: left,
                secondary: right,
            },
        );
        next
    }

    fn emit_zero_or_one(&mut self, child: OrphanID, greedy: bool, current: BlockID) -> BlockID {
        let q = self.create_block();
        let content = self.create_block();
        let next = self.create_block();
        self.push(current, Insn::Jump { target: q });
        let child_node = self.ast.orphan(child);
        // An empty-capable body needs the loop-head guard for when an
        // enclosing loop re-enters us without consuming input.
        if self.ast.can_match_empty(child_node) {
            let id = self.fresh_progress_id();
            self.push(q, Insn::Progress { id });
        }
        let (primary, secondary) = if greedy { (content, next) } else { (next, content) };
        self.push(q, Insn::Split { primary, secondary });
        let terminal = self.emit_node(child_node, content);
        self.push(terminal, Insn::Jump { target: next });
        next
    }

    fn emit_zero_or_more(&mut self, child: OrphanID, greedy: bool, current: BlockID) -> BlockID {
        let q = self.create_block();
        let content = self.create_block();
        let next = self.create_block();
        self.push(current, Insn::Jump { target: q });
        let id = self.fresh_progress_id();
        self.push(q, Insn::Progress { id });
        let (primary, secondary) = if greedy { (content, next) } else { (next, content) };
        self.push(q, Insn::Split { primary, secondary });
        let child_node = self.ast.orphan(child);
        let terminal = self.emit_node(child_node, content);
        self.push(terminal, Insn::Jump { target: q });
        next
    }

    fn emit_one_or_more(&mut self, child: OrphanID, greedy: bool, current: BlockID) -> BlockID {
        let content = self.create_block();
        self.push(current, Insn::Jump { target: content });
        let child_node = self.ast.orphan(child);
        let terminal = self.emit_node(child_node, content);
        let loop_block = self.create_block();
        self.push(terminal, Insn::Jump { target: loop_block });
        let next = self.create_block();
        if self.ast.can_match_empty(child_node) {
            let id = self.fresh_progress_id();
            self.push(loop_block, Insn::Progress { id });
        }
        let (primary, secondary) = if greedy { (content, next) } else { (next, content) };
        self.push(loop_block, Insn::Split { primary, secondary });
        next
    }
}

/// Compile \p ast to a CompiledRegex.
/// The jump-coalescing pass and the start predicate are applied by the
/// caller afterwards.
pub fn emit(ast: &Ast, flags: Flags) -> CompiledRegex {
    let mut emitter = Emitter {
        ast,
        next_progress_id: 0,
        result: CompiledRegex {
            blocks: Vec::new(),
            brackets: Vec::new(),
            start_pred: StartPredicate::Arbitrary,
            progress_slots: 0,
            groups: ast.group_count,
            flags,
        },
    };
    let entry = emitter.create_block();
    let terminal = emitter.emit_list(ast.root, entry);
    emitter.push(terminal, Insn::Goal);
    emitter.result.progress_slots = emitter.next_progress_id;
    emitter.result
}
