//! Block-graph optimization: jump coalescing.

use crate::insn::{CompiledRegex, Insn};
use crate::types::BlockID;

/// \return the block \p block forwards to, if it consists of a single jump.
fn single_jump_target(cr: &CompiledRegex, block: BlockID) -> Option<BlockID> {
    match cr.blocks[block as usize].insns.as_slice() {
        [Insn::Jump { target }] => Some(*target),
        _ => None,
    }
}

/// Rewrite every jump target and split arm to chase through blocks which
/// consist of a single jump, iterating to a fixed point. The bypassed
/// blocks are left in place, unreferenced.
pub fn optimize(cr: &mut CompiledRegex) {
    loop {
        let forwards: Vec<Option<BlockID>> = (0..cr.blocks.len() as BlockID)
            .map(|b| single_jump_target(cr, b))
            .collect();
        // The chase is bounded so a degenerate jump cycle cannot hang it.
        let resolve = |mut target: BlockID| -> BlockID {
            for _ in 0..forwards.len() {
                match forwards[target as usize] {
                    Some(fwd) if fwd != target => target = fwd,
                    _ => break,
                }
            }
            target
        };
        let mut changed = false;
        for block in cr.blocks.iter_mut() {
            for insn in block.insns.iter_mut() {
                match insn {
                    Insn::Jump { target } => {
                        let t = resolve(*target);
                        if t != *target {
                            *target = t;
                            changed = true;
                        }
                    }
                    Insn::Split { primary, secondary } => {
                        let p = resolve(*primary);
                        if p != *primary {
                            *primary = p;
                            changed = true;
                        }
                        let s = resolve(*secondary);
                        if s != *secondary {
                            *secondary = s;
                            changed = true;
                        }
                    }
                    _ => {}
                }
            }
        }
        if !changed {
            break;
        }
    }
}
