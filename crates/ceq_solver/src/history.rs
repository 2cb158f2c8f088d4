//! Derivation history as an append-only arena.
//!
//! Every equation the reducer works with gets a node: the filtered
//! inputs as givens, and each equation produced by an elimination as a
//! derived node pointing back at the equations it was made from.

use ceq_ast::{Equation, SymbolId};
use smallvec::SmallVec;

pub type NodeId = usize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepKind {
    /// Came straight from the filtered input system.
    Given,
    /// Produced while eliminating `symbol`.
    Eliminated { symbol: SymbolId },
}

#[derive(Debug, Clone)]
pub struct DerivationNode {
    pub equation: Equation,
    pub kind: StepKind,
    pub parents: SmallVec<[NodeId; 2]>,
}

#[derive(Debug, Clone, Default)]
pub struct DerivationArena {
    nodes: Vec<DerivationNode>,
}

impl DerivationArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_given(&mut self, equation: Equation) -> NodeId {
        self.push(DerivationNode {
            equation,
            kind: StepKind::Given,
            parents: SmallVec::new(),
        })
    }

    pub fn add_derived(
        &mut self,
        equation: Equation,
        symbol: SymbolId,
        parents: impl IntoIterator<Item = NodeId>,
    ) -> NodeId {
        self.push(DerivationNode {
            equation,
            kind: StepKind::Eliminated { symbol },
            parents: parents.into_iter().collect(),
        })
    }

    fn push(&mut self, node: DerivationNode) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(node);
        id
    }

    pub fn get(&self, id: NodeId) -> &DerivationNode {
        &self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &DerivationNode)> {
        self.nodes.iter().enumerate()
    }

    /// Every ancestor of `id`, givens included, deduplicated.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut seen = vec![false; self.nodes.len()];
        let mut stack: Vec<NodeId> = self.nodes[id].parents.to_vec();
        let mut out = Vec::new();
        while let Some(n) = stack.pop() {
            if seen[n] {
                continue;
            }
            seen[n] = true;
            out.push(n);
            stack.extend(self.nodes[n].parents.iter().copied());
        }
        out.sort_unstable();
        out
    }
}
