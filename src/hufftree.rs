use std::fmt::Write as _;

use log::debug;

use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::min_heap::MinHeap;
use crate::symbol::Symbol;

/// Index of a node in a [`HuffmanTree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode<S> {
    Leaf {
        weight: u64,
        symbol: S,
    },
    Internal {
        weight: u64,
        left: NodeId,
        right: NodeId,
    },
}

impl<S> HuffNode<S> {
    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } => *weight,
            HuffNode::Internal { weight, .. } => *weight,
        }
    }
}

/// Optimal prefix-code tree.
///
/// Nodes live in a flat arena and refer to their children by [`NodeId`].
/// The tree is immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree<S> {
    nodes: Vec<HuffNode<S>>,
    root: NodeId,
}

impl<S: Symbol> HuffmanTree<S> {
    pub fn from_symbols(symbols: &[S]) -> Result<Self> {
        let frequencies = FrequencyTable::count(symbols)?;
        Self::from_frequencies(&frequencies)
    }

    /// Builds the tree by repeatedly merging the two lightest nodes.
    ///
    /// Leaves enter the heap in ascending symbol order and merged nodes after
    /// them, so ties on weight always resolve the same way. The first node
    /// extracted becomes the left child.
    pub fn from_frequencies(frequencies: &FrequencyTable<S>) -> Result<Self> {
        if frequencies.is_empty() {
            return Err(HuffmanError::EmptyInput);
        }

        let mut nodes: Vec<HuffNode<S>> = Vec::with_capacity(2 * frequencies.len() - 1);
        for (symbol, weight) in frequencies.iter() {
            nodes.push(HuffNode::Leaf {
                weight,
                symbol: symbol.clone(),
            });
        }

        let mut heap = MinHeap::build(nodes.iter().enumerate().map(|(i, n)| (n.weight(), NodeId(i))))?;

        while heap.heap_size() > 1 {
            let (x, left) = heap.extract_min()?;
            let (y, right) = heap.extract_min()?;

            let weight = x
                .weight
                .checked_add(y.weight)
                .ok_or_else(|| HuffmanError::corrupt("total frequency overflows u64"))?;
            let id = NodeId(nodes.len());
            nodes.push(HuffNode::Internal {
                weight,
                left,
                right,
            });
            heap.insert(weight, id);
        }

        let (_, root) = heap.extract_min()?;
        let tree = HuffmanTree { nodes, root };
        debug!(
            "built tree: {} leaves, {} nodes, depth {}",
            frequencies.len(),
            tree.node_count(),
            tree.depth()
        );
        Ok(tree)
    }

    /// Leaf weights keyed by symbol. Rebuilding from this table yields an
    /// identical tree.
    pub fn frequencies(&self) -> Result<FrequencyTable<S>> {
        FrequencyTable::from_pairs(self.nodes.iter().filter_map(|node| match node {
            HuffNode::Leaf { symbol, weight } => Some((symbol.clone(), *weight)),
            HuffNode::Internal { .. } => None,
        }))
    }
}

impl<S> HuffmanTree<S> {
    pub fn root(&self) -> NodeRef<'_, S> {
        self.node(self.root)
    }

    pub fn node(&self, id: NodeId) -> NodeRef<'_, S> {
        NodeRef { tree: self, id }
    }

    pub(crate) fn get(&self, id: NodeId) -> &HuffNode<S> {
        &self.nodes[id.0]
    }

    pub(crate) fn root_id(&self) -> NodeId {
        self.root
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, HuffNode::Leaf { .. }))
            .count()
    }

    /// Total weight, equal to the length of the input the tree was built from.
    pub fn weight(&self) -> u64 {
        self.get(self.root).weight()
    }

    /// Length of the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        let mut max = 0;
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            match self.get(id) {
                HuffNode::Leaf { .. } => max = max.max(depth),
                HuffNode::Internal { left, right, .. } => {
                    stack.push((*right, depth + 1));
                    stack.push((*left, depth + 1));
                }
            }
        }
        max
    }
}

impl<S: std::fmt::Debug> HuffmanTree<S> {
    /// Indented text dump of the tree, left subtree before right.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![(self.root(), 0usize, "root")];
        while let Some((node, depth, label)) = stack.pop() {
            let indent = "  ".repeat(depth);
            match node.symbol() {
                Some(symbol) => {
                    let _ = writeln!(
                        out,
                        "{}{}-> Leaf: {:?} [weight: {}]",
                        indent,
                        label,
                        symbol,
                        node.weight()
                    );
                }
                None => {
                    let _ = writeln!(out, "{}{}-> Internal [weight: {}]", indent, label, node.weight());
                }
            }
            if let Some((left, right)) = node.children() {
                stack.push((right, depth + 1, "R"));
                stack.push((left, depth + 1, "L"));
            }
        }
        out
    }

    /// Graphviz DOT description of the tree. Edges are labelled with the
    /// bit they contribute to a code.
    pub fn to_dot(&self) -> String {
        let mut out = String::from("digraph huffman {\n");
        let mut stack = vec![self.root()];
        while let Some(node) = stack.pop() {
            let id = node.id().0;
            match node.symbol() {
                Some(symbol) => {
                    let label = format!("{:?}", symbol).replace('\\', "\\\\").replace('"', "\\\"");
                    let _ = writeln!(
                        out,
                        "  n{} [shape=box, label=\"{}\\n{}\"];",
                        id,
                        label,
                        node.weight()
                    );
                }
                None => {
                    let _ = writeln!(out, "  n{} [shape=circle, label=\"{}\"];", id, node.weight());
                }
            }
            if let Some((left, right)) = node.children() {
                let _ = writeln!(out, "  n{} -> n{} [label=\"0\"];", id, left.id().0);
                let _ = writeln!(out, "  n{} -> n{} [label=\"1\"];", id, right.id().0);
                stack.push(right);
                stack.push(left);
            }
        }
        out.push_str("}\n");
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Leaf,
    Internal,
}

/// Read-only view of one node, for walking the tree from outside the crate.
#[derive(Debug)]
pub struct NodeRef<'a, S> {
    tree: &'a HuffmanTree<S>,
    id: NodeId,
}

impl<S> Clone for NodeRef<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for NodeRef<'_, S> {}

impl<'a, S> NodeRef<'a, S> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        match self.tree.get(self.id) {
            HuffNode::Leaf { .. } => NodeKind::Leaf,
            HuffNode::Internal { .. } => NodeKind::Internal,
        }
    }

    pub fn weight(&self) -> u64 {
        self.tree.get(self.id).weight()
    }

    pub fn symbol(&self) -> Option<&'a S> {
        match self.tree.get(self.id) {
            HuffNode::Leaf { symbol, .. } => Some(symbol),
            HuffNode::Internal { .. } => None,
        }
    }

    pub fn left(&self) -> Option<NodeRef<'a, S>> {
        self.children().map(|(left, _)| left)
    }

    pub fn right(&self) -> Option<NodeRef<'a, S>> {
        self.children().map(|(_, right)| right)
    }

    pub fn children(&self) -> Option<(NodeRef<'a, S>, NodeRef<'a, S>)> {
        match self.tree.get(self.id) {
            HuffNode::Leaf { .. } => None,
            HuffNode::Internal { left, right, .. } => Some((self.tree.node(*left), self.tree.node(*right))),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn assert_weights_consistent<S>(node: NodeRef<'_, S>) {
        let mut stack = vec![node];
        while let Some(n) = stack.pop() {
            if let Some((l, r)) = n.children() {
                assert_eq!(n.weight(), l.weight() + r.weight());
                stack.push(l);
                stack.push(r);
            }
        }
    }

    #[test]
    fn builds_expected_shape_for_small_input() {
        let tree = HuffmanTree::from_symbols(&b"aaabbc"[..]).unwrap();
        let root = tree.root();
        assert_eq!(root.weight(), 6);

        let (left, right) = root.children().unwrap();
        assert_eq!(left.symbol(), Some(&b'a'));
        assert_eq!(right.weight(), 3);

        let (rl, rr) = right.children().unwrap();
        assert_eq!(rl.symbol(), Some(&b'c'));
        assert_eq!(rr.symbol(), Some(&b'b'));

        assert_eq!(tree.leaf_count(), 3);
        assert_eq!(tree.node_count(), 5);
        assert_eq!(tree.depth(), 2);
        assert_weights_consistent(root);
    }

    #[test]
    fn single_symbol_tree_is_a_leaf() {
        let tree = HuffmanTree::from_symbols(&b"aaaa"[..]).unwrap();
        assert_eq!(tree.root().kind(), NodeKind::Leaf);
        assert_eq!(tree.root().symbol(), Some(&b'a'));
        assert_eq!(tree.root().weight(), 4);
        assert!(tree.root().left().is_none());
        assert_eq!(tree.depth(), 0);
    }

    #[test]
    fn empty_input_is_rejected() {
        let empty: &[u8] = &[];
        assert!(matches!(
            HuffmanTree::from_symbols(empty),
            Err(HuffmanError::EmptyInput)
        ));
    }

    #[test]
    fn rebuild_from_frequencies_is_identical() {
        let text: Vec<char> = "she sells sea shells by the sea shore".chars().collect();
        let tree = HuffmanTree::from_symbols(&text).unwrap();
        let rebuilt = HuffmanTree::from_frequencies(&tree.frequencies().unwrap()).unwrap();
        assert_eq!(tree, rebuilt);
        assert_weights_consistent(tree.root());
    }

    #[test]
    fn skewed_weights_produce_deep_tree() {
        // Fibonacci weights force a chain: every merge joins the previous
        // subtree with the next leaf.
        let mut fib = vec![1u64, 1];
        while fib.len() < 60 {
            let n = fib[fib.len() - 1] + fib[fib.len() - 2];
            fib.push(n);
        }
        let table = FrequencyTable::from_pairs(fib.iter().enumerate().map(|(i, &w)| (i as u8, w))).unwrap();
        let tree = HuffmanTree::from_frequencies(&table).unwrap();
        assert_eq!(tree.depth(), 59);
        assert_eq!(tree.weight(), fib.iter().sum::<u64>());
    }

    #[test]
    fn outline_and_dot_cover_every_node() {
        let tree = HuffmanTree::from_symbols(&b"aaabbc"[..]).unwrap();
        let outline = tree.outline();
        assert_eq!(outline.lines().count(), 5);
        assert!(outline.starts_with("root-> Internal [weight: 6]"));
        assert!(outline.contains("  L-> Leaf: 97 [weight: 3]"));

        let dot = tree.to_dot();
        assert!(dot.starts_with("digraph huffman {"));
        assert_eq!(dot.matches("->").count(), 4);
        assert_eq!(dot.matches("shape=box").count(), 3);
    }

    #[test]
    fn dot_escapes_quote_symbols() {
        let tree = HuffmanTree::from_symbols(&['"', '"', 'x']).unwrap();
        assert!(tree.to_dot().contains("label=\"'\\\"'\\n2\""));
    }
}
