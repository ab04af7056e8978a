use super::{CodeTable, FrequencyTable};
use alloc::boxed::Box;
use alloc::collections::BinaryHeap;
use core::cmp::{Ordering, Reverse};

/// A node of a huffman tree. The weight of a node is the summed count of all leaves below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf {
        weight: u64,
        symbol: u8,
    },
    Internal {
        weight: u64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => *weight,
        }
    }
}

/// A tree whose leaves are the symbols of an input. The path from the root to a leaf
/// is the code of that leaf's symbol.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    root: Node,
}

/// Entries are ordered by weight first. Equal weights are ordered by when they entered the
/// queue, which makes the shape of the tree depend on nothing but the counts.
struct QueueEntry {
    weight: u64,
    sequence: usize,
    node: Node,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        match self.weight.cmp(&other.weight) {
            Ordering::Equal => self.sequence.cmp(&other.sequence),
            other => other,
        }
    }
}

impl HuffmanTree {
    /// Build the tree by merging the two lightest nodes until only the root is left.
    ///
    /// Leaves enter the queue in ascending symbol order. The first node taken out
    /// becomes the left child of the merged node.
    ///
    /// Returns `None` for an empty table. A table with a single symbol results in a tree
    /// that is just one leaf.
    pub fn build(frequencies: &FrequencyTable) -> Option<Self> {
        let mut queue = BinaryHeap::with_capacity(frequencies.len());
        let mut sequence = 0;
        for (symbol, count) in frequencies.iter() {
            let weight = u64::from(count);
            queue.push(Reverse(QueueEntry {
                weight,
                sequence,
                node: Node::Leaf { weight, symbol },
            }));
            sequence += 1;
        }

        loop {
            let Reverse(first) = queue.pop()?;
            let Some(Reverse(second)) = queue.pop() else {
                return Some(HuffmanTree { root: first.node });
            };

            let weight = first.weight + second.weight;
            queue.push(Reverse(QueueEntry {
                weight,
                sequence,
                node: Node::Internal {
                    weight,
                    left: Box::new(first.node),
                    right: Box::new(second.node),
                },
            }));
            sequence += 1;
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Total weight of the tree, which is the length of the input it was built from.
    pub fn weight(&self) -> u64 {
        self.root.weight()
    }

    pub fn code_table(&self) -> CodeTable {
        CodeTable::from_tree(self)
    }
}

#[cfg(test)]
mod tests {
    use super::{HuffmanTree, Node};
    use crate::huff::FrequencyTable;
    use alloc::boxed::Box;

    fn leaf(symbol: u8, weight: u64) -> Box<Node> {
        Box::new(Node::Leaf { weight, symbol })
    }

    #[test]
    fn no_tree_for_empty_table() {
        assert!(HuffmanTree::build(&FrequencyTable::new()).is_none());
    }

    #[test]
    fn single_leaf_is_root() {
        let tree = HuffmanTree::build(&FrequencyTable::count(b"zzzz")).unwrap();
        assert_eq!(tree.root(), &Node::Leaf { weight: 4, symbol: b'z' });
        assert_eq!(tree.weight(), 4);
    }

    #[test]
    fn lighter_node_goes_left() {
        let tree = HuffmanTree::build(&FrequencyTable::count(b"abb")).unwrap();
        assert_eq!(
            tree.root(),
            &Node::Internal {
                weight: 3,
                left: leaf(b'a', 1),
                right: leaf(b'b', 2),
            }
        );
    }

    #[test]
    fn ties_resolve_by_insertion_order() {
        // all weights equal: leaves pair up in symbol order, then the merged nodes in the
        // order they were created
        let tree = HuffmanTree::build(&FrequencyTable::count(b"dcba")).unwrap();
        assert_eq!(
            tree.root(),
            &Node::Internal {
                weight: 4,
                left: Box::new(Node::Internal {
                    weight: 2,
                    left: leaf(b'a', 1),
                    right: leaf(b'b', 1),
                }),
                right: Box::new(Node::Internal {
                    weight: 2,
                    left: leaf(b'c', 1),
                    right: leaf(b'd', 1),
                }),
            }
        );
    }

    #[test]
    fn weight_is_input_length() {
        let data = b"the quick brown fox jumps over the lazy dog";
        let tree = HuffmanTree::build(&FrequencyTable::count(data)).unwrap();
        assert_eq!(tree.weight(), data.len() as u64);
    }

    #[test]
    fn same_counts_same_tree() {
        let data = b"mississippi river";
        let first = HuffmanTree::build(&FrequencyTable::count(data)).unwrap();
        let second = HuffmanTree::build(&FrequencyTable::count(data)).unwrap();
        assert_eq!(first.root(), second.root());
        assert_eq!(first.code_table(), second.code_table());
    }
}
