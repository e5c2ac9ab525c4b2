//! Huffman tree construction and (de)serialization
//!
//! Serialized form is a pre-order walk: an internal node is a `0` bit
//! followed by its left and right subtrees, a leaf is a `1` bit followed by
//! its byte value in 8 bits. A tree made of a single leaf serializes as
//! `1` + byte, with no special casing on either side.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use tracing::trace;

use crate::bits::{BitPacker, BitUnpacker};
use crate::error::{CodecError, Result};
use crate::frequency::FrequencyTable;

/// Deepest tree accepted from a packed file. Any tree built from 64-bit
/// counts stays far below this, and every code fits in a `u128`.
pub const MAX_DEPTH: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Leaf {
        byte: u8,
        freq: u64,
    },
    Internal {
        freq: u64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    pub fn freq(&self) -> u64 {
        match self {
            Node::Leaf { freq, .. } | Node::Internal { freq, .. } => *freq,
        }
    }

    fn merge(left: Node, right: Node) -> Node {
        Node::Internal {
            freq: left.freq() + right.freq(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// Priority queue entry. Ordered by frequency, then by insertion sequence,
/// reversed so that `BinaryHeap` pops the smallest first.
struct QueueEntry {
    freq: u64,
    seq: usize,
    node: Node,
}

impl Eq for QueueEntry {}
impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.freq == other.freq && self.seq == other.seq
    }
}
impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        (other.freq, other.seq).cmp(&(self.freq, self.seq)) // min-heap
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: Node,
}

impl HuffmanTree {
    /// Build the tree for a frequency table, or `None` if the table is empty.
    ///
    /// Leaves enter the queue in ascending byte order and every merged node
    /// takes the next sequence number, so equal frequencies are resolved by
    /// age: the older entry pops first and becomes the left child.
    pub fn from_frequencies(freqs: &FrequencyTable) -> Option<Self> {
        let mut heap = BinaryHeap::with_capacity(freqs.distinct());
        let mut seq = 0;
        for (byte, freq) in freqs.iter() {
            heap.push(QueueEntry {
                freq,
                seq,
                node: Node::Leaf { byte, freq },
            });
            seq += 1;
        }

        while heap.len() > 1 {
            let (Some(a), Some(b)) = (heap.pop(), heap.pop()) else {
                break;
            };
            let node = Node::merge(a.node, b.node);
            heap.push(QueueEntry {
                freq: node.freq(),
                seq,
                node,
            });
            seq += 1;
        }

        let tree = heap.pop().map(|entry| HuffmanTree { root: entry.node })?;
        trace!(
            leaves = tree.leaf_count(),
            depth = tree.depth(),
            "built huffman tree"
        );
        Some(tree)
    }

    /// Root node; a bare leaf when only one byte value occurred
    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn leaf_count(&self) -> usize {
        fn walk(node: &Node) -> usize {
            match node {
                Node::Leaf { .. } => 1,
                Node::Internal { left, right, .. } => walk(left) + walk(right),
            }
        }
        walk(&self.root)
    }

    /// Longest root-to-leaf path, in edges.
    pub fn depth(&self) -> usize {
        fn walk(node: &Node) -> usize {
            match node {
                Node::Leaf { .. } => 0,
                Node::Internal { left, right, .. } => 1 + walk(left).max(walk(right)),
            }
        }
        walk(&self.root)
    }

    /// Bits produced by [`serialize`](Self::serialize): one per internal
    /// node plus nine per leaf.
    pub fn serialized_bit_len(&self) -> u64 {
        let leaves = self.leaf_count() as u64;
        10 * leaves - 1
    }

    /// Write the tree to `out` in pre-order
    pub fn serialize(&self, out: &mut BitPacker) -> Result<()> {
        fn walk(node: &Node, out: &mut BitPacker) -> Result<()> {
            match node {
                Node::Leaf { byte, .. } => {
                    out.push_bit(true)?;
                    out.push_bits(u64::from(*byte), 8)
                }
                Node::Internal { left, right, .. } => {
                    out.push_bit(false)?;
                    walk(left, out)?;
                    walk(right, out)
                }
            }
        }
        walk(&self.root, out)
    }

    /// Rebuild a tree from its serialized bits. Frequencies are not stored,
    /// so every node of the result carries a frequency of zero.
    pub fn deserialize(input: &mut BitUnpacker<'_>) -> Result<Self> {
        let mut seen = [false; 256];
        let root = Self::read_node(input, 0, &mut seen)?;
        Ok(HuffmanTree { root })
    }

    fn read_node(input: &mut BitUnpacker<'_>, depth: usize, seen: &mut [bool; 256]) -> Result<Node> {
        if depth > MAX_DEPTH {
            return Err(CodecError::corrupt(format!(
                "tree deeper than {MAX_DEPTH} levels exceeds the decoder's depth limit"
            )));
        }
        if input.read_bit().map_err(truncated_tree)? {
            let byte = input.read_byte().map_err(truncated_tree)?;
            if std::mem::replace(&mut seen[byte as usize], true) {
                return Err(CodecError::corrupt(format!(
                    "tree contains byte {byte:#04x} twice"
                )));
            }
            Ok(Node::Leaf { byte, freq: 0 })
        } else {
            let left = Self::read_node(input, depth + 1, seen)?;
            let right = Self::read_node(input, depth + 1, seen)?;
            Ok(Node::merge(left, right))
        }
    }
}

fn truncated_tree(_: CodecError) -> CodecError {
    CodecError::corrupt("tree bits end before the tree is complete")
}
