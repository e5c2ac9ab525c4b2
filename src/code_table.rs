//! Code assignment by root-to-leaf traversal

use std::fmt;

use crate::frequency::FrequencyTable;
use crate::tree::{HuffmanTree, Node};

/// A variable-length code word, stored right-aligned in `bits`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code {
    bits: u128,
    len: u8,
}

impl Code {
    pub fn new(bits: u128, len: u8) -> Self {
        debug_assert!(len > 0 && usize::from(len) <= 128);
        Self { bits, len }
    }

    pub fn bits(&self) -> u128 {
        self.bits
    }

    pub fn len(&self) -> u8 {
        self.len
    }

    /// `self` is a prefix of `other` (or equal to it).
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        self.len <= other.len && other.bits >> (other.len - self.len) == self.bits
    }

    fn child(&self, bit: u128) -> Code {
        Code {
            bits: (self.bits << 1) | bit,
            len: self.len + 1,
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in (0..self.len).rev() {
            let bit = (self.bits >> i) & 1;
            f.write_str(if bit == 1 { "1" } else { "0" })?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    codes: Vec<Option<Code>>,
}

impl CodeTable {
    /// Assign every leaf the path from the root (0 = left, 1 = right)
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes = vec![None; 256];
        match tree.root() {
            // a lone leaf has an empty path; give it "0" so it still costs a bit
            Node::Leaf { byte, .. } => codes[*byte as usize] = Some(Code::new(0, 1)),
            Node::Internal { left, right, .. } => {
                let root = Code { bits: 0, len: 0 };
                assign(left, root.child(0), &mut codes);
                assign(right, root.child(1), &mut codes);
            }
        }
        Self { codes }
    }

    /// Code for `byte`, if the byte occurred in the input
    pub fn get(&self, byte: u8) -> Option<&Code> {
        self.codes[byte as usize].as_ref()
    }

    /// Assigned codes in ascending byte order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &Code)> + '_ {
        self.codes
            .iter()
            .enumerate()
            .filter_map(|(b, c)| c.as_ref().map(|c| (b as u8, c)))
    }

    pub fn len(&self) -> usize {
        self.codes.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_prefix_free(&self) -> bool {
        let codes: Vec<&Code> = self.iter().map(|(_, c)| c).collect();
        codes.iter().enumerate().all(|(i, a)| {
            codes
                .iter()
                .enumerate()
                .all(|(j, b)| i == j || !a.is_prefix_of(b))
        })
    }

    /// Exact number of data bits needed to encode input with these counts.
    /// Bytes without a code contribute nothing.
    pub fn encoded_bit_len(&self, freqs: &FrequencyTable) -> u64 {
        self.iter()
            .map(|(b, c)| freqs.get(b) * u64::from(c.len()))
            .sum()
    }
}

fn assign(node: &Node, code: Code, codes: &mut [Option<Code>]) {
    match node {
        Node::Leaf { byte, .. } => codes[*byte as usize] = Some(code),
        Node::Internal { left, right, .. } => {
            assign(left, code.child(0), codes);
            assign(right, code.child(1), codes);
        }
    }
}
