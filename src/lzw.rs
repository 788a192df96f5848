// lzw.rs
//
// Copyright (c) 2020-2026  Douglas Lau
//
//! Lempel-Ziv-Welch compression for GIF image data
use std::cmp::Ordering;
use std::ops::AddAssign;

/// Code Bits
#[derive(Clone, Copy, Debug, PartialEq)]
struct Bits(u8);

impl From<u8> for Bits {
    fn from(bits: u8) -> Self {
        Bits(bits.min(Self::MAX.0))
    }
}

impl From<Bits> for u8 {
    fn from(bits: Bits) -> Self {
        bits.0
    }
}

impl AddAssign<u8> for Bits {
    fn add_assign(&mut self, rhs: u8) {
        self.0 = (self.0 + rhs).min(Self::MAX.0)
    }
}

impl Bits {
    /// Maximum code bits allowed for GIF
    const MAX: Self = Bits(12);

    /// Get the number of entries
    fn entries(self) -> u16 {
        1 << (self.0 as u16)
    }
}

/// Code type
type Code = u16;

/// Dictionary node.
///
/// Siblings sharing a prefix form a binary search tree through the `left`
/// and `right` links; `next` points to the first node extending this one.
#[derive(Clone, Copy, Debug)]
struct Node {
    /// Next node code
    next: Option<Code>,
    /// Left node code
    left: Option<Code>,
    /// Right node code
    right: Option<Code>,
    /// Byte value
    byte: u8,
}

/// Code dictionary trie
#[derive(Debug)]
struct Trie {
    /// Table of codes
    table: Vec<Node>,
    /// Minimum code bits
    min_code_bits: u8,
}

/// LZW Data Compressor
#[derive(Debug)]
pub struct Compressor {
    /// Code dictionary
    trie: Trie,
    /// Minimum code bits
    min_code_bits: u8,
    /// Current code bits
    code_bits: Bits,
    /// Pending output bits
    code: u32,
    /// Number of pending output bits
    n_bits: u8,
}

impl Node {
    fn new(byte: u8) -> Self {
        Node {
            next: None,
            left: None,
            right: None,
            byte,
        }
    }

    /// Get a link code
    fn link(&self, ordering: Ordering) -> Option<Code> {
        match ordering {
            Ordering::Less => self.left,
            Ordering::Equal => self.next,
            Ordering::Greater => self.right,
        }
    }

    /// Set a link code
    fn set_link(&mut self, ordering: Ordering, code: Code) {
        match ordering {
            Ordering::Less => self.left = Some(code),
            Ordering::Equal => self.next = Some(code),
            Ordering::Greater => self.right = Some(code),
        }
    }
}

impl Trie {
    /// Create a new code dictionary
    fn new(min_code_bits: u8) -> Self {
        let mut trie = Trie {
            table: Vec::with_capacity(Bits::MAX.entries().into()),
            min_code_bits,
        };
        trie.reset();
        trie
    }

    /// Get the clear code
    fn clear_code(&self) -> Code {
        1 << self.min_code_bits
    }

    /// Get the end code
    fn end_code(&self) -> Code {
        self.clear_code() + 1
    }

    /// Get the next available code
    fn next_code(&self) -> Code {
        self.table.len() as Code
    }

    /// Reset the dictionary
    fn reset(&mut self) {
        self.table.clear();
        for byte in 0..self.clear_code() {
            self.table.push(Node::new(byte as u8));
        }
        self.table.push(Node::new(0)); // clear code
        self.table.push(Node::new(0)); // end code
    }

    /// Get a mutable node
    fn node_mut(&mut self, code: Code) -> &mut Node {
        debug_assert!(code < self.next_code());
        &mut self.table[code as usize]
    }

    /// Extend a string code by one byte.
    ///
    /// Returns the code of the extended string if it was already in the
    /// dictionary; otherwise it is added and `None` is returned.
    fn search_insert(&mut self, code: Option<Code>, byte: u8) -> Option<Code> {
        let code = match code {
            Some(code) => code,
            None => return Some(byte as Code),
        };
        let next_code = self.next_code();
        let mut node = self.node_mut(code);
        let mut ordering = Ordering::Equal;
        while let Some(code) = node.link(ordering) {
            node = self.node_mut(code);
            ordering = byte.cmp(&node.byte);
            if ordering == Ordering::Equal {
                return Some(code);
            }
        }
        node.set_link(ordering, next_code);
        self.table.push(Node::new(byte));
        None
    }
}

impl Compressor {
    /// Create a new compressor
    pub fn new(min_code_bits: u8) -> Self {
        Compressor {
            min_code_bits,
            trie: Trie::new(min_code_bits),
            code_bits: Bits::from(min_code_bits + 1),
            code: 0,
            n_bits: 0,
        }
    }

    /// Pack a code into a buffer
    fn pack(&mut self, code: Code, buffer: &mut Vec<u8>) {
        self.code |= (code as u32) << self.n_bits;
        self.n_bits += u8::from(self.code_bits);
        while self.n_bits >= 8 {
            buffer.push(self.code as u8);
            self.code >>= 8;
            self.n_bits -= 8;
        }
    }

    /// Flush a partial byte into a buffer
    fn flush(&mut self, buffer: &mut Vec<u8>) {
        if self.n_bits > 0 {
            buffer.push(self.code as u8);
            self.code = 0;
            self.n_bits = 0;
        }
    }

    /// Compress a byte buffer, ending with the end code.
    ///
    /// Code width grows with the dictionary.  Once all 4096 codes (12 bits)
    /// are assigned, a clear code is written and the dictionary restarts
    /// at the minimum code width.
    pub fn compress(&mut self, bytes: &[u8], buffer: &mut Vec<u8>) {
        self.pack(self.trie.clear_code(), buffer);
        let mut code = None;
        for byte in bytes {
            code = self.trie.search_insert(code, *byte).or_else(|| {
                if let Some(code) = code {
                    self.pack(code, buffer);
                }
                Some(*byte as Code)
            });
            let next_code = self.trie.next_code();
            if next_code > self.code_bits.entries() {
                if next_code > Bits::MAX.entries() {
                    self.pack(self.trie.clear_code(), buffer);
                    self.trie.reset();
                    self.code_bits = Bits::from(self.min_code_bits + 1);
                } else {
                    self.code_bits += 1;
                }
            }
        }
        if let Some(code) = code {
            self.pack(code, buffer);
        }
        self.pack(self.trie.end_code(), buffer);
        self.flush(buffer);
    }
}
