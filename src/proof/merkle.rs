//! Dictionary Membership Index
//!
//! Fixed-depth binary hash tree over the word list. Any party holding the
//! tree can prove that a candidate word is a legal dictionary entry without
//! revealing the rest of the list; any party holding only the root can check
//! such a proof with [`MembershipProof::verify`].
//!
//! The tree is built once from a finalized, versioned word list and is
//! read-only afterwards. Unoccupied leaf slots take the precomputed zero
//! value for their level, so proofs for a sparse tree are uniform with
//! proofs for a full one. Changing the word list produces a new root and is
//! a non-backward-compatible event.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::hash::{empty_leaf, hash_two, Field};
use crate::core::words::{word_to_field, CodecError};

/// Membership index errors.
#[derive(Debug, Error)]
pub enum MerkleError {
    /// Word list does not fit in a tree of the requested depth.
    ///
    /// Fatal at build time: the caller must pick a larger depth. Words are
    /// never silently truncated.
    #[error("dictionary of {words} words exceeds capacity {capacity} at depth {depth}")]
    CapacityExceeded {
        /// Number of words supplied.
        words: usize,
        /// Requested tree depth.
        depth: u8,
        /// Leaf capacity at that depth.
        capacity: u64,
    },

    /// Requested leaf index is outside the tree's capacity.
    #[error("leaf index {index} out of range for capacity {capacity}")]
    IndexOutOfRange {
        /// Requested index.
        index: u64,
        /// Leaf capacity of the tree.
        capacity: u64,
    },

    /// A word in the list failed codec validation.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Word is not a dictionary entry; no proof can be constructed for it.
    #[error("word {0:?} is not in the dictionary")]
    WordNotInDictionary(String),

    /// Filesystem error while persisting or loading the tree.
    #[error("dictionary tree i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// Persisted tree bytes could not be decoded.
    #[error("dictionary tree decode failed: {0}")]
    Decode(#[from] bincode::Error),
}

/// Inclusion proof from a dictionary leaf up to the root.
///
/// Self-contained: verification recomputes the root from `leaf`,
/// `siblings` and `directions` alone, with no access to the tree that
/// produced it. Direction `false` means the current node is a left child.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipProof {
    /// Leaf value (the guessed word's field encoding).
    pub leaf: Field,
    /// Sibling hashes from leaf level to just below the root.
    pub siblings: Vec<Field>,
    /// Per-level position bits; `true` = current node is a right child.
    pub directions: Vec<bool>,
    /// Root the proof claims to reach.
    pub root: Field,
}

impl MembershipProof {
    /// Verify this proof against an independently known root.
    ///
    /// Recomputes the path bottom-up and accepts only if the result equals
    /// both the proof's own `root` and `expected_root`. This is the half of
    /// the membership protocol a counterpart without the dictionary runs.
    pub fn verify(&self, expected_root: &Field) -> bool {
        if self.siblings.len() != self.directions.len() {
            return false;
        }

        let mut current = self.leaf;
        for (sibling, is_right) in self.siblings.iter().zip(&self.directions) {
            current = if *is_right {
                hash_two(sibling, &current)
            } else {
                hash_two(&current, sibling)
            };
        }

        current == self.root && current == *expected_root
    }

    /// Path length in levels.
    pub fn depth(&self) -> usize {
        self.siblings.len()
    }
}

/// Fixed-depth membership index over the word dictionary.
///
/// Only populated nodes are materialized; absent nodes fall back to the
/// per-level zero value. Append-only during [`DictionaryTree::build`],
/// immutable afterwards, safe to share across concurrent readers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DictionaryTree {
    depth: u8,
    leaves: Vec<Field>,
    /// Populated nodes keyed by (level, index); level 0 = leaves.
    nodes: BTreeMap<(u8, u64), Field>,
    /// Zero value per level: `zeros[0]` pads leaves, `zeros[l+1] = H(zeros[l], zeros[l])`.
    zeros: Vec<Field>,
    /// Leaf value -> leaf index, for dictionary lookups.
    index: BTreeMap<Field, u64>,
}

impl DictionaryTree {
    /// Build the index from a finalized word list.
    ///
    /// Leaf `i` is `word_to_field(words[i])`. Fails with
    /// [`MerkleError::CapacityExceeded`] if the list does not fit; codec
    /// errors from malformed list entries propagate.
    pub fn build<S: AsRef<str>>(words: &[S], depth: u8) -> Result<Self, MerkleError> {
        let capacity = 1u64.checked_shl(depth as u32).unwrap_or(u64::MAX);
        if words.len() as u64 > capacity {
            return Err(MerkleError::CapacityExceeded {
                words: words.len(),
                depth,
                capacity,
            });
        }

        let mut zeros = Vec::with_capacity(depth as usize + 1);
        zeros.push(empty_leaf());
        for level in 0..depth as usize {
            let zero = zeros[level];
            zeros.push(hash_two(&zero, &zero));
        }

        let mut leaves = Vec::with_capacity(words.len());
        let mut nodes = BTreeMap::new();
        let mut index = BTreeMap::new();

        for (i, word) in words.iter().enumerate() {
            let leaf = word_to_field(word.as_ref())?;
            nodes.insert((0u8, i as u64), leaf);
            // First occurrence wins for duplicate list entries
            index.entry(leaf).or_insert(i as u64);
            leaves.push(leaf);
        }

        // Build internal levels bottom-up over the populated prefix only;
        // everything to the right of it is covered by the zero cache.
        let mut level_len = leaves.len() as u64;
        for level in 0..depth {
            let next_len = level_len.div_ceil(2);
            for i in 0..next_len {
                let zero = zeros[level as usize];
                let left = nodes.get(&(level, 2 * i)).copied().unwrap_or(zero);
                let right = nodes.get(&(level, 2 * i + 1)).copied().unwrap_or(zero);
                nodes.insert((level + 1, i), hash_two(&left, &right));
            }
            level_len = next_len;
        }

        Ok(Self {
            depth,
            leaves,
            nodes,
            zeros,
            index,
        })
    }

    /// Tree depth (proof path length).
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// Number of words in the dictionary.
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    /// True if the dictionary holds no words.
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Maximum number of leaves at this depth.
    pub fn capacity(&self) -> u64 {
        1u64.checked_shl(self.depth as u32).unwrap_or(u64::MAX)
    }

    /// Root hash. For an empty tree this is the top-level zero value.
    pub fn root(&self) -> Field {
        self.node(self.depth, 0)
    }

    /// Leaf index of a word's field encoding, or `None` if absent.
    ///
    /// Guesses must be looked up here before any proof is attempted;
    /// out-of-dictionary words are rejected categorically.
    pub fn index_of(&self, leaf: &Field) -> Option<u64> {
        self.index.get(leaf).copied()
    }

    /// Whether a word is a legal dictionary entry.
    pub fn contains(&self, word: &str) -> bool {
        word_to_field(word)
            .ok()
            .and_then(|leaf| self.index_of(&leaf))
            .is_some()
    }

    /// Generate an inclusion proof for the leaf at `index`.
    pub fn prove(&self, index: u64) -> Result<MembershipProof, MerkleError> {
        if index >= self.capacity() {
            return Err(MerkleError::IndexOutOfRange {
                index,
                capacity: self.capacity(),
            });
        }

        let leaf = self.node(0, index);
        let mut siblings = Vec::with_capacity(self.depth as usize);
        let mut directions = Vec::with_capacity(self.depth as usize);

        let mut current = index;
        for level in 0..self.depth {
            let sibling = if current % 2 == 0 { current + 1 } else { current - 1 };
            siblings.push(self.node(level, sibling));
            directions.push(current % 2 == 1);
            current /= 2;
        }

        Ok(MembershipProof {
            leaf,
            siblings,
            directions,
            root: self.root(),
        })
    }

    /// Generate an inclusion proof for a word.
    ///
    /// Fails with [`MerkleError::WordNotInDictionary`] before touching the
    /// tree if the word is not an entry.
    pub fn prove_word(&self, word: &str) -> Result<MembershipProof, MerkleError> {
        let leaf = word_to_field(word)?;
        let index = self
            .index_of(&leaf)
            .ok_or_else(|| MerkleError::WordNotInDictionary(word.to_string()))?;
        self.prove(index)
    }

    /// Persist the built tree (bincode).
    pub fn save(&self, path: &Path) -> Result<(), MerkleError> {
        let bytes = bincode::serialize(self)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Load a previously persisted tree.
    pub fn load(path: &Path) -> Result<Self, MerkleError> {
        let bytes = std::fs::read(path)?;
        Ok(bincode::deserialize(&bytes)?)
    }

    /// Node value at (level, index), falling back to the zero cache.
    fn node(&self, level: u8, index: u64) -> Field {
        self.nodes
            .get(&(level, index))
            .copied()
            .unwrap_or(self.zeros[level as usize])
    }
}
