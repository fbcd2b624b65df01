//! Sparse feature vectors
//!
//! Features are `(index, value)` pairs. Indices are hashed identities and are
//! only masked down to a weight slot by the base learner, so the same vector can
//! be re-tagged per label without knowing the table size.

use std::collections::BTreeMap;

/// Multiplier used to move a feature index into a label's own region of the
/// weight table. Odd, so distinct labels never collapse onto the same offset
/// for a power-of-two table.
const LABEL_STRIDE: u32 = 0x9E37_79B9;

/// Index of the always-on bias feature.
pub const CONSTANT_INDEX: u32 = 11_650_396;

/// A sparse vector of `(index, value)` pairs.
///
/// Insertion order is preserved. Duplicate indices are allowed and simply
/// contribute twice, matching how hashed text features behave.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Features {
    entries: Vec<(u32, f32)>,
}

impl Features {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, index: u32, value: f32) {
        self.entries.push((index, value));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, f32)> + '_ {
        self.entries.iter().copied()
    }

    /// Sum of squared values, `|x|^2`.
    pub fn squared_norm(&self) -> f32 {
        self.entries.iter().map(|(_, v)| v * v).sum()
    }

    /// Every value is finite.
    pub fn is_finite(&self) -> bool {
        self.entries.iter().all(|(_, v)| v.is_finite())
    }

    /// Append every entry of `other`.
    pub fn extend_from(&mut self, other: &Features) {
        self.entries.extend_from_slice(&other.entries);
    }

    /// Copy of this vector with every index moved into `label_id`'s region.
    ///
    /// Label 0 maps onto the untagged indices.
    pub fn tagged(&self, label_id: u32) -> Features {
        let offset = label_id.wrapping_mul(LABEL_STRIDE);
        Features {
            entries: self
                .entries
                .iter()
                .map(|&(index, value)| (index.wrapping_add(offset), value))
                .collect(),
        }
    }

    /// `a - b`, merged by index and sorted by index.
    ///
    /// Entries that cancel to exactly zero are dropped, so features the two
    /// sides share verbatim vanish from the paired representation.
    pub fn difference(a: &Features, b: &Features) -> Features {
        let mut merged: BTreeMap<u32, f32> = BTreeMap::new();
        for (index, value) in a.iter() {
            *merged.entry(index).or_insert(0.0) += value;
        }
        for (index, value) in b.iter() {
            *merged.entry(index).or_insert(0.0) -= value;
        }
        Features {
            entries: merged.into_iter().filter(|&(_, v)| v != 0.0).collect(),
        }
    }

    /// Negated copy, `-x`.
    pub fn negated(&self) -> Features {
        Features {
            entries: self.entries.iter().map(|&(i, v)| (i, -v)).collect(),
        }
    }
}

impl FromIterator<(u32, f32)> for Features {
    fn from_iter<T: IntoIterator<Item = (u32, f32)>>(iter: T) -> Self {
        Features {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<const N: usize> From<[(u32, f32); N]> for Features {
    fn from(entries: [(u32, f32); N]) -> Self {
        Features {
            entries: entries.to_vec(),
        }
    }
}
