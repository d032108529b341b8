use std::fmt;

/// One residue correspondence between the mobile and the reference structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlignedPair {
    pub mobile: usize,
    pub reference: usize,
}

impl fmt::Display for AlignedPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.mobile, self.reference)
    }
}

/// A discrete one-to-one residue alignment.
///
/// Pairs are kept in ascending mobile-index order, and neither a mobile nor a
/// reference index appears twice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Alignment {
    pairs: Vec<AlignedPair>,
}

impl Alignment {
    /// Builds an alignment from arbitrary-order pairs, sorting by mobile index.
    ///
    /// Callers are responsible for index uniqueness; this is checked in debug
    /// builds only.
    pub fn from_pairs(mut pairs: Vec<AlignedPair>) -> Self {
        pairs.sort_unstable();
        debug_assert!(pairs.windows(2).all(|w| w[0].mobile != w[1].mobile));
        Self { pairs }
    }

    pub fn pairs(&self) -> &[AlignedPair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn mobile_indices(&self) -> Vec<usize> {
        self.pairs.iter().map(|p| p.mobile).collect()
    }

    pub fn reference_indices(&self) -> Vec<usize> {
        self.pairs.iter().map(|p| p.reference).collect()
    }
}
