// used for membership vectors over the sample universe
use roaring::RoaringTreemap;

/// Boolean membership of samples, one bit per sample position.
///
/// Backed by a bitset over positions `0..len`. The length is carried
/// explicitly because an inverted vector must know the universe it
/// complements, and because percentages divide by the vector's own length.
/// Vectors combined with one another are expected to share the same universe.
#[derive(Debug, Clone, PartialEq)]
pub struct Membership {
    members: RoaringTreemap,
    len: u64,
}

impl Membership {
    /// A vector with no samples set.
    pub fn none(len: u64) -> Self {
        Self {
            members: RoaringTreemap::new(),
            len,
        }
    }
    /// A vector with every sample set.
    pub fn all(len: u64) -> Self {
        let mut members = RoaringTreemap::new();
        if len > 0 {
            members.insert_range(0..len);
        }
        Self { members, len }
    }
    pub fn insert(&mut self, position: u64) {
        debug_assert!(position < self.len);
        self.members.insert(position);
    }
    pub fn contains(&self, position: u64) -> bool {
        self.members.contains(position)
    }
    pub fn len(&self) -> u64 {
        self.len
    }
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
    /// Number of samples set.
    pub fn count(&self) -> u64 {
        self.members.len()
    }
    /// Percentage of set samples relative to this vector's own length.
    pub fn percent(&self) -> f64 {
        to_percent(self.count(), self.len)
    }
    pub fn intersect_with(&mut self, other: &Membership) {
        debug_assert_eq!(self.len, other.len);
        self.members &= &other.members;
    }
    pub fn union_with(&mut self, other: &Membership) {
        debug_assert_eq!(self.len, other.len);
        self.members |= &other.members;
    }
    /// Flip every position in the universe.
    pub fn invert(&mut self) {
        let mut full = RoaringTreemap::new();
        if self.len > 0 {
            full.insert_range(0..self.len);
        }
        self.members = full - &self.members;
    }
    pub fn positions(&self) -> impl Iterator<Item = u64> + '_ {
        self.members.iter()
    }
}

/// Percentage rounded to one decimal, the rounding every report uses.
pub fn to_percent(count: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (1000.0 * count as f64 / total as f64).round() / 10.0
}
