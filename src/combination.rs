use crate::membership::Membership;

/// Combination reports are skipped beyond this many options; there would be
/// 2^n - n - 1 rows.
pub const MAX_COMBINATION_OPTIONS: usize = 5;

/// How a combination folds its members.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    And,
    Or,
}

impl Combinator {
    pub fn word(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

/// One subset's combined count: the member names joined by the combinator
/// word, e.g. `Option 1 and Option 3`.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinationRow {
    pub description: String,
    pub count: u64,
    pub percent: f64,
}

/// Rows for every subset of one size, in lexicographic index order.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinationGroup {
    pub size: usize,
    pub rows: Vec<CombinationRow>,
}

/// Number of rows a full combination report over `options` vectors needs.
pub fn row_count(options: usize) -> u128 {
    (1u128 << options) - options as u128 - 1
}

/// Fold every subset of size 2..=n with one combinator. Percent divides by
/// the combined vector's own length, not necessarily the stock size.
pub fn combine(vectors: &[Membership], combinator: Combinator) -> Vec<CombinationGroup> {
    let mut groups = Vec::new();
    for size in 2..=vectors.len() {
        let mut rows = Vec::new();
        for group in combinations(vectors.len(), size) {
            let mut combined = vectors[group[0]].clone();
            for index in &group[1..] {
                match combinator {
                    Combinator::And => combined.intersect_with(&vectors[*index]),
                    Combinator::Or => combined.union_with(&vectors[*index]),
                }
            }
            let description = group
                .iter()
                .map(|index| format!("Option {}", index + 1))
                .collect::<Vec<_>>()
                .join(&format!(" {} ", combinator.word()));
            rows.push(CombinationRow {
                description,
                count: combined.count(),
                percent: combined.percent(),
            });
        }
        groups.push(CombinationGroup { size, rows });
    }
    groups
}

/// All k-element index subsets of 0..n, in lexicographic order.
pub fn combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    let mut all = Vec::new();
    if k == 0 || k > n {
        return all;
    }
    let mut current: Vec<usize> = (0..k).collect();
    loop {
        all.push(current.clone());
        // rightmost position that can still advance
        let mut slot = k;
        while slot > 0 && current[slot - 1] == n - k + (slot - 1) {
            slot -= 1;
        }
        if slot == 0 {
            return all;
        }
        current[slot - 1] += 1;
        for follower in slot..k {
            current[follower] = current[follower - 1] + 1;
        }
    }
}
