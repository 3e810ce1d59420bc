use std::collections::HashMap;

use crate::error::Result;
use crate::logic::{Logic, LogicKind};
use crate::membership::Membership;
use crate::stock::{OtherHasher, Stock};

/// Combinator context a sub-expression is evaluated under. Part of the cache
/// key together with the node fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Parent {
    None,
    And,
    Or,
    Not,
}

/// Reduces logic expressions against a stock, memoizing compound sub-results.
///
/// The cache lives for one report generation: the analyzer clears it at the
/// start of every top-level call and it only grows until then. Leaves are
/// never cached (recomputing a single column scan is cheaper than keeping a
/// vector per condition), and an inverted `not` result is never cached: the
/// memo holds the pre-inversion sub-result. Cached vectors are cloned out,
/// so callers can never mutate cache state in place.
pub struct Evaluator<'a> {
    stock: &'a Stock,
    cache: HashMap<(Parent, u64), Membership, OtherHasher>,
}

impl<'a> Evaluator<'a> {
    pub fn new(stock: &'a Stock) -> Self {
        Self {
            stock,
            cache: HashMap::default(),
        }
    }

    pub fn stock(&self) -> &'a Stock {
        self.stock
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Evaluate a whole expression into a membership vector.
    pub fn evaluate(&mut self, logic: &Logic) -> Result<Membership> {
        self.reduce(logic, Parent::None)
    }

    fn reduce(&mut self, logic: &Logic, parent: Parent) -> Result<Membership> {
        match logic.kind() {
            LogicKind::Leaf { parameter, option } => self.stock.matching(parameter, option),
            LogicKind::And { children, .. } => {
                let key = (parent, logic.fingerprint());
                if let Some(hit) = self.cache.get(&key) {
                    return Ok(hit.clone());
                }
                let mut combined = Membership::all(self.stock.total_samples());
                for child in children {
                    let reduced = self.reduce(child, Parent::And)?;
                    combined.intersect_with(&reduced);
                }
                self.cache.insert(key, combined.clone());
                Ok(combined)
            }
            LogicKind::Or { children } => {
                let key = (parent, logic.fingerprint());
                if let Some(hit) = self.cache.get(&key) {
                    return Ok(hit.clone());
                }
                let mut combined = Membership::none(self.stock.total_samples());
                for child in children {
                    let reduced = self.reduce(child, Parent::Or)?;
                    combined.union_with(&reduced);
                }
                self.cache.insert(key, combined.clone());
                Ok(combined)
            }
            LogicKind::Not { child } => {
                // the child memoizes itself; the inverted vector is call-local
                let mut reduced = self.reduce(child, Parent::Not)?;
                reduced.invert();
                Ok(reduced)
            }
        }
    }
}
