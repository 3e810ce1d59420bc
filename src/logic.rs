use std::hash::Hasher;

// fingerprints are structural hashes over the normalized tree
use seahash::SeaHasher;
use serde_json::Value;

use crate::error::{Result, StocksieveError};

/// Raw apply logic exactly as it appears in the project configuration:
/// strings, lists and single-key mappings, still untyped.
pub type RawLogic = Value;

// node tags fed to the fingerprint hasher
const TAG_LEAF: u8 = 1;
const TAG_AND: u8 = 2;
const TAG_OR: u8 = 3;
const TAG_NOT: u8 = 4;

/// A normalized apply-logic expression.
///
/// Built once from the raw nested structure, so evaluation dispatches over a
/// closed set of variants and malformed input can only fail here. Each node
/// carries a structural fingerprint computed bottom-up at parse time; the
/// fingerprint is the node's cache identity, so two independently parsed but
/// structurally equal expressions share cached results.
#[derive(Debug, Clone, PartialEq)]
pub struct Logic {
    kind: LogicKind,
    fingerprint: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LogicKind {
    /// True for a sample iff its value for `parameter` equals `option`.
    /// The parameter is lowercased at parse; the value compares case-sensitively.
    Leaf { parameter: String, option: String },
    /// Conjunction. `implicit` marks a bare list in the raw structure, which
    /// renders without a header line; evaluation is identical either way.
    And { children: Vec<Logic>, implicit: bool },
    /// Disjunction.
    Or { children: Vec<Logic> },
    /// Negation of exactly one child.
    Not { child: Box<Logic> },
}

impl Logic {
    pub fn kind(&self) -> &LogicKind {
        &self.kind
    }
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    /// Parse and normalize a raw apply-logic structure.
    ///
    /// Nested lists splice into their parent, a list of exactly one element
    /// collapses to that element, and single-key mappings become their
    /// combinator. After normalization an implicit conjunction can only sit
    /// at the root or directly under `not`.
    pub fn parse(raw: &RawLogic) -> Result<Self> {
        match raw {
            Value::String(condition) => Self::condition(condition),
            Value::Array(_) => {
                let elements = flatten(raw);
                if elements.len() == 1 {
                    // pass-through, never a one-child conjunction
                    return Self::parse(elements[0]);
                }
                let children = elements
                    .iter()
                    .map(|element| Self::parse(element))
                    .collect::<Result<Vec<_>>>()?;
                Ok(Self::and(children, true))
            }
            Value::Object(mapping) => {
                if mapping.len() > 1 {
                    return Err(StocksieveError::Configuration(format!(
                        "dict cannot have more than one key: {raw}"
                    )));
                }
                let (key, value) = mapping.iter().next().ok_or_else(|| {
                    StocksieveError::Configuration(format!("dict must have one key: {raw}"))
                })?;
                match key.as_str() {
                    "and" => {
                        let children = Self::parse_children(value)?;
                        match children.len() {
                            1 => Ok(children.into_iter().next().unwrap()),
                            _ => Ok(Self::and(children, false)),
                        }
                    }
                    "or" => {
                        let children = Self::parse_children(value)?;
                        match children.len() {
                            1 => Ok(children.into_iter().next().unwrap()),
                            _ => Ok(Self::or(children)),
                        }
                    }
                    "not" => {
                        let children = Self::parse_children(value)?;
                        match children.len() {
                            1 => Ok(Self::not(children.into_iter().next().unwrap())),
                            _ => Ok(Self::not(Self::and(children, true))),
                        }
                    }
                    other => Err(StocksieveError::Configuration(format!(
                        "logic can only include and, or, not blocks: {other} found in {raw}"
                    ))),
                }
            }
            other => Err(StocksieveError::Configuration(format!(
                "invalid logic fragment: {other}"
            ))),
        }
    }

    /// Parse a bare `parameter|option` condition into a leaf.
    pub fn condition(condition: &str) -> Result<Self> {
        let (parameter, option) = split_condition(condition)?;
        Ok(Self::leaf(parameter, option))
    }

    fn parse_children(value: &RawLogic) -> Result<Vec<Logic>> {
        match value {
            Value::Array(_) => flatten(value)
                .iter()
                .map(|element| Self::parse(element))
                .collect(),
            single => Ok(vec![Self::parse(single)?]),
        }
    }

    fn leaf(parameter: String, option: String) -> Self {
        let mut hasher = SeaHasher::new();
        hasher.write_u8(TAG_LEAF);
        hasher.write(parameter.as_bytes());
        hasher.write_u8(0);
        hasher.write(option.as_bytes());
        let fingerprint = hasher.finish();
        Self {
            kind: LogicKind::Leaf { parameter, option },
            fingerprint,
        }
    }

    // The implicit marker stays out of the fingerprint: a bare list and an
    // explicit and-mapping are the same conjunction.
    fn and(children: Vec<Logic>, implicit: bool) -> Self {
        let fingerprint = combine(TAG_AND, &children);
        Self {
            kind: LogicKind::And { children, implicit },
            fingerprint,
        }
    }

    fn or(children: Vec<Logic>) -> Self {
        let fingerprint = combine(TAG_OR, &children);
        Self {
            kind: LogicKind::Or { children },
            fingerprint,
        }
    }

    fn not(child: Logic) -> Self {
        let mut hasher = SeaHasher::new();
        hasher.write_u8(TAG_NOT);
        hasher.write_u64(child.fingerprint);
        let fingerprint = hasher.finish();
        Self {
            kind: LogicKind::Not { child: Box::new(child) },
            fingerprint,
        }
    }
}

fn combine(tag: u8, children: &[Logic]) -> u64 {
    let mut hasher = SeaHasher::new();
    hasher.write_u8(tag);
    for child in children {
        hasher.write_u64(child.fingerprint);
    }
    hasher.finish()
}

/// Splice nested lists into one flat element list.
fn flatten(raw: &RawLogic) -> Vec<&RawLogic> {
    let mut elements = Vec::new();
    splice(raw, &mut elements);
    elements
}

fn splice<'a>(raw: &'a RawLogic, into: &mut Vec<&'a RawLogic>) {
    match raw {
        Value::Array(items) => {
            for item in items {
                splice(item, into);
            }
        }
        other => into.push(other),
    }
}

/// Split a `parameter|option` condition, lowercasing the parameter name.
pub fn split_condition(condition: &str) -> Result<(String, String)> {
    match condition.split_once('|') {
        Some((parameter, option)) => Ok((parameter.to_lowercase(), option.to_string())),
        None => Err(StocksieveError::Configuration(format!(
            "condition {condition} is invalid: expected parameter|option"
        ))),
    }
}

/// Parameter names referenced anywhere in a raw logic structure, first-seen
/// order, deduplicated. A null or absent structure mentions nothing.
pub fn mentioned_parameters(raw: &RawLogic) -> Result<Vec<String>> {
    let mut parameters = Vec::new();
    collect_parameters(raw, &mut parameters)?;
    Ok(parameters)
}

fn collect_parameters(raw: &RawLogic, into: &mut Vec<String>) -> Result<()> {
    match raw {
        Value::Null => Ok(()),
        Value::String(condition) => {
            let (parameter, _) = split_condition(condition)?;
            if !into.contains(&parameter) {
                into.push(parameter);
            }
            Ok(())
        }
        Value::Array(items) => {
            for item in items {
                collect_parameters(item, into)?;
            }
            Ok(())
        }
        Value::Object(mapping) => {
            for value in mapping.values() {
                collect_parameters(value, into)?;
            }
            Ok(())
        }
        other => Err(StocksieveError::Configuration(format!(
            "invalid logic fragment: {other}"
        ))),
    }
}
