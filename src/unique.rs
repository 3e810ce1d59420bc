use std::collections::{BTreeSet, HashMap};

use crate::combination::combinations;
use crate::error::Result;
use crate::stock::{OtherHasher, Sample, Stock};

/// Upper bound (exclusive) on the column-combination size explored when
/// explaining what distinguishes one group of samples from another.
pub const MAX_UNIQUE_COMBINATION: usize = 5;

/// One discriminating column subset: every value tuple listed here appears
/// in the compared group and never in the base group.
#[derive(Debug, Clone, PartialEq)]
pub struct UniqueFinding {
    pub columns: Vec<String>,
    /// Sorted for stable rendering.
    pub values: Vec<Vec<String>>,
}

/// The finder's full outcome, presentation-ready but unformatted;
/// [`render_unique`] is the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct UniqueOutcome {
    pub compare_count: usize,
    pub base_count: usize,
    pub relevant: Vec<String>,
    pub findings: Vec<UniqueFinding>,
    /// Combination sizes (1 included) that produced no findings.
    pub exhausted_sizes: Vec<usize>,
}

/// Find columns and small column combinations whose values appear only in
/// the `compare` group.
///
/// The single-column pass covers the whole table; the multi-column passes
/// are bounded to combinations of the `relevant` parameters. A tuple whose
/// projection onto an already recorded smaller subset is explained by that
/// subset is dropped, so larger combinations only report genuinely new
/// information.
pub fn find_unique_characteristics(
    stock: &Stock,
    relevant: &[String],
    base: &[Sample],
    compare: &[Sample],
) -> Result<UniqueOutcome> {
    let mut findings = Vec::new();
    let mut exhausted_sizes = Vec::new();
    let mut recorded: HashMap<Vec<String>, BTreeSet<Vec<String>>, OtherHasher> =
        HashMap::default();

    for column in stock.parameters() {
        let in_compare = stock.distinct_values(column, compare)?;
        let in_base = stock.distinct_values(column, base)?;
        let only: BTreeSet<Vec<String>> = in_compare
            .difference(&in_base)
            .map(|value| vec![value.clone()])
            .collect();
        if !only.is_empty() {
            recorded.insert(vec![column.clone()], only.clone());
            findings.push(UniqueFinding {
                columns: vec![column.clone()],
                values: only.into_iter().collect(),
            });
        }
    }
    if findings.is_empty() {
        exhausted_sizes.push(1);
    }

    for size in 2..(relevant.len() + 1).min(MAX_UNIQUE_COMBINATION) {
        let mut found = 0usize;
        for indices in combinations(relevant.len(), size) {
            let columns: Vec<String> = indices
                .iter()
                .map(|index| relevant[*index].clone())
                .collect();
            let compare_tuples = stock.distinct_tuples(&columns, compare)?;
            let base_tuples = stock.distinct_tuples(&columns, base)?;
            let mut only: BTreeSet<Vec<String>> =
                compare_tuples.difference(&base_tuples).cloned().collect();

            // drop tuples explained by a smaller subset recorded earlier
            for sub_size in 1..columns.len() {
                for sub_indices in combinations(columns.len(), sub_size) {
                    let sub_columns: Vec<String> = sub_indices
                        .iter()
                        .map(|index| columns[*index].clone())
                        .collect();
                    if let Some(known) = recorded.get(&sub_columns) {
                        only.retain(|tuple| {
                            let projected: Vec<String> = sub_indices
                                .iter()
                                .map(|index| tuple[*index].clone())
                                .collect();
                            !known.contains(&projected)
                        });
                    }
                }
            }

            if !only.is_empty() {
                found += 1;
                recorded.insert(columns.clone(), only.clone());
                findings.push(UniqueFinding {
                    columns,
                    values: only.into_iter().collect(),
                });
            }
        }
        if found == 0 {
            exhausted_sizes.push(size);
        }
    }

    Ok(UniqueOutcome {
        compare_count: compare.len(),
        base_count: base.len(),
        relevant: relevant.to_vec(),
        findings,
        exhausted_sizes,
    })
}

/// Render the outcome the way the detailed reports print it. `label` names
/// the compared group, e.g. "no-change".
pub fn render_unique(outcome: &UniqueOutcome, label: &str) -> Vec<String> {
    let mut lines = Vec::new();
    lines.push(format!(
        "Comparing {} buildings with {} other buildings.",
        outcome.compare_count, outcome.base_count
    ));
    for finding in outcome.findings.iter().filter(|f| f.columns.len() == 1) {
        let values: Vec<&str> = finding.values.iter().map(|tuple| tuple[0].as_str()).collect();
        lines.push(format!(
            "Only {label} buildings have {} in {values:?}",
            finding.columns[0]
        ));
    }
    if outcome.exhausted_sizes.contains(&1) {
        lines.push("No 1-column unique characteristics found.".to_string());
    }
    for size in 2..(outcome.relevant.len() + 1).min(MAX_UNIQUE_COMBINATION) {
        lines.push(format!(
            "Checking {size} column combinations out of {:?}",
            outcome.relevant
        ));
        for finding in outcome.findings.iter().filter(|f| f.columns.len() == size) {
            lines.push(format!(
                "Only {label} buildings have {:?} in {:?}",
                finding.columns, finding.values
            ));
        }
        if outcome.exhausted_sizes.contains(&size) {
            lines.push(format!("No {size}-column unique characteristics found."));
        }
    }
    lines
}
