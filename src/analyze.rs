//! Orchestration over a project and a stock: the applicability table, the
//! detailed per-option reports, and the unique-characteristic reports.
//!
//! Everything here is a thin consumer of the evaluator and reporter; the
//! rendering helpers turn their structured outputs into the report text.

use serde::Serialize;
use tracing::info;

use crate::combination::{self, Combinator, MAX_COMBINATION_OPTIONS};
use crate::error::{Result, StocksieveError};
use crate::evaluate::Evaluator;
use crate::logic::{self, Logic};
use crate::membership::{Membership, to_percent};
use crate::project::{Project, Upgrade, UpgradeOption};
use crate::stock::{Sample, Stock};
use crate::trace::{Reporter, render_trace};
use crate::unique::{self, UniqueOutcome};

/// One row of the applicability report. The aggregate "All" row per upgrade
/// carries `option_num = -1` and no cost/lifetime.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApplicabilityRecord {
    pub upgrade: String,
    pub upgrade_name: String,
    pub option_num: i32,
    pub option: String,
    pub applicable_to: u64,
    pub applicable_percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifetime: Option<f64>,
}

/// Orchestrates the evaluator over every configured upgrade and option.
///
/// All public entry points take 1-indexed upgrade/option numbers; 0 is a
/// hard error, never coerced. Parallel analyses need independent instances:
/// the memo cache belongs to this analyzer alone.
pub struct Analyzer<'a> {
    project: &'a Project,
    stock: &'a Stock,
    evaluator: Evaluator<'a>,
    reporter: Reporter<'a>,
    total_samples: u64,
}

impl<'a> Analyzer<'a> {
    pub fn new(project: &'a Project, stock: &'a Stock) -> Self {
        Self {
            project,
            stock,
            evaluator: Evaluator::new(stock),
            reporter: Reporter::new(stock),
            total_samples: stock.total_samples(),
        }
    }

    /// Applicability counts for every option of every upgrade, plus one
    /// aggregate row per upgrade.
    pub fn report(&mut self) -> Result<Vec<ApplicabilityRecord>> {
        self.evaluator.clear_cache();
        let mut records = Vec::new();
        for (index, upgrade) in self.project.upgrades.iter().enumerate() {
            info!(upgrade = index + 1, name = %upgrade.upgrade_name, "analyzing upgrade");
            let package = self.package_membership(upgrade)?;
            let mut all_applied = Membership::none(self.total_samples);
            for (option_index, option) in upgrade.options.iter().enumerate() {
                let logic = option_logic(option)?;
                let mut applied = self.evaluator.evaluate(&logic)?;
                applied.intersect_with(&package);
                all_applied.union_with(&applied);
                let count = applied.count();
                records.push(ApplicabilityRecord {
                    upgrade: (index + 1).to_string(),
                    upgrade_name: upgrade.upgrade_name.clone(),
                    option_num: (option_index + 1) as i32,
                    option: option.option.clone(),
                    applicable_to: count,
                    applicable_percent: to_percent(count, self.total_samples),
                    cost: Some(option.cost),
                    lifetime: Some(option.lifetime),
                });
            }
            let count = all_applied.count();
            records.push(ApplicabilityRecord {
                upgrade: (index + 1).to_string(),
                upgrade_name: upgrade.upgrade_name.clone(),
                option_num: -1,
                option: "All".to_string(),
                applicable_to: count,
                applicable_percent: to_percent(count, self.total_samples),
                cost: None,
                lifetime: None,
            });
        }
        Ok(records)
    }

    /// Human-readable apply report for one option, or for a whole upgrade
    /// (every option plus the combination overlap summary) when `option_num`
    /// is absent.
    pub fn detailed_report(
        &mut self,
        upgrade_num: usize,
        option_num: Option<usize>,
    ) -> Result<String> {
        self.evaluator.clear_cache();
        if upgrade_num == 0 || option_num == Some(0) {
            return Err(StocksieveError::Configuration(format!(
                "upgrades and options are 1-indexed, got {upgrade_num}/{option_num:?}"
            )));
        }
        match option_num {
            Some(option_num) => Ok(self.option_report(upgrade_num, option_num)?.1),
            None => self.upgrade_report(upgrade_num),
        }
    }

    /// Explain what distinguishes the `compare` group from the `base` group
    /// over one upgrade's relevant parameters.
    pub fn unique_characteristics(
        &self,
        upgrade_num: usize,
        base: &[Sample],
        compare: &[Sample],
    ) -> Result<UniqueOutcome> {
        if upgrade_num == 0 {
            return Err(StocksieveError::Configuration(format!(
                "upgrades are 1-indexed, got {upgrade_num}"
            )));
        }
        let upgrade = self.upgrade(upgrade_num)?;
        let relevant = relevant_parameters(upgrade)?;
        unique::find_unique_characteristics(self.stock, &relevant, base, compare)
    }

    fn upgrade(&self, upgrade_num: usize) -> Result<&'a Upgrade> {
        self.project.upgrades.get(upgrade_num - 1).ok_or_else(|| {
            StocksieveError::Configuration(format!("the project has no upgrade {upgrade_num}"))
        })
    }

    fn package_membership(&mut self, upgrade: &Upgrade) -> Result<Membership> {
        match &upgrade.package_apply_logic {
            Some(raw) => {
                let logic = Logic::parse(raw)?;
                self.evaluator.evaluate(&logic)
            }
            None => Ok(Membership::all(self.total_samples)),
        }
    }

    fn upgrade_report(&mut self, upgrade_num: usize) -> Result<String> {
        let upgrade = self.upgrade(upgrade_num)?;
        let n_options = upgrade.options.len();
        let mut vectors = Vec::new();
        let mut or_all = Membership::none(self.total_samples);
        let mut and_all = Membership::all(self.total_samples);
        let mut out = String::new();
        for option_index in 0..n_options {
            let (membership, text) = self.option_report(upgrade_num, option_index + 1)?;
            out.push_str(&text);
            or_all.union_with(&membership);
            and_all.intersect_with(&membership);
            if n_options <= MAX_COMBINATION_OPTIONS {
                vectors.push(membership);
            }
        }
        if n_options <= MAX_COMBINATION_OPTIONS {
            out.push_str(&render_combination_report(&vectors, Combinator::And));
            out.push_str(&render_combination_report(&vectors, Combinator::Or));
        } else {
            let text = format!(
                "Combination report not printed because {n_options} options would require {} rows.",
                combination::row_count(n_options)
            );
            out.push_str(&text);
            out.push('\n');
            out.push_str(&"-".repeat(text.len()));
            out.push('\n');
        }
        out.push_str(&format!(
            "All of the options (and-ing) were applied to: {} ({:.1}%)\n",
            and_all.count(),
            to_percent(and_all.count(), self.total_samples)
        ));
        out.push_str(&format!(
            "Any of the options (or-ing) were applied to: {} ({:.1}%)\n",
            or_all.count(),
            to_percent(or_all.count(), self.total_samples)
        ));
        Ok(out)
    }

    fn option_report(&mut self, upgrade_num: usize, option_num: usize) -> Result<(Membership, String)> {
        let upgrade = self.upgrade(upgrade_num)?;
        let option = upgrade.options.get(option_num - 1).ok_or_else(|| {
            StocksieveError::Configuration(format!(
                "the project has no upgrade/option {upgrade_num}/{option_num}"
            ))
        })?;
        let mut out = String::new();
        let header = format!(
            "Option Apply Report for - Upgrade{upgrade_num}:'{}', Option{option_num}:'{}'",
            upgrade.upgrade_name, option.option
        );
        out.push_str(&"-".repeat(header.len()));
        out.push('\n');
        out.push_str(&header);
        out.push('\n');
        out.push_str(&"-".repeat(header.len()));
        out.push('\n');

        let logic = option_logic(option)?;
        let (mut membership, trace) = self.reporter.trace(&logic)?;
        push_trace(&mut out, &render_trace(&trace));

        if let Some(raw) = &upgrade.package_apply_logic {
            let package_logic = Logic::parse(raw)?;
            let (package, package_trace) = self.reporter.trace(&package_logic)?;
            out.push_str("Package Apply Logic Report\n");
            out.push_str("--------------------------\n");
            push_trace(&mut out, &render_trace(&package_trace));
            membership.intersect_with(&package);
        }

        let count = membership.count();
        let footer = format!(
            "Overall applied to => {count} ({:.1}%).",
            to_percent(count, self.total_samples)
        );
        out.push_str(&footer);
        out.push('\n');
        out.push_str(&"-".repeat(footer.len()));
        out.push('\n');
        Ok((membership, out))
    }
}

/// The logic one option applies under: its own apply logic when given,
/// otherwise the option's `parameter|value` condition itself.
fn option_logic(option: &UpgradeOption) -> Result<Logic> {
    match &option.apply_logic {
        Some(raw) => Logic::parse(raw),
        None => Logic::condition(&option.option),
    }
}

/// Every parameter one upgrade touches: each option's own parameter followed
/// by the parameters its apply logic mentions, first-seen deduplicated.
fn relevant_parameters(upgrade: &Upgrade) -> Result<Vec<String>> {
    let mut parameters = Vec::new();
    for option in &upgrade.options {
        let (parameter, _) = logic::split_condition(&option.option)?;
        if !parameters.contains(&parameter) {
            parameters.push(parameter);
        }
        if let Some(raw) = &option.apply_logic {
            for parameter in logic::mentioned_parameters(raw)? {
                if !parameters.contains(&parameter) {
                    parameters.push(parameter);
                }
            }
        }
    }
    Ok(parameters)
}

fn push_trace(out: &mut String, lines: &[String]) {
    let footer = lines.last().map(String::len).unwrap_or(0);
    for line in lines {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(&"-".repeat(footer));
    out.push('\n');
}

/// Render one and/or combination report over the per-option vectors.
fn render_combination_report(vectors: &[Membership], combinator: Combinator) -> String {
    if vectors.len() < 2 {
        return String::new();
    }
    let header = format!("Options '{}' combination report", combinator.word());
    let rule = "-".repeat(header.len());
    let mut out = String::new();
    out.push_str(&rule);
    out.push('\n');
    out.push_str(&header);
    out.push('\n');
    for group in combination::combine(vectors, combinator) {
        out.push_str(&rule);
        out.push('\n');
        for row in group.rows {
            out.push_str(&format!(
                "{}: {} ({:.1}%)\n",
                row.description, row.count, row.percent
            ));
        }
    }
    out.push_str(&rule);
    out.push('\n');
    out
}
