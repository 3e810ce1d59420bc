use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

// fast hashing where keys are not samples
use core::hash::BuildHasherDefault;
use seahash::SeaHasher;

use crate::error::{Result, StocksieveError};
use crate::membership::Membership;

// ------------- Sample -------------
// A building sample is identified by a plain integer, the way the stock
// file hands them out.
pub type Sample = u64;

pub type OtherHasher = BuildHasherDefault<SeaHasher>;

/// Sentinel used when missing cells are projected for set comparisons.
pub const MISSING: &str = "";

// ------------- Stock -------------
/// An immutable table of building samples by categorical parameters.
///
/// Parameter names are lowercased on construction; cells hold the option
/// value a sample was assigned, or `None` where the source left it blank.
/// Every column spans the full, ordered sample universe.
#[derive(Debug)]
pub struct Stock {
    samples: Vec<Sample>,
    positions: HashMap<Sample, u64, OtherHasher>,
    parameters: Vec<String>,
    columns: HashMap<String, Vec<Option<String>>, OtherHasher>,
}

impl Stock {
    pub fn new(samples: Vec<Sample>, columns: Vec<(String, Vec<Option<String>>)>) -> Result<Self> {
        let mut positions: HashMap<Sample, u64, OtherHasher> = HashMap::default();
        for (position, sample) in samples.iter().enumerate() {
            if positions.insert(*sample, position as u64).is_some() {
                return Err(StocksieveError::Data(format!(
                    "duplicate sample {sample} in the stock"
                )));
            }
        }
        let mut parameters = Vec::with_capacity(columns.len());
        let mut kept: HashMap<String, Vec<Option<String>>, OtherHasher> = HashMap::default();
        for (name, cells) in columns {
            let name = name.to_lowercase();
            if cells.len() != samples.len() {
                return Err(StocksieveError::Data(format!(
                    "column {name} has {} cells for {} samples",
                    cells.len(),
                    samples.len()
                )));
            }
            if kept.insert(name.clone(), cells).is_some() {
                return Err(StocksieveError::Data(format!(
                    "duplicate column {name} in the stock"
                )));
            }
            parameters.push(name);
        }
        Ok(Self {
            samples,
            positions,
            parameters,
            columns: kept,
        })
    }

    pub fn total_samples(&self) -> u64 {
        self.samples.len() as u64
    }
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }
    /// Parameter names in the order the columns were given.
    pub fn parameters(&self) -> &[String] {
        &self.parameters
    }

    fn position(&self, sample: Sample) -> Result<u64> {
        self.positions
            .get(&sample)
            .copied()
            .ok_or_else(|| StocksieveError::Data(format!("unknown sample {sample}")))
    }

    fn column(&self, parameter: &str) -> Result<&[Option<String>]> {
        let parameter = parameter.to_lowercase();
        self.columns
            .get(&parameter)
            .map(Vec::as_slice)
            .ok_or_else(|| {
                StocksieveError::Data(format!("parameter {parameter} is not in the stock"))
            })
    }

    /// Membership of every sample whose `parameter` equals `option`.
    /// Values compare case-sensitively; missing cells never match.
    pub fn matching(&self, parameter: &str, option: &str) -> Result<Membership> {
        let column = self.column(parameter)?;
        let mut membership = Membership::none(self.total_samples());
        for (position, cell) in column.iter().enumerate() {
            if cell.as_deref() == Some(option) {
                membership.insert(position as u64);
            }
        }
        Ok(membership)
    }

    /// Distinct values of one column across a group of samples, with missing
    /// cells coerced to the empty-string sentinel.
    pub fn distinct_values(&self, parameter: &str, group: &[Sample]) -> Result<BTreeSet<String>> {
        let column = self.column(parameter)?;
        let mut values = BTreeSet::new();
        for sample in group {
            let position = self.position(*sample)? as usize;
            values.insert(column[position].clone().unwrap_or_else(|| MISSING.to_string()));
        }
        Ok(values)
    }

    /// Distinct value tuples across several columns for a group of samples.
    pub fn distinct_tuples(
        &self,
        parameters: &[String],
        group: &[Sample],
    ) -> Result<BTreeSet<Vec<String>>> {
        let columns = parameters
            .iter()
            .map(|parameter| self.column(parameter))
            .collect::<Result<Vec<_>>>()?;
        let mut tuples = BTreeSet::new();
        for sample in group {
            let position = self.position(*sample)? as usize;
            tuples.insert(
                columns
                    .iter()
                    .map(|column| {
                        column[position]
                            .clone()
                            .unwrap_or_else(|| MISSING.to_string())
                    })
                    .collect(),
            );
        }
        Ok(tuples)
    }

    // ------------- Loading -------------
    /// Load a stock from a delimited file, promoting the building column to
    /// the sample index. This is the only file input on the stock side;
    /// analysis itself never touches the filesystem.
    pub fn from_delimited(path: &Path, delimiter: char) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_delimited_str(&text, delimiter)
    }

    pub fn from_delimited_str(text: &str, delimiter: char) -> Result<Self> {
        let mut lines = text.lines().filter(|line| !line.trim().is_empty());
        let header = lines.next().ok_or_else(|| {
            StocksieveError::Data("the stock file has no header row".to_string())
        })?;
        let names: Vec<String> = header
            .split(delimiter)
            .map(|name| name.trim().to_lowercase())
            .collect();
        let index = names
            .iter()
            .position(|name| name == "building_id" || name == "building")
            .ok_or_else(|| {
                StocksieveError::Data("the stock file has no building column".to_string())
            })?;
        let mut samples = Vec::new();
        let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); names.len()];
        for line in lines {
            let row: Vec<&str> = line.split(delimiter).map(str::trim).collect();
            if row.len() != names.len() {
                return Err(StocksieveError::Data(format!(
                    "row {line:?} has {} cells for {} columns",
                    row.len(),
                    names.len()
                )));
            }
            for (column, value) in row.iter().enumerate() {
                if column == index {
                    let sample = value.parse::<Sample>().map_err(|_| {
                        StocksieveError::Data(format!(
                            "sample identifier {value} is not an integer"
                        ))
                    })?;
                    samples.push(sample);
                } else {
                    cells[column].push(if value.is_empty() {
                        None
                    } else {
                        Some((*value).to_string())
                    });
                }
            }
        }
        let columns = names
            .into_iter()
            .enumerate()
            .filter(|(column, _)| *column != index)
            .map(|(column, name)| (name, std::mem::take(&mut cells[column])))
            .collect();
        Self::new(samples, columns)
    }
}
