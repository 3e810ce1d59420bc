//! Stocksieve – applicability analysis for building-stock upgrade scenarios.
//!
//! A *stock* is a table of simulated building samples by categorical
//! parameters. A project configuration defines *upgrades*, each an ordered
//! set of *options* with boolean *apply logic* (and/or/not over
//! `parameter|value` conditions) deciding which samples the option applies
//! to. Stocksieve reduces that logic into per-sample membership vectors and
//! reports applicability counts, overlap between options, and the
//! characteristics that distinguish one group of samples from another.
//!
//! ## Modules
//! * [`stock`] – The in-memory sample table and its delimited-file loader.
//! * [`membership`] – Fixed-universe boolean vectors backed by bitsets.
//! * [`logic`] – The typed apply-logic expression tree; raw nested
//!   configuration structures are parsed and normalized here, once, with a
//!   structural fingerprint attached to every node.
//! * [`evaluate`] – The recursive reducer from logic to membership, with
//!   memoized compound sub-results keyed by fingerprint.
//! * [`trace`] – A cache-free mirror of the reducer that records how each
//!   sub-expression contributed to the final count.
//! * [`combination`] – and/or overlap counts across every small subset of
//!   an upgrade's options.
//! * [`unique`] – Columns (and small column combinations) whose values are
//!   unique to one of two disjoint sample groups.
//! * [`project`] – The serde model of the project configuration and its
//!   loader.
//! * [`analyze`] – The orchestration layer tying all of the above into the
//!   applicability and detailed reports.
//!
//! ## Quick Start
//! ```
//! use serde_json::json;
//! use stocksieve::analyze::Analyzer;
//! use stocksieve::project::Project;
//! use stocksieve::stock::Stock;
//!
//! let stock = Stock::new(
//!     vec![1, 2, 3, 4],
//!     vec![("Heating Type".to_string(), vec![
//!         Some("gas".to_string()),
//!         Some("gas".to_string()),
//!         Some("electric".to_string()),
//!         Some("electric".to_string()),
//!     ])],
//! ).unwrap();
//! let project = Project::from_value(json!({
//!     "upgrades": [{
//!         "upgrade_name": "Electrify heating",
//!         "options": [{"option": "heating type|electric"}],
//!     }]
//! })).unwrap();
//! let mut analyzer = Analyzer::new(&project, &stock);
//! let records = analyzer.report().unwrap();
//! assert_eq!(records[0].applicable_to, 2);
//! assert_eq!(records[0].applicable_percent, 50.0);
//! ```
//!
//! ## Errors
//! Malformed logic or configuration surfaces as
//! [`error::StocksieveError::Configuration`], a parameter missing from the
//! stock as [`error::StocksieveError::Data`]; both abort the report that
//! triggered them, with the offending fragment in the message.

pub mod analyze;
pub mod combination;
pub mod error;
pub mod evaluate;
pub mod logic;
pub mod membership;
pub mod project;
pub mod stock;
pub mod trace;
pub mod unique;
