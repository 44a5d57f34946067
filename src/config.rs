//! Run configuration.
//!
//! A [`RunConfig`] lists the formulas to apply and the datasets to analyze.
//! It is stored as plain JSON on disk:
//! ```json
//! {
//!   "output_dir": "output",
//!   "formulas": ["mean", "heat_index"],
//!   "datasets": [{
//!     "name": "north_winter",
//!     "input": "GLASSBOX-T174H-north-winter.csv",
//!     "output_file": "glassbox_analysis_north_winter.csv",
//!     "metric": "closest_to_reference",
//!     "candidates": [
//!       { "name": "double-glass", "temperature_column": "double-glass-temp",
//!         "humidity_column": "double-glass-humidity" }
//!     ],
//!     "reference": { "name": "environment", "temperature_column": "environment-temp",
//!                    "humidity_column": "environment-humidity" }
//!   }]
//! }
//! ```

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use crate::analyzers::formula::Formula;
use crate::analyzers::types::Metric;
use crate::output::INDEX_FILE;

const DIRECTIONS: [&str; 3] = ["south-glass", "west-glass", "east-glass"];
const GLASS_TYPES: [&str; 3] = ["double-glass", "triple-glass", "quad-glass"];

/// A candidate option and the columns holding its measurements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateConfig {
    pub name: String,
    pub temperature_column: String,
    pub humidity_column: String,
}

impl CandidateConfig {
    pub fn new(name: &str, temperature_column: &str, humidity_column: &str) -> Self {
        Self {
            name: name.to_string(),
            temperature_column: temperature_column.to_string(),
            humidity_column: humidity_column.to_string(),
        }
    }

    /// `Temperature[C]-<name>` / `Humidity[%rH]-<name>` columns.
    pub fn direction(name: &str) -> Self {
        Self::new(
            name,
            &format!("Temperature[C]-{name}"),
            &format!("Humidity[%rH]-{name}"),
        )
    }

    /// `<name>-temp` / `<name>-humidity` columns.
    pub fn glassbox(name: &str) -> Self {
        Self::new(name, &format!("{name}-temp"), &format!("{name}-humidity"))
    }
}

/// Layout of a single dataset and where its statistics go.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetConfig {
    pub name: String,
    pub input: PathBuf,
    pub output_file: String,
    /// Column whose value labels the group of each row. All rows form one
    /// group when unset.
    #[serde(default)]
    pub group_column: Option<String>,
    pub metric: Metric,
    pub candidates: Vec<CandidateConfig>,
    #[serde(default)]
    pub reference: Option<CandidateConfig>,
}

impl DatasetConfig {
    /// Facade comparison: lowest score wins, north façade is the baseline.
    pub fn directions(input: impl Into<PathBuf>, with_concrete: bool) -> Self {
        let mut candidates: Vec<CandidateConfig> =
            DIRECTIONS.iter().map(|d| CandidateConfig::direction(d)).collect();
        let (name, output_file) = if with_concrete {
            candidates.insert(
                1,
                CandidateConfig::new(
                    "south-con",
                    "T1ENVIRO[C]-south-con",
                    "HUMD1ENVIRO[%rH]-south-con",
                ),
            );
            ("with_concrete", "statistics_with_concrete.csv")
        } else {
            ("no_concrete", "statistics_no_concrete.csv")
        };

        Self {
            name: name.to_string(),
            input: input.into(),
            output_file: output_file.to_string(),
            group_column: None,
            metric: Metric::Lowest,
            candidates,
            reference: Some(CandidateConfig::direction("north-glass")),
        }
    }

    /// Glass structure comparison: the panel whose reading is closest to the
    /// outdoor environment wins.
    pub fn glassbox(name: &str, input: impl Into<PathBuf>) -> Self {
        Self {
            name: name.to_string(),
            input: input.into(),
            output_file: format!("glassbox_analysis_{name}.csv"),
            group_column: None,
            metric: Metric::ClosestToReference,
            candidates: GLASS_TYPES.iter().map(|g| CandidateConfig::glassbox(g)).collect(),
            reference: Some(CandidateConfig::glassbox("environment")),
        }
    }

    pub fn with_group_column(mut self, column: Option<String>) -> Self {
        self.group_column = column;
        self
    }

    pub fn candidate_names(&self) -> Vec<String> {
        self.candidates.iter().map(|c| c.name.clone()).collect()
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            bail!("dataset name must not be empty");
        }
        if self.candidates.is_empty() {
            bail!("dataset '{}' has no candidates", self.name);
        }
        let mut seen = HashSet::new();
        for c in &self.candidates {
            if !seen.insert(c.name.as_str()) {
                bail!("dataset '{}' lists candidate '{}' twice", self.name, c.name);
            }
        }
        let mut components = Path::new(&self.output_file).components();
        if !matches!(
            (components.next(), components.next()),
            (Some(Component::Normal(_)), None)
        ) || self.output_file.ends_with(std::path::is_separator)
        {
            bail!(
                "dataset '{}': output file '{}' must be a plain file name",
                self.name,
                self.output_file
            );
        }
        if self.output_file == INDEX_FILE {
            bail!(
                "dataset '{}': output file name '{INDEX_FILE}' is reserved",
                self.name
            );
        }
        if self.metric.needs_reference() && self.reference.is_none() {
            bail!(
                "dataset '{}' uses metric {:?} but has no reference",
                self.name,
                self.metric
            );
        }
        Ok(())
    }
}

/// Root configuration for one analyzer run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_formulas")]
    pub formulas: Vec<Formula>,
    pub datasets: Vec<DatasetConfig>,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_formulas() -> Vec<Formula> {
    Formula::ALL.to_vec()
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            formulas: default_formulas(),
            datasets: vec![
                DatasetConfig::directions("ICONALLDATA-no-concrete.csv", false),
                DatasetConfig::directions("ICONALLDATA-with-concrete.csv", true),
                DatasetConfig::glassbox("north_winter", "GLASSBOX-T174H-north-winter.csv"),
                DatasetConfig::glassbox("south_summer", "GLASSBOX-T174H-south-summer.csv"),
            ],
        }
    }
}

impl RunConfig {
    /// Loads and validates the config from a JSON file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config '{}'", path.display()))?;
        let config: RunConfig = serde_json::from_str(&content)
            .with_context(|| format!("parsing config '{}'", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Single-dataset config.
    pub fn single(output_dir: PathBuf, formulas: Vec<Formula>, dataset: DatasetConfig) -> Self {
        let formulas = if formulas.is_empty() {
            default_formulas()
        } else {
            formulas
        };
        Self {
            output_dir,
            formulas,
            datasets: vec![dataset],
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.formulas.is_empty() {
            bail!("at least one formula is required");
        }
        if self.datasets.is_empty() {
            bail!("at least one dataset is required");
        }
        let mut names = HashSet::new();
        let mut outputs = HashSet::new();
        for d in &self.datasets {
            d.validate()?;
            if !names.insert(d.name.as_str()) {
                bail!("dataset name '{}' is used twice", d.name);
            }
            if !outputs.insert(d.output_file.as_str()) {
                bail!("output file '{}' is used twice", d.output_file);
            }
        }
        Ok(())
    }
}
