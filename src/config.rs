// src/config.rs
//
// Input/output locations for a pipeline run. Defaults point at `data/`; a YAML file
// can override any subset of the fields.

use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::PipelineError;

/// The three known exports, in processing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Generation,
    Consumption,
    Prices,
}

impl Source {
    pub const ALL: [Source; 3] = [Source::Generation, Source::Consumption, Source::Prices];

    pub fn name(self) -> &'static str {
        match self {
            Source::Generation => "generation",
            Source::Consumption => "consumption",
            Source::Prices => "prices",
        }
    }

    pub fn file_name(self) -> &'static str {
        match self {
            Source::Generation => "generation.csv",
            Source::Consumption => "consumption.csv",
            Source::Prices => "prices.csv",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Parquet,
}

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_OUTPUT_FILE: &str = "energy_dataset_master.csv";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub generation: PathBuf,
    pub consumption: PathBuf,
    pub prices: PathBuf,
    pub output: PathBuf,
    pub format: OutputFormat,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::in_dir(DEFAULT_DATA_DIR)
    }
}

impl PipelineConfig {
    /// Default file names, all under `dir`.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            generation: dir.join(Source::Generation.file_name()),
            consumption: dir.join(Source::Consumption.file_name()),
            prices: dir.join(Source::Prices.file_name()),
            output: dir.join(DEFAULT_OUTPUT_FILE),
            format: OutputFormat::Csv,
        }
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        let load = || -> anyhow::Result<Self> {
            let text = fs::read_to_string(path).context("reading config")?;
            serde_yaml::from_str(&text).context("parsing YAML")
        };
        load().map_err(|source| PipelineError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn path_for(&self, source: Source) -> &Path {
        match source {
            Source::Generation => &self.generation,
            Source::Consumption => &self.consumption,
            Source::Prices => &self.prices,
        }
    }
}
