//! Database configuration.
//!
//! Mirrors the layout of a `db-config.yaml` document: a default database name
//! and, per database, one entry per data file describing where its LoF
//! annotation lives and which filters it predefines.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::error::{LofFilterError, Result};
use crate::filter::Filter;

/// How LoF calls are stored in a database's annotation field.
#[derive(Debug, Clone, PartialEq)]
pub struct LofConfig {
    /// INFO key holding the annotation string (e.g. "vep").
    pub id: String,
    /// Column carrying the LoF confidence (e.g. "LoF").
    pub annot: String,
    /// Column carrying the gene symbol.
    pub symbol: String,
    /// Column carrying the transcript identifier.
    pub transcript: String,
    /// Confidence value counted as high-confidence.
    pub confidence: String,
    /// FILTER value counted as passing quality control.
    pub pass: String,
}

impl Default for LofConfig {
    fn default() -> Self {
        Self {
            id: "vep".to_string(),
            annot: "LoF".to_string(),
            symbol: default_symbol(),
            transcript: default_transcript(),
            confidence: "HC".to_string(),
            pass: default_pass(),
        }
    }
}

/// One data file of a database (e.g. gnomAD exomes).
#[derive(Debug, Clone, PartialEq)]
pub struct DataFileConfig {
    pub name: String,
    pub url: String,
    pub lof: LofConfig,
    /// Named filters, name -> expression.
    pub predefined_filters: BTreeMap<String, String>,
    /// Population group -> INFO key of its allele frequency.
    pub pop_freqs: BTreeMap<String, String>,
}

/// A validated database selected from the configuration document.
#[derive(Debug, Clone, PartialEq)]
pub struct DbConfig {
    pub name: String,
    pub files: Vec<DataFileConfig>,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    default: Option<String>,
    #[serde(default)]
    databases: BTreeMap<String, BTreeMap<String, RawDataFile>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct RawDataFile {
    url: Option<String>,
    lof: Option<RawLof>,
    #[serde(default)]
    predefined_filters: BTreeMap<String, String>,
    #[serde(default)]
    pop_freqs: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct RawLof {
    id: Option<String>,
    annot: Option<String>,
    #[serde(default = "default_symbol")]
    symbol: String,
    #[serde(default = "default_transcript")]
    transcript: String,
    filters: Option<RawLofFilters>,
}

#[derive(Debug, Deserialize)]
struct RawLofFilters {
    confidence: Option<String>,
    #[serde(default = "default_pass")]
    quality: String,
}

fn default_symbol() -> String {
    "SYMBOL".to_string()
}

fn default_transcript() -> String {
    "Feature".to_string()
}

fn default_pass() -> String {
    "PASS".to_string()
}

fn missing(what: &str, file: &str) -> LofFilterError {
    LofFilterError::ConfigurationError(format!("Missing {} for {} in configuration file", what, file))
}

impl RawDataFile {
    fn validate(self, name: &str) -> Result<DataFileConfig> {
        let url = self.url.ok_or_else(|| missing("url", name))?;
        let lof = self.lof.ok_or_else(|| missing("lof field", name))?;
        let id = lof.id.ok_or_else(|| missing("lof id", name))?;
        let annot = lof.annot.ok_or_else(|| missing("lof annot", name))?;
        let filters = lof.filters.ok_or_else(|| missing("lof filters", name))?;
        let confidence = filters
            .confidence
            .ok_or_else(|| missing("lof confidence filter", name))?;

        Ok(DataFileConfig {
            name: name.to_string(),
            url,
            lof: LofConfig {
                id,
                annot,
                symbol: lof.symbol,
                transcript: lof.transcript,
                confidence,
                pass: filters.quality,
            },
            predefined_filters: self.predefined_filters,
            pop_freqs: self.pop_freqs,
        })
    }
}

impl DbConfig {
    /// Parse a configuration document and select one database.
    ///
    /// # Arguments
    ///
    /// * `yaml` - The configuration document
    /// * `db` - Database name; `None` selects the document's default
    pub fn from_yaml(yaml: &str, db: Option<&str>) -> Result<Self> {
        let mut raw: RawConfig = serde_yaml::from_str(yaml)?;

        let name = match db {
            Some(name) => name.to_string(),
            None => raw
                .default
                .filter(|d| !d.is_empty())
                .ok_or_else(|| LofFilterError::ConfigurationError("Missing default".to_string()))?,
        };

        let files = raw.databases.remove(&name).ok_or_else(|| {
            LofFilterError::ConfigurationError(format!("Unknown database {}", name))
        })?;
        if files.is_empty() {
            return Err(LofFilterError::ConfigurationError(format!(
                "Database {} has no data files",
                name
            )));
        }

        let files = files
            .into_iter()
            .map(|(file, raw_file)| raw_file.validate(&file))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(database = %name, files = files.len(), "loaded database configuration");
        Ok(Self { name, files })
    }

    /// Names of every predefined filter across the database's files.
    pub fn predefined_filter_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .files
            .iter()
            .flat_map(|f| f.predefined_filters.keys().map(String::as_str))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Build the filter chain for a run.
    ///
    /// Every expression is validated here, so configuration mistakes surface
    /// before any record is queried. A predefined name that two data files
    /// define differently is rejected.
    ///
    /// # Arguments
    ///
    /// * `predefined` - Names of predefined filters to enable
    /// * `additional` - Free-form filter expressions
    pub fn build_filters(&self, predefined: &[&str], additional: &[&str]) -> Result<Vec<Filter>> {
        let mut filters = Vec::with_capacity(predefined.len() + additional.len());

        for name in predefined {
            let mut expressions = self.files.iter().filter_map(|f| f.predefined_filters.get(*name));
            let expression = expressions
                .next()
                .ok_or_else(|| LofFilterError::UnknownFilter(name.to_string()))?;
            if let Some(other) = expressions.find(|e| *e != expression) {
                return Err(LofFilterError::FilterConfigurationError(format!(
                    "predefined filter {} is defined as both {:?} and {:?}",
                    name, expression, other
                )));
            }
            filters.push(Filter::new(name, expression)?);
        }
        for expression in additional {
            filters.push(Filter::new(expression, expression)?);
        }

        Ok(filters)
    }
}
