//! Query orchestration.
//!
//! For every database file and every gene with a resolved location, fetch
//! the overlapping records, parse and split them, and record the outcome on
//! the gene. Failures are isolated per record and per (gene, file) pair.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use crate::config::DataFileConfig;
use crate::error::{LofFilterError, Result};
use crate::filter::Filter;
use crate::gene::{Gene, GeneStatus};
use crate::header::AnnotationSchema;
use crate::transcript::split_transcripts;
use crate::variant::{Variant, trim_line_end};

/// A genomic interval, inclusive on both ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub chrom: String,
    pub start: u64,
    pub end: u64,
}

impl Region {
    /// Parse `chrom:start-end`.
    pub fn parse(location: &str) -> Result<Self> {
        let invalid = || LofFilterError::ConfigurationError(format!("Invalid region {:?}", location));

        let (chrom, range) = location.trim().rsplit_once(':').ok_or_else(invalid)?;
        let (start, end) = range.split_once('-').ok_or_else(invalid)?;
        let start: u64 = start.trim().parse().map_err(|_| invalid())?;
        let end: u64 = end.trim().parse().map_err(|_| invalid())?;
        if chrom.is_empty() || start > end {
            return Err(invalid());
        }

        Ok(Self {
            chrom: chrom.to_string(),
            start,
            end,
        })
    }

    pub fn contains(&self, pos: u64) -> bool {
        (self.start..=self.end).contains(&pos)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}-{}", self.chrom, self.start, self.end)
    }
}

/// Records yielded by a range query, in store order.
pub type Records<'a> = Box<dyn Iterator<Item = Result<String>> + 'a>;

/// A range-indexed store of variant records.
pub trait RecordSource {
    /// The store's `##` header lines.
    fn header(&self) -> &str;

    /// Records overlapping `region`.
    ///
    /// Fails with `RangeNotFound` when the store has no such range at all,
    /// as opposed to a range that holds no records.
    fn fetch(&mut self, region: &Region) -> Result<Records<'_>>;
}

/// A record source over the text of an uncompressed VCF file.
#[derive(Debug, Clone, Default)]
pub struct VcfTextSource {
    header: String,
    records: BTreeMap<String, Vec<(u64, String)>>,
}

impl VcfTextSource {
    /// Index VCF text by chromosome.
    ///
    /// Lines starting with `#` form the header. Data lines whose position
    /// does not parse are kept under position 0 so the parser can report them.
    pub fn new(text: &str) -> Self {
        let mut source = Self::default();

        for line in text.split_inclusive('\n') {
            if line.starts_with('#') {
                source.header.push_str(line);
                continue;
            }
            if trim_line_end(line).is_empty() {
                continue;
            }
            let mut columns = line.splitn(3, '\t');
            let chrom = columns.next().unwrap_or_default();
            let pos = columns.next().and_then(|p| p.parse().ok()).unwrap_or(0);
            source
                .records
                .entry(chrom.to_string())
                .or_default()
                .push((pos, line.to_string()));
        }

        source
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(&std::fs::read_to_string(path)?))
    }

    /// Find the contig, accepting a `chr` prefix mismatch.
    fn contig(&self, chrom: &str) -> Option<&Vec<(u64, String)>> {
        self.records.get(chrom).or_else(|| match chrom.strip_prefix("chr") {
            Some(bare) => self.records.get(bare),
            None => self.records.get(&format!("chr{}", chrom)),
        })
    }
}

impl RecordSource for VcfTextSource {
    fn header(&self) -> &str {
        &self.header
    }

    fn fetch(&mut self, region: &Region) -> Result<Records<'_>> {
        let records = self
            .contig(&region.chrom)
            .ok_or_else(|| LofFilterError::RangeNotFound(region.to_string()))?;
        let region = region.clone();

        Ok(Box::new(
            records
                .iter()
                .filter(move |(pos, _)| region.contains(*pos))
                .map(|(_, line)| Ok::<_, LofFilterError>(line.clone())),
        ))
    }
}

/// One database file ready to be queried.
pub struct Database {
    pub config: DataFileConfig,
    pub schema: AnnotationSchema,
    source: Box<dyn RecordSource>,
}

impl Database {
    /// Read the annotation schema from the source's header.
    ///
    /// The configured symbol, confidence and transcript columns must all be
    /// declared, otherwise this fails with `ConfigurationError`.
    pub fn open(config: DataFileConfig, source: Box<dyn RecordSource>) -> Result<Self> {
        let schema = AnnotationSchema::from_header(source.header(), &config.lof.id)?;
        for column in [&config.lof.symbol, &config.lof.annot, &config.lof.transcript] {
            schema.require(column)?;
        }
        tracing::debug!(
            database = %config.name,
            columns = schema.len(),
            "read {} annotation schema",
            config.lof.id
        );

        Ok(Self {
            config,
            schema,
            source,
        })
    }
}

/// A (gene, database file) pair that could not be fully processed.
#[derive(Debug)]
pub struct QueryFailure {
    pub gene: String,
    pub database: String,
    pub error: LofFilterError,
}

/// Counters and failures collected over a run.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Records received from the stores.
    pub records: usize,
    /// Records dropped because they did not parse.
    pub dropped_records: usize,
    /// Records kept without transcripts because their annotation was malformed.
    pub annotation_errors: usize,
    /// (gene, file) pairs whose range does not exist in the file.
    pub missing_ranges: usize,
    pub failures: Vec<QueryFailure>,
}

/// Runs every gene against every database file.
pub struct Orchestrator {
    databases: Vec<Database>,
    filters: Vec<Filter>,
}

impl Orchestrator {
    pub fn new(databases: Vec<Database>, filters: Vec<Filter>) -> Self {
        Self { databases, filters }
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Query all genes and settle their statuses.
    pub fn run(&mut self, genes: &mut [Gene]) -> RunSummary {
        let mut summary = RunSummary::default();

        for gene in genes.iter_mut().filter(|g| g.location.is_none()) {
            tracing::warn!(gene = %gene.name, "gene has no known location");
            gene.mark_unknown();
        }

        for database in self.databases.iter_mut() {
            tracing::info!(database = %database.config.name, "querying {} genes", genes.len());
            for gene in genes.iter_mut() {
                let Some(location) = gene.location.clone() else {
                    continue;
                };
                if let Err(error) = query_gene(database, gene, &location, &self.filters, &mut summary) {
                    if let LofFilterError::RangeNotFound(range) = &error {
                        tracing::warn!(
                            gene = %gene.name,
                            database = %database.config.name,
                            "range {} not found",
                            range
                        );
                        summary.missing_ranges += 1;
                        gene.update_status(GeneStatus::NoVariants);
                    } else {
                        tracing::error!(
                            gene = %gene.name,
                            database = %database.config.name,
                            "{}",
                            error
                        );
                        summary.failures.push(QueryFailure {
                            gene: gene.name.clone(),
                            database: database.config.name.clone(),
                            error,
                        });
                    }
                }
            }
        }

        for gene in genes.iter_mut() {
            let status = gene.finalize();
            tracing::info!(gene = %gene.name, "{}", status);
        }

        summary
    }
}

/// Process the records of one gene in one database file.
///
/// The status reached is recorded on the gene even when the record stream
/// fails part way.
fn query_gene(
    database: &mut Database,
    gene: &mut Gene,
    location: &str,
    filters: &[Filter],
    summary: &mut RunSummary,
) -> Result<()> {
    let region = Region::parse(location)?;
    let records = database.source.fetch(&region)?;
    let lof = &database.config.lof;

    let mut status = GeneStatus::NoVariants;
    let mut outcome = Ok(());

    for record in records {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                outcome = Err(e);
                break;
            }
        };
        summary.records += 1;
        status = status.max(GeneStatus::NoHcLof);

        let mut variant = match Variant::parse(&gene.name, &record) {
            Ok(variant) => variant,
            Err(e) => {
                tracing::warn!(gene = %gene.name, "dropping record: {}", e);
                summary.dropped_records += 1;
                continue;
            }
        };
        if let Err(e) = split_transcripts(&mut variant, &database.schema, lof) {
            tracing::warn!(gene = %gene.name, variant = %variant.id, "{}", e);
            summary.annotation_errors += 1;
        }

        if gene.add_variant(variant, &database.config.name, lof, filters) {
            status = GeneStatus::HcLofFound;
        }
    }

    tracing::debug!(gene = %gene.name, database = %database.config.name, "{}", status);
    gene.update_status(status);
    outcome
}
