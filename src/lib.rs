//! # LoF Filter Library
//!
//! Find loss-of-function (LoF) variants for a list of genes in annotated
//! variant databases.
//!
//! ## Features
//!
//! - Parse 8-column VCF records and their INFO payload
//! - Split a VEP/LOFTEE annotation into per-transcript records, keeping only
//!   the transcripts of the gene under test
//! - Filter variants with `attribute op value` expressions
//! - Aggregate a status per gene across several database files
//!
//! ## Example
//!
//! ```rust
//! use lof_filter::{Database, DbConfig, Gene, GeneStatus, Orchestrator, VcfTextSource};
//!
//! let config = DbConfig::from_yaml(
//!     concat!(
//!         "default: demo\n",
//!         "databases:\n",
//!         "  demo:\n",
//!         "    exomes:\n",
//!         "      url: exomes.vcf\n",
//!         "      lof: { id: vep, annot: LoF, filters: { confidence: HC } }\n",
//!         "      predefined-filters:\n",
//!         "        homozygous-controls: controls_nhomalt>0\n",
//!     ),
//!     None,
//! )
//! .unwrap();
//!
//! let vcf = concat!(
//!     "##INFO=<ID=vep,Number=.,Type=String,Description=\"Format: Allele|Consequence|SYMBOL|Feature|LoF\">\n",
//!     "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n",
//!     "3\t46414943\trs333\tA\tT\t50\tPASS\tcontrols_nhomalt=1;vep=T|frameshift_variant|CCR5|ENST00000292303|HC\n",
//! );
//!
//! let filters = config.build_filters(&["homozygous-controls"], &[]).unwrap();
//! let database = Database::open(config.files[0].clone(), Box::new(VcfTextSource::new(vcf))).unwrap();
//!
//! let mut genes = vec![
//!     Gene::with_location("CCR5", "3:46411633-46417697"),
//!     Gene::new("NOTAGENE"),
//! ];
//! let summary = Orchestrator::new(vec![database], filters).run(&mut genes);
//!
//! assert!(summary.failures.is_empty());
//! assert_eq!(genes[0].status(), Some(GeneStatus::HcLofFound));
//! assert_eq!(genes[1].status(), Some(GeneStatus::UnknownGene));
//! ```
//!
//! ## Filter Expression Syntax
//!
//! A filter is exactly one comparison between an INFO attribute and a
//! literal, e.g. `controls_nhomalt>0`.
//!
//! - `==` Equal
//! - `!=` Not equal
//! - `>` Greater than
//! - `<` Less than
//! - `>=` Greater than or equal
//! - `<=` Less than or equal
//!
//! Numbers compare numerically and text lexicographically. A number never
//! equals or orders against text. A missing attribute fails the filter.
//!
//! ## Gene Statuses
//!
//! In increasing priority: `Unknown gene`, `No variants in database`,
//! `No HC LoF found`, `HC LoF found`. A later database file can raise a
//! gene's status but never lower it.

/// Embedded README.md documentation
const README: &str = include_str!("../README.md");

/// Returns the embedded README.md documentation.
///
/// # Example
///
/// ```rust
/// use lof_filter::docs;
///
/// let documentation = docs();
/// println!("{}", documentation);
/// ```
pub fn docs() -> &'static str {
    README
}

pub mod config;
pub mod error;
pub mod eval;
pub mod filter;
pub mod gene;
pub mod header;
pub mod query;
pub mod report;
pub mod transcript;
pub mod value;
pub mod variant;

pub use config::{DataFileConfig, DbConfig, LofConfig};
pub use error::{LofFilterError, Result};
pub use filter::{CmpOp, Filter};
pub use gene::{Gene, GeneStatus, GeneVariant};
pub use header::AnnotationSchema;
pub use query::{Database, Orchestrator, RecordSource, Region, RunSummary, VcfTextSource};
pub use transcript::Transcript;
pub use value::Value;
pub use variant::Variant;

/// Evaluate a single filter expression against a single record.
///
/// # Arguments
///
/// * `expression` - The filter expression (e.g., `"controls_nhomalt > 0"`)
/// * `record` - A single 8-column VCF data line
///
/// # Returns
///
/// `true` if the record matches the filter. A record lacking the attribute
/// is reported as `MissingAttribute`.
///
/// # Example
///
/// ```rust
/// let record = "3\t46414943\trs333\tA\tT\t50\tPASS\tcontrols_nhomalt=2";
/// assert!(lof_filter::evaluate("controls_nhomalt > 0", record).unwrap());
/// ```
pub fn evaluate(expression: &str, record: &str) -> Result<bool> {
    let filter = Filter::new(expression, expression)?;
    let variant = Variant::parse("", record)?;
    filter.apply(&variant)
}
