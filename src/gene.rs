//! Gene status aggregation.
//!
//! A `Gene` collects the variants found for it in every queried database
//! file and keeps the most informative status reached so far.

use std::fmt;

use crate::config::LofConfig;
use crate::filter::{Filter, filters_pass};
use crate::variant::Variant;

/// Terminal status of a gene after querying.
///
/// Variants are ordered by priority; a higher status is never replaced by a
/// lower one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum GeneStatus {
    /// The gene has no coordinates, so it was never queried.
    UnknownGene,
    /// No records overlap the gene in any database file.
    NoVariants,
    /// Records were found but none is a passing high-confidence LoF.
    NoHcLof,
    /// At least one passing high-confidence LoF was found.
    HcLofFound,
}

impl GeneStatus {
    pub fn label(&self) -> &'static str {
        match self {
            GeneStatus::UnknownGene => "Unknown gene",
            GeneStatus::NoVariants => "No variants in database",
            GeneStatus::NoHcLof => "No HC LoF found",
            GeneStatus::HcLofFound => "HC LoF found",
        }
    }
}

impl fmt::Display for GeneStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A variant retained for a gene, with the outcome of its checks.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneVariant {
    pub variant: Variant,
    /// Name of the data file the record came from.
    pub source: String,
    /// Whether the variant is a passing high-confidence LoF.
    pub passed: bool,
}

/// One gene from the input list.
#[derive(Debug, Clone, PartialEq)]
pub struct Gene {
    pub name: String,
    /// Region in `chrom:start-end` form, once resolved.
    pub location: Option<String>,
    status: Option<GeneStatus>,
    variants: Vec<GeneVariant>,
}

/// True when `variant` has a high-confidence transcript, passed quality
/// control and satisfies every filter.
pub fn is_hc_lof(variant: &Variant, lof: &LofConfig, filters: &[Filter]) -> bool {
    variant.transcripts.iter().any(|t| t.is_high_confidence(lof))
        && variant.filter == lof.pass
        && filters_pass(filters, variant)
}

impl Gene {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            location: None,
            status: None,
            variants: Vec::new(),
        }
    }

    pub fn with_location(name: &str, location: &str) -> Self {
        Self {
            location: Some(location.to_string()),
            ..Self::new(name)
        }
    }

    pub fn status(&self) -> Option<GeneStatus> {
        self.status
    }

    pub fn variants(&self) -> &[GeneVariant] {
        &self.variants
    }

    /// Variants that passed every check, in discovery order.
    pub fn passing_variants(&self) -> impl Iterator<Item = &Variant> {
        self.variants.iter().filter(|v| v.passed).map(|v| &v.variant)
    }

    /// Record the status reached for one database file.
    ///
    /// Keeps whichever of the current and new status has higher priority.
    /// An unknown gene stays unknown.
    pub fn update_status(&mut self, status: GeneStatus) {
        match self.status {
            Some(GeneStatus::UnknownGene) => {}
            Some(current) if current >= status => {}
            _ => self.status = Some(status),
        }
    }

    /// Mark a gene without coordinates. Nothing else is recorded afterwards.
    pub fn mark_unknown(&mut self) {
        if self.status.is_none() {
            self.status = Some(GeneStatus::UnknownGene);
        }
    }

    /// Evaluate and retain a variant found for this gene.
    ///
    /// # Returns
    ///
    /// Whether the variant is a passing high-confidence LoF.
    pub fn add_variant(&mut self, variant: Variant, source: &str, lof: &LofConfig, filters: &[Filter]) -> bool {
        let passed = is_hc_lof(&variant, lof, filters);
        self.variants.push(GeneVariant {
            variant,
            source: source.to_string(),
            passed,
        });
        passed
    }

    /// Settle genes that were never evaluated against any database file.
    pub fn finalize(&mut self) -> GeneStatus {
        *self.status.get_or_insert(GeneStatus::NoVariants)
    }
}

impl fmt::Display for Gene {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{};{};{}",
            self.name,
            self.location.as_deref().unwrap_or("None"),
            self.status.map(|s| s.label()).unwrap_or("None")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header::AnnotationSchema;
    use crate::transcript::split_transcripts;
    use pretty_assertions::assert_eq;

    fn lof_variant(filter: &str, confidence: &str, info: &str) -> Variant {
        let schema = AnnotationSchema::from_columns("vep", "Allele|SYMBOL|Feature|LoF").unwrap();
        let record = format!(
            "3\t46414943\trs1\tA\tT\t50\t{}\t{};vep=T|CCR5|ENST00000292303|{}",
            filter, info, confidence
        );
        let mut variant = Variant::parse("CCR5", &record).unwrap();
        split_transcripts(&mut variant, &schema, &LofConfig::default()).unwrap();
        variant
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(GeneStatus::UnknownGene.to_string(), "Unknown gene");
        assert_eq!(GeneStatus::NoVariants.to_string(), "No variants in database");
        assert_eq!(GeneStatus::NoHcLof.to_string(), "No HC LoF found");
        assert_eq!(GeneStatus::HcLofFound.to_string(), "HC LoF found");
    }

    #[test]
    fn test_status_upgrade() {
        let mut gene = Gene::new("CCR5");
        assert_eq!(gene.status(), None);

        gene.update_status(GeneStatus::NoVariants);
        gene.update_status(GeneStatus::NoHcLof);
        assert_eq!(gene.status(), Some(GeneStatus::NoHcLof));

        gene.update_status(GeneStatus::HcLofFound);
        assert_eq!(gene.status(), Some(GeneStatus::HcLofFound));
    }

    #[test]
    fn test_status_never_downgraded() {
        let mut gene = Gene::new("CCR5");
        gene.update_status(GeneStatus::HcLofFound);
        gene.update_status(GeneStatus::NoHcLof);
        gene.update_status(GeneStatus::NoVariants);
        assert_eq!(gene.status(), Some(GeneStatus::HcLofFound));

        let mut gene = Gene::new("CCR5");
        gene.update_status(GeneStatus::NoHcLof);
        gene.update_status(GeneStatus::NoVariants);
        assert_eq!(gene.status(), Some(GeneStatus::NoHcLof));
    }

    #[test]
    fn test_finalize() {
        let mut gene = Gene::with_location("CCR5", "3:46411633-46417697");
        assert_eq!(gene.finalize(), GeneStatus::NoVariants);

        let mut gene = Gene::new("NOTAGENE");
        gene.mark_unknown();
        gene.update_status(GeneStatus::NoHcLof);
        assert_eq!(gene.finalize(), GeneStatus::UnknownGene);
        assert_eq!(gene.to_string(), "NOTAGENE;None;Unknown gene");
    }

    #[test]
    fn test_is_hc_lof() {
        let lof = LofConfig::default();
        let filters = vec![Filter::new("homozygous-controls", "controls_nhomalt>0").unwrap()];

        assert!(is_hc_lof(&lof_variant("PASS", "HC", "controls_nhomalt=1"), &lof, &filters));
        assert!(!is_hc_lof(&lof_variant("AC0", "HC", "controls_nhomalt=1"), &lof, &filters));
        assert!(!is_hc_lof(&lof_variant("PASS", "LC", "controls_nhomalt=1"), &lof, &filters));
        assert!(!is_hc_lof(&lof_variant("PASS", "HC", "controls_nhomalt=0"), &lof, &filters));
        assert!(!is_hc_lof(&lof_variant("PASS", "HC", "AC=1"), &lof, &filters));
        assert!(is_hc_lof(&lof_variant("PASS", "HC", "AC=1"), &lof, &[]));
    }

    #[test]
    fn test_add_variant_keeps_failing_variants() {
        let lof = LofConfig::default();
        let mut gene = Gene::with_location("CCR5", "3:46411633-46417697");

        assert!(!gene.add_variant(lof_variant("AC0", "HC", "AC=1"), "exomes", &lof, &[]));
        assert!(gene.add_variant(lof_variant("PASS", "HC", "AC=1"), "genomes", &lof, &[]));

        assert_eq!(gene.variants().len(), 2);
        assert_eq!(gene.variants()[0].source, "exomes");
        let passing: Vec<&str> = gene.passing_variants().map(|v| v.filter.as_str()).collect();
        assert_eq!(passing, vec!["PASS"]);
    }
}
