//! Result shaping for the output writers.
//!
//! Nothing here writes files; it produces the rows and lines a tabular or
//! VCF writer needs.

use std::collections::{BTreeMap, HashSet};

use crate::gene::Gene;
use crate::variant::Variant;

/// Name and status label of one gene.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneResult {
    pub name: String,
    pub status: String,
}

/// Per-gene status labels, in input order.
pub fn summarize(genes: &[Gene]) -> Vec<GeneResult> {
    genes
        .iter()
        .map(|gene| GeneResult {
            name: gene.name.clone(),
            status: gene.status().map(|s| s.label()).unwrap_or("None").to_string(),
        })
        .collect()
}

/// Names of genes with at least one passing variant, without duplicates.
pub fn lof_genes(genes: &[Gene]) -> Vec<&str> {
    let mut seen = HashSet::new();
    genes
        .iter()
        .filter(|gene| gene.passing_variants().next().is_some())
        .map(|gene| gene.name.as_str())
        .filter(|name| seen.insert(*name))
        .collect()
}

/// Column names of `detailed_rows`.
pub fn detailed_header(columns: &[&str]) -> Vec<String> {
    Variant::fields()[..7]
        .iter()
        .copied()
        .chain(columns.iter().copied())
        .map(str::to_string)
        .collect()
}

/// One row per transcript of each passing variant.
///
/// A row holds the first seven record fields followed by the requested
/// annotation columns (empty when a column is not declared). Repeated rows
/// are dropped, keeping the first.
pub fn detailed_rows(gene: &Gene, columns: &[&str]) -> Vec<Vec<String>> {
    let mut seen = HashSet::new();
    let mut rows = Vec::new();

    for variant in gene.passing_variants() {
        let tuple = variant.as_tuple();
        let base = &tuple[..7];
        for transcript in &variant.transcripts {
            let row: Vec<String> = base
                .iter()
                .copied()
                .chain(columns.iter().map(|c| transcript.get(c).unwrap_or("")))
                .map(str::to_string)
                .collect();
            if seen.insert(row.clone()) {
                rows.push(row);
            }
        }
    }

    rows
}

/// Passing variants as newline-terminated VCF data lines.
pub fn vcf_lines(gene: &Gene) -> Vec<String> {
    gene.passing_variants().map(Variant::to_vcf_line).collect()
}

/// Allele frequency per population group.
///
/// # Arguments
///
/// * `variant` - The variant to read from
/// * `pop_freqs` - Population group -> INFO key
///
/// # Returns
///
/// `(group, value)` pairs in group order; `None` when the key is absent.
pub fn population_frequencies<'v>(
    variant: &'v Variant,
    pop_freqs: &BTreeMap<String, String>,
) -> Vec<(String, Option<&'v str>)> {
    pop_freqs
        .iter()
        .map(|(group, key)| (group.clone(), variant.info_value(key)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LofConfig;
    use crate::gene::GeneStatus;
    use crate::header::AnnotationSchema;
    use crate::transcript::split_transcripts;
    use pretty_assertions::assert_eq;

    fn gene_with_variants() -> Gene {
        let schema = AnnotationSchema::from_columns("vep", "Allele|Consequence|SYMBOL|Feature|LoF").unwrap();
        let lof = LofConfig::default();
        let mut gene = Gene::with_location("CCR5", "3:46411633-46417697");

        for (filter, annotation) in [
            ("PASS", "T|stop_gained|CCR5|ENST1|HC,T|stop_gained|CCR5|ENST2|HC,T|stop_gained|CCR5|ENST1|HC"),
            ("AC0", "T|stop_gained|CCR5|ENST3|HC"),
        ] {
            let record = format!(
                "3\t46414943\trs333\tA\tT\t50\t{}\tAF_afr=0.01;vep={}\n",
                filter, annotation
            );
            let mut variant = Variant::parse("CCR5", &record).unwrap();
            split_transcripts(&mut variant, &schema, &lof).unwrap();
            gene.add_variant(variant, "exomes", &lof, &[]);
        }
        gene.update_status(GeneStatus::HcLofFound);
        gene
    }

    #[test]
    fn test_summarize() {
        let mut unknown = Gene::new("NOTAGENE");
        unknown.mark_unknown();
        let genes = vec![gene_with_variants(), unknown, Gene::new("CCRL2")];

        let results = summarize(&genes);
        assert_eq!(results[0].status, "HC LoF found");
        assert_eq!(results[1].status, "Unknown gene");
        assert_eq!(results[2].status, "None");
        assert_eq!(lof_genes(&genes), vec!["CCR5"]);
    }

    #[test]
    fn test_detailed_rows() {
        let gene = gene_with_variants();
        let columns = ["Consequence", "SYMBOL", "Feature", "HGVSc"];

        assert_eq!(
            detailed_header(&columns),
            vec![
                "Chromosome",
                "Position_Start",
                "RSID",
                "Reference_Allele",
                "Alternate_Allele",
                "Score",
                "Quality",
                "Consequence",
                "SYMBOL",
                "Feature",
                "HGVSc"
            ]
        );

        let rows = detailed_rows(&gene, &columns);
        // the failing variant is excluded and the repeated ENST1 row is dropped
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            vec!["3", "46414943", "rs333", "A", "T", "50", "PASS", "stop_gained", "CCR5", "ENST1", ""]
        );
        assert_eq!(rows[1][9], "ENST2");
    }

    #[test]
    fn test_vcf_lines() {
        let gene = gene_with_variants();
        let lines = vcf_lines(&gene);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("HC\n"));
        assert!(lines[0].contains("\tPASS\t"));
    }

    #[test]
    fn test_population_frequencies() {
        let gene = gene_with_variants();
        let variant = &gene.variants()[0].variant;
        let pop_freqs: BTreeMap<String, String> = [("afr", "AF_afr"), ("nfe", "AF_nfe")]
            .into_iter()
            .map(|(g, k)| (g.to_string(), k.to_string()))
            .collect();

        assert_eq!(
            population_frequencies(variant, &pop_freqs),
            vec![("afr".to_string(), Some("0.01")), ("nfe".to_string(), None)]
        );
    }
}
