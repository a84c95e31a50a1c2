//! Variant record parser.
//!
//! Turns one tab-delimited database record into a `Variant`, keeping the
//! positional fields as text so the record can be written back unchanged.

use std::collections::HashMap;
use std::fmt;

use crate::error::{LofFilterError, Result};
use crate::transcript::Transcript;

/// Number of positional columns in a sites-only VCF record.
pub const RECORD_FIELDS: usize = 8;

/// A parsed variant record found for one gene.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    /// Chromosome (CHROM column).
    pub chrom: String,
    /// Position (POS column), kept verbatim.
    pub pos: String,
    /// Variant ID (ID column).
    pub id: String,
    /// Reference allele (REF column).
    pub ref_allele: String,
    /// Alternate allele(s) (ALT column).
    pub alt: String,
    /// Quality score (QUAL column).
    pub qual: String,
    /// Filter status (FILTER column).
    pub filter: String,
    /// The raw INFO column.
    pub info_str: String,
    /// INFO key/value pairs. Flag entries are not included.
    pub info: HashMap<String, String>,
    /// The gene this record was retrieved for.
    pub gene_name: String,
    /// The record exactly as it was received.
    pub record_str: String,
    /// Transcripts of `gene_name` extracted from the LoF annotation.
    pub transcripts: Vec<Transcript>,
}

/// Strip one trailing `\n` or `\r\n`.
pub(crate) fn trim_line_end(s: &str) -> &str {
    let s = s.strip_suffix('\n').unwrap_or(s);
    s.strip_suffix('\r').unwrap_or(s)
}

/// Parse the INFO column into a map of keys to raw values.
///
/// Each `;`-separated entry is split on its first `=`; flag entries are skipped.
fn parse_info_column(info_str: &str) -> HashMap<String, String> {
    if info_str == "." {
        return HashMap::new();
    }

    info_str
        .split(';')
        .filter_map(|entry| entry.split_once('='))
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

impl Variant {
    /// Parse a single record retrieved for `gene_name`.
    ///
    /// # Arguments
    ///
    /// * `gene_name` - The gene under test
    /// * `record` - One tab-separated line with exactly 8 columns
    ///
    /// # Returns
    ///
    /// A `Variant` with an empty transcript list.
    pub fn parse(gene_name: &str, record: &str) -> Result<Self> {
        let line = trim_line_end(record);
        let fields: Vec<&str> = line.split('\t').collect();

        if fields.len() != RECORD_FIELDS {
            return Err(LofFilterError::RecordParseError(format!(
                "Expected {} columns, got {}",
                RECORD_FIELDS,
                fields.len()
            )));
        }

        fields[1]
            .parse::<u64>()
            .map_err(|e| LofFilterError::RecordParseError(format!("Invalid POS {:?}: {}", fields[1], e)))?;

        Ok(Self {
            chrom: fields[0].to_string(),
            pos: fields[1].to_string(),
            id: fields[2].to_string(),
            ref_allele: fields[3].to_string(),
            alt: fields[4].to_string(),
            qual: fields[5].to_string(),
            filter: fields[6].to_string(),
            info_str: fields[7].to_string(),
            info: parse_info_column(fields[7]),
            gene_name: gene_name.to_string(),
            record_str: record.to_string(),
            transcripts: Vec::new(),
        })
    }

    /// The position as a number.
    pub fn position(&self) -> u64 {
        // validated in `parse`
        self.pos.parse().unwrap_or_default()
    }

    /// Look up an INFO value.
    pub fn info_value(&self, key: &str) -> Option<&str> {
        self.info.get(key).map(String::as_str)
    }

    /// The record as a VCF data line, terminated by a single `\n`.
    pub fn to_vcf_line(&self) -> String {
        format!("{}\n", self)
    }

    /// Column names matching `as_tuple`.
    pub fn fields() -> [&'static str; RECORD_FIELDS] {
        [
            "Chromosome",
            "Position_Start",
            "RSID",
            "Reference_Allele",
            "Alternate_Allele",
            "Score",
            "Quality",
            "Codes",
        ]
    }

    /// The 8 positional fields.
    pub fn as_tuple(&self) -> [&str; RECORD_FIELDS] {
        [
            self.chrom.as_str(),
            self.pos.as_str(),
            self.id.as_str(),
            self.ref_allele.as_str(),
            self.alt.as_str(),
            self.qual.as_str(),
            self.filter.as_str(),
            self.info_str.as_str(),
        ]
    }

    /// The positional fields with INFO replaced by one annotation's raw value.
    pub fn as_tuple_with(&self, annotation_key: &str) -> [&str; RECORD_FIELDS] {
        let mut tuple = self.as_tuple();
        tuple[7] = self.info_value(annotation_key).unwrap_or("");
        tuple
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_tuple().join("\t"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const RECORD: &str = "3\t46414943\trs333\tTACAGTCAGTATCAATTCTGGAAGAATTTCCAG\tT\t1234.5\tPASS\tAC=5;AF=0.1;controls_nhomalt=2;lcr;vep=T|frameshift_variant|HIGH|CCR5|ENSG00000160791|Transcript|ENST00000292303|protein_coding|HC|||\n";

    #[test]
    fn test_parse_fields() {
        let variant = Variant::parse("CCR5", RECORD).unwrap();

        assert_eq!(variant.chrom, "3");
        assert_eq!(variant.pos, "46414943");
        assert_eq!(variant.position(), 46414943);
        assert_eq!(variant.id, "rs333");
        assert_eq!(variant.alt, "T");
        assert_eq!(variant.qual, "1234.5");
        assert_eq!(variant.filter, "PASS");
        assert_eq!(variant.gene_name, "CCR5");
        assert_eq!(variant.record_str, RECORD);
        assert!(variant.transcripts.is_empty());
    }

    #[test]
    fn test_info_map() {
        let variant = Variant::parse("CCR5", RECORD).unwrap();

        assert_eq!(variant.info_value("AC"), Some("5"));
        assert_eq!(variant.info_value("controls_nhomalt"), Some("2"));
        // flag entries are skipped
        assert_eq!(variant.info_value("lcr"), None);
        // split on the first '=' only, and no line terminator leaks in
        assert_eq!(
            variant.info_value("vep"),
            Some("T|frameshift_variant|HIGH|CCR5|ENSG00000160791|Transcript|ENST00000292303|protein_coding|HC|||")
        );
    }

    #[test]
    fn test_info_value_containing_equals() {
        let record = "1\t10\t.\tA\tG\t.\tPASS\tNOTE=a=b;DP=3";
        let variant = Variant::parse("G", record).unwrap();
        assert_eq!(variant.info_value("NOTE"), Some("a=b"));
    }

    #[test]
    fn test_empty_info() {
        let variant = Variant::parse("G", "1\t10\t.\tA\tG\t.\t.\t.").unwrap();
        assert!(variant.info.is_empty());
    }

    #[test]
    fn test_round_trip() {
        let variant = Variant::parse("CCR5", RECORD).unwrap();
        assert_eq!(variant.to_vcf_line(), RECORD);

        let crlf = "1\t10\t.\tA\tG\t50\tq10\tDP=3\r\n";
        let variant = Variant::parse("G", crlf).unwrap();
        assert_eq!(variant.to_string(), "1\t10\t.\tA\tG\t50\tq10\tDP=3");

        let bare = "1\t10\t.\tA\tG\t50\tPASS\tDP=3";
        assert_eq!(Variant::parse("G", bare).unwrap().to_string(), bare);
    }

    #[test]
    fn test_wrong_field_count() {
        let err = Variant::parse("G", "1\t10\t.\tA\tG\t50\tPASS").unwrap_err();
        assert!(matches!(err, LofFilterError::RecordParseError(_)));

        let err = Variant::parse("G", "1\t10\t.\tA\tG\t50\tPASS\tDP=3\tGT\t0/1").unwrap_err();
        assert!(matches!(err, LofFilterError::RecordParseError(_)));
    }

    #[test]
    fn test_invalid_position() {
        let err = Variant::parse("G", "1\tten\t.\tA\tG\t50\tPASS\tDP=3").unwrap_err();
        assert!(matches!(err, LofFilterError::RecordParseError(msg) if msg.contains("POS")));
    }

    #[test]
    fn test_as_tuple_with_annotation() {
        let variant = Variant::parse("CCR5", RECORD).unwrap();
        let tuple = variant.as_tuple_with("vep");
        assert_eq!(tuple[0], "3");
        assert!(tuple[7].starts_with("T|frameshift_variant"));
        assert_eq!(variant.as_tuple_with("CSQ")[7], "");
        assert_eq!(Variant::fields().len(), tuple.len());
    }
}
