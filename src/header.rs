//! Annotation header parser.
//!
//! Reads the `##INFO` line that declares an annotation tool's per-transcript
//! layout (e.g. VEP's `Format: Allele|Consequence|...|LoF`) and turns it into
//! an ordered list of column names.

use std::collections::HashMap;

use crate::error::{LofFilterError, Result};

/// Column layout of one transcript inside a pipe-delimited annotation field.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationSchema {
    /// The INFO key holding the annotation (e.g. "vep", "CSQ").
    pub id: String,
    /// Column names in the order they appear in each transcript.
    pub columns: Vec<String>,
}

impl AnnotationSchema {
    /// Build a schema from an explicit pipe-delimited column list.
    pub fn from_columns(id: &str, columns: &str) -> Result<Self> {
        let columns = split_columns(columns).ok_or_else(|| {
            LofFilterError::HeaderParseError(format!(
                "annotation {} declares fewer than two columns",
                id
            ))
        })?;
        Ok(Self {
            id: id.to_string(),
            columns,
        })
    }

    /// Find the `##INFO=<ID={id},...>` line in a VCF header and read its columns.
    ///
    /// # Arguments
    ///
    /// * `header` - The VCF header (all `##` lines), or a single INFO line
    /// * `id` - The INFO key of the annotation tool
    pub fn from_header(header: &str, id: &str) -> Result<Self> {
        for line in header.lines() {
            let line = line.trim();
            if !line.starts_with("##INFO=<") {
                continue;
            }
            let Some(attrs) = parse_info_line(line) else {
                continue;
            };
            if attrs.get("ID").map(String::as_str) != Some(id) {
                continue;
            }
            let description = attrs.get("Description").cloned().unwrap_or_default();
            let columns = extract_subfields(&description).ok_or_else(|| {
                LofFilterError::HeaderParseError(format!(
                    "INFO line for {} has no pipe-delimited format: {}",
                    id, description
                ))
            })?;
            return Ok(Self {
                id: id.to_string(),
                columns,
            });
        }

        Err(LofFilterError::HeaderParseError(format!(
            "no ##INFO line with ID={}",
            id
        )))
    }

    /// Number of fields per transcript.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of a column, if declared.
    pub fn index_of(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Position of a column that must be declared.
    pub fn require(&self, column: &str) -> Result<usize> {
        self.index_of(column).ok_or_else(|| {
            LofFilterError::ConfigurationError(format!(
                "annotation {} has no column {}",
                self.id, column
            ))
        })
    }
}

/// Parse the key=value pairs from inside the INFO angle brackets.
fn parse_info_attrs(content: &str) -> HashMap<String, String> {
    let mut attrs = HashMap::new();
    let mut remaining = content;

    while !remaining.is_empty() {
        let eq_pos = match remaining.find('=') {
            Some(p) => p,
            None => break,
        };
        let key = remaining[..eq_pos].trim();
        remaining = &remaining[eq_pos + 1..];

        let value = if let Some(quoted) = remaining.strip_prefix('"') {
            let end_quote = quoted.find('"').unwrap_or(quoted.len());
            let val = &quoted[..end_quote];
            remaining = &quoted[(end_quote + 1).min(quoted.len())..];
            remaining = remaining.strip_prefix(',').unwrap_or(remaining);
            val.to_string()
        } else {
            let comma_pos = remaining.find(',').unwrap_or(remaining.len());
            let val = &remaining[..comma_pos];
            remaining = remaining.get(comma_pos + 1..).unwrap_or("");
            val.to_string()
        };

        attrs.insert(key.to_string(), value);
    }

    attrs
}

/// Parse a single ##INFO line into its attributes.
fn parse_info_line(line: &str) -> Option<HashMap<String, String>> {
    let line = line.strip_prefix("##INFO=<")?;
    let line = line.strip_suffix('>')?;
    Some(parse_info_attrs(line))
}

/// Extract column names from a description string.
///
/// Looks for patterns like:
/// - "Consequence annotations from Ensembl VEP. Format: Allele|Consequence|..."
/// - "Functional annotations: 'Allele | Annotation | ...'"
///
/// A `Format:` list wins over quoted text, and quoted text only counts when
/// it is pipe-delimited.
fn extract_subfields(description: &str) -> Option<Vec<String>> {
    if let Some(start) = description.find("Format:") {
        let format_str = description[start + "Format:".len()..].trim().trim_matches('\'');
        if let Some(columns) = split_columns(format_str) {
            return Some(columns);
        }
    }

    let start = description.find('\'')?;
    let end = description[start + 1..].find('\'')? + start + 1;
    split_columns(&description[start + 1..end])
}

fn split_columns(format_str: &str) -> Option<Vec<String>> {
    if !format_str.contains('|') {
        return None;
    }

    let columns: Vec<String> = format_str.split('|').map(|s| s.trim().to_string()).collect();

    if columns.len() >= 2 {
        Some(columns)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const VEP_LINE: &str = r#"##INFO=<ID=vep,Number=.,Type=String,Description="Consequence annotations from Ensembl VEP. Format: Allele|Consequence|IMPACT|SYMBOL|Gene|Feature_type|Feature|BIOTYPE|LoF|LoF_filter|LoF_flags|LoF_info">"#;

    #[test]
    fn test_parse_vep_format() {
        let header = format!(
            "##fileformat=VCFv4.2\n##INFO=<ID=AC,Number=A,Type=Integer,Description=\"Allele count\">\n{}",
            VEP_LINE
        );
        let schema = AnnotationSchema::from_header(&header, "vep").unwrap();

        assert_eq!(schema.id, "vep");
        assert_eq!(schema.len(), 12);
        assert_eq!(schema.columns[0], "Allele");
        assert_eq!(schema.index_of("SYMBOL"), Some(3));
        assert_eq!(schema.index_of("LoF"), Some(8));
        assert_eq!(schema.columns.last().unwrap(), "LoF_info");
    }

    #[test]
    fn test_parse_quoted_format() {
        let line = r#"##INFO=<ID=LOF,Number=.,Type=String,Description="Predicted loss of function effects for this variant. Format: 'Gene_Name | Gene_ID | Number_of_transcripts_in_gene | Percent_of_transcripts_affected'">"#;
        let schema = AnnotationSchema::from_header(line, "LOF").unwrap();

        assert_eq!(
            schema.columns,
            vec![
                "Gene_Name",
                "Gene_ID",
                "Number_of_transcripts_in_gene",
                "Percent_of_transcripts_affected"
            ]
        );
    }

    #[test]
    fn test_apostrophe_before_format() {
        let line = r#"##INFO=<ID=vep,Number=.,Type=String,Description="Ensembl's VEP annotations. Format: Allele|SYMBOL|Feature|LoF">"#;
        let schema = AnnotationSchema::from_header(line, "vep").unwrap();
        assert_eq!(schema.columns, vec!["Allele", "SYMBOL", "Feature", "LoF"]);

        let line = r#"##INFO=<ID=vep,Number=.,Type=String,Description="Ensembl's VEP 'release 95'. Format: Allele|SYMBOL">"#;
        let schema = AnnotationSchema::from_header(line, "vep").unwrap();
        assert_eq!(schema.columns, vec!["Allele", "SYMBOL"]);
    }

    #[test]
    fn test_keeps_empty_trailing_column_names() {
        let schema = AnnotationSchema::from_columns("csq", "a|b|").unwrap();
        assert_eq!(schema.len(), 3);
    }

    #[test]
    fn test_missing_id() {
        let err = AnnotationSchema::from_header(VEP_LINE, "CSQ").unwrap_err();
        assert!(matches!(err, LofFilterError::HeaderParseError(_)));
    }

    #[test]
    fn test_description_without_format() {
        let line = r#"##INFO=<ID=vep,Number=1,Type=String,Description="Nothing to see">"#;
        assert!(AnnotationSchema::from_header(line, "vep").is_err());
        assert!(AnnotationSchema::from_columns("vep", "single").is_err());
    }

    #[test]
    fn test_require_column() {
        let schema = AnnotationSchema::from_header(VEP_LINE, "vep").unwrap();
        assert_eq!(schema.require("Feature").unwrap(), 6);
        assert!(matches!(
            schema.require("HGVSc"),
            Err(LofFilterError::ConfigurationError(_))
        ));
    }
}
