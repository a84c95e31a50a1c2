//! Transcript annotation splitter.
//!
//! Annotation tools such as VEP write one pipe-delimited block per affected
//! transcript into a single INFO value and join the blocks with commas.
//! Commas may also occur inside a field, so blocks are found by counting
//! pipes: with `N` declared columns, the separator is the last comma seen
//! after the `N - 1`th pipe of the current block and before the next pipe.

use std::collections::HashMap;

use crate::config::LofConfig;
use crate::error::{LofFilterError, Result};
use crate::header::AnnotationSchema;
use crate::variant::{Variant, trim_line_end};

/// One transcript-level annotation of a variant's target gene.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    /// The pipe-delimited block as it appeared in the annotation.
    pub raw: String,
    /// Column name -> value.
    pub fields: HashMap<String, String>,
    confidence: String,
    transcript_id: String,
}

impl Transcript {
    /// Build a transcript from one pipe-delimited block.
    ///
    /// # Arguments
    ///
    /// * `raw` - The block, e.g. `T|frameshift_variant|HIGH|CCR5|...`
    /// * `schema` - The annotation's declared columns
    /// * `lof` - Names the confidence and transcript-id columns
    pub fn new(raw: &str, schema: &AnnotationSchema, lof: &LofConfig) -> Result<Self> {
        let values: Vec<&str> = raw.split('|').collect();
        if values.len() != schema.len() {
            return Err(LofFilterError::AnnotationFormatError {
                key: schema.id.clone(),
                expected: schema.len(),
                found: values.len(),
            });
        }
        Ok(Self::from_values(raw, &values, schema, lof))
    }

    fn from_values(raw: &str, values: &[&str], schema: &AnnotationSchema, lof: &LofConfig) -> Self {
        let fields: HashMap<String, String> = schema
            .columns
            .iter()
            .zip(values)
            .map(|(column, value)| (column.clone(), value.to_string()))
            .collect();
        let confidence = fields.get(&lof.annot).cloned().unwrap_or_default();
        let transcript_id = fields.get(&lof.transcript).cloned().unwrap_or_default();

        Self {
            raw: raw.to_string(),
            fields,
            confidence,
            transcript_id,
        }
    }

    /// The LoF confidence (e.g. "HC", "LC", or empty).
    pub fn confidence(&self) -> &str {
        &self.confidence
    }

    /// The transcript identifier (e.g. "ENST00000292303").
    pub fn transcript_id(&self) -> &str {
        &self.transcript_id
    }

    /// Value of any declared column.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    pub fn is_high_confidence(&self, lof: &LofConfig) -> bool {
        self.confidence == lof.confidence
    }
}

/// Scanner state while walking an annotation string.
#[derive(Debug, Clone, Copy, PartialEq)]
enum ScanState {
    /// Inside the fields of the current block.
    InFields,
    /// All but the last field were read; the comma at this byte offset may
    /// end the block.
    BoundaryCandidate(usize),
}

/// Split a multi-transcript annotation into its pipe-delimited blocks.
///
/// # Arguments
///
/// * `key` - The INFO key the annotation came from (used in errors)
/// * `annotation` - The raw INFO value
/// * `width` - Number of fields per block
///
/// # Returns
///
/// The blocks in order. An empty annotation yields no blocks.
pub fn split_annotation<'a>(key: &str, annotation: &'a str, width: usize) -> Result<Vec<&'a str>> {
    let annotation = trim_line_end(annotation);
    if annotation.is_empty() {
        return Ok(Vec::new());
    }

    let format_error = |found: usize| LofFilterError::AnnotationFormatError {
        key: key.to_string(),
        expected: width,
        found,
    };

    // A single column has no pipes to count.
    if width < 2 {
        return Ok(annotation.split(',').collect());
    }

    let mut blocks = Vec::new();
    let mut start = 0;
    let mut pipes = 0;
    let mut state = ScanState::InFields;

    for (i, c) in annotation.char_indices() {
        match c {
            '|' => {
                pipes += 1;
                if pipes == width {
                    let ScanState::BoundaryCandidate(comma) = state else {
                        return Err(format_error(pipes + 1));
                    };
                    blocks.push(&annotation[start..comma]);
                    start = comma + 1;
                    // this pipe already belongs to the next block
                    pipes = 1;
                    state = ScanState::InFields;
                }
            }
            ',' if pipes == width - 1 => state = ScanState::BoundaryCandidate(i),
            _ => {}
        }
    }

    if pipes != width - 1 {
        return Err(format_error(pipes + 1));
    }
    blocks.push(&annotation[start..]);

    Ok(blocks)
}

/// Extract the transcripts of `variant.gene_name` from its LoF annotation.
///
/// The result is also stored on the variant. Blocks naming another gene in
/// the symbol column are dropped. On error the variant is left without
/// transcripts.
pub fn split_transcripts<'v>(
    variant: &'v mut Variant,
    schema: &AnnotationSchema,
    lof: &LofConfig,
) -> Result<&'v [Transcript]> {
    variant.transcripts.clear();
    let symbol = schema.require(&lof.symbol)?;

    let Some(annotation) = variant.info.get(&lof.id) else {
        return Ok(&variant.transcripts);
    };

    let mut transcripts = Vec::new();
    for block in split_annotation(&lof.id, annotation, schema.len())? {
        let values: Vec<&str> = block.split('|').collect();
        if values.get(symbol) == Some(&variant.gene_name.as_str()) {
            transcripts.push(Transcript::from_values(block, &values, schema, lof));
        }
    }

    variant.transcripts = transcripts;
    Ok(&variant.transcripts)
}
