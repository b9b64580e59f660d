use std::io::Read;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, trace};

use crate::error::{CoreError, Result};
use crate::model::keyterm::Keyterm;

/// Separates the values inside a list-valued field.
const LIST_DELIMITER: char = ',';

// (normalized header key, name reported in errors)
const TERM: (&str, &str) = ("term", "term");
const OTHER_FORMS: (&str, &str) = ("otherforms", "otherForms");
const ALTERNATE_RENDERINGS: (&str, &str) = ("alternaterenderings", "alternateRenderings");
const NOTES: (&str, &str) = ("notes", "notes");
const RELATED_TERMS: (&str, &str) = ("relatedterms", "relatedTerms");

/// Reads keyterm glossary rows from a CSV source.
///
/// The first row is a header naming the columns `term`, `otherForms`,
/// `alternateRenderings`, `notes` and `relatedTerms` (case, spacing and
/// punctuation in header cells are ignored, column order is free).
///
/// The source is never closed by the reader; pass `&mut source` or use
/// [`KeytermCsvReader::into_inner`] to keep it.
pub struct KeytermCsvReader<R> {
    inner: csv::Reader<R>,
}

impl<R: Read> KeytermCsvReader<R> {
    pub fn new(source: R) -> Self {
        let inner = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(source);
        Self { inner }
    }

    /// Parses every remaining row.
    ///
    /// Rows with a blank term are dropped. A row whose field count differs
    /// from the header fails the whole read with
    /// [`CoreError::MalformedRecord`].
    pub fn read_all(&mut self) -> Result<Vec<Keyterm>> {
        let header = self.inner.headers()?.clone();
        if header.is_empty() {
            return Ok(Vec::new());
        }

        let layout = ColumnLayout::from_header(&header)?;

        let mut keyterms = Vec::new();
        let mut record = StringRecord::new();

        while self.inner.read_record(&mut record)? {
            let line = record.position().map(|p| p.line()).unwrap_or(0);

            if record.iter().all(|f| f.trim().is_empty()) {
                trace!(line, "skipping blank keyterm row");
                continue;
            }

            if record.len() != layout.width {
                return Err(CoreError::MalformedRecord {
                    line,
                    expected: layout.width,
                    found: record.len(),
                });
            }

            match layout.keyterm(&record) {
                Some(k) => keyterms.push(k),
                None => debug!(line, "dropping keyterm row with blank term"),
            }
        }

        debug!(count = keyterms.len(), "keyterms read");
        Ok(keyterms)
    }

    pub fn into_inner(self) -> R {
        self.inner.into_inner()
    }
}

/// Parses an in-memory keyterm CSV document.
pub fn parse(text: &str) -> Result<Vec<Keyterm>> {
    KeytermCsvReader::new(text.as_bytes()).read_all()
}

/// Splits a list-valued field on commas, trimming every item and dropping
/// empty ones.
pub fn split_list(field: &str) -> Vec<String> {
    field
        .split(LIST_DELIMITER)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

struct ColumnLayout {
    term: usize,
    other_forms: usize,
    alternate_renderings: usize,
    notes: usize,
    related_terms: usize,
    width: usize,
}

impl ColumnLayout {
    fn from_header(header: &StringRecord) -> Result<Self> {
        let keys: Vec<String> = header.iter().map(normalize_header).collect();

        let find = |(key, name): (&str, &'static str)| {
            keys.iter()
                .position(|k| k == key)
                .ok_or(CoreError::MissingColumn(name))
        };

        Ok(Self {
            term: find(TERM)?,
            other_forms: find(OTHER_FORMS)?,
            alternate_renderings: find(ALTERNATE_RENDERINGS)?,
            notes: find(NOTES)?,
            related_terms: find(RELATED_TERMS)?,
            width: header.len(),
        })
    }

    fn keyterm(&self, record: &StringRecord) -> Option<Keyterm> {
        let field = |i: usize| record.get(i).unwrap_or("");

        let term = field(self.term).trim();
        if term.is_empty() {
            return None;
        }

        Some(Keyterm {
            term: term.to_string(),
            other_forms: split_list(field(self.other_forms)),
            alternate_renderings: split_list(field(self.alternate_renderings)),
            notes: field(self.notes).trim().to_string(),
            related_terms: split_list(field(self.related_terms)),
        })
    }
}

fn normalize_header(cell: &str) -> String {
    cell.trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}
