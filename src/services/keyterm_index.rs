use std::collections::HashMap;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::model::keyterm::Keyterm;

/// One occurrence of a keyterm form inside a piece of text.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct KeytermMatch {
    pub term: String,
    pub matched: String,
    /// Byte offsets into the scanned text.
    pub start: usize,
    pub end: usize,
}

/// Lookup structure over a loaded glossary.
#[derive(Debug)]
pub struct KeytermIndex {
    keyterms: Vec<Keyterm>,
    by_form: HashMap<String, usize>,
    pattern: Option<Regex>,
}

impl KeytermIndex {
    pub fn new(keyterms: Vec<Keyterm>) -> Result<Self> {
        let mut by_form: HashMap<String, usize> = HashMap::new();

        for (i, k) in keyterms.iter().enumerate() {
            for form in k.forms() {
                let norm = normalize(form);
                if norm.is_empty() {
                    continue;
                }
                by_form.entry(norm).or_insert(i);
            }
        }

        let mut forms: Vec<&str> = keyterms
            .iter()
            .flat_map(|k| k.forms())
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .collect();
        // Longest first so "son of man" beats "son".
        forms.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        forms.dedup();

        let pattern = if forms.is_empty() {
            None
        } else {
            let alternatives: Vec<String> = forms.iter().map(|f| form_pattern(f)).collect();
            Some(Regex::new(&format!("(?i)(?:{})", alternatives.join("|")))?)
        };

        debug!(
            keyterms = keyterms.len(),
            forms = by_form.len(),
            "keyterm index built"
        );

        Ok(Self {
            keyterms,
            by_form,
            pattern,
        })
    }

    pub fn keyterms(&self) -> &[Keyterm] {
        &self.keyterms
    }

    pub fn len(&self) -> usize {
        self.keyterms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyterms.is_empty()
    }

    /// Finds the keyterm whose term or other form matches `word`.
    pub fn lookup(&self, word: &str) -> Option<&Keyterm> {
        let norm = normalize(word);
        if norm.is_empty() {
            return None;
        }
        self.by_form.get(&norm).map(|&i| &self.keyterms[i])
    }

    /// Every keyterm occurrence in `text`, in order of appearance.
    pub fn scan(&self, text: &str) -> Vec<KeytermMatch> {
        let Some(pattern) = &self.pattern else {
            return Vec::new();
        };

        pattern
            .find_iter(text)
            .filter_map(|m| {
                let keyterm = self.lookup(m.as_str())?;
                Some(KeytermMatch {
                    term: keyterm.term.clone(),
                    matched: m.as_str().to_string(),
                    start: m.start(),
                    end: m.end(),
                })
            })
            .collect()
    }
}

/// Case-, spacing- and quote-insensitive form of a word or phrase.
pub fn normalize(text: &str) -> String {
    let mut s = text.trim().to_lowercase();

    s = s.split_whitespace().collect::<Vec<_>>().join(" ");

    for ch in ['“', '”', '’', '‘', '"', '\'', '(', ')'] {
        s = s.replace(ch, "");
    }

    s
}

fn form_pattern(form: &str) -> String {
    let body = form
        .split_whitespace()
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");

    let is_word = |c: Option<char>| c.is_some_and(|c| c.is_alphanumeric() || c == '_');

    let mut p = String::with_capacity(body.len() + 4);
    if is_word(form.chars().next()) {
        p.push_str(r"\b");
    }
    p.push_str(&body);
    if is_word(form.chars().last()) {
        p.push_str(r"\b");
    }
    p
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyterm(term: &str, other_forms: &[&str]) -> Keyterm {
        Keyterm {
            term: term.to_string(),
            other_forms: other_forms.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn index() -> KeytermIndex {
        KeytermIndex::new(vec![
            keyterm("disciple", &["disciples"]),
            keyterm("Son of Man", &[]),
            keyterm("son", &["sons"]),
            keyterm("God's kingdom", &["kingdom of God"]),
        ])
        .unwrap()
    }

    #[test]
    fn normalize_collapses_case_space_and_quotes() {
        assert_eq!(normalize("  Son   of\tMan "), "son of man");
        assert_eq!(normalize("“God’s”"), "gods");
    }

    #[test]
    fn lookup_by_term_or_other_form() {
        let idx = index();
        assert_eq!(idx.lookup("Disciples").map(|k| k.term.as_str()), Some("disciple"));
        assert_eq!(idx.lookup("son  of man").map(|k| k.term.as_str()), Some("Son of Man"));
        assert!(idx.lookup("apostle").is_none());
        assert!(idx.lookup("   ").is_none());
    }

    #[test]
    fn first_keyterm_wins_duplicate_form() {
        let idx = KeytermIndex::new(vec![
            keyterm("student", &["learner"]),
            keyterm("pupil", &["learner"]),
        ])
        .unwrap();
        assert_eq!(idx.lookup("learner").map(|k| k.term.as_str()), Some("student"));
    }

    #[test]
    fn scan_prefers_longest_form_and_respects_word_boundaries() {
        let idx = index();
        let text = "The Son of Man called his disciples; the sons listened. Sonnet.";

        let matches = idx.scan(text);
        let found: Vec<(&str, &str)> = matches
            .iter()
            .map(|m| (m.term.as_str(), &text[m.start..m.end]))
            .collect();

        assert_eq!(
            found,
            [
                ("Son of Man", "Son of Man"),
                ("disciple", "disciples"),
                ("son", "sons"),
            ]
        );
    }

    #[test]
    fn scan_allows_line_breaks_inside_phrases() {
        let idx = index();
        let matches = idx.scan("the kingdom\nof God is near");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].term, "God's kingdom");
        assert_eq!(matches[0].matched, "kingdom\nof God");
    }

    #[test]
    fn empty_index_scans_nothing() {
        let idx = KeytermIndex::new(Vec::new()).unwrap();
        assert!(idx.is_empty());
        assert!(idx.scan("anything").is_empty());
    }
}
