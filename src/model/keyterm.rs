use serde::{Deserialize, Serialize};

/// Glossary entry for a significant term and its variants.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct Keyterm {
    pub term: String,

    #[serde(default)]
    pub other_forms: Vec<String>,

    #[serde(default)]
    pub alternate_renderings: Vec<String>,

    #[serde(default)]
    pub notes: String,

    #[serde(default)]
    pub related_terms: Vec<String>,
}

impl Keyterm {
    /// The term followed by its other forms.
    pub fn forms(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.term.as_str()).chain(self.other_forms.iter().map(String::as_str))
    }
}
