use std::fs;
use std::path::Path;

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_8};
use serde::Serialize;
use tracing::debug;

use crate::error::Result;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct EncodingCandidate {
    pub name: String,
    pub confidence: f32,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct EncodingDetection {
    pub best: String,
    pub confidence: f32,
    pub candidates: Vec<EncodingCandidate>,
}

/// Text decoded from disk together with the encoding that was used.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct DecodedText {
    pub text: String,
    pub encoding: String,
}

pub fn detect_from_file(path: &Path) -> Result<EncodingDetection> {
    let bytes = fs::read(path)?;
    Ok(detect(&bytes))
}

pub fn detect(bytes: &[u8]) -> EncodingDetection {
    if bytes.starts_with(UTF8_BOM) {
        return EncodingDetection {
            best: "utf-8-sig".into(),
            confidence: 0.99,
            candidates: vec![
                candidate("utf-8-sig", 0.99),
                candidate("utf-8", 0.90),
            ],
        };
    }

    let encoding = guess(bytes);
    let best = encoding.name().to_lowercase();
    let confidence = estimate_confidence(bytes, encoding);

    let mut candidates = vec![candidate(&best, confidence)];

    // Spreadsheet exports on Windows are often labelled latin-1.
    match best.as_str() {
        "windows-1252" => candidates.push(candidate("iso-8859-1", confidence - 0.05)),
        "utf-8" => candidates.push(candidate("utf-8-sig", confidence - 0.20)),
        _ => {}
    }

    EncodingDetection {
        best,
        confidence,
        candidates,
    }
}

/// Reads a text file in whatever encoding it was saved with.
pub fn read_text(path: &Path) -> Result<DecodedText> {
    let bytes = fs::read(path)?;

    let encoding = if bytes.starts_with(UTF8_BOM) {
        UTF_8
    } else {
        guess(&bytes)
    };

    // decode() sniffs and strips any BOM itself.
    let (text, used, had_errors) = encoding.decode(&bytes);
    debug!(
        path = %path.display(),
        encoding = used.name(),
        had_errors,
        "decoded text file"
    );

    Ok(DecodedText {
        text: text.into_owned(),
        encoding: used.name().to_lowercase(),
    })
}

fn guess(bytes: &[u8]) -> &'static Encoding {
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

fn candidate(name: &str, confidence: f32) -> EncodingCandidate {
    EncodingCandidate {
        name: name.to_string(),
        confidence: confidence.max(0.0),
    }
}

fn estimate_confidence(bytes: &[u8], encoding: &'static Encoding) -> f32 {
    let (text, _, had_errors) = encoding.decode(bytes);

    if had_errors {
        return 0.35;
    }

    match text.len() {
        0..=63 => 0.55,
        64..=511 => 0.70,
        512..=4095 => 0.82,
        _ => 0.90,
    }
}
