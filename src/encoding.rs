//! Encoding detection for delimited-text uploads.
//!
//! Exports from different tools arrive as UTF-8, legacy CJK code pages or
//! BOM-marked Unicode. [`decode()`] walks an ordered candidate chain and
//! returns the first strict, error-free decoding. The default chain ends with
//! a single-byte encoding that maps every byte, so it always terminates with
//! text, though possibly mis-decoded text.

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8};

use crate::error::{ConfigError, DecodeFailure};

/// Default candidate labels, in priority order.
pub const DEFAULT_ENCODINGS: &[&str] = &["utf-8", "gbk", "gb18030", "utf-8-sig", "latin1"];

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Candidate {
    /// Strict decode with a fixed encoding. A UTF-8 BOM is dropped for UTF-8.
    Fixed(&'static Encoding),
    /// UTF-8 or UTF-16, accepted only when the stream opens with a BOM.
    UnicodeBom,
}

impl Candidate {
    pub fn from_label(label: &str) -> Result<Self, ConfigError> {
        let trimmed = label.trim();
        if is_bom_label(trimmed) {
            return Ok(Candidate::UnicodeBom);
        }
        Encoding::for_label(trimmed.as_bytes())
            .map(Candidate::Fixed)
            .ok_or_else(|| ConfigError::UnknownEncoding(label.to_string()))
    }

    pub fn name(&self) -> &'static str {
        match self {
            Candidate::Fixed(encoding) => encoding.name(),
            Candidate::UnicodeBom => "UTF-8-SIG",
        }
    }

    fn decode<'a>(&self, bytes: &'a [u8]) -> Option<Cow<'a, str>> {
        match self {
            Candidate::Fixed(encoding) if *encoding == UTF_8 => {
                let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
                UTF_8.decode_without_bom_handling_and_without_replacement(body)
            }
            Candidate::Fixed(encoding) => {
                encoding.decode_without_bom_handling_and_without_replacement(bytes)
            }
            Candidate::UnicodeBom => {
                let (encoding, bom_len) = Encoding::for_bom(bytes)?;
                encoding.decode_without_bom_handling_and_without_replacement(&bytes[bom_len..])
            }
        }
    }
}

fn is_bom_label(label: &str) -> bool {
    ["utf-8-sig", "utf8-sig", "bom"]
        .iter()
        .any(|candidate| label.eq_ignore_ascii_case(candidate))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    pub text: String,
    /// Name of the candidate that produced `text`.
    pub encoding: &'static str,
}

pub fn resolve_candidates<S: AsRef<str>>(labels: &[S]) -> Result<Vec<Candidate>, ConfigError> {
    if labels.is_empty() {
        return Err(ConfigError::NoEncodings);
    }
    labels
        .iter()
        .map(|label| Candidate::from_label(label.as_ref()))
        .collect()
}

pub fn default_candidates() -> Vec<Candidate> {
    DEFAULT_ENCODINGS
        .iter()
        .filter_map(|label| Candidate::from_label(label).ok())
        .collect()
}

/// Decodes `bytes` with the first candidate that accepts the whole stream.
pub fn decode(bytes: &[u8], candidates: &[Candidate]) -> Result<DecodedText, DecodeFailure> {
    for candidate in candidates {
        if let Some(text) = candidate.decode(bytes) {
            return Ok(DecodedText {
                text: text.into_owned(),
                encoding: candidate.name(),
            });
        }
    }
    Err(DecodeFailure {
        tried: candidates.iter().map(|c| c.name().to_string()).collect(),
    })
}
