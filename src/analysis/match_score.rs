// src/analysis/match_score.rs
use serde::{Serialize, Serializer};

const MARKER: &str = "Match Score";

/// Compatibility estimate parsed out of an analysis.
///
/// `Unknown` means the text carried no score, which is distinct from an
/// explicit `0%`. Serialises as a number or `null`; clients decide how to
/// render `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchScore {
    Score(u8),
    Unknown,
}

impl MatchScore {
    pub fn value(self) -> Option<u8> {
        match self {
            MatchScore::Score(score) => Some(score),
            MatchScore::Unknown => None,
        }
    }
}

impl Serialize for MatchScore {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}

/// Find `Match Score` followed on the same line by `<digits>%`.
pub fn extract_match_score(text: &str) -> MatchScore {
    let mut search_from = 0;
    while let Some(offset) = text[search_from..].find(MARKER) {
        let after = search_from + offset + MARKER.len();
        let line_end = text[after..].find('\n').map_or(text.len(), |i| after + i);
        if let Some(score) = first_percentage(&text[after..line_end]) {
            return MatchScore::Score(score);
        }
        search_from = after;
    }
    MatchScore::Unknown
}

/// First digit run directly followed by `%`, if it is within 0..=100.
fn first_percentage(segment: &str) -> Option<u8> {
    let bytes = segment.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i].is_ascii_digit() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if bytes.get(i) == Some(&b'%') {
                return segment[start..i]
                    .parse::<u32>()
                    .ok()
                    .filter(|value| *value <= 100)
                    .map(|value| value as u8);
            }
        } else {
            i += 1;
        }
    }
    None
}
