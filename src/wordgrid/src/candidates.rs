//! Reading candidate words out of a language model's response.
//!
//! The model is asked for a JSON object shaped like
//!
//! ```json
//! { "words": [ { "word": "GHOST", "hint": "A spirit", "direction": "horizontal" } ] }
//! ```
//!
//! but it tends to wrap that in prose or a fenced code block, and it is not always careful about
//! lengths. This module finds the JSON, fills in missing fields, and trims words and hints to the
//! limits the grid can take.

use std::sync::LazyLock;

use log::{debug, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::{CandidateError, Orientation, WordCandidate, DEFAULT_GRID_SIZE};

/// A ```json fenced block, which is how models usually wrap their output.
static FENCED_JSON_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"```json\r?\n([\s\S]*?)\r?\n```")
        .unwrap_or_else(|e| panic!("BUG: Failed to compile FENCED_JSON_RE: {e}"))
});

/// Size limits for a crossword quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrosswordLimits {
    pub grid_size: usize,
    pub min_words: usize,
    pub max_words: usize,
    pub max_word_length: usize,
    pub max_hint_length: usize,

    /// Extra words to ask for beyond the target count, since some of them will not fit.
    pub request_headroom: usize,

    /// Never ask for more than this many words in one request.
    pub max_request: usize,
}

impl Default for CrosswordLimits {
    fn default() -> CrosswordLimits {
        CrosswordLimits {
            grid_size: DEFAULT_GRID_SIZE,
            min_words: 3,
            max_words: 10,
            max_word_length: DEFAULT_GRID_SIZE,
            max_hint_length: 100,
            request_headroom: 3,
            max_request: 12,
        }
    }
}

impl CrosswordLimits {
    /// Bring a user-chosen word count into the supported range.
    pub fn clamp_word_count(&self, count: usize) -> usize {
        count.max(self.min_words).min(self.max_words)
    }

    /// How many candidates to request so that `count` of them are likely to end up in the grid.
    pub fn request_count(&self, count: usize) -> usize {
        count.saturating_add(self.request_headroom).min(self.max_request)
    }

    /// Keep only as many candidates as would have been requested for `count` words. Models
    /// sometimes send more than they were asked for; the extras are dropped from the end.
    pub fn take_requested(
        &self,
        mut candidates: Vec<WordCandidate>,
        count: usize,
    ) -> Vec<WordCandidate> {
        let requested = self.request_count(count);
        if candidates.len() > requested {
            debug!("Keeping {requested} of {} candidates for {count} words", candidates.len());
            candidates.truncate(requested);
        }
        candidates
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawResponse {
    words: Option<Vec<RawCandidate>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawCandidate {
    word: Option<String>,
    hint: Option<String>,
    direction: Option<String>,
}

impl From<RawCandidate> for WordCandidate {
    fn from(raw: RawCandidate) -> WordCandidate {
        let orientation = match raw.direction.as_deref() {
            Some("vertical") => Orientation::Vertical,
            _ => Orientation::Horizontal,
        };

        WordCandidate {
            text: raw.word.unwrap_or_default(),
            hint: raw.hint.unwrap_or_default(),
            orientation,
        }
    }
}

/// Find the JSON object in a model response: the first ```json block if there is one, otherwise
/// everything from the first `{` to the last `}`.
pub fn extract_json(text: &str) -> Option<&str> {
    if let Some(captures) = FENCED_JSON_RE.captures(text) {
        return captures.get(1).map(|m| m.as_str());
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (start < end).then(|| &text[start..=end])
}

/// Parse the candidate list out of a model response. A response without a `words` array yields
/// an empty list; a missing `direction` (or anything other than `"vertical"`) means horizontal.
pub fn parse_candidates(text: &str) -> Result<Vec<WordCandidate>, CandidateError> {
    let json = extract_json(text).ok_or(CandidateError::NoJsonFound)?;
    let response: RawResponse = serde_json::from_str(json)?;
    let words = response.words.unwrap_or_default();

    debug!("Parsed {} candidate words", words.len());

    Ok(words.into_iter().map(WordCandidate::from).collect())
}

fn truncate_chars(mut s: String, max_chars: usize) -> String {
    if let Some((byte_idx, _)) = s.char_indices().nth(max_chars) {
        s.truncate(byte_idx);
    }
    s
}

/// Cut words and hints down to the configured lengths and drop candidates with no word at all.
pub fn validate_candidates(
    candidates: Vec<WordCandidate>,
    limits: &CrosswordLimits,
) -> Vec<WordCandidate> {
    candidates.into_iter().filter_map(|candidate| {
        if candidate.is_empty() {
            warn!("Dropping candidate with an empty word (hint {:?})", candidate.hint);
            return None;
        }

        Some(WordCandidate {
            text: truncate_chars(candidate.text, limits.max_word_length),
            hint: truncate_chars(candidate.hint, limits.max_hint_length),
            orientation: candidate.orientation,
        })
    }).collect()
}

/// Parse and validate in one step.
pub fn candidates_from_response(
    text: &str,
    limits: &CrosswordLimits,
) -> Result<Vec<WordCandidate>, CandidateError> {
    Ok(validate_candidates(parse_candidates(text)?, limits))
}
