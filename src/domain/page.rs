//! Selectors and paths shared between the page and the verification run.

use serde::{Deserialize, Serialize};

pub const RESULT_REGION: &str = "#result";
pub const UPLOAD_ENDPOINT: &str = "/upload";
pub const CLASSIFY_PATH: &str = "/classify";

pub const EMAIL_TEXT_FIELD: &str = "textarea[name=\"email_text\"]";
/// Name used before the field was renamed to `email_text`.
pub const LEGACY_TEXT_FIELD: &str = "textarea[name=\"text\"]";
pub const SUBMIT_BUTTON: &str = "button[type=\"submit\"]";
pub const SCORE_PANEL: &str = ".score-panel";
pub const SCORE_CARD: &str = ".score-card";

/// Ordered list of selectors; the first one that matches wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectorCandidates(Vec<String>);

impl SelectorCandidates {
    pub fn new<I, S>(candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(candidates.into_iter().map(Into::into).collect())
    }

    pub fn email_text() -> Self {
        Self::new([EMAIL_TEXT_FIELD, LEGACY_TEXT_FIELD])
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// First candidate for which `matches` returns true. Stops at the first
    /// error raised by `matches`.
    pub fn select_first<E, F>(&self, mut matches: F) -> Result<Option<&str>, E>
    where
        F: FnMut(&str) -> Result<bool, E>,
    {
        for candidate in self.iter() {
            if matches(candidate)? {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }

    pub fn describe(&self) -> String {
        self.0.join(" | ")
    }
}

impl Default for SelectorCandidates {
    fn default() -> Self {
        Self::email_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_name_preferred() {
        let candidates = SelectorCandidates::email_text();
        let picked = candidates.select_first(|_| Ok::<_, ()>(true));
        assert_eq!(picked, Ok(Some(EMAIL_TEXT_FIELD)));
    }

    #[test]
    fn test_falls_back_to_legacy_name() {
        let candidates = SelectorCandidates::email_text();
        let picked = candidates.select_first(|selector| Ok::<_, ()>(selector == LEGACY_TEXT_FIELD));
        assert_eq!(picked, Ok(Some(LEGACY_TEXT_FIELD)));
    }

    #[test]
    fn test_no_candidate_matches() {
        let candidates = SelectorCandidates::email_text();
        assert_eq!(candidates.select_first(|_| Ok::<_, ()>(false)), Ok(None));
        assert_eq!(
            candidates.describe(),
            "textarea[name=\"email_text\"] | textarea[name=\"text\"]"
        );
    }

    #[test]
    fn test_error_stops_the_search() {
        let candidates = SelectorCandidates::email_text();
        let mut seen = Vec::new();
        let picked = candidates.select_first(|selector| {
            seen.push(selector.to_string());
            Err("bad selector")
        });
        assert_eq!(picked, Err("bad selector"));
        assert_eq!(seen, vec![EMAIL_TEXT_FIELD.to_string()]);
    }
}
