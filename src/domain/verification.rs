use serde::{Deserialize, Serialize};

use crate::domain::classification::PRODUCTIVE;
use crate::domain::page::{
    SelectorCandidates, CLASSIFY_PATH, SCORE_CARD, SCORE_PANEL, SUBMIT_BUTTON,
};

pub const DEFAULT_INPUT_TEXT: &str =
    "This is a short productive email about a meeting and action items.";

/// Inputs and expectations for one end-to-end run against the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VerificationScenario {
    pub input_text: String,
    pub text_field_candidates: SelectorCandidates,
    pub submit_selector: String,
    pub classify_path: String,
    pub score_panel_selector: String,
    pub score_card_selector: String,
    pub expected_label: String,
}

impl Default for VerificationScenario {
    fn default() -> Self {
        Self {
            input_text: DEFAULT_INPUT_TEXT.to_string(),
            text_field_candidates: SelectorCandidates::email_text(),
            submit_selector: SUBMIT_BUTTON.to_string(),
            classify_path: CLASSIFY_PATH.to_string(),
            score_panel_selector: SCORE_PANEL.to_string(),
            score_card_selector: SCORE_CARD.to_string(),
            expected_label: PRODUCTIVE.to_string(),
        }
    }
}

/// The four checks, in the order they are asserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationCheck {
    UrlIncludesClassify,
    ScorePanelExists,
    ScoreCardsPresent,
    LabelVisible,
}

impl VerificationCheck {
    pub const ALL: [VerificationCheck; 4] = [
        VerificationCheck::UrlIncludesClassify,
        VerificationCheck::ScorePanelExists,
        VerificationCheck::ScoreCardsPresent,
        VerificationCheck::LabelVisible,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            VerificationCheck::UrlIncludesClassify => "url includes classify path",
            VerificationCheck::ScorePanelExists => "score panel exists",
            VerificationCheck::ScoreCardsPresent => "at least one score card",
            VerificationCheck::LabelVisible => "expected label visible",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerificationReport {
    pub final_url: String,
    /// Selector that located the text field.
    pub text_field: String,
    pub passed: Vec<VerificationCheck>,
    pub score_card_count: usize,
    /// Visible text of each score card, for diagnostics only.
    pub score_cards: Vec<String>,
}
