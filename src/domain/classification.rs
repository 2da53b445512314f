use serde::{Deserialize, Serialize};

use crate::domain::error::{AppError, Result};

pub const PRODUCTIVE: &str = "Produtivo";
pub const UNPRODUCTIVE: &str = "Improdutivo";

/// Body returned by `POST /upload`.
///
/// Only `category` and `suggested_response` are read; anything else the
/// backend adds is ignored. The label set is open, so `category` stays a
/// plain string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub category: String,
    pub suggested_response: String,
}

impl ClassificationResult {
    pub fn new(category: impl Into<String>, suggested_response: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            suggested_response: suggested_response.into(),
        }
    }

    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body).map_err(|e| {
            AppError::ParseError(format!("Invalid classification response: {}", e))
        })
    }

    pub fn is_known_category(&self) -> bool {
        is_known_category(&self.category)
    }
}

pub fn is_known_category(label: &str) -> bool {
    label == PRODUCTIVE || label == UNPRODUCTIVE
}
