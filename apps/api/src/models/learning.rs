use serde::{de, Deserialize, Deserializer, Serialize};

/// A single multiple-choice skill check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentQuestion {
    pub question: String,
    pub options: Vec<String>,
    #[serde(alias = "correctOptionIndex", deserialize_with = "whole_number")]
    pub correct_option_index: usize,
    pub explanation: String,
}

impl AssessmentQuestion {
    /// Exactly four options with the correct index among them.
    pub fn is_well_formed(&self) -> bool {
        self.options.len() == 4 && self.correct_option_index < self.options.len()
    }
}

/// Accepts any JSON number with no fractional part, so `1.0` reads as `1`.
fn whole_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
    let n = f64::deserialize(deserializer)?;
    if n.fract() != 0.0 || n < 0.0 || n > u32::MAX as f64 {
        return Err(de::Error::custom(format!(
            "option index {n} is not a whole number"
        )));
    }
    Ok(n as usize)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResourceType {
    Course,
    Article,
    Practice,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningResource {
    #[serde(rename = "type")]
    pub kind: ResourceType,
    pub title: String,
    pub description: String,
}
