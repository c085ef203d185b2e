use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceLevel {
    #[default]
    #[serde(rename = "Entry-Level")]
    EntryLevel,
    #[serde(rename = "Mid-Level")]
    MidLevel,
    #[serde(rename = "Senior-Level")]
    SeniorLevel,
    Manager,
}

impl ExperienceLevel {
    pub fn label(&self) -> &'static str {
        match self {
            ExperienceLevel::EntryLevel => "Entry-Level",
            ExperienceLevel::MidLevel => "Mid-Level",
            ExperienceLevel::SeniorLevel => "Senior-Level",
            ExperienceLevel::Manager => "Manager",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Industry {
    #[default]
    Technology,
    Finance,
    Healthcare,
    Consulting,
    Retail,
}

impl Industry {
    pub fn label(&self) -> &'static str {
        match self {
            Industry::Technology => "Technology",
            Industry::Finance => "Finance",
            Industry::Healthcare => "Healthcare",
            Industry::Consulting => "Consulting",
            Industry::Retail => "Retail",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterviewType {
    #[default]
    Behavioral,
    Technical,
    #[serde(rename = "Case Study")]
    CaseStudy,
}

impl InterviewType {
    pub fn label(&self) -> &'static str {
        match self {
            InterviewType::Behavioral => "Behavioral",
            InterviewType::Technical => "Technical",
            InterviewType::CaseStudy => "Case Study",
        }
    }
}

/// Whether answers are typed or captured from the microphone and transcribed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InterviewMode {
    #[default]
    Text,
    Voice,
}

macro_rules! display_via_label {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        })*
    };
}

display_via_label!(ExperienceLevel, Industry, InterviewType);

/// Who is being interviewed, for what. Immutable once onboarding completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub job_title: String,
    pub experience_level: ExperienceLevel,
    pub industry: Industry,
    pub interview_type: InterviewType,
    pub interview_mode: InterviewMode,
}
