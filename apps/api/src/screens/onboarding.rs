use serde::Deserialize;

use crate::models::profile::{ExperienceLevel, Industry, InterviewMode, InterviewType, UserProfile};
use crate::screens::FormError;

pub const JOB_TITLE_REQUIRED: &str = "Please enter the job title you are targeting.";

/// Interview setup form. Omitted fields take the form defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct OnboardingForm {
    pub job_title: String,
    pub experience_level: ExperienceLevel,
    pub industry: Industry,
    pub interview_type: InterviewType,
    pub interview_mode: InterviewMode,
}

impl OnboardingForm {
    pub fn submit(self) -> Result<UserProfile, FormError> {
        if self.job_title.trim().is_empty() {
            return Err(FormError::Invalid(JOB_TITLE_REQUIRED));
        }
        Ok(UserProfile {
            job_title: self.job_title,
            experience_level: self.experience_level,
            industry: self.industry,
            interview_type: self.interview_type,
            interview_mode: self.interview_mode,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let form: OnboardingForm =
            serde_json::from_str(r#"{"job_title": "Product Manager"}"#).unwrap();
        let profile = form.submit().unwrap();
        assert_eq!(profile.experience_level, ExperienceLevel::EntryLevel);
        assert_eq!(profile.industry, Industry::Technology);
        assert_eq!(profile.interview_type, InterviewType::Behavioral);
        assert_eq!(profile.interview_mode, InterviewMode::Text);
    }

    #[test]
    fn test_blank_title_is_refused() {
        let form = OnboardingForm {
            job_title: "   ".to_string(),
            ..Default::default()
        };
        assert_eq!(form.submit().unwrap_err(), FormError::Invalid(JOB_TITLE_REQUIRED));
    }

    #[test]
    fn test_title_kept_as_entered() {
        let form = OnboardingForm {
            job_title: "Nurse ".to_string(),
            interview_mode: InterviewMode::Voice,
            ..Default::default()
        };
        let profile = form.submit().unwrap();
        assert_eq!(profile.job_title, "Nurse ");
        assert_eq!(profile.interview_mode, InterviewMode::Voice);
    }
}
