// Shared prompt fragments.
// Each coach feature keeps its own templates in coach/prompts.rs;
// this file holds the cross-cutting pieces.

/// Appended to any prompt that embeds free-form user answers.
pub const PRIVACY_INSTRUCTION: &str = "\
IMPORTANT PRIVACY NOTE: Do not repeat or store any personally identifiable information (PII) \
found in the answer, such as names, addresses, phone numbers, social security numbers, or \
financial details. Your analysis should focus only on the structure and quality of the response.";

/// Persona line shared by the coaching prompts.
pub const COACH_PERSONA: &str = "You are an expert career coach.";
