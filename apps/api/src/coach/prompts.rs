// All prompt templates for the coach facade.
// Placeholders in `{braces}` are filled with `str::replace` before sending.
// Reuses cross-cutting fragments from llm_client::prompts.

/// Replace: {experience_level}, {job_title}, {industry}, {interview_type}
pub const QUESTIONS_PROMPT_TEMPLATE: &str = "\
You are an expert interviewer for a {experience_level} {job_title} in the {industry} industry.
Generate 5 relevant {interview_type} interview questions for this role.
Return them as a JSON array of strings.";

/// Replace: {question}, {answer}, {privacy_instruction}
pub const EVALUATION_PROMPT_TEMPLATE: &str = r#"As an AI career coach, provide a detailed evaluation of this interview answer.
Question: "{question}"
Answer: "{answer}"

Analyze the answer based on the following criteria and provide a score from 1 to 10 for each:
1.  **STAR Structure**: How well the answer follows the Situation, Task, Action, Result format.
2.  **Content Quality**: The relevance, depth, and substance of the answer.
3.  **Clarity**: How clear and easy to understand the language is.
4.  **Confidence**: How confident and authoritative the answer sounds.

Also, provide 2-3 bullet points for 'Strengths' (what the user did well) and 2-3 bullet points for 'Areas for Improvement' (actionable suggestions).

{privacy_instruction}

Return a JSON object with keys: "starScore" (number), "contentScore" (number), "clarityScore" (number), "confidenceScore" (number), "strengths" (array of strings), and "improvements" (array of strings)."#;

/// Replace: {overall_score}
pub const PASS_LIKELIHOOD_PROMPT_TEMPLATE: &str = r#"An interview candidate received an overall score of {overall_score} out of 10.
Based on this score, estimate the pass likelihood as a percentage (from 0 to 100).
Also provide a brief, one-sentence rationale for this estimate.

Return a JSON object with keys: "likelihood" (number) and "rationale" (string)."#;

/// Replace: {experience_level}, {job_title}, {industry}, {question}
pub const EXAMPLE_ANSWER_PROMPT_TEMPLATE: &str = r#"You are an expert {experience_level} {job_title} in the {industry} industry.
Provide an ideal, high-quality sample answer to the following interview question: "{question}".
Structure the answer clearly, using the STAR method if it's a behavioral question. The answer should be concise yet comprehensive.
Return only the text of the answer as a single string."#;

/// Replace: {resume_text}, {target_role}
pub const CRITIQUE_PROMPT_TEMPLATE: &str = r#"You are an expert resume reviewer and career coach.
Resume Text: "{resume_text}"
Target Role: "{target_role}"

Critique the resume focusing on:
1. Missing keywords relevant for the target role.
2. Lack of quantification or measurable results.
3. General formatting and clarity issues.

Return a JSON object with keys: "missingKeywords" (array of strings), "quantificationFeedback" (string), and "formattingFeedback" (string)."#;

/// Replace: {resume_text}, {job_description}
pub const TAILOR_PROMPT_TEMPLATE: &str = r#"You are an expert career coach specializing in optimizing resumes for Applicant Tracking Systems (ATS).
Rewrite the following resume to be perfectly tailored for the provided job description.
Focus on incorporating relevant keywords, phrasing accomplishments to match the job's requirements, and ensuring a clear, parsable format.

Resume Text: "{resume_text}"

Job Description: "{job_description}"

Return a JSON object with two keys: "tailoredResume" (the full text of the rewritten resume as a single string, using newline characters for formatting) and "explanation" (a brief, user-friendly summary of the key changes you made and why they are important for ATS compatibility and recruiter appeal)."#;

/// Replace: {skill}
pub const ASSESSMENT_PROMPT_TEMPLATE: &str = r#"You are an expert in creating skill assessments. Generate one multiple-choice question to test a candidate's {skill}.
The question should be practical and relevant for a job interview context.

Return a JSON object with keys: "question" (string), "options" (an array of 4 strings), "correctOptionIndex" (number, 0-3), and "explanation" (a brief string explaining why the correct answer is right)."#;

/// Replace: {coach_persona}, {goal}
pub const LEARNING_PATH_PROMPT_TEMPLATE: &str = r#"{coach_persona} A user wants to achieve the following goal: "{goal}".

Generate a concise, actionable learning path with 3-5 items to help them achieve this.
Each item should be a 'Course', 'Article', or 'Practice' project.

Return a JSON array of objects, where each object has keys: "type" ('Course', 'Article', or 'Practice'), "title" (string), and "description" (a one-sentence string)."#;
