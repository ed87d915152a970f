// Intake LLM prompt templates.

pub const RESUME_PARSE_SYSTEM: &str = "\
You are a precise resume data extractor. \
Read unstructured resume text and return the applicant's profile as structured JSON. \
You MUST respond with valid JSON only, no markdown fences, no explanations. \
Never guess: if a value is not stated in the text, use null.";

/// Resume extraction prompt. Replace `{resume_text}` before sending.
pub const RESUME_PARSE_PROMPT: &str = r#"Extract the applicant's profile from the resume text below.

OUTPUT SCHEMA (return exactly these keys, nothing else):
{
  "full_name": string | null,
  "email": string | null,
  "phone_number": string | null,
  "years_of_experience": integer | null,
  "desired_positions": [string] | null,
  "current_location": string | null,
  "tech_stack": [string] | null
}

RULES:
1. If information is missing, use null.
2. tech_stack lists individual technologies (languages, frameworks, tools, databases).
3. years_of_experience is a whole number of years of professional experience.
4. Return ONLY the JSON object.

RESUME TEXT:
---
{resume_text}
---"#;
