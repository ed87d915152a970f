// Screening LLM prompt templates.

use crate::llm_client::prompts::JSON_ONLY_SYSTEM;

pub const QUESTION_SYSTEM: &str = JSON_ONLY_SYSTEM;

/// Question generation prompt. Replace `{role}` and `{tech_stack}` before sending.
pub const QUESTION_PROMPT: &str = r#"You are an expert interviewer for a "{role}" position. The candidate's skills are: "{tech_stack}".

Based on the most relevant skills, generate a JSON object with a single "questions" key.
The value must be an array of 3 to 5 foundational screening questions.
Each question must be a single, direct sentence answerable in a few lines of text.

Example: {"questions": ["What is the purpose of a constructor in a class?", "Explain what a foreign key is in a SQL database."]}

Output ONLY the raw JSON object."#;

pub const EVALUATION_SYSTEM: &str = "\
You are a senior technical interviewer. Your tone is professional and concise. \
You reply with exactly one sentence of plain text.";

/// Answer evaluation prompt. Replace `{question}` and `{answer}` before sending.
pub const EVALUATION_PROMPT: &str = r#"The question was: "{question}"
The candidate's answer is: "{answer}"

Evaluate the answer. Is it correct, partially correct, or incorrect?
Provide a one-sentence critique and a brief correction if needed.
Start your response with exactly one of: 'Correct.', 'Partially correct.', or 'Incorrect.'"#;
