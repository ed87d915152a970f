// Fixed conversation copy, assistant and applicant side.

use crate::conversation::session::Quiz;
use crate::models::candidate::{
    CandidateRecord, CURRENT_LOCATION, DESIRED_POSITIONS, EMAIL, FULL_NAME, PHONE_NUMBER,
    TECH_STACK, YEARS_OF_EXPERIENCE,
};

pub const GREETING: &str =
    "Hello! I'm Scout. To streamline your application, would you like to upload a resume?";

pub const CHOSE_UPLOAD: &str = "Yes, I'll upload my resume.";
pub const UPLOAD_PROMPT: &str = "Great! Please use the file uploader below (PDF, DOCX or TXT).";
pub const UPLOAD_FAILED: &str = "Sorry, I had trouble reading that resume. \
    Please try another file or choose to enter the details manually.";

pub const CHOSE_MANUAL: &str = "No, I'll enter the details manually.";
pub const MANUAL_INTRO: &str = "Of course. We'll go through the details one by one.";

pub const CONFIRMED: &str = "Yes, it's correct.";
pub const REJECTED: &str = "No, something's wrong.";
pub const REJECT_REPLY: &str = "No problem, let's get the correct info.";

pub const ROLE_PROMPT: &str = "Excellent. Now, please select the role you are applying for.";

pub const PREPARING_QUESTIONS: &str =
    "Thank you. I'm now preparing a few technical questions based on your profile...";
pub const NO_TECH_STACK: &str =
    "No tech stack was provided, so we'll skip the technical questions.";
pub const GENERATION_FAILED: &str =
    "I had an issue preparing questions. A recruiter will follow up directly.";
pub const EVALUATION_FAILED: &str = "I couldn't evaluate that answer, but let's continue.";
pub const QUIZ_COMPLETE: &str =
    "That concludes the technical screening. Thank you for your detailed answers!";

pub const CLOSING: &str = "This completes the initial automated screening. \
    A recruiter will review your information and be in touch soon. Thank you for your time!";

pub fn uploaded(file_name: &str) -> String {
    format!("Uploaded resume: {file_name}")
}

pub fn ask_field(index: usize, label: &str) -> String {
    if index == 0 {
        format!("Let's start with your **{label}**.")
    } else {
        format!("Got it. What is your **{label}**?")
    }
}

pub fn role_selected(role: &str) -> String {
    format!("Role: **{role}**")
}

pub fn verification(record: &CandidateRecord) -> String {
    let rows = [
        ("Name", FULL_NAME),
        ("Email", EMAIL),
        ("Phone", PHONE_NUMBER),
        ("Experience (years)", YEARS_OF_EXPERIENCE),
        ("Positions", DESIRED_POSITIONS),
        ("Location", CURRENT_LOCATION),
        ("Tech Stack", TECH_STACK),
    ];
    let mut msg = String::from("Thanks! I've extracted the following information. Please verify it:\n");
    for (label, key) in rows {
        msg.push_str(&format!("*   **{label}:** {}\n", record.display(key)));
    }
    msg.push_str("Is this correct?");
    msg
}

/// The current question, with the opening line on the first one.
pub fn question(quiz: &Quiz) -> String {
    let text = quiz.current().unwrap_or_default();
    let header = format!("**Question {} of {}:**\n\n{text}", quiz.index() + 1, quiz.len());
    if quiz.index() == 0 {
        format!("Great, I have a few questions for you. Let's begin.\n\n{header}")
    } else {
        header
    }
}
