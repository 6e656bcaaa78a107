//! The questionnaire script
//!
//! One row per step: the prompt emitted on entry, the responses offered while
//! there, and the step that follows a completed round-trip. The transition
//! function only ever reads this table.

use super::state::Step;
use serde::Serialize;

/// A response button offered to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResponseOption {
    pub label: &'static str,
    pub value: &'static str,
}

const fn option(label: &'static str, value: &'static str) -> ResponseOption {
    ResponseOption { label, value }
}

/// A row of the script
#[derive(Debug, Clone, Copy)]
pub struct ScriptEntry {
    pub prompt: &'static str,
    pub options: &'static [ResponseOption],
    pub next: Option<Step>,
}

pub const WELCOME_PROMPT: &str = "Hi, Which class are you studying?";

const SCRIPT: [ScriptEntry; 4] = [
    ScriptEntry {
        prompt: WELCOME_PROMPT,
        options: &[
            option("Fifth", "fifth"),
            option("Sixth", "sixth"),
            option("Seventh", "seventh"),
            option("Eighth", "eighth"),
            option("Ninth", "ninth"),
            option("Tenth", "tenth"),
        ],
        next: Some(Step::AskExam),
    },
    ScriptEntry {
        prompt: "Are you preparing for JEE or Mains?",
        options: &[option("JEE", "JEE"), option("Mains", "Mains")],
        next: Some(Step::AskSubject),
    },
    ScriptEntry {
        prompt: "Which subject are you interested in?",
        options: &[
            option("Physics", "Physics"),
            option("Chemistry", "Chemistry"),
            option("Maths", "Maths"),
        ],
        next: Some(Step::Finished),
    },
    ScriptEntry {
        prompt: "Thank you for the information! Good luck with your studies!",
        options: &[],
        next: None,
    },
];

/// Look up the row for a step
pub fn entry(step: Step) -> &'static ScriptEntry {
    &SCRIPT[usize::from(step.index())]
}
