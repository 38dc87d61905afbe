//! Canned agent dialogue.
//!
//! All agent text in a session comes from here. Lines that have several
//! variants are picked with the session's rng.

use std::fmt::Write;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::agents::Agent;

const WELCOME: &str = "Welcome! We'll work through this problem together. Ask questions \
                       whenever you like, and show your work on the scratchboard before \
                       you submit a final answer.";

const QUESTION_REPLIES: &[&str] = &[
    "Good question. Start by deciding whether order matters, then try a small case by hand.",
    "Think about which choices are independent. The multiplication principle may help.",
    "Try listing a few possibilities on the scratchboard and look for a pattern.",
    "Ask yourself whether anything is being counted twice. If so, how many times?",
];

const AGENT_PROMPTS: &[&str] = &[
    "Does the order of the choices matter in this problem?",
    "Could we split this into smaller cases and add them up?",
    "What happens if we try the problem with smaller numbers first?",
    "Are any of the objects identical? That changes the count.",
    "Is there a restriction we haven't used yet?",
];

const AGENT_APPROACHES: &[&str] = &[
    "I broke the problem into independent choices and multiplied them.",
    "I counted the arrangements, then divided out the ones that look the same.",
    "I wrote out a small case and extended the pattern.",
];

pub fn welcome() -> String {
    WELCOME.to_string()
}

pub fn problem_statement(problem: &str) -> String {
    format!("Here is your problem:\n\n{problem}")
}

/// Instructor reply to a student question.
pub fn question_reply<R: Rng + ?Sized>(rng: &mut R) -> String {
    choose(QUESTION_REPLIES, rng)
}

/// Unprompted question an agent asks while the round is open.
pub fn agent_prompt<R: Rng + ?Sized>(rng: &mut R) -> String {
    choose(AGENT_PROMPTS, rng)
}

/// The approach an agent reports as its (placeholder) final answer.
pub fn agent_approach<R: Rng + ?Sized>(rng: &mut R) -> String {
    choose(AGENT_APPROACHES, rng)
}

/// Transcript text for an agent's final answer.
pub fn agent_answer(agent: &Agent, approach: &str) -> String {
    format!(
        "{} here. {approach} Let's see how that compares with your answer.",
        agent.name
    )
}

/// The student's final-answer message, embedding the scratchboard work.
pub fn final_answer(answer: &str, scratch: &str) -> String {
    format!("Final answer: {answer}\n\nWork:\n{scratch}")
}

/// Instructor evaluation quoting the student's and agents' answers.
///
/// `agent_answers` pairs each answering agent's name with its answer text.
pub fn evaluation(student_answer: &str, agent_answers: &[(String, String)]) -> String {
    let mut text = format!("Let's review. You answered \"{student_answer}\".");
    for (name, answer) in agent_answers {
        let _ = write!(text, "\n\n{name} said: \"{answer}\"");
    }
    text.push_str(
        "\n\nCompare the reasoning step by step: check whether each approach \
         counts every case exactly once. Press Ctrl+N when you're ready for the next problem.",
    );
    text
}

fn choose<R: Rng + ?Sized>(lines: &[&str], rng: &mut R) -> String {
    lines.choose(rng).copied().unwrap_or_default().to_string()
}
