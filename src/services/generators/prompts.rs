//! 提示词模板
//!
//! 输出格式与 `parser` 中的解析规则一一对应，修改时需同步。

use crate::models::generators::entities::{DiagramType, Difficulty};
use crate::models::questions::entities::QuestionType;

pub fn questions_prompt(
    topic: &str,
    count: u32,
    question_type: QuestionType,
    difficulty: Difficulty,
    language: &str,
    programming_language: Option<&str>,
) -> String {
    let type_rules = match question_type {
        QuestionType::SingleChoice => {
            "Provide 4 options labelled A) to D) with exactly one correct answer. ANSWER is a single letter."
        }
        QuestionType::MultipleChoice => {
            "Provide 4 to 6 options labelled A), B), ... with one or more correct answers. ANSWER lists the letters separated by commas."
        }
        QuestionType::TrueFalse => {
            "Write a statement. Provide the options A) True and B) False. ANSWER is True or False."
        }
        QuestionType::Open => "Do not provide options. ANSWER contains a short model answer.",
        QuestionType::Code => {
            "Ask the student to write or fix code. Do not provide options. ANSWER contains a reference solution."
        }
    };
    let programming = programming_language
        .map(|lang| format!("All code must be written in {lang}.\n"))
        .unwrap_or_default();

    format!(
        r#"You are an experienced teacher writing assessment questions.

Write {count} {difficulty} {question_type} questions about: {topic}
Write the questions in {language}.
{programming}{type_rules}

Format every question EXACTLY as:
---QUESTION---
TEXT: <question text>
TYPE: {question_type}
OPTIONS:
A) <option>
B) <option>
ANSWER: <answer>
EXPLANATION: <why the answer is correct>
---END---

Do not add any text outside the question blocks.
"#
    )
}

pub fn tutorial_prompt(topic: &str, level: &str, language: &str, sections: u32) -> String {
    format!(
        r#"You are an expert instructor writing a tutorial.

Topic: {topic}
Audience level: {level}
Write in {language} using Markdown inside CONTENT.
Write exactly {sections} sections.

Format the answer EXACTLY as:
TITLE: <tutorial title>
SUMMARY: <two or three sentence summary>
===SECTION===
HEADING: <section heading>
CONTENT:
<section body in Markdown>
===END SECTION===
"#
    )
}

pub fn diagram_prompt(description: &str, diagram_type: DiagramType) -> String {
    format!(
        r#"Create a Mermaid {diagram_type} diagram for the following description:

{description}

Return only one fenced code block that starts with ```mermaid.
The first line of the diagram must be `{keyword}`.
Do not explain the diagram.
"#,
        keyword = diagram_type.primary_keyword()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_questions_prompt_mentions_format() {
        let prompt = questions_prompt(
            "Rust lifetimes",
            3,
            QuestionType::MultipleChoice,
            Difficulty::Hard,
            "English",
            Some("Rust"),
        );
        assert!(prompt.contains("Write 3 hard multiple_choice questions about: Rust lifetimes"));
        assert!(prompt.contains("---QUESTION---"));
        assert!(prompt.contains("All code must be written in Rust."));
    }

    #[test]
    fn test_diagram_prompt_keyword() {
        let prompt = diagram_prompt("login flow", DiagramType::Sequence);
        assert!(prompt.contains("`sequenceDiagram`"));
    }
}
