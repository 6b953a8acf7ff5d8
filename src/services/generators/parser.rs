//! 模型输出解析
//!
//! 格式不完整的题目块直接跳过，一个有效结果都没有时返回解析错误。

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::errors::{EvalAdminError, Result};
use crate::models::generators::entities::{
    DiagramType, GeneratedOption, GeneratedQuestion, TutorialSection,
};
use crate::models::questions::{entities::QuestionType, requests::QuestionOptionInput};
use crate::services::questions::validation::validate_options;

const QUESTION_START: &str = "---QUESTION---";
const QUESTION_END: &str = "---END---";
const SECTION_START: &str = "===SECTION===";
const SECTION_END: &str = "===END SECTION===";

static OPTION_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(?:[-*]\s*)?\(?([A-Za-z])[\)\.:]\s*(.+?)\s*$").expect("valid option regex")
});

static MERMAID_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```[ \t]*mermaid[ \t]*\r?\n(.*?)```").expect("valid mermaid fence regex")
});

static ANY_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```[A-Za-z0-9_-]*[ \t]*\r?\n(.*?)```").expect("valid fence regex")
});

/// 取出位于 start/end 标记之间的块
fn blocks<'a>(text: &'a str, start: &str, end: &str) -> Vec<&'a str> {
    text.split(start)
        .skip(1)
        .map(|chunk| chunk.split(end).next().unwrap_or(chunk))
        .collect()
}

/// 按 `KEY:` 前缀切分字段，字段值可以跨行
fn fields(block: &str, keys: &[&str]) -> Vec<(String, String)> {
    let mut out: Vec<(String, String)> = Vec::new();
    for line in block.lines() {
        let trimmed = line.trim_start();
        let matched = keys.iter().find_map(|key| {
            let prefix = format!("{key}:");
            trimmed
                .get(..prefix.len())
                .filter(|head| head.eq_ignore_ascii_case(&prefix))
                .map(|_| (key.to_string(), trimmed[prefix.len()..].trim().to_string()))
        });
        match matched {
            Some(field) => out.push(field),
            None => {
                if let Some((_, value)) = out.last_mut() {
                    if !value.is_empty() {
                        value.push('\n');
                    }
                    value.push_str(line.trim_end());
                }
            }
        }
    }
    for (_, value) in out.iter_mut() {
        *value = value.trim().to_string();
    }
    out
}

fn field<'a>(fields: &'a [(String, String)], key: &str) -> Option<&'a str> {
    fields
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .filter(|v| !v.is_empty())
}

fn letter_index(letter: char) -> usize {
    (letter.to_ascii_uppercase() as u8 - b'A') as usize
}

/// 解析 ANSWER 字段为正确选项下标
fn answer_indices(answer: &str, options: &[String]) -> Vec<usize> {
    let normalized = answer.trim().trim_end_matches('.').to_ascii_lowercase();

    // True / False 直接按选项文本匹配
    if let Some(i) = options
        .iter()
        .position(|o| o.trim().eq_ignore_ascii_case(&normalized))
    {
        return vec![i];
    }

    let mut indices: Vec<usize> = normalized
        .split(|c: char| c == ',' || c == ';' || c == '/' || c.is_whitespace())
        .filter(|token| !token.is_empty() && *token != "and")
        .filter_map(|token| {
            let token = token.trim_matches(|c: char| c == ')' || c == '(' || c == '.');
            let mut chars = token.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_alphabetic() => Some(letter_index(c)),
                _ => None,
            }
        })
        .filter(|i| *i < options.len())
        .collect();
    indices.sort_unstable();
    indices.dedup();
    indices
}

fn parse_question_block(block: &str, fallback: QuestionType) -> Option<GeneratedQuestion> {
    let fields = fields(block, &["TEXT", "TYPE", "OPTIONS", "ANSWER", "EXPLANATION"]);

    let text = field(&fields, "TEXT")?.to_string();
    let question_type = field(&fields, "TYPE")
        .and_then(|t| t.parse::<QuestionType>().ok())
        .unwrap_or(fallback);
    let answer = field(&fields, "ANSWER");
    let explanation = field(&fields, "EXPLANATION").map(str::to_string);

    if !question_type.is_choice() {
        let explanation = match (answer, explanation) {
            (Some(answer), Some(explanation)) => {
                Some(format!("Reference answer:\n{answer}\n\n{explanation}"))
            }
            (Some(answer), None) => Some(format!("Reference answer:\n{answer}")),
            (None, explanation) => explanation,
        };
        return Some(GeneratedQuestion {
            text,
            question_type,
            options: Vec::new(),
            explanation,
        });
    }

    let mut option_texts: Vec<String> = field(&fields, "OPTIONS")
        .map(|raw| {
            raw.lines()
                .filter_map(|line| OPTION_LINE.captures(line))
                .filter_map(|caps| caps.get(2).map(|m| m.as_str().to_string()))
                .collect()
        })
        .unwrap_or_default();
    if option_texts.is_empty() && question_type == QuestionType::TrueFalse {
        option_texts = vec!["True".to_string(), "False".to_string()];
    }

    let correct = answer_indices(answer?, &option_texts);
    let options: Vec<GeneratedOption> = option_texts
        .into_iter()
        .enumerate()
        .map(|(i, text)| GeneratedOption {
            text,
            is_correct: correct.contains(&i),
        })
        .collect();

    let inputs: Vec<QuestionOptionInput> = options
        .iter()
        .map(|o| QuestionOptionInput {
            text: o.text.clone(),
            is_correct: o.is_correct,
        })
        .collect();
    if let Err(reason) = validate_options(question_type, &inputs) {
        debug!("Skipping generated question: {reason}");
        return None;
    }

    Some(GeneratedQuestion {
        text,
        question_type,
        options,
        explanation,
    })
}

/// 解析题目块，`fallback` 用于缺少 TYPE 字段的块
pub fn parse_questions(text: &str, fallback: QuestionType) -> Result<Vec<GeneratedQuestion>> {
    let questions: Vec<GeneratedQuestion> = blocks(text, QUESTION_START, QUESTION_END)
        .into_iter()
        .filter_map(|block| parse_question_block(block, fallback))
        .collect();

    if questions.is_empty() {
        return Err(EvalAdminError::response_parse(
            "No valid question blocks found in model output",
        ));
    }
    Ok(questions)
}

/// 解析教程，返回 (标题, 摘要, 章节)
pub fn parse_tutorial(text: &str) -> Result<(String, String, Vec<TutorialSection>)> {
    let header = text.split(SECTION_START).next().unwrap_or_default();
    let header_fields = fields(header, &["TITLE", "SUMMARY"]);
    let title = field(&header_fields, "TITLE")
        .ok_or_else(|| EvalAdminError::response_parse("Tutorial title is missing"))?
        .to_string();
    let summary = field(&header_fields, "SUMMARY")
        .unwrap_or_default()
        .to_string();

    let sections: Vec<TutorialSection> = blocks(text, SECTION_START, SECTION_END)
        .into_iter()
        .filter_map(|block| {
            let fields = fields(block, &["HEADING", "CONTENT"]);
            Some(TutorialSection {
                heading: field(&fields, "HEADING")?.to_string(),
                content: field(&fields, "CONTENT")?.to_string(),
            })
        })
        .collect();

    if sections.is_empty() {
        return Err(EvalAdminError::response_parse(
            "No valid tutorial sections found in model output",
        ));
    }
    Ok((title, summary, sections))
}

fn header_keyword(code: &str) -> Option<&str> {
    code.lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with("%%"))
        .and_then(|line| line.split_whitespace().next())
}

fn is_mermaid_keyword(token: &str) -> bool {
    [
        DiagramType::Flowchart,
        DiagramType::Sequence,
        DiagramType::Class,
        DiagramType::State,
        DiagramType::Er,
        DiagramType::Gantt,
        DiagramType::Mindmap,
    ]
    .iter()
    .any(|t| t.keywords().contains(&token))
}

/// 提取 Mermaid 代码并校验图类型
pub fn extract_mermaid(text: &str, expected: DiagramType) -> Result<String> {
    let code = if let Some(caps) = MERMAID_FENCE.captures(text) {
        caps.get(1).map(|m| m.as_str()).unwrap_or_default()
    } else if let Some(caps) = ANY_FENCE.captures(text) {
        caps.get(1).map(|m| m.as_str()).unwrap_or_default()
    } else if header_keyword(text).is_some_and(is_mermaid_keyword) {
        text
    } else {
        return Err(EvalAdminError::response_parse(
            "No Mermaid diagram found in model output",
        ));
    };

    let code = code.trim().to_string();
    match header_keyword(&code) {
        Some(keyword) if expected.keywords().contains(&keyword) => Ok(code),
        Some(keyword) => Err(EvalAdminError::response_parse(format!(
            "Expected a {expected} diagram but got '{keyword}'"
        ))),
        None => Err(EvalAdminError::response_parse("Mermaid diagram is empty")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUESTIONS: &str = r#"Here are your questions.
---QUESTION---
TEXT: Which keyword moves ownership
into a closure?
TYPE: single_choice
OPTIONS:
A) ref
B) move
C) mut
D) static
ANSWER: B
EXPLANATION: `move` forces the closure to take ownership.
---END---
---QUESTION---
TEXT: Which types are Copy?
TYPE: multiple_choice
OPTIONS:
A) i32
B) String
C) bool
ANSWER: A, C
---END---
---QUESTION---
TEXT: Broken block without answer
TYPE: single_choice
OPTIONS:
A) x
B) y
---END---
---QUESTION---
TEXT: Rust has a garbage collector.
TYPE: true_false
ANSWER: False
---END---
"#;

    #[test]
    fn test_parse_questions() {
        let questions = parse_questions(QUESTIONS, QuestionType::SingleChoice).unwrap();
        assert_eq!(questions.len(), 3);

        let first = &questions[0];
        assert_eq!(first.text, "Which keyword moves ownership\ninto a closure?");
        assert_eq!(first.options.len(), 4);
        assert!(first.options[1].is_correct);
        assert_eq!(first.options[1].text, "move");
        assert_eq!(
            first.explanation.as_deref(),
            Some("`move` forces the closure to take ownership.")
        );

        let second = &questions[1];
        assert_eq!(second.question_type, QuestionType::MultipleChoice);
        let correct: Vec<bool> = second.options.iter().map(|o| o.is_correct).collect();
        assert_eq!(correct, vec![true, false, true]);

        let tf = &questions[2];
        assert_eq!(tf.question_type, QuestionType::TrueFalse);
        assert_eq!(tf.options[0].text, "True");
        assert!(!tf.options[0].is_correct);
        assert!(tf.options[1].is_correct);
    }

    #[test]
    fn test_parse_open_question_keeps_reference_answer() {
        let text = "---QUESTION---\nTEXT: Explain borrowing.\nANSWER: References without ownership.\n---END---";
        let questions = parse_questions(text, QuestionType::Open).unwrap();
        assert_eq!(questions[0].question_type, QuestionType::Open);
        assert!(questions[0].options.is_empty());
        assert_eq!(
            questions[0].explanation.as_deref(),
            Some("Reference answer:\nReferences without ownership.")
        );
    }

    #[test]
    fn test_parse_questions_rejects_garbage() {
        let err = parse_questions("I cannot help with that.", QuestionType::Open).unwrap_err();
        assert!(matches!(err, EvalAdminError::ResponseParse(_)));

        // 单选题给出两个正确答案
        let invalid = "---QUESTION---\nTEXT: Q\nTYPE: single_choice\nOPTIONS:\nA) a\nB) b\nANSWER: A, B\n---END---";
        assert!(parse_questions(invalid, QuestionType::SingleChoice).is_err());
    }

    #[test]
    fn test_answer_indices() {
        let options = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        assert_eq!(answer_indices("B", &options), vec![1]);
        assert_eq!(answer_indices("a and c", &options), vec![0, 2]);
        assert_eq!(answer_indices("C), A)", &options), vec![0, 2]);
        assert_eq!(answer_indices("Z", &options), Vec::<usize>::new());
    }

    #[test]
    fn test_parse_tutorial() {
        let text = r#"TITLE: Getting started with Tokio
SUMMARY: Learn the runtime.
===SECTION===
HEADING: Installing
CONTENT:
Add `tokio` to Cargo.toml.

```toml
tokio = "1"
```
===END SECTION===
===SECTION===
HEADING: Missing content
===END SECTION===
===SECTION===
HEADING: Spawning tasks
CONTENT: Use `tokio::spawn`.
===END SECTION===
"#;
        let (title, summary, sections) = parse_tutorial(text).unwrap();
        assert_eq!(title, "Getting started with Tokio");
        assert_eq!(summary, "Learn the runtime.");
        assert_eq!(sections.len(), 2);
        assert!(sections[0].content.contains("```toml"));
        assert_eq!(sections[1].heading, "Spawning tasks");

        assert!(parse_tutorial("SUMMARY: no title").is_err());
        assert!(parse_tutorial("TITLE: t\nSUMMARY: s").is_err());
    }

    #[test]
    fn test_extract_mermaid() {
        let fenced = "Sure!\n```mermaid\nsequenceDiagram\n  A->>B: hi\n```\nDone.";
        assert_eq!(
            extract_mermaid(fenced, DiagramType::Sequence).unwrap(),
            "sequenceDiagram\n  A->>B: hi"
        );

        let plain_fence = "```\ngraph TD\n  A-->B\n```";
        assert!(extract_mermaid(plain_fence, DiagramType::Flowchart).is_ok());

        let raw = "%% comment\nstateDiagram-v2\n  [*] --> Idle";
        assert!(extract_mermaid(raw, DiagramType::State).is_ok());

        let mismatch = "```mermaid\nclassDiagram\n  A <|-- B\n```";
        assert!(extract_mermaid(mismatch, DiagramType::Er).is_err());

        assert!(extract_mermaid("no diagram here", DiagramType::Gantt).is_err());
    }
}
