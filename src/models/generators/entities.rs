use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::questions::entities::QuestionType;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "../frontend/src/types/generated/generator.ts")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/generator.ts")]
pub struct GeneratedOption {
    pub text: String,
    pub is_correct: bool,
}

// 模型生成的题目（尚未入库）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/generator.ts")]
pub struct GeneratedQuestion {
    pub text: String,
    pub question_type: QuestionType,
    pub options: Vec<GeneratedOption>,
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/generator.ts")]
pub struct TutorialSection {
    pub heading: String,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/generator.ts")]
pub struct Tutorial {
    pub title: String,
    pub summary: String,
    pub topic: String,
    pub level: String,
    pub language: String,
    pub sections: Vec<TutorialSection>,
}

// Mermaid 图类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export, export_to = "../frontend/src/types/generated/generator.ts")]
pub enum DiagramType {
    Flowchart,
    Sequence,
    Class,
    State,
    Er,
    Gantt,
    Mindmap,
}

impl DiagramType {
    /// 合法的首行关键字
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            DiagramType::Flowchart => &["flowchart", "graph"],
            DiagramType::Sequence => &["sequenceDiagram"],
            DiagramType::Class => &["classDiagram"],
            DiagramType::State => &["stateDiagram-v2", "stateDiagram"],
            DiagramType::Er => &["erDiagram"],
            DiagramType::Gantt => &["gantt"],
            DiagramType::Mindmap => &["mindmap"],
        }
    }

    /// 在提示词中使用的关键字
    pub fn primary_keyword(&self) -> &'static str {
        self.keywords()[0]
    }
}

impl std::fmt::Display for DiagramType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DiagramType::Flowchart => "flowchart",
            DiagramType::Sequence => "sequence",
            DiagramType::Class => "class",
            DiagramType::State => "state",
            DiagramType::Er => "er",
            DiagramType::Gantt => "gantt",
            DiagramType::Mindmap => "mindmap",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/generator.ts")]
pub struct Diagram {
    pub diagram_type: DiagramType,
    pub description: String,
    pub code: String,
}
