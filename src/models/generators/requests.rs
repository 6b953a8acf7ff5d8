use super::entities::{Diagram, DiagramType, Difficulty, GeneratedQuestion, Tutorial};
use crate::models::common::ExportFormat;
use crate::models::questions::entities::QuestionType;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/generator.ts")]
pub struct GenerateQuestionsRequest {
    pub topic: String,
    pub count: u32,
    pub question_type: QuestionType,
    #[serde(default)]
    pub difficulty: Difficulty,
    // 题目使用的自然语言
    pub language: Option<String>,
    // 编程题的编程语言
    pub programming_language: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/generator.ts")]
pub struct ImportQuestionsRequest {
    pub evaluation_id: i64,
    pub questions: Vec<GeneratedQuestion>,
    pub points: Option<f64>,
    pub language: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/generator.ts")]
pub struct GenerateTutorialRequest {
    pub topic: String,
    pub level: Option<String>,
    pub language: Option<String>,
    pub sections: Option<u32>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/generator.ts")]
pub struct ExportTutorialRequest {
    pub tutorial: Tutorial,
    pub format: Option<ExportFormat>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/generator.ts")]
pub struct GenerateDiagramRequest {
    pub description: String,
    pub diagram_type: DiagramType,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/generator.ts")]
pub struct ExportDiagramRequest {
    pub diagram: Diagram,
    pub format: Option<ExportFormat>,
}
