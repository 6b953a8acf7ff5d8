use super::entities::{Diagram, GeneratedQuestion, Tutorial};
use crate::models::questions::entities::Question;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/generator.ts")]
pub struct GeneratedQuestionsResponse {
    pub topic: String,
    pub requested: u32,
    pub items: Vec<GeneratedQuestion>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/generator.ts")]
pub struct ImportQuestionsResponse {
    pub evaluation_id: i64,
    pub items: Vec<Question>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/generator.ts")]
pub struct TutorialResponse {
    pub tutorial: Tutorial,
}

#[derive(Debug, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/generator.ts")]
pub struct DiagramResponse {
    pub diagram: Diagram,
}
