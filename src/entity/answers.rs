//! 作答实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "answers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub submission_id: i64,
    pub question_id: i64,
    pub answer_text: Option<String>,
    // JSON 数组，存储所选选项 ID
    pub selected_options: String,
    pub is_correct: Option<bool>,
    pub score: Option<f64>,
    pub answered_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::submissions::Entity",
        from = "Column::SubmissionId",
        to = "super::submissions::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Submission,
    #[sea_orm(
        belongs_to = "super::questions::Entity",
        from = "Column::QuestionId",
        to = "super::questions::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Question,
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submission.def()
    }
}

impl Related<super::questions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Question.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_answer(self) -> crate::models::submissions::entities::Answer {
        crate::models::submissions::entities::Answer {
            id: self.id,
            submission_id: self.submission_id,
            question_id: self.question_id,
            answer_text: self.answer_text,
            selected_options: serde_json::from_str(&self.selected_options).unwrap_or_default(),
            is_correct: self.is_correct,
            score: self.score,
            answered_at: super::ts_to_datetime(self.answered_at),
        }
    }
}
