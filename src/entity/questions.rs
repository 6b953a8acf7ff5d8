//! 题目实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub evaluation_id: i64,
    pub text: String,
    pub question_type: String,
    pub language: Option<String>,
    pub points: f64,
    pub position: i32,
    pub explanation: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::evaluations::Entity",
        from = "Column::EvaluationId",
        to = "super::evaluations::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Evaluation,
    #[sea_orm(has_many = "super::question_options::Entity")]
    Options,
    #[sea_orm(has_many = "super::answers::Entity")]
    Answers,
}

impl Related<super::evaluations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Evaluation.def()
    }
}

impl Related<super::question_options::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Options.def()
    }
}

impl Related<super::answers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Answers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_question(
        self,
        options: Vec<super::question_options::Model>,
    ) -> crate::models::questions::entities::Question {
        use crate::models::questions::entities::{Question, QuestionType};

        let mut options: Vec<_> = options.into_iter().map(|o| o.into_option()).collect();
        options.sort_by_key(|o| (o.position, o.id));

        Question {
            id: self.id,
            evaluation_id: self.evaluation_id,
            text: self.text,
            question_type: self
                .question_type
                .parse::<QuestionType>()
                .unwrap_or(QuestionType::Open),
            language: self.language,
            points: self.points,
            position: self.position,
            explanation: self.explanation,
            options,
            created_at: super::ts_to_datetime(self.created_at),
            updated_at: super::ts_to_datetime(self.updated_at),
        }
    }
}
