//! 考试场次实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "attempts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub evaluation_id: i64,
    pub created_by: i64,
    pub title: Option<String>,
    #[sea_orm(unique)]
    pub code: String,
    pub start_time: i64,
    pub end_time: i64,
    pub closed: bool,
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
        on_delete = "Restrict"
    )]
    Evaluation,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatedBy",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Creator,
    #[sea_orm(has_many = "super::submissions::Entity")]
    Submissions,
}

impl Related<super::evaluations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Evaluation.def()
    }
}

impl Related<super::submissions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_attempt(self) -> crate::models::attempts::entities::Attempt {
        use crate::models::attempts::entities::{Attempt, AttemptStatus};

        let now = chrono::Utc::now().timestamp();
        Attempt {
            id: self.id,
            evaluation_id: self.evaluation_id,
            created_by: self.created_by,
            title: self.title,
            code: self.code,
            start_time: super::ts_to_datetime(self.start_time),
            end_time: super::ts_to_datetime(self.end_time),
            closed: self.closed,
            status: AttemptStatus::at(self.start_time, self.end_time, self.closed, now),
            created_at: super::ts_to_datetime(self.created_at),
            updated_at: super::ts_to_datetime(self.updated_at),
        }
    }
}
