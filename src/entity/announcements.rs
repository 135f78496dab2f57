//! 公告实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "announcements")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub content: String,
    pub target_audience: String,
    pub target_class_id: Option<i64>,
    pub target_role: Option<String>,
    pub priority: String,
    pub valid_from: Option<i64>,
    pub valid_until: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AuthorId",
        to = "super::users::Column::Id"
    )]
    Author,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_announcement(self) -> crate::models::announcements::entities::Announcement {
        use super::to_datetime;
        use crate::models::announcements::entities::{Announcement, Priority, TargetAudience};
        use crate::models::users::entities::UserRole;

        Announcement {
            id: self.id,
            author_id: self.author_id,
            title: self.title,
            content: self.content,
            target_audience: self
                .target_audience
                .parse::<TargetAudience>()
                .unwrap_or(TargetAudience::All),
            target_class_id: self.target_class_id,
            target_role: self
                .target_role
                .and_then(|r| r.parse::<UserRole>().ok()),
            priority: self
                .priority
                .parse::<Priority>()
                .unwrap_or(Priority::Normal),
            valid_from: self.valid_from.map(to_datetime),
            valid_until: self.valid_until.map(to_datetime),
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
