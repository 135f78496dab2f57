//! 教学内容实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "content_items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub content_type: String,
    pub content: String,
    pub class_id: Option<i64>,
    pub author_id: i64,
    pub status: String,
    pub version: i32,
    // JSON: [ContentVersion]
    pub previous_versions: String,
    // JSON: [String]
    pub tags: String,
    pub published_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::classes::Entity",
        from = "Column::ClassId",
        to = "super::classes::Column::Id"
    )]
    Class,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::AuthorId",
        to = "super::users::Column::Id"
    )]
    Author,
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_content_item(self) -> crate::models::content_items::entities::ContentItem {
        use super::{from_json_column, to_datetime};
        use crate::models::content_items::entities::{ContentItem, ContentStatus, ContentType};

        ContentItem {
            id: self.id,
            title: self.title,
            description: self.description,
            content_type: self
                .content_type
                .parse::<ContentType>()
                .unwrap_or(ContentType::Resource),
            content: self.content,
            class_id: self.class_id,
            author_id: self.author_id,
            status: self
                .status
                .parse::<ContentStatus>()
                .unwrap_or(ContentStatus::Draft),
            version: self.version.max(1),
            previous_versions: from_json_column(&self.previous_versions),
            tags: from_json_column(&self.tags),
            published_at: self.published_at.map(to_datetime),
            created_at: to_datetime(self.created_at),
            updated_at: to_datetime(self.updated_at),
        }
    }
}
