use sea_orm::entity::prelude::*;

/// Metadata for a stored upload; the bytes live on disk under the upload dir.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "attachments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Original filename as sent by the client (may be absent).
    pub filename: Option<String>,
    /// Generated collision-free storage name.
    #[sea_orm(unique)]
    pub saved_name: String,
    pub file_path: String,
    pub content_type: Option<String>,
    pub extension: String,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::personal_info::Entity")]
    PersonalInfo,
}

impl Related<super::personal_info::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PersonalInfo.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
