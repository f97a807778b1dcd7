use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "personal_info")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// 11-digit social-security registration number.
    #[sea_orm(unique)]
    pub amka: String,
    #[sea_orm(unique)]
    pub identity_number: String,
    pub place_of_birth: String,
    pub municipality_of_registration: String,
    /// The AMKA proof file, owned exclusively by this record.
    pub amka_file_id: Option<i32>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::attachment::Entity",
        from = "Column::AmkaFileId",
        to = "super::attachment::Column::Id"
    )]
    AmkaFile,
    #[sea_orm(has_one = "super::teacher::Entity")]
    Teacher,
}

impl Related<super::attachment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AmkaFile.def()
    }
}

impl Related<super::teacher::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
