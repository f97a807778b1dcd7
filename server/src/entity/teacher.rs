use sea_orm::entity::prelude::*;

/// A teacher wraps exactly one user and one personal-info record; the two are
/// created together and never independently. `uuid` is the external identifier
/// exposed over the API (internal ids never leave the store).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "teachers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub uuid: String,
    pub is_active: bool,
    #[sea_orm(unique)]
    pub user_id: i32,
    #[sea_orm(unique)]
    pub personal_info_id: i32,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::personal_info::Entity",
        from = "Column::PersonalInfoId",
        to = "super::personal_info::Column::Id"
    )]
    PersonalInfo,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::personal_info::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PersonalInfo.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
