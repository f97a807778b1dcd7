//! Conjunctive filtering over the teacher entity graph.
//!
//! Each predicate builder maps an optional filter value to an optional SQL
//! condition; an absent or blank value yields `None`, which must never narrow
//! the result set. The aggregator joins `users` and `personal_info` exactly
//! once each, so every predicate shares the same join.

use sea_orm::sea_query::{Expr, Func, SimpleExpr};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, IntoSimpleExpr, JoinType, QueryFilter, QuerySelect,
    RelationTrait, Select,
};
use serde::Deserialize;

use crate::entity::{personal_info, teacher, user};

/// Filter criteria for teacher queries. Every field is independently
/// optional; pagination and sorting ride along for the paginated endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TeacherFilters {
    pub uuid: Option<String>,
    pub user_vat: Option<String>,
    pub user_amka: Option<String>,
    pub active: Option<bool>,
    pub page: u64,
    pub size: u64,
    pub sort_by: Option<String>,
    pub sort_direction: Option<String>,
}

impl Default for TeacherFilters {
    fn default() -> Self {
        Self {
            uuid: None,
            user_vat: None,
            user_amka: None,
            active: None,
            page: 0,
            size: 10,
            sort_by: None,
            sort_direction: None,
        }
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

/// Equality against the joined user's VAT.
pub fn teacher_user_vat_is(vat: Option<&str>) -> Option<SimpleExpr> {
    if is_blank(vat) {
        return None;
    }
    Some(user::Column::Vat.eq(vat.unwrap_or_default()))
}

/// Equality against the joined personal info's AMKA.
pub fn tr_personal_info_amka_is(amka: Option<&str>) -> Option<SimpleExpr> {
    if is_blank(amka) {
        return None;
    }
    Some(personal_info::Column::Amka.eq(amka.unwrap_or_default()))
}

/// Case-insensitive substring match: `UPPER(column) LIKE '%' || UPPER(value)
/// || '%'`, the pattern bound as a parameter.
pub fn tr_string_field_like<C: ColumnTrait>(column: C, value: Option<&str>) -> Option<SimpleExpr> {
    let value = value?;
    if value.trim().is_empty() {
        return None;
    }
    let pattern = format!("%{}%", value.to_uppercase());
    Some(Expr::expr(Func::upper(column.into_simple_expr())).like(pattern))
}

/// Equality against the joined user's active flag.
pub fn tr_user_is_active(is_active: Option<bool>) -> Option<SimpleExpr> {
    is_active.map(|v| user::Column::IsActive.eq(v))
}

/// AND of all active predicates; empty when every filter field is absent.
pub fn combined_condition(filters: &TeacherFilters) -> Condition {
    Condition::all()
        .add_option(tr_string_field_like(teacher::Column::Uuid, filters.uuid.as_deref()))
        .add_option(teacher_user_vat_is(filters.user_vat.as_deref()))
        .add_option(tr_personal_info_amka_is(filters.user_amka.as_deref()))
        .add_option(tr_user_is_active(filters.active))
}

/// One select over the teacher graph: both relations joined once, filtered by
/// the combined condition.
pub fn filtered_select(filters: &TeacherFilters) -> Select<teacher::Entity> {
    teacher::Entity::find()
        .join(JoinType::InnerJoin, teacher::Relation::User.def())
        .join(JoinType::InnerJoin, teacher::Relation::PersonalInfo.def())
        .filter(combined_condition(filters))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
    use uuid::Uuid;

    use crate::entity::user::{Gender, Role};

    async fn setup_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db
    }

    async fn seed_teacher(
        db: &DatabaseConnection,
        vat: &str,
        amka: &str,
        active: bool,
    ) -> teacher::Model {
        let now = Utc::now().naive_utc();
        let user = user::ActiveModel {
            username: Set(format!("{vat}@example.com")),
            password_hash: Set("$argon2id$v=19$m=19456,t=2,p=1$fake".to_string()),
            vat: Set(vat.to_string()),
            firstname: Set("Maria".to_string()),
            lastname: Set("Papadopoulou".to_string()),
            father_name: Set("Nikos".to_string()),
            mother_name: Set("Eleni".to_string()),
            father_lastname: Set("Papadopoulos".to_string()),
            mother_lastname: Set("Georgiou".to_string()),
            date_of_birth: Set("1985-04-12".parse().unwrap()),
            gender: Set(Gender::Female),
            role: Set(Role::Teacher),
            is_active: Set(active),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();

        let info = personal_info::ActiveModel {
            amka: Set(amka.to_string()),
            identity_number: Set(format!("ID-{amka}")),
            place_of_birth: Set("Athens".to_string()),
            municipality_of_registration: Set("Kallithea".to_string()),
            amka_file_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap();

        teacher::ActiveModel {
            uuid: Set(Uuid::new_v4().to_string()),
            is_active: Set(active),
            user_id: Set(user.id),
            personal_info_id: Set(info.id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(db)
        .await
        .unwrap()
    }

    async fn seed_three(db: &DatabaseConnection) -> Vec<teacher::Model> {
        vec![
            seed_teacher(db, "111111111", "11111111111", true).await,
            seed_teacher(db, "222222222", "22222222222", true).await,
            seed_teacher(db, "333333333", "33333333333", false).await,
        ]
    }

    #[test]
    fn absent_or_blank_values_build_no_predicate() {
        assert!(teacher_user_vat_is(None).is_none());
        assert!(teacher_user_vat_is(Some("   ")).is_none());
        assert!(tr_personal_info_amka_is(None).is_none());
        assert!(tr_personal_info_amka_is(Some("")).is_none());
        assert!(tr_string_field_like(teacher::Column::Uuid, None).is_none());
        assert!(tr_string_field_like(teacher::Column::Uuid, Some(" \t")).is_none());
        assert!(tr_user_is_active(None).is_none());
    }

    #[tokio::test]
    async fn no_filters_matches_everything() {
        let db = setup_db().await;
        seed_three(&db).await;

        let rows = filtered_select(&TeacherFilters::default()).all(&db).await.unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[tokio::test]
    async fn blank_filter_values_match_everything() {
        let db = setup_db().await;
        seed_three(&db).await;

        let filters = TeacherFilters {
            uuid: Some("  ".to_string()),
            user_vat: Some("".to_string()),
            user_amka: Some(" ".to_string()),
            ..Default::default()
        };
        let rows = filtered_select(&filters).all(&db).await.unwrap();
        assert_eq!(rows.len(), 3);
    }

    #[tokio::test]
    async fn vat_filter_is_exact() {
        let db = setup_db().await;
        seed_three(&db).await;

        let filters = TeacherFilters {
            user_vat: Some("222222222".to_string()),
            ..Default::default()
        };
        let rows = filtered_select(&filters).all(&db).await.unwrap();
        assert_eq!(rows.len(), 1);

        let filters = TeacherFilters {
            user_vat: Some("22222222".to_string()),
            ..Default::default()
        };
        assert!(filtered_select(&filters).all(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn amka_filter_matches_personal_info() {
        let db = setup_db().await;
        seed_three(&db).await;

        let filters = TeacherFilters {
            user_amka: Some("33333333333".to_string()),
            ..Default::default()
        };
        let rows = filtered_select(&filters).all(&db).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert!(!rows[0].is_active);
    }

    #[tokio::test]
    async fn uuid_substring_match_is_case_insensitive() {
        let db = setup_db().await;
        let seeded = seed_three(&db).await;

        // middle fragment of the uuid, upper-cased
        let fragment = seeded[1].uuid[9..23].to_uppercase();
        let filters = TeacherFilters {
            uuid: Some(fragment),
            ..Default::default()
        };
        let rows = filtered_select(&filters).all(&db).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].uuid, seeded[1].uuid);
    }

    #[tokio::test]
    async fn active_filter_matches_user_flag() {
        let db = setup_db().await;
        seed_three(&db).await;

        let filters = TeacherFilters {
            active: Some(false),
            ..Default::default()
        };
        let rows = filtered_select(&filters).all(&db).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn predicates_conjoin() {
        let db = setup_db().await;
        seed_three(&db).await;

        let filters = TeacherFilters {
            user_vat: Some("111111111".to_string()),
            active: Some(false),
            ..Default::default()
        };
        assert!(filtered_select(&filters).all(&db).await.unwrap().is_empty());

        let filters = TeacherFilters {
            user_vat: Some("333333333".to_string()),
            user_amka: Some("33333333333".to_string()),
            active: Some(false),
            ..Default::default()
        };
        assert_eq!(filtered_select(&filters).all(&db).await.unwrap().len(), 1);
    }
}
