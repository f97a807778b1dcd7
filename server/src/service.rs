//! Teacher workflows: the transactional creation path and the read paths
//! (plain, filtered, filtered + paginated).

use std::path::Path;

use argon2::{Argon2, PasswordHasher};
use chrono::Utc;
use password_hash::SaltString;
use rand_core::OsRng;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Select, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::api::dto::{TeacherInsertDto, TeacherReadOnlyDto};
use crate::entity::{attachment, personal_info, teacher, user};
use crate::filters::{self, TeacherFilters};
use crate::pagination::Paginated;
use crate::storage::{self, SavedUpload, StorageError};
use crate::validation::{self, FieldError};

// ---------- error type ----------

#[derive(Debug)]
pub enum ServiceError {
    /// Uniqueness violation, naming the offending field and value.
    AlreadyExists { field: &'static str, value: String },
    /// Input passed schema validation but failed business rules.
    InvalidArgument(Vec<FieldError>),
    NotFound(&'static str),
    Storage(StorageError),
    Hash(String),
    Db(DbErr),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::AlreadyExists { field, value } => {
                write!(f, "{field} '{value}' already exists")
            }
            ServiceError::InvalidArgument(errors) => {
                write!(f, "invalid input: {} field(s) failed validation", errors.len())
            }
            ServiceError::NotFound(what) => write!(f, "{what} not found"),
            ServiceError::Storage(e) => write!(f, "storage error: {e}"),
            ServiceError::Hash(e) => write!(f, "password hash error: {e}"),
            ServiceError::Db(e) => write!(f, "database error: {e}"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<DbErr> for ServiceError {
    fn from(e: DbErr) -> Self {
        ServiceError::Db(e)
    }
}

/// An uploaded file as received at the HTTP boundary.
#[derive(Debug, Default)]
pub struct UploadedFile {
    pub bytes: Vec<u8>,
    pub filename: Option<String>,
    pub content_type: Option<String>,
}

// ---------- creation workflow ----------

/// Create the teacher aggregate (user + personal info + optional AMKA file)
/// in one transaction.
///
/// Order: validation, uniqueness gate, file write, inserts in dependency
/// order, commit. The file is written before the commit; if anything after
/// the write fails the file is deleted, so the filesystem side effect tracks
/// the DB rollback.
pub async fn save_teacher(
    db: &DatabaseConnection,
    upload_dir: &Path,
    dto: TeacherInsertDto,
    amka_file: Option<UploadedFile>,
) -> Result<TeacherReadOnlyDto, ServiceError> {
    let errors = validation::validate_teacher_insert(&dto);
    if !errors.is_empty() {
        return Err(ServiceError::InvalidArgument(errors));
    }

    let txn = db.begin().await?;
    ensure_unique(&txn, &dto).await?;

    let saved = match &amka_file {
        Some(f) if !f.bytes.is_empty() => Some(
            storage::save_upload(upload_dir, &f.bytes, f.filename.as_deref(), f.content_type.as_deref())
                .await
                .map_err(ServiceError::Storage)?,
        ),
        _ => None,
    };

    let uuid = match insert_aggregate(&txn, &dto, saved.as_ref()).await {
        Ok(uuid) => match txn.commit().await {
            Ok(()) => uuid,
            Err(e) => return Err(cleanup_and(saved, ServiceError::Db(e)).await),
        },
        // dropping the transaction rolls it back
        Err(e) => return Err(cleanup_and(saved, e).await),
    };

    get_teacher_by_uuid(db, &uuid).await
}

async fn cleanup_and(saved: Option<SavedUpload>, err: ServiceError) -> ServiceError {
    if let Some(s) = saved {
        storage::remove_upload(&s.file_path).await;
    }
    err
}

/// Pre-check the four unique business keys in a fixed order. The DB unique
/// constraints remain the authoritative guard against check-then-insert races.
async fn ensure_unique<C: ConnectionTrait>(
    conn: &C,
    dto: &TeacherInsertDto,
) -> Result<(), ServiceError> {
    if user::Entity::find()
        .filter(user::Column::Vat.eq(&dto.user.vat))
        .one(conn)
        .await?
        .is_some()
    {
        return Err(ServiceError::AlreadyExists {
            field: "vat",
            value: dto.user.vat.clone(),
        });
    }

    if user::Entity::find()
        .filter(user::Column::Username.eq(&dto.user.username))
        .one(conn)
        .await?
        .is_some()
    {
        return Err(ServiceError::AlreadyExists {
            field: "username",
            value: dto.user.username.clone(),
        });
    }

    if personal_info::Entity::find()
        .filter(personal_info::Column::Amka.eq(&dto.personal_info.amka))
        .one(conn)
        .await?
        .is_some()
    {
        return Err(ServiceError::AlreadyExists {
            field: "amka",
            value: dto.personal_info.amka.clone(),
        });
    }

    if personal_info::Entity::find()
        .filter(personal_info::Column::IdentityNumber.eq(&dto.personal_info.identity_number))
        .one(conn)
        .await?
        .is_some()
    {
        return Err(ServiceError::AlreadyExists {
            field: "identityNumber",
            value: dto.personal_info.identity_number.clone(),
        });
    }

    Ok(())
}

/// Insert user, attachment, personal info and teacher in dependency order.
/// Returns the generated external identifier.
async fn insert_aggregate<C: ConnectionTrait>(
    conn: &C,
    dto: &TeacherInsertDto,
    saved: Option<&SavedUpload>,
) -> Result<String, ServiceError> {
    let now = Utc::now().naive_utc();

    let user = user::ActiveModel {
        username: Set(dto.user.username.clone()),
        password_hash: Set(hash_password(&dto.user.password)?),
        vat: Set(dto.user.vat.clone()),
        firstname: Set(dto.user.firstname.clone()),
        lastname: Set(dto.user.lastname.clone()),
        father_name: Set(dto.user.father_name.clone()),
        mother_name: Set(dto.user.mother_name.clone()),
        father_lastname: Set(dto.user.father_lastname.clone()),
        mother_lastname: Set(dto.user.mother_lastname.clone()),
        date_of_birth: Set(dto.user.date_of_birth),
        gender: Set(dto.user.gender),
        role: Set(dto.user.role),
        is_active: Set(dto.user.is_active),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(|e| map_unique_violation(e, dto))?;

    let amka_file_id = match saved {
        Some(s) => Some(
            attachment::ActiveModel {
                filename: Set(s.filename.clone()),
                saved_name: Set(s.saved_name.clone()),
                file_path: Set(s.file_path.clone()),
                content_type: Set(s.content_type.clone()),
                extension: Set(s.extension.clone()),
                created_at: Set(now),
                ..Default::default()
            }
            .insert(conn)
            .await?
            .id,
        ),
        None => None,
    };

    let info = personal_info::ActiveModel {
        amka: Set(dto.personal_info.amka.clone()),
        identity_number: Set(dto.personal_info.identity_number.clone()),
        place_of_birth: Set(dto.personal_info.place_of_birth.clone()),
        municipality_of_registration: Set(dto.personal_info.municipality_of_registration.clone()),
        amka_file_id: Set(amka_file_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(conn)
    .await
    .map_err(|e| map_unique_violation(e, dto))?;

    let uuid = Uuid::new_v4().to_string();
    teacher::ActiveModel {
        uuid: Set(uuid.clone()),
        is_active: Set(dto.is_active),
        user_id: Set(user.id),
        personal_info_id: Set(info.id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    Ok(uuid)
}

/// Map a unique-constraint violation raced past the pre-check back to the
/// conflict taxonomy; other DB errors pass through.
fn map_unique_violation(e: DbErr, dto: &TeacherInsertDto) -> ServiceError {
    let msg = e.to_string();
    if !(msg.contains("UNIQUE") || msg.contains("unique") || msg.contains("duplicate key")) {
        return ServiceError::Db(e);
    }

    let candidates: [(&str, &'static str, &str); 4] = [
        ("vat", "vat", &dto.user.vat),
        ("username", "username", &dto.user.username),
        ("identity_number", "identityNumber", &dto.personal_info.identity_number),
        ("amka", "amka", &dto.personal_info.amka),
    ];
    for (needle, field, value) in candidates {
        if msg.contains(needle) {
            return ServiceError::AlreadyExists {
                field,
                value: value.to_string(),
            };
        }
    }
    ServiceError::AlreadyExists {
        field: "record",
        value: String::new(),
    }
}

fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| ServiceError::Hash(e.to_string()))
}

// ---------- read paths ----------

pub async fn get_teacher_by_uuid(
    db: &DatabaseConnection,
    uuid: &str,
) -> Result<TeacherReadOnlyDto, ServiceError> {
    let teacher = teacher::Entity::find()
        .filter(teacher::Column::Uuid.eq(uuid))
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound("teacher"))?;
    to_read_only(db, teacher).await
}

/// Unfiltered page, default sort internal id ascending.
pub async fn get_paginated_teachers(
    db: &DatabaseConnection,
    page: u64,
    size: u64,
) -> Result<Paginated<TeacherReadOnlyDto>, ServiceError> {
    let size = size.clamp(1, 100);
    let paginator = teacher::Entity::find()
        .order_by_asc(teacher::Column::Id)
        .paginate(db, size);
    let total = paginator.num_items().await?;
    let models = paginator.fetch_page(page).await?;
    Ok(Paginated::new(to_read_only_all(db, models).await?, page, size, total))
}

pub async fn get_teachers_filtered(
    db: &DatabaseConnection,
    filters: &TeacherFilters,
) -> Result<Vec<TeacherReadOnlyDto>, ServiceError> {
    let models = filters::filtered_select(filters)
        .order_by_asc(teacher::Column::Id)
        .all(db)
        .await?;
    to_read_only_all(db, models).await
}

pub async fn get_teachers_filtered_paginated(
    db: &DatabaseConnection,
    filters: &TeacherFilters,
) -> Result<Paginated<TeacherReadOnlyDto>, ServiceError> {
    let size = filters.size.clamp(1, 100);
    let select = apply_sort(
        filters::filtered_select(filters),
        filters.sort_by.as_deref(),
        filters.sort_direction.as_deref(),
    );
    let paginator = select.paginate(db, size);
    let total = paginator.num_items().await?;
    let models = paginator.fetch_page(filters.page).await?;
    Ok(Paginated::new(
        to_read_only_all(db, models).await?,
        filters.page,
        size,
        total,
    ))
}

fn apply_sort(
    select: Select<teacher::Entity>,
    sort_by: Option<&str>,
    direction: Option<&str>,
) -> Select<teacher::Entity> {
    let column = match sort_by {
        Some("uuid") => teacher::Column::Uuid,
        Some("createdAt") => teacher::Column::CreatedAt,
        _ => teacher::Column::Id,
    };
    match direction {
        Some(d) if d.eq_ignore_ascii_case("desc") => select.order_by_desc(column),
        _ => select.order_by_asc(column),
    }
}

async fn to_read_only_all(
    db: &DatabaseConnection,
    models: Vec<teacher::Model>,
) -> Result<Vec<TeacherReadOnlyDto>, ServiceError> {
    let mut out = Vec::with_capacity(models.len());
    for model in models {
        out.push(to_read_only(db, model).await?);
    }
    Ok(out)
}

async fn to_read_only<C: ConnectionTrait>(
    db: &C,
    t: teacher::Model,
) -> Result<TeacherReadOnlyDto, ServiceError> {
    let user = user::Entity::find_by_id(t.user_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound("user"))?;
    let info = personal_info::Entity::find_by_id(t.personal_info_id)
        .one(db)
        .await?
        .ok_or(ServiceError::NotFound("personal info"))?;
    let amka_file = match info.amka_file_id {
        Some(id) => attachment::Entity::find_by_id(id).one(db).await?,
        None => None,
    };
    Ok(TeacherReadOnlyDto::from_parts(t, user, info, amka_file))
}
