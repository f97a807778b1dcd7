use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::Json,
};

use crate::pagination::Paginated;
use crate::service::{self, UploadedFile};
use crate::filters::TeacherFilters;

use super::{
    AppState, ApiErr,
    dto::{ListTeachersQuery, TeacherInsertDto, TeacherReadOnlyDto},
};

// ---------- GET /teachers ----------

pub async fn list_teachers(
    State(state): State<AppState>,
    Query(params): Query<ListTeachersQuery>,
) -> Result<Json<Paginated<TeacherReadOnlyDto>>, ApiErr> {
    let page = params.page.unwrap_or(0);
    let size = params.size.unwrap_or(10);
    Ok(Json(service::get_paginated_teachers(&state.db, page, size).await?))
}

// ---------- GET /teachers/{uuid} ----------

pub async fn get_teacher(
    State(state): State<AppState>,
    Path(uuid): Path<String>,
) -> Result<Json<TeacherReadOnlyDto>, ApiErr> {
    Ok(Json(service::get_teacher_by_uuid(&state.db, &uuid).await?))
}

// ---------- POST /teachers/save ----------

/// Multipart creation: a `teacher` part carrying the JSON body plus an
/// optional `amkaFile` binary part.
pub async fn save_teacher(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<TeacherReadOnlyDto>), ApiErr> {
    let mut dto: Option<TeacherInsertDto> = None;
    let mut amka_file: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiErr::unprocessable(format!("malformed multipart body: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("teacher") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiErr::unprocessable(format!("unreadable teacher part: {e}")))?;
                dto = Some(
                    serde_json::from_slice(&bytes)
                        .map_err(|e| ApiErr::unprocessable(format!("invalid teacher payload: {e}")))?,
                );
            }
            Some("amkaFile") => {
                let filename = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiErr::unprocessable(format!("unreadable amkaFile part: {e}")))?;
                amka_file = Some(UploadedFile {
                    bytes: bytes.to_vec(),
                    filename,
                    content_type,
                });
            }
            _ => {}
        }
    }

    let dto = dto.ok_or_else(|| ApiErr::unprocessable("missing 'teacher' part"))?;
    let created = service::save_teacher(&state.db, &state.upload_dir, dto, amka_file).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

// ---------- POST /teachers/all ----------

/// Absent or `null` body means "no filters".
pub async fn filter_teachers(
    State(state): State<AppState>,
    body: Option<Json<Option<TeacherFilters>>>,
) -> Result<Json<Vec<TeacherReadOnlyDto>>, ApiErr> {
    let filters = body.and_then(|Json(f)| f).unwrap_or_default();
    Ok(Json(service::get_teachers_filtered(&state.db, &filters).await?))
}

// ---------- POST /teachers/all/paginated ----------

pub async fn filter_teachers_paginated(
    State(state): State<AppState>,
    body: Option<Json<Option<TeacherFilters>>>,
) -> Result<Json<Paginated<TeacherReadOnlyDto>>, ApiErr> {
    let filters = body.and_then(|Json(f)| f).unwrap_or_default();
    Ok(Json(
        service::get_teachers_filtered_paginated(&state.db, &filters).await?,
    ))
}
