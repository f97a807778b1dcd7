use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entity::user::{Gender, Role};
use crate::entity::{attachment, personal_info, teacher, user};

// ---------- creation requests ----------

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherInsertDto {
    pub is_active: bool,
    pub user: UserInsertDto,
    pub personal_info: PersonalInfoInsertDto,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInsertDto {
    pub is_active: bool,
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    pub password: String,
    pub vat: String,
    pub father_name: String,
    pub mother_name: String,
    pub father_lastname: String,
    pub mother_lastname: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfoInsertDto {
    pub amka: String,
    pub identity_number: String,
    pub place_of_birth: String,
    pub municipality_of_registration: String,
}

// ---------- list requests ----------

#[derive(Debug, Deserialize)]
pub struct ListTeachersQuery {
    pub page: Option<u64>,
    pub size: Option<u64>,
}

// ---------- responses ----------

/// Flattened read-only view of the teacher aggregate. The external `uuid` is
/// the only identifier exposed; internal keys and the password hash are not.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherReadOnlyDto {
    pub uuid: String,
    pub is_active: bool,
    pub firstname: String,
    pub lastname: String,
    pub username: String,
    pub vat: String,
    pub father_name: String,
    pub mother_name: String,
    pub father_lastname: String,
    pub mother_lastname: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub role: Role,
    pub user_is_active: bool,
    pub amka: String,
    pub identity_number: String,
    pub place_of_birth: String,
    pub municipality_of_registration: String,
    pub amka_file: Option<AttachmentDto>,
}

impl TeacherReadOnlyDto {
    pub fn from_parts(
        t: teacher::Model,
        user: user::Model,
        info: personal_info::Model,
        amka_file: Option<attachment::Model>,
    ) -> Self {
        Self {
            uuid: t.uuid,
            is_active: t.is_active,
            firstname: user.firstname,
            lastname: user.lastname,
            username: user.username,
            vat: user.vat,
            father_name: user.father_name,
            mother_name: user.mother_name,
            father_lastname: user.father_lastname,
            mother_lastname: user.mother_lastname,
            date_of_birth: user.date_of_birth,
            gender: user.gender,
            role: user.role,
            user_is_active: user.is_active,
            amka: info.amka,
            identity_number: info.identity_number,
            place_of_birth: info.place_of_birth,
            municipality_of_registration: info.municipality_of_registration,
            amka_file: amka_file.map(AttachmentDto::from),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentDto {
    pub filename: Option<String>,
    pub saved_name: String,
    pub content_type: Option<String>,
    pub extension: String,
}

impl From<attachment::Model> for AttachmentDto {
    fn from(m: attachment::Model) -> Self {
        Self {
            filename: m.filename,
            saved_name: m.saved_name,
            content_type: m.content_type,
            extension: m.extension,
        }
    }
}
