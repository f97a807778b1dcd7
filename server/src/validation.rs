//! Explicit input validation, run before any business logic. Failures are
//! collected per field rather than aborting on the first one.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::api::dto::TeacherInsertDto;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());
static VAT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{9}$").unwrap());
static AMKA_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{11}$").unwrap());

const PASSWORD_SYMBOLS: &str = "@#$!%^&*";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// At least 8 chars with an upper, a lower, a digit and a symbol.
pub fn password_policy_ok(password: &str) -> bool {
    password.len() >= 8
        && password.chars().any(|c| c.is_ascii_uppercase())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| PASSWORD_SYMBOLS.contains(c))
}

pub fn validate_teacher_insert(dto: &TeacherInsertDto) -> Vec<FieldError> {
    let mut errors = Vec::new();

    let user = &dto.user;
    if !EMAIL_RE.is_match(&user.username) {
        errors.push(FieldError::new("user.username", "Invalid username"));
    }
    if !password_policy_ok(&user.password) {
        errors.push(FieldError::new("user.password", "Invalid password"));
    }
    if !VAT_RE.is_match(&user.vat) {
        errors.push(FieldError::new("user.vat", "VAT must be a 9-digit number"));
    }
    require(&mut errors, "user.firstname", &user.firstname, "Firstname must not be empty");
    require(&mut errors, "user.lastname", &user.lastname, "Lastname must not be empty");
    require(&mut errors, "user.fatherName", &user.father_name, "Father name must not be empty");
    require(&mut errors, "user.motherName", &user.mother_name, "Mother name must not be empty");
    require(
        &mut errors,
        "user.fatherLastname",
        &user.father_lastname,
        "Father lastname must not be empty",
    );
    require(
        &mut errors,
        "user.motherLastname",
        &user.mother_lastname,
        "Mother lastname must not be empty",
    );

    let info = &dto.personal_info;
    if !AMKA_RE.is_match(&info.amka) {
        errors.push(FieldError::new("personalInfo.amka", "AMKA must be an 11-digit number"));
    }
    require(
        &mut errors,
        "personalInfo.identityNumber",
        &info.identity_number,
        "Identity number must not be empty",
    );
    require(
        &mut errors,
        "personalInfo.placeOfBirth",
        &info.place_of_birth,
        "Place of birth must not be empty",
    );
    require(
        &mut errors,
        "personalInfo.municipalityOfRegistration",
        &info.municipality_of_registration,
        "Municipality of registration must not be empty",
    );

    errors
}

fn require(errors: &mut Vec<FieldError>, field: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dto::{PersonalInfoInsertDto, UserInsertDto};
    use crate::entity::user::{Gender, Role};

    fn valid_dto() -> TeacherInsertDto {
        TeacherInsertDto {
            is_active: true,
            user: UserInsertDto {
                is_active: true,
                firstname: "Maria".into(),
                lastname: "Papadopoulou".into(),
                username: "maria@example.com".into(),
                password: "Str0ng!pass".into(),
                vat: "123456789".into(),
                father_name: "Nikos".into(),
                mother_name: "Eleni".into(),
                father_lastname: "Papadopoulos".into(),
                mother_lastname: "Georgiou".into(),
                date_of_birth: "1985-04-12".parse().unwrap(),
                gender: Gender::Female,
                role: Role::Teacher,
            },
            personal_info: PersonalInfoInsertDto {
                amka: "12345678901".into(),
                identity_number: "AK123456".into(),
                place_of_birth: "Athens".into(),
                municipality_of_registration: "Kallithea".into(),
            },
        }
    }

    #[test]
    fn valid_input_passes() {
        assert!(validate_teacher_insert(&valid_dto()).is_empty());
    }

    #[test]
    fn password_policy_requires_all_classes() {
        assert!(password_policy_ok("Str0ng!pass"));
        assert!(!password_policy_ok("Sh0rt!a"));
        assert!(!password_policy_ok("alllower1!"));
        assert!(!password_policy_ok("ALLUPPER1!"));
        assert!(!password_policy_ok("NoDigits!!"));
        assert!(!password_policy_ok("NoSymbol123"));
    }

    #[test]
    fn vat_must_be_nine_digits() {
        let mut dto = valid_dto();
        dto.user.vat = "12345".into();
        let errors = validate_teacher_insert(&dto);
        assert!(errors.iter().any(|e| e.field == "user.vat"));
    }

    #[test]
    fn amka_must_be_eleven_digits() {
        let mut dto = valid_dto();
        dto.personal_info.amka = "123456789012345".into();
        let errors = validate_teacher_insert(&dto);
        assert!(errors.iter().any(|e| e.field == "personalInfo.amka"));
    }

    #[test]
    fn username_must_be_email_shaped() {
        let mut dto = valid_dto();
        dto.user.username = "not-an-email".into();
        let errors = validate_teacher_insert(&dto);
        assert!(errors.iter().any(|e| e.field == "user.username"));
    }

    #[test]
    fn failures_are_collected_not_short_circuited() {
        let mut dto = valid_dto();
        dto.user.vat = "x".into();
        dto.user.firstname = "   ".into();
        dto.personal_info.identity_number = "".into();
        let errors = validate_teacher_insert(&dto);
        assert_eq!(errors.len(), 3);
    }
}
