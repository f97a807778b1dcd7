pub mod attachment;
pub mod personal_info;
pub mod teacher;
pub mod user;
