//! Teacher registry — CRUD backend for teacher records (user credentials,
//! personal info, AMKA proof attachment) with filtered, paginated search.

pub mod api;
pub mod entity;
pub mod filters;
pub mod pagination;
pub mod service;
pub mod storage;
pub mod validation;
