//! # Yatube Shared
//!
//! Wire types shared by the server and its clients: submitted forms, JSON page
//! documents and the error body.

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse, FieldErrorBody};
