//! # Yatube Core
//!
//! The domain layer of the Yatube blog.
//! Entities, ports and the services that hold the posting rules. No
//! infrastructure dependencies live here.

pub mod domain;
pub mod error;
pub mod pagination;
pub mod ports;
pub mod services;

pub use error::{DomainError, FieldError, RepoError};
