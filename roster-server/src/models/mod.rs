//! Domain models with validation at construction
//!
//! Caller input is validated when request types are built.
//! Invalid input returns ValidationError, not panic.

pub mod pagination;
pub mod user;
pub mod validation;

pub use pagination::{
    effective_limit, offset_for, total_pages, ListUsersRequest, PageMeta, UserPage,
};
pub use user::{CreateUserRequest, UpdateUserRequest, User, UserView};
pub use validation::ValidationError;
