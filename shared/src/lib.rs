//! Types shared between the Eazypg backend and its clients: domain enums,
//! request/response DTOs and platform constants.

pub mod constants;
pub mod dto;
pub mod types;

pub use constants::*;
pub use dto::*;
pub use types::*;
