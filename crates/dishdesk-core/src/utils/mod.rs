pub mod error_helpers;
pub mod text;
