pub mod app_error;
pub mod links;
pub mod tokens;
pub mod use_cases;
