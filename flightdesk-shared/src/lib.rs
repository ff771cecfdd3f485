pub mod format;
pub mod models;
pub mod pii;

pub use models::*;
pub use pii::Masked;
