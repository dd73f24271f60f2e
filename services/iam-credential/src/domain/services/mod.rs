mod backup_code_service;
mod credential_manager;
mod password_service;
mod token_service;
mod totp_service;

pub use backup_code_service::*;
pub use credential_manager::*;
pub use password_service::*;
pub use token_service::*;
pub use totp_service::*;
