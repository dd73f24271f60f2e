mod password;
mod totp_secret;

pub use password::*;
pub use totp_secret::*;
