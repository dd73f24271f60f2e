//! TOTP secret 值对象

use serde::{Deserialize, Serialize};
use std::fmt;

/// Base32 编码的 TOTP secret
///
/// Debug/Display 均不输出内容
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotpSecret(String);

impl TotpSecret {
    pub fn from_encoded(encoded: String) -> Self {
        Self(encoded)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for TotpSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TotpSecret([REDACTED])")
    }
}

impl fmt::Display for TotpSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}
