//! warden-errors - 统一错误处理
//!
//! 基于 RFC 7807 Problem Details 规范

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 应用错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Token invalid: {0}")]
    TokenInvalid(String),

    #[error("Token expired: {0}")]
    TokenExpired(String),

    #[error("Not enrolled: {0}")]
    NotEnrolled(String),

    #[error("Code invalid: {0}")]
    CodeInvalid(String),

    #[error("Integrity error: {0}")]
    Integrity(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn token_invalid(msg: impl Into<String>) -> Self {
        Self::TokenInvalid(msg.into())
    }

    pub fn token_expired(msg: impl Into<String>) -> Self {
        Self::TokenExpired(msg.into())
    }

    pub fn not_enrolled(msg: impl Into<String>) -> Self {
        Self::NotEnrolled(msg.into())
    }

    pub fn code_invalid(msg: impl Into<String>) -> Self {
        Self::CodeInvalid(msg.into())
    }

    pub fn integrity(msg: impl Into<String>) -> Self {
        Self::Integrity(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// 转换为 HTTP 状态码
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Validation(_) => 400,
            Self::TokenInvalid(_) => 401,
            Self::TokenExpired(_) => 401,
            Self::NotEnrolled(_) => 412,
            Self::CodeInvalid(_) => 401,
            Self::Integrity(_) => 500,
            Self::Conflict(_) => 409,
            Self::Internal(_) => 500,
        }
    }

    /// 转换为 Problem Details
    pub fn to_problem_details(&self) -> ProblemDetails {
        ProblemDetails {
            r#type: self.problem_type(),
            title: self.problem_title(),
            status: self.status_code(),
            detail: self.to_string(),
            instance: None,
        }
    }

    fn problem_type(&self) -> String {
        let slug = match self {
            Self::NotFound(_) => "not-found",
            Self::Validation(_) => "validation",
            Self::TokenInvalid(_) => "token-invalid",
            Self::TokenExpired(_) => "token-expired",
            Self::NotEnrolled(_) => "not-enrolled",
            Self::CodeInvalid(_) => "code-invalid",
            Self::Integrity(_) => "integrity",
            Self::Conflict(_) => "conflict",
            Self::Internal(_) => "internal",
        };
        format!("https://api.warden.dev/problems/{}", slug)
    }

    fn problem_title(&self) -> String {
        match self {
            Self::NotFound(_) => "Resource Not Found".to_string(),
            Self::Validation(_) => "Validation Error".to_string(),
            Self::TokenInvalid(_) => "Token Invalid".to_string(),
            Self::TokenExpired(_) => "Token Expired".to_string(),
            Self::NotEnrolled(_) => "Two-Factor Not Enrolled".to_string(),
            Self::CodeInvalid(_) => "Code Invalid".to_string(),
            Self::Integrity(_) => "Data Integrity Error".to_string(),
            Self::Conflict(_) => "Conflict".to_string(),
            Self::Internal(_) => "Internal Server Error".to_string(),
        }
    }
}

/// RFC 7807 Problem Details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemDetails {
    pub r#type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

/// Result 类型别名
pub type AppResult<T> = Result<T, AppError>;
