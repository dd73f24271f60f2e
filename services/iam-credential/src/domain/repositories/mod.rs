mod credential_repository;

pub use credential_repository::*;
