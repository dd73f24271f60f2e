mod memory_credential_repository;

pub use memory_credential_repository::*;
