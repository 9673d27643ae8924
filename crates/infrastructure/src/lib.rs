//! Infrastructure adapters for application ports.

#![forbid(unsafe_code)]

mod argon2_password_hasher;
mod in_memory_approval_repository;
mod in_memory_audit_repository;
mod in_memory_user_directory;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use in_memory_approval_repository::InMemoryApprovalRepository;
pub use in_memory_audit_repository::InMemoryAuditRepository;
pub use in_memory_user_directory::InMemoryUserDirectory;
