pub mod memory;
pub mod relations;
pub mod user_repository;
