// Application layer - Use cases and repository seams
pub mod dashboard_repository;
pub mod sanitizer;
pub mod sync_service;
