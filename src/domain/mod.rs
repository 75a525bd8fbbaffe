// Domain layer - Core models and pure logic
pub mod dashboard;
pub mod diff;
pub mod slug;
pub mod sync_status;
