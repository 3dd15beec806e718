pub mod history_repo;
pub mod participant_repo;
pub mod schema;
pub mod session_repo;
pub mod tenant_repo;
