pub mod admission_service;
pub mod history_service;
pub mod session_service;
pub mod share_service;
pub mod team_draw_service;
pub mod tenant_service;
