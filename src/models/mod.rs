pub mod history;
pub mod participant;
pub mod session;
pub mod tenant;

pub use history::AttendanceRow;
pub use participant::{name_key, Category, Gender, Participant, ParticipantRow};
pub use session::{Principal, Role, SessionRow};
pub use tenant::{TenantRow, TenantStatus};
