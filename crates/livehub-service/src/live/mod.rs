//! In-session control plane: live actions, chat and attendance.

pub mod actions;
pub mod attendance;
pub mod chat;
pub mod validator;

pub use actions::ActionService;
pub use attendance::AttendanceService;
pub use chat::{ChatService, SavedChat};
pub use validator::{ActionValidation, ActionValidationError, validate};
