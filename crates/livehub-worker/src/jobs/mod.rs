//! Scheduled job bodies.

pub mod attendance;

pub use attendance::AttendanceAutoClose;
