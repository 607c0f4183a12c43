//! Attendance log entities.

pub mod model;

pub use model::{AttendanceRecord, CreateAttendance};
