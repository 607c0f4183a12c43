//! Background tasks for LiveHub.
//!
//! This crate provides:
//! - A room reconciler that consumes session change events and keeps each
//!   session's provider room in line with its format and publication
//! - A cron scheduler for periodic maintenance such as closing attendance
//!   records nobody left

pub mod jobs;
pub mod runner;
pub mod scheduler;

pub use runner::RoomEventRunner;
pub use scheduler::CronScheduler;
