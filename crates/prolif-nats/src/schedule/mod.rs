//! Repeatable cron registrations for scheduled and polling triggers.

mod scheduler;

pub use scheduler::{ScheduleRegistration, TriggerScheduler};
