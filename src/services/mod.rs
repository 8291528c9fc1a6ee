pub mod schedule_service;

pub use schedule_service::{CourseOverview, OverviewQuery, ScheduleService};
