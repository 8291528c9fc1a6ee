//! Course schedule parsing and progress statistics. Everything in here is
//! pure; persistence lives in `db::schedules`.

pub mod parser;
pub mod stats;

pub use parser::{
    Delimiter, Module, ModuleStatus, ParseIssue, ParseWarning, ParsedSchedule, parse_schedule,
    parse_schedule_with,
};
pub use stats::{ModuleView, ScheduleStats, compute_stats, filter_modules, is_module_complete};
