use std::collections::HashMap;

use serde::Serialize;

use crate::models::{HomeworkStatus, ModuleProgress};
use crate::schedule::parser::{Module, ModuleStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScheduleStats {
    /// `"<completed>/<trackable>"`
    pub module_progress: String,
    /// `"<readings done>/<readings listed>"`
    pub reading_progress: String,
    /// Percent of trackable modules completed, 0 when nothing is trackable.
    pub overall_completion: u32,
    pub completed_modules: usize,
    pub trackable_modules: usize,
    pub completed_readings: usize,
    pub total_readings: usize,
}

/// Readings of `module` that are checked off. Entries in the progress set that
/// are no longer listed on the module do not count.
pub fn completed_readings(module: &Module, progress: Option<&ModuleProgress>) -> usize {
    match progress {
        Some(p) => module.readings.iter().filter(|r| p.has_read(r)).count(),
        None => 0,
    }
}

/// A module is complete when every listed reading is checked off and its
/// homework, if any, is marked completed. Untrackable modules are never
/// complete.
pub fn is_module_complete(module: &Module, progress: Option<&ModuleProgress>) -> bool {
    if !module.is_trackable() {
        return false;
    }
    let Some(progress) = progress else {
        return false;
    };
    let readings_done = completed_readings(module, Some(progress)) == module.readings.len();
    let homework_done =
        !module.has_homework() || progress.homework_status == HomeworkStatus::Completed;
    readings_done && homework_done
}

pub fn compute_stats(
    modules: &[Module],
    progress_by_module_id: &HashMap<String, ModuleProgress>,
) -> ScheduleStats {
    let mut completed_modules = 0;
    let mut trackable_modules = 0;
    let mut completed = 0;
    let mut total = 0;

    for module in modules {
        let progress = progress_by_module_id.get(&module.id);
        total += module.readings.len();
        completed += completed_readings(module, progress);

        if module.is_trackable() {
            trackable_modules += 1;
            if is_module_complete(module, progress) {
                completed_modules += 1;
            }
        }
    }

    let overall_completion = if trackable_modules == 0 {
        0
    } else {
        (100.0 * completed_modules as f64 / trackable_modules as f64).round() as u32
    };

    ScheduleStats {
        module_progress: format!("{}/{}", completed_modules, trackable_modules),
        reading_progress: format!("{}/{}", completed, total),
        overall_completion,
        completed_modules,
        trackable_modules,
        completed_readings: completed,
        total_readings: total,
    }
}

/// A module merged with the caller's progress on it.
#[derive(Debug, Clone, Serialize)]
pub struct ModuleView {
    #[serde(flatten)]
    pub module: Module,
    pub reading_progress: Vec<String>,
    pub homework_status: HomeworkStatus,
    pub notes: String,
    pub completed_readings: usize,
    pub is_trackable: bool,
    pub is_complete: bool,
}

impl ModuleView {
    pub fn new(module: Module, progress: Option<&ModuleProgress>) -> Self {
        let completed_readings = completed_readings(&module, progress);
        let is_complete = is_module_complete(&module, progress);
        let is_trackable = module.is_trackable();
        let (reading_progress, homework_status, notes) = match progress {
            Some(p) => (p.reading_progress.clone(), p.homework_status, p.notes.clone()),
            None => (Vec::new(), HomeworkStatus::default(), String::new()),
        };

        ModuleView {
            module,
            reading_progress,
            homework_status,
            notes,
            completed_readings,
            is_trackable,
            is_complete,
        }
    }
}

/// Keeps modules matching `status` (all when `None`) whose topics or readings
/// contain `search`, case-insensitively.
pub fn filter_modules<'a>(
    modules: &'a [Module],
    status: Option<ModuleStatus>,
    search: Option<&str>,
) -> Vec<&'a Module> {
    let needle = search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase);

    modules
        .iter()
        .filter(|m| status.is_none_or(|s| m.status == s))
        .filter(|m| match &needle {
            None => true,
            Some(needle) => {
                m.topics.to_lowercase().contains(needle)
                    || m.readings.iter().any(|r| r.to_lowercase().contains(needle))
            }
        })
        .collect()
}
