use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Number of logical columns in a schedule row:
/// date, topics, readings, homework, comment.
const COLUMNS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleStatus {
    Completed,
    Current,
    Upcoming,
}

impl ModuleStatus {
    /// Dates that could not be parsed are treated as upcoming.
    pub fn for_date(date: Option<NaiveDate>, today: NaiveDate) -> Self {
        match date {
            Some(d) if d < today => ModuleStatus::Completed,
            Some(d) if d == today => ModuleStatus::Current,
            _ => ModuleStatus::Upcoming,
        }
    }
}

/// One row of a course schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Module {
    pub id: String,
    pub date: Option<NaiveDate>,
    pub topics: String,
    pub readings: Vec<String>,
    pub homework: String,
    pub comment: String,
    pub status: ModuleStatus,
}

impl Module {
    pub fn has_homework(&self) -> bool {
        !self.homework.is_empty()
    }

    /// Modules without readings or homework have nothing to check off and are
    /// left out of completion statistics.
    pub fn is_trackable(&self) -> bool {
        !self.readings.is_empty() || self.has_homework()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    Tab,
    Comma,
}

impl Delimiter {
    /// Picks the delimiter from the header row. Tabs win over commas because a
    /// tab-separated header may still contain commas in its labels.
    pub fn sniff(header: &str) -> Self {
        if header.contains('\t') {
            Delimiter::Tab
        } else if header.contains(',') {
            Delimiter::Comma
        } else {
            Delimiter::Tab
        }
    }

    pub fn from_file_name(name: &str) -> Option<Self> {
        let (_, ext) = name.rsplit_once('.')?;
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Delimiter::Comma),
            "tsv" | "txt" => Some(Delimiter::Tab),
            _ => None,
        }
    }

    fn split(self, line: &str) -> Vec<String> {
        match self {
            Delimiter::Tab => line.split('\t').map(str::to_string).collect(),
            Delimiter::Comma => split_quoted(line),
        }
    }
}

/// Comma splitting with double-quoted fields, `""` being an escaped quote.
fn split_quoted(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => fields.push(std::mem::take(&mut field)),
            _ => field.push(c),
        }
    }
    fields.push(field);
    fields
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseIssue {
    MissingDate,
    MissingTopics,
    UnparseableDate { raw: String },
    ExtraColumns { count: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseWarning {
    pub line: usize,
    #[serde(flatten)]
    pub issue: ParseIssue,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParsedSchedule {
    pub modules: Vec<Module>,
    pub warnings: Vec<ParseWarning>,
}

/// Parses schedule text, sniffing the delimiter from the header row.
pub fn parse_schedule(raw: &str, today: NaiveDate) -> ParsedSchedule {
    let header = raw.trim().lines().next().unwrap_or_default();
    parse_schedule_with(raw, Delimiter::sniff(header), today)
}

/// Parses schedule text into modules.
///
/// The first line is always the header and is discarded. A row becomes a
/// module only when both its date and topics columns are non-empty; the
/// module id is `module-<n>` where `n` is the row's line index (header = 0).
/// Rows that are dropped, dates that do not parse, and surplus columns are
/// reported in `warnings` instead of failing the parse.
pub fn parse_schedule_with(raw: &str, delimiter: Delimiter, today: NaiveDate) -> ParsedSchedule {
    let mut parsed = ParsedSchedule::default();
    let year = today.year();

    for (index, line) in raw.trim().split('\n').enumerate().skip(1) {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        let mut fields = delimiter.split(line);
        if fields.len() > COLUMNS {
            let extra = fields.split_off(COLUMNS);
            let count = extra.iter().filter(|f| !f.trim().is_empty()).count();
            if count > 0 {
                parsed.warnings.push(ParseWarning {
                    line: index,
                    issue: ParseIssue::ExtraColumns { count },
                });
            }
        }
        fields.resize(COLUMNS, String::new());

        let date_raw = fields[0].trim();
        let topics = fields[1].trim();
        if date_raw.is_empty() || topics.is_empty() {
            let issue = if date_raw.is_empty() {
                ParseIssue::MissingDate
            } else {
                ParseIssue::MissingTopics
            };
            parsed.warnings.push(ParseWarning { line: index, issue });
            continue;
        }

        let date = parse_date(date_raw, year);
        if date.is_none() {
            parsed.warnings.push(ParseWarning {
                line: index,
                issue: ParseIssue::UnparseableDate {
                    raw: date_raw.to_string(),
                },
            });
        }

        parsed.modules.push(Module {
            id: format!("module-{}", index),
            date,
            topics: topics.to_string(),
            readings: split_readings(&fields[2]),
            homework: fields[3].trim().to_string(),
            comment: fields[4].trim().to_string(),
            status: ModuleStatus::for_date(date, today),
        });
    }

    parsed
}

pub fn split_readings(readings: &str) -> Vec<String> {
    readings
        .split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses the free-text date column, e.g. `M 8/25`, `W 8-20`, `27-Aug`,
/// `Sep 3` or `1/10/2026`. Dates without a year get `year`.
pub fn parse_date(raw: &str, year: i32) -> Option<NaiveDate> {
    let cleaned = strip_weekday_prefix(raw.trim());

    for fmt in ["%m/%d/%Y", "%Y-%m-%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(cleaned, fmt) {
            return Some(date);
        }
    }

    let with_year = format!("{}/{}", cleaned, year);
    ["%m/%d/%Y", "%m-%d/%Y", "%d-%b/%Y", "%b %d/%Y", "%d %b/%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(&with_year, fmt).ok())
}

/// Strips a single-letter `M`/`W` weekday marker. `Mar 3` and `May 5` are left
/// alone because the marker must be followed by whitespace or a digit.
fn strip_weekday_prefix(raw: &str) -> &str {
    let mut chars = raw.chars();
    match chars.next() {
        Some('M' | 'W') => {
            let rest = chars.as_str();
            if rest.starts_with(|c: char| c.is_whitespace() || c.is_ascii_digit()) {
                rest.trim_start()
            } else {
                raw
            }
        }
        _ => raw,
    }
}
