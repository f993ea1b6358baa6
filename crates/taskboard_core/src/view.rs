//! Derived, read-only views over a snapshot of the collection.

use crate::model::{PriorityLevel, Task, TaskStatus};
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub urgent: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistProgress {
    pub completed_count: usize,
    pub total_count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FilterKind {
    #[default]
    All,
    Urgent,
    Today,
    Pending,
}

impl FilterKind {
    pub const ALL: [FilterKind; 4] = [Self::All, Self::Urgent, Self::Today, Self::Pending];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Urgent => "urgent",
            Self::Today => "today",
            Self::Pending => "pending",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Self::All),
            "urgent" => Some(Self::Urgent),
            "today" => Some(Self::Today),
            "pending" => Some(Self::Pending),
            _ => None,
        }
    }
}

pub fn compute_stats(tasks: &[Task]) -> TaskStats {
    TaskStats {
        total: tasks.len(),
        completed: tasks
            .iter()
            .filter(|task| task.status == TaskStatus::Completed)
            .count(),
        pending: tasks
            .iter()
            .filter(|task| task.status == TaskStatus::Pending)
            .count(),
        urgent: tasks
            .iter()
            .filter(|task| task.priority_level() == PriorityLevel::Urgent)
            .count(),
    }
}

pub fn filter_tasks(tasks: &[Task], filter: FilterKind, query: &str) -> Vec<Task> {
    filter_tasks_on(tasks, filter, query, now_local().date())
}

/// Filter and search compose with AND; an empty query matches everything.
pub fn filter_tasks_on(tasks: &[Task], filter: FilterKind, query: &str, today: Date) -> Vec<Task> {
    let needle = query.to_lowercase();
    tasks
        .iter()
        .filter(|task| matches_filter(task, filter, today))
        .filter(|task| matches_search(task, &needle))
        .cloned()
        .collect()
}

fn matches_filter(task: &Task, filter: FilterKind, today: Date) -> bool {
    match filter {
        FilterKind::All => true,
        FilterKind::Urgent => task.priority_level() == PriorityLevel::Urgent,
        FilterKind::Today => deadline_local(task).is_some_and(|deadline| deadline.date() == today),
        FilterKind::Pending => task.status == TaskStatus::Pending,
    }
}

fn matches_search(task: &Task, needle: &str) -> bool {
    needle.is_empty()
        || task.title.to_lowercase().contains(needle)
        || task.description.to_lowercase().contains(needle)
}

pub fn checklist_progress(task: &Task) -> ChecklistProgress {
    let items = task.checklist();
    let completed_count = items.iter().filter(|item| item.completed).count();
    let total_count = items.len();
    let percent = if total_count > 0 {
        completed_count as f64 / total_count as f64 * 100.0
    } else {
        0.0
    };

    ChecklistProgress {
        completed_count,
        total_count,
        percent,
    }
}

pub fn is_overdue(task: &Task) -> bool {
    is_overdue_at(task, now_local())
}

/// Past deadline and not completed. No deadline, or one that does not
/// parse, is never overdue.
pub fn is_overdue_at(task: &Task, now: OffsetDateTime) -> bool {
    task.status != TaskStatus::Completed
        && deadline_local(task).is_some_and(|deadline| deadline < now)
}

fn local_offset() -> UtcOffset {
    UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC)
}

fn now_local() -> OffsetDateTime {
    OffsetDateTime::now_utc().to_offset(local_offset())
}

fn deadline_local(task: &Task) -> Option<OffsetDateTime> {
    task.deadline
        .as_deref()
        .and_then(|raw| parse_deadline(raw, local_offset()))
}

/// Accepts RFC 3339 date-times and bare `YYYY-MM-DD` dates. A bare date is
/// read as midnight UTC, the way browsers read ISO dates.
pub fn parse_deadline(raw: &str, local_offset: UtcOffset) -> Option<OffsetDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(parsed) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return Some(parsed.to_offset(local_offset));
    }

    let date_only = format_description!("[year]-[month]-[day]");
    Date::parse(trimmed, &date_only).ok().map(|date| {
        PrimitiveDateTime::new(date, time::Time::MIDNIGHT)
            .assume_utc()
            .to_offset(local_offset)
    })
}

#[cfg(test)]
mod tests {
    use super::{
        FilterKind, TaskStats, checklist_progress, compute_stats, filter_tasks, filter_tasks_on,
        is_overdue_at, parse_deadline,
    };
    use crate::model::{ChecklistItem, Priority, Task, TaskStatus};
    use time::macros::{date, datetime};
    use time::{Duration, OffsetDateTime, UtcOffset};

    fn task(id: &str, title: &str, description: &str, score: i64, status: TaskStatus) -> Task {
        Task {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            category_id: 1,
            category_name: "Uncategorized".to_string(),
            priority: Priority::from_score(score),
            deadline: None,
            status,
            tags: Vec::new(),
            checklist_items: None,
            created_at: "2025-12-01T00:00:00Z".to_string(),
            updated_at: "2025-12-01T00:00:00Z".to_string(),
        }
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|task| task.id.as_str()).collect()
    }

    fn sample() -> Vec<Task> {
        vec![
            task("1", "Budget review", "", 9, TaskStatus::Pending),
            task("2", "Groceries", "stay under BUDGET", 3, TaskStatus::Completed),
            task("3", "Call mom", "", 6, TaskStatus::InProgress),
            task("4", "File taxes", "", 8, TaskStatus::Completed),
        ]
    }

    #[test]
    fn compute_stats_counts_by_status_and_priority() {
        assert_eq!(
            compute_stats(&sample()),
            TaskStats {
                total: 4,
                completed: 2,
                pending: 1,
                urgent: 2,
            }
        );
        assert_eq!(compute_stats(&[]), TaskStats::default());
    }

    #[test]
    fn urgent_filter_selects_urgent_subset() {
        let filtered = filter_tasks(&sample(), FilterKind::Urgent, "");
        assert_eq!(ids(&filtered), vec!["1", "4"]);
    }

    #[test]
    fn search_matches_title_or_description_case_insensitively() {
        let filtered = filter_tasks(&sample(), FilterKind::All, "budget");
        assert_eq!(ids(&filtered), vec!["1", "2"]);

        let everything = filter_tasks(&sample(), FilterKind::All, "");
        assert_eq!(everything.len(), 4);
    }

    #[test]
    fn filter_and_search_compose_with_and() {
        let filtered = filter_tasks(&sample(), FilterKind::Pending, "budget");
        assert_eq!(ids(&filtered), vec!["1"]);

        let none = filter_tasks(&sample(), FilterKind::Urgent, "groceries");
        assert!(none.is_empty());
    }

    #[test]
    fn today_filter_compares_calendar_dates() {
        let mut due_today = task("1", "today", "", 3, TaskStatus::Pending);
        due_today.deadline = Some("2025-12-20T15:30:00Z".to_string());
        let mut due_tomorrow = task("2", "tomorrow", "", 3, TaskStatus::Pending);
        due_tomorrow.deadline = Some("2025-12-22T09:00:00Z".to_string());
        let mut garbage = task("3", "garbage", "", 3, TaskStatus::Pending);
        garbage.deadline = Some("someday".to_string());
        let no_deadline = task("4", "none", "", 3, TaskStatus::Pending);

        let tasks = vec![due_today, due_tomorrow, garbage, no_deadline];
        let today = OffsetDateTime::parse(
            "2025-12-20T15:30:00Z",
            &time::format_description::well_known::Rfc3339,
        )
        .unwrap()
        .to_offset(UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC))
        .date();

        let filtered = filter_tasks_on(&tasks, FilterKind::Today, "", today);
        assert_eq!(ids(&filtered), vec!["1"]);
    }

    #[test]
    fn checklist_progress_handles_empty_and_partial() {
        let empty = task("1", "no items", "", 3, TaskStatus::Pending);
        let progress = checklist_progress(&empty);
        assert_eq!(progress.completed_count, 0);
        assert_eq!(progress.total_count, 0);
        assert_eq!(progress.percent, 0.0);

        let mut half = task("2", "half", "", 3, TaskStatus::Pending);
        half.checklist_items = Some(vec![
            ChecklistItem {
                id: "a".to_string(),
                text: "done".to_string(),
                completed: true,
            },
            ChecklistItem::new("b", "todo"),
        ]);
        let progress = checklist_progress(&half);
        assert_eq!(progress.completed_count, 1);
        assert_eq!(progress.total_count, 2);
        assert_eq!(progress.percent, 50.0);

        let mut empty_list = task("3", "empty list", "", 3, TaskStatus::Pending);
        empty_list.checklist_items = Some(Vec::new());
        assert_eq!(checklist_progress(&empty_list).percent, 0.0);
    }

    #[test]
    fn overdue_requires_past_deadline_and_open_status() {
        let now = datetime!(2025-12-20 12:00 UTC);

        let mut late = task("1", "late", "", 3, TaskStatus::Pending);
        late.deadline = Some("2025-12-19".to_string());
        assert!(is_overdue_at(&late, now));

        let mut done = late.clone();
        done.status = TaskStatus::Completed;
        assert!(!is_overdue_at(&done, now));

        let mut future = task("2", "future", "", 3, TaskStatus::InProgress);
        future.deadline = Some((now + Duration::days(1)).date().to_string());
        assert!(!is_overdue_at(&future, now));

        let undated = task("3", "undated", "", 3, TaskStatus::Pending);
        assert!(!is_overdue_at(&undated, now));
    }

    #[test]
    fn parse_deadline_accepts_dates_and_datetimes() {
        let utc = UtcOffset::UTC;
        assert_eq!(
            parse_deadline("2025-12-24", utc),
            Some(datetime!(2025-12-24 00:00 UTC))
        );
        assert_eq!(
            parse_deadline("2025-12-24T18:00:00+02:00", utc).map(|value| value.date()),
            Some(date!(2025-12-24))
        );
        assert_eq!(parse_deadline("", utc), None);
        assert_eq!(parse_deadline("next week", utc), None);
    }

    #[test]
    fn filter_kind_parses_known_names() {
        for kind in FilterKind::ALL {
            assert_eq!(FilterKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(FilterKind::parse(" Urgent "), Some(FilterKind::Urgent));
        assert_eq!(FilterKind::parse("overdue"), None);
    }
}
