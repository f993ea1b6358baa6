//! Translation between the remote store's wire schema and the domain schema.
//!
//! All default policies for absent wire fields live here so every decode
//! path agrees on them.

mod wire;

pub use wire::{
    WireCategory, WireChecklistItem, WireChecklistItemPayload, WireId, WireTask, WireTaskPayload,
};

use crate::error::AppError;
use crate::model::{
    Category, ChecklistItem, DEFAULT_CATEGORY_ID, DEFAULT_CATEGORY_NAME, Priority, PriorityLevel,
    Task, TaskDraft, TaskStatus,
};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub const DEFAULT_PRIORITY_SCORE: i64 = 0;

pub fn score_to_level(score: i64) -> PriorityLevel {
    if score >= 8 {
        PriorityLevel::Urgent
    } else if score >= 5 {
        PriorityLevel::Medium
    } else {
        PriorityLevel::Low
    }
}

/// Not the inverse of [`score_to_level`]: `High` scores as `Low`.
pub fn level_to_score(level: PriorityLevel) -> i64 {
    match level {
        PriorityLevel::Urgent => 9,
        PriorityLevel::Medium => 6,
        PriorityLevel::Low | PriorityLevel::High => 3,
    }
}

/// Replaces the first underscore only (`in_progress` -> `in-progress`).
pub fn status_from_wire(raw: &str) -> String {
    raw.replacen('_', "-", 1)
}

/// Replaces the first hyphen only (`in-progress` -> `in_progress`).
pub fn status_to_wire(status: TaskStatus) -> String {
    status.as_str().replacen('-', "_", 1)
}

pub(crate) fn now_rfc3339() -> Result<String, AppError> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|err| AppError::invalid_data(err.to_string()))
}

pub fn decode_task(wire: WireTask) -> Result<Task, AppError> {
    let id = wire
        .id
        .map(WireId::into_string)
        .ok_or_else(|| AppError::malformed_task("task is missing id"))?;
    let title = wire
        .title
        .ok_or_else(|| AppError::malformed_task(format!("task {id} is missing title")))?;

    let status = match wire.status.as_deref() {
        Some(raw) => {
            let converted = status_from_wire(raw);
            TaskStatus::parse(&converted).ok_or_else(|| {
                AppError::malformed_task(format!("task {id} has unknown status '{raw}'"))
            })?
        }
        None => TaskStatus::Pending,
    };

    // Level is derived from the rounded score so the two always agree.
    let score = wire
        .priority_score
        .map(|raw| raw.round() as i64)
        .unwrap_or(DEFAULT_PRIORITY_SCORE);
    let priority = Priority::decoded(score_to_level(score), score);

    let (category_id, category_name) = match wire.category {
        Some(category) => (
            category.id.unwrap_or(DEFAULT_CATEGORY_ID),
            category
                .name
                .unwrap_or_else(|| DEFAULT_CATEGORY_NAME.to_string()),
        ),
        None => (DEFAULT_CATEGORY_ID, DEFAULT_CATEGORY_NAME.to_string()),
    };

    let created_at = match wire.created_at {
        Some(value) => value,
        None => now_rfc3339()?,
    };
    let updated_at = match wire.updated_at {
        Some(value) => value,
        None => now_rfc3339()?,
    };

    Ok(Task {
        id,
        title,
        description: wire.description.unwrap_or_default(),
        category_id,
        category_name,
        priority,
        deadline: wire.deadline,
        status,
        tags: dedupe_tags(wire.tags.unwrap_or_default()),
        checklist_items: wire.checklist_items.map(decode_checklist),
        created_at,
        updated_at,
    })
}

pub fn decode_tasks(wire: Vec<WireTask>) -> Result<Vec<Task>, AppError> {
    wire.into_iter().map(decode_task).collect()
}

fn decode_checklist(items: Vec<WireChecklistItem>) -> Vec<ChecklistItem> {
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| ChecklistItem {
            id: item
                .id
                .map(WireId::into_string)
                .unwrap_or_else(|| index.to_string()),
            text: item.text.unwrap_or_default(),
            completed: item.completed.unwrap_or(false),
        })
        .collect()
}

fn dedupe_tags(tags: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        if !unique.contains(&tag) {
            unique.push(tag);
        }
    }
    unique
}

pub fn encode_task(task: &Task) -> WireTaskPayload {
    WireTaskPayload {
        id: Some(task.id.clone()),
        title: task.title.clone(),
        description: task.description.clone(),
        category_id: task.category_id,
        category_name: Some(task.category_name.clone()),
        priority_score: level_to_score(task.priority_level()),
        deadline: task.deadline.clone(),
        status: status_to_wire(task.status),
        tags: task.tags.clone(),
        checklist_items: task.checklist_items.as_ref().map(|items| {
            items
                .iter()
                .map(|item| WireChecklistItemPayload {
                    id: Some(item.id.clone()),
                    text: item.text.clone(),
                    completed: item.completed,
                })
                .collect()
        }),
        created_at: Some(task.created_at.clone()),
        updated_at: Some(task.updated_at.clone()),
    }
}

/// Draft checklist ids are local placeholders, so they are not sent; the
/// store assigns real ones.
pub fn encode_draft(draft: &TaskDraft) -> WireTaskPayload {
    WireTaskPayload {
        id: None,
        title: draft.title.clone(),
        description: draft.description.clone(),
        category_id: draft.category_id.unwrap_or(DEFAULT_CATEGORY_ID),
        category_name: draft.category_name.clone(),
        priority_score: level_to_score(draft.priority.level()),
        deadline: draft.deadline.clone(),
        status: status_to_wire(draft.status),
        tags: draft
            .tags
            .iter()
            .filter(|tag| !tag.trim().is_empty())
            .cloned()
            .collect(),
        checklist_items: Some(
            draft
                .checklist_items
                .iter()
                .map(|item| WireChecklistItemPayload {
                    id: None,
                    text: item.text.clone(),
                    completed: item.completed,
                })
                .collect(),
        ),
        created_at: None,
        updated_at: None,
    }
}

pub fn decode_category(wire: WireCategory) -> Result<Category, AppError> {
    let id = wire
        .id
        .ok_or_else(|| AppError::invalid_data("category is missing id"))?;
    Ok(Category {
        id,
        name: wire.name.unwrap_or_default(),
        color: String::new(),
        count: wire.usage_count.unwrap_or(0),
    })
}
