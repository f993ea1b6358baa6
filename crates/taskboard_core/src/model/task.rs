use serde::Serialize;

pub const DEFAULT_CATEGORY_ID: i64 = 1;
pub const DEFAULT_CATEGORY_NAME: &str = "Uncategorized";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [Self::Pending, Self::InProgress, Self::Completed];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Completed => "completed",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(Self::Pending),
            "in-progress" => Some(Self::InProgress),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityLevel {
    Low,
    Medium,
    High,
    Urgent,
}

impl PriorityLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Self::Low),
            "medium" => Some(Self::Medium),
            "high" => Some(Self::High),
            "urgent" => Some(Self::Urgent),
            _ => None,
        }
    }
}

/// Categorical level and numeric score, kept together so neither can drift
/// from the other outside the score/level mapping in [`crate::codec`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Priority {
    #[serde(rename = "priorityLevel")]
    level: PriorityLevel,
    #[serde(rename = "aiScore")]
    score: i64,
}

impl Priority {
    pub fn from_score(score: i64) -> Self {
        Self {
            level: crate::codec::score_to_level(score),
            score,
        }
    }

    /// Score is derived from the level. `High` keeps its level but scores as
    /// `Low` does, so it collapses on the next decode.
    pub fn from_level(level: PriorityLevel) -> Self {
        Self {
            level,
            score: crate::codec::level_to_score(level),
        }
    }

    pub(crate) fn decoded(level: PriorityLevel, score: i64) -> Self {
        Self { level, score }
    }

    pub fn level(&self) -> PriorityLevel {
        self.level
    }

    pub fn score(&self) -> i64 {
        self.score
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::from_level(PriorityLevel::Medium)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChecklistItem {
    pub id: String,
    pub text: String,
    pub completed: bool,
}

impl ChecklistItem {
    pub fn new<I: Into<String>, T: Into<String>>(id: I, text: T) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            completed: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category_id: i64,
    pub category_name: String,
    #[serde(flatten)]
    pub priority: Priority,
    pub deadline: Option<String>,
    pub status: TaskStatus,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checklist_items: Option<Vec<ChecklistItem>>,
    pub created_at: String,
    pub updated_at: String,
}

impl Task {
    pub fn priority_level(&self) -> PriorityLevel {
        self.priority.level()
    }

    pub fn ai_score(&self) -> i64 {
        self.priority.score()
    }

    pub fn checklist(&self) -> &[ChecklistItem] {
        self.checklist_items.as_deref().unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
    pub category_id: Option<i64>,
    pub category_name: Option<String>,
    pub priority: Priority,
    pub deadline: Option<String>,
    pub status: TaskStatus,
    pub tags: Vec<String>,
    pub checklist_items: Vec<ChecklistItem>,
}

impl TaskDraft {
    pub fn new(title: &str) -> Result<Self, crate::error::AppError> {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Err(crate::error::AppError::invalid_input("title is required"));
        }

        Ok(Self {
            title: trimmed.to_string(),
            description: String::new(),
            category_id: None,
            category_name: None,
            priority: Priority::default(),
            deadline: None,
            status: TaskStatus::Pending,
            tags: Vec::new(),
            checklist_items: Vec::new(),
        })
    }

    pub fn add_tag(&mut self, tag: &str) -> bool {
        let trimmed = tag.trim();
        if trimmed.is_empty() || self.tags.iter().any(|existing| existing == trimmed) {
            return false;
        }
        self.tags.push(trimmed.to_string());
        true
    }

    pub fn add_checklist_item(&mut self, text: &str) -> Option<&ChecklistItem> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return None;
        }
        let next_id = self.checklist_items.len() + 1;
        self.checklist_items
            .push(ChecklistItem::new(format!("draft-{next_id}"), trimmed));
        self.checklist_items.last()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub color: String,
    pub count: i64,
}
