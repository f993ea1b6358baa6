use serde::{Deserialize, Serialize};

/// Task ids arrive as JSON numbers from the store but are strings everywhere
/// else, so both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireId {
    Number(i64),
    Text(String),
}

impl WireId {
    pub fn into_string(self) -> String {
        match self {
            Self::Number(value) => value.to_string(),
            Self::Text(value) => value,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireCategory {
    pub id: Option<i64>,
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_count: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireChecklistItem {
    pub id: Option<WireId>,
    pub text: Option<String>,
    pub completed: Option<bool>,
}

/// A task as the remote store returns it. Every field is optional here;
/// the codec decides which absences are fatal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireTask {
    pub id: Option<WireId>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub checklist_items: Option<Vec<WireChecklistItem>>,
    pub category: Option<WireCategory>,
    pub priority_score: Option<f64>,
    pub deadline: Option<String>,
    pub status: Option<String>,
    pub tags: Option<Vec<String>>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WireChecklistItemPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub text: String,
    pub completed: bool,
}

/// Outgoing body for create and update. Carries `category_id` and
/// `priority_score` instead of the domain category object and level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WireTaskPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    pub description: String,
    pub category_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    pub priority_score: i64,
    pub deadline: Option<String>,
    pub status: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checklist_items: Option<Vec<WireChecklistItemPayload>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// What a store that accepted `payload` verbatim would send back.
impl From<WireTaskPayload> for WireTask {
    fn from(payload: WireTaskPayload) -> Self {
        Self {
            id: payload.id.map(WireId::Text),
            title: Some(payload.title),
            description: Some(payload.description),
            checklist_items: payload.checklist_items.map(|items| {
                items
                    .into_iter()
                    .map(|item| WireChecklistItem {
                        id: item.id.map(WireId::Text),
                        text: Some(item.text),
                        completed: Some(item.completed),
                    })
                    .collect()
            }),
            category: Some(WireCategory {
                id: Some(payload.category_id),
                name: payload.category_name,
                usage_count: None,
            }),
            priority_score: Some(payload.priority_score as f64),
            deadline: payload.deadline,
            status: Some(payload.status),
            tags: Some(payload.tags),
            created_at: payload.created_at,
            updated_at: payload.updated_at,
        }
    }
}
