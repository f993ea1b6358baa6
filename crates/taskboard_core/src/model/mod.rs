mod task;

pub use task::{
    Category, ChecklistItem, DEFAULT_CATEGORY_ID, DEFAULT_CATEGORY_NAME, Priority, PriorityLevel,
    Task, TaskDraft, TaskStatus,
};
