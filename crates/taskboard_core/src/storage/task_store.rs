use crate::model::Task;
use std::sync::Arc;

/// The session's task collection. Read access is public; the mutation
/// methods are crate-private so only the sync layer can change it.
#[derive(Debug, Default, Clone)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Arc<[Task]> {
        Arc::from(self.tasks.as_slice())
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub(crate) fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    pub(crate) fn insert(&mut self, task: Task) {
        match self.position(&task.id) {
            Some(index) => self.tasks[index] = task,
            None => self.tasks.push(task),
        }
    }

    pub(crate) fn replace_by_id(&mut self, id: &str, task: Task) -> bool {
        match self.position(id) {
            Some(index) => {
                self.tasks[index] = task;
                true
            }
            None => false,
        }
    }

    pub(crate) fn remove_by_id(&mut self, id: &str) -> Option<Task> {
        let index = self.position(id)?;
        Some(self.tasks.remove(index))
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }
}
