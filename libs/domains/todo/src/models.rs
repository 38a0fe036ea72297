use chrono::{DateTime, Utc};

/// A stored todo item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Todo {
    /// Assigned by the datastore, never reused
    pub id: i64,
    pub title: String,
    pub description: String,
    pub reminder: Option<DateTime<Utc>>,
}

/// Input for creating a todo; the id comes from the datastore
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub description: String,
    pub reminder: Option<DateTime<Utc>>,
}

impl NewTodo {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        reminder: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            reminder,
        }
    }

    /// The stored item this input becomes once assigned `id`
    pub fn with_id(self, id: i64) -> Todo {
        Todo {
            id,
            title: self.title,
            description: self.description,
            reminder: self.reminder,
        }
    }
}
