//! Task structure as exchanged with the task API

use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque task identifier assigned by the task API.
///
/// Remote stores hand out either numeric or string ids; both are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawTaskId", into = "String")]
pub struct TaskId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTaskId {
    Number(u64),
    Text(String),
}

impl From<RawTaskId> for TaskId {
    fn from(raw: RawTaskId) -> Self {
        match raw {
            RawTaskId::Number(n) => Self(n.to_string()),
            RawTaskId::Text(s) => Self(s),
        }
    }
}

impl From<TaskId> for String {
    fn from(id: TaskId) -> Self {
        id.0
    }
}

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A unit of work with a title and completion flag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: TaskId::new(id),
            title: title.into(),
            completed: false,
        }
    }
}

/// Body sent to the task API when creating a task
#[derive(Debug, Clone, Serialize)]
pub struct NewTask<'a> {
    pub title: &'a str,
    pub completed: bool,
}

impl<'a> NewTask<'a> {
    pub fn titled(title: &'a str) -> Self {
        Self { title, completed: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_and_string_ids_deserialize() {
        let tasks: Vec<Task> = serde_json::from_str(
            r#"[{"id": 7, "title": "Numeric", "completed": true},
                {"id": "abc", "title": "Text"}]"#,
        )
        .unwrap();

        assert_eq!(tasks[0].id, TaskId::new("7"));
        assert!(tasks[0].completed);
        assert_eq!(tasks[1].id.as_str(), "abc");
        assert!(!tasks[1].completed);
    }

    #[test]
    fn id_serializes_as_string() {
        let json = serde_json::to_value(Task::new("3", "Write report")).unwrap();
        assert_eq!(json["id"], "3");
        assert_eq!(json["completed"], false);
    }
}
