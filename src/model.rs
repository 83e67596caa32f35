//! Todo record and the validated inputs used to create and patch it.

use crate::store::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted todo item. Serialized with camelCase keys for the API.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated creation input. Build with [`NewTodo::new`] so the title invariant holds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub description: String,
    pub completed: bool,
}

impl NewTodo {
    /// Trims `title` and `description`; an empty title is rejected.
    pub fn new(
        title: &str,
        description: Option<&str>,
        completed: Option<bool>,
    ) -> Result<Self, StoreError> {
        Ok(NewTodo {
            title: normalize_title(title)?,
            description: normalize_description(description.unwrap_or_default())?,
            completed: completed.unwrap_or(false),
        })
    }

    pub fn ensure_valid(&self) -> Result<(), StoreError> {
        normalize_title(&self.title)?;
        normalize_description(&self.description)?;
        Ok(())
    }
}

/// POST /todos body as received; see `RequestValidator::create`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CreateTodoRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

/// Partial update: only `Some` fields are applied.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct TodoPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl TodoPatch {
    /// Trims supplied text fields and rejects a supplied title that ends up empty.
    pub fn normalized(self) -> Result<Self, StoreError> {
        let title = match self.title {
            Some(t) => Some(normalize_title(&t)?),
            None => None,
        };
        let description = match self.description {
            Some(d) => Some(normalize_description(&d)?),
            None => None,
        };
        Ok(TodoPatch {
            title,
            description,
            completed: self.completed,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.completed.is_none()
    }

    /// Apply to an existing record, refreshing `updated_at` without letting it precede `created_at`.
    pub fn apply(&self, todo: &mut Todo, now: DateTime<Utc>) {
        if let Some(ref title) = self.title {
            todo.title = title.clone();
        }
        if let Some(ref description) = self.description {
            todo.description = description.clone();
        }
        if let Some(completed) = self.completed {
            todo.completed = completed;
        }
        todo.updated_at = now.max(todo.created_at);
    }
}

/// Parse a path identifier. Anything other than a UUID is an invalid identifier.
pub fn parse_id(id: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(id.trim()).map_err(|_| StoreError::InvalidIdentifier(id.to_string()))
}

fn normalize_title(title: &str) -> Result<String, StoreError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(StoreError::Validation("title is required".into()));
    }
    reject_nul("title", title)?;
    Ok(title.to_string())
}

fn normalize_description(description: &str) -> Result<String, StoreError> {
    let description = description.trim();
    reject_nul("description", description)?;
    Ok(description.to_string())
}

/// PostgreSQL TEXT cannot hold NUL.
fn reject_nul(field: &str, value: &str) -> Result<(), StoreError> {
    if value.contains('\0') {
        return Err(StoreError::Validation(format!("{} must not contain NUL characters", field)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample() -> Todo {
        let at = Utc::now();
        Todo {
            id: Uuid::new_v4(),
            title: "Buy milk".into(),
            description: String::new(),
            completed: false,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn new_todo_applies_defaults() {
        let t = NewTodo::new("Buy milk", None, None).unwrap();
        assert_eq!(t.title, "Buy milk");
        assert_eq!(t.description, "");
        assert!(!t.completed);
    }

    #[test]
    fn new_todo_trims_fields() {
        let t = NewTodo::new("  Buy milk ", Some(" 2 litres  "), Some(true)).unwrap();
        assert_eq!(t.title, "Buy milk");
        assert_eq!(t.description, "2 litres");
        assert!(t.completed);
    }

    #[test]
    fn new_todo_rejects_blank_title() {
        assert!(matches!(NewTodo::new("", None, None), Err(StoreError::Validation(_))));
        assert!(matches!(NewTodo::new("   ", None, None), Err(StoreError::Validation(_))));
    }

    #[test]
    fn nul_characters_are_rejected() {
        assert!(matches!(NewTodo::new("a\0b", None, None), Err(StoreError::Validation(_))));
        assert!(matches!(
            NewTodo::new("ok", Some("x\0"), None),
            Err(StoreError::Validation(_))
        ));
        let patch = TodoPatch {
            description: Some("\0".into()),
            ..Default::default()
        };
        assert!(matches!(patch.normalized(), Err(StoreError::Validation(_))));
        let bypass = NewTodo {
            title: "fine".into(),
            description: "bad\0".into(),
            completed: false,
        };
        assert!(bypass.ensure_valid().is_err());
    }

    #[test]
    fn patch_rejects_explicit_empty_title() {
        let patch = TodoPatch {
            title: Some(" ".into()),
            ..Default::default()
        };
        assert!(matches!(patch.normalized(), Err(StoreError::Validation(_))));
    }

    #[test]
    fn patch_null_fields_deserialize_as_absent() {
        let patch: TodoPatch = serde_json::from_str(r#"{"title":null,"completed":true}"#).unwrap();
        assert!(patch.title.is_none());
        assert_eq!(patch.completed, Some(true));
        assert!(!patch.is_empty());
        assert!(serde_json::from_str::<TodoPatch>("{}").unwrap().is_empty());
    }

    #[test]
    fn patch_apply_changes_only_supplied_fields() {
        let mut todo = sample();
        let before = todo.clone();
        let later = todo.created_at + Duration::seconds(5);
        TodoPatch {
            completed: Some(true),
            ..Default::default()
        }
        .apply(&mut todo, later);
        assert!(todo.completed);
        assert_eq!(todo.title, before.title);
        assert_eq!(todo.description, before.description);
        assert_eq!(todo.created_at, before.created_at);
        assert_eq!(todo.updated_at, later);
    }

    #[test]
    fn patch_apply_never_moves_updated_before_created() {
        let mut todo = sample();
        let earlier = todo.created_at - Duration::seconds(5);
        TodoPatch::default().apply(&mut todo, earlier);
        assert_eq!(todo.updated_at, todo.created_at);
    }

    #[test]
    fn todo_serializes_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn parse_id_rejects_garbage() {
        assert!(parse_id("not-a-uuid").is_err());
        assert!(matches!(parse_id("123"), Err(StoreError::InvalidIdentifier(_))));
        assert!(parse_id("00000000-0000-0000-0000-000000000000").is_ok());
    }
}
