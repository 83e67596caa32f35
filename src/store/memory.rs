//! In-process store for tests and local runs without a database.

use super::{ConnectionState, StoreError, TodoStore};
use crate::model::{parse_id, NewTodo, Todo, TodoPatch};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Records kept in insertion order.
#[derive(Default)]
pub struct MemoryTodoStore {
    todos: RwLock<Vec<Todo>>,
}

impl MemoryTodoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.todos.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.todos.read().await.is_empty()
    }
}

#[async_trait]
impl TodoStore for MemoryTodoStore {
    async fn insert(&self, todo: NewTodo) -> Result<Todo, StoreError> {
        todo.ensure_valid()?;
        let now = Utc::now();
        let row = Todo {
            id: Uuid::new_v4(),
            title: todo.title,
            description: todo.description,
            completed: todo.completed,
            created_at: now,
            updated_at: now,
        };
        self.todos.write().await.push(row.clone());
        Ok(row)
    }

    async fn list_all(&self) -> Result<Vec<Todo>, StoreError> {
        // Reverse first so equal timestamps keep newest-inserted first under the stable sort.
        let mut rows: Vec<Todo> = self.todos.read().await.iter().rev().cloned().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn find_by_id(&self, id: &str) -> Result<Todo, StoreError> {
        let uid = parse_id(id)?;
        self.todos
            .read()
            .await
            .iter()
            .find(|t| t.id == uid)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    async fn update_by_id(&self, id: &str, patch: TodoPatch) -> Result<Todo, StoreError> {
        let uid = parse_id(id)?;
        let patch = patch.normalized()?;
        let mut todos = self.todos.write().await;
        let todo = todos
            .iter_mut()
            .find(|t| t.id == uid)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        patch.apply(todo, Utc::now());
        Ok(todo.clone())
    }

    async fn delete_by_id(&self, id: &str) -> Result<Todo, StoreError> {
        let uid = parse_id(id)?;
        let mut todos = self.todos.write().await;
        let pos = todos
            .iter()
            .position(|t| t.id == uid)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        Ok(todos.remove(pos))
    }

    async fn connection_state(&self) -> ConnectionState {
        ConnectionState::Connected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_todo(title: &str) -> NewTodo {
        NewTodo::new(title, None, None).unwrap()
    }

    #[tokio::test]
    async fn insert_assigns_id_and_equal_timestamps() {
        let store = MemoryTodoStore::new();
        let todo = store.insert(new_todo("Buy milk")).await.unwrap();
        assert_eq!(todo.created_at, todo.updated_at);
        assert_eq!(todo.description, "");
        assert!(!todo.completed);
        assert_eq!(store.find_by_id(&todo.id.to_string()).await.unwrap(), todo);
    }

    #[tokio::test]
    async fn insert_rejects_title_bypassing_constructor() {
        let store = MemoryTodoStore::new();
        let bad = NewTodo {
            title: "  ".into(),
            description: String::new(),
            completed: false,
        };
        assert!(matches!(store.insert(bad).await, Err(StoreError::Validation(_))));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn list_all_is_newest_first() {
        let store = MemoryTodoStore::new();
        let mut ids = Vec::new();
        for title in ["a", "b", "c", "d"] {
            ids.push(store.insert(new_todo(title)).await.unwrap().id);
        }
        let listed: Vec<Uuid> = store.list_all().await.unwrap().iter().map(|t| t.id).collect();
        ids.reverse();
        assert_eq!(listed, ids);
    }

    #[tokio::test]
    async fn equal_timestamps_list_most_recent_insert_first() {
        let store = MemoryTodoStore::new();
        let at = Utc::now();
        let rows: Vec<Todo> = (0..3)
            .map(|i| Todo {
                id: Uuid::new_v4(),
                title: format!("tie {i}"),
                description: String::new(),
                completed: false,
                created_at: at,
                updated_at: at,
            })
            .collect();
        store.todos.write().await.extend(rows.iter().cloned());
        let listed: Vec<Uuid> = store.list_all().await.unwrap().iter().map(|t| t.id).collect();
        let expected: Vec<Uuid> = rows.iter().rev().map(|t| t.id).collect();
        assert_eq!(listed, expected);
    }

    #[tokio::test]
    async fn lookups_distinguish_invalid_and_missing_ids() {
        let store = MemoryTodoStore::new();
        assert!(matches!(
            store.find_by_id("nope").await,
            Err(StoreError::InvalidIdentifier(_))
        ));
        let missing = Uuid::new_v4().to_string();
        assert!(matches!(store.find_by_id(&missing).await, Err(StoreError::NotFound(_))));
        assert!(matches!(
            store.update_by_id(&missing, TodoPatch::default()).await,
            Err(StoreError::NotFound(_))
        ));
        assert!(matches!(store.delete_by_id(&missing).await, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_rejects_empty_title_and_keeps_record() {
        let store = MemoryTodoStore::new();
        let todo = store.insert(new_todo("keep me")).await.unwrap();
        let id = todo.id.to_string();
        let patch = TodoPatch {
            title: Some(String::new()),
            completed: Some(true),
            ..Default::default()
        };
        assert!(matches!(
            store.update_by_id(&id, patch).await,
            Err(StoreError::Validation(_))
        ));
        assert_eq!(store.find_by_id(&id).await.unwrap(), todo);
    }

    #[tokio::test]
    async fn delete_is_permanent() {
        let store = MemoryTodoStore::new();
        let todo = store.insert(new_todo("gone")).await.unwrap();
        let id = todo.id.to_string();
        assert_eq!(store.delete_by_id(&id).await.unwrap(), todo);
        assert!(matches!(store.find_by_id(&id).await, Err(StoreError::NotFound(_))));
        assert!(matches!(store.delete_by_id(&id).await, Err(StoreError::NotFound(_))));
        assert_eq!(store.len().await, 0);
    }
}
