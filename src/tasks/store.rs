//! # Almacenamiento de Tareas en Memoria
//! src/tasks/store.rs
//!
//! Dueño exclusivo de la lista de tareas. Todas las lecturas y escrituras
//! pasan por un único `Mutex`, así cada operación es atómica frente a
//! requests concurrentes. No hay persistencia: todo se pierde al reiniciar.

use crate::tasks::model::Task;
use parking_lot::Mutex;
use thiserror::Error;

/// Errores de mutación del store
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("task id already exists: {0}")]
    DuplicateId(String),

    #[error("task not found: {0}")]
    NotFound(String),
}

/// Lista de tareas compartida por todos los handlers
#[derive(Debug, Default)]
pub struct TaskStore {
    /// Tareas en orden de inserción
    tasks: Mutex<Vec<Task>>,
}

impl TaskStore {
    /// Crea un store vacío
    pub fn new() -> Self {
        Self::default()
    }

    /// Todas las tareas en orden de inserción (copias)
    pub fn get_all(&self) -> Vec<Task> {
        self.tasks.lock().clone()
    }

    /// Busca una tarea por id; `None` no es un error
    pub fn get_by_id(&self, id: &str) -> Option<Task> {
        self.tasks.lock().iter().find(|task| task.id == id).cloned()
    }

    /// Agrega una tarea al final de la lista
    pub fn add(&self, task: Task) -> Result<(), StoreError> {
        let mut tasks = self.tasks.lock();

        if tasks.iter().any(|existing| existing.id == task.id) {
            return Err(StoreError::DuplicateId(task.id));
        }

        tasks.push(task);
        Ok(())
    }

    /// Reemplaza la tarea con el mismo id, conservando su posición
    pub fn update(&self, task: Task) -> Result<(), StoreError> {
        let mut tasks = self.tasks.lock();

        match tasks.iter_mut().find(|existing| existing.id == task.id) {
            Some(slot) => {
                *slot = task;
                Ok(())
            }
            None => Err(StoreError::NotFound(task.id)),
        }
    }

    /// Elimina la tarea si existe y retorna si hubo eliminación
    pub fn delete(&self, id: &str) -> bool {
        let mut tasks = self.tasks.lock();
        let before = tasks.len();

        tasks.retain(|task| task.id != id);

        tasks.len() != before
    }

    /// Número de tareas almacenadas
    pub fn len(&self) -> usize {
        self.tasks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    // ==================== Basic Operations ====================

    #[test]
    fn test_add_and_get_all() {
        let store = TaskStore::new();
        store.add(Task::new("Buy milk")).unwrap();

        let all = store.get_all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "Buy milk");
        assert!(!all[0].id.is_empty());
    }

    #[test]
    fn test_get_all_keeps_insertion_order() {
        let store = TaskStore::new();
        for title in ["first", "second", "third"] {
            store.add(Task::new(title)).unwrap();
        }

        let titles: Vec<String> = store.get_all().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_add_duplicate_id_fails() {
        let store = TaskStore::new();
        let task = Task::new("Buy milk");

        store.add(task.clone()).unwrap();
        let result = store.add(task.clone());

        assert_eq!(result, Err(StoreError::DuplicateId(task.id)));
        assert_eq!(store.len(), 1);
    }

    // ==================== Get Operations ====================

    #[test]
    fn test_get_by_id() {
        let store = TaskStore::new();
        let task = Task::new("Buy milk");
        store.add(task.clone()).unwrap();

        assert_eq!(store.get_by_id(&task.id), Some(task));
        assert_eq!(store.get_by_id("nonexistent-id"), None);
    }

    // ==================== Update ====================

    #[test]
    fn test_update_replaces_only_title() {
        let store = TaskStore::new();
        let task = Task::new("Old title");
        store.add(task.clone()).unwrap();

        store.update(task.with_title("New title")).unwrap();

        let stored = store.get_by_id(&task.id).unwrap();
        assert_eq!(stored.title, "New title");
        assert_eq!(stored.id, task.id);
        assert_eq!(stored.completed, task.completed);
        assert_eq!(stored.created_at, task.created_at);
    }

    #[test]
    fn test_update_unknown_id() {
        let store = TaskStore::new();
        let task = Task::new("Ghost");

        assert_eq!(store.update(task.clone()), Err(StoreError::NotFound(task.id)));
        assert!(store.is_empty());
    }

    // ==================== Delete ====================

    #[test]
    fn test_delete_missing_leaves_store_unchanged() {
        let store = TaskStore::new();
        store.add(Task::new("Keep me")).unwrap();
        let before = store.get_all();

        assert!(!store.delete("nonexistent-id"));
        assert_eq!(store.get_all(), before);
    }

    #[test]
    fn test_delete_removes_exactly_one() {
        let store = TaskStore::new();
        let keep = Task::new("Keep me");
        let drop = Task::new("Drop me");
        store.add(keep.clone()).unwrap();
        store.add(drop.clone()).unwrap();

        assert!(store.delete(&drop.id));
        assert_eq!(store.get_all(), vec![keep]);
        assert!(!store.delete(&drop.id));
    }

    // ==================== Concurrency ====================

    #[test]
    fn test_concurrent_adds_are_not_lost() {
        let store = Arc::new(TaskStore::new());

        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..50 {
                        store.add(Task::new(format!("task {worker}-{i}"))).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 400);
    }
}
