use crate::{
    data::{StudentStore, student::Student},
    error::{DuplicateStudentSnafu, MissingStudentSnafu, RosterResult},
};
use async_trait::async_trait;
use snafu::{OptionExt, ensure};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Process-local store for running without Postgres. Same contract as the Postgres store, nothing survives a
/// restart.
#[derive(Debug, Default)]
pub struct MemoryStudentStore {
    students: RwLock<HashMap<Uuid, Student>>,
}

impl MemoryStudentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StudentStore for MemoryStudentStore {
    async fn find_all(&self) -> RosterResult<Vec<Student>> {
        Ok(self.students.read().await.values().cloned().collect())
    }

    async fn find_by_id(&self, id: Uuid) -> RosterResult<Option<Student>> {
        Ok(self.students.read().await.get(&id).cloned())
    }

    async fn exists(&self, id: Uuid) -> RosterResult<bool> {
        Ok(self.students.read().await.contains_key(&id))
    }

    async fn insert(&self, student: &Student) -> RosterResult<()> {
        let mut students = self.students.write().await;
        ensure!(
            !students.contains_key(&student.id),
            DuplicateStudentSnafu { id: student.id }
        );
        students.insert(student.id, student.clone());
        Ok(())
    }

    async fn update(&self, student: &Student) -> RosterResult<()> {
        let mut students = self.students.write().await;
        let existing = students
            .get_mut(&student.id)
            .context(MissingStudentSnafu { id: student.id })?;
        existing.clone_from(student);
        Ok(())
    }

    async fn delete(&self, student: &Student) -> RosterResult<()> {
        self.students
            .write()
            .await
            .remove(&student.id)
            .context(MissingStudentSnafu { id: student.id })?;
        Ok(())
    }
}
