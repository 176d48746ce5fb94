use crate::{
    config::{RuntimeConfiguration, StoreConfig},
    data::{
        StudentStore, memory::MemoryStudentStore, postgres::PostgresStudentStore,
        schema::STUDENT_TABLE,
    },
    error::RosterResult,
};
use std::{ops::Deref, sync::Arc};

#[derive(Clone, Debug)]
pub struct RosterState {
    students: Arc<dyn StudentStore>,
}

impl RosterState {
    pub async fn new(config: &RuntimeConfiguration) -> RosterResult<Self> {
        let students: Arc<dyn StudentStore> = match config.store() {
            StoreConfig::Postgres(db_config) => {
                Arc::new(PostgresStudentStore::new(db_config, STUDENT_TABLE).await?)
            }
            StoreConfig::Memory => {
                warn!("Using the in-memory student store, nothing will be persisted");
                Arc::new(MemoryStudentStore::new())
            }
        };

        Ok(Self::with_store(students))
    }

    pub fn with_store(students: Arc<dyn StudentStore>) -> Self {
        Self { students }
    }

    pub async fn sensible_shutdown(&self) {
        self.students.close().await;
    }
}

impl Deref for RosterState {
    type Target = dyn StudentStore;

    fn deref(&self) -> &Self::Target {
        self.students.as_ref()
    }
}
