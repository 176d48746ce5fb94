use crate::{data::student::Student, error::RosterResult};
use async_trait::async_trait;
use std::fmt::Debug;
use uuid::Uuid;

pub mod memory;
pub mod postgres;
pub mod schema;
pub mod student;

/// Owns every persisted [`Student`]. Each mutating call is its own transaction and only returns `Ok` once that
/// transaction has committed.
#[async_trait]
pub trait StudentStore: Debug + Send + Sync {
    async fn find_all(&self) -> RosterResult<Vec<Student>>;
    async fn find_by_id(&self, id: Uuid) -> RosterResult<Option<Student>>;
    async fn exists(&self, id: Uuid) -> RosterResult<bool>;
    /// Fails with `DuplicateStudent` if the id is taken.
    async fn insert(&self, student: &Student) -> RosterResult<()>;
    /// Overwrites the non-key fields. Fails with `MissingStudent` if no row has the id.
    async fn update(&self, student: &Student) -> RosterResult<()>;
    /// Fails with `MissingStudent` if no row has the id.
    async fn delete(&self, student: &Student) -> RosterResult<()>;

    async fn close(&self) {}
}
