use crate::{
    config::DbConfig,
    data::{StudentStore, schema::StudentTable, student::Student},
    error::{
        CommitTransactionSnafu, CreateSchemaSnafu, GetDatabaseConnectionSnafu, MakeQuerySnafu,
        MissingStudentSnafu, OpenDatabaseSnafu, RosterError, RosterResult,
    },
};
use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use snafu::{ResultExt, ensure};
use sqlx::{
    Pool, Postgres, Row, Transaction,
    pool::PoolConnection,
    postgres::{PgPoolOptions, PgRow},
};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug)]
struct Statements {
    select_all: String,
    select_by_id: String,
    exists: String,
    insert: String,
    update: String,
    delete: String,
}

impl Statements {
    fn new(table: &StudentTable) -> Self {
        Self {
            select_all: table.select_all_sql(),
            select_by_id: table.select_by_id_sql(),
            exists: table.exists_sql(),
            insert: table.insert_sql(),
            update: table.update_sql(),
            delete: table.delete_sql(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct PostgresStudentStore {
    pool: Pool<Postgres>,
    table: StudentTable,
    statements: Arc<Statements>,
}

impl PostgresStudentStore {
    pub async fn new(db_config: &DbConfig, table: StudentTable) -> RosterResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(db_config.max_connections())
            .connect(&db_config.get_db_path())
            .await
            .context(OpenDatabaseSnafu)?;

        Self::from_pool(pool, table).await
    }

    /// Makes sure `table` exists, then prepares every statement against it.
    pub async fn from_pool(pool: Pool<Postgres>, table: StudentTable) -> RosterResult<Self> {
        sqlx::query(&table.create_table_sql())
            .execute(&pool)
            .await
            .context(CreateSchemaSnafu { table: table.name })?;

        info!(table = table.name, "Student table ready");

        Ok(Self {
            pool,
            table,
            statements: Arc::new(Statements::new(&table)),
        })
    }

    async fn get_connection(&self) -> RosterResult<PoolConnection<Postgres>> {
        self.pool
            .acquire()
            .await
            .context(GetDatabaseConnectionSnafu)
    }

    async fn get_transaction(&self) -> RosterResult<Transaction<'static, Postgres>> {
        self.pool.begin().await.context(GetDatabaseConnectionSnafu)
    }

    fn student_from_row(&self, row: &PgRow) -> RosterResult<Student> {
        Ok(Student {
            id: row.try_get(self.table.id.name).context(MakeQuerySnafu)?,
            first_name: row
                .try_get(self.table.first_name.name)
                .context(MakeQuerySnafu)?,
            last_name: row
                .try_get(self.table.last_name.name)
                .context(MakeQuerySnafu)?,
            program: row.try_get(self.table.program.name).context(MakeQuerySnafu)?,
        })
    }

    /// Runs one keyed write in its own transaction, failing with `MissingStudent` if it touched nothing.
    async fn write_existing(&self, sql: &str, student: &Student, bind_fields: bool) -> RosterResult<()> {
        let mut transaction = self.get_transaction().await?;

        let mut query = sqlx::query(sql).bind(student.id);
        if bind_fields {
            query = query
                .bind(&student.first_name)
                .bind(&student.last_name)
                .bind(&student.program);
        }
        let rows_affected = query
            .execute(&mut *transaction)
            .await
            .context(MakeQuerySnafu)?
            .rows_affected();

        // dropping the transaction rolls it back
        ensure!(rows_affected > 0, MissingStudentSnafu { id: student.id });

        transaction.commit().await.context(CommitTransactionSnafu)
    }
}

#[async_trait]
impl StudentStore for PostgresStudentStore {
    async fn find_all(&self) -> RosterResult<Vec<Student>> {
        let mut conn = self.get_connection().await?;

        sqlx::query(&self.statements.select_all)
            .fetch(&mut *conn)
            .map(|row| {
                row.context(MakeQuerySnafu)
                    .and_then(|row| self.student_from_row(&row))
            })
            .try_collect()
            .await
    }

    async fn find_by_id(&self, id: Uuid) -> RosterResult<Option<Student>> {
        let mut conn = self.get_connection().await?;

        let Some(row) = sqlx::query(&self.statements.select_by_id)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .context(MakeQuerySnafu)?
        else {
            return Ok(None);
        };

        self.student_from_row(&row).map(Some)
    }

    async fn exists(&self, id: Uuid) -> RosterResult<bool> {
        let mut conn = self.get_connection().await?;

        sqlx::query_scalar(&self.statements.exists)
            .bind(id)
            .fetch_one(&mut *conn)
            .await
            .context(MakeQuerySnafu)
    }

    async fn insert(&self, student: &Student) -> RosterResult<()> {
        let mut transaction = self.get_transaction().await?;

        sqlx::query(&self.statements.insert)
            .bind(student.id)
            .bind(&student.first_name)
            .bind(&student.last_name)
            .bind(&student.program)
            .execute(&mut *transaction)
            .await
            .map_err(|source| match source {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    RosterError::DuplicateStudent { id: student.id }
                }
                source => RosterError::MakeQuery { source },
            })?;

        transaction.commit().await.context(CommitTransactionSnafu)
    }

    async fn update(&self, student: &Student) -> RosterResult<()> {
        self.write_existing(&self.statements.update, student, true)
            .await
    }

    async fn delete(&self, student: &Student) -> RosterResult<()> {
        self.write_existing(&self.statements.delete, student, false)
            .await
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
