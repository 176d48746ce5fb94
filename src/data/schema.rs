//! Explicit layout of the table backing [`Student`](super::student::Student).
//!
//! The Postgres store takes a [`StudentTable`] at start-up and builds its DDL and statements from it, so renaming a
//! column only touches [`STUDENT_TABLE`].

use crate::data::student::MAX_NAME_LEN;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Uuid,
    VarChar(usize),
    Text,
}

impl ColumnType {
    pub fn sql(self) -> String {
        match self {
            Self::Uuid => "uuid".to_string(),
            Self::VarChar(len) => format!("varchar({len})"),
            Self::Text => "text".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    pub name: &'static str,
    pub ty: ColumnType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudentTable {
    pub name: &'static str,
    /// primary key
    pub id: Column,
    pub first_name: Column,
    pub last_name: Column,
    pub program: Column,
}

pub const STUDENT_TABLE: StudentTable = StudentTable {
    name: "students",
    id: Column {
        name: "id",
        ty: ColumnType::Uuid,
    },
    first_name: Column {
        name: "first_name",
        ty: ColumnType::VarChar(MAX_NAME_LEN),
    },
    last_name: Column {
        name: "last_name",
        ty: ColumnType::VarChar(MAX_NAME_LEN),
    },
    program: Column {
        name: "program",
        ty: ColumnType::Text,
    },
};

impl StudentTable {
    /// Non-key columns, in the order they are bound after the id.
    pub const fn fields(&self) -> [Column; 3] {
        [self.first_name, self.last_name, self.program]
    }

    pub fn create_table_sql(&self) -> String {
        let mut sql = format!(
            "CREATE TABLE IF NOT EXISTS \"{}\" (\"{}\" {} PRIMARY KEY",
            self.name,
            self.id.name,
            self.id.ty.sql()
        );
        for column in self.fields() {
            let _ = write!(sql, ", \"{}\" {} NOT NULL", column.name, column.ty.sql());
        }
        sql.push(')');
        sql
    }

    fn column_list(&self) -> String {
        std::iter::once(self.id)
            .chain(self.fields())
            .map(|column| format!("\"{}\"", column.name))
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn select_all_sql(&self) -> String {
        format!("SELECT {} FROM \"{}\"", self.column_list(), self.name)
    }

    pub fn select_by_id_sql(&self) -> String {
        format!(
            "SELECT {} FROM \"{}\" WHERE \"{}\" = $1",
            self.column_list(),
            self.name,
            self.id.name
        )
    }

    pub fn exists_sql(&self) -> String {
        format!(
            "SELECT EXISTS (SELECT 1 FROM \"{}\" WHERE \"{}\" = $1)",
            self.name, self.id.name
        )
    }

    pub fn insert_sql(&self) -> String {
        format!(
            "INSERT INTO \"{}\" ({}) VALUES ($1, $2, $3, $4)",
            self.name,
            self.column_list()
        )
    }

    pub fn update_sql(&self) -> String {
        let assignments = self
            .fields()
            .iter()
            .enumerate()
            .map(|(i, column)| format!("\"{}\" = ${}", column.name, i + 2))
            .collect::<Vec<_>>()
            .join(", ");

        format!(
            "UPDATE \"{}\" SET {} WHERE \"{}\" = $1",
            self.name, assignments, self.id.name
        )
    }

    pub fn delete_sql(&self) -> String {
        format!(
            "DELETE FROM \"{}\" WHERE \"{}\" = $1",
            self.name, self.id.name
        )
    }
}
