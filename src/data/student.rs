use crate::error::{FieldTooLongSnafu, RosterResult};
use serde::{Deserialize, Serialize};
use snafu::ensure;
use uuid::Uuid;

/// Longest first or last name the `students` table accepts, in characters.
pub const MAX_NAME_LEN: usize = 50;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    #[serde(alias = "ID", alias = "Id")]
    pub id: Uuid,
    #[serde(alias = "FirstName")]
    pub first_name: String,
    #[serde(alias = "LastName")]
    pub last_name: String,
    #[serde(alias = "Program")]
    pub program: String,
}

/// The only fields a caller may set on an existing student. Has no id field, so an `id` in a PUT body is dropped as an unknown field.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StudentForm {
    #[serde(alias = "FirstName")]
    pub first_name: String,
    #[serde(alias = "LastName")]
    pub last_name: String,
    #[serde(alias = "Program")]
    pub program: String,
}

/// POST body. Unlike [`StudentForm`] the caller may pick the id.
#[derive(Deserialize, Debug, Clone)]
pub struct NewStudent {
    #[serde(default, alias = "ID", alias = "Id")]
    pub id: Option<Uuid>,
    #[serde(flatten)]
    pub form: StudentForm,
}

impl StudentForm {
    pub fn validate(&self) -> RosterResult<()> {
        for (field, value) in [("firstName", &self.first_name), ("lastName", &self.last_name)] {
            let len = value.chars().count();
            ensure!(
                len <= MAX_NAME_LEN,
                FieldTooLongSnafu {
                    field,
                    len,
                    max: MAX_NAME_LEN
                }
            );
        }

        Ok(())
    }

    pub fn into_student(self, id: Uuid) -> Student {
        let Self {
            first_name,
            last_name,
            program,
        } = self;

        Student {
            id,
            first_name,
            last_name,
            program,
        }
    }
}

impl NewStudent {
    /// Validates the fields and settles the id: a missing or nil id gets a fresh v4 UUID.
    pub fn into_student(self) -> RosterResult<Student> {
        self.form.validate()?;

        let id = match self.id {
            Some(id) if !id.is_nil() => id,
            _ => Uuid::new_v4(),
        };

        Ok(self.form.into_student(id))
    }
}

impl Student {
    /// Overwrites everything but the id.
    pub fn apply(&mut self, form: StudentForm) {
        self.first_name = form.first_name;
        self.last_name = form.last_name;
        self.program = form.program;
    }
}
