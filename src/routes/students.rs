use crate::{
    data::{
        StudentStore,
        student::{NewStudent, Student, StudentForm},
    },
    error::{MalformedBodySnafu, MalformedIdSnafu, MissingStudentSnafu, RosterResult},
    routes::STUDENTS_ROOT,
    state::RosterState,
};
use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use snafu::{OptionExt, ResultExt};
use uuid::Uuid;

fn created(student: Student) -> Response {
    let location = format!("{STUDENTS_ROOT}/{}", student.id);
    (
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(student),
    )
        .into_response()
}

pub async fn get_students(State(state): State<RosterState>) -> RosterResult<Json<Vec<Student>>> {
    let students = state.find_all().await?;
    debug!(count = students.len(), "Listing students");
    Ok(Json(students))
}

pub async fn get_student(
    State(state): State<RosterState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> RosterResult<Json<Student>> {
    let Path(id) = id.context(MalformedIdSnafu)?;

    let student = state
        .find_by_id(id)
        .await?
        .context(MissingStudentSnafu { id })?;
    Ok(Json(student))
}

/// `POST /Students`. The body may carry its own id, which is used as-is.
pub async fn post_student(
    State(state): State<RosterState>,
    payload: Result<Json<NewStudent>, JsonRejection>,
) -> RosterResult<Response> {
    let Json(new_student) = payload.context(MalformedBodySnafu)?;
    let student = new_student.into_student()?;

    state.insert(&student).await?;
    info!(id = %student.id, "Created student");

    Ok(created(student))
}

/// `PUT /Students/{id}`. Inserts under the path id when nothing has it (201), otherwise overwrites the three
/// fields of the existing row (200).
pub async fn put_student(
    State(state): State<RosterState>,
    id: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<StudentForm>, JsonRejection>,
) -> RosterResult<Response> {
    let Path(id) = id.context(MalformedIdSnafu)?;
    let Json(form) = payload.context(MalformedBodySnafu)?;
    form.validate()?;

    if !state.exists(id).await? {
        let student = form.into_student(id);
        state.insert(&student).await?;
        info!(%id, "Created student through upsert");
        return Ok(created(student));
    }

    // can vanish between the existence check and here
    let mut student = state
        .find_by_id(id)
        .await?
        .context(MissingStudentSnafu { id })?;
    student.apply(form);
    state.update(&student).await?;
    info!(%id, "Updated student");

    Ok(Json(student).into_response())
}

pub async fn delete_student(
    State(state): State<RosterState>,
    id: Result<Path<Uuid>, PathRejection>,
) -> RosterResult<StatusCode> {
    let Path(id) = id.context(MalformedIdSnafu)?;

    let student = state
        .find_by_id(id)
        .await?
        .context(MissingStudentSnafu { id })?;
    state.delete(&student).await?;
    info!(%id, "Deleted student");

    Ok(StatusCode::NO_CONTENT)
}
