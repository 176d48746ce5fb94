use crate::{
    routes::students::{delete_student, get_student, get_students, post_student, put_student},
    state::RosterState,
};
use axum::{Router, routing::get};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

pub mod students;

pub const STUDENTS_ROOT: &str = "/Students";

const MAX_BODY_BYTES: usize = 64 * 1024;

pub fn router(state: RosterState) -> Router {
    Router::new()
        .route(STUDENTS_ROOT, get(get_students).post(post_student))
        .route(
            &format!("{STUDENTS_ROOT}/{{id}}"),
            get(get_student).put(put_student).delete(delete_student),
        )
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::memory::MemoryStudentStore;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode, header},
    };
    use std::sync::Arc;
    use tower::ServiceExt;

    #[tokio::test]
    async fn oversized_bodies_are_refused() {
        let app = router(RosterState::with_store(Arc::new(MemoryStudentStore::new())));
        let program = "x".repeat(MAX_BODY_BYTES);
        let body = format!(r#"{{"FirstName":"Ada","LastName":"Lovelace","Program":"{program}"}}"#);

        let request = Request::builder()
            .method(Method::POST)
            .uri(STUDENTS_ROOT)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::CONTENT_LENGTH, body.len())
            .body(Body::from(body))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn unknown_verbs_are_not_allowed() {
        let app = router(RosterState::with_store(Arc::new(MemoryStudentStore::new())));
        let request = Request::builder()
            .method(Method::PATCH)
            .uri(STUDENTS_ROOT)
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
