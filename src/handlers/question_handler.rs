use actix_web::{get, post, web, HttpResponse};
use uuid::Uuid;

use crate::{
    app_state::AppState, auth::AuthenticatedUser, errors::AppError,
    models::dto::request::CreateQuestionRequest,
};

#[post("/quizzes/{quiz_id}/questions")]
pub async fn create_question(
    state: web::Data<AppState>,
    quiz_id: web::Path<Uuid>,
    request: Result<web::Json<CreateQuestionRequest>, actix_web::Error>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let service = &state.question_service;
    let quiz = service
        .authorize_creation(&quiz_id.to_string(), &auth.0)
        .await?;

    // Payload errors only surface once the caller may write to the quiz.
    let request = request.map_err(|err| {
        err.as_error::<AppError>()
            .cloned()
            .unwrap_or_else(|| AppError::ValidationError(err.to_string()))
    })?;

    let response = service
        .create_in_quiz(&quiz, request.into_inner(), &auth.0)
        .await?;
    Ok(HttpResponse::Created().json(response))
}

#[get("/quizzes/{quiz_id}/questions")]
pub async fn list_questions(
    state: web::Data<AppState>,
    quiz_id: web::Path<Uuid>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let questions = state
        .question_service
        .list_questions(&quiz_id.to_string())
        .await?;
    Ok(HttpResponse::Ok().json(questions))
}
