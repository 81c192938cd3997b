pub mod health_handler;
pub mod image_handler;
pub mod question_handler;
pub mod quiz_handler;
pub mod upload;
pub mod user_handler;

use actix_web::web;
use actix_web_httpauth::middleware::HttpAuthentication;

use crate::{auth::validate_bearer, errors::AppError};

/// Registers every route. Everything under `/api` requires a bearer token.
pub fn configure(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(format!("Invalid JSON payload: {}", err)).into()
    });
    let query_config = web::QueryConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(format!("Invalid query string: {}", err)).into()
    });

    cfg.app_data(json_config)
        .app_data(query_config)
        .service(health_handler::health_check)
        .service(health_handler::health_check_ready)
        .service(
            web::scope("/api")
                .wrap(HttpAuthentication::bearer(validate_bearer))
                .service(image_handler::get_image)
                .service(image_handler::create_image)
                .service(image_handler::upload_image)
                .service(question_handler::create_question)
                .service(question_handler::list_questions)
                .service(quiz_handler::create_quiz)
                .service(quiz_handler::get_quiz)
                .service(quiz_handler::delete_quiz)
                .service(user_handler::list_users)
                .service(user_handler::get_user)
                .service(user_handler::create_user),
        );
}
