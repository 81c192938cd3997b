use actix_multipart::Multipart;
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use uuid::Uuid;

use crate::{
    app_state::AppState, auth::AuthenticatedUser, errors::AppError,
    handlers::upload::read_file_field,
};

const FILE_FIELD: &str = "file";

#[get("/images/{id}")]
pub async fn get_image(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let image = state.image_service.get_image(&id.to_string()).await?;
    Ok(HttpResponse::Ok().json(image))
}

#[post("/images")]
pub async fn create_image(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let image = state.image_service.create_placeholder(&auth.0).await?;
    Ok(HttpResponse::Created().json(image))
}

/// Multipart upload binding the `file` part to an existing image.
#[post("/images/{id}")]
pub async fn upload_image(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    req: HttpRequest,
    payload: Multipart,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let file = read_file_field(
        &req,
        payload,
        FILE_FIELD,
        state.config.image_max_size_bytes,
    )
    .await?;

    let image = state
        .image_service
        .upload_image(&id.to_string(), file, &auth.0)
        .await?;
    Ok(HttpResponse::Created().json(image))
}
