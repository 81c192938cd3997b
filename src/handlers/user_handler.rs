use actix_web::{get, post, web, HttpResponse};
use uuid::Uuid;

use crate::{
    app_state::AppState,
    auth::{require_admin, AuthenticatedUser},
    errors::AppError,
    models::dto::request::{CreateUserRequest, UsersQuery},
};

#[post("/users")]
pub async fn create_user(
    state: web::Data<AppState>,
    request: web::Json<CreateUserRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    require_admin(&auth.0)?;

    let user = state.user_service.create_user(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(user))
}

#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<AppState>,
    id: web::Path<Uuid>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let user = state.user_service.get_user(&id.to_string()).await?;
    Ok(HttpResponse::Ok().json(user))
}

#[get("/users")]
pub async fn list_users(
    state: web::Data<AppState>,
    query: web::Query<UsersQuery>,
    _auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let response = state.user_service.list_users(query.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}
