use std::future::{ready, Ready};

use actix_web::{dev::ServiceRequest, web, FromRequest, HttpMessage, HttpRequest};
use actix_web_httpauth::extractors::bearer::BearerAuth;

use crate::{
    auth::{Claims, JwtService},
    errors::AppError,
};

/// Bearer validator for `HttpAuthentication::bearer`. Valid claims end up in
/// the request extensions.
pub async fn validate_bearer(
    req: ServiceRequest,
    credentials: BearerAuth,
) -> Result<ServiceRequest, (actix_web::Error, ServiceRequest)> {
    let Some(jwt_service) = req.app_data::<web::Data<JwtService>>().cloned() else {
        log::error!("JwtService missing from app data");
        return Err((
            AppError::InternalError("JWT service not configured".to_string()).into(),
            req,
        ));
    };

    match jwt_service.validate_token(credentials.token()) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            Ok(req)
        }
        Err(err) => {
            log::debug!("Rejected bearer token for {}: {}", req.path(), err);
            Err((err.into(), req))
        }
    }
}

// Extractor for authenticated user in handlers
pub struct AuthenticatedUser(pub Claims);

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let claims = req
            .extensions()
            .get::<Claims>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()));

        ready(claims.map(AuthenticatedUser))
    }
}
