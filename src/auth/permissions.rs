use crate::{
    auth::Claims,
    errors::{AppError, AppResult},
    models::domain::{user::UserRole, Image, Quiz},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Creating children of the resource (e.g. questions of a quiz).
    Create,
    Update,
    Delete,
}

/// A resource with a single author, checked by [`is_authorized`].
pub trait Authored {
    fn author_id(&self) -> &str;
}

impl Authored for Quiz {
    fn author_id(&self) -> &str {
        &self.created_by_user_id
    }
}

impl Authored for Image {
    fn author_id(&self) -> &str {
        &self.created_by_user_id
    }
}

/// Every action on an authored resource is reserved to its author.
pub fn is_authorized<R: Authored + ?Sized>(action: Action, resource: &R, actor: &Claims) -> bool {
    match action {
        Action::Create | Action::Update | Action::Delete => resource.author_id() == actor.sub,
    }
}

pub fn require_admin(claims: &Claims) -> AppResult<()> {
    if !claims.has_role(UserRole::Admin) {
        return Err(AppError::Unauthorized(
            "Only admins can perform this action".to_string(),
        ));
    }
    Ok(())
}
