use std::sync::Arc;

use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::{
        domain::User,
        dto::{
            request::{CreateUserRequest, UsersQuery},
            response::{PaginatedResponse, UserDto},
        },
    },
    repositories::UserRepository,
};

pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Usernames are trimmed before the length rules apply.
    pub async fn create_user(&self, mut request: CreateUserRequest) -> AppResult<UserDto> {
        request.username = request.username.trim().to_string();
        request.validate()?;

        if self
            .repository
            .find_by_username(&request.username)
            .await?
            .is_some()
        {
            return Err(AppError::AlreadyExists(format!(
                "There is already an account with username '{}'",
                request.username
            )));
        }

        let user = self.repository.create(User::from_request(request)).await?;

        log::info!("Created user {} ({})", user.username, user.id);
        Ok(user.into())
    }

    pub async fn get_user(&self, id: &str) -> AppResult<UserDto> {
        let user = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id '{}' not found", id)))?;

        Ok(user.into())
    }

    pub async fn list_users(&self, query: UsersQuery) -> AppResult<PaginatedResponse<UserDto>> {
        query.validate()?;

        let ids = query.ids();
        let (users, total) = self
            .repository
            .find_paginated(ids.as_deref(), query.offset(), query.limit())
            .await?;

        Ok(PaginatedResponse {
            items: users.into_iter().map(UserDto::from).collect(),
            total,
            offset: query.offset(),
            limit: query.limit(),
        })
    }
}
