use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::dto::request::CreateUserRequest;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum UserRole {
    #[default]
    #[serde(rename = "ROLE_USER")]
    User,
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(default)]
    roles: Vec<UserRole>,
    /// Set by the external authentication layer; never part of any view.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(username: &str) -> Self {
        User {
            id: Uuid::new_v4().to_string(),
            username: username.to_string(),
            roles: Vec::new(),
            password_hash: None,
            provider: None,
            provider_id: None,
            created_at: Some(Utc::now()),
        }
    }

    pub fn from_request(request: CreateUserRequest) -> Self {
        let mut user = User::new(&request.username);
        user.set_roles(request.roles.unwrap_or_default());
        user.provider = request.provider;
        user.provider_id = request.provider_id;
        user
    }

    /// Stored roles plus the implicit `User` role, without duplicates.
    pub fn roles(&self) -> Vec<UserRole> {
        let mut roles = Vec::with_capacity(self.roles.len() + 1);
        for role in self.roles.iter().copied().chain(std::iter::once(UserRole::User)) {
            if !roles.contains(&role) {
                roles.push(role);
            }
        }
        roles
    }

    pub fn set_roles(&mut self, roles: Vec<UserRole>) {
        self.roles = roles;
    }

    pub fn has_role(&self, role: UserRole) -> bool {
        self.roles().contains(&role)
    }
}

#[cfg(test)]
impl User {
    pub fn test_user(username: &str) -> Self {
        User::new(username)
    }

    pub fn test_admin(username: &str) -> Self {
        let mut user = User::new(username);
        user.set_roles(vec![UserRole::Admin]);
        user
    }
}
