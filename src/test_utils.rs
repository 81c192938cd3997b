#[cfg(test)]
pub mod fixtures {
    use std::sync::Arc;

    use tempfile::TempDir;

    use crate::{
        app_state::{AppState, Repositories},
        auth::JwtService,
        config::Config,
        models::domain::User,
        repositories::UserRepository,
        services::LocalFileStorage,
    };

    /// App state over in-memory repositories and a throwaway upload directory.
    /// Keep the returned `TempDir` alive for as long as the state is used.
    pub struct TestContext {
        pub state: AppState,
        pub repositories: Repositories,
        pub jwt: JwtService,
        pub upload_dir: TempDir,
    }

    impl TestContext {
        pub async fn new() -> Self {
            let upload_dir = tempfile::tempdir().expect("temp upload dir");
            let mut config = Config::test_config();
            config.upload_dir = upload_dir.path().to_path_buf();

            let storage = LocalFileStorage::new(upload_dir.path())
                .await
                .expect("local storage");
            let jwt = JwtService::new(&config.jwt_secret, config.jwt_expiration_hours);
            let repositories = Repositories::in_memory();
            let state =
                AppState::from_parts(config, repositories.clone(), Arc::new(storage), None);

            Self {
                state,
                repositories,
                jwt,
                upload_dir,
            }
        }

        pub async fn user(&self, username: &str) -> User {
            self.repositories
                .users
                .create(User::test_user(username))
                .await
                .expect("create user")
        }

        pub async fn admin(&self, username: &str) -> User {
            self.repositories
                .users
                .create(User::test_admin(username))
                .await
                .expect("create admin")
        }

        pub fn bearer(&self, user: &User) -> (&'static str, String) {
            let token = self.jwt.create_token(user).expect("token");
            ("Authorization", format!("Bearer {}", token))
        }
    }
}

#[cfg(test)]
pub mod multipart {
    pub const BOUNDARY: &str = "----quizforge-test-boundary";

    pub struct Part<'a> {
        name: &'a str,
        file_name: Option<&'a str>,
        content_type: Option<&'a str>,
        bytes: &'a [u8],
    }

    impl<'a> Part<'a> {
        pub fn text(name: &'a str, value: &'a str) -> Self {
            Part {
                name,
                file_name: None,
                content_type: None,
                bytes: value.as_bytes(),
            }
        }

        pub fn file(name: &'a str, file_name: &'a str, content_type: &'a str, bytes: &'a [u8]) -> Self {
            Part {
                name,
                file_name: Some(file_name),
                content_type: Some(content_type),
                bytes,
            }
        }
    }

    /// Returns the `content-type` header value and the encoded body.
    pub fn multipart_body(parts: &[Part<'_>]) -> (String, Vec<u8>) {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            let disposition = match part.file_name {
                Some(file_name) => format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    part.name, file_name
                ),
                None => format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.name),
            };
            body.extend_from_slice(disposition.as_bytes());
            if let Some(content_type) = part.content_type {
                body.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
            }
            body.extend_from_slice(b"\r\n");
            body.extend_from_slice(part.bytes);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

        (format!("multipart/form-data; boundary={}", BOUNDARY), body)
    }
}

#[cfg(test)]
pub mod test_helpers {
    use actix_web::http::StatusCode;

    /// Asserts that a status code represents success (2xx)
    pub fn assert_success_status(status: StatusCode) {
        assert!(
            status.is_success(),
            "Expected success status, got: {}",
            status
        );
    }
}
