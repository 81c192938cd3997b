pub mod image_repository;
pub mod memory;
pub mod question_repository;
pub mod quiz_repository;
pub mod user_repository;

pub use image_repository::{ImageRepository, MongoImageRepository};
pub use memory::{
    InMemoryImageRepository, InMemoryQuestionRepository, InMemoryQuizRepository,
    InMemoryUserRepository,
};
pub use question_repository::{MongoQuestionRepository, QuestionRepository};
pub use quiz_repository::{MongoQuizRepository, QuizRepository};
pub use user_repository::{MongoUserRepository, UserRepository};

use mongodb::{
    bson::doc,
    error::{ErrorKind, WriteFailure},
    options::IndexOptions,
    Collection, IndexModel,
};

use crate::errors::{AppError, AppResult};

const DUPLICATE_KEY: i32 = 11000;

/// Maps a unique-index violation to `AlreadyExists`, anything else to a database error.
/// `what` receives the field of the violated index when the server names it.
pub(crate) fn map_insert_error(
    err: mongodb::error::Error,
    what: impl FnOnce(Option<&str>) -> String,
) -> AppError {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY => {
            AppError::AlreadyExists(what(duplicate_key_field(&write_error.message)))
        }
        _ => err.into(),
    }
}

/// Reads the field out of `E11000 ... index: username_unique dup key: ...`.
fn duplicate_key_field(message: &str) -> Option<&str> {
    let index = message.split("index: ").nth(1)?.split_whitespace().next()?;
    Some(index.strip_suffix("_unique").unwrap_or(index))
}

pub(crate) async fn ensure_unique_index<T>(
    collection: &Collection<T>,
    field: &str,
) -> AppResult<()>
where
    T: Send + Sync,
{
    log::info!(
        "Creating unique index on '{}' for {} collection",
        field,
        collection.name()
    );

    let index = IndexModel::builder()
        .keys(doc! { field: 1 })
        .options(
            IndexOptions::builder()
                .unique(true)
                .name(format!("{}_unique", field))
                .build(),
        )
        .build();

    collection.create_index(index).await?;
    Ok(())
}
