use std::sync::Arc;

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::{
    auth::{is_authorized, Action, Claims},
    config::Config,
    errors::{AppError, AppResult},
    models::{
        domain::{Image, ImageFile},
        dto::response::ImageDto,
    },
    repositories::ImageRepository,
    services::{FileStorage, ImageValidator, UploadedFile},
};

pub const UPLOAD_DENIED: &str = "You must be the resource author to upload a file for this image";

pub struct ImageService {
    repository: Arc<dyn ImageRepository>,
    storage: Arc<dyn FileStorage>,
    validator: ImageValidator,
    config: Arc<Config>,
}

impl ImageService {
    pub fn new(
        repository: Arc<dyn ImageRepository>,
        storage: Arc<dyn FileStorage>,
        config: Arc<Config>,
    ) -> Self {
        Self {
            repository,
            storage,
            validator: ImageValidator::new(config.image_max_size_bytes),
            config,
        }
    }

    async fn find_image(&self, id: &str) -> AppResult<Image> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Image with id '{}' not found", id)))
    }

    pub async fn get_image(&self, id: &str) -> AppResult<ImageDto> {
        let image = self.find_image(id).await?;
        Ok(ImageDto::from_image(image, &self.config))
    }

    /// Creates an empty image owned by the caller, to be bound by a later upload.
    pub async fn create_placeholder(&self, actor: &Claims) -> AppResult<ImageDto> {
        let image = self
            .repository
            .create(Image::new_placeholder(&actor.sub))
            .await?;

        log::info!("User {} created placeholder image {}", actor.sub, image.id);
        Ok(ImageDto::from_image(image, &self.config))
    }

    /// Binds an uploaded file to an existing image.
    ///
    /// Fails with `Unauthorized` unless the caller authored the image, and
    /// with `Unprocessable` carrying every violation if the file is not
    /// acceptable. Storage is only written once both checks pass.
    pub async fn upload_image(
        &self,
        id: &str,
        file: Option<UploadedFile>,
        actor: &Claims,
    ) -> AppResult<ImageDto> {
        let mut image = self.find_image(id).await?;

        if !is_authorized(Action::Update, &image, actor) {
            return Err(AppError::Unauthorized(UPLOAD_DENIED.to_string()));
        }

        let violations = self.validator.validate(file.as_ref());
        if !violations.is_empty() {
            return Err(AppError::Unprocessable(violations));
        }
        let Some(file) = file else {
            return Err(AppError::InternalError("Validated upload is missing".to_string()));
        };

        let file_name = format!(
            "{}.{}",
            Uuid::new_v4(),
            ImageValidator::storage_extension(&file)
        );
        let checksum = format!("{:x}", Sha256::digest(&file.bytes));

        self.storage.store(&file_name, &file.bytes).await?;

        let previous = image.bind(ImageFile {
            file_name: file_name.clone(),
            original_name: file.original_name,
            mime_type: file.content_type.unwrap_or_default(),
            size: file.size as i64,
            checksum,
        });

        let image = match self.repository.update(image).await {
            Ok(image) => image,
            Err(err) => {
                self.remove_file(&file_name).await;
                return Err(err);
            }
        };

        if let Some(previous) = previous {
            self.remove_file(&previous.file_name).await;
        }

        log::info!("User {} uploaded {} to image {}", actor.sub, file_name, image.id);
        Ok(ImageDto::from_image(image, &self.config))
    }

    /// Deletes an image record together with its stored file.
    pub async fn remove_image(&self, id: &str) -> AppResult<()> {
        let image = self.find_image(id).await?;
        self.repository.delete(&image.id).await?;

        if let Some(file) = image.file {
            self.remove_file(&file.file_name).await;
        }
        Ok(())
    }

    async fn remove_file(&self, file_name: &str) {
        if let Err(err) = self.storage.remove(file_name).await {
            log::warn!("Failed to remove stored file {}: {}", file_name, err);
        }
    }
}
