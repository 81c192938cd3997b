use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::errors::{AppError, AppResult};

/// Where bound image files are written. Names are flat file names chosen by
/// the image service, never client-provided paths.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FileStorage: Send + Sync {
    async fn store(&self, file_name: &str, bytes: &[u8]) -> AppResult<()>;
    async fn remove(&self, file_name: &str) -> AppResult<()>;
}

pub struct LocalFileStorage {
    root: PathBuf,
}

impl LocalFileStorage {
    pub async fn new(root: impl Into<PathBuf>) -> AppResult<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        log::info!("Storing uploads in {}", root.display());
        Ok(Self { root })
    }

    fn path_for(&self, file_name: &str) -> AppResult<PathBuf> {
        let is_flat = Path::new(file_name)
            .file_name()
            .map(|name| name == file_name)
            .unwrap_or(false);

        if !is_flat {
            return Err(AppError::StorageError(format!(
                "Refusing to use '{}' as a storage file name",
                file_name
            )));
        }

        Ok(self.root.join(file_name))
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn store(&self, file_name: &str, bytes: &[u8]) -> AppResult<()> {
        let path = self.path_for(file_name)?;
        tokio::fs::write(&path, bytes).await?;
        Ok(())
    }

    async fn remove(&self, file_name: &str) -> AppResult<()> {
        let path = self.path_for(file_name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
