use std::time::Duration;

use mongodb::{
    bson::doc,
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client, Collection,
};

use crate::{config::Config, errors::AppResult};

/// Collection names, one per stored entity.
pub mod collections {
    pub const USERS: &str = "users";
    pub const QUIZZES: &str = "quizzes";
    pub const QUESTIONS: &str = "questions";
    pub const IMAGES: &str = "images";
}

const APP_NAME: &str = "quizforge-server";

/// Handle on the configured MongoDB database. Cheap to clone.
#[derive(Clone)]
pub struct Database {
    inner: mongodb::Database,
}

fn client_options_for(mut options: ClientOptions) -> ClientOptions {
    options.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).build());
    options.app_name = Some(APP_NAME.to_string());
    options.max_pool_size = Some(10);
    options.min_pool_size = Some(2);
    options.connect_timeout = Some(Duration::from_secs(5));
    options.server_selection_timeout = Some(Duration::from_secs(5));
    options
}

impl Database {
    /// Connects and pings once, so a bad connection string fails at start-up.
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let options = client_options_for(ClientOptions::parse(&config.mongo_conn_string).await?);
        let client = Client::with_options(options)?;

        let db = Self {
            inner: client.database(&config.mongo_db_name),
        };
        db.ping().await?;

        log::info!("Connected to MongoDB database '{}'", db.name());
        Ok(db)
    }

    pub fn name(&self) -> &str {
        self.inner.name()
    }

    pub fn collection<T>(&self, name: &str) -> Collection<T>
    where
        T: Send + Sync,
    {
        self.inner.collection(name)
    }

    /// Round trip used by `/health/ready`.
    pub async fn ping(&self) -> AppResult<()> {
        self.inner.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
