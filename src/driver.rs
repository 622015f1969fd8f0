use crate::config::{AppConfig, DEFAULT_USER_DRAWS_LIMIT};
use crate::database::{
    field_filter, id_filter, Document, DocumentStore, PgDocumentStore, ID_FIELD,
};
use crate::error::{DriverError, DriverResult};
use crate::models::{Draw, User};
use crate::registry::DrawRegistry;
use serde::ser::Error as _;
use serde_json::Value;
use tracing::{debug, error, info};

pub const DRAWS_COLLECTION: &str = "draws";
pub const USERS_COLLECTION: &str = "users";

/// Maps stored documents to draws and users
pub struct PersistenceDriver<S> {
    store: S,
    registry: DrawRegistry,
    user_draws_limit: usize,
}

impl PersistenceDriver<PgDocumentStore> {
    /// Connect to PostgreSQL and run migrations.
    ///
    /// Connection failures are logged and yield `None`.
    pub async fn connect(config: &AppConfig) -> Option<Self> {
        match PgDocumentStore::connect(&config.store).await {
            Ok(store) => {
                info!(
                    "Connected to document store (max connections: {})",
                    config.store.max_connections
                );
                Some(
                    Self::new(store, DrawRegistry::builtin())
                        .with_user_draws_limit(config.user_draws_limit),
                )
            }
            Err(e) => {
                error!("Impossible to connect to the document store: {}", e);
                None
            }
        }
    }
}

impl<S: DocumentStore> PersistenceDriver<S> {
    pub fn new(store: S, registry: DrawRegistry) -> Self {
        Self {
            store,
            registry,
            user_draws_limit: DEFAULT_USER_DRAWS_LIMIT,
        }
    }

    pub fn with_user_draws_limit(mut self, limit: usize) -> Self {
        self.user_draws_limit = limit;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn registry(&self) -> &DrawRegistry {
        &self.registry
    }

    /// Save a draw, writing the store-assigned id back onto it
    pub async fn save_draw(&self, draw: &mut Draw) -> DriverResult<String> {
        let document = draw.to_document()?;
        let id = self.store.save(DRAWS_COLLECTION, document).await?;
        draw.set_id(id.clone());
        debug!("Saved {} {}", draw.draw_type(), id);
        Ok(id)
    }

    /// Load a draw by id; `None` when missing or not rebuildable
    pub async fn load_draw(&self, id: &str) -> DriverResult<Option<Draw>> {
        let document = self.store.find_one(DRAWS_COLLECTION, &id_filter(id)).await?;
        debug!("Retrieved draw document {}: found={}", id, document.is_some());
        Ok(document.and_then(|d| self.build_draw(d)))
    }

    /// Rebuild a draw from its document, logging and discarding failures
    pub fn build_draw(&self, document: Document) -> Option<Draw> {
        let id = match document.get(ID_FIELD) {
            Some(Value::String(id)) => id.clone(),
            _ => "<unsaved>".to_string(),
        };

        match self.registry.build(document) {
            Ok(draw) => Some(draw),
            Err(e) => {
                error!(draw_id = %id, "Error when decoding a draw: {}", e);
                None
            }
        }
    }

    /// Draws owned by `user_id`, skipping any that fail to build.
    ///
    /// `limit` defaults to the configured user draws limit.
    pub async fn get_user_draws(
        &self,
        user_id: &str,
        limit: Option<usize>,
    ) -> DriverResult<Vec<Draw>> {
        let limit = limit.unwrap_or(self.user_draws_limit);
        let documents = self
            .store
            .find(DRAWS_COLLECTION, &field_filter("owner", user_id), limit)
            .await?;
        let matched = documents.len();

        let draws: Vec<Draw> = documents
            .into_iter()
            .filter_map(|d| self.build_draw(d))
            .collect();

        debug!(
            "Found {} draws owned by {} ({} matched)",
            draws.len(),
            user_id,
            matched
        );
        Ok(draws)
    }

    /// Save a user that must not exist yet
    pub async fn create_user(&self, user: &User) -> DriverResult<String> {
        if self
            .store
            .find_one(USERS_COLLECTION, &id_filter(&user.id))
            .await?
            .is_some()
        {
            debug!("User {} already exists", user.id);
            return Err(DriverError::UserExists(user.id.clone()));
        }
        self.save_user(user).await
    }

    pub async fn save_user(&self, user: &User) -> DriverResult<String> {
        let document = into_document(serde_json::to_value(user)?)?;
        let id = self.store.save(USERS_COLLECTION, document).await?;
        debug!("Saved user {}", id);
        Ok(id)
    }

    pub async fn load_user(&self, id: &str) -> DriverResult<Option<User>> {
        let document = self.store.find_one(USERS_COLLECTION, &id_filter(id)).await?;
        debug!("Retrieved user document {}: found={}", id, document.is_some());

        document
            .map(|d| serde_json::from_value(Value::Object(d)))
            .transpose()
            .map_err(DriverError::from)
    }
}

/// Objects become documents; anything else is a serialization error
fn into_document(value: Value) -> DriverResult<Document> {
    match value {
        Value::Object(document) => Ok(document),
        other => Err(DriverError::Serialization(serde_json::Error::custom(
            format!("expected a JSON object, got {}", other),
        ))),
    }
}
