//! Site settings repository.
//!
//! `site_settings` is a key/JSONB table holding the content the admin panel
//! edits: home banners, the About page, and the shipping configuration.
//! Shipping lives here server-side so checkout totals and label printing
//! read the same row.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use sqlx::types::Json;
use tracing::instrument;

use dona_onca_core::cart::{SenderInfo, ShippingConfig};
use dona_onca_core::Price;

use super::RepositoryError;

/// Setting key for the shipping configuration.
pub const SHIPPING_KEY: &str = "shipping";
/// Setting key for the home banners.
pub const BANNERS_KEY: &str = "banners";
/// Setting key for the About page content.
pub const ABOUT_KEY: &str = "about";

/// A home banner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Banner {
    pub image: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub link: Option<String>,
}

/// About page content.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AboutContent {
    pub title: String,
    pub body: String,
    pub team_photos: Vec<String>,
}

/// Repository for the `site_settings` table.
pub struct SettingsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SettingsRepository<'a> {
    /// Create a new settings repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Fetch a typed setting.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `DataCorruption` if the stored JSON does not match the type.
    #[instrument(skip(self))]
    pub async fn get<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<T>, RepositoryError> {
        let value = sqlx::query_scalar::<_, Json<serde_json::Value>>(
            "SELECT value FROM site_settings WHERE key = $1",
        )
        .bind(key)
        .fetch_optional(self.pool)
        .await?;

        match value {
            Some(Json(value)) => serde_json::from_value(value)
                .map(Some)
                .map_err(|e| RepositoryError::DataCorruption(format!("setting {key}: {e}"))),
            None => Ok(None),
        }
    }

    /// Upsert a typed setting.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `DataCorruption` if the value cannot be serialized.
    #[instrument(skip(self, value))]
    pub async fn put<T: Serialize + Sync>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<(), RepositoryError> {
        let value = serde_json::to_value(value)
            .map_err(|e| RepositoryError::DataCorruption(format!("setting {key}: {e}")))?;

        sqlx::query(
            "INSERT INTO site_settings (key, value) VALUES ($1, $2) \
             ON CONFLICT (key) DO UPDATE SET value = $2, updated_at = now()",
        )
        .bind(key)
        .bind(Json(value))
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// The shipping configuration, falling back to the launch defaults
    /// when the admin has not saved one yet.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn shipping_config(&self) -> Result<ShippingConfig, RepositoryError> {
        Ok(self
            .get::<ShippingConfig>(SHIPPING_KEY)
            .await?
            .unwrap_or_else(default_shipping_config))
    }
}

/// Launch defaults for shipping before the admin saves a config.
#[must_use]
pub fn default_shipping_config() -> ShippingConfig {
    ShippingConfig {
        flat_rate: Price::from_centavos(1990),
        free_above: Price::from_centavos(29900),
        sender: SenderInfo {
            name: "Dona Onça".to_string(),
            phone: String::new(),
            street: String::new(),
            number: String::new(),
            complement: None,
            neighborhood: String::new(),
            city: String::new(),
            state: String::new(),
            cep: String::new(),
        },
    }
}
