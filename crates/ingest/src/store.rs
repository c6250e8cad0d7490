//! Remote batch stores
//!
//! `BatchStore` is the logical `insert(table, rows)` interface the writer
//! dispatches to. `ClickHouseStore` implements it over the ClickHouse HTTP
//! interface: the batch buffer is POSTed verbatim as `CSVWithNames`, so the
//! header row assembled by the serializer doubles as the column list.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StoreError;

/// Default ClickHouse HTTP port
pub const DEFAULT_PORT: u16 = 8123;

/// Default insert timeout
pub const DEFAULT_INSERT_TIMEOUT: Duration = Duration::from_secs(30);

/// Logical insert interface for a telemetry store
#[async_trait]
pub trait BatchStore: Send + Sync {
    /// Store name used in logs and metrics
    fn name(&self) -> &str;

    /// Insert one batch buffer (header row + records) into `table`
    async fn insert(&self, table: &str, buffer: Bytes) -> Result<(), StoreError>;
}

/// Configuration for a ClickHouse-backed store
#[derive(Debug, Clone)]
pub struct ClickHouseStoreConfig {
    /// Store name used in logs and metrics
    pub name: String,

    /// URL scheme, `http` or `https`
    pub protocol: String,

    /// ClickHouse host
    pub host: String,

    /// ClickHouse HTTP port
    pub port: u16,

    /// Username for basic auth
    pub username: String,

    /// Password for basic auth
    pub password: String,

    /// Whether the server should ack only after the query fully completed
    pub wait_end_of_query: bool,

    /// Whether async inserts should be awaited server-side
    pub wait_for_async_insert: bool,

    /// Per-insert timeout (aborts the in-flight request)
    pub insert_timeout: Duration,
}

impl Default for ClickHouseStoreConfig {
    fn default() -> Self {
        Self {
            name: "clickhouse".into(),
            protocol: "http".into(),
            host: "localhost".into(),
            port: DEFAULT_PORT,
            username: "default".into(),
            password: String::new(),
            wait_end_of_query: true,
            wait_for_async_insert: true,
            insert_timeout: DEFAULT_INSERT_TIMEOUT,
        }
    }
}

impl ClickHouseStoreConfig {
    /// Set the store name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the endpoint host and port
    pub fn with_endpoint(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        self
    }

    /// Set basic auth credentials
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = username.into();
        self.password = password.into();
        self
    }

    /// Set the per-insert timeout
    pub fn with_insert_timeout(mut self, timeout: Duration) -> Self {
        self.insert_timeout = timeout;
        self
    }
}

/// Batch store backed by the ClickHouse HTTP interface
pub struct ClickHouseStore {
    client: reqwest::Client,
    config: ClickHouseStoreConfig,
}

impl std::fmt::Debug for ClickHouseStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClickHouseStore")
            .field("name", &self.config.name)
            .field("host", &self.config.host)
            .field("port", &self.config.port)
            .finish()
    }
}

impl ClickHouseStore {
    /// Create a store from config
    pub fn new(config: ClickHouseStoreConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.insert_timeout)
            .build()
            .unwrap_or_default();

        Self { client, config }
    }

    /// Build the insert URL for `table`
    fn insert_url(&self, table: &str) -> String {
        let query = format!("INSERT INTO {} FORMAT CSVWithNames", table);
        format!(
            "{}://{}:{}/?query={}&wait_end_of_query={}&wait_for_async_insert={}",
            self.config.protocol,
            self.config.host,
            self.config.port,
            urlencoding::encode(&query),
            u8::from(self.config.wait_end_of_query),
            u8::from(self.config.wait_for_async_insert),
        )
    }
}

#[async_trait]
impl BatchStore for ClickHouseStore {
    fn name(&self) -> &str {
        &self.config.name
    }

    async fn insert(&self, table: &str, buffer: Bytes) -> Result<(), StoreError> {
        let url = self.insert_url(table);

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .body(buffer)
            .send()
            .await
            .map_err(|error| StoreError::Connection(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        tracing::debug!(store = %self.config.name, table, "insert acknowledged");
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;
