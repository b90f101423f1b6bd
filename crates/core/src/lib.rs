pub mod domain;
pub mod error;
pub mod rank;
pub mod storage;

pub mod config {
    use crate::storage::{BackendConfig, StoreConfig};
    use std::path::PathBuf;
    use std::time::Duration;

    pub const DEFAULT_STOCKS_KEY: &str = "sgx_stocks";
    pub const DEFAULT_DATA_FILE: &str = "data/stocks.json";
    const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 10;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub upstash_redis_rest_url: Option<String>,
        pub upstash_redis_rest_token: Option<String>,
        pub upstash_stocks_key: Option<String>,
        pub upstash_timeout_secs: Option<u64>,
        pub stocks_data_file: Option<String>,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                upstash_redis_rest_url: non_empty_var("UPSTASH_REDIS_REST_URL"),
                upstash_redis_rest_token: non_empty_var("UPSTASH_REDIS_REST_TOKEN"),
                upstash_stocks_key: non_empty_var("UPSTASH_STOCKS_KEY"),
                upstash_timeout_secs: std::env::var("UPSTASH_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse::<u64>().ok()),
                stocks_data_file: non_empty_var("STOCKS_DATA_FILE"),
                sentry_dsn: non_empty_var("SENTRY_DSN"),
            })
        }

        pub fn data_file(&self) -> PathBuf {
            PathBuf::from(
                self.stocks_data_file
                    .as_deref()
                    .unwrap_or(DEFAULT_DATA_FILE),
            )
        }

        /// Ordered backend list: remote first when configured, local file always.
        pub fn store_config(&self) -> StoreConfig {
            let mut backends = Vec::with_capacity(2);

            match (
                self.upstash_redis_rest_url.as_deref(),
                self.upstash_redis_rest_token.as_deref(),
            ) {
                (Some(url), Some(token)) => backends.push(BackendConfig::Upstash {
                    url: url.to_string(),
                    token: token.to_string(),
                    key: self
                        .upstash_stocks_key
                        .clone()
                        .unwrap_or_else(|| DEFAULT_STOCKS_KEY.to_string()),
                    timeout: Duration::from_secs(
                        self.upstash_timeout_secs
                            .unwrap_or(DEFAULT_REMOTE_TIMEOUT_SECS),
                    ),
                }),
                (Some(_), None) => {
                    tracing::warn!(
                        "UPSTASH_REDIS_REST_URL set without UPSTASH_REDIS_REST_TOKEN; remote store disabled"
                    );
                }
                _ => {}
            }

            backends.push(BackendConfig::File {
                path: self.data_file(),
            });

            StoreConfig { backends }
        }
    }

    fn non_empty_var(name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|s| !s.trim().is_empty())
    }

}
