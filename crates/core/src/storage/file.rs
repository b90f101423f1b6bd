use crate::domain::stock::StockRecord;
use crate::storage::StockBackend;
use anyhow::Context;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Local JSON file holding the whole collection.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl StockBackend for FileBackend {
    fn name(&self) -> &'static str {
        "file"
    }

    async fn load(&self) -> anyhow::Result<Option<Vec<StockRecord>>> {
        let text = match tokio::fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read {}", self.path.display()))
            }
        };

        let stocks = serde_json::from_str::<Vec<StockRecord>>(&text)
            .with_context(|| format!("malformed stock file {}", self.path.display()))?;
        Ok(Some(stocks))
    }

    async fn save(&self, stocks: &[StockRecord]) -> anyhow::Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }

        let json = serde_json::to_string_pretty(stocks).context("stock serialize failed")?;
        tokio::fs::write(&self.path, json)
            .await
            .with_context(|| format!("failed to write {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::defaults::default_stocks;
    use crate::domain::stock::Volatility;
    use crate::storage::StockStore;
    use serde_json::json;

    #[tokio::test]
    async fn missing_file_loads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::new(dir.path().join("stocks.json"));
        assert!(backend.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_creates_parent_directory_and_indents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("data").join("stocks.json");
        let backend = FileBackend::new(&path);

        backend.save(&default_stocks()).await.unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("[\n  {"));
        assert!(text.contains("\"c\": \"D05\""));
    }

    #[tokio::test]
    async fn round_trip_preserves_collection() {
        let dir = tempfile::tempdir().unwrap();
        let store = StockStore::new(vec![Box::new(FileBackend::new(
            dir.path().join("stocks.json"),
        ))]);

        let mut stocks = store.load().await;
        stocks.truncate(4);
        store.save(&stocks).await.unwrap();

        let reloaded = store.load().await;
        assert_eq!(reloaded, stocks);

        store.save(&reloaded).await.unwrap();
        assert_eq!(store.load().await, stocks);
    }

    #[tokio::test]
    async fn malformed_file_errors_and_store_serves_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stocks.json");
        std::fs::write(&path, "{ not json").unwrap();

        let backend = FileBackend::new(&path);
        assert!(backend.load().await.is_err());

        let store = StockStore::new(vec![Box::new(backend)]);
        assert_eq!(store.load().await, default_stocks());
    }

    #[tokio::test]
    async fn legacy_volatility_labels_load_and_survive_add() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stocks.json");

        let mut stored = serde_json::to_value(&default_stocks()[..3]).unwrap();
        stored[0]["vol"] = json!("Medium");
        std::fs::write(&path, serde_json::to_string_pretty(&stored).unwrap()).unwrap();

        let store = StockStore::new(vec![Box::new(FileBackend::new(&path))]);
        let loaded = store.load().await;
        assert_eq!(loaded.len(), 3);
        assert_eq!(loaded[0].volatility, Volatility::Other("Medium".to_string()));

        let body = json!({
            "n": "New Co", "c": "ZZ1", "e": 60, "s": 60, "g": 60, "y": 3.0,
            "vol": "Low", "f": "a", "d": "b", "gr": "c", "p": "d", "w": "e", "risk": "f"
        });
        store.add_stock(Some(&body)).await.unwrap();

        let on_disk: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let on_disk = on_disk.as_array().unwrap();
        assert_eq!(on_disk.len(), 4);
        assert_eq!(on_disk[0]["vol"], "Medium");
        assert_eq!(on_disk[3]["c"], "ZZ1");
    }
}
