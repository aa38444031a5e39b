//! Bundled sample datasets
//!
//! Every dataset is stored in the backend's response envelope,
//! `{ "data": { "<field>": ... } }`, so the same extraction is shared with
//! live API responses. A configured data directory overrides any file it
//! contains; missing files fall back to the copy embedded in the binary.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{DeskError, Result};
use crate::models::{Category, Order, Overview, Product, PromotionPlan, User};

/// A dataset the dashboard can load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dataset {
    Users,
    Products,
    Orders,
    Categories,
    Promotions,
    Overview,
}

impl Dataset {
    pub fn name(&self) -> &'static str {
        match self {
            Dataset::Users => "users",
            Dataset::Products => "products",
            Dataset::Orders => "orders",
            Dataset::Categories => "categories",
            Dataset::Promotions => "promotions",
            Dataset::Overview => "overview",
        }
    }

    /// File name inside a data directory
    pub fn file_name(&self) -> String {
        format!("{}.json", self.name())
    }

    /// Key under `data` holding the payload
    pub fn field(&self) -> &'static str {
        match self {
            Dataset::Promotions => "promotionPlans",
            other => other.name(),
        }
    }

    fn bundled(&self) -> &'static str {
        match self {
            Dataset::Users => include_str!("../../data/users.json"),
            Dataset::Products => include_str!("../../data/products.json"),
            Dataset::Orders => include_str!("../../data/orders.json"),
            Dataset::Categories => include_str!("../../data/categories.json"),
            Dataset::Promotions => include_str!("../../data/promotions.json"),
            Dataset::Overview => include_str!("../../data/overview.json"),
        }
    }
}

/// Pull `data.<field>` out of a backend envelope
pub fn extract<T: DeserializeOwned>(mut body: Value, field: &'static str) -> Result<T> {
    let payload = body
        .get_mut("data")
        .and_then(|data| data.get_mut(field))
        .map(Value::take)
        .ok_or_else(|| DeskError::Data {
            dataset: field,
            reason: format!("response has no data.{field}"),
        })?;

    serde_json::from_value(payload).map_err(|e| DeskError::Data {
        dataset: field,
        reason: e.to_string(),
    })
}

/// Where record sets are read from
#[derive(Debug, Clone, Default)]
pub struct DataSource {
    dir: Option<PathBuf>,
}

impl DataSource {
    /// Embedded datasets only
    pub fn bundled() -> Self {
        Self::default()
    }

    /// Prefer files in `dir`, falling back to the embedded copies
    pub fn with_dir(dir: Option<PathBuf>) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    pub fn load<T: DeserializeOwned>(&self, dataset: Dataset) -> Result<T> {
        let text = self.read(dataset)?;
        let body: Value = serde_json::from_str(&text).map_err(|e| DeskError::Data {
            dataset: dataset.field(),
            reason: e.to_string(),
        })?;
        extract(body, dataset.field())
    }

    fn read(&self, dataset: Dataset) -> Result<String> {
        if let Some(dir) = &self.dir {
            let path = dir.join(dataset.file_name());
            if path.exists() {
                info!("Loading {} from {}", dataset.name(), path.display());
                return Ok(fs::read_to_string(path)?);
            }
            debug!(
                "{} not found in {}, using bundled data",
                dataset.file_name(),
                dir.display()
            );
        }
        Ok(dataset.bundled().to_string())
    }

    pub fn users(&self) -> Result<Vec<User>> {
        self.load(Dataset::Users)
    }

    pub fn products(&self) -> Result<Vec<Product>> {
        self.load(Dataset::Products)
    }

    pub fn orders(&self) -> Result<Vec<Order>> {
        self.load(Dataset::Orders)
    }

    pub fn categories(&self) -> Result<Vec<Category>> {
        self.load(Dataset::Categories)
    }

    pub fn promotions(&self) -> Result<Vec<PromotionPlan>> {
        self.load(Dataset::Promotions)
    }

    pub fn overview(&self) -> Result<Overview> {
        self.load(Dataset::Overview)
    }
}
