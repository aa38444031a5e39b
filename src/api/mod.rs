//! Marketplace backend API
//!
//! The [`MarketplaceApi`] trait is the seam between the dashboard and the
//! HTTP backend; [`ApiClient`] is the reqwest implementation and tests use
//! the generated `MockMarketplaceApi`.

pub mod client;
pub mod error_handler;

pub use client::ApiClient;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;
use crate::models::{Category, Product, ProductPatch, PromotionPlan};

/// Product condition as accepted by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Condition {
    #[default]
    New,
    Used,
    Refurbished,
}

impl Condition {
    pub fn all() -> &'static [Condition] {
        &[Condition::New, Condition::Used, Condition::Refurbished]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::New => "new",
            Condition::Used => "used",
            Condition::Refurbished => "refurbished",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Condition::New => Condition::Used,
            Condition::Used => Condition::Refurbished,
            Condition::Refurbished => Condition::New,
        }
    }
}

impl std::str::FromStr for Condition {
    type Err = crate::error::DeskError;

    fn from_str(s: &str) -> Result<Self> {
        Condition::all()
            .iter()
            .find(|c| c.as_str() == s)
            .copied()
            .ok_or_else(|| {
                crate::error::DeskError::InvalidInput(format!(
                    "Unknown condition '{s}' (expected new, used, refurbished)"
                ))
            })
    }
}

/// An image read from disk, ready for upload
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    /// MIME type guessed from the file extension
    pub fn mime(&self) -> &'static str {
        let ext = self
            .file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            "png" => "image/png",
            "webp" => "image/webp",
            "gif" => "image/gif",
            _ => "application/octet-stream",
        }
    }
}

/// Validated product creation payload, sent as multipart form data
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category_id: String,
    pub subcategory: String,
    pub condition: Condition,
    pub images: Vec<ImageUpload>,
    /// Promotion plan type; `None` for a free listing
    pub promotion_plan: Option<String>,
}

/// `POST /payments/initialize` body
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub email: String,
    pub amount: f64,
    pub product_id: String,
    pub plan_type: String,
}

/// Operations the dashboard needs from the marketplace backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketplaceApi: Send + Sync {
    async fn categories(&self) -> Result<Vec<Category>>;

    async fn promotions(&self) -> Result<Vec<PromotionPlan>>;

    async fn create_product(&self, product: NewProduct) -> Result<Product>;

    async fn update_product(&self, id: &str, patch: ProductPatch) -> Result<Product>;

    async fn delete_product(&self, id: &str) -> Result<()>;

    /// Start a payment, returning the gateway authorization URL
    async fn initialize_payment(&self, request: PaymentRequest) -> Result<String>;

    /// Transaction status for a gateway reference, e.g. `success`
    async fn verify_payment(&self, reference: &str) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_mime() {
        let image = |name: &str| ImageUpload {
            file_name: name.to_string(),
            bytes: Vec::new(),
        };
        assert_eq!(image("shoe.JPG").mime(), "image/jpeg");
        assert_eq!(image("shoe.png").mime(), "image/png");
        assert_eq!(image("README").mime(), "application/octet-stream");
    }

    #[test]
    fn test_payment_request_shape() {
        let body = serde_json::to_value(PaymentRequest {
            email: "seller@example.com".into(),
            amount: 50.0,
            product_id: "p1".into(),
            plan_type: "premium".into(),
        })
        .unwrap();
        assert_eq!(body["productId"], "p1");
        assert_eq!(body["planType"], "premium");
        assert_eq!(body["amount"], 50.0);
    }

    #[test]
    fn test_condition_parse_and_cycle() {
        assert_eq!("used".parse::<Condition>().unwrap(), Condition::Used);
        assert!("broken".parse::<Condition>().is_err());
        assert_eq!(Condition::Refurbished.next(), Condition::New);
    }
}
