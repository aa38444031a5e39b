//! Product submission with optional paid promotion
//!
//! Flow:
//! 1. Validate the form locally (images, required fields, price)
//! 2. Create the product as multipart form data
//! 3. For a paid plan, initialize a payment and hand back the gateway
//!    authorization URL; the product id is kept as the pending record
//! 4. When the operator returns from the gateway, reconcile the return URL
//!    against the backend before clearing the pending record

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{info, warn};
use url::Url;

use super::session::SessionContext;
use crate::api::{Condition, ImageUpload, MarketplaceApi, NewProduct, PaymentRequest};
use crate::error::{DeskError, Result};
use crate::models::{Category, PromotionPlan};

pub const MAX_IMAGES: usize = 5;
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

/// Add-product form state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductForm {
    pub name: String,
    pub description: String,
    pub condition: Condition,
    pub category_id: String,
    pub subcategory: String,
    /// Raw price text as typed
    pub price: String,
    pub images: Vec<PathBuf>,
    /// Promotion plan type; `None` lists the product for free
    pub promotion: Option<String>,
}

impl ProductForm {
    /// Attach an image, enforcing the count and size limits
    pub fn add_image(&mut self, path: impl Into<PathBuf>) -> Result<()> {
        let path = path.into();
        if self.images.len() >= MAX_IMAGES {
            return Err(DeskError::Validation(format!(
                "Maximum {MAX_IMAGES} images allowed"
            )));
        }
        check_image_size(&path)?;
        self.images.push(path);
        Ok(())
    }

    pub fn remove_image(&mut self, index: usize) -> Option<PathBuf> {
        (index < self.images.len()).then(|| self.images.remove(index))
    }

    pub fn reset(&mut self) {
        *self = ProductForm::default();
    }

    /// Check every field before any request is sent
    pub fn validate(&self, categories: &[Category]) -> Result<f64> {
        if self.images.is_empty() {
            return Err(DeskError::Validation(
                "Please upload at least one product image".into(),
            ));
        }
        if self.images.len() > MAX_IMAGES {
            return Err(DeskError::Validation(format!(
                "Maximum {MAX_IMAGES} images allowed"
            )));
        }
        for image in &self.images {
            check_image_size(image)?;
        }

        require(&self.name, "Product name")?;
        require(&self.description, "Description")?;
        require(&self.category_id, "Category")?;
        require(&self.subcategory, "Subcategory")?;
        require(&self.price, "Price")?;

        let price: f64 = self
            .price
            .trim()
            .parse()
            .ok()
            .filter(|p: &f64| p.is_finite() && *p >= 0.0)
            .ok_or_else(|| {
                DeskError::Validation(format!("Price must be a positive number, got '{}'", self.price))
            })?;

        let category = categories
            .iter()
            .find(|c| c.id == self.category_id)
            .ok_or_else(|| DeskError::Validation("Select a valid category".into()))?;
        if !category.has_subcategory(&self.subcategory) {
            return Err(DeskError::Validation(format!(
                "'{}' is not a subcategory of {}",
                self.subcategory, category.name
            )));
        }

        Ok(price)
    }

    /// Validate and read images into an upload payload
    pub fn build(&self, categories: &[Category]) -> Result<NewProduct> {
        let price = self.validate(categories)?;
        let images = self
            .images
            .iter()
            .map(|path| read_image(path))
            .collect::<Result<Vec<_>>>()?;

        Ok(NewProduct {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            price,
            category_id: self.category_id.clone(),
            subcategory: self.subcategory.clone(),
            condition: self.condition,
            images,
            promotion_plan: self.promotion.clone(),
        })
    }
}

fn require(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(DeskError::Validation(format!("{field} is required")));
    }
    Ok(())
}

fn check_image_size(path: &Path) -> Result<()> {
    let metadata = fs::metadata(path).map_err(|e| {
        DeskError::Validation(format!("Cannot read image {}: {}", path.display(), e))
    })?;
    if metadata.len() > MAX_IMAGE_BYTES {
        return Err(DeskError::Validation(
            "Each image should be less than 10MB".into(),
        ));
    }
    Ok(())
}

fn read_image(path: &Path) -> Result<ImageUpload> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    Ok(ImageUpload {
        file_name,
        bytes: fs::read(path)?,
    })
}

/// Result of a successful submission
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Listed for free; the form should reset
    Created { product_id: String },
    /// Paid plan chosen; the operator must complete payment at the URL
    Redirect {
        product_id: String,
        authorization_url: String,
    },
}

impl SubmitOutcome {
    pub fn product_id(&self) -> &str {
        match self {
            SubmitOutcome::Created { product_id } | SubmitOutcome::Redirect { product_id, .. } => {
                product_id
            }
        }
    }

    /// Remember a redirected product as pending payment
    pub fn record(&self, session: &mut SessionContext) -> Result<()> {
        if let SubmitOutcome::Redirect { product_id, .. } = self {
            session.set_pending_product(product_id.clone());
            session.save()?;
        }
        Ok(())
    }
}

/// Releases the busy flag when dropped
#[derive(Debug)]
pub struct SubmitGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for SubmitGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::SeqCst);
    }
}

/// Single-flight product submitter
#[derive(Debug, Clone, Default)]
pub struct Submission {
    busy: Arc<AtomicBool>,
}

impl Submission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Claim the busy flag, failing if a submission is running
    pub fn try_begin(&self) -> Result<SubmitGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| DeskError::Busy)?;
        Ok(SubmitGuard {
            busy: Arc::clone(&self.busy),
        })
    }

    /// Validate, create and, for a paid plan, start payment
    pub async fn submit<A: MarketplaceApi + ?Sized>(
        &self,
        api: &A,
        form: &ProductForm,
        categories: &[Category],
        plans: &[PromotionPlan],
        email: Option<&str>,
    ) -> Result<SubmitOutcome> {
        let _guard = self.try_begin()?;
        run(api, form, categories, plans, email).await
    }
}

/// Submission body; callers hold a [`SubmitGuard`] while it runs
pub async fn run<A: MarketplaceApi + ?Sized>(
    api: &A,
    form: &ProductForm,
    categories: &[Category],
    plans: &[PromotionPlan],
    email: Option<&str>,
) -> Result<SubmitOutcome> {
    let payload = form.build(categories)?;
    let plan = form
        .promotion
        .as_deref()
        .and_then(|kind| plans.iter().find(|p| p.kind == kind));
    let email = match plan {
        Some(_) => Some(email.filter(|e| !e.is_empty()).ok_or_else(|| {
            DeskError::Validation(
                "An account email is required for paid promotion.\n\n  → Run 'marketdesk auth login --email <address>'."
                    .into(),
            )
        })?),
        None => None,
    };

    let product = api.create_product(payload).await?;
    info!("Created product {}", product.id);

    match (plan, email) {
        (Some(plan), Some(email)) => {
            let authorization_url = api
                .initialize_payment(PaymentRequest {
                    email: email.to_string(),
                    amount: plan.price,
                    product_id: product.id.clone(),
                    plan_type: plan.kind.clone(),
                })
                .await?;
            Ok(SubmitOutcome::Redirect {
                product_id: product.id,
                authorization_url,
            })
        }
        _ => {
            if let Some(kind) = &form.promotion {
                warn!("Promotion plan '{}' not found, listing without payment", kind);
            }
            Ok(SubmitOutcome::Created {
                product_id: product.id,
            })
        }
    }
}

/// Flags carried on the gateway return URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentReturn {
    Success { reference: Option<String> },
    Cancelled,
    NoPayment,
}

impl PaymentReturn {
    /// Parse a full return URL or a bare `?payment=...` query
    pub fn parse(input: &str) -> Result<Self> {
        let input = input.trim();
        let url = if input.contains("://") {
            Url::parse(input)?
        } else {
            let query = input.trim_start_matches('?');
            Url::parse(&format!("http://localhost/?{query}"))?
        };

        let mut payment = None;
        let mut reference = None;
        for (key, value) in url.query_pairs() {
            match key.as_ref() {
                "payment" => payment = Some(value.into_owned()),
                "reference" | "trxref" if reference.is_none() && !value.is_empty() => {
                    reference = Some(value.into_owned())
                }
                _ => {}
            }
        }

        Ok(match payment.as_deref() {
            Some("success") => PaymentReturn::Success { reference },
            Some("cancelled") => PaymentReturn::Cancelled,
            _ => PaymentReturn::NoPayment,
        })
    }
}

/// What reconciliation concluded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
    /// Gateway confirmed the payment; the promotion is live
    Confirmed { product_id: Option<String> },
    /// Payment abandoned; the product stays a draft
    Cancelled { product_id: Option<String> },
    NoPayment,
}

impl Reconciliation {
    pub fn message(&self) -> String {
        match self {
            Reconciliation::Confirmed { .. } => {
                "Payment confirmed. Your product promotion is now active.".to_string()
            }
            Reconciliation::Cancelled { .. } => {
                "Payment was cancelled. Your product remains as a draft.".to_string()
            }
            Reconciliation::NoPayment => "No payment to reconcile.".to_string(),
        }
    }
}

/// Settle a gateway return against the backend and the session
///
/// The pending product id is only cleared on cancellation or a verified
/// success.
pub async fn reconcile<A: MarketplaceApi + ?Sized>(
    api: &A,
    session: &mut SessionContext,
    payment: PaymentReturn,
) -> Result<Reconciliation> {
    match payment {
        PaymentReturn::NoPayment => Ok(Reconciliation::NoPayment),
        PaymentReturn::Cancelled => {
            let product_id = session.take_pending_product();
            session.save()?;
            info!("Payment cancelled for {:?}", product_id);
            Ok(Reconciliation::Cancelled { product_id })
        }
        PaymentReturn::Success { reference: None } => Err(DeskError::PaymentUnconfirmed(
            "the return URL carries no payment reference".into(),
        )),
        PaymentReturn::Success {
            reference: Some(reference),
        } => {
            let status = api.verify_payment(&reference).await?;
            if !status.eq_ignore_ascii_case("success") {
                warn!("Payment {} reported status {}", reference, status);
                return Err(DeskError::PaymentUnconfirmed(format!(
                    "gateway reported '{status}'"
                )));
            }
            let product_id = session.take_pending_product();
            session.save()?;
            info!("Payment {} confirmed for {:?}", reference, product_id);
            Ok(Reconciliation::Confirmed { product_id })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockMarketplaceApi;
    use crate::models::Product;
    use chrono::Utc;
    use mockall::predicate::eq;
    use tempfile::TempDir;

    fn categories() -> Vec<Category> {
        vec![Category {
            id: "cat-1".into(),
            name: "Electronics".into(),
            image: "e.png".into(),
            subcategories: vec!["Phones".into(), "Audio".into()],
            created_at: Utc::now(),
            updated_at: None,
        }]
    }

    fn plans() -> Vec<PromotionPlan> {
        serde_json::from_str(
            r#"[{"_id":"pl1","name":"Premium","type":"premium","duration":30,"price":80,"isActive":true}]"#,
        )
        .unwrap()
    }

    fn product(id: &str) -> Product {
        serde_json::from_value(serde_json::json!({
            "_id": id, "name": "Speaker", "price": 150.0
        }))
        .unwrap()
    }

    fn image(dir: &TempDir, name: &str, size: usize) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, vec![0u8; size]).unwrap();
        path
    }

    fn form(dir: &TempDir) -> ProductForm {
        ProductForm {
            name: "Bluetooth speaker".into(),
            description: "Round speaker".into(),
            category_id: "cat-1".into(),
            subcategory: "Audio".into(),
            price: "150".into(),
            images: vec![image(dir, "a.png", 16)],
            ..Default::default()
        }
    }

    #[test]
    fn test_rejects_zero_and_six_images() {
        let dir = TempDir::new().unwrap();
        let mut f = form(&dir);
        f.images.clear();
        assert!(f.validate(&categories()).unwrap_err().to_string().contains("at least one"));

        f.images = (0..6).map(|i| image(&dir, &format!("{i}.png"), 4)).collect();
        assert!(f.validate(&categories()).unwrap_err().to_string().contains("Maximum 5"));
    }

    #[test]
    fn test_rejects_oversize_image() {
        let dir = TempDir::new().unwrap();
        let mut f = form(&dir);
        let big = dir.path().join("big.jpg");
        let file = fs::File::create(&big).unwrap();
        file.set_len(MAX_IMAGE_BYTES + 1).unwrap();
        f.images.push(big.clone());
        assert!(f.validate(&categories()).unwrap_err().to_string().contains("10MB"));
        assert!(f.add_image(big).is_err());
    }

    #[test]
    fn test_add_image_enforces_limit() {
        let dir = TempDir::new().unwrap();
        let mut f = ProductForm::default();
        for i in 0..MAX_IMAGES {
            f.add_image(image(&dir, &format!("{i}.png"), 4)).unwrap();
        }
        assert!(f.add_image(image(&dir, "extra.png", 4)).is_err());
        assert!(f.remove_image(0).is_some());
        assert!(f.remove_image(10).is_none());
        assert_eq!(f.images.len(), MAX_IMAGES - 1);
    }

    #[test]
    fn test_field_validation() {
        let dir = TempDir::new().unwrap();
        let mut f = form(&dir);
        f.price = "-3".into();
        assert!(f.validate(&categories()).is_err());
        f.price = "abc".into();
        assert!(f.validate(&categories()).is_err());
        f.price = "19.99".into();
        assert_eq!(f.validate(&categories()).unwrap(), 19.99);

        f.subcategory = "Shoes".into();
        assert!(f.validate(&categories()).unwrap_err().to_string().contains("Shoes"));
        f.subcategory = "Audio".into();
        f.name = "  ".into();
        assert!(f.validate(&categories()).unwrap_err().to_string().contains("name"));
    }

    #[tokio::test]
    async fn test_free_listing_creates_without_payment() {
        let dir = TempDir::new().unwrap();
        let mut api = MockMarketplaceApi::new();
        api.expect_create_product()
            .withf(|p| p.promotion_plan.is_none() && p.images.len() == 1 && p.price == 150.0)
            .times(1)
            .returning(|_| Ok(product("prod-1")));
        api.expect_initialize_payment().never();

        let outcome = Submission::new()
            .submit(&api, &form(&dir), &categories(), &plans(), None)
            .await
            .unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::Created {
                product_id: "prod-1".into()
            }
        );
    }

    #[tokio::test]
    async fn test_paid_plan_redirects_and_records_pending() {
        let dir = TempDir::new().unwrap();
        let mut f = form(&dir);
        f.promotion = Some("premium".into());

        let mut api = MockMarketplaceApi::new();
        api.expect_create_product()
            .withf(|p| p.promotion_plan.as_deref() == Some("premium"))
            .returning(|_| Ok(product("prod-2")));
        api.expect_initialize_payment()
            .with(eq(PaymentRequest {
                email: "seller@example.com".into(),
                amount: 80.0,
                product_id: "prod-2".into(),
                plan_type: "premium".into(),
            }))
            .returning(|_| Ok("https://checkout.paystack.com/abc".to_string()));

        let outcome = Submission::new()
            .submit(&api, &f, &categories(), &plans(), Some("seller@example.com"))
            .await
            .unwrap();
        assert_eq!(
            outcome,
            SubmitOutcome::Redirect {
                product_id: "prod-2".into(),
                authorization_url: "https://checkout.paystack.com/abc".into()
            }
        );

        let mut session = SessionContext::in_memory();
        outcome.record(&mut session).unwrap();
        assert_eq!(session.pending_product(), Some("prod-2"));
    }

    #[tokio::test]
    async fn test_paid_plan_requires_email_before_any_request() {
        let dir = TempDir::new().unwrap();
        let mut f = form(&dir);
        f.promotion = Some("premium".into());
        let mut api = MockMarketplaceApi::new();
        api.expect_create_product().never();

        let err = Submission::new()
            .submit(&api, &f, &categories(), &plans(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DeskError::Validation(_)));
    }

    #[tokio::test]
    async fn test_busy_rejects_second_submit() {
        let dir = TempDir::new().unwrap();
        let api = MockMarketplaceApi::new();
        let submission = Submission::new();
        let guard = submission.try_begin().unwrap();
        assert!(submission.is_busy());

        let err = submission
            .submit(&api, &form(&dir), &categories(), &plans(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DeskError::Busy));

        drop(guard);
        assert!(!submission.is_busy());
    }

    #[tokio::test]
    async fn test_server_failure_keeps_form() {
        let dir = TempDir::new().unwrap();
        let f = form(&dir);
        let mut api = MockMarketplaceApi::new();
        api.expect_create_product().returning(|_| {
            Err(DeskError::Api {
                status: 400,
                message: "Failed to add product".into(),
            })
        });
        let submission = Submission::new();
        let err = submission
            .submit(&api, &f, &categories(), &plans(), None)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to add product");
        assert!(!submission.is_busy());
        assert_eq!(f.name, "Bluetooth speaker");
    }

    #[test]
    fn test_parse_payment_return() {
        assert_eq!(
            PaymentReturn::parse("https://admin.example.com/products?payment=success&reference=ref123")
                .unwrap(),
            PaymentReturn::Success {
                reference: Some("ref123".into())
            }
        );
        assert_eq!(
            PaymentReturn::parse("?payment=success&trxref=T1").unwrap(),
            PaymentReturn::Success {
                reference: Some("T1".into())
            }
        );
        assert_eq!(
            PaymentReturn::parse("payment=cancelled").unwrap(),
            PaymentReturn::Cancelled
        );
        assert_eq!(
            PaymentReturn::parse("https://admin.example.com/products").unwrap(),
            PaymentReturn::NoPayment
        );
    }

    #[tokio::test]
    async fn test_reconcile_success_is_verified() {
        let mut api = MockMarketplaceApi::new();
        api.expect_verify_payment()
            .with(eq("ref123"))
            .returning(|_| Ok("success".to_string()));
        let mut session = SessionContext::in_memory();
        session.set_pending_product("prod-2");

        let result = reconcile(
            &api,
            &mut session,
            PaymentReturn::Success {
                reference: Some("ref123".into()),
            },
        )
        .await
        .unwrap();
        assert_eq!(
            result,
            Reconciliation::Confirmed {
                product_id: Some("prod-2".into())
            }
        );
        assert_eq!(session.pending_product(), None);
    }

    #[tokio::test]
    async fn test_reconcile_unverified_keeps_pending() {
        let mut api = MockMarketplaceApi::new();
        api.expect_verify_payment()
            .returning(|_| Ok("abandoned".to_string()));
        let mut session = SessionContext::in_memory();
        session.set_pending_product("prod-3");

        let err = reconcile(
            &api,
            &mut session,
            PaymentReturn::Success {
                reference: Some("r".into()),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, DeskError::PaymentUnconfirmed(_)));
        assert_eq!(session.pending_product(), Some("prod-3"));

        let err = reconcile(&api, &mut session, PaymentReturn::Success { reference: None })
            .await
            .unwrap_err();
        assert!(matches!(err, DeskError::PaymentUnconfirmed(_)));
    }

    #[tokio::test]
    async fn test_reconcile_cancel_clears_pending() {
        let api = MockMarketplaceApi::new();
        let mut session = SessionContext::in_memory();
        session.set_pending_product("prod-4");
        let result = reconcile(&api, &mut session, PaymentReturn::Cancelled)
            .await
            .unwrap();
        assert_eq!(
            result,
            Reconciliation::Cancelled {
                product_id: Some("prod-4".into())
            }
        );
        assert!(result.message().contains("draft"));
        assert_eq!(session.pending_product(), None);
    }
}
