//! reqwest-backed marketplace API client

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, COOKIE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, info};
use url::Url;

use super::error_handler::classify_response;
use super::{MarketplaceApi, NewProduct, PaymentRequest};
use crate::core::session::SessionContext;
use crate::data::extract;
use crate::error::{DeskError, Result};
use crate::models::{Category, Product, ProductPatch, PromotionPlan};

/// Marketplace backend client
///
/// Every request carries the bearer token; GET requests also forward the
/// refresh token cookie when one is known.
pub struct ApiClient {
    client: Client,
    base_url: Url,
    access_token: SecretString,
    refresh_token: Option<SecretString>,
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        access_token: SecretString,
        refresh_token: Option<SecretString>,
    ) -> Result<Self> {
        // Trailing slash so `join` appends instead of replacing the last segment
        let base_url = Url::parse(&format!("{}/", base_url.trim_end_matches('/')))?;
        Ok(Self {
            client: Client::new(),
            base_url,
            access_token,
            refresh_token,
        })
    }

    /// Client using the tokens held by `session`
    pub fn from_session(base_url: &str, session: &SessionContext) -> Result<Self> {
        let access_token = session
            .access_token()
            .cloned()
            .ok_or(DeskError::NotAuthenticated)?;
        Self::new(base_url, access_token, session.refresh_token().cloned())
    }

    /// Absolute URL for an endpoint path such as `products/123`
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// URL of a single record under `collection`, with `id` encoded as one path segment
    pub fn record_endpoint(&self, collection: &str, id: &str) -> Result<Url> {
        let mut url = self.endpoint(collection)?;
        url.path_segments_mut()
            .map_err(|_| {
                DeskError::InvalidInput(format!("Cannot address '{id}' under {collection}"))
            })?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header(
            AUTHORIZATION,
            format!("Bearer {}", self.access_token.expose_secret()),
        )
    }

    fn get(&self, url: Url) -> RequestBuilder {
        let builder = self.authorized(self.client.get(url));
        match &self.refresh_token {
            Some(refresh) => builder.header(
                COOKIE,
                format!("refreshToken={}", refresh.expose_secret()),
            ),
            None => builder,
        }
    }

    /// Send a request and return the JSON body of a success response
    async fn send(&self, builder: RequestBuilder, fallback: &str) -> Result<Value> {
        let response = builder.send().await?;
        Self::read_body(response, fallback).await
    }

    async fn read_body(response: Response, fallback: &str) -> Result<Value> {
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            debug!("Backend returned {}: {}", status, text);
            return Err(classify_response(status.as_u16(), &text, fallback));
        }
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }

    fn product_form(product: NewProduct) -> Result<Form> {
        let mut form = Form::new()
            .text("name", product.name)
            .text("price", product.price.to_string())
            .text("description", product.description)
            .text("categoryId", product.category_id)
            .text("subcategory", product.subcategory)
            .text("condition", product.condition.as_str());

        for image in product.images {
            let mime = image.mime();
            let part = Part::bytes(image.bytes)
                .file_name(image.file_name)
                .mime_str(mime)?;
            form = form.part("images", part);
        }

        if let Some(plan) = product.promotion_plan {
            form = form.text("promotionPlan[type]", plan);
        }

        Ok(form)
    }
}

#[async_trait]
impl MarketplaceApi for ApiClient {
    async fn categories(&self) -> Result<Vec<Category>> {
        let url = self.endpoint("categories")?;
        debug!("GET {}", url);
        let body = self
            .send(self.get(url), "Failed to load categories")
            .await?;
        extract(body, "categories")
    }

    async fn promotions(&self) -> Result<Vec<PromotionPlan>> {
        let url = self.endpoint("promotions")?;
        debug!("GET {}", url);
        let body = self
            .send(self.get(url), "Failed to load promotion plans")
            .await?;
        extract(body, "promotionPlans")
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product> {
        let url = self.endpoint("products")?;
        info!(
            "Creating product '{}' with {} image(s)",
            product.name,
            product.images.len()
        );
        let form = Self::product_form(product)?;
        let builder = self.authorized(self.client.post(url)).multipart(form);
        let body = self.send(builder, "Failed to add product").await?;
        extract(body, "product")
    }

    async fn update_product(&self, id: &str, patch: ProductPatch) -> Result<Product> {
        let url = self.record_endpoint("products", id)?;
        debug!("PATCH {}", url);
        let builder = self.authorized(self.client.patch(url)).json(&patch);
        let body = self.send(builder, "Failed to update product").await?;
        extract(body, "product")
    }

    async fn delete_product(&self, id: &str) -> Result<()> {
        let url = self.record_endpoint("products", id)?;
        debug!("DELETE {}", url);
        let builder = self.authorized(self.client.delete(url));
        self.send(builder, "Failed to delete product").await?;
        Ok(())
    }

    async fn initialize_payment(&self, request: PaymentRequest) -> Result<String> {
        let url = self.endpoint("payments/initialize")?;
        info!(
            "Initializing {} payment for product {}",
            request.plan_type, request.product_id
        );
        let builder = self.authorized(self.client.post(url)).json(&request);
        let body = self
            .send(builder, "Failed to initialize payment")
            .await?;
        extract(body, "authorization_url")
    }

    async fn verify_payment(&self, reference: &str) -> Result<String> {
        let url = self.record_endpoint("payments/verify", reference)?;
        debug!("GET {}", url);
        let body = self.send(self.get(url), "Failed to verify payment").await?;
        extract(body, "status")
    }
}

/// Backend health probe used by `auth status`
pub async fn ping(client: &ApiClient) -> Result<()> {
    let url = client.endpoint("categories")?;
    let body = client.send(client.get(url), "Backend unreachable").await?;
    if body.get("data").is_none() {
        return Err(DeskError::Api {
            status: 200,
            message: format!("Unexpected response: {body}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(base, SecretString::from("token"), None).unwrap()
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let api = client("https://clark-backend.onrender.com/api/v1");
        assert_eq!(
            api.endpoint("products/abc").unwrap().as_str(),
            "https://clark-backend.onrender.com/api/v1/products/abc"
        );
        let api = client("http://localhost:5000/api/v1/");
        assert_eq!(
            api.endpoint("/payments/initialize").unwrap().as_str(),
            "http://localhost:5000/api/v1/payments/initialize"
        );
    }

    #[test]
    fn test_record_endpoint_encodes_id_as_one_segment() {
        let api = client("https://h/api/v1");
        assert_eq!(
            api.record_endpoint("products", "abc").unwrap().as_str(),
            "https://h/api/v1/products/abc"
        );

        let url = api.record_endpoint("payments/verify", "../../users").unwrap();
        assert!(url.path().starts_with("/api/v1/payments/verify/"));
        assert!(!url.path().ends_with("/users"));

        let url = api.record_endpoint("payments/verify", "abc?x=1#frag").unwrap();
        assert_eq!(url.path(), "/api/v1/payments/verify/abc%3Fx=1%23frag");
        assert_eq!(url.query(), None);
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_from_session_requires_token() {
        let session = SessionContext::in_memory();
        assert!(matches!(
            ApiClient::from_session("http://localhost", &session),
            Err(DeskError::NotAuthenticated)
        ));
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(ApiClient::new("not a url", SecretString::from("t"), None).is_err());
    }
}
