use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub category: String,
}

/// Fields to change; `None` fields are not sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
    pub product: Product,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The API answered with a non-success status and a `{message}` body.
    #[error("API returned {status}: {message}")]
    Api { status: StatusCode, message: String },
}

impl ClientError {
    /// HTTP status of an API error, if this is one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status(),
        }
    }
}

pub struct ProductClient {
    client: Client,
    base_url: String,
}

impl ProductClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn products_url(&self) -> String {
        format!("{}/products", self.base_url)
    }

    /// Create a product and return it with its generated id.
    pub async fn create(&self, product: &NewProduct) -> Result<Product, ClientError> {
        let resp = self.client.post(self.products_url()).json(product).send().await?;
        decode(resp).await
    }

    /// Create a product from an arbitrary JSON body.
    pub async fn create_raw(&self, body: &serde_json::Value) -> Result<Product, ClientError> {
        let resp = self.client.post(self.products_url()).json(body).send().await?;
        decode(resp).await
    }

    /// List every product.
    pub async fn list(&self) -> Result<Vec<Product>, ClientError> {
        let resp = self.client.get(self.products_url()).send().await?;
        decode(resp).await
    }

    /// Update the given fields of product `id`.
    pub async fn update(&self, id: &str, update: &ProductUpdate) -> Result<Product, ClientError> {
        self.update_raw(id, &serde_json::to_value(update).unwrap_or_default()).await
    }

    /// Update product `id` with an arbitrary JSON body.
    pub async fn update_raw(
        &self,
        id: &str,
        body: &serde_json::Value,
    ) -> Result<Product, ClientError> {
        let resp = self
            .client
            .put(format!("{}/{}", self.products_url(), id))
            .json(body)
            .send()
            .await?;
        decode(resp).await
    }

    /// Delete product `id`, returning the removed document.
    pub async fn delete(&self, id: &str) -> Result<DeleteResponse, ClientError> {
        let resp = self
            .client
            .delete(format!("{}/{}", self.products_url(), id))
            .send()
            .await?;
        decode(resp).await
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json().await?);
    }

    let text = resp.text().await?;
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|b| b.message)
        .unwrap_or(text);
    Err(ClientError::Api { status, message })
}
