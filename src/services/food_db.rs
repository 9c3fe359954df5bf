//! Open Food Facts search client.

use anyhow::{anyhow, Context};
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, error, instrument};
use url::Url;

use crate::config::FoodDbSettings;
use crate::domain::{FoodItem, FoodProduct};
use crate::error::ApiError;

/// Fields requested from the search endpoint.
const SEARCH_FIELDS: &[&str] = &[
    "code",
    "product_name",
    "brands",
    "nutriments",
    "image_small_url",
    "categories",
];

pub const UNNAMED_PRODUCT: &str = "Unnamed product";

#[derive(Debug, Default, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    products: Option<Vec<Product>>,
}

/// A product record as the database returns it. Every field is optional and
/// numbers sometimes arrive as strings.
#[derive(Debug, Default, Deserialize)]
struct Product {
    #[serde(default, deserialize_with = "lenient_string")]
    code: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    product_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    brands: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    image_small_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    categories: Option<String>,
    #[serde(default)]
    nutriments: Option<Nutriments>,
}

#[derive(Debug, Default, Deserialize)]
struct Nutriments {
    #[serde(rename = "energy-kcal_100g", default, deserialize_with = "lenient_number")]
    energy_kcal: Option<f64>,
    #[serde(rename = "proteins_100g", default, deserialize_with = "lenient_number")]
    proteins: Option<f64>,
    #[serde(rename = "carbohydrates_100g", default, deserialize_with = "lenient_number")]
    carbohydrates: Option<f64>,
    #[serde(rename = "fat_100g", default, deserialize_with = "lenient_number")]
    fat: Option<f64>,
}

fn lenient_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

impl From<Product> for FoodProduct {
    fn from(p: Product) -> Self {
        let nutriments = p.nutriments.unwrap_or_default();

        Self {
            code: p.code.unwrap_or_default(),
            item: FoodItem {
                name: p
                    .product_name
                    .unwrap_or_else(|| UNNAMED_PRODUCT.to_string()),
                calories_per_100g: nutriments.energy_kcal,
                protein_per_100g: nutriments.proteins,
                carbs_per_100g: nutriments.carbohydrates,
                fat_per_100g: nutriments.fat,
                notes: String::new(),
            },
            brand: p.brands.unwrap_or_default(),
            image: p.image_small_url,
            categories: p.categories.unwrap_or_default(),
        }
    }
}

/// Client for the public food database.
#[derive(Clone)]
pub struct FoodDbClient {
    client: Client,
    search_url: Url,
    page_size: u32,
    user_agent: String,
}

impl FoodDbClient {
    pub fn new(settings: &FoodDbSettings, client: Client) -> anyhow::Result<Self> {
        let mut base = Url::parse(&settings.base_url)
            .with_context(|| format!("Invalid FOOD_DB_URL: {}", settings.base_url))?;
        // Relative join keeps a path prefix such as a mirror's `/off`
        if !base.path().ends_with('/') {
            let dir = format!("{}/", base.path());
            base.set_path(&dir);
        }
        let search_url = base
            .join("api/v2/search")
            .context("Failed to build food database search URL")?;

        tracing::info!(url = %search_url, "Food database client initialized");

        Ok(Self {
            client,
            search_url,
            page_size: settings.page_size,
            user_agent: settings.user_agent.clone(),
        })
    }

    /// Search URL with the query, page size and field list applied.
    pub fn search_url_for(&self, query: &str) -> Url {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("search_text", query)
            .append_pair("page_size", &self.page_size.to_string())
            .append_pair("fields", &SEARCH_FIELDS.join(","));
        url
    }

    /// Search products and normalize them. No caching.
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> Result<Vec<FoodProduct>, ApiError> {
        let url = self.search_url_for(query);
        debug!(url = %url, "Food database request");

        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Food database request failed");
                ApiError::Upstream("Failed to query the food database".to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(status = %status, "Food database error");
            return Err(ApiError::Upstream(
                "Failed to query the food database".to_string(),
            ));
        }

        let body = response.text().await.map_err(|e| {
            error!(error = %e, "Failed to read food database response");
            ApiError::Upstream("Failed to query the food database".to_string())
        })?;

        let parsed: SearchResponse = serde_json::from_str(&body)
            .map_err(|e| ApiError::Internal(anyhow!("Invalid food database response: {}", e)))?;

        Ok(parsed
            .products
            .unwrap_or_default()
            .into_iter()
            .map(FoodProduct::from)
            .collect())
    }
}
