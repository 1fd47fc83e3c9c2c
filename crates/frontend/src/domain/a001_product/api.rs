use contracts::domain::a001_product::{PriceUpdateDto, Product, ProductDto};

use crate::shared::api_client::{ApiClient, ApiError};
use crate::shared::api_utils::id_segment;
use crate::usecases::u501_bulk_price_update::runner::PricePatcher;

/// Fetch all products
pub async fn fetch_products(client: &ApiClient) -> Result<Vec<Product>, ApiError> {
    client.get("/products").await
}

pub async fn fetch_product(client: &ApiClient, id: &str) -> Result<Product, ApiError> {
    client.get(&format!("/products/{}", id_segment(id))).await
}

/// Create new product, returns the stored record
pub async fn create_product(client: &ApiClient, dto: &ProductDto) -> Result<Product, ApiError> {
    client.post("/products", dto).await
}

pub async fn update_product(client: &ApiClient, id: &str, dto: &ProductDto) -> Result<(), ApiError> {
    client.patch(&format!("/products/{}", id_segment(id)), dto).await
}

/// Change only the price of one product
pub async fn patch_price(client: &ApiClient, id: &str, price: f64) -> Result<(), ApiError> {
    client
        .patch(&format!("/products/{}", id_segment(id)), &PriceUpdateDto { price })
        .await
}

pub async fn delete_product(client: &ApiClient, id: &str) -> Result<(), ApiError> {
    client.delete(&format!("/products/{}", id_segment(id))).await
}

impl PricePatcher for ApiClient {
    async fn patch_price(&self, id: &str, price: f64) -> Result<(), ApiError> {
        patch_price(self, id, price).await
    }
}
