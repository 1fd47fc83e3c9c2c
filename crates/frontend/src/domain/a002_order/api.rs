use contracts::domain::a002_order::{CreateOrderDto, Order, OrderStatus, OrderStatusUpdateDto};

use crate::shared::api_client::{ApiClient, ApiError};
use crate::shared::api_utils::id_segment;

/// Fetch all orders
pub async fn fetch_orders(client: &ApiClient) -> Result<Vec<Order>, ApiError> {
    client.get("/order").await
}

pub async fn fetch_order(client: &ApiClient, id: &str) -> Result<Order, ApiError> {
    client.get(&format!("/order/{}", id_segment(id))).await
}

/// Place an order on behalf of a customer
pub async fn create_order(client: &ApiClient, dto: &CreateOrderDto) -> Result<(), ApiError> {
    client.post_ignore("/order", dto).await
}

pub async fn update_status(
    client: &ApiClient,
    id: &str,
    status: OrderStatus,
) -> Result<(), ApiError> {
    client
        .patch(
            &format!("/order/{}", id_segment(id)),
            &OrderStatusUpdateDto { status },
        )
        .await
}
