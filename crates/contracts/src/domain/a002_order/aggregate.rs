use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::shared::serde_helpers::string_or_number;

/// Order status as reported by the server.
///
/// The server may introduce statuses this client does not know about; those
/// are kept verbatim in `Other` so a round trip never loses them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    Pending,
    Processing,
    Completed,
    Other(String),
}

impl OrderStatus {
    /// Statuses offered in the status picker
    pub const KNOWN: [OrderStatus; 3] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Completed,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Completed => "Completed",
            OrderStatus::Other(s) => s,
        }
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Pending" => OrderStatus::Pending,
            "Processing" => OrderStatus::Processing,
            "Completed" => OrderStatus::Completed,
            _ => OrderStatus::Other(value),
        }
    }
}

impl From<OrderStatus> for String {
    fn from(value: OrderStatus) -> Self {
        match value {
            OrderStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(rename = "productId", deserialize_with = "string_or_number")]
    pub product_id: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub email: String,
    pub address: String,
    pub status: OrderStatus,
    #[serde(rename = "totalPrice")]
    pub total_price: f64,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
}

impl Order {
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

/// Body for `POST /order`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOrderDto {
    pub email: String,
    pub address: String,
    pub items: Vec<OrderItem>,
}

impl CreateOrderDto {
    pub fn validate(&self) -> Result<(), String> {
        if !self.email.contains('@') {
            return Err("Email is not valid".into());
        }
        if self.address.trim().is_empty() {
            return Err("Address must not be empty".into());
        }
        if self.items.is_empty() || self.items.iter().any(|i| i.quantity == 0) {
            return Err("Order needs at least one item with a positive quantity".into());
        }
        Ok(())
    }
}

/// Body for `PATCH /order/:id`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderStatusUpdateDto {
    pub status: OrderStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_known_status_round_trip() {
        let status: OrderStatus = serde_json::from_value(json!("Processing")).unwrap();
        assert_eq!(status, OrderStatus::Processing);
        assert_eq!(serde_json::to_value(&status).unwrap(), json!("Processing"));
    }

    #[test]
    fn test_unknown_status_is_preserved() {
        let status: OrderStatus = serde_json::from_value(json!("Refunded")).unwrap();
        assert_eq!(status, OrderStatus::Other("Refunded".into()));
        assert_eq!(serde_json::to_value(&status).unwrap(), json!("Refunded"));
        assert_eq!(status.to_string(), "Refunded");
    }

    #[test]
    fn test_order_decodes_from_wire() {
        let order: Order = serde_json::from_value(json!({
            "id": "o1",
            "email": "buyer@example.com",
            "address": "1 Main St",
            "status": "Pending",
            "totalPrice": 420.5,
            "createdAt": "2024-03-15T14:02:26Z",
            "items": [
                { "productId": "p1", "quantity": 2 },
                { "productId": "p2", "quantity": 1 }
            ]
        }))
        .unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.item_count(), 3);
    }

    #[test]
    fn test_status_update_body() {
        let dto = OrderStatusUpdateDto {
            status: OrderStatus::Completed,
        };
        assert_eq!(
            serde_json::to_value(&dto).unwrap(),
            json!({ "status": "Completed" })
        );
    }

    #[test]
    fn test_create_order_body() {
        let dto = CreateOrderDto {
            email: "buyer@example.com".into(),
            address: "1 Main St".into(),
            items: vec![OrderItem {
                product_id: "p1".into(),
                quantity: 2,
            }],
        };
        assert!(dto.validate().is_ok());
        assert_eq!(
            serde_json::to_value(&dto).unwrap()["items"],
            json!([{ "productId": "p1", "quantity": 2 }])
        );

        let empty = CreateOrderDto { items: vec![], ..dto };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_order_with_numeric_ids() {
        let order: Order = serde_json::from_value(json!({
            "id": 12,
            "email": "buyer@example.com",
            "address": "1 Main St",
            "status": "Completed",
            "totalPrice": 99.5,
            "createdAt": "2024-03-15T14:02:26Z",
            "items": [{ "productId": 3, "quantity": 1 }]
        }))
        .unwrap();
        assert_eq!(order.id, "12");
        assert_eq!(order.items[0].product_id, "3");
    }
}
