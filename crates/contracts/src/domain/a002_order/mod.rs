pub mod aggregate;

pub use aggregate::{CreateOrderDto, Order, OrderItem, OrderStatus, OrderStatusUpdateDto};
