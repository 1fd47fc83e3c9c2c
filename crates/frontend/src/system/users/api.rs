use contracts::system::users::{CreateUserDto, UpdateUserDto, User};

use crate::shared::api_client::{ApiClient, ApiError};
use crate::shared::api_utils::id_segment;

/// Fetch all users
pub async fn fetch_users(client: &ApiClient) -> Result<Vec<User>, ApiError> {
    client.get("/user").await
}

/// Create new user
pub async fn create_user(client: &ApiClient, dto: &CreateUserDto) -> Result<(), ApiError> {
    client.post_ignore("/user", dto).await
}

/// Update user
pub async fn update_user(client: &ApiClient, id: &str, dto: &UpdateUserDto) -> Result<(), ApiError> {
    client.patch(&format!("/user/{}", id_segment(id)), dto).await
}

/// Delete user
pub async fn delete_user(client: &ApiClient, id: &str) -> Result<(), ApiError> {
    client.delete(&format!("/user/{}", id_segment(id))).await
}
