use contracts::system::auth::{LoginRequest, LoginResponse};
use contracts::system::users::ChangePasswordDto;

use crate::shared::api_client::{ApiClient, ApiError};

/// Login with email and password, returns the access token
pub async fn login(client: &ApiClient, email: String, password: String) -> Result<String, ApiError> {
    let request = LoginRequest { email, password };
    let response: LoginResponse = client.post("/auth/login", &request).await?;
    Ok(response.access_token)
}

/// Change the current user's password
pub async fn change_password(client: &ApiClient, dto: &ChangePasswordDto) -> Result<(), ApiError> {
    client.patch("/auth/changePassword", dto).await
}
