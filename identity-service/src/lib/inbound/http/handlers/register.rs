use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::MessageData;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Password;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::UserName;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequestBody>, JsonRejection>,
) -> Result<ApiSuccess<MessageData>, ApiError> {
    let Json(body) = payload?;
    let command = body.try_into_command()?;

    state.user_service.register(command).await?;

    Ok(ApiSuccess::new(
        StatusCode::CREATED,
        MessageData::new("User created successfully"),
    ))
}

/// HTTP request body for registration (raw JSON).
///
/// Every field is optional at the JSON level so that an absent field is
/// reported as missing instead of as a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RegisterRequestBody {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    #[serde(rename = "confirmPassword", alias = "confirmpassword")]
    confirm_password: Option<String>,
}

impl RegisterRequestBody {
    /// Validate in order: name, email, password, confirmation.
    ///
    /// The first failure is returned and nothing after it is inspected.
    fn try_into_command(self) -> Result<RegisterUserCommand, UserError> {
        let name = UserName::new(self.name.unwrap_or_default())?;
        let email = EmailAddress::new(self.email.unwrap_or_default())?;
        let password = Password::new(self.password.unwrap_or_default())?;

        RegisterUserCommand::new(
            name,
            email,
            password,
            self.confirm_password.as_deref().unwrap_or_default(),
        )
    }
}
