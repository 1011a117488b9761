/// Interactive sign-in and registration against the identity provider

use log::{info, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::api::UserDataService;
use crate::config::ServiceConfig;
use crate::error::{AuthError, NetworkError};
use crate::token::AuthToken;

/// Same pattern the user-data service validates with
const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";

/// Provider error codes that mean the email is already bound to another sign-in method.
/// `EMAIL_EXISTS` from sign-up is a plain duplicate registration and is not one of them.
const DIFFERENT_CREDENTIAL_CODES: [&str; 2] = [
    "FEDERATED_USER_ID_ALREADY_LINKED",
    "auth/account-exists-with-different-credential",
];

pub fn is_valid_email(email: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is valid"))
        .is_match(email)
}

/// Map a provider error code to the message shown under the form.
pub fn provider_error(code: &str) -> AuthError {
    if DIFFERENT_CREDENTIAL_CODES.iter().any(|c| code.starts_with(c)) {
        AuthError::DifferentCredential
    } else {
        AuthError::Provider(code.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegistrationForm {
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.password != self.confirm_password {
            return Err(AuthError::PasswordMismatch);
        }
        if !is_valid_email(self.email.trim()) {
            return Err(AuthError::InvalidEmail);
        }
        Ok(())
    }
}

/// Account operations offered by the identity provider
#[allow(async_fn_in_trait)]
pub trait IdentityProvider {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthToken, AuthError>;
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthToken, AuthError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PasswordRequest<'a> {
    email: &'a str,
    password: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PasswordResponse {
    id_token: String,
}

#[derive(Deserialize)]
struct ProviderErrorBody {
    error: ProviderErrorDetail,
}

#[derive(Deserialize)]
struct ProviderErrorDetail {
    #[serde(default)]
    message: String,
}

/// REST client for the identity provider's password endpoints
#[derive(Debug, Clone)]
pub struct IdentityClient {
    http: reqwest::Client,
    config: ServiceConfig,
}

impl IdentityClient {
    pub fn new(config: ServiceConfig) -> Self {
        IdentityClient {
            http: reqwest::Client::new(),
            config,
        }
    }

    async fn password_call(
        &self,
        path: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthToken, AuthError> {
        let url = self.config.identity_endpoint(path)?;
        let body = PasswordRequest {
            email,
            password,
            return_secure_token: true,
        };

        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| NetworkError::transport(path, e))?;

        if response.status().is_success() {
            let parsed: PasswordResponse = response
                .json()
                .await
                .map_err(|e| NetworkError::body(path, e))?;
            Ok(AuthToken::new(parsed.id_token))
        } else {
            let status = response.status().as_u16();
            match response.json::<ProviderErrorBody>().await {
                Ok(body) => Err(provider_error(&body.error.message)),
                Err(_) => Err(NetworkError::Status {
                    endpoint: path.to_string(),
                    status,
                }
                .into()),
            }
        }
    }
}

impl IdentityProvider for IdentityClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthToken, AuthError> {
        self.password_call("accounts:signInWithPassword", email, password)
            .await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthToken, AuthError> {
        self.password_call("accounts:signUp", email, password).await
    }
}

pub async fn sign_in<I: IdentityProvider>(
    identity: &I,
    email: &str,
    password: &str,
) -> Result<AuthToken, AuthError> {
    let token = identity.sign_in(email.trim(), password).await?;
    info!("Signed in as {}", email.trim());
    Ok(token)
}

/// Validate, create the account, then register the email with the user-data
/// service. A failed registration call is logged; the account still exists.
pub async fn register<I, U>(
    form: &RegistrationForm,
    identity: &I,
    user_data: &U,
) -> Result<AuthToken, AuthError>
where
    I: IdentityProvider,
    U: UserDataService,
{
    form.validate()?;
    let email = form.email.trim();

    let token = identity.sign_up(email, &form.password).await?;

    if let Err(e) = user_data.add_user(email).await {
        warn!("Failed to add user: {}", e);
    }
    info!("Registered {}", email);
    Ok(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeIdentity, FakeUserData, UserDataCall};
    use futures::executor::block_on;

    fn form(password: &str, confirm: &str) -> RegistrationForm {
        RegistrationForm {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("ada@example.com"));
        assert!(is_valid_email("first.last+tag@sub.example.co"));
        assert!(!is_valid_email("ada@example"));
        assert!(!is_valid_email("ada.example.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_password_mismatch() {
        let err = form("secret1", "secret2").validate().unwrap_err();

        assert_eq!(err, AuthError::PasswordMismatch);
        assert_eq!(err.to_string(), "Passwords do not match");
    }

    #[test]
    fn test_invalid_email_rejected() {
        let mut form = form("secret", "secret");
        form.email = "nope".to_string();

        assert_eq!(form.validate(), Err(AuthError::InvalidEmail));
    }

    #[test]
    fn test_provider_error_messages() {
        assert_eq!(
            provider_error("auth/account-exists-with-different-credential"),
            AuthError::DifferentCredential
        );
        assert_eq!(
            provider_error("FEDERATED_USER_ID_ALREADY_LINKED").to_string(),
            "Account exists with a different credential. Please log in with that credential."
        );
        assert_eq!(
            provider_error("INVALID_LOGIN_CREDENTIALS").to_string(),
            "Error with email authentication: INVALID_LOGIN_CREDENTIALS"
        );
    }

    #[test]
    fn test_register_adds_user() {
        let identity = FakeIdentity::issuing("ada@example.com");
        let user_data = FakeUserData::new();

        let token = block_on(register(&form("pw", "pw"), &identity, &user_data)).unwrap();

        assert_eq!(token.subject_email().unwrap().as_deref(), Some("ada@example.com"));
        assert_eq!(
            user_data.calls(),
            vec![UserDataCall::AddUser("ada@example.com".to_string())]
        );
    }

    #[test]
    fn test_register_mismatch_never_calls_provider() {
        let identity = FakeIdentity::issuing("ada@example.com");
        let user_data = FakeUserData::new();

        let result = block_on(register(&form("pw", "other"), &identity, &user_data));

        assert_eq!(result, Err(AuthError::PasswordMismatch));
        assert_eq!(identity.attempts(), 0);
        assert!(user_data.calls().is_empty());
    }

    #[test]
    fn test_register_survives_add_user_failure() {
        let identity = FakeIdentity::issuing("ada@example.com");

        let result = block_on(register(&form("pw", "pw"), &identity, &FakeUserData::failing()));

        assert!(result.is_ok());
    }

    #[test]
    fn test_sign_in_provider_failure() {
        let identity = FakeIdentity::rejecting("auth/account-exists-with-different-credential");

        let result = block_on(sign_in(&identity, "ada@example.com", "pw"));

        assert_eq!(result, Err(AuthError::DifferentCredential));
    }

    #[test]
    fn test_register_existing_email_is_plain_provider_error() {
        let identity = FakeIdentity::rejecting("EMAIL_EXISTS");
        let user_data = FakeUserData::new();

        let result = block_on(register(&form("pw", "pw"), &identity, &user_data));

        assert_eq!(result, Err(AuthError::Provider("EMAIL_EXISTS".to_string())));
        assert_eq!(
            result.unwrap_err().to_string(),
            "Error with email authentication: EMAIL_EXISTS"
        );
        assert!(user_data.calls().is_empty());
    }
}
