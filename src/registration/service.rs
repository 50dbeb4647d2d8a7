use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::auth::avatar::gravatar_url;
use crate::auth::password::hash_password;
use crate::auth::TokenIssuer;
use crate::config::{AppConfig, AvatarConfig};
use crate::database::{Account, AccountStore, DatabaseError, NewAccount};

use super::validation::{validate, RegistrationCandidate};
use super::RegistrationError;

/// Outcome of a successful sign-up.
#[derive(Debug, Clone)]
pub struct Registration {
    pub account: Account,
    pub token: String,
}

/// Registers accounts and issues their first session token.
///
/// Holds no per-request state; one instance is shared by every handler.
pub struct RegistrationService {
    store: Arc<dyn AccountStore>,
    tokens: TokenIssuer,
    avatar: AvatarConfig,
    bcrypt_cost: u32,
    store_timeout: Duration,
}

impl RegistrationService {
    pub fn new(store: Arc<dyn AccountStore>, config: &AppConfig) -> Self {
        Self {
            store,
            tokens: TokenIssuer::from_config(&config.security),
            avatar: config.avatar.clone(),
            bcrypt_cost: config.security.bcrypt_cost,
            store_timeout: config.database.operation_timeout(),
        }
    }

    pub fn store(&self) -> &Arc<dyn AccountStore> {
        &self.store
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    pub async fn register(
        &self,
        candidate: RegistrationCandidate,
    ) -> Result<Registration, RegistrationError> {
        let request = validate(candidate).map_err(RegistrationError::Validation)?;

        let existing = self
            .bounded("find_by_email", self.store.find_by_email(&request.email))
            .await?;
        if existing.is_some() {
            warn!("Registration rejected: account already exists");
            return Err(RegistrationError::AlreadyExists);
        }

        let avatar = gravatar_url(&request.email, &self.avatar);
        let password_hash = hash_password(request.password, self.bcrypt_cost).await?;
        debug!("Credentials prepared");

        let new_account = NewAccount {
            name: request.name,
            email: request.email,
            avatar,
            password_hash,
        };
        let account = match self.bounded("insert", self.store.insert(new_account)).await {
            Ok(account) => account,
            Err(RegistrationError::AlreadyExists) => {
                warn!("Registration rejected at write: account already exists");
                return Err(RegistrationError::AlreadyExists);
            }
            Err(other) => return Err(other),
        };

        let token = self.tokens.issue(account.id)?;
        info!(account_id = %account.id, "Registered new account");

        Ok(Registration { account, token })
    }

    async fn bounded<T, F>(&self, operation: &'static str, fut: F) -> Result<T, RegistrationError>
    where
        F: Future<Output = Result<T, DatabaseError>>,
    {
        match tokio::time::timeout(self.store_timeout, fut).await {
            Ok(result) => result.map_err(RegistrationError::from),
            Err(_) => Err(RegistrationError::Timeout(operation)),
        }
    }
}
