use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::application::credentials::CredentialManager;
use crate::application::envelope::{Envelope, PublicUser, TokenPayload};
use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::user::{LoginRequest, RegisterRequest, User};
use crate::infrastructure::jwt::TokenService;

pub(crate) struct AuthService<R: UserRepository> {
    users: R,
    credentials: CredentialManager<R>,
    tokens: Arc<TokenService>,
}

impl<R: UserRepository> AuthService<R> {
    pub(crate) fn new(
        users: R,
        credentials: CredentialManager<R>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            users,
            credentials,
            tokens,
        }
    }

    pub(crate) async fn user_register(
        &self,
        req: RegisterRequest,
    ) -> Result<Envelope<PublicUser>, DomainError> {
        let user = self.credentials.register(req).await?;
        let id = user.id;

        Ok(Envelope::created("User registered successfully", PublicUser::from(user)).with_id(id))
    }

    /// Unknown email and wrong password fail with the same error.
    pub(crate) async fn user_login(
        &self,
        req: LoginRequest,
    ) -> Result<Envelope<TokenPayload>, DomainError> {
        let req = req.validate()?;

        let user_creds = match self.users.find_by_email(&req.email).await? {
            Some(user_creds) => user_creds,
            None => {
                self.credentials.burn_dummy_verification(&req.password)?;
                warn!("login rejected");
                return Err(DomainError::invalid_credentials());
            }
        };

        if !self
            .credentials
            .verify_password(&req.password, &user_creds.password_hash)?
        {
            warn!("login rejected");
            return Err(DomainError::invalid_credentials());
        }

        let tokens = self.issue_tokens(&user_creds.user)?;
        Ok(Envelope::ok("Login success", tokens).with_id(user_creds.user.id))
    }

    /// Re-resolves the account so tokens always reflect current identity state.
    pub(crate) async fn refresh_token(
        &self,
        user_id: Uuid,
    ) -> Result<Envelope<TokenPayload>, DomainError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(DomainError::invalid_token)?;

        let tokens = self.issue_tokens(&user)?;
        Ok(Envelope::ok("Token refreshed", tokens).with_id(user.id))
    }

    pub(crate) async fn refresh_with_token(
        &self,
        refresh_token: &str,
    ) -> Result<Envelope<TokenPayload>, DomainError> {
        let claims = self
            .tokens
            .verify(refresh_token)
            .map_err(|_| DomainError::invalid_token())?;
        self.refresh_token(claims.uid).await
    }

    /// Administrative removal. Posts owned by the user are deleted with it.
    pub(crate) async fn delete_user(&self, user_id: Uuid) -> Result<Envelope<()>, DomainError> {
        if !self.users.delete_user(user_id).await? {
            return Err(DomainError::NotFound(format!("user id: {user_id}")));
        }

        info!(%user_id, "user deleted");
        Ok(Envelope::ok("User deleted", ()).with_id(user_id))
    }

    fn issue_tokens(&self, user: &User) -> Result<TokenPayload, DomainError> {
        self.tokens
            .issue_pair(user.id, &user.email)
            .map(TokenPayload::from)
            .map_err(|err| DomainError::Unexpected(err.to_string()))
    }
}
