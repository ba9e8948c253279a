use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};
use tracing::info;

use crate::data::user_repository::{NewUser, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::{RegisterRequest, User};

/// argon2id work factor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct HashingParams {
    pub(crate) memory_kib: u32,
    pub(crate) iterations: u32,
}

impl Default for HashingParams {
    fn default() -> Self {
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
        }
    }
}

pub(crate) struct CredentialManager<R: UserRepository> {
    repo: R,
    params: HashingParams,
    // verified against when the account is unknown; same cost as real hashes
    dummy_hash: String,
}

impl<R: UserRepository> CredentialManager<R> {
    const DUMMY_PASSWORD: &'static str = "dummy-password-for-unknown-accounts";

    pub(crate) fn new(repo: R, params: HashingParams) -> Result<Self, DomainError> {
        let mut manager = Self {
            repo,
            params,
            dummy_hash: String::new(),
        };
        manager.dummy_hash = manager.hash_password(Self::DUMMY_PASSWORD)?;
        Ok(manager)
    }

    /// Creates an account. Duplicate email or username fails with
    /// [`DomainError::Conflict`] and never overwrites the existing record.
    pub(crate) async fn register(&self, req: RegisterRequest) -> Result<User, DomainError> {
        let req = req.validate()?;

        if self.repo.find_by_email(&req.email).await?.is_some() {
            return Err(DomainError::Conflict("email".to_string()));
        }
        if let Some(username) = req.username.as_deref()
            && self.repo.find_by_username(username).await?.is_some()
        {
            return Err(DomainError::Conflict("username".to_string()));
        }

        let password_hash = self.hash_password(&req.password)?;

        // the store rejects a duplicate that slipped in since the checks above
        let user = self
            .repo
            .create_user(Self::into_new_user(req, password_hash))
            .await?;

        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    pub(crate) fn hash_password(&self, raw_password: &str) -> Result<String, DomainError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = self
            .argon2()?
            .hash_password(raw_password.as_bytes(), &salt)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Ok(password_hash.to_string())
    }

    /// `Ok(false)` on mismatch; `Err` only when the stored hash is unusable.
    pub(crate) fn verify_password(
        &self,
        raw_password: &str,
        password_hash: &str,
    ) -> Result<bool, DomainError> {
        let parsed_hash = PasswordHash::new(password_hash)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;

        // cost parameters come from the PHC string, not from `self.params`
        match Argon2::default().verify_password(raw_password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(PasswordHashError::Password) => Ok(false),
            Err(err) => Err(DomainError::Unexpected(err.to_string())),
        }
    }

    /// Runs one verification at the configured cost for a login whose
    /// account does not exist. The outcome is irrelevant, errors are not.
    pub(crate) fn burn_dummy_verification(&self, raw_password: &str) -> Result<(), DomainError> {
        self.verify_password(raw_password, &self.dummy_hash)?;
        Ok(())
    }

    fn into_new_user(req: RegisterRequest, password_hash: String) -> NewUser {
        NewUser {
            email: req.email,
            username: req.username,
            password_hash,
        }
    }

    fn argon2(&self) -> Result<Argon2<'static>, DomainError> {
        let params = Params::new(self.params.memory_kib, self.params.iterations, 1, None)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}
