use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::{CreateUser, LoginRequest, NewUser, PublicUser};
use crate::infrastructure::security::{generate_token, hash_password, verify_password};
use anyhow::Result;
use std::sync::{Arc, LazyLock};
use tracing::{debug, error, info, instrument, trace, warn};

// Checked against when the email is unknown, so both sign-in failures pay for
// one Argon2 verification.
static DUMMY_PASSWORD_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("shelfmark-no-such-user").ok());

fn check_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    #[cfg(test)]
    tests::VERIFICATIONS.with(|count| count.set(count.get() + 1));
    verify_password(password, hash)
}

/// What a successful sign-in hands back to the HTTP layer.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: PublicUser,
    pub token: String,
}

pub struct UserService<R: UserRepository> {
    user_repository: Arc<R>,
    jwt_secret: String,
    session_ttl_secs: u64,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(user_repository: Arc<R>, jwt_secret: String, session_ttl_secs: u64) -> Self {
        Self {
            user_repository,
            jwt_secret,
            session_ttl_secs,
        }
    }

    pub fn session_ttl_secs(&self) -> u64 {
        self.session_ttl_secs
    }

    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn register(&self, req: CreateUser) -> Result<PublicUser> {
        trace!("Starting user registration");
        req.validate()?;

        // Skips the hashing cost for the common duplicate case; the insert
        // below is still the authoritative uniqueness check.
        if self
            .user_repository
            .find_user_by_email(&req.email)
            .await?
            .is_some()
        {
            warn!(email = %req.email, "User already exists");
            return Err(DomainError::Conflict("Email already exists".to_string()).into());
        }

        let password_hash = hash_password(&req.password).map_err(|e| {
            error!(error = %e, "Failed to hash password");
            DomainError::Internal(format!("Failed to hash password: {}", e))
        })?;

        debug!("Saving user to repository");
        let user = self
            .user_repository
            .insert_user(NewUser {
                first_name: req.first_name,
                last_name: req.last_name,
                email: req.email,
                password_hash,
            })
            .await?;

        info!(user_id = user.id, email = %user.email, "User registered successfully");
        Ok(PublicUser::from(&user))
    }

    /// Unknown email and wrong password fail identically; only the log tells
    /// them apart.
    #[instrument(skip(self, req), fields(email = %req.email))]
    pub async fn authenticate(&self, req: LoginRequest) -> Result<Session> {
        trace!("Starting authentication");

        let user = self.user_repository.find_user_by_email(&req.email).await?;
        let hash = match &user {
            Some(user) => user.password_hash.as_str(),
            None => DUMMY_PASSWORD_HASH.as_deref().ok_or_else(|| {
                error!("Dummy password hash unavailable");
                DomainError::Internal("Failed to prepare password check".to_string())
            })?,
        };

        let is_valid = check_password(&req.password, hash).map_err(|e| {
            error!(error = %e, "Failed to verify password");
            DomainError::Internal(format!("Failed to verify password: {}", e))
        })?;

        let user = match user {
            Some(user) if is_valid => user,
            Some(user) => {
                warn!(user_id = user.id, "Invalid password during authentication");
                return Err(DomainError::InvalidCredentials.into());
            }
            None => {
                warn!(email = %req.email, "User not found during authentication");
                return Err(DomainError::InvalidCredentials.into());
            }
        };

        let token = generate_token(user.id, &self.jwt_secret, self.session_ttl_secs).map_err(|e| {
            error!(error = %e, "Failed to generate token");
            DomainError::Internal(format!("Failed to generate token: {}", e))
        })?;

        info!(user_id = user.id, "Authentication successful");
        Ok(Session {
            user: PublicUser::from(&user),
            token,
        })
    }
}
