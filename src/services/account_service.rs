use crate::auth::{AuthError, PasswordHasher, TokenIssuer};
use crate::database::models::User;
use crate::database::{DatabaseError, UserRepository};

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("{0}")]
    Validation(String),
    #[error("Email already exists: {0}")]
    DuplicateEmail(String),
    /// Unknown email or wrong password; callers cannot tell which
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Database(DatabaseError),
}

impl From<DatabaseError> for AccountError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::DuplicateEmail(email) => AccountError::DuplicateEmail(email),
            other => AccountError::Database(other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: i64,
    pub token: String,
}

/// Credential store operations: signup, lookup and login
#[derive(Debug, Clone)]
pub struct AccountService {
    users: UserRepository,
    hasher: PasswordHasher,
    tokens: TokenIssuer,
}

impl AccountService {
    pub fn new(users: UserRepository, hasher: PasswordHasher, tokens: TokenIssuer) -> Self {
        Self { users, hasher, tokens }
    }

    /// Register a new user and return the generated id
    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<i64, AccountError> {
        if name.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
            return Err(AccountError::Validation(
                "Name, email, and password are required.".to_string(),
            ));
        }

        if self.users.find_by_email(email).await?.is_some() {
            tracing::warn!("Signup rejected, email already registered");
            return Err(AccountError::DuplicateEmail(email.to_string()));
        }

        let hash = self.hasher.hash_blocking(password.to_string()).await?;
        let user_id = self.users.insert(name, email, &hash).await?;

        tracing::info!(user_id, "User registered");
        Ok(user_id)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AccountError> {
        Ok(self.users.find_by_email(email).await?)
    }

    pub async fn verify_password(&self, plain: &str, hash: &str) -> Result<bool, AccountError> {
        Ok(self
            .hasher
            .verify_blocking(plain.to_string(), hash.to_string())
            .await?)
    }

    /// Check credentials and mint a bearer token
    pub async fn login(&self, email: &str, password: &str) -> Result<Session, AccountError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(AccountError::Validation(
                "Email and password are required.".to_string(),
            ));
        }

        let Some(user) = self.find_by_email(email).await? else {
            // Same hashing cost as a wrong password, so timing does not reveal the email
            self.hasher.verify_decoy_blocking(password.to_string()).await?;
            return Err(AccountError::InvalidCredentials);
        };

        if !self.verify_password(password, &user.password_hash).await? {
            tracing::warn!(user_id = user.id, "Login rejected, wrong password");
            return Err(AccountError::InvalidCredentials);
        }

        let token = self.tokens.issue(user.id)?;
        tracing::info!(user_id = user.id, "Login successful");

        Ok(Session {
            user_id: user.id,
            token,
        })
    }
}
