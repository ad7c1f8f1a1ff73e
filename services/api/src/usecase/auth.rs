use shopfront_domain::id::UserId;
use shopfront_domain::user::Role;

use crate::domain::repository::UserRepository;
use crate::domain::types::{MIN_PASSWORD_LEN, NewUser, User, is_valid_email};
use crate::error::ApiError;
use crate::infra::password::PasswordHasher;
use crate::usecase::token::{IssuedTokens, TokenService};

/// A user together with the tokens just minted for it.
#[derive(Debug)]
pub struct Session {
    pub user: User,
    pub tokens: IssuedTokens,
}

// ── Signup ───────────────────────────────────────────────────────────────────

pub struct SignupInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub struct SignupUseCase<U: UserRepository> {
    pub users: U,
    pub passwords: PasswordHasher,
    pub tokens: TokenService,
}

impl<U: UserRepository> SignupUseCase<U> {
    pub async fn execute(&self, input: SignupInput) -> Result<Session, ApiError> {
        let name = input.name.trim();
        let email = input.email.trim();
        if name.is_empty() || email.is_empty() || input.password.is_empty() {
            return Err(ApiError::MissingSignupFields);
        }
        if !is_valid_email(email) {
            return Err(ApiError::InvalidEmail);
        }
        if input.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ApiError::PasswordTooShort);
        }
        if self.users.exists_by_email_or_name(email, name).await? {
            return Err(ApiError::UserExists);
        }

        let password_hash = self.passwords.hash(&input.password).await?;
        let mut user = self
            .users
            .create(NewUser {
                id: UserId::new(),
                name: name.to_owned(),
                email: email.to_owned(),
                password_hash,
                refresh_token: None,
                role: Role::User,
            })
            .await?;

        let tokens = self.tokens.issue(&user)?;
        self.users
            .set_refresh_token(user.id, Some(tokens.refresh_token.clone()))
            .await?;
        user.refresh_token = Some(tokens.refresh_token.clone());

        tracing::info!(user_id = %user.id, "user signed up");
        Ok(Session { user, tokens })
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

pub struct LoginUseCase<U: UserRepository> {
    pub users: U,
    pub passwords: PasswordHasher,
    pub tokens: TokenService,
}

impl<U: UserRepository> LoginUseCase<U> {
    pub async fn execute(&self, input: LoginInput) -> Result<Session, ApiError> {
        let email = input.email.trim();
        if email.is_empty() || input.password.is_empty() {
            return Err(ApiError::MissingCredentials);
        }

        // Unknown email and wrong password must be indistinguishable.
        let mut user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(ApiError::InvalidCredentials)?;
        if !self
            .passwords
            .verify(&input.password, &user.password_hash)
            .await?
        {
            return Err(ApiError::InvalidCredentials);
        }

        let tokens = self.tokens.issue(&user)?;
        self.users
            .set_refresh_token(user.id, Some(tokens.refresh_token.clone()))
            .await?;
        user.refresh_token = Some(tokens.refresh_token.clone());

        Ok(Session { user, tokens })
    }
}

// ── Refresh ──────────────────────────────────────────────────────────────────

pub struct RefreshUseCase<U: UserRepository> {
    pub users: U,
    pub tokens: TokenService,
}

impl<U: UserRepository> RefreshUseCase<U> {
    /// Rotate every token for the user named by the `userId` cookie.
    pub async fn execute(&self, identity_cookie: Option<String>) -> Result<Session, ApiError> {
        let identity = identity_cookie
            .filter(|v| !v.is_empty())
            .ok_or(ApiError::MissingUserIdCookie)?;
        let user_id = self.tokens.verify_identity(&identity).map_err(|e| {
            tracing::debug!(error = %e, "identity token rejected");
            ApiError::InvalidRefreshToken
        })?;

        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(ApiError::UnknownIdentityUser)?;

        let tokens = self.tokens.issue(&user)?;
        self.users
            .set_refresh_token(user.id, Some(tokens.refresh_token.clone()))
            .await?;
        user.refresh_token = Some(tokens.refresh_token.clone());

        Ok(Session { user, tokens })
    }
}

// ── Logout ───────────────────────────────────────────────────────────────────

pub struct LogoutInput {
    pub refresh_cookie: Option<String>,
    pub identity_cookie: Option<String>,
}

pub struct LogoutUseCase<U: UserRepository> {
    pub users: U,
    pub tokens: TokenService,
}

impl<U: UserRepository> LogoutUseCase<U> {
    /// Forget the stored refresh token. Succeeds even if no user matched.
    pub async fn execute(&self, input: LogoutInput) -> Result<(), ApiError> {
        if let Some(token) = input.refresh_cookie.filter(|v| !v.is_empty()) {
            self.users.clear_refresh_token_matching(&token).await?;
        }
        if let Some(user_id) = input
            .identity_cookie
            .filter(|v| !v.is_empty())
            .and_then(|v| self.tokens.verify_identity(&v).ok())
        {
            self.users.set_refresh_token(user_id, None).await?;
        }
        Ok(())
    }
}
