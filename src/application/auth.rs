use super::ids::epoch_millis;
use super::repository::{Repository, TOKEN_KEY, USER_KEY, USERS_KEY};
use crate::domain::user::{Credentials, Session, SignupRequest, StoredUser, User};
use crate::error::{Result, ShopError};

/// Accounts that can always log in, whatever the user list holds.
const BUILT_IN_ACCOUNTS: [(&str, &str, &str, &str); 2] = [
    ("1", "demo", "demo@shopease.com", "demo123"),
    ("2", "admin", "admin@shopease.com", "admin123"),
];

fn built_in_accounts() -> impl Iterator<Item = StoredUser> {
    BUILT_IN_ACCOUNTS
        .iter()
        .map(|(id, username, email, password)| StoredUser {
            id: id.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        })
}

/// Demo-grade authentication over the key-value store.
///
/// The current session lives under `shopease_token` / `shopease_user`;
/// registered accounts under `shopease_users`.
#[derive(Clone)]
pub struct AuthService {
    repo: Repository,
}

impl AuthService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    /// Registers the `demo` account in the user list unless one is stored.
    pub async fn seed_demo_user(&self) -> Result<()> {
        let mut users: Vec<StoredUser> = self.repo.load_list(USERS_KEY).await?;
        if users.iter().any(|u| u.username == "demo") {
            return Ok(());
        }
        users.push(StoredUser {
            id: "demo-user-1".to_string(),
            username: "demo".to_string(),
            email: "demo@shopease.com".to_string(),
            password: "demo123".to_string(),
        });
        self.repo.save(USERS_KEY, &users).await
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<Session> {
        let stored: Vec<StoredUser> = self.repo.load_list(USERS_KEY).await?;
        let user = built_in_accounts()
            .chain(stored)
            .find(|u| u.username == credentials.username && u.password == credentials.password)
            .ok_or(ShopError::InvalidCredentials)?;

        tracing::info!(user_id = %user.id, "User logged in");
        self.start_session(user.profile()).await
    }

    pub async fn signup(&self, request: &SignupRequest) -> Result<Session> {
        if request.username.trim().is_empty() || request.password.is_empty() {
            return Err(ShopError::ValidationError(
                "Username and password are required".to_string(),
            ));
        }
        if !request.email.contains('@') {
            return Err(ShopError::ValidationError(
                "Please enter a valid email address".to_string(),
            ));
        }

        let mut users: Vec<StoredUser> = self.repo.load_list(USERS_KEY).await?;
        let taken = built_in_accounts()
            .chain(users.iter().cloned())
            .any(|u| u.username == request.username || u.email == request.email);
        if taken {
            return Err(ShopError::UserExists);
        }

        let user = StoredUser {
            id: epoch_millis().to_string(),
            username: request.username.clone(),
            email: request.email.clone(),
            password: request.password.clone(),
        };
        let profile = user.profile();
        users.push(user);
        self.repo.save(USERS_KEY, &users).await?;

        tracing::info!(user_id = %profile.id, "User registered");
        self.start_session(profile).await
    }

    pub async fn logout(&self) -> Result<()> {
        self.repo.remove(TOKEN_KEY).await?;
        self.repo.remove(USER_KEY).await
    }

    /// The logged-in user's profile.
    pub async fn profile(&self) -> Result<User> {
        self.repo
            .load::<String>(TOKEN_KEY)
            .await?
            .ok_or_else(|| ShopError::Unauthenticated("No authentication token found".to_string()))?;
        self.repo
            .load(USER_KEY)
            .await?
            .ok_or_else(|| ShopError::NotFound("User not found".to_string()))
    }

    pub async fn refresh_token(&self) -> Result<String> {
        let current: String = self
            .repo
            .load(TOKEN_KEY)
            .await?
            .ok_or_else(|| ShopError::Unauthenticated("No token to refresh".to_string()))?;
        let token = format!("refreshed_{current}_{}", epoch_millis());
        self.repo.save(TOKEN_KEY, &token).await?;
        Ok(token)
    }

    async fn start_session(&self, user: User) -> Result<Session> {
        let token = format!("mock_token_{}_{}", user.id, epoch_millis());
        self.repo.save(TOKEN_KEY, &token).await?;
        self.repo.save(USER_KEY, &user).await?;
        Ok(Session { token, user })
    }
}
