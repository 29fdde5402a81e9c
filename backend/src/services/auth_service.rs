use eazypg_shared::{
    AuthResponse, LoginRequest, RegisterRequest, UserResponse, ERROR_EMAIL_ALREADY_EXISTS,
    ERROR_INVALID_CREDENTIALS, ERROR_USER_NOT_FOUND, SUCCESS_LOGIN, SUCCESS_USER_CREATED,
};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::{NewUser, User};
use crate::repositories::UserRepository;
use crate::utils::jwt::JwtService;
use crate::utils::password::{hash_password, verify_password};

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    jwt_service: Arc<JwtService>,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, jwt_service: Arc<JwtService>) -> Self {
        Self { users, jwt_service }
    }

    /// Register a new user
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse, AppError> {
        request.validate()?;

        let email = request.email.trim().to_lowercase();
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::Conflict(ERROR_EMAIL_ALREADY_EXISTS.to_string()));
        }

        let password_hash = hash_password(&request.password)?;
        let user = self
            .users
            .create(NewUser {
                first_name: request.first_name.trim().to_string(),
                last_name: request.last_name.trim().to_string(),
                email,
                password_hash,
                phone: request.phone,
            })
            .await?;

        info!("Registered user {}", user.id);
        self.auth_response(&user, SUCCESS_USER_CREATED)
    }

    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AppError> {
        request.validate()?;

        let email = request.email.trim().to_lowercase();
        let user = match self.users.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                warn!("Login attempt for unknown email");
                return Err(AppError::Authentication(ERROR_INVALID_CREDENTIALS.to_string()));
            }
        };

        if !verify_password(&request.password, &user.password_hash)? {
            warn!("Failed login for user {}", user.id);
            return Err(AppError::Authentication(ERROR_INVALID_CREDENTIALS.to_string()));
        }

        info!("User {} logged in", user.id);
        self.auth_response(&user, SUCCESS_LOGIN)
    }

    pub async fn current_user(&self, user_id: Uuid) -> Result<UserResponse, AppError> {
        self.users
            .find_by_id(user_id)
            .await?
            .map(|user| user.to_response())
            .ok_or_else(|| AppError::NotFound(ERROR_USER_NOT_FOUND.to_string()))
    }

    fn auth_response(&self, user: &User, message: &str) -> Result<AuthResponse, AppError> {
        let token = self.jwt_service.issue_token(user.id, &user.email)?;

        Ok(AuthResponse {
            message: message.to_string(),
            token,
            expires_in: self.jwt_service.expires_in(),
            user: user.to_response(),
        })
    }
}
