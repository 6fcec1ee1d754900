//! 用户服务
//!
//! 注册与凭证校验。JWT 的签发在 web-api 层完成，这里只负责身份验证本身。

use std::sync::Arc;

use domain::{DomainError, User};

use crate::{error::ApplicationError, password::PasswordHasher, repository::UserRepository};

#[derive(Debug, Clone)]
pub struct RegisterUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct AuthenticateUserRequest {
    pub email: String,
    pub password: String,
}

pub struct UserServiceDependencies {
    pub user_repository: Arc<dyn UserRepository>,
    pub password_hasher: Arc<dyn PasswordHasher>,
}

pub struct UserService {
    deps: UserServiceDependencies,
}

impl UserService {
    pub fn new(deps: UserServiceDependencies) -> Self {
        Self { deps }
    }

    pub async fn register(&self, request: RegisterUserRequest) -> Result<User, ApplicationError> {
        if request.password.is_empty() {
            return Err(ApplicationError::Domain(DomainError::validation_error(
                "password",
                "密码不能为空",
            )));
        }

        if self
            .deps
            .user_repository
            .find_by_email(&request.email)
            .await?
            .is_some()
        {
            return Err(ApplicationError::Domain(
                DomainError::resource_already_exists("User", request.email),
            ));
        }

        let password_hash = self.deps.password_hasher.hash(&request.password).await?;
        let user = User::new(request.name, request.email, password_hash)?;

        let stored = self.deps.user_repository.create(user).await?;
        Ok(stored)
    }

    pub async fn authenticate(
        &self,
        request: AuthenticateUserRequest,
    ) -> Result<User, ApplicationError> {
        let user = self
            .deps
            .user_repository
            .find_by_email(&request.email)
            .await?
            .ok_or(ApplicationError::Authentication)?;

        let password_ok = self
            .deps
            .password_hasher
            .verify(&request.password, &user.password_hash)
            .await?;
        if !password_ok {
            return Err(ApplicationError::Authentication);
        }

        Ok(user)
    }
}
