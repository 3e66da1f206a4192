use symcheck_core::AccountError;
use tracing::info;

use super::{
    clear_session_token, init_common_components, load_session_token, password_or_prompt,
    save_session_token,
};

#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub username: String,
    pub email: Option<String>,
    /// Prompted for on stdin when absent
    pub password: Option<String>,
}

/// Strategy for creating an account.
#[derive(Debug, Clone, Copy)]
pub struct RegisterStrategy;

impl super::CommandStrategy for RegisterStrategy {
    type Input = RegisterInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let common = init_common_components().await?;
        let password = password_or_prompt(input.password)?;

        let user = common
            .accounts()?
            .register(&input.username, input.email.as_deref(), &password)
            .await?;

        println!("✅ Registered {}", user.username);
        println!("   Run 'symcheck login -u {}' to start a session", user.username);
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct LoginInput {
    pub username: String,
    pub password: Option<String>,
}

/// Strategy for logging in.
///
/// The session token is written to `~/symcheck/session` and used by every
/// command that needs a user.
#[derive(Debug, Clone, Copy)]
pub struct LoginStrategy;

impl super::CommandStrategy for LoginStrategy {
    type Input = LoginInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let common = init_common_components().await?;
        let password = password_or_prompt(input.password)?;

        let session = common.accounts()?.login(&input.username, &password).await?;
        save_session_token(&session.id)?;

        println!("✅ Logged in as {}", input.username.trim());
        println!(
            "   Session expires at {}",
            session.expires_at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M")
        );
        Ok(())
    }
}

/// Strategy for ending the current session.
#[derive(Debug, Clone, Copy)]
pub struct LogoutStrategy;

impl super::CommandStrategy for LogoutStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        let Some(token) = load_session_token()? else {
            return Err(AccountError::NotLoggedIn.into());
        };

        let common = init_common_components().await?;
        common.accounts()?.logout(&token).await?;
        clear_session_token()?;

        info!("Session {token} closed");
        println!("👋 Logged out");
        Ok(())
    }
}
