//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy type with its own input, dispatched
//! statically from `main`.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use symcheck_config::Config;
use symcheck_core::{AccountError, AccountService, BookingService, Dataset, User};
use symcheck_store::Store;
use tracing::{debug, info};
use uuid::Uuid;

mod account;
mod appointments;
mod check;
mod history;
mod info;
mod init;
mod symptoms;
mod version;

pub use account::{LoginInput, LoginStrategy, LogoutStrategy, RegisterInput, RegisterStrategy};
pub use appointments::{
    AppointmentsStrategy, BookInput, BookStrategy, CancelStrategy, DoctorsStrategy,
};
pub use check::CheckStrategy;
pub use history::{HistoryInput, HistoryStrategy};
pub use info::InfoStrategy;
pub use init::InitStrategy;
pub use symptoms::SymptomsStrategy;
pub use version::VersionStrategy;

/// Core trait defining the contract for all command strategies.
///
/// # Example
/// ```rust,ignore
/// struct MyStrategy;
///
/// impl CommandStrategy for MyStrategy {
///     type Input = MyInput;
///
///     async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
///         // Command logic here
///         Ok(())
///     }
/// }
/// ```
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

/// Components shared by every command that touches the store.
pub struct CommonComponents {
    pub config: Config,
    pub store: Store,
}

impl CommonComponents {
    pub fn accounts(&self) -> anyhow::Result<AccountService> {
        Ok(AccountService::new(
            self.store.users(),
            self.store.sessions(),
            self.config.session.ttl()?,
        ))
    }

    pub fn booking(&self) -> BookingService {
        BookingService::new(self.store.doctors(), self.store.appointments())
    }

    /// Resolve the logged-in user from the saved session token.
    pub async fn current_user(&self) -> anyhow::Result<User> {
        let token = load_session_token()?.ok_or(AccountError::NotLoggedIn)?;
        self.accounts()?.current_user(&token).await
    }

    pub fn load_dataset(&self) -> Arc<Dataset> {
        Arc::new(self.config.dataset_source().load())
    }
}

/// Load config and open the store.
pub async fn init_common_components() -> anyhow::Result<CommonComponents> {
    let config = Config::load()?;
    info!("Loaded config");

    if config.database.url.starts_with("sqlite:") {
        Config::ensure_config_dir()?;
    }
    let store = Store::connect(&config.database.url).await?;

    Ok(CommonComponents { config, store })
}

fn session_token_path() -> anyhow::Result<PathBuf> {
    Ok(Config::ensure_config_dir()?.join("session"))
}

pub fn save_session_token(token: &Uuid) -> anyhow::Result<()> {
    let path = session_token_path()?;
    std::fs::write(&path, token.to_string())?;
    debug!("Saved session token to {}", path.display());
    Ok(())
}

pub fn load_session_token() -> anyhow::Result<Option<Uuid>> {
    let path = session_token_path()?;
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(&path)?;
    Ok(Uuid::parse_str(content.trim()).ok())
}

pub fn clear_session_token() -> anyhow::Result<()> {
    let path = session_token_path()?;
    if path.exists() {
        std::fs::remove_file(&path)?;
    }
    Ok(())
}

/// Use the given password, or read one line from stdin.
pub fn password_or_prompt(password: Option<String>) -> anyhow::Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }

    print!("Password: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
