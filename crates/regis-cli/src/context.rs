use anyhow::Context;
use regis_config::RegisConfig;
use regis_core::principal::Principal;
use regis_db::service::RegisService;

use crate::cli::GlobalFlags;

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub service: RegisService,
    pub config: RegisConfig,
    pub principal: Principal,
}

impl AppContext {
    /// Open the configured database and resolve the acting principal.
    pub async fn init(config: RegisConfig, flags: &GlobalFlags) -> anyhow::Result<Self> {
        let service = RegisService::new_local(&config.database.path)
            .await
            .with_context(|| format!("failed to open database at {}", config.database.path))?;
        let principal = resolve_principal(flags.user.as_deref(), &config.general.default_user);
        tracing::debug!(
            db = %config.database.path,
            user = %principal.username(),
            "application context ready"
        );
        Ok(Self {
            service,
            config,
            principal,
        })
    }
}

/// `--user` wins over the configured default; blank means anonymous.
fn resolve_principal(flag: Option<&str>, default_user: &str) -> Principal {
    Principal::named(flag.unwrap_or(default_user))
}
