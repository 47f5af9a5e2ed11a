use anyhow::Context;
use regis_config::RegisConfig;

use crate::cli::GlobalFlags;

/// Load layered config (with `.env`), then apply command-line overrides.
pub fn load_config(flags: &GlobalFlags) -> anyhow::Result<RegisConfig> {
    let config = RegisConfig::load_with_dotenv().context("failed to load regis configuration")?;
    apply_overrides(config, flags)
}

fn apply_overrides(mut config: RegisConfig, flags: &GlobalFlags) -> anyhow::Result<RegisConfig> {
    if let Some(db) = &flags.db {
        config.database.path.clone_from(db);
    }
    if let Some(limit) = flags.limit {
        config.general.default_limit = limit;
    }
    config.validate().context("invalid command-line override")?;
    Ok(config)
}
