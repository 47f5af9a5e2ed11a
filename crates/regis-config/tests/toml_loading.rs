//! Integration tests for TOML and environment configuration loading.
//!
//! Uses figment::Jail for sandboxed file and env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;
use regis_config::{ConfigError, RegisConfig};

#[test]
fn loads_sections_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[database]
path = "/var/lib/regis/records.db"

[general]
default_limit = 25
default_user = "registry-admin"
"#,
        )?;

        let config: RegisConfig = Figment::from(Serialized::defaults(RegisConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.database.path, "/var/lib/regis/records.db");
        assert_eq!(config.general.default_limit, 25);
        assert_eq!(config.general.default_user, "registry-admin");
        Ok(())
    });
}

#[test]
fn partial_toml_keeps_defaults() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "[general]\ndefault_user = \"ops\"\n")?;

        let config: RegisConfig = Figment::from(Serialized::defaults(RegisConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.database.path, "regis.db");
        assert_eq!(config.general.default_limit, 50);
        assert_eq!(config.general.default_user, "ops");
        Ok(())
    });
}

#[test]
fn env_overrides_project_toml() {
    Jail::expect_with(|jail| {
        jail.create_dir(".regis")?;
        jail.create_file(".regis/config.toml", "[database]\npath = \"from-toml.db\"\n")?;
        jail.set_env("REGIS_DATABASE__PATH", ":memory:");
        jail.set_env("REGIS_GENERAL__DEFAULT_LIMIT", "7");

        let config = RegisConfig::load().expect("config loads");
        assert_eq!(config.database.path, ":memory:");
        assert!(config.database.is_in_memory());
        assert_eq!(config.general.default_limit, 7);
        Ok(())
    });
}

#[test]
fn project_toml_is_picked_up() {
    Jail::expect_with(|jail| {
        jail.create_dir(".regis")?;
        jail.create_file(".regis/config.toml", "[database]\npath = \"project.db\"\n")?;

        let config = RegisConfig::load().expect("config loads");
        assert_eq!(config.database.path, "project.db");
        Ok(())
    });
}

#[test]
fn invalid_env_value_is_rejected() {
    Jail::expect_with(|jail| {
        jail.set_env("REGIS_GENERAL__DEFAULT_LIMIT", "0");

        let figment = Figment::from(Serialized::defaults(RegisConfig::default()))
            .merge(Env::prefixed("REGIS_").split("__"));
        let result = RegisConfig::from_figment(&figment);
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        Ok(())
    });
}
