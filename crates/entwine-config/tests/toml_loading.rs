//! Integration tests for layered configuration loading.
//!
//! Uses figment::Jail for sandboxed working directories and env vars.

use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use entwine_config::{ConfigError, EntwineConfig};
use pretty_assertions::assert_eq;
use std::path::Path;

#[test]
fn loads_enum_members_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[enums.User]
role = ["member", "moderator", "owner"]

[enums.Subscription]
plan = ["free", "pro"]
"#,
        )?;

        let config: EntwineConfig = Figment::from(Serialized::defaults(EntwineConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(
            config.enums.values_for("User", "role").map(<[String]>::len),
            Some(3)
        );
        assert_eq!(
            config.enums.values_for("Subscription", "plan"),
            Some(&["free".to_string(), "pro".to_string()][..])
        );
        Ok(())
    });
}

#[test]
fn loads_codegen_and_general_sections() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "entwine.toml",
            r#"
[codegen]
out_dir = "gen/ent"
package = "entschema"

[general]
strict = true
"#,
        )?;

        let config = EntwineConfig::load_from(Path::new("entwine.toml")).expect("config loads");
        assert_eq!(config.codegen.out_dir, "gen/ent");
        assert_eq!(config.codegen.package, "entschema");
        assert!(config.general.strict);
        Ok(())
    });
}

#[test]
fn project_local_config_is_picked_up() {
    Jail::expect_with(|jail| {
        std::fs::create_dir_all(".entwine").expect("create .entwine");
        jail.create_file(
            ".entwine/config.toml",
            r#"
[codegen]
package = "local"
"#,
        )?;

        let config = EntwineConfig::load().expect("config loads");
        assert_eq!(config.codegen.package, "local");
        assert_eq!(config.codegen.out_dir, "ent/schema");
        Ok(())
    });
}

#[test]
fn env_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "entwine.toml",
            r#"
[codegen]
out_dir = "from-toml"
"#,
        )?;
        jail.set_env("ENTWINE_CODEGEN__OUT_DIR", "from-env");

        let config = EntwineConfig::load_from(Path::new("entwine.toml")).expect("config loads");
        assert_eq!(config.codegen.out_dir, "from-env");
        Ok(())
    });
}

#[test]
fn env_supplies_enum_members() {
    Jail::expect_with(|jail| {
        jail.set_env("ENTWINE_ENUMS__USER__ROLE", "[member, owner]");

        let config = EntwineConfig::load().expect("config loads");
        assert_eq!(
            config.enums.values_for("User", "role"),
            Some(&["member".to_string(), "owner".to_string()][..])
        );
        Ok(())
    });
}

#[test]
fn empty_enum_list_is_rejected() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "entwine.toml",
            r#"
[enums.Subscription]
plan = []
"#,
        )?;

        let err = EntwineConfig::load_from(Path::new("entwine.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        Ok(())
    });
}

#[test]
fn env_enum_members_override_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "entwine.toml",
            r#"
[enums.User]
role = ["from_toml"]

[enums.Subscription]
plan = ["free", "pro"]
"#,
        )?;
        jail.set_env("ENTWINE_ENUMS__USER__ROLE", "[from_env]");

        let config = EntwineConfig::load_from(Path::new("entwine.toml")).expect("config loads");
        assert_eq!(
            config.enums.values_for("User", "role"),
            Some(&["from_env".to_string()][..])
        );

        let entries: Vec<String> = config
            .enums
            .entries()
            .map(|(entity, field, members)| format!("{entity}.{field}={members:?}"))
            .collect();
        assert_eq!(
            entries,
            vec![
                r#"Subscription.plan=["free", "pro"]"#.to_string(),
                r#"User.role=["from_env"]"#.to_string(),
            ]
        );
        Ok(())
    });
}
