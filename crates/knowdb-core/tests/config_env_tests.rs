use figment::Jail;

use knowdb_core::config::{Config, RetrievalSettings};

#[test]
fn app_env_vars_override_config_files() {
    Jail::expect_with(|jail| {
        jail.set_env("RUST_ENV", "test");
        jail.create_file("config.toml", "[retrieval]\nrrf_constant = 10\nsemantic_weight = 0.7\n")?;
        jail.create_file("config.test.toml", "[retrieval]\nlexical_weight = 0.3\n")?;
        jail.set_env("APP_RETRIEVAL__RRF_CONSTANT", "30");
        jail.set_env("APP_RETRIEVAL__LEXICAL__K1", "1.1");

        let settings = Config::load().map_err(|e| e.to_string())?.retrieval().map_err(|e| e.to_string())?;
        assert_eq!(settings.rrf_constant, 30, "env beats config.toml");
        assert!((settings.semantic_weight - 0.7).abs() < f64::EPSILON);
        assert!((settings.lexical_weight - 0.3).abs() < f64::EPSILON, "RUST_ENV overlay applied");
        assert!((settings.lexical.k1 - 1.1).abs() < f64::EPSILON, "double underscore nests");
        Ok(())
    });
}

#[test]
fn invalid_env_override_fails_load() {
    Jail::expect_with(|jail| {
        jail.set_env("APP_RETRIEVAL__RRF_CONSTANT", "-1");
        assert!(Config::load().is_err());
        Ok(())
    });
}

#[test]
fn load_without_files_or_env_uses_defaults() {
    Jail::expect_with(|_jail| {
        let settings = Config::load().map_err(|e| e.to_string())?.retrieval().map_err(|e| e.to_string())?;
        assert_eq!(settings, RetrievalSettings::default());
        Ok(())
    });
}
