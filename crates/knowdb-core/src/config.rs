//! Lightweight configuration loader and typed retrieval settings.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars.
//! Every retrieval knob has a default, so an empty figment yields a working
//! engine.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::error::{Error, Result};

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(Path::new("."))
    }

    /// Load `config.toml` and the `RUST_ENV` overlay from `base`, then apply
    /// `APP_` environment overrides (`APP_RETRIEVAL__RRF_CONSTANT=30`).
    pub fn load_from(base: &Path) -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file(base.join("config.toml")));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file(base.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(base.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(base.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.retrieval()?;
        Ok(config)
    }

    pub fn from_figment(figment: Figment) -> Self { Self { figment } }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// The `[retrieval]` section, defaulted when absent and validated.
    pub fn retrieval(&self) -> Result<RetrievalSettings> {
        let settings = if self.figment.find_value("retrieval").is_ok() {
            self.figment
                .extract_inner::<RetrievalSettings>("retrieval")
                .map_err(|e| Error::InvalidConfig(format!("retrieval: {e}")))?
        } else {
            RetrievalSettings::default()
        };
        settings.validate()?;
        Ok(settings)
    }
}

/// Fusion weights and oversampling for hybrid retrieval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    pub semantic_weight: f64,
    pub lexical_weight: f64,
    /// RRF smoothing constant; signed so a negative value from config is
    /// reported instead of failing to parse.
    pub rrf_constant: i64,
    /// Each source is asked for `fetch_multiplier * k` candidates.
    pub fetch_multiplier: usize,
    pub lexical: LexicalSettings,
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            semantic_weight: 0.6,
            lexical_weight: 0.4,
            rrf_constant: 60,
            fetch_multiplier: 2,
            lexical: LexicalSettings::default(),
        }
    }
}

impl RetrievalSettings {
    pub fn validate(&self) -> Result<()> {
        for (name, weight) in [("semantic_weight", self.semantic_weight), ("lexical_weight", self.lexical_weight)] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(Error::InvalidConfig(format!("{name} must be a finite non-negative number, got {weight}")));
            }
        }
        if self.rrf_constant < 0 {
            return Err(Error::InvalidConfig(format!("rrf_constant must be >= 0, got {}", self.rrf_constant)));
        }
        if self.fetch_multiplier == 0 {
            return Err(Error::InvalidConfig("fetch_multiplier must be >= 1".to_string()));
        }
        self.lexical.validate()
    }
}

/// BM25 parameters and the lexical capability switch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexicalSettings {
    pub enabled: bool,
    pub k1: f64,
    pub b: f64,
    /// Floor applied to negative IDFs, as a fraction of the average IDF.
    pub epsilon: f64,
}

impl Default for LexicalSettings {
    fn default() -> Self { Self { enabled: true, k1: 1.5, b: 0.75, epsilon: 0.25 } }
}

impl LexicalSettings {
    pub fn validate(&self) -> Result<()> {
        if !self.k1.is_finite() || self.k1 < 0.0 {
            return Err(Error::InvalidConfig(format!("lexical.k1 must be >= 0, got {}", self.k1)));
        }
        if !(0.0..=1.0).contains(&self.b) {
            return Err(Error::InvalidConfig(format!("lexical.b must be within [0, 1], got {}", self.b)));
        }
        if !self.epsilon.is_finite() {
            return Err(Error::InvalidConfig(format!("lexical.epsilon must be finite, got {}", self.epsilon)));
        }
        Ok(())
    }
}
