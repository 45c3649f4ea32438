//! Data source selection.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use worksite_core::ParseError;

/// Which store backs project operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ApiMode {
    /// SQLite file on this machine.
    #[default]
    Local,
    /// Backend at `api.base_test`.
    BackendTest,
    /// Backend at `api.base_prod`.
    BackendProd,
}

impl ApiMode {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::BackendTest => "backend-test",
            Self::BackendProd => "backend-prod",
        }
    }

    pub fn is_remote(&self) -> bool {
        !matches!(self, Self::Local)
    }

    pub fn all() -> &'static [ApiMode] {
        &[Self::Local, Self::BackendTest, Self::BackendProd]
    }
}

impl std::fmt::Display for ApiMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl std::str::FromStr for ApiMode {
    type Err = ParseError;

    /// Accepts the current names plus `backend` and `backend-dev`, which
    /// older settings used for the test backend.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "local" => Ok(Self::Local),
            "backend-test" | "test" | "backend" | "backend-dev" | "dev" => Ok(Self::BackendTest),
            "backend-prod" | "prod" | "production" => Ok(Self::BackendProd),
            _ => Err(ParseError::Mode(s.to_string())),
        }
    }
}

impl Serialize for ApiMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for ApiMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
