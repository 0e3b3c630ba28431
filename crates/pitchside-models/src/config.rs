use serde::{Deserialize, Serialize};

/// Top-level configuration for the marketplace, usually loaded from TOML.
/// Every field has a default so a partial file (or none at all) works.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PitchsideConfig {
    pub store: StoreConfig,
    pub contracts: ContractsConfig,
    pub service: ServiceConfig,
}

/// Configuration for the storage layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    /// Path to the SQLite market database file.
    pub sqlite_path: String,
    /// Root directory for stored objects (videos, photos, contract documents).
    pub objects_path: String,
    /// Maximum number of team requirement snapshots held in memory.
    pub snapshot_capacity: u64,
    /// TTL in seconds for cached snapshots (staleness bound for reads).
    pub snapshot_ttl_seconds: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            sqlite_path: "data/pitchside.db".to_string(),
            objects_path: "data/objects".to_string(),
            snapshot_capacity: 10_000,
            snapshot_ttl_seconds: 60,
        }
    }
}

/// Configuration for the contract document generator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ContractsConfig {
    /// Path to a TTF/OTF font used for rasterization. When unset, the
    /// `PITCHSIDE_FONT` env var and common system locations are tried.
    pub font_path: Option<String>,
    /// Page width in pixels. The default is A4 at 96 dpi.
    pub page_width: u32,
    /// Page height in pixels.
    pub page_height: u32,
}

impl Default for ContractsConfig {
    fn default() -> Self {
        Self {
            font_path: None,
            page_width: 794,
            page_height: 1123,
        }
    }
}

/// Configuration for the service layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    /// Budget in seconds for the whole attach-contract flow (compose,
    /// rasterize, store, append).
    pub attach_timeout_seconds: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            attach_timeout_seconds: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_config() {
        let config = PitchsideConfig::default();

        let json = serde_json::to_string(&config).unwrap();
        let deserialized: PitchsideConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }

    #[test]
    fn default_page_is_a4_at_96dpi() {
        let contracts = ContractsConfig::default();
        assert_eq!(contracts.page_width, 794);
        assert_eq!(contracts.page_height, 1123);
        assert!(contracts.font_path.is_none());
    }

    #[test]
    fn config_from_toml() {
        let toml_str = r#"
[store]
sqlite_path = "/tmp/test_market.db"
objects_path = "/tmp/test_objects"
snapshot_capacity = 5000
snapshot_ttl_seconds = 30

[contracts]
font_path = "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf"

[service]
attach_timeout_seconds = 10
"#;

        let config: PitchsideConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.store.sqlite_path, "/tmp/test_market.db");
        assert_eq!(config.store.snapshot_ttl_seconds, 30);
        assert!(config.contracts.font_path.is_some());
        // Unset fields fall back to their defaults.
        assert_eq!(config.contracts.page_width, 794);
        assert_eq!(config.service.attach_timeout_seconds, 10);
    }

    #[test]
    fn empty_toml_is_all_defaults() {
        let config: PitchsideConfig = toml::from_str("").unwrap();
        assert_eq!(config, PitchsideConfig::default());
    }
}
