//! Configuration loading (environment-driven).

use std::time::Duration;

use crate::lifecycle::OccupancyPolicy;

/// Settings for the outbound identity provisioning client.
#[derive(Debug, Clone)]
pub struct ProvisioningConfig {
    pub base_url: String,
    /// Per-request deadline; a timeout counts as a provisioning failure.
    pub timeout: Duration,
    /// ISO-3166 alpha-2 fallback for staff records without a country.
    pub default_iso: String,
    /// System-default password for newly signed-up accounts.
    pub default_password: String,
}

/// Process configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: String,
    pub occupancy: OccupancyPolicy,
    pub provisioning: ProvisioningConfig,
}

impl AppConfig {
    /// Load from environment variables, falling back to dev defaults
    /// (logged) when unset.
    pub fn from_env() -> Self {
        let listen_addr =
            std::env::var("STAFFHUB_LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

        let occupancy = match std::env::var("STAFFHUB_OCCUPANCY_POLICY") {
            Ok(raw) => raw.parse().unwrap_or_else(|e| {
                tracing::warn!("{e}; using reassign");
                OccupancyPolicy::Reassign
            }),
            Err(_) => OccupancyPolicy::default(),
        };

        let base_url = std::env::var("STAFFHUB_PROVISIONING_URL").unwrap_or_else(|_| {
            tracing::warn!("STAFFHUB_PROVISIONING_URL not set; using http://localhost:9000");
            "http://localhost:9000".to_string()
        });

        let timeout_secs = std::env::var("STAFFHUB_PROVISIONING_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(10);

        let default_iso =
            std::env::var("STAFFHUB_DEFAULT_ISO").unwrap_or_else(|_| "US".to_string());

        let default_password = std::env::var("STAFFHUB_DEFAULT_PASSWORD").unwrap_or_else(|_| {
            tracing::warn!("STAFFHUB_DEFAULT_PASSWORD not set; using insecure dev default");
            "changeme!1".to_string()
        });

        Self {
            listen_addr,
            occupancy,
            provisioning: ProvisioningConfig {
                base_url,
                timeout: Duration::from_secs(timeout_secs),
                default_iso,
                default_password,
            },
        }
    }
}
