//! Probe configuration: cache header inspection and the seed pool

use crate::error::ConfigResult;
use crate::validation::{validate_required_string, Validatable};
use serde::{Deserialize, Serialize};

/// Highest seed slot the session context accepts (`seedShortCode1..=50`)
pub const MAX_SEED_CODES: usize = 50;

/// Settings consumed by the response classifier and the seed selector
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Response headers consulted, in order, for the CDN cache status
    #[serde(default = "default_cache_status_headers")]
    pub cache_status_headers: Vec<String>,

    /// Short codes assumed to already exist in the service
    #[serde(default)]
    pub seed_codes: Vec<String>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            cache_status_headers: default_cache_status_headers(),
            seed_codes: Vec::new(),
        }
    }
}

impl Validatable for ProbeConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.cache_status_headers.is_empty() {
            return Err(self.validation_error("cache_status_headers cannot be empty"));
        }
        for header in &self.cache_status_headers {
            validate_required_string(header, "cache_status_headers", self.domain_name())?;
        }

        if self.seed_codes.len() > MAX_SEED_CODES {
            return Err(self.validation_error(format!(
                "seed_codes holds {} entries, at most {} are supported",
                self.seed_codes.len(),
                MAX_SEED_CODES
            )));
        }
        for code in &self.seed_codes {
            validate_required_string(code, "seed_codes", self.domain_name())?;
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "probe"
    }
}

fn default_cache_status_headers() -> Vec<String> {
    vec!["x-cache".to_string(), "cf-cache-status".to_string()]
}
