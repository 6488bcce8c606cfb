// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Server configuration loaded from environment variables.

use ifc_lite_materials::GeometrySettings;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// IFC model loaded at startup.
    pub model_path: String,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Circle tessellation override; `None` uses precise settings.
    pub circle_segments: Option<usize>,
    /// Allowed CORS origins (comma-separated, or "*" for all).
    pub cors_origins: Vec<String>,
    /// Emit logs as JSON lines instead of pretty output.
    pub log_json: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".into())
                .parse()
                .unwrap_or(5000),
            model_path: std::env::var("IFC_MODEL_PATH").unwrap_or_else(|_| "institute.ifc".into()),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "300".into())
                .parse()
                .unwrap_or(300),
            circle_segments: std::env::var("CIRCLE_SEGMENTS")
                .ok()
                .and_then(|s| s.parse().ok()),
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            log_json: std::env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        }
    }

    /// Tessellation used for area and volume integration.
    pub fn geometry_settings(&self) -> GeometrySettings {
        match self.circle_segments {
            Some(segments) => GeometrySettings::with_circle_segments(segments),
            None => GeometrySettings::precise(),
        }
    }

    /// Whether any origin may call the API.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.is_empty() || self.cors_origins.iter().any(|o| o == "*")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            host: "127.0.0.1".into(),
            port: 5000,
            model_path: "institute.ifc".into(),
            request_timeout_secs: 300,
            circle_segments: None,
            cors_origins: vec!["*".into()],
            log_json: false,
        }
    }

    #[test]
    fn test_geometry_settings() {
        let mut config = config();
        assert_eq!(config.geometry_settings(), GeometrySettings::precise());

        config.circle_segments = Some(16);
        assert_eq!(config.geometry_settings().circle_segments, 16);
    }

    #[test]
    fn test_cors_origins() {
        let mut config = config();
        assert!(config.allows_any_origin());

        config.cors_origins = vec!["http://localhost:3000".into()];
        assert!(!config.allows_any_origin());
    }
}
