// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{CartaoError, Result};
use crate::types::OfficeUnit;

/// File name of the persisted configuration inside the data directory.
pub const CONFIG_FILE: &str = "config.json";

/// Environment variable overriding [`AppConfig::origin`].
pub const ORIGIN_ENV: &str = "CARTAO_ORIGIN";

/// Largest photo accepted for upload (2 MiB).
pub const DEFAULT_MAX_PHOTO_BYTES: u64 = 2 * 1024 * 1024;

/// Widest quiet zone a QR style may ask for, in modules.
pub const MAX_QR_MARGIN_MODULES: u32 = 16;

/// Raster QR appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrStyle {
    /// Minimum edge length of the rendered image in pixels.
    pub size_px: u32,
    /// Quiet zone around the symbol, in modules.
    pub margin_modules: u32,
    /// Dark module colour as `#rrggbb`.
    pub dark: String,
    /// Light module colour as `#rrggbb`, or `transparent`.
    pub light: String,
}

impl QrStyle {
    /// Dashboard raster: 200 px, 2-module margin, black on white.
    pub fn dashboard() -> Self {
        Self {
            size_px: 200,
            margin_modules: 2,
            dark: "#000000".into(),
            light: "#ffffff".into(),
        }
    }

    /// Public card vector: 96 px, no margin, ink on transparent.
    pub fn card() -> Self {
        Self {
            size_px: 96,
            margin_modules: 0,
            dark: "#111827".into(),
            light: "transparent".into(),
        }
    }
}

impl QrStyle {
    /// Reject margins no scanner needs and no raster could hold.
    pub fn validate(&self) -> Result<()> {
        if self.margin_modules > MAX_QR_MARGIN_MODULES {
            return Err(CartaoError::Config(format!(
                "qr.margin_modules must be at most {MAX_QR_MARGIN_MODULES}, got {}",
                self.margin_modules
            )));
        }
        Ok(())
    }
}

impl Default for QrStyle {
    fn default() -> Self {
        Self::dashboard()
    }
}

/// Persistent application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// External base URL of the deployment; share URLs are `<origin>/card/<uid>`.
    pub origin: String,
    /// Photo size ceiling in bytes. Larger files are rejected before upload.
    pub max_photo_bytes: u64,
    /// Appearance of the dashboard QR raster.
    pub qr: QrStyle,
    /// Office units offered as address presets.
    pub units: Vec<OfficeUnit>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            origin: "http://localhost:3000".into(),
            max_photo_bytes: DEFAULT_MAX_PHOTO_BYTES,
            qr: QrStyle::default(),
            units: OfficeUnit::defaults(),
        }
    }
}

impl AppConfig {
    /// Load `config.json` from `data_dir`, falling back to defaults when the
    /// file is missing or unreadable. `CARTAO_ORIGIN` overrides the origin.
    pub fn load(data_dir: &Path) -> Self {
        let path = data_dir.join(CONFIG_FILE);
        let mut config = match std::fs::read_to_string(&path) {
            Ok(data) => serde_json::from_str(&data).unwrap_or_else(|e| {
                warn!(path = %path.display(), "ignoring unreadable config: {e}");
                Self::default()
            }),
            Err(_) => {
                debug!(path = %path.display(), "no config file, using defaults");
                Self::default()
            }
        };
        if let Ok(origin) = std::env::var(ORIGIN_ENV) {
            config.origin = origin;
        }
        config
    }

    /// Write the configuration as pretty JSON to `data_dir/config.json`.
    pub fn persist(&self, data_dir: &Path) -> Result<()> {
        self.validate()?;
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(data_dir.join(CONFIG_FILE), json)?;
        Ok(())
    }

    /// Reject settings the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.origin.is_empty() {
            return Err(CartaoError::Config("origin must not be empty".into()));
        }
        if self.max_photo_bytes == 0 {
            return Err(CartaoError::Config("max_photo_bytes must be positive".into()));
        }
        self.qr.validate()
    }
}
