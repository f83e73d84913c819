// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

pub mod compliance;
pub mod cover;
pub mod parse;

use std::path::Path;

use folio_core::config::FolioConfig;
use folio_core::error::Result;
use tracing::debug;

/// Configuration from `path`, or the built-in KDP defaults.
pub fn load_config(path: Option<&Path>) -> Result<FolioConfig> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "Loading configuration");
            FolioConfig::load(path)
        }
        None => Ok(FolioConfig::default()),
    }
}
