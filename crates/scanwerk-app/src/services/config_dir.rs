// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-aware configuration directory resolution.

use std::path::{Path, PathBuf};

/// Return the default config file path (`<config dir>/scanwerk/config.json`).
pub fn default_config_path() -> PathBuf {
    config_path_from(
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

fn config_path_from(xdg: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    base_dir(xdg, home).join("scanwerk").join("config.json")
}

fn base_dir(xdg: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    // XDG first, then ~/.config
    if let Some(xdg) = xdg.filter(|p| p.is_absolute()) {
        return xdg;
    }
    if let Some(home) = home {
        return home.join(".config");
    }
    // Last resort
    Path::new(".").to_path_buf()
}
