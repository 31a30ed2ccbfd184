// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use serde_json::{Map, Value, json};

#[derive(Parser, Debug)]
#[command(name = "scanwerk")]
#[command(about = "Scan document pages into JPEG images and a PDF")]
#[command(version)]
pub struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long = "config", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Import pages from a directory and write the scan result
    Scan(ScanArgs),
    /// Print the effective configuration
    Config {
        /// Also write the configuration to the config path
        #[arg(long)]
        init: bool,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    /// Directory holding the page images, imported in file-name order
    #[arg(short = 'f', long = "from", value_name = "DIR")]
    pub from: PathBuf,

    /// Directory the images, document, and manifest are written to
    #[arg(short = 'o', long = "out", value_name = "DIR")]
    pub out: PathBuf,

    /// Keep at most N pages
    #[arg(short = 'n', long = "max-pages", value_name = "N")]
    pub max_pages: Option<i64>,

    /// Also produce a combined PDF
    #[arg(short = 'd', long = "document")]
    pub document: bool,

    /// Do not write per-page JPEG images
    #[arg(long = "no-images")]
    pub no_images: bool,

    /// JPEG quality between 0 and 1
    #[arg(short = 'q', long = "quality", value_name = "Q")]
    pub quality: Option<f64>,

    /// Scanner mode (full, base_with_filter, base)
    #[arg(short = 'm', long = "mode", value_name = "MODE")]
    pub mode: Option<String>,

    /// Keep every captured page even when --max-pages is set
    #[arg(long = "no-enforce-limit")]
    pub no_enforce_limit: bool,

    /// Refuse gallery (directory) import
    #[arg(long = "no-gallery")]
    pub no_gallery: bool,

    /// Pause before pages are delivered, in milliseconds
    #[arg(long = "delay-ms", value_name = "MS")]
    pub delay_ms: Option<u64>,
}

impl ScanArgs {
    /// The request as a host would send it: only options the user set.
    pub fn to_arguments(&self) -> Map<String, Value> {
        let mut args = Map::new();
        if let Some(max_pages) = self.max_pages {
            args.insert("maxPages".into(), json!(max_pages));
        }
        if self.document {
            args.insert("returnDocument".into(), json!(true));
        }
        if self.no_images {
            args.insert("returnImages".into(), json!(false));
        }
        if let Some(quality) = self.quality {
            args.insert("imageQuality".into(), json!(quality));
        }
        if let Some(mode) = &self.mode {
            args.insert("scannerMode".into(), json!(mode));
        }
        if self.no_enforce_limit {
            args.insert("enforceMaxPageLimit".into(), json!(false));
        }
        if self.no_gallery {
            args.insert("allowGalleryImport".into(), json!(false));
        }
        args
    }
}
