// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "folio",
    version,
    about = "Parse manuscripts and check covers against KDP ebook requirements"
)]
pub struct Cli {
    /// JSON file overriding cover targets and converter settings.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a manuscript into chapter and paragraph blocks.
    Parse(ParseArgs),
    /// Validate a cover image, auto-correcting it unless told not to.
    Cover(CoverArgs),
    /// Print the KDP source-format compliance report for a manuscript.
    Compliance(ComplianceArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ParseArgs {
    pub file: PathBuf,

    /// Defaults to the file name without its extension.
    #[arg(long)]
    pub title: Option<String>,

    #[arg(long, default_value = "Unknown Author")]
    pub author: String,

    /// Print the manuscript as JSON instead of a summary.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CoverArgs {
    pub image: PathBuf,

    /// `front` or `back`; anything else is treated as `front`.
    #[arg(long, default_value = "front")]
    pub role: String,

    /// Where the corrected cover is written. Defaults to the image's directory.
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    #[arg(long, default_value_t = false)]
    pub no_auto_fix: bool,

    /// Print validation results as JSON instead of the text report.
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug, Clone)]
pub struct ComplianceArgs {
    pub file: PathBuf,

    /// Label of a generated output to list in the report; repeatable.
    #[arg(long = "output")]
    pub outputs: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_defaults() {
        let cli = Cli::try_parse_from(["folio", "parse", "book.docx"]).unwrap();
        match cli.command {
            Commands::Parse(args) => {
                assert_eq!(args.file, PathBuf::from("book.docx"));
                assert_eq!(args.title, None);
                assert_eq!(args.author, "Unknown Author");
                assert!(!args.json);
            }
            other => panic!("unexpected command: {other:?}"),
        }
        assert!(cli.config.is_none());
    }

    #[test]
    fn cover_flags_and_global_config() {
        let cli = Cli::try_parse_from([
            "folio",
            "cover",
            "back.png",
            "--role",
            "back",
            "--no-auto-fix",
            "--config",
            "folio.json",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("folio.json")));
        match cli.command {
            Commands::Cover(args) => {
                assert_eq!(args.role, "back");
                assert!(args.no_auto_fix);
                assert!(args.out_dir.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn compliance_outputs_repeat() {
        let cli = Cli::try_parse_from([
            "folio",
            "compliance",
            "book.epub",
            "--output",
            "Kindle EPUB (EPUB)",
            "--output",
            "Print PDF (PDF)",
        ])
        .unwrap();
        match cli.command {
            Commands::Compliance(args) => assert_eq!(args.outputs.len(), 2),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn subcommand_is_required() {
        assert!(Cli::try_parse_from(["folio"]).is_err());
    }
}
