// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>

use std::io::Write;

use folio_core::config::FolioConfig;
use folio_core::error::{FolioError, Result};
use folio_core::types::Manuscript;
use folio_document::ManuscriptParser;
use tracing::info;

use crate::cli::ParseArgs;

/// Paragraph previews are cut to this many characters.
const PREVIEW_CHARS: usize = 72;

pub fn run(args: &ParseArgs, config: &FolioConfig, out: &mut impl Write) -> Result<()> {
    let title = args.title.clone().unwrap_or_else(|| {
        args.file
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    });

    let parser = ManuscriptParser::with_config(&config.converter);
    let manuscript = match parser.parse(&args.file, &title, &args.author) {
        Ok(manuscript) => manuscript,
        // KPF skips reflow entirely: the package is delivered as uploaded.
        Err(FolioError::PassThroughFormat(notice)) => {
            info!(file = %args.file.display(), "Pass-through source, not parsed");
            writeln!(out, "{notice}")?;
            writeln!(out, "Deliver {} unchanged.", args.file.display())?;
            return Ok(());
        }
        Err(err) => return Err(err),
    };

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &manuscript)?;
        writeln!(out)?;
    } else {
        write_summary(&manuscript, out)?;
    }
    Ok(())
}

fn write_summary(manuscript: &Manuscript, out: &mut impl Write) -> Result<()> {
    writeln!(out, "Title: {}", manuscript.title())?;
    writeln!(out, "Author: {}", manuscript.author())?;
    writeln!(
        out,
        "Blocks: {} ({} chapters)",
        manuscript.blocks().len(),
        manuscript.chapter_count()
    )?;
    writeln!(out)?;

    for block in manuscript.blocks() {
        if block.is_chapter() {
            writeln!(out, "[chapter] {}", block.text())?;
        } else {
            writeln!(out, "  {}", preview(block.text()))?;
        }
    }
    Ok(())
}

fn preview(text: &str) -> String {
    if text.chars().count() <= PREVIEW_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(PREVIEW_CHARS).collect();
    format!("{}...", cut.trim_end())
}
