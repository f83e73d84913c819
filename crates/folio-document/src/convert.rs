// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Legacy format conversion.
//
// Binary `.doc` manuscripts are never parsed directly. An external office
// suite converts them to DOCX, which the DOCX extractor then reads. The
// conversion sits behind the `DocumentConverter` port so the parser can be
// exercised without LibreOffice installed.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, info, instrument, warn};

use folio_core::config::ConverterConfig;
use folio_core::error::{FolioError, Result};

/// How often a running conversion is polled for completion.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Converts a legacy document into DOCX inside a caller-owned directory.
pub trait DocumentConverter: Send + Sync {
    /// Convert `source` and return the path of the produced `.docx`, which
    /// must live inside `out_dir`.
    fn convert_to_docx(&self, source: &Path, out_dir: &Path) -> Result<PathBuf>;
}

/// LibreOffice in headless mode.
#[derive(Debug, Clone)]
pub struct SofficeConverter {
    program: PathBuf,
    timeout: Duration,
}

impl SofficeConverter {
    /// Use an explicit executable.
    pub fn new(program: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    /// Locate the configured program on `PATH` (or at its path, if it has
    /// one). Returns `None` when it is missing or not executable, which
    /// callers report as "cannot parse .doc".
    pub fn from_config(config: &ConverterConfig) -> Option<Self> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let program = which::which(&config.program).ok()?;
        debug!(program = %program.display(), "Document converter located");
        Some(Self::new(program, timeout))
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl DocumentConverter for SofficeConverter {
    #[instrument(skip(self), fields(program = %self.program.display()))]
    fn convert_to_docx(&self, source: &Path, out_dir: &Path) -> Result<PathBuf> {
        info!(source = %source.display(), "Converting DOC to DOCX");

        let mut child = Command::new(&self.program)
            .arg("--headless")
            .arg("--convert-to")
            .arg("docx")
            .arg("--outdir")
            .arg(out_dir)
            .arg(source)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|err| {
                FolioError::ExtractionFailed(format!(
                    "failed to launch LibreOffice ({}): {err}",
                    self.program.display()
                ))
            })?;

        let started = Instant::now();
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if started.elapsed() >= self.timeout {
                warn!(timeout = ?self.timeout, "DOC conversion timed out, killing converter");
                // The child may have exited between the poll and the kill.
                let _ = child.kill();
                let _ = child.wait();
                return Err(FolioError::ExtractionFailed(format!(
                    "LibreOffice conversion timed out after {}s",
                    self.timeout.as_secs_f64()
                )));
            }
            thread::sleep(POLL_INTERVAL);
        };

        if !status.success() {
            return Err(FolioError::ExtractionFailed(format!(
                "LibreOffice conversion failed with {status}"
            )));
        }

        first_docx(out_dir)?.ok_or_else(|| {
            FolioError::ExtractionFailed(
                "DOC conversion failed. Please re-save the manuscript as DOCX and upload again."
                    .into(),
            )
        })
    }
}

/// First `.docx` in `dir` by file name.
fn first_docx(dir: &Path) -> Result<Option<PathBuf>> {
    let mut produced: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("docx"))
        })
        .collect();
    produced.sort();
    Ok(produced.into_iter().next())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_is_not_located() {
        let config = ConverterConfig {
            program: "folio-no-such-office-suite".into(),
            timeout_secs: 5,
        };
        assert!(SofficeConverter::from_config(&config).is_none());

        let config = ConverterConfig {
            program: "/nonexistent/dir/soffice".into(),
            timeout_secs: 5,
        };
        assert!(SofficeConverter::from_config(&config).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn non_executable_program_is_not_located() {
        use std::os::unix::fs::PermissionsExt;
        let bin = tempfile::tempdir().unwrap();
        let path = bin.path().join("soffice");
        fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let config = ConverterConfig {
            program: path.display().to_string(),
            timeout_secs: 5,
        };
        assert!(SofficeConverter::from_config(&config).is_none());

        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        let located = SofficeConverter::from_config(&config).unwrap();
        assert_eq!(located.program(), path.as_path());
    }

    #[test]
    fn first_docx_prefers_lowest_name() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.docx"), b"").unwrap();
        fs::write(dir.path().join("a.DOCX"), b"").unwrap();
        fs::write(dir.path().join("a.log"), b"").unwrap();
        let found = first_docx(dir.path()).unwrap().unwrap();
        assert_eq!(found.file_name().unwrap(), "a.DOCX");
    }

    #[cfg(unix)]
    fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_an_extraction_failure() {
        let bin = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let converter =
            SofficeConverter::new(script(bin.path(), "fail", "exit 3"), Duration::from_secs(10));
        let err = converter
            .convert_to_docx(Path::new("book.doc"), out.path())
            .unwrap_err();
        assert!(matches!(err, FolioError::ExtractionFailed(_)));
    }

    #[cfg(unix)]
    #[test]
    fn success_without_output_reports_conversion_failure() {
        let bin = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let converter =
            SofficeConverter::new(script(bin.path(), "noop", "exit 0"), Duration::from_secs(10));
        match converter.convert_to_docx(Path::new("book.doc"), out.path()) {
            Err(FolioError::ExtractionFailed(msg)) => {
                assert!(msg.starts_with("DOC conversion failed."))
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn produced_docx_is_returned() {
        let bin = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        // $5 is the --outdir value.
        let program = script(bin.path(), "convert", "touch \"$5/book.docx\"");
        let converter = SofficeConverter::new(program, Duration::from_secs(10));
        let produced = converter
            .convert_to_docx(Path::new("book.doc"), out.path())
            .unwrap();
        assert_eq!(produced, out.path().join("book.docx"));
    }

    #[cfg(unix)]
    #[test]
    fn slow_conversion_is_killed() {
        let bin = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        let converter = SofficeConverter::new(
            script(bin.path(), "slow", "sleep 30"),
            Duration::from_millis(300),
        );
        let started = Instant::now();
        match converter.convert_to_docx(Path::new("book.doc"), out.path()) {
            Err(FolioError::ExtractionFailed(msg)) => assert!(msg.contains("timed out")),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
