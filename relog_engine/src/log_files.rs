//! File handling around the normalizer: backup, read, write and archive.
//!
//! Nothing is written to the log until the whole file has been read,
//! decoded and normalized, and an in-place rewrite only starts once a
//! backup of the original exists.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::info;
use time::OffsetDateTime;
use zip::{CompressionMethod, ZipWriter, write::FileOptions};

use crate::error::RelogError;
use crate::loader::load_rule_set;
use crate::pipeline::{NormalizeReport, Normalizer};
use crate::player::PlayerName;

/// Log file name the game writes by default.
pub const DEFAULT_LOG_FILE: &str = "WoWCombatLog.txt";

/// Line terminator of a log. The game writes CRLF on Windows; whatever the
/// input used is written back out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    /// A log is CRLF if its first line ends in CRLF.
    pub fn detect(text: &str) -> Self {
        match text.find('\n') {
            Some(end) if text[..end].ends_with('\r') => LineEnding::CrLf,
            _ => LineEnding::Lf,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

/// Decoded log lines, terminators removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogText {
    pub lines: Vec<String>,
    pub line_ending: LineEnding,
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub log_path: PathBuf,
    pub player: PlayerName,
    /// Write here instead of rewriting `log_path` in place.
    pub out_path: Option<PathBuf>,
    pub rules_path: Option<PathBuf>,
    pub archive: bool,
}

#[derive(Debug)]
pub struct RunSummary {
    pub backup: Option<PathBuf>,
    pub output: PathBuf,
    pub archive: Option<PathBuf>,
    pub report: NormalizeReport,
}

/// `logs/WoWCombatLog.txt` becomes `logs/WoWCombatLog.original.<ts>.txt`.
pub fn backup_path(path: &Path, unix_ts: i64) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let base = name.strip_suffix(".txt").unwrap_or(&name);
    path.with_file_name(format!("{base}.original.{unix_ts}.txt"))
}

/// `WoWCombatLog.txt` is archived as `WoWCombatLog.txt.zip`.
pub fn archive_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".zip");
    path.with_file_name(name)
}

/// Copy the log next to itself under a timestamped name.
///
/// # Errors
/// Returns `BackupFailure` if the copy cannot be made.
pub fn create_backup(path: &Path) -> Result<PathBuf, RelogError> {
    let backup = backup_path(path, OffsetDateTime::now_utc().unix_timestamp());
    fs::copy(path, &backup).map_err(|source| RelogError::BackupFailure {
        path: path.to_path_buf(),
        source,
    })?;
    info!("backup created: {}", backup.display());
    Ok(backup)
}

/// Read a log as UTF-8 text, one entry per line with terminators removed.
///
/// # Errors
/// Returns `Io` if the file cannot be read and `EncodingFailure` if it is not UTF-8.
pub fn read_log(path: &Path) -> Result<LogText, RelogError> {
    let bytes = fs::read(path).map_err(|source| RelogError::Io {
        context: format!("reading '{}'", path.display()),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|source| RelogError::EncodingFailure {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(LogText {
        lines: text.lines().map(str::to_string).collect(),
        line_ending: LineEnding::detect(&text),
    })
}

/// Write lines back out, each followed by `line_ending`.
///
/// # Errors
/// Returns `Io` if the file cannot be written.
pub fn write_log(path: &Path, lines: &[String], line_ending: LineEnding) -> Result<(), RelogError> {
    let eol = line_ending.as_str();
    let mut text = String::with_capacity(lines.iter().map(|l| l.len() + eol.len()).sum());
    for line in lines {
        text.push_str(line);
        text.push_str(eol);
    }
    fs::write(path, text).map_err(|source| RelogError::Io {
        context: format!("writing '{}'", path.display()),
        source,
    })
}

/// Zip a single file, stored under its base name.
///
/// # Errors
/// Returns `Archive` if the archive cannot be created or written.
pub fn create_archive(source: &Path, archive: &Path) -> Result<(), RelogError> {
    write_archive(source, archive).map_err(|source| RelogError::Archive {
        path: archive.to_path_buf(),
        source,
    })?;
    info!("archive created: {}", archive.display());
    Ok(())
}

fn write_archive(source: &Path, archive: &Path) -> zip::result::ZipResult<()> {
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut zip = ZipWriter::new(File::create(archive)?);
    let options = FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);
    zip.start_file(name, options)?;
    let mut input = File::open(source)?;
    io::copy(&mut input, &mut zip)?;
    zip.finish()?;
    Ok(())
}

/// Normalize one log file end to end.
///
/// # Errors
/// Errors bubble up from rule loading, pattern compilation, backup, decoding,
/// writing, or archiving; in every case the log itself is left untouched
/// unless the write step was reached.
pub fn process_file(options: &RunOptions) -> Result<RunSummary> {
    let rules = load_rule_set(options.rules_path.as_deref()).context("while loading rule set")?;
    let normalizer = Normalizer::new(&rules, options.player.clone()).context("while compiling rule set")?;

    let output = options.out_path.clone().unwrap_or_else(|| options.log_path.clone());
    let backup = if output == options.log_path {
        Some(create_backup(&options.log_path)?)
    } else {
        None
    };

    let log = read_log(&options.log_path)?;
    info!("normalizing {} lines for {}", log.lines.len(), normalizer.player());
    let report = normalizer.run(log.lines)?;
    write_log(&output, &report.lines, log.line_ending)?;
    info!("wrote {} lines to {}", report.lines.len(), output.display());

    let archive = if options.archive {
        let archive = archive_path(&output);
        create_archive(&output, &archive)?;
        Some(archive)
    } else {
        None
    };

    Ok(RunSummary {
        backup,
        output,
        archive,
        report,
    })
}
