use std::path::Path;

use crate::buffer::Buffer;
use crate::codec;
use crate::config::Config;
use crate::error::{Result, SyncError};
use crate::fs::{self, FileSystem, RealFileSystem};
use crate::language::{self, LineKind, HEADER, HEADER_MARKER};
use crate::logging;
use crate::scanner::MarkerScanner;

/// Options that shape a synchronization run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    pub function: String,
    pub max_literal_len: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for SyncOptions {
    fn from(config: &Config) -> Self {
        Self {
            function: config.function.clone(),
            max_literal_len: config.max_literal_length,
        }
    }
}

/// Keys added and removed by one run, in the order they were reported
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub added: Vec<Vec<u8>>,
    pub removed: Vec<Vec<u8>>,
}

impl SyncReport {
    pub fn is_clean(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    pub fn added_lossy(&self) -> Vec<String> {
        lossy(&self.added)
    }

    pub fn removed_lossy(&self) -> Vec<String> {
        lossy(&self.removed)
    }
}

fn lossy(keys: &[Vec<u8>]) -> Vec<String> {
    keys.iter()
        .map(|k| String::from_utf8_lossy(k).into_owned())
        .collect()
}

fn ends_with_line_break(buf: &Buffer) -> bool {
    buf.is_empty() || matches!(buf.as_bytes().last(), Some(b'\n') | Some(b'\r'))
}

/// Synchronize `language_path` against the markers in `source_path` on the
/// real file system with default options
pub fn synchronize(source_path: &Path, language_path: &Path) -> Result<SyncReport> {
    Synchronizer::new(&RealFileSystem, SyncOptions::default()).run(source_path, language_path)
}

/// Adds keys found in a source file to a language file and drops entries
/// whose keys the source no longer uses.
pub struct Synchronizer<'f, F: FileSystem + ?Sized> {
    fs: &'f F,
    options: SyncOptions,
}

impl<'f, F: FileSystem + ?Sized> Synchronizer<'f, F> {
    pub fn new(fs: &'f F, options: SyncOptions) -> Self {
        Self { fs, options }
    }

    pub fn run(&self, source_path: &Path, language_path: &Path) -> Result<SyncReport> {
        let source = fs::load_buffer(self.fs, source_path)?;
        logging::debug(&format!(
            "loaded {} ({} bytes)",
            source_path.display(),
            source.len()
        ));

        let mut report = SyncReport::default();
        self.add_missing(&source, language_path, &mut report)?;
        self.remove_obsolete(&source, language_path, &mut report)?;
        Ok(report)
    }

    /// Append a `key = ` line for every marker whose key the language file
    /// lacks. The file is reloaded for every marker, so edits made by others
    /// during the pass are seen by later iterations.
    fn add_missing(
        &self,
        source: &Buffer,
        language_path: &Path,
        report: &mut SyncReport,
    ) -> Result<()> {
        let scanner = MarkerScanner::new(
            source,
            &self.options.function,
            self.options.max_literal_len,
        );

        for literal in scanner {
            let literal = literal?;
            let language = fs::load_buffer(self.fs, language_path)?;
            logging::debug(&format!(
                "marker at byte {}: {:?} (language file {} bytes)",
                literal.offset,
                literal.key_lossy(),
                language.len()
            ));

            if language.contains(&codec::entry_lookup(&literal.key)) {
                continue;
            }

            if report.added.is_empty() && !ends_with_line_break(&language) {
                logging::warn(&format!(
                    "{} does not end with a line break; the first new entry joins its last line",
                    language_path.display()
                ));
            }

            let mut entry = Vec::new();
            if report.added.is_empty() && !language.contains(HEADER_MARKER) {
                entry.extend_from_slice(HEADER);
            }
            entry.extend_from_slice(&codec::entry_line(&literal.key));
            self.fs
                .append(language_path, &entry)
                .map_err(|e| SyncError::unwritable_output(language_path, e))?;

            logging::info(&format!("Added string: {}", literal.key_lossy()));
            report.added.push(literal.key);
        }

        Ok(())
    }

    /// Drop every entry line whose key no longer appears as a marker call in
    /// the source, then rewrite the language file.
    fn remove_obsolete(
        &self,
        source: &Buffer,
        language_path: &Path,
        report: &mut SyncReport,
    ) -> Result<()> {
        let language = fs::load_buffer(self.fs, language_path)?;
        let lines = language::split_lines(language.as_bytes());

        let mut kept = Vec::with_capacity(lines.len());
        for line in lines {
            let key = match line.kind() {
                LineKind::Comment => {
                    kept.push(line);
                    continue;
                }
                LineKind::Entry { key } => key,
            };

            // Near-empty keys are never removed.
            let token = codec::marker_token(&self.options.function, key);
            if key.len() <= 1 || source.contains(&token) {
                kept.push(line);
                continue;
            }

            logging::info(&format!(
                "Removed string: {}",
                String::from_utf8_lossy(key)
            ));
            report.removed.push(key.to_vec());
        }

        self.fs
            .write(language_path, &language::join_lines(&kept))
            .map_err(|e| SyncError::unwritable_output(language_path, e))
    }
}
