//! Loading SQL scripts from disk with block comments removed

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use crate::batch::{split_batches, Batch};
use crate::config::LoaderConfig;
use crate::retry::{retry_with, Sleeper, ThreadSleeper};
use crate::scanner::{strip_comments, CommentStrippingScanner};
use crate::stream::DecodingReader;
use crate::{Error, Result};

const BOM: char = '\u{feff}';

/// A comment-stripped script and where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlScript {
    pub path: Option<PathBuf>,
    pub text: String,
}

impl SqlScript {
    pub fn batches(&self, separator: &str) -> Vec<Batch> {
        split_batches(&self.text, separator)
    }
}

/// Reads script files and hands back their comment-free text
pub struct SqlScriptLoader {
    config: LoaderConfig,
    sleeper: Box<dyn Sleeper>,
}

impl Default for SqlScriptLoader {
    fn default() -> Self {
        Self::new(LoaderConfig::default())
    }
}

impl SqlScriptLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self::with_sleeper(config, Box::new(ThreadSleeper))
    }

    pub fn with_sleeper(config: LoaderConfig, sleeper: Box<dyn Sleeper>) -> Self {
        Self { config, sleeper }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Open `path`, decode it and strip block comments
    pub fn load(&self, path: impl AsRef<Path>) -> Result<SqlScript> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::ScriptOpen {
            path: path.to_path_buf(),
            source,
        })?;

        let mut script = self.load_reader(file)?;
        tracing::info!(path = %path.display(), bytes = script.text.len(), "Loaded script");
        script.path = Some(path.to_path_buf());
        Ok(script)
    }

    /// Decode with the configured encoding, letting a BOM override it when
    /// `strip_bom` is set, then strip block comments
    pub fn load_reader(&self, reader: impl Read) -> Result<SqlScript> {
        let encoding = self.config.encoding()?;
        let stream = if self.config.strip_bom {
            DecodingReader::new(reader, encoding)
        } else {
            DecodingReader::without_bom_handling(reader, encoding)
        };

        let text = CommentStrippingScanner::new(stream).read_to_end()?;
        Ok(SqlScript { path: None, text })
    }

    /// Strip block comments from text that is already decoded
    pub fn load_str(&self, text: &str) -> SqlScript {
        let text = match text.strip_prefix(BOM) {
            Some(rest) if self.config.strip_bom => rest,
            _ => text,
        };
        SqlScript {
            path: None,
            text: strip_comments(text),
        }
    }

    /// Load and split in one step using the configured separator
    pub fn load_batches(&self, path: impl AsRef<Path>) -> Result<Vec<Batch>> {
        Ok(self.load(path)?.batches(&self.config.batch_separator))
    }

    /// Write `text` to `path`, retrying per `save_retry` while the file is busy
    pub fn save(&self, path: impl AsRef<Path>, text: &str) -> Result<()> {
        let path = path.as_ref();
        retry_with(&self.config.save_retry, self.sleeper.as_ref(), |attempt| {
            tracing::debug!(path = %path.display(), attempt, "Saving script");
            std::fs::write(path, text)
        })?;
        tracing::info!(path = %path.display(), "Saved script");
        Ok(())
    }
}
