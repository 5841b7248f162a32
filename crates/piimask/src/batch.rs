//! Line-by-line masking of streams.
//!
//! Each input line is masked on its own and written out as soon as it is
//! done, so inputs of any total size go through in constant memory. The
//! size limit applies to every line separately.

use std::io::{BufRead, Write};

use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::masking::PiiMasker;

/// Output format for masked lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineFormat {
    /// The masked text, one line per input line.
    #[default]
    Plain,
    /// One compact JSON object per input line (JSONL).
    Json,
}

/// Masks a stream one line at a time.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchMasker {
    masker: PiiMasker,
    max_line_bytes: Option<usize>,
}

impl BatchMasker {
    /// Create a batch masker with the built-in rules and no line limit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a batch masker that applies the configured input limit to
    /// each line.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self::new().with_max_line_bytes(config.max_input_bytes())
    }

    /// Set the per-line size limit in bytes (`None` for unlimited).
    #[must_use]
    pub fn with_max_line_bytes(mut self, limit: Option<usize>) -> Self {
        self.max_line_bytes = limit;
        self
    }

    /// Mask every line of `reader` and write the results to `writer`.
    ///
    /// Line terminators (`\n` or `\r\n`) are stripped before masking and
    /// every output record ends with `\n`. Returns the number of lines
    /// written.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LineTooLarge`] for the first line over the limit,
    /// [`Error::Io`] if reading fails or the input is not UTF-8, and
    /// [`Error::Json`] if a JSON record cannot be written.
    pub fn mask_lines<R, W>(&self, reader: R, mut writer: W, format: LineFormat) -> Result<usize>
    where
        R: BufRead,
        W: Write,
    {
        let mut count = 0;
        for line in reader.lines() {
            let line = line?;
            count += 1;

            if let Some(limit) = self.max_line_bytes {
                if line.len() > limit {
                    return Err(Error::LineTooLarge {
                        line: count,
                        len: line.len(),
                        limit,
                    });
                }
            }

            let result = self.masker.mask(&line);
            match format {
                LineFormat::Plain => writer.write_all(result.masked_text.as_bytes())?,
                LineFormat::Json => serde_json::to_writer(&mut writer, &result)?,
            }
            writer.write_all(b"\n")?;
        }
        writer.flush()?;

        debug!(lines = count, "Masked stream");
        Ok(count)
    }
}
