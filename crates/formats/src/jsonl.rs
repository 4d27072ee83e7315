//! JSONL (JSON Lines) reader and writer
//!
//! One JSON object per line, with automatic gzip handling for `.gz` paths.

use crate::record::{records_to_dataset, value_to_json, Record};
use crate::{Error, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use rowdedup_core::Dataset;
use serde_json::{Map, Value as Json};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, info, warn};

/// Configuration for JSONL reader
#[derive(Debug, Clone)]
pub struct JsonlConfig {
    /// Fields to extract (None = all fields)
    pub fields: Option<Vec<String>>,
    /// Buffer size for BufReader
    pub buffer_size: usize,
}

impl Default for JsonlConfig {
    fn default() -> Self {
        Self {
            fields: None,
            buffer_size: 64 * 1024, // 64KB buffer
        }
    }
}

fn is_gzip(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("gz")
}

/// Streaming JSONL reader that processes files line-by-line
pub struct JsonlReader<R: Read> {
    reader: BufReader<R>,
    config: JsonlConfig,
    line_number: usize,
    bytes_read: u64,
    skipped: usize,
}

impl JsonlReader<Box<dyn Read>> {
    /// Open a JSONL file, auto-detecting gzip compression
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;

        let reader: Box<dyn Read> = if is_gzip(path) {
            debug!("Opening gzip-compressed JSONL file: {:?}", path);
            Box::new(GzDecoder::new(file))
        } else {
            debug!("Opening plain JSONL file: {:?}", path);
            Box::new(file)
        };
        Ok(Self::new(reader))
    }
}

impl<R: Read> JsonlReader<R> {
    /// Create a new JSONL reader from any Read source
    pub fn new(reader: R) -> Self {
        Self::new_with_config(reader, JsonlConfig::default())
    }

    /// Create a new JSONL reader with custom configuration
    pub fn new_with_config(reader: R, config: JsonlConfig) -> Self {
        Self {
            reader: BufReader::with_capacity(config.buffer_size, reader),
            config,
            line_number: 0,
            bytes_read: 0,
            skipped: 0,
        }
    }

    /// Set specific fields to extract
    pub fn with_fields(mut self, fields: Vec<String>) -> Self {
        self.config.fields = Some(fields);
        self
    }

    /// Get the number of lines processed
    pub fn lines_processed(&self) -> usize {
        self.line_number
    }

    /// Get the number of bytes read
    pub fn bytes_processed(&self) -> u64 {
        self.bytes_read
    }

    /// Lines skipped because they were not a JSON object
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Read every remaining record into a dataset
    pub fn into_dataset(mut self) -> Result<Dataset> {
        let records = self.by_ref().collect::<Result<Vec<_>>>()?;
        if self.skipped > 0 {
            warn!("Skipped {} malformed JSONL lines", self.skipped);
        }
        Ok(records_to_dataset(records)?)
    }

    fn extract_fields(&self, map: Map<String, Json>) -> Map<String, Json> {
        match self.config.fields {
            Some(ref fields) => map.into_iter().filter(|(k, _)| fields.contains(k)).collect(),
            None => map,
        }
    }
}

impl<R: Read> Iterator for JsonlReader<R> {
    type Item = Result<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = String::new();

        loop {
            line.clear();
            match self.reader.read_line(&mut line) {
                Ok(0) => return None, // EOF
                Ok(n) => {
                    self.bytes_read += n as u64;
                    self.line_number += 1;

                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    match serde_json::from_str::<Json>(trimmed) {
                        Ok(Json::Object(map)) => {
                            let record = Record::new(self.extract_fields(map), self.line_number);
                            return Some(Ok(record));
                        }
                        Ok(other) => {
                            warn!(
                                "Line {} is a JSON {} rather than an object, skipping",
                                self.line_number,
                                json_kind(&other)
                            );
                            self.skipped += 1;
                        }
                        Err(e) => {
                            warn!(
                                "Failed to parse JSON at line {}: {} - Error: {}",
                                self.line_number, trimmed, e
                            );
                            self.skipped += 1;
                        }
                    }
                }
                Err(e) => return Some(Err(Error::Io(e))),
            }
        }
    }
}

fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "bool",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

/// Read a JSONL (or `.gz` JSONL) file into a dataset
pub fn read_jsonl<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    JsonlReader::open(path)?.into_dataset()
}

enum Sink {
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl Write for Sink {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            Sink::Plain(w) => w.write(buf),
            Sink::Gzip(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Sink::Plain(w) => w.flush(),
            Sink::Gzip(w) => w.flush(),
        }
    }
}

/// JSONL writer, gzip-compressed when the path ends in `.gz`
pub struct JsonlWriter {
    sink: Sink,
    lines_written: usize,
}

impl JsonlWriter {
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = BufWriter::new(File::create(path)?);
        let sink = if is_gzip(path) {
            Sink::Gzip(GzEncoder::new(file, Compression::default()))
        } else {
            Sink::Plain(file)
        };
        Ok(Self {
            sink,
            lines_written: 0,
        })
    }

    /// Write one row as a JSON object keyed by `columns`
    pub fn write_row(&mut self, columns: &[String], row: &[rowdedup_core::Value]) -> Result<()> {
        let object: Map<String, Json> = columns
            .iter()
            .zip(row)
            .map(|(column, value)| (column.clone(), value_to_json(value)))
            .collect();
        serde_json::to_writer(&mut self.sink, &Json::Object(object))?;
        self.sink.write_all(b"\n")?;
        self.lines_written += 1;
        Ok(())
    }

    pub fn lines_written(&self) -> usize {
        self.lines_written
    }

    /// Flush buffers and finish the gzip stream if any
    pub fn finish(self) -> Result<()> {
        match self.sink {
            Sink::Plain(mut w) => w.flush()?,
            Sink::Gzip(w) => w.finish()?.flush()?,
        }
        Ok(())
    }
}

/// Write a dataset as JSONL
pub fn write_jsonl<P: AsRef<Path>>(dataset: &Dataset, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut writer = JsonlWriter::create(path)?;
    for row in dataset.rows() {
        writer.write_row(dataset.columns(), row)?;
    }
    info!("Wrote {} rows to {:?}", writer.lines_written(), path);
    writer.finish()
}
