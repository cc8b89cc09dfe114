// CSV import: header + records -> Dataset

use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::Path;

use crosscheck_recon::{Dataset, ReconError};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum IoError {
    /// File open/read or decode error.
    Read { source: String, message: String },
    /// CSV parse error.
    Parse { source: String, message: String },
    /// Input has no header row or no data rows.
    Empty { source: String },
    /// Dataset construction rejected the parsed table.
    Schema(ReconError),
}

impl fmt::Display for IoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { source, message } => write!(f, "{source}: {message}"),
            Self::Parse { source, message } => write!(f, "{source}: parse error: {message}"),
            Self::Empty { source } => write!(f, "{source}: empty or has no data rows"),
            Self::Schema(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for IoError {}

// ---------------------------------------------------------------------------
// Reading + decoding
// ---------------------------------------------------------------------------

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1,
/// the usual Excel-exported encodings).
pub fn read_file_as_utf8(path: &Path) -> Result<String, IoError> {
    let read_err = |e: std::io::Error| IoError::Read {
        source: path.display().to_string(),
        message: e.to_string(),
    };

    let mut file = std::fs::File::open(path).map_err(read_err)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(read_err)?;

    // Try UTF-8 first; on failure, recover the buffer from the error
    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// Detect the most likely field delimiter by checking consistency across
/// the first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per line.
/// The delimiter that produces the most consistent field count (>1 field)
/// wins; ties break toward more columns.
fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    if sample_lines.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        // Must produce >1 field on the first line to be viable
        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

// ---------------------------------------------------------------------------
// Dataset loading
// ---------------------------------------------------------------------------

/// Load a CSV file into a Dataset. The file's display path becomes the
/// dataset name used in error reports. Sniffs the delimiter when none is
/// given.
pub fn load_dataset(path: &Path, delimiter: Option<u8>) -> Result<Dataset, IoError> {
    let content = read_file_as_utf8(path)?;
    from_csv_string(&path.display().to_string(), &content, delimiter)
}

/// Parse CSV text into a Dataset. The first record is the header row;
/// short records fill the remaining columns with empty strings. Fields are
/// trimmed here, and again by Dataset construction.
pub fn from_csv_string(
    source: &str,
    content: &str,
    delimiter: Option<u8>,
) -> Result<Dataset, IoError> {
    let delimiter = delimiter.unwrap_or_else(|| sniff_delimiter(content));
    let parse_err = |e: csv::Error| IoError::Parse {
        source: source.to_string(),
        message: e.to_string(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());
    let mut records = reader.records();

    let columns: Vec<String> = match records.next() {
        Some(header) => header
            .map_err(parse_err)?
            .iter()
            .map(|h| h.trim().to_string())
            .collect(),
        None => {
            return Err(IoError::Empty {
                source: source.to_string(),
            })
        }
    };

    let mut rows = Vec::new();
    for result in records {
        let record = result.map_err(parse_err)?;
        let mut row = HashMap::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            let value = record.get(i).unwrap_or("").trim().to_string();
            row.insert(column.clone(), value);
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(IoError::Empty {
            source: source.to_string(),
        });
    }

    Dataset::from_rows(source, columns, rows).map_err(IoError::Schema)
}
