// File I/O - CSV to Dataset loading

pub mod csv;

pub use csv::{from_csv_string, load_dataset, read_file_as_utf8, IoError};
