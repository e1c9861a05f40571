//! NDJSON framing for traverser streams.
//!
//! One JSON value per line in, one JSON value per line out.

use serde::Serialize;
use std::io::{BufRead, Write};

use crate::value::TraverserValue;

/// Error type for serialization operations
#[derive(Debug)]
pub enum SerializationError {
    JsonError { line: usize, source: serde_json::Error },
    IoError(std::io::Error),
}

impl From<std::io::Error> for SerializationError {
    fn from(err: std::io::Error) -> Self {
        SerializationError::IoError(err)
    }
}

impl std::fmt::Display for SerializationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SerializationError::JsonError { line, source } => {
                write!(f, "JSON error on line {}: {}", line, source)
            }
            SerializationError::IoError(e) => write!(f, "IO error: {}", e),
        }
    }
}

impl std::error::Error for SerializationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SerializationError::JsonError { source, .. } => Some(source),
            SerializationError::IoError(e) => Some(e),
        }
    }
}

/// NDJSON (Newline Delimited JSON) reader
///
/// Yields one traverser per non-blank line.
pub struct NdjsonReader<R: BufRead> {
    reader: R,
    line: usize,
    buf: String,
}

impl<R: BufRead> NdjsonReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            buf: String::new(),
        }
    }

    /// 1-based number of the line read last
    pub fn line(&self) -> usize {
        self.line
    }
}

impl<R: BufRead> Iterator for NdjsonReader<R> {
    type Item = Result<TraverserValue, SerializationError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => self.line += 1,
                Err(e) => return Some(Err(e.into())),
            }

            let text = self.buf.trim();
            if text.is_empty() {
                continue;
            }

            return Some(serde_json::from_str(text).map_err(|source| {
                SerializationError::JsonError {
                    line: self.line,
                    source,
                }
            }));
        }
    }
}

/// NDJSON (Newline Delimited JSON) writer
///
/// Writes values as NDJSON, one JSON value per line.
pub struct NdjsonWriter<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> NdjsonWriter<W> {
    /// Create a new NDJSON writer
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Write a single value as an NDJSON line
    pub fn write<T: Serialize>(&mut self, value: &T) -> Result<(), SerializationError> {
        let json = serde_json::to_string(value).map_err(|source| SerializationError::JsonError {
            line: self.written + 1,
            source,
        })?;
        writeln!(self.writer, "{}", json)?;
        self.written += 1;
        Ok(())
    }

    /// Write multiple values
    pub fn write_all<T: Serialize>(&mut self, values: &[T]) -> Result<(), SerializationError> {
        for value in values {
            self.write(value)?;
        }
        Ok(())
    }

    /// Number of lines written so far
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush the underlying writer
    pub fn flush(&mut self) -> Result<(), SerializationError> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ndjson_reader() {
        let input = "\"hello\"\n\n42\nnull\n  [\"a\"]  \n";
        let values: Vec<TraverserValue> = NdjsonReader::new(input.as_bytes())
            .collect::<Result<_, _>>()
            .unwrap();

        assert_eq!(
            values,
            vec![
                TraverserValue::from("hello"),
                TraverserValue::Int(42),
                TraverserValue::Null,
                TraverserValue::List(vec![TraverserValue::from("a")]),
            ]
        );
    }

    #[test]
    fn test_ndjson_reader_reports_line() {
        let input = "\"ok\"\n\n{broken\n";
        let mut reader = NdjsonReader::new(input.as_bytes());

        assert!(reader.next().unwrap().is_ok());
        match reader.next().unwrap() {
            Err(SerializationError::JsonError { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected JSON error, got {:?}", other),
        }
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_ndjson_writer() {
        let mut buf = Vec::new();
        let mut writer = NdjsonWriter::new(&mut buf);

        writer
            .write_all(&[TraverserValue::from("el"), TraverserValue::Null])
            .unwrap();
        writer.flush().unwrap();
        assert_eq!(writer.written(), 2);

        let output = String::from_utf8(buf).unwrap();
        assert_eq!(output, "\"el\"\nnull\n");
    }
}
