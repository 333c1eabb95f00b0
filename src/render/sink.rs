//! Where finished documents go.
//!
//! A sink is opened for one file name, receives the complete byte stream
//! and is then committed. Nothing is visible to the caller before
//! [`DocumentSink::commit`] returns.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::core::InvoiceError;

/// Destination for a rendered document.
pub trait DocumentSink {
    /// Open handle the document is written into.
    type Writer: Write;
    /// What the caller gets back once the document is complete.
    type Output;

    /// Open a writer for `filename`.
    fn begin(&mut self, filename: &str) -> Result<Self::Writer, InvoiceError>;

    /// Flush and publish the finished document.
    fn commit(&mut self, writer: Self::Writer) -> Result<Self::Output, InvoiceError>;

    /// Discard a partially written document.
    fn abort(&mut self, writer: Self::Writer) {
        drop(writer);
    }
}

/// Collects the document in memory; the output is the byte stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemorySink;

impl DocumentSink for MemorySink {
    type Writer = Vec<u8>;
    type Output = Vec<u8>;

    fn begin(&mut self, _filename: &str) -> Result<Vec<u8>, InvoiceError> {
        Ok(Vec::new())
    }

    fn commit(&mut self, writer: Vec<u8>) -> Result<Vec<u8>, InvoiceError> {
        Ok(writer)
    }
}

/// Writes `{dir}/{filename}`; the output is the final path.
///
/// Data goes to `{filename}.part` first and is renamed into place on
/// commit, so readers never see a half-written file.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

/// Open file of a [`FileSink`].
#[derive(Debug)]
pub struct PartFile {
    file: BufWriter<File>,
    part_path: PathBuf,
    final_path: PathBuf,
}

impl Write for PartFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl FileSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl DocumentSink for FileSink {
    type Writer = PartFile;
    type Output = PathBuf;

    fn begin(&mut self, filename: &str) -> Result<PartFile, InvoiceError> {
        if filename.is_empty() || filename.contains(['/', '\\']) || filename.starts_with('.') {
            return Err(InvoiceError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("unsafe file name '{filename}'"),
            )));
        }
        fs::create_dir_all(&self.dir)?;
        let final_path = self.dir.join(filename);
        let part_path = self.dir.join(format!("{filename}.part"));
        let file = BufWriter::new(File::create(&part_path)?);
        Ok(PartFile {
            file,
            part_path,
            final_path,
        })
    }

    fn commit(&mut self, writer: PartFile) -> Result<PathBuf, InvoiceError> {
        let PartFile {
            file,
            part_path,
            final_path,
        } = writer;
        let result = file
            .into_inner()
            .map_err(|e| e.into_error())
            .and_then(|f| f.sync_all())
            .and_then(|()| fs::rename(&part_path, &final_path));
        if let Err(e) = result {
            let _ = fs::remove_file(&part_path);
            return Err(e.into());
        }
        tracing::debug!(path = %final_path.display(), "invoice written");
        Ok(final_path)
    }

    fn abort(&mut self, writer: PartFile) {
        let path = writer.part_path.clone();
        drop(writer);
        if let Err(e) = fs::remove_file(&path) {
            tracing::warn!(path = %path.display(), error = %e, "could not remove partial invoice");
        }
    }
}

/// Write `bytes` through `sink`: begin, write everything, commit.
/// On a write error the sink is aborted.
pub fn deliver<S: DocumentSink>(
    sink: &mut S,
    filename: &str,
    bytes: &[u8],
) -> Result<S::Output, InvoiceError> {
    let mut writer = sink.begin(filename)?;
    if let Err(e) = writer.write_all(bytes).and_then(|()| writer.flush()) {
        sink.abort(writer);
        return Err(e.into());
    }
    sink.commit(writer)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_sink_returns_bytes() {
        let out = deliver(&mut MemorySink, "ORD1.pdf", b"%PDF-1.7").unwrap();
        assert_eq!(out, b"%PDF-1.7");
    }

    #[test]
    fn file_sink_writes_and_renames() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FileSink::new(dir.path().join("invoices"));
        let path = deliver(&mut sink, "ORD1.pdf", b"data").unwrap();
        assert_eq!(path, dir.path().join("invoices").join("ORD1.pdf"));
        assert_eq!(fs::read(&path).unwrap(), b"data");
        assert!(!dir.path().join("invoices").join("ORD1.pdf.part").exists());
    }

    #[test]
    fn file_sink_abort_removes_part_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FileSink::new(dir.path());
        let writer = sink.begin("ORD2.pdf").unwrap();
        assert!(dir.path().join("ORD2.pdf.part").exists());
        sink.abort(writer);
        assert!(!dir.path().join("ORD2.pdf.part").exists());
        assert!(!dir.path().join("ORD2.pdf").exists());
    }

    #[test]
    fn file_sink_rejects_path_traversal() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = FileSink::new(dir.path());
        assert!(sink.begin("../evil.pdf").is_err());
        assert!(sink.begin("a/b.pdf").is_err());
    }
}
