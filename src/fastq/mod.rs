mod paired;

pub use self::paired::PairedReader;

use std::io::{self, BufRead, BufReader, BufWriter, Cursor, Write};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use flate2::write::GzEncoder;
use flate2::Compression;
use flate2::read::MultiGzDecoder;

use crate::error::RecordError;

/// One FASTQ record, each line kept exactly as read (terminator included)
/// so a selected record is written back byte for byte.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FastqRecord {
    pub name: Vec<u8>,
    pub seq: Vec<u8>,
    pub plus: Vec<u8>,
    pub qual: Vec<u8>,
}

fn strip_eol(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

impl FastqRecord {
    pub fn sequence(&self) -> &[u8] {
        strip_eol(&self.seq)
    }

    pub fn quality(&self) -> &[u8] {
        strip_eol(&self.qual)
    }

    /// Write the record verbatim. A final quality line without a
    /// terminator (last record of a file lacking a trailing newline) gets
    /// `\n` appended so the output stays line-oriented.
    pub fn write_to<W: Write + ?Sized>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.name)?;
        w.write_all(&self.seq)?;
        w.write_all(&self.plus)?;
        w.write_all(&self.qual)?;
        if !self.qual.ends_with(b"\n") {
            w.write_all(b"\n")?;
        }
        Ok(())
    }
}

/// A re-openable FASTQ input. Both passes call [`InputSource::open`], so a
/// source must yield the same bytes every time it is opened.
#[derive(Debug, Clone)]
pub enum InputSource {
    /// Local file; `.gz` files are decompressed transparently
    Path(PathBuf),
    /// Uncompressed FASTQ held in memory
    Memory(Arc<[u8]>),
}

impl InputSource {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        InputSource::Path(path.as_ref().to_path_buf())
    }

    pub fn from_bytes(data: impl Into<Vec<u8>>) -> Self {
        let data: Vec<u8> = data.into();
        InputSource::Memory(Arc::from(data))
    }

    /// Open (or reopen) the source from its first byte.
    pub fn open(&self) -> io::Result<Reader> {
        let reader: Box<dyn BufRead> = match self {
            InputSource::Path(p) => {
                let f = File::open(p)?;
                if is_gzip_path(p) {
                    Box::new(BufReader::new(MultiGzDecoder::new(f)))
                } else {
                    Box::new(BufReader::new(f))
                }
            }
            InputSource::Memory(data) => Box::new(Cursor::new(Arc::clone(data))),
        };
        Ok(Reader::from_buf_read(reader))
    }
}

impl std::fmt::Display for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputSource::Path(p) => write!(f, "{}", p.display()),
            InputSource::Memory(data) => write!(f, "<memory: {} bytes>", data.len()),
        }
    }
}

pub(crate) fn is_gzip_path(p: &Path) -> bool {
    p.extension().map(|e| e == "gz").unwrap_or(false)
}

pub struct Reader {
    reader: Box<dyn BufRead>,
    records: u64,
}

impl Reader {
    pub fn from_buf_read(reader: Box<dyn BufRead>) -> Self {
        Self { reader, records: 0 }
    }

    /// Number of complete records returned so far.
    pub fn records_read(&self) -> u64 {
        self.records
    }

    /// Next record, or `None` at a clean end of stream. A stream that ends
    /// part way through a record is malformed, never a short read.
    pub fn next_record(&mut self) -> Result<Option<FastqRecord>, RecordError> {
        let mut rec = FastqRecord::default();

        if self.reader.read_until(b'\n', &mut rec.name)? == 0 {
            return Ok(None);
        }
        // tolerate blank lines after the last record
        if strip_eol(&rec.name).is_empty() {
            let mut rest = Vec::new();
            while self.reader.read_until(b'\n', &mut rest)? > 0 {
                if !strip_eol(&rest).is_empty() {
                    return Err(self.malformed("blank line between records"));
                }
                rest.clear();
            }
            return Ok(None);
        }
        if !rec.name.starts_with(b"@") {
            return Err(self.malformed("header line does not start with '@'"));
        }
        if self.reader.read_until(b'\n', &mut rec.seq)? == 0 {
            return Err(self.malformed("truncated record: missing sequence line"));
        }
        if self.reader.read_until(b'\n', &mut rec.plus)? == 0 {
            return Err(self.malformed("truncated record: missing '+' line"));
        }
        if !rec.plus.starts_with(b"+") {
            return Err(self.malformed("separator line does not start with '+'"));
        }
        if self.reader.read_until(b'\n', &mut rec.qual)? == 0 {
            return Err(self.malformed("truncated record: missing quality line"));
        }
        let (seq_len, qual_len) = (rec.sequence().len(), rec.quality().len());
        if seq_len != qual_len {
            return Err(self.malformed(&format!(
                "sequence length {} does not match quality length {}",
                seq_len, qual_len
            )));
        }

        self.records += 1;
        Ok(Some(rec))
    }

    fn malformed(&self, msg: &str) -> RecordError {
        RecordError::Malformed {
            record: self.records,
            msg: msg.to_string(),
        }
    }
}

enum Sink {
    Plain(BufWriter<File>),
    Gz(GzEncoder<BufWriter<File>>),
}

/// FASTQ output file, gzip-compressed or plain.
pub struct Writer {
    sink: Sink,
}

impl Writer {
    pub fn create(path: &Path, gzip: bool, compression_level: u32) -> io::Result<Self> {
        let f = BufWriter::new(File::create(path)?);
        let sink = if gzip {
            Sink::Gz(GzEncoder::new(f, Compression::new(compression_level)))
        } else {
            Sink::Plain(f)
        };
        Ok(Self { sink })
    }

    /// Flush everything, writing the gzip trailer if compressed.
    pub fn finish(self) -> io::Result<()> {
        match self.sink {
            Sink::Plain(mut w) => w.flush(),
            Sink::Gz(enc) => enc.finish()?.flush(),
        }
    }
}

impl Write for Writer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match &mut self.sink {
            Sink::Plain(w) => w.write(buf),
            Sink::Gz(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut self.sink {
            Sink::Plain(w) => w.flush(),
            Sink::Gz(w) => w.flush(),
        }
    }
}
