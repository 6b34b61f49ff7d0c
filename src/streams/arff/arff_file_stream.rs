use crate::core::instance_header::InstanceHeader;
use crate::core::instances::Instance;
use crate::streams::Stream;

use crate::streams::arff::parser::{is_comment_or_empty, parse_header, parse_instance_values};
use std::fs::File;
use std::io::{BufRead, BufReader, Error, ErrorKind, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug)]
pub struct ArffFileStream {
    path: PathBuf,
    reader: BufReader<File>,
    header: Arc<InstanceHeader>,
    data_start_pos: u64,
    next_line: Option<String>,
    /// 1-based data row of `next_line`, comments and blank lines not counted.
    data_rows: usize,
    finished: bool,
}

impl Stream for ArffFileStream {
    fn header(&self) -> Arc<InstanceHeader> {
        Arc::clone(&self.header)
    }

    fn has_more_instances(&self) -> bool {
        !self.finished || self.next_line.is_some()
    }

    fn next_instance(&mut self) -> Option<Instance> {
        loop {
            match self.next_row()? {
                Ok((_, instance)) => return Some(instance),
                Err(e) if e.kind() == ErrorKind::InvalidData => {
                    warn!(path = %self.path.display(), error = %e, "skipping invalid ARFF data row");
                }
                Err(e) => {
                    warn!(path = %self.path.display(), error = %e, "stopped reading ARFF data");
                    return None;
                }
            }
        }
    }

    fn restart(&mut self) -> Result<(), Error> {
        self.reader = BufReader::new(File::open(&self.path)?);
        self.reader.seek(SeekFrom::Start(self.data_start_pos))?;
        self.finished = false;
        self.next_line = None;
        self.data_rows = 0;
        self.fill_next_line()?;
        Ok(())
    }
}

impl ArffFileStream {
    /// Opens `path` and parses its header. `class_index` is zero-based; `None`
    /// selects the last attribute.
    pub fn new(path: impl AsRef<Path>, class_index: Option<usize>) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        let mut reader = BufReader::new(file);

        let (header, data_start_pos) = parse_header(&mut reader, class_index)?;
        debug!(
            path = %path.display(),
            relation = header.relation_name(),
            attributes = header.number_of_attributes(),
            class_index = header.class_index(),
            "parsed ARFF header"
        );

        let mut stream = ArffFileStream {
            path,
            reader,
            header: Arc::new(header),
            data_start_pos,
            next_line: None,
            data_rows: 0,
            finished: false,
        };

        stream.fill_next_line()?;
        Ok(stream)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Next data row with its 1-based row number.
    ///
    /// Unlike [`Stream::next_instance`], a row that does not parse is returned
    /// as an `InvalidData` error naming the row instead of being skipped, so
    /// callers can keep their output aligned with the file.
    pub fn next_row(&mut self) -> Option<Result<(usize, Instance), Error>> {
        let line = self.next_line.take()?;
        let row = self.data_rows;
        if let Err(e) = self.fill_next_line() {
            self.finished = true;
            self.next_line = None;
            return Some(Err(e));
        }

        Some(
            parse_instance_values(&self.header, &line)
                .map(|values| (row, Instance::new(values)))
                .map_err(|e| Error::new(ErrorKind::InvalidData, format!("data row {row}: {e}"))),
        )
    }

    fn fill_next_line(&mut self) -> Result<(), Error> {
        if self.finished {
            self.next_line = None;
            return Ok(());
        }
        let mut line = String::new();
        loop {
            line.clear();
            let n = self.reader.read_line(&mut line)?;
            if n == 0 {
                self.finished = true;
                self.next_line = None;
                return Ok(());
            }
            if !is_comment_or_empty(&line) {
                self.data_rows += 1;
                self.next_line = Some(line.trim().to_string());
                return Ok(());
            }
        }
    }
}
