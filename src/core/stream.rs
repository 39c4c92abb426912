use crate::core::parser::parse_line;
use crate::domain::model::{is_gzip_path, LogRecord, ParseStats};
use crate::utils::error::{AnalyzerError, Result};
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

pub type RecordStream = LogStream<Box<dyn BufRead>>;

/// Single-pass iterator over the well-formed records of one log.
///
/// Malformed lines (including lines that are not valid UTF-8) are counted and skipped. Once the
/// reader is exhausted the malformed ratio is checked against the error limit; a violation is
/// yielded as a final `Err` after every good record has already been handed out.
pub struct LogStream<R> {
    reader: R,
    buf: Vec<u8>,
    stats: ParseStats,
    error_limit: f64,
    finished: bool,
}

impl LogStream<Box<dyn BufRead>> {
    /// Opens `path`, decompressing on the fly when the name ends in `.gz`.
    ///
    /// Every member of a concatenated gzip file is read.
    pub fn open(path: &Path, error_limit: f64) -> Result<Self> {
        let file = File::open(path)?;
        let reader: Box<dyn BufRead> = if is_gzip_path(path) {
            Box::new(BufReader::new(MultiGzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };
        Ok(Self::new(reader, error_limit))
    }
}

impl<R: BufRead> LogStream<R> {
    pub fn new(reader: R, error_limit: f64) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            stats: ParseStats::default(),
            error_limit,
            finished: false,
        }
    }

    pub fn stats(&self) -> ParseStats {
        self.stats
    }

    fn check_budget(&self) -> Result<()> {
        if self.stats.error_ratio() > self.error_limit {
            tracing::error!(
                "Error limit exceeded: {} of {} lines malformed",
                self.stats.malformed_lines,
                self.stats.total_lines
            );
            return Err(AnalyzerError::ErrorBudgetExceeded {
                malformed: self.stats.malformed_lines,
                total: self.stats.total_lines,
                limit: self.error_limit,
            });
        }
        Ok(())
    }
}

impl<R: BufRead> Iterator for LogStream<R> {
    type Item = Result<LogRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => {
                    self.finished = true;
                    tracing::debug!(
                        "Read {} lines, {} malformed",
                        self.stats.total_lines,
                        self.stats.malformed_lines
                    );
                    return self.check_budget().err().map(Err);
                }
                Ok(_) => {
                    self.stats.total_lines += 1;
                    let parsed = match std::str::from_utf8(&self.buf) {
                        Ok(line) => parse_line(line).map_err(|e| e.to_string()),
                        Err(e) => Err(e.to_string()),
                    };
                    match parsed {
                        Ok(record) => return Some(Ok(record)),
                        Err(reason) => {
                            self.stats.malformed_lines += 1;
                            tracing::trace!("Line {} skipped: {}", self.stats.total_lines, reason);
                        }
                    }
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e.into()));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::{Cursor, Write};
    use tempfile::TempDir;

    const GOOD: &str = r#"1.194.135.240 -  - [29/Jun/2017:04:08:35 +0300] "GET /api/v2/group/7820986/statistic/sites/?date_type=day&date_from=2017-06-28&date_to=2017-06-28 HTTP/1.1" 200 110 "-" "python-requests/2.13.0" "-" "1498698515-3979856266-4707-9836344" "8a7741a54297568b" 0.072"#;

    fn stream(content: &[u8], error_limit: f64) -> LogStream<Cursor<Vec<u8>>> {
        LogStream::new(Cursor::new(content.to_vec()), error_limit)
    }

    #[test]
    fn test_error_budget_exceeded() {
        let content = format!("{}\nkjsdslj\nkjk\nk\nkjkj\n", GOOD);
        let mut records = stream(content.as_bytes(), 0.6);

        assert!(records.next().unwrap().is_ok());
        let err = records.next().unwrap().unwrap_err();
        assert!(matches!(
            err,
            AnalyzerError::ErrorBudgetExceeded {
                malformed: 4,
                total: 5,
                ..
            }
        ));
        assert!(records.next().is_none());
    }

    #[test]
    fn test_within_budget() {
        let content = format!("{}\n{}\nbroken\n", GOOD, GOOD);
        let mut records = stream(content.as_bytes(), 0.5);

        let collected: Result<Vec<_>> = records.by_ref().collect();
        assert_eq!(collected.unwrap().len(), 2);
        assert_eq!(
            records.stats(),
            ParseStats {
                total_lines: 3,
                malformed_lines: 1
            }
        );
    }

    #[test]
    fn test_ratio_equal_to_limit_passes() {
        let content = format!("{}\nbroken\n", GOOD);
        let collected: Result<Vec<_>> = stream(content.as_bytes(), 0.5).collect();
        assert_eq!(collected.unwrap().len(), 1);
    }

    #[test]
    fn test_empty_input_is_not_a_budget_violation() {
        let mut records = stream(b"", 0.0);
        assert!(records.next().is_none());
        assert_eq!(records.stats().total_lines, 0);
    }

    #[test]
    fn test_invalid_utf8_counts_as_malformed() {
        let mut content = format!("{}\n", GOOD).into_bytes();
        content.extend_from_slice(b"\xff\xfe \"GET /bad HTTP/1.1\" 0.1\n");
        let mut records = stream(&content, 1.0);

        let collected: Result<Vec<_>> = records.by_ref().collect();
        assert_eq!(collected.unwrap().len(), 1);
        assert_eq!(records.stats().malformed_lines, 1);
    }

    #[test]
    fn test_open_gzip_log() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nginx-access-ui.log-20170630.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        writeln!(encoder, "{}", GOOD).unwrap();
        encoder.finish().unwrap();

        let records: Vec<_> = LogStream::open(&path, 0.2)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].duration, 0.072);
    }

    #[test]
    fn test_open_multi_member_gzip_log() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nginx-access-ui.log-20170630.gz");
        let mut file = File::create(&path).unwrap();
        for url in ["/first", "/second"] {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            writeln!(encoder, "{}", GOOD.replace("/api/v2/group/7820986/statistic/sites/", url))
                .unwrap();
            file.write_all(&encoder.finish().unwrap()).unwrap();
        }
        drop(file);

        let urls: Vec<String> = LogStream::open(&path, 0.0)
            .unwrap()
            .map(|record| record.map(|r| r.url))
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(urls.len(), 2);
        assert!(urls[0].starts_with("/first?"));
        assert!(urls[1].starts_with("/second?"));
    }

    #[test]
    fn test_open_plain_log() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nginx-access-ui.log-20170630");
        std::fs::write(&path, format!("{}\n", GOOD)).unwrap();

        let records: Vec<_> = LogStream::open(&path, 0.2)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(
            records[0].url,
            "/api/v2/group/7820986/statistic/sites/?date_type=day&date_from=2017-06-28&date_to=2017-06-28"
        );
    }
}
