use crate::domain::model::{LogRecord, Report, UrlStat};
use crate::utils::error::{AnalyzerError, Result};
use std::collections::HashMap;

/// Per-URL accumulation for one run. Rows come out in order of first appearance.
#[derive(Debug, Default)]
pub struct Aggregator {
    index: HashMap<String, usize>,
    samples: Vec<(String, Vec<f64>)>,
    total_count: usize,
    total_time: f64,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: LogRecord) {
        let LogRecord { url, duration } = record;
        let slot = match self.index.get(&url) {
            Some(&slot) => slot,
            None => {
                self.samples.push((url.clone(), Vec::new()));
                self.index.insert(url, self.samples.len() - 1);
                self.samples.len() - 1
            }
        };
        self.samples[slot].1.push(duration);
        self.total_count += 1;
        self.total_time += duration;
    }

    pub fn distinct_urls(&self) -> usize {
        self.samples.len()
    }

    pub fn finish(self) -> Result<Report> {
        if self.total_count == 0 {
            return Err(AnalyzerError::EmptyLog);
        }

        let total_count = self.total_count as f64;
        let total_time = self.total_time;
        let report = self
            .samples
            .into_iter()
            .map(|(url, mut durations)| {
                let count = durations.len();
                let time_sum: f64 = durations.iter().sum();
                let time_max = durations.iter().copied().fold(0.0, f64::max);
                let time_med = median(&mut durations);
                // all-zero request times leave nothing to share out
                let time_share = if total_time > 0.0 {
                    time_sum / total_time
                } else {
                    0.0
                };

                UrlStat {
                    count,
                    time_avg: round3(time_sum / count as f64),
                    time_max: round3(time_max),
                    time_sum: round3(time_sum),
                    url,
                    time_med: round3(time_med),
                    time_share: round3(time_share),
                    count_share: round3(count as f64 / total_count),
                }
            })
            .collect();

        Ok(report)
    }
}

/// Drains `records` into per-URL statistics.
///
/// The stream's trailing error (e.g. an exceeded error budget) aborts the whole aggregation,
/// so no partial report ever escapes.
pub fn aggregate<I>(records: I) -> Result<Report>
where
    I: IntoIterator<Item = Result<LogRecord>>,
{
    let mut aggregator = Aggregator::new();
    for record in records {
        aggregator.push(record?);
    }
    tracing::debug!("Aggregated {} distinct urls", aggregator.distinct_urls());
    aggregator.finish()
}

/// Keeps the `limit` rows with the largest total time.
pub fn rank_top(mut report: Report, limit: usize) -> Report {
    report.sort_by(|a, b| {
        b.time_sum
            .total_cmp(&a.time_sum)
            .then_with(|| a.url.cmp(&b.url))
    });
    report.truncate(limit);
    report
}

pub fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
