/*!
 * Ingestion
 *
 * Turns a line-oriented input stream into jobs admitted at level 0. When
 * the stream ends, for any reason, the scheduler's run signal is lowered.
 */

mod sampler;

pub use sampler::{CostSampler, Sample};

use crate::core::errors::SchedResult;
use crate::core::types::{Job, JobId};
use crate::scheduler::Scheduler;
use serde::Serialize;
use std::io::BufRead;
use tracing::{info, warn};

/// Outcome of one ingestion pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub records: u64,
    /// Input ended on a read error rather than end-of-stream
    pub stopped_on_error: bool,
}

/// Reads records and admits them as jobs
pub struct Ingestor {
    scheduler: Scheduler,
    sampler: CostSampler,
    next_id: JobId,
}

impl Ingestor {
    pub fn new(scheduler: Scheduler, sampler: CostSampler) -> Self {
        Self {
            scheduler,
            sampler,
            next_id: 1,
        }
    }

    /// Admit one job per record until the reader is exhausted
    ///
    /// A read error ends the stream: the partial record is dropped and the
    /// error is logged. The run signal is lowered on every exit path.
    pub fn run<R: BufRead>(mut self, reader: R) -> SchedResult<IngestReport> {
        let result = self.ingest(reader);
        self.scheduler.shutdown();
        result
    }

    fn ingest<R: BufRead>(&mut self, mut reader: R) -> SchedResult<IngestReport> {
        let mut report = IngestReport::default();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {
                    strip_line_ending(&mut buf);
                    self.admit_record(&buf)?;
                    report.records += 1;
                }
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    warn!(
                        error = %e,
                        records = report.records,
                        dropped_bytes = buf.len(),
                        "Input read failed; treating as end of stream"
                    );
                    report.stopped_on_error = true;
                    break;
                }
            }
        }

        info!(records = report.records, "Ingestion finished");
        Ok(report)
    }

    fn admit_record(&mut self, record: &[u8]) -> SchedResult<()> {
        let sample = self.sampler.sample();
        let mut job = Job::new(self.next_id, record, sample.priority_hint, sample.cost)?;
        if let Some(burst) = sample.io_burst {
            job = job.with_io_burst(burst);
        }
        self.next_id += 1;
        self.scheduler.admit(job)
    }
}

fn strip_line_ending(buf: &mut Vec<u8>) {
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
}
