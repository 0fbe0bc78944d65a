/*!
 * Completion Reporting
 *
 * Workers send one `Completion` per finished job over a channel; a single
 * reporter thread owns the output and writes one line per completion, so
 * lines from different workers never interleave mid-line.
 */

use crate::core::errors::{SchedResult, SchedulerError};
use crate::core::types::{Cost, Job, JobId, Level};
use serde::Serialize;
use std::io::{self, Write};
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// Output format for completion lines
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// `[FIN] job <id> (from Q<level>)`
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// A finished job
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub job_id: JobId,
    /// Level the final slice ran at
    pub level: Level,
    pub slices: u32,
    pub total_cost: Cost,
    pub turnaround_ms: u64,
}

impl Completion {
    pub fn from_job(job: &Job, level: Level) -> Self {
        Self {
            job_id: job.id(),
            level,
            slices: job.slices(),
            total_cost: job.total_cost(),
            turnaround_ms: u64::try_from(job.turnaround().as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Write this completion as a single line
    pub fn write_line<W: Write>(&self, out: &mut W, format: OutputFormat) -> io::Result<()> {
        match format {
            OutputFormat::Text => writeln!(out, "[FIN] job {} (from Q{})", self.job_id, self.level),
            OutputFormat::Json => {
                serde_json::to_writer(&mut *out, self)?;
                out.write_all(b"\n")
            }
        }
    }
}

/// Handle to the reporter thread
pub struct Reporter {
    /// Lines written, and the write error that stopped the thread early
    handle: JoinHandle<(u64, io::Result<()>)>,
}

impl Reporter {
    /// Spawn the reporter thread; it exits once every sender is dropped
    pub fn spawn<W>(format: OutputFormat, mut out: W) -> SchedResult<(flume::Sender<Completion>, Self)>
    where
        W: Write + Send + 'static,
    {
        let (tx, rx) = flume::unbounded::<Completion>();
        let name = "mlfq-reporter".to_string();

        let handle = thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                let mut written = 0u64;
                for completion in rx.iter() {
                    if let Err(e) = completion.write_line(&mut out, format).and_then(|()| out.flush()) {
                        return (written, Err(e));
                    }
                    written += 1;
                }
                debug!(written, "Reporter drained");
                (written, Ok(()))
            })
            .map_err(|source| SchedulerError::Spawn { name, source })?;

        Ok((tx, Self { handle }))
    }

    /// Wait for the reporter to drain; returns the number of lines written
    ///
    /// A write failure is logged and does not fail the run: completions are
    /// already accounted in the stats. The count then covers the lines
    /// written before the failure.
    pub fn join(self) -> SchedResult<u64> {
        match self.handle.join() {
            Ok((written, Ok(()))) => Ok(written),
            Ok((written, Err(e))) => {
                warn!(error = %e, written, "Completion output failed; remaining completions dropped");
                Ok(written)
            }
            Err(_) => Err(SchedulerError::WorkerPanicked("mlfq-reporter".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn completion(id: u64, level: Level) -> Completion {
        Completion {
            job_id: id,
            level,
            slices: 2,
            total_cost: 12,
            turnaround_ms: 7,
        }
    }

    #[test]
    fn test_text_line() {
        let mut out = Vec::new();
        completion(2, 1).write_line(&mut out, OutputFormat::Text).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "[FIN] job 2 (from Q1)\n");
    }

    #[test]
    fn test_json_line() {
        let mut out = Vec::new();
        completion(3, 0).write_line(&mut out, OutputFormat::Json).unwrap();
        let line = String::from_utf8(out).unwrap();
        assert_eq!(
            line,
            "{\"job_id\":3,\"level\":0,\"slices\":2,\"total_cost\":12,\"turnaround_ms\":7}\n"
        );
    }

    #[test]
    fn test_reporter_writes_every_completion() {
        let buf = SharedBuf::default();
        let (tx, reporter) = Reporter::spawn(OutputFormat::Text, buf.clone()).unwrap();

        for id in 1..=3 {
            tx.send(completion(id, 0)).unwrap();
        }
        drop(tx);

        assert_eq!(reporter.join().unwrap(), 3);
        let text = String::from_utf8(buf.0.lock().clone()).unwrap();
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains("[FIN] job 3 (from Q0)"));
    }

    /// Accepts `lines` complete lines, then fails every write
    struct FailAfter {
        lines: usize,
    }

    impl Write for FailAfter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.lines == 0 {
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "reader closed"));
            }
            self.lines -= buf.iter().filter(|&&b| b == b'\n').count().min(self.lines);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_keeps_count_of_written_lines() {
        let (tx, reporter) = Reporter::spawn(OutputFormat::Text, FailAfter { lines: 2 }).unwrap();
        for id in 1..=5 {
            // The reporter may already have stopped and dropped the receiver
            let _ = tx.send(completion(id, 0));
        }
        drop(tx);

        assert_eq!(reporter.join().unwrap(), 2);
    }
}
