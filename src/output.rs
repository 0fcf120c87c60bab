//! Run sinks: where per-run reports and watch status go.
//!
//! Trait-based like the rest of the collaborators: a human-readable sink
//! writing to stderr and an NDJSON sink writing one event per line.

use crate::ingest::IngestReport;
use crate::watch::WatchSummary;
use std::io::Write;
use std::path::Path;

/// Output format for run reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary on stderr
    #[default]
    Summary,
    /// One JSON object per event (NDJSON)
    Json,
}

/// Trait for receiving run events.
pub trait RunSink {
    /// Called after every completed ingestion pass.
    fn on_run(&mut self, report: &IngestReport) -> anyhow::Result<()>;

    /// Called when a pass aborted with an error.
    fn on_run_error(&mut self, error: &anyhow::Error) -> anyhow::Result<()>;

    /// Called with a watch session summary.
    fn on_status(&mut self, summary: &WatchSummary) -> anyhow::Result<()>;
}

// ============================================================================
// Stdout sink: human-readable output to stderr
// ============================================================================

pub struct SummarySink {
    quiet: bool,
}

impl SummarySink {
    #[must_use]
    pub const fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl RunSink for SummarySink {
    fn on_run(&mut self, report: &IngestReport) -> anyhow::Result<()> {
        // Quiet runs with nothing new stay silent
        if self.quiet && report.new_files() == 0 {
            return Ok(());
        }
        eprint!("{report}");
        Ok(())
    }

    fn on_run_error(&mut self, error: &anyhow::Error) -> anyhow::Result<()> {
        let ts = chrono::Local::now().format("%H:%M:%S");
        eprintln!("[{ts}] run failed: {error:#}");
        Ok(())
    }

    fn on_status(&mut self, summary: &WatchSummary) -> anyhow::Result<()> {
        if self.quiet {
            return Ok(());
        }
        let ts = chrono::Local::now().format("%H:%M:%S");
        eprintln!(
            "[{ts}] {} run(s) | {} logged | {} failed run(s) | {} file(s) still failing | uptime {}s",
            summary.run_count,
            summary.total_logged,
            summary.failed_runs,
            summary.still_failing,
            summary.uptime_secs,
        );
        Ok(())
    }
}

// ============================================================================
// NDJSON sink: one JSON object per event
// ============================================================================

pub struct NdjsonSink {
    writer: Box<dyn Write + Send>,
}

impl NdjsonSink {
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self { writer }
    }

    fn write_event(&mut self, event: &serde_json::Value) -> anyhow::Result<()> {
        serde_json::to_writer(&mut self.writer, event)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

impl RunSink for NdjsonSink {
    fn on_run(&mut self, report: &IngestReport) -> anyhow::Result<()> {
        let mut event = serde_json::to_value(report)?;
        if let Some(obj) = event.as_object_mut() {
            obj.insert("type".to_string(), serde_json::json!("run"));
        }
        self.write_event(&event)
    }

    fn on_run_error(&mut self, error: &anyhow::Error) -> anyhow::Result<()> {
        let event = serde_json::json!({
            "type": "run_error",
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "error": format!("{error:#}"),
        });
        self.write_event(&event)
    }

    fn on_status(&mut self, summary: &WatchSummary) -> anyhow::Result<()> {
        let event = serde_json::json!({
            "type": "status",
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "runs": summary.run_count,
            "logged": summary.total_logged,
            "failed_runs": summary.failed_runs,
            "still_failing": summary.still_failing,
            "uptime_secs": summary.uptime_secs,
        });
        self.write_event(&event)
    }
}

/// Build the sinks for an output format and optional output file.
pub fn build_sinks(
    format: OutputFormat,
    file: Option<&Path>,
    quiet: bool,
) -> anyhow::Result<Vec<Box<dyn RunSink>>> {
    let mut sinks: Vec<Box<dyn RunSink>> = Vec::new();

    match format {
        OutputFormat::Json => {
            let writer: Box<dyn Write + Send> = match file {
                Some(path) => {
                    let file = std::fs::OpenOptions::new()
                        .create(true)
                        .append(true)
                        .open(path)?;
                    Box::new(file)
                }
                None => Box::new(std::io::stdout()),
            };
            sinks.push(Box::new(NdjsonSink::new(writer)));
        }
        OutputFormat::Summary => {
            sinks.push(Box::new(SummarySink::new(quiet)));
        }
    }

    Ok(sinks)
}

/// Deliver an event to every sink; sink failures are logged, never fatal.
pub(crate) fn emit<F>(sinks: &mut [Box<dyn RunSink>], mut f: F)
where
    F: FnMut(&mut Box<dyn RunSink>) -> anyhow::Result<()>,
{
    for sink in sinks.iter_mut() {
        if let Err(e) = f(sink) {
            tracing::warn!("Output sink error: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct ArcWriter(Arc<Mutex<Vec<u8>>>);

    impl Write for ArcWriter {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().write(buf)
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn lines(buffer: &Arc<Mutex<Vec<u8>>>) -> Vec<serde_json::Value> {
        let data = buffer.lock().unwrap();
        String::from_utf8_lossy(&data)
            .lines()
            .map(|l| serde_json::from_str(l).expect("valid JSON line"))
            .collect()
    }

    #[test]
    fn test_ndjson_sink_run_event() {
        let buffer = Arc::new(Mutex::new(Vec::<u8>::new()));
        let mut sink = NdjsonSink::new(Box::new(ArcWriter(buffer.clone())));

        let report = IngestReport::new(false);
        sink.on_run(&report).unwrap();
        sink.on_run_error(&anyhow::anyhow!("sheets down")).unwrap();

        let events = lines(&buffer);
        assert_eq!(events.len(), 2);
        assert_eq!(events[0]["type"], "run");
        assert_eq!(events[0]["listed"], 0);
        assert_eq!(events[1]["type"], "run_error");
        assert_eq!(events[1]["error"], "sheets down");
    }

    #[test]
    fn test_ndjson_sink_status_event() {
        let buffer = Arc::new(Mutex::new(Vec::<u8>::new()));
        let mut sink = NdjsonSink::new(Box::new(ArcWriter(buffer.clone())));
        let summary = WatchSummary {
            run_count: 3,
            total_logged: 2,
            failed_runs: 1,
            still_failing: 1,
            uptime_secs: 60,
        };
        sink.on_status(&summary).unwrap();

        let events = lines(&buffer);
        assert_eq!(events[0]["type"], "status");
        assert_eq!(events[0]["runs"], 3);
        assert_eq!(events[0]["still_failing"], 1);
    }

    #[test]
    fn test_build_sinks() {
        let sinks = build_sinks(OutputFormat::Summary, None, false).unwrap();
        assert_eq!(sinks.len(), 1);

        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("events.ndjson");
        let sinks = build_sinks(OutputFormat::Json, Some(&path), false).unwrap();
        assert_eq!(sinks.len(), 1);
        assert!(path.exists());
    }
}
