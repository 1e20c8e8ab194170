//! Output sinks for trajectory samples.

use std::io::Write;

use tracing::error;

use trajectory::{OutputSink, TrajectorySample};

/// Streams `timestamp,latitude,longitude,altitude` lines as samples arrive.
pub struct CsvSink<W: Write> {
    writer: W,
    failed: bool,
}

impl<W: Write> CsvSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            failed: false,
        }
    }

    /// Flush buffered output at run end.
    pub fn finish(mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

impl<W: Write> OutputSink for CsvSink<W> {
    fn emit(&mut self, sample: &TrajectorySample) {
        let result = writeln!(
            self.writer,
            "{},{:.6},{:.6},{:.1}",
            sample.time.timestamp(),
            sample.latitude,
            sample.longitude,
            sample.altitude
        );
        if let Err(err) = result {
            if !self.failed {
                error!(error = %err, "failed to write trajectory output");
                self.failed = true;
            }
        }
    }
}

/// Collects samples and writes them as one JSON array at run end.
#[derive(Default)]
pub struct JsonSink {
    samples: Vec<TrajectorySample>,
}

impl JsonSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize everything collected so far.
    pub fn finish<W: Write>(self, writer: W) -> serde_json::Result<()> {
        serde_json::to_writer_pretty(writer, &self.samples)
    }
}

impl OutputSink for JsonSink {
    fn emit(&mut self, sample: &TrajectorySample) {
        self.samples.push(*sample);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample() -> TrajectorySample {
        TrajectorySample {
            latitude: 52.2135,
            longitude: 0.0964,
            altitude: 12_000.0,
            time: Utc.with_ymd_and_hms(2024, 6, 23, 1, 30, 0).unwrap(),
        }
    }

    #[test]
    fn csv_lines_are_stable() {
        let mut buffer = Vec::new();
        let mut sink = CsvSink::new(&mut buffer);
        sink.emit(&sample());
        drop(sink);

        let line = String::from_utf8(buffer).unwrap();
        assert_eq!(line, "1719106200,52.213500,0.096400,12000.0\n");
    }

    #[test]
    fn json_array_round_trips() {
        let mut sink = JsonSink::new();
        sink.emit(&sample());
        sink.emit(&sample());

        let mut buffer = Vec::new();
        sink.finish(&mut buffer).unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);
        assert_eq!(parsed[0]["latitude"], 52.2135);
    }
}
