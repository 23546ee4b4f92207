//! Human- and machine-readable dumps of an event log

use anyhow::Result;
use evrec_recorder::EventLog;
use serde_json::json;
use std::io::Write;

/// Write one line per record, then a summary line.
///
/// Text lines are `<timestamp> <diagnostic line>`; with `json` each record
/// is a JSON object on its own line and the summary is a final object.
pub fn write_log<W: Write>(log: &EventLog, json: bool, mut out: W) -> Result<()> {
    for record in log.records() {
        if json {
            let line = json!({
                "timestamp": record.timestamp.as_secs(),
                "kind": record.event.kind(),
                "event": record.event,
            });
            writeln!(out, "{line}")?;
        } else {
            writeln!(out, "{} {}", record.timestamp.as_secs(), record.event)?;
        }
    }

    if json {
        let summary = json!({
            "records": log.len(),
            "skipped": log.skipped(),
            "trailing_bytes": log.trailing_bytes(),
            "duration_secs": log.duration().as_secs(),
        });
        writeln!(out, "{summary}")?;
    } else {
        writeln!(
            out,
            "{} records over {}s ({} skipped, {} trailing bytes)",
            log.len(),
            log.duration().as_secs(),
            log.skipped(),
            log.trailing_bytes()
        )?;
    }

    Ok(())
}
