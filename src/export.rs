use crate::board::BoardSnapshot;
use crate::error::ExportError;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Serialize)]
struct BucketCsvRecord {
    date: String,
    kind: String,
    start: String,
    end: String,
    inspector: String,
    title: String,
    detail: String,
}

/// Write one row per (day, job) in bucket order. Empty days produce no rows.
pub fn write_day_buckets_csv<W: Write>(
    snapshot: &BoardSnapshot,
    writer: W,
) -> Result<usize, ExportError> {
    let mut writer = csv::Writer::from_writer(writer);
    let mut rows = 0;
    for (date, jobs) in snapshot.day_buckets.iter() {
        for job in jobs {
            writer.serialize(BucketCsvRecord {
                date: date.to_string(),
                kind: job.kind().to_string(),
                start: job.start.to_string(),
                end: job.end_date.to_string(),
                inspector: job.inspector.clone(),
                title: job.title(),
                detail: job.detail(),
            })?;
            rows += 1;
        }
    }
    writer.flush()?;
    Ok(rows)
}

pub fn export_day_buckets_csv<P: AsRef<Path>>(
    snapshot: &BoardSnapshot,
    path: P,
) -> Result<usize, ExportError> {
    let file = File::create(path)?;
    write_day_buckets_csv(snapshot, file)
}
