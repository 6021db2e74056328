// src/schema/write.rs

use csv::{Terminator, WriterBuilder};
use std::{
    io::{self, Write},
    path::Path,
};
use tempfile::NamedTempFile;
use tracing::info;

use super::types::{RankingRecord, CSV_HEADER};
use crate::error::Result;

/// Write header plus one row per record to any writer.
pub fn write_rankings_to<W: Write>(out: W, records: &[RankingRecord]) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out);
    wtr.write_record(CSV_HEADER)?;
    for rec in records {
        wtr.write_record(rec.to_csv_fields())?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write `records` to `path` atomically.
///
/// The CSV goes to a temp file next to `path` which is renamed over it once
/// complete, so a failed run never leaves a half-written file behind.
pub fn write_rankings<P: AsRef<Path>>(path: P, records: &[RankingRecord]) -> Result<()> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    // 1) write everything into the temp file
    let mut tmp = NamedTempFile::new_in(dir)?;
    write_rankings_to(io::BufWriter::new(tmp.as_file_mut()), records)?;
    tmp.as_file().sync_all()?;

    // 2) move it into place
    tmp.persist(path).map_err(|e| e.error)?;
    info!(path = %path.display(), rows = records.len(), "wrote rankings");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::{fs, str::FromStr};
    use tempfile::tempdir;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn sample() -> Vec<RankingRecord> {
        vec![
            RankingRecord::new("China", dec("1400000000.0"), dec("0.684"), dec("953550000.00")),
            RankingRecord::new(
                "Korea, Republic of",
                dec("51300000"),
                dec("0.000001"),
                dec("2000000000"),
            ),
        ]
    }

    #[test]
    fn header_rows_and_newlines() {
        let mut buf = Vec::new();
        write_rankings_to(&mut buf, &sample()).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "country,total_population,smartphone_penetration,smartphone_users\n\
             China,1400000000.0,0.684,953550000.00\n\
             \"Korea, Republic of\",51300000,0.000001,2000000000\n"
        );
        assert!(!text.contains('\r'));
        assert!(!text.contains("E-") && !text.contains("E+"));
    }

    #[test]
    fn empty_input_writes_header_only() {
        let mut buf = Vec::new();
        write_rankings_to(&mut buf, &[]).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "country,total_population,smartphone_penetration,smartphone_users\n"
        );
    }

    #[test]
    fn replaces_existing_file_atomically() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("rankings.csv");
        fs::write(&path, "stale").unwrap();

        write_rankings(&path, &sample()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("country,total_population"));
        assert_eq!(text.lines().count(), 3);
        // no temp files left next to the output
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 1);
    }
}
