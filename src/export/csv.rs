use super::ExportError;
use crate::dashboard::TrendPoint;
use std::path::Path;

/// Export the volume/ratio trend as `date,volume,ratio` rows
pub fn export_trend<P: AsRef<Path>>(
    points: &[TrendPoint],
    output_path: P,
) -> Result<(), ExportError> {
    let mut writer = ::csv::Writer::from_path(output_path)?;

    writer.write_record(["date", "volume", "ratio"])?;
    for point in points {
        writer.write_record([
            point.date.format("%Y-%m-%d").to_string(),
            point.volume.to_string(),
            point.ratio.round_dp(3).to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tempfile::NamedTempFile;

    #[test]
    fn test_export_trend() {
        let points = vec![
            TrendPoint {
                date: NaiveDate::from_ymd_opt(2024, 9, 1).unwrap(),
                volume: dec!(5000),
                ratio: dec!(1.10714285714),
            },
            TrendPoint {
                date: NaiveDate::from_ymd_opt(2024, 9, 2).unwrap(),
                volume: dec!(0),
                ratio: dec!(0.9),
            },
        ];

        let temp_file = NamedTempFile::new().unwrap();
        export_trend(&points, temp_file.path()).unwrap();

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "date,volume,ratio");
        assert_eq!(lines[1], "2024-09-01,5000,1.107");
        assert_eq!(lines[2], "2024-09-02,0,0.9");
    }
}
