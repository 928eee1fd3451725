//! JSON artifact writing.
//!
//! Both artifacts (calculated data and rating) use the same conventions:
//! object keys sorted by name, 1-space indentation, trailing newline. Key
//! sorting falls out of `serde_json::Value`'s BTreeMap-backed objects, so a
//! round-trip through `Value` is the whole normalization step.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::domain::CityStat;
use crate::error::AppError;

/// Write a collection of city statistics as a JSON artifact.
pub fn write_stats_json(path: &Path, stats: &[CityStat]) -> Result<(), AppError> {
    let bytes = render_stats_json(stats).map_err(|cause| AppError::Artifact {
        path: path.to_path_buf(),
        cause: std::io::Error::new(std::io::ErrorKind::InvalidData, cause),
    })?;
    fs::write(path, bytes).map_err(|cause| AppError::Artifact {
        path: path.to_path_buf(),
        cause,
    })
}

fn render_stats_json(stats: &[CityStat]) -> Result<Vec<u8>, serde_json::Error> {
    let value = serde_json::to_value(stats)?;
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DayStat;
    use chrono::NaiveDate;

    #[test]
    fn keys_are_sorted_and_indent_is_one_space() {
        let stats = vec![CityStat {
            city: "MOSCOW".to_string(),
            days: vec![DayStat {
                date: NaiveDate::from_ymd_opt(2022, 5, 26).unwrap(),
                rainless_hours: Some(7),
                average_temperature: Some(17.5),
            }],
            average_temperature: 17.5,
            average_rainless_hours: 7.0,
            rating: None,
        }];

        let text = String::from_utf8(render_stats_json(&stats).unwrap()).unwrap();
        let expected = "[\n \
             {\n  \
              \"average_rainless_hours\": 7.0,\n  \
              \"average_temperature\": 17.5,\n  \
              \"city\": \"MOSCOW\",\n  \
              \"days\": [\n   \
               {\n    \
                \"average_temperature\": 17.5,\n    \
                \"date\": \"2022-05-26\",\n    \
                \"rainless_hours\": 7\n   \
               }\n  \
              ]\n \
             }\n]\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn ranked_record_carries_rating_and_no_days() {
        let stats = vec![CityStat {
            city: "PARIS".to_string(),
            days: Vec::new(),
            average_temperature: 20.0,
            average_rainless_hours: 8.0,
            rating: Some(1),
        }];
        let text = String::from_utf8(render_stats_json(&stats).unwrap()).unwrap();
        assert!(text.contains("\"rating\": 1"), "{text}");
        assert!(!text.contains("\"days\""), "{text}");
    }

    #[test]
    fn unwritable_path_surfaces_as_artifact_error() {
        let path = Path::new("/nonexistent-dir/wrank-artifact.json");
        let err = write_stats_json(path, &[]).unwrap_err();
        match err {
            AppError::Artifact { path: p, .. } => {
                assert!(p.ends_with("wrank-artifact.json"));
            }
            other => panic!("expected Artifact error, got {other:?}"),
        }
    }
}
