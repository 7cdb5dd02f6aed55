use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::json;
use std::{collections::BTreeMap, fs, path::Path};

use crate::models::DateRange;

/// Aggregates for one statistics run, ready for charting.
#[derive(Debug, Serialize)]
pub struct StatsBundle {
    pub by_day: BTreeMap<String, usize>,
    pub by_source: BTreeMap<String, usize>,
    pub by_theme: BTreeMap<String, usize>,
}

/// Write the chart-ready JSONs for one date range into `out_dir`:
/// one file per chart plus an index describing the bundle.
pub fn write_stats_bundle(out_dir: &Path, range: &DateRange, bundle: &StatsBundle) -> Result<()> {
    fs::create_dir_all(out_dir).with_context(|| format!("create {:?}", out_dir))?;

    write_json(out_dir.join("stats.by_day.json"), &bundle.by_day)?;
    write_json(out_dir.join("stats.by_source.json"), &bundle.by_source)?;
    write_json(out_dir.join("stats.by_theme.json"), &bundle.by_theme)?;

    let (start, end) = range.iso_bounds();
    let idx = json!({
        "range": { "start": start, "end": end },
        "version": 1,
        "total": bundle.by_day.values().sum::<usize>(),
        "files": [
            "stats.by_day.json",
            "stats.by_source.json",
            "stats.by_theme.json"
        ]
    });
    write_json(out_dir.join("stats.index.json"), &idx)?;

    Ok(())
}

fn write_json<P: AsRef<Path>, T: ?Sized + Serialize>(path: P, value: &T) -> Result<()> {
    fs::write(path, serde_json::to_vec_pretty(value)?)
        .map(|_| ())
        .map_err(|e| e.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle() -> StatsBundle {
        let mut by_day = BTreeMap::new();
        by_day.insert("2024-01-01".to_string(), 2);
        by_day.insert("2024-01-02".to_string(), 1);
        let mut by_source = BTreeMap::new();
        by_source.insert("Portal A".to_string(), 3);
        let mut by_theme = BTreeMap::new();
        by_theme.insert("Energia".to_string(), 3);
        StatsBundle {
            by_day,
            by_source,
            by_theme,
        }
    }

    #[test]
    fn bundle_files_land_in_the_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let range = DateRange::parse("2024-01-01", "2024-01-02").unwrap();
        write_stats_bundle(dir.path(), &range, &bundle()).unwrap();

        for name in [
            "stats.by_day.json",
            "stats.by_source.json",
            "stats.by_theme.json",
            "stats.index.json",
        ] {
            assert!(dir.path().join(name).exists(), "missing {}", name);
        }

        let idx: serde_json::Value =
            serde_json::from_slice(&fs::read(dir.path().join("stats.index.json")).unwrap())
                .unwrap();
        assert_eq!(idx["range"]["start"], "2024-01-01");
        assert_eq!(idx["total"], 3);

        let by_day: BTreeMap<String, usize> =
            serde_json::from_slice(&fs::read(dir.path().join("stats.by_day.json")).unwrap())
                .unwrap();
        assert_eq!(by_day.get("2024-01-01"), Some(&2));
    }
}
