use super::{compute_heat, fetch_daily_counts, output_heatmap, output_json, output_ndjson, HeatSource};
use std::path::PathBuf;
use tracing::debug;

pub fn exec(
    calendar: Option<PathBuf>,
    repo: Option<PathBuf>,
    json: bool,
    ndjson: bool,
) -> anyhow::Result<()> {
    let source = match calendar {
        Some(path) => HeatSource::Calendar(path),
        None => HeatSource::Repo(repo),
    };
    let (label, daily) = fetch_daily_counts(&source)?;
    debug!(days = daily.len(), source = %label, "computing heat");

    let heat_data = compute_heat(&daily);

    if json {
        output_json(&heat_data, &label)?;
    } else if ndjson {
        output_ndjson(&heat_data)?;
    } else {
        output_heatmap(&heat_data, &label)?;
    }

    Ok(())
}
