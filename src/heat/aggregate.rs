use crate::model::HeatBucket;
use crate::util::week_key;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

/// Fold daily counts into ISO-week buckets, ordered by week.
pub fn compute_heat(daily: &BTreeMap<NaiveDate, u64>) -> Vec<HeatBucket> {
    let mut week_map: HashMap<String, (u64, u32)> = HashMap::new();

    for (day, count) in daily {
        if *count == 0 {
            continue;
        }
        let entry = week_map.entry(week_key(day)).or_insert((0, 0));
        entry.0 += count;
        entry.1 += 1;
    }

    let mut buckets: Vec<_> = week_map
        .into_iter()
        .map(|(week, (commit_count, active_days))| HeatBucket {
            week,
            commit_count,
            active_days,
        })
        .collect();

    buckets.sort_by(|a, b| a.week.cmp(&b.week));
    buckets
}
