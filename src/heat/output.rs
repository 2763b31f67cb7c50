use crate::model::{HeatBucket, HeatOutput, SCHEMA_VERSION};
use anyhow::Result;
use chrono::Utc;
use console::style;

pub fn output_json(heat_data: &[HeatBucket], source: &str) -> Result<()> {
    let output = HeatOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        source: source.to_string(),
        buckets: heat_data.to_vec(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn output_ndjson(heat_data: &[HeatBucket]) -> Result<()> {
    for bucket in heat_data {
        println!("{}", serde_json::to_string(bucket)?);
    }
    Ok(())
}

pub fn output_heatmap(heat_data: &[HeatBucket], source: &str) -> Result<()> {
    if heat_data.is_empty() {
        println!("No data to display");
        return Ok(());
    }

    let max_commits = heat_data.iter().map(|b| b.commit_count).max().unwrap_or(1).max(1);

    println!("{}", style("Contribution Heatmap").bold());
    println!("{}", style(source).dim());
    println!("{}", "─".repeat(50));

    for bucket in heat_data {
        let intensity = ((bucket.commit_count as f64 / max_commits as f64) * 5.0) as u32;

        let commit_char = match intensity {
            0 => " ",
            1 => "▁",
            2 => "▃",
            3 => "▅",
            4 => "▇",
            _ => "█",
        };

        let days = bucket.active_days.min(7) as usize;
        let days_bar = format!("{}{}", "■".repeat(days), "□".repeat(7 - days));

        println!(
            "{} {} {} commits: {:>5}, active days: {}",
            bucket.week,
            style(commit_char).green(),
            style(days_bar).blue(),
            bucket.commit_count,
            bucket.active_days
        );
    }

    let total: u64 = heat_data.iter().map(|b| b.commit_count).sum();
    println!("{}", "─".repeat(50));
    println!("Total commits: {}", style(total).cyan());

    println!("\n{}", style("Legend").bold());
    println!("  {} commits intensity", style("▁▃▅▇█").green());
    println!("  {} active days in week", style("■□").blue());

    Ok(())
}
