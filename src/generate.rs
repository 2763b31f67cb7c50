use crate::calendar::{self, Calendar};
use crate::cli::{CommonArgs, GenerateArgs};
use crate::config::{repo_label, Identity, Settings};
use crate::error::Result;
use crate::git::{GitCli, Importer, InitScript};
use crate::layout::RepoLayout;
use crate::model::{GenerateOutput, GenerateRequest, SCHEMA_VERSION};
use crate::stream::{check_stream, EncodedStream, EncoderConfig, StreamEncoder, TimestampSynthesizer};
use anyhow::Context;
use chrono::Utc;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Everything needed to run one session, resolved from the request and settings.
pub struct Plan {
    pub calendar: Calendar,
    pub identity: Identity,
    pub layout: RepoLayout,
    pub encoder: StreamEncoder,
}

pub fn plan(request: &GenerateRequest, args: &GenerateArgs, settings: &Settings) -> Result<Plan> {
    let days = if args.merge_duplicates {
        calendar::merge_by_date(&request.contributions)?
    } else {
        request.contributions.clone()
    };
    let calendar = Calendar::normalize(&days)?;

    let identity = Identity::resolve(
        &[args.name.as_deref(), request.username.as_deref(), settings.username.as_deref()],
        &[args.email.as_deref(), request.email.as_deref(), settings.email.as_deref()],
    )?;
    let label = repo_label(
        &[args.repo_name.as_deref(), request.repo_name.as_deref()],
        &identity.name,
        args.year.or(request.year),
    );
    let layout = RepoLayout::new(&settings.base_dir, &label);

    let config = EncoderConfig::for_layout(&layout, identity.clone())
        .with_branch(settings.branch.clone())
        .with_clock(TimestampSynthesizer::with_offset(settings.utc_offset));

    Ok(Plan {
        calendar,
        identity,
        layout,
        encoder: StreamEncoder::new(config),
    })
}

/// Check the stream structurally, then hand it to the importer in one blocking call.
pub fn import_stream(importer: &dyn Importer, encoded: &EncodedStream, dir: &Path) -> Result<()> {
    let summary = check_stream(&encoded.bytes)?;
    info!(
        commits = summary.commits,
        blobs = summary.blobs,
        bytes = summary.bytes,
        dir = %dir.display(),
        "importing stream"
    );
    importer.import(&encoded.bytes, dir)?;
    Ok(())
}

pub fn exec(common: CommonArgs, args: GenerateArgs) -> anyhow::Result<()> {
    let started = Instant::now();
    let settings = Settings::load(&common).context("Failed to load settings")?;
    let request = calendar::load_request(&args.calendar)
        .with_context(|| format!("Failed to read calendar {}", args.calendar.display()))?;

    let plan = plan(&request, &args, &settings).context("Invalid generation request")?;
    let encoded = plan
        .encoder
        .encode(&plan.calendar)
        .context("Failed to encode commit history")?;
    info!(
        commits = encoded.commit_count,
        last_mark = %encoded.last_mark,
        "stream ready"
    );

    let branch = plan.encoder.config().branch.clone();
    let mut output = GenerateOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        repository_path: None,
        stream_path: None,
        repo_name: plan.layout.repo_name().to_string(),
        branch: branch.clone(),
        commit_count: encoded.commit_count,
        first_date: plan.calendar.first_date().to_string(),
        last_date: plan.calendar.last_date().to_string(),
    };

    if let Some(path) = &args.stream_out {
        check_stream(&encoded.bytes).context("Encoded stream failed its structural check")?;
        std::fs::write(path, &encoded.bytes)
            .with_context(|| format!("Failed to write stream to {}", path.display()))?;
        output.stream_path = Some(path.to_string_lossy().to_string());
    } else {
        let git = GitCli::new(&settings.git).context("Invalid git executable")?;
        let version = git.version().context("Git is not available")?;
        info!(%version, "using git");

        let dir = plan.layout.create().context("Failed to create repository directory")?;
        let pb = spinner("Initializing repository...");
        git.apply(&InitScript::for_identity(&plan.identity), &dir)
            .context("Failed to initialize repository")?;

        pb.set_message(format!("Importing {} commits...", encoded.commit_count));
        import_stream(&git, &encoded, &dir)
            .with_context(|| format!("Import failed in {}", dir.display()))?;

        if !args.no_checkout {
            pb.set_message("Checking out...");
            git.checkout(&dir, &branch).context("Failed to check out generated branch")?;
        }
        pb.finish_and_clear();
        output.repository_path = Some(dir.to_string_lossy().to_string());
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        output_summary(&output, started)?;
    }
    Ok(())
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn output_summary(output: &GenerateOutput, started: Instant) -> anyhow::Result<()> {
    println!("{}", style("Contribution history generated").bold());
    println!("{}", "─".repeat(50));
    println!("Repository: {}", style(&output.repo_name).cyan());
    if let Some(path) = &output.repository_path {
        println!("Path: {}", style(path).cyan());
    }
    if let Some(path) = &output.stream_path {
        println!("Stream written to: {}", style(path).cyan());
    }
    println!("Branch: {}", style(&output.branch).yellow());
    println!("Commits: {}", style(output.commit_count).green());
    println!(
        "Date range: {} to {}",
        style(&output.first_date).dim(),
        style(&output.last_date).dim()
    );
    let elapsed = std::time::Duration::from_millis(started.elapsed().as_millis() as u64);
    println!("Took {}", humantime::format_duration(elapsed));
    Ok(())
}
