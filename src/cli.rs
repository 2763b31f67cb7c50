use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "greenwall")]
#[command(about = "Paint a contribution graph by synthesizing git history from a calendar")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone, Default)]
pub struct CommonArgs {
    #[arg(long, global = true, help = "Path to a JSON config file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Path to the git executable")]
    pub git: Option<PathBuf>,

    #[arg(long, global = true, help = "Directory that holds generated repositories")]
    pub base_dir: Option<PathBuf>,

    #[arg(long, global = true, help = "Branch to write (e.g. main or refs/heads/main)")]
    pub branch: Option<String>,

    #[arg(long, global = true, help = "UTC offset stamped on commits, as +hhmm")]
    pub utc_offset: Option<String>,

    #[arg(short, long, global = true, action = ArgAction::Count, help = "Increase log verbosity (-v, -vv, -vvv)")]
    pub verbose: u8,
}

#[derive(Args, Clone, Default)]
pub struct GenerateArgs {
    #[arg(help = "Calendar JSON: an array of {date, count} or a full request object")]
    pub calendar: PathBuf,

    #[arg(long, help = "Author name for generated commits")]
    pub name: Option<String>,

    #[arg(long, help = "Author email for generated commits")]
    pub email: Option<String>,

    #[arg(long, help = "Label for the repository directory")]
    pub repo_name: Option<String>,

    #[arg(long, help = "Year used in the default repository label")]
    pub year: Option<i32>,

    #[arg(long, help = "Sum counts of entries that share a date before encoding")]
    pub merge_duplicates: bool,

    #[arg(long, help = "Only write the fast-import stream to this file; no repository is created")]
    pub stream_out: Option<PathBuf>,

    #[arg(long, help = "Leave the working tree empty after import")]
    pub no_checkout: bool,

    #[arg(long, help = "Output as JSON")]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a repository whose history reproduces a contribution calendar
    Generate(GenerateArgs),
    /// Weekly heatmap of a calendar file or of an existing repository
    Heat {
        #[arg(long, conflicts_with = "repo", required_unless_present = "repo", help = "Calendar JSON file")]
        calendar: Option<PathBuf>,

        #[arg(long, help = "Path to git repository")]
        repo: Option<PathBuf>,

        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,
    },
    /// Read a repository's history back into a contribution calendar
    Export {
        #[arg(long, help = "Path to git repository")]
        repo: Option<PathBuf>,

        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON")]
        ndjson: bool,
    },
    /// Check that a repository's per-day commit counts match a calendar
    Verify {
        #[arg(long, help = "Path to git repository")]
        repo: Option<PathBuf>,

        #[arg(help = "Calendar JSON file")]
        calendar: PathBuf,

        #[arg(long, help = "Output as JSON")]
        json: bool,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        crate::logging::init(self.common.verbose);
        match self.command {
            Commands::Generate(args) => crate::generate::exec(self.common, args),
            Commands::Heat { calendar, repo, json, ndjson } => {
                crate::heat::exec(calendar, repo, json, ndjson)
            }
            Commands::Export { repo, json, ndjson } => {
                crate::export::exec(repo, json, ndjson)
            }
            Commands::Verify { repo, calendar, json } => {
                crate::verify::exec(repo, calendar, json)
            }
        }
    }
}
