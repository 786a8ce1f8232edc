use crate::model::{DEFAULT_EMAIL, DEFAULT_TOP_FILE_TYPES, DEFAULT_WINDOW_DAYS, MAX_WINDOW_DAYS};
use crate::stats::{BatchOptions, FailurePolicy, StatsOptions};
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gitlocalstats")]
#[command(about = "Contribution heatmap and file-type activity across your local git repositories")]
#[command(version)]
pub struct Cli {
    #[arg(long, value_name = "FOLDER", help = "Add a folder to scan for git repositories (skips stats)")]
    pub add: Option<PathBuf>,

    #[arg(long, env = "GITLOCALSTATS_EMAIL", default_value = DEFAULT_EMAIL, help = "Author email to count commits for")]
    pub email: String,

    #[arg(long, env = "GITLOCALSTATS_STORE", value_name = "FILE", help = "Repository list file [default: ~/.gitlocalstats]")]
    pub store: Option<PathBuf>,

    #[arg(long, default_value_t = DEFAULT_WINDOW_DAYS, value_parser = clap::value_parser!(u32).range(1..=MAX_WINDOW_DAYS as i64), help = "Number of trailing days to show")]
    pub window: u32,

    #[arg(long, default_value_t = DEFAULT_TOP_FILE_TYPES, help = "Number of file types to rank")]
    pub top: usize,

    #[arg(long, short = 'j', default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..), help = "Repositories read in parallel")]
    pub jobs: u16,

    #[arg(long, help = "Skip repositories that cannot be read instead of aborting")]
    pub keep_going: bool,

    #[arg(long, help = "Output as JSON")]
    pub json: bool,

    #[arg(long, help = "Disable colored output")]
    pub no_color: bool,

    #[arg(short, long, action = clap::ArgAction::Count, help = "Increase log verbosity (-v, -vv, -vvv)")]
    pub verbose: u8,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn stats_options(&self) -> StatsOptions {
        let policy = if self.keep_going {
            FailurePolicy::KeepGoing
        } else {
            FailurePolicy::FailFast
        };
        StatsOptions {
            email: self.email.clone(),
            window_days: self.window,
            top: self.top,
            batch: BatchOptions {
                jobs: self.jobs as usize,
                policy,
            },
            json: self.json,
            colored: !self.no_color && console::colors_enabled(),
        }
    }

    pub fn execute(self) -> Result<()> {
        crate::logging::enable_logging(self.verbose);
        if self.no_color {
            console::set_colors_enabled(false);
        }

        if let Some(folder) = self.add {
            return crate::scan::exec(folder, self.store);
        }
        let options = self.stats_options();
        crate::stats::exec(options, self.store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_layout() {
        let cli = Cli::try_parse_from(["gitlocalstats"]).unwrap();
        let opts = cli.stats_options();
        assert_eq!(opts.email, DEFAULT_EMAIL);
        assert_eq!(opts.window_days, 183);
        assert_eq!(opts.top, 10);
        assert_eq!(opts.batch.jobs, 1);
        assert_eq!(opts.batch.policy, FailurePolicy::FailFast);
        assert!(cli.add.is_none());
    }

    #[test]
    fn flags_are_resolved() {
        let cli = Cli::try_parse_from([
            "gitlocalstats",
            "--email",
            "me@x.com",
            "--jobs",
            "4",
            "--keep-going",
            "--no-color",
            "--json",
        ])
        .unwrap();
        let opts = cli.stats_options();
        assert_eq!(opts.email, "me@x.com");
        assert_eq!(opts.batch.jobs, 4);
        assert_eq!(opts.batch.policy, FailurePolicy::KeepGoing);
        assert!(opts.json);
        assert!(!opts.colored);
    }

    #[test]
    fn zero_jobs_is_rejected() {
        assert!(Cli::try_parse_from(["gitlocalstats", "--jobs", "0"]).is_err());
        assert!(Cli::try_parse_from(["gitlocalstats", "--window", "0"]).is_err());
    }

    #[test]
    fn window_is_bounded() {
        let max = MAX_WINDOW_DAYS.to_string();
        let cli = Cli::try_parse_from(["gitlocalstats", "--window", max.as_str()]).unwrap();
        assert_eq!(cli.stats_options().window_days, MAX_WINDOW_DAYS);
        assert!(Cli::try_parse_from(["gitlocalstats", "--window", "3661"]).is_err());
        assert!(Cli::try_parse_from(["gitlocalstats", "--window", "4294967295"]).is_err());
    }
}
