// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;

use anyhow::{Context, Result, anyhow};
use caltrack_app::{Activity, ActivityState, AppState};
use caltrack_testkit::ActivityFaker;
use config::Config;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEMO_SEED: u64 = 2026;
const DEMO_ACTIVITIES: usize = 12;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `caltrack --print-example-config` to generate a v1 template",
            options.config_path.display()
        )
    })?;
    let log_path = config.log_path()?;
    if options.check_only {
        return Ok(());
    }

    init_logging(&config, &log_path)?;

    let mut state = AppState {
        list_mode: config.default_list(),
        ..AppState::default()
    };
    let mut activities = if options.demo {
        ActivityState::with_activities(demo_activities())
    } else {
        ActivityState::default()
    };
    info!(
        config = %options.config_path.display(),
        demo = options.demo,
        activities = activities.activities.len(),
        "starting caltrack"
    );

    caltrack_tui::run_app(&mut state, &mut activities)?;

    let summary = activities.summary();
    info!(
        consumed = summary.consumed,
        burned = summary.burned,
        net = summary.net(),
        "session ended"
    );
    Ok(())
}

fn demo_activities() -> Vec<Activity> {
    ActivityFaker::new(DEMO_SEED).activities(DEMO_ACTIVITIES)
}

fn init_logging(config: &Config, log_path: &Path) -> Result<()> {
    if let Some(parent) = log_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }

    let log_file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)
        .with_context(|| {
            format!(
                "open log file {}; set [log].file to a writable path",
                log_path.display()
            )
        })?;

    let rust_log = env::var("RUST_LOG").ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(rust_log.as_deref(), config.log_level())?)
        .with_ansi(false)
        .with_writer(Mutex::new(log_file))
        .try_init()
        .map_err(|error| anyhow!("install log subscriber: {error}"))?;
    Ok(())
}

/// `RUST_LOG` wins when it parses; otherwise the configured level applies.
fn log_filter(rust_log: Option<&str>, configured: &str) -> Result<EnvFilter> {
    if let Some(raw) = rust_log
        && let Ok(filter) = EnvFilter::try_new(raw)
    {
        return Ok(filter);
    }
    EnvFilter::try_new(configured).with_context(|| format!("invalid log level {configured:?}"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    demo: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        demo: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => {
                options.print_config_path = true;
            }
            "--print-example-config" => {
                options.print_example = true;
            }
            "--demo" => {
                options.demo = true;
            }
            "--check" => {
                options.check_only = true;
            }
            "--help" | "-h" => {
                options.show_help = true;
            }
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("caltrack: log food and exercise calories");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a v1 config template");
    println!("  --demo                   Launch with seeded demo activities");
    println!("  --check                  Validate config and exit");
    println!("  --help                   Show this help");
}

#[cfg(test)]
mod tests {
    use super::{CliOptions, demo_activities, init_logging, log_filter, parse_cli_args};
    use crate::config::Config;
    use anyhow::Result;
    use std::path::PathBuf;

    fn default_options_path() -> PathBuf {
        PathBuf::from("/tmp/caltrack-config.toml")
    }

    #[test]
    fn parse_cli_args_defaults_to_provided_config_path() -> Result<()> {
        let options = parse_cli_args(Vec::<String>::new(), default_options_path())?;
        assert_eq!(
            options,
            CliOptions {
                config_path: default_options_path(),
                print_config_path: false,
                demo: false,
                print_example: false,
                check_only: false,
                show_help: false,
            }
        );
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_config_path_override() -> Result<()> {
        let options = parse_cli_args(
            vec!["--config", "/custom/config.toml"],
            default_options_path(),
        )?;
        assert_eq!(options.config_path, PathBuf::from("/custom/config.toml"));
        Ok(())
    }

    #[test]
    fn parse_cli_args_errors_for_missing_config_value() {
        let error = parse_cli_args(vec!["--config"], default_options_path())
            .expect_err("missing config value should fail");
        assert!(error.to_string().contains("--config requires a file path"));
    }

    #[test]
    fn parse_cli_args_errors_for_unknown_argument() {
        let error = parse_cli_args(vec!["--print-path"], default_options_path())
            .expect_err("unknown arg should fail");
        let message = error.to_string();
        assert!(message.contains("unknown argument"));
        assert!(message.contains("--help"));
    }

    #[test]
    fn parse_cli_args_sets_print_demo_and_check_flags() -> Result<()> {
        let options = parse_cli_args(
            vec!["--print-config-path", "--print-example-config", "--demo", "--check"],
            default_options_path(),
        )?;
        assert!(options.print_config_path);
        assert!(options.print_example);
        assert!(options.demo);
        assert!(options.check_only);
        assert!(!options.show_help);
        Ok(())
    }

    #[test]
    fn parse_cli_args_sets_help_flag_for_long_and_short_variants() -> Result<()> {
        let long = parse_cli_args(vec!["--help"], default_options_path())?;
        assert!(long.show_help);

        let short = parse_cli_args(vec!["-h"], default_options_path())?;
        assert!(short.show_help);
        Ok(())
    }

    #[test]
    fn rust_log_takes_precedence_over_config_level() -> Result<()> {
        let filter = log_filter(Some("warn"), "debug")?;
        assert_eq!(filter.to_string(), "warn");
        Ok(())
    }

    #[test]
    fn config_level_applies_without_usable_rust_log() -> Result<()> {
        assert_eq!(log_filter(None, "debug")?.to_string(), "debug");
        assert_eq!(log_filter(Some("x=loud"), "trace")?.to_string(), "trace");
        Ok(())
    }

    #[test]
    fn init_logging_creates_missing_log_directory() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let log_path = temp.path().join("nested").join("caltrack.log");
        let _ = init_logging(&Config::default(), &log_path);
        assert!(log_path.exists());
        Ok(())
    }

    #[test]
    fn demo_activities_are_reproducible_and_mixed() {
        let first = demo_activities();
        let second = demo_activities();
        assert_eq!(first, second);
        assert!(first.iter().any(|activity| activity.category.is_food()));
        assert!(first.iter().any(|activity| !activity.category.is_food()));
    }
}
