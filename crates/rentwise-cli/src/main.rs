// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod runtime;

use anyhow::{Context, Result, anyhow, bail};
use config::Config;
use rentwise_app::AppState;
use rentwise_tui::UiOptions;
use runtime::{DemoRuntime, HttpRuntime};
use std::env;
use std::fs::{self, OpenOptions};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

const DEMO_SEED: u64 = 42;
const LOG_ENV_VAR: &str = "RENTWISE_LOG";
const DEFAULT_LOG_FILTER: &str = "rentwise=info,rentwise_app=info,rentwise_chat=info,rentwise_tui=info";

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
            "load config {}; run `rentwise --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let client = rentwise_chat::Client::new(config.chat_base_url(), config.chat_timeout()?)
        .with_context(|| {
            format!(
                "invalid [chat] config in {}; fix base_url/timeout values",
                options.config_path.display()
            )
        })?;

    let booking_id = options
        .booking
        .clone()
        .or_else(|| config.booking_id().map(str::to_owned));
    if booking_id.is_none() && !options.demo {
        bail!(
            "no booking id -- pass --booking <id>, set [chat].booking_id in {}, or run with --demo",
            options.config_path.display()
        );
    }

    if options.check_only {
        return Ok(());
    }

    setup_logging(&config)?;

    let ui_options = UiOptions {
        show_chat: config.show_chat(),
    };
    let mut state = AppState::new(config.orientation());

    match booking_id {
        Some(booking_id) if !options.demo => {
            info!(booking_id = %booking_id, base_url = client.base_url(), "starting");
            let mut runtime = HttpRuntime::new(client, &booking_id);
            rentwise_tui::run_app(&mut state, &mut runtime, ui_options)
        }
        _ => {
            info!(seed = DEMO_SEED, "starting demo");
            let mut runtime = DemoRuntime::new(DEMO_SEED);
            rentwise_tui::run_app(&mut state, &mut runtime, ui_options)
        }
    }
}

fn setup_logging(config: &Config) -> Result<()> {
    if !config.logging_enabled() {
        return Ok(());
    }

    let log_file = config.log_file()?;
    if let Some(parent) = log_file.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .with_context(|| {
            format!(
                "open log file {} -- set [logging].file or disable [logging].enabled",
                log_file.display()
            )
        })?;

    let filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .with(filter)
        .try_init()
        .map_err(|error| anyhow!("install log subscriber: {error}"))?;
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    booking: Option<String>,
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
        booking: None,
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
            "--booking" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--booking requires a booking id"))?;
                let trimmed = value.as_ref().trim();
                if trimmed.is_empty() {
                    bail!("--booking requires a booking id");
                }
                options.booking = Some(trimmed.to_owned());
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
                bail!("unknown argument {unknown:?}; run with --help to see supported options");
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("rentwise");
    println!("  --booking <id>           Configure the given booking");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-example-config   Print a config template");
    println!("  --demo                   Launch with a seeded offline catalog");
    println!("  --check                  Validate config and startup dependencies");
    println!("  --help                   Show this help");
}
