//! Command line definition and argument handling

use crate::telemetry::LogFormat;
use anyhow::{bail, Context};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use hhmap_core::{AppConfig, CategoryConfig, SubmissionDraft, Weekday};
use std::path::PathBuf;

fn json_flag() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Output as JSON")
}

/// The `hhmap` command
#[must_use]
pub fn cli() -> Command {
    Command::new("hhmap")
        .version(hhmap_core::VERSION)
        .about("Happy-hour map: browse places by category and submit deals")
        .subcommand_required(true)
        .arg(
            Arg::new("config")
                .long("config")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("TOML configuration file"),
        )
        .arg(
            Arg::new("api-base")
                .long("api-base")
                .global(true)
                .help("Backend base URL, overrides the configuration"),
        )
        .arg(
            Arg::new("places-file")
                .long("places-file")
                .global(true)
                .value_parser(value_parser!(PathBuf))
                .help("Read places from a JSON file instead of the backend"),
        )
        .arg(
            Arg::new("english")
                .long("english")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Show raw category names instead of Hebrew labels"),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .global(true)
                .default_value("text")
                .value_parser(value_parser!(LogFormat))
                .help("Log line format: text or json"),
        )
        .subcommand(
            Command::new("categories")
                .about("List the category dropdown options")
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("list")
                .about("Show the sidebar list")
                .arg(
                    Arg::new("category")
                        .long("category")
                        .default_value("all")
                        .help("Category filter value"),
                )
                .arg(
                    Arg::new("select")
                        .long("select")
                        .help("Place to select before listing"),
                )
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("show")
                .about("Select a place and show its details and marker")
                .arg(Arg::new("place").required(true).help("Place name"))
                .arg(json_flag()),
        )
        .subcommand(
            Command::new("locate")
                .about("Centre the map on a position")
                .arg(
                    Arg::new("lat")
                        .long("lat")
                        .value_parser(value_parser!(f64))
                        .allow_negative_numbers(true)
                        .help("Latitude"),
                )
                .arg(
                    Arg::new("lng")
                        .long("lng")
                        .value_parser(value_parser!(f64))
                        .allow_negative_numbers(true)
                        .help("Longitude"),
                ),
        )
        .subcommand(
            Command::new("submit")
                .about("Submit a happy hour for a new or existing place")
                .arg(
                    Arg::new("existing")
                        .long("existing")
                        .conflicts_with_all(["name-he", "name-en"])
                        .help("Update the deal of a place already on the map"),
                )
                .arg(Arg::new("name-he").long("name-he").help("Hebrew place name"))
                .arg(Arg::new("name-en").long("name-en").help("English place name"))
                .arg(Arg::new("description").long("description"))
                .arg(Arg::new("address").long("address"))
                .arg(Arg::new("city").long("city"))
                .arg(Arg::new("category").long("category"))
                .arg(
                    Arg::new("day")
                        .long("day")
                        .action(ArgAction::Append)
                        .value_parser(value_parser!(Weekday))
                        .help("Day the deal runs, repeatable"),
                )
                .arg(Arg::new("instagram").long("instagram"))
                .arg(Arg::new("reservation").long("reservation"))
                .arg(Arg::new("notes").long("notes")),
        )
}

/// Resolve the configuration from `--config`, then the global overrides
///
/// # Errors
/// Unreadable or invalid configuration.
pub fn build_config(matches: &ArgMatches) -> anyhow::Result<AppConfig> {
    let mut config = match matches.get_one::<PathBuf>("config") {
        Some(path) => AppConfig::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(base) = matches.get_one::<String>("api-base") {
        config = config.with_api_base_url(base.clone());
    }
    if matches.get_flag("english") {
        config = config.with_categories(CategoryConfig::english());
    }
    config.validate()?;
    Ok(config)
}

/// Build a submission draft from `submit` arguments
///
/// # Errors
/// Neither `--existing` nor a name was given.
pub fn draft_from_matches(args: &ArgMatches) -> anyhow::Result<SubmissionDraft> {
    let text = |id: &str| args.get_one::<String>(id).cloned().unwrap_or_default();

    let mut draft = if let Some(existing) = args.get_one::<String>("existing") {
        SubmissionDraft::update_of(existing.clone())
    } else if args.contains_id("name-he") || args.contains_id("name-en") {
        SubmissionDraft::new_place(text("name-he"), text("name-en"))
    } else {
        bail!("give --existing or at least one of --name-he/--name-en");
    };

    draft.description = text("description");
    draft.address = text("address");
    draft.city = text("city");
    draft.category = text("category");
    draft.days = args
        .get_many::<Weekday>("day")
        .map(|days| days.copied().collect())
        .unwrap_or_default();
    draft.instagram = text("instagram");
    draft.reservation = text("reservation");
    draft.notes = text("notes");
    Ok(draft)
}
