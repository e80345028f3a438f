use anyhow::Context;
use clap::ArgMatches;
use hhmap_cli::{
    build_config, cli, draft_from_matches, output, telemetry, FixedPosition, HeadlessMap,
    LogFormat,
};
use hhmap_client::ApiClient;
use hhmap_core::{AppConfig, MapApp, PlaceSource, StaticPlaceSource};
use std::path::PathBuf;

fn place_source(matches: &ArgMatches, client: &ApiClient) -> anyhow::Result<Box<dyn PlaceSource>> {
    match matches.get_one::<PathBuf>("places-file") {
        Some(path) => {
            let body = std::fs::read(path)
                .with_context(|| format!("reading places from {}", path.display()))?;
            Ok(Box::new(StaticPlaceSource::from_json(&body)?))
        }
        None => Ok(Box::new(client.clone())),
    }
}

fn print_notifications(app: &mut MapApp<HeadlessMap>) {
    for n in app.drain_notifications() {
        eprintln!("{}", output::notification(&n));
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();

    let format = matches
        .get_one::<LogFormat>("log-format")
        .copied()
        .unwrap_or_default();
    telemetry::init(format, "info")?;

    let config: AppConfig = build_config(&matches)?;
    let client = ApiClient::from_config(&config)?;
    let source = place_source(&matches, &client)?;
    let mut app = MapApp::new(config, HeadlessMap::new());

    let report = app.load_places(&*source).await?;
    tracing::debug!(?report, "startup load finished");

    match matches.subcommand() {
        Some(("categories", args)) => {
            if args.get_flag("json") {
                print_json(&app.categories())?;
            } else {
                print!("{}", output::categories(app.categories()));
            }
        }
        Some(("list", args)) => {
            if let Some(value) = args.get_one::<String>("category") {
                app.on_filter_change(value);
            }
            if let Some(place) = args.get_one::<String>("select") {
                app.on_list_item_click(place)?;
            }
            if args.get_flag("json") {
                print_json(&app.list_view())?;
            } else {
                print!("{}", output::place_list(&app.list_view()));
            }
        }
        Some(("show", args)) => {
            let place = args
                .get_one::<String>("place")
                .context("place name is required")?;
            app.open_details(place)?;
            if args.get_flag("json") {
                print_json(&app.sidebar_view())?;
            } else {
                if let Some(details) = app.details_view(place) {
                    print!("{}", output::details(&details));
                }
                print!("{}", output::map_summary(app.map()));
            }
        }
        Some(("locate", args)) => {
            let position = FixedPosition::from_args(
                args.get_one::<f64>("lat").copied(),
                args.get_one::<f64>("lng").copied(),
            );
            let located = app.locate_user(&position).await;
            print_notifications(&mut app);
            located?;
            print!("{}", output::map_summary(app.map()));
        }
        Some(("submit", args)) => {
            let draft = draft_from_matches(args)?;
            app.submission_mut().set_draft(draft);
            let submitted = app.submit_and_refresh(&client, &*source).await;
            print_notifications(&mut app);
            submitted?;
        }
        _ => {}
    }

    Ok(())
}
