//! `wastewise` command-line tool
//!
//! Checks the store configuration and runs place searches and reports over
//! seed files through an in-memory store.

use anyhow::{bail, Context};
use clap::{value_parser, Arg, Command};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use wastewise_core::config::view_config_from_env;
use wastewise_core::{
    load_records, seed_store, AppConfig, PlaceReport, PlaceService, RecordWriter, TracingNotifier,
};
use wastewise_live::{LiveCollectionView, ViewPhase};
use wastewise_model::{format_phone, GarbagePlace};
use wastewise_store::MemoryStore;

fn cli() -> Command {
    Command::new("wastewise")
        .version(wastewise_core::VERSION)
        .about("WasteWise waste-management client tools")
        .subcommand(Command::new("check-config").about("Verify store configuration in the environment"))
        .subcommand(
            Command::new("search")
                .about("Filter garbage places from a seed file through a live view")
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON array of garbage places"),
                )
                .arg(
                    Arg::new("query")
                        .long("query")
                        .default_value("")
                        .help("Whitespace-separated search terms"),
                ),
        )
        .subcommand(
            Command::new("locate")
                .about("List garbage places whose address mentions an area")
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON array of garbage places"),
                )
                .arg(
                    Arg::new("area")
                        .long("area")
                        .required(true)
                        .help("City or area name to match against addresses"),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Print the garbage place report")
                .arg(
                    Arg::new("seed")
                        .long("seed")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("JSON array of garbage places"),
                ),
        )
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let matches = cli().get_matches();
    match matches.subcommand() {
        Some(("check-config", _)) => check_config(),
        Some(("search", args)) => {
            let seed = args.get_one::<PathBuf>("seed").context("--seed is required")?;
            let query = args.get_one::<String>("query").map_or("", String::as_str);
            search(seed, query).await
        }
        Some(("locate", args)) => {
            let seed = args.get_one::<PathBuf>("seed").context("--seed is required")?;
            let area = args.get_one::<String>("area").context("--area is required")?;
            locate(seed, area).await
        }
        Some(("report", args)) => {
            let seed = args.get_one::<PathBuf>("seed").context("--seed is required")?;
            report(seed)
        }
        _ => {
            cli().print_help()?;
            Ok(())
        }
    }
}

fn check_config() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("startup configuration check failed")?;
    println!("Configuration OK");
    println!("  Project: {}", config.store.project_id);
    println!("  Auth domain: {}", config.store.auth_domain);
    println!("  Search debounce: {} ms", config.view.debounce.as_millis());
    Ok(())
}

async fn open_places(seed: &Path) -> anyhow::Result<(Arc<MemoryStore>, LiveCollectionView<GarbagePlace>, usize)> {
    let places: Vec<GarbagePlace> = load_records(seed).with_context(|| format!("loading {}", seed.display()))?;
    let store = Arc::new(MemoryStore::new());
    seed_store(store.as_ref(), &places).await?;

    let view = LiveCollectionView::<GarbagePlace>::new(store.clone(), view_config_from_env());
    let mut changes = view.changes();
    view.open().await?;
    tokio::time::timeout(Duration::from_secs(5), async {
        while view.phase() == ViewPhase::Loading {
            if changes.changed().await.is_err() {
                break;
            }
        }
    })
    .await
    .context("timed out waiting for the first snapshot")?;
    if view.phase() != ViewPhase::Ready {
        bail!(view.snapshot().error.unwrap_or_else(|| "view failed to load".to_string()));
    }
    Ok((store, view, places.len()))
}

fn print_place(place: &GarbagePlace) {
    println!(
        "{}\t{}\t{}\t{} ({})\t{}",
        place.id,
        place.location_name,
        place.address,
        place.waste_type,
        place.category(),
        format_phone(&place.phone_number)
    );
}

async fn search(seed: &Path, query: &str) -> anyhow::Result<()> {
    let (_store, view, total) = open_places(seed).await?;

    view.set_filter_text(query)?;
    tokio::time::sleep(view.debounce() + Duration::from_millis(20)).await;

    let visible = view.visible();
    view.close();

    if visible.is_empty() {
        println!("No garbage places match \"{query}\"");
        return Ok(());
    }
    visible.iter().for_each(print_place);
    println!("{} of {} places", visible.len(), total);
    Ok(())
}

async fn locate(seed: &Path, area: &str) -> anyhow::Result<()> {
    let (store, view, total) = open_places(seed).await?;
    let service = PlaceService::new(RecordWriter::new(store, Arc::new(TracingNotifier), "location"));

    let found = service.locate(&view.snapshot().records, area);
    view.close();

    found.iter().for_each(print_place);
    println!("{} of {} places near {area}", found.len(), total);
    Ok(())
}

fn report(seed: &Path) -> anyhow::Result<()> {
    let places: Vec<GarbagePlace> = load_records(seed).with_context(|| format!("loading {}", seed.display()))?;
    let report = PlaceReport::build(&places)?;
    print!("{}", report.render_text());
    Ok(())
}
