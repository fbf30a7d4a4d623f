use std::{fs::File, io::Write, path::PathBuf, time::Duration};

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use nearby::{
    sdk::config::ClientConfig,
    sdk::geolocation::{FixedPositionSource, GeoPosition, PositionSource, UnavailablePositionSource},
    sdk::locations::{
        CascadingSelector, CsvLocationSource, HttpLocationSource, LocationHierarchyCache,
        LocationSource,
    },
    sdk::present::{HtmlView, RecordedMap, ResultView, TerminalView},
    sdk::recommend::FormState,
    sdk::session::Session,
    sdk::util::log::init_logging,
};
use url::Url;

/// Location-aware recommendations: restaurants, attractions and more, near you
#[derive(Parser, Debug)]
#[command(name = "nearby", version, about, long_about = None)]
struct Cli {
    /// Recommendation server, overrides NEARBY_BASE_URL
    #[arg(long, global = true)]
    base_url: Option<Url>,

    /// Read the country/state/city hierarchy from a CSV file instead of the server
    #[arg(long, global = true)]
    locations_csv: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the cascading location options for a selection
    Locations {
        #[arg(long)]
        country: Option<String>,
        #[arg(long, requires = "country")]
        state: Option<String>,
    },
    /// Ask the server for recommendations and draw them
    Recommend(RecommendArgs),
}

#[derive(Args, Debug)]
struct RecommendArgs {
    /// Place category (restaurant, park, museum, ...)
    #[arg(long = "type", default_value = "restaurant")]
    kind: String,
    #[arg(long, default_value = "")]
    avg_cost: String,
    /// Search radius, only sent when the position is optional
    #[arg(long, default_value = "")]
    distance_km: String,
    #[arg(long, default_value = "sunny")]
    weather: String,
    #[arg(long, default_value = "solo")]
    travel_type: String,
    #[arg(long, default_value = "medium")]
    budget_level: String,
    #[arg(long, default_value = "driving")]
    travel_mode: String,

    #[arg(long)]
    country: Option<String>,
    #[arg(long, requires = "country")]
    state: Option<String>,
    #[arg(long, requires = "state")]
    city: Option<String>,

    /// Your latitude; without --lat/--lng the client behaves as if location is unavailable
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    lat: Option<f64>,
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    lng: Option<f64>,

    /// Allow requests without a position, overrides NEARBY_REQUIRE_POSITION
    #[arg(long)]
    position_optional: bool,

    /// Seconds to wait for a position fix, 0 waits forever
    #[arg(long)]
    geolocation_timeout: Option<u64>,

    /// Print the result list as HTML instead of plain text
    #[arg(long)]
    html: bool,

    /// Write the final map overlay as JSON
    #[arg(long)]
    map_out: Option<PathBuf>,
}

impl RecommendArgs {
    fn form(&self) -> FormState {
        FormState {
            kind: self.kind.clone(),
            avg_cost: self.avg_cost.clone(),
            distance_km: self.distance_km.clone(),
            weather: self.weather.clone(),
            travel_type: self.travel_type.clone(),
            budget_level: self.budget_level.clone(),
            travel_mode: self.travel_mode.clone(),
        }
    }

    fn position_source(&self) -> Box<dyn PositionSource> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Box::new(FixedPositionSource::new(GeoPosition::new(lat, lng))),
            _ => Box::new(UnavailablePositionSource),
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(if cli.verbose { "debug" } else { "info" });

    let mut config = ClientConfig::from_env().context("Invalid client configuration")?;
    if let Some(base_url) = &cli.base_url {
        config.base_url = base_url.clone();
    }
    let locations = location_source(&cli, &config)?;

    match &cli.command {
        Command::Locations { country, state } => {
            show_locations(locations.as_ref(), country.as_deref(), state.as_deref()).await
        }
        Command::Recommend(args) => {
            if args.position_optional {
                config.policy.require_position = false;
            }
            if let Some(secs) = args.geolocation_timeout {
                config.geolocation_timeout = (secs > 0).then(|| Duration::from_secs(secs));
            }

            let map = if args.html {
                let (map, view) =
                    recommend(&config, args, locations.as_ref(), HtmlView::default()).await?;
                println!("{}", view.html());
                for (tone, text) in view.notices() {
                    eprintln!("[{tone:?}] {text}");
                }
                map
            } else {
                let view = TerminalView::new(std::io::stdout());
                recommend(&config, args, locations.as_ref(), view).await?.0
            };

            if let Some(path) = &args.map_out {
                let json = serde_json::to_string_pretty(&map)?;
                File::create(path)
                    .and_then(|mut file| file.write_all(json.as_bytes()))
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                log::info!("Map overlay written to {}", path.display());
            }
            Ok(())
        }
    }
}

fn location_source(cli: &Cli, config: &ClientConfig) -> anyhow::Result<Box<dyn LocationSource>> {
    Ok(match &cli.locations_csv {
        Some(path) => Box::new(CsvLocationSource::new(path)),
        None => Box::new(HttpLocationSource::new(config)?),
    })
}

async fn show_locations(
    source: &dyn LocationSource,
    country: Option<&str>,
    state: Option<&str>,
) -> anyhow::Result<()> {
    let tree = LocationHierarchyCache::new().load(source).await?;
    let mut selector = CascadingSelector::new(tree);
    if let Some(country) = country {
        selector.change_country(country)?;
    }
    if let Some(state) = state {
        selector.change_state(state)?;
    }

    let options = if state.is_some() {
        selector.city_options()
    } else if country.is_some() {
        selector.state_options()
    } else {
        selector.country_options()
    };
    // The leading sentinel only matters to a UI.
    for option in options.iter().filter(|option| !option.is_empty()) {
        println!("{option}");
    }
    Ok(())
}

async fn recommend<V: ResultView>(
    config: &ClientConfig,
    args: &RecommendArgs,
    locations: &dyn LocationSource,
    view: V,
) -> anyhow::Result<(RecordedMap, V)> {
    let mut session = Session::new(config, RecordedMap::default(), view)?;
    session.start(args.position_source().as_ref(), locations).await;

    if let Some(country) = &args.country {
        session.selector_mut().change_country(country)?;
    }
    if let Some(state) = &args.state {
        session.selector_mut().change_state(state)?;
    }
    if let Some(city) = &args.city {
        session.selector_mut().change_city(city)?;
    }

    if session.submit(&args.form()).await.is_err() {
        log::warn!("Pass --lat/--lng or --position-optional to get recommendations");
    }
    Ok(session.into_parts())
}
