use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Password, Select, Text};
use smartweather_core::{Config, Coordinate, Dashboard, Location, Session};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "smartweather", version, about = "Weather metrics with HVAC and irrigation advice")]
pub struct Cli {
    /// Log requests and fallbacks to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeather API key.
    Configure,

    #[command(flatten)]
    Weather(WeatherCommand),
}

/// Commands that talk to the provider within one session.
#[derive(Debug, Subcommand)]
pub enum WeatherCommand {
    /// Current conditions at a coordinate, named by reverse geocoding.
    Point {
        /// Latitude in degrees; defaults to the configured location.
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<String>,

        /// Longitude in degrees; defaults to the configured location.
        #[arg(long, allow_hyphen_values = true)]
        lon: Option<String>,

        /// Also print every attribute of the provider response.
        #[arg(long)]
        full: bool,
    },

    /// Current conditions, recommendations and the 5-day forecast for "City,CountryCode".
    Analyze {
        /// e.g. "Salem,IN"; defaults to the configured query.
        query: Option<String>,
    },

    /// Summary statistics of the 5-day forecast.
    Profile {
        query: Option<String>,
    },

    /// Interactive loop: pick points or search places until you quit.
    Dashboard,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load()?;

        match self.command {
            Command::Configure => configure(&mut config),
            Command::Weather(command) => {
                let dashboard = Dashboard::from_config(&config)?;
                let mut session = Session::new(config.default_coordinate()?);
                interact(command, &config, &dashboard, &mut session).await
            }
        }
    }
}

async fn interact(
    command: WeatherCommand,
    config: &Config,
    dashboard: &Dashboard,
    session: &mut Session,
) -> anyhow::Result<()> {
    let default_query = &config.default_location.query;

    match command {
        WeatherCommand::Point { lat, lon, full } => {
            let lat = lat.unwrap_or_else(|| config.default_location.latitude.to_string());
            let lon = lon.unwrap_or_else(|| config.default_location.longitude.to_string());
            point_cycle(dashboard, session, &lat, &lon, full).await;
        }
        WeatherCommand::Analyze { query } => {
            let query = query.unwrap_or_else(|| default_query.clone());
            analyze_cycle(dashboard, session, &query, false).await;
        }
        WeatherCommand::Profile { query } => {
            let query = query.unwrap_or_else(|| default_query.clone());
            analyze_cycle(dashboard, session, &query, true).await;
        }
        WeatherCommand::Dashboard => interactive(dashboard, session, default_query).await?,
    }

    Ok(())
}

fn configure(config: &mut Config) -> anyhow::Result<()> {
    let api_key = Password::new("OpenWeather API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    config.upsert_api_key(api_key.trim().to_string());
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

/// One point interaction. Failures are reported, never fatal.
async fn point_cycle(
    dashboard: &Dashboard,
    session: &mut Session,
    lat: &str,
    lon: &str,
    full: bool,
) {
    let coordinate = match Coordinate::parse(lat, lon) {
        Ok(c) => c,
        Err(e) => return render::print_error(&e),
    };

    match dashboard.inspect_point(session, coordinate.latitude(), coordinate.longitude()).await {
        Ok(report) => {
            render::print_current(&report);
            if full {
                render::print_attributes(&report);
            }
        }
        Err(e) => render::print_error(&e),
    }
}

/// One query interaction: current conditions first, then the forecast if they succeeded.
async fn analyze_cycle(dashboard: &Dashboard, session: &mut Session, query: &str, profile: bool) {
    let analysis = match dashboard.analyze_query(session, query).await {
        Ok(a) => a,
        Err(e) => return render::print_error(&e),
    };

    render::print_current(&analysis.current);

    match (&analysis.forecast, profile) {
        (Err(e), _) => render::print_error(e),
        (Ok(_), true) => {
            if let Some(p) = analysis.profile() {
                render::print_profile(&p);
            }
        }
        (Ok(table), false) => render::print_forecast(table),
    }
}

const PICK_POINT: &str = "Pick coordinates";
const SEARCH: &str = "Search a place (City,CountryCode)";
const PROFILE: &str = "Profile a place's forecast";
const QUIT: &str = "Quit";

async fn interactive(
    dashboard: &Dashboard,
    session: &mut Session,
    default_query: &str,
) -> anyhow::Result<()> {
    loop {
        println!();
        println!("Selected: {}", session.location());

        let choice = Select::new("What next?", vec![PICK_POINT, SEARCH, PROFILE, QUIT])
            .prompt()
            .context("Failed to read selection")?;

        match choice {
            PICK_POINT => {
                let (lat, lon) = prompt_coordinate(session)?;
                point_cycle(dashboard, session, &lat, &lon, true).await;
            }
            SEARCH | PROFILE => {
                let default = match session.location() {
                    Location::Query(q) => q.clone(),
                    Location::Coordinate(_) => default_query.to_string(),
                };
                let query = Text::new("📍 Location (City, Country Code):")
                    .with_default(&default)
                    .prompt()
                    .context("Failed to read location")?;
                analyze_cycle(dashboard, session, &query, choice == PROFILE).await;
            }
            _ => return Ok(()),
        }
    }
}

fn prompt_coordinate(session: &Session) -> anyhow::Result<(String, String)> {
    let (lat, lon) = session
        .coordinate()
        .map(|c| (format!("{:.4}", c.latitude()), format!("{:.4}", c.longitude())))
        .unwrap_or_default();

    let lat = Text::new("Latitude:").with_default(&lat).prompt().context("Failed to read latitude")?;
    let lon =
        Text::new("Longitude:").with_default(&lon).prompt().context("Failed to read longitude")?;

    Ok((lat, lon))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn point_accepts_negative_coordinates() {
        let cli = Cli::try_parse_from(["smartweather", "point", "--lat", "-33.8688", "--lon", "151.2093"])
            .expect("parses");

        match cli.command {
            Command::Weather(WeatherCommand::Point { lat, lon, full }) => {
                assert_eq!(lat.as_deref(), Some("-33.8688"));
                assert_eq!(lon.as_deref(), Some("151.2093"));
                assert!(!full);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn analyze_query_is_optional() {
        let cli = Cli::try_parse_from(["smartweather", "-v", "analyze"]).expect("parses");
        assert!(cli.verbose);
        assert!(matches!(cli.command, Command::Weather(WeatherCommand::Analyze { query: None })));
    }

    #[test]
    fn configure_stays_a_top_level_command() {
        let cli = Cli::try_parse_from(["smartweather", "configure"]).expect("parses");
        assert!(matches!(cli.command, Command::Configure));

        let cli = Cli::try_parse_from(["smartweather", "dashboard"]).expect("parses");
        assert!(matches!(cli.command, Command::Weather(WeatherCommand::Dashboard)));
    }
}
