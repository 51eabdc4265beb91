//! Nokia Health command-line client
//!
//! Runs the OAuth2 flow and fetches data for the user configured under
//! `[user]` (or `NH__USER__*` environment variables).

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use nokia_health_client::{
    config::AppConfig,
    export::measurements_to_csv,
    params::{
        ActivityMeasuresQuery, BodyMeasuresQuery, IntradayActivityQuery, ListNotificationsQuery,
        SleepMeasuresQuery, SleepSummaryQuery, WorkoutsQuery,
    },
    Client, Token, User,
};
use nokia_health_shared::{decode_body_measures, MeasurementCollection, UnitPreferences};
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Look-back window limits for the date-range commands
const DAYS_RANGE: std::ops::RangeInclusive<i64> = 1..=3650;
const HOURS_RANGE: std::ops::RangeInclusive<i64> = 1..=8760;

/// Nokia Health (Withings) API client
#[derive(Debug, Parser)]
#[command(name = "nokia-health", version, about)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the consent URL to start the authorization flow
    AuthUrl,
    /// Exchange an authorization code for user credentials
    Exchange { code: String },
    /// Body measures (weight, blood pressure, ...)
    BodyMeasures {
        #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(i64).range(DAYS_RANGE))]
        days: i64,
        /// Print normalized measurements as CSV
        #[arg(long)]
        csv: bool,
        #[arg(long, value_enum, default_value_t = UnitSystem::Metric)]
        units: UnitSystem,
    },
    /// Daily activity aggregates
    Activity {
        #[arg(long, default_value_t = 7, value_parser = clap::value_parser!(i64).range(DAYS_RANGE))]
        days: i64,
    },
    Workouts {
        #[arg(long, default_value_t = 7, value_parser = clap::value_parser!(i64).range(DAYS_RANGE))]
        days: i64,
    },
    /// Sleep state intervals
    Sleep {
        #[arg(long, default_value_t = 24, value_parser = clap::value_parser!(i64).range(HOURS_RANGE))]
        hours: i64,
    },
    SleepSummary {
        #[arg(long, default_value_t = 7, value_parser = clap::value_parser!(i64).range(DAYS_RANGE))]
        days: i64,
    },
    /// High-frequency activity samples
    Intraday {
        #[arg(long, default_value_t = 24, value_parser = clap::value_parser!(i64).range(HOURS_RANGE))]
        hours: i64,
    },
    /// List notification subscriptions
    Notifications,
    /// Normalize a saved body-measures response without calling the API
    Normalize {
        file: PathBuf,
        #[arg(long)]
        csv: bool,
        #[arg(long, value_enum, default_value_t = UnitSystem::Metric)]
        units: UnitSystem,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum UnitSystem {
    Metric,
    Imperial,
    Uk,
}

impl From<UnitSystem> for UnitPreferences {
    fn from(system: UnitSystem) -> Self {
        match system {
            UnitSystem::Metric => UnitPreferences::metric(),
            UnitSystem::Imperial => UnitPreferences::imperial(),
            UnitSystem::Uk => UnitPreferences::uk(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    let args = Args::parse();
    let config = AppConfig::load()?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        env = if AppConfig::is_production() { "production" } else { "development" },
        base_url = %config.api.base_url,
        "Starting Nokia Health client"
    );

    let client = Client::new(config.api.clone(), config.oauth.clone())?;
    let today = Utc::now().date_naive();

    match args.command {
        Commands::AuthUrl => {
            let state = uuid::Uuid::new_v4().to_string();
            println!("{}", client.authorization_url(&state)?);
        }
        Commands::Exchange { code } => {
            let user = client.user_from_auth_code(&code).await?;
            let token = user.token();
            println!("user_id = {}", user.user_id);
            println!("access_token = \"{}\"", token.access_token());
            if let Some(refresh) = token.refresh_token() {
                println!("refresh_token = \"{}\"", refresh);
            }
        }
        Commands::BodyMeasures { days, csv, units } => {
            let user = configured_user(&client, &config)?;
            let query = BodyMeasuresQuery {
                start_date: Some(Utc::now() - Duration::days(days)),
                end_date: Some(Utc::now()),
                parse_response: true,
                ..Default::default()
            };
            let response = user.get_body_measures(&query).await?;
            print_measurements(&response.parse_data(), csv, units.into())?;
        }
        Commands::Activity { days } => {
            let user = configured_user(&client, &config)?;
            let query = ActivityMeasuresQuery {
                start_date: Some(today - Duration::days(days)),
                end_date: Some(today),
                ..Default::default()
            };
            print_json(&user.get_activity_measures(&query).await?)?;
        }
        Commands::Workouts { days } => {
            let user = configured_user(&client, &config)?;
            let query = WorkoutsQuery {
                start_date: Some(today - Duration::days(days)),
                end_date: Some(today),
                ..Default::default()
            };
            print_json(&user.get_workouts(&query).await?)?;
        }
        Commands::Sleep { hours } => {
            let user = configured_user(&client, &config)?;
            let query = SleepMeasuresQuery {
                start_date: Utc::now() - Duration::hours(hours),
                end_date: Utc::now(),
            };
            print_json(&user.get_sleep_measures(&query).await?)?;
        }
        Commands::SleepSummary { days } => {
            let user = configured_user(&client, &config)?;
            let query = SleepSummaryQuery {
                start_date: Some(today - Duration::days(days)),
                end_date: Some(today),
                ..Default::default()
            };
            print_json(&user.get_sleep_summary(&query).await?)?;
        }
        Commands::Intraday { hours } => {
            let user = configured_user(&client, &config)?;
            let query = IntradayActivityQuery {
                start_date: Some(Utc::now() - Duration::hours(hours)),
                end_date: Some(Utc::now()),
            };
            print_json(&user.get_intraday_activity(&query).await?)?;
        }
        Commands::Notifications => {
            let user = configured_user(&client, &config)?;
            print_json(&user.list_notifications(&ListNotificationsQuery::default()).await?)?;
        }
        Commands::Normalize { file, csv, units } => {
            let bytes = std::fs::read(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let response = decode_body_measures(&bytes)?;
            print_measurements(&response.parse_data(), csv, units.into())?;
        }
    }

    Ok(())
}

/// User built from the stored credentials in configuration
fn configured_user(client: &Client, config: &AppConfig) -> Result<User> {
    let user_id = config
        .user
        .user_id
        .context("user.user_id is not configured (run `exchange` first)")?;
    let access_token = config
        .user
        .access_token
        .clone()
        .context("user.access_token is not configured (run `exchange` first)")?;

    let mut token = Token::from_access_token(access_token);
    if let Some(refresh) = &config.user.refresh_token {
        token = token.with_refresh_token(refresh.clone());
    }
    Ok(client.user_from_token(user_id, token))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_measurements(
    collection: &MeasurementCollection,
    csv: bool,
    prefs: UnitPreferences,
) -> Result<()> {
    if csv {
        print!("{}", measurements_to_csv(collection)?);
        return Ok(());
    }

    for (kind, measurements) in collection.iter() {
        for measurement in measurements {
            let (value, unit) = measurement.display(&prefs);
            println!(
                "{}  {:<24} {:>10.2} {}",
                measurement.date.format("%Y-%m-%d %H:%M"),
                kind.description(),
                value,
                unit
            );
        }
    }
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if AppConfig::is_production() {
            "nokia_health_client=info".into()
        } else {
            "nokia_health_client=debug,reqwest=info".into()
        }
    });

    let subscriber = tracing_subscriber::registry().with(env_filter);

    if AppConfig::is_production() {
        // JSON logging for production (better for log aggregation)
        subscriber
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        // Pretty logging for development; stdout is reserved for command output
        subscriber
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .init();
    }
}
