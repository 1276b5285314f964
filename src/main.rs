use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use drone_weather::flyability::{
    DailySummary, FlightConditions, ParameterAssessment, Safety, overall,
};
use drone_weather::thresholds::{ThresholdService, find_profile};
use drone_weather::units::{format_speed, format_temperature, format_visibility};
use drone_weather::{
    AppConfig, Coordinates, DRONE_PROFILES, DroneWeatherError, FjallStore, OpenMeteoClient,
    WeatherService, WeatherThresholds, logging,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (defaults to the user config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check whether one forecast hour is flyable
    Check {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// Index into the hourly forecast; defaults to the current hour
        #[arg(long)]
        hour: Option<usize>,
    },
    /// Show flyable time ranges per day
    Windows {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        /// Include night hours
        #[arg(long)]
        all_hours: bool,
    },
    /// List built-in drone profiles
    Profiles,
    /// Replace the active thresholds with a drone profile's limits
    UseProfile { id: String },
    /// Print the active thresholds
    Thresholds,
    /// Restore the default thresholds
    Reset,
    /// Show the forecast cache state
    CacheStatus,
    /// Drop the cached forecast
    ClearCache,
}

type Service = WeatherService<OpenMeteoClient, FjallStore>;

fn build_service(config: &AppConfig) -> Result<Service> {
    let path = config.storage_path();
    std::fs::create_dir_all(&path)
        .with_context(|| format!("Failed to create storage directory: {}", path.display()))?;
    let store = FjallStore::open(&path)?;

    let mut thresholds = ThresholdService::new(store.clone());
    if let Some(profile) = config.defaults.profile.as_deref().and_then(find_profile) {
        thresholds = thresholds.with_fallback(profile.thresholds);
    }

    let client = OpenMeteoClient::new(&config.weather).map_err(DroneWeatherError::from)?;
    Ok(WeatherService::new(client, store).with_thresholds(thresholds))
}

fn print_thresholds(thresholds: &WeatherThresholds) {
    let temperature = thresholds.temperature;
    println!(
        "Temperature:    {} to {} {}",
        temperature.min, temperature.max, temperature.unit
    );
    println!(
        "Wind speed:     max {} {}",
        thresholds.wind_speed.max, thresholds.wind_speed.unit
    );
    println!("Wind gusts:     max {} km/h", thresholds.wind_gust.max);
    println!(
        "Visibility:     min {} {}",
        thresholds.visibility.min, thresholds.visibility.unit
    );
    println!("Cloud cover:    max {}%", thresholds.weather.max_cloud_cover);
    println!(
        "Precipitation:  max {}%",
        thresholds.weather.max_precipitation_probability
    );
}

fn safety_marker(safety: Safety) -> &'static str {
    match safety {
        Safety::Safe => "ok",
        Safety::Warning => "warn",
        Safety::Unsafe => "NO",
    }
}

fn print_conditions(
    conditions: &FlightConditions,
    assessments: &[ParameterAssessment],
    thresholds: &WeatherThresholds,
) {
    if conditions.is_suitable {
        println!("Flyable");
    } else {
        println!("Not flyable");
    }
    for reason in &conditions.reasons {
        println!("  - {reason}");
    }

    println!("  Overall: {}", safety_marker(overall(assessments)));
    for assessment in assessments {
        println!(
            "  [{:>4}] {}: {:.1}",
            safety_marker(assessment.safety),
            assessment.parameter,
            assessment.value
        );
    }

    for detail in &conditions.wind_speed_details {
        println!(
            "  Wind {:>4}: {}",
            detail.height,
            format_speed(detail.speed, thresholds.wind_speed.unit)
        );
    }
    for detail in &conditions.wind_gust_details {
        println!(
            "  Gust {:>4}: {}",
            detail.height,
            format_speed(detail.speed, thresholds.wind_speed.unit)
        );
    }
}

fn print_windows(summaries: &[DailySummary]) {
    if summaries.is_empty() {
        println!("No forecast hours to evaluate");
        return;
    }
    for day in summaries {
        println!(
            "{}: {} flyable of {} hours",
            day.date,
            day.total_flyable_hours,
            day.hourly_scores.len()
        );
        let best = day.best_range();
        for range in &day.ranges {
            let marker = if Some(range) == best { " (longest)" } else { "" };
            println!(
                "  {} - {} UTC{marker}",
                range.start.format("%H:%M"),
                range.end.format("%H:%M")
            );
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = AppConfig::load_from_path(args.config.clone())?;
    logging::init(&config.logging)?;

    let service = build_service(&config)?;

    match args.command {
        Command::Check { lat, lon, hour } => {
            let payload = service
                .get_current_weather(Coordinates::new(lat, lon))
                .await
                .map_err(DroneWeatherError::from)?;

            let hour_index = hour
                .or_else(|| payload.hour_index_at(Utc::now()))
                .unwrap_or(0);
            let Some(record) = payload.hourly_data.get(hour_index) else {
                anyhow::bail!(
                    "Hour {hour_index} is outside the forecast ({} hours)",
                    payload.hourly_data.len()
                );
            };

            let thresholds = service.thresholds().load().await;
            println!(
                "{} at {} UTC: {}, {}, visibility {}",
                payload.coordinates.format_coordinates(),
                record.time.format("%Y-%m-%d %H:%M"),
                format_temperature(record.temperature_2m, thresholds.temperature.unit),
                record.format_wind(),
                format_visibility(record.visibility, thresholds.visibility.unit)
            );

            let conditions = service.is_drone_flyable(&payload, hour_index).await;
            let assessments = service.assess_hour(&payload, hour_index).await;
            print_conditions(&conditions, &assessments, &thresholds);
        }
        Command::Windows { lat, lon, all_hours } => {
            let payload = service
                .get_current_weather(Coordinates::new(lat, lon))
                .await
                .map_err(DroneWeatherError::from)?;
            let daylight_only = config.defaults.daylight_only && !all_hours;
            let summaries = service.flight_windows(&payload, daylight_only).await?;
            print_windows(&summaries);
        }
        Command::Profiles => {
            for profile in &DRONE_PROFILES {
                let limits = profile.thresholds;
                println!(
                    "{:<22} {:<20} wind {:>2} km/h, gusts {:>2} km/h, {} to {} °C",
                    profile.id,
                    profile.name,
                    limits.wind_speed.max,
                    limits.wind_gust.max,
                    limits.temperature.min,
                    limits.temperature.max
                );
            }
        }
        Command::UseProfile { id } => {
            let thresholds = service.thresholds().select_profile(&id).await?;
            println!("Now using {id}");
            print_thresholds(&thresholds);
        }
        Command::Thresholds => {
            print_thresholds(&service.thresholds().load().await);
        }
        Command::Reset => {
            let thresholds = service.thresholds().reset_to_defaults().await?;
            println!("Thresholds reset to defaults");
            print_thresholds(&thresholds);
        }
        Command::CacheStatus => {
            let status = service.cache().status().await?;
            match (status.timestamp, status.is_expired) {
                (Some(timestamp), Some(true)) => {
                    println!("Cached forecast from {timestamp} (expired)");
                }
                (Some(timestamp), _) => println!("Cached forecast from {timestamp}"),
                (None, _) => println!("No cached forecast"),
            }
        }
        Command::ClearCache => {
            service.cache().clear().await?;
            println!("Forecast cache cleared");
        }
    }

    Ok(())
}
