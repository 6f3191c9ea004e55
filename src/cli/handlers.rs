use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};

use crate::cli::args::LocationCommands;
use crate::config::AppConfig;
use crate::controller::fetch_cycle;
use crate::location::ConfiguredLocation;
use crate::models::{Coordinates, TimingsRecord};
use crate::timings::AladhanClient;
use crate::utils::format::date_label;
use crate::utils::hijri::hijri_string;

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const GREEN: &str = "\x1b[32m";
const AMBER: &str = "\x1b[33m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GOLD: &str = "\x1b[38;2;196;160;68m";

// ─── Times ───────────────────────────────────────────────────────────────────

pub async fn handle_times(
    config: &AppConfig,
    date: Option<NaiveDate>,
    lat: Option<f64>,
    lon: Option<f64>,
) -> Result<()> {
    let today = Local::now().date_naive();
    let date = date.unwrap_or(today);

    let location = ConfiguredLocation::from_config(&config.location).with_override(lat, lon);
    let client = AladhanClient::from_config(&config.api);

    let record = fetch_cycle(date, &location, &client)
        .await
        .map_err(|e| {
            let message = e.user_message();
            anyhow::Error::new(e).context(message)
        })?;

    let place = if lat.is_some() || lon.is_some() {
        "Custom location"
    } else {
        config.location.name.as_str()
    };
    print_timings(place, date, today, config.display.hijri_offset, &record);
    Ok(())
}

fn print_timings(
    place: &str,
    date: NaiveDate,
    today: NaiveDate,
    hijri_offset: i32,
    record: &TimingsRecord,
) {
    println!();
    println_colored!(GOLD, "  Meeqat — {}", place);
    println_colored!(DIM, "  {}", date_label(date, today));
    if let Some(hijri) = hijri_string(date, hijri_offset) {
        println_colored!(AMBER, "  {}", hijri);
    }
    println!();

    for (name, time) in record.entries() {
        println_colored!(BOLD, "  {:<10}  {}", name.display_name(), time);
    }
    println!();
}

// ─── Location ────────────────────────────────────────────────────────────────

pub fn handle_location(config: &mut AppConfig, action: &LocationCommands) -> Result<()> {
    match action {
        LocationCommands::Show => {
            println!();
            println_colored!(GOLD, "  {}", config.location.name);
            match (config.location.latitude, config.location.longitude) {
                (Some(lat), Some(lon)) => println!("  {}, {}", lat, lon),
                _ => println_colored!(AMBER, "  No coordinates set"),
            }
            if config.location.allow {
                println_colored!(GREEN, "  Location access allowed");
            } else {
                println_colored!(AMBER, "  Location access denied");
            }
            println!();
        }
        LocationCommands::Set {
            latitude,
            longitude,
            name,
        } => {
            let coords = Coordinates::new(*latitude, *longitude)?;
            config.location.latitude = Some(coords.latitude());
            config.location.longitude = Some(coords.longitude());
            if let Some(name) = name {
                config.location.name = name.clone();
            }
            config.save().context("Saving location")?;
            println_colored!(
                GREEN,
                "  ✓ Location set to {} ({})",
                config.location.name,
                coords
            );
        }
        LocationCommands::Allow => {
            config.location.allow = true;
            config.save().context("Saving location permission")?;
            println_colored!(GREEN, "  ✓ Location access allowed");
        }
        LocationCommands::Deny => {
            config.location.allow = false;
            config.save().context("Saving location permission")?;
            println_colored!(AMBER, "  Location access denied");
        }
    }
    Ok(())
}

// ─── Config ──────────────────────────────────────────────────────────────────

pub fn handle_config(config: &AppConfig) -> Result<()> {
    let path = AppConfig::config_path()?;
    let rendered = toml::to_string_pretty(config).context("Serializing config")?;
    println!();
    println_colored!(GOLD, "  {}", path.display());
    println!();
    for line in rendered.lines() {
        println_colored!(DIM, "  {}", line);
    }
    println!();
    Ok(())
}
