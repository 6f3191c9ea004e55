use chrono::NaiveDate;
use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "meeqat", version, about = "Daily prayer times for your location")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the prayer times for a day
    Times {
        /// Day to show (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Latitude to use instead of the configured one
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<f64>,
        /// Longitude to use instead of the configured one
        #[arg(long, allow_hyphen_values = true)]
        lon: Option<f64>,
    },
    /// Manage the location used for lookups
    Location {
        #[command(subcommand)]
        action: LocationCommands,
    },
    /// Show the config file path and effective settings
    Config,
}

#[derive(Subcommand, Debug)]
pub enum LocationCommands {
    /// Show the configured location
    Show,
    /// Set the coordinates used for lookups
    Set {
        /// Latitude in decimal degrees
        #[arg(allow_hyphen_values = true)]
        latitude: f64,
        /// Longitude in decimal degrees
        #[arg(allow_hyphen_values = true)]
        longitude: f64,
        /// Display name for the place
        #[arg(long)]
        name: Option<String>,
    },
    /// Allow meeqat to use the location
    Allow,
    /// Deny meeqat the location; lookups fail until allowed again
    Deny,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_times_with_negative_longitude() {
        let cli = Cli::parse_from([
            "meeqat", "times", "--date", "2024-03-15", "--lat", "40.7", "--lon", "-74.0",
        ]);
        match cli.command {
            Some(Commands::Times { date, lat, lon }) => {
                assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 15));
                assert_eq!(lat, Some(40.7));
                assert_eq!(lon, Some(-74.0));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn no_subcommand_means_tui() {
        let cli = Cli::parse_from(["meeqat"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn location_set_takes_name() {
        let cli = Cli::parse_from(["meeqat", "location", "set", "-33.86", "151.2", "--name", "Sydney"]);
        match cli.command {
            Some(Commands::Location {
                action: LocationCommands::Set { latitude, longitude, name },
            }) => {
                assert_eq!(latitude, -33.86);
                assert_eq!(longitude, 151.2);
                assert_eq!(name.as_deref(), Some("Sydney"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
