use crate::error::{HarvestError, Result};

/// Runtime configuration, sourced from the environment.
#[derive(Clone, Debug)]
pub struct Config {
    /// AirlineMogul account name.
    pub username: String,
    /// AirlineMogul password.
    pub password: String,
    /// World identifier, e.g. "132".
    pub world_id: String,
    /// Continent whose airports serve as the departure pool.
    pub departure_continent: String,
    /// Continents to harvest arrival distances from, in order.
    pub arrival_continents: Vec<String>,
    /// Maximum successful queries per continent. `None` means unlimited.
    pub per_continent_cap: Option<usize>,
    /// Output CSV path.
    pub output_file: String,
    /// Run Chrome headless.
    pub headless: bool,
    /// Optional Chrome/Chromium binary override.
    pub chrome_executable: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            username: String::new(),
            password: String::new(),
            world_id: String::new(),
            departure_continent: "Bases".to_string(),
            arrival_continents: vec![
                "Central America".to_string(),
                "South America".to_string(),
            ],
            per_continent_cap: Some(2),
            output_file: "extracted_distances.csv".to_string(),
            headless: true,
            chrome_executable: None,
        }
    }
}

impl Config {
    /// Load configuration from the environment, falling back to defaults for
    /// everything except the credentials and world id, which are required.
    ///
    /// `AM_USERNAME` / `AM_PASSWORD` / `AM_WORLD` are preferred; the
    /// un-prefixed names are honoured as a fallback (`USERNAME` collides with
    /// the standard shell variable on most systems, hence the prefix).
    pub fn from_env() -> Result<Self> {
        let default = Self::default();
        Ok(Self {
            username: required_var("AM_USERNAME", "USERNAME")?,
            password: required_var("AM_PASSWORD", "PASSWORD")?,
            world_id: required_var("AM_WORLD", "WORLD")?,
            departure_continent: std::env::var("DEPARTURE_CONTINENT")
                .unwrap_or(default.departure_continent),
            arrival_continents: std::env::var("ARRIVAL_CONTINENTS")
                .map(|v| parse_continent_list(&v))
                .unwrap_or(default.arrival_continents),
            per_continent_cap: match std::env::var("PER_CONTINENT_CAP") {
                Ok(v) if v.eq_ignore_ascii_case("none") => None,
                Ok(v) => Some(v.parse().map_err(|_| {
                    HarvestError::Config(format!(
                        "PER_CONTINENT_CAP must be a number or 'none', got '{}'",
                        v
                    ))
                })?),
                Err(_) => default.per_continent_cap,
            },
            output_file: std::env::var("OUTPUT_FILE").unwrap_or(default.output_file),
            headless: std::env::var("HEADLESS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.headless),
            chrome_executable: std::env::var("CHROME_EXECUTABLE").ok(),
        })
    }
}

fn required_var(name: &str, fallback: &str) -> Result<String> {
    std::env::var(name)
        .or_else(|_| std::env::var(fallback))
        .map_err(|_| HarvestError::Config(format!("{} is not set", name)))
}

fn parse_continent_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continent_list_splits_and_trims() {
        let list = parse_continent_list("Central America, South America ,Africa");
        assert_eq!(list, vec!["Central America", "South America", "Africa"]);
    }

    #[test]
    fn continent_list_drops_empty_entries() {
        let list = parse_continent_list("Europe,,");
        assert_eq!(list, vec!["Europe"]);
    }

    #[test]
    fn default_run_parameters() {
        let config = Config::default();
        assert_eq!(config.per_continent_cap, Some(2));
        assert_eq!(config.departure_continent, "Bases");
        assert_eq!(config.output_file, "extracted_distances.csv");
    }
}
