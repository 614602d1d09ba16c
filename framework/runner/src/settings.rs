use std::time::Duration;

use url::Url;

use crate::cli::{LoadGeneratorCli, ScenarioSelection, TickOverlap};

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("BASE_URL `{value}` is not a valid URL: {source}")]
    InvalidBaseUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("BASE_URL `{0}` must use http or https")]
    UnsupportedScheme(String),
    #[error("BASE_URL `{0}` cannot be used as a base for request paths")]
    CannotBeABase(String),
    #[error("{name} must be greater than zero")]
    Zero { name: &'static str },
}

/// Settings for one run of the load generator. Built once at startup and never changed.
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: Url,
    pub interval: Duration,
    pub concurrency: usize,
    pub request_timeout: Duration,
    pub shutdown_grace: Duration,
    pub tick_overlap: TickOverlap,
    pub scenario_selection: ScenarioSelection,
    pub run_duration: Option<Duration>,
    pub summary: bool,
}

impl Settings {
    /// Build the URL for a scenario path, which may carry a query string, relative to the base URL.
    ///
    /// A path prefix on the base URL is kept, so `http://host/app` and `/rankings/top` give
    /// `http://host/app/rankings/top`.
    pub fn url_for(&self, path: &str) -> Result<Url, url::ParseError> {
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            let with_slash = format!("{}/", base.path());
            base.set_path(&with_slash);
        }
        base.join(path.trim_start_matches('/'))
    }
}

impl TryFrom<LoadGeneratorCli> for Settings {
    type Error = ConfigurationError;

    fn try_from(cli: LoadGeneratorCli) -> Result<Self, Self::Error> {
        let base_url =
            Url::parse(cli.base_url.trim()).map_err(|source| ConfigurationError::InvalidBaseUrl {
                value: cli.base_url.clone(),
                source,
            })?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ConfigurationError::UnsupportedScheme(cli.base_url));
        }
        if base_url.cannot_be_a_base() {
            return Err(ConfigurationError::CannotBeABase(cli.base_url));
        }

        Ok(Settings {
            base_url,
            interval: Duration::from_secs(non_zero("INTERVAL_SECONDS", cli.interval_seconds)?),
            concurrency: non_zero("CONCURRENCY", cli.concurrency)?,
            request_timeout: Duration::from_secs(non_zero(
                "REQUEST_TIMEOUT_SECONDS",
                cli.request_timeout_seconds,
            )?),
            shutdown_grace: Duration::from_secs(cli.shutdown_grace_seconds),
            tick_overlap: cli.tick_overlap,
            scenario_selection: cli.scenario_selection,
            run_duration: cli.run_duration_seconds.map(Duration::from_secs),
            summary: !cli.no_summary,
        })
    }
}

fn non_zero<T: Default + PartialEq>(name: &'static str, value: T) -> Result<T, ConfigurationError> {
    if value == T::default() {
        Err(ConfigurationError::Zero { name })
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_valid() {
        let settings = Settings::try_from(LoadGeneratorCli::default()).unwrap();

        assert_eq!("http://frontend-svc/", settings.base_url.as_str());
        assert_eq!(Duration::from_secs(30), settings.interval);
        assert_eq!(5, settings.concurrency);
        assert_eq!(Duration::from_secs(5), settings.request_timeout);
        assert_eq!(TickOverlap::Skip, settings.tick_overlap);
        assert_eq!(None, settings.run_duration);
        assert!(settings.summary);
    }

    #[test]
    fn malformed_base_url_is_rejected() {
        let cli = LoadGeneratorCli {
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        let err = Settings::try_from(cli).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidBaseUrl { .. }));
        assert!(err.to_string().contains("not a url"));
    }

    #[test]
    fn non_http_scheme_is_rejected() {
        let cli = LoadGeneratorCli {
            base_url: "ftp://frontend-svc".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            Settings::try_from(cli),
            Err(ConfigurationError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn zero_values_are_rejected() {
        let cli = LoadGeneratorCli {
            interval_seconds: 0,
            ..Default::default()
        };
        let err = Settings::try_from(cli).unwrap_err();
        assert_eq!("INTERVAL_SECONDS must be greater than zero", err.to_string());

        let cli = LoadGeneratorCli {
            concurrency: 0,
            ..Default::default()
        };
        assert!(matches!(
            Settings::try_from(cli),
            Err(ConfigurationError::Zero { name: "CONCURRENCY" })
        ));

        let cli = LoadGeneratorCli {
            request_timeout_seconds: 0,
            ..Default::default()
        };
        assert!(Settings::try_from(cli).is_err());
    }

    #[test]
    fn zero_grace_period_is_allowed() {
        let cli = LoadGeneratorCli {
            shutdown_grace_seconds: 0,
            ..Default::default()
        };
        assert_eq!(
            Duration::ZERO,
            Settings::try_from(cli).unwrap().shutdown_grace
        );
    }

    #[test]
    fn url_for_joins_paths_and_queries() {
        let settings = Settings::try_from(LoadGeneratorCli::default()).unwrap();
        assert_eq!(
            "http://frontend-svc/rankings/top?limit=5",
            settings.url_for("/rankings/top?limit=5").unwrap().as_str()
        );
    }

    #[test]
    fn url_for_keeps_base_path_prefix() {
        let cli = LoadGeneratorCli {
            base_url: "https://demo.example.com/app".to_string(),
            ..Default::default()
        };
        let settings = Settings::try_from(cli).unwrap();
        assert_eq!(
            "https://demo.example.com/app/api/score",
            settings.url_for("/api/score").unwrap().as_str()
        );
    }
}
