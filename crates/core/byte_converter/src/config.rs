use crate::error::ConfigError;
use camino::Utf8Path;
use camino::Utf8PathBuf;
use serde::Deserialize;
use std::fs;
use std::io;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/byte-converter/byte-converter.toml";
pub const DEFAULT_RESUME_INTERVAL: Duration = Duration::from_millis(100);

/// Settings of the `byte-converter` service, as read from its TOML file.
///
/// ```toml
/// input = "/var/lib/byte-converter/input.bin"
/// output = "/var/lib/byte-converter/output.txt"
/// resume_interval = "250ms"
/// log_level = "debug"
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterConfig {
    /// File to read encoded bytes from; stdin if `None`.
    pub input: Option<Utf8PathBuf>,

    /// File to write decoded values to; stdout if `None`.
    pub output: Option<Utf8PathBuf>,

    /// Delay between two resume signals sent to the converter.
    pub resume_interval: Duration,

    pub log_level: Option<tracing::Level>,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        ConverterConfig {
            input: None,
            output: None,
            resume_interval: DEFAULT_RESUME_INTERVAL,
            log_level: None,
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    input: Option<Utf8PathBuf>,
    output: Option<Utf8PathBuf>,
    resume_interval: Option<String>,
    log_level: Option<String>,
}

impl ConverterConfig {
    /// Read the config file at `path`.
    ///
    /// A missing file is only an error if the file is `required`,
    /// otherwise the default settings are used.
    pub fn try_new(path: &Utf8Path, required: bool) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(path, &contents),
            Err(err) if err.kind() == io::ErrorKind::NotFound && !required => Ok(Self::default()),
            Err(source) => Err(ConfigError::Unreadable {
                path: path.to_owned(),
                source,
            }),
        }
    }

    fn from_toml(path: &Utf8Path, contents: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile =
            toml::from_str(contents).map_err(|e| ConfigError::InvalidSyntax {
                path: path.to_owned(),
                reason: e.to_string(),
            })?;

        let resume_interval = file
            .resume_interval
            .as_deref()
            .map(parse_resume_interval)
            .transpose()?
            .unwrap_or(DEFAULT_RESUME_INTERVAL);
        let log_level = file.log_level.as_deref().map(parse_log_level).transpose()?;

        Ok(ConverterConfig {
            input: file.input,
            output: file.output,
            resume_interval,
            log_level,
        })
    }
}

/// Parse a human readable, non-zero duration such as `100ms` or `2s`.
pub fn parse_resume_interval(value: &str) -> Result<Duration, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidResumeInterval {
        value: value.to_string(),
        reason,
    };
    let interval = humantime::parse_duration(value).map_err(|e| invalid(e.to_string()))?;
    if interval.is_zero() {
        return Err(invalid("the interval must not be zero".to_string()));
    }
    Ok(interval)
}

pub fn parse_log_level(value: &str) -> Result<tracing::Level, ConfigError> {
    tracing::Level::from_str(&value.to_uppercase()).map_err(|_| ConfigError::InvalidLogLevel {
        name: value.to_string(),
    })
}
