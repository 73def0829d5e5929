use log::Level;
use serde::Deserialize;
use thiserror::Error;

/// Runtime configuration for Ratatoskr.
///
/// Values are loaded from (in order): the `/etc/vanopticon/ratatoskr.json` file,
/// the user config folders (optional), and environment variables prefixed with
/// `RTK_` (e.g. `RTK_PORT`, `RTK_DEFAULT_DELIMITER`).
#[derive(Debug, Deserialize, PartialEq, Eq, Clone)]
#[serde(default)]
pub struct Settings {
	pub host: String,
	pub port: u16,
	pub log_level: Level,
	/// Delimiter used when sniffing cannot decide. Empty or `none` disables
	/// the fallback so undecidable text is rejected instead.
	pub default_delimiter: String,
	/// Number of leading lines inspected by the delimiter sniffer.
	pub sample_lines: usize,
	pub max_upload_bytes: usize,
}

impl Default for Settings {
	fn default() -> Self {
		Self {
			host: "127.0.0.1".to_string(),
			port: 15000,
			log_level: Level::Info,
			default_delimiter: ",".to_string(),
			sample_lines: DEFAULT_SAMPLE_LINES,
			max_upload_bytes: 16 * 1024 * 1024,
		}
	}
}

pub const DEFAULT_SAMPLE_LINES: usize = 5;

/// Per-invocation knobs consumed by the conversion pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertOptions {
	pub default_delimiter: Option<u8>,
	pub sample_lines: usize,
}

impl Default for ConvertOptions {
	fn default() -> Self {
		Self {
			default_delimiter: Some(b','),
			sample_lines: DEFAULT_SAMPLE_LINES,
		}
	}
}

#[derive(Debug, Error)]
pub enum SettingsError {
	#[error("configuration error: {0}")]
	Config(#[from] config::ConfigError),
	#[error("invalid default delimiter {0:?}: expected a single ASCII character, `tab` or `none`")]
	InvalidDelimiter(String),
	#[error("sample_lines must be at least 1")]
	InvalidSampleLines,
}

impl Settings {
	/// Validate the conversion related settings and turn them into options.
	pub fn convert_options(&self) -> Result<ConvertOptions, SettingsError> {
		if self.sample_lines == 0 {
			return Err(SettingsError::InvalidSampleLines);
		}
		Ok(ConvertOptions {
			default_delimiter: parse_delimiter(&self.default_delimiter)?,
			sample_lines: self.sample_lines,
		})
	}
}

/// Parse a delimiter as written in a config file, env var or CLI flag.
pub fn parse_delimiter(raw: &str) -> Result<Option<u8>, SettingsError> {
	match raw {
		"" => return Ok(None),
		"\t" | "\\t" => return Ok(Some(b'\t')),
		_ => {}
	}
	match raw.to_ascii_lowercase().as_str() {
		"none" => Ok(None),
		"tab" => Ok(Some(b'\t')),
		"comma" => Ok(Some(b',')),
		"semicolon" => Ok(Some(b';')),
		"pipe" => Ok(Some(b'|')),
		_ if raw.len() == 1 && raw.is_ascii() => Ok(Some(raw.as_bytes()[0])),
		_ => Err(SettingsError::InvalidDelimiter(raw.to_string())),
	}
}

pub fn load() -> Result<Settings, SettingsError> {
	let mut builder = config::Config::builder()
		.add_source(config::File::with_name("/etc/vanopticon/ratatoskr.json").required(false));

	if let Some(folder) = dirs::config_dir() {
		let user_config_path = folder.join("vanopticon").join("ratatoskr.json");
		builder = builder.add_source(config::File::from(user_config_path).required(false));
	}
	if let Some(folder) = dirs::config_local_dir() {
		let local_config_path = folder.join("vanopticon").join("ratatoskr.json");
		builder = builder.add_source(config::File::from(local_config_path).required(false));
	}

	builder = builder.add_source(config::Environment::with_prefix("RTK").separator("__"));

	let cfg = builder.build()?;

	let mut s: Settings = cfg.try_deserialize()?;

	// Explicit environment variables win. The `config` crate skips empty
	// values, and an empty RTK_DEFAULT_DELIMITER is meaningful (no fallback).
	if let Ok(h) = std::env::var("RTK_HOST") {
		if !h.is_empty() {
			s.host = h;
		}
	}
	if let Ok(p) = std::env::var("RTK_PORT") {
		if let Ok(pn) = p.parse::<u16>() {
			s.port = pn;
		}
	}
	if let Ok(l) = std::env::var("RTK_LOG_LEVEL") {
		if let Ok(parsed) = l.parse::<Level>() {
			s.log_level = parsed;
		}
	}
	if let Ok(d) = std::env::var("RTK_DEFAULT_DELIMITER") {
		s.default_delimiter = d;
	}
	if let Ok(n) = std::env::var("RTK_SAMPLE_LINES") {
		if let Ok(parsed) = n.parse::<usize>() {
			s.sample_lines = parsed;
		}
	}
	if let Ok(m) = std::env::var("RTK_MAX_UPLOAD_BYTES") {
		if let Ok(parsed) = m.parse::<usize>() {
			s.max_upload_bytes = parsed;
		}
	}

	Ok(s)
}
