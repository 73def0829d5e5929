use chrono::{SecondsFormat, Utc};
use fern::colors::{Color, ColoredLevelConfig};
use log::Level;

/// Initialize line-oriented logging to stderr.
///
/// Each line carries an RFC 3339 timestamp, the coloured level, the log target
/// and the message. Stdout is left alone so `ratatoskr convert` can pipe CSV.
pub fn init_logging(level: Level) -> anyhow::Result<()> {
	let colors = ColoredLevelConfig::new()
		.error(Color::Red)
		.warn(Color::Yellow)
		.info(Color::Green)
		.debug(Color::Blue)
		.trace(Color::Magenta);

	fern::Dispatch::new()
		.format(move |out, message, record| {
			out.finish(format_args!(
				"{} {} [{}] {}",
				Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
				colors.color(record.level()),
				record.target(),
				message
			))
		})
		.level(level.to_level_filter())
		// Dependencies are noisy at debug; keep them at warn.
		.level_for("hyper", log::LevelFilter::Warn)
		.level_for("calamine", log::LevelFilter::Warn)
		.chain(std::io::stderr())
		.apply()
		.map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

	Ok(())
}

#[cfg(feature = "unit-tests")]
mod tests {
	#[test]
	fn logging_initialization() {
		// The global logger can only be installed once per process; a second
		// call must fail cleanly instead of panicking.
		let _ = super::init_logging(log::Level::Debug);
		assert!(super::init_logging(log::Level::Debug).is_err());
	}
}
