use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vanopticon_ratatoskr::ingest::Converter;
use vanopticon_ratatoskr::{config, observability, run};

#[derive(Parser)]
#[command(
	name = "ratatoskr",
	version,
	about = "Ratatoskr - turn uploaded spreadsheets and delimited text into clean CSV"
)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
	/// Run the HTTP conversion service (default)
	Serve {
		/// Address to bind, overrides the configured host
		#[arg(long)]
		host: Option<String>,
		/// Port to bind, overrides the configured port
		#[arg(long)]
		port: Option<u16>,
	},
	/// Convert a file to CSV
	Convert {
		/// File to convert
		path: PathBuf,
		/// Treat the input as this format instead of detecting it (xlsx, xml, csv, tsv, ...)
		#[arg(long)]
		format: Option<String>,
		/// Write the CSV here instead of stdout
		#[arg(short, long)]
		output: Option<PathBuf>,
		/// Delimiter used when sniffing cannot decide (`none` disables the fallback)
		#[arg(long)]
		default_delimiter: Option<String>,
		/// Number of leading lines inspected by the delimiter sniffer
		#[arg(long)]
		sample_lines: Option<usize>,
	},
	/// Print how a file would be classified, as JSON
	Detect {
		/// File to inspect
		path: PathBuf,
	},
}

#[tokio::main]
async fn main() {
	if let Err(e) = try_main().await {
		eprintln!("ratatoskr: {:#}", e);
		std::process::exit(1);
	}
}

async fn try_main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	let mut settings = config::load().context("failed to load configuration")?;
	observability::init_logging(settings.log_level)?;

	match cli.command.unwrap_or(Commands::Serve {
		host: None,
		port: None,
	}) {
		Commands::Serve { host, port } => {
			if let Some(h) = host {
				settings.host = h;
			}
			if let Some(p) = port {
				settings.port = p;
			}
			run(settings).await
		}
		Commands::Convert {
			path,
			format,
			output,
			default_delimiter,
			sample_lines,
		} => {
			if let Some(d) = default_delimiter {
				settings.default_delimiter = d;
			}
			if let Some(n) = sample_lines {
				settings.sample_lines = n;
			}
			let converter = Converter::new(settings.convert_options()?);
			let out = match format.as_deref() {
				Some(f) => converter.convert_file_as(&path, f),
				None => converter.convert_file(&path),
			}
			.with_context(|| format!("failed to convert {}", path.display()))?;

			match output {
				Some(dest) => std::fs::write(&dest, out.body)
					.with_context(|| format!("failed to write {}", dest.display()))?,
				None => print!("{}", out.body),
			}
			Ok(())
		}
		Commands::Detect { path } => {
			let converter = Converter::new(settings.convert_options()?);
			let bytes =
				std::fs::read(&path).with_context(|| format!("failed to read {}", path.display()))?;
			let classification = converter
				.classify(&bytes)
				.with_context(|| format!("failed to classify {}", path.display()))?;
			println!("{}", serde_json::to_string_pretty(&classification)?);
			Ok(())
		}
	}
}
