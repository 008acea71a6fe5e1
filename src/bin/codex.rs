//! codex CLI - inspect and convert structured documents by key path
//!
//! Reads a JSON or YAML document from a file or stdin and prints the value at a
//! key path, the keys of an object, or the whole document re-encoded.

use clap::{Parser, Subcommand};
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process;

use codex::{
    AtomicKey, CodexConfig, CodexError, DateFormatter, DecodeExt, Format, Iso8601DateFormatter,
    JsonDecoder, KeyPath,
};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "codex")]
#[command(version, about = "Read and convert structured documents by key path", long_about = None)]
struct Cli {
    /// YAML config file (defaults, overridden by CODEX_* variables and flags)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the value at a key path as JSON
    Get {
        /// Key path, e.g. data.nested.title
        path: String,

        /// Input file (reads stdin when omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Input format
        #[arg(long, value_enum)]
        format: Option<Format>,

        /// Key path separator
        #[arg(short, long)]
        separator: Option<String>,

        /// Indent the output
        #[arg(short, long)]
        pretty: bool,

        /// Read the value as a date in the configured date format (RFC 3339
        /// when unset) and print it as RFC 3339
        #[arg(short, long)]
        date: bool,
    },

    /// List the keys of the object at a key path (the root when omitted)
    Keys {
        /// Key path of the object
        path: Option<String>,

        /// Input file (reads stdin when omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Input format
        #[arg(long, value_enum)]
        format: Option<Format>,

        /// Key path separator
        #[arg(short, long)]
        separator: Option<String>,
    },

    /// Re-encode a document in another format
    Convert {
        /// Input format
        #[arg(long, value_enum)]
        from: Option<Format>,

        /// Output format
        #[arg(long, value_enum, default_value = "json")]
        to: Format,

        /// Input file (reads stdin when omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Indent JSON output
        #[arg(short, long)]
        pretty: bool,
    },
}

fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(cli.config.as_deref())?;
    tracing::debug!(?config, "effective configuration");

    match cli.command {
        Commands::Get {
            path,
            file,
            format,
            separator,
            pretty,
            date,
        } => {
            let document = read_document(file.as_deref(), format.unwrap_or(config.format))?;
            let separator = separator.unwrap_or_else(|| config.separator.clone());
            let path = KeyPath::parse(&path, &separator);

            let value = if date {
                match config.date_formatter()? {
                    Some(formatter) => get_date(&document, &path, &formatter)?,
                    None => get_date(&document, &path, &Iso8601DateFormatter)?,
                }
            } else {
                get_value(&document, &path)?
            };
            let output = Format::Json.encode_document(&value, pretty || config.pretty)?;
            write_output(&output)?;
        }

        Commands::Keys {
            path,
            file,
            format,
            separator,
        } => {
            let document = read_document(file.as_deref(), format.unwrap_or(config.format))?;
            let separator = separator.unwrap_or_else(|| config.separator.clone());
            let path = path.map(|path| KeyPath::parse(&path, &separator));

            let mut stdout = io::stdout().lock();
            for key in list_keys(&document, path.as_ref())? {
                writeln!(stdout, "{}", key)?;
            }
        }

        Commands::Convert {
            from,
            to,
            file,
            pretty,
        } => {
            let document = read_document(file.as_deref(), from.unwrap_or(config.format))?;
            let output = convert(&document, to, pretty || config.pretty)?;
            write_output(&output)?;
        }
    }

    Ok(())
}

/// Value stored at `path`.
fn get_value(document: &Value, path: &KeyPath) -> Result<Value, CodexError> {
    JsonDecoder::new(document).decode_path(path)
}

/// Date stored at `path`, read with `formatter` and rendered as RFC 3339.
fn get_date<F: DateFormatter + ?Sized>(
    document: &Value,
    path: &KeyPath,
    formatter: &F,
) -> Result<Value, CodexError> {
    let raw: String = JsonDecoder::new(document).decode_path(path)?;
    let date = formatter
        .date_from(&raw)
        .ok_or_else(|| CodexError::DateFormattingFailed {
            path: path.to_string(),
            input: raw,
        })?;

    Ok(Value::String(Iso8601DateFormatter.string_from(&date)))
}

/// Keys of the object at `path`, or of the root when `path` is `None`.
fn list_keys(document: &Value, path: Option<&KeyPath>) -> Result<Vec<AtomicKey>, CodexError> {
    let mut accessor = JsonDecoder::new(document).keyed()?;
    if let Some(path) = path {
        for key in path.keys() {
            accessor = accessor.nested(key)?;
        }
    }
    Ok(accessor.keys())
}

fn convert(document: &Value, to: Format, pretty: bool) -> Result<Vec<u8>, CodexError> {
    tracing::debug!(%to, pretty, "re-encoding document");
    to.encode_document(document, pretty)
}

fn load_config(path: Option<&std::path::Path>) -> Result<CodexConfig, String> {
    let config = match path {
        Some(path) => CodexConfig::load_from_file(path)?,
        None => CodexConfig::default(),
    };
    config.with_env_overrides()
}

fn read_document(file: Option<&std::path::Path>, format: Format) -> Result<Value, Box<dyn std::error::Error>> {
    let data = match file {
        Some(path) => fs::read(path)
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?,
        None => {
            let mut data = Vec::new();
            io::stdin().read_to_end(&mut data)?;
            data
        }
    };

    tracing::debug!(bytes = data.len(), %format, "parsing input document");
    Ok(format.decode_document(&data)?)
}

fn write_output(output: &[u8]) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(output)?;
    if !output.ends_with(b"\n") {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()
}
