use clap::{Parser, Subcommand};
use safepass_transcoder::config::{self, with_config};
use safepass_transcoder::constants::CONFIG_FILE_PATH;
use safepass_transcoder::credentials::service::{export_credentials, import_credentials};
use safepass_transcoder::logger::{self, LogTag};
use safepass_transcoder::store::SqliteCredentialStore;
use std::path::{Path, PathBuf};

/// Import and export password-manager dumps
///
/// Logger flags (`--quiet`, `--verbose`, `--debug-<tag>`, `--verbose-<tag>`)
/// are accepted anywhere on the command line.
#[derive(Parser, Debug)]
#[command(name = "safepass", about = "Credential import/export transcoder")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, global = true, default_value = CONFIG_FILE_PATH)]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import a CSV, XLSX, XLSM or XML file for an owner
    Import {
        /// Owner the imported records belong to
        #[arg(long)]
        owner: String,

        /// File to import; the format is taken from its extension
        #[arg(long)]
        file: PathBuf,

        /// SQLite database (defaults to storage.database_path)
        #[arg(long)]
        db: Option<PathBuf>,

        /// Print the import summary as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Export every record of an owner
    Export {
        #[arg(long)]
        owner: String,

        /// csv, xlsx, xlsm or xml
        #[arg(long)]
        format: String,

        /// Output directory or file (defaults to the current directory)
        #[arg(long)]
        out: Option<PathBuf>,

        #[arg(long)]
        db: Option<PathBuf>,
    },
}

fn main() {
    let (logger_args, cli_args) = split_logger_args(std::env::args());
    logger::set_logger_config(logger::config_from_args(&logger_args));

    let cli = Cli::parse_from(cli_args);

    if let Err(e) = run(cli) {
        logger::error(LogTag::System, &format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Separate logger flags from the arguments clap understands
fn split_logger_args<I: IntoIterator<Item = String>>(args: I) -> (Vec<String>, Vec<String>) {
    args.into_iter().partition(|arg| {
        arg == "--quiet"
            || arg == "--verbose"
            || arg.starts_with("--debug-")
            || arg.starts_with("--verbose-")
    })
}

fn run(cli: Cli) -> anyhow::Result<()> {
    config::load_config_from_path(&cli.config).map_err(anyhow::Error::msg)?;

    match cli.command {
        Command::Import {
            owner,
            file,
            db,
            json,
        } => {
            let store = open_store(db)?;
            let bytes = std::fs::read(&file)
                .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", file.display(), e))?;
            let filename = file
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            let import_config = with_config(|cfg| cfg.import.clone());
            let summary = import_credentials(&store, &owner, &filename, &bytes, &import_config)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("{}", summary.message());
            }
        }
        Command::Export {
            owner,
            format,
            out,
            db,
        } => {
            let store = open_store(db)?;
            let export_config = with_config(|cfg| cfg.export.clone());
            let payload = export_credentials(&store, &owner, &format, &export_config)?;

            let target = output_path(out.as_deref(), &payload.filename);
            std::fs::write(&target, &payload.bytes)
                .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", target.display(), e))?;

            logger::info(
                LogTag::Export,
                &format!(
                    "Wrote {} ({} bytes, {})",
                    target.display(),
                    payload.bytes.len(),
                    payload.content_type
                ),
            );
            println!("{}", target.display());
        }
    }

    Ok(())
}

fn open_store(db: Option<PathBuf>) -> anyhow::Result<SqliteCredentialStore> {
    let path = db.unwrap_or_else(|| with_config(|cfg| PathBuf::from(&cfg.storage.database_path)));
    Ok(SqliteCredentialStore::open(&path)?)
}

/// Directories receive the suggested filename; anything else is used verbatim
fn output_path(out: Option<&Path>, filename: &str) -> PathBuf {
    match out {
        Some(path) if path.is_dir() => path.join(filename),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(filename),
    }
}
