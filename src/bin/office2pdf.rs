//! CLI binary for office2pdf.
//!
//! A thin shim over the library crate: `serve` runs the upload server,
//! `convert` converts one local file, `locate` reports the `soffice` binary.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use office2pdf::{
    convert_to_pdf, serve, tool_status, ConversionConfig, InstallPolicy, ServerConfig,
};
use std::io;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Start the upload server on 127.0.0.1:8000
  office2pdf serve

  # Listen on all interfaces, install LibreOffice up front
  office2pdf serve --host 0.0.0.0 --port 8080 --ensure-tool

  # Upload a document
  curl -F file=@report.docx http://127.0.0.1:8000/upload

  # Convert one file without the server
  office2pdf convert slides.pptx --outdir out

  # Where is soffice?
  office2pdf locate --json

ENVIRONMENT VARIABLES:
  SOFFICE_PATH              Path to an existing soffice, skips PATH lookup
  SOFFICE_AUTO_CACHE_DIR    Where LibreOffice installers are downloaded
  OFFICE2PDF_SOFFICE        Same as --soffice
  RUST_LOG                  Overrides the log filter (e.g. office2pdf=debug)

LibreOffice is installed automatically the first time a conversion needs it
(apt-get on Linux, the 7.6.2 MSI/DMG on Windows/macOS). Pass --no-install to
fail instead.
"#;

/// Convert office documents to PDF with LibreOffice, over HTTP or locally.
#[derive(Parser, Debug)]
#[command(
    name = "office2pdf",
    version,
    about = "Convert office documents to PDF with LibreOffice",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Path to the soffice binary (skips lookup and install).
    #[arg(long, global = true, env = "OFFICE2PDF_SOFFICE")]
    soffice: Option<PathBuf>,

    /// Fail instead of installing LibreOffice when it is missing.
    #[arg(long, global = true, env = "OFFICE2PDF_NO_INSTALL")]
    no_install: bool,

    /// Per-conversion timeout in seconds.
    #[arg(long, global = true, env = "OFFICE2PDF_TIMEOUT", default_value_t = 120)]
    timeout: u64,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, global = true, env = "OFFICE2PDF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, global = true, env = "OFFICE2PDF_QUIET")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP upload server.
    Serve {
        /// Interface to listen on.
        #[arg(long, env = "OFFICE2PDF_HOST", default_value = "127.0.0.1")]
        host: IpAddr,

        /// Port to listen on.
        #[arg(short, long, env = "OFFICE2PDF_PORT", default_value_t = 8000)]
        port: u16,

        /// Folder for uploads and their PDFs.
        #[arg(long, env = "OFFICE2PDF_UPLOAD_DIR", default_value = office2pdf::config::DEFAULT_UPLOAD_DIR)]
        upload_dir: PathBuf,

        /// Largest accepted upload in MiB.
        #[arg(long, env = "OFFICE2PDF_MAX_UPLOAD_MB", default_value_t = 50,
              value_parser = clap::value_parser!(u64).range(1..=4096))]
        max_upload_mb: u64,

        /// Locate (or install) soffice before accepting requests.
        #[arg(long, env = "OFFICE2PDF_ENSURE_TOOL")]
        ensure_tool: bool,
    },

    /// Convert one local file to PDF.
    Convert {
        /// Document to convert.
        input: PathBuf,

        /// Output folder. Defaults to the input's folder.
        #[arg(short, long)]
        outdir: Option<PathBuf>,
    },

    /// Print where soffice is and which version it reports.
    Locate {
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let mut conversion = build_config(&cli)?;

    match cli.command {
        Command::Serve {
            host,
            port,
            ref upload_dir,
            max_upload_mb,
            ensure_tool,
        } => {
            if ensure_tool {
                let path = ensure_soffice(&conversion, cli.quiet)?;
                conversion.soffice_path = Some(path);
            }

            let max_upload_bytes = usize::try_from(max_upload_mb * 1024 * 1024)
                .context("Upload limit does not fit in memory on this platform")?;
            let config = ServerConfig {
                bind: SocketAddr::new(host, port),
                upload_dir: upload_dir.clone(),
                max_upload_bytes,
                conversion,
            };
            debug!(
                "Server config: {}",
                serde_json::to_string(&config).context("Failed to serialise config")?
            );

            serve(config).await.context("Server failed")?;
        }

        Command::Convert {
            ref input,
            ref outdir,
        } => {
            let outdir = match outdir {
                Some(dir) => dir.clone(),
                None => input
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(".")),
            };

            if conversion.soffice_path.is_none() {
                let path = ensure_soffice(&conversion, cli.quiet)?;
                conversion.soffice_path = Some(path);
            }

            let pdf = convert_to_pdf(input, &outdir, &conversion)
                .await
                .context("Conversion failed")?;
            println!("{}", pdf.display());
        }

        Command::Locate { json } => {
            let status = tool_status(&conversion).await;
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&status).context("Failed to serialise status")?
                );
            } else {
                match status.soffice {
                    Some(ref path) => {
                        println!("soffice:  {}", path.display());
                        println!(
                            "version:  {}",
                            status.version.as_deref().unwrap_or("unknown")
                        );
                    }
                    None => {
                        println!("soffice:  not found");
                        std::process::exit(1);
                    }
                }
            }
        }
    }

    Ok(())
}

/// Map global CLI flags to `ConversionConfig`.
fn build_config(cli: &Cli) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .timeout_secs(cli.timeout)
        .install_policy(if cli.no_install {
            InstallPolicy::Never
        } else {
            InstallPolicy::Auto
        });

    if let Some(ref path) = cli.soffice {
        builder = builder.soffice_path(path);
    }

    builder.build().context("Invalid configuration")
}

/// Resolve `soffice` up front, drawing a download bar if an installer is
/// fetched. An explicit `--soffice` is returned unchanged.
fn ensure_soffice(config: &ConversionConfig, quiet: bool) -> Result<PathBuf> {
    if let Some(ref path) = config.soffice_path {
        return Ok(path.clone());
    }
    let policy = config.install_policy;

    if quiet {
        return tokio::task::block_in_place(|| soffice_auto::ensure_soffice(policy, None))
            .context("LibreOffice is not available");
    }

    let dl_bar = ProgressBar::new(0);
    dl_bar.set_style(
        ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {bytes}/{total_bytes}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
    );
    dl_bar.set_prefix("LibreOffice");
    dl_bar.set_message("Locating…");

    let bar = dl_bar.clone();
    let path = tokio::task::block_in_place(|| {
        soffice_auto::ensure_soffice(
            policy,
            Some(&|downloaded, total| {
                if let Some(t) = total {
                    if bar.length().unwrap_or(0) != t {
                        bar.set_length(t);
                        bar.enable_steady_tick(Duration::from_millis(80));
                    }
                }
                bar.set_position(downloaded);
            }),
        )
    });

    match path {
        Ok(path) => {
            dl_bar.finish_and_clear();
            eprintln!("soffice: {}", path.display());
            Ok(path)
        }
        Err(e) => {
            dl_bar.abandon();
            Err(e).context("LibreOffice is not available")
        }
    }
}
