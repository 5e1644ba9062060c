//! quarry CLI - inspect dialect profiles
//!
//! Usage:
//!   quarry profile [<vendor>] [--config <file>]
//!   quarry detect [<product>] [--version <v>] [--url <url>]
//!   quarry type-name <vendor> <code> [--size <n>] [--decimals <n>]
//!
//! Examples:
//!   quarry profile oracle
//!   quarry detect "DB2/LINUXX8664" --version SQL09070
//!   quarry type-name mysql varchar --size 255

use clap::{Parser, Subcommand};
use quarry::config::{probe_from_env, Settings};
use quarry::sql::dialect::{DialectProfile, Vendor, VendorProbe};
use quarry::sql::types::TypeCode;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "quarry")]
#[command(about = "quarry - dialect profiles for a relational SQL compiler")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a resolved profile as JSON
    Profile {
        /// Vendor default to print; the configured profile when omitted
        vendor: Option<Vendor>,

        /// Settings file (default: QUARRY_CONFIG, ./quarry.toml, user config dir)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Detect the vendor for a reported product
    Detect {
        /// Product name; read from QUARRY_DB_* variables when omitted
        product: Option<String>,

        /// Product version
        #[arg(long)]
        version: Option<String>,

        /// Connection URL
        #[arg(long)]
        url: Option<String>,
    },

    /// Print the column type name for a type code
    TypeName {
        vendor: Vendor,

        /// Generic type name, e.g. varchar or bigint
        code: TypeCode,

        #[arg(long, default_value_t = 0)]
        size: u32,

        #[arg(long, default_value_t = 0)]
        decimals: u32,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Profile { vendor, config } => cmd_profile(vendor, config),
        Commands::Detect {
            product,
            version,
            url,
        } => cmd_detect(product, version, url),
        Commands::TypeName {
            vendor,
            code,
            size,
            decimals,
        } => {
            println!("{}", vendor.profile().type_name(code, size, decimals));
            ExitCode::SUCCESS
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "quarry=debug",
        _ => "quarry=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn cmd_profile(vendor: Option<Vendor>, config: Option<PathBuf>) -> ExitCode {
    let profile = match vendor {
        Some(vendor) => Ok(vendor.profile().clone()),
        None => {
            let settings = match &config {
                Some(path) => Settings::from_file(path),
                None => Settings::load(),
            };
            settings.and_then(|s| s.resolve_profile())
        }
    };

    let profile = match profile {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match serde_json::to_string_pretty(&profile) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error serializing profile: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_detect(product: Option<String>, version: Option<String>, url: Option<String>) -> ExitCode {
    let probe = match product {
        Some(product) => {
            let mut probe = VendorProbe::new(product);
            if let Some(version) = version {
                probe = probe.with_version(version);
            }
            if let Some(url) = url {
                probe = probe.with_url(url);
            }
            probe
        }
        None => match probe_from_env() {
            Ok(probe) => probe,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };

    debug!(?probe, "detecting");
    let profile = DialectProfile::detect(&probe);
    println!("{} ({})", probe.vendor(), profile.platform);
    ExitCode::SUCCESS
}
