pub mod interfaces;
pub mod scan;
pub mod services;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub const DEFAULT_SERVICES_FILE: &str = "hostsweep-services.json";

#[derive(Parser)]
#[command(name = "hostsweep")]
#[command(about = "A LAN host and service scanner.")]
#[command(version)]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Raise the log level (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Service configuration file
    #[arg(long, global = true, default_value = DEFAULT_SERVICES_FILE)]
    pub services: PathBuf,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sweep an IPv4 range for live hosts and open services
    #[command(alias = "s")]
    Scan(ScanArgs),
    /// Inspect or edit the service configuration
    #[command(alias = "svc")]
    Services {
        #[command(subcommand)]
        action: ServicesAction,
    },
    /// List local IPv4 interfaces and their subnet ranges
    #[command(alias = "i")]
    Interfaces,
}

#[derive(Args)]
pub struct ScanArgs {
    /// `A.B.C.D` or `A.B.C.D-A.B.C.D`
    #[arg(required_unless_present = "subnet", conflicts_with = "subnet")]
    pub range: Option<String>,

    /// Scan the subnet of the first local interface
    #[arg(long)]
    pub subnet: bool,

    /// Write the results to a CSV file
    #[arg(long, value_name = "FILE")]
    pub csv: Option<PathBuf>,

    /// Leave the IP and MAC columns out of the CSV export
    #[arg(long)]
    pub no_mac: bool,

    /// Skip the confirmation for large ranges
    #[arg(short, long)]
    pub yes: bool,

    /// Addresses probed at the same time
    #[arg(short, long, default_value_t = 32)]
    pub concurrency: usize,

    /// Do not listen for service discovery announcements
    #[arg(long)]
    pub no_mdns: bool,

    /// Also list addresses that did not respond
    #[arg(long, conflicts_with = "with_services")]
    pub all: bool,

    /// Only list hosts with at least one open service
    #[arg(long)]
    pub with_services: bool,
}

#[derive(Subcommand)]
pub enum ServicesAction {
    /// Show every configured service
    #[command(alias = "ls")]
    List,
    /// Print or write the configuration as JSON
    Export {
        /// Only services that are not part of the catalog
        #[arg(long)]
        custom: bool,
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Merge a JSON file into the configuration
    Import { file: PathBuf },
    /// Enable a service, given as NAME:PORT
    Enable { service: String },
    /// Disable a service, given as NAME:PORT
    Disable { service: String },
    /// Add a custom service
    Add {
        name: String,
        port: u16,
        #[arg(long)]
        udp: bool,
    },
    /// Remove a custom service, given as NAME:PORT
    #[command(alias = "rm")]
    Remove { service: String },
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
