//! iptags: serve or query tags for IPv4 addresses from a JSON knowledge base.

use clap::{Parser, Subcommand};
use iptags::{
    parse_address, PrefixIndex, ServerConfig, DEFAULT_KNOWLEDGE_BASE, DEFAULT_LISTEN,
};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "iptags")]
#[command(author = "Kaitu.io")]
#[command(version)]
#[command(about = "Tag IPv4 addresses by the CIDR networks that contain them", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the tag lookup HTTP API
    Serve {
        /// Knowledge base JSON file (optionally gzip-compressed)
        #[arg(short, long, env = "IPTAGS_KNOWLEDGE_BASE", default_value = DEFAULT_KNOWLEDGE_BASE)]
        knowledge_base: PathBuf,

        /// Listen address
        #[arg(short, long, env = "IPTAGS_LISTEN", default_value_t = DEFAULT_LISTEN)]
        listen: SocketAddr,
    },

    /// Print the tags of one or more addresses
    Lookup {
        /// Knowledge base JSON file (optionally gzip-compressed)
        #[arg(short, long, env = "IPTAGS_KNOWLEDGE_BASE", default_value = DEFAULT_KNOWLEDGE_BASE)]
        knowledge_base: PathBuf,

        /// IPv4 addresses to look up
        #[arg(required = true)]
        ips: Vec<String>,

        /// Also list every matching network with its own tags
        #[arg(short, long)]
        verbose: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve {
            knowledge_base,
            listen,
        } => serve(ServerConfig::new(knowledge_base, listen)),
        Commands::Lookup {
            knowledge_base,
            ips,
            verbose,
        } => lookup(&knowledge_base, &ips, verbose),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn serve(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(iptags::server::run(config))?;
    Ok(())
}

fn lookup(
    knowledge_base: &Path,
    ips: &[String],
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    // Reject bad addresses before building the index.
    let addrs = ips
        .iter()
        .map(|ip| parse_address(ip))
        .collect::<iptags::Result<Vec<_>>>()?;

    let index = PrefixIndex::load(knowledge_base)?;

    for addr in addrs {
        let tags = index.tags_for(addr);
        println!("{} {}", addr, serde_json::to_string(&tags)?);

        if verbose {
            for network in index.ancestors(addr) {
                let own: Vec<&str> = network.tags().collect();
                println!("  {} {}", network.key(), serde_json::to_string(&own)?);
            }
        }
    }

    Ok(())
}
