use std::path::PathBuf;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use glimmerglass_l1::addressing::scheme_for;
use glimmerglass_l1::tl1::CorrelationCounter;
use glimmerglass_l1::{CommandGenerator, DriverConfig, ReplayTransport, SwitchDriver};

#[derive(Parser, Debug)]
#[command(name = "glimmerglass-l1")]
#[command(about = "Glimmerglass optical switch L1 driver tools")]
struct Args {
    /// Driver configuration file (TOML, JSON or YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve topology from captured TL1 responses and print it as JSON
    Topology {
        /// Switch resource address
        #[arg(short, long)]
        address: String,

        /// Directory holding system-info.txt, cfg-fiber.txt and crs-fiber.txt
        #[arg(short, long)]
        responses: PathBuf,
    },

    /// Print the command that maps src to dst
    Connect {
        src: String,
        dst: String,

        /// Map both directions (logical port mode)
        #[arg(long)]
        bidi: bool,

        /// Mapping group name for bidirectional mappings
        #[arg(long, default_value = "")]
        group: String,

        /// First correlation tag to use
        #[arg(long, default_value_t = 1)]
        tag: u64,
    },

    /// Print the command that removes the mapping between src and dst
    Disconnect {
        src: String,
        dst: String,

        /// Clear both directions (logical port mode)
        #[arg(long)]
        both: bool,

        /// First correlation tag to use
        #[arg(long, default_value_t = 1)]
        tag: u64,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "glimmerglass_l1=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let config = DriverConfig::load(args.config.as_deref())?;

    match args.command {
        Command::Topology { address, responses } => {
            let transport = ReplayTransport::from_dir(&responses)?;
            let mut driver = SwitchDriver::new(config, transport);
            let topology = driver.get_topology(&address)?;
            println!("{}", serde_json::to_string_pretty(&topology)?);
        }
        Command::Connect { src, dst, bidi, group, tag } => {
            let mut generator = CommandGenerator::with_counter(
                scheme_for(&config),
                CorrelationCounter::starting_at(tag),
            );
            let command = if bidi {
                generator.connect_bidirectional(&src, &dst, &group)?
            } else {
                generator.connect_unidirectional(&src, &dst)?
            };
            println!("{}", command);
        }
        Command::Disconnect { src, dst, both, tag } => {
            let mut generator = CommandGenerator::with_counter(
                scheme_for(&config),
                CorrelationCounter::starting_at(tag),
            );
            let command = if both {
                generator.disconnect_bidirectional(&src, &dst)?
            } else {
                generator.disconnect(&src, &dst)?
            };
            println!("{}", command);
        }
    }

    Ok(())
}
