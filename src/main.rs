use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info};

use booster_draft::config::DraftConfig;
use booster_draft::draft::{CardRef, Cube, CubePackSource};
use booster_draft::error::{DraftError, Result};
use booster_draft::service::{host, TracingObserver};
use booster_draft::transport::{DraftClient, FirstCardPicker, Picker};
use booster_draft::utils::init_logging;

#[derive(Parser)]
#[command(name = "draft")]
#[command(about = "Host or join a networked booster draft")]
struct Args {
    /// TOML configuration file; DRAFT_* variables override it
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Seat players and run a draft
    Host {
        /// Cube file (.json or one card id per line)
        #[arg(long)]
        cube: PathBuf,

        /// Port to listen on, keeping the configured host
        #[arg(short, long)]
        port: Option<u16>,

        /// Draft name announced to players
        #[arg(short, long)]
        name: Option<String>,

        /// Number of players; also sets packs per player
        #[arg(long)]
        players: Option<usize>,

        /// Seed for reproducible packs
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Connect to a hosted draft as a player
    Join {
        /// Server address, defaults to the configured client address
        #[arg(short, long)]
        address: Option<String>,

        /// Take the first card of every pack without prompting
        #[arg(long)]
        auto: bool,
    },
    /// Print a default configuration file
    ExampleConfig,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    if let Err(e) = run(args).await {
        error!(error = %e, "Draft failed");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    if let Command::ExampleConfig = args.command {
        println!("{}", DraftConfig::example_config());
        return Ok(());
    }

    let mut config = match &args.config {
        Some(path) => DraftConfig::from_file(path)?,
        None => DraftConfig::default(),
    };
    config.apply_env()?;
    init_logging(&config.logging)?;

    match args.command {
        Command::Host {
            cube,
            port,
            name,
            players,
            seed,
        } => {
            if let Some(port) = port {
                config.server.address = with_port(&config.server.address, port)?;
            }
            if let Some(name) = name {
                config.draft.name = name;
            }
            if let Some(players) = players {
                config.draft.players = players;
                config.draft.packs_per_player = players;
            }
            config.validate_strict()?;

            let cube = Cube::load(&cube)?;
            info!(cube = %cube.name, cards = cube.len(), "Loaded cube");
            let mut source = CubePackSource::new(cube, config.draft.pack_size);
            if let Some(seed) = seed {
                source = source.with_seed(seed);
            }
            let observer = Arc::new(TracingObserver::new());

            tokio::select! {
                outcome = host(&config, &mut source, observer) => {
                    let outcome = outcome?;
                    for (slot, pile) in outcome.picks.iter().enumerate() {
                        println!("Player {slot}: {}", join_cards(pile));
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted, abandoning draft");
                }
            }
        }
        Command::Join { address, auto } => {
            let address = address.unwrap_or_else(|| config.client.address.clone());
            let client = DraftClient::connect(&address, config.client.header_width).await?;

            let summary = if auto {
                client.run(&mut FirstCardPicker).await?
            } else {
                client.run(&mut stdin_picker()).await?
            };
            println!("{}: {}", summary.draft_name, join_cards(&summary.pile));
        }
        Command::ExampleConfig => {}
    }

    Ok(())
}

/// Prompts for picks; accepts a card id, or failing that its 1-based position
struct PromptPicker<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Picker for PromptPicker<R, W> {
    fn pick(&mut self, pack_number: usize, offer: &[CardRef]) -> Result<CardRef> {
        loop {
            writeln!(self.output, "Pack {pack_number}:")?;
            for (i, card) in offer.iter().enumerate() {
                writeln!(self.output, "  {:>2}. {card}", i + 1)?;
            }
            write!(self.output, "Pick> ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                return Err(DraftError::ConnectionLost);
            }
            let line = line.trim();

            if let Some(card) = offer.iter().find(|card| card.as_str() == line) {
                return Ok(card.clone());
            }
            if let Ok(position) = line.parse::<usize>() {
                if let Some(card) = position.checked_sub(1).and_then(|i| offer.get(i)) {
                    return Ok(card.clone());
                }
            }
            writeln!(self.output, "'{line}' is not in this pack")?;
        }
    }
}

/// Terminal picker; reads stdin off the runtime's worker threads
fn stdin_picker() -> impl Picker {
    let mut prompt = PromptPicker {
        input: std::io::stdin().lock(),
        output: std::io::stdout(),
    };
    move |pack_number: usize, offer: &[CardRef]| -> Result<CardRef> {
        tokio::task::block_in_place(|| prompt.pick(pack_number, offer))
    }
}

fn with_port(address: &str, port: u16) -> Result<String> {
    let host = address
        .rsplit_once(':')
        .map(|(host, _)| host)
        .ok_or_else(|| DraftError::Configuration(format!("Invalid server address: {address}")))?;
    Ok(format!("{host}:{port}"))
}

fn join_cards(cards: &[CardRef]) -> String {
    cards
        .iter()
        .map(CardRef::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}
