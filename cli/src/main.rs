use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use geocoin_core::{self as game, Command, CommandOutcome, Game, LocationProvider};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod config;
mod storage;
mod surface;
mod track;

#[derive(Parser, Debug)]
#[command(version, about = "Collect geocoins from caches around you", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Directory holding the saved game
    #[arg(long, env = "GEOCOIN_STATE_DIR", default_value = ".geocoin")]
    state_dir: PathBuf,

    /// JSON game config; fields it leaves out keep their defaults
    #[arg(long, env = "GEOCOIN_CONFIG")]
    config: Option<PathBuf>,

    /// How far (in tiles, Manhattan distance) caches are shown around the player [default: 8]
    #[arg(long)]
    radius: Option<u32>,

    /// Chance for any cell to hold a cache [default: 0.1]
    #[arg(long)]
    spawn_probability: Option<f64>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// List the caches in view
    Look,
    /// Show the coins you carry
    Status,
    /// Walk one or more tiles
    Move {
        direction: Heading,
        #[arg(default_value_t = 1)]
        count: u32,
    },
    /// Take a coin from the cache at "i,j"
    Pickup {
        #[arg(allow_hyphen_values = true)]
        position: game::Cell,
    },
    /// Leave a coin in the cache at "i,j"
    Drop {
        #[arg(allow_hyphen_values = true)]
        position: game::Cell,
    },
    /// Jump to a latitude/longitude, as a location sensor would
    Locate {
        #[arg(allow_hyphen_values = true)]
        lat: f64,
        #[arg(allow_hyphen_values = true)]
        lng: f64,
    },
    /// Replay a recorded track of "lat,lng" lines
    Follow { track: PathBuf },
    /// Erase the saved game and start over
    Reset,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Heading {
    North,
    South,
    East,
    West,
}

impl From<Heading> for game::Direction {
    fn from(heading: Heading) -> Self {
        match heading {
            Heading::North => Self::North,
            Heading::South => Self::South,
            Heading::East => Self::East,
            Heading::West => Self::West,
        }
    }
}

fn init_tracing(level: log::LevelFilter) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_ascii_lowercase()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn report(outcome: CommandOutcome) {
    use CommandOutcome::*;
    match outcome {
        PickedUp(coin) => println!("Picked up 🪙{coin}"),
        Dropped(coin) => println!("Dropped 🪙{coin}"),
        Moved { to, .. } => println!("Now at cell {to}"),
        Unchanged => println!("Still in the same cell"),
        Guarded(err) => println!("Nothing happened: {err}"),
        Reset => println!("Game reset"),
    }
}

fn print_status(state: &game::GameState) {
    let inventory = state.inventory();
    println!("{}", inventory.status_line());
    for coin in inventory.coins() {
        println!("  🪙{coin}");
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose.log_level_filter());
    log::debug!("args: {:?}", args);

    let config = config::resolve(
        args.config.as_deref(),
        config::Overrides {
            radius: args.radius,
            spawn_probability: args.spawn_probability,
        },
    )?;
    let storage = storage::FileStorage::new(&args.state_dir);
    let mut game = Game::open(config, storage);

    let run = |game: &mut Game<storage::FileStorage>, command: Command| {
        game.dispatch(command)
            .with_context(|| format!("could not save game to {}", args.state_dir.display()))
    };

    match args.command {
        Cmd::Look => {
            let mut surface = surface::TextSurface::default();
            let mut sync = game::SurfaceSync::new();
            sync.sync(&mut surface, game.state());
            println!(
                "At cell {}, {} caches in view",
                game.state().player_cell(),
                surface.len()
            );
            print!("{}", surface.render());
        }
        Cmd::Status => print_status(game.state()),
        Cmd::Move { direction, count } => {
            for _ in 0..count {
                report(run(&mut game, Command::Move(direction.into()))?);
            }
        }
        Cmd::Pickup { position } => {
            report(run(&mut game, Command::Pickup(position))?);
            print_status(game.state());
        }
        Cmd::Drop { position } => {
            report(run(&mut game, Command::Drop(position))?);
            print_status(game.state());
        }
        Cmd::Locate { lat, lng } => {
            report(run(&mut game, Command::Relocate(game::LatLng::new(lat, lng)))?);
        }
        Cmd::Follow { ref track } => {
            let mut provider = track::TrackFile::load(track)?;
            let feed = game::LocationFeed::new();
            let handle = provider.subscribe(feed.sink());
            provider.replay();
            provider.unsubscribe(handle);
            let outcomes = game
                .drain_locations(&feed)
                .with_context(|| format!("could not save game to {}", args.state_dir.display()))?;
            outcomes.into_iter().for_each(report);
        }
        Cmd::Reset => {
            report(run(&mut game, Command::Reset)?);
        }
    }

    Ok(())
}
