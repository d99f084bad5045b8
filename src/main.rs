use clap::Parser;
use log::{LevelFilter, error, info, warn};
use macroquad::prelude::*;
use skyrunner::config::{self, FlightParams, GameConfig, WorldLayout};
use skyrunner::error::GameError;
use skyrunner::game::Game;
use skyrunner::logging;

// --- Command Line Arguments ---
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seed for world generation; random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Grid rows
    #[arg(long, default_value_t = config::GRID_ROWS)]
    rows: u32,

    /// Grid columns
    #[arg(long, default_value_t = config::GRID_COLS)]
    cols: u32,

    /// World units between grid cells
    #[arg(long, default_value_t = config::CELL_SPACING)]
    spacing: f32,

    /// Half-width of the empty square around the spawn point
    #[arg(long, default_value_t = config::SAFE_ZONE_HALF_WIDTH)]
    safe_radius: f32,

    /// Chance that a grid cell holds a tree
    #[arg(long, default_value_t = config::TREE_PROBABILITY)]
    tree_probability: f64,

    /// Chance that a tree-free cell holds a coin
    #[arg(long, default_value_t = config::COIN_PROBABILITY)]
    coin_probability: f64,

    /// Debug filter to specify log topics (e.g., "world,collision")
    /// Available topics: world, flight, collision, radar, session
    #[arg(long)]
    debug_filter: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn game_config(&self) -> GameConfig {
        let layout = WorldLayout {
            rows: self.rows,
            cols: self.cols,
            spacing: self.spacing,
            safe_radius: self.safe_radius,
            tree_probability: self.tree_probability,
            coin_probability: self.coin_probability,
        };
        GameConfig::new(layout, FlightParams::default(), self.seed)
    }
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Sky Runner".to_owned(),
        window_width: config::WINDOW_WIDTH,
        window_height: config::WINDOW_HEIGHT,
        window_resizable: false,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let args = Args::parse();

    let (log_level, level_error) = match logging::parse_level(&args.log_level) {
        Ok(level) => (level, None),
        Err(e) => (LevelFilter::Info, Some(e)),
    };
    if let Err(e) = logging::init_logger(log_level, args.debug_filter.clone()).map_err(GameError::from) {
        eprintln!("Warning: {}", e);
    }
    if let Some(e) = level_error {
        warn!("{}, falling back to info", e);
    }

    info!("Initializing Sky Runner...");
    let config = args.game_config();
    match config.seed {
        Some(seed) => info!("World seed: {}", seed),
        None => info!("World seed: random"),
    }

    let mut game = match Game::new(config) {
        Ok(game) => game,
        Err(e) => {
            error!("Failed to start: {}", e);
            std::process::exit(1);
        }
    };

    game.run().await;
}
