//! Tank Maze entry point
//!
//! Headless attract-mode runner: enters a name, lets the autopilot play until
//! the game ends (or a tick limit is hit), then prints the leaderboard.

use std::process::ExitCode;

use tank_maze::persistence::JsonFileStore;
use tank_maze::sim::{GameEvent, Key, TickInput};
use tank_maze::{Game, Settings};

const SETTINGS_PATH: &str = "settings.json";
const PLAYER_NAME: &str = "DEMO";
/// Ten minutes of play at the default rate
const MAX_TICKS: u64 = 60 * 60 * 10;

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Tank Maze (headless) starting...");

    let settings = Settings::load_or_default(SETTINGS_PATH);
    let store = JsonFileStore::new(&settings.leaderboard_path);
    let mut game = match Game::new(&settings, store) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Invalid level data: {}", e);
            return ExitCode::FAILURE;
        }
    };

    game.update(&TickInput::typed(PLAYER_NAME));
    game.update(&TickInput::press(&[Key::Enter]));

    let autopilot = TickInput {
        autopilot: true,
        ..Default::default()
    };
    let mut ticks = 0;
    while game.view().is_none() && ticks < MAX_TICKS {
        for event in game.update(&autopilot) {
            match event {
                GameEvent::LevelEntered(level) => println!("Level {}", level.index() + 1),
                GameEvent::GameWon { score } => println!("Won with {}", score),
                GameEvent::GameLost { score } => println!("Lost with {}", score),
                _ => {}
            }
        }
        ticks += 1;
    }

    let Some(rows) = game.view() else {
        let session = game.session();
        println!(
            "Stopped after {} ticks: score {}, lives {}",
            ticks,
            session.score,
            session.lives_remaining()
        );
        return ExitCode::SUCCESS;
    };

    println!("\n  #  NAME              SCORE");
    for row in rows {
        println!("{:>3}  {:<16} {:>6}", row.rank, row.name, row.score);
    }
    if let Some(rank) = game.best_rank() {
        println!("\n{} best rank: {}", PLAYER_NAME, rank);
    }
    ExitCode::SUCCESS
}
