//! Neon Arcade entry point
//!
//! Headless shell for the simulation cores: picks a game, wires a
//! scripted input source and the loop scheduler to a clock, prints HUD
//! lines where a canvas would paint, and restarts once on game over.

use std::time::{SystemTime, UNIX_EPOCH};

use neon_arcade::HighScores;
use neon_arcade::input::{Command, Direction, InputState};
use neon_arcade::scheduler::LoopScheduler;
use neon_arcade::sim::{ArenaMode, ArenaSession, GridConfig, GridSession, SessionEvent};

/// Frames the demo drives before giving up on a run
const MAX_DEMO_FRAMES: u32 = 20_000;

fn main() {
    env_logger::init();

    let game = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "snake".to_string());
    log::info!("Neon Arcade (headless) starting: {game}");

    match game.as_str() {
        "snake" => run_snake(),
        "asteroids" => run_arena(ArenaMode::Asteroids),
        "zombie" => run_arena(ArenaMode::ZombieRush),
        other => log::error!("unknown game '{other}' (try snake, asteroids, zombie)"),
    }
}

fn now_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(1)
}

fn report(events: Vec<SessionEvent>, scores: &mut HighScores) -> bool {
    let mut over = false;
    for event in events {
        match event {
            SessionEvent::Started => println!("-- game on --"),
            SessionEvent::Restarted => println!("-- restart --"),
            SessionEvent::LevelUp { level } => println!("-- level {level} --"),
            SessionEvent::GameOver { score, level } => {
                println!("-- game over: score {score}, level {level} --");
                if let Some(rank) = scores.add_score(score, level, now_seed() as f64) {
                    println!("   high score rank #{rank}");
                }
                over = true;
            }
        }
    }
    over
}

fn run_snake() {
    let mut session = GridSession::new(GridConfig::default());
    let mut scheduler = LoopScheduler::interval(session.interval_ms());
    let mut input = InputState::new();
    let mut scores = HighScores::new();
    let mut restarts = 0;

    if session.start(now_seed()).is_err() {
        return;
    }
    let _ = scheduler.start();

    let mut now_ms = 0.0;
    for frame in 0..MAX_DEMO_FRAMES {
        now_ms += 16.0;
        scheduler.advance(now_ms, |_| session.step(&mut input));
        // Level-ups shrink the step interval; rearm the scheduler
        scheduler.set_period(session.interval_ms());

        // Scripted pilot: chase the food
        let snapshot = session.snapshot();
        if let (Some(head), Some(food)) = (snapshot.snake.first(), snapshot.food) {
            let dir = if food.cell.x != head.x {
                if food.cell.x > head.x { Direction::Right } else { Direction::Left }
            } else if food.cell.y > head.y {
                Direction::Down
            } else {
                Direction::Up
            };
            input.apply(Command::Direction(dir));
        }

        if frame % 60 == 0 {
            let hud = session.hud();
            println!("score {:>5}  level {:>2}", hud.score, hud.level);
        }

        if report(session.take_events(), &mut scores) {
            scheduler.stop();
            if restarts >= 1 {
                break;
            }
            restarts += 1;
            if session.restart(now_seed()).is_err() {
                break;
            }
            let _ = scheduler.start();
        }
    }
    scheduler.stop();

    if let Some(top) = scores.top_score() {
        println!("best run: {top}");
    }
}

fn run_arena(mode: ArenaMode) {
    let mut session = ArenaSession::new(mode);
    let mut scheduler = LoopScheduler::per_frame();
    let mut input = InputState::new();
    let mut scores = HighScores::new();
    let mut restarts = 0;

    if session.start(now_seed()).is_err() {
        return;
    }
    let _ = scheduler.start();

    let mut now_ms = 0.0;
    for frame in 0..MAX_DEMO_FRAMES {
        now_ms += 16.0;

        // Scripted pilot: hold fire, sweep rotation / strafe in bursts
        input.fire = true;
        match mode {
            ArenaMode::Asteroids => {
                input.thrust = frame % 120 < 30;
                input.rotate_left = frame % 90 < 45;
                input.rotate_right = !input.rotate_left;
            }
            ArenaMode::ZombieRush => {
                input.move_left = frame % 180 < 90;
                input.move_right = !input.move_left;
                input.move_up = frame % 240 < 120;
                if session.hud().ammo == Some(0) {
                    input.apply(Command::Reload);
                }
            }
        }

        scheduler.advance(now_ms, |dt| session.tick(&input, dt));
        input.clear_one_shot();

        if frame % 60 == 0 {
            let hud = session.hud();
            match hud.ammo {
                Some(ammo) => println!(
                    "score {:>5}  wave {:>2}  health {:>3}  ammo {:>2}",
                    hud.score, hud.level, hud.lives, ammo
                ),
                None => println!(
                    "score {:>5}  wave {:>2}  lives {}",
                    hud.score, hud.level, hud.lives
                ),
            }
        }

        if report(session.take_events(), &mut scores) {
            scheduler.stop();
            if restarts >= 1 {
                break;
            }
            restarts += 1;
            if session.restart(now_seed()).is_err() {
                break;
            }
            let _ = scheduler.start();
        }
    }
    scheduler.stop();

    if let Some(top) = scores.top_score() {
        println!("best run: {top}");
    }
}
