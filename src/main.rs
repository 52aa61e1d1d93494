//! Click-a-Dot console host
//!
//! Stands in for a windowed front end: reads one command per line from stdin
//! and forwards it to the engine.
//!
//! ```text
//! click-a-dot [settings.json]
//! ```

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use click_a_dot::persistence::append_score;
use click_a_dot::{
    ClickOutcome, EngineConfig, GameEngine, HighScores, MissPolicy, Settings, SharedSurface,
};

const HELP: &str = "\
commands:
  start              start the game
  stop               stop the game (cannot be restarted)
  click X Y          click at surface coordinates
  hit                click the center of the current target
  radius N           target radius for the next spawn (1-50)
  time MS            target lifetime for the next spawn (250-2000)
  policy NAME        miss policy: ignore | penalize
  resize W H         resize the playing surface
  show               print the current target and score
  save PATH          append the score to PATH
  best PATH          print the best scores stored in PATH
  quit               stop and exit";

fn main() {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings_path = std::env::args().nth(1).map(PathBuf::from);
    let settings = match &settings_path {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };

    let surface = Arc::new(SharedSurface::new(
        settings.surface_width,
        settings.surface_height,
    ));
    let engine = GameEngine::new(surface.clone(), EngineConfig::from(&settings));
    engine.add_score_listener(|score: u64| println!("Score: {score}"));

    println!("Click-a-Dot ({}x{})", settings.surface_width, settings.surface_height);
    println!("{HELP}");
    println!("Score: {}", engine.score());

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                log::error!("stdin closed: {err}");
                break;
            }
        };
        let words: Vec<&str> = line.split_whitespace().collect();
        match words.as_slice() {
            [] => {}
            ["quit" | "exit"] => break,
            ["start"] => engine.start_game(),
            ["stop"] => engine.stop_game(),
            ["click", x, y] => match (x.parse::<f32>(), y.parse::<f32>()) {
                (Ok(x), Ok(y)) => report_click(engine.register_click(x, y)),
                _ => println!("click needs two numbers"),
            },
            ["hit"] => match engine.current_target() {
                Some(target) => {
                    report_click(engine.register_click(target.center.x, target.center.y))
                }
                None => println!("no target on screen"),
            },
            ["radius", n] => match n.parse::<u32>() {
                Ok(n) => {
                    engine.set_target_radius(n);
                    println!("radius {}", engine.target_radius());
                }
                Err(_) => println!("radius needs a number"),
            },
            ["time", ms] => match ms.parse::<u32>() {
                Ok(ms) => {
                    engine.set_target_time_millis(ms);
                    println!("time {} ms", engine.target_time_millis());
                }
                Err(_) => println!("time needs a number"),
            },
            ["policy", name] => match MissPolicy::from_str(name) {
                Some(policy) => {
                    engine.set_miss_policy(policy);
                    println!("miss policy {}", policy.as_str());
                }
                None => println!("unknown policy {name:?}"),
            },
            ["resize", w, h] => match (w.parse::<u32>(), h.parse::<u32>()) {
                (Ok(w), Ok(h)) => {
                    surface.resize(w, h);
                    if engine.surface_resized() {
                        println!("target moved");
                    }
                }
                _ => println!("resize needs two numbers"),
            },
            ["show"] => {
                match engine.current_target() {
                    Some(t) => println!(
                        "target #{} at ({:.1}, {:.1}) r={} age {} ms",
                        t.generation,
                        t.center.x,
                        t.center.y,
                        t.radius,
                        t.created_at.elapsed().as_millis()
                    ),
                    None => println!("no target ({:?})", engine.phase()),
                }
                println!("Score: {}", engine.score());
            }
            ["save", path] => save_score(Path::new(path), engine.score()),
            ["best", path] => show_best(Path::new(path)),
            ["help"] => println!("{HELP}"),
            _ => println!("unknown command, try `help`"),
        }
        let _ = io::stdout().flush();
    }

    engine.stop_game();
    if let Some(path) = settings_path {
        let mut settings = settings;
        settings.target_radius = engine.target_radius();
        settings.target_time_millis = engine.target_time_millis();
        settings.miss_policy = engine.config().miss_policy;
        if let Err(err) = settings.save(&path) {
            log::warn!("Could not save settings: {err}");
        }
    }
}

fn report_click(outcome: ClickOutcome) {
    match outcome {
        ClickOutcome::Hit { .. } => {}
        ClickOutcome::Miss => println!("miss"),
        ClickOutcome::Ignored => println!("game is not running"),
    }
}

/// Failures are shown to the player; the game keeps going
fn save_score(path: &Path, score: u64) {
    match append_score(path, score) {
        Ok(()) => println!("saved score {score} to {}", path.display()),
        Err(err) => println!("could not save score: {err}"),
    }
}

fn show_best(path: &Path) {
    match HighScores::load(path) {
        Ok(scores) if scores.is_empty() => println!("no scores yet"),
        Ok(scores) => {
            for (rank, score) in scores.entries.iter().enumerate() {
                println!("{:>2}. {score}", rank + 1);
            }
        }
        Err(err) => println!("could not read scores: {err}"),
    }
}
