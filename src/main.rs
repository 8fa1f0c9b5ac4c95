//! Arkanoid headless demo
//!
//! Runs the built-in campaign at a simulated 60 Hz with an autopilot on the
//! paddle. Pass a JSON config path as the first argument to override the
//! defaults. Set `RUST_LOG=debug` to see every cue.

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::cell::Cell;
    use std::rc::Rc;

    use arkanoid::sim::{BallState, Bounds, GameEvent};
    use arkanoid::{
        AudioSink, BuiltinLevels, FrameView, GameConfig, GameController, GameError, InputCommand,
        InputSource, LoadError, Renderer,
    };

    /// Simulated display refresh
    const FRAME_DT: f64 = 1.0 / 60.0;
    /// Simulated seconds to run before giving up
    const RUN_SECONDS: f64 = 600.0;
    /// Frames between summary lines
    const SUMMARY_EVERY: u64 = 600;

    /// What the autopilot last saw of the board
    #[derive(Debug, Default, Clone, Copy)]
    struct Sighting {
        target_x: Option<f32>,
        held: bool,
    }

    /// Follows the lowest free ball, fires whenever a ball is held
    struct Autopilot {
        seen: Rc<Cell<Sighting>>,
        paddle_width: f32,
    }

    impl InputSource for Autopilot {
        fn poll(&mut self, commands: &mut Vec<InputCommand>) {
            let seen = self.seen.get();
            if let Some(x) = seen.target_x {
                commands.push(InputCommand::MovePaddleTo(x - self.paddle_width / 2.0));
            }
            if seen.held {
                commands.push(InputCommand::Fire);
            }
        }
    }

    #[derive(Default)]
    struct LogAudio {
        blocks_hit: u64,
        balls_lost: u64,
    }

    impl AudioSink for LogAudio {
        fn play(&mut self, cue: GameEvent) {
            match cue {
                GameEvent::BlockBounce => self.blocks_hit += 1,
                GameEvent::BallLost => self.balls_lost += 1,
                _ => {}
            }
            log::debug!("cue: {}", cue.name());
        }
    }

    /// Logs a board summary now and then and feeds the autopilot
    struct SummaryRenderer {
        seen: Rc<Cell<Sighting>>,
        frames: u64,
    }

    impl Renderer for SummaryRenderer {
        fn render(&mut self, view: &FrameView<'_>) {
            let lowest = view
                .balls
                .iter()
                .filter(|b| b.state == BallState::Free)
                .max_by(|a, b| a.bottom().total_cmp(&b.bottom()));
            self.seen.set(Sighting {
                target_x: lowest.map(|b| b.center().x),
                held: view.balls.iter().any(|b| b.state == BallState::Held),
            });

            self.frames += 1;
            if self.frames % SUMMARY_EVERY == 0 {
                let durability: i32 = view.blocks.iter().map(|b| b.durability).sum();
                log::info!(
                    "frame {}: {} blocks ({} hits left), {} balls, {} retries",
                    self.frames,
                    view.blocks.len(),
                    durability,
                    view.balls.len(),
                    view.paddle.retries
                );
            }
        }
    }

    fn load_config() -> Result<GameConfig, arkanoid::ConfigError> {
        match std::env::args().nth(1) {
            Some(path) => GameConfig::load(path),
            None => Ok(GameConfig::default()),
        }
    }

    pub fn run() -> Result<(), Box<dyn std::error::Error>> {
        let config = load_config()?;
        let seen = Rc::new(Cell::new(Sighting::default()));
        let loader = BuiltinLevels::new(config.arena_size);
        log::info!("{} built-in levels", loader.count());

        let autopilot = Autopilot {
            seen: seen.clone(),
            paddle_width: config.paddle_size.x,
        };
        let renderer = SummaryRenderer { seen, frames: 0 };
        let mut game =
            GameController::new(config, loader, LogAudio::default(), renderer, autopilot)?;
        game.start()?;

        let mut now = 0.0;
        let mut last_level = None;
        while now < RUN_SECONDS {
            match game.frame(now) {
                Ok(()) => {}
                Err(GameError::Load {
                    source: LoadError::NotFound(index),
                    ..
                }) => {
                    log::info!("No level {}, campaign complete", index);
                    break;
                }
                Err(e) => return Err(e.into()),
            }

            let level = game.state().level_index;
            if last_level != Some(level) {
                log::info!("Playing level {}", level);
                last_level = Some(level);
            }
            now += FRAME_DT;
        }

        let audio = game.audio();
        log::info!(
            "Stopped after {:.1}s on level {}: {} block hits, {} balls lost",
            now,
            game.state().level_index,
            audio.blocks_hit,
            audio.balls_lost
        );
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Arkanoid (headless) starting...");

    if let Err(e) = demo::run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser front end; the library is driven by the host page
}
