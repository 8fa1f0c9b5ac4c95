//! Game controller
//!
//! Owns the simulation state and the clock, and talks to the outside world only
//! through the injected collaborators. One call to [`GameController::frame`]
//! per display refresh drives everything.

use std::task::{Context, Poll, Waker};

use crate::clock::SimulationClock;
use crate::config::{BlockPalette, GameConfig};
use crate::error::{ConfigError, GameError, LoadError};
use crate::levels::{LevelFuture, LevelLoader};
use crate::sim::{Ball, Block, GameEvent, GameState, Level, Paddle, Rect, TickInput, tick};

/// Commands delivered by the input collaborator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputCommand {
    /// Put the paddle's left edge at this x
    MovePaddleTo(f32),
    /// Release the held ball
    Fire,
}

/// Source of player commands, polled once per frame
pub trait InputSource {
    fn poll(&mut self, commands: &mut Vec<InputCommand>);
}

/// Plays outcome cues; must not block
pub trait AudioSink {
    fn play(&mut self, cue: GameEvent);
}

/// Draws the current state; read-only
pub trait Renderer {
    fn render(&mut self, view: &FrameView<'_>);
}

impl InputSource for () {
    fn poll(&mut self, _commands: &mut Vec<InputCommand>) {}
}

impl AudioSink for () {
    fn play(&mut self, _cue: GameEvent) {}
}

impl Renderer for () {
    fn render(&mut self, _view: &FrameView<'_>) {}
}

/// Everything a renderer may look at
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub arena: &'a Rect,
    pub paddle: &'a Paddle,
    pub balls: &'a [Ball],
    pub blocks: &'a [Block],
    palette: &'a BlockPalette,
}

impl FrameView<'_> {
    /// Fill color of a block, by its remaining durability
    pub fn block_color(&self, block: &Block) -> u32 {
        self.palette.color_for(block.durability).unwrap_or(0xFFFFFF)
    }
}

/// Coarse controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerStatus {
    /// No level has been installed yet
    NotStarted,
    /// Waiting on the level loader; the clock is paused
    Loading,
    Running,
    Paused,
    /// A fatal error was reported; no further frames run
    Halted,
}

struct PendingLoad {
    index: usize,
    future: LevelFuture,
}

/// Runs the game against injected collaborators
pub struct GameController<L, A, R, I> {
    config: GameConfig,
    state: GameState,
    clock: SimulationClock,
    loader: L,
    audio: A,
    renderer: R,
    input: I,
    pending: Option<PendingLoad>,
    /// Commands waiting for the next fixed tick
    queued: TickInput,
    commands: Vec<InputCommand>,
    /// A level has been installed at least once
    started: bool,
    halted: bool,
}

impl<L, A, R, I> GameController<L, A, R, I>
where
    L: LevelLoader,
    A: AudioSink,
    R: Renderer,
    I: InputSource,
{
    pub fn new(
        config: GameConfig,
        loader: L,
        audio: A,
        renderer: R,
        input: I,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            state: GameState::new(&config),
            clock: SimulationClock::new(config.fixed_step, config.max_frame_delta),
            config,
            loader,
            audio,
            renderer,
            input,
            pending: None,
            queued: TickInput::default(),
            commands: Vec::new(),
            started: false,
            halted: false,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct state access for tooling and tests; never call during a frame
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn status(&self) -> ControllerStatus {
        if self.halted {
            ControllerStatus::Halted
        } else if self.pending.is_some() {
            ControllerStatus::Loading
        } else if !self.started {
            ControllerStatus::NotStarted
        } else if self.clock.is_running() {
            ControllerStatus::Running
        } else {
            ControllerStatus::Paused
        }
    }

    /// Begin the run at the first level
    pub fn start(&mut self) -> Result<(), GameError> {
        self.go_to_level(0)
    }

    /// Pause the clock and ask the loader for a level. The level is installed
    /// and the clock resumed by the first frame that finds the load finished.
    /// A load already in flight is discarded.
    pub fn go_to_level(&mut self, index: usize) -> Result<(), GameError> {
        if self.halted {
            return Err(GameError::Halted);
        }
        self.clock.pause();
        let future = self.loader.load(index);
        if let Some(old) = self.pending.replace(PendingLoad { index, future }) {
            log::debug!("Discarded pending load of level {}", old.index);
        }
        log::info!("Loading level {}", index);
        Ok(())
    }

    /// Stop ticking; banked time is kept
    pub fn pause(&mut self) {
        if self.clock.pause() {
            log::info!("Paused");
        }
    }

    /// Resume ticking with an immediate zero-length frame. Does nothing while a
    /// level is loading or before the first level is in.
    pub fn resume(&mut self) -> Result<(), GameError> {
        if self.halted {
            return Err(GameError::Halted);
        }
        if self.pending.is_some() {
            log::debug!("Resume ignored while a level is loading");
            return Ok(());
        }
        if !self.started {
            log::debug!("Resume ignored before the first level");
            return Ok(());
        }
        if self.clock.run() {
            log::info!("Resumed");
            let now = self.clock.last_time().unwrap_or(0.0);
            return self.frame(now);
        }
        Ok(())
    }

    /// Place the paddle's left edge at `x` on the next tick
    pub fn move_paddle_to(&mut self, x: f32) {
        self.queued.paddle_x = Some(x);
    }

    /// Release the held ball on the next tick
    pub fn fire_paddle(&mut self) {
        self.queued.fire = true;
    }

    /// Driving signal: run the fixed ticks owed up to `now` (seconds), then
    /// refresh paddle velocity and render once.
    pub fn frame(&mut self, now: f64) -> Result<(), GameError> {
        if self.halted {
            return Err(GameError::Halted);
        }

        self.poll_input();
        self.poll_pending()?;

        let Some(delta) = self.clock.begin_frame(now) else {
            return Ok(());
        };

        // A level change pauses the clock, which ends this loop
        while let Some(dt) = self.clock.next_step() {
            let input = std::mem::take(&mut self.queued);
            let change = tick(&mut self.state, &input, dt);
            self.flush_events();

            if let Err(violation) = self.state.check_invariants() {
                return Err(self.halt(violation.into()));
            }
            if let Some(change) = change {
                self.go_to_level(change.target())?;
            }
        }

        self.state.paddle.track_velocity(delta);
        let view = FrameView {
            arena: &self.state.level.arena,
            paddle: &self.state.paddle,
            balls: &self.state.balls,
            blocks: &self.state.level.blocks,
            palette: &self.config.palette,
        };
        self.renderer.render(&view);
        Ok(())
    }

    fn poll_input(&mut self) {
        self.input.poll(&mut self.commands);
        for command in self.commands.drain(..) {
            match command {
                InputCommand::MovePaddleTo(x) => self.queued.paddle_x = Some(x),
                InputCommand::Fire => self.queued.fire = true,
            }
        }
    }

    fn poll_pending(&mut self) -> Result<(), GameError> {
        let Some(pending) = self.pending.as_mut() else {
            return Ok(());
        };
        let mut cx = Context::from_waker(Waker::noop());
        let Poll::Ready(result) = pending.future.as_mut().poll(&mut cx) else {
            return Ok(());
        };
        let index = pending.index;
        self.pending = None;

        let level = match result.and_then(|level| self.check_level(level)) {
            Ok(level) => level,
            Err(source) => return Err(self.halt(GameError::Load { index, source })),
        };

        log::info!("Level {} started ({} blocks)", index, level.blocks.len());
        self.state.install_level(index, level);
        self.started = true;
        self.flush_events();
        // Time spent loading is not simulated
        self.clock.restart_timing();
        self.clock.run();
        Ok(())
    }

    /// Every block must start with a durability the palette can color
    fn check_level(&self, level: Level) -> Result<Level, LoadError> {
        let max = self.config.palette.max_durability();
        if let Some(b) = level
            .blocks
            .iter()
            .find(|b| self.config.palette.color_for(b.durability).is_none())
        {
            return Err(LoadError::InvalidDurability {
                durability: b.durability.max(0) as u32,
                max,
            });
        }
        Ok(level)
    }

    fn flush_events(&mut self) {
        for cue in self.state.events.drain(..) {
            self.audio.play(cue);
        }
    }

    fn halt(&mut self, err: GameError) -> GameError {
        log::warn!("Halting: {}", err);
        self.halted = true;
        self.pending = None;
        self.clock.pause();
        err
    }
}
