use std::thread;
use std::time::{Duration, Instant};

use crate::api::error::{AssetError, ConfigError, EngineError};
use crate::api::game::{EngineContext, Gameplay};
use crate::assets::level::LevelDescription;
use crate::assets::loader::ImageLoader;
use crate::behavior::BehaviorTable;
use crate::core::game_loop::{GameLoop, LoopTick};
use crate::core::registry::{AssetStatus, EntityRegistry};
use crate::input::queue::{InputEvent, InputQueue};
use crate::renderer::surface::Surface;
use crate::systems::animation::tick_animations;
use crate::systems::movement;
use crate::systems::render::Blitter;
use crate::systems::trigger;

/// Drives a game: owns the context, both loop timers and the blitter.
///
/// Time comes from the host through [`Engine::advance`], or from the wall
/// clock when using the blocking [`Engine::run`].
pub struct Engine<G: Gameplay> {
    game: G,
    ctx: EngineContext,
    input: InputQueue,
    game_loop: GameLoop,
    blitter: Blitter,
    clock_ms: u64,
    started: bool,
}

impl<G: Gameplay> Engine<G> {
    pub fn new(game: G, ctx: EngineContext) -> Self {
        let config = &ctx.config;
        let game_loop = GameLoop::new(config.display_speed_ms, config.game_speed_ms, config.max_catch_up);
        let blitter = Blitter::new(config, ctx.registry.viewport.dimension);
        Self {
            game,
            ctx,
            input: InputQueue::new(),
            game_loop,
            blitter,
            clock_ms: 0,
            started: false,
        }
    }

    /// Build an engine for `level`. Images start loading through `loader`.
    pub fn from_level(
        game: G,
        behaviors: BehaviorTable,
        level: &LevelDescription,
        loader: &dyn ImageLoader,
    ) -> Result<Self, ConfigError> {
        let registry = EntityRegistry::from_level(level, loader)?;
        let ctx = EngineContext::new(level.config(), registry, behaviors);
        Ok(Self::new(game, ctx))
    }

    pub fn from_json(
        game: G,
        behaviors: BehaviorTable,
        json: &str,
        loader: &dyn ImageLoader,
    ) -> Result<Self, ConfigError> {
        Self::from_level(game, behaviors, &LevelDescription::from_json(json)?, loader)
    }

    pub fn context(&self) -> &EngineContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut EngineContext {
        &mut self.ctx
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    /// Engine clock in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.clock_ms
    }

    pub fn asset_status(&self) -> AssetStatus {
        self.ctx.registry.asset_status()
    }

    /// Block until every tile and prototype image is ready.
    ///
    /// Fails as soon as one image fails, or once `timeout` has passed.
    pub fn wait_for_assets(&self, timeout: Option<Duration>) -> Result<(), AssetError> {
        let began = Instant::now();
        let poll = Duration::from_millis(self.ctx.config.asset_poll_ms.max(1));
        loop {
            match self.asset_status() {
                AssetStatus::Ready => return Ok(()),
                AssetStatus::Failed { name, reason } => return Err(AssetError::Failed { name, reason }),
                AssetStatus::Loading { pending } => {
                    if let Some(limit) = timeout {
                        let waited = began.elapsed();
                        if waited >= limit {
                            return Err(AssetError::Timeout { waited, pending });
                        }
                    }
                    log::debug!("waiting for {pending} image(s)");
                    thread::sleep(poll);
                }
            }
        }
    }

    /// Start both loops. The first start also runs gameplay init and fires
    /// the start triggers; later starts only resume the loops.
    pub fn start(&mut self) -> Result<(), EngineError> {
        match self.asset_status() {
            AssetStatus::Ready => {}
            AssetStatus::Loading { pending } => return Err(AssetError::NotReady { pending }.into()),
            AssetStatus::Failed { name, reason } => return Err(AssetError::Failed { name, reason }.into()),
        }

        if !self.started {
            self.started = true;
            self.game.init(&mut self.ctx);
            let ctx = &mut self.ctx;
            ctx.hooks.viewport = ctx.registry.viewport;
            trigger::fire_start_triggers(&mut ctx.registry, &ctx.behaviors, &mut ctx.hooks);
            ctx.process_trigger_requests();
            self.deliver_sounds();
            log::info!("game started with {} sprite(s)", self.ctx.registry.sprite_count());
        }
        self.game_loop.start(self.clock_ms);
        Ok(())
    }

    /// Cancel both loops. Safe to call repeatedly.
    pub fn stop(&mut self) {
        if self.game_loop.is_running() {
            log::info!("game stopped at {} ms", self.clock_ms);
        }
        self.game_loop.stop();
    }

    pub fn is_running(&self) -> bool {
        self.game_loop.is_running()
    }

    /// Change both cadences. A running game restarts its loops.
    pub fn set_speed(&mut self, display_ms: u64, game_ms: u64) -> Result<(), EngineError> {
        if display_ms == 0 {
            return Err(EngineError::ZeroSpeed("display_speed"));
        }
        if game_ms == 0 {
            return Err(EngineError::ZeroSpeed("game_speed"));
        }
        self.ctx.config.display_speed_ms = display_ms;
        self.ctx.config.game_speed_ms = game_ms;
        self.game_loop.set_speed(display_ms, game_ms, self.clock_ms);
        Ok(())
    }

    /// Stop and discard all level content.
    pub fn quit(&mut self) {
        self.stop();
        self.ctx.registry.clear();
        self.input.drain();
        self.input.release_all();
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Move the clock forward and run every tick that falls due, in order.
    pub fn advance(&mut self, elapsed_ms: u64, surface: &mut dyn Surface) {
        self.clock_ms += elapsed_ms;
        while let Some(tick) = self.game_loop.next_tick(self.clock_ms) {
            match tick {
                LoopTick::Simulation => self.simulation_tick(),
                LoopTick::Render => self.render_tick(surface),
            }
            if self.ctx.take_stop_request() {
                self.stop();
                break;
            }
        }
    }

    /// Run on the wall clock until the game is stopped.
    pub fn run(&mut self, surface: &mut dyn Surface) {
        let origin = Instant::now();
        let base = self.clock_ms;
        while self.is_running() {
            let Some(due) = self.game_loop.next_due() else {
                break;
            };
            let now = base + origin.elapsed().as_millis() as u64;
            if due > now {
                thread::sleep(Duration::from_millis(due - now));
            }
            let now = base + origin.elapsed().as_millis() as u64;
            self.advance(now.saturating_sub(self.clock_ms), surface);
        }
    }

    fn simulation_tick(&mut self) {
        movement::simulate(&mut self.ctx);
        let ctx = &mut self.ctx;
        trigger::check_coordinate_triggers(&mut ctx.registry, &ctx.behaviors, &mut ctx.hooks);
        ctx.process_trigger_requests();
        self.game.update(&mut self.ctx, &self.input);
        self.input.drain();
        self.deliver_sounds();
    }

    fn render_tick(&mut self, surface: &mut dyn Surface) {
        let dt = self.game_loop.display_ms().min(u32::MAX as u64) as u32;
        for id in tick_animations(&mut self.ctx.registry, dt) {
            self.game.animation_cycled(&mut self.ctx, id);
        }
        self.blitter.draw(&self.ctx.registry, surface);
        self.game.display(&self.ctx, surface);
        self.deliver_sounds();
    }

    fn deliver_sounds(&mut self) {
        let sounds = self.ctx.hooks.take_sounds();
        if !self.ctx.config.audio {
            return;
        }
        for event in sounds {
            match self.ctx.registry.sound(event.0) {
                Some(sound) => self.game.play_sound(sound),
                None => log::warn!("sound {} is not declared", event.0),
            }
        }
    }
}
