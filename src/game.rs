use crate::config::{GameConfig, MAX_FRAME_TIME};
use crate::error::GameError;
use crate::input::{InputSource, KeyboardInput};
use crate::radar::DrawCommand;
use crate::render::Renderer;
use crate::session::{SessionState, TickReport};
use crate::types::GameEvent;
use log::info;
use macroquad::prelude::{get_frame_time, next_frame};

/// Drives a `SessionState` at a fixed tick rate and hands the results to the renderer.
pub struct Game<I: InputSource = KeyboardInput> {
    pub session: SessionState,
    pub renderer: Renderer,
    input: I,
    time_accumulator: f32,
    tick_duration: f32,
    radar_frame: Vec<DrawCommand>,
}

impl Game<KeyboardInput> {
    /// Create a game reading the live keyboard
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        Self::with_input(config, KeyboardInput)
    }
}

impl<I: InputSource> Game<I> {
    pub fn with_input(config: GameConfig, input: I) -> Result<Self, GameError> {
        let mut renderer = Renderer::new();
        let session = SessionState::new(config, &mut renderer)?;
        let tick_duration = session.config().tick_duration();
        info!(
            "Game created: {} renderables, tick {:.4}s",
            renderer.renderable_count(),
            tick_duration
        );

        renderer.set_level(session.level());
        renderer.set_coin_count(session.coin_count());
        let radar_frame = session.project_radar();

        Ok(Game {
            session,
            renderer,
            input,
            time_accumulator: 0.0,
            tick_duration,
            radar_frame,
        })
    }

    pub fn radar_frame(&self) -> &[DrawCommand] {
        &self.radar_frame
    }

    /// Run the main game loop until the window is closed
    pub async fn run(&mut self) {
        info!("Starting main loop...");

        while !Renderer::window_should_close() {
            let frame_time = get_frame_time();
            self.advance(frame_time);

            self.renderer
                .draw_frame(self.session.airplane(), &self.radar_frame);
            next_frame().await;
        }

        info!(
            "Exiting at level {} with {} coins after {} ticks.",
            self.session.level(),
            self.session.coin_count(),
            self.session.tick_count()
        );
    }

    /// Feeds real frame time into the accumulator and runs every whole tick it covers.
    /// Returns the number of ticks run.
    pub fn advance(&mut self, frame_time: f32) -> u32 {
        // Clamp long stalls (window drag, breakpoint) so the simulation doesn't spiral
        self.time_accumulator += frame_time.min(MAX_FRAME_TIME);

        let mut ticks = 0;
        while self.time_accumulator >= self.tick_duration {
            self.time_accumulator -= self.tick_duration;
            let report = self
                .session
                .tick(&self.input, self.tick_duration, &mut self.renderer);
            self.handle_report(report);
            ticks += 1;
        }

        self.renderer.update_notices(frame_time);
        ticks
    }

    fn handle_report(&mut self, report: TickReport) {
        for event in &report.events {
            match event {
                GameEvent::Crashed { .. } | GameEvent::LevelCleared { .. } => {
                    info!("{}", event.message())
                }
                GameEvent::CoinCollected { .. } => {}
            }
            self.renderer.notify(event);
        }
        self.radar_frame = report.radar;
    }
}
