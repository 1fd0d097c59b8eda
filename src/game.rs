use crate::audio::{AudioManager, SoundEffect};
use crate::collectible::{Animal, Lifecycle};
use crate::controls::{Action, EdgeDetector};
use crate::engine::{Game, KeyState, Point, Rect, Renderer};
use crate::events::GameEvent;
use crate::tuning::Tuning;
use crate::ui::{self, Ui, UiCommand};
use crate::world::World;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use once_cell::unsync::OnceCell;
use rand::SeedableRng;
use rand_pcg::Pcg32;

/// TABLE
/// ┌──────────────────────── Frame Overview ─────────────────────────────────┐
/// │                                                                         │
/// │   engine::GameLoop                 game::Session          world::World  │
/// │   ┌──────────────┐  update(keys)  ┌──────────────┐ tick  ┌───────────┐  │
/// │   │ raf, 60 Hz   ├───────────────►│ ui commands  ├──────►│ simulate  │  │
/// │   │ accumulator  │                │ pause / edge │       │ EventQueue│  │
/// │   └──────────────┘                └──────┬───────┘       └─────┬─────┘  │
/// │   ┌──────────────┐  fixed_update         │   drain events      │        │
/// │   │ setInterval  ├──────────────► particles ◄──────────────────┘        │
/// │   └──────────────┘                       ▼                              │
/// │                                  AudioManager + Ui scoreboard           │
/// └─────────────────────────────────────────────────────────────────────────┘
pub enum CuteCritters {
    /// Waiting on the tuning file
    Loading,
    Loaded(Session),
}

impl CuteCritters {
    pub fn new() -> Self {
        CuteCritters::Loading
    }
}

impl Default for CuteCritters {
    fn default() -> Self {
        CuteCritters::new()
    }
}

#[async_trait(?Send)]
impl Game for CuteCritters {
    async fn initialize(&self) -> Result<Box<dyn Game>> {
        match self {
            CuteCritters::Loading => {
                let tuning = Tuning::load().await;
                let seed = random_seed()?;
                log::info!("Starting world with seed {}", seed);
                let session = Session::new(World::new(tuning, seed), Ui::new(), seed);
                Ok(Box::new(CuteCritters::Loaded(session)))
            }
            CuteCritters::Loaded(_) => Err(anyhow!("Game is already initialized")),
        }
    }

    fn update(&mut self, keystate: &KeyState) {
        if let CuteCritters::Loaded(session) = self {
            session.update(keystate);
        }
    }

    fn draw(&self, renderer: &Renderer) {
        if let CuteCritters::Loaded(session) = self {
            session.draw(renderer);
        }
    }

    fn fixed_interval_ms(&self) -> Option<i32> {
        match self {
            CuteCritters::Loaded(session) => Some(session.world.tuning().particle_interval_ms),
            CuteCritters::Loading => None,
        }
    }

    fn fixed_update(&mut self) {
        if let CuteCritters::Loaded(session) = self {
            session.fixed_update();
        }
    }
}

fn random_seed() -> Result<u64> {
    let mut bytes = [0u8; 8];
    getrandom::getrandom(&mut bytes).map_err(|err| anyhow!("Could not seed the world : {}", err))?;
    Ok(u64::from_le_bytes(bytes))
}

/// What this frame's keys mean for the pause state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PauseInput {
    /// close any popup, resume if paused
    Dismiss,
    Pause,
    Nothing,
}

fn pause_input(edges: &EdgeDetector<Action>, popup_open: bool, paused: bool) -> PauseInput {
    let escape = edges.just_pressed(Action::Pause);
    if (popup_open || paused) && (escape || edges.just_pressed(Action::Jump)) {
        PauseInput::Dismiss
    } else if !paused && escape {
        PauseInput::Pause
    } else {
        PauseInput::Nothing
    }
}

/// A running game: the world plus everything around it in the page
pub struct Session {
    world: World,
    ui: Ui,
    // browsers refuse audio before the first gesture
    audio: OnceCell<AudioManager>,
    keys: EdgeDetector<Action>,
    paused: bool,
    // jokes only, the world keeps its own generator
    rng: Pcg32,
}

impl Session {
    pub fn new(world: World, ui: Ui, seed: u64) -> Self {
        ui.render_scoreboard(world.score());
        Session {
            world,
            ui,
            audio: OnceCell::new(),
            keys: EdgeDetector::new(),
            paused: false,
            rng: Pcg32::seed_from_u64(seed.wrapping_add(1)),
        }
    }

    fn update(&mut self, keystate: &KeyState) {
        if keystate.any_pressed() {
            self.init_audio();
        }
        for command in self.ui.poll_commands() {
            self.init_audio();
            self.handle_command(command);
        }

        self.keys.update(Action::held(keystate));
        match pause_input(&self.keys, self.ui.is_popup_open(), self.paused) {
            PauseInput::Dismiss => {
                self.close_popup();
                self.resume();
            }
            PauseInput::Pause => self.pause(),
            PauseInput::Nothing => {}
        }

        if !self.paused {
            self.world.tick(keystate);
        }
        self.forward_events();
    }

    fn fixed_update(&mut self) {
        if !self.paused || self.world.tuning().particles_while_paused {
            self.world.particle_tick();
        }
    }

    fn handle_command(&mut self, command: UiCommand) {
        match command {
            UiCommand::Info => {
                self.play(SoundEffect::InfoButton);
                self.ui.show_popup(ui::HOW_TO_PLAY);
            }
            UiCommand::Pause => {
                self.play(SoundEffect::PauseButton);
                self.pause();
            }
            UiCommand::Restart => {
                self.play(SoundEffect::RestartButton);
                log::info!("Restarting");
                self.world.reset();
                self.ui.render_scoreboard(self.world.score());
            }
            UiCommand::ClosePopup => {
                self.close_popup();
                self.resume();
            }
        }
    }

    fn pause(&mut self) {
        if !self.paused {
            log::info!("Paused");
        }
        self.paused = true;
        let message = ui::pause_message(&mut self.rng);
        self.ui.show_popup(&message);
    }

    fn resume(&mut self) {
        if self.paused {
            log::info!("Resumed");
            self.paused = false;
        }
    }

    fn close_popup(&mut self) {
        self.play(SoundEffect::PopupClose);
        self.ui.hide_popup();
    }

    fn init_audio(&self) {
        self.audio.get_or_init(AudioManager::new);
    }

    fn play(&self, effect: SoundEffect) {
        if let Some(audio) = self.audio.get() {
            audio.play(effect);
        }
    }

    fn forward_events(&mut self) {
        let events: Vec<GameEvent> = self.world.drain_events().collect();
        let mut score_changed = false;
        for event in &events {
            if let Some(audio) = self.audio.get() {
                audio.play_for_event(event);
            }
            score_changed |= matches!(event, GameEvent::Scored { .. } | GameEvent::WorldReset);
        }
        if score_changed {
            self.ui.render_scoreboard(self.world.score());
        }
    }

    fn draw(&self, renderer: &Renderer) {
        renderer.clear(&Rect::new_from_x_y(0.0, 0.0, view::WIDTH, view::HEIGHT));
        let camera_x = self.world.camera_x();
        let ground_y = self.world.tuning().body.ground_y;

        for segment in self.world.terrain().segments() {
            renderer.fill_rect(
                &Rect::new_from_x_y(segment.start - camera_x, ground_y, segment.length, view::GROUND_HEIGHT),
                colors::GROUND,
            );
        }
        for platform in self.world.terrain().platforms() {
            let rect = platform.bounding_box().translated(-camera_x, 0.0);
            renderer.fill_rect(&rect, colors::PLATFORM);
            renderer.stroke_rect(&rect, colors::PLATFORM_EDGE, 2.0);
        }
        for animal in self.world.animals() {
            let x = animal.position().x - camera_x;
            if animal.is_visible() && x > -view::CULL_MARGIN && x < view::WIDTH + view::CULL_MARGIN {
                self.draw_animal(renderer, animal, camera_x);
            }
        }
        for particle in self.world.particles().particles() {
            renderer.with_style(particle.opacity, None, |renderer| {
                renderer.fill_circle(
                    Point::new(particle.position.x - camera_x, particle.position.y),
                    6.0,
                    &particle.color,
                );
            });
        }
        self.draw_body(renderer, camera_x);
    }

    fn draw_animal(&self, renderer: &Renderer, animal: &Animal, camera_x: f32) {
        let rect = animal.bounding_box().translated(-camera_x, 0.0);
        let radius = rect.size.width / 2.0;
        let center = Point::new(rect.x() + radius, rect.y() + radius);
        let color = animal.kind().color();

        if animal.is_shiny() {
            let pulse = self.world.ticks() as f32 * 0.15;
            let blur = 18.0 + 8.0 * pulse.sin();
            renderer.with_style(1.0, Some((colors::SHINE, blur)), |renderer| {
                renderer.fill_circle(center, radius, color);
                renderer.stroke_circle(center, radius, colors::SHINE, 4.0);
            });
        } else {
            renderer.fill_circle(center, radius, color);
        }
        renderer.fill_text(
            animal.kind().label(),
            Point::new(center.x, center.y + 6.0),
            fonts::LABEL,
            colors::LABEL,
        );

        if let Lifecycle::Interacting { .. } = animal.lifecycle() {
            let bubble = Rect::new_from_x_y(center.x - 55.0, rect.y() - 46.0, 110.0, 36.0);
            renderer.with_style(0.95, None, |renderer| {
                renderer.rounded_rect(&bubble, 12.0, colors::BUBBLE, colors::PLATFORM_EDGE);
            });
            let text = if animal.is_shiny() {
                "NOM NOM NOM".to_string()
            } else {
                format!("You found a {}!", animal.kind().label())
            };
            renderer.fill_text(
                &text,
                Point::new(center.x, bubble.y() + 24.0),
                fonts::BUBBLE,
                colors::BUBBLE_TEXT,
            );
        }
    }

    fn draw_body(&self, renderer: &Renderer, camera_x: f32) {
        let body = self.world.body().bounding_box().translated(-camera_x, 0.0);
        renderer.fill_rect(&body, colors::BODY);
        // eyes
        for offset in [10.0, 22.0] {
            renderer.fill_rect(
                &Rect::new_from_x_y(body.x() + offset, body.y() + 10.0, 8.0, 8.0),
                colors::LABEL,
            );
        }
    }
}

mod view {
    pub const WIDTH: f32 = 800.0;
    pub const HEIGHT: f32 = 600.0;
    pub const GROUND_HEIGHT: f32 = 40.0;
    pub const CULL_MARGIN: f32 = 50.0;
}

mod colors {
    pub const GROUND: &str = "#81c784";
    pub const PLATFORM: &str = "#ffe082";
    pub const PLATFORM_EDGE: &str = "#ffd166";
    pub const BODY: &str = "#ffb6b9";
    pub const LABEL: &str = "#fff";
    pub const SHINE: &str = "#fffde4";
    pub const BUBBLE: &str = "#fffbe7";
    pub const BUBBLE_TEXT: &str = "#ff8c42";
}

mod fonts {
    pub const LABEL: &str = "16px Comic Sans MS";
    pub const BUBBLE: &str = "bold 16px Comic Sans MS";
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edges_after(frames: &[&[&str]]) -> EdgeDetector<Action> {
        let mut edges = EdgeDetector::new();
        for codes in frames {
            let keys: KeyState = codes.iter().copied().collect();
            edges.update(Action::held(&keys));
        }
        edges
    }

    #[test]
    fn escape_pauses_a_running_game() {
        let edges = edges_after(&[&[], &["Escape"]]);
        assert_eq!(pause_input(&edges, false, false), PauseInput::Pause);
    }

    #[test]
    fn space_or_escape_dismisses_an_open_popup() {
        let escape = edges_after(&[&[], &["Escape"]]);
        assert_eq!(pause_input(&escape, true, true), PauseInput::Dismiss);
        let space = edges_after(&[&[], &["Space"]]);
        assert_eq!(pause_input(&space, true, false), PauseInput::Dismiss);
    }

    #[test]
    fn held_escape_does_not_toggle_again() {
        let edges = edges_after(&[&["Escape"], &["Escape"]]);
        assert_eq!(pause_input(&edges, true, true), PauseInput::Nothing);
        assert_eq!(pause_input(&edges, false, false), PauseInput::Nothing);
    }

    #[test]
    fn paused_without_popup_can_still_resume() {
        let edges = edges_after(&[&[], &["Escape"]]);
        assert_eq!(pause_input(&edges, false, true), PauseInput::Dismiss);
    }

    #[test]
    fn space_without_popup_is_just_a_jump() {
        let edges = edges_after(&[&[], &["Space"]]);
        assert_eq!(pause_input(&edges, false, false), PauseInput::Nothing);
    }
}
