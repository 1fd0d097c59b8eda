use crate::browser;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use futures::channel::mpsc::{unbounded, UnboundedReceiver};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, KeyboardEvent};

pub use self::input::KeyState;

#[async_trait(?Send)]
pub trait Game {
    async fn initialize(&self) -> Result<Box<dyn Game>>;
    fn update(&mut self, keystate: &KeyState);
    fn draw(&self, renderer: &Renderer);

    /// Period of the independent fixed-rate task, `None` to skip it
    fn fixed_interval_ms(&self) -> Option<i32> {
        None
    }

    /// Runs on the fixed-rate task, decoupled from the render loop
    fn fixed_update(&mut self) {}
}

// length of a frame in milliseconds
const FRAME_SIZE: f32 = 1.0 / 60.0 * 1000.0;
// catch-up cap after a hitch (tab switch, debugger pause)
const MAX_STEPS_PER_FRAME: u32 = 8;

pub struct GameLoop {
    last_frame: f64,
    accumulated_delta: f32,
}

type SharedLoopClosure = Rc<RefCell<Option<browser::LoopClosure>>>;
// ELI5: web assembly is single threaded, so both scheduled tasks share the
// game through Rc<RefCell<..>> and only one of them holds the borrow at a time
type SharedGame = Rc<RefCell<Box<dyn Game>>>;

impl GameLoop {
    pub async fn start(game: impl Game + 'static) -> Result<()> {
        let mut keyevent_receiver = prepare_input()?;
        let game: SharedGame = Rc::new(RefCell::new(game.initialize().await?));
        let mut game_loop = GameLoop {
            last_frame: browser::now()?,
            accumulated_delta: 0.0,
        };
        let renderer = Renderer {
            context: browser::context()?,
        };
        let mut keystate = KeyState::new();

        Self::start_fixed_task(&game)?;

        let f: SharedLoopClosure = Rc::new(RefCell::new(None));
        let g = f.clone();
        let frame_game = game.clone();
        *g.borrow_mut() = Some(browser::create_raf_closure(move |perf: f64| {
            process_input(&mut keystate, &mut keyevent_receiver);
            game_loop.accumulated_delta += (perf - game_loop.last_frame) as f32;
            game_loop.last_frame = perf;

            if let Ok(mut game) = frame_game.try_borrow_mut() {
                let mut steps = 0;
                while game_loop.accumulated_delta > FRAME_SIZE && steps < MAX_STEPS_PER_FRAME {
                    game.update(&keystate);
                    game_loop.accumulated_delta -= FRAME_SIZE;
                    steps += 1;
                }
                if steps == MAX_STEPS_PER_FRAME {
                    game_loop.accumulated_delta = 0.0;
                }
                game.draw(&renderer);
            }

            if let Some(closure) = f.borrow().as_ref() {
                let _ = browser::request_animation_frame(closure);
            }
        }));

        browser::request_animation_frame(
            g.borrow()
                .as_ref()
                .ok_or_else(|| anyhow!("GameLoop: Loop is None"))?,
        )?;

        Ok(())
    }

    fn start_fixed_task(game: &SharedGame) -> Result<()> {
        let Some(millis) = game.borrow().fixed_interval_ms() else {
            return Ok(());
        };
        let task_game = game.clone();
        let closure: browser::IntervalClosure = browser::closure_wrap(Box::new(move || {
            // a busy cell means the frame callback owns the game right now,
            // skip this turn rather than block
            if let Ok(mut game) = task_game.try_borrow_mut() {
                game.fixed_update();
            }
        }) as Box<dyn FnMut()>);
        browser::set_interval(&closure, millis)?;
        // the task lives as long as the page
        closure.forget();
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Point { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Size { width, height }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub position: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(position: Point, size: Size) -> Self {
        Rect { position, size }
    }

    pub const fn new_from_x_y(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect::new(Point::new(x, y), Size::new(width, height))
    }

    pub fn x(&self) -> f32 {
        self.position.x
    }

    pub fn y(&self) -> f32 {
        self.position.y
    }

    pub fn right(&self) -> f32 {
        self.position.x + self.size.width
    }

    pub fn bottom(&self) -> f32 {
        self.position.y + self.size.height
    }

    /// Strict overlap on the x axis, touching edges don't count
    pub fn overlaps_horizontally(&self, other: &Rect) -> bool {
        self.right() > other.x() && self.x() < other.right()
    }

    pub fn translated(&self, dx: f32, dy: f32) -> Rect {
        Rect::new_from_x_y(self.x() + dx, self.y() + dy, self.size.width, self.size.height)
    }
}

pub struct Renderer {
    context: CanvasRenderingContext2d,
}

impl Renderer {
    pub fn clear(&self, rect: &Rect) {
        self.context.clear_rect(
            rect.x().into(),
            rect.y().into(),
            rect.size.width.into(),
            rect.size.height.into(),
        );
    }

    pub fn fill_rect(&self, rect: &Rect, color: &str) {
        self.context.set_fill_style_str(color);
        self.context.fill_rect(
            rect.x().into(),
            rect.y().into(),
            rect.size.width.into(),
            rect.size.height.into(),
        );
    }

    pub fn stroke_rect(&self, rect: &Rect, color: &str, line_width: f32) {
        self.context.set_stroke_style_str(color);
        self.context.set_line_width(line_width.into());
        self.context.stroke_rect(
            rect.x().into(),
            rect.y().into(),
            rect.size.width.into(),
            rect.size.height.into(),
        );
    }

    pub fn fill_circle(&self, center: Point, radius: f32, color: &str) {
        self.context.set_fill_style_str(color);
        self.circle_path(center, radius);
        self.context.fill();
    }

    pub fn stroke_circle(&self, center: Point, radius: f32, color: &str, line_width: f32) {
        self.context.set_stroke_style_str(color);
        self.context.set_line_width(line_width.into());
        self.circle_path(center, radius);
        self.context.stroke();
    }

    fn circle_path(&self, center: Point, radius: f32) {
        self.context.begin_path();
        self.context
            .arc(
                center.x.into(),
                center.y.into(),
                radius.into(),
                0.0,
                std::f64::consts::TAU,
            )
            .ok();
    }

    /// Filled and outlined box with rounded corners (speech bubbles)
    pub fn rounded_rect(&self, rect: &Rect, radius: f32, fill: &str, stroke: &str) {
        let (left, top) = (f64::from(rect.x()), f64::from(rect.y()));
        let (right, bottom) = (f64::from(rect.right()), f64::from(rect.bottom()));
        let radius = f64::from(radius);

        self.context.begin_path();
        self.context.move_to(left + radius, top);
        self.context.arc_to(right, top, right, bottom, radius).ok();
        self.context.arc_to(right, bottom, left, bottom, radius).ok();
        self.context.arc_to(left, bottom, left, top, radius).ok();
        self.context.arc_to(left, top, right, top, radius).ok();
        self.context.close_path();

        self.context.set_fill_style_str(fill);
        self.context.fill();
        self.context.set_stroke_style_str(stroke);
        self.context.set_line_width(2.0);
        self.context.stroke();
    }

    /// Centered text, baseline at `position.y`
    pub fn fill_text(&self, text: &str, position: Point, font: &str, color: &str) {
        self.context.set_fill_style_str(color);
        self.context.set_font(font);
        self.context.set_text_align("center");
        self.context
            .fill_text(text, position.x.into(), position.y.into())
            .ok();
    }

    /// Draw with a temporary global alpha / glow, restored afterwards
    pub fn with_style(&self, alpha: f32, glow: Option<(&str, f32)>, draw: impl FnOnce(&Renderer)) {
        self.context.save();
        self.context.set_global_alpha(alpha.into());
        if let Some((color, blur)) = glow {
            self.context.set_shadow_color(color);
            self.context.set_shadow_blur(blur.into());
        }
        draw(self);
        self.context.restore();
    }
}

enum KeyPress {
    KeyUp(KeyboardEvent),
    KeyDown(KeyboardEvent),
}

// keys whose browser default (scrolling) is suppressed
const CAPTURED_KEYS: [&str; 5] = ["ArrowLeft", "ArrowRight", "ArrowUp", "ArrowDown", "Space"];

fn prepare_input() -> Result<UnboundedReceiver<KeyPress>> {
    let (keydown_sender, keyevent_receiver) = unbounded();
    let keyup_sender = keydown_sender.clone();

    let onkeydown = browser::closure_wrap(Box::new(move |keycode: KeyboardEvent| {
        if CAPTURED_KEYS.contains(&keycode.code().as_str()) {
            keycode.prevent_default();
        }
        let _ = keydown_sender.unbounded_send(KeyPress::KeyDown(keycode));
    }) as Box<dyn FnMut(KeyboardEvent)>);

    let onkeyup = browser::closure_wrap(Box::new(move |keycode: KeyboardEvent| {
        let _ = keyup_sender.unbounded_send(KeyPress::KeyUp(keycode));
    }) as Box<dyn FnMut(KeyboardEvent)>);

    let window = browser::window()?;
    window.set_onkeydown(Some(onkeydown.as_ref().unchecked_ref()));
    window.set_onkeyup(Some(onkeyup.as_ref().unchecked_ref()));
    onkeydown.forget();
    onkeyup.forget();

    Ok(keyevent_receiver)
}

fn process_input(state: &mut KeyState, keyevent_receiver: &mut UnboundedReceiver<KeyPress>) {
    // drain everything queued since the last frame
    while let Ok(Some(evt)) = keyevent_receiver.try_next() {
        match evt {
            KeyPress::KeyUp(evt) => state.set_released(&evt.code()),
            KeyPress::KeyDown(evt) => state.set_pressed(&evt.code()),
        }
    }
}

/// Snapshot of held keys, keyed by `KeyboardEvent.code`
///
/// Absent keys read as released, so a dropped or malformed event can
/// only ever look like "no input".
pub mod input {
    use std::collections::HashSet;

    #[derive(Debug, Default, Clone)]
    pub struct KeyState {
        pressed_keys: HashSet<String>,
    }

    impl KeyState {
        pub fn new() -> Self {
            KeyState {
                pressed_keys: HashSet::new(),
            }
        }

        pub fn is_pressed(&self, code: &str) -> bool {
            self.pressed_keys.contains(code)
        }

        pub fn any_pressed(&self) -> bool {
            !self.pressed_keys.is_empty()
        }

        pub fn set_pressed(&mut self, code: &str) {
            self.pressed_keys.insert(code.to_owned());
        }

        pub fn set_released(&mut self, code: &str) {
            self.pressed_keys.remove(code);
        }
    }

    impl<'a> FromIterator<&'a str> for KeyState {
        fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
            KeyState {
                pressed_keys: iter.into_iter().map(str::to_owned).collect(),
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn released_key_is_forgotten() {
            let mut keys = KeyState::new();
            keys.set_pressed("KeyE");
            assert!(keys.is_pressed("KeyE"));
            keys.set_released("KeyE");
            assert!(!keys.is_pressed("KeyE"));
            assert!(!keys.any_pressed());
        }

        #[test]
        fn unknown_key_reads_released() {
            let keys: KeyState = ["ArrowLeft"].into_iter().collect();
            assert!(!keys.is_pressed("Unidentified"));
            assert!(keys.is_pressed("ArrowLeft"));
        }
    }
}
