//! DOM side of the game: the scoreboard, the popup and the buttons.
//!
//! Button clicks are queued as `UiCommand`s on an unbounded channel and the
//! session drains them once per frame, the same way keyboard events reach
//! the engine.

use crate::browser;
use crate::score::{AnimalKind, ScoreTable};
use anyhow::{anyhow, Result};
use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use rand::Rng;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

mod ids {
    pub const SCOREBOARD: &str = "scoreboard";
    pub const POPUP: &str = "popup";
    pub const POPUP_CLOSE: &str = "popupClose";
    pub const INFO_BUTTON: &str = "infoBtn";
    pub const PAUSE_BUTTON: &str = "pauseBtn";
    pub const RESTART_BUTTON: &str = "restartBtn";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiCommand {
    Info,
    Pause,
    Restart,
    ClosePopup,
}

pub const HOW_TO_PLAY: &str = "<b>How to Play</b><br>\
    Use <b>arrow keys</b> to move, <b>space</b> to jump, <b>E</b> to collect animals!<br>\
    Press <b>Pause</b> or <b>Esc</b> to pause.";

pub const JOKES: [&str; 5] = [
    "Why did the cat sit on the computer? To keep an eye on the mouse! 🐭",
    "Keep going! The animals believe in you! 🐾",
    "Why did the bunny cross the road? To say hi to you! 🐰",
    "Don't paws now, you're doing great! 🐶",
    "What do you call a dog magician? A labracadabrador! 🐕",
];

pub fn pause_message(rng: &mut impl Rng) -> String {
    let joke = JOKES[rng.gen_range(0..JOKES.len())];
    format!(
        "<b>Game Paused</b><br>{}<br>\
         <span style='font-size:0.9em;color:#888;'>(Press Space or Esc to resume)</span>",
        joke
    )
}

/// One row per animal kind: color dot, name and count
pub fn scoreboard_html(score: &ScoreTable) -> String {
    AnimalKind::ALL
        .iter()
        .map(|&kind| {
            format!(
                "<div class=\"score-row\"><span style=\"display:inline-block;width:18px;\
                 height:18px;background:{};border-radius:50%;margin-right:6px;\"></span> \
                 <b>{}</b>: {}</div>",
                kind.color(),
                kind.label(),
                score.count(kind)
            )
        })
        .collect()
}

pub fn popup_html(content: &str) -> String {
    format!(
        "<div id=\"popupContent\">{}<br><button id=\"{}\">Close</button></div>",
        content,
        ids::POPUP_CLOSE
    )
}

pub struct Ui {
    scoreboard: Option<Element>,
    popup: Option<HtmlElement>,
    popup_open: bool,
    sender: UnboundedSender<UiCommand>,
    commands: UnboundedReceiver<UiCommand>,
    // the close button is recreated with every popup, so its handler is too
    close_handler: Option<browser::IntervalClosure>,
}

impl Ui {
    /// Look up the page elements and wire the buttons
    ///
    /// Anything missing is logged and skipped, the game runs without it.
    pub fn new() -> Self {
        let (sender, commands) = unbounded();
        let scoreboard = browser::element(ids::SCOREBOARD)
            .map_err(|err| log::warn!("Scoreboard disabled: {:#}", err))
            .ok();
        let popup = browser::html_element(ids::POPUP)
            .map_err(|err| log::warn!("Popup disabled: {:#}", err))
            .ok();
        for (id, command) in [
            (ids::INFO_BUTTON, UiCommand::Info),
            (ids::PAUSE_BUTTON, UiCommand::Pause),
            (ids::RESTART_BUTTON, UiCommand::Restart),
        ] {
            match on_click(id, sender.clone(), command) {
                // buttons live as long as the page
                Ok(handler) => handler.forget(),
                Err(err) => log::warn!("Button {} disabled: {:#}", id, err),
            }
        }
        Ui {
            scoreboard,
            popup,
            popup_open: false,
            sender,
            commands,
            close_handler: None,
        }
    }

    /// Everything clicked since the last call, oldest first
    pub fn poll_commands(&mut self) -> Vec<UiCommand> {
        let mut commands = Vec::new();
        while let Ok(Some(command)) = self.commands.try_next() {
            commands.push(command);
        }
        commands
    }

    pub fn render_scoreboard(&self, score: &ScoreTable) {
        if let Some(scoreboard) = &self.scoreboard {
            scoreboard.set_inner_html(&scoreboard_html(score));
        }
    }

    pub fn show_popup(&mut self, content: &str) {
        let Some(popup) = &self.popup else { return };
        popup.set_inner_html(&popup_html(content));
        if let Err(err) = set_display(popup, "flex") {
            log::warn!("Could not show popup: {:#}", err);
            return;
        }
        self.popup_open = true;
        match on_click(ids::POPUP_CLOSE, self.sender.clone(), UiCommand::ClosePopup) {
            Ok(handler) => self.close_handler = Some(handler),
            Err(err) => log::warn!("Popup close button disabled: {:#}", err),
        }
    }

    pub fn hide_popup(&mut self) {
        if let Some(popup) = &self.popup {
            if let Err(err) = set_display(popup, "none") {
                log::warn!("Could not hide popup: {:#}", err);
            }
        }
        self.popup_open = false;
        self.close_handler = None;
    }

    pub fn is_popup_open(&self) -> bool {
        self.popup_open
    }
}

fn set_display(element: &HtmlElement, value: &str) -> Result<()> {
    element
        .style()
        .set_property("display", value)
        .map_err(|err| anyhow!("Cannot set display to {} : {:#?}", value, err))
}

fn on_click(
    id: &str,
    sender: UnboundedSender<UiCommand>,
    command: UiCommand,
) -> Result<browser::IntervalClosure> {
    let button = browser::html_element(id)?;
    let handler = browser::closure_wrap(Box::new(move || {
        let _ = sender.unbounded_send(command);
    }) as Box<dyn FnMut()>);
    button.set_onclick(Some(handler.as_ref().unchecked_ref()));
    Ok(handler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn scoreboard_lists_every_kind() {
        let mut score = ScoreTable::new();
        score.record(AnimalKind::Owl);
        score.record(AnimalKind::Owl);
        let html = scoreboard_html(&score);
        assert_eq!(html.matches("score-row").count(), AnimalKind::ALL.len());
        assert!(html.contains("<b>Owl</b>: 2"));
        assert!(html.contains("<b>Cat</b>: 0"));
        assert!(html.contains(AnimalKind::Bee.color()));
    }

    #[test]
    fn popup_always_has_a_close_button() {
        let html = popup_html(HOW_TO_PLAY);
        assert!(html.contains("id=\"popupClose\""));
        assert!(html.contains("How to Play"));
    }

    #[test]
    fn pause_message_tells_a_joke() {
        let mut rng = Pcg32::seed_from_u64(1);
        let message = pause_message(&mut rng);
        assert!(message.starts_with("<b>Game Paused</b>"));
        assert!(JOKES.iter().any(|joke| message.contains(joke)));
    }
}
