use ratatui::backend::Backend;
use ratatui::crossterm::event::{Event, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Terminal;

use stopwatch_core::{
    route, FocusCategory, IdSource, Intent, Key, KeyAction, LapId, Stopwatch, SwipeTracker,
    Ticker, TimeSource,
};

use crate::config::GestureConfig;
use crate::error::AppError;
use crate::terminal;
use crate::theme::Theme;
use crate::ui::{self, Button, Hitboxes};

/// Terminal front end around a [`Stopwatch`]: owns keyboard focus, the
/// theme, swipe tracking and the hitboxes from the last frame.
pub struct StopwatchApp<B: Backend, S: TimeSource, T: Ticker, I: IdSource> {
    terminal: Terminal<B>,
    pub stopwatch: Stopwatch<S, T, I>,
    theme: Theme,
    /// Lap whose note field has keyboard focus.
    focus: Option<LapId>,
    swipe: SwipeTracker<LapId>,
    cell_width_px: i32,
    hitboxes: Hitboxes,
    allow_redraw: bool,
    quit: bool,
}

impl<B: Backend, S: TimeSource, T: Ticker, I: IdSource> StopwatchApp<B, S, T, I> {
    pub fn new(
        terminal: Terminal<B>,
        stopwatch: Stopwatch<S, T, I>,
        theme: Theme,
        gesture: &GestureConfig,
    ) -> Self {
        Self {
            terminal,
            stopwatch,
            theme,
            focus: None,
            swipe: SwipeTracker::new(gesture.swipe_threshold_px),
            cell_width_px: gesture.cell_width_px,
            hitboxes: Hitboxes::default(),
            allow_redraw: true,
            quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn focus(&self) -> Option<&LapId> {
        self.focus.as_ref()
    }

    pub fn redraw(&mut self) -> Result<(), AppError> {
        if let Some(id) = self.stopwatch.take_pending_focus() {
            self.focus = Some(id);
        }
        if let Some(id) = &self.focus {
            if !self.stopwatch.laps().contains(id) {
                self.focus = None;
            }
        }
        if !self.allow_redraw {
            return Ok(());
        }

        let view = self.stopwatch.view();
        let theme = self.theme;
        let focus = self.focus.as_ref();
        let mut hits = Hitboxes::default();
        self.terminal
            .draw(|frame| hits = ui::draw_stopwatch(frame, &view, theme, focus))?;
        self.hitboxes = hits;
        Ok(())
    }

    pub fn handle_event(&mut self, event: Event) -> Result<(), AppError> {
        match event {
            Event::Key(key) => {
                if terminal::is_interrupt(&key) {
                    self.quit = true;
                    return Ok(());
                }
                if let Some(key) = terminal::translate_key(&key) {
                    self.handle_key(key);
                }
            }
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::FocusGained => self.handle_visibility(true),
            Event::FocusLost => self.handle_visibility(false),
            _ => {}
        }
        self.redraw()
    }

    /// One firing of the periodic trigger.
    pub fn handle_pump(&mut self) -> Result<(), AppError> {
        if self.stopwatch.tick() {
            self.redraw()?;
        }
        Ok(())
    }

    pub fn handle_glow(&mut self) -> Result<(), AppError> {
        if self.stopwatch.expire_glow() {
            self.redraw()?;
        }
        Ok(())
    }

    pub fn next_glow_deadline(&self) -> Option<u64> {
        self.stopwatch.next_glow_deadline()
    }

    fn focus_category(&self) -> FocusCategory {
        match self.focus {
            Some(_) => FocusCategory::TextInput,
            None => FocusCategory::Other,
        }
    }

    pub fn handle_key(&mut self, key: Key) {
        match route(key, self.focus_category()) {
            KeyAction::Dispatch(intent) => self.stopwatch.dispatch(intent),
            KeyAction::Blur => self.focus = None,
            KeyAction::PassThrough => self.edit_focused(key),
            KeyAction::FocusNextNote => self.focus_next_note(),
            KeyAction::ToggleTheme => self.toggle_theme(),
            KeyAction::Quit => self.quit = true,
            KeyAction::Ignore => {}
        }
    }

    fn edit_focused(&mut self, key: Key) {
        match key {
            Key::Char(c) => self.type_text(&c.to_string()),
            Key::Space => self.type_text(" "),
            Key::Backspace => {
                if let Some((id, mut note)) = self.focused_note() {
                    note.pop();
                    self.stopwatch.dispatch(Intent::EditNote { id, text: note });
                }
            }
            _ => {}
        }
    }

    fn type_text(&mut self, text: &str) {
        if let Some((id, mut note)) = self.focused_note() {
            note.push_str(text);
            self.stopwatch.dispatch(Intent::EditNote { id, text: note });
        }
    }

    fn focused_note(&self) -> Option<(LapId, String)> {
        let id = self.focus.as_ref()?;
        let lap = self.stopwatch.laps().get(id)?;
        Some((id.clone(), lap.note.clone()))
    }

    fn focus_next_note(&mut self) {
        let laps = self.stopwatch.laps().laps();
        let next = match &self.focus {
            Some(id) => laps
                .iter()
                .position(|lap| lap.id() == id)
                .and_then(|i| laps.get(i + 1)),
            None => laps.first(),
        };
        self.focus = next.map(|lap| lap.id().clone());
    }

    fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        log::debug!("theme: {:?}", self.theme);
    }

    fn handle_visibility(&mut self, visible: bool) {
        self.stopwatch.set_visible(visible);
        self.allow_redraw = visible;
    }

    fn press_button(&mut self, button: Button) {
        match button {
            Button::Toggle => self.stopwatch.dispatch(Intent::Toggle),
            Button::Lap => self.stopwatch.dispatch(Intent::RecordLap),
            Button::Reset => self.stopwatch.dispatch(Intent::Reset),
            Button::Theme => self.toggle_theme(),
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        let x_px = i32::from(mouse.column) * self.cell_width_px;
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                // Pressing anywhere else takes focus away from a note field.
                self.focus = None;
                if let Some(button) = self.hitboxes.button_at(mouse.column, mouse.row) {
                    self.press_button(button);
                    return;
                }
                if let Some(hit) = self.hitboxes.row_at(mouse.column, mouse.row) {
                    let id = hit.id.clone();
                    if hit.note.contains((mouse.column, mouse.row).into()) {
                        self.focus = Some(id.clone());
                    }
                    self.swipe.touch_start(id, x_px);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => self.swipe.touch_move(x_px),
            MouseEventKind::Up(MouseButton::Left) => {
                if let Some(id) = self.swipe.touch_end() {
                    log::debug!("swipe deleted lap {}", id);
                    self.stopwatch.dispatch(Intent::DeleteLap(id));
                }
            }
            _ => {}
        }
    }
}
