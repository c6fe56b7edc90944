use std::io;
use std::sync::mpsc::Sender;
use std::thread::{self, JoinHandle};

use ratatui::crossterm::event::{
    self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use ratatui::crossterm::execute;
use ratatui::DefaultTerminal;
use stopwatch_core::Key;

use crate::AppOp;

/// Enters raw mode on the alternate screen and subscribes to mouse and
/// focus-change reporting.
pub fn init() -> io::Result<DefaultTerminal> {
    let terminal = ratatui::try_init()?;
    if let Err(e) = execute!(io::stdout(), EnableMouseCapture, EnableFocusChange) {
        ratatui::restore();
        return Err(e);
    }
    Ok(terminal)
}

pub fn restore() {
    if let Err(e) = execute!(io::stdout(), DisableFocusChange, DisableMouseCapture) {
        log::error!("can't disable terminal reporting: {}", e);
    }
    ratatui::restore();
}

/// Forwards terminal events to the main loop until it goes away.
pub fn spawn_event_reader(main: Sender<AppOp>) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("term-events".into())
        .spawn(move || loop {
            match event::read() {
                Ok(ev) => {
                    if main.send(AppOp::Terminal(ev)).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    log::error!("terminal read failed: {}", e);
                    main.send(AppOp::Quit).ok();
                    break;
                }
            }
        })
}

pub fn is_interrupt(key: &KeyEvent) -> bool {
    key.kind == KeyEventKind::Press
        && key.modifiers.contains(KeyModifiers::CONTROL)
        && key.code == KeyCode::Char('c')
}

pub fn translate_key(key: &KeyEvent) -> Option<Key> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }
    match key.code {
        KeyCode::Char(' ') => Some(Key::Space),
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Esc => Some(Key::Escape),
        KeyCode::Tab => Some(Key::Tab),
        KeyCode::Backspace => Some(Key::Backspace),
        _ => None,
    }
}
