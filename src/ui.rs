use ratatui::layout::{Constraint, Flex, Layout, Position, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use ratatui::Frame;

use stopwatch_core::{format_lap_time, Field, LapId, RunState, View};

use crate::theme::{Palette, Theme};

const TITLE: &str = "⏱ Stopwatch";
const HINT: &str = "Press Space to Start / Pause";
const NOTE_PLACEHOLDER: &str = "note";
const NOTE_WIDTH: u16 = 17;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Button {
    Toggle,
    Lap,
    Reset,
    Theme,
}

#[derive(Clone, Debug)]
pub struct RowHitbox {
    pub id: LapId,
    pub row: Rect,
    pub note: Rect,
}

/// Clickable regions from the last frame.
#[derive(Clone, Debug, Default)]
pub struct Hitboxes {
    pub buttons: Vec<(Button, Rect)>,
    pub rows: Vec<RowHitbox>,
}

impl Hitboxes {
    pub fn button_at(&self, column: u16, row: u16) -> Option<Button> {
        let pos = Position::new(column, row);
        self.buttons
            .iter()
            .find(|(_, rect)| rect.contains(pos))
            .map(|(button, _)| *button)
    }

    pub fn row_at(&self, column: u16, row: u16) -> Option<&RowHitbox> {
        let pos = Position::new(column, row);
        self.rows.iter().find(|hit| hit.row.contains(pos))
    }
}

pub fn draw_stopwatch(
    frame: &mut Frame,
    view: &View,
    theme: Theme,
    focus: Option<&LapId>,
) -> Hitboxes {
    let palette = theme.palette();
    let area = frame.area();
    frame.render_widget(Block::new().style(palette.base), area);

    let [header, _, readout, _, controls, _, laps, hint] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    let mut hits = Hitboxes::default();

    let [title, theme_button] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(8)]).areas(header);
    frame.render_widget(Paragraph::new(TITLE).style(palette.base), title);
    draw_button(frame, theme_button, theme.switch_label(), palette.secondary);
    hits.buttons.push((Button::Theme, theme_button));

    frame.render_widget(
        Paragraph::new(readout_line(view, &palette)).centered(),
        readout,
    );

    let toggle_label = match view.run_state {
        RunState::Running => "Pause",
        RunState::Stopped => "Start",
    };
    let [toggle, _, lap, _, reset] = Layout::horizontal([
        Constraint::Length(9),
        Constraint::Length(1),
        Constraint::Length(7),
        Constraint::Length(1),
        Constraint::Length(9),
    ])
    .flex(Flex::Center)
    .areas(controls);
    draw_button(frame, toggle, toggle_label, palette.button);
    draw_button(frame, lap, "Lap", palette.secondary);
    draw_button(frame, reset, "Reset", palette.secondary);
    hits.buttons.push((Button::Toggle, toggle));
    hits.buttons.push((Button::Lap, lap));
    hits.buttons.push((Button::Reset, reset));

    let total = view.laps.len();
    for (i, lap) in view.laps.iter().enumerate() {
        let y = laps.y + i as u16;
        if y >= laps.bottom() {
            break;
        }
        let row = Rect::new(laps.x, y, laps.width, 1);
        let [index_area, time_area, note_area] = Layout::horizontal([
            Constraint::Length(5),
            Constraint::Length(12),
            Constraint::Length(NOTE_WIDTH),
        ])
        .areas(row);

        frame.render_widget(
            Paragraph::new(format!("{:>3}", total - i)).style(palette.dim),
            index_area,
        );
        frame.render_widget(
            Paragraph::new(format_lap_time(lap.time_ms())).style(palette.base),
            time_area,
        );

        let focused = focus == Some(lap.id());
        let (text, style) = if lap.note.is_empty() && !focused {
            (NOTE_PLACEHOLDER, palette.dim)
        } else if focused {
            (lap.note.as_str(), palette.focused)
        } else {
            (lap.note.as_str(), palette.base)
        };
        frame.render_widget(Paragraph::new(text).style(style), note_area);
        if focused {
            let offset = (lap.note.chars().count() as u16).min(note_area.width.saturating_sub(1));
            frame.set_cursor_position(Position::new(note_area.x + offset, note_area.y));
        }

        hits.rows.push(RowHitbox {
            id: lap.id().clone(),
            row,
            note: note_area,
        });
    }

    frame.render_widget(Paragraph::new(HINT).style(palette.dim).centered(), hint);

    hits
}

fn readout_line<'a>(view: &View<'a>, palette: &Palette) -> Line<'a> {
    let field = |f: Field| {
        let style = if view.glow.get(f) { palette.glow } else { palette.base };
        Span::styled(view.display.get(f), style)
    };
    Line::from(vec![
        field(Field::Hours),
        Span::styled(":", palette.base),
        field(Field::Minutes),
        Span::styled(":", palette.base),
        field(Field::Seconds),
        Span::styled(".", palette.base),
        field(Field::Centis),
    ])
}

fn draw_button(frame: &mut Frame, area: Rect, label: &str, style: Style) {
    frame.render_widget(Paragraph::new(label).style(style).centered(), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use stopwatch_core::{
        Intent, ManualTicker, ManualTime, SequentialIds, Stopwatch,
    };

    type TestWatch = Stopwatch<ManualTime, ManualTicker, SequentialIds>;

    fn render(sw: &TestWatch, focus: Option<&LapId>) -> (Vec<String>, Hitboxes) {
        let mut terminal = Terminal::new(TestBackend::new(48, 14)).unwrap();
        let mut hits = Hitboxes::default();
        terminal
            .draw(|frame| hits = draw_stopwatch(frame, &sw.view(), Theme::Light, focus))
            .unwrap();
        let buffer = terminal.backend().buffer();
        let lines = (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect();
        (lines, hits)
    }

    fn running_watch() -> (TestWatch, ManualTime) {
        let time = ManualTime::new(0);
        let mut sw = Stopwatch::new(time.clone(), ManualTicker::new(), SequentialIds::default());
        sw.dispatch(Intent::Toggle);
        (sw, time)
    }

    #[test]
    fn test_readout_and_controls() {
        let (mut sw, time) = running_watch();
        time.advance(65_432);
        sw.tick();
        let (lines, hits) = render(&sw, None);
        assert!(lines[2].contains("00:01:05.43"));
        assert!(lines[4].contains("Pause"));
        assert!(lines[13].contains(HINT));

        let (toggle, rect) = hits.buttons[1];
        assert_eq!(toggle, Button::Toggle);
        assert_eq!(hits.button_at(rect.x, rect.y), Some(Button::Toggle));
        assert_eq!(hits.button_at(0, 10), None);
    }

    #[test]
    fn test_lap_rows() {
        let (mut sw, time) = running_watch();
        time.advance(1000);
        sw.tick();
        sw.dispatch(Intent::RecordLap);
        time.advance(1500);
        sw.tick();
        sw.dispatch(Intent::RecordLap);
        let newest = sw.laps().laps()[0].id().clone();
        sw.dispatch(Intent::EditNote {
            id: newest.clone(),
            text: "split".into(),
        });

        let (lines, hits) = render(&sw, None);
        assert!(lines[6].contains("2"));
        assert!(lines[6].contains("00:02.50"));
        assert!(lines[6].contains("split"));
        assert!(lines[7].contains("00:01.00"));
        assert!(lines[7].contains(NOTE_PLACEHOLDER));

        assert_eq!(hits.rows.len(), 2);
        assert_eq!(hits.row_at(0, 6).map(|r| &r.id), Some(&newest));
        assert_eq!(hits.row_at(0, 9).map(|r| &r.id), None);
    }

    #[test]
    fn test_focused_empty_note_hides_placeholder() {
        let (mut sw, time) = running_watch();
        time.advance(100);
        sw.tick();
        sw.dispatch(Intent::RecordLap);
        let id = sw.laps().laps()[0].id().clone();
        let (lines, _) = render(&sw, Some(&id));
        assert!(!lines[6].contains(NOTE_PLACEHOLDER));
    }

    #[test]
    fn test_rows_clipped_to_area() {
        let (mut sw, time) = running_watch();
        for _ in 0..20 {
            time.advance(100);
            sw.tick();
            sw.dispatch(Intent::RecordLap);
        }
        let (_, hits) = render(&sw, None);
        // 14 rows minus header, readout, controls, spacers and hint.
        assert_eq!(hits.rows.len(), 7);
    }
}
