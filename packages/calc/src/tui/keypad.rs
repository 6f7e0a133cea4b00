use calc_core::{KEYPAD, Key, Snapshot, format_number};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Padding, Paragraph},
};

const KEYPAD_WIDTH: u16 = 32;
const KEYPAD_HEIGHT: u16 = 19;
const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// A clickable key and where it was drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Button {
    pub area: Rect,
    pub key: Key,
}

/// Screen geometry shared by drawing and mouse hit-testing.
#[derive(Debug, Clone, Default)]
pub struct KeypadLayout {
    pub display: Rect,
    pub buttons: Vec<Button>,
    pub footer: Rect,
}

impl KeypadLayout {
    pub fn new(area: Rect) -> Self {
        let area = Rect {
            width: area.width.min(KEYPAD_WIDTH),
            height: area.height.min(KEYPAD_HEIGHT),
            ..area
        };
        let [display, keys, clear, footer] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(12),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .areas(area);

        let rows: [Rect; 4] = Layout::vertical([Constraint::Length(3); 4]).areas(keys);
        let mut buttons = Vec::with_capacity(17);
        for (row, row_keys) in rows.iter().zip(KEYPAD.iter()) {
            let cells: [Rect; 4] = Layout::horizontal([Constraint::Ratio(1, 4); 4]).areas(*row);
            buttons.extend(
                cells
                    .into_iter()
                    .zip(row_keys)
                    .map(|(area, &key)| Button { area, key }),
            );
        }
        buttons.push(Button {
            area: clear,
            key: Key::Clear,
        });

        Self {
            display,
            buttons,
            footer,
        }
    }

    /// The key drawn under a terminal cell, if any.
    pub fn hit(&self, column: u16, row: u16) -> Option<Key> {
        let position = Position::new(column, row);
        self.buttons
            .iter()
            .find(|b| b.area.contains(position))
            .map(|b| b.key)
    }
}

/// Everything the keypad screen draws from.
#[derive(Debug, Clone)]
pub struct View {
    pub snapshot: Snapshot,
    pub tick: usize,
    pub status: Option<String>,
}

impl View {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot,
            tick: 0,
            status: None,
        }
    }
}

pub fn render(frame: &mut Frame, layout: &KeypadLayout, view: &View) {
    let state = &view.snapshot.state;
    let loading = view.snapshot.loading;

    let mut block = Block::default()
        .title(" calc ")
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1));
    if let (Some(operand), Some(op)) = (state.pending_operand, state.pending_operator) {
        block = block.title(
            Line::styled(
                format!(" {} {op} ", format_number(operand)),
                Style::default().add_modifier(Modifier::DIM),
            )
            .right_aligned(),
        );
    }
    let text = if loading {
        format!("{} {}", SPINNER[view.tick % SPINNER.len()], state.display)
    } else {
        state.display.clone()
    };
    frame.render_widget(
        Paragraph::new(text)
            .style(Style::default().add_modifier(Modifier::BOLD))
            .right_aligned()
            .block(block),
        layout.display,
    );

    for button in &layout.buttons {
        frame.render_widget(
            Paragraph::new(button.key.to_string())
                .centered()
                .style(key_style(button.key, loading))
                .block(Block::default().borders(Borders::ALL)),
            button.area,
        );
    }

    let footer = match &view.status {
        Some(status) => Line::styled(format!(" {status} "), Style::default().fg(Color::Red)),
        None => Line::raw(" click a key · q/esc quit ")
            .style(Style::default().add_modifier(Modifier::DIM)),
    };
    frame.render_widget(footer, layout.footer);
}

// Only Clear is accepted while a calculation is in flight.
fn key_style(key: Key, loading: bool) -> Style {
    let style = match key {
        Key::Clear => Style::default().fg(Color::Red),
        Key::Operator(_) | Key::Equals => Style::default().fg(Color::Yellow),
        Key::Digit(_) | Key::Decimal => Style::default(),
    };
    if loading && key != Key::Clear {
        style.add_modifier(Modifier::DIM)
    } else {
        style
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calc_core::{CalculatorState, Operator, PendingOperator};
    use ratatui::{Terminal, backend::TestBackend};

    fn draw(view: &View) -> String {
        let mut terminal = Terminal::new(TestBackend::new(40, 20)).unwrap();
        terminal
            .draw(|frame| {
                let layout = KeypadLayout::new(frame.area());
                render(frame, &layout, view);
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn snapshot(display: &str, loading: bool) -> Snapshot {
        Snapshot {
            state: CalculatorState {
                display: display.to_string(),
                ..CalculatorState::default()
            },
            loading,
        }
    }

    #[test]
    fn layout_has_every_key_once() {
        let layout = KeypadLayout::new(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.buttons.len(), 17);
        for key in KEYPAD.iter().flatten().chain([&Key::Clear]) {
            assert_eq!(layout.buttons.iter().filter(|b| b.key == *key).count(), 1);
        }
    }

    #[test]
    fn clicks_map_to_keys() {
        let layout = KeypadLayout::new(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.hit(4, 4), Some(Key::Digit(7)));
        assert_eq!(layout.hit(30, 4), Some(Key::Operator(Operator::Divide)));
        assert_eq!(layout.hit(30, 13), Some(Key::Operator(Operator::Add)));
        assert_eq!(layout.hit(20, 13), Some(Key::Equals));
        assert_eq!(layout.hit(10, 16), Some(Key::Clear));
    }

    #[test]
    fn clicks_outside_buttons_are_ignored() {
        let layout = KeypadLayout::new(Rect::new(0, 0, 80, 24));
        assert_eq!(layout.hit(5, 1), None);
        assert_eq!(layout.hit(50, 5), None);
        assert_eq!(layout.hit(5, 18), None);
    }

    #[test]
    fn renders_display_and_labels() {
        let screen = draw(&View::new(snapshot("NaN", false)));
        assert!(screen.contains("NaN"));
        assert!(screen.contains("Clear"));
        assert!(screen.contains("q/esc quit"));
        assert!(!screen.contains(SPINNER[0]));
    }

    #[test]
    fn spinner_shows_while_loading() {
        let mut view = View::new(snapshot("3", true));
        view.tick = 1;
        assert!(draw(&view).contains(SPINNER[1]));
    }

    #[test]
    fn pending_operation_is_shown() {
        let mut view = View::new(snapshot("3", false));
        view.snapshot.state.pending_operand = Some(12.0);
        view.snapshot.state.pending_operator = Some(PendingOperator::Apply(Operator::Add));
        assert!(draw(&view).contains("12 +"));
    }

    #[test]
    fn status_replaces_hint() {
        let mut view = View::new(snapshot("0", true));
        view.status = Some("busy".to_string());
        let screen = draw(&view);
        assert!(screen.contains("busy"));
        assert!(!screen.contains("q/esc quit"));
    }
}
