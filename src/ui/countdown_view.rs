use crate::calc::RemainingDuration;
use crate::data::{AppSettings, KeyValueStore};
use crate::ui::controller::{Clock, WidgetController};
use crate::ui::labels::{labels_for, Labels};
use anyhow::Result;
use crossterm::event::{self, Event as CEvent, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io::Stdout;
use std::time::Duration as StdDuration;

const CARD_WIDTH: u16 = 64;
const CARD_HEIGHT: u16 = 18;
const POPUP_WIDTH: u16 = 54;
const POPUP_HEIGHT: u16 = 9;

/// Poll interval while no tick is scheduled.
const IDLE_POLL: StdDuration = StdDuration::from_millis(250);

const FOCUS_COLOR: Color = Color::Yellow;
const COUNTER_COLOR: Color = Color::Cyan;

#[derive(PartialEq, Eq, Clone, Copy, Debug)]
enum Focus {
    BirthDate,
    Remember,
    ClearButton,
    InfoButton,
}

pub struct App<S: KeyValueStore, C: Clock> {
    controller: WidgetController<S, C>,
    settings: AppSettings,
    labels: &'static Labels,
    focus: Focus,
    show_info: bool,
}

impl<S: KeyValueStore, C: Clock> App<S, C> {
    pub fn new(controller: WidgetController<S, C>, settings: AppSettings) -> Self {
        let labels = labels_for(settings.language);
        App {
            controller,
            settings,
            labels,
            focus: Focus::BirthDate,
            show_info: false,
        }
    }

    /// The clear button only exists while something is in the date field.
    fn clear_visible(&self) -> bool {
        !self.controller.birth_date_text().is_empty()
    }

    fn focus_order(&self) -> Vec<Focus> {
        let mut order = vec![Focus::BirthDate, Focus::Remember];
        if self.clear_visible() {
            order.push(Focus::ClearButton);
        }
        order.push(Focus::InfoButton);
        order
    }

    fn move_focus(&mut self, forward: bool) {
        let order = self.focus_order();
        let pos = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (pos + 1) % order.len()
        } else {
            (pos + order.len() - 1) % order.len()
        };
        self.focus = order[next];
    }

    fn edit_birth_date(&mut self, edit: impl FnOnce(&mut String)) {
        let mut text = self.controller.birth_date_text().to_string();
        edit(&mut text);
        self.controller.on_birth_date_input(&text);
    }

    /// Returns true when the app should quit.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> bool {
        if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
            return true;
        }

        // Any key dismisses the info popup.
        if self.show_info {
            self.show_info = false;
            return false;
        }

        match code {
            KeyCode::Tab | KeyCode::Down => {
                self.move_focus(true);
                return false;
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.move_focus(false);
                return false;
            }
            KeyCode::Esc => return true,
            _ => {}
        }

        if self.focus == Focus::BirthDate {
            match code {
                KeyCode::Char(c)
                    if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
                {
                    self.edit_birth_date(|t| t.push(c));
                }
                KeyCode::Backspace => {
                    if self.clear_visible() {
                        self.edit_birth_date(|t| {
                            t.pop();
                        });
                    }
                }
                KeyCode::Enter => self.move_focus(true),
                _ => {}
            }
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Char('i') => self.show_info = true,
            KeyCode::Char(' ') | KeyCode::Enter => match self.focus {
                Focus::Remember => {
                    let checked = !self.controller.remember();
                    self.controller.on_remember_toggle(checked);
                }
                Focus::ClearButton => {
                    self.controller.on_clear();
                    self.focus = Focus::BirthDate;
                }
                Focus::InfoButton => self.show_info = true,
                Focus::BirthDate => {}
            },
            _ => {}
        }
        false
    }

    pub fn tick(&mut self) -> bool {
        self.controller.tick()
    }

    pub fn poll_timeout(&self) -> StdDuration {
        self.controller.time_until_tick().unwrap_or(IDLE_POLL)
    }

    pub fn shutdown(&mut self) {
        self.controller.shutdown();
    }

    pub fn render(&self, f: &mut Frame) {
        let card = centered_rect(CARD_WIDTH, CARD_HEIGHT, f.area());
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", self.labels.title))
            .title_alignment(Alignment::Center);
        let inner = block.inner(card);
        f.render_widget(block, card);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(1)
            .constraints([
                Constraint::Length(3), // date field
                Constraint::Length(1), // remember checkbox
                Constraint::Length(1), // clear button
                Constraint::Length(1), // spacer
                Constraint::Length(1), // retirement date
                Constraint::Length(4), // counters
                Constraint::Min(0),    // "retirement reached" once the countdown is over
                Constraint::Length(1), // info button + hints
            ])
            .split(inner);

        self.render_birth_date_field(f, chunks[0]);
        self.render_remember(f, chunks[1]);
        if self.clear_visible() {
            f.render_widget(
                Paragraph::new(button(self.labels.clear, self.focus == Focus::ClearButton)),
                chunks[2],
            );
        }
        if let (Some(date), Some(remaining)) = (
            self.controller.retirement_date(),
            self.controller.remaining(),
        ) {
            let heading = Paragraph::new(Line::from(Span::styled(
                format!(
                    "{}: {}",
                    self.labels.retirement_date,
                    self.settings.format_date(date)
                ),
                Style::default().add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center);
            f.render_widget(heading, chunks[4]);
            self.render_counters(f, chunks[5], &remaining);
            if remaining.is_zero() {
                let reached = Paragraph::new(Line::from(Span::styled(
                    self.labels.retirement_reached,
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                )))
                .alignment(Alignment::Center);
                f.render_widget(reached, chunks[6]);
            }
        }
        self.render_footer(f, chunks[7]);

        if self.show_info {
            self.render_info_popup(f, card);
        }
    }

    fn render_birth_date_field(&self, f: &mut Frame, area: Rect) {
        let focused = self.focus == Focus::BirthDate;
        let text = if focused {
            format!("{}_", self.controller.birth_date_text())
        } else {
            self.controller.birth_date_text().to_string()
        };
        let border_style = if focused {
            Style::default().fg(FOCUS_COLOR)
        } else {
            Style::default()
        };
        let field = Paragraph::new(text).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(self.labels.birth_date),
        );
        f.render_widget(field, area);
    }

    fn render_remember(&self, f: &mut Frame, area: Rect) {
        let mark = if self.controller.remember() { "x" } else { " " };
        let style = focus_style(self.focus == Focus::Remember);
        let line = Line::from(Span::styled(
            format!("[{}] {}", mark, self.labels.remember),
            style,
        ));
        f.render_widget(Paragraph::new(line), area);
    }

    fn render_counters(&self, f: &mut Frame, area: Rect, remaining: &RemainingDuration) {
        let segments = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 4); 4])
            .split(area);
        let values = [
            (remaining.days.to_string(), self.labels.days),
            (remaining.hours.to_string(), self.labels.hours),
            (remaining.minutes.to_string(), self.labels.minutes),
            (remaining.seconds.to_string(), self.labels.seconds),
        ];
        for ((value, label), rect) in values.into_iter().zip(segments.iter()) {
            let counter = Paragraph::new(vec![
                Line::from(Span::styled(
                    value,
                    Style::default()
                        .fg(COUNTER_COLOR)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(label),
            ])
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
            f.render_widget(counter, *rect);
        }
    }

    fn render_footer(&self, f: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            button(self.labels.info, self.focus == Focus::InfoButton),
            Span::raw("  "),
            Span::styled(self.labels.hints, Style::default().fg(Color::DarkGray)),
        ]);
        f.render_widget(Paragraph::new(line), area);
    }

    fn render_info_popup(&self, f: &mut Frame, over: Rect) {
        let area = centered_rect(POPUP_WIDTH, POPUP_HEIGHT, over);
        f.render_widget(Clear, area);
        let popup = Paragraph::new(self.labels.info_text)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::LightBlue))
                    .title(format!(" {} ", self.labels.info)),
            );
        f.render_widget(popup, area);
    }
}

fn focus_style(focused: bool) -> Style {
    if focused {
        Style::default()
            .fg(FOCUS_COLOR)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    }
}

fn button(label: &str, focused: bool) -> Span<'static> {
    Span::styled(format!("[ {} ]", label), focus_style(focused))
}

/// A `width` x `height` rectangle centered in `area`, shrunk to fit.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}

pub fn run_app<S: KeyValueStore, C: Clock>(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App<S, C>,
) -> Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;
        if event::poll(app.poll_timeout())? {
            if let CEvent::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.handle_key(key.code, key.modifiers) {
                    break;
                }
            }
        }
        app.tick();
    }
    Ok(())
}
