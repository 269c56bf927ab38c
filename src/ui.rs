use crate::featured::featured_stories;
use crate::filter::{FilterOutcome, StoryFilter, ALL};
use crate::render::{refresh, StoryContainer, StoryElement};
use crate::storage::StoragePort;
use crate::story_entry::{course_label, department_label};
use crate::story_form::{FormState, Notice};
use crate::story_state::{Clock, StoryStore};
use crate::validation::{CounterLevel, Field};
use color_eyre::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Terminal,
};
use std::{
    io::{stdout, Stdout},
    time::{Duration, Instant},
};
use unicode_width::UnicodeWidthChar;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub enum Action {
    Stories,
    AddStory,
    Quit,
}

pub struct UI {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl UI {
    pub fn new() -> Result<Self> {
        enable_raw_mode()?;
        stdout().execute(EnterAlternateScreen)?;

        let backend = CrosstermBackend::new(stdout());
        let terminal = Terminal::new(backend)?;

        Ok(UI { terminal })
    }

    /// The stories page: static and saved stories, filterable by course and
    /// department.
    pub fn stories_page<S: StoragePort, C: Clock>(
        &mut self,
        store: &StoryStore<S, C>,
    ) -> Result<Action> {
        tracing::info!("opening stories page");
        let mut container = StoryContainer::with_static(&featured_stories());
        refresh(&mut container, store);

        let mut filter = StoryFilter::default();
        let mut outcome = filter.apply(container.elements_mut());
        let rendered_at = Instant::now();
        let mut selected_index = 0;

        loop {
            let since_render = rendered_at.elapsed();
            let visible: Vec<&StoryElement> =
                container.elements().iter().filter(|e| e.visible).collect();
            selected_index = selected_index.min(visible.len().saturating_sub(1));

            self.terminal.draw(|f| {
                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .margin(1)
                    .constraints([
                        Constraint::Length(3),
                        Constraint::Length(3),
                        Constraint::Min(5),
                        Constraint::Length(3),
                    ])
                    .split(f.area());

                let title = Paragraph::new("Истории студентов")
                    .style(
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                    .alignment(Alignment::Center);
                f.render_widget(title, chunks[0]);

                let filter_bar = Paragraph::new(filter_line(&filter, &outcome))
                    .block(Block::default().borders(Borders::ALL).title("Фильтр"));
                f.render_widget(filter_bar, chunks[1]);

                if outcome.is_empty() {
                    let empty = Paragraph::new("Истории не найдены. Попробуйте изменить фильтр.")
                        .style(Style::default().fg(Color::Gray))
                        .alignment(Alignment::Center)
                        .block(Block::default().borders(Borders::ALL).title("Истории"));
                    f.render_widget(empty, chunks[2]);
                } else {
                    let width = chunks[2].width.saturating_sub(6) as usize;
                    let items: Vec<ListItem> = visible
                        .iter()
                        .map(|e| story_item(e, width, e.is_revealed(since_render)))
                        .collect();
                    let list = List::new(items)
                        .block(Block::default().borders(Borders::ALL).title("Истории"))
                        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
                        .highlight_symbol("> ");
                    f.render_stateful_widget(
                        list,
                        chunks[2],
                        &mut ListState::default().with_selected(Some(selected_index)),
                    );
                }

                let controls = Paragraph::new(
                    "c: курс, d: кафедра, r: сбросить фильтры, a: добавить историю, q: выход",
                )
                .style(Style::default().fg(Color::Yellow))
                .alignment(Alignment::Center);
                f.render_widget(controls, chunks[3]);
            })?;

            let Some(key) = poll_key()? else {
                continue;
            };
            match key.code {
                KeyCode::Char('c') => {
                    filter.cycle_course();
                    outcome = filter.apply(container.elements_mut());
                }
                KeyCode::Char('d') => {
                    filter.cycle_department();
                    outcome = filter.apply(container.elements_mut());
                }
                KeyCode::Char('r') => {
                    filter.reset();
                    outcome = filter.apply(container.elements_mut());
                }
                KeyCode::Up => selected_index = selected_index.saturating_sub(1),
                KeyCode::Down => selected_index += 1,
                KeyCode::Char('a') => return Ok(Action::AddStory),
                KeyCode::Char('q') | KeyCode::Esc => return Ok(Action::Quit),
                _ => {}
            }
        }
    }

    /// The add-story page: the form, its errors, and the send/confirm cycle.
    pub fn add_story_page<S: StoragePort, C: Clock>(
        &mut self,
        store: &mut StoryStore<S, C>,
    ) -> Result<Action> {
        tracing::info!("opening add-story page");
        let mut state = FormState::new();

        loop {
            if let Some(saved) = state.tick(Instant::now(), store) {
                tracing::info!(saved, "story submission finished");
            }

            self.terminal.draw(|f| {
                let mut constraints = vec![Constraint::Length(3)];
                for field in Field::ALL {
                    constraints.push(if field == Field::Text {
                        Constraint::Min(6)
                    } else {
                        Constraint::Length(3)
                    });
                }
                constraints.push(Constraint::Length(3));
                constraints.push(Constraint::Length(1));

                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .margin(1)
                    .constraints(constraints)
                    .split(f.area());

                let title = Paragraph::new("Добавить историю")
                    .style(
                        Style::default()
                            .fg(Color::Cyan)
                            .add_modifier(Modifier::BOLD),
                    )
                    .alignment(Alignment::Center);
                f.render_widget(title, chunks[0]);

                for (i, field) in Field::ALL.into_iter().enumerate() {
                    f.render_widget(field_widget(&state, field), chunks[i + 1]);
                }

                let status_chunk = chunks[Field::ALL.len() + 1];
                let status = match state.notice() {
                    Some(notice @ Notice::Saved) => Paragraph::new(notice.message())
                        .style(Style::default().fg(Color::Green)),
                    Some(notice @ Notice::SaveFailed) => Paragraph::new(notice.message())
                        .style(Style::default().fg(Color::Red)),
                    None => Paragraph::new(""),
                };
                f.render_widget(
                    status
                        .alignment(Alignment::Center)
                        .block(Block::default().borders(Borders::ALL).title(state.submit_label())),
                    status_chunk,
                );

                let instructions = Paragraph::new(
                    "Tab/стрелки: поле, Пробел: выбор, Ctrl+S: отправить, Ctrl+R: очистить, Esc: назад",
                )
                .style(Style::default().fg(Color::Yellow))
                .alignment(Alignment::Center);
                f.render_widget(instructions, chunks[Field::ALL.len() + 2]);
            })?;

            let Some(key) = poll_key()? else {
                continue;
            };
            if let Some(action) = handle_form_key(&mut state, key, Instant::now()) {
                return Ok(action);
            }
        }
    }
}

impl Drop for UI {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            tracing::error!(error = %e, "failed to leave raw mode");
        }
        if let Err(e) = stdout().execute(LeaveAlternateScreen) {
            tracing::error!(error = %e, "failed to leave alternate screen");
        }
    }
}

/// Applies one key press to the add-story form. Returns the page to switch to,
/// if the key leaves the form.
fn handle_form_key(state: &mut FormState, key: KeyEvent, now: Instant) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Esc => return Some(Action::Stories),
        KeyCode::Char('s') if ctrl => {
            state.submit(now);
        }
        KeyCode::Char('r') if ctrl => state.reset(),
        KeyCode::Tab | KeyCode::Down => state.focus_next(),
        KeyCode::BackTab | KeyCode::Up => state.focus_prev(),
        KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right
            if FormState::is_choice(state.focus) =>
        {
            state.cycle_choice(state.focus);
        }
        KeyCode::Enter if state.focus == Field::Text => state.form.text.push('\n'),
        KeyCode::Enter => {
            state.submit(now);
        }
        KeyCode::Char(c) if !ctrl && !FormState::is_choice(state.focus) => {
            state.form.value_mut(state.focus).push(c);
        }
        KeyCode::Backspace if !FormState::is_choice(state.focus) => {
            state.form.value_mut(state.focus).pop();
        }
        _ => {}
    }
    None
}

fn poll_key() -> Result<Option<KeyEvent>> {
    if !event::poll(POLL_INTERVAL)? {
        return Ok(None);
    }
    match event::read()? {
        Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(key)),
        _ => Ok(None),
    }
}

fn filter_line(filter: &StoryFilter, outcome: &FilterOutcome) -> Line<'static> {
    let course = if filter.course == ALL {
        "все"
    } else {
        course_label(&filter.course).unwrap_or("?")
    };
    let department = if filter.department == ALL {
        "все"
    } else {
        department_label(&filter.department).unwrap_or("?")
    };
    Line::from(vec![
        Span::raw("Курс: "),
        Span::styled(course, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("   Кафедра: "),
        Span::styled(department, Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!("   Показано {} из {}", outcome.visible, outcome.total)),
    ])
}

fn story_item(element: &StoryElement, width: usize, revealed: bool) -> ListItem<'static> {
    let view = &element.view;
    let department_color = view
        .department_color
        .and_then(|hex| hex.parse::<Color>().ok())
        .unwrap_or(Color::Reset);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(view.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                format!("[{}]", view.course_label.unwrap_or_default()),
                Style::default().fg(Color::Blue),
            ),
            Span::raw(" "),
            Span::styled(
                format!("[{}]", view.department_label.unwrap_or_default()),
                Style::default().fg(department_color),
            ),
        ]),
        Line::from(Span::styled(
            clip(&view.title, width),
            Style::default().add_modifier(Modifier::ITALIC),
        )),
        Line::from(clip(view.text.lines().next().unwrap_or(""), width)),
    ];

    let mut footer = format!("Опубликовано: {}", view.date);
    if let Some(email) = &view.email {
        footer.push_str(&format!("   Email: {email}"));
    }
    lines.push(Line::from(Span::styled(
        clip(&footer, width),
        Style::default().fg(Color::Gray),
    )));
    lines.push(Line::from(""));

    let item = ListItem::new(lines);
    if revealed {
        item
    } else {
        item.style(Style::default().fg(Color::DarkGray))
    }
}

fn field_widget(state: &FormState, field: Field) -> Paragraph<'static> {
    let focused = state.focus == field;
    let error = state.error_message(field);

    let mut title = field_title(field).to_string();
    if let Some(message) = error {
        title.push_str(": ");
        title.push_str(message);
    }

    let border_style = if error.is_some() {
        Style::default().fg(Color::Red)
    } else if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let value = state.form.value(field);
    let shown = match field {
        Field::Course => course_label(value).unwrap_or("не выбрано").to_string(),
        Field::Department => department_label(value).unwrap_or("не выбрано").to_string(),
        _ if focused => format!("{value}|"),
        _ => value.to_string(),
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(title);
    if field == Field::Text {
        let counter = state.counter();
        let color = match counter.level() {
            CounterLevel::Normal => Color::Gray,
            CounterLevel::Warning => Color::Yellow,
            CounterLevel::Error => Color::Red,
        };
        block = block.title_bottom(Line::from(counter.label()).style(Style::default().fg(color)));
    }

    Paragraph::new(shown)
        .wrap(Wrap { trim: false })
        .block(block)
}

fn field_title(field: Field) -> &'static str {
    match field {
        Field::Name => "ФИО",
        Field::Course => "Курс",
        Field::Department => "Кафедра",
        Field::Title => "Заголовок истории",
        Field::Text => "Ваша история",
        Field::Email => "Email (необязательно)",
    }
}

/// Cuts `text` to fit `width` terminal columns, marking the cut with `…`.
fn clip(text: &str, width: usize) -> String {
    if text.chars().map(|c| c.width().unwrap_or(0)).sum::<usize>() <= width {
        return text.to_string();
    }
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > width.saturating_sub(1) {
            out.push('…');
            return out;
        }
        used += w;
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(state: &mut FormState, code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
        handle_form_key(state, KeyEvent::new(code, modifiers), Instant::now())
    }

    #[test]
    fn typing_fills_the_focused_field() {
        let mut state = FormState::new();
        for c in "Анна".chars() {
            press(&mut state, KeyCode::Char(c), KeyModifiers::NONE);
        }
        press(&mut state, KeyCode::Char('K'), KeyModifiers::SHIFT);
        assert_eq!(state.form.name, "АннаK");
    }

    #[test]
    fn control_chords_are_not_typed() {
        let mut state = FormState::new();
        for c in ['c', 'a', 'x'] {
            assert!(press(&mut state, KeyCode::Char(c), KeyModifiers::CONTROL).is_none());
        }
        assert_eq!(state.form.name, "");
    }

    #[test]
    fn escape_leaves_the_form() {
        let mut state = FormState::new();
        let action = press(&mut state, KeyCode::Esc, KeyModifiers::NONE);
        assert!(matches!(action, Some(Action::Stories)));
    }

    #[test]
    fn clip_leaves_short_text_alone() {
        assert_eq!(clip("короткий", 20), "короткий");
    }

    #[test]
    fn clip_cuts_long_text() {
        assert_eq!(clip("abcdefghij", 5), "abcd…");
        assert_eq!(clip("abcde", 5), "abcde");
    }

    #[test]
    fn clip_counts_wide_characters() {
        assert_eq!(clip("日本語テキスト", 7), "日本語…");
    }
}
