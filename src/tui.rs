use anyhow::Result;
use chrono::{DateTime, Local};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io::{self, stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

use crate::content::Portfolio;
use crate::form::{EditOp, FormState, InputKind, Outcome, Status, CONTACT_FIELDS};
use crate::relay::FormRelay;
use crate::view::{section_lines, FormFocus, Section};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormAction {
    None,
    Submit,
    Leave,
}

struct AppState<'a> {
    portfolio: &'a Portfolio,
    selected: usize,
    scroll_offset: u16,
    max_scroll: u16,
    editing: bool,
    focus: FormFocus,
    form: FormState,
    last_sent: Option<DateTime<Local>>,
}

impl<'a> AppState<'a> {
    fn new(portfolio: &'a Portfolio) -> Self {
        Self {
            portfolio,
            selected: 0,
            scroll_offset: 0,
            max_scroll: 0,
            editing: false,
            focus: FormFocus::Field(0),
            form: FormState::new(),
            last_sent: None,
        }
    }

    fn current_section(&self) -> Section {
        Section::ALL[self.selected]
    }

    fn next(&mut self) {
        if self.selected < Section::ALL.len() - 1 {
            self.selected += 1;
            self.scroll_offset = 0;
        }
    }

    fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.scroll_offset = 0;
        }
    }

    fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(3).min(self.max_scroll);
    }

    fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(3);
    }

    fn start_editing(&mut self) {
        if self.current_section() == Section::Contact {
            self.editing = true;
            self.focus = FormFocus::Field(0);
        }
    }

    fn focus_next(&mut self) {
        self.focus = match self.focus {
            FormFocus::Field(i) if i + 1 < CONTACT_FIELDS.len() => FormFocus::Field(i + 1),
            FormFocus::Field(_) => FormFocus::Send,
            FormFocus::Send => FormFocus::Field(0),
        };
    }

    fn focus_prev(&mut self) {
        self.focus = match self.focus {
            FormFocus::Field(0) => FormFocus::Send,
            FormFocus::Field(i) => FormFocus::Field(i - 1),
            FormFocus::Send => FormFocus::Field(CONTACT_FIELDS.len() - 1),
        };
    }

    fn edit_focused(&mut self, op: EditOp) {
        if let FormFocus::Field(i) = self.focus {
            self.form.edit(CONTACT_FIELDS[i].key, op);
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> FormAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('s') => FormAction::Submit,
                KeyCode::Char('u') => {
                    self.edit_focused(EditOp::Clear);
                    FormAction::None
                }
                _ => FormAction::None,
            };
        }

        match key.code {
            KeyCode::Esc => return FormAction::Leave,
            KeyCode::Tab | KeyCode::Down => self.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.focus_prev(),
            KeyCode::Backspace => self.edit_focused(EditOp::Backspace),
            KeyCode::Enter => match self.focus {
                FormFocus::Send => return FormAction::Submit,
                FormFocus::Field(i) => match CONTACT_FIELDS[i].kind {
                    InputKind::MultiLine { .. } => self.edit_focused(EditOp::Insert('\n')),
                    InputKind::Text | InputKind::Email => self.focus_next(),
                },
            },
            KeyCode::Char(c) => self.edit_focused(EditOp::Insert(c)),
            _ => {}
        }
        FormAction::None
    }

    fn apply_outcome(&mut self, outcome: Outcome) {
        self.form.finish(outcome);
        if self.form.status == Status::Success {
            self.last_sent = Some(Local::now());
            self.focus = FormFocus::Field(0);
        }
    }
}

type UndoStep = Box<dyn FnMut() -> io::Result<()>>;

/// Undoes terminal setup on drop, newest step first. Every step runs even
/// when an earlier one fails.
#[derive(Default)]
struct Restore {
    steps: Vec<(&'static str, UndoStep)>,
}

impl Restore {
    fn push(&mut self, what: &'static str, step: UndoStep) {
        self.steps.push((what, step));
    }
}

impl Drop for Restore {
    fn drop(&mut self) {
        while let Some((what, mut step)) = self.steps.pop() {
            if let Err(e) = step() {
                log::warn!("Failed to {}: {}", what, e);
            }
        }
    }
}

pub fn run_browse(
    portfolio: &Portfolio,
    relay: Arc<dyn FormRelay>,
    runtime: &Handle,
) -> Result<()> {
    let mut state = AppState::new(portfolio);

    // Setup terminal; dropping `restore` puts it back on every return path
    let mut restore = Restore::default();
    enable_raw_mode()?;
    restore.push("disable raw mode", Box::new(disable_raw_mode));
    stdout().execute(EnterAlternateScreen)?;
    restore.push(
        "leave alternate screen",
        Box::new(|| stdout().execute(LeaveAlternateScreen).map(|_| ())),
    );
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    run_loop(&mut terminal, &mut state, relay, runtime)
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    relay: Arc<dyn FormRelay>,
    runtime: &Handle,
) -> Result<()> {
    let mut list_state = ListState::default();
    list_state.select(Some(0));

    let (tx, mut rx) = mpsc::unbounded_channel::<Outcome>();

    loop {
        while let Ok(outcome) = rx.try_recv() {
            state.apply_outcome(outcome);
        }

        terminal.draw(|frame| draw(frame, state, &mut list_state))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            if state.editing {
                match state.handle_form_key(key) {
                    FormAction::Leave => state.editing = false,
                    FormAction::Submit => {
                        // Refused while a request is in flight or a field is blank.
                        if let Some(draft) = state.form.begin_submit() {
                            let relay = Arc::clone(&relay);
                            let tx = tx.clone();
                            runtime.spawn(async move {
                                let outcome = relay.deliver(&draft).await;
                                let _ = tx.send(outcome);
                            });
                        } else if state.form.status != Status::Submitting {
                            state.focus = FormFocus::Send;
                        }
                    }
                    FormAction::None => {}
                }
                continue;
            }

            let prev_selected = state.selected;
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Down | KeyCode::Char('j') => state.next(),
                KeyCode::Up | KeyCode::Char('k') => state.prev(),
                KeyCode::Char('J') | KeyCode::PageDown => state.scroll_down(),
                KeyCode::Char('K') | KeyCode::PageUp => state.scroll_up(),
                KeyCode::Char('i') | KeyCode::Enter => state.start_editing(),
                _ => {}
            }
            if state.selected != prev_selected {
                list_state.select(Some(state.selected));
            }
        }
    }
    Ok(())
}

fn draw(frame: &mut Frame, state: &mut AppState, list_state: &mut ListState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25), Constraint::Percentage(75)])
        .split(rows[0]);

    // Left panel: sections
    let items: Vec<ListItem> = Section::ALL
        .iter()
        .map(|section| ListItem::new(format!(" {}", section.title())))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", state.portfolio.profile.name)),
        )
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, chunks[0], list_state);

    // Right panel: section content
    let section = state.current_section();
    let width = chunks[1].width.saturating_sub(2) as usize;
    let focus = state.editing.then_some(state.focus);
    let lines = section_lines(section, state.portfolio, &state.form, focus, width);

    let pane_height = chunks[1].height.saturating_sub(2) as usize;
    state.max_scroll =
        u16::try_from(lines.len().saturating_sub(pane_height)).unwrap_or(u16::MAX);
    state.scroll_offset = state.scroll_offset.min(state.max_scroll);

    let title = if state.editing {
        format!(" {} (editing) ", section.title())
    } else {
        format!(" {} ", section.title())
    };
    let detail = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false })
        .scroll((state.scroll_offset, 0));

    frame.render_widget(detail, chunks[1]);

    // Footer help
    let mut help = if state.editing {
        String::from(" Tab:next field  Enter:newline/next/send  Ctrl-S:send  Ctrl-U:clear  Esc:done")
    } else if section == Section::Contact {
        String::from(" j/k:navigate  J/K:scroll  i:write a message  q:quit")
    } else {
        String::from(" j/k:navigate  J/K:scroll  q:quit")
    };
    if let Some(sent) = state.last_sent {
        help.push_str(&format!("  | last message sent {}", sent.format("%H:%M:%S")));
    }

    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        rows[1],
    );
}
