use ratatui::prelude::*;

use crate::content::{href, Portfolio};
use crate::form::{FieldSpec, FormState, InputKind, Status};

pub const SUCCESS_TEXT: &str = "Message sent! I'll get back to you soon.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Section {
    About,
    Skills,
    Projects,
    Experience,
    Education,
    Contact,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::About,
        Section::Skills,
        Section::Projects,
        Section::Experience,
        Section::Education,
        Section::Contact,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Section::About => "About",
            Section::Skills => "Skills",
            Section::Projects => "Projects",
            Section::Experience => "Experience",
            Section::Education => "Education",
            Section::Contact => "Contact",
        }
    }
}

/// Which part of the contact form has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFocus {
    Field(usize),
    Send,
}

fn heading(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(
        text.into(),
        Style::default().add_modifier(Modifier::BOLD),
    ))
}

fn dim(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(text.into(), Style::default().fg(Color::DarkGray)))
}

fn wrapped(text: &str, width: usize, indent: &str) -> Vec<Line<'static>> {
    let width = width.saturating_sub(indent.len()).max(20);
    textwrap::fill(text.trim(), width)
        .lines()
        .map(|line| Line::from(format!("{}{}", indent, line)))
        .collect()
}

fn link_line(label: &str, raw: &str) -> Option<Line<'static>> {
    href(raw).map(|uri| {
        Line::from(vec![
            Span::raw(format!("  {}: ", label)),
            Span::styled(uri, Style::default().fg(Color::Blue).add_modifier(Modifier::UNDERLINED)),
        ])
    })
}

pub fn section_lines(
    section: Section,
    portfolio: &Portfolio,
    form: &FormState,
    focus: Option<FormFocus>,
    width: usize,
) -> Vec<Line<'static>> {
    match section {
        Section::About => about_lines(portfolio, width),
        Section::Skills => skills_lines(portfolio, width),
        Section::Projects => projects_lines(portfolio, width),
        Section::Experience => experience_lines(portfolio, width),
        Section::Education => education_lines(portfolio, width),
        Section::Contact => contact_lines(portfolio, form, focus, width),
    }
}

pub fn about_lines(portfolio: &Portfolio, width: usize) -> Vec<Line<'static>> {
    let profile = &portfolio.profile;
    let mut lines = vec![heading(profile.name.clone())];

    if !profile.title.is_empty() {
        lines.push(Line::from(Span::styled(
            profile.title.clone(),
            Style::default().fg(Color::Cyan),
        )));
    }
    if !profile.location.is_empty() {
        lines.push(Line::from(format!("Location: {}", profile.location)));
    }
    if !profile.email.is_empty() {
        lines.push(Line::from(format!("Email: {}", profile.email)));
    }
    let handles: Vec<String> = [
        ("GitHub", &portfolio.usernames.github),
        ("LeetCode", &portfolio.usernames.leetcode),
    ]
    .into_iter()
    .filter(|(_, user)| !user.trim().is_empty())
    .map(|(site, user)| format!("@{} on {}", user.trim(), site))
    .collect();
    if !handles.is_empty() {
        lines.push(dim(handles.join("  ")));
    }
    lines.push(Line::from(""));

    for paragraph in &profile.description {
        lines.extend(wrapped(paragraph, width, ""));
        lines.push(Line::from(""));
    }

    let channels = portfolio.links.visible();
    if !channels.is_empty() {
        lines.push(heading("Elsewhere"));
        for channel in channels {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {:<3}", channel.kind.glyph()),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(format!("{:<12}", channel.kind.label())),
                Span::styled(channel.uri, Style::default().fg(Color::Blue)),
            ]));
        }
    }

    lines
}

pub fn skills_lines(portfolio: &Portfolio, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for group in portfolio.skills.iter().filter(|g| !g.items.is_empty()) {
        lines.push(Line::from(Span::styled(
            group.category.clone(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )));
        lines.extend(wrapped(&group.items.join(" · "), width, "  "));
        lines.push(Line::from(""));
    }
    if lines.is_empty() {
        lines.push(dim("(No skills listed)"));
    }
    lines
}

pub fn projects_lines(portfolio: &Portfolio, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for project in &portfolio.projects {
        lines.push(heading(project.name.clone()));
        lines.extend(wrapped(&project.description, width, "  "));
        if !project.tech.is_empty() {
            lines.push(Line::from(""));
            for line in wrapped(&project.tech.join(", "), width, "  ") {
                lines.push(line.style(Style::default().fg(Color::Yellow)));
            }
        }
        lines.extend(link_line("Live", &project.link));
        lines.extend(link_line("Source", &project.github));
        lines.push(Line::from(""));
    }
    if lines.is_empty() {
        lines.push(dim("(No projects listed)"));
    }
    lines
}

pub fn experience_lines(portfolio: &Portfolio, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for job in &portfolio.experience {
        lines.push(heading(job.role.clone()));
        let place = if job.location.is_empty() {
            job.company.clone()
        } else {
            format!("{} · {}", job.company, job.location)
        };
        lines.push(Line::from(format!("  {}", place)));
        if !job.period.is_empty() {
            lines.push(dim(format!("  {}", job.period)));
        }
        lines.extend(link_line("Company", &job.company_link));
        lines.extend(wrapped(&job.description, width, "  "));
        if !job.skills.is_empty() {
            for line in wrapped(&job.skills.join(", "), width, "  ") {
                lines.push(line.style(Style::default().fg(Color::Yellow)));
            }
        }
        lines.push(Line::from(""));
    }
    if lines.is_empty() {
        lines.push(dim("(No experience listed)"));
    }
    lines
}

pub fn education_lines(portfolio: &Portfolio, _width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for entry in &portfolio.education {
        lines.push(heading(entry.degree.trim().to_string()));
        lines.push(Line::from(format!("  {}", entry.institution.trim())));
        lines.extend(link_line("Website", &entry.institution_link));
        if !entry.period.is_empty() {
            lines.push(dim(format!("  {}", entry.period)));
        }
        lines.push(Line::from(""));
    }
    if lines.is_empty() {
        lines.push(dim("(No education listed)"));
    }
    lines
}

pub fn contact_lines(
    portfolio: &Portfolio,
    form: &FormState,
    focus: Option<FormFocus>,
    width: usize,
) -> Vec<Line<'static>> {
    let mut lines = vec![
        heading("Let's Connect"),
        dim("Choose your preferred way to contact me."),
        Line::from(""),
    ];

    for card in portfolio.contact_cards() {
        lines.push(Line::from(Span::styled(
            card.title,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )));
        for channel in card.channels {
            lines.push(Line::from(vec![
                Span::raw(format!("  {:<12}", channel.kind.label())),
                Span::styled(channel.uri, Style::default().fg(Color::Blue)),
            ]));
        }
        lines.push(Line::from(""));
    }

    lines.push(heading("Send a message"));
    lines.extend(form_lines(&crate::form::CONTACT_FIELDS, form, focus, width));
    lines
}

/// One labelled input per schema entry, in schema order, then the send
/// control and the status line.
pub fn form_lines(
    fields: &[FieldSpec],
    form: &FormState,
    focus: Option<FormFocus>,
    width: usize,
) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    let missing = form.missing_fields();

    for (idx, field) in fields.iter().enumerate() {
        let focused = focus == Some(FormFocus::Field(idx));
        let label_style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(vec![
            Span::raw(format!("{} ", field.icon)),
            Span::styled(field.label, label_style),
            Span::styled(" *", Style::default().fg(Color::DarkGray)),
        ]));

        let value = form.draft.get(field.key);
        let cursor = if focused { "_" } else { "" };
        let placeholder = Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC);

        match field.kind {
            InputKind::Text | InputKind::Email => {
                let line = if value.is_empty() && !focused {
                    Line::from(vec![Span::raw("  > "), Span::styled(field.placeholder, placeholder)])
                } else {
                    Line::from(format!("  > {}{}", value, cursor))
                };
                lines.push(line);
            }
            InputKind::MultiLine { rows } => {
                let mut body: Vec<Line<'static>> = if value.is_empty() && !focused {
                    vec![Line::from(vec![
                        Span::raw("  | "),
                        Span::styled(field.placeholder, placeholder),
                    ])]
                } else {
                    let text = format!("{}{}", value, cursor);
                    text.split('\n')
                        .flat_map(|segment| {
                            let inner = width.saturating_sub(4).max(20);
                            let pieces: Vec<String> = if segment.is_empty() {
                                vec![String::new()]
                            } else {
                                textwrap::wrap(segment, inner)
                                    .into_iter()
                                    .map(|c| c.into_owned())
                                    .collect()
                            };
                            pieces.into_iter().map(|p| Line::from(format!("  | {}", p)))
                        })
                        .collect()
                };
                while body.len() < rows as usize {
                    body.push(Line::from("  |"));
                }
                lines.extend(body);
            }
        }
    }

    lines.push(Line::from(""));
    let send_label = if form.is_submit_enabled() {
        "[ Send Message ]"
    } else {
        "[ Sending... ]"
    };
    let send_style = match (focus == Some(FormFocus::Send), form.is_submit_enabled()) {
        (_, false) => Style::default().fg(Color::DarkGray),
        (true, true) => Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD),
        (false, true) => Style::default().add_modifier(Modifier::BOLD),
    };
    lines.push(Line::from(Span::styled(send_label, send_style)));

    match form.status {
        Status::Idle => {}
        Status::Submitting => lines.push(Line::from(Span::styled(
            "Sending...",
            Style::default().fg(Color::Yellow),
        ))),
        Status::Success => lines.push(Line::from(Span::styled(
            SUCCESS_TEXT,
            Style::default().fg(Color::Green),
        ))),
        Status::Error => lines.push(Line::from(Span::styled(
            form.error_message.clone(),
            Style::default().fg(Color::Red),
        ))),
    }

    // A refused send leaves focus here, whatever banner is showing
    if focus == Some(FormFocus::Send) && !missing.is_empty() {
        let names: Vec<&str> = fields
            .iter()
            .filter(|f| missing.contains(&f.key))
            .map(|f| f.label)
            .collect();
        lines.push(dim(format!("Please fill in: {}", names.join(", "))));
    }

    lines
}

/// Flattens styled lines to plain text for stdout.
pub fn plain(lines: &[Line<'_>]) -> String {
    lines
        .iter()
        .map(|line| {
            line.spans
                .iter()
                .map(|span| span.content.as_ref())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
