use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use crate::app::{App, FocusPane, InputMode};
use jobboard_core::{JobListing, Message, Sender};

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    if app.chat.chat_visible() {
        let [listing_area, chat_area] = Layout::horizontal([
            Constraint::Percentage(65),
            Constraint::Percentage(35),
        ])
        .areas(body_area);
        render_listing(app, frame, listing_area);
        render_chat(app, frame, chat_area);
    } else {
        app.chat_area = None;
        render_listing(app, frame, body_area);
    }

    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(" Job Board ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(format!(" {} ", app.job.title), Style::default().fg(Color::White)),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::DarkGray),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(Color::Blue).fg(Color::White),
        InputMode::Editing => Style::default().bg(Color::Yellow).fg(Color::Black),
    };
    let mode_text = match app.input_mode {
        InputMode::Normal => " VIEW ",
        InputMode::Editing => " CHAT ",
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);

    let mut spans = vec![Span::styled(mode_text, mode_style)];
    let hints: Vec<(&str, &str)> = match app.input_mode {
        InputMode::Editing => vec![(" Enter ", " send "), (" Esc ", " stop typing ")],
        InputMode::Normal => {
            let mut hints = vec![
                (" j/k ", " scroll "),
                (
                    " l ",
                    if app.chat.locations_expanded() { " hide locations " } else { " show locations " },
                ),
            ];
            if app.chat.chat_visible() {
                hints.extend([(" Tab ", " focus "), (" i ", " message "), (" x ", " close chat ")]);
            }
            hints.push((" q ", " quit "));
            hints
        }
    };
    for (key, label) in hints {
        spans.push(Span::styled(key, key_style));
        spans.push(Span::styled(label, label_style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn section_title(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))
}

fn field(label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label}: "), Style::default().fg(Color::DarkGray)),
        Span::raw(value.to_string()),
    ])
}

/// Text of the listing pane
pub fn listing_lines(job: &JobListing, locations_expanded: bool) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            job.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(
            job.headline_tags()
                .iter()
                .flat_map(|tag| {
                    [
                        Span::styled(format!(" {tag} "), Style::default().bg(Color::Blue).fg(Color::White)),
                        Span::raw(" "),
                    ]
                })
                .collect::<Vec<_>>(),
        ),
        Line::from(Span::styled(
            format!("Posted {}  ·  {}  ·  {}", job.posted, job.recruiter, job.equity),
            Style::default().fg(Color::DarkGray),
        )),
        Line::default(),
        section_title("Location & Policy"),
        field("Remote Policy", &job.remote_policy),
        field("Hires", &job.hires),
        field("Timezones", &job.timezones_display()),
        field("Visa Sponsorship", &job.visa),
        Line::default(),
        section_title("Schedule & Relocation"),
        field("Hours", &job.hours),
        field("Relocation", &job.relocation),
        Line::from(vec![
            Span::styled("Locations: ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                if locations_expanded { "▲ Hide" } else { "▼ Show all" },
                Style::default().fg(Color::Yellow),
            ),
        ]),
    ];

    for location in job.visible_locations(locations_expanded) {
        lines.push(Line::from(format!("  • {location}")));
    }

    lines.push(Line::default());
    lines.push(section_title("Required Skills"));
    lines.push(Line::from(job.skills.join(" · ")));

    lines.push(Line::default());
    lines.push(section_title("Hiring Contact"));
    lines.push(Line::from(vec![
        Span::styled(
            format!("[{}]", job.contact.initials()),
            Style::default().fg(Color::Magenta).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(job.contact.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
    ]));
    lines.push(Line::from(format!("     {}", job.contact.role)));
    lines.push(Line::from(format!("     {}", job.contact.location)));

    lines
}

fn render_listing(app: &mut App, frame: &mut Frame, area: Rect) {
    app.listing_area = Some(area);
    app.listing_height = area.height.saturating_sub(2);

    let focused = app.focus == FocusPane::Listing;
    let border_color = if focused { Color::Cyan } else { Color::DarkGray };

    let lines = listing_lines(&app.job, app.chat.locations_expanded());
    app.total_listing_lines = lines.len() as u16;
    // Collapsing the locations can leave the scroll past the end
    app.listing_scroll = app
        .listing_scroll
        .min(app.total_listing_lines.saturating_sub(app.listing_height));

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Job ");

    let listing = Paragraph::new(Text::from(lines))
        .block(block)
        .scroll((app.listing_scroll, 0));

    frame.render_widget(listing, area);
}

/// Word-wrapped transcript, shared by rendering and the scroll-to-latest
/// height measurement
pub fn chat_history(messages: &[Message]) -> Paragraph<'_> {
    let mut lines: Vec<Line> = Vec::new();
    for msg in messages {
        match msg.sender {
            Sender::User => lines.push(Line::from(Span::styled(
                "You:",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ))),
            Sender::Bot => lines.push(Line::from(Span::styled(
                "AI:",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ))),
        }
        for line in msg.text.lines() {
            lines.push(Line::from(line));
        }
        lines.push(Line::default());
    }

    Paragraph::new(Text::from(lines)).wrap(Wrap { trim: true })
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    let [history_area, input_area] = Layout::vertical([
        Constraint::Min(0),
        Constraint::Length(3),
    ])
    .areas(area);

    app.chat_area = Some(area);

    // Store chat area dimensions for scroll calculations (inner size minus borders)
    let resized = app.chat_height != history_area.height.saturating_sub(2)
        || app.chat_width != history_area.width.saturating_sub(2);
    app.chat_height = history_area.height.saturating_sub(2);
    app.chat_width = history_area.width.saturating_sub(2);
    if resized {
        app.scroll_chat_to_bottom();
    }
    app.follow_latest();

    let focused = app.focus == FocusPane::Chat;
    let border_color = if focused { Color::Cyan } else { Color::DarkGray };

    let history_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" AI Assistant ");

    let history = chat_history(app.chat.transcript())
        .block(history_block)
        .scroll((app.chat_scroll, 0));
    frame.render_widget(history, history_area);

    // Message input
    let editing = app.input_mode == InputMode::Editing;
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if editing { Color::Yellow } else { Color::DarkGray }))
        .title(" Message ");

    // Horizontal scrolling keeps the cursor visible
    let inner_width = input_area.width.saturating_sub(2) as usize;
    let cursor_pos = app.draft_cursor;
    let scroll_offset = if inner_width == 0 {
        0
    } else if cursor_pos >= inner_width {
        cursor_pos - inner_width + 1
    } else {
        0
    };

    let input = if app.chat.draft().is_empty() && !editing {
        Paragraph::new(Span::styled(
            "Type your message here...",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        let visible_text: String = app
            .chat
            .draft()
            .chars()
            .skip(scroll_offset)
            .take(inner_width)
            .collect();
        Paragraph::new(visible_text).style(Style::default().fg(Color::Cyan))
    };
    frame.render_widget(input.block(input_block), input_area);

    if editing {
        let cursor_x = (cursor_pos - scroll_offset) as u16;
        frame.set_cursor_position((input_area.x + cursor_x + 1, input_area.y + 1));
    }
}
