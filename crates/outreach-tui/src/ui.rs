use outreach_core::view::{
    format_date, format_percent, message_status_tone, post_status_tone, StatusTone,
};
use outreach_core::{DraftField, NoticeLevel, Tab, ViewState};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::app::{App, InputMode};

/// Wrap text to fit within a given width, preserving explicit line breaks
fn wrap_text_to_width(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current_line = String::new();
        let mut current_len = 0;

        for word in paragraph.split_whitespace() {
            let word_len = word.chars().count();

            if current_len == 0 {
                current_line = word.to_string();
                current_len = word_len;
            } else if current_len + 1 + word_len <= width {
                current_line.push(' ');
                current_line.push_str(word);
                current_len += 1 + word_len;
            } else {
                lines.push(std::mem::take(&mut current_line));
                current_line = word.to_string();
                current_len = word_len;
            }
        }
        lines.push(current_line);
    }

    if lines.is_empty() {
        lines.push(String::new());
    }

    lines
}

fn tone_style(tone: StatusTone) -> Style {
    match tone {
        StatusTone::Positive => Style::default().fg(Color::Black).bg(Color::Green),
        StatusTone::Highlight => Style::default().fg(Color::Black).bg(Color::Cyan),
        StatusTone::Pending => Style::default().fg(Color::Black).bg(Color::Yellow),
        StatusTone::Neutral => Style::default().fg(Color::White).bg(Color::DarkGray),
    }
}

fn badge(text: &str, tone: StatusTone) -> Span<'static> {
    Span::styled(format!(" {} ", text), tone_style(tone))
}

fn highlight_style() -> Style {
    Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD)
}

fn ellipsis(frame: u8) -> &'static str {
    match frame {
        0 => ".",
        1 => "..",
        _ => "...",
    }
}

pub fn render(app: &mut App, view: &ViewState, frame: &mut Frame) {
    let area = frame.area();
    app.clamp_selections(view);

    // Main layout: header, tabs, body, footer
    let [header_area, tabs_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, view, frame, header_area);
    render_tabs(view, frame, tabs_area);

    match view.active_tab {
        Tab::Overview => render_overview(view, frame, body_area),
        Tab::Targets => render_targets(app, view, frame, body_area),
        Tab::Messages => render_messages(app, view, frame, body_area),
        Tab::Posts => render_posts(app, view, frame, body_area),
    }

    render_footer(app, view, frame, footer_area);

    if app.notice.is_some() {
        render_notice(app, frame, area);
    }
}

fn render_header(app: &App, view: &ViewState, frame: &mut Frame, area: Rect) {
    let mut spans = vec![
        Span::styled(" LinkedIn AI Automation ", Style::default().fg(Color::Cyan).bold()),
        Span::styled(format!("{} ", app.backend_url), Style::default().fg(Color::Gray)),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(Color::Gray),
        ),
    ];
    if view.busy {
        spans.push(Span::styled(
            format!("  Working{}", ellipsis(app.animation_frame)),
            Style::default().fg(Color::Yellow).bold(),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(header, area);
}

fn render_tabs(view: &ViewState, frame: &mut Frame, area: Rect) {
    let titles = Tab::all()
        .iter()
        .map(|tab| format!("{} {}", tab.index() + 1, tab.title()))
        .collect::<Vec<_>>();

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::ALL))
        .select(view.active_tab.index())
        .style(Style::default().fg(Color::Gray))
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    frame.render_widget(tabs, area);
}

// Overview

fn render_overview(view: &ViewState, frame: &mut Frame, area: Rect) {
    let [stats_area, lower_area] =
        Layout::vertical([Constraint::Length(4), Constraint::Min(0)]).areas(area);

    let Some(analytics) = &view.analytics else {
        let loading = Paragraph::new("Loading analytics...")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(loading, stats_area);
        render_overview_lower(view, frame, lower_area);
        return;
    };

    let cards = [
        ("Total Targets", analytics.total_targets.to_string()),
        ("Connections Sent", analytics.connections_sent.to_string()),
        ("Acceptance Rate", format_percent(analytics.acceptance_rate)),
        ("Reply Rate", format_percent(analytics.reply_rate)),
    ];
    let card_areas = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(stats_area);

    for ((label, value), card_area) in cards.into_iter().zip(card_areas.iter()) {
        let card = Paragraph::new(Line::from(Span::styled(
            value,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", label)),
        );
        frame.render_widget(card, *card_area);
    }

    render_overview_lower(view, frame, lower_area);
}

fn render_overview_lower(view: &ViewState, frame: &mut Frame, area: Rect) {
    let [activity_area, actions_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(area);

    let activity: Vec<ListItem> = view
        .analytics
        .iter()
        .flat_map(|a| a.daily_activity.iter().rev())
        .map(|(date, count)| {
            ListItem::new(Line::from(vec![
                Span::raw(format!(" {} ", date)),
                Span::styled(format!("{} actions", count), Style::default().fg(Color::Cyan)),
            ]))
        })
        .collect();

    let activity_list = List::new(activity).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Recent Activity "),
    );
    frame.render_widget(activity_list, activity_area);

    let key = |k: &'static str| Span::styled(format!(" {} ", k), Style::default().fg(Color::Yellow).bold());
    let mut lines = vec![
        Line::from(vec![key("a"), Span::raw("Add New Target")]),
        Line::from(vec![key("m"), Span::raw("Generate Messages")]),
        Line::from(vec![key("p"), Span::raw("Create Viral Post")]),
        Line::from(vec![key("c"), Span::raw("Test AI Connections")]),
    ];
    if let Some(analytics) = &view.analytics {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!(
                " {} accepted, {} messages sent, {} replied",
                analytics.connections_accepted, analytics.messages_sent, analytics.messages_replied
            ),
            Style::default().fg(Color::Gray),
        )));
    }

    let actions = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Quick Actions "),
    );
    frame.render_widget(actions, actions_area);
}

// Targets

fn render_targets(app: &mut App, view: &ViewState, frame: &mut Frame, area: Rect) {
    let form_height = DraftField::all().len() as u16 + 4;
    let [form_area, list_area] =
        Layout::vertical([Constraint::Length(form_height), Constraint::Min(0)]).areas(area);

    render_target_form(app, view, frame, form_area);
    render_target_list(app, view, frame, list_area);
}

fn render_target_form(app: &App, view: &ViewState, frame: &mut Frame, area: Rect) {
    let editing = app.input_mode == InputMode::Editing;
    let border_color = if editing { Color::Yellow } else { Color::DarkGray };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Add New Target ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    const LABEL_WIDTH: usize = 17;
    let mut lines: Vec<Line> = DraftField::all()
        .iter()
        .map(|field| {
            let selected = editing && *field == app.form_field;
            let label_style = if selected {
                Style::default().fg(Color::Yellow).bold()
            } else {
                Style::default().fg(Color::Gray)
            };
            Line::from(vec![
                Span::styled(format!("{:>width$}: ", field.label(), width = LABEL_WIDTH), label_style),
                Span::raw(view.new_target.get(*field).to_string()),
            ])
        })
        .collect();

    lines.push(Line::default());
    lines.push(if view.busy {
        Line::from(Span::styled(
            format!(" Creating{}", ellipsis(app.animation_frame)),
            Style::default().fg(Color::Yellow),
        ))
    } else if editing {
        Line::from(vec![
            Span::styled(" Enter ", Style::default().bg(Color::Green).fg(Color::Black)),
            Span::raw(" Add Target"),
        ])
    } else {
        Line::from(Span::styled(" Press i to fill in the form", Style::default().fg(Color::DarkGray)))
    });

    frame.render_widget(Paragraph::new(lines), inner);

    if editing {
        if let Some(row) = DraftField::all().iter().position(|f| *f == app.form_field) {
            let value_len = view.new_target.get(app.form_field).chars().count();
            let x = inner.x + (LABEL_WIDTH + 2 + value_len).min(inner.width.saturating_sub(1) as usize) as u16;
            frame.set_cursor_position((x, inner.y + row as u16));
        }
    }
}

fn render_target_list(app: &mut App, view: &ViewState, frame: &mut Frame, area: Rect) {
    let items: Vec<ListItem> = view
        .targets
        .iter()
        .map(|target| {
            ListItem::new(Text::from(vec![
                Line::from(Span::styled(target.name.clone(), Style::default().bold())),
                Line::from(Span::styled(
                    format!("{} at {}", target.title, target.company),
                    Style::default().fg(Color::Gray),
                )),
                Line::from(Span::styled(
                    format!("Status: {}", target.connection_status),
                    Style::default().fg(Color::Cyan),
                )),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Targets ({}) ", view.targets.len())),
        )
        .highlight_style(highlight_style())
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.target_list);
}

// Messages

fn render_messages(app: &mut App, view: &ViewState, frame: &mut Frame, area: Rect) {
    let [settings_area, list_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);

    let key_style = Style::default().fg(Color::Yellow).bold();
    let settings = Paragraph::new(Line::from(vec![
        Span::raw(" Message Type: "),
        Span::styled(view.message_config.message_type.display_name(), Style::default().bold()),
        Span::styled(" (t)", key_style),
        Span::raw("   LLM Provider: "),
        Span::styled(view.message_config.llm_provider.display_name(), Style::default().bold()),
        Span::styled(" (p)", key_style),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Message Generation Settings "),
    );
    frame.render_widget(settings, settings_area);

    let wrap_width = list_area.width.saturating_sub(6) as usize;
    let items: Vec<ListItem> = view
        .messages
        .iter()
        .map(|message| {
            let mut lines = vec![Line::from(vec![
                Span::styled(message.message_type.clone(), Style::default().bold()),
                Span::raw(" "),
                badge(&message.status, message_status_tone(&message.status)),
                Span::styled(
                    format!(" {}", format_date(&message.created_at)),
                    Style::default().fg(Color::Gray),
                ),
            ])];
            lines.extend(
                wrap_text_to_width(&message.content, wrap_width)
                    .into_iter()
                    .map(Line::from),
            );
            lines.push(Line::default());
            ListItem::new(Text::from(lines))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Generated Messages ({}) ", view.messages.len())),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, list_area, &mut app.message_list);
}

// Posts

fn render_posts(app: &mut App, view: &ViewState, frame: &mut Frame, area: Rect) {
    let [action_area, lists_area] =
        Layout::vertical([Constraint::Length(4), Constraint::Min(0)]).areas(area);

    let action = if view.busy {
        Line::from(Span::styled(
            format!(" Generating{}", ellipsis(app.animation_frame)),
            Style::default().fg(Color::Yellow),
        ))
    } else {
        Line::from(vec![
            Span::styled(" g ", Style::default().bg(Color::Green).fg(Color::Black)),
            Span::raw(" Generate Viral Post"),
        ])
    };
    let generator = Paragraph::new(vec![
        Line::from(Span::styled(
            " Create a post from trending content",
            Style::default().fg(Color::Gray),
        )),
        action,
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Viral Post Generator "),
    );
    frame.render_widget(generator, action_area);

    let [generated_area, viral_area] =
        Layout::horizontal([Constraint::Percentage(65), Constraint::Percentage(35)]).areas(lists_area);

    let wrap_width = generated_area.width.saturating_sub(6) as usize;
    let items: Vec<ListItem> = view
        .generated_posts
        .iter()
        .map(|post| {
            let mut lines = vec![Line::from(vec![
                badge(&post.status, post_status_tone(&post.status)),
                Span::styled(
                    format!(" {}", format_date(&post.created_at)),
                    Style::default().fg(Color::Gray),
                ),
            ])];
            lines.extend(
                wrap_text_to_width(&post.content, wrap_width)
                    .into_iter()
                    .map(Line::from),
            );
            lines.push(Line::default());
            ListItem::new(Text::from(lines))
        })
        .collect();

    let generated = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Generated Posts ({}) ", view.generated_posts.len())),
        )
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    frame.render_stateful_widget(generated, generated_area, &mut app.post_list);

    let viral_items: Vec<ListItem> = view
        .viral_posts
        .iter()
        .map(|post| {
            ListItem::new(Text::from(vec![
                Line::from(Span::styled(post.author.clone(), Style::default().bold())),
                Line::from(Span::styled(
                    format!(
                        "score {}  {} reactions, {} comments, {} shares",
                        post.engagement_score, post.reactions, post.comments, post.shares
                    ),
                    Style::default().fg(Color::Gray),
                )),
            ]))
        })
        .collect();

    let viral = List::new(viral_items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Viral Sources ({}) ", view.viral_posts.len())),
    );
    frame.render_widget(viral, viral_area);
}

fn render_footer(app: &App, view: &ViewState, frame: &mut Frame, area: Rect) {
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(Color::Blue).fg(Color::White),
        InputMode::Editing => Style::default().bg(Color::Yellow).fg(Color::Black),
    };
    let mode_text = match app.input_mode {
        InputMode::Normal => format!(" {} ", view.active_tab.title().to_uppercase()),
        InputMode::Editing => " EDIT ".to_string(),
    };

    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(Color::DarkGray).fg(Color::White);
    let label_style = Style::default().bg(Color::Black).fg(Color::White);
    let hint = |k: &'static str, label: &'static str| {
        [
            Span::styled(format!(" {} ", k), key_style),
            Span::styled(format!(" {} ", label), label_style),
        ]
    };

    let mut hints: Vec<Span> = Vec::new();
    match (view.active_tab, app.input_mode) {
        (_, InputMode::Editing) => {
            hints.extend(hint("Tab", "next field"));
            hints.extend(hint("Enter", "add target"));
            hints.extend(hint("Esc", "stop typing"));
        }
        (Tab::Overview, _) => {
            hints.extend(hint("a", "add target"));
            hints.extend(hint("c", "test connections"));
        }
        (Tab::Targets, _) => {
            hints.extend(hint("i", "edit form"));
            hints.extend(hint("j/k", "nav"));
            hints.extend(hint("g", "generate message"));
            hints.extend(hint("s", "cycle status"));
        }
        (Tab::Messages, _) => {
            hints.extend(hint("t", "type"));
            hints.extend(hint("p", "provider"));
            hints.extend(hint("j/k", "scroll"));
        }
        (Tab::Posts, _) => {
            hints.extend(hint("g", "generate post"));
            hints.extend(hint("j/k", "scroll"));
        }
    }
    if app.input_mode == InputMode::Normal {
        hints.extend(hint("1-4", "tabs"));
        hints.extend(hint("r", "refresh"));
        hints.extend(hint("q", "quit"));
    }

    let footer_content = Line::from(
        vec![
            Span::styled(mode_text, mode_style),
            Span::styled(" ", label_style),
        ]
        .into_iter()
        .chain(hints)
        .collect::<Vec<_>>(),
    );

    let footer = Paragraph::new(footer_content).style(Style::default().bg(Color::Black));
    frame.render_widget(footer, area);
}

fn render_notice(app: &App, frame: &mut Frame, area: Rect) {
    let Some(notice) = &app.notice else {
        return;
    };

    let (title, color) = match notice.level {
        NoticeLevel::Info => (" Info ", Color::Cyan),
        NoticeLevel::Success => (" Success ", Color::Green),
        NoticeLevel::Error => (" Error ", Color::Red),
    };

    // Calculate popup size and position (centered)
    let popup_width = 60.min(area.width.saturating_sub(4));
    let text_lines = wrap_text_to_width(&notice.text, popup_width.saturating_sub(2) as usize);
    let popup_height = (text_lines.len() as u16 + 4).min(area.height.saturating_sub(2));

    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let mut lines: Vec<Line> = text_lines.into_iter().map(Line::from).collect();
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        "Press any key to dismiss",
        Style::default().fg(Color::DarkGray),
    )));

    let popup = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color))
                .title(title),
        );
    frame.render_widget(popup, popup_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_text_to_width() {
        assert_eq!(
            wrap_text_to_width("one two three four", 9),
            vec!["one two", "three", "four"]
        );
        assert_eq!(
            wrap_text_to_width("Hi there,\n\nThanks!", 40),
            vec!["Hi there,", "", "Thanks!"]
        );
        assert_eq!(wrap_text_to_width("", 10), vec![String::new()]);
    }
}
