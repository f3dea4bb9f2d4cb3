use crate::application::{App, Field, FieldKind, Screen, WizardStep};
use crate::domain::{AgentType, FileSelection, ReportBlock};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    match app.screen {
        Screen::Dashboard => render_dashboard(f, app, chunks[1]),
        Screen::Wizard | Screen::Agent => render_form_page(f, app, chunks[1]),
    }
    render_status_bar(f, app, chunks[2]);

    if app.show_help {
        render_help_popup(f, app.help_scroll);
    }
    if let Some(alert) = &app.alert {
        render_alert(f, alert);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let title = match app.screen {
        Screen::Wizard => {
            let step = app.wizard.step();
            format!("clubapply | Step {} of 3 | {}", step.number(), step.title())
        }
        Screen::Dashboard => "clubapply | AI Agent Dashboard".to_string(),
        Screen::Agent => match app.agent_panel.agent {
            Some(agent) => format!("clubapply | {} {}", agent.icon(), agent.display_name()),
            None => "clubapply".to_string(),
        },
    };
    let header = Paragraph::new(title).style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn render_dashboard(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = AgentType::ALL
        .iter()
        .map(|agent| {
            ListItem::new(vec![
                Line::from(vec![
                    Span::raw(format!("{} ", agent.icon())),
                    Span::styled(
                        agent.display_name(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                ]),
                Line::from(Span::styled(
                    format!("   {}", agent.description()),
                    Style::default().fg(Color::Gray),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Choose an agent (Enter to open, Esc to return)"),
        )
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.dashboard_index));
    f.render_stateful_widget(list, area, &mut state);
}

fn render_form_page(f: &mut Frame, app: &App, area: Rect) {
    let show_results = app.is_loading()
        || app.current_result().is_some()
        || (app.screen == Screen::Agent && app.agent_panel.execution.error.is_some());

    let chunks = if show_results {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area)
    } else {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(100)])
            .split(area)
    };

    render_form(f, app, chunks[0]);
    if show_results {
        render_results(f, app, chunks[1]);
    }
}

fn button_label(app: &App, field: Field) -> String {
    match field {
        Field::Continue if app.wizard.step() == WizardStep::PersonalInfo => {
            app.wizard.personal_submit_label().to_string()
        }
        Field::Submit => app.wizard.submit_label().to_string(),
        Field::Run => app.agent_panel.run_label().to_string(),
        other => other.label(),
    }
}

fn text_line<'a>(text: &'a str, placeholder: &'a str, focused: bool, cursor: usize) -> Line<'a> {
    if !focused {
        if text.is_empty() {
            return Line::from(Span::styled(
                format!("  {}", placeholder),
                Style::default().fg(Color::DarkGray),
            ));
        }
        return Line::from(format!("  {}", text));
    }

    let split = text
        .char_indices()
        .nth(cursor)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    let (before, rest) = text.split_at(split);
    let mut chars = rest.chars();
    let at_cursor = chars.next().map(String::from).unwrap_or_else(|| " ".to_string());
    let after: String = chars.collect();

    let edit = Style::default().bg(Color::Blue).fg(Color::White);
    Line::from(vec![
        Span::raw("  "),
        Span::styled(before.to_string(), edit),
        Span::styled(at_cursor, edit.add_modifier(Modifier::REVERSED)),
        Span::styled(after, edit),
    ])
}

fn selection_line(selection: &FileSelection) -> Option<Line<'static>> {
    if let Some(error) = &selection.error {
        return Some(Line::from(Span::styled(
            format!("  {}", error),
            Style::default().fg(Color::Red),
        )));
    }
    selection.file_name().map(|name| {
        Line::from(Span::styled(
            format!("  Selected: {}", name),
            Style::default().fg(Color::Green),
        ))
    })
}

fn render_form(f: &mut Frame, app: &App, area: Rect) {
    let focused = app.focused_field();
    let mut lines: Vec<Line> = Vec::new();

    if app.screen == Screen::Agent {
        if let Some(agent) = app.agent_panel.agent {
            lines.push(Line::from(Span::styled(
                agent.description(),
                Style::default().fg(Color::Gray),
            )));
            lines.push(Line::from(""));
        }
    }

    for field in app.fields() {
        let is_focused = focused == Some(field);
        let label_style = if is_focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        match field.kind() {
            FieldKind::Button => {
                let style = if is_focused {
                    Style::default().bg(Color::Blue).fg(Color::White)
                } else {
                    Style::default().fg(Color::Cyan)
                };
                lines.push(Line::from(Span::styled(
                    format!("[ {} ]", button_label(app, field)),
                    style,
                )));
            }
            FieldKind::Choice => {
                let state = app.wizard.state();
                let value = match field {
                    Field::ApplicationStage => state.club.application_stage.label(),
                    _ => state.personal.resume_choice.label(),
                };
                lines.push(Line::from(Span::styled(field.label(), label_style)));
                let value_style = if is_focused {
                    Style::default().bg(Color::Blue).fg(Color::White)
                } else {
                    Style::default()
                };
                lines.push(Line::from(Span::styled(format!("  < {} >", value), value_style)));
            }
            FieldKind::Text | FieldKind::Path => {
                lines.push(Line::from(Span::styled(field.label(), label_style)));
                let text = app.text(field).unwrap_or_default();
                lines.push(text_line(
                    text,
                    field.placeholder(),
                    is_focused,
                    app.cursor_position,
                ));
                let selection = match field {
                    Field::ResumePath => Some(&app.wizard.state().personal.resume),
                    Field::QuestionsPath => Some(&app.wizard.state().short_answers.questions_file),
                    Field::AgentResumePath => Some(&app.agent_panel.resume),
                    _ => None,
                };
                if let Some(line) = selection.and_then(selection_line) {
                    lines.push(line);
                }
            }
        }
        lines.push(Line::from(""));
    }

    let error = match app.screen {
        Screen::Agent => app.agent_panel.validation_error.as_ref(),
        _ => app.form_error.as_ref(),
    };
    if let Some(error) = error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )));
    }

    // Keep the focused field in view on short terminals.
    let visible = area.height.saturating_sub(2) as usize;
    let focus_line = app.focus * 3 + 2;
    let scroll = focus_line.saturating_sub(visible) as u16;

    let title = match app.screen {
        Screen::Wizard => app.wizard.step().title().to_string(),
        _ => app
            .agent_panel
            .agent
            .map(|agent| agent.display_name().to_string())
            .unwrap_or_default(),
    };
    let form = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(form, area);
}

fn report_lines(app: &App) -> Vec<Line<'static>> {
    if app.is_loading() {
        let label = match app.screen {
            Screen::Agent => app.agent_panel.run_label(),
            _ => app.wizard.submit_label(),
        };
        return vec![Line::from(Span::styled(
            label.to_string(),
            Style::default().fg(Color::Yellow),
        ))];
    }

    let mut lines = Vec::new();
    if app.screen == Screen::Agent {
        if let Some(error) = &app.agent_panel.execution.error {
            lines.push(Line::from(Span::styled(
                format!("Error: {}", error),
                Style::default().fg(Color::Red),
            )));
            lines.push(Line::from(""));
        }
    }

    let Some(report) = app.current_report() else {
        return lines;
    };
    for block in report.blocks() {
        match block {
            ReportBlock::Heading(heading) => {
                if !lines.is_empty() {
                    lines.push(Line::from(""));
                }
                lines.push(Line::from(Span::styled(
                    heading,
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
                )));
            }
            ReportBlock::Text(text) => {
                lines.extend(text.lines().map(|l| Line::from(l.to_string())));
            }
            ReportBlock::Bullet(item) => lines.push(Line::from(format!("  • {}", item))),
            ReportBlock::Code(code) => {
                lines.extend(code.lines().map(|l| {
                    Line::from(Span::styled(l.to_string(), Style::default().fg(Color::Green)))
                }));
            }
        }
    }
    lines
}

fn render_results(f: &mut Frame, app: &App, area: Rect) {
    let title = match app.screen {
        Screen::Wizard => "Your Personalized Application Guide (Ctrl+Y copy, Ctrl+S save)",
        _ => "Results (Ctrl+Y copy, Ctrl+S save)",
    };
    let results = Paragraph::new(report_lines(app))
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false })
        .scroll((app.result_scroll, 0));
    f.render_widget(results, area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let status_text = if let Some(status) = &app.status_message {
        status.clone()
    } else {
        match app.screen {
            Screen::Wizard => "Tab/↑↓: move | Enter: select | Ctrl+A: agents | Esc: back | F1: help | Ctrl+Q: quit".to_string(),
            Screen::Dashboard => "↑↓: choose agent | Enter: open | Esc: back to wizard | F1: help | Ctrl+Q: quit".to_string(),
            Screen::Agent => "Tab/↑↓: move | Enter: run | PgUp/PgDn: scroll results | Esc: dashboard | Ctrl+Q: quit".to_string(),
        }
    };

    let status = Paragraph::new(status_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Status | backend {}", app.backend().describe())),
        )
        .style(if app.is_loading() {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        });
    f.render_widget(status, area);
}

fn centered(area: Rect, width_pct: u16, height: u16) -> Rect {
    let width = area.width * width_pct / 100;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_alert(f: &mut Frame, message: &str) {
    let popup_area = centered(f.area(), 60, 7);
    f.render_widget(Clear, popup_area);

    let alert = Paragraph::new(vec![
        Line::from(message.to_string()),
        Line::from(""),
        Line::from(Span::styled(
            "Press Enter to dismiss",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Error")
            .style(Style::default().fg(Color::Red)),
    )
    .wrap(Wrap { trim: true })
    .style(Style::default().fg(Color::White));
    f.render_widget(alert, popup_area);
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_text = get_help_text();
    let help_lines: Vec<&str> = help_text.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("clubapply Help (Line {}/{})", start_line + 1, help_lines.len()))
                .style(Style::default().fg(Color::Cyan)),
        )
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

fn get_help_text() -> String {
    r#"CLUBAPPLY HELP

=== THE WIZARD ===
Step 1  Club information: club and school names are required.
        Pick the application stage with ←/→ or Space.
Step 2  Personal information: choose whether you have a resume.
        With a resume, type its path and press Enter to attach it
        (PDF, DOC or DOCX). Otherwise fill in your profile by hand.
        Online applications continue to step 3; other stages
        generate the guide straight away.
Step 3  Short answer questions: type each question, or attach a
        questions document (.txt/.csv questions are imported).
        "Help me get in" sends everything to the application coach.

=== FORM KEYS ===
Tab / ↓         Next field
Shift+Tab / ↑   Previous field
Enter           Press button, load typed file path, next field
←/→             Move cursor, or change a choice
Home/End        Jump to start/end of the text
Backspace/Del   Delete characters
Ctrl+N          Add a question (step 3)
Ctrl+D          Remove the focused question
Esc             Go back a step / leave the current page

=== AGENTS ===
Ctrl+A          Open the agent dashboard
Enter           Open the highlighted agent
                Resume Tailor, Interview Coach, Application Coach,
                Instagram Analyzer, Website Analyzer, Summarizer

=== RESULTS ===
PgUp/PgDn       Scroll results
Ctrl+Y          Copy the result as text to the clipboard
Ctrl+S          Save the raw result to clubapply-report.json

=== GENERAL ===
F1              Show this help
Ctrl+Q/Ctrl+C   Quit

=== HELP NAVIGATION ===
↑↓ or j/k       Scroll help text up/down one line
Page Up/Down    Scroll help text up/down 5 lines
Home            Jump to top of help text
Esc/F1/?/q      Close this help window

Calls go to the backend named in CLUBAPPLY_API_URL
(default http://localhost:8000). Logs are written to CLUBAPPLY_LOG_FILE."#
        .to_string()
}
