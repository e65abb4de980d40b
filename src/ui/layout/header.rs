use crate::alert::Severity;
use crate::app::App;
use crate::ui::theme::Theme;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{LineGauge, Paragraph},
    Frame,
};
use ratatui_image::picker::ProtocolType;

pub(super) fn draw_header(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let dir_info = app
        .session
        .working_dir()
        .map(|d| d.display().to_string())
        .unwrap_or_else(|| "No directory".to_string());

    let total = app.session.files().len();
    let count_info = if total == 0 {
        "0/0".to_string()
    } else {
        format!("{}/{}", app.session.index() + 1, total)
    };

    let mut header_spans = vec![
        Span::styled(
            " tagdeck ",
            Style::default().fg(theme.add).add_modifier(Modifier::BOLD),
        ),
        Span::styled("│ ", Style::default().fg(theme.fg_muted)),
        Span::styled(dir_info, Style::default().fg(theme.fg_secondary)),
        Span::styled(" │ ", Style::default().fg(theme.fg_muted)),
        Span::styled(count_info, Style::default().fg(theme.accent)),
        Span::styled(" │ ", Style::default().fg(theme.fg_muted)),
        Span::styled(
            format!("[img:{}]", preview_protocol_label(app)),
            Style::default().fg(theme.fg_secondary),
        ),
    ];

    if app.busy() {
        header_spans.push(Span::styled(" ", Style::default()));
        header_spans.push(Span::styled("[…]", Style::default().fg(theme.warning)));
    }

    let paragraph = Paragraph::new(Line::from(header_spans))
        .alignment(Alignment::Center)
        .style(Style::default().bg(theme.bar));
    f.render_widget(paragraph, area);
}

pub(super) fn draw_progress(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let gauge = LineGauge::default()
        .filled_style(Style::default().fg(theme.add))
        .unfilled_style(Style::default().fg(theme.bar))
        .label("")
        .ratio(app.session.progress().clamp(0.0, 1.0));
    f.render_widget(gauge, area);
}

pub(super) fn draw_alert(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let Some(notice) = app.alert.visible() else {
        return;
    };

    let (icon, color) = match notice.severity() {
        Severity::Error => ("− ", theme.remove),
        Severity::Success => ("+ ", theme.add),
        Severity::Info => ("• ", theme.info),
    };
    let line = Line::from(vec![
        Span::styled(icon, Style::default().fg(color)),
        Span::styled(
            notice.message(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
    ]);
    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
}

pub(super) fn draw_status(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    if let Some(message) = &app.ui.status_message {
        let line = Line::from(vec![
            Span::styled("⚠ ", Style::default().fg(theme.warning)),
            Span::styled(message, Style::default().fg(theme.warning)),
        ]);
        f.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
    }
}

pub(super) fn draw_footer(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    if let Some(prompt) = &app.ui.prompt {
        let line = Line::from(vec![
            Span::styled(
                format!("{}: ", prompt.kind.label()),
                Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
            ),
            Span::styled(&prompt.buffer, Style::default().fg(theme.fg_primary)),
            Span::styled("█", Style::default().fg(theme.accent)), // Cursor
        ]);
        f.render_widget(Paragraph::new(line).style(Style::default().bg(theme.bar)), area);
        return;
    }

    draw_help_line(f, app, area, theme);
}

fn draw_help_line(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let kb = &app.config.keybindings;
    let sep = Span::styled(" │ ", Style::default().fg(theme.fg_muted));
    let key = |k: String, color: Color| Span::styled(k, Style::default().fg(color));
    let what = |w: &'static str| Span::styled(w, Style::default().fg(theme.fg_muted));

    let help = Line::from(vec![
        key(format!("{}/←/{}/→", kb.prev, kb.next), theme.accent),
        what(" nav"),
        sep.clone(),
        key(format!("{}/↑", kb.add), theme.add),
        what(" add"),
        sep.clone(),
        key(format!("{}/↓", kb.remove), theme.remove),
        what(" remove"),
        sep.clone(),
        key(kb.open_dir.clone(), theme.accent),
        what(" dir"),
        sep.clone(),
        key(kb.edit_working.clone(), theme.accent),
        what(" working"),
        sep.clone(),
        key("?".to_string(), theme.accent),
        what(" help"),
        sep.clone(),
        key(kb.quit.clone(), theme.accent),
        what(" quit"),
    ]);

    let paragraph = Paragraph::new(help)
        .alignment(Alignment::Center)
        .style(Style::default().bg(theme.bar));
    f.render_widget(paragraph, area);
}

pub(super) fn preview_protocol_label(app: &App) -> &'static str {
    app.previews
        .image_picker
        .as_ref()
        .map(|p| match p.protocol_type {
            ProtocolType::Halfblocks => "HB",
            ProtocolType::Sixel => "SIX",
            ProtocolType::Kitty => "KTY",
            ProtocolType::Iterm2 => "IT2",
        })
        .unwrap_or("N/A")
}
