use super::center_vertically;
use crate::app::App;
use crate::ui::theme::Theme;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub(super) fn draw_viewer_placeholder(f: &mut Frame, area: Rect, theme: &Theme) {
    // Images would render over the popup
    let text = Paragraph::new("(popup active)")
        .style(Style::default().fg(theme.fg_muted))
        .alignment(Alignment::Center);
    f.render_widget(text, center_vertically(area, 1));
}

fn section(title: &'static str, theme: &Theme) -> Line<'static> {
    Line::from(vec![Span::styled(
        title,
        Style::default().fg(theme.fg_primary).add_modifier(Modifier::BOLD),
    )])
}

fn entry(keys: String, what: &'static str, key_color: Color, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<10}", keys), Style::default().fg(key_color)),
        Span::styled(what, Style::default().fg(theme.fg_secondary)),
    ])
}

pub(super) fn draw_help_popup(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let kb = &app.config.keybindings;

    let help_text = vec![
        section("Navigation", theme),
        entry(format!("{}/←", kb.prev), "Previous image", theme.accent, theme),
        entry(format!("{}/→", kb.next), "Next image", theme.accent, theme),
        Line::from(""),
        section("Tagging", theme),
        entry(format!("{}/↑", kb.add), "Add working tags, then next", theme.add, theme),
        entry(
            format!("{}/↓", kb.remove),
            "Remove working tags, then next",
            theme.remove,
            theme,
        ),
        entry("1-9".to_string(), "Toggle a working tag", theme.accent, theme),
        entry(kb.edit_image.clone(), "Edit tags of this image", theme.accent, theme),
        entry(kb.refresh.clone(), "Reload tags of this image", theme.accent, theme),
        Line::from(""),
        section("Session", theme),
        entry(kb.open_dir.clone(), "Choose directory", theme.accent, theme),
        entry(kb.edit_working.clone(), "Edit working tags", theme.accent, theme),
        entry(format!("{}/Esc", kb.quit), "Quit", theme.accent, theme),
        Line::from(""),
        Line::from(Span::styled(
            "Tags are comma separated. Press ? or Esc to close.",
            Style::default().fg(theme.fg_muted),
        )),
    ];

    let popup_width = 56.min(area.width.saturating_sub(4));
    let popup_height = (help_text.len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup_x = area.x + (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = area.y + (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" tagdeck help ")
        .title_style(
            Style::default()
                .fg(theme.add)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.bar));

    let paragraph = Paragraph::new(help_text).block(block);
    f.render_widget(paragraph, popup_area);
}
