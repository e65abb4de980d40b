use super::center_vertically;
use crate::app::App;
use crate::session::BrowseState;
use crate::ui::theme::Theme;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use ratatui_image::StatefulImage;

pub(super) fn draw_viewer(f: &mut Frame, app: &mut App, area: Rect, theme: &Theme) {
    let (Some(path), BrowseState::Browsing(_)) = (app.session.current_path(), app.session.state())
    else {
        let hint = if app.session.working_dir().is_none() {
            format!("Press {} to choose a directory", app.config.keybindings.open_dir)
        } else {
            "No images in this directory".to_string()
        };
        let empty = Paragraph::new(hint)
            .style(Style::default().fg(theme.fg_muted))
            .alignment(Alignment::Center);
        f.render_widget(empty, center_vertically(area, 1));
        return;
    };

    let filename = app.session.current_file().unwrap_or("?").to_string();

    let block = Block::default()
        .title(format!(" {} ", filename))
        .title_style(
            Style::default()
                .fg(theme.fg_primary)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .style(Style::default().bg(theme.bg_dark));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let failed = app.preview_failed(&path);
    let loading = app.is_preview_loading(&path);
    if let Some(protocol) = app.get_preview(&path) {
        let image = StatefulImage::new(None);
        f.render_stateful_widget(image, inner, protocol);
    } else {
        let label = if failed {
            "Cannot display this image".to_string()
        } else if loading {
            "Loading…".to_string()
        } else {
            filename
        };
        let label = Paragraph::new(label)
            .style(Style::default().fg(theme.fg_secondary))
            .alignment(Alignment::Center);
        f.render_widget(label, center_vertically(inner, 1));
    }
}

/// Tags currently on the displayed image.
pub(super) fn draw_image_tags(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    if app.session.state() == BrowseState::Empty {
        return;
    }

    let tags = app.session.current_tags();
    let mut spans = vec![Span::styled("Tags: ", Style::default().fg(theme.fg_secondary))];
    if tags.is_empty() {
        spans.push(Span::styled("none", Style::default().fg(theme.fg_muted)));
    } else {
        spans.push(Span::styled(
            tags.join(", "),
            Style::default().fg(theme.fg_primary),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Center), area);
}

/// Numbered working-tag chips, lit when the image already carries the tag.
pub(super) fn draw_working_tags(f: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let working = app.session.working_tags();
    let current = app.session.current_tags();

    let mut spans = vec![Span::styled(
        "Working: ",
        Style::default().fg(theme.fg_secondary),
    )];
    if working.is_empty() {
        spans.push(Span::styled(
            format!("none (press {} to edit)", app.config.keybindings.edit_working),
            Style::default().fg(theme.fg_muted),
        ));
    }

    for (i, tag) in working.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        let style = if current.contains(tag) {
            Style::default().fg(theme.add).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.fg_muted)
        };
        let chip = if i < 9 {
            format!("[{}:{}]", i + 1, tag)
        } else {
            format!("[{}]", tag)
        };
        spans.push(Span::styled(chip, style));
    }

    f.render_widget(Paragraph::new(Line::from(spans)).alignment(Alignment::Center), area);
}
