use crate::app::App;
use crate::ui::theme::Theme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::{Block, Borders},
    Frame,
};

mod header;
mod popups;
mod viewer;

use header::{draw_alert, draw_footer, draw_header, draw_progress, draw_status};
use popups::{draw_help_popup, draw_viewer_placeholder};
use viewer::{draw_image_tags, draw_viewer, draw_working_tags};

pub fn draw(f: &mut Frame, app: &mut App) {
    let theme = app.ui.theme.clone();
    let area = f.area();

    // ratatui-image renders directly to terminal, bypassing widget z-order
    let popup_active = app.ui.show_help;

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_focused))
        .style(Style::default().bg(theme.bg_dark));

    let inner = block.inner(area);
    f.render_widget(block, area);

    let has_alert = app.alert.visible().is_some();
    let has_status = app.ui.status_message.is_some();

    let mut constraints = vec![
        Constraint::Length(1), // Header
        Constraint::Length(1), // Progress
    ];
    if has_alert {
        constraints.push(Constraint::Length(1));
    }
    if has_status {
        constraints.push(Constraint::Length(1));
    }
    constraints.extend([
        Constraint::Min(6),    // Image
        Constraint::Length(1), // Image tags
        Constraint::Length(1), // Working tags
        Constraint::Length(1), // Footer
    ]);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(inner);

    let mut chunk_idx = 0;

    draw_header(f, app, chunks[chunk_idx], &theme);
    chunk_idx += 1;
    draw_progress(f, app, chunks[chunk_idx], &theme);
    chunk_idx += 1;

    if has_alert {
        draw_alert(f, app, chunks[chunk_idx], &theme);
        chunk_idx += 1;
    }
    if has_status {
        draw_status(f, app, chunks[chunk_idx], &theme);
        chunk_idx += 1;
    }

    if popup_active {
        draw_viewer_placeholder(f, chunks[chunk_idx], &theme);
    } else {
        draw_viewer(f, app, chunks[chunk_idx], &theme);
    }
    chunk_idx += 1;

    draw_image_tags(f, app, chunks[chunk_idx], &theme);
    chunk_idx += 1;
    draw_working_tags(f, app, chunks[chunk_idx], &theme);
    chunk_idx += 1;
    draw_footer(f, app, chunks[chunk_idx], &theme);

    if app.ui.show_help {
        draw_help_popup(f, app, area, &theme);
    }
}

fn center_vertically(area: Rect, height: u16) -> Rect {
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(area.x, y, area.width, height.min(area.height))
}
