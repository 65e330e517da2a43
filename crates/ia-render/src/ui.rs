use ia_core::pixel::AsciiArt;
use ia_core::settings::ConvertSettings;
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::canvas;

/// Width of the settings sidebar, in cells.
pub const SIDEBAR_WIDTH: u16 = 22;

/// Application state mirrored for rendering decisions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiState {
    /// Normal running state.
    Running,
    /// Help overlay visible.
    Help,
    /// Palette editor overlay visible.
    PaletteEdit,
    /// Quitting (should not reach draw).
    Quitting,
}

/// Everything one frame of the UI needs, borrowed from the app.
pub struct DrawContext<'a> {
    /// Latest completed artifact, if any.
    pub art: Option<&'a AsciiArt>,
    /// Settings as currently edited (may be ahead of `art`).
    pub settings: &'a ConvertSettings,
    /// File name of the loaded image.
    pub image_name: Option<&'a str>,
    /// One-line status/error message.
    pub status: &'a str,
    /// True while a conversion is in flight on the worker.
    pub converting: bool,
    /// Canvas scroll offset.
    pub scroll: (u16, u16),
    /// Current UI state.
    pub state: UiState,
    /// Palette editor buffer and cursor (PaletteEdit state only).
    pub palette_edit: Option<(&'a str, usize)>,
}

/// Draw the full UI: canvas + sidebar + status line, plus overlays.
pub fn draw(frame: &mut Frame, ctx: &DrawContext) {
    let area = frame.area();

    let h_chunks =
        Layout::horizontal([Constraint::Min(20), Constraint::Length(SIDEBAR_WIDTH)]).split(area);
    let v_chunks =
        Layout::vertical([Constraint::Min(5), Constraint::Length(1)]).split(h_chunks[0]);

    let canvas_area = v_chunks[0];
    if let Some(art) = ctx.art {
        let scroll = canvas::clamp_scroll(art, canvas_area, ctx.scroll);
        canvas::render_art(frame.buffer_mut(), canvas_area, art, scroll);
    } else {
        let hint = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "  No image loaded — press o to open one.",
                Style::default().fg(Color::DarkGray),
            )),
        ]);
        frame.render_widget(hint, canvas_area);
    }

    draw_status(frame, v_chunks[1], ctx);
    draw_sidebar(frame, h_chunks[1], ctx);

    match ctx.state {
        UiState::Help => draw_help_overlay(frame, area),
        UiState::PaletteEdit => draw_palette_editor(frame, area, ctx),
        _ => {}
    }
}

/// Bottom status line: busy indicator and the last message.
fn draw_status(frame: &mut Frame, area: Rect, ctx: &DrawContext) {
    let (msg, color) = if ctx.converting {
        ("converting…", Color::Yellow)
    } else if ctx.status.is_empty() {
        ("ready", Color::DarkGray)
    } else {
        (ctx.status, Color::White)
    };
    let line = Line::from(vec![Span::styled(format!(" {msg}"), Style::default().fg(color))]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Settings sidebar with all live values.
fn draw_sidebar(frame: &mut Frame, area: Rect, ctx: &DrawContext) {
    let s = ctx.settings;
    let palette_name = s.palette_id().map_or("custom", |id| id.name());
    let state_str = match ctx.state {
        UiState::Running => "▶ PREVIEW",
        UiState::Help => "? HELP",
        UiState::PaletteEdit => "✎ PALETTE",
        UiState::Quitting => "⏹ QUIT",
    };

    let mut lines = vec![
        Line::from(Span::styled(state_str, Style::default().fg(Color::Green))),
        Line::from(""),
        Line::from(Span::styled("─ Image ────", Style::default().fg(Color::Yellow))),
        Line::from(format!(" {}", ctx.image_name.unwrap_or("(none)"))),
    ];
    if let Some(art) = ctx.art {
        lines.push(Line::from(format!(" {}×{} chars", art.cols(), art.rows())));
    }
    lines.extend([
        Line::from(""),
        Line::from(Span::styled("─ Settings ─", Style::default().fg(Color::Yellow))),
        Line::from(format!(" Width: {:.0}%", s.width_scale)),
        Line::from(format!(" Height: {:.0}%", s.height_scale)),
        Line::from(format!(" Palette: {palette_name}")),
        Line::from(format!(" Invert: {}", if s.invert { "ON" } else { "OFF" })),
        Line::from(format!(" Bright: {:.1}×", s.brightness)),
        Line::from(format!(" Crop: {}", if s.crop.is_some() { "ON" } else { "OFF" })),
        Line::from(""),
        Line::from(Span::styled(" ? = help", Style::default().fg(Color::DarkGray))),
    ]);

    let sidebar =
        Paragraph::new(lines).block(Block::default().borders(Borders::LEFT).title(" imgscii "));
    frame.render_widget(sidebar, area);
}

/// Centered help overlay with all keybindings.
fn draw_help_overlay(frame: &mut Frame, area: Rect) {
    let help_text = vec![
        Line::from(Span::styled(
            " imgscii — Controls ",
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(" q/Esc    Quit"),
        Line::from(" o        Open image"),
        Line::from(" s        Save as text"),
        Line::from(" e        Export as PNG"),
        Line::from(" 1-5      Palette preset"),
        Line::from(" C        Edit palette"),
        Line::from(" i        Toggle invert"),
        Line::from(" [/]      Width scale ∓/±"),
        Line::from(" {/}      Height scale ∓/±"),
        Line::from(" -/+      Brightness ∓/±"),
        Line::from(" r        Reset settings"),
        Line::from(" Arrows   Scroll preview"),
        Line::from(" PgUp/Dn  Scroll fast"),
        Line::from(" Home     Scroll to origin"),
        Line::from(" ?        Toggle help"),
        Line::from(""),
        Line::from(Span::styled(
            " Press ? or Esc to close ",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let help_width = 34u16;
    let help_height = help_text.len() as u16 + 2;
    let x = area.x + area.width.saturating_sub(help_width) / 2;
    let y = area.y + area.height.saturating_sub(help_height) / 2;
    let help_area = Rect::new(x, y, help_width.min(area.width), help_height.min(area.height));

    let help = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Help ")
            .style(Style::default().bg(Color::Black).fg(Color::White)),
    );
    frame.render_widget(help, help_area);
}

/// Palette editor overlay: the ramp being edited plus a cursor marker.
fn draw_palette_editor(frame: &mut Frame, area: Rect, ctx: &DrawContext) {
    let (buf, cursor) = ctx.palette_edit.unwrap_or(("", 0));

    let mut ramp = String::with_capacity(buf.len() + 1);
    for (i, ch) in buf.chars().enumerate() {
        if i == cursor {
            ramp.push('▏');
        }
        ramp.push(ch);
    }
    if cursor >= buf.chars().count() {
        ramp.push('▏');
    }

    let text = vec![
        Line::from(Span::styled(
            " Palette editor — darkest → lightest ",
            Style::default().fg(Color::Yellow),
        )),
        Line::from(""),
        Line::from(format!(" {ramp}")),
        Line::from(""),
        Line::from(Span::styled(
            " Enter apply (≥2 chars) · Esc cancel ",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let width = (ramp.chars().count() as u16 + 6).max(40).min(area.width);
    let height = text.len() as u16 + 2;
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    let editor_area = Rect::new(x, y, width, height.min(area.height));

    let editor = Paragraph::new(text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Palette ")
            .style(Style::default().bg(Color::Black).fg(Color::White)),
    );
    frame.render_widget(editor, editor_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw_on(width: u16, height: u16, ctx: &DrawContext) {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| draw(frame, ctx)).unwrap();
    }

    fn base_ctx(settings: &ConvertSettings) -> DrawContext<'_> {
        DrawContext {
            art: None,
            settings,
            image_name: None,
            status: "",
            converting: false,
            scroll: (0, 0),
            state: UiState::Running,
            palette_edit: None,
        }
    }

    #[test]
    fn palette_editor_fits_narrow_terminals() {
        let settings = ConvertSettings::default();
        let mut ctx = base_ctx(&settings);
        ctx.state = UiState::PaletteEdit;
        ctx.palette_edit = Some((".#", 2));

        // Narrower than the editor's preferred 40 columns.
        draw_on(30, 10, &ctx);
        draw_on(5, 3, &ctx);
    }

    #[test]
    fn palette_editor_caps_long_ramps_to_terminal_width() {
        let settings = ConvertSettings::default();
        let ramp = "#".repeat(120);
        let mut ctx = base_ctx(&settings);
        ctx.state = UiState::PaletteEdit;
        ctx.palette_edit = Some((&ramp, 0));
        draw_on(60, 12, &ctx);
    }

    #[test]
    fn help_overlay_fits_narrow_terminals() {
        let settings = ConvertSettings::default();
        let mut ctx = base_ctx(&settings);
        ctx.state = UiState::Help;
        draw_on(30, 8, &ctx);
    }

    #[test]
    fn full_ui_draws_with_artifact() {
        let settings = ConvertSettings::default();
        let art = AsciiArt::new(vec!["@#".into(), ".:".into()]);
        let mut ctx = base_ctx(&settings);
        ctx.art = Some(&art);
        ctx.image_name = Some("photo.png");
        ctx.status = "ready";
        draw_on(80, 24, &ctx);
    }
}
