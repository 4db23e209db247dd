//! UI rendering functions.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap};
use unicode_width::UnicodeWidthChar;

use crate::app::App;
use crate::panels::{Palette, PanelOutput, PanelState};

pub fn draw_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header (border + 1 content row + border)
            Constraint::Min(1),    // Slide pane
            Constraint::Length(1), // Footer
        ])
        .split(f.area());

    draw_header(f, app, chunks[0]);
    draw_slide(f, app, chunks[1]);
    draw_footer(f, app, chunks[2]);

    if let Some(kind) = app.focused_panel {
        draw_panel(f, app.panel(kind), f.area());
    }
}

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let header_line = Line::from(vec![
        Span::styled(
            "dais",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("    Slide "),
        Span::styled(
            app.deck.counter_text(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ]);
    let header = Paragraph::new(header_line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(header, area);
}

fn draw_slide(f: &mut Frame, app: &App, area: Rect) {
    let slide = app.deck.current_slide();
    let content: Vec<Line> = slide.lines.iter().map(Line::raw).collect();
    let pane = Paragraph::new(content)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(
                    slide.title.as_str(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(pane, area);
}

fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let footer_text = if app.focused_panel.is_some() {
        "[Enter] Generate  [Esc] Close panel"
    } else {
        "[\u{2190}/\u{2192}] Navigate  [c] Snippet  [p] Palette  [q] Quit"
    };
    let footer = Paragraph::new(Line::from(vec![Span::styled(
        footer_text,
        Style::default().fg(Color::DarkGray),
    )]));
    f.render_widget(footer, area);
}

fn draw_panel(f: &mut Frame, panel: &PanelState, area: Rect) {
    let popup_area = centered_rect(
        area.width.saturating_sub(8).min(76),
        area.height.saturating_sub(4).min(20),
        area,
    );
    f.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(panel.kind().title());
    let inner = block.inner(popup_area);
    f.render_widget(block, popup_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Prompt input
            Constraint::Length(1), // Loading indicator / error region
            Constraint::Min(1),    // Output area
            Constraint::Length(1), // Trigger hint
        ])
        .split(inner);

    // Prompt input, showing the tail when wider than the field
    let input_width = chunks[0].width.saturating_sub(2) as usize;
    let input = Paragraph::new(visible_tail(&panel.input, input_width)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(panel.kind().input_hint()),
    );
    f.render_widget(input, chunks[0]);

    // Loading indicator while in flight, otherwise the error region
    let status_line = if panel.is_loading() {
        Line::from(Span::styled(
            "Generating...",
            Style::default().fg(Color::Yellow),
        ))
    } else if let Some(error) = &panel.error {
        Line::from(Span::styled(error.as_str(), Style::default().fg(Color::Red)))
    } else {
        Line::raw("")
    };
    f.render_widget(Paragraph::new(status_line), chunks[1]);

    // Output area
    match &panel.output {
        Some(PanelOutput::Code(text)) => {
            // Rendered verbatim as plain text, no interpretation
            let output = Paragraph::new(text.as_str()).wrap(Wrap { trim: false });
            f.render_widget(output, chunks[2]);
        }
        Some(PanelOutput::Palette(palette)) => {
            f.render_widget(Paragraph::new(palette_lines(palette)), chunks[2]);
        }
        None => {}
    }

    // Trigger hint, dimmed while the control is disabled
    let trigger_style = if panel.can_trigger() {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM)
    };
    let hint = Paragraph::new(Line::from(vec![
        Span::styled("[Enter] Generate", trigger_style),
        Span::styled("  [Esc] Close", Style::default().fg(Color::DarkGray)),
    ]));
    f.render_widget(hint, chunks[3]);
}

/// Lines for a rendered palette: a heading plus one swatch row per color.
/// An unparseable hex still renders its labels, just without the sample.
pub fn palette_lines(palette: &Palette) -> Vec<Line<'_>> {
    let mut lines = vec![
        Line::from(Span::styled(
            palette.palette_name.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
    ];
    for color in &palette.colors {
        let swatch = match parse_hex_color(&color.hex) {
            Some(sample) => Span::styled("      ", Style::default().bg(sample)),
            None => Span::raw("      "),
        };
        lines.push(Line::from(vec![
            swatch,
            Span::raw("  "),
            Span::styled(
                color.name.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("  "),
            Span::styled(color.hex.as_str(), Style::default().fg(Color::DarkGray)),
        ]));
    }
    lines
}

/// Best-effort parse of `#RRGGBB` or `#RGB` into a terminal color.
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let digits = hex.trim().strip_prefix('#')?;
    if !digits.is_ascii() {
        return None;
    }
    match digits.len() {
        6 => {
            let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
            let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
            let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        3 => {
            let r = u8::from_str_radix(&digits[0..1], 16).ok()?;
            let g = u8::from_str_radix(&digits[1..2], 16).ok()?;
            let b = u8::from_str_radix(&digits[2..3], 16).ok()?;
            Some(Color::Rgb(r * 17, g * 17, b * 17))
        }
        _ => None,
    }
}

/// The widest suffix of `input` that fits in `max_width` terminal columns.
pub fn visible_tail(input: &str, max_width: usize) -> String {
    let mut width = 0;
    let mut tail: Vec<char> = Vec::new();
    for ch in input.chars().rev() {
        let w = ch.width().unwrap_or(0);
        if width + w > max_width {
            break;
        }
        width += w;
        tail.push(ch);
    }
    tail.iter().rev().collect()
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
