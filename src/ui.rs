//! Terminal UI rendering for the htnview TUI.
//!
//! Layout, top to bottom: header (title, feed address, connection, snapshot
//! count), separator, task tree, keymap line. The tree keeps the cursor
//! centered once the plan is taller than the screen.
//!
//! This module renders from RenderState (immutable snapshot) - it never
//! mutates application state.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::render::RenderState;
use crate::tea::ConnectionState;
use crate::view::{marker, status_color, TreeRow};

// Color tokens (selection uses REVERSED modifier to adapt to terminal theme)
const COLOR_TEXT_DIMMED: Color = Color::Gray;
const COLOR_TEXT_MUTED: Color = Color::DarkGray;
const COLOR_SEPARATOR: Color = Color::White;

const COLOR_CONNECTED: Color = Color::Green;
const COLOR_CONNECTING: Color = Color::Yellow;
const COLOR_DISCONNECTED: Color = Color::Red;

const TITLE: &str = "HTN Planner";
const WAITING: &str = "Waiting for data...";

// -----------------------------------------------------------------------------
// Keymap
// -----------------------------------------------------------------------------

/// A single keybinding entry for display.
struct Keybinding(&'static str, &'static str);

/// A group of related keybindings (separated by │).
struct KeybindingGroup(Vec<Keybinding>);

fn keybindings(has_tree: bool) -> Vec<KeybindingGroup> {
    let mut groups = Vec::new();
    if has_tree {
        groups.push(KeybindingGroup(vec![
            Keybinding("j/k", "move"),
            Keybinding("enter", "toggle"),
            Keybinding("h/l", "fold/unfold"),
        ]));
        groups.push(KeybindingGroup(vec![
            Keybinding("E", "expand all"),
            Keybinding("C", "collapse all"),
        ]));
    }
    groups.push(KeybindingGroup(vec![Keybinding("q", "quit")]));
    groups
}

/// Main render function - entry point for all UI drawing.
pub fn draw(frame: &mut Frame, state: &RenderState) {
    let area = frame.area();

    if area.height < 3 {
        render_tree(frame, state, area);
        return;
    }

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    render_header(frame, state, chunks[0]);
    render_separator(frame, chunks[1]);
    render_tree(frame, state, chunks[2]);
    render_statusbar(frame, state, chunks[3]);
}

fn connection_style(connection: &ConnectionState) -> Style {
    let color = match connection {
        ConnectionState::Connected => COLOR_CONNECTED,
        ConnectionState::Connecting => COLOR_CONNECTING,
        ConnectionState::Disconnected(_) => COLOR_DISCONNECTED,
    };
    Style::default().fg(color)
}

/// Title on the left; connection state and snapshot count on the right.
fn render_header(frame: &mut Frame, state: &RenderState, area: Rect) {
    let mut spans = vec![
        Span::styled(TITLE, Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(format!("  {}", state.addr), Style::default().fg(COLOR_TEXT_MUTED)),
    ];

    let right = vec![
        Span::styled("● ", connection_style(&state.connection)),
        Span::styled(
            state.connection.label(),
            Style::default().fg(COLOR_TEXT_DIMMED),
        ),
        Span::styled(
            format!("  #{}", state.snapshots),
            Style::default().fg(COLOR_TEXT_MUTED),
        ),
    ];

    let used: usize = spans
        .iter()
        .chain(right.iter())
        .map(|s| s.content.chars().count())
        .sum();
    let spacer = (area.width as usize).saturating_sub(used);
    if spacer > 0 {
        spans.push(Span::raw(" ".repeat(spacer)));
    }
    spans.extend(right);

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the separator - solid divider line between header and tree.
fn render_separator(frame: &mut Frame, area: Rect) {
    let solid = "─".repeat(area.width as usize);
    let line = Line::from(Span::styled(solid, Style::default().fg(COLOR_SEPARATOR)));
    frame.render_widget(Paragraph::new(line), area);
}

/// Render the task tree with scrolloff navigation.
fn render_tree(frame: &mut Frame, state: &RenderState, area: Rect) {
    if !state.has_tree {
        let msg = Line::from(Span::styled(WAITING, Style::default().fg(COLOR_TEXT_DIMMED)));
        frame.render_widget(Paragraph::new(msg), area);
        return;
    }

    let (start, end) = visible_window(state.rows.len(), state.selected, area.height as usize);

    let lines: Vec<Line> = state.rows[start..end]
        .iter()
        .enumerate()
        .map(|(offset, row)| render_row(row, start + offset == state.selected, state.indent))
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

/// Row range `[start, end)` to show so the selection stays centered.
fn visible_window(total: usize, selected: usize, height: usize) -> (usize, usize) {
    let center = height / 2;
    let start = selected.saturating_sub(center);
    let end = (start + height).min(total);
    let start = end.saturating_sub(height);
    (start, end)
}

/// One tree row: indent, status marker, label, toggle affordance.
fn render_row(row: &TreeRow, is_selected: bool, indent: usize) -> Line<'static> {
    let label_style = if is_selected {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    };

    let mut spans = vec![
        Span::raw(row.indent(indent)),
        Span::styled(marker(), Style::default().fg(status_color(&row.status))),
        Span::raw(" "),
        Span::styled(row.label(), label_style),
    ];

    if let Some(glyph) = row.toggle_glyph() {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(glyph, Style::default().fg(COLOR_TEXT_DIMMED)));
    }

    Line::from(spans)
}

/// Bottom line: "?" alone, or "? │ <keymap>" when the legend is expanded.
fn render_statusbar(frame: &mut Frame, state: &RenderState, area: Rect) {
    let key_style = Style::default().fg(COLOR_TEXT_DIMMED);
    let desc_style = Style::default().fg(COLOR_TEXT_MUTED);
    let sep_style = Style::default().fg(COLOR_TEXT_MUTED);

    let help_style = if state.show_keymap {
        Style::default()
    } else {
        Style::default().fg(COLOR_TEXT_MUTED)
    };
    let mut spans: Vec<Span> = vec![Span::styled("?", help_style)];

    if state.show_keymap {
        for group in keybindings(state.has_tree) {
            spans.push(Span::styled(" │ ", sep_style));
            for (idx, keybinding) in group.0.iter().enumerate() {
                if idx > 0 {
                    spans.push(Span::styled(" • ", sep_style));
                }
                spans.push(Span::styled(keybinding.0, key_style));
                spans.push(Span::styled(format!(" {}", keybinding.1), desc_style));
            }
        }
    }

    if let ConnectionState::Disconnected(reason) = &state.connection {
        spans.push(Span::styled(
            format!("  {}", reason),
            Style::default().fg(COLOR_DISCONNECTED),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
