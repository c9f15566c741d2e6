use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Clear, List, ListItem, ListState, Padding, Paragraph, Wrap,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    Tree,
    Patterns,
}

/// One tree line as shown in the viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    pub text: String,
    pub active: bool,
    /// The node or one of its ancestors matches an ignore pattern.
    pub ignored: bool,
    pub is_directory: bool,
}

#[derive(Debug, Clone)]
pub struct PromptView<'a> {
    pub title: &'a str,
    pub buffer: &'a str,
    pub cursor: usize,
}

pub struct ViewRenderData<'a> {
    pub source: &'a str,
    pub rows: &'a [TreeRow],
    pub tree_cursor: usize,
    pub patterns: &'a [&'a str],
    pub pattern_cursor: usize,
    pub focus: PanelFocus,
    pub active_count: usize,
    pub message: Option<&'a str>,
    pub prompt: Option<PromptView<'a>>,
    pub show_help: bool,
    pub loading: bool,
}

pub fn draw(frame: &mut Frame, data: &ViewRenderData<'_>) {
    let area = frame.area().inner(Margin {
        horizontal: 1,
        vertical: 0,
    });

    let mut title_spans = vec![
        Span::styled("treeprune", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(data.source.to_string(), Style::default().fg(Color::Cyan)),
        Span::raw("  "),
        Span::styled("[?] help", Style::default().fg(Color::DarkGray)),
        Span::raw("  "),
        Span::styled("[q] quit", Style::default().fg(Color::DarkGray)),
    ];
    if data.loading {
        title_spans.push(Span::raw("  "));
        title_spans.push(Span::styled(
            "[LOADING]",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
    }
    let outer = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Line::from(title_spans));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let [panes_area, status_area] =
        Layout::vertical([Constraint::Min(4), Constraint::Length(2)]).areas(inner);
    let [tree_area, patterns_area] =
        Layout::horizontal([Constraint::Percentage(70), Constraint::Percentage(30)])
            .areas(panes_area);

    draw_tree(frame, tree_area, data);
    draw_patterns(frame, patterns_area, data);
    draw_status(frame, status_area, data);

    if let Some(prompt) = &data.prompt {
        draw_prompt(frame, prompt);
    }
    if data.show_help {
        render_help_overlay(frame);
    }
}

fn pane_block(title: String, focused: bool) -> Block<'static> {
    let color = if focused { Color::Cyan } else { Color::DarkGray };
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .padding(Padding::horizontal(1))
}

fn draw_tree(frame: &mut Frame, area: Rect, data: &ViewRenderData<'_>) {
    let title = format!(" Tree {}/{} visible ", data.active_count, data.rows.len());
    let block = pane_block(title, data.focus == PanelFocus::Tree);

    if data.rows.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No tree text loaded.",
            Style::default().fg(Color::DarkGray),
        )))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = data.rows.iter().map(tree_row_line).map(ListItem::new).collect();
    let highlight = if data.focus == PanelFocus::Tree {
        Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let list = List::new(items).block(block).highlight_style(highlight);
    let mut state = ListState::default().with_selected(Some(data.tree_cursor));
    frame.render_stateful_widget(list, area, &mut state);
}

fn tree_row_line(row: &TreeRow) -> Line<'static> {
    let (mark, mark_style) = match (row.active, row.ignored) {
        (true, _) => ("[x] ", Style::default().fg(Color::Green)),
        (false, true) => ("[!] ", Style::default().fg(Color::LightRed)),
        (false, false) => ("[ ] ", Style::default().fg(Color::DarkGray)),
    };
    let mut text_style = if row.is_directory {
        Style::default().fg(Color::Blue)
    } else {
        Style::default()
    };
    if !row.active {
        text_style = Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT);
    }
    Line::from(vec![
        Span::styled(mark, mark_style),
        Span::styled(row.text.clone(), text_style),
    ])
}

fn draw_patterns(frame: &mut Frame, area: Rect, data: &ViewRenderData<'_>) {
    let title = format!(" Ignore ({}) ", data.patterns.len());
    let block = pane_block(title, data.focus == PanelFocus::Patterns);

    if data.patterns.is_empty() {
        let hint = Paragraph::new(vec![
            Line::from(Span::styled(
                "No patterns.",
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(Span::styled(
                "[a] add one",
                Style::default().fg(Color::DarkGray),
            )),
        ])
        .block(block);
        frame.render_widget(hint, area);
        return;
    }

    let items: Vec<ListItem> = data
        .patterns
        .iter()
        .map(|p| ListItem::new(Line::from(Span::raw(p.to_string()))))
        .collect();
    let highlight = if data.focus == PanelFocus::Patterns {
        Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let list = List::new(items).block(block).highlight_style(highlight);
    let mut state = ListState::default().with_selected(Some(data.pattern_cursor));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_status(frame: &mut Frame, area: Rect, data: &ViewRenderData<'_>) {
    let hints = match data.focus {
        PanelFocus::Tree => "space toggle · a add pattern · y copy · w write · r rescan · tab patterns",
        PanelFocus::Patterns => "x remove · a add · s save · tab tree",
    };
    let mut lines = vec![Line::from(Span::styled(
        hints,
        Style::default().fg(Color::DarkGray),
    ))];
    if let Some(msg) = data.message {
        lines.push(Line::from(Span::styled(
            msg.to_string(),
            Style::default().fg(Color::Yellow),
        )));
    }
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}

fn draw_prompt(frame: &mut Frame, prompt: &PromptView<'_>) {
    let area = centered_rect(frame.area(), 50, 20);
    frame.render_widget(Clear, area);
    let line = line_with_cursor(
        prompt.buffer,
        prompt.cursor,
        "e.g. node_modules or *.log",
        Style::default().fg(Color::White),
        Style::default().fg(Color::DarkGray),
        Style::default().fg(Color::Cyan),
    );
    let panel = Paragraph::new(vec![
        line,
        Line::from(""),
        Line::from(Span::styled(
            "Enter to add · Esc to cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .block(
        Block::default()
            .title(prompt.title.to_string())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan))
            .padding(Padding::new(1, 1, 1, 0)),
    );
    frame.render_widget(panel, area);
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect(frame.area(), 70, 60);
    frame.render_widget(Clear, area);
    let help = Paragraph::new(vec![
        Line::from("TREE (left): every decoded line; [x] shown, [ ] hidden, [!] ignored"),
        Line::from("  j/k or arrows move, g/G jump, Space/Enter toggles a node and its subtree"),
        Line::from("  Ignored nodes cannot be shown again until their pattern is removed."),
        Line::from(""),
        Line::from("IGNORE (right): one pattern per line, `*` is the only wildcard"),
        Line::from("  a adds a pattern, x removes the selected one, s saves them"),
        Line::from(""),
        Line::from("EXPORT"),
        Line::from("  y copies the visible tree, w writes it to the output file"),
        Line::from("  r rescans the source; Tab switches pane; q quits"),
    ])
    .block(Block::default().title("Help").borders(Borders::ALL));
    frame.render_widget(help, area);
}

fn line_with_cursor(
    text: &str,
    cursor: usize,
    placeholder: &str,
    text_style: Style,
    placeholder_style: Style,
    caret_style: Style,
) -> Line<'static> {
    let mut spans = Vec::new();
    let char_len = text.chars().count();
    let clamped = cursor.min(char_len);

    if char_len == 0 {
        spans.push(Span::styled("▌", caret_style));
        if !placeholder.is_empty() {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(placeholder.to_string(), placeholder_style));
        }
        return Line::from(spans);
    }

    let split = byte_index_for_cursor(text, clamped);
    let (left, right) = text.split_at(split);
    if !left.is_empty() {
        spans.push(Span::styled(left.to_string(), text_style));
    }
    spans.push(Span::styled("▌", caret_style));
    if !right.is_empty() {
        spans.push(Span::styled(right.to_string(), text_style));
    }
    Line::from(spans)
}

pub(crate) fn byte_index_for_cursor(text: &str, cursor: usize) -> usize {
    text.char_indices()
        .nth(cursor)
        .map(|(idx, _)| idx)
        .unwrap_or(text.len())
}

fn centered_rect(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let vertical = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .flex(Flex::Center)
    .split(area);
    Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .flex(Flex::Center)
    .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_index_respects_multibyte_chars() {
        assert_eq!(byte_index_for_cursor("│a", 1), "│".len());
        assert_eq!(byte_index_for_cursor("ab", 9), 2);
    }

    #[test]
    fn hidden_rows_are_struck_through() {
        let row = TreeRow {
            text: "├── build".to_string(),
            active: false,
            ignored: true,
            is_directory: true,
        };
        let line = tree_row_line(&row);
        assert_eq!(line.spans[0].content, "[!] ");
        assert!(line.spans[1].style.add_modifier.contains(Modifier::CROSSED_OUT));
    }
}
