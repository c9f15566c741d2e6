use std::fs;
use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::CrosstermBackend;
use ratatui::{Frame, Terminal};
use tracing::{info, warn};

use crate::clipboard;
use crate::commands::source::{Settings, SourceArgs, TreeSource};
use crate::error::PruneError;
use crate::parser::patterns::IgnoreList;
use crate::parser::tree;
use crate::scanner::tree::ScanOptions;
use crate::tree::model::{Forest, NodeId};
use crate::tree::visibility::{ToggleOutcome, Visibility};
use crate::tui::input::{self, Action, Direction};
use crate::tui::render::{self, PanelFocus, PromptView, TreeRow, ViewRenderData};
use crate::workspace;

const DEMO_TREE: &str = "\
my-app
├── build
│   ├── app.js
│   └── app.js.map
├── node_modules
│   ├── left-pad
│   │   └── index.js
│   └── react
├── src
│   ├── components
│   │   ├── Button.tsx
│   │   └── Header.tsx
│   ├── debug.log
│   └── main.ts
├── package.json
└── README.md
";

const DEMO_PATTERNS: &str = "node_*\n*.log";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
    Abort,
}

#[derive(Debug, Clone, Default)]
struct PendingText {
    buffer: String,
    cursor: usize,
}

#[derive(Debug)]
struct AppState {
    source: Option<TreeSource>,
    scan_options: ScanOptions,
    settings: Settings,
    forest: Forest,
    visibility: Visibility,
    tree_cursor: usize,
    pattern_cursor: usize,
    focus: PanelFocus,
    show_help: bool,
    pending_text: Option<PendingText>,
    status_message: Option<String>,
    loading: bool,
    exported: bool,
    demo: bool,
}

impl AppState {
    fn load(source_args: &SourceArgs, demo: bool) -> Result<Self> {
        if demo {
            let mut app = Self::from_text(DEMO_TREE, DEMO_PATTERNS, Settings::default());
            app.demo = true;
            app.status_message = Some("demo mode: nothing is written to disk".to_string());
            return Ok(app);
        }

        let settings = Settings::load()?;
        let scan_options = settings.scan_options(source_args.files, source_args.hidden);
        let source = source_args.tree_source();
        let text = source.fetch(&scan_options)?;
        let patterns = settings.ignore_text.clone();

        let mut app = Self::from_text(&text, &patterns, settings);
        app.scan_options = scan_options;
        app.source = Some(source);
        Ok(app)
    }

    fn from_text(text: &str, patterns: &str, settings: Settings) -> Self {
        let mut forest = tree::parse(text);
        let visibility = Visibility::new(IgnoreList::compile(patterns));
        visibility.recompute(&mut forest);
        Self {
            source: None,
            scan_options: ScanOptions::from(&settings.config),
            settings,
            forest,
            visibility,
            tree_cursor: 0,
            pattern_cursor: 0,
            focus: PanelFocus::Tree,
            show_help: false,
            pending_text: None,
            status_message: None,
            loading: false,
            exported: false,
            demo: false,
        }
    }

    // -----------------------------------------------------------------------
    // Drawing
    // -----------------------------------------------------------------------

    fn draw(&self, frame: &mut Frame) {
        let rows = self.tree_rows();
        let patterns: Vec<&str> = self.visibility.ignore_list().patterns().collect();
        let source = match &self.source {
            Some(s) => s.describe(),
            None => "demo".to_string(),
        };
        let prompt = self.pending_text.as_ref().map(|p| PromptView {
            title: " Add ignore pattern ",
            buffer: &p.buffer,
            cursor: p.cursor,
        });
        let data = ViewRenderData {
            source: &source,
            rows: &rows,
            tree_cursor: self.tree_cursor,
            patterns: &patterns,
            pattern_cursor: self.pattern_cursor,
            focus: self.focus,
            active_count: self.forest.active_count(),
            message: self.status_message.as_deref(),
            prompt,
            show_help: self.show_help,
            loading: self.loading,
        };
        render::draw(frame, &data);
    }

    fn tree_rows(&self) -> Vec<TreeRow> {
        let label = self
            .forest
            .roots()
            .first()
            .copied()
            .filter(|id| self.forest[*id].depth == 0);
        self.forest
            .nodes()
            .iter()
            .map(|n| {
                let text = if Some(n.id) == label {
                    n.name.clone()
                } else {
                    format!("{}{}{}", n.prefix, n.connector, n.name)
                };
                TreeRow {
                    text,
                    active: n.is_active,
                    ignored: self.visibility.is_node_or_parent_ignored(&self.forest, n.id),
                    is_directory: n.is_directory,
                }
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    fn handle_key(&mut self, key: KeyEvent) -> Flow {
        let action = input::action_for_key(key, self.pending_text.is_some());
        self.apply(action)
    }

    fn apply(&mut self, action: Action) -> Flow {
        if self.pending_text.is_some() {
            return self.apply_text(action);
        }
        if self.show_help && !matches!(action, Action::Quit | Action::Abort) {
            self.show_help = false;
            return Flow::Continue;
        }

        match action {
            Action::Quit => return Flow::Quit,
            Action::Abort => return Flow::Abort,
            Action::Move(dir) => self.move_cursor(dir),
            Action::Toggle => match self.focus {
                PanelFocus::Tree => self.toggle_focused(),
                PanelFocus::Patterns => self.remove_focused_pattern(),
            },
            Action::SwitchPane => {
                self.focus = match self.focus {
                    PanelFocus::Tree => PanelFocus::Patterns,
                    PanelFocus::Patterns => PanelFocus::Tree,
                };
            }
            Action::AddPattern => self.pending_text = Some(PendingText::default()),
            Action::RemovePattern => self.remove_focused_pattern(),
            Action::SavePatterns => self.report(|app| app.save_patterns()),
            Action::Copy => self.report(|app| app.copy_filtered()),
            Action::WriteOutput => self.report(|app| app.write_filtered()),
            Action::Rescan => self.report(|app| app.rescan()),
            Action::ToggleHelp => self.show_help = true,
            Action::Cancel => self.status_message = None,
            Action::SubmitText
            | Action::Backspace
            | Action::CursorLeft
            | Action::CursorRight
            | Action::InputChar(_)
            | Action::Noop => {}
        }
        Flow::Continue
    }

    fn apply_text(&mut self, action: Action) -> Flow {
        let Some(prompt) = self.pending_text.as_mut() else {
            return Flow::Continue;
        };
        match action {
            Action::Abort => return Flow::Abort,
            Action::Cancel => self.pending_text = None,
            Action::InputChar(c) => {
                let at = render::byte_index_for_cursor(&prompt.buffer, prompt.cursor);
                prompt.buffer.insert(at, c);
                prompt.cursor += 1;
            }
            Action::Backspace => {
                if prompt.cursor > 0 {
                    prompt.cursor -= 1;
                    let at = render::byte_index_for_cursor(&prompt.buffer, prompt.cursor);
                    prompt.buffer.remove(at);
                }
            }
            Action::CursorLeft => prompt.cursor = prompt.cursor.saturating_sub(1),
            Action::CursorRight => {
                prompt.cursor = (prompt.cursor + 1).min(prompt.buffer.chars().count());
            }
            Action::SubmitText => {
                let text = prompt.buffer.clone();
                self.pending_text = None;
                self.add_pattern(&text);
            }
            _ => {}
        }
        Flow::Continue
    }

    fn move_cursor(&mut self, dir: Direction) {
        let (cursor, len) = match self.focus {
            PanelFocus::Tree => (&mut self.tree_cursor, self.forest.len()),
            PanelFocus::Patterns => (&mut self.pattern_cursor, self.visibility.ignore_list().len()),
        };
        let last = len.saturating_sub(1);
        *cursor = match dir {
            Direction::Up => cursor.saturating_sub(1),
            Direction::Down => (*cursor + 1).min(last),
            Direction::Top => 0,
            Direction::Bottom => last,
        };
    }

    /// Run a fallible action and show its result in the status line.
    fn report(&mut self, f: impl FnOnce(&mut Self) -> Result<String>) {
        self.status_message = Some(match f(self) {
            Ok(msg) => msg,
            Err(err) => {
                warn!(error = %format!("{err:#}"), "viewer action failed");
                format!("{err:#}")
            }
        });
    }

    // -----------------------------------------------------------------------
    // Tree and pattern operations
    // -----------------------------------------------------------------------

    fn focused_node(&self) -> Option<NodeId> {
        self.forest.get(NodeId(self.tree_cursor)).map(|n| n.id)
    }

    fn toggle_focused(&mut self) {
        let Some(id) = self.focused_node() else {
            return;
        };
        let name = self.forest[id].name.clone();
        self.status_message = Some(match self.visibility.toggle(&mut self.forest, id) {
            ToggleOutcome::Activated => format!("showing {name}"),
            ToggleOutcome::Deactivated => format!("hiding {name}"),
            ToggleOutcome::Blocked => {
                format!("{name} is ignored by a pattern; remove the pattern to show it")
            }
        });
    }

    fn add_pattern(&mut self, pattern: &str) {
        let pattern = pattern.trim();
        self.status_message = Some(if pattern.is_empty() || pattern == "*" {
            "pattern skipped: it would match nothing or everything".to_string()
        } else if self.visibility.add_pattern(&mut self.forest, pattern) {
            format!("ignoring {pattern}")
        } else {
            format!("{pattern} is already in the list")
        });
    }

    fn remove_focused_pattern(&mut self) {
        let Some(pattern) = self
            .visibility
            .ignore_list()
            .patterns()
            .nth(self.pattern_cursor)
            .map(str::to_string)
        else {
            return;
        };
        self.visibility.remove_pattern(&mut self.forest, &pattern);
        let len = self.visibility.ignore_list().len();
        self.pattern_cursor = self.pattern_cursor.min(len.saturating_sub(1));
        self.status_message = Some(format!("removed {pattern}"));
    }

    fn filtered_text(&self) -> String {
        tree::serialize(&self.forest)
    }

    fn copy_filtered(&mut self) -> Result<String> {
        let text = self.filtered_text();
        clipboard::copy(&text, self.settings.config.clipboard.as_deref())?;
        self.exported = true;
        Ok(format!("copied {} lines", text.lines().count()))
    }

    fn write_filtered(&mut self) -> Result<String> {
        if self.demo {
            return Ok("demo mode: not writing".to_string());
        }
        let path = self.settings.output_path();
        fs::write(&path, self.filtered_text())
            .with_context(|| format!("failed to write {}", path.display()))?;
        self.exported = true;
        info!(path = %path.display(), "wrote filtered tree");
        Ok(format!("wrote {}", path.display()))
    }

    fn save_patterns(&mut self) -> Result<String> {
        if self.demo {
            return Ok("demo mode: not saving".to_string());
        }
        let root = match &self.settings.root {
            Some(root) => root.clone(),
            None => std::env::current_dir()?,
        };
        let path = workspace::ignore_path(&root);
        let mut text = self.visibility.ignore_list().to_text();
        text.push('\n');
        fs::write(&path, text).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(format!("saved patterns to {}", path.display()))
    }

    /// Fetch the source again and rebuild the forest. Manual toggles are lost.
    fn rescan(&mut self) -> Result<String> {
        if self.loading {
            return Ok("already loading".to_string());
        }
        let Some(source) = self.source.clone().filter(TreeSource::can_refetch) else {
            return Ok("this source cannot be reloaded".to_string());
        };
        self.loading = true;
        let fetched = source.fetch(&self.scan_options);
        self.loading = false;

        let text = fetched?;
        self.forest = tree::parse(&text);
        self.visibility.recompute(&mut self.forest);
        self.tree_cursor = self.tree_cursor.min(self.forest.len().saturating_sub(1));
        Ok(format!("reloaded {} lines", self.forest.len()))
    }
}

pub fn run(source: &SourceArgs, demo: bool) -> Result<()> {
    let mut app = AppState::load(source, demo)?;

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;
    let _guard = TerminalGuard;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let flow = loop {
        terminal.draw(|f| app.draw(f))?;
        if !event::poll(Duration::from_millis(200))? {
            continue;
        }
        if let Event::Key(key) = event::read()? {
            if matches!(key.kind, KeyEventKind::Release | KeyEventKind::Repeat) {
                continue;
            }
            match app.handle_key(key) {
                Flow::Continue => {}
                done => break done,
            }
        }
    };

    if flow == Flow::Abort && !app.exported {
        return Err(PruneError::Cancelled.into());
    }
    Ok(())
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demo() -> AppState {
        AppState::load(&SourceArgs::default(), true).unwrap()
    }

    fn row_of(app: &AppState, path: &str) -> usize {
        app.forest.find_by_path(path).unwrap().0
    }

    fn type_text(app: &mut AppState, text: &str) {
        for c in text.chars() {
            app.apply(Action::InputChar(c));
        }
    }

    #[test]
    fn demo_applies_default_patterns() {
        let app = demo();
        let text = app.filtered_text();
        assert!(!text.contains("node_modules"));
        assert!(!text.contains("debug.log"));
        assert!(text.starts_with("my-app\n├── build\n"));
    }

    #[test]
    fn toggling_focused_row_hides_subtree() {
        let mut app = demo();
        app.tree_cursor = row_of(&app, "my-app/src/components");
        app.apply(Action::Toggle);
        let text = app.filtered_text();
        assert!(!text.contains("Button.tsx"));
        assert!(text.contains("main.ts"));
    }

    #[test]
    fn ignored_row_reports_blocked_toggle() {
        let mut app = demo();
        app.tree_cursor = row_of(&app, "my-app/node_modules/react");
        app.apply(Action::Toggle);
        assert!(app.status_message.as_deref().unwrap().contains("ignored"));
        assert!(!app.forest[NodeId(app.tree_cursor)].is_active);
    }

    #[test]
    fn adding_pattern_through_prompt() {
        let mut app = demo();
        app.apply(Action::AddPattern);
        type_text(&mut app, "BUILD");
        app.apply(Action::SubmitText);
        assert!(app.pending_text.is_none());
        assert!(!app.filtered_text().contains("app.js"));
        assert_eq!(app.visibility.ignore_list().len(), 3);
    }

    #[test]
    fn prompt_edits_at_cursor() {
        let mut app = demo();
        app.apply(Action::AddPattern);
        type_text(&mut app, "ac");
        app.apply(Action::CursorLeft);
        type_text(&mut app, "b");
        assert_eq!(app.pending_text.as_ref().unwrap().buffer, "abc");
        app.apply(Action::Backspace);
        assert_eq!(app.pending_text.as_ref().unwrap().buffer, "ac");
        app.apply(Action::Cancel);
        assert!(app.pending_text.is_none());
        assert_eq!(app.visibility.ignore_list().len(), 2);
    }

    #[test]
    fn removing_pattern_from_pattern_pane() {
        let mut app = demo();
        app.apply(Action::SwitchPane);
        assert_eq!(app.focus, PanelFocus::Patterns);
        app.apply(Action::RemovePattern);
        assert_eq!(
            app.visibility.ignore_list().patterns().collect::<Vec<_>>(),
            vec!["*.log"]
        );
        assert!(app.filtered_text().contains("left-pad"));
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut app = demo();
        app.apply(Action::Move(Direction::Up));
        assert_eq!(app.tree_cursor, 0);
        app.apply(Action::Move(Direction::Bottom));
        assert_eq!(app.tree_cursor, app.forest.len() - 1);
        app.apply(Action::Move(Direction::Down));
        assert_eq!(app.tree_cursor, app.forest.len() - 1);
    }

    #[test]
    fn rows_mark_ignored_nodes() {
        let app = demo();
        let rows = app.tree_rows();
        assert_eq!(rows[0].text, "my-app");
        let react = &rows[row_of(&app, "my-app/node_modules/react")];
        assert!(react.ignored);
        assert!(!react.active);
        assert_eq!(react.text, "│   └── react");
    }

    #[test]
    fn quit_and_abort_end_the_loop() {
        let mut app = demo();
        assert_eq!(app.apply(Action::Quit), Flow::Quit);
        assert_eq!(app.apply(Action::Abort), Flow::Abort);
    }

    #[test]
    fn demo_never_writes() {
        let mut app = demo();
        app.apply(Action::WriteOutput);
        assert_eq!(app.status_message.as_deref(), Some("demo mode: not writing"));
        assert!(!app.exported);
    }

    #[test]
    fn demo_cannot_rescan() {
        let mut app = demo();
        app.apply(Action::Rescan);
        assert_eq!(
            app.status_message.as_deref(),
            Some("this source cannot be reloaded")
        );
    }
}
