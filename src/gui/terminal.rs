//! Interactive toolkit over crossterm, for demos.
//!
//! Input: arrow keys, Enter (Ok) and Esc (Back) in raw mode, with the poll
//! timeout doubling as the tick timer exactly like any other backend.
//! Output: the current view's content blocks echoed as plain lines. This is
//! deliberately not a renderer; it exists so an application is drivable from
//! a terminal without a real toolkit.

use std::any::Any;
use std::collections::HashMap;
use std::io::{self, Write as _};
use std::time::Duration;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::terminal::{Clear, ClearType, disable_raw_mode, enable_raw_mode};
use crossterm::{execute, queue};
use log::warn;

use super::{
    InputEvent, InputKey, InputType, StackHandle, SurfaceKind, Toolkit, ViewContent, ViewHandle,
};

struct StackRecord {
    views: Vec<ViewHandle>,
    composite: ViewHandle,
}

pub struct TerminalToolkit {
    next_handle: u64,
    views: HashMap<u64, ViewContent>,
    stacks: HashMap<u64, StackRecord>,
    current: Option<ViewHandle>,
    attached: bool,
}

impl TerminalToolkit {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            views: HashMap::new(),
            stacks: HashMap::new(),
            current: None,
            attached: false,
        }
    }

    fn next(&mut self) -> u64 {
        let handle = self.next_handle;
        self.next_handle += 1;
        handle
    }

    /// Content blocks the current view resolves to: the stack's member views
    /// in order when the current view is a composite, its own block otherwise.
    fn visible_blocks(&self) -> Vec<&ViewContent> {
        let Some(current) = self.current else {
            return Vec::new();
        };
        if let Some(record) = self.stacks.values().find(|record| record.composite == current) {
            record.views.iter().filter_map(|view| self.views.get(&view.0)).collect()
        } else {
            self.views.get(&current.0).into_iter().collect()
        }
    }

    fn redraw(&self) {
        if !self.attached {
            return;
        }
        let mut stdout = io::stdout();
        let mut draw = || -> io::Result<()> {
            queue!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
            let mut row = 0u16;
            for block in self.visible_blocks() {
                if let Some(title) = &block.title {
                    queue!(stdout, MoveTo(0, row), crossterm::style::Print(title))?;
                    row += 2;
                }
                for (index, line) in block.lines.iter().enumerate() {
                    let marker = if block.selected == Some(index) { "> " } else { "  " };
                    queue!(
                        stdout,
                        MoveTo(0, row),
                        crossterm::style::Print(format!("{marker}{line}"))
                    )?;
                    row += 1;
                }
                row += 1;
            }
            stdout.flush()
        };
        if let Err(err) = draw() {
            warn!("terminal redraw failed: {err}");
        }
    }

    fn is_current(&self, view: ViewHandle) -> bool {
        match self.current {
            Some(current) if current == view => true,
            Some(current) => self
                .stacks
                .values()
                .any(|record| record.composite == current && record.views.contains(&view)),
            None => false,
        }
    }
}

impl Default for TerminalToolkit {
    fn default() -> Self {
        Self::new()
    }
}

impl Toolkit for TerminalToolkit {
    fn create_view(&mut self) -> ViewHandle {
        let view = ViewHandle(self.next());
        self.views.insert(view.0, ViewContent::default());
        view
    }

    fn release_view(&mut self, view: ViewHandle) {
        if self.views.remove(&view.0).is_none() {
            panic!("release of unknown or already released view {view:?}");
        }
    }

    fn set_view_content(&mut self, view: ViewHandle, content: ViewContent) {
        let Some(slot) = self.views.get_mut(&view.0) else {
            panic!("content set on unknown view {view:?}");
        };
        *slot = content;
        if self.is_current(view) {
            self.redraw();
        }
    }

    fn create_stack(&mut self) -> StackHandle {
        let stack = StackHandle(self.next());
        let composite = ViewHandle(self.next());
        self.views.insert(composite.0, ViewContent::default());
        self.stacks.insert(stack.0, StackRecord { views: Vec::new(), composite });
        stack
    }

    fn release_stack(&mut self, stack: StackHandle) {
        let Some(record) = self.stacks.remove(&stack.0) else {
            panic!("release of unknown or already released stack {stack:?}");
        };
        self.views.remove(&record.composite.0);
    }

    fn stack_add_view(&mut self, stack: StackHandle, view: ViewHandle) {
        let Some(record) = self.stacks.get_mut(&stack.0) else {
            panic!("stack add on unknown stack {stack:?}");
        };
        record.views.push(view);
    }

    fn stack_remove_view(&mut self, stack: StackHandle, view: ViewHandle) {
        let Some(record) = self.stacks.get_mut(&stack.0) else {
            panic!("stack remove on unknown stack {stack:?}");
        };
        record.views.retain(|member| *member != view);
    }

    fn stack_view(&self, stack: StackHandle) -> ViewHandle {
        let Some(record) = self.stacks.get(&stack.0) else {
            panic!("composite view of unknown stack {stack:?}");
        };
        record.composite
    }

    fn attach(&mut self, _surface: SurfaceKind) {
        if let Err(err) = enable_raw_mode() {
            warn!("failed to enable raw mode: {err}");
        }
        if let Err(err) = execute!(io::stdout(), Hide, Clear(ClearType::All)) {
            warn!("failed to prepare terminal: {err}");
        }
        self.attached = true;
    }

    fn detach(&mut self) {
        if !self.attached {
            return;
        }
        self.attached = false;
        if let Err(err) = execute!(io::stdout(), Show, Clear(ClearType::All), MoveTo(0, 0)) {
            warn!("failed to restore terminal: {err}");
        }
        if let Err(err) = disable_raw_mode() {
            warn!("failed to disable raw mode: {err}");
        }
    }

    fn show_view(&mut self, view: ViewHandle) {
        assert!(self.views.contains_key(&view.0), "show of unknown view {view:?}");
        self.current = Some(view);
        self.redraw();
    }

    fn send_to_front(&mut self) {}

    fn send_to_back(&mut self) {}

    fn poll_input(&mut self, timeout: Option<Duration>) -> Option<InputEvent> {
        loop {
            if let Some(timeout) = timeout {
                match event::poll(timeout) {
                    Ok(true) => {}
                    Ok(false) => return None,
                    Err(err) => {
                        warn!("input poll failed: {err}");
                        return None;
                    }
                }
            }
            let read = match event::read() {
                Ok(read) => read,
                Err(err) => {
                    warn!("input read failed: {err}");
                    return None;
                }
            };
            let Event::Key(key) = read else {
                continue;
            };
            let kind = match key.kind {
                KeyEventKind::Press => InputType::Short,
                KeyEventKind::Repeat => InputType::Repeat,
                _ => continue,
            };
            let mapped = match key.code {
                KeyCode::Up => InputKey::Up,
                KeyCode::Down => InputKey::Down,
                KeyCode::Left => InputKey::Left,
                KeyCode::Right => InputKey::Right,
                KeyCode::Enter => InputKey::Ok,
                KeyCode::Esc | KeyCode::Backspace => InputKey::Back,
                _ => continue,
            };
            return Some(InputEvent::new(mapped, kind));
        }
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
