//! Window-stack controller: owns the terminal and an ordered stack of windows
//! and runs the single-threaded input/draw loop until the stack empties.
//!
//! Per tick: apply a pending resize, poll one key, dispatch it to the top
//! window (pop it when closed, push its child when one was spawned), redraw
//! the top if dirty, then run the periodic hooks and sleep. Resizes and pops
//! repaint the whole stack bottom to top.
//!
//! Terminal mode is held through `TerminalGuard` for the whole loop, so every
//! exit path (including errors) restores the terminal.

mod stack;

use core_events::ResizeFlag;
use core_layout::Rect;
use core_terminal::{Terminal, TerminalGuard};
use core_window::{ControllerId, WindowBehavior, WindowKind};
use stack::WindowStack;
use thiserror::Error;
use tracing::{debug, info, warn};

pub use core_config::ControllerConfig;

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("window stack is empty; push a window before running")]
    EmptyStack,
    #[error(transparent)]
    Terminal(#[from] anyhow::Error),
}

/// Extension point invoked once per loop tick, after the top window's own
/// `tick`.
pub trait ControllerHooks {
    fn on_tick(&mut self, _top: &mut WindowKind) {}
}

/// Default no-op hooks implementation.
pub struct NoopHooks;

impl ControllerHooks for NoopHooks {}

pub struct WindowController<T: Terminal> {
    terminal: T,
    stack: WindowStack,
    config: ControllerConfig,
    resize: ResizeFlag,
    hooks: Box<dyn ControllerHooks>,
}

impl<T: Terminal> WindowController<T> {
    pub fn new(terminal: T) -> Result<Self, ControllerError> {
        Self::with_config(terminal, ControllerConfig::default())
    }

    pub fn with_config(terminal: T, config: ControllerConfig) -> Result<Self, ControllerError> {
        let (columns, rows) = terminal.size()?;
        Ok(Self {
            terminal,
            stack: WindowStack::new(ControllerId::next(), Rect::screen(columns, rows)),
            config,
            resize: ResizeFlag::new(),
            hooks: Box::new(NoopHooks),
        })
    }

    pub fn set_hooks(&mut self, hooks: Box<dyn ControllerHooks>) {
        self.hooks = hooks;
    }

    pub fn id(&self) -> ControllerId {
        self.stack.id
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Handle for reporting resizes from outside the driver (another thread or
    /// a signal handler).
    pub fn resize_flag(&self) -> ResizeFlag {
        self.resize.clone()
    }

    pub fn terminal(&self) -> &T {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut T {
        &mut self.terminal
    }

    /// Terminal bounds windows are currently attached to.
    pub fn bounds(&self) -> Rect {
        self.stack.bounds
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.len() == 0
    }

    pub fn current_window(&self) -> Option<&WindowKind> {
        self.stack.top()
    }

    pub fn current_window_mut(&mut self) -> Option<&mut WindowKind> {
        self.stack.top_mut()
    }

    /// Attach `window` to the current bounds and make it the top window.
    pub fn push(&mut self, window: impl Into<WindowKind>) {
        self.stack.push(window.into());
    }

    /// Remove the top window. The new top (if any) drops its child and is
    /// marked for redraw.
    pub fn pop(&mut self) -> Option<WindowKind> {
        self.stack.pop()
    }

    /// Run until the stack is empty. Fails immediately on an empty stack.
    pub fn run(&mut self) -> Result<(), ControllerError> {
        if self.stack.len() == 0 {
            return Err(ControllerError::EmptyStack);
        }
        if self.config.register_resize_handler {
            self.terminal.subscribe_resize(self.resize.clone());
        }
        let (columns, rows) = self.terminal.size()?;
        let bounds = Rect::screen(columns, rows);
        if bounds != self.stack.bounds {
            self.stack.reattach(bounds);
        }

        info!(
            target: "controller",
            windows = self.stack.len(),
            columns,
            rows,
            "run_start"
        );
        let mut guard = TerminalGuard::enter(&mut self.terminal)?;
        let outcome = drive(
            &mut self.stack,
            &mut *guard,
            &self.resize,
            &self.config,
            self.hooks.as_mut(),
        );
        let restored = guard.release();
        match &outcome {
            Ok(()) => info!(target: "controller", "run_complete"),
            Err(e) => warn!(target: "controller", error = %e, windows = self.stack.len(), "run_aborted"),
        }
        outcome?;
        restored?;
        Ok(())
    }
}

fn drive<T: Terminal>(
    stack: &mut WindowStack,
    term: &mut T,
    resize: &ResizeFlag,
    config: &ControllerConfig,
    hooks: &mut dyn ControllerHooks,
) -> anyhow::Result<()> {
    stack.repaint(term)?;

    loop {
        if resize.take() {
            let (columns, rows) = term.size()?;
            stack.reattach(Rect::screen(columns, rows));
            stack.repaint(term)?;
        }

        if let Some(key) = term.poll_key(config.poll_timeout)? {
            if config.quit_on_interrupt && key.is_interrupt() {
                let popped = stack.clear();
                info!(target: "controller", popped, "interrupt_close_all");
                break;
            }
            let Some(top) = stack.top_mut() else { break };
            top.handle_input(&key);
            if top.base().is_closed() {
                stack.pop();
                // the closed window's cells may lie outside its parent
                stack.repaint(term)?;
            } else if let Some(child) = top.base_mut().child.take() {
                debug!(target: "controller", key = %key, "child_push");
                stack.push(*child);
            }
        }

        // A close or spawn still runs this tick's redraw, tick and hooks on the
        // new top rather than skipping to the next poll.
        let Some(top) = stack.top_mut() else { break };
        if top.base().redraw {
            top.draw(term)?;
        }
        top.tick();
        hooks.on_tick(top);

        if !config.idle_sleep.is_zero() {
            std::thread::sleep(config.idle_sleep);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_events::{KeyCode, KeyEvent, KeyModifiers};
    use core_terminal::MemoryTerminal;
    use core_terminal::memory::Op;
    use core_window::{TextWindow, Window};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    fn fast() -> ControllerConfig {
        ControllerConfig {
            poll_timeout: Duration::ZERO,
            idle_sleep: Duration::ZERO,
            ..ControllerConfig::default()
        }
    }

    fn controller(term: MemoryTerminal) -> WindowController<MemoryTerminal> {
        WindowController::with_config(term, fast()).unwrap()
    }

    /// Records the top window title at every tick.
    #[derive(Clone, Default)]
    struct TitleLog(Arc<Mutex<Vec<String>>>);

    impl ControllerHooks for TitleLog {
        fn on_tick(&mut self, top: &mut WindowKind) {
            self.0.lock().unwrap().push(top.base().title.clone());
        }
    }

    #[test]
    fn run_on_empty_stack_is_config_error() {
        let mut c = controller(MemoryTerminal::new(80, 24));
        assert!(matches!(c.run(), Err(ControllerError::EmptyStack)));
        assert_eq!(c.terminal().enter_count(), 0);
    }

    #[test]
    fn escape_on_single_window_ends_loop() {
        let mut term = MemoryTerminal::new(80, 24);
        term.push_key(KeyCode::Char('a')).push_key(KeyCode::Esc);
        let mut c = controller(term);
        let w = Window::builder().title("Test").width(50).height(20).build(c.bounds());
        c.push(w);

        let top = c.current_window().unwrap().base();
        assert_eq!(top.outer_rect(), Rect::new(15, 2, 50, 20));
        assert_eq!(top.content_rect(), Rect::new(16, 3, 48, 18));

        c.run().unwrap();
        assert!(c.is_empty());
        assert_eq!(c.terminal().polls(), 2);
        assert!(!c.terminal().is_entered());
        let ops = c.terminal().ops();
        assert_eq!(ops.first(), Some(&Op::Enter));
        assert_eq!(ops.last(), Some(&Op::Leave));
    }

    #[test]
    fn unrelated_key_keeps_window_open() {
        let mut term = MemoryTerminal::new(80, 24);
        term.push_key(KeyCode::Char('a'));
        let mut c = controller(term);
        c.push(Window::new("Test", c.bounds()));
        // script exhausts after the key: surfaces as a driver error
        let err = c.run().unwrap_err();
        assert!(matches!(err, ControllerError::Terminal(_)));
        assert_eq!(c.len(), 1);
        assert!(!c.current_window().unwrap().base().is_closed());
        assert!(!c.terminal().is_entered());
    }

    #[test]
    fn pop_marks_new_top_dirty() {
        let mut c = controller(MemoryTerminal::new(80, 24));
        c.push(Window::new("one", c.bounds()));
        c.current_window_mut().unwrap().base_mut().redraw = false;
        c.push(Window::new("two", c.bounds()));
        assert_eq!(c.len(), 2);
        let popped = c.pop().unwrap();
        assert_eq!(popped.base().owner(), None);
        let top = c.current_window().unwrap().base();
        assert_eq!(top.title, "one");
        assert!(top.redraw);
        assert_eq!(top.owner(), Some(c.id()));
    }

    #[test]
    fn bound_child_is_pushed_and_closed() {
        let mut term = MemoryTerminal::new(80, 24);
        term.push_key(KeyCode::Char('?'))
            .push_key(KeyCode::Esc)
            .push_key(KeyCode::Esc);
        let mut c = controller(term);
        let bounds = c.bounds();
        let mut main = Window::new("Main", bounds);
        main.bind_child(KeyCode::Char('?'), move || {
            TextWindow::new("help", Window::new("Help", bounds)).into()
        });
        c.push(main);
        let log = TitleLog::default();
        c.set_hooks(Box::new(log.clone()));

        c.run().unwrap();
        assert!(c.is_empty());
        let titles = log.0.lock().unwrap().clone();
        assert_eq!(titles, vec!["Help", "Main"]);
    }

    /// Base spawns Mid on `1`, Mid spawns Top on `2`.
    fn three_deep(c: &mut WindowController<MemoryTerminal>) {
        let bounds = c.bounds();
        let mut base = Window::new("Base", bounds);
        base.bind_child(KeyCode::Char('1'), move || {
            let mut mid = Window::builder().title("Mid").width(30).height(10).build(bounds);
            mid.bind_child(KeyCode::Char('2'), move || {
                Window::builder()
                    .title("Top")
                    .width(20)
                    .height(6)
                    .build(bounds)
                    .into()
            });
            mid.into()
        });
        c.push(base);
    }

    #[test]
    fn closing_top_modal_keeps_lower_windows_on_screen() {
        let mut term = MemoryTerminal::new(80, 24);
        term.push_key(KeyCode::Char('1'))
            .push_key(KeyCode::Char('2'))
            .push_key(KeyCode::Esc);
        let mut c = controller(term);
        three_deep(&mut c);

        // script runs out after the Esc
        assert!(c.run().is_err());
        assert_eq!(c.len(), 2);
        let term = c.terminal();
        assert!(term.row(0).contains(" Base "));
        assert!(term.row(7).contains(" Mid "));
        assert!(!term.row(9).contains(" Top "));
        // Base's border is intact left of Mid
        assert!(term.row(10).starts_with('|'));
    }

    #[test]
    fn each_escape_closes_one_level() {
        let mut term = MemoryTerminal::new(80, 24);
        term.push_key(KeyCode::Char('1'))
            .push_key(KeyCode::Char('2'))
            .push_key(KeyCode::Esc)
            .push_key(KeyCode::Esc)
            .push_key(KeyCode::Esc);
        let mut c = controller(term);
        three_deep(&mut c);
        let log = TitleLog::default();
        c.set_hooks(Box::new(log.clone()));

        c.run().unwrap();
        assert!(c.is_empty());
        let titles = log.0.lock().unwrap().clone();
        assert_eq!(titles, vec!["Mid", "Top", "Mid", "Base"]);
    }

    #[test]
    fn interrupt_closes_everything() {
        let mut term = MemoryTerminal::new(80, 24);
        term.push_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CTRL));
        let mut c = controller(term);
        for title in ["a", "b", "c"] {
            c.push(Window::new(title, c.bounds()));
        }
        c.run().unwrap();
        assert!(c.is_empty());
        assert_eq!(c.terminal().polls(), 1);
    }

    #[test]
    fn interrupt_is_plain_input_when_disabled() {
        let mut term = MemoryTerminal::new(80, 24);
        term.push_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CTRL))
            .push_key(KeyCode::Esc);
        let config = ControllerConfig {
            quit_on_interrupt: false,
            ..fast()
        };
        let mut c = WindowController::with_config(term, config).unwrap();
        c.push(Window::new("a", c.bounds()));
        c.run().unwrap();
        assert_eq!(c.terminal().polls(), 2);
    }

    #[test]
    fn resize_reattaches_windows() {
        let mut term = MemoryTerminal::new(80, 24);
        term.push_resize(120, 40);
        let mut c = controller(term);
        c.push(Window::builder().width(0.5).build(c.bounds()));
        let _ = c.run();
        assert_eq!(c.bounds(), Rect::screen(120, 40));
        let top = c.current_window().unwrap().base();
        assert_eq!(top.term(), Rect::screen(120, 40));
        assert_eq!(top.outer_rect().width, 60);
        let clears = c.terminal().ops().iter().filter(|op| **op == Op::Clear).count();
        assert_eq!(clears, 2);
    }

    #[test]
    fn resize_ignored_without_registration() {
        let mut term = MemoryTerminal::new(80, 24);
        term.push_resize(120, 40);
        let config = ControllerConfig {
            register_resize_handler: false,
            ..fast()
        };
        let mut c = WindowController::with_config(term, config).unwrap();
        c.push(Window::new("a", c.bounds()));
        let _ = c.run();
        assert_eq!(c.bounds(), Rect::screen(80, 24));
    }

    #[test]
    fn external_resize_signal_is_drained() {
        let mut term = MemoryTerminal::new(80, 24);
        term.push_idle();
        let config = ControllerConfig {
            register_resize_handler: false,
            ..fast()
        };
        let mut c = WindowController::with_config(term, config).unwrap();
        c.push(Window::new("a", c.bounds()));
        c.terminal_mut().resize(100, 30);
        c.resize_flag().signal();
        let _ = c.run();
        assert_eq!(c.bounds(), Rect::screen(100, 30));
        assert!(!c.resize_flag().is_pending());
    }
}
