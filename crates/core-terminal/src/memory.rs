//! Headless terminal with scripted input and an inspectable character grid.
//!
//! Input is a queue of `Scripted` steps consumed one per `poll_key` call. When
//! the script runs dry `poll_key` fails, so a loop that never terminates on its
//! own surfaces as an error instead of hanging a test.

use crate::{Surface, Terminal};
use anyhow::{Result, bail};
use core_events::{KeyCode, KeyEvent, ResizeFlag};
use std::collections::VecDeque;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scripted {
    Key(KeyEvent),
    /// Poll times out with no input.
    Idle,
    /// Terminal changes size; the poll itself yields no key.
    Resize(u16, u16),
}

/// Recorded driver operations, in call order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Enter,
    Leave,
    Clear,
    Flush,
    Print { x: i32, y: i32, text: String },
}

#[derive(Debug)]
pub struct MemoryTerminal {
    columns: u16,
    rows: u16,
    grid: Vec<Vec<char>>,
    script: VecDeque<Scripted>,
    ops: Vec<Op>,
    entered: bool,
    enter_count: usize,
    polls: usize,
    resize: Option<ResizeFlag>,
}

impl MemoryTerminal {
    pub fn new(columns: u16, rows: u16) -> Self {
        Self {
            columns,
            rows,
            grid: blank_grid(columns, rows),
            script: VecDeque::new(),
            ops: Vec::new(),
            entered: false,
            enter_count: 0,
            polls: 0,
            resize: None,
        }
    }

    pub fn push(&mut self, step: Scripted) -> &mut Self {
        self.script.push_back(step);
        self
    }

    pub fn push_key(&mut self, code: KeyCode) -> &mut Self {
        self.push(Scripted::Key(KeyEvent::plain(code)))
    }

    pub fn push_event(&mut self, key: KeyEvent) -> &mut Self {
        self.push(Scripted::Key(key))
    }

    pub fn push_idle(&mut self) -> &mut Self {
        self.push(Scripted::Idle)
    }

    pub fn push_resize(&mut self, columns: u16, rows: u16) -> &mut Self {
        self.push(Scripted::Resize(columns, rows))
    }

    /// Resize immediately and notify the subscribed flag.
    pub fn resize(&mut self, columns: u16, rows: u16) {
        self.columns = columns;
        self.rows = rows;
        self.grid = blank_grid(columns, rows);
        if let Some(flag) = &self.resize {
            flag.signal();
        }
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// Number of `Print` operations recorded so far.
    pub fn print_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, Op::Print { .. }))
            .count()
    }

    /// Current contents of screen row `y` (empty when out of range).
    pub fn row(&self, y: usize) -> String {
        self.grid
            .get(y)
            .map(|r| r.iter().collect())
            .unwrap_or_default()
    }

    pub fn is_entered(&self) -> bool {
        self.entered
    }

    pub fn enter_count(&self) -> usize {
        self.enter_count
    }

    pub fn polls(&self) -> usize {
        self.polls
    }

    pub fn remaining_script(&self) -> usize {
        self.script.len()
    }
}

fn blank_grid(columns: u16, rows: u16) -> Vec<Vec<char>> {
    vec![vec![' '; usize::from(columns)]; usize::from(rows)]
}

impl Surface for MemoryTerminal {
    fn print_at(&mut self, x: i32, y: i32, text: &str) -> Result<()> {
        self.ops.push(Op::Print {
            x,
            y,
            text: text.to_string(),
        });
        let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
            return Ok(());
        };
        if let Some(row) = self.grid.get_mut(y) {
            for (cell, c) in row.iter_mut().skip(x).zip(text.chars()) {
                *cell = c;
            }
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.ops.push(Op::Clear);
        self.grid = blank_grid(self.columns, self.rows);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.ops.push(Op::Flush);
        Ok(())
    }
}

impl Terminal for MemoryTerminal {
    fn size(&self) -> Result<(u16, u16)> {
        Ok((self.columns, self.rows))
    }

    fn enter(&mut self) -> Result<()> {
        if !self.entered {
            self.ops.push(Op::Enter);
            self.entered = true;
            self.enter_count += 1;
        }
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if self.entered {
            self.ops.push(Op::Leave);
            self.entered = false;
        }
        Ok(())
    }

    fn poll_key(&mut self, _timeout: Duration) -> Result<Option<KeyEvent>> {
        self.polls += 1;
        match self.script.pop_front() {
            Some(Scripted::Key(key)) => Ok(Some(key)),
            Some(Scripted::Idle) => Ok(None),
            Some(Scripted::Resize(columns, rows)) => {
                self.resize(columns, rows);
                Ok(None)
            }
            None => bail!("input script exhausted after {} polls", self.polls),
        }
    }

    fn subscribe_resize(&mut self, flag: ResizeFlag) {
        self.resize = Some(flag);
    }
}
