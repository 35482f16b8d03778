//! Crossterm-based input layer.
//!
//! Raw-mode line editing with history and inline ghost-text
//! autocompletion: the first matching command name or directory entry is
//! shown in gray after the cursor, and Tab (or Right at end of line)
//! accepts it.

use std::io::{self, Stdout, Write};

use crossterm::{
    cursor::MoveToColumn,
    event::{read, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{self, Clear, ClearType},
};
use unicode_width::UnicodeWidthChar;

use super::completer;

#[derive(Debug)]
pub enum InputResult {
    Line(String),
    Interrupt,
    Eof,
}

#[derive(Debug, Default)]
struct LineBuffer {
    text: String,
    cursor: usize,
}

impl LineBuffer {
    fn new() -> Self {
        Self::default()
    }

    fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    fn byte_pos(&self) -> usize {
        self.text
            .char_indices()
            .nth(self.cursor)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    fn insert(&mut self, c: char) {
        let at = self.byte_pos();
        self.text.insert(at, c);
        self.cursor += 1;
    }

    fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let at = self.byte_pos();
        self.text.remove(at);
        true
    }

    fn delete(&mut self) -> bool {
        if self.cursor >= self.text.chars().count() {
            return false;
        }
        let at = self.byte_pos();
        self.text.remove(at);
        true
    }

    fn move_left(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    fn move_right(&mut self) -> bool {
        if self.cursor < self.text.chars().count() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    fn move_home(&mut self) {
        self.cursor = 0;
    }

    fn move_end(&mut self) {
        self.cursor = self.text.chars().count();
    }

    fn at_end(&self) -> bool {
        self.cursor == self.text.chars().count()
    }

    fn as_str(&self) -> &str {
        &self.text
    }

    fn set_text(&mut self, text: String) {
        self.text = text;
        self.cursor = self.text.chars().count();
    }
}

struct History {
    entries: Vec<String>,
    position: Option<usize>,
    saved_line: String,
}

impl History {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            position: None,
            saved_line: String::new(),
        }
    }

    fn add(&mut self, line: String) {
        if line.is_empty() {
            return;
        }
        if self.entries.last().map(|s| s.as_str()) == Some(&line) {
            return;
        }
        self.entries.push(line);
    }

    fn up(&mut self, current: &str) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        match self.position {
            None => {
                self.saved_line = current.to_string();
                self.position = Some(self.entries.len() - 1);
                Some(&self.entries[self.entries.len() - 1])
            }
            Some(pos) => {
                if pos > 0 {
                    self.position = Some(pos - 1);
                    Some(&self.entries[pos - 1])
                } else {
                    Some(&self.entries[0])
                }
            }
        }
    }

    fn down(&mut self) -> Option<&str> {
        match self.position {
            None => None,
            Some(pos) => {
                if pos + 1 < self.entries.len() {
                    self.position = Some(pos + 1);
                    Some(&self.entries[pos + 1])
                } else {
                    self.position = None;
                    Some(&self.saved_line)
                }
            }
        }
    }

    fn reset_position(&mut self) {
        self.position = None;
        self.saved_line.clear();
    }
}

/// Display width of a string, skipping ANSI escape sequences.
fn visible_width(s: &str) -> usize {
    let mut width = 0;
    let mut in_escape = false;
    for c in s.chars() {
        if in_escape {
            if c.is_ascii_alphabetic() {
                in_escape = false;
            }
            continue;
        }
        if c == '\x1b' {
            in_escape = true;
            continue;
        }
        width += UnicodeWidthChar::width(c).unwrap_or(0);
    }
    width
}

pub struct TermInput {
    buffer: LineBuffer,
    history: History,
    commands: Vec<&'static str>,
    entries: Vec<String>,
}

impl TermInput {
    /// `commands` is the sorted registered-name list used for first-word
    /// completion.
    pub fn new(commands: Vec<&'static str>) -> Self {
        Self {
            buffer: LineBuffer::new(),
            history: History::new(),
            commands,
            entries: Vec::new(),
        }
    }

    /// Refresh the sorted entry names of the current directory, used for
    /// path completion.
    pub fn set_entries(&mut self, entries: Vec<String>) {
        self.entries = entries;
    }

    pub fn add_history(&mut self, line: String) {
        self.history.add(line);
    }

    pub fn read_line(&mut self, prompt: &str) -> io::Result<InputResult> {
        let mut stdout = io::stdout();
        let prompt_width = visible_width(prompt);
        print!("{}", prompt);
        stdout.flush()?;

        self.buffer.clear();
        self.history.reset_position();

        terminal::enable_raw_mode()?;
        let result = self.input_loop(&mut stdout, prompt, prompt_width);
        let _ = terminal::disable_raw_mode();
        print!("\r\n");
        stdout.flush()?;
        result
    }

    fn ghost(&self) -> String {
        let entries: Vec<&str> = self.entries.iter().map(String::as_str).collect();
        completer::ghost_text(self.buffer.as_str(), &self.commands, &entries)
    }

    /// Splice the current suggestion into the buffer; false when there is
    /// nothing to accept.
    fn accept_ghost(&mut self) -> bool {
        let suffix = self.ghost();
        if suffix.is_empty() {
            return false;
        }
        let spliced = completer::apply_suggestion(self.buffer.as_str(), &suffix);
        self.buffer.set_text(spliced);
        true
    }

    fn input_loop(
        &mut self,
        stdout: &mut Stdout,
        prompt: &str,
        prompt_width: usize,
    ) -> io::Result<InputResult> {
        loop {
            let Event::Key(key) = read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }

            match key.code {
                KeyCode::Enter => {
                    return Ok(InputResult::Line(self.buffer.as_str().to_string()));
                }
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(InputResult::Interrupt);
                }
                KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    if self.buffer.as_str().is_empty() {
                        return Ok(InputResult::Eof);
                    }
                    self.buffer.delete();
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.buffer.insert(c);
                }
                KeyCode::Backspace => {
                    self.buffer.backspace();
                }
                KeyCode::Delete => {
                    self.buffer.delete();
                }
                KeyCode::Tab => {
                    self.accept_ghost();
                }
                KeyCode::Left => {
                    self.buffer.move_left();
                }
                KeyCode::Right => {
                    // At end of line, Right accepts the suggestion.
                    if !self.buffer.move_right() {
                        self.accept_ghost();
                    }
                }
                KeyCode::Home => self.buffer.move_home(),
                KeyCode::End => self.buffer.move_end(),
                KeyCode::Up => {
                    if let Some(line) = self.history.up(&self.buffer.text.clone()) {
                        let line = line.to_string();
                        self.buffer.set_text(line);
                    }
                }
                KeyCode::Down => {
                    if let Some(line) = self.history.down() {
                        let line = line.to_string();
                        self.buffer.set_text(line);
                    }
                }
                _ => {}
            }

            self.redraw(stdout, prompt, prompt_width)?;
        }
    }

    fn redraw(&self, stdout: &mut Stdout, prompt: &str, prompt_width: usize) -> io::Result<()> {
        execute!(stdout, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
        write!(stdout, "{}{}", prompt, self.buffer.as_str())?;

        // Ghost text only makes sense at the end of the line.
        if self.buffer.at_end() {
            let ghost = self.ghost();
            if !ghost.is_empty() {
                write!(stdout, "\x1b[90m{}\x1b[0m", ghost)?;
            }
        }

        let cursor_width: usize = self
            .buffer
            .as_str()
            .chars()
            .take(self.buffer.cursor)
            .map(|c| UnicodeWidthChar::width(c).unwrap_or(0))
            .sum();
        execute!(
            stdout,
            MoveToColumn((prompt_width + cursor_width) as u16)
        )?;
        stdout.flush()
    }
}
