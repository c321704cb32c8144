use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::{self, Stylize},
    terminal,
};
use std::{
    io::{self, stdout, Stdout, Write},
    time::Duration,
};

use chip8vm_core::{
    key_for_char, Chip8Display, Chip8Keyboard, Control, Framebuffer, Keypad, DISPLAY_HEIGHT,
    DISPLAY_WIDTH,
};

/// Draws the framebuffer with two block characters per pixel, redrawing only
/// the cells that changed since the last frame.
pub struct TerminalDisplay {
    stdout: Stdout,
    last_frame: Option<Framebuffer>,
}

impl TerminalDisplay {
    pub fn new() -> io::Result<Self> {
        let mut stdout = stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(terminal::ClearType::All),
            cursor::Hide
        )?;
        Ok(Self {
            stdout,
            last_frame: None,
        })
    }
}

impl Chip8Display for TerminalDisplay {
    fn present(&mut self, framebuffer: &Framebuffer) -> io::Result<()> {
        for y in 0..DISPLAY_HEIGHT {
            for x in 0..DISPLAY_WIDTH {
                let lit = framebuffer.pixel(x, y);
                if let Some(last) = &self.last_frame {
                    if last.pixel(x, y) == lit {
                        continue;
                    }
                }
                queue!(self.stdout, cursor::MoveTo(x as u16 * 2, y as u16))?;
                if lit {
                    queue!(self.stdout, style::PrintStyledContent("██".yellow()))?;
                } else {
                    queue!(self.stdout, style::PrintStyledContent("  ".black()))?;
                }
            }
        }
        self.stdout.flush()?;
        self.last_frame = Some(framebuffer.clone());
        Ok(())
    }
}

impl Drop for TerminalDisplay {
    fn drop(&mut self) {
        let _ = execute!(self.stdout, cursor::Show, terminal::LeaveAlternateScreen);
    }
}

/// Maps QWERTY key events onto the hex keypad.
///
/// Terminals that support the kitty keyboard protocol report releases, and
/// keys stay held until theirs arrives. Everywhere else a key counts as held
/// only for the frame its press arrived in.
pub struct TerminalKeyboard {
    reports_releases: bool,
}

impl TerminalKeyboard {
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let reports_releases = terminal::supports_keyboard_enhancement()?;
        if reports_releases {
            execute!(
                stdout(),
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
        }
        Ok(Self { reports_releases })
    }
}

impl Chip8Keyboard for TerminalKeyboard {
    fn update(&mut self, keypad: &mut Keypad) -> io::Result<Control> {
        if !self.reports_releases {
            keypad.release_all();
        }
        while event::poll(Duration::ZERO)? {
            let Event::Key(key_event) = event::read()? else {
                continue;
            };
            if apply_key_event(keypad, key_event) == Control::Quit {
                return Ok(Control::Quit);
            }
        }
        Ok(Control::Continue)
    }
}

impl Drop for TerminalKeyboard {
    fn drop(&mut self) {
        if self.reports_releases {
            let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
        }
        let _ = terminal::disable_raw_mode();
    }
}

/// Raw mode swallows SIGINT, so Ctrl-C shows up here as a plain key.
fn apply_key_event(keypad: &mut Keypad, key_event: KeyEvent) -> Control {
    match key_event.code {
        KeyCode::Esc => Control::Quit,
        KeyCode::Char('c' | 'C') if key_event.modifiers.contains(KeyModifiers::CONTROL) => {
            Control::Quit
        }
        KeyCode::Char(c) => {
            if let Some(key) = key_for_char(c) {
                keypad.set(key, key_event.kind != KeyEventKind::Release);
            }
            Control::Continue
        }
        _ => Control::Continue,
    }
}
