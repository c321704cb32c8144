use std::{
    io, thread,
    time::{Duration, Instant},
};

use crate::{Chip8Display, Chip8Keyboard, Chip8State, Control};

/// Sleeps the caller onto a fixed grid of ticks.
struct Timer {
    interval: Duration,
    next_tick: Instant,
}

impl Timer {
    fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_tick: Instant::now() + interval,
        }
    }

    fn wait_for_tick(&mut self) {
        if self.interval.is_zero() {
            return;
        }
        let now = Instant::now();
        if now < self.next_tick {
            thread::sleep(self.next_tick - now);
            self.next_tick += self.interval;
        } else {
            // fell behind, don't try to catch up
            self.next_tick = now + self.interval;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterpreterConfig {
    pub cycles_per_frame: u32,
    /// Zero runs frames back to back.
    pub frame_interval: Duration,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            cycles_per_frame: 10,
            frame_interval: Duration::from_secs(1) / 60,
        }
    }
}

impl InterpreterConfig {
    pub fn with_frame_rate(cycles_per_frame: u32, frames_per_second: u32) -> Self {
        let frame_interval = match frames_per_second {
            0 => Duration::ZERO,
            fps => Duration::from_secs(1) / fps,
        };
        Self {
            cycles_per_frame,
            frame_interval,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub cycles: u64,
    pub faults: u64,
}

/// Drives a machine frame by frame: input, a batch of cycles, output, wait.
pub struct Chip8Interpreter<D: Chip8Display, K: Chip8Keyboard> {
    pub config: InterpreterConfig,
    pub display: D,
    pub keyboard: K,
}

impl<D: Chip8Display, K: Chip8Keyboard> Chip8Interpreter<D, K> {
    pub fn new(config: InterpreterConfig, display: D, keyboard: K) -> Self {
        Self {
            config,
            display,
            keyboard,
        }
    }

    /// Runs until the keyboard asks to quit or `max_frames` have been shown.
    /// Faults are logged at warn level and execution carries on.
    pub fn run(
        &mut self,
        state: &mut Chip8State,
        max_frames: Option<u64>,
    ) -> io::Result<RunSummary> {
        let mut summary = RunSummary::default();
        let mut timer = Timer::new(self.config.frame_interval);

        while max_frames.map_or(true, |max| summary.frames < max) {
            if self.keyboard.update(&mut state.keypad)? == Control::Quit {
                break;
            }

            for _ in 0..self.config.cycles_per_frame {
                if let Err(fault) = state.cycle() {
                    log::warn!("{fault}");
                    summary.faults += 1;
                }
                summary.cycles += 1;
            }

            self.display.present(&state.framebuffer)?;
            summary.frames += 1;

            timer.wait_for_tick();
        }

        Ok(summary)
    }
}
