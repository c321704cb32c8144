use crate::{dispatch, Chip8Error, Chip8State, OpResult};

impl Chip8State {
    /// Fetch, advance, execute, tick timers.
    ///
    /// The program counter moves past the instruction before it runs, and the
    /// timers tick even when the instruction faults. A fault leaves the machine
    /// ready for the next cycle.
    pub fn cycle(&mut self) -> OpResult {
        let instruction = self.fetch();
        self.program_counter = self.program_counter.wrapping_add(2);

        let outcome = dispatch::execute(self, instruction);

        self.tick_timers();
        outcome
    }

    /// Runs `count` cycles and collects the faults in the order they happened.
    pub fn run_cycles(&mut self, count: usize) -> Vec<Chip8Error> {
        (0..count).filter_map(|_| self.cycle().err()).collect()
    }

    fn tick_timers(&mut self) {
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }
}
