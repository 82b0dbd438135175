use crate::timing::TIMER_PERIOD;

/// Countdown register decremented on cycle deadlines rather than wall time,
/// so its decay is reproducible from a cycle trace alone.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(super) struct CountdownTimer {
    value: u8,
    /// Cycle count at which the next decrement is due.
    deadline: u64,
}

impl Default for CountdownTimer {
    fn default() -> Self {
        Self {
            value: 0,
            deadline: u64::MAX,
        }
    }
}

impl CountdownTimer {
    #[inline]
    pub(super) fn value(&self) -> u8 {
        self.value
    }

    #[inline]
    pub(super) fn is_running(&self) -> bool {
        self.value > 0
    }

    /// Load a new value; the first decrement is one period away.
    pub(super) fn load(&mut self, value: u8, now: u64) {
        self.value = value;
        self.deadline = now + TIMER_PERIOD;
    }

    /// Raise the timer to at least `value`.
    pub(super) fn sustain(&mut self, value: u8, now: u64) {
        if self.value < value {
            self.load(value, now);
        }
    }

    /// Decrement once if the deadline has passed. Overdue periods are not
    /// caught up; the next deadline is one period after the missed one.
    pub(super) fn refresh(&mut self, now: u64) {
        if self.value > 0 && now >= self.deadline {
            self.value -= 1;
            self.deadline += TIMER_PERIOD;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_timer_never_decrements() {
        let mut timer = CountdownTimer::default();
        timer.refresh(u64::MAX);
        assert_eq!(timer.value(), 0);
        assert!(!timer.is_running());
    }

    #[test]
    fn decrements_once_per_deadline() {
        let mut timer = CountdownTimer::default();
        timer.load(3, 100);

        timer.refresh(100 + TIMER_PERIOD - 1);
        assert_eq!(timer.value(), 3);

        timer.refresh(100 + TIMER_PERIOD);
        assert_eq!(timer.value(), 2);

        // Far overdue: still a single step per check.
        timer.refresh(100 + 10 * TIMER_PERIOD);
        assert_eq!(timer.value(), 1);
        timer.refresh(100 + 10 * TIMER_PERIOD);
        assert_eq!(timer.value(), 0);
        timer.refresh(100 + 20 * TIMER_PERIOD);
        assert_eq!(timer.value(), 0);
    }

    #[test]
    fn sustain_only_raises() {
        let mut timer = CountdownTimer::default();
        timer.load(10, 0);
        timer.sustain(4, 50);
        assert_eq!(timer.value(), 10);

        let mut timer = CountdownTimer::default();
        timer.sustain(4, 50);
        assert_eq!(timer.value(), 4);
        timer.refresh(50 + TIMER_PERIOD);
        assert_eq!(timer.value(), 3);
    }
}
