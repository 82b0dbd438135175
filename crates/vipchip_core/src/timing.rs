//! Cycle-cost model.
//!
//! Costs approximate how long the COSMAC VIP interpreter spent on each
//! instruction. They are tabulated in VIP machine cycles and reported in
//! clocks of the 1.76 MHz CDP1802, which is also the unit of the timer
//! deadlines. Hosts pace emulation by converting returned clocks to wall
//! time (`clocks / CLOCK_HZ` seconds).

/// CDP1802 clock on the COSMAC VIP.
pub const CLOCK_HZ: u32 = 1_760_000;
/// Each 1802 machine cycle takes eight clocks.
pub const CLOCKS_PER_MACHINE_CYCLE: u32 = 8;
/// Rate at which the delay and sound timers count down.
pub const TIMER_HZ: u32 = 60;
/// Clocks between two timer decrements.
pub const TIMER_PERIOD: u64 = (CLOCK_HZ / TIMER_HZ) as u64;
/// Clocks the host should run per presented frame.
pub const CYCLES_PER_FRAME: u32 = CLOCK_HZ / TIMER_HZ;

/// Fetch and decode overhead shared by every instruction.
pub const FETCH: u32 = 40;
/// Cost of one cycle spent waiting in `FX0A`.
pub const KEY_POLL: u32 = 18;

pub const CLS: u32 = 3_078;
pub const RET: u32 = 10;
pub const SYS: u32 = 0;
pub const JP: u32 = 12;
pub const CALL: u32 = 26;
pub const SKIP: u32 = 10;
pub const SKIP_REG: u32 = 14;
/// Extra cost of a skip that is taken.
pub const SKIP_TAKEN: u32 = 4;
pub const LD_IMM: u32 = 6;
pub const ADD_IMM: u32 = 10;
pub const ALU: u32 = 44;
pub const LD_I: u32 = 12;
pub const JP_V0: u32 = 22;
pub const RND: u32 = 36;
pub const DRAW_BASE: u32 = 26;
pub const DRAW_ROW: u32 = 46;
pub const SKIP_KEY: u32 = 14;
pub const LD_DT: u32 = 10;
pub const WAIT_KEY: u32 = 18;
pub const SET_TIMER: u32 = 10;
pub const ADD_I: u32 = 16;
pub const LD_FONT: u32 = 16;
pub const BCD: u32 = 92;
pub const BLOCK_BASE: u32 = 14;
pub const BLOCK_REG: u32 = 14;

/// Convert machine cycles to clocks.
#[inline]
pub const fn clocks(machine_cycles: u32) -> u32 {
    machine_cycles * CLOCKS_PER_MACHINE_CYCLE
}

/// Cost of a conditional skip.
#[inline]
pub const fn skip(base: u32, taken: bool) -> u32 {
    if taken {
        base + SKIP_TAKEN
    } else {
        base
    }
}

/// `DXYN` scales with the sprite height.
#[inline]
pub const fn draw(rows: u32) -> u32 {
    DRAW_BASE + DRAW_ROW * rows
}

/// `FX55` / `FX65` scale with the number of registers moved.
#[inline]
pub const fn block(registers: u32) -> u32 {
    BLOCK_BASE + BLOCK_REG * registers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_period_is_one_sixtieth_of_a_second() {
        assert_eq!(TIMER_PERIOD, 29_333);
        assert_eq!(CYCLES_PER_FRAME as u64, TIMER_PERIOD);
    }

    #[test]
    fn data_dependent_costs_grow_linearly() {
        assert_eq!(draw(0), DRAW_BASE);
        assert_eq!(draw(15) - draw(14), DRAW_ROW);
        assert_eq!(block(16) - block(1), 15 * BLOCK_REG);
        assert_eq!(skip(SKIP, true), SKIP + SKIP_TAKEN);
        assert_eq!(clocks(FETCH + LD_IMM), 368);
    }
}
