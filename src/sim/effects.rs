//! Time-boxed ability flags
//!
//! Each ability is an independent countdown armed at pickup time and cleared
//! unconditionally when it reaches zero. Countdowns are decremented once per
//! simulation tick against the tick counter; nothing here touches a wall
//! clock and nothing fires after the owning state is dropped.

use serde::{Deserialize, Serialize};

use crate::consts::EFFECT_DURATION_TICKS;

/// Abilities that self-expire after a fixed duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimedEffect {
    SpeedBoost,
    Shield,
    RapidFire,
    TripleShot,
}

impl TimedEffect {
    pub const ALL: [TimedEffect; 4] = [
        TimedEffect::SpeedBoost,
        TimedEffect::Shield,
        TimedEffect::RapidFire,
        TimedEffect::TripleShot,
    ];

    #[inline]
    fn slot(self) -> usize {
        match self {
            TimedEffect::SpeedBoost => 0,
            TimedEffect::Shield => 1,
            TimedEffect::RapidFire => 2,
            TimedEffect::TripleShot => 3,
        }
    }
}

/// Per-entity countdown table for time-boxed abilities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectTimers {
    remaining: [u32; 4],
}

impl EffectTimers {
    /// Arm an effect for the standard duration. Re-collecting an active
    /// effect re-arms the same timer; durations never stack.
    pub fn arm(&mut self, effect: TimedEffect) {
        self.arm_for(effect, EFFECT_DURATION_TICKS);
    }

    pub fn arm_for(&mut self, effect: TimedEffect, ticks: u32) {
        self.remaining[effect.slot()] = ticks;
    }

    #[inline]
    pub fn is_active(&self, effect: TimedEffect) -> bool {
        self.remaining[effect.slot()] > 0
    }

    /// Ticks left before the effect expires (0 = inactive).
    pub fn remaining(&self, effect: TimedEffect) -> u32 {
        self.remaining[effect.slot()]
    }

    /// Advance all countdowns by one tick.
    pub fn tick(&mut self) {
        for r in &mut self.remaining {
            *r = r.saturating_sub(1);
        }
    }

    /// Currently active effects, for the render snapshot.
    pub fn active(&self) -> Vec<TimedEffect> {
        TimedEffect::ALL
            .into_iter()
            .filter(|&e| self.is_active(e))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arm_then_expire() {
        let mut timers = EffectTimers::default();
        assert!(!timers.is_active(TimedEffect::SpeedBoost));

        timers.arm(TimedEffect::SpeedBoost);
        assert!(timers.is_active(TimedEffect::SpeedBoost));

        // Active for exactly EFFECT_DURATION_TICKS ticks.
        for _ in 0..EFFECT_DURATION_TICKS - 1 {
            timers.tick();
            assert!(timers.is_active(TimedEffect::SpeedBoost));
        }
        timers.tick();
        assert!(!timers.is_active(TimedEffect::SpeedBoost));
    }

    #[test]
    fn test_rearm_does_not_stack() {
        let mut timers = EffectTimers::default();
        timers.arm(TimedEffect::RapidFire);
        for _ in 0..100 {
            timers.tick();
        }
        timers.arm(TimedEffect::RapidFire);
        assert_eq!(
            timers.remaining(TimedEffect::RapidFire),
            EFFECT_DURATION_TICKS
        );
    }

    #[test]
    fn test_timers_are_independent() {
        let mut timers = EffectTimers::default();
        timers.arm_for(TimedEffect::Shield, 10);
        timers.arm_for(TimedEffect::TripleShot, 20);

        for _ in 0..10 {
            timers.tick();
        }
        assert!(!timers.is_active(TimedEffect::Shield));
        assert!(timers.is_active(TimedEffect::TripleShot));
        assert_eq!(timers.active(), vec![TimedEffect::TripleShot]);
    }
}
