//! Two-player platformer
//!
//! Continuous physics over procedurally placed platforms: intent-driven
//! horizontal velocity, per-tick gravity, jump and double-jump impulses,
//! degradable and oscillating platforms, and timed power-ups. Score-attack
//! mode: the session accumulates score and never terminates on its own.
//!
//! Collections are never mutated while being scanned. Landing hits on
//! degradable platforms are recorded during resolution and the removals
//! applied atomically at tick end.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::GameEvent;
use super::effects::{EffectTimers, TimedEffect};
use crate::config::PlatformerConfig;
use crate::error::SimError;
use crate::input::{Held, PerPlayer, PlayerId};

/// Square player hitbox edge length.
pub const PLAYER_SIZE: f32 = 30.0;
/// Platform band height.
pub const PLATFORM_HEIGHT: f32 = 15.0;
/// Square pickup hitbox edge length.
pub const PICKUP_SIZE: f32 = 30.0;

const GROUND_HEIGHT: f32 = 40.0;
const OSCILLATE_SPEED: f32 = 2.0;
const SPEED_BOOST_MULTIPLIER: f32 = 1.5;
const PICKUP_SCORE: u32 = 100;
const DEGRADABLE_DURABILITY: u8 = 2;
const RANDOM_PLATFORM_COUNT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlatformKind {
    Static,
    /// Slides horizontally, reversing direction at the arena edges.
    Oscillating { direction: f32 },
    /// Removed from the level once its durability is exhausted by landings.
    Degradable { durability: u8 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    /// Top-left corner.
    pub pos: Vec2,
    pub width: f32,
    pub kind: PlatformKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    DoubleJump,
    SpeedBoost,
    Shield,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub pos: Vec2,
    pub kind: PickupKind,
    pub collected: bool,
}

/// Per-player mutable record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    pub pos: Vec2,
    pub vel: Vec2,
    pub airborne: bool,
    pub double_jump_available: bool,
    pub score: u32,
    pub effects: EffectTimers,
    /// Jump edge detection: holding the key must not re-trigger every tick.
    jump_was_held: bool,
}

impl PlayerState {
    fn spawn(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            airborne: true,
            double_jump_available: false,
            score: 0,
            effects: EffectTimers::default(),
            jump_was_held: false,
        }
    }
}

/// Live platformer state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformerState {
    pub config: PlatformerConfig,
    pub platforms: Vec<Platform>,
    pub pickups: Vec<Pickup>,
    pub players: PerPlayer<PlayerState>,
    pub time_ticks: u64,
}

/// Generate the session layout: a full-width ground platform, a batch of
/// random platforms (mostly static, some oscillating or degradable) and one
/// pickup of each kind at seeded positions.
fn generate_level(config: &PlatformerConfig, rng: &mut impl Rng) -> (Vec<Platform>, Vec<Pickup>) {
    let bounds = config.bounds;
    let mut platforms = vec![Platform {
        pos: Vec2::new(0.0, bounds.y - GROUND_HEIGHT),
        width: bounds.x,
        kind: PlatformKind::Static,
    }];

    for _ in 0..RANDOM_PLATFORM_COUNT {
        let x = rng.random_range(0.0..bounds.x - 100.0);
        let y = rng.random_range(0.0..bounds.y - 200.0) + 100.0;
        let width = rng.random_range(0.0..100.0) + 50.0;
        let roll: f32 = rng.random();
        let kind = if roll < 0.7 {
            PlatformKind::Static
        } else if roll < 0.85 {
            PlatformKind::Oscillating { direction: 1.0 }
        } else {
            PlatformKind::Degradable {
                durability: DEGRADABLE_DURABILITY,
            }
        };
        platforms.push(Platform {
            pos: Vec2::new(x, y),
            width,
            kind,
        });
    }

    let pickups = [
        PickupKind::DoubleJump,
        PickupKind::SpeedBoost,
        PickupKind::Shield,
    ]
    .into_iter()
    .map(|kind| Pickup {
        pos: Vec2::new(
            rng.random_range(0.0..bounds.x - PICKUP_SIZE),
            rng.random_range(0.0..bounds.y - 200.0) + 100.0,
        ),
        kind,
        collected: false,
    })
    .collect();

    (platforms, pickups)
}

impl PlatformerState {
    pub fn new(config: PlatformerConfig, rng: &mut impl Rng) -> Result<Self, SimError> {
        config.validate()?;
        let (platforms, pickups) = generate_level(&config, rng);
        let spawn_y = config.bounds.y * 0.5;
        Ok(Self {
            players: PerPlayer::new(
                PlayerState::spawn(Vec2::new(config.bounds.x * 0.125, spawn_y)),
                PlayerState::spawn(Vec2::new(config.bounds.x * 0.875, spawn_y)),
            ),
            config,
            platforms,
            pickups,
            time_ticks: 0,
        })
    }

    /// Advance one tick: platforms move, then each player (one before two)
    /// integrates and resolves, then deferred platform removals and effect
    /// countdowns apply.
    pub fn tick(&mut self, input: &PerPlayer<Held>) -> Vec<GameEvent> {
        self.time_ticks += 1;
        self.advance_oscillating_platforms();

        let mut events = Vec::new();
        let mut landing_hits: Vec<usize> = Vec::new();

        for id in PlayerId::BOTH {
            self.integrate(id, input.get(id));
            self.resolve_landings(id, &mut landing_hits);
            self.collect_pickups(id, &mut events);
        }

        self.apply_platform_damage(landing_hits, &mut events);

        for id in PlayerId::BOTH {
            self.players.get_mut(id).effects.tick();
        }
        events
    }

    fn advance_oscillating_platforms(&mut self) {
        let max_x = self.config.bounds.x;
        for platform in &mut self.platforms {
            if let PlatformKind::Oscillating { direction } = &mut platform.kind {
                let next = platform.pos.x + *direction * OSCILLATE_SPEED;
                if next < 0.0 || next + platform.width > max_x {
                    *direction = -*direction;
                } else {
                    platform.pos.x = next;
                }
            }
        }
    }

    /// Movement integration: horizontal velocity straight from intent
    /// (scaled while a speed boost is active), gravity accumulation, jump
    /// impulse from the ground or one double-jump token, bounds clamp.
    fn integrate(&mut self, id: PlayerId, held: &Held) {
        let gravity = self.config.gravity;
        let jump_force = self.config.jump_force;
        let bounds = self.config.bounds;
        let base_speed = self.config.move_speed;

        let p = self.players.get_mut(id);
        let speed = if p.effects.is_active(TimedEffect::SpeedBoost) {
            base_speed * SPEED_BOOST_MULTIPLIER
        } else {
            base_speed
        };

        p.vel.x = if held.left {
            -speed
        } else if held.right {
            speed
        } else {
            0.0
        };

        let jump_pressed = held.up && !p.jump_was_held;
        p.jump_was_held = held.up;
        if jump_pressed {
            if !p.airborne {
                p.vel.y = jump_force;
                p.airborne = true;
            } else if p.double_jump_available {
                p.vel.y = jump_force;
                p.double_jump_available = false;
            }
            // Airborne with no token: rejected input, silent no-op.
        }

        p.vel.y += gravity;
        p.pos += p.vel;

        p.pos.x = p.pos.x.clamp(0.0, bounds.x - PLAYER_SIZE);
        if p.pos.y > bounds.y - PLAYER_SIZE {
            // Arena floor catches everything, deleted platforms included.
            p.pos.y = bounds.y - PLAYER_SIZE;
            p.vel.y = 0.0;
            p.airborne = false;
            p.double_jump_available = true;
        }
    }

    /// Landing: overlapping a platform's band while moving downward snaps
    /// the player on top, zeroes vertical velocity and restores jump state.
    /// Degradable hits are deferred, and only count when the player was
    /// actually airborne; standing on a platform is not a repeated landing,
    /// and horizontal overlap alone never counts.
    fn resolve_landings(&mut self, id: PlayerId, landing_hits: &mut Vec<usize>) {
        let p = self.players.get(id);
        let (mut pos, mut vel) = (p.pos, p.vel);
        let was_airborne = p.airborne;
        let mut landed = false;

        for (idx, platform) in self.platforms.iter().enumerate() {
            let overlaps = pos.x < platform.pos.x + platform.width
                && pos.x + PLAYER_SIZE > platform.pos.x
                && pos.y + PLAYER_SIZE > platform.pos.y
                && pos.y < platform.pos.y + PLATFORM_HEIGHT;
            if overlaps && vel.y > 0.0 {
                pos.y = platform.pos.y - PLAYER_SIZE;
                vel.y = 0.0;
                landed = true;
                if was_airborne && matches!(platform.kind, PlatformKind::Degradable { .. }) {
                    landing_hits.push(idx);
                }
            }
        }

        let p = self.players.get_mut(id);
        p.pos = pos;
        p.vel = vel;
        if landed {
            p.airborne = false;
            p.double_jump_available = true;
        } else if vel.y > 0.0 {
            // Walked off a ledge.
            p.airborne = true;
        }
    }

    fn collect_pickups(&mut self, id: PlayerId, events: &mut Vec<GameEvent>) {
        let p = self.players.get(id);
        let pos = p.pos;

        let mut collected: Vec<(usize, PickupKind)> = Vec::new();
        for (idx, pickup) in self.pickups.iter().enumerate() {
            if pickup.collected {
                continue;
            }
            let overlaps = pos.x < pickup.pos.x + PICKUP_SIZE
                && pos.x + PLAYER_SIZE > pickup.pos.x
                && pos.y < pickup.pos.y + PICKUP_SIZE
                && pos.y + PLAYER_SIZE > pickup.pos.y;
            if overlaps {
                collected.push((idx, pickup.kind));
            }
        }

        for (idx, kind) in collected {
            self.pickups[idx].collected = true;
            let p = self.players.get_mut(id);
            match kind {
                PickupKind::DoubleJump => p.double_jump_available = true,
                PickupKind::SpeedBoost => p.effects.arm(TimedEffect::SpeedBoost),
                PickupKind::Shield => p.effects.arm(TimedEffect::Shield),
            }
            p.score += PICKUP_SCORE;
            events.push(GameEvent::PickupCollected { player: id, index: idx });
        }
    }

    /// Apply the tick's landing hits: one durability decrement per hit, then
    /// remove exhausted platforms in one pass.
    fn apply_platform_damage(&mut self, landing_hits: Vec<usize>, events: &mut Vec<GameEvent>) {
        if landing_hits.is_empty() {
            return;
        }
        for idx in &landing_hits {
            if let PlatformKind::Degradable { durability } = &mut self.platforms[*idx].kind {
                *durability = durability.saturating_sub(1);
            }
        }

        let mut removed: Vec<usize> = self
            .platforms
            .iter()
            .enumerate()
            .filter(|(_, p)| matches!(p.kind, PlatformKind::Degradable { durability: 0 }))
            .map(|(idx, _)| idx)
            .collect();
        removed.sort_unstable();
        for idx in removed.into_iter().rev() {
            self.platforms.remove(idx);
            events.push(GameEvent::PlatformDestroyed { index: idx });
            log::debug!("degradable platform {idx} destroyed at tick {}", self.time_ticks);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn new_state(seed: u64) -> PlatformerState {
        let mut rng = Pcg32::seed_from_u64(seed);
        PlatformerState::new(PlatformerConfig::default(), &mut rng).unwrap()
    }

    /// Strip the level down to just the ground so physics tests are not at
    /// the mercy of random platform placement.
    fn bare_state() -> PlatformerState {
        let mut state = new_state(1);
        state.platforms.truncate(1);
        state.pickups.clear();
        state
    }

    fn idle_input() -> PerPlayer<Held> {
        PerPlayer::new(Held::default(), Held::default())
    }

    fn settle_on_ground(state: &mut PlatformerState) {
        for _ in 0..300 {
            state.tick(&idle_input());
        }
        assert!(!state.players.get(PlayerId::One).airborne);
    }

    #[test]
    fn test_level_has_ground_platforms_and_pickups() {
        let state = new_state(42);
        assert_eq!(state.platforms.len(), 1 + RANDOM_PLATFORM_COUNT);
        assert_eq!(state.platforms[0].width, state.config.bounds.x);
        assert_eq!(state.pickups.len(), 3);
    }

    #[test]
    fn test_gravity_pulls_down_and_floor_catches() {
        let mut state = bare_state();
        let start_y = state.players.get(PlayerId::One).pos.y;
        state.tick(&idle_input());
        assert!(state.players.get(PlayerId::One).pos.y > start_y);

        settle_on_ground(&mut state);
        let p = state.players.get(PlayerId::One);
        let ground_top = state.config.bounds.y - GROUND_HEIGHT;
        assert!((p.pos.y - (ground_top - PLAYER_SIZE)).abs() < 0.01);
        assert!(p.double_jump_available);
    }

    #[test]
    fn test_jump_and_double_jump_consume_token() {
        let mut state = bare_state();
        settle_on_ground(&mut state);

        let jump = PerPlayer::new(
            Held {
                up: true,
                ..Default::default()
            },
            Held::default(),
        );
        state.tick(&jump);
        {
            let p = state.players.get(PlayerId::One);
            assert!(p.airborne);
            assert!(p.vel.y < 0.0);
        }

        // Release, then press again mid-air: double jump consumes the token.
        state.tick(&idle_input());
        state.tick(&jump);
        {
            let p = state.players.get(PlayerId::One);
            assert!(p.vel.y < 0.0);
            assert!(!p.double_jump_available);
        }

        // Third press mid-air is a silent no-op.
        state.tick(&idle_input());
        let vy_before = state.players.get(PlayerId::One).vel.y;
        state.tick(&jump);
        let p = state.players.get(PlayerId::One);
        assert!(p.vel.y > vy_before); // only gravity applied
    }

    #[test]
    fn test_holding_jump_does_not_burn_double_jump() {
        let mut state = bare_state();
        settle_on_ground(&mut state);

        let jump = PerPlayer::new(
            Held {
                up: true,
                ..Default::default()
            },
            Held::default(),
        );
        state.tick(&jump);
        state.tick(&jump); // still held
        assert!(state.players.get(PlayerId::One).double_jump_available);
    }

    #[test]
    fn test_degradable_platform_removed_after_two_landings() {
        let mut state = bare_state();
        state.platforms.push(Platform {
            pos: Vec2::new(80.0, 400.0),
            width: 120.0,
            kind: PlatformKind::Degradable { durability: 2 },
        });

        // Drop player one onto it twice.
        for landing in 0..2 {
            let p = state.players.get_mut(PlayerId::One);
            p.pos = Vec2::new(100.0, 380.0);
            p.vel = Vec2::new(0.0, 4.0);
            p.airborne = true;
            let events = state.tick(&idle_input());
            if landing == 0 {
                assert_eq!(state.platforms.len(), 2);
                assert!(events.is_empty());
            } else {
                assert_eq!(state.platforms.len(), 1);
                assert!(
                    events
                        .iter()
                        .any(|e| matches!(e, GameEvent::PlatformDestroyed { .. }))
                );
            }
        }
    }

    #[test]
    fn test_horizontal_overlap_does_not_degrade() {
        let mut state = bare_state();
        state.platforms.push(Platform {
            pos: Vec2::new(80.0, 400.0),
            width: 120.0,
            kind: PlatformKind::Degradable { durability: 2 },
        });

        // Moving upward through the band: no landing, no damage.
        let p = state.players.get_mut(PlayerId::One);
        p.pos = Vec2::new(100.0, 405.0);
        p.vel = Vec2::new(0.0, -8.0);
        p.airborne = true;
        state.tick(&idle_input());
        assert!(matches!(
            state.platforms[1].kind,
            PlatformKind::Degradable { durability: 2 }
        ));
    }

    #[test]
    fn test_pickup_collected_exactly_once_first_player_wins() {
        let mut state = bare_state();
        state.pickups.push(Pickup {
            pos: Vec2::new(300.0, 300.0),
            kind: PickupKind::SpeedBoost,
            collected: false,
        });

        // Park both players on top of it in the same tick.
        for id in PlayerId::BOTH {
            let p = state.players.get_mut(id);
            p.pos = Vec2::new(300.0, 300.0);
            p.vel = Vec2::ZERO;
        }
        let events = state.tick(&idle_input());

        let collected: Vec<_> = events
            .iter()
            .filter(|e| matches!(e, GameEvent::PickupCollected { .. }))
            .collect();
        assert_eq!(collected.len(), 1);
        assert!(matches!(
            collected[0],
            GameEvent::PickupCollected {
                player: PlayerId::One,
                ..
            }
        ));
        assert_eq!(state.players.get(PlayerId::One).score, PICKUP_SCORE);
        assert_eq!(state.players.get(PlayerId::Two).score, 0);
        assert!(
            state.players.get(PlayerId::One).effects.is_active(TimedEffect::SpeedBoost)
        );
    }

    #[test]
    fn test_speed_boost_expires_after_duration() {
        use crate::consts::EFFECT_DURATION_TICKS;

        let mut state = bare_state();
        state
            .players
            .get_mut(PlayerId::One)
            .effects
            .arm(TimedEffect::SpeedBoost);

        for _ in 0..EFFECT_DURATION_TICKS {
            assert!(
                state.players.get(PlayerId::One).effects.is_active(TimedEffect::SpeedBoost)
            );
            state.tick(&idle_input());
        }
        assert!(
            !state.players.get(PlayerId::One).effects.is_active(TimedEffect::SpeedBoost)
        );
    }

    #[test]
    fn test_speed_boost_scales_horizontal_velocity() {
        let mut state = bare_state();
        let right = PerPlayer::new(
            Held {
                right: true,
                ..Default::default()
            },
            Held::default(),
        );

        state.tick(&right);
        let normal = state.players.get(PlayerId::One).vel.x;

        state
            .players
            .get_mut(PlayerId::One)
            .effects
            .arm(TimedEffect::SpeedBoost);
        state.tick(&right);
        let boosted = state.players.get(PlayerId::One).vel.x;
        assert!((boosted - normal * SPEED_BOOST_MULTIPLIER).abs() < 0.001);
    }

    #[test]
    fn test_oscillating_platform_reverses_at_edges() {
        let mut state = bare_state();
        state.platforms.push(Platform {
            pos: Vec2::new(state.config.bounds.x - 101.0, 400.0),
            width: 100.0,
            kind: PlatformKind::Oscillating { direction: 1.0 },
        });

        state.tick(&idle_input());
        match state.platforms[1].kind {
            PlatformKind::Oscillating { direction } => assert_eq!(direction, -1.0),
            _ => unreachable!(),
        }
    }
}
