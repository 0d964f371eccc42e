//! Head-to-head space duel
//!
//! Each ship is confined to its own half of the arena (player one below the
//! midline, player two above) and fires projectiles across it. Shields
//! absorb damage before health; a ship at zero health ends the session with
//! the shooter as winner. Power-ups spawn on a fixed tick cadence from the
//! session seed, so two sessions with the same seed and inputs see identical
//! spawn sequences.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::GameEvent;
use super::effects::{EffectTimers, TimedEffect};
use crate::config::SpaceConfig;
use crate::error::SimError;
use crate::input::{Held, PerPlayer, PlayerId};

pub const SHIP_SPEED: f32 = 0.15;
pub const HIT_RADIUS: f32 = 0.7;
pub const PICKUP_RADIUS: f32 = 1.0;
pub const PROJECTILE_DAMAGE: i32 = 10;
pub const MAX_HEALTH: i32 = 100;
pub const MAX_SHIELD: i32 = 100;
pub const HEALTH_PICKUP: i32 = 30;
pub const SHIELD_PICKUP: i32 = 50;
/// Projectiles past this |y| are culled.
const PROJECTILE_BOUND: f32 = 10.0;
/// 300ms between shots at 60Hz.
const FIRE_COOLDOWN_TICKS: u32 = 18;
/// 100ms while rapid fire is active.
const RAPID_FIRE_COOLDOWN_TICKS: u32 = 6;
const TRIPLE_SHOT_OFFSETS: [f32; 3] = [-0.3, 0.0, 0.3];
const MAX_ACTIVE_POWERUPS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Health,
    Shield,
    RapidFire,
    TripleShot,
}

impl PowerUpKind {
    const ALL: [PowerUpKind; 4] = [
        PowerUpKind::Health,
        PowerUpKind::Shield,
        PowerUpKind::RapidFire,
        PowerUpKind::TripleShot,
    ];
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    pub health: i32,
    pub shield: i32,
    pub score: u32,
    pub effects: EffectTimers,
    /// Ticks until the ship may fire again.
    pub fire_cooldown: u32,
}

impl Ship {
    fn spawn(pos: Vec2) -> Self {
        Self {
            pos,
            health: MAX_HEALTH,
            shield: 0,
            score: 0,
            effects: EffectTimers::default(),
            fire_cooldown: 0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u64,
    pub owner: PlayerId,
    pub pos: Vec2,
    pub vel: Vec2,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u64,
    pub kind: PowerUpKind,
    pub pos: Vec2,
}

/// Live space duel state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpaceState {
    pub config: SpaceConfig,
    seed: u64,
    pub ships: PerPlayer<Ship>,
    pub projectiles: Vec<Projectile>,
    pub powerups: Vec<PowerUp>,
    pub winner: Option<PlayerId>,
    pub time_ticks: u64,
    next_id: u64,
}

impl SpaceState {
    pub fn new(config: SpaceConfig, seed: u64) -> Result<Self, SimError> {
        config.validate()?;
        let half = config.arena_half_extent;
        Ok(Self {
            config,
            seed,
            ships: PerPlayer::new(
                Ship::spawn(Vec2::new(0.0, -half * 0.5)),
                Ship::spawn(Vec2::new(0.0, half * 0.5)),
            ),
            projectiles: Vec::new(),
            powerups: Vec::new(),
            winner: None,
            time_ticks: 0,
            next_id: 0,
        })
    }

    fn alloc_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Half-plane the ship is confined to: player one is the lower half
    /// (negative y), player two the upper.
    fn y_range(&self, id: PlayerId) -> (f32, f32) {
        let half = self.config.arena_half_extent;
        match id {
            PlayerId::One => (-half, 0.0),
            PlayerId::Two => (0.0, half),
        }
    }

    /// Advance one tick. Returns events and, if a ship was destroyed this
    /// tick, the terminal outcome. The outcome latches: once set, further
    /// ticks are no-ops.
    pub fn tick(&mut self, input: &PerPlayer<Held>) -> (Vec<GameEvent>, Option<super::Outcome>) {
        if let Some(winner) = self.winner {
            return (Vec::new(), Some(super::Outcome { winner }));
        }
        self.time_ticks += 1;
        let mut events = Vec::new();

        for id in PlayerId::BOTH {
            self.steer(id, input.get(id));
        }
        for id in PlayerId::BOTH {
            self.fire(id, input.get(id));
        }
        self.advance_projectiles();
        self.resolve_hits(&mut events);
        for id in PlayerId::BOTH {
            self.collect_powerups(id, &mut events);
        }
        self.spawn_powerup();

        for id in PlayerId::BOTH {
            let ship = self.ships.get_mut(id);
            ship.effects.tick();
            ship.fire_cooldown = ship.fire_cooldown.saturating_sub(1);
        }

        let outcome = self.winner.map(|winner| super::Outcome { winner });
        (events, outcome)
    }

    fn steer(&mut self, id: PlayerId, held: &Held) {
        let half = self.config.arena_half_extent;
        let (y_min, y_max) = self.y_range(id);
        let ship = self.ships.get_mut(id);

        let mut delta = Vec2::ZERO;
        if held.left {
            delta.x -= SHIP_SPEED;
        }
        if held.right {
            delta.x += SHIP_SPEED;
        }
        if held.up {
            delta.y += SHIP_SPEED;
        }
        if held.down {
            delta.y -= SHIP_SPEED;
        }
        ship.pos += delta;
        ship.pos.x = ship.pos.x.clamp(-half, half);
        ship.pos.y = ship.pos.y.clamp(y_min, y_max);
    }

    fn fire(&mut self, id: PlayerId, held: &Held) {
        if !held.fire || self.ships.get(id).fire_cooldown > 0 {
            return;
        }

        let ship = self.ships.get(id);
        let origin = ship.pos;
        let triple = ship.effects.is_active(TimedEffect::TripleShot);
        let cooldown = if ship.effects.is_active(TimedEffect::RapidFire) {
            RAPID_FIRE_COOLDOWN_TICKS
        } else {
            FIRE_COOLDOWN_TICKS
        };
        // Player one fires upward across the midline, player two downward.
        let dir = match id {
            PlayerId::One => 1.0,
            PlayerId::Two => -1.0,
        };
        let vel = Vec2::new(0.0, dir * self.config.bullet_speed);

        let offsets: &[f32] = if triple { &TRIPLE_SHOT_OFFSETS } else { &[0.0] };
        for &dx in offsets {
            let pid = self.alloc_id();
            self.projectiles.push(Projectile {
                id: pid,
                owner: id,
                pos: origin + Vec2::new(dx, 0.0),
                vel,
            });
        }
        self.ships.get_mut(id).fire_cooldown = cooldown;
    }

    fn advance_projectiles(&mut self) {
        for p in &mut self.projectiles {
            p.pos += p.vel;
        }
        self.projectiles.retain(|p| p.pos.y.abs() <= PROJECTILE_BOUND);
    }

    /// Projectile-ship hits, scanned in projectile insertion order. Damage
    /// goes to the shield first; only a shieldless ship loses health. The
    /// first hit that drops health to zero latches the outcome and stops
    /// further resolution.
    fn resolve_hits(&mut self, events: &mut Vec<GameEvent>) {
        let mut consumed: Vec<u64> = Vec::new();

        for i in 0..self.projectiles.len() {
            let (owner, pos) = {
                let p = &self.projectiles[i];
                (p.owner, p.pos)
            };
            let target_id = owner.opponent();
            let target = self.ships.get(target_id);
            if pos.distance(target.pos) > HIT_RADIUS {
                continue;
            }

            consumed.push(self.projectiles[i].id);
            let target = self.ships.get_mut(target_id);
            let absorbed = target.shield > 0;
            if absorbed {
                target.shield = (target.shield - PROJECTILE_DAMAGE).max(0);
            } else {
                target.health -= PROJECTILE_DAMAGE;
            }
            events.push(GameEvent::ProjectileHit {
                shooter: owner,
                absorbed_by_shield: absorbed,
            });

            if target.health <= 0 {
                self.ships.get_mut(owner).score += 1;
                self.winner = Some(owner);
                log::info!("{owner} wins the duel at tick {}", self.time_ticks);
                break;
            }
        }

        self.projectiles.retain(|p| !consumed.contains(&p.id));
    }

    fn collect_powerups(&mut self, id: PlayerId, events: &mut Vec<GameEvent>) {
        let ship_pos = self.ships.get(id).pos;
        let mut taken: Vec<u64> = Vec::new();

        for (idx, pu) in self.powerups.iter().enumerate() {
            if pu.pos.distance(ship_pos) > PICKUP_RADIUS {
                continue;
            }
            taken.push(pu.id);
            let ship = self.ships.get_mut(id);
            match pu.kind {
                PowerUpKind::Health => {
                    ship.health = (ship.health + HEALTH_PICKUP).min(MAX_HEALTH);
                }
                PowerUpKind::Shield => {
                    ship.shield = (ship.shield + SHIELD_PICKUP).min(MAX_SHIELD);
                }
                PowerUpKind::RapidFire => ship.effects.arm(TimedEffect::RapidFire),
                PowerUpKind::TripleShot => ship.effects.arm(TimedEffect::TripleShot),
            }
            events.push(GameEvent::PickupCollected { player: id, index: idx });
        }

        self.powerups.retain(|p| !taken.contains(&p.id));
    }

    /// Seeded spawn cadence: every `powerup_spawn_interval_ticks` ticks, if
    /// fewer than the cap are on the field, spawn one at a position and kind
    /// drawn from an RNG derived from the session seed and the tick counter.
    fn spawn_powerup(&mut self) {
        if self.time_ticks % u64::from(self.config.powerup_spawn_interval_ticks) != 0 {
            return;
        }
        if self.powerups.len() >= MAX_ACTIVE_POWERUPS {
            return;
        }

        let mut rng = Pcg32::seed_from_u64(self.seed.wrapping_add(self.time_ticks));
        let extent = self.config.arena_half_extent * 0.6;
        let kind = PowerUpKind::ALL[rng.random_range(0..PowerUpKind::ALL.len())];
        let pos = Vec2::new(
            rng.random_range(-extent..extent),
            rng.random_range(-extent..extent),
        );
        let id = self.alloc_id();
        self.powerups.push(PowerUp { id, kind, pos });
        log::debug!("power-up {kind:?} spawned at {pos} (tick {})", self.time_ticks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_state(seed: u64) -> SpaceState {
        SpaceState::new(SpaceConfig::default(), seed).unwrap()
    }

    fn idle() -> PerPlayer<Held> {
        PerPlayer::new(Held::default(), Held::default())
    }

    fn fire_one() -> PerPlayer<Held> {
        PerPlayer::new(
            Held {
                fire: true,
                ..Default::default()
            },
            Held::default(),
        )
    }

    #[test]
    fn test_ships_confined_to_own_half() {
        let mut state = new_state(1);
        let up = PerPlayer::new(
            Held {
                up: true,
                ..Default::default()
            },
            Held::default(),
        );
        // Push player one upward far longer than needed to cross the midline.
        for _ in 0..2000 {
            state.tick(&up);
        }
        assert!(state.ships.get(PlayerId::One).pos.y <= 0.0);

        let down = PerPlayer::new(
            Held::default(),
            Held {
                down: true,
                ..Default::default()
            },
        );
        for _ in 0..2000 {
            state.tick(&down);
        }
        assert!(state.ships.get(PlayerId::Two).pos.y >= 0.0);
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let mut state = new_state(1);
        state.tick(&fire_one());
        assert_eq!(state.projectiles.len(), 1);

        // Held fire during cooldown adds nothing.
        for _ in 0..FIRE_COOLDOWN_TICKS - 1 {
            state.tick(&fire_one());
        }
        assert_eq!(state.projectiles.len(), 1);

        state.tick(&fire_one());
        assert_eq!(state.projectiles.len(), 2);
    }

    #[test]
    fn test_triple_shot_spawns_three_offset_projectiles() {
        let mut state = new_state(1);
        state
            .ships
            .get_mut(PlayerId::One)
            .effects
            .arm(TimedEffect::TripleShot);
        state.tick(&fire_one());

        assert_eq!(state.projectiles.len(), 3);
        let origin_x = state.ships.get(PlayerId::One).pos.x;
        let mut xs: Vec<f32> = state.projectiles.iter().map(|p| p.pos.x - origin_x).collect();
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        for (got, want) in xs.iter().zip(TRIPLE_SHOT_OFFSETS) {
            assert!((got - want).abs() < 0.001);
        }
    }

    #[test]
    fn test_rapid_fire_shortens_cooldown() {
        let mut state = new_state(1);
        state
            .ships
            .get_mut(PlayerId::One)
            .effects
            .arm(TimedEffect::RapidFire);
        state.tick(&fire_one());
        for _ in 0..RAPID_FIRE_COOLDOWN_TICKS {
            state.tick(&fire_one());
        }
        assert_eq!(state.projectiles.len(), 2);
    }

    #[test]
    fn test_shield_absorbs_before_health() {
        let mut state = new_state(1);
        state.ships.get_mut(PlayerId::Two).shield = 30;

        // Land three hits by teleporting a projectile onto the target.
        for _ in 0..3 {
            let target = state.ships.get(PlayerId::Two).pos;
            let id = state.alloc_id();
            state.projectiles.push(Projectile {
                id,
                owner: PlayerId::One,
                pos: target,
                vel: Vec2::ZERO,
            });
            let (events, _) = state.tick(&idle());
            assert!(events.iter().any(|e| matches!(
                e,
                GameEvent::ProjectileHit {
                    absorbed_by_shield: true,
                    ..
                }
            )));
        }
        let ship = state.ships.get(PlayerId::Two);
        assert_eq!(ship.shield, 0);
        assert_eq!(ship.health, MAX_HEALTH);

        // Fourth hit lands on health.
        let target = state.ships.get(PlayerId::Two).pos;
        let id = state.alloc_id();
        state.projectiles.push(Projectile {
            id,
            owner: PlayerId::One,
            pos: target,
            vel: Vec2::ZERO,
        });
        state.tick(&idle());
        assert_eq!(state.ships.get(PlayerId::Two).health, MAX_HEALTH - PROJECTILE_DAMAGE);
    }

    #[test]
    fn test_kill_latches_outcome() {
        let mut state = new_state(1);
        state.ships.get_mut(PlayerId::Two).health = PROJECTILE_DAMAGE;

        let target = state.ships.get(PlayerId::Two).pos;
        let id = state.alloc_id();
        state.projectiles.push(Projectile {
            id,
            owner: PlayerId::One,
            pos: target,
            vel: Vec2::ZERO,
        });
        let (_, outcome) = state.tick(&idle());
        assert_eq!(
            outcome,
            Some(crate::sim::Outcome {
                winner: PlayerId::One
            })
        );
        assert_eq!(state.ships.get(PlayerId::One).score, 1);

        // Subsequent ticks keep reporting the same winner and change nothing.
        let ticks_before = state.time_ticks;
        let (events, outcome) = state.tick(&fire_one());
        assert!(events.is_empty());
        assert_eq!(outcome.map(|o| o.winner), Some(PlayerId::One));
        assert_eq!(state.time_ticks, ticks_before);
    }

    #[test]
    fn test_powerups_spawn_on_cadence_and_cap() {
        let mut state = new_state(7);
        let interval = state.config.powerup_spawn_interval_ticks as usize;
        // Park the ships in the corners so nothing gets collected.
        let half = state.config.arena_half_extent;
        state.ships.get_mut(PlayerId::One).pos = Vec2::new(half, -half);
        state.ships.get_mut(PlayerId::Two).pos = Vec2::new(half, half);

        for _ in 0..interval {
            state.tick(&idle());
        }
        assert_eq!(state.powerups.len(), 1);

        // Keep ticking well past the point the cap binds.
        for _ in 0..interval * 5 {
            state.tick(&idle());
        }
        assert_eq!(state.powerups.len(), MAX_ACTIVE_POWERUPS);
    }

    #[test]
    fn test_health_pickup_caps_at_max() {
        let mut state = new_state(1);
        state.ships.get_mut(PlayerId::One).health = 90;
        let pos = state.ships.get(PlayerId::One).pos;
        let id = state.alloc_id();
        state.powerups.push(PowerUp {
            id,
            kind: PowerUpKind::Health,
            pos,
        });
        state.tick(&idle());
        assert_eq!(state.ships.get(PlayerId::One).health, MAX_HEALTH);
        assert!(state.powerups.is_empty());
    }

    #[test]
    fn test_same_seed_same_inputs_identical_run() {
        let script = |state: &mut SpaceState| {
            let mut held = Held::default();
            for t in 0..600u32 {
                held.fire = t % 3 == 0;
                held.left = t % 5 < 2;
                held.up = t % 7 < 3;
                state.tick(&PerPlayer::new(held, held));
            }
        };

        let mut a = new_state(99);
        let mut b = new_state(99);
        script(&mut a);
        script(&mut b);

        let ja = serde_json::to_string(&a).unwrap();
        let jb = serde_json::to_string(&b).unwrap();
        assert_eq!(ja, jb);
    }
}
