#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative session state for Delve.
//!
//! The [`World`] owns the grid, the entity registry and the player for the
//! lifetime of a session. Adapters mutate it exclusively through [`apply`]
//! and observe it through the [`query`] module.

mod population;
pub mod registry;

use std::collections::HashSet;

use delve_core::{
    AttackKind, Command, ConfigError, Difficulty, DifficultyProfile, Direction, EndCause,
    EnemyId, Event, Grid, Position, RandomSource, RejectionReason, SessionConfig, SessionStatus,
    HEALTH_CEILING,
};
use delve_system_generation::RoomGenerator;
use delve_system_pathfinding::next_step;
use log::{debug, info};

use crate::registry::{Enemy, EntityRegistry};

/// Step of the turn protocol the world last completed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TurnPhase {
    /// Waiting for the next command.
    AwaitingCommand,
    /// The player's move, attack or pickup has been applied.
    PlayerActionApplied,
    /// Every live enemy has chosen its intended tile.
    EnemiesPlanned,
    /// Enemy moves and attacks have been resolved.
    EnemiesResolved,
    /// The session is over and accepts no further turns.
    SessionEnded,
}

#[derive(Clone, Copy, Debug)]
struct Player {
    position: Position,
    health: i32,
    max_health: i32,
    attack: u32,
}

#[derive(Clone, Copy, Debug)]
struct EnemyPlan {
    enemy: EnemyId,
    from: Position,
    intended: Position,
}

/// Represents the authoritative state of one play session.
#[derive(Debug)]
pub struct World {
    config: SessionConfig,
    difficulty: Difficulty,
    profile: DifficultyProfile,
    grid: Grid,
    registry: EntityRegistry,
    player: Player,
    score: u32,
    turns: u32,
    high_score: u32,
    status: SessionStatus,
    phase: TurnPhase,
}

impl World {
    /// Generates and populates a fresh map for a new session.
    ///
    /// `high_score` is the best score recorded before this session and is
    /// only used to decide whether the final score beats it.
    pub fn new(
        config: SessionConfig,
        difficulty: Difficulty,
        high_score: u32,
        rng: &mut dyn RandomSource,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let profile = difficulty.profile();
        let map = RoomGenerator::new(config.rooms).generate(config.columns, config.rows, rng);
        let registry = population::populate(&map.grid, map.spawn, &profile, rng);

        info!(
            "started {} session on a {}x{} map with {} enemies",
            difficulty.label(),
            config.columns,
            config.rows,
            registry.enemies().len()
        );

        Ok(Self::assemble(
            config,
            difficulty,
            map.grid,
            registry,
            Player {
                position: map.spawn,
                health: config.player_max_health,
                max_health: config.player_max_health,
                attack: config.player_attack,
            },
            high_score,
        ))
    }

    fn assemble(
        config: SessionConfig,
        difficulty: Difficulty,
        grid: Grid,
        registry: EntityRegistry,
        player: Player,
        high_score: u32,
    ) -> Self {
        Self {
            config,
            difficulty,
            profile: difficulty.profile(),
            grid,
            registry,
            player,
            score: 0,
            turns: 0,
            high_score,
            status: SessionStatus::Active,
            phase: TurnPhase::AwaitingCommand,
        }
    }

    fn take_turn(
        &mut self,
        direction: Direction,
        rng: &mut dyn RandomSource,
        out_events: &mut Vec<Event>,
    ) {
        let Some(target) = self
            .player
            .position
            .step(direction)
            .filter(|target| self.grid.contains(*target))
        else {
            out_events.push(Event::CommandRejected {
                reason: RejectionReason::OutOfBounds,
            });
            return;
        };

        let mut plans = Vec::new();
        while self.advance_phase(target, &mut plans, rng, out_events) {}
    }

    /// Runs the protocol step that follows the current phase.
    ///
    /// Returns `false` once the turn has settled back into
    /// `AwaitingCommand` or ended the session.
    fn advance_phase(
        &mut self,
        target: Position,
        plans: &mut Vec<EnemyPlan>,
        rng: &mut dyn RandomSource,
        out_events: &mut Vec<Event>,
    ) -> bool {
        match self.phase {
            TurnPhase::AwaitingCommand => {
                self.resolve_player_action(target, rng, out_events);
                self.turns = self.turns.saturating_add(1);
                self.phase = TurnPhase::PlayerActionApplied;
            }
            TurnPhase::PlayerActionApplied => {
                *plans = self.plan_enemies();
                self.phase = TurnPhase::EnemiesPlanned;
            }
            TurnPhase::EnemiesPlanned => {
                self.resolve_enemies(plans, rng, out_events);
                self.resolve_contact_attacks(rng, out_events);
                self.phase = TurnPhase::EnemiesResolved;
            }
            TurnPhase::EnemiesResolved => {
                self.finish_turn(out_events);
                return false;
            }
            TurnPhase::SessionEnded => return false,
        }
        true
    }

    fn finish_turn(&mut self, out_events: &mut Vec<Event>) {
        self.player.health = self.player.health.min(HEALTH_CEILING);
        out_events.push(Event::TurnCompleted { turn: self.turns });
        debug!(
            "turn {} resolved; player at ({}, {}) with {} hp",
            self.turns,
            self.player.position.x(),
            self.player.position.y(),
            self.player.health
        );

        if self.player.health <= 0 {
            self.end_session(EndCause::PlayerDied, out_events);
        } else {
            self.phase = TurnPhase::AwaitingCommand;
        }
    }

    fn resolve_player_action(
        &mut self,
        target: Position,
        rng: &mut dyn RandomSource,
        out_events: &mut Vec<Event>,
    ) {
        if !self.grid.is_floor(target) {
            out_events.push(Event::WallBumped { at: target });
            return;
        }

        if let Some(enemy) = self.registry.enemy_at(target) {
            let damage = self.player.attack;
            let Some(outcome) = self.registry.damage_enemy(enemy, damage) else {
                return;
            };
            out_events.push(Event::EnemyDamaged {
                enemy,
                damage,
                remaining: outcome.remaining,
            });

            if outcome.killed {
                self.score = self.score.saturating_add(self.config.kill_score);
                out_events.push(Event::EnemyKilled {
                    enemy,
                    at: target,
                    score_awarded: self.config.kill_score,
                });
                self.move_player(target, out_events);
            }
            return;
        }

        if let Some(index) = self.registry.item_at(target) {
            let rolled = rng.roll(self.config.potion_heal);
            let before = self.player.health;
            let after = before
                .saturating_add_unsigned(rolled)
                .min(self.player.max_health);
            self.player.health = after;
            let _ = self.registry.take_item(index);
            out_events.push(Event::PotionConsumed {
                at: target,
                rolled,
                healed: u32::try_from(after.saturating_sub(before)).unwrap_or(0),
            });
        }

        self.move_player(target, out_events);
    }

    fn move_player(&mut self, to: Position, out_events: &mut Vec<Event>) {
        let from = self.player.position;
        self.player.position = to;
        out_events.push(Event::PlayerMoved { from, to });
    }

    fn plan_enemies(&self) -> Vec<EnemyPlan> {
        let positions: Vec<(EnemyId, Position)> = self
            .registry
            .live_enemies()
            .map(|enemy| (enemy.id(), enemy.position()))
            .collect();

        positions
            .iter()
            .map(|&(enemy, from)| {
                let obstacles: Vec<Position> = positions
                    .iter()
                    .filter(|(other, _)| *other != enemy)
                    .map(|(_, position)| *position)
                    .collect();
                EnemyPlan {
                    enemy,
                    from,
                    intended: next_step(&self.grid, &obstacles, from, self.player.position),
                }
            })
            .collect()
    }

    fn resolve_enemies(
        &mut self,
        plans: &[EnemyPlan],
        rng: &mut dyn RandomSource,
        out_events: &mut Vec<Event>,
    ) {
        let target = self.player.position;
        let mut reserved: HashSet<Position> = HashSet::with_capacity(plans.len());

        for plan in plans {
            if plan.intended == target {
                self.strike_player(plan.enemy, AttackKind::Intent, rng, out_events);
                let _ = reserved.insert(plan.from);
            } else if !self.grid.is_floor(plan.intended) || reserved.contains(&plan.intended) {
                let _ = reserved.insert(plan.from);
                if plan.intended != plan.from {
                    out_events.push(Event::EnemyHeld {
                        enemy: plan.enemy,
                        intended: plan.intended,
                    });
                }
            } else {
                let _ = reserved.insert(plan.intended);
                if plan.intended != plan.from && self.registry.move_enemy(plan.enemy, plan.intended)
                {
                    out_events.push(Event::EnemyAdvanced {
                        enemy: plan.enemy,
                        from: plan.from,
                        to: plan.intended,
                    });
                }
            }
        }
    }

    // Runs after every plan resolved, so an enemy that attacked on intent
    // while standing on the player's tile strikes a second time.
    fn resolve_contact_attacks(&mut self, rng: &mut dyn RandomSource, out_events: &mut Vec<Event>) {
        let target = self.player.position;
        let in_contact: Vec<EnemyId> = self
            .registry
            .live_enemies()
            .filter(|enemy| enemy.position() == target)
            .map(Enemy::id)
            .collect();

        for enemy in in_contact {
            self.strike_player(enemy, AttackKind::Contact, rng, out_events);
        }
    }

    fn strike_player(
        &mut self,
        enemy: EnemyId,
        kind: AttackKind,
        rng: &mut dyn RandomSource,
        out_events: &mut Vec<Event>,
    ) {
        let damage = rng.roll(self.profile.enemy_attack);
        self.player.health = self.player.health.saturating_sub_unsigned(damage);
        out_events.push(Event::PlayerAttacked {
            enemy,
            damage,
            kind,
        });
    }

    fn end_session(&mut self, cause: EndCause, out_events: &mut Vec<Event>) {
        self.status = SessionStatus::Ended(cause);
        self.phase = TurnPhase::SessionEnded;
        let new_high_score = self.score > self.high_score;
        info!(
            "session ended ({cause:?}) after {} turns with score {}",
            self.turns, self.score
        );
        out_events.push(Event::SessionEnded {
            cause,
            final_score: self.score,
            new_high_score,
        });
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Every random roll the turn needs is drawn from `rng`, so two worlds built
/// and driven with equally seeded sources stay identical.
pub fn apply(
    world: &mut World,
    command: Command,
    rng: &mut dyn RandomSource,
    out_events: &mut Vec<Event>,
) {
    if world.status.is_over() {
        out_events.push(Event::CommandRejected {
            reason: RejectionReason::SessionOver,
        });
        return;
    }

    match command {
        Command::Move { direction } => world.take_turn(direction, rng, out_events),
        Command::Quit => world.end_session(EndCause::Quit, out_events),
        Command::Unrecognized => out_events.push(Event::CommandRejected {
            reason: RejectionReason::UnrecognizedInput,
        }),
    }
}

/// Builder for hand-authored worlds with a fixed layout and cast.
///
/// Nothing is rolled while building, which makes it the starting point for
/// deterministic scenarios.
#[derive(Clone, Debug)]
pub struct Scenario {
    grid: Grid,
    player: Position,
    player_health: Option<i32>,
    enemies: Vec<(Position, i32)>,
    items: Vec<Position>,
    difficulty: Difficulty,
    config: SessionConfig,
    high_score: u32,
}

impl Scenario {
    /// Starts a scenario on `grid` with the player standing on `player`.
    #[must_use]
    pub fn new(grid: Grid, player: Position) -> Self {
        Self {
            grid,
            player,
            player_health: None,
            enemies: Vec::new(),
            items: Vec::new(),
            difficulty: Difficulty::default(),
            config: SessionConfig::default(),
            high_score: 0,
        }
    }

    /// Adds a live enemy. Enemies keep the order they were added in.
    #[must_use]
    pub fn with_enemy(mut self, position: Position, health: i32) -> Self {
        self.enemies.push((position, health));
        self
    }

    /// Adds a potion.
    #[must_use]
    pub fn with_item(mut self, position: Position) -> Self {
        self.items.push(position);
        self
    }

    /// Selects the difficulty whose attack range enemies roll from.
    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Replaces the session configuration. Grid dimensions are ignored.
    #[must_use]
    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the high score the final score is compared against.
    #[must_use]
    pub fn with_high_score(mut self, high_score: u32) -> Self {
        self.high_score = high_score;
        self
    }

    /// Overrides the player's starting health, which otherwise equals the
    /// configured maximum.
    #[must_use]
    pub fn with_player_health(mut self, health: i32) -> Self {
        self.player_health = Some(health);
        self
    }

    /// Materialises the world.
    #[must_use]
    pub fn build(self) -> World {
        let mut registry = EntityRegistry::default();
        for (position, health) in self.enemies {
            let _ = registry.spawn_enemy(position, health);
        }
        for position in self.items {
            registry.add_item(position);
        }

        let player = Player {
            position: self.player,
            health: self
                .player_health
                .unwrap_or(self.config.player_max_health),
            max_health: self.config.player_max_health,
            attack: self.config.player_attack,
        };

        World::assemble(
            self.config,
            self.difficulty,
            self.grid,
            registry,
            player,
            self.high_score,
        )
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{TurnPhase, World};
    use crate::registry::EntityRegistry;
    use delve_core::{Difficulty, Grid, PlayerSnapshot, SessionSnapshot, SessionStatus};

    /// Captures everything an adapter needs to draw the current frame.
    #[must_use]
    pub fn snapshot(world: &World) -> SessionSnapshot<'_> {
        SessionSnapshot {
            grid: &world.grid,
            player: player(world),
            enemies: world.registry.live_positions(),
            items: world.registry.item_positions(),
            score: world.score,
            turns: world.turns,
            high_score: world.high_score,
            difficulty: world.difficulty,
        }
    }

    /// Provides read-only access to the tile layout.
    #[must_use]
    pub fn grid(world: &World) -> &Grid {
        &world.grid
    }

    /// Provides read-only access to enemies and potions.
    #[must_use]
    pub fn registry(world: &World) -> &EntityRegistry {
        &world.registry
    }

    /// Current player state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            position: world.player.position,
            health: world.player.health,
            max_health: world.player.max_health,
        }
    }

    /// Score accumulated this session.
    #[must_use]
    pub fn score(world: &World) -> u32 {
        world.score
    }

    /// Number of turns that have elapsed.
    #[must_use]
    pub fn turns(world: &World) -> u32 {
        world.turns
    }

    /// Whether the session still accepts commands.
    #[must_use]
    pub fn status(world: &World) -> SessionStatus {
        world.status
    }

    /// Difficulty chosen when the session started.
    #[must_use]
    pub fn difficulty(world: &World) -> Difficulty {
        world.difficulty
    }

    /// High score recorded before the session started.
    #[must_use]
    pub fn high_score(world: &World) -> u32 {
        world.high_score
    }

    /// Last completed step of the turn protocol.
    #[must_use]
    pub fn turn_phase(world: &World) -> TurnPhase {
        world.phase
    }
}
