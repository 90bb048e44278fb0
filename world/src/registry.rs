//! Ownership of enemies and potions, keyed by position.

use delve_core::{EnemyId, Position};

/// Enemy tracked by the registry.
///
/// Dead enemies stay in storage so identifiers remain stable for the rest of
/// the session, but they are invisible to every occupancy query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Enemy {
    id: EnemyId,
    position: Position,
    health: i32,
    alive: bool,
}

impl Enemy {
    /// Identifier of the enemy, equal to its registry index.
    #[must_use]
    pub const fn id(&self) -> EnemyId {
        self.id
    }

    /// Tile the enemy occupies.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Remaining hit points. May be zero or negative once dead.
    #[must_use]
    pub const fn health(&self) -> i32 {
        self.health
    }

    /// Reports whether the enemy can still act and be targeted.
    #[must_use]
    pub const fn is_alive(&self) -> bool {
        self.alive
    }
}

/// Potion lying on the floor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Item {
    position: Position,
}

impl Item {
    /// Tile the potion lies on.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }
}

/// Outcome of damaging a live enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnemyDamage {
    /// Hit points left after the hit.
    pub remaining: i32,
    /// Whether this hit flipped the enemy from alive to dead.
    pub killed: bool,
}

/// Collections of enemies and potions for the current map.
#[derive(Clone, Debug, Default)]
pub struct EntityRegistry {
    enemies: Vec<Enemy>,
    items: Vec<Item>,
}

impl EntityRegistry {
    /// Adds a live enemy and returns its identifier.
    pub fn spawn_enemy(&mut self, position: Position, health: i32) -> EnemyId {
        let id = EnemyId::new(u32::try_from(self.enemies.len()).unwrap_or(u32::MAX));
        self.enemies.push(Enemy {
            id,
            position,
            health,
            alive: true,
        });
        id
    }

    /// Drops a potion onto the provided tile.
    pub fn add_item(&mut self, position: Position) {
        self.items.push(Item { position });
    }

    /// Live enemy standing on `position`, if any.
    #[must_use]
    pub fn enemy_at(&self, position: Position) -> Option<EnemyId> {
        self.live_enemies()
            .find(|enemy| enemy.position == position)
            .map(Enemy::id)
    }

    /// Index of the potion lying on `position`, if any.
    ///
    /// Indices are only valid until the next [`EntityRegistry::take_item`].
    #[must_use]
    pub fn item_at(&self, position: Position) -> Option<usize> {
        self.items.iter().position(|item| item.position == position)
    }

    /// Looks up an enemy regardless of liveness.
    #[must_use]
    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        let index = usize::try_from(id.get()).ok()?;
        self.enemies.get(index)
    }

    /// Applies `amount` damage to a live enemy.
    ///
    /// Returns `None` for unknown or already dead enemies, so the kill flag
    /// is reported exactly once per enemy.
    pub fn damage_enemy(&mut self, id: EnemyId, amount: u32) -> Option<EnemyDamage> {
        let enemy = self.enemy_mut(id)?;
        if !enemy.alive {
            return None;
        }

        enemy.health = enemy.health.saturating_sub_unsigned(amount);
        let killed = enemy.health <= 0;
        if killed {
            enemy.alive = false;
        }

        Some(EnemyDamage {
            remaining: enemy.health,
            killed,
        })
    }

    /// Moves a live enemy to `destination`. Returns whether it moved.
    pub fn move_enemy(&mut self, id: EnemyId, destination: Position) -> bool {
        match self.enemy_mut(id) {
            Some(enemy) if enemy.alive => {
                enemy.position = destination;
                true
            }
            _ => false,
        }
    }

    /// Removes the potion at `index`, shifting later potions down.
    pub fn take_item(&mut self, index: usize) -> Option<Item> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// Live enemies in registry order.
    pub fn live_enemies(&self) -> impl Iterator<Item = &Enemy> + '_ {
        self.enemies.iter().filter(|enemy| enemy.alive)
    }

    /// Positions of live enemies in registry order.
    #[must_use]
    pub fn live_positions(&self) -> Vec<Position> {
        self.live_enemies().map(Enemy::position).collect()
    }

    /// Positions of the potions still on the map.
    #[must_use]
    pub fn item_positions(&self) -> Vec<Position> {
        self.items.iter().map(Item::position).collect()
    }

    /// Every enemy ever spawned on this map, dead or alive.
    #[must_use]
    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    /// Potions still lying on the map.
    #[must_use]
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    fn enemy_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        let index = usize::try_from(id.get()).ok()?;
        self.enemies.get_mut(index)
    }
}
