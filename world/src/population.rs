//! Places enemies and potions on a freshly generated map.

use std::collections::HashSet;

use delve_core::{DifficultyProfile, Grid, Position, RandomSource};
use delve_system_generation::pick_free_floor;
use log::debug;

use crate::registry::EntityRegistry;

/// Fills a registry according to the difficulty profile.
///
/// Each entity lands on a distinct floor tile that is neither the player's
/// spawn nor already taken. Placement stops early once no free tile remains.
pub(crate) fn populate(
    grid: &Grid,
    spawn: Position,
    profile: &DifficultyProfile,
    rng: &mut dyn RandomSource,
) -> EntityRegistry {
    let mut registry = EntityRegistry::default();
    let mut taken: HashSet<Position> = HashSet::new();
    let _ = taken.insert(spawn);

    let enemy_target = rng.roll(profile.enemy_count);
    for _ in 0..enemy_target {
        let Some(position) = pick_free_floor(grid, rng, |candidate| taken.contains(&candidate))
        else {
            debug!("ran out of free tiles while placing enemies");
            break;
        };
        let health = i32::try_from(rng.roll(profile.enemy_health)).unwrap_or(i32::MAX);
        let _ = registry.spawn_enemy(position, health);
        let _ = taken.insert(position);
    }

    let potion_target = rng.roll(profile.potion_count);
    for _ in 0..potion_target {
        let Some(position) = pick_free_floor(grid, rng, |candidate| taken.contains(&candidate))
        else {
            debug!("ran out of free tiles while placing potions");
            break;
        };
        registry.add_item(position);
        let _ = taken.insert(position);
    }

    debug!(
        "populated map with {} of {enemy_target} enemies and {} of {potion_target} potions",
        registry.enemies().len(),
        registry.items().len()
    );

    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_core::{IntRange, ScriptedRandom, SeededRandom};

    fn room() -> Grid {
        Grid::parse(
            "
            ######
            #....#
            #....#
            ######
            ",
        )
        .expect("layout parses")
    }

    #[test]
    fn entities_never_share_tiles_or_spawn() {
        let grid = room();
        let spawn = Position::new(1, 1);
        let profile = DifficultyProfile::HARD;

        for seed in 0..64 {
            let mut rng = SeededRandom::from_seed(seed);
            let registry = populate(&grid, spawn, &profile, &mut rng);

            let mut seen = HashSet::new();
            let _ = seen.insert(spawn);
            for position in registry
                .enemies()
                .iter()
                .map(|enemy| enemy.position())
                .chain(registry.items().iter().map(|item| item.position()))
            {
                assert!(grid.is_floor(position));
                assert!(seen.insert(position), "seed {seed} stacked entities");
            }
        }
    }

    #[test]
    fn placement_stops_when_the_map_is_full() {
        let grid = room();
        let profile = DifficultyProfile {
            enemy_count: IntRange::exactly(20),
            enemy_health: IntRange::exactly(3),
            enemy_attack: IntRange::exactly(1),
            potion_count: IntRange::exactly(5),
        };
        let mut rng = SeededRandom::from_seed(7);

        let registry = populate(&grid, Position::new(1, 1), &profile, &mut rng);

        assert_eq!(registry.enemies().len(), 7);
        assert!(registry.items().is_empty());
    }

    #[test]
    fn scripted_rolls_select_tiles_and_health() {
        let grid = room();
        let profile = DifficultyProfile {
            enemy_count: IntRange::new(1, 2),
            enemy_health: IntRange::new(3, 9),
            enemy_attack: IntRange::exactly(1),
            potion_count: IntRange::new(0, 1),
        };
        // count, (tile, health) per enemy, potion count, potion tile
        let mut rng = ScriptedRandom::new([2, 2, 5, 0, 7, 1, 3]);

        let registry = populate(&grid, Position::new(1, 1), &profile, &mut rng);

        let placed: Vec<(Position, i32)> = registry
            .enemies()
            .iter()
            .map(|enemy| (enemy.position(), enemy.health()))
            .collect();
        assert_eq!(
            placed,
            vec![(Position::new(4, 1), 5), (Position::new(2, 1), 7)]
        );
        assert_eq!(
            registry
                .items()
                .iter()
                .map(|item| item.position())
                .collect::<Vec<_>>(),
            vec![Position::new(3, 2)]
        );
        assert_eq!(rng.remaining(), 0);
    }
}
