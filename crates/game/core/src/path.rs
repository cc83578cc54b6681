//! A* pathfinding over a set of walkable cells.
//!
//! Movement is 4-directional with unit step cost and a Manhattan heuristic.
//! When several frontier nodes share the lowest `f = g + h`, one of them is
//! picked uniformly at random. This keeps a pack of monsters from all
//! funnelling into the same tie-broken corridor. Paths are therefore only
//! reproducible when the injected RNG is seeded.

use std::collections::{HashMap, HashSet};

use rand::{Rng, RngCore};

use crate::geometry::Position;

#[derive(Clone, Copy, Debug)]
struct Frontier {
    position: Position,
    g: u32,
    f: u32,
}

/// Finds a path from `start` to `goal` through `walkable`.
///
/// Returns the full sequence `start..=goal`, or an empty vector when the goal
/// cannot be reached. `start` itself does not have to be walkable (it is
/// usually occupied by the unit searching), but `goal` and every intermediate
/// cell must be.
pub fn find_path(
    start: Position,
    goal: Position,
    walkable: &HashSet<Position>,
    rng: &mut dyn RngCore,
) -> Vec<Position> {
    if start == goal {
        return vec![start];
    }
    if !walkable.contains(&goal) {
        return Vec::new();
    }

    let mut open = vec![Frontier {
        position: start,
        g: 0,
        f: start.manhattan(goal),
    }];
    let mut best_g: HashMap<Position, u32> = HashMap::from([(start, 0)]);
    let mut came_from: HashMap<Position, Position> = HashMap::new();
    let mut closed: HashSet<Position> = HashSet::new();

    while !open.is_empty() {
        let index = pick_lowest(&open, rng);
        let current = open.swap_remove(index);

        if current.position == goal {
            let path = reconstruct(&came_from, goal);
            tracing::trace!(?start, ?goal, len = path.len(), "path found");
            return path;
        }
        if !closed.insert(current.position) {
            continue;
        }

        for next in current.position.cardinal_neighbors() {
            if !walkable.contains(&next) || closed.contains(&next) {
                continue;
            }
            let g = current.g + 1;
            if best_g.get(&next).is_some_and(|&known| known <= g) {
                continue;
            }
            best_g.insert(next, g);
            came_from.insert(next, current.position);
            open.push(Frontier {
                position: next,
                g,
                f: g + next.manhattan(goal),
            });
        }
    }

    tracing::trace!(?start, ?goal, "no path");
    Vec::new()
}

/// Index of a uniformly chosen frontier node among those with minimal `f`.
fn pick_lowest(open: &[Frontier], rng: &mut dyn RngCore) -> usize {
    let lowest = open.iter().map(|n| n.f).min().unwrap_or(0);
    let tied: Vec<usize> = open
        .iter()
        .enumerate()
        .filter(|(_, n)| n.f == lowest)
        .map(|(i, _)| i)
        .collect();
    tied[rng.gen_range(0..tied.len())]
}

fn reconstruct(came_from: &HashMap<Position, Position>, goal: Position) -> Vec<Position> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&previous) = came_from.get(&current) {
        path.push(previous);
        current = previous;
    }
    path.reverse();
    path
}
