use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

use crawl_core::{Map, Position, find_path};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

const MAZE: &str = "\
###########
#.........#
#.#####.#.#
#.#...#.#.#
#.#.#.#.#.#
#...#...#.#
#####.###.#
#.........#
###########";

/// Reference shortest distance by breadth-first search.
fn bfs_distance(start: Position, goal: Position, walkable: &HashSet<Position>) -> Option<usize> {
    let mut distance = HashMap::from([(start, 0usize)]);
    let mut queue = VecDeque::from([start]);
    while let Some(current) = queue.pop_front() {
        if current == goal {
            return distance.get(&current).copied();
        }
        let here = distance[&current];
        for next in current.cardinal_neighbors() {
            if walkable.contains(&next) && !distance.contains_key(&next) {
                distance.insert(next, here + 1);
                queue.push_back(next);
            }
        }
    }
    None
}

fn assert_valid(path: &[Position], start: Position, goal: Position, walkable: &HashSet<Position>) {
    assert_eq!(path.first(), Some(&start));
    assert_eq!(path.last(), Some(&goal));
    for pair in path.windows(2) {
        assert_eq!(pair[0].manhattan(pair[1]), 1, "steps are cardinal: {pair:?}");
        assert!(walkable.contains(&pair[1]), "{} is not walkable", pair[1]);
    }
}

#[test]
fn paths_through_a_maze_are_shortest() {
    let walkable = Map::from_ascii(MAZE).open_tiles();
    let start = Position::new(1, 1);
    let goals = [
        Position::new(3, 3),
        Position::new(5, 5),
        Position::new(9, 7),
        Position::new(1, 7),
    ];

    for seed in 0..8 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for goal in goals {
            let path = find_path(start, goal, &walkable, &mut rng);
            let shortest = bfs_distance(start, goal, &walkable).expect("goal is reachable");
            assert_valid(&path, start, goal, &walkable);
            assert_eq!(path.len(), shortest + 1, "seed {seed}, goal {goal}");
        }
    }
}

#[test]
fn sealed_goals_yield_no_path() {
    let walkable = Map::from_ascii(MAZE).open_tiles();
    let mut rng = ChaCha8Rng::seed_from_u64(1);

    // Outside the walls.
    assert!(find_path(Position::new(1, 1), Position::new(0, 0), &walkable, &mut rng).is_empty());

    let mut cut = walkable.clone();
    cut.remove(&Position::new(1, 6));
    cut.remove(&Position::new(5, 6));
    cut.remove(&Position::new(9, 6));
    assert!(find_path(Position::new(1, 1), Position::new(3, 7), &cut, &mut rng).is_empty());
}

#[test]
fn start_equal_to_goal_is_a_single_tile() {
    let walkable = Map::from_ascii(MAZE).open_tiles();
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    let here = Position::new(5, 5);

    assert_eq!(find_path(here, here, &walkable, &mut rng), vec![here]);
}

#[test]
fn same_seed_same_path() {
    let walkable = Map::new(crawl_core::MapDimensions::new(12, 12)).open_tiles();
    let start = Position::new(0, 0);
    let goal = Position::new(11, 11);

    let first = find_path(start, goal, &walkable, &mut ChaCha8Rng::seed_from_u64(99));
    let second = find_path(start, goal, &walkable, &mut ChaCha8Rng::seed_from_u64(99));

    assert_eq!(first, second);
    assert_eq!(first.len(), 23);
}

#[test]
fn ties_are_broken_randomly() {
    let walkable = Map::new(crawl_core::MapDimensions::new(6, 6)).open_tiles();
    let start = Position::new(0, 0);
    let goal = Position::new(5, 5);

    let mut distinct = BTreeSet::new();
    for seed in 0..32 {
        let path = find_path(start, goal, &walkable, &mut ChaCha8Rng::seed_from_u64(seed));
        assert_valid(&path, start, goal, &walkable);
        assert_eq!(path.len(), 11);
        distinct.insert(path);
    }

    // 252 shortest paths exist; a fixed tie-break would find only one.
    assert!(distinct.len() > 1, "only {} distinct path(s)", distinct.len());
}
