//! End-to-end behaviour of the public quadtree API.

use std::sync::RwLock;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use spatial::{Aabb, Position, QuadTree, Vector};

fn random_position(rng: &mut StdRng) -> Position {
    if rng.random_bool(0.5) {
        Position::from((rng.random_range(0.0..1.0), rng.random_range(0.0..1.0)))
    } else {
        let x = rng.random_range(0.0..0.9);
        let y = rng.random_range(0.0..0.9);
        let w = rng.random_range(0.0..0.1);
        let h = rng.random_range(0.0..0.1);
        Position::from(Aabb::new(x, y, x + w, y + h))
    }
}

#[test]
fn worked_example() {
    let mut tree = QuadTree::new(Aabb::new(0.0, 0.0, 1.0, 1.0), 8);
    assert!(tree.add("A", Aabb::new(0.1, 0.1, 0.2, 0.2)));
    assert!(tree.add("B", Vector::point(0.7, 0.2)));

    assert_eq!(tree.get_items(Aabb::new(0.11, 0.11, 0.19, 0.19), false), vec![&"A"]);
    assert_eq!(
        tree.get_items(Aabb::new(-0.5, -0.5, 1.5, 1.5), true),
        vec![&"A", &"B"]
    );
}

#[test]
fn insertion_order_does_not_change_membership() {
    let a = Aabb::new(0.2, 0.2, 0.3, 0.3);
    let b = Vector::point(0.25, 0.26);

    let mut ab = QuadTree::new(Aabb::unit(), 8);
    ab.add('a', a);
    ab.add('b', &b);
    let mut ba = QuadTree::new(Aabb::unit(), 8);
    ba.add('b', &b);
    ba.add('a', a);

    for overlap in [false, true] {
        assert_eq!(ab.get_items(a, overlap), ba.get_items(a, overlap));
        assert_eq!(ab.get_items(&b, overlap), ba.get_items(&b, overlap));
    }
    assert_eq!(ab.position_of(&'a'), ba.position_of(&'a'));
}

#[test]
fn random_queries_match_linear_scan() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut tree = QuadTree::new(Aabb::unit(), 6);
    let mut stored = Vec::new();
    for id in 0..500 {
        let position = random_position(&mut rng);
        assert!(tree.add(id, position.clone()));
        stored.push((id, position));
    }
    assert_eq!(tree.item_count(), stored.len());

    for _ in 0..100 {
        let query = random_position(&mut rng);
        let overlap = rng.random_bool(0.5);

        let mut found: Vec<i32> = tree
            .get_items(query.clone(), overlap)
            .into_iter()
            .copied()
            .collect();
        found.sort_unstable();
        let expected: Vec<i32> = stored
            .iter()
            .filter(|(_, position)| position.matches(&query, overlap))
            .map(|(id, _)| *id)
            .collect();
        assert_eq!(found, expected, "query {query} overlap={overlap}");
    }
}

#[test]
fn from_pairs_bounds_and_queries() {
    let pairs = vec![
        (Aabb::new(0.0, 0.0, 1.0, 1.0), (0, 0)),
        (Aabb::new(0.1, 0.1, 1.9, 1.9), (1, 1)),
        (Aabb::new(-1.1, -1.1, 0.0, 0.0), (2, 2)),
        (Aabb::new(-0.5, -0.5, 0.5, 0.5), (3, 3)),
    ];
    let mut tree = QuadTree::from_pairs(pairs, 16).unwrap();
    assert!(tree.add((4, 4), Vector::point(0.45, 0.45)));
    assert_eq!(tree.region().as_tuple(), (-1.1, -1.1, 1.9, 1.9));
    assert_eq!(tree.item_count(), 5);

    let query = Aabb::new(-1.0, -1.0, 0.0, 0.0);
    let strict = tree.get_items(query, false);
    assert_eq!(strict.len(), 2);
    assert!(strict.contains(&&(2, 2)));
    assert!(strict.contains(&&(3, 3)));

    let touching = tree.get_items(query, true);
    assert_eq!(touching.len(), 3);
    assert!(touching.contains(&&(0, 0)));
    assert!(!touching.contains(&&(1, 1)));
}

#[test]
fn from_pairs_rejects_degenerate_input() {
    let empty: Vec<(Position, u8)> = Vec::new();
    assert!(QuadTree::from_pairs(empty, 8).is_none());

    let same_point = vec![((0.3, 0.3), 1), ((0.3, 0.3), 2)];
    assert!(QuadTree::from_pairs(same_point, 8).is_none());

    let line = vec![((0.0, 0.3), 1), ((1.0, 0.3), 2)];
    assert!(QuadTree::from_pairs(line, 8).is_none());

    let unbounded = vec![((0.0, 0.0), 1), ((f64::INFINITY, 1.0), 2)];
    assert!(QuadTree::from_pairs(unbounded, 8).is_none());
}

#[test]
fn from_pairs_skips_nan_positions() {
    let pairs = vec![
        (Aabb::new(0.0, 0.0, f64::NAN, 1.0), "nan"),
        (Aabb::new(0.5, 0.5, 0.6, 0.6), "box"),
    ];
    let tree = QuadTree::from_pairs(pairs, 8).unwrap();
    assert_eq!(tree.region(), &Aabb::new(0.5, 0.5, 0.6, 0.6));
    assert_eq!(tree.item_count(), 1);
    assert_eq!(tree.get_items(Aabb::new(0.0, 0.0, 1.0, 1.0), true), vec![&"box"]);

    let only_nan = vec![((f64::NAN, 0.0), 1), ((0.0, f64::NAN), 2)];
    assert!(QuadTree::from_pairs(only_nan, 8).is_none());
}

#[test]
fn from_pairs_accepts_points() {
    let tree = QuadTree::from_pairs(vec![((0.0, 0.0), "lo"), ((2.0, 4.0), "hi")], 4).unwrap();
    assert_eq!(tree.region(), &Aabb::new(0.0, 0.0, 2.0, 4.0));
    assert_eq!(tree.get_items((2.0, 4.0), false), vec![&"hi"]);
}

#[test]
fn removal_is_explicit() {
    let mut tree = QuadTree::new(Aabb::unit(), 8);
    for i in 0..10 {
        let p = i as f64 / 10.0;
        tree.add(i, (p, p));
    }
    assert_eq!(tree.item_count(), 10);

    for i in (0..10).step_by(2) {
        assert!(tree.remove(&i));
    }
    assert_eq!(tree.item_count(), 5);
    assert!(tree.get_items((0.2, 0.2), true).is_empty());
    assert_eq!(tree.get_items((0.3, 0.3), true), vec![&3]);
}

#[test]
fn concurrent_readers_behind_rwlock() {
    let tree = RwLock::new(QuadTree::new(Aabb::unit(), 8));
    {
        let mut guard = tree.write().unwrap();
        for i in 0..64u32 {
            let x = f64::from(i % 8) / 8.0 + 0.01;
            let y = f64::from(i / 8) / 8.0 + 0.01;
            guard.add(i, (x, y));
        }
    }

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                let guard = tree.read().unwrap();
                assert_eq!(guard.get_items(Aabb::unit(), true).len(), 64);
            });
        }
    });
}
