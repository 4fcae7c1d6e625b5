//! qtree - populate a quadtree with random entries and run queries against it.
//!
//! Usage: `qtree [config.toml]` (defaults to `qtree.toml`, created if missing).

use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use geometry::{Aabb, Position, Vector};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use spatial::{QuadTree, TreeConfig};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

/// Demo configuration: the tree plus how to exercise it.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
struct DemoConfig {
    #[serde(default)]
    tree: TreeConfig,
    #[serde(default)]
    demo: DemoSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
struct DemoSettings {
    /// Number of entries to insert.
    #[serde(default = "default_items")]
    items: usize,
    /// Number of random queries to run.
    #[serde(default = "default_queries")]
    queries: usize,
    /// RNG seed, so runs are reproducible.
    #[serde(default = "default_seed")]
    seed: u64,
    /// Largest box edge, as a fraction of the region size.
    #[serde(default = "default_max_box_size")]
    max_box_size: f64,
    /// Share of entries stored as points rather than boxes.
    #[serde(default = "default_point_ratio")]
    point_ratio: f64,
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            items: default_items(),
            queries: default_queries(),
            seed: default_seed(),
            max_box_size: default_max_box_size(),
            point_ratio: default_point_ratio(),
        }
    }
}

fn default_items() -> usize {
    10_000
}
fn default_queries() -> usize {
    20
}
fn default_seed() -> u64 {
    42
}
fn default_max_box_size() -> f64 {
    0.05
}
fn default_point_ratio() -> f64 {
    0.5
}

impl DemoConfig {
    /// Load configuration from `path` or write and use defaults.
    fn load(path: &Path) -> anyhow::Result<Self> {
        let config: Self = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            toml::from_str(&contents).with_context(|| format!("parsing {}", path.display()))?
        } else {
            info!("No {} found, creating default config", path.display());
            let default_config = Self::default();
            std::fs::write(path, toml::to_string_pretty(&default_config)?)?;
            default_config
        };
        config.tree.validate()?;
        anyhow::ensure!(
            (0.0..=1.0).contains(&config.demo.point_ratio),
            "point_ratio must be within 0..=1"
        );
        Ok(config)
    }
}

/// Random point or box inside `region`.
fn random_position(rng: &mut StdRng, region: &Aabb, settings: &DemoSettings) -> Position {
    let x = rng.random_range(region.min_x()..=region.max_x());
    let y = rng.random_range(region.min_y()..=region.max_y());
    if rng.random_bool(settings.point_ratio) {
        return Vector::point(x, y).into();
    }
    let w = rng.random::<f64>() * settings.max_box_size * region.width();
    let h = rng.random::<f64>() * settings.max_box_size * region.height();
    Aabb::new(x, y, (x + w).min(region.max_x()), (y + h).min(region.max_y())).into()
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("qtree v{}", env!("CARGO_PKG_VERSION"));

    let path = std::env::args().nth(1).unwrap_or_else(|| "qtree.toml".to_string());
    let config = DemoConfig::load(Path::new(&path))?;
    let settings = &config.demo;
    let region = config.tree.region();
    info!("Loaded configuration");
    info!("  Region: {}", region);
    info!("  Max depth: {}", config.tree.max_depth);
    info!("  Items: {}, queries: {}", settings.items, settings.queries);

    let mut rng = StdRng::seed_from_u64(settings.seed);
    let mut tree = QuadTree::from_config(&config.tree)?;
    let mut pairs = Vec::with_capacity(settings.items);

    let start = Instant::now();
    for id in 0..settings.items {
        let position = random_position(&mut rng, &region, settings);
        if !tree.add(id, position.clone()) {
            warn!(id, %position, "Entry rejected");
            continue;
        }
        pairs.push((position, id));
    }
    info!(
        "Inserted {} entries into {} nodes in {:?}",
        tree.item_count(),
        tree.node_count(),
        start.elapsed()
    );

    for n in 0..settings.queries {
        let query = random_position(&mut rng, &region, settings);
        let overlap = n % 2 == 1;
        let start = Instant::now();
        let found = tree.get_items(query.clone(), overlap);
        let elapsed = start.elapsed();
        let expected = pairs
            .iter()
            .filter(|(position, _)| position.matches(&query, overlap))
            .count();
        if found.len() != expected {
            warn!(
                %query,
                overlap,
                found = found.len(),
                expected,
                "Query disagrees with linear scan"
            );
        }
        info!("Query {} overlap={}: {} items in {:?}", query, overlap, found.len(), elapsed);
    }

    match QuadTree::from_pairs(pairs.iter().cloned(), config.tree.max_depth) {
        Some(rebuilt) => info!(
            "Rebuilt from pairs: {} with {} items",
            rebuilt,
            rebuilt.item_count()
        ),
        None => warn!("Could not rebuild from pairs: bounding region is degenerate"),
    }

    let start = Instant::now();
    let removed = pairs
        .iter()
        .step_by(2)
        .filter(|(position, id)| tree.remove_at(id, position.clone()))
        .count();
    info!(
        "Removed {} entries in {:?}, {} remain",
        removed,
        start.elapsed(),
        tree.item_count()
    );
    debug!("{:?}", tree);

    Ok(())
}
