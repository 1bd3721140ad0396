use colored::Colorize;
use comfy_table::{ContentArrangement, Table};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use cs_core::Rect;
use cs_simulation::SpatialIndex;

const SIDE: f64 = 1000.0;
const QUERIES_PER_TRIAL: usize = 20;

pub fn run(trials: u32, points: usize, eps: f64, seed: u64) -> Result<(), String> {
    if !SpatialIndex::<usize>::is_enabled(eps) {
        return Err(format!("split threshold must be positive, got {eps}"));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut queries = 0_usize;
    let mut hits = 0_usize;
    let mut max_nodes = 0_usize;

    for trial in 0..trials {
        let mut index = SpatialIndex::new(SIDE, SIDE, eps).map_err(|e| e.to_string())?;
        let coords: Vec<(f64, f64)> = (0..points)
            .map(|_| (rng.random_range(0.0..SIDE), rng.random_range(0.0..SIDE)))
            .collect();
        for (i, &(x, y)) in coords.iter().enumerate() {
            index.insert(x, y, i);
        }
        max_nodes = max_nodes.max(index.node_count());

        for leaf in index.leaves() {
            if let Some(b) = leaf.bounds
                && (b.width() > eps || b.height() > eps)
            {
                return Err(format!(
                    "trial {trial}: leaf {} holds points spanning {b}",
                    leaf.rect
                ));
            }
        }

        for _ in 0..QUERIES_PER_TRIAL {
            let area = random_rect(&mut rng);
            let mut found: Vec<usize> = index.query(&area).into_iter().copied().collect();
            found.sort_unstable();
            let expected: Vec<usize> = coords
                .iter()
                .enumerate()
                .filter(|(_, (x, y))| area.contains(*x, *y))
                .map(|(i, _)| i)
                .collect();
            if found != expected {
                return Err(format!(
                    "trial {trial}: query {area} returned {} points, brute force {}",
                    found.len(),
                    expected.len()
                ));
            }
            queries += 1;
            hits += found.len();
        }
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Trials", "Points", "Eps", "Queries", "Hits", "Max nodes"]);
    table.add_row(vec![
        trials.to_string(),
        points.to_string(),
        eps.to_string(),
        queries.to_string(),
        hits.to_string(),
        max_nodes.to_string(),
    ]);
    println!("{table}");
    println!();
    println!("  {} index matches brute force", "OK".green().bold());

    Ok(())
}

fn random_rect(rng: &mut StdRng) -> Rect {
    let (a, b) = (rng.random_range(0.0..SIDE), rng.random_range(0.0..SIDE));
    let (c, d) = (rng.random_range(0.0..SIDE), rng.random_range(0.0..SIDE));
    Rect::new(a.min(b), a.max(b), c.min(d), c.max(d))
}
