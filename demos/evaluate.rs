//! # Batch evaluation of the three RRT variants
//!
//! Runs basic RRT, RRT-connect and goal-biased RRT on the same random
//! obstacle maps and records node counts, planning times and path costs.
//!
//! ## Usage
//! ```bash
//! cargo run --release --example evaluate -- 0.5 5000 20 5
//! ```

use clap::Parser;
use json::{object, JsonValue};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaChaRng;
use rrt_variants::{Planner, PlannerConfig, Point, Space};
use std::fs;
use std::path::Path;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

const ORDER: [&str; 3] = ["basic", "connect", "multi"];

#[derive(Parser, Debug)]
#[command(version, about = "Evaluate RRT variants on random obstacle maps", long_about = None)]
struct CliArgs {
    /// Step size for the RRT algorithms
    epsilon: f64,

    /// Iteration limit for the RRT algorithms
    limit: usize,

    /// Number of random maps to evaluate
    batch: usize,

    /// Number of obstacles to generate per map
    n_obstacles: usize,

    /// Seed for map generation and sampling (entropy if omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Directory to save the output files
    #[arg(short, long, default_value = "eval_data")]
    output_dir: String,
}

fn xy(x: f64, y: f64) -> Point<f64> {
    Point::new([("x", x), ("y", y)]).expect("two axes")
}

/// Generates `n` square obstacles of side `size` inside [-10, 10]², none of
/// which covers a corner of the `size` square around the start or the goal.
fn generate_obstacles(
    start: &Point<f64>,
    goal: &Point<f64>,
    n: usize,
    size: f64,
    rng: &mut ChaChaRng,
) -> Vec<Space<f64>> {
    let half = size / 2.0;
    let mut corner_points = Vec::new();
    for center in [start, goal] {
        let (cx, cy) = (center.get("x").unwrap(), center.get("y").unwrap());
        for (dx, dy) in [(-half, -half), (half, -half), (-half, half), (half, half)] {
            corner_points.push(xy(cx + dx, cy + dy));
        }
    }

    let mut obstacles = Vec::with_capacity(n);
    while obstacles.len() < n {
        let x = rng.gen_range(-10.0..=10.0);
        let y = rng.gen_range(-10.0..=10.0);
        let obstacle = Space::new([("x", (x, x + size)), ("y", (y, y + size))]).unwrap();
        if !corner_points.iter().any(|p| obstacle.within(p).unwrap()) {
            obstacles.push(obstacle);
        }
    }
    obstacles
}

fn cost_to_json(cost: Option<f64>) -> JsonValue {
    match cost {
        Some(cost) => cost.into(),
        None => JsonValue::Null,
    }
}

fn main() {
    let args: CliArgs = CliArgs::parse();
    let mut rng = match args.seed {
        Some(seed) => ChaChaRng::seed_from_u64(seed),
        None => ChaChaRng::from_entropy(),
    };

    println!(
        "Running {} iteration{} with epsilon={}, limit={}, n_obstacles={}",
        args.batch,
        if args.batch != 1 { "s" } else { "" },
        args.epsilon,
        args.limit,
        args.n_obstacles
    );

    let bounds = Space::new([("x", (-10.0, 10.0)), ("y", (-10.0, 10.0))]).unwrap();
    let start = xy(-9.0, -9.0);
    let goal = xy(9.0, 9.0);
    let config = PlannerConfig::new(args.epsilon, args.limit);

    let mut nodes: Vec<JsonValue> = ORDER.iter().map(|_| JsonValue::new_array()).collect();
    let mut times: Vec<JsonValue> = ORDER.iter().map(|_| JsonValue::new_array()).collect();
    let mut costs: Vec<JsonValue> = ORDER.iter().map(|_| JsonValue::new_array()).collect();

    for iteration in 0..args.batch {
        let obstacles = generate_obstacles(&start, &goal, args.n_obstacles, 1.0, &mut rng);
        let mut planner = Planner::new(bounds.clone(), obstacles, config.clone())
            .expect("valid planner configuration")
            .with_seed(rng.gen());

        let t0 = Instant::now();
        let basic = planner.plan_basic(&start, &goal).unwrap();
        let basic_time = t0.elapsed().as_secs_f64();

        let t0 = Instant::now();
        let connect = planner.plan_connect(&start, &goal).unwrap();
        let connect_time = t0.elapsed().as_secs_f64();

        let t0 = Instant::now();
        let multi = planner.plan_multi(&start, &goal).unwrap();
        let multi_time = t0.elapsed().as_secs_f64();

        let node_data = [basic.node_count(), connect.node_count(), multi.node_count()];
        let time_data = [basic_time, connect_time, multi_time];
        let cost_data = [
            basic.cost().unwrap(),
            connect.cost().unwrap(),
            multi.cost().unwrap(),
        ];
        for i in 0..ORDER.len() {
            nodes[i].push(node_data[i]).expect("Failed to push node count.");
            times[i].push(time_data[i]).expect("Failed to push time.");
            costs[i]
                .push(cost_to_json(cost_data[i]))
                .expect("Failed to push cost.");
        }

        println!(
            "iteration={}/{} done (solved: basic={}, connect={}, multi={})",
            iteration + 1,
            args.batch,
            basic.solved(),
            connect.solved(),
            multi.solved()
        );
    }

    let mut data = object! { "nodes" => object!{}, "times" => object!{}, "costs" => object!{} };
    for (i, name) in ORDER.iter().enumerate() {
        data["nodes"][*name] = nodes[i].take();
        data["times"][*name] = times[i].take();
        data["costs"][*name] = costs[i].take();
    }

    let output_dir = Path::new(&args.output_dir);
    if !output_dir.exists() {
        fs::create_dir_all(output_dir).unwrap();
    }
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let output_file = output_dir.join(format!("{}.json", stamp));
    println!("Dumping JSON to {}...", output_file.display());
    fs::write(output_file, data.dump()).unwrap();
}
