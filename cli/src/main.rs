use anyhow::Context;
use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use wirepath_common::db::parser;
use wirepath_common::util::config::{Config, RoutingConfig};
use wirepath_common::util::profiler::ScopedTimer;
use wirepath_common::util::{generator, logger, visualization};
use wirepath_router::{Session, check};

#[derive(Parser)]
#[command(author, version, about = "Contention-driven L/Z wire router", long_about = None)]
struct Args {
    /// Input problem file: grid dimensions and wire endpoints.
    #[arg(short = 'f', value_name = "FILE")]
    input: Option<PathBuf>,

    /// Worker threads for the re-routing sweeps.
    #[arg(short = 'n', value_name = "INT")]
    num_threads: Option<usize>,

    /// Per-wire probability of committing a random candidate instead of
    /// the greedy pick.
    #[arg(short = 'p', value_name = "FLOAT")]
    sa_prob: Option<f64>,

    /// Annealing inner iteration count (accepted for compatibility).
    #[arg(short = 'i', value_name = "INT")]
    sa_inner_iters: Option<usize>,

    /// TOML configuration file.
    #[arg(long, value_name = "FILE", default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a random benchmark problem file.
    Generate {
        #[arg(long, default_value_t = 64)]
        dim_x: u32,
        #[arg(long, default_value_t = 64)]
        dim_y: u32,
        #[arg(long, default_value_t = 128)]
        wires: usize,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value = "inputs/random.txt")]
        output: String,
    },
}

fn main() -> anyhow::Result<()> {
    logger::init();
    let args = Args::parse();

    if let Some(Commands::Generate {
        dim_x,
        dim_y,
        wires,
        seed,
        output,
    }) = &args.command
    {
        if let Some(parent) = Path::new(output).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        generator::generate_random_netlist(output, *dim_x, *dim_y, *wires, *seed)?;
        log::info!("Generated: {}", output);
        return Ok(());
    }

    let config = load_config(&args.config)?;
    let routing = resolve_routing(&args, &config);

    let input = args.input.ok_or_else(|| {
        log::error!("No input file given; -f <FILE> is required.");
        anyhow::anyhow!("missing -f argument")
    })?;

    log::info!("Number of threads: {}", routing.num_threads);
    log::info!("Simulated annealing probability: {}", routing.sa_prob);
    log::info!("Simulated annealing iterations: {}", routing.sa_inner_iters);
    log::info!("Input file: {}", input.display());

    let netlist = {
        let _timer = ScopedTimer::new("Initialization");
        parser::parse(&input).with_context(|| format!("failed to load '{}'", input.display()))?
    };

    let session = {
        let _timer = ScopedTimer::new("Computation");
        wirepath_router::route(netlist, &routing)
    };

    check::run(&session.wires, &session.grid)
        .map_err(|e| anyhow::anyhow!("verification failed: {}", e))?;

    if let Some(heatmap) = &config.output.heatmap {
        log::info!("Writing congestion heat map to {}", heatmap);
        visualization::draw_congestion(
            &session.grid.snapshot(),
            session.dim_x,
            session.dim_y,
            heatmap,
        );
    }

    let stem = input
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("input");
    let parent = input.parent().unwrap_or(Path::new("."));

    let cost_path = parent.join(format!("cost_{}_{}", stem, routing.num_threads));
    write_cost_file(&cost_path, &session)
        .with_context(|| format!("failed to write '{}'", cost_path.display()))?;
    log::info!("Wrote cost grid to {}", cost_path.display());

    let route_path = parent.join(format!("output_{}_{}", stem, routing.num_threads));
    write_route_file(&route_path, &session)
        .with_context(|| format!("failed to write '{}'", route_path.display()))?;
    log::info!("Wrote routes to {}", route_path.display());

    Ok(())
}

fn load_config(path: &Path) -> anyhow::Result<Config> {
    if path.exists() {
        log::info!("Loading configuration from {:?}", path);
        let text = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;
        toml::from_str(&text).map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))
    } else {
        Ok(Config::default())
    }
}

/// Command-line flags override config-file values, which override the
/// built-in defaults.
fn resolve_routing(args: &Args, config: &Config) -> RoutingConfig {
    let mut routing = config.routing.clone();
    if let Some(n) = args.num_threads {
        routing.num_threads = n;
    }
    if let Some(p) = args.sa_prob {
        routing.sa_prob = p;
    }
    if let Some(i) = args.sa_inner_iters {
        routing.sa_inner_iters = i;
    }

    if routing.num_threads == 0 {
        log::warn!("Thread count 0 is not runnable; using 1.");
        routing.num_threads = 1;
    }
    let clamped = routing.sa_prob.clamp(0.0, 1.0);
    if (clamped - routing.sa_prob).abs() > f64::EPSILON {
        log::warn!(
            "SA probability {} is outside [0, 1]. Clamped to {}.",
            routing.sa_prob,
            clamped
        );
        routing.sa_prob = clamped;
    }
    routing
}

fn write_cost_file(path: &Path, session: &Session) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "{} {}", session.dim_y, session.dim_x)?;

    let costs = session.grid.snapshot();
    for row in costs.chunks(session.dim_x as usize) {
        let line: Vec<String> = row.iter().map(|c| c.to_string()).collect();
        writeln!(out, "{}", line.join(" "))?;
    }
    Ok(())
}

fn write_route_file(path: &Path, session: &Session) -> std::io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    writeln!(out, "{} {}", session.dim_y, session.dim_x)?;
    writeln!(out, "{}", session.wires.len())?;

    for wire in &session.wires {
        let cells: Vec<String> = wire
            .cells()
            .map(|cell| format!("{} {}", cell.x, cell.y))
            .collect();
        writeln!(out, "{}", cells.join(" "))?;
    }
    Ok(())
}
