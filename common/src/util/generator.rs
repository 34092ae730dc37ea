use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fs::File;
use std::io::{BufWriter, Write};

/// Writes a random routing problem in the input-file format: endpoints are
/// uniform over the grid, zero-length wires are resampled away.
pub fn generate_random_netlist(
    filename: &str,
    dim_x: u32,
    dim_y: u32,
    num_wires: usize,
    seed: Option<u64>,
) -> std::io::Result<()> {
    let mut rng: StdRng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    log::info!(
        "Generating benchmark: {}x{} grid, {} wires{}",
        dim_x,
        dim_y,
        num_wires,
        seed.map(|s| format!(", seed {s}")).unwrap_or_default()
    );

    let mut file = BufWriter::new(File::create(filename)?);
    writeln!(file, "{} {}", dim_y, dim_x)?;
    writeln!(file, "{}", num_wires)?;

    let has_distinct_cells = (dim_x as u64) * (dim_y as u64) > 1;
    for _ in 0..num_wires {
        let start = (rng.gen_range(0..dim_x), rng.gen_range(0..dim_y));
        let mut end = (rng.gen_range(0..dim_x), rng.gen_range(0..dim_y));
        while has_distinct_cells && end == start {
            end = (rng.gen_range(0..dim_x), rng.gen_range(0..dim_y));
        }
        writeln!(file, "{} {} {} {}", start.0, start.1, end.0, end.1)?;
    }
    Ok(())
}
