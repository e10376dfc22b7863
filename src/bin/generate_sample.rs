use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const N_GALAXIES: usize = 2000;
/// Fraction of cells left empty in the optional columns.
const MISSING_RATE: f64 = 0.02;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// One synthetic galaxy.
struct Galaxy {
    id: String,
    redshift: f64,
    mstar: f64,
    sfr: f64,
    ssfr: f64,
    metallicity: f64,
    age_gyr: f64,
}

impl Galaxy {
    fn sample(index: usize, rng: &mut SimpleRng) -> Self {
        // Skewed towards low redshift, like a flux-limited survey.
        let redshift = 0.005 + 0.345 * rng.next_f64().powf(1.6);
        let log_mass = rng.gauss(10.0, 0.7).clamp(8.0, 11.8);

        // Star-forming main sequence with a quenched tail.
        let quenched = rng.next_f64() < 0.25 + 0.1 * (log_mass - 10.0).max(0.0);
        let offset = if quenched { -1.2 } else { 0.0 };
        let log_sfr = 0.8 * (log_mass - 10.0) + 2.5 * redshift + offset + rng.gauss(0.0, 0.3);

        let mstar = 10f64.powf(log_mass);
        let sfr = 10f64.powf(log_sfr);
        let metallicity = 8.9 - 0.5 * (-(log_mass - 9.0)).exp().min(3.0) + rng.gauss(0.0, 0.08);
        let age_gyr = rng.uniform(0.5, 13.0 - 10.0 * redshift);

        Galaxy {
            id: format!("G{index:05}"),
            redshift,
            mstar,
            sfr,
            ssfr: sfr / mstar,
            metallicity,
            age_gyr,
        }
    }
}

fn maybe_missing(value: f64, rng: &mut SimpleRng) -> Option<f64> {
    (rng.next_f64() >= MISSING_RATE).then_some(value)
}

fn write_csv(path: &Path, galaxies: &[Galaxy], rng: &mut SimpleRng) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    writer.write_record(["id", "redshift", "Mstar", "SFR", "sSFR", "metallicity", "age_Gyr"])?;
    for g in galaxies {
        let cell = |v: Option<f64>| v.map(|v| v.to_string()).unwrap_or_default();
        writer.write_record([
            g.id.clone(),
            g.redshift.to_string(),
            g.mstar.to_string(),
            g.sfr.to_string(),
            g.ssfr.to_string(),
            cell(maybe_missing(g.metallicity, rng)),
            cell(maybe_missing(g.age_gyr, rng)),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, galaxies: &[Galaxy], rng: &mut SimpleRng) -> Result<()> {
    let floats = |f: fn(&Galaxy) -> f64| -> ArrayRef {
        Arc::new(Float64Array::from(galaxies.iter().map(f).collect::<Vec<_>>()))
    };
    let metallicity: Vec<Option<f64>> = galaxies
        .iter()
        .map(|g| maybe_missing(g.metallicity, rng))
        .collect();
    let age: Vec<Option<f64>> = galaxies
        .iter()
        .map(|g| maybe_missing(g.age_gyr, rng))
        .collect();

    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Utf8, false),
        Field::new("redshift", DataType::Float64, false),
        Field::new("Mstar", DataType::Float64, false),
        Field::new("SFR", DataType::Float64, false),
        Field::new("sSFR", DataType::Float64, false),
        Field::new("metallicity", DataType::Float64, true),
        Field::new("age_Gyr", DataType::Float64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(
                galaxies.iter().map(|g| g.id.as_str()).collect::<Vec<_>>(),
            )),
            floats(|g| g.redshift),
            floats(|g| g.mstar),
            floats(|g| g.sfr),
            floats(|g| g.ssfr),
            Arc::new(Float64Array::from(metallicity)),
            Arc::new(Float64Array::from(age)),
        ],
    )
    .context("Failed to create RecordBatch")?;

    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let output_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("analisis_galaxias.csv"));

    let mut rng = SimpleRng::new(42);
    let galaxies: Vec<Galaxy> = (0..N_GALAXIES)
        .map(|i| Galaxy::sample(i, &mut rng))
        .collect();

    let is_parquet = output_path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet") || e.eq_ignore_ascii_case("pq"));
    if is_parquet {
        write_parquet(&output_path, &galaxies, &mut rng)?;
    } else {
        write_csv(&output_path, &galaxies, &mut rng)?;
    }

    log::info!("Wrote {} galaxies to {}", galaxies.len(), output_path.display());
    println!("Wrote {} galaxies to {}", galaxies.len(), output_path.display());
    Ok(())
}
