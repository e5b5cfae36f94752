use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};
use serde::Serialize;

const DEFAULT_OUTPUT: &str = "assets/default_forecast.csv";
const DEFAULT_DAYS: u64 = 730;
const START_PRICE: f64 = 94_000.0;
/// Daily log-drift of the central estimate (~25 % a year).
const DAILY_DRIFT: f64 = 0.000_61;

/// One output row, in the column layout the viewer expects.
#[derive(Serialize)]
struct ForecastRecord {
    ds: String,
    yhat: f64,
    yhat_lower: f64,
    yhat_upper: f64,
}

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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn round_cents(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Smooth trend with a yearly cycle and a little noise; the interval
/// widens with the square root of the horizon.
fn generate(start: NaiveDate, days: u64, rng: &mut SimpleRng) -> Vec<ForecastRecord> {
    let mut wobble = 0.0;
    (0..days)
        .filter_map(|t| {
            let date = start.checked_add_days(Days::new(t))?;
            let t = t as f64;

            wobble = 0.9 * wobble + rng.gauss(0.0, 0.004);
            let seasonal = 0.06 * (2.0 * std::f64::consts::PI * t / 365.25).sin();
            let yhat = START_PRICE * (DAILY_DRIFT * t + seasonal + wobble).exp();

            let half_width = yhat * (0.03 + 0.006 * t.sqrt());
            Some(ForecastRecord {
                ds: date.format("%Y-%m-%d").to_string(),
                yhat: round_cents(yhat),
                yhat_lower: round_cents(yhat - half_width),
                yhat_upper: round_cents(yhat + half_width),
            })
        })
        .collect()
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let output_path = args.next().unwrap_or_else(|| DEFAULT_OUTPUT.to_string());
    let days = match args.next() {
        Some(raw) => raw
            .parse::<u64>()
            .with_context(|| format!("'{raw}' is not a day count"))?,
        None => DEFAULT_DAYS,
    };

    let start = NaiveDate::from_ymd_opt(2026, 1, 1).context("invalid start date")?;
    let mut rng = SimpleRng::new(42);
    let records = generate(start, days, &mut rng);

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;
    for record in &records {
        writer.serialize(record).context("writing forecast row")?;
    }
    writer.flush().context("flushing output")?;

    println!("Wrote {} forecast rows to {output_path}", records.len());
    Ok(())
}
