use nfp_forecast::{Pipeline, PipelineConfig, RawSeries};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Simulate 20 years of payroll levels with persistent monthly hiring
    let mut rng = StdRng::seed_from_u64(42);
    let shocks = Normal::new(0.0, 90.0)?;

    let mut levels = vec![130_000.0];
    let mut change: f64 = 150.0;
    for _ in 0..240 {
        change = 60.0 + 0.6 * change + shocks.sample(&mut rng);
        levels.push(levels.last().copied().unwrap_or_default() + change);
    }

    let raw = RawSeries::new("payems", levels);
    println!("Simulated {} months of payroll levels", raw.len());

    let pipeline = Pipeline::new(PipelineConfig::new(5, 0.8)?)?;
    let report = pipeline.run(&raw)?;

    println!("Weights: {:?}", report.model.weights());
    println!("Bias:    {:.2}", report.model.bias());
    print!("{}", report.evaluation);
    print!("{}", report.next_month);

    println!("Most recent test months:");
    for record in report.recent(6) {
        println!(
            "  #{:>3}  actual {:>8.1}  predicted {:>8.1}",
            record.position, record.actual, record.predicted
        );
    }

    Ok(())
}
