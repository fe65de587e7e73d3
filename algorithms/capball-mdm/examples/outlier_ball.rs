use capball::traits::{Fit, Predict};
use capball_datasets::generate;
use capball_mdm::SoftMdm;
use ndarray::array;
use ndarray_rand::rand::SeedableRng;
use rand_xoshiro::Xoshiro256Plus;

// Fit a capped enclosing ball around a noisy blob with a few planted outliers and
// replay how the ball grew. Set `RUST_LOG=capball_mdm=trace` to follow every transfer.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("capball_mdm=debug")),
        )
        .init();

    // Our random number generator, seeded for reproducibility
    let mut rng = Xoshiro256Plus::seed_from_u64(42);

    // 200 points around the origin, followed by three far away points
    let outliers = array![[25., 25.], [-30., 10.], [5., -40.]];
    let dataset = generate::blob_with_outliers(200, &array![0., 0.], 2., &outliers, &mut rng);

    // No single point may carry more than 1/190 of the total weight
    let model = SoftMdm::params(1. / 190.)
        .tolerance(1e-8)
        .max_iterations(Some(1_000_000))
        .fit(&dataset)
        .expect("capped ball fitted");

    println!("{}", model);
    println!("center = {}, radius = {:.4}", model.center(), model.radius());

    let inside = model.predict(&dataset);
    for i in 200..203 {
        println!(
            "outlier {} has weight {:.5} and lies {}",
            i - 200,
            model.weights()[i],
            if inside[i] { "inside" } else { "outside" }
        );
    }

    // Replay the run, every tenth part of the trace
    let trace = model.trace();
    let stride = (trace.len() / 10).max(1);
    for (step, snapshot) in trace.iter().enumerate().step_by(stride) {
        println!(
            "iteration {:>6}: gap = {:.3e}, radius = {:.4}, clip = {:?}",
            step,
            snapshot.gap(),
            snapshot.radius(),
            snapshot.clip()
        );
    }
}
