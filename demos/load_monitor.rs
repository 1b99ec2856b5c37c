use std::error::Error;
use std::time::Duration;

use load_average::load;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cancel = CancellationToken::new();

    println!("Load Average Monitoring Example");
    println!("===============================");

    loop {
        let snapshot = load::default_sampler().snapshot_with_cancel(&cancel);
        match &snapshot.last_error {
            Some(err) => println!("Last sample failed: {}", err),
            None if !snapshot.is_sampled() => println!("Waiting for the first sample..."),
            None => println!(
                "Load: {:.2} {:.2} {:.2} ({} samples)",
                snapshot.load.load1, snapshot.load.load5, snapshot.load.load15, snapshot.samples
            ),
        }

        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                cancel.cancel();
                break;
            },
            _ = tokio::time::sleep(Duration::from_secs(5)) => {},
        }
    }

    Ok(())
}
