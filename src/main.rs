/// Main entry point for the PulseWatch health service
///
/// This serves as a thin wrapper that delegates to the interfaces layer.
/// The actual application logic is implemented in `interfaces::cli`.

use pulsewatch::interfaces::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        tracing::error!(error = %e, "pulsewatch failed");
        eprintln!("pulsewatch: {}", e);
        std::process::exit(1);
    }
}
