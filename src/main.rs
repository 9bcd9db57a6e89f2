use tracing::error;

#[tokio::main]
async fn main() {
    if let Err(error) = sales_saas::run().await {
        error!("Backend exited with error: {}", error);
        std::process::exit(1);
    }
}
