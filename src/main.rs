#[tokio::main]
async fn main() {
    if let Err(err) = ventas_ai::cli::run().await {
        eprintln!("application error: {err}");
        std::process::exit(1);
    }
}
