#[tokio::main]
async fn main() {
    if let Err(e) = audiometry_lib::run().await {
        eprintln!("audiometry: {e}");
        std::process::exit(1);
    }
}
