#[tokio::main]
async fn main() {
    if let Err(e) = recorrentes_lib::run().await {
        eprintln!("recorrentes: {e}");
        std::process::exit(1);
    }
}
