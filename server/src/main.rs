use server::start_server;

#[tokio::main]
async fn main() {
    if let Err(err) = start_server().await {
        eprintln!("web-bff failed to start: {err}");
        std::process::exit(1);
    }
}
