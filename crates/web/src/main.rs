use std::env;
use std::net::SocketAddr;

use env_logger::Env;
use gymtrack_domain::Service;
use gymtrack_storage::DocumentStore;
use gymtrack_web::GymTrackServer;
use log::info;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let addr = env::var("GYMTRACK_ADDR")
        .ok()
        .and_then(|value| value.parse::<SocketAddr>().ok())
        .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 8080)));

    let store = match env::var("GYMTRACK_DATA") {
        Ok(path) => {
            info!("storing documents in {path}");
            DocumentStore::open(path).expect("failed to open document store")
        }
        Err(_) => {
            info!("no GYMTRACK_DATA set, storing documents in memory");
            DocumentStore::new()
        }
    };

    GymTrackServer::new(Service::new(store)).run(addr).await;
}
