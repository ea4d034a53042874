#![warn(clippy::pedantic)]

mod auth;
mod equipment;
mod error;
mod exercises;
mod gyms;
mod instructors;
mod state;
mod students;
mod users;
mod workout_plans;
mod workout_sessions;

pub use auth::Principal;
pub use error::{ApiError, ApiResult};
pub use state::{App, AppState};

use std::net::SocketAddr;

use axum::Router;
use log::{error, info};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

#[must_use]
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(users::routes())
        .merge(instructors::routes())
        .merge(students::routes())
        .merge(gyms::routes())
        .merge(equipment::routes())
        .merge(exercises::routes())
        .merge(workout_plans::routes())
        .merge(workout_sessions::routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub struct GymTrackServer {
    state: AppState,
}

impl GymTrackServer {
    #[must_use]
    pub fn new(service: App) -> Self {
        Self {
            state: AppState::new(service),
        }
    }

    pub async fn run(self, addr: SocketAddr) {
        let app = router(self.state);

        let listener = match TcpListener::bind(addr).await {
            Ok(listener) => listener,
            Err(err) => {
                error!("failed to bind {addr}: {err}");
                return;
            }
        };

        info!("listening on http://{addr}");

        if let Err(err) = axum::serve(listener, app).await {
            error!("server error: {err}");
        }
    }
}
