pub mod clock;
pub mod config;
pub mod logging;
pub mod pointer_device;
pub mod response;
pub mod routes;
pub mod sessions;
pub mod state;
pub mod workers;

use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::pointer_device::{open_pointer, PointerInitError};
use crate::state::AppState;

pub fn create_app(state: AppState) -> axum::Router {
    routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Opens the configured pointer and builds the shared state. An explicit
/// SCREEN_WIDTH/SCREEN_HEIGHT wins over the size the device reports.
pub fn build_state(mut config: Config) -> Result<AppState, PointerInitError> {
    let device = open_pointer(&config)?;

    if config.screen_size.is_none() {
        if let Some((width, height)) = device.display_size.filter(|&(w, h)| w > 0 && h > 0) {
            tracing::info!(width, height, "using display size reported by pointer device");
            config.cursor.screen_width = width;
            config.cursor.screen_height = height;
        }
    }

    Ok(AppState::new(config, device.pointer))
}
