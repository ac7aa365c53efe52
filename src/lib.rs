pub mod args;
pub mod error;
pub mod magnifier;
pub mod model;
pub mod raster;
pub mod scoresheet;
pub mod storage;
pub mod submission;
pub mod target;
pub mod mvu {
    pub mod runtime;
    pub mod session;
}
pub mod controller {
    pub mod session;
}
pub mod view {
    pub mod index;
    pub mod scoresheet;
    pub mod session;
}

const HTMX_PATH: &str = "https://unpkg.com/htmx.org@1.9.12";

pub use controller::session::registry::AppState;
pub use error::ScoringError;
