pub mod auth;
pub mod coach;
pub mod config;
pub mod focus;
pub mod streak;

/// Tokio runtime for one command invocation.
pub fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}
