/// Install `env_logger` as the global logger. Returns `false` when the host
/// already installed one, which is then kept.
pub fn init_logging() -> bool {
    match env_logger::try_init() {
        Ok(()) => {
            log::info!("Logging initialized for {}", crate::SLUG);
            true
        }
        Err(e) => {
            log::debug!("Keeping existing logger: {}", e);
            false
        }
    }
}
