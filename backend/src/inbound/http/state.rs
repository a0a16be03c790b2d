//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on the catalogue driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AnimeCommand, AnimeQuery};

/// Dependency bundle for the anime handlers.
#[derive(Clone)]
pub struct HttpState {
    pub animes: Arc<dyn AnimeQuery>,
    pub anime_commands: Arc<dyn AnimeCommand>,
}

impl HttpState {
    /// Bundle the read and write ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use anime_backend::domain::AnimeService;
    /// use anime_backend::inbound::http::state::HttpState;
    /// use anime_backend::outbound::memory::InMemoryAnimeRepository;
    ///
    /// let service = Arc::new(AnimeService::new(Arc::new(InMemoryAnimeRepository::new())));
    /// let state = HttpState::new(service.clone(), service);
    /// let _reads = state.animes.clone();
    /// ```
    pub fn new(animes: Arc<dyn AnimeQuery>, anime_commands: Arc<dyn AnimeCommand>) -> Self {
        Self {
            animes,
            anime_commands,
        }
    }
}
