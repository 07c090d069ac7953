// linkvault services
// Services provide the stateless-or-shared building blocks: URL normalization,
// page metadata extraction, admission control and settings.

pub mod metadata_extractor;
pub mod rate_limiter;
pub mod settings_engine;
pub mod url_normalizer;
