mod config;
mod error;
mod interner;
mod parsing_session;

pub use config::{AppConfig, AppConfigExt};
pub use error::{ConfigError, SessionError};
pub use interner::{IStr, intern, interner, resolve};
pub use parsing_session::ParsingSession;
