//! Combat log pipeline: merge, bootstrap, rewrite, parse and reconstruct fights.

pub mod bootstrap;
pub mod combat_log;
pub mod context;
pub mod merge;
pub mod parser;
pub mod preprocess;
pub mod state;

pub use chronicle_types as types;

// Re-exports for convenience
pub use bootstrap::{Bootstrap, BootstrapError, ReplayStream, find_me, find_me_within};
pub use combat_log::*;
pub use context::{AppConfig, AppConfigExt, ConfigError, ParsingSession, SessionError};
pub use merge::{CancelToken, FailedLine, LineStream, MergeError, MergedLine, Merger, Middleware, merge_logs};
pub use parser::{EventParser, MATCHERS, Matcher};
pub use preprocess::{PreprocessError, Preprocessor};
pub use state::{Fight, FightSummary, Fights, ParticipantSummary, State, UnitRegistry};
