//! Log line decoding and the value types shared by the pipeline

mod error;
mod guid;
mod line;
mod message;
mod reader;
pub mod records;
mod types;

pub use error::{ParseError, ReaderError};
pub use guid::{GUID_STR_LEN, Guid};
pub use line::{LOG_DATE_FORMAT, LineDecoder};
pub use message::*;
pub use reader::{LineSource, read_lines};
pub use types::{AuraApplication, CastAction, HitType, Resource, School, Spell, Trailer, TrailerEntry, Unit};
