//! Data model for the relay.
//!
//! A [`CandidateFile`] lives for one run only; a [`LoggedFileRecord`] is the
//! append-only row written to the log store once a file has been relayed.
//! Filename parsing lives in [`filename`].

pub mod filename;
mod record;

pub use filename::{clean_name, extract_index, ParsedName};
pub use record::*;
