//! Reader for IFF, the fixed-column interchange format of Dutch rail timetables.
//!
//! An IFF delivery is a set of Latin-1 text files. Each starts with an
//! identification record giving the delivery's validity window, followed by
//! records of a single kind. [`IffReader`] binds one record grammar to one
//! file's lines and yields typed [`Record`]s; [`IffImporter`] folds them into a
//! [`Schedule`].

pub mod cursor;
pub mod error;
pub mod fetcher;
pub mod field;
pub mod file_fetcher;
pub mod footnote;
pub mod grammar;
pub mod iff_importer;
pub mod importer;
pub mod patterns;
pub mod reader;
pub mod records;
pub mod schedule;
pub mod service;
pub mod time;

pub use crate::error::{Error, IffError, IffErrorType};
pub use crate::grammar::{RecordKind, TruncationPolicy};
pub use crate::iff_importer::IffImporter;
pub use crate::reader::IffReader;
pub use crate::records::Record;
pub use crate::schedule::Schedule;
