use crate::error::Error;
use crate::grammar::RecordKind;
use crate::schedule::Schedule;

pub trait Importer {
    /// Folds every record of one file of type `kind` into `schedule`.
    fn overlay(&mut self, kind: RecordKind, data: Vec<u8>, schedule: Schedule) -> Result<Schedule, Error>;
}
