use crate::error::{Error, IffError};
use crate::grammar::{RecordKind, TruncationPolicy};
use crate::importer::Importer;
use crate::reader::IffReader;
use crate::records::Delivery;
use crate::schedule::Schedule;

use serde::Deserialize;
use tracing::{info, warn};

use std::path::PathBuf;

#[derive(Clone, Deserialize)]
pub struct IffImporterConfig {
    pub directory: PathBuf,
    pub namespace: String,
    #[serde(default)]
    pub truncation: TruncationPolicy,
    pub output: Option<PathBuf>,
    pub files: Vec<IffFileConfig>,
}

#[derive(Clone, Deserialize)]
pub struct IffFileConfig {
    pub kind: RecordKind,
    pub file: PathBuf,
    /// Whether the file opens with its own identification record.
    #[serde(default = "default_identification")]
    pub identification: bool,
}

fn default_identification() -> bool {
    true
}

pub struct IffImporter {
    truncation: TruncationPolicy,
}

impl IffImporter {
    pub fn new(truncation: TruncationPolicy) -> Self {
        Self { truncation }
    }

    /// Like [`Importer::overlay`] for files carrying no identification record.
    ///
    /// Footnotes are decoded against the window of the delivery already in `schedule`.
    pub fn overlay_without_identification(
        &mut self,
        kind: RecordKind,
        data: Vec<u8>,
        mut schedule: Schedule,
    ) -> Result<Schedule, Error> {
        let text = decode_latin1(&data);
        let window = schedule.delivery.as_ref().map(Delivery::validity_window);
        let reader = IffReader::without_identification(text.lines().map(str::to_string), kind, window)
            .with_truncation(self.truncation);
        let count = fold(reader, kind, &mut schedule)?;
        info!("Imported {} {:?} records without identification", count, kind);
        Ok(schedule)
    }
}

impl Importer for IffImporter {
    fn overlay(&mut self, kind: RecordKind, data: Vec<u8>, mut schedule: Schedule) -> Result<Schedule, Error> {
        let text = decode_latin1(&data);
        let reader = IffReader::new(text.lines().map(str::to_string), kind)?.with_truncation(self.truncation);

        if let Some(delivery) = reader.delivery() {
            match &schedule.delivery {
                None => schedule.delivery = Some(delivery.clone()),
                Some(known) if known != delivery => warn!(
                    "{:?} file is from delivery {} version {}, schedule has {} version {}",
                    kind, delivery.company_number, delivery.version_number, known.company_number, known.version_number
                ),
                Some(_) => {}
            }
        }

        let count = fold(reader, kind, &mut schedule)?;
        info!("Imported {} {:?} records", count, kind);
        Ok(schedule)
    }
}

/// IFF files are ISO-8859-1; every byte is the code point of the same value.
pub fn decode_latin1(data: &[u8]) -> String {
    data.iter().map(|&byte| byte as char).collect()
}

fn fold<I: Iterator<Item = String>>(
    reader: IffReader<I>,
    kind: RecordKind,
    schedule: &mut Schedule,
) -> Result<usize, IffError> {
    let mut count = 0;
    for record in reader {
        schedule.insert(kind, record?);
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IffErrorType;
    use crate::footnote::FootnoteKind;
    use crate::time::ServiceTime;

    use chrono::NaiveDate;

    fn latin1(text: &str) -> Vec<u8> {
        text.chars().map(|c| c as u8).collect()
    }

    fn identification(version: u32) -> String {
        format!("@100,01012020,03012020,{:04},{:<30}\r\n", version, "Dienstregeling 2020")
    }

    fn delivered() -> Schedule {
        let mut importer = IffImporter::new(TruncationPolicy::Lenient);
        importer
            .overlay(RecordKind::Delivery, latin1(&identification(1)), Schedule::new("nl".to_string()))
            .unwrap()
    }

    #[test]
    fn decodes_latin1_bytes() {
        assert_eq!(decode_latin1(b"Li\xe8ge"), "Liège");
    }

    #[test]
    fn overlays_companies_with_identification() {
        let data = latin1(&format!(
            "{}100,NS        ,{:<30},0200\r\n\r\n200,SNCB      ,{:<30},0300\r\n",
            identification(1),
            "Nederlandse Spoorwegen",
            "Société Nationale"
        ));
        let mut importer = IffImporter::new(TruncationPolicy::Lenient);
        let schedule = importer
            .overlay(RecordKind::Company, data, Schedule::new("nl".to_string()))
            .unwrap();

        assert_eq!(schedule.delivery.as_ref().map(|x| x.version_number), Some(1));
        assert_eq!(schedule.companies.len(), 2);
        assert_eq!(schedule.companies[&200].name, "Société Nationale");
        assert_eq!(schedule.companies[&100].day_change, ServiceTime::from_hm(2, 0));
    }

    #[test]
    fn identification_absent_footnotes_use_delivery_window() {
        let mut importer = IffImporter::new(TruncationPolicy::Lenient);
        let schedule = importer
            .overlay_without_identification(RecordKind::XFootnote, latin1("#00003\r\n010\r\n"), delivered())
            .unwrap();
        let footnote = &schedule.x_footnotes[&3];
        assert_eq!(footnote.calendar.kind, FootnoteKind::Only);
        assert!(footnote.runs_on(NaiveDate::from_ymd_opt(2020, 1, 2).unwrap()));
        assert!(schedule.footnotes.is_empty());
    }

    #[test]
    fn identification_absent_footnotes_need_a_delivery() {
        let mut importer = IffImporter::new(TruncationPolicy::Lenient);
        let err = importer
            .overlay_without_identification(RecordKind::Footnote, latin1("#00003\r\n010\r\n"), Schedule::default())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::IffError(IffError {
                error_type: IffErrorType::MissingValidityWindow,
                ..
            })
        ));
    }

    #[test]
    fn empty_file_lacks_identification() {
        let mut importer = IffImporter::new(TruncationPolicy::Lenient);
        let err = importer
            .overlay(RecordKind::Station, Vec::new(), Schedule::default())
            .unwrap_err();
        assert!(matches!(
            err,
            Error::IffError(IffError {
                error_type: IffErrorType::MissingIdentification,
                line: 1,
                ..
            })
        ));
    }

    #[test]
    fn first_delivery_is_kept() {
        let mut importer = IffImporter::new(TruncationPolicy::Lenient);
        let data = latin1(&format!("{}{:<4},{:<30}\r\n", identification(2), "NL", "Nederlands"));
        let schedule = importer.overlay(RecordKind::Language, data, delivered()).unwrap();
        assert_eq!(schedule.delivery.as_ref().map(|x| x.version_number), Some(1));
        assert_eq!(schedule.languages["NL"].description, "Nederlands");
    }

    #[test]
    fn strict_truncation_fails_the_import() {
        let data = latin1(&format!("{}#00000001\r\n>asd    ,0800\r\n", identification(1)));
        let mut importer = IffImporter::new(TruncationPolicy::Strict);
        assert!(importer.overlay(RecordKind::Service, data.clone(), delivered()).is_err());

        let mut importer = IffImporter::new(TruncationPolicy::Lenient);
        let schedule = importer.overlay(RecordKind::Service, data, delivered()).unwrap();
        assert_eq!(schedule.services[&1].route.len(), 1);
    }
}
