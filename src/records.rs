//! Typed IFF records.
//!
//! Each record is built from one or more [`Row`]s once its grammar has matched
//! them; after that it is plain data owned by the caller.

use crate::error::IffError;
use crate::field::Row;
use crate::footnote::{FootnoteCalendar, ValidityWindow};
use crate::time::ServiceTime;

use chrono::NaiveDate;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Delivery {
    pub company_number: i64,
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
    pub version_number: i64,
    pub description: String,
}

impl Delivery {
    pub fn from_row(row: &Row) -> Result<Self, IffError> {
        Ok(Self {
            company_number: row.integer("company_number")?,
            first_day: row.date("first_day")?,
            last_day: row.date("last_day")?,
            version_number: row.integer("version_number")?,
            description: row.text("description")?,
        })
    }

    pub fn validity_window(&self) -> ValidityWindow {
        ValidityWindow::inclusive(self.first_day, self.last_day)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Company {
    pub number: i64,
    pub code: String,
    pub name: String,
    /// Moment the operator's travel day rolls over.
    pub day_change: ServiceTime,
}

impl Company {
    pub fn from_row(row: &Row) -> Result<Self, IffError> {
        Ok(Self {
            number: row.integer("company_number")?,
            code: row.text("company_code")?,
            name: row.text("company_name")?,
            day_change: row.time("time")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Country {
    pub code: String,
    pub inland: bool,
    pub name: String,
}

impl Country {
    pub fn from_row(row: &Row) -> Result<Self, IffError> {
        Ok(Self {
            code: row.text("country_code")?,
            inland: row.integer("inland")? != 0,
            name: row.text("country_name")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Language {
    pub code: String,
    pub description: String,
}

impl Language {
    pub fn from_row(row: &Row) -> Result<Self, IffError> {
        Ok(Self {
            code: row.text("language_code")?,
            description: row.text("description")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Station {
    pub train_changes: i64,
    pub code: String,
    pub transfer_time: i64,
    pub max_time: i64,
    pub country_code: String,
    pub time_zone: i64,
    pub attr: i64,
    pub x: i64,
    pub y: i64,
    pub name: String,
}

impl Station {
    pub fn from_row(row: &Row) -> Result<Self, IffError> {
        Ok(Self {
            train_changes: row.integer("train_changes")?,
            code: row.text("code")?,
            transfer_time: row.integer("transfer_time")?,
            max_time: row.integer("max_time")?,
            country_code: row.text("country_code")?,
            time_zone: row.integer("time_zone")?,
            attr: row.integer("attr")?,
            x: row.integer("x")?,
            y: row.integer("y")?,
            name: row.text("name")?,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Inflection {
    pub x: i64,
    pub y: i64,
}

impl Inflection {
    pub fn from_row(row: &Row) -> Result<Self, IffError> {
        Ok(Self {
            x: row.integer("x")?,
            y: row.integer("y")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StationConnection {
    pub from_station: String,
    pub to_station: String,
    pub inflections: Vec<Inflection>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Footnote {
    pub number: i64,
    pub calendar: FootnoteCalendar,
}

impl Footnote {
    pub fn runs_on(&self, date: NaiveDate) -> bool {
        self.calendar.runs_on(date)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimeZonePeriod {
    /// Hours relative to the reference time zone.
    pub time_difference: i64,
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
}

impl TimeZonePeriod {
    pub fn from_row(row: &Row) -> Result<Self, IffError> {
        Ok(Self {
            time_difference: row.integer("time_difference")?,
            first_day: row.date("first_day")?,
            last_day: row.date("last_day")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimeZone {
    pub number: i64,
    pub periods: Vec<TimeZonePeriod>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TransportAttribute {
    pub code: String,
    pub processing_code: i64,
    pub description: String,
}

impl TransportAttribute {
    pub fn from_row(row: &Row) -> Result<Self, IffError> {
        Ok(Self {
            code: row.text("attribute_code")?,
            processing_code: row.integer("processing_code")?,
            description: row.text("description")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TransportMode {
    pub code: String,
    pub description: String,
}

impl TransportMode {
    pub fn from_row(row: &Row) -> Result<Self, IffError> {
        Ok(Self {
            code: row.text("transport_mode_code")?,
            description: row.text("description")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TransportModeQuestion {
    pub code: String,
    pub question: String,
    pub transport_modes: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TransportAttributeQuestion {
    pub code: String,
    pub question_type: i64,
    pub question: String,
    pub transport_attributes: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Change {
    pub from_service: i64,
    pub to_service: i64,
    pub possibility: i64,
}

impl Change {
    pub fn from_row(row: &Row) -> Result<Self, IffError> {
        Ok(Self {
            from_service: row.integer("from_service_identification")?,
            to_service: row.integer("to_service_identification")?,
            possibility: row.integer("possibility_to_change_trains")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Changes {
    pub station: String,
    pub changes: Vec<Change>,
}

/// A company reference that may match any company.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyMatch {
    Any,
    Company(i64),
}

impl From<Option<i64>> for CompanyMatch {
    fn from(value: Option<i64>) -> Self {
        match value {
            Some(x) => CompanyMatch::Company(x),
            None => CompanyMatch::Any,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct XChange {
    pub from_company: CompanyMatch,
    pub from_transport_mode: String,
    pub to_company: CompanyMatch,
    pub to_transport_mode: String,
    pub time_to_change: i64,
    pub footnote_number: i64,
}

impl XChange {
    pub fn from_row(row: &Row) -> Result<Self, IffError> {
        Ok(Self {
            from_company: row.wildcard_integer("from_company_number")?.into(),
            from_transport_mode: row.text("from_transport_mode")?,
            to_company: row.wildcard_integer("to_company_number")?.into(),
            to_transport_mode: row.text("to_transport_mode")?,
            time_to_change: row.integer("time_to_change_transport")?,
            footnote_number: row.integer("footnote_number")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct XChanges {
    pub station: String,
    pub xchanges: Vec<XChange>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SynonymKind {
    TransportAttribute,
    TransportMode,
    TransportAttributeQuestion,
    TransportModeQuestion,
    ConnectionMode,
    Station,
    Group,
    Country,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Synonym {
    pub kind: SynonymKind,
    pub code: String,
    pub language_code: String,
    pub description: String,
}

/// A `first_stop`..`last_stop` span of a service's route.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct StopRange {
    pub first_stop: i64,
    pub last_stop: i64,
}

impl StopRange {
    pub fn from_row(row: &Row) -> Result<Self, IffError> {
        Ok(Self {
            first_stop: row.integer("first_stop")?,
            last_stop: row.integer("last_stop")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ServiceNumber {
    pub company_number: i64,
    pub service_number: i64,
    pub variant: String,
    pub stops: StopRange,
    pub service_name: String,
}

impl ServiceNumber {
    pub fn from_row(row: &Row) -> Result<Self, IffError> {
        Ok(Self {
            company_number: row.integer("company_number")?,
            service_number: row.integer("service_number")?,
            variant: row.text("variant")?,
            stops: StopRange::from_row(row)?,
            service_name: row.text("service_name")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ServiceValidity {
    pub footnote_number: i64,
    pub stops: StopRange,
}

impl ServiceValidity {
    pub fn from_row(row: &Row) -> Result<Self, IffError> {
        Ok(Self {
            footnote_number: row.integer("footnote_number")?,
            stops: StopRange::from_row(row)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ServiceTransportMode {
    pub transport_mode_code: String,
    pub stops: StopRange,
}

impl ServiceTransportMode {
    pub fn from_row(row: &Row) -> Result<Self, IffError> {
        Ok(Self {
            transport_mode_code: row.text("transport_mode_code")?,
            stops: StopRange::from_row(row)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ServiceAttribute {
    pub attribute_code: String,
    pub stops: StopRange,
}

impl ServiceAttribute {
    pub fn from_row(row: &Row) -> Result<Self, IffError> {
        Ok(Self {
            attribute_code: row.text("attribute_code")?,
            stops: StopRange::from_row(row)?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Platform {
    pub arrival: String,
    pub departure: String,
    pub footnote_number: i64,
}

impl Platform {
    pub fn from_row(row: &Row) -> Result<Self, IffError> {
        Ok(Self {
            arrival: row.text("arrival_platform_name")?,
            departure: row.text("departure_platform_name")?,
            footnote_number: row.integer("footnote_number")?,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StopKind {
    Start { departure: ServiceTime },
    Interval { arrival: ServiceTime, departure: ServiceTime },
    /// Arrival and departure at the same minute.
    Continuation { time: ServiceTime },
    Final { arrival: ServiceTime },
    Passing,
}

impl StopKind {
    pub fn arrival(&self) -> Option<ServiceTime> {
        match self {
            StopKind::Interval { arrival, .. } | StopKind::Final { arrival } => Some(*arrival),
            StopKind::Continuation { time } => Some(*time),
            StopKind::Start { .. } | StopKind::Passing => None,
        }
    }

    pub fn departure(&self) -> Option<ServiceTime> {
        match self {
            StopKind::Start { departure } | StopKind::Interval { departure, .. } => Some(*departure),
            StopKind::Continuation { time } => Some(*time),
            StopKind::Final { .. } | StopKind::Passing => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Stop {
    /// 1-based place in the route, passing stops included.
    pub position: u32,
    pub station: String,
    pub kind: StopKind,
    pub platform: Option<Platform>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Service {
    pub identification: i64,
    pub numbers: Vec<ServiceNumber>,
    pub validities: Vec<ServiceValidity>,
    pub transport_modes: Vec<ServiceTransportMode>,
    pub attributes: Vec<ServiceAttribute>,
    pub route: Vec<Stop>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "record", rename_all = "snake_case")]
pub enum Record {
    Delivery(Delivery),
    Company(Company),
    Country(Country),
    Language(Language),
    Station(Station),
    StationConnection(StationConnection),
    Footnote(Footnote),
    TimeZone(TimeZone),
    TransportAttribute(TransportAttribute),
    TransportMode(TransportMode),
    TransportModeQuestion(TransportModeQuestion),
    TransportAttributeQuestion(TransportAttributeQuestion),
    Changes(Changes),
    XChanges(XChanges),
    Synonym(Synonym),
    Service(Service),
}
