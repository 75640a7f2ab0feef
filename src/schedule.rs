use crate::grammar::RecordKind;
use crate::records::{
    Changes, Company, Country, Delivery, Footnote, Language, Record, Service, Station, StationConnection, Synonym,
    TimeZone, TransportAttribute, TransportAttributeQuestion, TransportMode, TransportModeQuestion, XChanges,
};

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

/// Every record of one IFF delivery.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Schedule {
    pub namespace: String,
    pub delivery: Option<Delivery>,
    pub companies: HashMap<i64, Company>,
    pub countries: HashMap<String, Country>,
    pub languages: HashMap<String, Language>,
    pub stations: HashMap<String, Station>,
    pub station_connections: Vec<StationConnection>,
    pub footnotes: HashMap<i64, Footnote>,
    pub x_footnotes: HashMap<i64, Footnote>,
    pub time_zones: HashMap<i64, TimeZone>,
    pub transport_attributes: HashMap<String, TransportAttribute>,
    pub transport_modes: HashMap<String, TransportMode>,
    pub transport_mode_questions: HashMap<String, TransportModeQuestion>,
    pub transport_attribute_questions: HashMap<String, TransportAttributeQuestion>,
    pub changes: HashMap<String, Changes>,
    pub x_changes: HashMap<String, XChanges>,
    pub synonyms: Vec<Synonym>,
    pub services: HashMap<i64, Service>,
}

impl Schedule {
    pub fn new(namespace: String) -> Self {
        Self {
            namespace,
            ..Default::default()
        }
    }

    /// Stores `record`; a later record with the same key replaces the earlier one.
    ///
    /// `kind` only matters for footnotes, which land in `x_footnotes` when read from an x-footnote file.
    pub fn insert(&mut self, kind: RecordKind, record: Record) {
        match record {
            Record::Delivery(x) => self.delivery = Some(x),
            Record::Company(x) => {
                self.companies.insert(x.number, x);
            }
            Record::Country(x) => {
                self.countries.insert(x.code.clone(), x);
            }
            Record::Language(x) => {
                self.languages.insert(x.code.clone(), x);
            }
            Record::Station(x) => {
                self.stations.insert(x.code.clone(), x);
            }
            Record::StationConnection(x) => self.station_connections.push(x),
            Record::Footnote(x) if kind == RecordKind::XFootnote => {
                self.x_footnotes.insert(x.number, x);
            }
            Record::Footnote(x) => {
                self.footnotes.insert(x.number, x);
            }
            Record::TimeZone(x) => {
                self.time_zones.insert(x.number, x);
            }
            Record::TransportAttribute(x) => {
                self.transport_attributes.insert(x.code.clone(), x);
            }
            Record::TransportMode(x) => {
                self.transport_modes.insert(x.code.clone(), x);
            }
            Record::TransportModeQuestion(x) => {
                self.transport_mode_questions.insert(x.code.clone(), x);
            }
            Record::TransportAttributeQuestion(x) => {
                self.transport_attribute_questions.insert(x.code.clone(), x);
            }
            Record::Changes(x) => {
                self.changes.insert(x.station.clone(), x);
            }
            Record::XChanges(x) => {
                self.x_changes.insert(x.station.clone(), x);
            }
            Record::Synonym(x) => self.synonyms.push(x),
            Record::Service(x) => {
                self.services.insert(x.identification, x);
            }
        }
    }

    /// Whether any validity of `service` has a footnote running on `date`.
    ///
    /// Validities pointing at unknown footnotes never match.
    pub fn service_runs_on(&self, service: &Service, date: NaiveDate) -> bool {
        service.validities.iter().any(|validity| {
            self.footnotes
                .get(&validity.footnote_number)
                .is_some_and(|footnote| footnote.runs_on(date))
        })
    }

    pub fn services_on(&self, date: NaiveDate) -> impl Iterator<Item = &Service> + '_ {
        self.services
            .values()
            .filter(move |service| self.service_runs_on(service, date))
    }
}
