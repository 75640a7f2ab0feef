//! Record grammars.
//!
//! Three shapes cover every record kind but the service grammar: flat (one row
//! per record), head/tail (a head row followed by rows whose marker belongs to
//! the grammar's tail set) and marker dispatch (the synonym file, where the
//! leading character selects one of several unrelated layouts).

use crate::cursor::LineCursor;
use crate::error::{IffError, IffErrorType};
use crate::field::{Pattern, Row};
use crate::footnote::{FootnoteCalendar, ValidityWindow};
use crate::patterns;
use crate::records::{
    Change, Changes, Company, Country, Delivery, Footnote, Inflection, Language, Record, Station,
    StationConnection, Synonym, SynonymKind, TimeZone, TimeZonePeriod, TransportAttribute,
    TransportAttributeQuestion, TransportMode, TransportModeQuestion, XChange, XChanges,
};
use crate::service;

use serde::Deserialize;
use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Delivery,
    Company,
    Country,
    Language,
    Station,
    StationConnection,
    Footnote,
    XFootnote,
    TimeZone,
    TransportAttribute,
    TransportMode,
    TransportModeQuestion,
    TransportAttributeQuestion,
    Changes,
    XChanges,
    Synonym,
    Service,
}

/// What to do when input ends inside a service's route.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TruncationPolicy {
    /// Keep the stops read so far and log a warning.
    #[default]
    Lenient,
    Strict,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GrammarContext {
    pub window: Option<ValidityWindow>,
    pub truncation: TruncationPolicy,
}

pub const SYNONYM_DISPATCH: &[(char, SynonymKind, Pattern)] = &[
    ('*', SynonymKind::TransportAttribute, patterns::SYNONYM_TRANSPORT_ATTRIBUTE),
    ('&', SynonymKind::TransportMode, patterns::SYNONYM_TRANSPORT_MODE),
    ('$', SynonymKind::TransportAttributeQuestion, patterns::SYNONYM_TRANSPORT_ATTRIBUTE_QUESTION),
    ('#', SynonymKind::TransportModeQuestion, patterns::SYNONYM_TRANSPORT_MODE_QUESTION),
    ('%', SynonymKind::ConnectionMode, patterns::SYNONYM_CONNECTION_MODE),
    ('+', SynonymKind::Station, patterns::SYNONYM_STATION),
    ('-', SynonymKind::Group, patterns::SYNONYM_GROUP),
    ('.', SynonymKind::Country, patterns::SYNONYM_COUNTRY),
];

pub fn synonym_layout(marker: char) -> Option<(SynonymKind, &'static Pattern)> {
    SYNONYM_DISPATCH
        .iter()
        .find(|(candidate, _, _)| *candidate == marker)
        .map(|(_, kind, pattern)| (*kind, pattern))
}

pub(crate) fn read_row<I: Iterator<Item = String>>(
    cursor: &mut LineCursor<I>,
    pattern: &Pattern,
) -> Result<Row, IffError> {
    let line = cursor.next_line()?;
    pattern.extract(&line, cursor.line_number())
}

/// Consumes rows while the next line's marker is one of `markers`.
///
/// Running out of input ends the group; it is not an error.
pub(crate) fn read_group<I, T, F>(
    cursor: &mut LineCursor<I>,
    markers: &[char],
    pattern: &Pattern,
    convert: F,
) -> Result<Vec<T>, IffError>
where
    I: Iterator<Item = String>,
    F: Fn(&Row) -> Result<T, IffError>,
{
    let mut items = Vec::new();
    while cursor
        .peek_marker()
        .is_some_and(|marker| markers.contains(&marker))
    {
        let row = read_row(cursor, pattern)?;
        items.push(convert(&row)?);
    }
    Ok(items)
}

fn flat<I, T>(
    cursor: &mut LineCursor<I>,
    pattern: &Pattern,
    convert: fn(&Row) -> Result<T, IffError>,
) -> Result<T, IffError>
where
    I: Iterator<Item = String>,
{
    let row = read_row(cursor, pattern)?;
    convert(&row)
}

pub fn read_record<I: Iterator<Item = String>>(
    kind: RecordKind,
    cursor: &mut LineCursor<I>,
    context: &GrammarContext,
) -> Result<Record, IffError> {
    match kind {
        RecordKind::Delivery => flat(cursor, &patterns::IDENTIFICATION, Delivery::from_row).map(Record::Delivery),
        RecordKind::Company => flat(cursor, &patterns::COMPANY, Company::from_row).map(Record::Company),
        RecordKind::Country => flat(cursor, &patterns::COUNTRY, Country::from_row).map(Record::Country),
        RecordKind::Language => flat(cursor, &patterns::LANGUAGE, Language::from_row).map(Record::Language),
        RecordKind::Station => flat(cursor, &patterns::STATION, Station::from_row).map(Record::Station),
        RecordKind::TransportAttribute => {
            flat(cursor, &patterns::TRANSPORT_ATTRIBUTE, TransportAttribute::from_row).map(Record::TransportAttribute)
        }
        RecordKind::TransportMode => {
            flat(cursor, &patterns::TRANSPORT_MODE, TransportMode::from_row).map(Record::TransportMode)
        }
        RecordKind::StationConnection => read_station_connection(cursor).map(Record::StationConnection),
        RecordKind::Footnote | RecordKind::XFootnote => read_footnote(cursor, context).map(Record::Footnote),
        RecordKind::TimeZone => read_time_zone(cursor).map(Record::TimeZone),
        RecordKind::TransportModeQuestion => read_transport_mode_question(cursor).map(Record::TransportModeQuestion),
        RecordKind::TransportAttributeQuestion => {
            read_transport_attribute_question(cursor).map(Record::TransportAttributeQuestion)
        }
        RecordKind::Changes => read_changes(cursor).map(Record::Changes),
        RecordKind::XChanges => read_x_changes(cursor).map(Record::XChanges),
        RecordKind::Synonym => read_synonym(cursor).map(Record::Synonym),
        RecordKind::Service => service::read_service(cursor, context).map(Record::Service),
    }
}

fn read_station_connection<I: Iterator<Item = String>>(
    cursor: &mut LineCursor<I>,
) -> Result<StationConnection, IffError> {
    let head = read_row(cursor, &patterns::STATION_CONNECTION)?;
    let inflections = read_group(cursor, &['&'], &patterns::INFLECTION, Inflection::from_row)?;
    debug!("Station connection at line {} has {} inflections", head.line, inflections.len());
    Ok(StationConnection {
        from_station: head.text("from_station_short_name")?,
        to_station: head.text("to_station_short_name")?,
        inflections,
    })
}

fn read_footnote<I: Iterator<Item = String>>(
    cursor: &mut LineCursor<I>,
    context: &GrammarContext,
) -> Result<Footnote, IffError> {
    let head = read_row(cursor, &patterns::FOOTNOTE)?;
    let window = context
        .window
        .ok_or_else(|| IffError::new(IffErrorType::MissingValidityWindow, head.line, 0))?;
    let vector = cursor.next_line()?;
    Ok(Footnote {
        number: head.integer("footnote_number")?,
        calendar: FootnoteCalendar::decode(&window, &vector),
    })
}

fn read_time_zone<I: Iterator<Item = String>>(cursor: &mut LineCursor<I>) -> Result<TimeZone, IffError> {
    let head = read_row(cursor, &patterns::TIME_ZONE)?;
    let periods = read_group(cursor, &['+', '-'], &patterns::TIME_ZONE_PERIOD, TimeZonePeriod::from_row)?;
    debug!("Time zone at line {} has {} periods", head.line, periods.len());
    Ok(TimeZone {
        number: head.integer("time_zone_number")?,
        periods,
    })
}

fn read_transport_mode_question<I: Iterator<Item = String>>(
    cursor: &mut LineCursor<I>,
) -> Result<TransportModeQuestion, IffError> {
    let head = read_row(cursor, &patterns::TRANSPORT_MODE_QUESTION)?;
    let transport_modes = read_group(cursor, &['-'], &patterns::QUESTION_TRANSPORT_MODE, |row| {
        row.text("transport_mode_code")
    })?;
    Ok(TransportModeQuestion {
        code: head.text("question_code")?,
        question: head.text("question")?,
        transport_modes,
    })
}

fn read_transport_attribute_question<I: Iterator<Item = String>>(
    cursor: &mut LineCursor<I>,
) -> Result<TransportAttributeQuestion, IffError> {
    let head = read_row(cursor, &patterns::TRANSPORT_ATTRIBUTE_QUESTION)?;
    let transport_attributes = read_group(cursor, &['-'], &patterns::QUESTION_TRANSPORT_ATTRIBUTE, |row| {
        row.text("transport_attribute_code")
    })?;
    Ok(TransportAttributeQuestion {
        code: head.text("question_code")?,
        question_type: head.integer("question_type")?,
        question: head.text("question")?,
        transport_attributes,
    })
}

fn read_changes<I: Iterator<Item = String>>(cursor: &mut LineCursor<I>) -> Result<Changes, IffError> {
    let head = read_row(cursor, &patterns::CHANGES)?;
    let changes = read_group(cursor, &['-'], &patterns::CHANGE, Change::from_row)?;
    debug!("Changes at line {} list {} connections", head.line, changes.len());
    Ok(Changes {
        station: head.text("station_short_name")?,
        changes,
    })
}

fn read_x_changes<I: Iterator<Item = String>>(cursor: &mut LineCursor<I>) -> Result<XChanges, IffError> {
    let head = read_row(cursor, &patterns::X_CHANGES)?;
    let xchanges = read_group(cursor, &['-'], &patterns::X_CHANGE, XChange::from_row)?;
    debug!("X-changes at line {} list {} connections", head.line, xchanges.len());
    Ok(XChanges {
        station: head.text("station_short_name")?,
        xchanges,
    })
}

fn read_synonym<I: Iterator<Item = String>>(cursor: &mut LineCursor<I>) -> Result<Synonym, IffError> {
    let line = cursor.next_line()?;
    let (kind, pattern) = match line.chars().next().and_then(synonym_layout) {
        Some(x) => x,
        None => {
            return Err(IffError::new(
                IffErrorType::RowShapeMismatch {
                    line,
                    pattern: "synonym",
                },
                cursor.line_number(),
                0,
            ))
        }
    };
    let row = pattern.extract(&line, cursor.line_number())?;
    Ok(Synonym {
        kind,
        code: row.text("code")?,
        language_code: row.text("language_code")?,
        description: row.text("description")?,
    })
}
