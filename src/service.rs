//! Service (timetable) grammar.
//!
//! A service is a `#` identification row, four optional groups in fixed order
//! (`%` numbers, `-` validities, `&` transport modes, `*` attributes) and a
//! route running from a `>` start stop to a `<` final stop. Once a group has
//! ended, its marker is not looked for again.

use crate::cursor::LineCursor;
use crate::error::{IffError, IffErrorType};
use crate::field::{Pattern, Row};
use crate::grammar::{read_group, read_row, GrammarContext, TruncationPolicy};
use crate::patterns;
use crate::records::{
    Platform, Service, ServiceAttribute, ServiceNumber, ServiceTransportMode, ServiceValidity, Stop,
    StopKind,
};

use tracing::{debug, warn};

const START: char = '>';
const FINAL: char = '<';
const PASSING: char = ';';
const PLATFORM: char = '?';

const ROUTE_LAYOUTS: &[(char, Pattern)] = &[
    (START, patterns::START_STOP),
    ('+', patterns::INTERVAL_STOP),
    ('.', patterns::CONTINUATION_STOP),
    (PASSING, patterns::PASSING_STOP),
    (FINAL, patterns::FINAL_STOP),
];

pub(crate) fn read_service<I: Iterator<Item = String>>(
    cursor: &mut LineCursor<I>,
    context: &GrammarContext,
) -> Result<Service, IffError> {
    let head = read_row(cursor, &patterns::SERVICE)?;
    let identification = head.integer("service_identification")?;

    let numbers = read_group(cursor, &['%'], &patterns::SERVICE_NUMBER, ServiceNumber::from_row)?;
    let validities = read_group(cursor, &['-'], &patterns::SERVICE_VALIDITY, ServiceValidity::from_row)?;
    let transport_modes = read_group(
        cursor,
        &['&'],
        &patterns::SERVICE_TRANSPORT_MODE,
        ServiceTransportMode::from_row,
    )?;
    let attributes = read_group(cursor, &['*'], &patterns::SERVICE_ATTRIBUTE, ServiceAttribute::from_row)?;

    let route = read_route(cursor, identification, context.truncation)?;
    debug!(
        "Service {} at line {}: {} numbers, {} validities, {} stops",
        identification,
        head.line,
        numbers.len(),
        validities.len(),
        route.len()
    );

    Ok(Service {
        identification,
        numbers,
        validities,
        transport_modes,
        attributes,
        route,
    })
}

fn read_route<I: Iterator<Item = String>>(
    cursor: &mut LineCursor<I>,
    identification: i64,
    truncation: TruncationPolicy,
) -> Result<Vec<Stop>, IffError> {
    let mut route: Vec<Stop> = Vec::new();
    loop {
        let next_line_number = cursor.line_number() + 1;
        // blank lines separate records, so one here cuts the route short
        let marker = match cursor.peek() {
            Some(line) if !line.trim().is_empty() => line.chars().next(),
            _ => return truncated(route, identification, truncation, next_line_number),
        };

        let layout = match marker {
            _ if route.is_empty() => Some(&patterns::START_STOP),
            Some(START) => None,
            Some(marker) => ROUTE_LAYOUTS
                .iter()
                .find(|(candidate, _)| *candidate == marker)
                .map(|(_, pattern)| pattern),
            None => None,
        };
        let Some(pattern) = layout else {
            let line = cursor.next_line()?;
            return Err(IffError::new(
                IffErrorType::RowShapeMismatch {
                    line,
                    pattern: "route stop",
                },
                cursor.line_number(),
                0,
            ));
        };

        let row = read_row(cursor, pattern)?;
        let kind = stop_kind(pattern, &row)?;
        let platform = match kind {
            StopKind::Passing => None,
            _ if cursor.peek_marker() == Some(PLATFORM) => {
                Some(Platform::from_row(&read_row(cursor, &patterns::PLATFORM)?)?)
            }
            _ => None,
        };
        route.push(Stop {
            position: route.len() as u32 + 1,
            station: row.text("station_short_name")?,
            kind,
            platform,
        });

        if matches!(kind, StopKind::Final { .. }) {
            return Ok(route);
        }
    }
}

fn stop_kind(pattern: &Pattern, row: &Row) -> Result<StopKind, IffError> {
    Ok(match pattern.marker {
        Some(START) => StopKind::Start {
            departure: row.time("departure_time")?,
        },
        Some('+') => StopKind::Interval {
            arrival: row.time("arrival_time")?,
            departure: row.time("departure_time")?,
        },
        Some('.') => StopKind::Continuation { time: row.time("time")? },
        Some(FINAL) => StopKind::Final {
            arrival: row.time("arrival_time")?,
        },
        _ => StopKind::Passing,
    })
}

fn truncated(
    route: Vec<Stop>,
    identification: i64,
    truncation: TruncationPolicy,
    line: u64,
) -> Result<Vec<Stop>, IffError> {
    match truncation {
        TruncationPolicy::Lenient => {
            warn!(
                "Input ended inside the route of service {}; keeping {} stops",
                identification,
                route.len()
            );
            Ok(route)
        }
        TruncationPolicy::Strict => Err(IffError::new(IffErrorType::TruncatedRoute(identification), line, 0)),
    }
}
