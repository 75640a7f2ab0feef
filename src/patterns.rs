//! Column layouts of every IFF row kind.
//!
//! Columns are separated by a comma. Widths and markers are the interchange
//! contract with the existing data corpus and must not drift.

use crate::field::{FieldKind, FieldSpec, Pattern, Shape};

const fn text(name: &'static str, width: usize) -> FieldSpec {
    FieldSpec::new(name, width, Shape::Any, FieldKind::Text)
}

const fn number(name: &'static str, width: usize) -> FieldSpec {
    FieldSpec::new(name, width, Shape::Digits, FieldKind::Integer)
}

const fn coordinate(name: &'static str) -> FieldSpec {
    FieldSpec::new(name, 6, Shape::SignedDigits, FieldKind::Integer)
}

const fn date(name: &'static str) -> FieldSpec {
    FieldSpec::new(name, 8, Shape::Digits, FieldKind::Date)
}

const fn time(name: &'static str) -> FieldSpec {
    FieldSpec::new(name, 4, Shape::Digits, FieldKind::Time)
}

const fn company_or_any(name: &'static str) -> FieldSpec {
    FieldSpec::new(name, 3, Shape::WildcardDigits, FieldKind::WildcardInteger)
}

const fn mode_or_any(name: &'static str) -> FieldSpec {
    FieldSpec::new(name, 4, Shape::Any, FieldKind::WildcardText)
}

pub const IDENTIFICATION: Pattern = Pattern {
    name: "identification",
    marker: Some('@'),
    fields: &[
        number("company_number", 3),
        date("first_day"),
        date("last_day"),
        number("version_number", 4),
        text("description", 30),
    ],
};

pub const COMPANY: Pattern = Pattern {
    name: "company",
    marker: None,
    fields: &[
        number("company_number", 3),
        text("company_code", 10),
        text("company_name", 30),
        time("time"),
    ],
};

pub const COUNTRY: Pattern = Pattern {
    name: "country",
    marker: None,
    fields: &[text("country_code", 4), number("inland", 1), text("country_name", 30)],
};

pub const LANGUAGE: Pattern = Pattern {
    name: "language",
    marker: None,
    fields: &[text("language_code", 4), text("description", 30)],
};

pub const STATION: Pattern = Pattern {
    name: "station",
    marker: None,
    fields: &[
        number("train_changes", 1),
        text("code", 7),
        number("transfer_time", 2),
        number("max_time", 2),
        text("country_code", 4),
        number("time_zone", 4),
        FieldSpec::new("attr", 2, Shape::Any, FieldKind::Integer),
        coordinate("x"),
        coordinate("y"),
        text("name", 30),
    ],
};

pub const STATION_CONNECTION: Pattern = Pattern {
    name: "station connection",
    marker: Some('>'),
    fields: &[
        FieldSpec::ranged("from_station_short_name", 1, 7, Shape::Any, FieldKind::Text),
        FieldSpec::ranged("to_station_short_name", 1, 7, Shape::Any, FieldKind::Text),
    ],
};

pub const INFLECTION: Pattern = Pattern {
    name: "inflection",
    marker: Some('&'),
    fields: &[coordinate("x"), coordinate("y")],
};

pub const FOOTNOTE: Pattern = Pattern {
    name: "footnote",
    marker: Some('#'),
    fields: &[number("footnote_number", 5)],
};

pub const TIME_ZONE: Pattern = Pattern {
    name: "time zone",
    marker: Some('#'),
    fields: &[number("time_zone_number", 4)],
};

/// Periods carry their sign as part of the first column; it doubles as the group marker.
pub const TIME_ZONE_PERIOD: Pattern = Pattern {
    name: "time zone period",
    marker: None,
    fields: &[
        FieldSpec::new("time_difference", 3, Shape::ExplicitSign, FieldKind::Integer),
        date("first_day"),
        date("last_day"),
    ],
};

pub const TRANSPORT_ATTRIBUTE: Pattern = Pattern {
    name: "transport attribute",
    marker: None,
    fields: &[
        text("attribute_code", 4),
        FieldSpec::new("processing_code", 4, Shape::LeadingDigit, FieldKind::Integer),
        text("description", 30),
    ],
};

pub const TRANSPORT_MODE: Pattern = Pattern {
    name: "transport mode",
    marker: None,
    fields: &[text("transport_mode_code", 4), text("description", 30)],
};

pub const TRANSPORT_MODE_QUESTION: Pattern = Pattern {
    name: "transport mode question",
    marker: Some('#'),
    fields: &[text("question_code", 4), text("question", 30)],
};

pub const QUESTION_TRANSPORT_MODE: Pattern = Pattern {
    name: "question transport mode",
    marker: Some('-'),
    fields: &[text("transport_mode_code", 4)],
};

pub const TRANSPORT_ATTRIBUTE_QUESTION: Pattern = Pattern {
    name: "transport attribute question",
    marker: Some('#'),
    fields: &[
        text("question_code", 4),
        FieldSpec::new("question_type", 1, Shape::Binary, FieldKind::Integer),
        text("question", 30),
    ],
};

pub const QUESTION_TRANSPORT_ATTRIBUTE: Pattern = Pattern {
    name: "question transport attribute",
    marker: Some('-'),
    fields: &[text("transport_attribute_code", 4)],
};

pub const CHANGES: Pattern = Pattern {
    name: "changes",
    marker: Some('#'),
    fields: &[text("station_short_name", 7)],
};

pub const CHANGE: Pattern = Pattern {
    name: "change",
    marker: Some('-'),
    fields: &[
        number("from_service_identification", 8),
        number("to_service_identification", 8),
        FieldSpec::ranged("possibility_to_change_trains", 1, 2, Shape::Digits, FieldKind::Integer),
    ],
};

pub const X_CHANGES: Pattern = Pattern {
    name: "x-changes",
    marker: Some('#'),
    fields: &[text("station_short_name", 7)],
};

pub const X_CHANGE: Pattern = Pattern {
    name: "x-change",
    marker: Some('-'),
    fields: &[
        company_or_any("from_company_number"),
        mode_or_any("from_transport_mode"),
        company_or_any("to_company_number"),
        mode_or_any("to_transport_mode"),
        number("time_to_change_transport", 3),
        number("footnote_number", 5),
    ],
};

const CODE_SYNONYM: &[FieldSpec] = &[text("code", 4), text("language_code", 4), text("description", 30)];

pub const SYNONYM_TRANSPORT_ATTRIBUTE: Pattern = Pattern {
    name: "transport attribute synonym",
    marker: Some('*'),
    fields: CODE_SYNONYM,
};

pub const SYNONYM_TRANSPORT_MODE: Pattern = Pattern {
    name: "transport mode synonym",
    marker: Some('&'),
    fields: CODE_SYNONYM,
};

pub const SYNONYM_TRANSPORT_ATTRIBUTE_QUESTION: Pattern = Pattern {
    name: "transport attribute question synonym",
    marker: Some('$'),
    fields: CODE_SYNONYM,
};

pub const SYNONYM_TRANSPORT_MODE_QUESTION: Pattern = Pattern {
    name: "transport mode question synonym",
    marker: Some('#'),
    fields: CODE_SYNONYM,
};

pub const SYNONYM_CONNECTION_MODE: Pattern = Pattern {
    name: "connection mode synonym",
    marker: Some('%'),
    fields: CODE_SYNONYM,
};

pub const SYNONYM_COUNTRY: Pattern = Pattern {
    name: "country synonym",
    marker: Some('.'),
    fields: CODE_SYNONYM,
};

pub const SYNONYM_STATION: Pattern = Pattern {
    name: "station synonym",
    marker: Some('+'),
    fields: &[text("code", 7), text("language_code", 4), text("description", 30)],
};

pub const SYNONYM_GROUP: Pattern = Pattern {
    name: "group synonym",
    marker: Some('-'),
    fields: &[text("code", 7), text("language_code", 4), text("description", 30)],
};

pub const SERVICE: Pattern = Pattern {
    name: "service",
    marker: Some('#'),
    fields: &[number("service_identification", 8)],
};

pub const SERVICE_NUMBER: Pattern = Pattern {
    name: "service number",
    marker: Some('%'),
    fields: &[
        number("company_number", 3),
        number("service_number", 5),
        FieldSpec::ranged("variant", 6, 7, Shape::Any, FieldKind::Text),
        number("first_stop", 3),
        number("last_stop", 3),
        text("service_name", 30),
    ],
};

pub const SERVICE_VALIDITY: Pattern = Pattern {
    name: "service validity",
    marker: Some('-'),
    fields: &[number("footnote_number", 5), number("first_stop", 3), number("last_stop", 3)],
};

pub const SERVICE_TRANSPORT_MODE: Pattern = Pattern {
    name: "service transport mode",
    marker: Some('&'),
    fields: &[text("transport_mode_code", 4), number("first_stop", 3), number("last_stop", 3)],
};

pub const SERVICE_ATTRIBUTE: Pattern = Pattern {
    name: "service attribute",
    marker: Some('*'),
    fields: &[text("attribute_code", 4), number("first_stop", 3), number("last_stop", 3)],
};

pub const START_STOP: Pattern = Pattern {
    name: "start stop",
    marker: Some('>'),
    fields: &[text("station_short_name", 7), time("departure_time")],
};

pub const INTERVAL_STOP: Pattern = Pattern {
    name: "interval stop",
    marker: Some('+'),
    fields: &[text("station_short_name", 7), time("arrival_time"), time("departure_time")],
};

pub const CONTINUATION_STOP: Pattern = Pattern {
    name: "continuation stop",
    marker: Some('.'),
    fields: &[text("station_short_name", 7), time("time")],
};

pub const FINAL_STOP: Pattern = Pattern {
    name: "final stop",
    marker: Some('<'),
    fields: &[text("station_short_name", 7), time("arrival_time")],
};

pub const PASSING_STOP: Pattern = Pattern {
    name: "passing stop",
    marker: Some(';'),
    fields: &[text("station_short_name", 7)],
};

pub const PLATFORM: Pattern = Pattern {
    name: "platform",
    marker: Some('?'),
    fields: &[
        text("arrival_platform_name", 5),
        text("departure_platform_name", 5),
        number("footnote_number", 5),
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Value;
    use crate::time::ServiceTime;

    use chrono::{Days, NaiveDate};
    use proptest::prelude::*;

    const ALL: &[Pattern] = &[
        IDENTIFICATION,
        COMPANY,
        COUNTRY,
        LANGUAGE,
        STATION,
        STATION_CONNECTION,
        INFLECTION,
        FOOTNOTE,
        TIME_ZONE,
        TIME_ZONE_PERIOD,
        TRANSPORT_ATTRIBUTE,
        TRANSPORT_MODE,
        TRANSPORT_MODE_QUESTION,
        QUESTION_TRANSPORT_MODE,
        TRANSPORT_ATTRIBUTE_QUESTION,
        QUESTION_TRANSPORT_ATTRIBUTE,
        CHANGES,
        CHANGE,
        X_CHANGES,
        X_CHANGE,
        SYNONYM_TRANSPORT_ATTRIBUTE,
        SYNONYM_TRANSPORT_MODE,
        SYNONYM_TRANSPORT_ATTRIBUTE_QUESTION,
        SYNONYM_TRANSPORT_MODE_QUESTION,
        SYNONYM_CONNECTION_MODE,
        SYNONYM_COUNTRY,
        SYNONYM_STATION,
        SYNONYM_GROUP,
        SERVICE,
        SERVICE_NUMBER,
        SERVICE_VALIDITY,
        SERVICE_TRANSPORT_MODE,
        SERVICE_ATTRIBUTE,
        START_STOP,
        INTERVAL_STOP,
        CONTINUATION_STOP,
        FINAL_STOP,
        PASSING_STOP,
        PLATFORM,
    ];

    const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJ0123456789";

    /// Column text exactly `width` characters wide and the value it decodes to.
    fn column(spec: &FieldSpec, width: usize, seed: u64) -> (String, Value) {
        let limit = 10u64.saturating_pow(width as u32);
        let negative = seed & 1 == 1;
        let magnitude = seed % 10u64.saturating_pow(width as u32 - 1);
        match (spec.kind, spec.shape) {
            (FieldKind::Text | FieldKind::WildcardText, Shape::Any) => {
                let len = (seed % (width as u64 + 1)) as usize;
                let text: String = (0..len)
                    .map(|i| ALPHABET[(seed.rotate_left(i as u32 * 7) as usize + i) % ALPHABET.len()] as char)
                    .collect();
                (format!("{:<1$}", text, width), Value::Text(text))
            }
            (FieldKind::Integer, Shape::Digits) => {
                let n = seed % limit;
                (format!("{:01$}", n, width), Value::Integer(n as i64))
            }
            (FieldKind::Integer, Shape::SignedDigits) if negative => (
                format!("-{:01$}", magnitude, width - 1),
                Value::Integer(-(magnitude as i64)),
            ),
            (FieldKind::Integer, Shape::SignedDigits) => {
                let n = seed % limit;
                (format!("{:01$}", n, width), Value::Integer(n as i64))
            }
            (FieldKind::Integer, Shape::ExplicitSign) => {
                let (sign, value) = if negative {
                    ('-', -(magnitude as i64))
                } else {
                    ('+', magnitude as i64)
                };
                (format!("{}{:02$}", sign, magnitude, width - 1), Value::Integer(value))
            }
            (FieldKind::Integer, Shape::Binary) => {
                let n = seed % 2;
                (n.to_string(), Value::Integer(n as i64))
            }
            (FieldKind::Integer, Shape::LeadingDigit) => {
                let n = seed % limit;
                (format!("{:<1$}", n, width), Value::Integer(n as i64))
            }
            (FieldKind::Integer, Shape::Any) => {
                let n = seed % limit;
                (format!("{:>1$}", n, width), Value::Integer(n as i64))
            }
            (FieldKind::WildcardInteger, Shape::WildcardDigits) if negative => {
                (format!("{:<1$}", '*', width), Value::Wildcard)
            }
            (FieldKind::WildcardInteger, Shape::WildcardDigits) => {
                let n = seed % limit;
                (format!("{:01$}", n, width), Value::Integer(n as i64))
            }
            (FieldKind::Date, _) => {
                let date = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap() + Days::new(seed % 20000);
                (date.format("%d%m%Y").to_string(), Value::Date(date))
            }
            (FieldKind::Time, _) => {
                let (hours, minutes) = ((seed % 48) as u32, (seed / 48 % 60) as u32);
                (
                    format!("{:02}{:02}", hours, minutes),
                    Value::Time(ServiceTime::from_hm(hours, minutes)),
                )
            }
            other => panic!("no column generator for {:?}", other),
        }
    }

    fn line(pattern: &Pattern, widest: bool, seeds: &[u64]) -> (String, Vec<Value>) {
        let (columns, values): (Vec<String>, Vec<Value>) = pattern
            .fields
            .iter()
            .zip(seeds)
            .map(|(spec, seed)| {
                let width = if widest { spec.max_width } else { spec.min_width };
                column(spec, width, *seed)
            })
            .unzip();
        let marker = pattern.marker.map(String::from).unwrap_or_default();
        (format!("{}{}", marker, columns.join(",")), values)
    }

    #[test]
    fn ranged_columns_accept_both_widths() {
        let ranged: Vec<&str> = ALL
            .iter()
            .flat_map(|pattern| pattern.fields)
            .filter(|spec| spec.min_width != spec.max_width)
            .map(|spec| spec.name)
            .collect();
        assert_eq!(
            ranged,
            vec![
                "from_station_short_name",
                "to_station_short_name",
                "possibility_to_change_trains",
                "variant",
            ]
        );

        for pattern in [STATION_CONNECTION, CHANGE, SERVICE_NUMBER] {
            let seeds = [11u64, 12, 13, 14, 15, 16];
            let (narrow, narrow_values) = line(&pattern, false, &seeds);
            let (wide, wide_values) = line(&pattern, true, &seeds);
            assert!(narrow.len() < wide.len(), "{}", pattern.name);
            for (text, values) in [(narrow, narrow_values), (wide, wide_values)] {
                let row = pattern.extract(&text, 1).unwrap();
                let decoded: Vec<Value> = row.fields.into_iter().map(|field| field.value).collect();
                assert_eq!(decoded, values, "{} in {:?}", pattern.name, text);
            }
        }
    }

    proptest! {
        #[test]
        fn every_pattern_round_trips(seeds in proptest::collection::vec(any::<u64>(), 10)) {
            for pattern in ALL {
                prop_assert!(pattern.fields.len() <= seeds.len());
                for widest in [false, true] {
                    let (text, values) = line(pattern, widest, &seeds);
                    let row = pattern
                        .extract(&text, 1)
                        .map_err(|e| TestCaseError::fail(format!("{} {:?}: {}", pattern.name, text, e)))?;
                    for (spec, value) in pattern.fields.iter().zip(&values) {
                        prop_assert_eq!(row.get(spec.name), Some(value), "{} in {:?}", spec.name, text);
                    }
                }
            }
        }
    }
}
