//! Field extraction engine.
//!
//! Every IFF row kind is described by a [`Pattern`]: an optional leading marker
//! character followed by comma separated columns. Each column is a
//! [`FieldSpec`] carrying its width, the characters it admits and the kind of
//! value it converts to. One matching routine and one conversion routine serve
//! every grammar.

use crate::error::{IffError, IffErrorType};
use crate::time::ServiceTime;

use chrono::NaiveDate;

use std::ops::Range;

pub const WILDCARD_MARKER: char = '*';
const SEPARATOR: char = ',';

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldKind {
    Text,
    /// Text which may also hold a wildcard upstream; converted like `Text`.
    WildcardText,
    Integer,
    /// Integer which may instead hold the literal wildcard marker.
    WildcardInteger,
    Date,
    Time,
}

/// Characters a column admits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Any,
    Digits,
    /// Leading `-` or digit, then digits.
    SignedDigits,
    /// Mandatory leading `+` or `-`, then digits.
    ExplicitSign,
    Binary,
    /// Leading digit, then anything.
    LeadingDigit,
    /// Digits, or the wildcard marker padded with whitespace.
    WildcardDigits,
}

impl Shape {
    fn accepts(&self, chars: &[char]) -> bool {
        let all_digits = |c: &[char]| c.iter().all(char::is_ascii_digit);
        match self {
            Shape::Any => true,
            Shape::Digits => all_digits(chars),
            Shape::SignedDigits => match chars.split_first() {
                Some((first, rest)) => (*first == '-' || first.is_ascii_digit()) && all_digits(rest),
                None => true,
            },
            Shape::ExplicitSign => match chars.split_first() {
                Some((first, rest)) => (*first == '-' || *first == '+') && all_digits(rest),
                None => false,
            },
            Shape::Binary => chars.iter().all(|c| *c == '0' || *c == '1'),
            Shape::LeadingDigit => chars.first().map_or(true, char::is_ascii_digit),
            Shape::WildcardDigits => match chars.split_first() {
                Some((&WILDCARD_MARKER, rest)) => rest.iter().all(|c| c.is_whitespace()),
                _ => all_digits(chars),
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub min_width: usize,
    pub max_width: usize,
    pub shape: Shape,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn new(name: &'static str, width: usize, shape: Shape, kind: FieldKind) -> Self {
        Self {
            name,
            min_width: width,
            max_width: width,
            shape,
            kind,
        }
    }

    /// A column whose width may vary; the longest admissible width wins.
    pub const fn ranged(name: &'static str, min_width: usize, max_width: usize, shape: Shape, kind: FieldKind) -> Self {
        Self {
            name,
            min_width,
            max_width,
            shape,
            kind,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pattern {
    pub name: &'static str,
    pub marker: Option<char>,
    pub fields: &'static [FieldSpec],
}

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Wildcard,
    Date(NaiveDate),
    Time(ServiceTime),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub column: usize,
    pub value: Value,
}

/// Typed fields of one matched line, in pattern order.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    pub line: u64,
    pub fields: Vec<Field>,
}

impl Row {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|field| field.name == name).map(|field| &field.value)
    }

    fn field(&self, name: &'static str) -> Result<&Field, IffError> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .ok_or_else(|| IffError::new(IffErrorType::UnknownField(name), self.line, 0))
    }

    fn mismatch(&self, field: &Field, expected: &'static str) -> IffError {
        IffError::new(
            IffErrorType::FieldKindMismatch {
                field: field.name,
                expected,
            },
            self.line,
            field.column,
        )
    }

    pub fn text(&self, name: &'static str) -> Result<String, IffError> {
        let field = self.field(name)?;
        match &field.value {
            Value::Text(x) => Ok(x.clone()),
            _ => Err(self.mismatch(field, "text")),
        }
    }

    pub fn integer(&self, name: &'static str) -> Result<i64, IffError> {
        let field = self.field(name)?;
        match field.value {
            Value::Integer(x) => Ok(x),
            _ => Err(self.mismatch(field, "integer")),
        }
    }

    /// `None` when the column held the wildcard marker.
    pub fn wildcard_integer(&self, name: &'static str) -> Result<Option<i64>, IffError> {
        let field = self.field(name)?;
        match field.value {
            Value::Integer(x) => Ok(Some(x)),
            Value::Wildcard => Ok(None),
            _ => Err(self.mismatch(field, "wildcard integer")),
        }
    }

    pub fn date(&self, name: &'static str) -> Result<NaiveDate, IffError> {
        let field = self.field(name)?;
        match field.value {
            Value::Date(x) => Ok(x),
            _ => Err(self.mismatch(field, "date")),
        }
    }

    pub fn time(&self, name: &'static str) -> Result<ServiceTime, IffError> {
        let field = self.field(name)?;
        match field.value {
            Value::Time(x) => Ok(x),
            _ => Err(self.mismatch(field, "time")),
        }
    }
}

impl Pattern {
    /// Matches `line` from its first character; anything after the last column is ignored.
    pub fn extract(&self, line: &str, line_number: u64) -> Result<Row, IffError> {
        let chars: Vec<char> = line.chars().collect();
        let start = match self.marker {
            Some(marker) if chars.first() == Some(&marker) => 1,
            Some(_) => return Err(self.mismatch(line, line_number, 0)),
            None => 0,
        };

        let mut spans = Vec::with_capacity(self.fields.len());
        let mut furthest = start;
        if !self.capture(&chars, start, 0, &mut spans, &mut furthest) {
            return Err(self.mismatch(line, line_number, furthest));
        }

        let fields = self
            .fields
            .iter()
            .zip(spans)
            .map(|(spec, span)| {
                let raw: String = chars[span.clone()].iter().collect();
                Ok(Field {
                    name: spec.name,
                    column: span.start,
                    value: convert(spec.kind, raw.trim())
                        .map_err(|error_type| IffError::new(error_type, line_number, span.start))?,
                })
            })
            .collect::<Result<Vec<Field>, IffError>>()?;

        Ok(Row {
            line: line_number,
            fields,
        })
    }

    fn mismatch(&self, line: &str, line_number: u64, column: usize) -> IffError {
        IffError::new(
            IffErrorType::RowShapeMismatch {
                line: line.to_string(),
                pattern: self.name,
            },
            line_number,
            column,
        )
    }

    fn capture(
        &self,
        chars: &[char],
        pos: usize,
        index: usize,
        spans: &mut Vec<Range<usize>>,
        furthest: &mut usize,
    ) -> bool {
        let Some(spec) = self.fields.get(index) else {
            return true;
        };
        let start = if index == 0 {
            pos
        } else if chars.get(pos) == Some(&SEPARATOR) {
            pos + 1
        } else {
            *furthest = (*furthest).max(pos);
            return false;
        };

        let available = chars.len().saturating_sub(start);
        for width in (spec.min_width..=spec.max_width.min(available)).rev() {
            let span = start..start + width;
            if !spec.shape.accepts(&chars[span.clone()]) {
                continue;
            }
            spans.push(span);
            if self.capture(chars, start + width, index + 1, spans, furthest) {
                return true;
            }
            spans.pop();
        }
        *furthest = (*furthest).max(start);
        false
    }
}

fn convert(kind: FieldKind, raw: &str) -> Result<Value, IffErrorType> {
    match kind {
        FieldKind::Text | FieldKind::WildcardText => Ok(Value::Text(raw.to_string())),
        FieldKind::WildcardInteger if raw == WILDCARD_MARKER.to_string() => Ok(Value::Wildcard),
        FieldKind::Integer | FieldKind::WildcardInteger => parse_integer(raw).map(Value::Integer),
        FieldKind::Date => parse_date(raw).map(Value::Date),
        FieldKind::Time => ServiceTime::parse_hhmm(raw)
            .map(Value::Time)
            .ok_or_else(|| IffErrorType::InvalidTime(raw.to_string())),
    }
}

pub fn parse_integer(raw: &str) -> Result<i64, IffErrorType> {
    if raw.is_empty() {
        return Ok(0);
    }
    raw.parse().map_err(|_| IffErrorType::InvalidInteger(raw.to_string()))
}

/// Reads a `DDMMYYYY` token.
pub fn parse_date(raw: &str) -> Result<NaiveDate, IffErrorType> {
    let invalid = || IffErrorType::InvalidDate(raw.to_string());
    if raw.len() != 8 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let day = raw[..2].parse().map_err(|_| invalid())?;
    let month = raw[2..4].parse().map_err(|_| invalid())?;
    let year = raw[4..].parse().map_err(|_| invalid())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SAMPLE_FIELDS: &[FieldSpec] = &[
        FieldSpec::new("number", 3, Shape::Digits, FieldKind::Integer),
        FieldSpec::new("code", 4, Shape::Any, FieldKind::Text),
        FieldSpec::new("company", 3, Shape::WildcardDigits, FieldKind::WildcardInteger),
        FieldSpec::new("day", 8, Shape::Digits, FieldKind::Date),
        FieldSpec::new("time", 4, Shape::Digits, FieldKind::Time),
    ];
    const SAMPLE: Pattern = Pattern {
        name: "sample",
        marker: Some('-'),
        fields: SAMPLE_FIELDS,
    };

    const RANGED_FIELDS: &[FieldSpec] = &[
        FieldSpec::ranged("from", 1, 7, Shape::Any, FieldKind::Text),
        FieldSpec::ranged("to", 1, 7, Shape::Any, FieldKind::Text),
    ];
    const RANGED: Pattern = Pattern {
        name: "ranged",
        marker: Some('>'),
        fields: RANGED_FIELDS,
    };

    const BLANK_FIELDS: &[FieldSpec] = &[FieldSpec::new("attr", 2, Shape::Any, FieldKind::Integer)];
    const BLANK: Pattern = Pattern {
        name: "blank",
        marker: None,
        fields: BLANK_FIELDS,
    };

    #[test]
    fn extracts_typed_fields() {
        let row = SAMPLE.extract("-012,ab  ,*  ,01012020,2510", 7).unwrap();
        assert_eq!(row.line, 7);
        assert_eq!(row.integer("number").unwrap(), 12);
        assert_eq!(row.text("code").unwrap(), "ab");
        assert_eq!(row.wildcard_integer("company").unwrap(), None);
        assert_eq!(row.get("company"), Some(&Value::Wildcard));
        assert_eq!(row.date("day").unwrap(), NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(row.time("time").unwrap(), ServiceTime::from_hm(25, 10));
    }

    #[test]
    fn numeric_wildcard_column_is_an_integer() {
        let row = SAMPLE.extract("-012,ab  ,100,01012020,0000", 1).unwrap();
        assert_eq!(row.wildcard_integer("company").unwrap(), Some(100));
    }

    #[test]
    fn blank_integer_column_is_zero() {
        let row = BLANK.extract("  ", 1).unwrap();
        assert_eq!(row.integer("attr").unwrap(), 0);
    }

    #[test]
    fn wrong_marker_is_a_shape_mismatch() {
        let err = SAMPLE.extract("+012,ab  ,100,01012020,0000", 4).unwrap_err();
        assert_eq!(err.line, 4);
        assert_eq!(err.column, 0);
        assert!(matches!(
            err.error_type,
            IffErrorType::RowShapeMismatch { pattern: "sample", .. }
        ));
    }

    #[test]
    fn short_line_reports_failing_column() {
        let err = SAMPLE.extract("-012,ab  ,1x0,01012020,0000", 1).unwrap_err();
        assert_eq!(err.column, 10);
    }

    #[test]
    fn ranged_columns_backtrack_to_the_separator() {
        let row = RANGED.extract(">ams,ut", 1).unwrap();
        assert_eq!(row.text("from").unwrap(), "ams");
        assert_eq!(row.text("to").unwrap(), "ut");

        let row = RANGED.extract(">asd    ,rtd    ", 1).unwrap();
        assert_eq!(row.text("from").unwrap(), "asd");
        assert_eq!(row.text("to").unwrap(), "rtd");
    }

    #[test]
    fn impossible_calendar_date_is_rejected() {
        assert_eq!(
            parse_date("31022020"),
            Err(IffErrorType::InvalidDate("31022020".to_string()))
        );
    }

    #[test]
    fn asking_for_the_wrong_kind_is_a_configuration_defect() {
        let row = SAMPLE.extract("-012,ab  ,100,01012020,0000", 1).unwrap();
        assert!(matches!(
            row.text("number").unwrap_err().error_type,
            IffErrorType::FieldKindMismatch { field: "number", .. }
        ));
        assert_eq!(
            row.integer("missing").unwrap_err().error_type,
            IffErrorType::UnknownField("missing")
        );
    }

    proptest! {
        #[test]
        fn columns_round_trip(number in 0i64..1000, code in "[a-z]{0,4}", hours in 0u32..48, minutes in 0u32..60) {
            let line = format!("-{:03},{:<4},{:03},15062021,{:02}{:02}", number, code, number, hours, minutes);
            let row = SAMPLE.extract(&line, 1).unwrap();
            prop_assert_eq!(row.integer("number").unwrap(), number);
            prop_assert_eq!(row.text("code").unwrap(), code);
            prop_assert_eq!(row.wildcard_integer("company").unwrap(), Some(number));
            prop_assert_eq!(row.time("time").unwrap(), ServiceTime::from_hm(hours, minutes));
        }
    }
}
