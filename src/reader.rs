//! Document reader: one grammar bound to one line source.

use crate::cursor::LineCursor;
use crate::error::{IffError, IffErrorType};
use crate::footnote::ValidityWindow;
use crate::grammar::{read_record, read_row, GrammarContext, RecordKind, TruncationPolicy};
use crate::patterns;
use crate::records::{Delivery, Record};

use tracing::debug;

use std::iter::FusedIterator;

enum Mode {
    Records,
    DeliveryOnly { returned: bool },
}

/// Pulls one assembled [`Record`] at a time from a sequence of decoded lines.
///
/// After the first error the reader yields nothing further.
pub struct IffReader<I> {
    cursor: LineCursor<I>,
    kind: RecordKind,
    context: GrammarContext,
    delivery: Option<Delivery>,
    mode: Mode,
    failed: bool,
}

impl<I: Iterator<Item = String>> IffReader<I> {
    /// Reads the identification record from the first line before anything else.
    ///
    /// With `RecordKind::Delivery` the identification record is the only record returned.
    pub fn new(lines: I, kind: RecordKind) -> Result<Self, IffError> {
        let mut cursor = LineCursor::new(lines);
        let row = match read_row(&mut cursor, &patterns::IDENTIFICATION) {
            Ok(x) => x,
            Err(e) if e.is_end_of_input() => {
                return Err(IffError::new(IffErrorType::MissingIdentification, e.line, 0))
            }
            Err(e) => return Err(e),
        };
        let delivery = Delivery::from_row(&row)?;
        debug!(
            "Delivery {} version {} valid {} to {}",
            delivery.company_number, delivery.version_number, delivery.first_day, delivery.last_day
        );

        let mode = match kind {
            RecordKind::Delivery => Mode::DeliveryOnly { returned: false },
            _ => Mode::Records,
        };
        Ok(Self {
            cursor,
            kind,
            context: GrammarContext {
                window: Some(delivery.validity_window()),
                truncation: TruncationPolicy::default(),
            },
            delivery: Some(delivery),
            mode,
            failed: false,
        })
    }

    /// For files whose identification record is kept elsewhere; `window` is needed by footnote files.
    pub fn without_identification(lines: I, kind: RecordKind, window: Option<ValidityWindow>) -> Self {
        Self {
            cursor: LineCursor::new(lines),
            kind,
            context: GrammarContext {
                window,
                truncation: TruncationPolicy::default(),
            },
            delivery: None,
            mode: Mode::Records,
            failed: false,
        }
    }

    pub fn delivery_only(lines: I) -> Result<Self, IffError> {
        Self::new(lines, RecordKind::Delivery)
    }

    pub fn with_truncation(mut self, truncation: TruncationPolicy) -> Self {
        self.context.truncation = truncation;
        self
    }

    pub fn delivery(&self) -> Option<&Delivery> {
        self.delivery.as_ref()
    }

    pub fn validity_window(&self) -> Option<ValidityWindow> {
        self.context.window
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// `Ok(None)` once the input is exhausted between records.
    pub fn next_record(&mut self) -> Result<Option<Record>, IffError> {
        if let Mode::DeliveryOnly { returned } = &mut self.mode {
            if *returned {
                return Ok(None);
            }
            *returned = true;
            return Ok(self.delivery.clone().map(Record::Delivery));
        }

        while self.cursor.peek().is_some_and(|line| line.trim().is_empty()) {
            self.cursor.next_line()?;
        }
        if self.cursor.peek().is_none() {
            return Ok(None);
        }
        read_record(self.kind, &mut self.cursor, &self.context).map(Some)
    }
}

impl<I: Iterator<Item = String>> Iterator for IffReader<I> {
    type Item = Result<Record, IffError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let result = self.next_record().transpose();
        if matches!(result, Some(Err(_))) {
            self.failed = true;
        }
        result
    }
}

impl<I: Iterator<Item = String>> FusedIterator for IffReader<I> {}
