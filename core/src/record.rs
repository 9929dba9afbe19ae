//! Record parser — one raw line in, at most one typed record out.
//!
//! Expected line shape: `date<DELIM>user_id<DELIM>flag`, where `flag`
//! may be empty (defaults to qualifying). Anything else is a `RecordError`.

use crate::{
    config::{ExtraFieldPolicy, RetentionConfig},
    error::RecordError,
    types::{DateKey, Flag, UserId, DEFAULT_FLAG},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

const FIELD_COUNT: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub date:    DateKey,
    pub user_id: UserId,
    pub flag:    Flag,
}

pub struct RecordParser {
    delimiter:      char,
    extra_fields:   ExtraFieldPolicy,
    calendar_dates: bool,
}

impl RecordParser {
    pub fn new(config: &RetentionConfig) -> Self {
        Self {
            delimiter:      config.delimiter,
            extra_fields:   config.extra_fields,
            calendar_dates: config.calendar_dates,
        }
    }

    pub fn parse(&self, line: &str) -> Result<Record, RecordError> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let fields: Vec<&str> = line.split(self.delimiter).collect();

        let arity_ok = match self.extra_fields {
            ExtraFieldPolicy::Reject => fields.len() == FIELD_COUNT,
            ExtraFieldPolicy::Ignore => fields.len() >= FIELD_COUNT,
        };
        if !arity_ok {
            return Err(RecordError::FieldCount {
                expected: FIELD_COUNT,
                actual:   fields.len(),
            });
        }

        let date = self.parse_date(fields[0])?;

        let user_id = fields[1];
        if user_id.is_empty() {
            return Err(RecordError::EmptyUserId);
        }

        let flag = match fields[2] {
            "" => DEFAULT_FLAG,
            raw => raw.parse::<Flag>().map_err(|_| RecordError::InvalidFlag {
                value: raw.to_string(),
            })?,
        };

        Ok(Record {
            date,
            user_id: user_id.to_string(),
            flag,
        })
    }

    fn parse_date(&self, raw: &str) -> Result<DateKey, RecordError> {
        let date = raw.parse::<DateKey>().map_err(|_| RecordError::InvalidDate {
            value: raw.to_string(),
        })?;
        if self.calendar_dates && NaiveDate::parse_from_str(raw, "%Y%m%d").is_err() {
            return Err(RecordError::InvalidCalendarDate {
                value: raw.to_string(),
            });
        }
        Ok(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> RecordParser {
        RecordParser::new(&RetentionConfig::default())
    }

    #[test]
    fn parses_well_formed_line() {
        let record = parser().parse("20240101\tu1\t0").unwrap();
        assert_eq!(
            record,
            Record { date: 20240101, user_id: "u1".into(), flag: 0 }
        );
    }

    #[test]
    fn empty_flag_defaults_to_qualifying() {
        let record = parser().parse("20240103\tu2\t").unwrap();
        assert_eq!(record.flag, DEFAULT_FLAG);
    }

    #[test]
    fn trailing_carriage_return_is_stripped() {
        let record = parser().parse("20240103\tu2\t5\r").unwrap();
        assert_eq!(record.flag, 5);
    }

    #[test]
    fn missing_flag_field_is_rejected() {
        assert_eq!(
            parser().parse("20240101\tu3"),
            Err(RecordError::FieldCount { expected: 3, actual: 2 })
        );
    }

    #[test]
    fn extra_fields_follow_policy() {
        let line = "20240101\tu1\t1\tref=home";
        assert_eq!(
            parser().parse(line),
            Err(RecordError::FieldCount { expected: 3, actual: 4 })
        );

        let lenient = RecordParser::new(&RetentionConfig {
            extra_fields: ExtraFieldPolicy::Ignore,
            ..RetentionConfig::default()
        });
        assert_eq!(lenient.parse(line).unwrap().user_id, "u1");
    }

    #[test]
    fn non_numeric_fields_are_rejected() {
        assert!(matches!(
            parser().parse("2024-01-01\tu1\t1"),
            Err(RecordError::InvalidDate { .. })
        ));
        assert!(matches!(
            parser().parse("20240101\tu1\tyes"),
            Err(RecordError::InvalidFlag { .. })
        ));
        assert_eq!(parser().parse("20240101\t\t1"), Err(RecordError::EmptyUserId));
    }

    #[test]
    fn calendar_check_is_opt_in() {
        assert_eq!(parser().parse("20241350\tu1\t1").unwrap().date, 20241350);

        let strict = RecordParser::new(&RetentionConfig {
            calendar_dates: true,
            ..RetentionConfig::default()
        });
        assert!(matches!(
            strict.parse("20241350\tu1\t1"),
            Err(RecordError::InvalidCalendarDate { .. })
        ));
        assert!(strict.parse("20240229\tu1\t1").is_ok());
    }

    #[test]
    fn custom_delimiter_is_honoured() {
        let csv = RecordParser::new(&RetentionConfig {
            delimiter: ',',
            ..RetentionConfig::default()
        });
        assert_eq!(csv.parse("20240101,u1,").unwrap().flag, 1);
    }
}
