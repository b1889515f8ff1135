//! Daily price record and the CSV row shapes it is parsed from.

use super::cleaner;

/// Longest date token accepted in the first column.
pub const MAX_DATE_LEN: usize = 19;

#[derive(Debug, Clone, PartialEq)]
pub struct DailyRecord {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl DailyRecord {
    /// (open + high + low + close) / 4
    pub fn average_price(&self) -> f64 {
        (self.open + self.high + self.low + self.close) / 4.0
    }

    /// Calendar year taken from the leading digits of the date token.
    pub fn year(&self) -> Option<i32> {
        cleaner::leading_year(&self.date)
    }
}

/// Column layout of a price file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RowShape {
    /// `date,open,high,low,close,volume`
    Plain,
    /// `date,open,high,low,close,adj_close,volume`; the adjusted close is
    /// validated but discarded.
    #[default]
    AdjClose,
}

impl RowShape {
    pub fn from_columns(columns: i64) -> Option<Self> {
        match columns {
            6 => Some(RowShape::Plain),
            7 => Some(RowShape::AdjClose),
            _ => None,
        }
    }

    pub fn columns(self) -> usize {
        match self {
            RowShape::Plain => 6,
            RowShape::AdjClose => 7,
        }
    }

    /// Parse one row. Returns `None` unless every expected field is present
    /// and well formed. Fields past the expected set are ignored.
    pub fn parse_row<'a, I>(self, fields: I) -> Option<DailyRecord>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut fields = fields.into_iter();

        let date = fields.next()?.trim();
        if date.is_empty() || date.len() > MAX_DATE_LEN {
            return None;
        }

        let open = parse_number(fields.next()?)?;
        let high = parse_number(fields.next()?)?;
        let low = parse_number(fields.next()?)?;
        let close = parse_number(fields.next()?)?;
        if self == RowShape::AdjClose {
            parse_number(fields.next()?)?;
        }
        let volume = parse_number(fields.next()?)?;

        Some(DailyRecord {
            date: date.to_string(),
            open,
            high,
            low,
            close,
            volume,
        })
    }
}

fn parse_number(field: &str) -> Option<f64> {
    field
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(line: &str) -> Vec<&str> {
        line.split(',').collect()
    }

    #[test]
    fn average_price_of_four_fields() {
        let rec = RowShape::Plain
            .parse_row(fields("1995-01-03,10,11,9,10,1000"))
            .unwrap();
        assert!((rec.average_price() - 10.0).abs() < f64::EPSILON);
        assert_eq!(rec.year(), Some(1995));
    }

    #[test]
    fn adj_close_column_is_skipped() {
        let rec = RowShape::AdjClose
            .parse_row(fields("2005-06-01,50,52,49,51,50.5,12000"))
            .unwrap();
        assert_eq!(rec.close, 51.0);
        assert_eq!(rec.volume, 12000.0);
    }

    #[test]
    fn short_row_is_rejected() {
        assert!(RowShape::AdjClose
            .parse_row(fields("2005-06-01,50,52,49,51,12000"))
            .is_none());
        assert!(RowShape::Plain.parse_row(fields("2005-06-01,50,52")).is_none());
    }

    #[test]
    fn extra_trailing_fields_are_ignored() {
        let rec = RowShape::Plain
            .parse_row(fields("2005-06-01,50,52,49,51,12000,junk"))
            .unwrap();
        assert_eq!(rec.volume, 12000.0);
    }

    #[test]
    fn unparseable_number_rejects_row() {
        assert!(RowShape::Plain
            .parse_row(fields("2005-06-01,50,abc,49,51,12000"))
            .is_none());
        assert!(RowShape::AdjClose
            .parse_row(fields("2005-06-01,50,52,49,51,,12000"))
            .is_none());
    }

    #[test]
    fn non_finite_values_reject_row() {
        assert!(RowShape::Plain
            .parse_row(fields("2005-06-01,NaN,52,49,51,12000"))
            .is_none());
        assert!(RowShape::Plain
            .parse_row(fields("2005-06-01,50,inf,49,51,12000"))
            .is_none());
    }

    #[test]
    fn date_token_length_limit() {
        let ok = format!("{},1,1,1,1,1", "9".repeat(MAX_DATE_LEN));
        let too_long = format!("{},1,1,1,1,1", "9".repeat(MAX_DATE_LEN + 1));
        assert!(RowShape::Plain.parse_row(fields(&ok)).is_some());
        assert!(RowShape::Plain.parse_row(fields(&too_long)).is_none());
        assert!(RowShape::Plain.parse_row(fields(",1,1,1,1,1")).is_none());
    }

    #[test]
    fn whitespace_around_fields_is_tolerated() {
        let rec = RowShape::Plain
            .parse_row(fields(" 1999-12-31 , 1.5 , 2 , 1 , 1.75 , 300 "))
            .unwrap();
        assert_eq!(rec.date, "1999-12-31");
        assert_eq!(rec.open, 1.5);
    }

    #[test]
    fn shape_from_columns() {
        assert_eq!(RowShape::from_columns(6), Some(RowShape::Plain));
        assert_eq!(RowShape::from_columns(7), Some(RowShape::AdjClose));
        assert_eq!(RowShape::from_columns(5), None);
        assert_eq!(RowShape::AdjClose.columns(), 7);
    }
}
