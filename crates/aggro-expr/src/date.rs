//! Date expressions.

use crate::expr::{Expr, Named};

/// `$dateAdd` / `$dateSubtract`.
#[derive(Debug, Clone)]
pub struct DateArith {
    name: &'static str,
    start_date: Expr,
    unit: Expr,
    amount: Expr,
    timezone: Option<Expr>,
}

pub fn date_add(
    start_date: impl Into<Expr>,
    unit: impl Into<Expr>,
    amount: impl Into<Expr>,
) -> DateArith {
    DateArith::new("$dateAdd", start_date, unit, amount)
}

pub fn date_subtract(
    start_date: impl Into<Expr>,
    unit: impl Into<Expr>,
    amount: impl Into<Expr>,
) -> DateArith {
    DateArith::new("$dateSubtract", start_date, unit, amount)
}

impl DateArith {
    fn new(
        name: &'static str,
        start_date: impl Into<Expr>,
        unit: impl Into<Expr>,
        amount: impl Into<Expr>,
    ) -> Self {
        Self {
            name,
            start_date: start_date.into(),
            unit: unit.into(),
            amount: amount.into(),
            timezone: None,
        }
    }

    optional_args!(timezone);
}

impl From<DateArith> for Expr {
    fn from(d: DateArith) -> Self {
        Named::new()
            .arg("startDate", d.start_date)
            .arg("unit", d.unit)
            .arg("amount", d.amount)
            .opt("timezone", d.timezone)
            .build(d.name)
    }
}

#[derive(Debug, Clone)]
pub struct DateDiff {
    start_date: Expr,
    end_date: Expr,
    unit: Expr,
    timezone: Option<Expr>,
    start_of_week: Option<Expr>,
}

pub fn date_diff(
    start_date: impl Into<Expr>,
    end_date: impl Into<Expr>,
    unit: impl Into<Expr>,
) -> DateDiff {
    DateDiff {
        start_date: start_date.into(),
        end_date: end_date.into(),
        unit: unit.into(),
        timezone: None,
        start_of_week: None,
    }
}

impl DateDiff {
    optional_args!(timezone, start_of_week);
}

impl From<DateDiff> for Expr {
    fn from(d: DateDiff) -> Self {
        Named::new()
            .arg("startDate", d.start_date)
            .arg("endDate", d.end_date)
            .arg("unit", d.unit)
            .opt("timezone", d.timezone)
            .opt("startOfWeek", d.start_of_week)
            .build("$dateDiff")
    }
}

#[derive(Debug, Clone)]
pub struct DateToString {
    date: Expr,
    format: Option<Expr>,
    timezone: Option<Expr>,
    on_null: Option<Expr>,
}

pub fn date_to_string(date: impl Into<Expr>) -> DateToString {
    DateToString {
        date: date.into(),
        format: None,
        timezone: None,
        on_null: None,
    }
}

impl DateToString {
    optional_args!(format, timezone, on_null);
}

impl From<DateToString> for Expr {
    fn from(d: DateToString) -> Self {
        Named::new()
            .arg("date", d.date)
            .opt("format", d.format)
            .opt("timezone", d.timezone)
            .opt("onNull", d.on_null)
            .build("$dateToString")
    }
}

#[derive(Debug, Clone)]
pub struct DateFromString {
    date_string: Expr,
    format: Option<Expr>,
    timezone: Option<Expr>,
    on_error: Option<Expr>,
    on_null: Option<Expr>,
}

pub fn date_from_string(date_string: impl Into<Expr>) -> DateFromString {
    DateFromString {
        date_string: date_string.into(),
        format: None,
        timezone: None,
        on_error: None,
        on_null: None,
    }
}

impl DateFromString {
    optional_args!(format, timezone, on_error, on_null);
}

impl From<DateFromString> for Expr {
    fn from(d: DateFromString) -> Self {
        Named::new()
            .arg("dateString", d.date_string)
            .opt("format", d.format)
            .opt("timezone", d.timezone)
            .opt("onError", d.on_error)
            .opt("onNull", d.on_null)
            .build("$dateFromString")
    }
}

pub fn to_date(input: impl Into<Expr>) -> Expr {
    Expr::unary("$toDate", input)
}

/// A date part extractor (`$year`, `$hour`, ...). Renders the bare date, or
/// `{date, timezone}` once a timezone is set.
#[derive(Debug, Clone)]
pub struct DatePart {
    name: &'static str,
    date: Expr,
    timezone: Option<Expr>,
}

impl DatePart {
    optional_args!(timezone);
}

impl From<DatePart> for Expr {
    fn from(p: DatePart) -> Self {
        match p.timezone {
            None => Expr::unary(p.name, p.date),
            Some(tz) => Named::new()
                .arg("date", p.date)
                .arg("timezone", tz)
                .build(p.name),
        }
    }
}

macro_rules! date_parts {
    ($($fn_name:ident => $op:literal),* $(,)?) => {
        $(
            pub fn $fn_name(date: impl Into<Expr>) -> DatePart {
                DatePart {
                    name: $op,
                    date: date.into(),
                    timezone: None,
                }
            }
        )*
    };
}

date_parts!(
    year => "$year",
    month => "$month",
    day_of_month => "$dayOfMonth",
    day_of_week => "$dayOfWeek",
    day_of_year => "$dayOfYear",
    hour => "$hour",
    minute => "$minute",
    second => "$second",
    millisecond => "$millisecond",
    week => "$week",
    iso_week => "$isoWeek",
    iso_week_year => "$isoWeekYear",
    iso_day_of_week => "$isoDayOfWeek",
);

/// Time-of-day fields shared by both `$dateFromParts` forms.
#[derive(Debug, Clone, Default)]
struct TimeParts {
    hour: Option<Expr>,
    minute: Option<Expr>,
    second: Option<Expr>,
    millisecond: Option<Expr>,
    timezone: Option<Expr>,
}

impl TimeParts {
    fn append(self, args: Named) -> Named {
        args.opt("hour", self.hour)
            .opt("minute", self.minute)
            .opt("second", self.second)
            .opt("millisecond", self.millisecond)
            .opt("timezone", self.timezone)
    }
}

macro_rules! time_setters {
    () => {
        pub fn hour(mut self, v: impl Into<Expr>) -> Self {
            self.time.hour = Some(v.into());
            self
        }

        pub fn minute(mut self, v: impl Into<Expr>) -> Self {
            self.time.minute = Some(v.into());
            self
        }

        pub fn second(mut self, v: impl Into<Expr>) -> Self {
            self.time.second = Some(v.into());
            self
        }

        pub fn millisecond(mut self, v: impl Into<Expr>) -> Self {
            self.time.millisecond = Some(v.into());
            self
        }

        pub fn timezone(mut self, v: impl Into<Expr>) -> Self {
            self.time.timezone = Some(v.into());
            self
        }
    };
}

/// Calendar-form `$dateFromParts`: `year`, `month?`, `day?`, then time fields.
#[derive(Debug, Clone)]
pub struct DateFromParts {
    year: Expr,
    month: Option<Expr>,
    day: Option<Expr>,
    time: TimeParts,
}

pub fn date_from_parts(year: impl Into<Expr>) -> DateFromParts {
    DateFromParts {
        year: year.into(),
        month: None,
        day: None,
        time: TimeParts::default(),
    }
}

impl DateFromParts {
    optional_args!(month, day);
    time_setters!();
}

impl From<DateFromParts> for Expr {
    fn from(d: DateFromParts) -> Self {
        let args = Named::new()
            .arg("year", d.year)
            .opt("month", d.month)
            .opt("day", d.day);
        d.time.append(args).build("$dateFromParts")
    }
}

/// ISO-week-form `$dateFromParts`: `isoWeekYear`, `isoWeek?`, `isoDayOfWeek?`.
#[derive(Debug, Clone)]
pub struct IsoDateFromParts {
    iso_week_year: Expr,
    iso_week: Option<Expr>,
    iso_day_of_week: Option<Expr>,
    time: TimeParts,
}

pub fn iso_date_from_parts(iso_week_year: impl Into<Expr>) -> IsoDateFromParts {
    IsoDateFromParts {
        iso_week_year: iso_week_year.into(),
        iso_week: None,
        iso_day_of_week: None,
        time: TimeParts::default(),
    }
}

impl IsoDateFromParts {
    optional_args!(iso_week, iso_day_of_week);
    time_setters!();
}

impl From<IsoDateFromParts> for Expr {
    fn from(d: IsoDateFromParts) -> Self {
        let args = Named::new()
            .arg("isoWeekYear", d.iso_week_year)
            .opt("isoWeek", d.iso_week)
            .opt("isoDayOfWeek", d.iso_day_of_week);
        d.time.append(args).build("$dateFromParts")
    }
}

#[derive(Debug, Clone)]
pub struct DateToParts {
    date: Expr,
    timezone: Option<Expr>,
    iso8601: Option<Expr>,
}

pub fn date_to_parts(date: impl Into<Expr>) -> DateToParts {
    DateToParts {
        date: date.into(),
        timezone: None,
        iso8601: None,
    }
}

impl DateToParts {
    optional_args!(timezone, iso8601);
}

impl From<DateToParts> for Expr {
    fn from(d: DateToParts) -> Self {
        Named::new()
            .arg("date", d.date)
            .opt("timezone", d.timezone)
            .opt("iso8601", d.iso8601)
            .build("$dateToParts")
    }
}

#[derive(Debug, Clone)]
pub struct DateTrunc {
    date: Expr,
    unit: Expr,
    bin_size: Option<Expr>,
    timezone: Option<Expr>,
    start_of_week: Option<Expr>,
}

pub fn date_trunc(date: impl Into<Expr>, unit: impl Into<Expr>) -> DateTrunc {
    DateTrunc {
        date: date.into(),
        unit: unit.into(),
        bin_size: None,
        timezone: None,
        start_of_week: None,
    }
}

impl DateTrunc {
    optional_args!(bin_size, timezone, start_of_week);
}

impl From<DateTrunc> for Expr {
    fn from(d: DateTrunc) -> Self {
        Named::new()
            .arg("date", d.date)
            .arg("unit", d.unit)
            .opt("binSize", d.bin_size)
            .opt("timezone", d.timezone)
            .opt("startOfWeek", d.start_of_week)
            .build("$dateTrunc")
    }
}
