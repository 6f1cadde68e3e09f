//! # Date/Time Parsers
//!
//! A [`DateTimePattern`] is compiled from a pattern string using the familiar
//! letters:
//!
//! | Letter | Meaning | Forms |
//! |--------|---------|-------|
//! | `y` | year | `y` (1-9 digits), `yy` (two digits through the pivot), `yyyy` |
//! | `M` | month | `M`, `MM`, `MMM` (abbreviation), `MMMM` (name) |
//! | `d` | day of month | `d`, `dd` |
//! | `E` | day of week | `E`..`EEE` (abbreviation), `EEEE` (name) |
//! | `H` / `h` | hour of day / clock hour of am-pm | `H`, `HH`, `h`, `hh` |
//! | `m` / `s` | minute / second | `m`, `mm`, `s`, `ss` |
//! | `S` | fraction of second | `S` to `SSSSSSSSS` |
//! | `a` | am/pm marker | `a` |
//! | `X` / `x` | ISO offset, `X` accepts `Z` | 1 to 3 letters |
//! | `Z` | offset `+HHmm` | 1 to 3 letters |
//! | `O` | localized offset `GMT+8` | `O`, `OOOO` |
//! | `VV` / `z` | zone id / zone name | |
//!
//! Text in single quotes is literal and `''` is a single quote. Any other
//! non-letter character is literal.
//!
//! A mismatch against the pattern is a no-match. Field values that match the
//! pattern but name an impossible date or time (month 13, February 30th, hour
//! 25) are a hard [`ParseError::InvalidDateTime`].

use std::any::Any;
use std::fmt;
use std::str::FromStr;

use chrono::{
    DateTime, Datelike, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone,
};
use chrono_tz::Tz;
use strum::{AsRefStr, Display};

use super::string::CaseSensitivity;
use crate::config::{DateTimeContext, ParserContext};
use crate::cursor::TextCursor;
use crate::error::BuildError;
use crate::parser::core::{same, ParseError, ParseResult, Parser, ParserRef};
use crate::token::{OffsetTime, ParserToken};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Year,
    ReducedYear,
    Month,
    Day,
    Hour,
    ClockHour,
    Minute,
    Second,
    Fraction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NameStyle {
    Short,
    Full,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OffsetMinutes {
    Optional,
    Required,
    Colon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Category {
    Date,
    Time,
    Offset,
    Zone,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Item {
    Literal(String),
    Number { field: Field, min: usize, max: usize },
    MonthName(NameStyle),
    Weekday(NameStyle),
    AmPm,
    Offset { zulu: bool, minutes: OffsetMinutes },
    LocalizedOffset,
    Zone,
}

impl Item {
    fn category(&self) -> Option<Category> {
        match self {
            Item::Literal(_) => None,
            Item::Number { field, .. } => Some(match field {
                Field::Year | Field::ReducedYear | Field::Month | Field::Day => Category::Date,
                _ => Category::Time,
            }),
            Item::MonthName(_) | Item::Weekday(_) => Some(Category::Date),
            Item::AmPm => Some(Category::Time),
            Item::Offset { .. } | Item::LocalizedOffset => Some(Category::Offset),
            Item::Zone => Some(Category::Zone),
        }
    }

    fn is_number(&self) -> bool {
        matches!(self, Item::Number { .. })
    }
}

/// A compiled date/time pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimePattern {
    pattern: String,
    items: Vec<Item>,
}

impl DateTimePattern {
    pub fn compile(pattern: &str) -> Result<Self, BuildError> {
        let invalid = |message: String| BuildError::InvalidPattern {
            pattern: pattern.to_string(),
            message,
        };

        if pattern.is_empty() {
            return Err(BuildError::Empty("date/time pattern"));
        }

        let chars: Vec<char> = pattern.chars().collect();
        let mut items: Vec<Item> = Vec::new();
        let mut i = 0;

        while i < chars.len() {
            let c = chars[i];
            if c == '\'' {
                i += 1;
                let mut literal = String::new();
                if chars.get(i) == Some(&'\'') {
                    literal.push('\'');
                    i += 1;
                } else {
                    loop {
                        match chars.get(i) {
                            None => return Err(invalid("unterminated quote".to_string())),
                            Some('\'') if chars.get(i + 1) == Some(&'\'') => {
                                literal.push('\'');
                                i += 2;
                            }
                            Some('\'') => {
                                i += 1;
                                break;
                            }
                            Some(&other) => {
                                literal.push(other);
                                i += 1;
                            }
                        }
                    }
                }
                push_literal(&mut items, &literal);
            } else if c.is_ascii_alphabetic() {
                let count = chars[i..].iter().take_while(|&&x| x == c).count();
                items.push(letter(c, count).ok_or_else(|| {
                    invalid(format!("unsupported pattern letters {:?}", c.to_string().repeat(count)))
                })?);
                i += count;
            } else {
                push_literal(&mut items, &c.to_string());
                i += 1;
            }
        }

        // adjacent numbers: every number but the last takes its minimum width
        for i in 1..items.len() {
            if items[i].is_number() {
                if let Item::Number { min, max, .. } = &mut items[i - 1] {
                    *max = *min;
                }
            }
        }

        Ok(Self {
            pattern: pattern.to_string(),
            items,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    fn has(&self, category: Category) -> bool {
        self.items.iter().any(|item| item.category() == Some(category))
    }

    fn has_field(&self, wanted: Field) -> bool {
        self.items
            .iter()
            .any(|item| matches!(item, Item::Number { field, .. } if *field == wanted))
    }

    fn has_month(&self) -> bool {
        self.has_field(Field::Month) || self.items.iter().any(|i| matches!(i, Item::MonthName(_)))
    }

    fn invalid(&self, message: &str) -> BuildError {
        BuildError::InvalidPattern {
            pattern: self.pattern.clone(),
            message: message.to_string(),
        }
    }

    /// Matches the pattern lexically. `None` means the text does not match.
    fn scan(
        &self,
        cursor: &mut TextCursor<'_>,
        context: &DateTimeContext,
    ) -> Result<Option<Fields>, ParseError> {
        let mut fields = Fields::default();

        for item in &self.items {
            let matched = match item {
                Item::Literal(literal) => cursor.eat(literal),
                Item::Number { field, min, max } => match number(cursor, *min, *max)? {
                    Some(value) => {
                        fields.set(*field, value, *min);
                        true
                    }
                    None => false,
                },
                Item::MonthName(style) => {
                    let names = match style {
                        NameStyle::Short => &context.month_abbreviations,
                        NameStyle::Full => &context.month_names,
                    };
                    name(cursor, names)?
                        .map(|index| fields.month = Some(index as u32 + 1))
                        .is_some()
                }
                Item::Weekday(style) => {
                    let names = match style {
                        NameStyle::Short => &context.weekday_abbreviations,
                        NameStyle::Full => &context.weekday_names,
                    };
                    name(cursor, names)?
                        .map(|index| fields.weekday = Some(index as u32))
                        .is_some()
                }
                Item::AmPm => name(cursor, &context.am_pm)?
                    .map(|index| fields.pm = Some(index == 1))
                    .is_some(),
                Item::Offset { zulu, minutes } => iso_offset(cursor, *zulu, *minutes)?
                    .map(|offset| fields.offset = Some(offset))
                    .is_some(),
                Item::LocalizedOffset => localized_offset(cursor)?
                    .map(|offset| fields.offset = Some(offset))
                    .is_some(),
                Item::Zone => zone(cursor)?
                    .map(|zone| fields.zone = Some(zone))
                    .is_some(),
            };
            if !matched {
                return Ok(None);
            }
        }

        Ok(Some(fields))
    }
}

impl fmt::Display for DateTimePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}

fn push_literal(items: &mut Vec<Item>, text: &str) {
    if let Some(Item::Literal(previous)) = items.last_mut() {
        previous.push_str(text);
    } else {
        items.push(Item::Literal(text.to_string()));
    }
}

fn letter(c: char, count: usize) -> Option<Item> {
    let number = |field, min, max| Some(Item::Number { field, min, max });
    let two = |field| match count {
        1 => number(field, 1, 2),
        2 => number(field, 2, 2),
        _ => None,
    };

    match c {
        'y' => match count {
            2 => number(Field::ReducedYear, 2, 2),
            n if n <= 9 => number(Field::Year, n, 9),
            _ => None,
        },
        'M' => match count {
            1 | 2 => two(Field::Month),
            3 => Some(Item::MonthName(NameStyle::Short)),
            4 => Some(Item::MonthName(NameStyle::Full)),
            _ => None,
        },
        'd' => two(Field::Day),
        'H' => two(Field::Hour),
        'h' => two(Field::ClockHour),
        'm' => two(Field::Minute),
        's' => two(Field::Second),
        'S' if count <= 9 => number(Field::Fraction, count, count),
        'a' if count == 1 => Some(Item::AmPm),
        'E' => match count {
            1..=3 => Some(Item::Weekday(NameStyle::Short)),
            4 => Some(Item::Weekday(NameStyle::Full)),
            _ => None,
        },
        'X' | 'x' => {
            let minutes = match count {
                1 => OffsetMinutes::Optional,
                2 => OffsetMinutes::Required,
                3 => OffsetMinutes::Colon,
                _ => return None,
            };
            Some(Item::Offset {
                zulu: c == 'X',
                minutes,
            })
        }
        'Z' if count <= 3 => Some(Item::Offset {
            zulu: false,
            minutes: OffsetMinutes::Required,
        }),
        'O' if count == 1 || count == 4 => Some(Item::LocalizedOffset),
        'V' if count == 2 => Some(Item::Zone),
        'z' if count <= 4 => Some(Item::Zone),
        _ => None,
    }
}

/// Consumes between `min` and `max` ASCII digits.
fn number(cursor: &mut TextCursor<'_>, min: usize, max: usize) -> Result<Option<u32>, ParseError> {
    let start = cursor.save();
    let mut value: u32 = 0;
    let mut count = 0;
    while count < max {
        match cursor.peek().and_then(|c| c.to_digit(10).filter(|_| c.is_ascii_digit())) {
            Some(digit) => {
                value = value * 10 + digit;
                count += 1;
                cursor.next()?;
            }
            None => break,
        }
    }
    if count < min {
        cursor.restore(start);
        return Ok(None);
    }
    Ok(Some(value))
}

/// Consumes `expected` ignoring case.
fn eat_insensitive(cursor: &mut TextCursor<'_>, expected: &str) -> Result<bool, ParseError> {
    let start = cursor.save();
    for e in expected.chars() {
        match cursor.peek() {
            Some(c) if CaseSensitivity::Insensitive.equals(e, c) => cursor.next()?,
            _ => {
                cursor.restore(start);
                return Ok(false);
            }
        }
    }
    Ok(!expected.is_empty())
}

/// Consumes the longest of `names`, returning its index.
fn name(cursor: &mut TextCursor<'_>, names: &[String]) -> Result<Option<usize>, ParseError> {
    let start = cursor.save();
    let mut best: Option<(usize, usize)> = None;

    for (index, candidate) in names.iter().enumerate() {
        if eat_insensitive(cursor, candidate)? {
            let length = cursor.offset() - start.offset();
            if best.map_or(true, |(_, longest)| length > longest) {
                best = Some((index, length));
            }
            cursor.restore(start);
        }
    }

    match best {
        Some((index, _)) => {
            eat_insensitive(cursor, &names[index])?;
            Ok(Some(index))
        }
        None => Ok(None),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OffsetValue {
    negative: bool,
    hours: u32,
    minutes: u32,
}

const UTC: OffsetValue = OffsetValue {
    negative: false,
    hours: 0,
    minutes: 0,
};

impl fmt::Display for OffsetValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.negative { '-' } else { '+' };
        write!(f, "{}{:02}:{:02}", sign, self.hours, self.minutes)
    }
}

fn iso_offset(
    cursor: &mut TextCursor<'_>,
    zulu: bool,
    style: OffsetMinutes,
) -> Result<Option<OffsetValue>, ParseError> {
    if zulu && cursor.eat("Z") {
        return Ok(Some(UTC));
    }

    let start = cursor.save();
    let negative = match cursor.peek() {
        Some('+') => false,
        Some('-') => true,
        _ => return Ok(None),
    };
    cursor.next()?;

    let Some(hours) = number(cursor, 2, 2)? else {
        cursor.restore(start);
        return Ok(None);
    };
    let minutes = match style {
        OffsetMinutes::Optional => Some(number(cursor, 2, 2)?.unwrap_or(0)),
        OffsetMinutes::Required => number(cursor, 2, 2)?,
        OffsetMinutes::Colon if cursor.eat(":") => number(cursor, 2, 2)?,
        OffsetMinutes::Colon => None,
    };
    let Some(minutes) = minutes else {
        cursor.restore(start);
        return Ok(None);
    };

    Ok(Some(OffsetValue {
        negative,
        hours,
        minutes,
    }))
}

/// `GMT`, `GMT+8`, `GMT-08:30`.
fn localized_offset(cursor: &mut TextCursor<'_>) -> Result<Option<OffsetValue>, ParseError> {
    if !eat_insensitive(cursor, "GMT")? {
        return Ok(None);
    }

    let after_gmt = cursor.save();
    let negative = match cursor.peek() {
        Some('+') => false,
        Some('-') => true,
        _ => return Ok(Some(UTC)),
    };
    cursor.next()?;
    let Some(hours) = number(cursor, 1, 2)? else {
        cursor.restore(after_gmt);
        return Ok(Some(UTC));
    };

    let mut minutes = 0;
    let before_colon = cursor.save();
    if cursor.eat(":") {
        match number(cursor, 2, 2)? {
            Some(m) => minutes = m,
            None => cursor.restore(before_colon),
        }
    }

    Ok(Some(OffsetValue {
        negative,
        hours,
        minutes,
    }))
}

/// A zone id such as `Europe/Paris` or `UTC`. Resolved later.
fn zone(cursor: &mut TextCursor<'_>) -> Result<Option<String>, ParseError> {
    let start = cursor.save();
    while cursor
        .peek()
        .is_some_and(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '_' | '-' | '+'))
    {
        cursor.next()?;
    }
    let text = cursor.text_since(start);
    Ok((!text.is_empty()).then(|| text.to_string()))
}

/// Raw field values collected while scanning.
#[derive(Debug, Default)]
struct Fields {
    year: Option<i32>,
    reduced_year: Option<u32>,
    month: Option<u32>,
    day: Option<u32>,
    weekday: Option<u32>,
    hour: Option<u32>,
    clock_hour: Option<u32>,
    pm: Option<bool>,
    minute: Option<u32>,
    second: Option<u32>,
    nano: Option<u32>,
    offset: Option<OffsetValue>,
    zone: Option<String>,
}

impl Fields {
    fn set(&mut self, field: Field, value: u32, width: usize) {
        match field {
            Field::Year => self.year = Some(value as i32),
            Field::ReducedYear => self.reduced_year = Some(value),
            Field::Month => self.month = Some(value),
            Field::Day => self.day = Some(value),
            Field::Hour => self.hour = Some(value),
            Field::ClockHour => self.clock_hour = Some(value),
            Field::Minute => self.minute = Some(value),
            Field::Second => self.second = Some(value),
            Field::Fraction => self.nano = Some(value * 10u32.pow(9 - width as u32)),
        }
    }

    fn date(&self, context: &DateTimeContext) -> Result<NaiveDate, String> {
        let year = match (self.year, self.reduced_year) {
            (Some(year), _) => year,
            (None, Some(yy)) => context.two_digit_year(yy as i32),
            (None, None) => context.default_year,
        };
        let month = self.month.unwrap_or(1);
        let day = self.day.unwrap_or(1);

        if !(1..=12).contains(&month) {
            return Err(format!("invalid month {}", month));
        }
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| format!("invalid date {:04}-{:02}-{:02}", year, month, day))?;

        if let Some(weekday) = self.weekday {
            if date.weekday().num_days_from_monday() != weekday {
                return Err(format!("{} is a {}", date, date.weekday()));
            }
        }
        Ok(date)
    }

    fn time(&self) -> Result<NaiveTime, String> {
        let hour = match (self.hour, self.clock_hour) {
            (Some(hour), _) => hour,
            (None, Some(hour)) => {
                if !(1..=12).contains(&hour) {
                    return Err(format!("invalid clock hour {}", hour));
                }
                hour % 12 + if self.pm == Some(true) { 12 } else { 0 }
            }
            (None, None) => 0,
        };
        let minute = self.minute.unwrap_or(0);
        let second = self.second.unwrap_or(0);

        NaiveTime::from_hms_nano_opt(hour, minute, second, self.nano.unwrap_or(0))
            .ok_or_else(|| format!("invalid time {:02}:{:02}:{:02}", hour, minute, second))
    }

    fn fixed_offset(&self) -> Result<FixedOffset, String> {
        let offset = self.offset.unwrap_or(UTC);
        if offset.hours > 18 || offset.minutes > 59 {
            return Err(format!("invalid offset {}", offset));
        }
        let seconds = (offset.hours * 3600 + offset.minutes * 60) as i32;
        FixedOffset::east_opt(if offset.negative { -seconds } else { seconds })
            .ok_or_else(|| format!("invalid offset {}", offset))
    }

    /// With a parsed offset the text names an instant, which is then shown in
    /// the zone. Without one, a local time in a gap is an error and a local
    /// time in an overlap takes the earlier instant.
    fn zoned(&self, local: NaiveDateTime) -> Result<DateTime<Tz>, String> {
        let name = self.zone.as_deref().unwrap_or("UTC");
        let tz = Tz::from_str(name).map_err(|_| format!("unknown time zone {:?}", name))?;

        if self.offset.is_some() {
            let instant = self
                .fixed_offset()?
                .from_local_datetime(&local)
                .single()
                .ok_or_else(|| format!("{} is out of range", local))?;
            return Ok(instant.with_timezone(&tz));
        }

        match tz.from_local_datetime(&local) {
            LocalResult::Single(value) => Ok(value),
            LocalResult::Ambiguous(earliest, _) => Ok(earliest),
            LocalResult::None => Err(format!("{} does not exist in {}", local, tz.name())),
        }
    }
}

/// The value produced by a [`DateTimeParser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr)]
pub enum DateTimeKind {
    LocalDate,
    LocalTime,
    LocalDateTime,
    OffsetTime,
    OffsetDateTime,
    ZonedDateTime,
}

impl DateTimeKind {
    fn has_date(self) -> bool {
        !matches!(self, DateTimeKind::LocalTime | DateTimeKind::OffsetTime)
    }

    fn has_time(self) -> bool {
        self != DateTimeKind::LocalDate
    }
}

/// Parses dates and times against a [`DateTimePattern`].
///
/// The constructors check that the pattern fits the kind of value produced:
/// local values take no zone or offset, offset values need an offset field,
/// zoned values need a zone field.
#[derive(Debug, Clone, PartialEq)]
pub struct DateTimeParser {
    kind: DateTimeKind,
    pattern: DateTimePattern,
}

impl DateTimeParser {
    pub fn local_date(pattern: &str) -> Result<ParserRef, BuildError> {
        Self::with(DateTimeKind::LocalDate, pattern)
    }

    pub fn local_time(pattern: &str) -> Result<ParserRef, BuildError> {
        Self::with(DateTimeKind::LocalTime, pattern)
    }

    pub fn local_date_time(pattern: &str) -> Result<ParserRef, BuildError> {
        Self::with(DateTimeKind::LocalDateTime, pattern)
    }

    pub fn offset_time(pattern: &str) -> Result<ParserRef, BuildError> {
        Self::with(DateTimeKind::OffsetTime, pattern)
    }

    pub fn offset_date_time(pattern: &str) -> Result<ParserRef, BuildError> {
        Self::with(DateTimeKind::OffsetDateTime, pattern)
    }

    pub fn zoned_date_time(pattern: &str) -> Result<ParserRef, BuildError> {
        Self::with(DateTimeKind::ZonedDateTime, pattern)
    }

    pub fn with(kind: DateTimeKind, pattern: &str) -> Result<ParserRef, BuildError> {
        let pattern = DateTimePattern::compile(pattern)?;
        Self::validate(kind, &pattern)?;
        Ok(DateTimeParser { kind, pattern }.into())
    }

    fn validate(kind: DateTimeKind, pattern: &DateTimePattern) -> Result<(), BuildError> {
        let reject = |message: &str| Err(pattern.invalid(&format!("{} for {}", message, kind)));

        if !kind.has_date() && pattern.has(Category::Date) {
            return reject("date fields are not valid");
        }
        if !kind.has_time() && pattern.has(Category::Time) {
            return reject("time fields are not valid");
        }
        match kind {
            DateTimeKind::LocalDate | DateTimeKind::LocalTime | DateTimeKind::LocalDateTime => {
                if pattern.has(Category::Offset) || pattern.has(Category::Zone) {
                    return reject("zone and offset fields are not valid");
                }
            }
            DateTimeKind::OffsetTime | DateTimeKind::OffsetDateTime => {
                if pattern.has(Category::Zone) {
                    return reject("zone fields are not valid");
                }
                if !pattern.has(Category::Offset) {
                    return reject("an offset field is required");
                }
            }
            DateTimeKind::ZonedDateTime => {
                if !pattern.has(Category::Zone) {
                    return reject("a zone field is required");
                }
            }
        }

        if kind.has_date() && !(pattern.has_month() && pattern.has_field(Field::Day)) {
            return reject("month and day fields are required");
        }
        if kind.has_time() {
            let clock = pattern.has_field(Field::ClockHour);
            if !(clock || pattern.has_field(Field::Hour)) {
                return reject("an hour field is required");
            }
            if clock && !pattern.items.contains(&Item::AmPm) {
                return reject("clock hour needs an am/pm field");
            }
        }
        Ok(())
    }

    fn resolve(
        &self,
        fields: &Fields,
        context: &DateTimeContext,
        text: &str,
    ) -> Result<ParserToken, String> {
        Ok(match self.kind {
            DateTimeKind::LocalDate => ParserToken::local_date(fields.date(context)?, text),
            DateTimeKind::LocalTime => ParserToken::local_time(fields.time()?, text),
            DateTimeKind::LocalDateTime => {
                ParserToken::local_date_time(fields.date(context)?.and_time(fields.time()?), text)
            }
            DateTimeKind::OffsetTime => ParserToken::offset_time(
                OffsetTime {
                    time: fields.time()?,
                    offset: fields.fixed_offset()?,
                },
                text,
            ),
            DateTimeKind::OffsetDateTime => {
                let local = fields.date(context)?.and_time(fields.time()?);
                let value = fields
                    .fixed_offset()?
                    .from_local_datetime(&local)
                    .single()
                    .ok_or_else(|| format!("{} is out of range", local))?;
                ParserToken::offset_date_time(value, text)
            }
            DateTimeKind::ZonedDateTime => {
                let local = fields.date(context)?.and_time(fields.time()?);
                ParserToken::zoned_date_time(fields.zoned(local)?, text)
            }
        })
    }
}

impl Parser for DateTimeParser {
    fn parse(&self, cursor: &mut TextCursor<'_>, context: &ParserContext) -> ParseResult {
        let start = cursor.save();
        let Some(fields) = self.pattern.scan(cursor, &context.date_time)? else {
            cursor.restore(start);
            return Ok(None);
        };

        let text = cursor.text_since(start);
        match self.resolve(&fields, &context.date_time, text) {
            Ok(token) => Ok(Some(token)),
            Err(message) => {
                cursor.restore(start);
                Err(ParseError::InvalidDateTime {
                    text: text.to_string(),
                    message,
                    position: cursor.line_info(),
                })
            }
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn equals(&self, other: &dyn Parser) -> bool {
        same(self, other)
    }
}

impl fmt::Display for DateTimeParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})", self.kind, self.pattern.as_str())
    }
}
