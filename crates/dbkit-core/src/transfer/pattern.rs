use chrono::{
    DateTime, NaiveTime, ParseError, Utc,
    format::{Parsed, StrftimeItems},
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// PatternError
/// A user-supplied date/time pattern that cannot be compiled.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum PatternError {
    #[error("date/time pattern is empty")]
    Empty,

    #[error("unsupported pattern field '{}' at position {position}", letter.to_string().repeat(*width))]
    UnsupportedField {
        letter: char,
        width: usize,
        position: usize,
    },

    #[error("unterminated quoted literal starting at position {position}")]
    UnterminatedQuote { position: usize },

    #[error("optional sections are not supported (position {position})")]
    OptionalSection { position: usize },
}

///
/// DateTimePattern
///
/// Compiled form of a `yyyy-MM-dd HH:mm:ss` style pattern. The pattern is
/// translated once into a chrono format string and reused for every read.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DateTimePattern {
    source: String,
    format: String,
    // Same program with `Z` in place of the offset, for X-family fields.
    zulu_format: Option<String>,
    fields: FieldSet,
}

impl DateTimePattern {
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        if pattern.trim().is_empty() {
            return Err(PatternError::Empty);
        }

        let chars: Vec<char> = pattern.chars().collect();
        let mut format = String::with_capacity(pattern.len() * 2);
        let mut zulu_format = String::with_capacity(pattern.len() * 2);
        let mut fields = FieldSet::default();
        let mut i = 0;

        while i < chars.len() {
            let ch = chars[i];
            match ch {
                '\'' => {
                    let start = format.len();
                    i = push_quoted(&chars, i, &mut format)?;
                    zulu_format.push_str(&format[start..]);
                }
                '[' | ']' => return Err(PatternError::OptionalSection { position: i }),
                c if c.is_ascii_alphabetic() => {
                    let width = chars[i..].iter().take_while(|&&next| next == c).count();
                    let (item, field) =
                        field_format(c, width).ok_or(PatternError::UnsupportedField {
                            letter: c,
                            width,
                            position: i,
                        })?;
                    fields.add(field);
                    format.push_str(item);
                    zulu_format.push_str(if field == Field::ZuluOffset { "Z" } else { item });
                    i += width;
                }
                c => {
                    push_literal(&mut format, c);
                    push_literal(&mut zulu_format, c);
                    i += 1;
                }
            }
        }

        Ok(Self {
            source: pattern.to_string(),
            format,
            zulu_format: fields.zulu.then_some(zulu_format),
            fields,
        })
    }

    /// The pattern as the user wrote it.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// The translated chrono format string.
    #[must_use]
    pub fn chrono_format(&self) -> &str {
        &self.format
    }

    /// Parse `text` into an absolute instant.
    ///
    /// Zone-aware input keeps its offset. Zone-less date-times are anchored
    /// at UTC. Patterns without any time-of-day or offset field read as
    /// dates at UTC midnight; any other pattern that leaves the time
    /// unresolved is an error, never midnight.
    pub fn parse_instant(&self, text: &str) -> Result<DateTime<Utc>, ParseError> {
        let parsed = self
            .parse_fields(text, &self.format, false)
            .or_else(|err| match &self.zulu_format {
                Some(zulu) => self.parse_fields(text, zulu, true),
                None => Err(err),
            })?;

        parsed
            .to_datetime()
            .map(|zoned| zoned.with_timezone(&Utc))
            .or_else(|_| parsed.to_naive_datetime_with_offset(0).map(|local| local.and_utc()))
            .or_else(|err| {
                if self.fields.is_date_only() {
                    parsed
                        .to_naive_date()
                        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
                } else {
                    Err(err)
                }
            })
    }

    fn parse_fields(&self, text: &str, format: &str, zulu: bool) -> Result<Parsed, ParseError> {
        let mut parsed = Parsed::new();
        chrono::format::parse(&mut parsed, text, StrftimeItems::new(format))?;

        if zulu {
            parsed.set_offset(0)?;
        }
        // two-digit years always land in 2000..=2099
        if self.fields.two_digit_year {
            parsed.set_year_div_100(20)?;
        }
        if self.fields.hour && !self.fields.minute {
            parsed.set_minute(0)?;
        }

        Ok(parsed)
    }
}

impl fmt::Display for DateTimePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

// Quoted literal starting at `start`; `''` is an escaped quote both inside
// and outside quotes. Returns the index just past the literal.
fn push_quoted(chars: &[char], start: usize, format: &mut String) -> Result<usize, PatternError> {
    if chars.get(start + 1) == Some(&'\'') {
        format.push('\'');
        return Ok(start + 2);
    }

    let mut i = start + 1;
    loop {
        match chars.get(i) {
            None => return Err(PatternError::UnterminatedQuote { position: start }),
            Some('\'') if chars.get(i + 1) == Some(&'\'') => {
                format.push('\'');
                i += 2;
            }
            Some('\'') => return Ok(i + 1),
            Some(&c) => {
                push_literal(format, c);
                i += 1;
            }
        }
    }
}

fn push_literal(format: &mut String, c: char) {
    if c == '%' {
        format.push_str("%%");
    } else {
        format.push(c);
    }
}

///
/// Field
/// What a pattern field contributes to resolving an instant.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Field {
    Date,
    TwoDigitYear,
    Hour,
    Minute,
    Time,
    Offset,
    ZuluOffset,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
struct FieldSet {
    two_digit_year: bool,
    hour: bool,
    minute: bool,
    time: bool,
    offset: bool,
    zulu: bool,
}

impl FieldSet {
    const fn add(&mut self, field: Field) {
        match field {
            Field::Date => {}
            Field::TwoDigitYear => self.two_digit_year = true,
            Field::Hour => {
                self.hour = true;
                self.time = true;
            }
            Field::Minute => {
                self.minute = true;
                self.time = true;
            }
            Field::Time => self.time = true,
            Field::Offset => self.offset = true,
            Field::ZuluOffset => {
                self.offset = true;
                self.zulu = true;
            }
        }
    }

    const fn is_date_only(self) -> bool {
        !self.time && !self.offset
    }
}

// Pattern letter + repeat width → chrono specifier.
const fn field_format(letter: char, width: usize) -> Option<(&'static str, Field)> {
    let field = match (letter, width) {
        ('y' | 'u', 2) => ("%y", Field::TwoDigitYear),
        ('y' | 'u', _) => ("%Y", Field::Date),
        ('M' | 'L', 1 | 2) => ("%m", Field::Date),
        ('M' | 'L', 3) => ("%b", Field::Date),
        ('M' | 'L', 4) => ("%B", Field::Date),
        ('d', 1 | 2) => ("%d", Field::Date),
        ('D', 1..=3) => ("%j", Field::Date),
        ('E', 1..=3) => ("%a", Field::Date),
        ('E', 4) => ("%A", Field::Date),
        ('H', 1 | 2) => ("%H", Field::Hour),
        ('h', 1 | 2) => ("%I", Field::Hour),
        ('m', 1 | 2) => ("%M", Field::Minute),
        ('s', 1 | 2) => ("%S", Field::Time),
        ('S', 3) => ("%3f", Field::Time),
        ('S', 6) => ("%6f", Field::Time),
        ('S', 9) => ("%9f", Field::Time),
        ('a', 1) => ("%p", Field::Time),
        // `%#z` already accepts `Z`
        ('X' | 'x', 1) => ("%#z", Field::Offset),
        ('x', 2 | 4) | ('Z', 1..=3) => ("%z", Field::Offset),
        ('x', 3 | 5) => ("%:z", Field::Offset),
        ('X', 2 | 4) => ("%z", Field::ZuluOffset),
        ('X', 3 | 5) | ('Z', 5) => ("%:z", Field::ZuluOffset),
        _ => return None,
    };

    Some(field)
}
