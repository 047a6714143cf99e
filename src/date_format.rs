//! Date token formats for locating calendar dates inside filenames.
//!
//! A format is a template mixing literal separators with the tokens `%d`
//! (2-digit day), `%m` (2-digit month), `%Y` (4-digit year) and `%y` (2-digit
//! year, expanded by adding 2000). The template is compiled once into a
//! regular expression; the textual order of the tokens is recorded so matched
//! groups can be mapped back to date fields.

use crate::criteria::CriteriaError;
use chrono::NaiveDate;
use regex::Regex;

/// Separators recognized when parsing an exact date string positionally.
const SEPARATORS: [char; 4] = ['/', '-', '_', '.'];

/// The kind of date field a format token captures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateToken {
    /// `%d` — two-digit day of month.
    Day,
    /// `%m` — two-digit month.
    Month,
    /// `%Y` — four-digit year.
    Year4,
    /// `%y` — two-digit year, expanded as 2000 + value.
    Year2,
}

impl DateToken {
    fn capture_pattern(&self) -> &'static str {
        match self {
            DateToken::Day | DateToken::Month | DateToken::Year2 => r"(\d{2})",
            DateToken::Year4 => r"(\d{4})",
        }
    }
}

/// A date format compiled into an extraction pattern.
///
/// Compilation is deterministic for identical input: the same template always
/// yields the same pattern and the same token order.
#[derive(Debug, Clone)]
pub struct CompiledDateFormat {
    source: String,
    pattern: Regex,
    token_order: Vec<DateToken>,
}

impl CompiledDateFormat {
    /// Compiles a format template.
    ///
    /// Tokens are discovered in the order they appear in the template.
    /// Non-token characters are matched literally; regex metacharacters
    /// among them are escaped.
    ///
    /// # Errors
    ///
    /// Returns `CriteriaError::InvalidFormat` if the assembled pattern does
    /// not compile.
    pub fn compile(format: &str) -> Result<Self, CriteriaError> {
        let mut pattern = String::new();
        let mut token_order = Vec::new();

        let mut chars = format.chars().peekable();
        while let Some(ch) = chars.next() {
            if ch == '%' {
                let token = match chars.peek() {
                    Some('d') => Some(DateToken::Day),
                    Some('m') => Some(DateToken::Month),
                    Some('Y') => Some(DateToken::Year4),
                    Some('y') => Some(DateToken::Year2),
                    _ => None,
                };

                if let Some(token) = token {
                    chars.next();
                    pattern.push_str(token.capture_pattern());
                    token_order.push(token);
                    continue;
                }
            }

            pattern.push_str(&regex::escape(&ch.to_string()));
        }

        let pattern = Regex::new(&pattern).map_err(|_| CriteriaError::InvalidFormat {
            value: format.to_string(),
            expected: "date format built from %d %m %Y %y tokens and literal separators"
                .to_string(),
        })?;

        Ok(Self {
            source: format.to_string(),
            pattern,
            token_order,
        })
    }

    /// The original template this format was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The token kinds in textual appearance order.
    pub fn token_order(&self) -> &[DateToken] {
        &self.token_order
    }

    /// Scans a filename for the first occurrence of the pattern and assembles
    /// a calendar date from the matched groups.
    ///
    /// Returns `None` when nothing matches, when day, month and year cannot
    /// all be resolved (the template may omit tokens), or when the assembled
    /// date does not exist on the calendar. This path never fails: filenames
    /// are untrusted input and an unparseable name simply carries no date.
    pub fn extract_from_filename(&self, name: &str) -> Option<NaiveDate> {
        let captures = self.pattern.captures(name)?;

        let fields = self
            .token_order
            .iter()
            .enumerate()
            .filter_map(|(index, token)| {
                captures
                    .get(index + 1)
                    .map(|group| (*token, group.as_str()))
            })
            .collect::<Vec<_>>();

        Self::assemble_date(&fields)
    }

    /// Parses a caller-supplied date string against this format.
    ///
    /// The text is split on `/`, `-`, `_` and `.` and the segments are mapped
    /// positionally to the recorded token order. Unlike filename extraction
    /// this fails loudly: the value was supplied directly as input.
    ///
    /// # Errors
    ///
    /// Returns `CriteriaError::InvalidDate` when day, month and year cannot
    /// all be resolved or the result is not a real calendar date.
    pub fn parse_exact(&self, text: &str) -> Result<NaiveDate, CriteriaError> {
        let segments: Vec<&str> = text.split(SEPARATORS).collect();

        let fields = self
            .token_order
            .iter()
            .zip(segments.iter())
            .map(|(token, segment)| (*token, *segment))
            .collect::<Vec<_>>();

        Self::assemble_date(&fields).ok_or_else(|| CriteriaError::InvalidDate {
            value: text.to_string(),
            format: self.source.clone(),
        })
    }

    /// Builds a date out of resolved token fields. A 4-digit year wins over a
    /// 2-digit one when the template carries both.
    fn assemble_date(fields: &[(DateToken, &str)]) -> Option<NaiveDate> {
        let mut day: Option<u32> = None;
        let mut month: Option<u32> = None;
        let mut year4: Option<i32> = None;
        let mut year2: Option<i32> = None;

        for (token, text) in fields {
            match token {
                DateToken::Day => day = text.parse().ok(),
                DateToken::Month => month = text.parse().ok(),
                DateToken::Year4 => year4 = text.parse().ok(),
                DateToken::Year2 => year2 = text.parse::<i32>().ok().map(|y| y + 2000),
            }
        }

        let year = year4.or(year2)?;
        NaiveDate::from_ymd_opt(year, month?, day?)
    }
}
