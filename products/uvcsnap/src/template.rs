use {
    chrono::{
        DateTime, Local, TimeZone,
        format::{Item, StrftimeItems},
    },
    std::{
        fmt::{self, Write},
        path::PathBuf,
    },
    thiserror::Error,
};

/// Widest field a conversion may ask for, the length of a path on Linux.
pub const MAX_WIDTH: usize = 4096;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unsupported conversion '%{conversion}' in '{template}', only %d, %i, %u and %% are allowed")]
    Conversion { template: String, conversion: char },
    #[error("field width in '{0}' is larger than {max}", max = MAX_WIDTH)]
    Width(String),
    #[error("'{0}' ends in the middle of a conversion")]
    Incomplete(String),
    #[error("invalid date/time specifier in '{0}'")]
    Strftime(String),
    #[error("couldn't create result file name from '{0}'")]
    Empty(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Index { width: usize, zero_pad: bool, left: bool },
}

/// A parsed printf-style template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexTemplate {
    template: String,
    pieces: Vec<Piece>,
}

/// How output files are named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileNamer {
    /// printf-style, `%d` is replaced by the number of frames taken so far.
    Index(IndexTemplate),
    /// Expanded with the local date and time.
    Strftime(String),
}

impl FileNamer {
    /// Parse a printf-style template, e.g. `snap-%04d.jpg`.
    pub fn index(template: &str) -> Result<Self, TemplateError> {
        let pieces = parse_index(template)?;
        Ok(FileNamer::Index(IndexTemplate {
            template: template.to_string(),
            pieces,
        }))
    }

    /// Check a strftime template, e.g. `%Y%m%d-%H%M%S.jpg`.
    pub fn strftime(template: &str) -> Result<Self, TemplateError> {
        if StrftimeItems::new(template).any(|item| matches!(item, Item::Error)) {
            return Err(TemplateError::Strftime(template.to_string()));
        }
        Ok(FileNamer::Strftime(template.to_string()))
    }

    pub fn template(&self) -> &str {
        match self {
            FileNamer::Index(index) => &index.template,
            FileNamer::Strftime(template) => template,
        }
    }

    /// Name for the frame persisted after `sequence` others, at the current time.
    pub fn name(&self, sequence: u64) -> Result<PathBuf, TemplateError> {
        self.name_at(sequence, &Local::now())
    }

    pub fn name_at<Tz>(&self, sequence: u64, time: &DateTime<Tz>) -> Result<PathBuf, TemplateError>
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let mut name = String::new();
        match self {
            FileNamer::Index(IndexTemplate { template, pieces }) => {
                for piece in pieces {
                    match piece {
                        Piece::Literal(text) => name.push_str(text),
                        Piece::Index {
                            width,
                            zero_pad,
                            left,
                        } => {
                            let width = *width;
                            // fmt::Write for String never fails
                            let _ = match (*left, *zero_pad) {
                                (true, _) => write!(name, "{sequence:<width$}"),
                                (false, true) => write!(name, "{sequence:0width$}"),
                                (false, false) => write!(name, "{sequence:>width$}"),
                            };
                        }
                    }
                }
                if name.is_empty() {
                    return Err(TemplateError::Empty(template.clone()));
                }
            }
            FileNamer::Strftime(template) => {
                // Display of a bad format is an fmt::Error here, not a panic
                if write!(name, "{}", time.format(template)).is_err() || name.is_empty() {
                    return Err(TemplateError::Empty(template.clone()));
                }
            }
        }
        Ok(PathBuf::from(name))
    }
}

fn parse_index(template: &str) -> Result<Vec<Piece>, TemplateError> {
    let mut pieces = Vec::new();
    let mut literal = String::new();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            literal.push(c);
            continue;
        }

        let mut zero_pad = false;
        let mut left = false;
        while let Some(&flag) = chars.peek() {
            match flag {
                '0' => zero_pad = true,
                '-' => left = true,
                _ => break,
            }
            chars.next();
        }

        let mut width = 0usize;
        while let Some(digit) = chars.peek().and_then(|c| c.to_digit(10)) {
            width = width * 10 + digit as usize;
            if width > MAX_WIDTH {
                return Err(TemplateError::Width(template.to_string()));
            }
            chars.next();
        }

        match chars.next() {
            None => return Err(TemplateError::Incomplete(template.to_string())),
            Some('%') if width == 0 && !zero_pad && !left => literal.push('%'),
            Some('d' | 'i' | 'u') => {
                if !literal.is_empty() {
                    pieces.push(Piece::Literal(std::mem::take(&mut literal)));
                }
                pieces.push(Piece::Index {
                    width,
                    zero_pad,
                    left,
                });
            }
            Some(conversion) => {
                return Err(TemplateError::Conversion {
                    template: template.to_string(),
                    conversion,
                });
            }
        }
    }

    if !literal.is_empty() {
        pieces.push(Piece::Literal(literal));
    }
    Ok(pieces)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pieces() {
        let pieces = parse_index("a%03db").unwrap();
        assert_eq!(
            pieces,
            vec![
                Piece::Literal("a".to_string()),
                Piece::Index {
                    width: 3,
                    zero_pad: true,
                    left: false
                },
                Piece::Literal("b".to_string()),
            ]
        );
    }

    #[test]
    fn test_percent_escape_is_literal() {
        assert_eq!(
            parse_index("100%%").unwrap(),
            vec![Piece::Literal("100%".to_string())]
        );
    }
}
