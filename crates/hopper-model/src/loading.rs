// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Problem instance loader for one-dimensional bin packing.
//!
//! Turns a whitespace-delimited text stream into a validated `ProblemData`.
//! The expected layout is the one most public bin packing benchmark sets
//! use:
//!
//! ```raw
//! n          // number of items
//! C          // bin capacity
//! w_1        // weight of item 1
//! ...
//! w_n        // weight of item n
//! ```
//!
//! Tokens may be spread over lines arbitrarily, and `#` starts a comment that
//! runs to the end of the line. The loader accepts any `BufRead`, file path,
//! raw reader, or string slice.

use crate::problem::{ProblemData, ProblemDataBuilder, ProblemDataError, Weight};
use std::{
    fmt::Display,
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
    str::FromStr,
};

/// The error type for the problem loading process.
#[derive(Debug)]
pub enum ProblemLoaderError {
    /// An I/O error occurred while reading the input stream.
    Io(std::io::Error),
    /// The input stream ended before all announced weights were read.
    UnexpectedEof,
    /// A token could not be parsed into the expected numeric type.
    Parse(ParseTokenError),
    /// The item count is zero.
    InvalidDimensions,
    /// The parsed data does not describe a valid instance.
    Invalid(ProblemDataError),
}

/// Details about a failed token parsing attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTokenError {
    /// The string token that failed to parse.
    pub token: String,
    /// The name of the type we tried to parse into (e.g., "u64").
    pub type_name: &'static str,
}

impl Display for ParseTokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Could not parse token '{}' as type {}",
            self.token, self.type_name
        )
    }
}

impl std::error::Error for ParseTokenError {}

impl Display for ProblemLoaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::UnexpectedEof => write!(f, "Unexpected end of file while parsing instance"),
            Self::Parse(e) => write!(f, "Parse error: {}", e),
            Self::InvalidDimensions => write!(f, "The item count must be a positive integer"),
            Self::Invalid(e) => write!(f, "Invalid instance: {}", e),
        }
    }
}

impl std::error::Error for ProblemLoaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Invalid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ProblemLoaderError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<ParseTokenError> for ProblemLoaderError {
    fn from(e: ParseTokenError) -> Self {
        Self::Parse(e)
    }
}

impl From<ProblemDataError> for ProblemLoaderError {
    fn from(e: ProblemDataError) -> Self {
        Self::Invalid(e)
    }
}

/// A configurable loader for bin packing instances.
///
/// # Configuration
/// * `fail_on_oversized`: if true (the default), an item heavier than the
///   capacity makes loading fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProblemLoader<W> {
    fail_on_oversized: bool,
    _marker: std::marker::PhantomData<W>,
}

impl<W> Default for ProblemLoader<W> {
    fn default() -> Self {
        Self {
            fail_on_oversized: true,
            _marker: std::marker::PhantomData,
        }
    }
}

impl<W> ProblemLoader<W>
where
    W: Weight + FromStr,
{
    /// Creates a new `ProblemLoader` with default settings.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures whether an item heavier than the capacity is an error.
    #[inline]
    pub fn fail_on_oversized(mut self, yes: bool) -> Self {
        self.fail_on_oversized = yes;
        self
    }

    /// Loads a problem from a type implementing `BufRead`.
    pub fn from_bufread<R: BufRead>(&self, rdr: R) -> Result<ProblemData<W>, ProblemLoaderError> {
        let mut sc = Scanner::new(rdr);

        let n: usize = sc.next()?;
        if n == 0 {
            return Err(ProblemLoaderError::InvalidDimensions);
        }

        let capacity: W = sc.next()?;
        let mut builder = ProblemDataBuilder::with_capacity(capacity, n)
            .reject_oversized(self.fail_on_oversized);

        for _ in 0..n {
            builder.add_item(sc.next()?);
        }

        Ok(builder.build()?)
    }

    /// Loads a problem from a file path.
    #[inline]
    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<ProblemData<W>, ProblemLoaderError> {
        let file = File::open(path)?;
        self.from_bufread(BufReader::new(file))
    }

    /// Loads a problem from a generic reader.
    #[inline]
    pub fn from_reader<R: Read>(&self, r: R) -> Result<ProblemData<W>, ProblemLoaderError> {
        self.from_bufread(BufReader::new(r))
    }

    /// Loads a problem from a string slice.
    #[inline]
    pub fn from_str(&self, s: &str) -> Result<ProblemData<W>, ProblemLoaderError> {
        self.from_reader(s.as_bytes())
    }
}

/// Reads whitespace-delimited tokens, skipping `#` comments.
struct Scanner<R> {
    rdr: R,
    buf: String,
    pos: usize,
}

impl<R: BufRead> Scanner<R> {
    #[inline]
    fn new(rdr: R) -> Self {
        Self {
            rdr,
            buf: String::new(),
            pos: 0,
        }
    }

    /// Refills the line buffer. `Ok(false)` on EOF.
    #[inline]
    fn fill_line(&mut self) -> Result<bool, ProblemLoaderError> {
        self.buf.clear();
        self.pos = 0;
        let n = self.rdr.read_line(&mut self.buf)?;
        Ok(n > 0)
    }

    /// Reads the next token and parses it into `T`.
    fn next<T>(&mut self) -> Result<T, ProblemLoaderError>
    where
        T: FromStr,
    {
        loop {
            if self.pos >= self.buf.len() && !self.fill_line()? {
                return Err(ProblemLoaderError::UnexpectedEof);
            }

            let rest = &self.buf[self.pos..];
            let content = match rest.find('#') {
                Some(comment) => &rest[..comment],
                None => rest,
            };

            let trimmed = content.trim_start();
            if trimmed.is_empty() {
                self.pos = self.buf.len();
                continue;
            }

            let start = self.pos + (content.len() - trimmed.len());
            let len = trimmed
                .find(char::is_whitespace)
                .unwrap_or(trimmed.len());
            let token = &self.buf[start..start + len];
            self.pos = start + len;

            return token.parse::<T>().map_err(|_| {
                ProblemLoaderError::Parse(ParseTokenError {
                    token: token.to_owned(),
                    type_name: std::any::type_name::<T>(),
                })
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::ItemIndex;

    const SMALL_INSTANCE: &str = r#"
        4           # n
        10          # capacity
        4 4         # first two weights
        4
        6           # last weight
    "#;

    #[test]
    fn test_loads_and_maps_correctly() {
        let data: ProblemData<u32> = ProblemLoader::new()
            .from_str(SMALL_INSTANCE)
            .expect("Failed to load");

        assert_eq!(data.num_items(), 4);
        assert_eq!(data.capacity(), 10);
        assert_eq!(data.weights(), &[4, 4, 4, 6]);
    }

    #[test]
    fn test_float_instance() {
        let data: ProblemData<f64> = ProblemLoader::new()
            .from_str("3 1.0 0.5 0.25 0.75")
            .expect("Failed to load");
        assert_eq!(data.weights_f64(), &[0.5, 0.25, 0.75]);
    }

    #[test]
    fn test_truncated_input() {
        let res = ProblemLoader::<u32>::new().from_str("3 10 1 2");
        assert!(matches!(res, Err(ProblemLoaderError::UnexpectedEof)));
    }

    #[test]
    fn test_zero_items() {
        let res = ProblemLoader::<u32>::new().from_str("0 10");
        assert!(matches!(res, Err(ProblemLoaderError::InvalidDimensions)));
    }

    #[test]
    fn test_parse_error_structure() {
        let res = ProblemLoader::<u32>::new().from_str("2 10 garbage 3");
        match res {
            Err(ProblemLoaderError::Parse(e)) => {
                assert_eq!(e.token, "garbage");
                assert!(e.type_name.contains("u32"));
            }
            _ => panic!("Expected Parse error with context"),
        }
    }

    #[test]
    fn test_oversized_item() {
        let res = ProblemLoader::<u32>::new().from_str("2 10 3 11");
        match res {
            Err(ProblemLoaderError::Invalid(ProblemDataError::OversizedItem { item })) => {
                assert_eq!(item, ItemIndex::new(1));
            }
            _ => panic!("Expected OversizedItem error"),
        }

        let data = ProblemLoader::<u32>::new()
            .fail_on_oversized(false)
            .from_str("2 10 3 11")
            .expect("oversized allowed");
        assert_eq!(data.num_items(), 2);
    }

    #[test]
    fn test_comment_directly_after_token() {
        let data: ProblemData<u32> = ProblemLoader::new()
            .from_str("2#items\n5#cap\n2 3")
            .expect("Failed to load");
        assert_eq!(data.weights(), &[2, 3]);
        assert_eq!(data.capacity(), 5);
    }
}
