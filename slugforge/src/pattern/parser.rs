//! Recursive-descent parser for the pattern language.

use crate::errors::{Result, SlugforgeError};
use crate::pattern::placeholder::{
    contains_tag, insert_tag, CompareOperator, EmojiGen, NumberBase, NumberGen, Selector,
    SizeLimit, SpecialCharGen, MAX_DECIMAL_LENGTH, MAX_EMOJI_COUNT, MAX_HEX_LENGTH,
    MAX_ROMAN_LENGTH, MAX_SPECIAL_LENGTH,
};
use crate::pattern::Placeholder;

const ESCAPE_CHAR: u8 = b'\\';
const ESCAPED_CHARS: &str = "\\{}[]";

const NUMBER_KEYWORD: &str = "number";
const NUM_KEYWORD: &str = "num";
const SPECIAL_KEYWORD: &str = "special";
const SPEC_KEYWORD: &str = "spec";
const EMOJI_KEYWORD: &str = "emoji";

/// A key-value option inside a placeholder, with the 0-based byte offset of
/// its value for error reporting.
struct RawOption<'a> {
    key: &'a str,
    value: &'a str,
    value_pos: usize,
}

pub(crate) struct PatternParser<'a> {
    pattern: &'a [u8],
    source: &'a str,
    pos: usize,
}

impl<'a> PatternParser<'a> {
    pub(crate) fn new(source: &'a str) -> Self {
        Self {
            pattern: source.as_bytes(),
            source,
            pos: 0,
        }
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.pattern.len()
    }

    fn peek(&self) -> u8 {
        self.pattern[self.pos]
    }

    fn matches(&self, c: u8) -> bool {
        !self.is_eof() && self.peek() == c
    }

    fn next(&mut self) -> u8 {
        let c = self.pattern[self.pos];
        self.pos += 1;
        c
    }

    /// 1-based column of the current position.
    fn column(&self) -> usize {
        self.pos + 1
    }

    fn error<S>(&self, msg: S) -> SlugforgeError
    where
        S: Into<String>,
    {
        SlugforgeError::pattern_syntax(msg, self.column())
    }

    fn expect(&mut self, c: u8) -> Result<()> {
        if self.is_eof() {
            return Err(self.error(format!(
                "unexpected end of pattern, expected `{}`",
                c as char
            )));
        }
        if self.peek() != c {
            return Err(self.error(format!(
                "expected `{}`, got `{}`",
                c as char,
                self.peek() as char
            )));
        }
        self.next();
        Ok(())
    }

    fn expect_str(&mut self, s: &str) -> Result<()> {
        for c in s.bytes() {
            self.expect(c)?;
        }
        Ok(())
    }

    fn expect_one_of(&mut self, s: &str) -> Result<()> {
        if self.is_eof() {
            return Err(self.error("unexpected end of pattern"));
        }
        if s.bytes().any(|c| c == self.peek()) {
            self.next();
            return Ok(());
        }
        Err(self.error(format!(
            "expected one of `{}`, got `{}`",
            s,
            self.peek() as char
        )))
    }

    fn skip_whitespace(&mut self) {
        while !self.is_eof() && self.peek().is_ascii_whitespace() {
            self.next();
        }
    }

    fn is_arbitrary_text(c: u8) -> bool {
        c != b'{' && c != b'}' && c != b'[' && c != b']' && c != ESCAPE_CHAR
    }

    fn skip_arbitrary_text(&mut self) {
        while !self.is_eof() && Self::is_arbitrary_text(self.peek()) {
            self.next();
        }
    }

    fn parse_identifier(&mut self) -> Result<&'a str> {
        let start = self.pos;
        if self.is_eof() {
            return Err(self.error("unexpected end of pattern"));
        }
        if !self.peek().is_ascii_alphabetic() && self.peek() != b'_' {
            return Err(self.error("expected identifier"));
        }
        self.next();
        while !self.is_eof() && self.peek().is_ascii_alphanumeric() {
            self.next();
        }
        Ok(&self.source[start..self.pos])
    }

    fn parse_char_sequence(&mut self) -> &'a str {
        let start = self.pos;
        while !self.is_eof() && !self.peek().is_ascii_whitespace() && self.peek() != b'}' {
            self.next();
        }
        &self.source[start..self.pos]
    }

    fn parse_tag(&mut self) -> Result<&'a str> {
        let start = self.pos;
        if self.is_eof() {
            return Err(self.error("unexpected end of pattern"));
        }
        while !self.is_eof() && (self.peek().is_ascii_alphanumeric() || self.peek() == b'_') {
            self.next();
        }
        if start == self.pos {
            return Err(self.error("expected tag"));
        }
        Ok(&self.source[start..self.pos])
    }

    fn parse_integer(&mut self) -> Result<u64> {
        let start = self.pos;
        while !self.is_eof() && self.peek().is_ascii_digit() {
            self.next();
        }
        if start == self.pos {
            return Err(self.error("expected number"));
        }
        self.source[start..self.pos]
            .parse()
            .map_err(|_| self.error("number out of range"))
    }

    /// Parses `N` or `N-M`, defaulting to `(0, 0)` at end of input.
    fn parse_range(&mut self) -> Result<(u64, u64)> {
        if self.is_eof() {
            return Ok((0, 0));
        }
        let mut min = 0;
        if self.peek().is_ascii_digit() {
            min = self.parse_integer()?;
        }
        let max = if self.matches(b'-') {
            self.next();
            let max = self.parse_integer()?;
            if min > max {
                return Err(self.error(format!(
                    "min count {min} is greater than max count {max}"
                )));
            }
            max
        } else {
            min
        };
        Ok((min, max))
    }

    /// Parses the long base keyword: `dec`, `hex`, `HEX`, `roman`, or `ROMAN`.
    fn parse_number_base(&mut self) -> Result<NumberBase> {
        if self.matches(b'd') {
            self.next();
            self.expect_str("ec")?;
            return Ok(NumberBase::Dec);
        }
        if self.matches(b'h') {
            self.next();
            self.expect_str("ex")?;
            return Ok(NumberBase::Hex);
        }
        if self.matches(b'H') {
            self.next();
            self.expect_str("EX")?;
            return Ok(NumberBase::HexUpper);
        }
        if self.matches(b'r') {
            self.next();
            self.expect_str("oman")?;
            return Ok(NumberBase::RomanLower);
        }
        if self.matches(b'R') {
            self.next();
            self.expect_str("OMAN")?;
            return Ok(NumberBase::Roman);
        }
        Err(self.error("expected number base"))
    }

    pub(crate) fn parse_number_gen(&mut self) -> Result<NumberGen> {
        self.expect(b':')?;
        let size = self.parse_integer()?;
        if size == 0 {
            return Err(self.error("number size cannot be 0"));
        }
        let mut base = NumberBase::Dec;
        if self.is_eof() {
            return Ok(NumberGen {
                max_length: (size & 0xff) as u8,
                base,
            });
        }
        match self.peek() {
            b'x' => {
                base = NumberBase::Hex;
                self.next();
            }
            b'X' => {
                base = NumberBase::HexUpper;
                self.next();
            }
            b'd' => {
                base = NumberBase::Dec;
                self.next();
            }
            b'R' => {
                base = NumberBase::Roman;
                self.next();
            }
            b'r' => {
                base = NumberBase::RomanLower;
                self.next();
            }
            _ => {
                self.skip_whitespace();
                if self.matches(b',') {
                    self.next();
                    self.skip_whitespace();
                    base = self.parse_number_base()?;
                }
            }
        }
        match base {
            NumberBase::Dec if size > MAX_DECIMAL_LENGTH => Err(self.error(format!(
                "decimal number size {size} exceeds limit {MAX_DECIMAL_LENGTH}"
            ))),
            NumberBase::Hex | NumberBase::HexUpper if size > MAX_HEX_LENGTH => Err(self.error(
                format!("hex number size {size} exceeds limit {MAX_HEX_LENGTH}"),
            )),
            NumberBase::Roman | NumberBase::RomanLower if size > MAX_ROMAN_LENGTH => Err(self
                .error(format!(
                    "roman number size {size} exceeds limit {MAX_ROMAN_LENGTH}"
                ))),
            _ => Ok(NumberGen {
                max_length: (size & 0xff) as u8,
                base,
            }),
        }
    }

    pub(crate) fn parse_special_gen(&mut self) -> Result<SpecialCharGen> {
        let mut min_length = 1;
        let mut max_length = 1;
        if self.matches(b':') {
            self.next();
            (min_length, max_length) = self.parse_range()?;
            if min_length > MAX_SPECIAL_LENGTH {
                return Err(self.error(format!(
                    "special char min length {min_length} exceeds limit {MAX_SPECIAL_LENGTH}"
                )));
            }
            if max_length > MAX_SPECIAL_LENGTH {
                return Err(self.error(format!(
                    "special char max length {max_length} exceeds limit {MAX_SPECIAL_LENGTH}"
                )));
            }
            if max_length == 0 {
                return Err(
                    self.error("special char generator is useless with max length 0")
                );
            }
        }
        Ok(SpecialCharGen {
            min_length: (min_length & 0xff) as u8,
            max_length: (max_length & 0xff) as u8,
        })
    }

    fn try_parse_size_limit(&mut self) -> Result<Option<SizeLimit>> {
        let op = if self.matches(b'=') {
            self.next();
            self.expect(b'=')?;
            CompareOperator::Eq
        } else if self.matches(b'!') {
            self.next();
            self.expect(b'=')?;
            CompareOperator::Ne
        } else if self.matches(b'>') {
            self.next();
            if self.matches(b'=') {
                self.next();
                CompareOperator::Ge
            } else {
                CompareOperator::Gt
            }
        } else if self.matches(b'<') {
            self.next();
            if self.matches(b'=') {
                self.next();
                CompareOperator::Le
            } else {
                CompareOperator::Lt
            }
        } else {
            return Ok(None);
        };
        self.skip_whitespace();
        let value = self.parse_integer()?;
        Ok(Some(SizeLimit {
            op,
            value: (value & 0xff) as u8,
        }))
    }

    fn parse_tags(&mut self, include: &mut Vec<String>, exclude: &mut Vec<String>) -> Result<()> {
        loop {
            self.skip_whitespace();
            if self.matches(b'+') {
                self.next();
                let tag = self.parse_tag()?;
                insert_tag(include, tag);
            } else if self.matches(b'-') {
                self.next();
                let tag = self.parse_tag()?;
                insert_tag(exclude, tag);
            } else {
                return Ok(());
            }
        }
    }

    /// Parses key-value options until the closing brace or end of input.
    fn parse_options(&mut self) -> Result<Vec<RawOption<'a>>> {
        let mut options = vec![];
        loop {
            self.skip_whitespace();
            if self.matches(b'}') || self.is_eof() {
                return Ok(options);
            }
            let key = self.parse_identifier()?;
            self.expect(b'=')?;
            let value_pos = self.pos;
            let value = self.parse_char_sequence();
            options.push(RawOption {
                key,
                value,
                value_pos,
            });
        }
    }

    fn parse_selector_modifiers(&mut self, selector: &mut Selector) -> Result<()> {
        if self.matches(b'@') {
            self.next();
            let language = self.parse_identifier()?;
            selector.language = Some(language.to_owned());
        }
        self.skip_whitespace();
        if self.matches(b':') {
            self.next();
            self.parse_tags(&mut selector.include_tags, &mut selector.exclude_tags)?;
            self.skip_whitespace();
            if let Some(size_limit) = self.try_parse_size_limit()? {
                selector.size_limit = Some(size_limit);
            }
            let options = self.parse_options()?;
            if let Some(option) = options.first() {
                return Err(SlugforgeError::pattern_syntax(
                    "there are no options for dictionary selectors",
                    option.value_pos + 1,
                ));
            }
        }
        Ok(())
    }

    pub(crate) fn parse_selector(&mut self, kind: &str, kind_pos: usize) -> Result<Selector> {
        let mut selector = Selector {
            kind: kind.to_owned(),
            ..Selector::default()
        };
        self.parse_selector_modifiers(&mut selector)?;
        let mutex_tags = selector.mutually_exclusive_tags();
        if !mutex_tags.is_empty() {
            let joined = mutex_tags.join(", ");
            return Err(SlugforgeError::pattern_syntax(
                format!("mutually exclusive tags: {joined}"),
                kind_pos + 1,
            ));
        }
        Ok(selector)
    }

    fn apply_emoji_options(&self, emoji: &mut EmojiGen, options: Vec<RawOption<'a>>) -> Result<()> {
        for option in options {
            let column = option.value_pos + 1;
            match option.key {
                "count" => {
                    let mut value_parser = PatternParser::new(option.value);
                    let (min, max) = value_parser.parse_range().map_err(|_| {
                        SlugforgeError::pattern_syntax("malformed count option", column)
                    })?;
                    if !value_parser.is_eof() {
                        return Err(SlugforgeError::pattern_syntax(
                            format!(
                                "unexpected character(s) after count option: {}",
                                &option.value[value_parser.pos..]
                            ),
                            column + value_parser.pos,
                        ));
                    }
                    if max == 0 {
                        return Err(SlugforgeError::pattern_syntax(
                            "max count for emoji generator cannot be 0",
                            column,
                        ));
                    }
                    if max > MAX_EMOJI_COUNT {
                        return Err(SlugforgeError::pattern_syntax(
                            format!(
                                "max count for emoji generator cannot be greater than \
                                 {MAX_EMOJI_COUNT}: {max}"
                            ),
                            column,
                        ));
                    }
                    emoji.min_count = (min & 0xff) as u8;
                    emoji.max_count = (max & 0xff) as u8;
                }
                "unique" => match option.value {
                    "true" | "yes" => emoji.unique = true,
                    "false" | "no" => {}
                    unknown => {
                        return Err(SlugforgeError::pattern_syntax(
                            format!("unknown value for unique option: {unknown}"),
                            column,
                        ))
                    }
                },
                "tone" => emoji.tone = option.value.to_owned(),
                "gender" => emoji.gender = option.value.to_owned(),
                unknown => {
                    return Err(SlugforgeError::pattern_syntax(
                        format!("unknown option for emoji generator: {unknown}"),
                        column,
                    ))
                }
            }
        }
        if emoji.unique && emoji.min_count == 1 && emoji.max_count == 1 {
            return Err(SlugforgeError::pattern_syntax(
                "unique option cannot be used with count equal to 1",
                0,
            ));
        }
        Ok(())
    }

    pub(crate) fn parse_emoji_gen(&mut self) -> Result<EmojiGen> {
        let mut emoji = EmojiGen::default();
        if self.matches(b':') {
            self.next();
            self.parse_tags(&mut emoji.include_tags, &mut emoji.exclude_tags)?;
            self.skip_whitespace();
            let options = self.parse_options()?;
            self.apply_emoji_options(&mut emoji, options)?;
        }
        Ok(emoji)
    }

    fn parse_element(&mut self) -> Result<Placeholder> {
        self.skip_whitespace();
        let kind_pos = self.pos;
        let ident = self.parse_identifier()?;
        match ident {
            NUMBER_KEYWORD | NUM_KEYWORD => Ok(Placeholder::Number(self.parse_number_gen()?)),
            SPECIAL_KEYWORD | SPEC_KEYWORD => Ok(Placeholder::Special(self.parse_special_gen()?)),
            EMOJI_KEYWORD => Ok(Placeholder::Emoji(self.parse_emoji_gen()?)),
            kind => Ok(Placeholder::Selector(self.parse_selector(kind, kind_pos)?)),
        }
    }

    /// Applies the trailing global section to all selector placeholders:
    /// fills in a missing language, adds non-conflicting tags, and sets the
    /// size limit where absent.
    fn parse_global_settings(&mut self, placeholders: &mut [Placeholder]) -> Result<()> {
        self.skip_whitespace();
        if self.matches(b'@') {
            self.next();
            let language = self.parse_identifier()?;
            for placeholder in placeholders.iter_mut() {
                if let Placeholder::Selector(selector) = placeholder {
                    if selector.language.is_none() {
                        selector.language = Some(language.to_owned());
                    }
                }
            }
        }
        loop {
            self.skip_whitespace();
            if self.matches(b'+') {
                self.next();
                let tag = self.parse_tag()?;
                for placeholder in placeholders.iter_mut() {
                    if let Placeholder::Selector(selector) = placeholder {
                        if !contains_tag(&selector.exclude_tags, tag) {
                            insert_tag(&mut selector.include_tags, tag);
                        }
                    }
                }
            } else if self.matches(b'-') {
                self.next();
                let tag = self.parse_tag()?;
                for placeholder in placeholders.iter_mut() {
                    if let Placeholder::Selector(selector) = placeholder {
                        if !contains_tag(&selector.include_tags, tag) {
                            insert_tag(&mut selector.exclude_tags, tag);
                        }
                    }
                }
            } else {
                break;
            }
        }
        self.skip_whitespace();
        if let Some(size_limit) = self.try_parse_size_limit()? {
            for placeholder in placeholders.iter_mut() {
                if let Placeholder::Selector(selector) = placeholder {
                    if selector.size_limit.is_none() {
                        selector.size_limit = Some(size_limit);
                    }
                }
            }
        }
        Ok(())
    }

    /// Parses the whole pattern into its literal text chunks and placeholder
    /// sequence.
    ///
    /// Postcondition: `chunks.len() == placeholders.len() + 1`, with chunk
    /// `i` preceding placeholder `i` and the last chunk trailing the pattern.
    pub(crate) fn parse(mut self) -> Result<(Vec<String>, Vec<Placeholder>)> {
        let mut text_chunks: Vec<String> = vec![];
        let mut placeholders: Vec<Placeholder> = vec![];
        let mut arbitrary_start = self.pos;
        let mut arbitrary_text_end = self.pattern.len();

        while !self.is_eof() {
            self.skip_arbitrary_text();
            if self.is_eof() {
                text_chunks.push(self.source[arbitrary_start..self.pos].to_owned());
                break;
            }
            if self.matches(b'{') {
                // Empty chunks are pushed too, to keep the interleaving
                // invariant.
                text_chunks.push(self.source[arbitrary_start..self.pos].to_owned());
                self.next();
                let element = self.parse_element()?;
                placeholders.push(element);
                self.expect(b'}')?;
                arbitrary_start = self.pos;
            } else if self.matches(b'[') {
                arbitrary_text_end = self.pos;
                self.next();
                self.parse_global_settings(&mut placeholders)?;
                self.expect(b']')?;
                self.skip_whitespace();
                // The global section must be the final content of the source.
                if !self.is_eof() {
                    return Err(self.error("unexpected character"));
                }
            } else if self.matches(ESCAPE_CHAR) {
                self.next();
                if self.is_eof() {
                    return Err(self.error("unexpected end of pattern"));
                }
                // Escaped characters stay in the literal chunk verbatim,
                // backslash included.
                self.expect_one_of(ESCAPED_CHARS)?;
            } else {
                return Err(self.error("unexpected character"));
            }
        }
        if text_chunks.len() == placeholders.len() {
            text_chunks.push(self.source[arbitrary_start..arbitrary_text_end].to_owned());
        }
        Ok((text_chunks, placeholders))
    }
}

/// Parses a single selector written without braces, e.g. `noun@en:+tag1<=10`.
#[cfg(test)]
pub(crate) fn parse_selector_literal(source: &str) -> Result<Selector> {
    let mut parser = PatternParser::new(source);
    let kind_pos = parser.pos;
    let ident = parser.parse_identifier()?;
    if ident == NUMBER_KEYWORD || ident == NUM_KEYWORD {
        return Err(SlugforgeError::pattern_syntax(
            "expected dictionary kind, got number",
            kind_pos + 1,
        ));
    }
    parser.parse_selector(ident, kind_pos)
}

/// Parses a single number placeholder written without braces.
#[cfg(test)]
pub(crate) fn parse_number_literal(source: &str) -> Result<NumberGen> {
    let mut parser = PatternParser::new(source);
    parser.expect_str(NUMBER_KEYWORD)?;
    parser.parse_number_gen()
}

/// Parses a single special-character placeholder written without braces.
#[cfg(test)]
pub(crate) fn parse_special_literal(source: &str) -> Result<SpecialCharGen> {
    let mut parser = PatternParser::new(source);
    parser.expect_str(SPECIAL_KEYWORD)?;
    parser.parse_special_gen()
}

/// Parses a single emoji placeholder written without braces.
#[cfg(test)]
pub(crate) fn parse_emoji_literal(source: &str) -> Result<EmojiGen> {
    let mut parser = PatternParser::new(source);
    parser.expect_str(EMOJI_KEYWORD)?;
    parser.parse_emoji_gen()
}
