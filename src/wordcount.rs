//! Word count: tokenizing mapper and summing reducer.
//!
//! A word is a maximal run of word characters. By default word characters are
//! ASCII `[A-Za-z0-9_]`, so results do not depend on locale; everything else
//! (whitespace, punctuation, non-ASCII letters) separates words.
//! [`WordChars::Unicode`] widens the class to Unicode word characters.
//!
//! ```
//! use wordbeam::wordcount::{tokenize, WordChars};
//!
//! let words: Vec<&str> = tokenize("foo, bar! foo?", WordChars::Ascii).collect();
//! assert_eq!(words, ["foo", "bar", "foo"]);
//! ```

use crate::job::{MapReduceJob, Mapper, Record, Reducer, records_from_lines};
use crate::{PCollection, Pipeline};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::Split;
use std::sync::LazyLock;

static UNICODE_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+").expect("valid word pattern"));

/// Which characters make up a word.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WordChars {
    /// `[A-Za-z0-9_]`
    #[default]
    Ascii,
    /// Unicode `\w`: letters, marks, decimal digits, connector punctuation.
    Unicode,
}

fn is_ascii_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn is_ascii_separator(c: char) -> bool {
    !is_ascii_word_char(c)
}

/// Whether `c` is a word character under `chars`.
pub fn is_word_char(c: char, chars: WordChars) -> bool {
    match chars {
        WordChars::Ascii => is_ascii_word_char(c),
        WordChars::Unicode => {
            let mut buf = [0u8; 4];
            UNICODE_WORD.is_match(c.encode_utf8(&mut buf))
        }
    }
}

/// Iterator over the words of one line, left to right.
pub struct Tokens<'a>(TokensInner<'a>);

enum TokensInner<'a> {
    Ascii(Split<'a, fn(char) -> bool>),
    Unicode(regex::Matches<'static, 'a>),
}

impl<'a> Iterator for Tokens<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        match &mut self.0 {
            // Leading, trailing and repeated separators split into empty pieces.
            TokensInner::Ascii(pieces) => pieces.find(|piece| !piece.is_empty()),
            TokensInner::Unicode(matches) => matches.next().map(|m| m.as_str()),
        }
    }
}

/// Split `line` into its maximal non-empty runs of word characters.
pub fn tokenize(line: &str, chars: WordChars) -> Tokens<'_> {
    match chars {
        WordChars::Ascii => Tokens(TokensInner::Ascii(
            line.split(is_ascii_separator as fn(char) -> bool),
        )),
        WordChars::Unicode => Tokens(TokensInner::Unicode(UNICODE_WORD.find_iter(line))),
    }
}

/// Emits `(word, 1)` for every word of a record's line.
#[derive(Clone, Copy, Debug, Default)]
pub struct WordCountMapper {
    pub chars: WordChars,
}

impl WordCountMapper {
    pub fn new(chars: WordChars) -> Self {
        Self { chars }
    }
}

impl Mapper for WordCountMapper {
    type Key = String;
    type Value = u64;

    fn map(&self, record: &Record) -> Vec<(String, u64)> {
        tokenize(&record.line, self.chars)
            .map(|word| (word.to_string(), 1))
            .collect()
    }
}

/// Sums the counts emitted for a word. No counts sum to zero.
#[derive(Clone, Copy, Debug, Default)]
pub struct WordCountReducer;

impl Reducer for WordCountReducer {
    type Key = String;
    type Value = u64;
    type Output = u64;

    fn reduce(&self, _word: &String, counts: &[u64]) -> u64 {
        counts.iter().sum()
    }
}

pub type WordCountJob = MapReduceJob<WordCountMapper, WordCountReducer>;

/// A word-count job using `chars` as the word character class.
pub fn word_count_job(chars: WordChars) -> WordCountJob {
    MapReduceJob::new(WordCountMapper::new(chars), WordCountReducer)
}

/// Attach an ASCII word count over `lines` to `p`.
///
/// ```
/// use wordbeam::*;
/// use wordbeam::wordcount::word_count;
///
/// let p = Pipeline::default();
/// let counts = word_count(&p, vec!["a a".to_string(), "a".to_string()]).collect_seq()?;
/// assert_eq!(counts, vec![("a".to_string(), 3)]);
/// # anyhow::Result::<()>::Ok(())
/// ```
pub fn word_count<S: Into<String>>(p: &Pipeline, lines: Vec<S>) -> PCollection<(String, u64)> {
    word_count_job(WordChars::Ascii).plan(p, records_from_lines(lines))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(line: &str, chars: WordChars) -> Vec<&str> {
        tokenize(line, chars).collect()
    }

    #[test]
    fn splits_on_runs_of_separators() {
        assert_eq!(words("  a--b  c ", WordChars::Ascii), ["a", "b", "c"]);
    }

    #[test]
    fn underscore_and_digits_are_word_characters() {
        assert_eq!(words("snake_case x86-64", WordChars::Ascii), ["snake_case", "x86", "64"]);
    }

    #[test]
    fn ascii_mode_treats_non_ascii_letters_as_separators() {
        assert_eq!(words("café naïve", WordChars::Ascii), ["caf", "na", "ve"]);
    }

    #[test]
    fn unicode_mode_keeps_accented_words_whole() {
        assert_eq!(words("café naïve", WordChars::Unicode), ["café", "naïve"]);
    }

    #[test]
    fn blank_and_punctuation_only_lines_have_no_words() {
        assert!(words("", WordChars::Ascii).is_empty());
        assert!(words(" ,.;!? ", WordChars::Ascii).is_empty());
        assert!(words(" ,.;!? ", WordChars::Unicode).is_empty());
    }

    #[test]
    fn is_word_char_matches_tokenizer() {
        assert!(is_word_char('_', WordChars::Ascii));
        assert!(!is_word_char('é', WordChars::Ascii));
        assert!(is_word_char('é', WordChars::Unicode));
        assert!(!is_word_char('-', WordChars::Unicode));
    }

    #[test]
    fn reducer_sums_and_accepts_no_counts() {
        let r = WordCountReducer;
        assert_eq!(r.reduce(&"a".to_string(), &[1, 1, 1]), 3);
        assert_eq!(r.reduce(&"a".to_string(), &[]), 0);
    }
}
