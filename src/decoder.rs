use std::error::Error;
use std::fmt::{self, Display, Formatter};

use tracing::{event, span, Level};

use crate::segments::Segments;

/// Number of distinct digit patterns in a catalog.
pub const DIGITS: usize = 10;

/// | digit | segment count |
/// | ----- | ------------- |
/// | 0     | 6             |
/// | 1     | 2             |
/// | 2     | 5             |
/// | 3     | 5             |
/// | 4     | 4             |
/// | 5     | 5             |
/// | 6     | 6             |
/// | 7     | 3             |
/// | 8     | 7             |
/// | 9     | 6             |
const SEGMENT_COUNTS: [usize; DIGITS] = [6, 2, 5, 5, 4, 5, 6, 3, 7, 6];

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum DecodeError {
    /// The catalog cannot be a scrambling of the ten digits.
    MalformedCatalog(String),
    /// An output pattern is not one of the catalog's patterns.
    UnknownOutput(Segments),
    /// More outputs than fit in the result.
    TooManyOutputs(usize),
    /// Adding this record's value overflowed the running total.
    TotalOverflow(u64),
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::MalformedCatalog(msg) => write!(f, "malformed catalog: {}", msg),
            DecodeError::UnknownOutput(pattern) => {
                write!(f, "output pattern '{}' is not in the catalog", pattern)
            }
            DecodeError::TooManyOutputs(n) => {
                write!(f, "{} output digits is too many to decode", n)
            }
            DecodeError::TotalOverflow(n) => {
                write!(f, "adding {} overflows the total", n)
            }
        }
    }
}

impl Error for DecodeError {}

fn malformed(msg: String) -> DecodeError {
    event!(Level::DEBUG, "rejecting catalog: {}", msg);
    DecodeError::MalformedCatalog(msg)
}

/// The unscrambled meaning of each pattern of one display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigitMapping {
    /// `by_digit[d]` is the scrambled pattern for the digit `d`.
    by_digit: [Segments; DIGITS],
}

impl DigitMapping {
    pub fn digit_of(&self, pattern: &Segments) -> Option<u8> {
        self.by_digit
            .iter()
            .position(|p| p == pattern)
            .map(|d| d as u8)
    }

    pub fn pattern_of(&self, digit: u8) -> Option<Segments> {
        self.by_digit.get(digit as usize).copied()
    }

    /// Reads the outputs as a decimal number, most significant digit
    /// first.
    pub fn decode_outputs(&self, outputs: &[Segments]) -> Result<u64, DecodeError> {
        let mut number: u64 = 0;
        for output in outputs {
            let digit = match self.digit_of(output) {
                Some(d) => d,
                None => {
                    event!(Level::DEBUG, "no pattern in {:?} matches {}", self, output);
                    return Err(DecodeError::UnknownOutput(*output));
                }
            };
            number = number
                .checked_mul(10)
                .and_then(|n| n.checked_add(u64::from(digit)))
                .ok_or(DecodeError::TooManyOutputs(outputs.len()))?;
        }
        Ok(number)
    }
}

/// The catalog patterns we have not yet identified.
struct Pool {
    unresolved: Vec<Segments>,
    resolved: [Option<Segments>; DIGITS],
}

impl Pool {
    fn new(catalog: &[Segments]) -> Pool {
        Pool {
            unresolved: catalog.to_vec(),
            resolved: [None; DIGITS],
        }
    }

    fn get(&self, digit: u8) -> Result<Segments, DecodeError> {
        self.resolved[digit as usize]
            .ok_or_else(|| malformed(format!("digit {} used before it was identified", digit)))
    }

    /// Identifies `digit` as the only unresolved pattern having
    /// `count` segments and satisfying `pred`.  Zero or several
    /// candidates means the catalog is malformed; we never guess.
    fn resolve<F>(&mut self, digit: u8, pred: F) -> Result<Segments, DecodeError>
    where
        F: Fn(&Segments) -> bool,
    {
        let count = SEGMENT_COUNTS[digit as usize];
        let candidates: Vec<usize> = self
            .unresolved
            .iter()
            .enumerate()
            .filter(|(_, p)| p.len() == count && pred(*p))
            .map(|(i, _)| i)
            .collect();
        match candidates.as_slice() {
            [i] => {
                let pattern = self.unresolved.swap_remove(*i);
                event!(Level::TRACE, "digit {} is {}", digit, pattern);
                self.resolved[digit as usize] = Some(pattern);
                Ok(pattern)
            }
            [] => Err(malformed(format!("no candidate pattern for digit {}", digit))),
            many => Err(malformed(format!(
                "{} candidate patterns for digit {}: {}",
                many.len(),
                digit,
                many.iter()
                    .map(|i| self.unresolved[*i].to_string())
                    .collect::<Vec<_>>()
                    .join(" "),
            ))),
        }
    }

    fn finish(self) -> Result<DigitMapping, DecodeError> {
        if !self.unresolved.is_empty() {
            return Err(malformed(format!(
                "{} patterns left unidentified",
                self.unresolved.len()
            )));
        }
        let mut by_digit = [Segments::EMPTY; DIGITS];
        for (digit, pattern) in self.resolved.iter().enumerate() {
            by_digit[digit] = pattern
                .ok_or_else(|| malformed(format!("digit {} was not identified", digit)))?;
        }
        Ok(DigitMapping { by_digit })
    }
}

fn check_catalog(catalog: &[Segments]) -> Result<(), DecodeError> {
    if catalog.len() != DIGITS {
        return Err(malformed(format!(
            "expected {} patterns, got {}",
            DIGITS,
            catalog.len()
        )));
    }
    for (i, pattern) in catalog.iter().enumerate() {
        if catalog[..i].contains(pattern) {
            return Err(malformed(format!("pattern {} appears more than once", pattern)));
        }
    }
    let mut sizes: Vec<usize> = catalog.iter().map(Segments::len).collect();
    sizes.sort_unstable();
    let mut expected: Vec<usize> = SEGMENT_COUNTS.to_vec();
    expected.sort_unstable();
    if sizes != expected {
        return Err(malformed(format!(
            "pattern sizes {:?} do not match the seven-segment digits {:?}",
            sizes, expected
        )));
    }
    Ok(())
}

/// Works out which digit each of the ten catalog patterns represents.
///
/// # Identifying 1, 4, 7 and 8
///
/// These are the only digits with 2, 4, 3 and 7 lit segments
/// respectively.
///
/// # Identifying 0, 6 and 9 (six segments)
///
/// Of these, only 9 contains all of the segments of 4.  Of the
/// remaining two, only 0 contains both segments of 1.  The last one is
/// 6.
///
/// # Identifying 2, 3 and 5 (five segments)
///
/// Only 3 contains both segments of 1.  The segment missing from 9 is
/// the bottom-left one (e), and of 2 and 5 only 2 lights it.  The last
/// one is 5.
///
/// The order of these steps matters, since each uses digits identified
/// earlier.
pub fn build_mapping(catalog: &[Segments]) -> Result<DigitMapping, DecodeError> {
    let span = span!(Level::TRACE, "build_mapping");
    let _enter = span.enter();

    check_catalog(catalog)?;
    let mut pool = Pool::new(catalog);

    for digit in [1, 7, 4, 8] {
        pool.resolve(digit, |_| true)?;
    }

    let one = pool.get(1)?;
    let four = pool.get(4)?;
    let nine = pool.resolve(9, |p| p.is_superset(&four))?;
    pool.resolve(0, |p| p.is_superset(&one))?;
    pool.resolve(6, |_| true)?;

    let e = nine.complement();
    pool.resolve(3, |p| p.is_superset(&one))?;
    pool.resolve(2, |p| p.is_superset(&e))?;
    pool.resolve(5, |_| true)?;

    pool.finish()
}

pub fn decode_outputs(mapping: &DigitMapping, outputs: &[Segments]) -> Result<u64, DecodeError> {
    mapping.decode_outputs(outputs)
}

/// Builds the mapping for `catalog` and uses it to read `outputs`.
pub fn decode(catalog: &[Segments], outputs: &[Segments]) -> Result<u64, DecodeError> {
    build_mapping(catalog)?.decode_outputs(outputs)
}

#[cfg(test)]
const CANONICAL: [&str; DIGITS] = [
    "abcefg", "cf", "acdeg", "acdfg", "bcdf", "abdfg", "abdefg", "acf", "abcdefg", "abcdfg",
];

#[cfg(test)]
fn patterns(tokens: &[&str]) -> Vec<Segments> {
    tokens
        .iter()
        .map(|s| s.parse().expect("valid test pattern"))
        .collect()
}

#[cfg(test)]
fn line(s: &str) -> (Vec<Segments>, Vec<Segments>) {
    let (catalog, outputs) = s.split_once(" | ").expect("test line should contain '|'");
    (
        patterns(&catalog.split(' ').collect::<Vec<_>>()),
        patterns(&outputs.split(' ').collect::<Vec<_>>()),
    )
}

/// Applies a segment permutation (`perm[i]` is where letter `i` goes).
#[cfg(test)]
fn scramble(pattern: &Segments, perm: &[u8; 7]) -> Segments {
    let mut bits = 0;
    for i in 0..7 {
        if pattern.bits() & (1 << i) != 0 {
            bits |= 1 << perm[i];
        }
    }
    Segments::from_bits(bits).expect("permutation stays within a-g")
}

#[cfg(test)]
fn all_permutations() -> Vec<[u8; 7]> {
    fn extend(prefix: &mut Vec<u8>, result: &mut Vec<[u8; 7]>) {
        if prefix.len() == 7 {
            let mut perm = [0; 7];
            perm.copy_from_slice(prefix);
            result.push(perm);
            return;
        }
        for i in 0..7 {
            if !prefix.contains(&i) {
                prefix.push(i);
                extend(prefix, result);
                prefix.pop();
            }
        }
    }
    let mut result = Vec::new();
    extend(&mut Vec::new(), &mut result);
    result
}

#[test]
fn test_canonical_catalog() {
    let catalog = patterns(&CANONICAL);
    let mapping = build_mapping(&catalog).expect("canonical catalog should decode");
    for (digit, pattern) in catalog.iter().enumerate() {
        assert_eq!(mapping.digit_of(pattern), Some(digit as u8));
        assert_eq!(mapping.pattern_of(digit as u8), Some(*pattern));
    }
    let outputs = patterns(&["cf", "acf", "cf", "bcdf"]);
    assert_eq!(decode_outputs(&mapping, &outputs), Ok(1714));
}

#[test]
fn test_sample_line() {
    let (catalog, outputs) = line(
        "acedgfb cdfbe gcdfa fbcad dab cefabd cdfgeb eafb cagedb ab | cdfeb fcadb cdfeb cdbaf",
    );
    let mapping = build_mapping(&catalog).expect("sample should decode");
    let expected = [
        ("cagedb", 0),
        ("ab", 1),
        ("gcdfa", 2),
        ("fbcad", 3),
        ("eafb", 4),
        ("cdfbe", 5),
        ("cdfgeb", 6),
        ("dab", 7),
        ("acedgfb", 8),
        ("cefabd", 9),
    ];
    for (token, digit) in expected {
        let pattern: Segments = token.parse().expect("valid test pattern");
        assert_eq!(mapping.digit_of(&pattern), Some(digit), "pattern {}", token);
    }
    assert_eq!(mapping.decode_outputs(&outputs), Ok(5353));
    assert_eq!(decode(&catalog, &outputs), Ok(5353));
}

#[test]
fn test_every_scrambling_decodes() {
    let canonical = patterns(&CANONICAL);
    let outputs = patterns(&["abdefg", "abcdfg", "acdeg", "abcefg"]);
    for perm in all_permutations() {
        let catalog: Vec<Segments> = canonical.iter().map(|p| scramble(p, &perm)).collect();
        let scrambled_outputs: Vec<Segments> =
            outputs.iter().map(|p| scramble(p, &perm)).collect();
        let mapping = match build_mapping(&catalog) {
            Ok(m) => m,
            Err(e) => panic!("permutation {:?} failed: {}", perm, e),
        };
        // A bijection onto 0..=9.
        let mut digits: Vec<u8> = catalog
            .iter()
            .filter_map(|p| mapping.digit_of(p))
            .collect();
        digits.sort_unstable();
        assert_eq!(digits, (0..10).collect::<Vec<u8>>());
        for (digit, pattern) in catalog.iter().enumerate() {
            assert_eq!(mapping.digit_of(pattern), Some(digit as u8));
        }
        assert_eq!(mapping.decode_outputs(&scrambled_outputs), Ok(6920));
    }
}

#[test]
fn test_catalog_order_is_irrelevant() {
    let (catalog, _) = line(
        "be cfbegad cbdgef fgaecd cgeb fdcge agebfd fecdb fabcd edb | fdgacbe cefdb cefbgd gcbe",
    );
    let reference = build_mapping(&catalog).expect("sample should decode");
    let mut rotated = catalog.clone();
    for _ in 0..catalog.len() {
        rotated.rotate_left(1);
        assert_eq!(build_mapping(&rotated), Ok(reference));
    }
    let mut reversed = catalog.clone();
    reversed.reverse();
    assert_eq!(build_mapping(&reversed), Ok(reference));
}

#[test]
fn test_build_mapping_is_idempotent() {
    let catalog = patterns(&CANONICAL);
    assert_eq!(build_mapping(&catalog), build_mapping(&catalog));
}

#[test]
fn test_two_patterns_of_size_two() {
    let mut tokens = CANONICAL;
    tokens[7] = "ab"; // replaces the 3-segment 7
    assert!(matches!(
        build_mapping(&patterns(&tokens)),
        Err(DecodeError::MalformedCatalog(_))
    ));
}

#[test]
fn test_repeated_pattern() {
    let mut tokens = CANONICAL;
    tokens[2] = "acdfg"; // same as 3
    assert!(matches!(
        build_mapping(&patterns(&tokens)),
        Err(DecodeError::MalformedCatalog(_))
    ));
}

#[test]
fn test_wrong_pattern_count() {
    let catalog = patterns(&CANONICAL[..9]);
    assert!(matches!(
        build_mapping(&catalog),
        Err(DecodeError::MalformedCatalog(_))
    ));
}

#[test]
fn test_ambiguous_step() {
    // Every six-segment pattern contains the 4.
    let catalog = patterns(&[
        "ab", "abc", "abcd", "abcdefg", "abcdef", "abcdeg", "abcdfg", "abcde", "abcdf", "abcdg",
    ]);
    match build_mapping(&catalog) {
        Err(DecodeError::MalformedCatalog(msg)) => {
            assert!(msg.contains("digit 9"), "unexpected message: {}", msg);
        }
        other => panic!("expected a malformed catalog, got {:?}", other),
    }
}

#[test]
fn test_step_without_candidates() {
    // No six-segment pattern contains the 4.
    let catalog = patterns(&[
        "ab", "abc", "abcd", "abcdefg", "abcefg", "abdefg", "acdefg", "abcde", "abcdf", "abcdg",
    ]);
    assert_eq!(
        build_mapping(&catalog),
        Err(DecodeError::MalformedCatalog(
            "no candidate pattern for digit 9".to_string()
        ))
    );
}

#[test]
fn test_unknown_output() {
    let mapping = build_mapping(&patterns(&CANONICAL)).expect("canonical catalog should decode");
    // "ab" is not one of the ten canonical digits.
    let outputs = patterns(&["cf", "ab", "acf", "cf"]);
    let ab: Segments = "ab".parse().expect("valid test pattern");
    assert_eq!(
        mapping.decode_outputs(&outputs),
        Err(DecodeError::UnknownOutput(ab))
    );
}

#[test]
fn test_output_edge_cases() {
    let mapping = build_mapping(&patterns(&CANONICAL)).expect("canonical catalog should decode");
    assert_eq!(mapping.decode_outputs(&[]), Ok(0));
    let zero = mapping.pattern_of(0).expect("0 is a digit");
    let nine = mapping.pattern_of(9).expect("9 is a digit");
    assert_eq!(mapping.decode_outputs(&[zero, zero, nine]), Ok(9));
    assert_eq!(mapping.decode_outputs(&[nine; 19]), Ok(9_999_999_999_999_999_999));
    assert_eq!(
        mapping.decode_outputs(&[nine; 20]),
        Err(DecodeError::TooManyOutputs(20))
    );
}

#[test]
fn test_pattern_of_rejects_non_digits() {
    let mapping = build_mapping(&patterns(&CANONICAL)).expect("canonical catalog should decode");
    assert_eq!(mapping.pattern_of(8), Some(Segments::ALL));
    assert_eq!(mapping.pattern_of(10), None);
    assert_eq!(mapping.pattern_of(u8::MAX), None);
}
