use std::error::Error;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// The set of lit segments of one (possibly scrambled) digit.
///
/// Bit `i` is set when segment letter `'a' + i` is lit.  Since there
/// are only seven segments, a `u8` holds any pattern and the subset
/// tests the decoder needs are single bitwise operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Segments(u8);

const SEGMENT_LETTERS: &str = "abcdefg";

impl Segments {
    pub const EMPTY: Segments = Segments(0);
    pub const ALL: Segments = Segments(0b0111_1111);

    #[cfg(test)]
    pub(crate) fn from_bits(bits: u8) -> Option<Segments> {
        if bits & !Segments::ALL.0 == 0 {
            Some(Segments(bits))
        } else {
            None
        }
    }

    #[cfg(test)]
    pub(crate) fn bits(&self) -> u8 {
        self.0
    }

    /// Number of lit segments.
    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn contains(&self, letter: char) -> bool {
        match letter_bit(letter) {
            Some(bit) => self.0 & bit != 0,
            None => false,
        }
    }

    pub fn is_superset(&self, other: &Segments) -> bool {
        self.0 & other.0 == other.0
    }

    /// The segments which are not lit.
    pub fn complement(&self) -> Segments {
        Segments(Segments::ALL.0 & !self.0)
    }

    /// True for the segment counts used by exactly one digit: 2 (the
    /// digit 1), 3 (7), 4 (4) and 7 (8).
    pub fn has_unique_len(&self) -> bool {
        matches!(self.len(), 2 | 3 | 4 | 7)
    }

    fn letters(&self) -> impl Iterator<Item = char> + '_ {
        SEGMENT_LETTERS.chars().filter(move |ch| self.contains(*ch))
    }
}

fn letter_bit(letter: char) -> Option<u8> {
    match letter {
        'a'..='g' => Some(1 << (letter as u8 - b'a')),
        _ => None,
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub enum PatternError {
    Empty,
    BadLetter(char),
    Repeated(char),
}

impl Display for PatternError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::Empty => f.write_str("empty segment pattern"),
            PatternError::BadLetter(ch) => {
                write!(f, "'{}' is not a segment letter (expected a-g)", ch)
            }
            PatternError::Repeated(ch) => {
                write!(f, "segment '{}' appears more than once", ch)
            }
        }
    }
}

impl Error for PatternError {}

impl FromStr for Segments {
    type Err = PatternError;
    fn from_str(s: &str) -> Result<Segments, PatternError> {
        if s.is_empty() {
            return Err(PatternError::Empty);
        }
        let mut bits: u8 = 0;
        for ch in s.chars() {
            match letter_bit(ch) {
                Some(bit) if bits & bit != 0 => {
                    return Err(PatternError::Repeated(ch));
                }
                Some(bit) => {
                    bits |= bit;
                }
                None => {
                    return Err(PatternError::BadLetter(ch));
                }
            }
        }
        Ok(Segments(bits))
    }
}

impl Display for Segments {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for ch in self.letters() {
            write!(f, "{}", ch)?;
        }
        Ok(())
    }
}

#[cfg(test)]
fn seg(s: &str) -> Segments {
    s.parse().expect("valid test pattern")
}

#[test]
fn test_parse_segments() {
    assert_eq!(seg("a").bits(), 0b000_0001);
    assert_eq!(seg("g").bits(), 0b100_0000);
    assert_eq!(seg("abcdefg"), Segments::ALL);
    assert_eq!(seg("cf").len(), 2);
    assert_eq!("".parse::<Segments>(), Err(PatternError::Empty));
    assert_eq!("abh".parse::<Segments>(), Err(PatternError::BadLetter('h')));
    assert_eq!("aB".parse::<Segments>(), Err(PatternError::BadLetter('B')));
    assert_eq!("aba".parse::<Segments>(), Err(PatternError::Repeated('a')));
}

#[test]
fn test_letter_order_is_irrelevant() {
    assert_eq!(seg("cfbegad"), seg("abcdefg"));
    assert_eq!(seg("fdgacbe"), seg("cfbegad"));
    assert_eq!(seg("gcbe"), seg("bceg"));
    assert_ne!(seg("gcbe"), seg("bcef"));
}

#[test]
fn test_display_is_canonical() {
    assert_eq!(seg("gfedcba").to_string(), "abcdefg");
    assert_eq!(seg("fc").to_string(), "cf");
    assert_eq!(Segments::EMPTY.to_string(), "");
}

#[test]
fn test_set_operations() {
    let four = seg("bcdf");
    let nine = seg("abcdfg");
    let zero = seg("abcefg");
    assert!(nine.is_superset(&four));
    assert!(!zero.is_superset(&four));
    assert!(four.is_superset(&four));
    assert!(four.is_superset(&Segments::EMPTY));
    assert_eq!(nine.complement(), seg("e"));
    assert_eq!(Segments::ALL.complement(), Segments::EMPTY);
    assert!(zero.contains('a'));
    assert!(!zero.contains('d'));
    assert!(!zero.contains('z'));
}

#[test]
fn test_from_bits() {
    assert_eq!(Segments::from_bits(0b0100_0001), Some(seg("ag")));
    assert_eq!(Segments::from_bits(0b1000_0000), None);
}

#[test]
fn test_has_unique_len() {
    assert!(seg("cf").has_unique_len());
    assert!(seg("acf").has_unique_len());
    assert!(seg("bcdf").has_unique_len());
    assert!(seg("abcdefg").has_unique_len());
    assert!(!seg("acdeg").has_unique_len());
    assert!(!seg("abcefg").has_unique_len());
}
