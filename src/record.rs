use nom::{
    bytes::complete::{tag, take_while1},
    character::complete::space1,
    combinator::map_res,
    multi::separated_list1,
    sequence::{delimited, separated_pair},
    IResult,
};

use crate::decoder::DIGITS;
use crate::segments::Segments;

/// Number of output digits on each display.
pub const OUTPUT_DIGITS: usize = 4;

/// One line of puzzle input: the ten patterns seen on a display,
/// and the digits it is currently showing.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Record {
    pub catalog: Vec<Segments>,
    pub outputs: Vec<Segments>,
}

fn pattern_parser(input: &str) -> IResult<&str, Segments> {
    map_res(take_while1(|ch: char| ch.is_ascii_alphabetic()), str::parse::<Segments>)(input)
}

fn patterns_parser(input: &str) -> IResult<&str, Vec<Segments>> {
    separated_list1(space1, pattern_parser)(input)
}

fn parse_record(input: &str) -> IResult<&str, (Vec<Segments>, Vec<Segments>)> {
    separated_pair(
        patterns_parser,
        delimited(space1, tag("|"), space1),
        patterns_parser,
    )(input)
}

impl TryFrom<&str> for Record {
    type Error = String;
    fn try_from(s: &str) -> Result<Record, String> {
        let trimmed = s.trim();
        match parse_record(trimmed) {
            Ok((unparsed, (catalog, outputs))) => {
                if !unparsed.is_empty() {
                    return Err(format!("unexpected trailing junk: '{}'", unparsed));
                }
                if catalog.len() != DIGITS {
                    return Err(format!(
                        "expected {} patterns before '|', got {}",
                        DIGITS,
                        catalog.len()
                    ));
                }
                if outputs.len() != OUTPUT_DIGITS {
                    return Err(format!(
                        "expected {} outputs after '|', got {}",
                        OUTPUT_DIGITS,
                        outputs.len()
                    ));
                }
                Ok(Record { catalog, outputs })
            }
            Err(e) => Err(format!("failed to parse '{}': {}", s, e)),
        }
    }
}

/// Parses one record per non-blank line.
pub fn parse_records(input: &str) -> Result<Vec<Record>, String> {
    input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| Record::try_from(line).map_err(|e| format!("line {}: {}", i + 1, e)))
        .collect()
}

#[cfg(test)]
const SAMPLE: &str = concat!(
    "be cfbegad cbdgef fgaecd cgeb fdcge agebfd fecdb fabcd edb | fdgacbe cefdb cefbgd gcbe\n",
    "edbfga begcd cbg gc gcadebf fbgde acbgfd abcde gfcbed gfec | fcgedb cgb dgebacf gc\n",
    "fgaebd cg bdaec gdafb agbcfd gdcbef bgcad gfac gcb cdgabef | cg cg fdcagb cbg\n",
);

#[test]
fn test_parse_record() {
    let record = Record::try_from(
        "acedgfb cdfbe gcdfa fbcad dab cefabd cdfgeb eafb cagedb ab | cdfeb fcadb cdfeb cdbaf",
    )
    .expect("sample line should parse");
    assert_eq!(record.catalog.len(), DIGITS);
    assert_eq!(record.catalog[0], Segments::ALL);
    assert_eq!(record.catalog[9], "ab".parse::<Segments>().unwrap());
    assert_eq!(record.outputs.len(), OUTPUT_DIGITS);
    // fcadb and cdbaf light the same segments.
    assert_eq!(record.outputs[1], record.outputs[3]);
    assert_eq!(record.outputs[0], record.outputs[2]);
    assert_ne!(record.outputs[0], record.outputs[3]);
}

#[test]
fn test_parse_record_tolerates_extra_spaces() {
    let tidy = Record::try_from(
        "be cfbegad cbdgef fgaecd cgeb fdcge agebfd fecdb fabcd edb | fdgacbe cefdb cefbgd gcbe",
    );
    let messy = Record::try_from(
        "  be cfbegad  cbdgef fgaecd cgeb fdcge agebfd fecdb fabcd edb  |  fdgacbe cefdb cefbgd gcbe \n",
    );
    assert!(tidy.is_ok());
    assert_eq!(tidy, messy);
}

#[test]
fn test_parse_record_errors() {
    // No separator.
    assert!(Record::try_from("ab abc abcd").is_err());
    // Nothing after the separator.
    assert!(Record::try_from("ab abc | ").is_err());
    // Not a segment letter.
    assert!(Record::try_from(
        "be cfbegad cbdgef fgaecd cgeb fdcge agebfd fecdb fabcd edb | fdgacbe cefdb cefbgd gcbz"
    )
    .is_err());
    // Repeated letter within a token.
    assert!(Record::try_from(
        "be cfbegad cbdgef fgaecd cgeb fdcge agebfd fecdb fabcd edb | fdgacbe cefdb cefbgd gcbb"
    )
    .is_err());
    // Nine patterns.
    assert_eq!(
        Record::try_from(
            "be cfbegad cbdgef fgaecd cgeb fdcge agebfd fecdb fabcd | fdgacbe cefdb cefbgd gcbe"
        ),
        Err("expected 10 patterns before '|', got 9".to_string())
    );
    // Three outputs.
    assert_eq!(
        Record::try_from(
            "be cfbegad cbdgef fgaecd cgeb fdcge agebfd fecdb fabcd edb | fdgacbe cefdb cefbgd"
        ),
        Err("expected 4 outputs after '|', got 3".to_string())
    );
    // A second separator.
    assert!(Record::try_from(
        "be cfbegad cbdgef fgaecd cgeb fdcge agebfd fecdb fabcd edb | fdgacbe cefdb cefbgd gcbe | ab"
    )
    .is_err());
}

#[test]
fn test_parse_records() {
    let records = parse_records(SAMPLE).expect("sample should parse");
    assert_eq!(records.len(), 3);
    let with_blank_lines = format!("\n{}\n\n", SAMPLE);
    assert_eq!(parse_records(&with_blank_lines), Ok(records));
}

#[test]
fn test_parse_records_names_the_bad_line() {
    let input = format!("{}ab | cd\n", SAMPLE);
    match parse_records(&input) {
        Err(e) => assert!(e.starts_with("line 4: "), "unexpected error: {}", e),
        Ok(records) => panic!("expected an error, got {:?}", records),
    }
}
