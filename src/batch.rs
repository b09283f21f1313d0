use rayon::prelude::*;
use tracing::{event, Level};

use crate::decoder::{decode, DecodeError};
use crate::record::Record;

/// Counts the output digits we can recognise from their segment count
/// alone (1, 4, 7 and 8), without decoding anything.
pub fn count_unique_len_outputs(records: &[Record]) -> usize {
    records
        .iter()
        .flat_map(|r| r.outputs.iter())
        .filter(|p| p.has_unique_len())
        .count()
}

/// Decodes each record independently.  `result[i]` belongs to
/// `records[i]` whatever order the work completes in.
pub fn decode_all(records: &[Record]) -> Vec<Result<u64, DecodeError>> {
    records
        .par_iter()
        .map(|r| decode(&r.catalog, &r.outputs))
        .collect()
}

/// Adds up the decoded value of every record.  On failure, returns
/// the index of the first record which could not be decoded.
pub fn sum_outputs(records: &[Record]) -> Result<u64, (usize, DecodeError)> {
    let mut total: u64 = 0;
    for (i, result) in decode_all(records).into_iter().enumerate() {
        match result {
            Ok(n) => {
                event!(Level::TRACE, "record {} reads {}", i, n);
                total = match total.checked_add(n) {
                    Some(t) => t,
                    None => {
                        event!(Level::DEBUG, "record {} overflows the total {}", i, total);
                        return Err((i, DecodeError::TotalOverflow(n)));
                    }
                };
            }
            Err(e) => {
                event!(Level::DEBUG, "record {} could not be decoded: {}", i, e);
                return Err((i, e));
            }
        }
    }
    Ok(total)
}

#[cfg(test)]
const SAMPLE: &str = concat!(
    "be cfbegad cbdgef fgaecd cgeb fdcge agebfd fecdb fabcd edb | fdgacbe cefdb cefbgd gcbe\n",
    "edbfga begcd cbg gc gcadebf fbgde acbgfd abcde gfcbed gfec | fcgedb cgb dgebacf gc\n",
    "fgaebd cg bdaec gdafb agbcfd gdcbef bgcad gfac gcb cdgabef | cg cg fdcagb cbg\n",
    "fbegcd cbd adcefb dageb afcb bc aefdc ecdab fgdeca fcdbega | efabcd cedba gadfec cb\n",
    "aecbfdg fbg gf bafeg dbefa fcge gcbea fcaegb dgceab fcbdga | gecf egdcabf bgf bfgea\n",
    "fgeab ca afcebg bdacfeg cfaedg gcfdb baec bfadeg bafgc acf | gebdcfa ecba ca fadegcb\n",
    "dbcfg fgd bdegcaf fgec aegbdf ecdfab fbedc dacgb gdcebf gf | cefg dcbef fcge gbcadfe\n",
    "bdfegc cbegaf gecbf dfcage bdacg ed bedf ced adcbefg gebcd | ed bcgafe cdgba cbgef\n",
    "egadfb cdbfeg cegd fecab cgb gbdefca cg fgcdab egfdb bfceg | gbdfcae bgc cg cgb\n",
    "gcafb gcf dcaebfg ecagb gf abcdeg gaef cafbge fdbac fegbdc | fgae cfgab fg bagce\n",
);

#[cfg(test)]
fn sample_records() -> Vec<Record> {
    crate::record::parse_records(SAMPLE).expect("sample should parse")
}

#[test]
fn test_count_unique_len_outputs() {
    assert_eq!(count_unique_len_outputs(&sample_records()), 26);
    assert_eq!(count_unique_len_outputs(&[]), 0);
}

#[test]
fn test_decode_all_keeps_input_order() {
    let values: Vec<u64> = decode_all(&sample_records())
        .into_iter()
        .map(|r| r.expect("sample records should decode"))
        .collect();
    assert_eq!(
        values,
        vec![8394, 9781, 1197, 9361, 4873, 8418, 4548, 1625, 8717, 4315]
    );
}

#[test]
fn test_sum_outputs() {
    assert_eq!(sum_outputs(&sample_records()), Ok(61229));
    assert_eq!(sum_outputs(&[]), Ok(0));
}

#[test]
fn test_sum_outputs_reports_failing_record() {
    let mut records = sample_records();
    // Replace the 7 (three segments) with a second 1.
    let one = records[3].catalog[5];
    assert_eq!(one.len(), 2);
    let seven = records[3]
        .catalog
        .iter()
        .position(|p| p.len() == 3)
        .expect("record has a seven");
    records[3].catalog[seven] = one;
    match sum_outputs(&records) {
        Err((3, DecodeError::MalformedCatalog(_))) => (),
        other => panic!("expected record 3 to be rejected, got {:?}", other),
    }
}

#[test]
fn test_sum_outputs_reports_overflow() {
    let mut records: Vec<Record> = sample_records().into_iter().take(2).collect();
    for record in records.iter_mut() {
        let mapping =
            crate::decoder::build_mapping(&record.catalog).expect("sample records should decode");
        let nine = mapping.pattern_of(9).expect("9 is a digit");
        record.outputs = vec![nine; 19];
    }
    assert_eq!(decode_all(&records[..1]), vec![Ok(9_999_999_999_999_999_999)]);
    assert_eq!(
        sum_outputs(&records),
        Err((1, DecodeError::TotalOverflow(9_999_999_999_999_999_999)))
    );
}
