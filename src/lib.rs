//! Decoding of seven-segment displays whose segment wiring has been
//! scrambled.
//!
//! Each display shows all ten digits once (its catalog) using an
//! unknown permutation of the segment letters `a`-`g`.  From the
//! catalog we deduce which pattern is which digit, and then read the
//! display's output digits as a number.

pub mod batch;
pub mod decoder;
pub mod record;
pub mod segments;

pub use batch::{count_unique_len_outputs, decode_all, sum_outputs};
pub use decoder::{build_mapping, decode, decode_outputs, DecodeError, DigitMapping};
pub use record::{parse_records, Record};
pub use segments::{PatternError, Segments};
