//! Property tests for range-notation parsing.

use gridlink_core::{parse_cell, parse_range};
use proptest::prelude::*;

/// Strategy for a well-formed cell reference: 1-3 uppercase letters
/// followed by a 1-based row number.
fn cell_ref() -> impl Strategy<Value = (String, usize)> {
    ("[A-Z]{1,3}", 1usize..100_000).prop_map(|(label, row)| (format!("{}{}", label, row), row))
}

proptest! {
    #[test]
    fn valid_ranges_parse_with_zero_based_rows(
        (start, start_row) in cell_ref(),
        (end, end_row) in cell_ref(),
    ) {
        let range = parse_range(&format!("{}:{}", start, end)).unwrap();
        prop_assert_eq!(range.start_row, start_row - 1);
        prop_assert_eq!(range.end_row, end_row - 1);
    }

    #[test]
    fn range_matches_its_cell_parses((start, _) in cell_ref(), (end, _) in cell_ref()) {
        let range = parse_range(&format!("{}:{}", start, end)).unwrap();
        let s = parse_cell(&start).unwrap();
        let e = parse_cell(&end).unwrap();
        prop_assert_eq!((range.start_row, range.start_col), (s.row, s.col));
        prop_assert_eq!((range.end_row, range.end_col), (e.row, e.col));
    }

    #[test]
    fn colonless_input_never_parses(input in "[A-Z0-9]{1,8}") {
        prop_assert!(parse_range(&input).is_err());
    }
}
