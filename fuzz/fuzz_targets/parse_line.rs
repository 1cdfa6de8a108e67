//! Fuzz the relation parser and the consistency engine.
//!
//! Arbitrary text must either fail to parse or check cleanly; no input may
//! panic, and every relation endpoint must land in a group.

#![no_main]

use ineqcheck_core::{ParseOptions, check, parse_str};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    for ascii_operators in [true, false] {
        let options = ParseOptions {
            ascii_operators,
            comments: true,
        };
        let Ok(relations) = parse_str(input, &options) else {
            continue;
        };

        let report = check(&relations).expect("parsed relations always check");
        assert_eq!(report.consistent, report.violated.is_empty());
        for rel in &relations {
            assert!(report.group_of(&rel.left).is_some());
            assert!(report.group_of(&rel.right).is_some());
        }
        for grouped in &report.grouped {
            assert_ne!(grouped.left, grouped.right);
        }
    }
});
