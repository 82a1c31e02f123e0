// SPDX-License-Identifier: Apache-2.0
// SPDX-FileCopyrightText: 2026 Safe Intake Contributors

#![no_main]

use libfuzzer_sys::fuzz_target;
use safe_intake_core::{MAX_NAME_LEN, validate_name};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data)
        && let Ok(name) = validate_name(s)
    {
        let name = name.as_str();
        assert!(!name.is_empty());
        assert!(name.chars().count() <= MAX_NAME_LEN);
        assert_eq!(name, name.trim_matches(|c: char| c <= ' '));
        // [:space:] also admits vertical tab, which is_ascii_whitespace does not
        assert!(name.chars().all(|c| {
            c.is_ascii_alphabetic() || c.is_ascii_whitespace() || matches!(c, '\x0B' | '-' | '\'')
        }));
    }
});
