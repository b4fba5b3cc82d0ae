#![no_main]

use libfuzzer_sys::fuzz_target;
use tracbacks_core::scan::redact_all;
use tracbacks_core::{MAGIC_MARKER, Scanner, TicketId};

fuzz_target!(|data: &[u8]| {
    let Ok(comment) = std::str::from_utf8(data) else {
        return;
    };

    let redacted = redact_all(comment);
    assert_eq!(redacted.len(), comment.len());

    let result = Scanner::default().scan(TicketId(1), comment);
    assert!(!result.references.contains(&TicketId(1)));
    for pending in &result.trackbacks {
        assert!(pending.message.as_str().starts_with(MAGIC_MARKER));
    }
});
