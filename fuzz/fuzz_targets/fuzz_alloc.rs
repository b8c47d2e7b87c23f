#![no_main]
use chrono::{Duration, TimeZone, Utc};
use libfuzzer_sys::{
    arbitrary::{Arbitrary, Unstructured},
    fuzz_target,
};
use timeline_rs::{ErrorKind, Range, Timeline};

#[derive(Debug, Arbitrary)]
struct AllocOp {
    /// Window start, minutes from the base instant
    offset: i16,
    /// Window length in minutes
    len: u16,
    /// Requested seconds
    need: u32,
    fragments: bool,
}

// Random allocation sequences must never break the block sequence
fuzz_target!(|input: &[u8]| {
    let mut u = Unstructured::new(input);

    let spare: u8 = match u.arbitrary() {
        Ok(s) => s,
        Err(_) => return,
    };
    let ops: Vec<AllocOp> = match u.arbitrary() {
        Ok(ops) => ops,
        Err(_) => return,
    };

    let mut tl = match Timeline::with_spare(Duration::minutes(spare.max(1) as i64)) {
        Ok(tl) => tl,
        Err(_) => return,
    };
    let base = Utc.with_ymd_and_hms(2014, 2, 11, 0, 0, 0).unwrap();

    for op in ops.iter().take(64) {
        let start = base + Duration::minutes(op.offset as i64);
        let range = match Range::new(start, start + Duration::minutes(op.len as i64)) {
            Ok(r) => r,
            Err(_) => return,
        };
        let need = Duration::seconds(op.need as i64);

        let result = if op.fragments {
            tl.alloc_fragments(range, need).map(|_| ())
        } else {
            tl.alloc(range, need).map(|_| ())
        };

        if let Err(e) = result {
            // zero-length requests are the only caller mistake we generate
            assert!(
                e.kind() == ErrorKind::Busy || (op.need == 0 && e.kind() == ErrorKind::Precondition),
                "unexpected error: {}",
                e
            );
        }
        tl.validate().unwrap();
    }
});
