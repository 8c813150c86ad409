#![no_main]
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;
use regicide::chess::position::Position;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(position) = Position::try_from(input) else {
        return;
    };
    // The export drops the rights and the counters: importing it back has to
    // give the same board.
    let exported = position.to_string();
    let reimported = Position::try_from(exported.as_str())
        .expect("exported positions should be accepted back");
    assert_eq!(reimported.to_string(), exported);
    let _ = format!("{position:?}");
});
