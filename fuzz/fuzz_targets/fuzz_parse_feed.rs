#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Decoding must never panic, whatever the document looks like
    if let Ok(observations) = borsihind::feed::parse_day_ahead(text, "EE") {
        let _ = borsihind::feed::merge_observations([observations]);
    }
});
