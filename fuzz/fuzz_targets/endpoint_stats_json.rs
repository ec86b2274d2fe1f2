#![no_main]

use libfuzzer_sys::fuzz_target;
use runcompare::model::EndpointAggregate;
use runcompare::regression::compare_endpoints;

fuzz_target!(|data: &[u8]| {
    // Any record set that parses must compare without panicking
    if let Ok(records) = serde_json::from_slice::<Vec<EndpointAggregate>>(data) {
        let (baseline, candidate) = records.split_at(records.len() / 2);
        let _ = compare_endpoints(baseline, candidate);
    }
});
