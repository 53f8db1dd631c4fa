/// Sentinel recorded for a bill field whose markup could not be located.
/// Extraction is best-effort: a missing field never aborts a scrape.
pub const NOT_FOUND_SENTINEL: &str = "Not found";
