pub trait TimeSource {
    // Return an ISO timestamp
    fn current_time(&self) -> String;
}

#[derive(Clone)]
pub struct SystemTime {}

impl TimeSource for SystemTime {
    fn current_time(&self) -> String {
        let time = time::OffsetDateTime::now_utc();

        // Rfc3339 only fails on years outside 0..=9999
        time.format(&time::format_description::well_known::Rfc3339)
            .unwrap_or_else(|_| time.unix_timestamp().to_string())
    }
}
