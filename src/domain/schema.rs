//! Column names of the ticket-purchase CSV.
//!
//! The loader requires every name in `REQUIRED_COLUMNS`; the normalizer uses the
//! date/time groups below to decide how each column is converted.

pub const DATE_OF_PURCHASE: &str = "Date of Purchase";
pub const TIME_OF_PURCHASE: &str = "Time of Purchase";
pub const PURCHASE_TYPE: &str = "Purchase Type";
pub const PAYMENT_METHOD: &str = "Payment Method";
pub const RAILCARD: &str = "Railcard";
pub const TICKET_CLASS: &str = "Ticket Class";
pub const TICKET_TYPE: &str = "Ticket Type";
pub const PRICE: &str = "Price";
pub const DEPARTURE_STATION: &str = "Departure Station";
pub const ARRIVAL_DESTINATION: &str = "Arrival Destination";
pub const DATE_OF_JOURNEY: &str = "Date of Journey";
pub const DEPARTURE_TIME: &str = "Departure Time";
pub const ARRIVAL_TIME: &str = "Arrival Time";
pub const ACTUAL_ARRIVAL_TIME: &str = "Actual Arrival Time";
pub const JOURNEY_STATUS: &str = "Journey Status";
pub const REASON_FOR_DELAY: &str = "Reason for Delay";
pub const REFUND_REQUEST: &str = "Refund Request";

/// Journey status value selecting delayed journeys.
pub const STATUS_DELAYED: &str = "Delayed";

pub const REQUIRED_COLUMNS: [&str; 17] = [
    DATE_OF_PURCHASE,
    TIME_OF_PURCHASE,
    PURCHASE_TYPE,
    PAYMENT_METHOD,
    RAILCARD,
    TICKET_CLASS,
    TICKET_TYPE,
    PRICE,
    DEPARTURE_STATION,
    ARRIVAL_DESTINATION,
    DATE_OF_JOURNEY,
    DEPARTURE_TIME,
    ARRIVAL_TIME,
    ACTUAL_ARRIVAL_TIME,
    JOURNEY_STATUS,
    REASON_FOR_DELAY,
    REFUND_REQUEST,
];

pub const DATE_COLUMNS: [&str; 2] = [DATE_OF_PURCHASE, DATE_OF_JOURNEY];

/// Time columns where any unparseable value aborts the run.
pub const STRICT_TIME_COLUMNS: [&str; 3] = [TIME_OF_PURCHASE, DEPARTURE_TIME, ARRIVAL_TIME];

/// Time columns where unparseable values become null.
pub const LENIENT_TIME_COLUMNS: [&str; 1] = [ACTUAL_ARRIVAL_TIME];

/// Columns summarized with a frequency table in the purchase-behaviour section.
pub const PURCHASE_BEHAVIOUR_COLUMNS: [&str; 5] =
    [PURCHASE_TYPE, PAYMENT_METHOD, RAILCARD, TICKET_CLASS, TICKET_TYPE];

/// Resolve a header to its canonical expected spelling, if it is one.
pub fn canonical_name(header: &str) -> Option<&'static str> {
    REQUIRED_COLUMNS
        .iter()
        .copied()
        .find(|name| name.eq_ignore_ascii_case(header))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_name_ignores_case() {
        assert_eq!(canonical_name("journey status"), Some(JOURNEY_STATUS));
        assert_eq!(canonical_name("PRICE"), Some(PRICE));
        assert_eq!(canonical_name("Transaction ID"), None);
    }

    #[test]
    fn column_groups_are_part_of_required_set() {
        for name in DATE_COLUMNS
            .iter()
            .chain(STRICT_TIME_COLUMNS.iter())
            .chain(LENIENT_TIME_COLUMNS.iter())
            .chain(PURCHASE_BEHAVIOUR_COLUMNS.iter())
        {
            assert!(REQUIRED_COLUMNS.contains(name), "{name} is not required");
        }
    }
}
