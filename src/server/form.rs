//! Booking form field parsing
//!
//! Fields are read one by one so a bad value is reported by name while
//! everything else the user typed is kept for the re-rendered form.

use std::collections::HashMap;
use std::str::FromStr;

use crate::booking::{fields, BookingRecord};

/// A form submission read into a booking, plus the fields that failed
pub struct ParsedForm {
    pub record: BookingRecord,
    pub errors: Vec<String>,
}

impl ParsedForm {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_message(&self) -> String {
        format!("Invalid form submission: {}", self.errors.join("; "))
    }
}

struct FieldReader<'a> {
    values: &'a HashMap<String, String>,
    errors: Vec<String>,
}

impl FieldReader<'_> {
    fn raw(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(|v| v.trim()).filter(|v| !v.is_empty())
    }

    fn number<T: FromStr>(&mut self, name: &str, fallback: T, kind: &str) -> T {
        match self.raw(name) {
            Some(text) => match text.parse() {
                Ok(value) => value,
                Err(_) => {
                    self.errors.push(format!("{}: '{}' is not {}", name, text, kind));
                    fallback
                }
            },
            None => {
                self.errors.push(format!("{}: value is required", name));
                fallback
            }
        }
    }

    fn count(&mut self, name: &str, fallback: u32) -> u32 {
        self.number(name, fallback, "a whole number")
    }

    fn optional_count(&mut self, name: &str) -> Option<u32> {
        match self.raw(name) {
            Some(text) => match text.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    self.errors.push(format!("{}: '{}' is not a whole number", name, text));
                    None
                }
            },
            None => None,
        }
    }

    fn text(&mut self, name: &str, fallback: &str) -> String {
        match self.raw(name) {
            Some(text) => text.to_string(),
            None => {
                self.errors.push(format!("{}: value is required", name));
                fallback.to_string()
            }
        }
    }
}

/// Read every booking field, falling back to the default booking's value
/// for fields that are missing or malformed
pub fn parse_booking_form(values: &HashMap<String, String>) -> ParsedForm {
    let defaults = BookingRecord::default();
    let mut reader = FieldReader {
        values,
        errors: Vec::new(),
    };

    let record = BookingRecord {
        lead_time: reader.count(fields::LEAD_TIME, defaults.lead_time),
        no_of_adults: reader.count(fields::NO_OF_ADULTS, defaults.no_of_adults),
        no_of_children: reader.count(fields::NO_OF_CHILDREN, defaults.no_of_children),
        no_of_weekend_nights: reader.count(fields::NO_OF_WEEKEND_NIGHTS, defaults.no_of_weekend_nights),
        no_of_week_nights: reader.count(fields::NO_OF_WEEK_NIGHTS, defaults.no_of_week_nights),
        type_of_meal_plan: reader.text(fields::TYPE_OF_MEAL_PLAN, &defaults.type_of_meal_plan),
        room_type_reserved: reader.text(fields::ROOM_TYPE_RESERVED, &defaults.room_type_reserved),
        market_segment_type: reader.text(fields::MARKET_SEGMENT_TYPE, &defaults.market_segment_type),
        required_car_parking_space: reader.number(
            fields::REQUIRED_CAR_PARKING_SPACE,
            defaults.required_car_parking_space,
            "0 or 1",
        ),
        repeated_guest: reader.number(fields::REPEATED_GUEST, defaults.repeated_guest, "0 or 1"),
        no_of_previous_cancellations: reader.count(
            fields::NO_OF_PREVIOUS_CANCELLATIONS,
            defaults.no_of_previous_cancellations,
        ),
        no_of_previous_bookings_not_canceled: reader.count(
            fields::NO_OF_PREVIOUS_BOOKINGS_NOT_CANCELED,
            defaults.no_of_previous_bookings_not_canceled,
        ),
        avg_price_per_room: reader.number(fields::AVG_PRICE_PER_ROOM, defaults.avg_price_per_room, "a number"),
        no_of_special_requests: reader.count(fields::NO_OF_SPECIAL_REQUESTS, defaults.no_of_special_requests),
        arrival_year: reader.optional_count(fields::ARRIVAL_YEAR),
        arrival_month: reader.optional_count(fields::ARRIVAL_MONTH),
        arrival_date: reader.optional_count(fields::ARRIVAL_DATE),
    };

    ParsedForm {
        record,
        errors: reader.errors,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        let mut values: HashMap<String, String> = BookingRecord::default()
            .entries()
            .into_iter()
            .map(|(name, value)| (name.to_string(), value))
            .collect();
        for (name, value) in pairs {
            values.insert(name.to_string(), value.to_string());
        }
        values
    }

    #[test]
    fn test_complete_form_parses() {
        let parsed = parse_booking_form(&form(&[("lead_time", "45"), ("market_segment_type", "Corporate")]));
        assert!(parsed.is_valid());
        assert_eq!(parsed.record.lead_time, 45);
        assert_eq!(parsed.record.market_segment_type, "Corporate");
        assert_eq!(parsed.record.arrival_month, None);
    }

    #[test]
    fn test_bad_field_named_and_others_kept() {
        let parsed = parse_booking_form(&form(&[("lead_time", "soon"), ("no_of_special_requests", "3")]));
        assert!(!parsed.is_valid());
        assert_eq!(parsed.errors.len(), 1);
        assert!(parsed.error_message().contains("lead_time"));
        assert!(parsed.error_message().contains("soon"));
        assert_eq!(parsed.record.lead_time, 0);
        assert_eq!(parsed.record.no_of_special_requests, 3);
    }

    #[test]
    fn test_missing_field_reported() {
        let mut values = form(&[]);
        values.remove("room_type_reserved");
        let parsed = parse_booking_form(&values);
        assert!(parsed.error_message().contains("room_type_reserved: value is required"));
        assert_eq!(parsed.record.room_type_reserved, "Room_Type 1");
    }

    #[test]
    fn test_optional_arrival_fields() {
        let parsed = parse_booking_form(&form(&[("arrival_month", "10"), ("arrival_date", "")]));
        assert!(parsed.is_valid());
        assert_eq!(parsed.record.arrival_month, Some(10));
        assert_eq!(parsed.record.arrival_date, None);
    }
}
