//! Wire formats for dates (`dd/MM/yyyy`) and times (`HH:mm:ss`).

use chrono::{NaiveDate, NaiveTime};

pub const DATE_FORMAT: &str = "%d/%m/%Y";
pub const TIME_FORMAT: &str = "%H:%M:%S";

pub fn parse_date(value: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
}

pub fn parse_time(value: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(value.trim(), TIME_FORMAT)
}

pub fn format_date(date: &NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn format_time(time: &NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

pub mod date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_date(date))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_date(&raw)
            .map_err(|e| serde::de::Error::custom(format!("Text '{}' could not be parsed: {}", raw, e)))
    }
}

pub mod time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_time(time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_time(&raw)
            .map_err(|e| serde::de::Error::custom(format!("Text '{}' could not be parsed: {}", raw, e)))
    }
}

pub mod option_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error> {
        match date {
            Some(d) => serializer.serialize_str(&super::format_date(d)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveDate>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => super::parse_date(&raw)
                .map(Some)
                .map_err(|e| serde::de::Error::custom(format!("Text '{}' could not be parsed: {}", raw, e))),
            None => Ok(None),
        }
    }
}

pub mod option_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error> {
        match time {
            Some(t) => serializer.serialize_str(&super::format_time(t)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<NaiveTime>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => super::parse_time(&raw)
                .map(Some)
                .map_err(|e| serde::de::Error::custom(format!("Text '{}' could not be parsed: {}", raw, e))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_day_first_dates() {
        let date = parse_date("25/01/1999").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(1999, 1, 25).unwrap());
        assert_eq!(format_date(&date), "25/01/1999");
    }

    #[test]
    fn test_rejects_iso_dates() {
        assert!(parse_date("1999-01-25").is_err());
        assert!(parse_date("32/01/1999").is_err());
    }

    #[test]
    fn test_time_is_24_hour() {
        let time = parse_time("15:40:00").unwrap();
        assert_eq!(time, NaiveTime::from_hms_opt(15, 40, 0).unwrap());
        assert_eq!(format_time(&time), "15:40:00");
    }
}
