use chrono::NaiveDateTime;

pub fn format_date_time(date_time: &NaiveDateTime) -> (String, String) {
    let date = date_time.format("%Y-%m-%d").to_string();
    let time = date_time.format("%H:%M:%S").to_string();
    (date, time)
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};

    use super::*;

    #[test]
    fn test_format_date_time() {
        let date_time = NaiveDateTime::new(
            NaiveDate::from_ymd_opt(2017, 9, 10).unwrap(),
            NaiveTime::from_hms_milli_opt(10, 42, 32, 123).unwrap(),
        );
        let (date, time) = format_date_time(&date_time);
        assert_eq!(date, "2017-09-10");
        assert_eq!(time, "10:42:32");
    }
}
