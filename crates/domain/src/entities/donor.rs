use super::{BloodType, Gender, PhoneNumber};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Donor profile, keyed by the owning user's id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donor {
    pub user_id: i32,
    pub blood_type: BloodType,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    pub phone: PhoneNumber,
}

impl Donor {
    pub fn age_on(&self, today: NaiveDate) -> i32 {
        age_on(self.date_of_birth, today)
    }
}

/// Whole years elapsed between `date_of_birth` and `today`.
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let had_birthday = (today.month(), today.day()) >= (date_of_birth.month(), date_of_birth.day());
    today.year() - date_of_birth.year() - if had_birthday { 0 } else { 1 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn age_counts_completed_years() {
        assert_eq!(age_on(date(2000, 6, 15), date(2024, 6, 14)), 23);
        assert_eq!(age_on(date(2000, 6, 15), date(2024, 6, 15)), 24);
        assert_eq!(age_on(date(2000, 6, 15), date(2000, 6, 15)), 0);
    }

    #[test]
    fn leap_day_birthdays() {
        assert_eq!(age_on(date(2000, 2, 29), date(2023, 2, 28)), 22);
        assert_eq!(age_on(date(2000, 2, 29), date(2023, 3, 1)), 23);
    }
}
