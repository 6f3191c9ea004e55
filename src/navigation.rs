use chrono::NaiveDate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Back,
    Forward,
}

/// Shift `date` by one calendar day. Dates at the edge of chrono's range
/// stay put.
pub fn step_day(date: NaiveDate, step: Step) -> NaiveDate {
    let next = match step {
        Step::Back => date.pred_opt(),
        Step::Forward => date.succ_opt(),
    };
    next.unwrap_or(date)
}

/// Replace `current` with `explicit`, or `None` if nothing would change.
pub fn set_date(current: NaiveDate, explicit: NaiveDate) -> Option<NaiveDate> {
    (current != explicit).then_some(explicit)
}

/// The date whose timings are on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectedDate(NaiveDate);

impl SelectedDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn get(&self) -> NaiveDate {
        self.0
    }

    /// Returns whether the date moved.
    pub fn step(&mut self, step: Step) -> bool {
        let next = step_day(self.0, step);
        let changed = next != self.0;
        self.0 = next;
        changed
    }

    /// Returns whether the date moved.
    pub fn set(&mut self, explicit: NaiveDate) -> bool {
        match set_date(self.0, explicit) {
            Some(date) => {
                self.0 = date;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn rolls_over_month_end() {
        let jan31 = ymd(2024, 1, 31);
        let feb1 = step_day(jan31, Step::Forward);
        assert_eq!(feb1, ymd(2024, 2, 1));
        assert_eq!(step_day(feb1, Step::Back), jan31);
    }

    #[test]
    fn rolls_over_year_end() {
        let dec31 = ymd(2024, 12, 31);
        let jan1 = step_day(dec31, Step::Forward);
        assert_eq!(jan1, ymd(2025, 1, 1));
        assert_eq!(step_day(jan1, Step::Back), dec31);
    }

    #[test]
    fn handles_leap_day() {
        assert_eq!(step_day(ymd(2024, 2, 28), Step::Forward), ymd(2024, 2, 29));
        assert_eq!(step_day(ymd(2023, 2, 28), Step::Forward), ymd(2023, 3, 1));
        assert_eq!(step_day(ymd(2024, 3, 1), Step::Back), ymd(2024, 2, 29));
    }

    #[test]
    fn stays_put_at_range_edges() {
        assert_eq!(step_day(NaiveDate::MAX, Step::Forward), NaiveDate::MAX);
        assert_eq!(step_day(NaiveDate::MIN, Step::Back), NaiveDate::MIN);
    }

    #[test]
    fn same_date_is_not_a_change() {
        let today = ymd(2024, 3, 15);
        assert_eq!(set_date(today, today), None);
        assert_eq!(set_date(today, ymd(2024, 4, 1)), Some(ymd(2024, 4, 1)));

        let mut selected = SelectedDate::new(today);
        assert!(!selected.set(today));
        assert!(selected.set(ymd(2020, 1, 1)));
        assert_eq!(selected.get(), ymd(2020, 1, 1));
        assert!(selected.step(Step::Back));
        assert_eq!(selected.get(), ymd(2019, 12, 31));
    }

    proptest! {
        #[test]
        fn forward_then_back_round_trips(days in 0i32..200_000) {
            let start = ymd(1900, 1, 1) + chrono::Duration::days(days as i64);
            let there = step_day(start, Step::Forward);
            prop_assert_ne!(there, start);
            prop_assert_eq!(step_day(there, Step::Back), start);
        }
    }
}
