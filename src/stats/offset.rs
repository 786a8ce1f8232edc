use chrono::{DateTime, Datelike, Days, FixedOffset, Local, NaiveDate, TimeZone, Weekday};

/// Fixed frame of reference for bucketing: "now" plus the window length.
#[derive(Debug, Clone, Copy)]
pub struct Calendar {
    now: DateTime<FixedOffset>,
    window_days: u32,
}

impl Calendar {
    pub fn new(now: DateTime<FixedOffset>, window_days: u32) -> Self {
        Self { now, window_days }
    }

    /// Calendar anchored at the local wall clock.
    pub fn local(window_days: u32) -> Self {
        Self::new(Local::now().fixed_offset(), window_days)
    }

    pub fn now(&self) -> DateTime<FixedOffset> {
        self.now
    }

    pub fn window_days(&self) -> u32 {
        self.window_days
    }

    /// Whole calendar days from `date` up to today, both taken at midnight in
    /// `date`'s own offset. `None` once the count passes the window.
    pub fn days_since<Tz: TimeZone>(&self, date: &DateTime<Tz>) -> Option<u32> {
        let mut day = date.date_naive();
        let today = self.now.with_timezone(&date.timezone()).date_naive();

        let mut days = 0u32;
        while day < today {
            day = day.succ_opt()?;
            days += 1;
            if days > self.window_days {
                return None;
            }
        }
        Some(days)
    }

    /// Shift that keeps today's cell on the same grid row whatever the weekday.
    pub fn alignment_offset(&self) -> u32 {
        alignment_offset_for(self.now.weekday())
    }

    /// Histogram key for a commit timestamp, or `None` outside the window.
    pub fn bucket<Tz: TimeZone>(&self, date: &DateTime<Tz>) -> Option<usize> {
        self.days_since(date)
            .map(|days| (days + self.alignment_offset()) as usize)
    }

    /// Midnight of the current day.
    pub fn start_of_today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    /// First day covered by the window, clamped to the earliest representable date.
    pub fn window_start(&self) -> NaiveDate {
        self.start_of_today()
            .checked_sub_days(Days::new(u64::from(self.window_days)))
            .unwrap_or(NaiveDate::MIN)
    }
}

pub fn alignment_offset_for(weekday: Weekday) -> u32 {
    match weekday {
        Weekday::Sun => 7,
        Weekday::Mon => 6,
        Weekday::Tue => 5,
        Weekday::Wed => 4,
        Weekday::Thu => 3,
        Weekday::Fri => 2,
        Weekday::Sat => 1,
    }
}
