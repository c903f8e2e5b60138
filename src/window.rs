use crate::model::TimeWindow;
use chrono::{DateTime, Datelike, Days, Local, NaiveDate, NaiveTime, TimeZone};

pub const ONE_HOUR_SEC: i64 = 60 * 60;
pub const ONE_DAY_SEC: i64 = ONE_HOUR_SEC * 24;
pub const ONE_WEEK_SEC: i64 = ONE_DAY_SEC * 7;

/// Named commit query windows, anchored to local midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Window {
    Today,
    Yesterday,
    #[value(alias = "this-week")]
    Week,
}

impl Window {
    pub fn bounds(self) -> TimeWindow {
        self.bounds_at(&Local::now())
    }

    /// Window boundaries relative to `now`, in `now`'s time zone.
    ///
    /// `end` is `start` plus a fixed 86400s/604800s, so windows that span a
    /// DST transition are off by the shifted hour.
    pub fn bounds_at<Tz: TimeZone>(self, now: &DateTime<Tz>) -> TimeWindow {
        let tz = now.timezone();
        let today = now.date_naive();
        match self {
            Window::Today => day_window(&tz, today),
            Window::Yesterday => day_window(&tz, today.pred_opt().unwrap_or(today)),
            Window::Week => {
                let back = Days::new(u64::from(today.weekday().num_days_from_sunday()));
                let start = start_of_day(&tz, today.checked_sub_days(back).unwrap_or(today));
                TimeWindow {
                    start,
                    end: start + ONE_WEEK_SEC,
                }
            }
        }
    }
}

fn day_window<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> TimeWindow {
    let start = start_of_day(tz, date);
    TimeWindow {
        start,
        end: start + ONE_DAY_SEC,
    }
}

/// Epoch seconds of the first instant of `date` in `tz`.
fn start_of_day<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> i64 {
    let midnight = date.and_time(NaiveTime::MIN);
    // zones that skip midnight on DST day start an hour later
    tz.from_local_datetime(&midnight)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(midnight + chrono::Duration::hours(1))).earliest())
        .map(|dt| dt.timestamp())
        .unwrap_or_else(|| midnight.and_utc().timestamp())
}
