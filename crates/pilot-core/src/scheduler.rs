//! Noon-daily publication cadence.
//!
//! Every new batch continues a chain of consecutive noons that starts after
//! the latest approved post (or after "now" when nothing is approved yet).

use chrono::{DateTime, FixedOffset, Local, Offset, TimeZone, Utc};

/// The wall clock whose noon is used for scheduling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WallClock {
    /// The host's local time zone.
    #[default]
    Local,
    /// A fixed UTC offset.
    Fixed(FixedOffset),
}

impl WallClock {
    pub fn utc() -> Self {
        WallClock::Fixed(Utc.fix())
    }

    pub fn next_noon(&self, t: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            WallClock::Local => next_noon(t, &Local),
            WallClock::Fixed(offset) => next_noon(t, offset),
        }
    }

    /// Timestamps for `count` posts, one per day after `anchor`.
    pub fn schedule(&self, anchor: DateTime<Utc>, count: usize) -> Vec<DateTime<Utc>> {
        let mut cursor = anchor;
        (0..count)
            .map(|_| {
                cursor = self.next_noon(cursor);
                cursor
            })
            .collect()
    }
}

/// Noon on the calendar day after `t`, in the wall-clock time of `tz`.
pub fn next_noon<Tz: TimeZone>(t: DateTime<Utc>, tz: &Tz) -> DateTime<Utc> {
    let today = t.with_timezone(tz).date_naive();
    let tomorrow = today.succ_opt().unwrap_or(today);
    let Some(noon) = tomorrow.and_hms_milli_opt(12, 0, 0, 0) else {
        return t;
    };

    tz.from_local_datetime(&noon)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        // Noon inside a DST gap: treat the wall time as UTC rather than fail.
        .unwrap_or_else(|| Utc.from_utc_datetime(&noon))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn test_next_noon_is_always_the_following_day() {
        let clock = WallClock::utc();
        // Morning, exactly noon and late evening all roll to the next day.
        assert_eq!(clock.next_noon(utc(2026, 3, 1, 8, 0)), utc(2026, 3, 2, 12, 0));
        assert_eq!(clock.next_noon(utc(2026, 3, 1, 12, 0)), utc(2026, 3, 2, 12, 0));
        assert_eq!(clock.next_noon(utc(2026, 3, 1, 23, 59)), utc(2026, 3, 2, 12, 0));
    }

    #[test]
    fn test_next_noon_crosses_month_and_year() {
        let clock = WallClock::utc();
        assert_eq!(clock.next_noon(utc(2026, 1, 31, 9, 0)), utc(2026, 2, 1, 12, 0));
        assert_eq!(clock.next_noon(utc(2026, 12, 31, 9, 0)), utc(2027, 1, 1, 12, 0));
    }

    #[test]
    fn test_noon_uses_wall_clock_date_of_offset() {
        // 23:00 UTC on the 1st is already the 2nd in UTC+2.
        let plus_two = WallClock::Fixed(FixedOffset::east_opt(2 * 3600).unwrap());
        let scheduled = plus_two.next_noon(utc(2026, 5, 1, 23, 0));
        assert_eq!(scheduled, utc(2026, 5, 3, 10, 0));
    }

    #[test]
    fn test_schedule_chains_consecutive_noons() {
        let clock = WallClock::utc();
        let anchor = utc(2026, 6, 10, 15, 30);
        let slots = clock.schedule(anchor, 4);

        assert_eq!(slots.len(), 4);
        assert_eq!(slots[0], utc(2026, 6, 11, 12, 0));
        for (i, slot) in slots.iter().enumerate() {
            assert_eq!(*slot, slots[0] + Duration::days(i as i64));
        }
    }

    #[test]
    fn test_empty_batch_gets_no_slots() {
        assert!(WallClock::utc().schedule(Utc::now(), 0).is_empty());
    }
}
