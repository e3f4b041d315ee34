//! # Opening-Hours Overrides
//!
//! A connection carries an ordered set of schedule overrides. Resolution
//! for a calendar date follows a fixed specificity order, stated here
//! because it is easy to get backwards:
//!
//! 1. `Exceptional` — covers the date → fully replaces everything
//!    (holiday closures beat the regular week).
//! 2. `Special` — covers the date → replaces the base schedule.
//! 3. `Normal` — the base schedule.
//!
//! Within one kind there is never a legal overlap: two same-kind
//! overrides whose date intervals and weekday masks both intersect are
//! rejected at write time, not resolved by picking one.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─── Override Kind ───────────────────────────────────────────────────

/// The specificity class of an override. Variant order is precedence
/// order: `Normal < Special < Exceptional`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OverrideKind {
    /// The recurring base schedule.
    Normal,
    /// A seasonal or campaign schedule replacing the base for its dates.
    Special,
    /// A holiday or emergency schedule beating everything for its dates.
    Exceptional,
}

impl OverrideKind {
    /// All kinds, for exhaustive iteration in validation and tests.
    pub const ALL: [OverrideKind; 3] = [
        OverrideKind::Normal,
        OverrideKind::Special,
        OverrideKind::Exceptional,
    ];
}

impl std::fmt::Display for OverrideKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Normal => "NORMAL",
            Self::Special => "SPECIAL",
            Self::Exceptional => "EXCEPTIONAL",
        };
        f.write_str(s)
    }
}

// ─── Building Blocks ─────────────────────────────────────────────────

/// A within-day open interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSpan {
    /// Opening time.
    pub opens: NaiveTime,
    /// Closing time. Must be after `opens`.
    pub closes: NaiveTime,
}

/// An inclusive calendar-date interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateInterval {
    /// First covered date.
    pub start: NaiveDate,
    /// Last covered date. Must not precede `start`.
    pub end: NaiveDate,
}

impl DateInterval {
    /// Whether `date` falls inside the interval.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Whether two intervals share at least one date.
    pub fn overlaps(&self, other: &DateInterval) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

/// A weekday bitmask (bit 0 = Monday … bit 6 = Sunday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayOfWeekMask(u8);

impl DayOfWeekMask {
    /// Every day of the week.
    pub const ALL_DAYS: DayOfWeekMask = DayOfWeekMask(0b0111_1111);

    /// Monday through Friday.
    pub const WEEKDAYS: DayOfWeekMask = DayOfWeekMask(0b0001_1111);

    /// Build a mask from explicit weekdays.
    pub fn from_days(days: &[Weekday]) -> Self {
        let mut mask = 0u8;
        for day in days {
            mask |= 1 << day.num_days_from_monday();
        }
        Self(mask)
    }

    /// Whether the mask selects `day`.
    pub fn contains(&self, day: Weekday) -> bool {
        self.0 & (1 << day.num_days_from_monday()) != 0
    }

    /// Whether two masks share at least one day.
    pub fn intersects(&self, other: &DayOfWeekMask) -> bool {
        self.0 & other.0 != 0
    }

    /// Whether the mask selects no day at all.
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// The schedule an override imposes on a covered date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayHours {
    /// Closed for the whole day.
    Closed,
    /// Open during the listed spans.
    Open(Vec<TimeSpan>),
}

/// One schedule override attached to a connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpeningHoursOverride {
    /// Specificity class.
    pub kind: OverrideKind,
    /// Covered dates. `None` is only legal on `Normal` overrides and
    /// means open-ended.
    pub interval: Option<DateInterval>,
    /// Weekdays the override applies on.
    pub days: DayOfWeekMask,
    /// The imposed schedule.
    pub hours: DayHours,
}

impl OpeningHoursOverride {
    /// Whether this override governs `date`.
    pub fn applies_on(&self, date: NaiveDate) -> bool {
        let in_interval = match &self.interval {
            Some(interval) => interval.covers(date),
            None => true,
        };
        in_interval && self.days.contains(date.weekday())
    }

    /// Whether two overrides of the same kind could both claim a date.
    fn collides_with(&self, other: &OpeningHoursOverride) -> bool {
        if self.kind != other.kind || !self.days.intersects(&other.days) {
            return false;
        }
        match (&self.interval, &other.interval) {
            (Some(a), Some(b)) => a.overlaps(b),
            // An open-ended interval overlaps everything.
            _ => true,
        }
    }
}

// ─── Errors ──────────────────────────────────────────────────────────

/// Opening-hours validation failures. All rejected at write time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HoursError {
    /// `Special` and `Exceptional` overrides must say which dates they cover.
    #[error("{kind} override requires a date interval")]
    MissingInterval {
        /// The kind missing its interval.
        kind: OverrideKind,
    },

    /// Interval with start after end.
    #[error("date interval starts {start} after it ends {end}")]
    InvertedInterval {
        /// The start date.
        start: NaiveDate,
        /// The end date.
        end: NaiveDate,
    },

    /// Time span that opens at or after it closes.
    #[error("time span opens {opens} at or after it closes {closes}")]
    EmptyTimeSpan {
        /// The opening time.
        opens: NaiveTime,
        /// The closing time.
        closes: NaiveTime,
    },

    /// `Open` hours with no spans — use `Closed` instead.
    #[error("open hours must list at least one time span")]
    NoTimeSpans,

    /// Override that applies on no weekday.
    #[error("override weekday mask selects no days")]
    EmptyDayMask,

    /// Two same-kind overrides claim the same date.
    #[error("two {kind} overrides overlap on the same dates")]
    OverrideConflict {
        /// The conflicting kind.
        kind: OverrideKind,
    },
}

// ─── Validation & Resolution ─────────────────────────────────────────

/// Validate a full override set. Called on every connection write; a
/// conflict is never deferred to resolution time.
pub fn validate_overrides(overrides: &[OpeningHoursOverride]) -> Result<(), HoursError> {
    for item in overrides {
        if item.days.is_empty() {
            return Err(HoursError::EmptyDayMask);
        }
        match &item.interval {
            Some(interval) if interval.start > interval.end => {
                return Err(HoursError::InvertedInterval {
                    start: interval.start,
                    end: interval.end,
                });
            }
            None if item.kind != OverrideKind::Normal => {
                return Err(HoursError::MissingInterval { kind: item.kind });
            }
            _ => {}
        }
        if let DayHours::Open(spans) = &item.hours {
            if spans.is_empty() {
                return Err(HoursError::NoTimeSpans);
            }
            for span in spans {
                if span.opens >= span.closes {
                    return Err(HoursError::EmptyTimeSpan {
                        opens: span.opens,
                        closes: span.closes,
                    });
                }
            }
        }
    }
    for (i, a) in overrides.iter().enumerate() {
        for b in &overrides[i + 1..] {
            if a.collides_with(b) {
                return Err(HoursError::OverrideConflict { kind: a.kind });
            }
        }
    }
    Ok(())
}

/// The effective schedule for `date`: the most specific override that
/// covers it, or closed when nothing does.
///
/// Assumes the set passed [`validate_overrides`] — at most one override
/// per kind can cover any date, so `find` is unambiguous.
pub fn resolve_effective_hours(overrides: &[OpeningHoursOverride], date: NaiveDate) -> DayHours {
    for kind in [
        OverrideKind::Exceptional,
        OverrideKind::Special,
        OverrideKind::Normal,
    ] {
        if let Some(item) = overrides
            .iter()
            .find(|o| o.kind == kind && o.applies_on(date))
        {
            return item.hours.clone();
        }
    }
    DayHours::Closed
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn nine_to_five() -> DayHours {
        DayHours::Open(vec![TimeSpan {
            opens: t(9, 0),
            closes: t(17, 0),
        }])
    }

    fn base_schedule() -> OpeningHoursOverride {
        OpeningHoursOverride {
            kind: OverrideKind::Normal,
            interval: None,
            days: DayOfWeekMask::ALL_DAYS,
            hours: nine_to_five(),
        }
    }

    fn exceptional_closure(start: NaiveDate, end: NaiveDate) -> OpeningHoursOverride {
        OpeningHoursOverride {
            kind: OverrideKind::Exceptional,
            interval: Some(DateInterval { start, end }),
            days: DayOfWeekMask::ALL_DAYS,
            hours: DayHours::Closed,
        }
    }

    // ── Resolution precedence ────────────────────────────────────────

    #[test]
    fn test_exceptional_closure_beats_base_schedule() {
        let christmas_eve = d(2024, 12, 24);
        let overrides = vec![
            base_schedule(),
            exceptional_closure(christmas_eve, christmas_eve),
        ];
        validate_overrides(&overrides).unwrap();
        assert_eq!(
            resolve_effective_hours(&overrides, christmas_eve),
            DayHours::Closed
        );
        // The day after, the base schedule is back.
        assert_eq!(
            resolve_effective_hours(&overrides, d(2024, 12, 25)),
            nine_to_five()
        );
    }

    #[test]
    fn test_exceptional_beats_special() {
        let date = d(2025, 7, 1);
        let special = OpeningHoursOverride {
            kind: OverrideKind::Special,
            interval: Some(DateInterval {
                start: d(2025, 6, 1),
                end: d(2025, 8, 31),
            }),
            days: DayOfWeekMask::ALL_DAYS,
            hours: DayHours::Open(vec![TimeSpan {
                opens: t(10, 0),
                closes: t(14, 0),
            }]),
        };
        let overrides = vec![base_schedule(), special, exceptional_closure(date, date)];
        validate_overrides(&overrides).unwrap();
        assert_eq!(resolve_effective_hours(&overrides, date), DayHours::Closed);
    }

    #[test]
    fn test_special_replaces_base_for_covered_dates() {
        let summer_hours = DayHours::Open(vec![TimeSpan {
            opens: t(10, 0),
            closes: t(14, 0),
        }]);
        let special = OpeningHoursOverride {
            kind: OverrideKind::Special,
            interval: Some(DateInterval {
                start: d(2025, 6, 1),
                end: d(2025, 8, 31),
            }),
            days: DayOfWeekMask::ALL_DAYS,
            hours: summer_hours.clone(),
        };
        let overrides = vec![base_schedule(), special];
        validate_overrides(&overrides).unwrap();
        assert_eq!(resolve_effective_hours(&overrides, d(2025, 7, 15)), summer_hours);
        assert_eq!(resolve_effective_hours(&overrides, d(2025, 9, 1)), nine_to_five());
    }

    #[test]
    fn test_no_override_means_closed() {
        assert_eq!(resolve_effective_hours(&[], d(2025, 1, 1)), DayHours::Closed);
    }

    #[test]
    fn test_weekday_mask_limits_base_schedule() {
        let weekday_base = OpeningHoursOverride {
            days: DayOfWeekMask::WEEKDAYS,
            ..base_schedule()
        };
        let overrides = vec![weekday_base];
        validate_overrides(&overrides).unwrap();
        // 2025-03-07 is a Friday, 2025-03-08 a Saturday.
        assert_eq!(resolve_effective_hours(&overrides, d(2025, 3, 7)), nine_to_five());
        assert_eq!(
            resolve_effective_hours(&overrides, d(2025, 3, 8)),
            DayHours::Closed
        );
    }

    // ── Write-time validation ────────────────────────────────────────

    #[test]
    fn test_same_kind_overlap_rejected() {
        let overrides = vec![
            exceptional_closure(d(2025, 12, 24), d(2025, 12, 26)),
            exceptional_closure(d(2025, 12, 26), d(2025, 12, 31)),
        ];
        assert_eq!(
            validate_overrides(&overrides),
            Err(HoursError::OverrideConflict {
                kind: OverrideKind::Exceptional
            })
        );
    }

    #[test]
    fn test_same_kind_disjoint_dates_accepted() {
        let overrides = vec![
            exceptional_closure(d(2025, 12, 24), d(2025, 12, 26)),
            exceptional_closure(d(2026, 1, 1), d(2026, 1, 1)),
        ];
        validate_overrides(&overrides).unwrap();
    }

    #[test]
    fn test_same_kind_disjoint_weekdays_accepted() {
        let interval = DateInterval {
            start: d(2025, 1, 1),
            end: d(2025, 12, 31),
        };
        let weekday = OpeningHoursOverride {
            kind: OverrideKind::Special,
            interval: Some(interval),
            days: DayOfWeekMask::WEEKDAYS,
            hours: nine_to_five(),
        };
        let weekend = OpeningHoursOverride {
            kind: OverrideKind::Special,
            interval: Some(interval),
            days: DayOfWeekMask::from_days(&[Weekday::Sat, Weekday::Sun]),
            hours: DayHours::Open(vec![TimeSpan {
                opens: t(11, 0),
                closes: t(13, 0),
            }]),
        };
        validate_overrides(&[weekday, weekend]).unwrap();
    }

    #[test]
    fn test_two_open_ended_normals_conflict() {
        assert_eq!(
            validate_overrides(&[base_schedule(), base_schedule()]),
            Err(HoursError::OverrideConflict {
                kind: OverrideKind::Normal
            })
        );
    }

    #[test]
    fn test_special_without_interval_rejected() {
        let item = OpeningHoursOverride {
            kind: OverrideKind::Special,
            interval: None,
            days: DayOfWeekMask::ALL_DAYS,
            hours: nine_to_five(),
        };
        assert_eq!(
            validate_overrides(&[item]),
            Err(HoursError::MissingInterval {
                kind: OverrideKind::Special
            })
        );
    }

    #[test]
    fn test_inverted_interval_rejected() {
        let item = exceptional_closure(d(2025, 12, 26), d(2025, 12, 24));
        assert!(matches!(
            validate_overrides(&[item]),
            Err(HoursError::InvertedInterval { .. })
        ));
    }

    #[test]
    fn test_empty_time_span_rejected() {
        let item = OpeningHoursOverride {
            hours: DayHours::Open(vec![TimeSpan {
                opens: t(17, 0),
                closes: t(9, 0),
            }]),
            ..base_schedule()
        };
        assert!(matches!(
            validate_overrides(&[item]),
            Err(HoursError::EmptyTimeSpan { .. })
        ));
    }

    #[test]
    fn test_open_with_no_spans_rejected() {
        let item = OpeningHoursOverride {
            hours: DayHours::Open(Vec::new()),
            ..base_schedule()
        };
        assert_eq!(validate_overrides(&[item]), Err(HoursError::NoTimeSpans));
    }

    #[test]
    fn test_empty_day_mask_rejected() {
        let item = OpeningHoursOverride {
            days: DayOfWeekMask::from_days(&[]),
            ..base_schedule()
        };
        assert_eq!(validate_overrides(&[item]), Err(HoursError::EmptyDayMask));
    }

    // ── Mask mechanics ───────────────────────────────────────────────

    #[test]
    fn test_mask_contains_and_intersects() {
        let weekdays = DayOfWeekMask::WEEKDAYS;
        assert!(weekdays.contains(Weekday::Mon));
        assert!(!weekdays.contains(Weekday::Sun));
        let weekend = DayOfWeekMask::from_days(&[Weekday::Sat, Weekday::Sun]);
        assert!(!weekdays.intersects(&weekend));
        assert!(DayOfWeekMask::ALL_DAYS.intersects(&weekend));
    }
}
