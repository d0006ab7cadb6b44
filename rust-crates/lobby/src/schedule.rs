use chrono::{
    DateTime,
    Duration,
    NaiveTime,
    Utc,
};
use std::fmt;

/// Daily draw schedule decoded from the game's encoded cron expression.
/// The platform only deploys daily schedules, so the last three fields
/// of the five-field expression must be wildcards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawSchedule {
    pub minute: u8,
    pub hour: u8,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduleError {
    pub expression: String,
    pub reason: &'static str,
}

impl fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid schedule '{}': {}", self.expression, self.reason)
    }
}

impl std::error::Error for ScheduleError {}

pub fn parse(expression: &str) -> Result<DrawSchedule, ScheduleError> {
    let err = |reason| ScheduleError {
        expression: expression.to_string(),
        reason,
    };
    let fields: Vec<&str> = expression.split_whitespace().collect();
    if fields.len() != 5 {
        return Err(err("expected five cron fields"));
    }
    let minute: u8 = fields[0]
        .parse()
        .map_err(|_| err("minute must be numeric"))?;
    if minute > 59 {
        return Err(err("minute out of range"));
    }
    let hour: u8 = fields[1].parse().map_err(|_| err("hour must be numeric"))?;
    if hour > 23 {
        return Err(err("hour out of range"));
    }
    if fields[2..].iter().any(|field| *field != "*") {
        return Err(err("only daily schedules are supported"));
    }
    Ok(DrawSchedule { minute, hour })
}

impl DrawSchedule {
    /// First draw time strictly after `after`.
    pub fn next_occurrence(&self, after: DateTime<Utc>) -> DateTime<Utc> {
        let draw_time =
            NaiveTime::from_hms_opt(u32::from(self.hour), u32::from(self.minute), 0)
                .expect("minute and hour are range-checked at parse time");
        let today = after.date_naive().and_time(draw_time).and_utc();
        if today > after {
            today
        } else {
            today + Duration::days(1)
        }
    }
}
