use crate::state::{
    GameDraft,
    WizardStep,
};
use lobby::schedule::{
    self,
    ScheduleError,
};
use networks::GameBounds;
use std::fmt;

/// A step guard failed. Reported inline to the user; never corrupts the
/// draft or moves the step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValidationError {
    NotInitialized,
    SubmissionPending,
    StepMismatch {
        current: WizardStep,
    },
    NameLength {
        len: usize,
        min: usize,
        max: usize,
    },
    PlayerCountOutOfBounds {
        got: u32,
        min: u32,
        max: u32,
    },
    PlayTimeRangeInvalid {
        got: u32,
    },
    TreasuryFeeNotAuthorized {
        fee: u64,
    },
    CreatorFeeNotAuthorized {
        fee: u64,
    },
    RegistrationAmountNotAuthorized {
        amount: u128,
    },
    Schedule(ScheduleError),
    ScheduleHourNotAuthorized {
        hour: u8,
    },
    WinnersOutOfBounds {
        got: u32,
        max: u32,
    },
    PrizepoolEmpty,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::NotInitialized => {
                write!(f, "the wizard is not initialized yet")
            }
            ValidationError::SubmissionPending => {
                write!(f, "a submission is already in flight")
            }
            ValidationError::StepMismatch { current } => {
                write!(f, "action does not belong to step {}", current.index())
            }
            ValidationError::NameLength { len, min, max } => {
                write!(f, "name of {len} characters is outside {min}..={max}")
            }
            ValidationError::PlayerCountOutOfBounds { got, min, max } => {
                write!(f, "{got} players is outside {min}..={max}")
            }
            ValidationError::PlayTimeRangeInvalid { got } => {
                write!(f, "play time range of {got} hours is invalid")
            }
            ValidationError::TreasuryFeeNotAuthorized { fee } => {
                write!(f, "treasury fee {fee} is not authorized on this network")
            }
            ValidationError::CreatorFeeNotAuthorized { fee } => {
                write!(f, "creator fee {fee} is not authorized on this network")
            }
            ValidationError::RegistrationAmountNotAuthorized { amount } => {
                write!(
                    f,
                    "registration amount {amount} is not authorized on this network"
                )
            }
            ValidationError::Schedule(err) => write!(f, "{err}"),
            ValidationError::ScheduleHourNotAuthorized { hour } => {
                write!(f, "draw hour {hour} is not authorized on this network")
            }
            ValidationError::WinnersOutOfBounds { got, max } => {
                write!(f, "{got} winners is outside 1..={max}")
            }
            ValidationError::PrizepoolEmpty => {
                write!(f, "a free game needs a non-zero prizepool")
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ScheduleError> for ValidationError {
    fn from(err: ScheduleError) -> Self {
        ValidationError::Schedule(err)
    }
}

pub fn name(name: &str, bounds: &GameBounds) -> Result<(), ValidationError> {
    let len = name.trim().len();
    if len < bounds.min_name_length || len > bounds.max_name_length {
        return Err(ValidationError::NameLength {
            len,
            min: bounds.min_name_length,
            max: bounds.max_name_length,
        });
    }
    Ok(())
}

pub fn configuration(
    max_players: u32,
    play_time_range: u32,
    registration_amount: u128,
    treasury_fee: u64,
    creator_fee: u64,
    encoded_cron: &str,
    bounds: &GameBounds,
) -> Result<(), ValidationError> {
    if max_players < bounds.min_players || max_players > bounds.max_players {
        return Err(ValidationError::PlayerCountOutOfBounds {
            got: max_players,
            min: bounds.min_players,
            max: bounds.max_players,
        });
    }
    if play_time_range == 0 {
        return Err(ValidationError::PlayTimeRangeInvalid {
            got: play_time_range,
        });
    }
    if !bounds.authorized_treasury_fees.contains(&treasury_fee) {
        return Err(ValidationError::TreasuryFeeNotAuthorized { fee: treasury_fee });
    }
    if !bounds.authorized_creator_fees.contains(&creator_fee) {
        return Err(ValidationError::CreatorFeeNotAuthorized { fee: creator_fee });
    }
    if !bounds
        .authorized_registration_amounts
        .contains(&registration_amount)
    {
        return Err(ValidationError::RegistrationAmountNotAuthorized {
            amount: registration_amount,
        });
    }
    let schedule = schedule::parse(encoded_cron)?;
    if !bounds.authorized_cron_hours.contains(&schedule.hour) {
        return Err(ValidationError::ScheduleHourNotAuthorized {
            hour: schedule.hour,
        });
    }
    Ok(())
}

pub fn prizepool(
    number_players_allowed_to_win: u32,
    free_game_prizepool_amount: u128,
    draft: &GameDraft,
    bounds: &GameBounds,
) -> Result<(), ValidationError> {
    let winner_cap = bounds.max_winners.min(draft.max_players);
    if number_players_allowed_to_win == 0 || number_players_allowed_to_win > winner_cap {
        return Err(ValidationError::WinnersOutOfBounds {
            got: number_players_allowed_to_win,
            max: winner_cap,
        });
    }
    if draft.registration_amount == 0 && free_game_prizepool_amount == 0 {
        return Err(ValidationError::PrizepoolEmpty);
    }
    Ok(())
}
