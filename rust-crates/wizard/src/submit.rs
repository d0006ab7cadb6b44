use crate::{
    diff,
    state::{
        WizardState,
        WizardStep,
    },
    validate::ValidationError,
};
use multicall::{
    Address,
    ChainWrite,
    MutationReceipt,
    MutationRequest,
};
use std::fmt;
use tracing::info;


pub const METHOD_CREATE_GAME: &str = "createGame";
pub const METHOD_UPDATE_CONFIGURATION: &str = "updateGameConfiguration";
pub const METHOD_REPLACE_PRIZES: &str = "replacePrizes";
pub const METHOD_SET_PAUSED: &str = "setPaused";
pub const METHOD_REGISTER: &str = "register";
pub const METHOD_CLAIM_PRIZE: &str = "claimPrize";

/// The write collaborator reported a mutation as not applied. A
/// reverted receipt and a transport error mean the same thing to the
/// wizard: stay on the current step, clear the pending gate, let the
/// user retry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MutationError {
    Rejected { method: String, tx_hash: String },
    Transport { method: String, message: String },
}

impl fmt::Display for MutationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationError::Rejected { method, tx_hash } => {
                write!(f, "{method} reverted in transaction {tx_hash}")
            }
            MutationError::Transport { method, message } => {
                write!(f, "{method} was not submitted: {message}")
            }
        }
    }
}

impl std::error::Error for MutationError {}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitError {
    Blocked(ValidationError),
    Mutation(MutationError),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::Blocked(err) => write!(f, "{err}"),
            SubmitError::Mutation(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for SubmitError {}

impl From<ValidationError> for SubmitError {
    fn from(err: ValidationError) -> Self {
        SubmitError::Blocked(err)
    }
}

impl From<MutationError> for SubmitError {
    fn from(err: MutationError) -> Self {
        SubmitError::Mutation(err)
    }
}

pub mod mutations {
    //! Mutation descriptor builders. Submission transport stays with the
    //! external write collaborator; these only shape the requests.

    use super::*;
    use crate::state::GameDraft;
    use multicall::CallParam;

    pub fn create_game(factory: Address, draft: &GameDraft) -> MutationRequest {
        let value = if draft.registration_amount == 0 {
            draft.free_game_prizepool_amount
        } else {
            0
        };
        MutationRequest::new(
            factory,
            METHOD_CREATE_GAME,
            vec![
                CallParam::Str(draft.name.clone()),
                CallParam::Uint(draft.max_players.into()),
                CallParam::Uint(draft.play_time_range.into()),
                CallParam::Uint(draft.registration_amount),
                CallParam::Uint(draft.treasury_fee.into()),
                CallParam::Uint(draft.creator_fee.into()),
                CallParam::Str(draft.encoded_cron.clone()),
                CallParam::Uint(draft.number_players_allowed_to_win.into()),
                CallParam::Uint(draft.prize_type.code().into()),
            ],
        )
        .with_value(value)
    }

    pub fn update_configuration(game: Address, draft: &GameDraft) -> MutationRequest {
        MutationRequest::new(
            game,
            METHOD_UPDATE_CONFIGURATION,
            vec![
                CallParam::Str(draft.name.clone()),
                CallParam::Uint(draft.max_players.into()),
                CallParam::Uint(draft.play_time_range.into()),
                CallParam::Uint(draft.free_game_prizepool_amount),
                CallParam::Uint(draft.treasury_fee.into()),
                CallParam::Uint(draft.creator_fee.into()),
                CallParam::Str(draft.encoded_cron.clone()),
            ],
        )
    }

    pub fn replace_prizes(game: Address, draft: &GameDraft) -> MutationRequest {
        // A free game escrows its prizepool up front, so the
        // replacement carries the new amount as transaction value.
        let value = if draft.registration_amount == 0 {
            draft.free_game_prizepool_amount
        } else {
            0
        };
        MutationRequest::new(
            game,
            METHOD_REPLACE_PRIZES,
            vec![
                CallParam::Uint(draft.number_players_allowed_to_win.into()),
                CallParam::Uint(draft.prize_type.code().into()),
            ],
        )
        .with_value(value)
    }

    pub fn set_paused(game: Address, paused: bool) -> MutationRequest {
        MutationRequest::new(game, METHOD_SET_PAUSED, vec![CallParam::Bool(paused)])
    }

    pub fn register(game: Address, registration_amount: u128) -> MutationRequest {
        MutationRequest::new(game, METHOD_REGISTER, Vec::new())
            .with_value(registration_amount)
    }

    pub fn claim_prize(game: Address, round_id: u64) -> MutationRequest {
        MutationRequest::new(
            game,
            METHOD_CLAIM_PRIZE,
            vec![CallParam::Uint(round_id.into())],
        )
    }
}

/// The ordered mutations one submission needs. Create mode is a single
/// create call; edit mode diffs the draft against the loaded game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmissionPlan {
    pub mutations: Vec<MutationRequest>,
}

impl SubmissionPlan {
    pub fn build(state: &WizardState, factory: Address) -> Self {
        let draft = &state.draft;
        let mut mutations = Vec::new();
        match &state.game {
            None => mutations.push(mutations::create_game(factory, draft)),
            Some(game) => {
                let address = game.identity.address;
                // Configuration commits before prizes: prize shares are
                // computed against the committed config, and the game
                // only unpauses once both landed.
                if !diff::game_update_fields(draft, game).is_empty() {
                    mutations.push(mutations::update_configuration(address, draft));
                }
                if diff::needs_prize_replacement(draft, game) {
                    mutations.push(mutations::replace_prizes(address, draft));
                }
                if !mutations.is_empty() && game.paused {
                    mutations.push(mutations::set_paused(address, false));
                }
            }
        }
        SubmissionPlan { mutations }
    }
}

#[derive(Clone, Debug)]
pub struct SubmissionReport {
    pub receipts: Vec<(String, MutationReceipt)>,
}

/// Drive the submission plan through the write collaborator, strictly
/// in plan order. The first failure stops the run: the wizard stays on
/// its confirmation step with the pending gate cleared so the user can
/// retry. Success advances to the final step.
pub async fn submit_draft<W: ChainWrite>(
    state: &mut WizardState,
    factory: Address,
    writer: &W,
) -> Result<SubmissionReport, SubmitError> {
    if !state.is_initialized {
        return Err(ValidationError::NotInitialized.into());
    }
    if state.is_pending {
        return Err(ValidationError::SubmissionPending.into());
    }
    if state.step != WizardStep::ActionConfirm {
        return Err(ValidationError::StepMismatch {
            current: state.step,
        }
        .into());
    }

    state.is_pending = true;
    let plan = SubmissionPlan::build(state, factory);
    let mut receipts = Vec::new();
    for mutation in &plan.mutations {
        match writer.submit(mutation).await {
            Ok(receipt) if receipt.status => {
                info!(
                    method = %mutation.method,
                    tx_hash = %receipt.tx_hash,
                    "mutation applied"
                );
                receipts.push((mutation.method.clone(), receipt));
            }
            Ok(receipt) => {
                state.is_pending = false;
                return Err(MutationError::Rejected {
                    method: mutation.method.clone(),
                    tx_hash: receipt.tx_hash,
                }
                .into());
            }
            Err(err) => {
                state.is_pending = false;
                return Err(MutationError::Transport {
                    method: mutation.method.clone(),
                    message: err.to_string(),
                }
                .into());
            }
        }
    }
    state.is_pending = false;
    state.step = WizardStep::Confirmation;
    Ok(SubmissionReport { receipts })
}
