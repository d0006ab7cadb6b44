pub mod diff;
pub mod state;
pub mod submit;
pub mod validate;

pub use diff::{
    GameField,
    game_update_fields,
    needs_prize_replacement,
};
pub use state::{
    GameDraft,
    WizardAction,
    WizardState,
    WizardStep,
};
pub use submit::{
    MutationError,
    SubmissionPlan,
    SubmissionReport,
    SubmitError,
    submit_draft,
};
pub use validate::ValidationError;
