use crate::validate::{
    self,
    ValidationError,
};
use lobby::model::{
    NormalizedGame,
    PrizeStandard,
};
use networks::GameBounds;


/// The five ordered wizard steps. Steps 0-2 are advanced by their own
/// field-carrying actions; step 3 is advanced by a successful
/// submission (`submit::submit_draft`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WizardStep {
    Name,
    Configuration,
    Prizepool,
    ActionConfirm,
    Confirmation,
}

impl WizardStep {
    pub fn index(self) -> u8 {
        match self {
            WizardStep::Name => 0,
            WizardStep::Configuration => 1,
            WizardStep::Prizepool => 2,
            WizardStep::ActionConfirm => 3,
            WizardStep::Confirmation => 4,
        }
    }

    fn next(self) -> WizardStep {
        match self {
            WizardStep::Name => WizardStep::Configuration,
            WizardStep::Configuration => WizardStep::Prizepool,
            WizardStep::Prizepool => WizardStep::ActionConfirm,
            WizardStep::ActionConfirm | WizardStep::Confirmation => {
                WizardStep::Confirmation
            }
        }
    }

    fn previous(self) -> WizardStep {
        match self {
            WizardStep::Name | WizardStep::Configuration => WizardStep::Name,
            WizardStep::Prizepool => WizardStep::Configuration,
            WizardStep::ActionConfirm => WizardStep::Prizepool,
            WizardStep::Confirmation => WizardStep::ActionConfirm,
        }
    }
}

/// In-progress game configuration. Created when the wizard mounts,
/// mutated only through dispatched actions, discarded afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameDraft {
    pub name: String,
    pub max_players: u32,
    pub play_time_range: u32,
    pub registration_amount: u128,
    pub free_game_prizepool_amount: u128,
    pub treasury_fee: u64,
    pub creator_fee: u64,
    pub encoded_cron: String,
    pub number_players_allowed_to_win: u32,
    pub prize_type: PrizeStandard,
}

impl Default for GameDraft {
    fn default() -> Self {
        GameDraft {
            name: String::new(),
            max_players: 0,
            play_time_range: 0,
            registration_amount: 0,
            free_game_prizepool_amount: 0,
            treasury_fee: 0,
            creator_fee: 0,
            encoded_cron: String::new(),
            number_players_allowed_to_win: 1,
            prize_type: PrizeStandard::Native,
        }
    }
}

/// Actions the step components dispatch. Each "Next" action is tagged
/// by step kind and carries only that step's fields; the reducer merges
/// them, never replaces the whole draft.
#[derive(Clone, Debug)]
pub enum WizardAction {
    /// Completes the entry guard. In edit mode carries the loaded
    /// on-chain game whose values seed the draft; `None` means create
    /// mode (lookup explicitly skipped).
    Initialize { game: Option<NormalizedGame> },
    GameName {
        name: String,
    },
    GameConfiguration {
        max_players: u32,
        play_time_range: u32,
        registration_amount: u128,
        treasury_fee: u64,
        creator_fee: u64,
        encoded_cron: String,
    },
    GamePrizepool {
        number_players_allowed_to_win: u32,
        prize_type: PrizeStandard,
        free_game_prizepool_amount: u128,
    },
    PreviousStep,
}

#[derive(Clone, Debug)]
pub struct WizardState {
    pub draft: GameDraft,
    pub step: WizardStep,
    /// Present only in edit mode; the diff against this decides which
    /// mutations submission needs.
    pub game: Option<NormalizedGame>,
    pub is_initialized: bool,
    pub is_pending: bool,
}

impl Default for WizardState {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardState {
    pub fn new() -> Self {
        WizardState {
            draft: GameDraft::default(),
            step: WizardStep::Name,
            game: None,
            is_initialized: false,
            is_pending: false,
        }
    }

    /// Apply one action. A validation failure is reported to the caller
    /// and leaves both the draft and the current step untouched.
    pub fn dispatch(
        &mut self,
        action: WizardAction,
        bounds: &GameBounds,
    ) -> Result<(), ValidationError> {
        if self.is_pending {
            return Err(ValidationError::SubmissionPending);
        }
        match action {
            WizardAction::Initialize { game } => {
                // Initialization is one-shot; a late second lookup must
                // not clobber fields the user already edited.
                if !self.is_initialized {
                    if let Some(game) = &game {
                        self.seed_from_game(game);
                    }
                    self.game = game;
                    self.is_initialized = true;
                }
            }
            WizardAction::GameName { name } => {
                self.guard_initialized()?;
                self.expect_step(WizardStep::Name)?;
                validate::name(&name, bounds)?;
                self.draft.name = name;
                self.step = self.step.next();
            }
            WizardAction::GameConfiguration {
                max_players,
                play_time_range,
                registration_amount,
                treasury_fee,
                creator_fee,
                encoded_cron,
            } => {
                self.guard_initialized()?;
                self.expect_step(WizardStep::Configuration)?;
                validate::configuration(
                    max_players,
                    play_time_range,
                    registration_amount,
                    treasury_fee,
                    creator_fee,
                    &encoded_cron,
                    bounds,
                )?;
                self.draft.max_players = max_players;
                self.draft.play_time_range = play_time_range;
                self.draft.registration_amount = registration_amount;
                self.draft.treasury_fee = treasury_fee;
                self.draft.creator_fee = creator_fee;
                self.draft.encoded_cron = encoded_cron;
                self.step = self.step.next();
            }
            WizardAction::GamePrizepool {
                number_players_allowed_to_win,
                prize_type,
                free_game_prizepool_amount,
            } => {
                self.guard_initialized()?;
                self.expect_step(WizardStep::Prizepool)?;
                validate::prizepool(
                    number_players_allowed_to_win,
                    free_game_prizepool_amount,
                    &self.draft,
                    bounds,
                )?;
                self.draft.number_players_allowed_to_win = number_players_allowed_to_win;
                self.draft.prize_type = prize_type;
                self.draft.free_game_prizepool_amount = free_game_prizepool_amount;
                self.step = self.step.next();
            }
            WizardAction::PreviousStep => {
                self.guard_initialized()?;
                self.step = self.step.previous();
            }
        }
        Ok(())
    }

    fn guard_initialized(&self) -> Result<(), ValidationError> {
        if self.is_initialized {
            Ok(())
        } else {
            Err(ValidationError::NotInitialized)
        }
    }

    fn expect_step(&self, expected: WizardStep) -> Result<(), ValidationError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(ValidationError::StepMismatch { current: self.step })
        }
    }

    fn seed_from_game(&mut self, game: &NormalizedGame) {
        let settings = &game.settings;
        self.draft = GameDraft {
            name: settings.name.clone(),
            max_players: settings.max_players,
            play_time_range: settings.play_time_range,
            registration_amount: settings.registration_amount,
            free_game_prizepool_amount: settings.prizepool,
            treasury_fee: settings.treasury_fee,
            creator_fee: settings.creator_fee,
            encoded_cron: settings.encoded_cron.clone(),
            number_players_allowed_to_win: game
                .prizes
                .as_ref()
                .map(|prizes| prizes.len() as u32)
                .filter(|count| *count > 0)
                .unwrap_or(1),
            prize_type: game
                .prizes
                .as_ref()
                .and_then(|prizes| prizes.first())
                .map(|prize| prize.standard)
                .unwrap_or(PrizeStandard::Native),
        };
    }
}
