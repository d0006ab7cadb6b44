use crate::state::GameDraft;
use lobby::model::NormalizedGame;

/// Tracked fields of the create/update configuration surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameField {
    Name,
    MaxPlayers,
    PlayTimeRange,
    Prizepool,
    TreasuryFee,
    CreatorFee,
    EncodedCron,
}

/// Field-level difference between the draft and the loaded on-chain
/// game. Every tracked field is compared independently; a non-empty
/// result means a configuration-update mutation is required.
pub fn game_update_fields(draft: &GameDraft, game: &NormalizedGame) -> Vec<GameField> {
    let settings = &game.settings;
    let mut fields = Vec::new();
    if draft.name != settings.name {
        fields.push(GameField::Name);
    }
    if draft.max_players != settings.max_players {
        fields.push(GameField::MaxPlayers);
    }
    if draft.play_time_range != settings.play_time_range {
        fields.push(GameField::PlayTimeRange);
    }
    if draft.free_game_prizepool_amount != settings.prizepool {
        fields.push(GameField::Prizepool);
    }
    if draft.treasury_fee != settings.treasury_fee {
        fields.push(GameField::TreasuryFee);
    }
    if draft.creator_fee != settings.creator_fee {
        fields.push(GameField::CreatorFee);
    }
    if draft.encoded_cron != settings.encoded_cron {
        fields.push(GameField::EncodedCron);
    }
    fields
}

/// A separate replace-prizes mutation is required when the configured
/// prize count no longer matches the requested winner count, or when
/// the prizepool of a free (zero registration amount) game changed.
pub fn needs_prize_replacement(draft: &GameDraft, game: &NormalizedGame) -> bool {
    let configured = game
        .prizes
        .as_ref()
        .map(|prizes| prizes.len() as u32)
        .unwrap_or(0);
    if configured != draft.number_players_allowed_to_win {
        return true;
    }
    game.settings.registration_amount == 0
        && draft.free_game_prizepool_amount != game.settings.prizepool
}
