//! Typed per-method decoding of raw call values. The loose array shapes
//! returned by the chain are converted exactly once, here, at the read
//! boundary; everything past this module works with typed records.

use crate::model::{
    GameIdentity,
    GameSettings,
    PlayerRecord,
    Prize,
    PrizeStandard,
};
use multicall::{
    Address,
    CallValue,
    DecodeError,
};

/// `games(roundId)` tuple: (name, maxPlayers, playTimeRange,
/// registrationAmount, prizepool, treasuryFee, creatorFee, encodedCron,
/// paused, finished).
pub fn game_record(value: &CallValue) -> Result<(GameSettings, bool, bool), DecodeError> {
    let fields = value.as_tuple()?;
    DecodeError::expect_arity(fields, 10)?;
    let settings = GameSettings {
        name: fields[0].as_str()?.to_string(),
        max_players: fields[1].as_u32()?,
        play_time_range: fields[2].as_u32()?,
        registration_amount: fields[3].as_uint()?,
        prizepool: fields[4].as_uint()?,
        treasury_fee: fields[5].as_u64()?,
        creator_fee: fields[6].as_u64()?,
        encoded_cron: fields[7].as_str()?.to_string(),
    };
    let paused = fields[8].as_bool()?;
    let finished = fields[9].as_bool()?;
    Ok((settings, paused, finished))
}

/// `getPlayerAddresses()` list, in registration order.
pub fn player_addresses(value: &CallValue) -> Result<Vec<Address>, DecodeError> {
    value.as_list()?.iter().map(|item| item.as_address()).collect()
}

/// `players(address)` tuple: (registeredAt, hasLost, prizeClaimed). The
/// player address itself comes from the address list the caller walked.
pub fn player_record(
    address: Address,
    value: &CallValue,
) -> Result<PlayerRecord, DecodeError> {
    let fields = value.as_tuple()?;
    DecodeError::expect_arity(fields, 3)?;
    Ok(PlayerRecord {
        address,
        registered_at: fields[0].as_u64()?,
        has_lost: fields[1].as_bool()?,
        prize_claimed: fields[2].as_bool()?,
    })
}

/// `getPrizes(roundId)` list of (position, amount, standard,
/// contractAddress, tokenId) tuples, ordered by position.
pub fn prize_list(value: &CallValue) -> Result<Vec<Prize>, DecodeError> {
    value.as_list()?.iter().map(prize).collect()
}

fn prize(value: &CallValue) -> Result<Prize, DecodeError> {
    let fields = value.as_tuple()?;
    DecodeError::expect_arity(fields, 5)?;
    let standard = prize_standard(fields[2].as_uint()?)?;
    let contract_address = match standard {
        PrizeStandard::Native => None,
        PrizeStandard::Erc20 | PrizeStandard::Erc721 => Some(fields[3].as_address()?),
    };
    let token_id = match standard {
        PrizeStandard::Erc721 => Some(fields[4].as_uint()?),
        _ => None,
    };
    Ok(Prize {
        position: fields[0].as_u32()?,
        amount: fields[1].as_uint()?,
        standard,
        contract_address,
        token_id,
    })
}

fn prize_standard(code: u128) -> Result<PrizeStandard, DecodeError> {
    u8::try_from(code)
        .ok()
        .and_then(PrizeStandard::from_code)
        .ok_or_else(|| DecodeError::Value {
            message: format!("unknown prize standard code {code}"),
        })
}

/// Registry `getDeployedGames()` list of (address, roundId) tuples.
pub fn game_identities(value: &CallValue) -> Result<Vec<GameIdentity>, DecodeError> {
    value
        .as_list()?
        .iter()
        .map(|item| {
            let fields = item.as_tuple()?;
            DecodeError::expect_arity(fields, 2)?;
            Ok(GameIdentity {
                address: fields[0].as_address()?,
                round_id: fields[1].as_u64()?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]
    use super::*;

    fn native_prize_tuple(position: u128, amount: u128) -> CallValue {
        CallValue::Tuple(vec![
            CallValue::Uint(position),
            CallValue::Uint(amount),
            CallValue::Uint(0),
            CallValue::Address(Address::ZERO),
            CallValue::Uint(0),
        ])
    }

    #[test]
    fn prize_list__keeps_position_order_and_drops_token_fields_for_native() {
        let value = CallValue::List(vec![
            native_prize_tuple(1, 700),
            native_prize_tuple(2, 300),
        ]);

        let prizes = prize_list(&value).unwrap();

        assert_eq!(prizes.len(), 2);
        assert_eq!(prizes[0].position, 1);
        assert_eq!(prizes[1].amount, 300);
        assert_eq!(prizes[0].contract_address, None);
        assert_eq!(prizes[0].token_id, None);
    }

    #[test]
    fn prize_list__rejects_unknown_standard_codes() {
        let value = CallValue::List(vec![CallValue::Tuple(vec![
            CallValue::Uint(1),
            CallValue::Uint(700),
            CallValue::Uint(9),
            CallValue::Address(Address::ZERO),
            CallValue::Uint(0),
        ])]);

        assert!(matches!(
            prize_list(&value),
            Err(DecodeError::Value { .. })
        ));
    }

    #[test]
    fn game_record__rejects_short_tuples() {
        let value = CallValue::Tuple(vec![CallValue::Str("oops".into())]);
        assert_eq!(
            game_record(&value).unwrap_err(),
            DecodeError::Arity {
                expected: 10,
                got: 1
            }
        );
    }
}
