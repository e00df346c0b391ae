use crate::error::StakingError;
use crate::state::{User, Vault, CALC_PRECISION};
use anchor_lang::prelude::*;

pub fn now_ts() -> Result<u64> {
    Clock::get()?
        .unix_timestamp
        .try_into()
        .map_err(|_| error!(StakingError::InvalidTimestamp))
}

/// Pool-wide emission rate for a funding event, CALC_PRECISION fixed point.
/// `rate * duration` recovers the funded amount to within one token unit.
pub fn reward_rate(amount: u64, duration: u64) -> Result<u128> {
    require!(duration > 0, StakingError::InvalidDuration);
    (amount as u128)
        .checked_mul(CALC_PRECISION)
        .and_then(|r| r.checked_div(duration as u128))
        .ok_or_else(|| error!(StakingError::MathOverflow))
}

/// Reward earned by `staked_units` stake tokens over `elapsed` seconds at the
/// per-token rate `rate`. Multiplies before the fixed-point division so
/// truncation happens once per call.
pub fn earned(rate: u128, staked_units: u32, elapsed: u64) -> Result<u64> {
    let raw = rate
        .checked_mul(staked_units as u128)
        .and_then(|r| r.checked_mul(elapsed as u128))
        .ok_or(StakingError::MathOverflow)?;
    (raw / CALC_PRECISION)
        .try_into()
        .map_err(|_| error!(StakingError::MathOverflow))
}

/// The sole path by which pending reward grows. Credits the interval since the
/// user's checkpoint and advances the checkpoint to `now`; every mutating
/// operation on a user runs this before its own effect.
pub fn update_rewards(vault: &Vault, user: &mut User, now: u64) -> Result<()> {
    let elapsed = now.saturating_sub(user.last_update_time);
    let accrued = earned(vault.reward_rate, user.mint_staked_count, elapsed)?;
    user.reward_earned_pending = user
        .reward_earned_pending
        .checked_add(accrued)
        .ok_or(StakingError::MathOverflow)?;
    user.last_update_time = now;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{VaultStatus, MAX_FUNDERS};

    fn vault_with_rate(rate: u128) -> Vault {
        Vault {
            authority: Pubkey::new_unique(),
            reward_mint_account: Pubkey::new_unique(),
            reward_rate: rate,
            reward_duration: 1,
            stake_token_count: 500_000,
            funders: [Pubkey::default(); MAX_FUNDERS],
            user_count: 1,
            staked_count: 0,
            status: VaultStatus::Initialized,
            last_funded_at: 100,
            reward_bump: 255,
        }
    }

    fn user_at(checkpoint: u64) -> User {
        User {
            vault: Pubkey::new_unique(),
            key: Pubkey::new_unique(),
            reward_earned_claimed: 0,
            reward_earned_pending: 0,
            mint_staked_count: 0,
            mint_accounts: vec![],
            last_update_time: checkpoint,
            bump: 254,
        }
    }

    #[test]
    fn rate_times_duration_recovers_amount() {
        for (amount, duration) in [
            (1_000_000u64, 1u64),
            (1_000_000, 3),
            (7, 13),
            (999_983, 7),
            (u32::MAX as u64, 86_400),
            (1, 31_536_000),
        ] {
            let rate = reward_rate(amount, duration).unwrap();
            let recovered = rate.checked_mul(duration as u128).unwrap() / CALC_PRECISION;
            assert!(recovered <= amount as u128);
            assert!(amount as u128 - recovered <= 1, "{amount}/{duration}");
        }
    }

    #[test]
    fn zero_duration_is_rejected() {
        assert_eq!(
            reward_rate(1_000_000, 0),
            Err(StakingError::InvalidDuration.into())
        );
    }

    #[test]
    fn per_token_rate_matches_funding_example() {
        // 1_000_000 tokens over a 1 second window across 500_000 stake tokens:
        // 2 tokens per stake token per second.
        let rate = reward_rate(1_000_000, 1).unwrap() / 500_000;
        assert_eq!(rate, 1 << 65);
        assert_eq!(earned(rate, 1, 1).unwrap(), 2);
        assert_eq!(earned(rate, 1, 5).unwrap(), 10);
    }

    #[test]
    fn earned_is_additive_across_intervals() {
        // deliberately non-round rate to exercise truncation
        let rate = (3 << 64) + 12_345u128;
        for (a, b) in [(5u64, 9u64), (1, 1), (0, 7), (3600, 86_400)] {
            let split = earned(rate, 7, a).unwrap() + earned(rate, 7, b).unwrap();
            let whole = earned(rate, 7, a + b).unwrap();
            assert!(whole >= split);
            assert!(whole - split <= 1, "a={a} b={b}");
        }
    }

    #[test]
    fn earned_is_linear_in_staked_units() {
        let rate = 5u128 << 64;
        for units in [1u32, 2, 10, 500] {
            assert_eq!(
                earned(rate, units, 11).unwrap(),
                units as u64 * earned(rate, 1, 11).unwrap()
            );
        }
        assert_eq!(earned(rate, 0, 1_000_000).unwrap(), 0);
    }

    #[test]
    fn earned_is_monotone_in_elapsed() {
        let rate = (1u128 << 63) + 99;
        let mut prev = 0;
        for elapsed in [0u64, 1, 2, 10, 100, 10_000] {
            let e = earned(rate, 3, elapsed).unwrap();
            assert!(e >= prev);
            prev = e;
        }
    }

    #[test]
    fn earned_overflow_is_an_error() {
        assert_eq!(
            earned(u128::MAX, u32::MAX, u64::MAX),
            Err(StakingError::MathOverflow.into())
        );
    }

    #[test]
    fn checkpoint_accrual_flow() {
        let v = vault_with_rate(1 << 65); // 2 tokens per stake token per second
        let mut u = user_at(100);

        // stake one token account at t=100
        update_rewards(&v, &mut u, 100).unwrap();
        u.mint_staked_count = 1;

        // five seconds staked
        update_rewards(&v, &mut u, 105).unwrap();
        assert_eq!(u.reward_earned_pending, 10);
        assert_eq!(u.last_update_time, 105);
    }

    #[test]
    fn pending_survives_unstake_and_restake() {
        let v = vault_with_rate(1 << 65);
        let mut u = user_at(100);
        u.mint_staked_count = 1;

        // unstake at t=105: accrual checkpoint runs first, then the stake leaves
        update_rewards(&v, &mut u, 105).unwrap();
        u.mint_staked_count = 0;
        let first_earned = u.reward_earned_pending;
        assert!(first_earned > 0);

        // five idle seconds earn nothing
        update_rewards(&v, &mut u, 110).unwrap();
        assert_eq!(u.reward_earned_pending, first_earned);

        // re-stake at t=110: pending is untouched at the moment of staking
        update_rewards(&v, &mut u, 110).unwrap();
        u.mint_staked_count = 1;
        assert_eq!(u.reward_earned_pending, first_earned);

        // and accrual resumes from the new checkpoint
        update_rewards(&v, &mut u, 111).unwrap();
        assert_eq!(u.reward_earned_pending, first_earned + 2);
    }

    #[test]
    fn clock_going_backwards_accrues_nothing() {
        let v = vault_with_rate(1 << 65);
        let mut u = user_at(100);
        u.mint_staked_count = 1;

        update_rewards(&v, &mut u, 90).unwrap();
        assert_eq!(u.reward_earned_pending, 0);
        assert_eq!(u.last_update_time, 90);
    }
}
