use crate::error::StakingError;
use anchor_lang::prelude::*;

/// Number of funder slots carried by every vault.
pub const MAX_FUNDERS: usize = 5;

/// Most stake token accounts a single user record can hold in custody.
pub const MAX_STAKES_PER_USER: usize = 8;

/// Fixed point scale for reward rates (64 fractional bits).
pub const CALC_PRECISION: u128 = 1 << 64;

pub const VAULT_REWARD_SEED: &[u8] = b"x_token_vault_reward";
pub const VAULT_USER_SEED: &[u8] = b"x_token_vault_user";
pub const VAULT_STAKE_SEED: &[u8] = b"x_token_vault_stake";

/// Vault lifecycle. Transitions are one way only:
/// Uninitialized -> Initialized (first fund) -> Closed.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, PartialEq, Eq, Debug)]
pub enum VaultStatus {
    Uninitialized,
    Initialized,
    Closed,
}

#[account]
pub struct Vault {
    /// Principal allowed to manage funders and close the vault
    pub authority: Pubkey,
    /// Mint of the token distributed as rewards
    pub reward_mint_account: Pubkey,
    /// Per-stake-token emission rate, CALC_PRECISION fixed point; replaced on each fund
    pub reward_rate: u128,
    /// Length of the reward emission window, seconds
    pub reward_duration: u64,
    /// Circulating stake token count the funded amount is spread over
    pub stake_token_count: u32,
    /// Funder slots; an empty slot holds the default pubkey and slots are
    /// never compacted on removal
    pub funders: [Pubkey; MAX_FUNDERS],
    pub user_count: u32,
    pub staked_count: u32,
    pub status: VaultStatus,
    /// Start of the current emission window, reset by each fund
    pub last_funded_at: u64,
    /// Bump of the reward custody PDA, stored to sign CPIs without re-deriving
    pub reward_bump: u8,
}

impl Vault {
    pub const LEN: usize = 8        // discriminator
        + 32 + 32                   // authority, reward_mint_account
        + 16 + 8 + 4                // reward_rate, reward_duration, stake_token_count
        + 32 * MAX_FUNDERS          // funders
        + 4 + 4                     // user_count, staked_count
        + 1                         // status
        + 8 + 1; // last_funded_at, reward_bump

    pub fn is_funder(&self, key: &Pubkey) -> bool {
        self.funders.iter().any(|f| f == key)
    }

    /// Writes `funder` into the first empty slot, keeping existing entries in place.
    pub fn add_funder(&mut self, funder: Pubkey) -> Result<()> {
        require!(funder != self.authority, StakingError::OwnerCanNotBeFunder);
        require!(!self.is_funder(&funder), StakingError::FunderAlreadyAuthorized);
        let slot = self
            .funders
            .iter()
            .position(|f| *f == Pubkey::default())
            .ok_or(StakingError::CapacityExceeded)?;
        self.funders[slot] = funder;
        Ok(())
    }

    /// Resets the matching slot to the empty sentinel; other slots keep their position.
    pub fn remove_funder(&mut self, funder: &Pubkey) -> Result<()> {
        let slot = self
            .funders
            .iter()
            .position(|f| f == funder)
            .ok_or(StakingError::FunderNotFound)?;
        self.funders[slot] = Pubkey::default();
        Ok(())
    }

    pub fn ensure_open(&self) -> Result<()> {
        require!(self.status != VaultStatus::Closed, StakingError::VaultClosed);
        Ok(())
    }

    pub fn ensure_ready(&self) -> Result<()> {
        match self.status {
            VaultStatus::Initialized => Ok(()),
            VaultStatus::Uninitialized => err!(StakingError::VaultNotReady),
            VaultStatus::Closed => err!(StakingError::VaultClosed),
        }
    }
}

#[account]
pub struct User {
    /// Vault this record belongs to
    pub vault: Pubkey,
    /// Wallet that owns this record
    pub key: Pubkey,
    /// Lifetime rewards paid out, never decreases
    pub reward_earned_claimed: u64,
    /// Accrued but unclaimed reward
    pub reward_earned_pending: u64,
    pub mint_staked_count: u32,
    /// Stake token accounts currently under vault custody for this user
    pub mint_accounts: Vec<Pubkey>,
    /// Accrual checkpoint, unix seconds
    pub last_update_time: u64,
    pub bump: u8,
}

impl User {
    pub const LEN: usize = 8        // discriminator
        + 32 + 32                   // vault, key
        + 8 + 8                     // reward_earned_claimed, reward_earned_pending
        + 4                         // mint_staked_count
        + 4 + 32 * MAX_STAKES_PER_USER // mint_accounts
        + 8 + 1; // last_update_time, bump

    pub fn record_stake(&mut self, stake_account: Pubkey) -> Result<()> {
        require!(
            self.mint_accounts.len() < MAX_STAKES_PER_USER,
            StakingError::MaxStakeCountReached
        );
        require!(
            !self.mint_accounts.contains(&stake_account),
            StakingError::AlreadyStaked
        );
        self.mint_staked_count = self
            .mint_staked_count
            .checked_add(1)
            .ok_or(StakingError::MathOverflow)?;
        self.mint_accounts.push(stake_account);
        Ok(())
    }

    pub fn withdraw_stake(&mut self, stake_account: &Pubkey) -> Result<()> {
        let idx = self
            .mint_accounts
            .iter()
            .position(|a| a == stake_account)
            .ok_or(StakingError::NotStaked)?;
        self.mint_accounts.remove(idx);
        self.mint_staked_count = self
            .mint_staked_count
            .checked_sub(1)
            .ok_or(StakingError::MathOverflow)?;
        Ok(())
    }

    /// Moves the full pending balance into the claimed total and returns it.
    pub fn settle_claim(&mut self) -> Result<u64> {
        let amount = self.reward_earned_pending;
        self.reward_earned_claimed = self
            .reward_earned_claimed
            .checked_add(amount)
            .ok_or(StakingError::MathOverflow)?;
        self.reward_earned_pending = 0;
        Ok(amount)
    }

    pub fn ensure_closable(&self) -> Result<()> {
        require!(self.mint_accounts.is_empty(), StakingError::UserNotEmpty);
        require!(
            self.reward_earned_pending == 0,
            StakingError::PendingRewardOutstanding
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vault() -> Vault {
        Vault {
            authority: Pubkey::new_unique(),
            reward_mint_account: Pubkey::new_unique(),
            reward_rate: 0,
            reward_duration: 1,
            stake_token_count: 500_000,
            funders: [Pubkey::default(); MAX_FUNDERS],
            user_count: 0,
            staked_count: 0,
            status: VaultStatus::Initialized,
            last_funded_at: 0,
            reward_bump: 255,
        }
    }

    fn user(vault: &Vault) -> User {
        User {
            vault: Pubkey::new_unique(),
            key: Pubkey::new_unique(),
            reward_earned_claimed: 0,
            reward_earned_pending: 0,
            mint_staked_count: 0,
            mint_accounts: vec![],
            last_update_time: vault.last_funded_at,
            bump: 254,
        }
    }

    #[test]
    fn funder_takes_first_empty_slot() {
        let mut v = vault();
        let f0 = Pubkey::new_unique();
        let f1 = Pubkey::new_unique();
        v.add_funder(f0).unwrap();
        v.add_funder(f1).unwrap();
        assert_eq!(v.funders[0], f0);
        assert_eq!(v.funders[1], f1);
        assert!(v.is_funder(&f0) && v.is_funder(&f1));
    }

    #[test]
    fn sixth_funder_is_rejected() {
        let mut v = vault();
        for _ in 0..MAX_FUNDERS {
            v.add_funder(Pubkey::new_unique()).unwrap();
        }
        assert_eq!(
            v.add_funder(Pubkey::new_unique()),
            Err(StakingError::CapacityExceeded.into())
        );
        assert_eq!(
            v.funders.iter().filter(|f| **f != Pubkey::default()).count(),
            MAX_FUNDERS
        );
    }

    #[test]
    fn duplicate_funder_is_rejected() {
        let mut v = vault();
        let f = Pubkey::new_unique();
        v.add_funder(f).unwrap();
        assert_eq!(
            v.add_funder(f),
            Err(StakingError::FunderAlreadyAuthorized.into())
        );
    }

    #[test]
    fn authority_cannot_fund_its_own_vault() {
        let mut v = vault();
        assert_eq!(
            v.add_funder(v.authority),
            Err(StakingError::OwnerCanNotBeFunder.into())
        );
    }

    #[test]
    fn removal_clears_slot_in_place() {
        let mut v = vault();
        let (f0, f1, f2) = (
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
        );
        v.add_funder(f0).unwrap();
        v.add_funder(f1).unwrap();
        v.add_funder(f2).unwrap();

        v.remove_funder(&f1).unwrap();
        assert_eq!(v.funders[0], f0);
        assert_eq!(v.funders[1], Pubkey::default());
        assert_eq!(v.funders[2], f2);

        // freed slot is reused before trailing empty ones
        let f3 = Pubkey::new_unique();
        v.add_funder(f3).unwrap();
        assert_eq!(v.funders[1], f3);
    }

    #[test]
    fn removing_unknown_funder_fails() {
        let mut v = vault();
        assert_eq!(
            v.remove_funder(&Pubkey::new_unique()),
            Err(StakingError::FunderNotFound.into())
        );
    }

    #[test]
    fn status_guards() {
        let mut v = vault();
        v.status = VaultStatus::Uninitialized;
        assert!(v.ensure_open().is_ok());
        assert_eq!(v.ensure_ready(), Err(StakingError::VaultNotReady.into()));

        v.status = VaultStatus::Initialized;
        assert!(v.ensure_ready().is_ok());

        v.status = VaultStatus::Closed;
        assert_eq!(v.ensure_open(), Err(StakingError::VaultClosed.into()));
        assert_eq!(v.ensure_ready(), Err(StakingError::VaultClosed.into()));
    }

    #[test]
    fn stake_bookkeeping_round_trip() {
        let v = vault();
        let mut u = user(&v);
        let acc = Pubkey::new_unique();

        u.record_stake(acc).unwrap();
        assert_eq!(u.mint_staked_count, 1);
        assert_eq!(u.mint_accounts, vec![acc]);
        assert_eq!(u.record_stake(acc), Err(StakingError::AlreadyStaked.into()));

        u.withdraw_stake(&acc).unwrap();
        assert_eq!(u.mint_staked_count, 0);
        assert!(u.mint_accounts.is_empty());
        assert_eq!(u.withdraw_stake(&acc), Err(StakingError::NotStaked.into()));
    }

    #[test]
    fn stake_capacity_is_bounded() {
        let v = vault();
        let mut u = user(&v);
        for _ in 0..MAX_STAKES_PER_USER {
            u.record_stake(Pubkey::new_unique()).unwrap();
        }
        assert_eq!(
            u.record_stake(Pubkey::new_unique()),
            Err(StakingError::MaxStakeCountReached.into())
        );
    }

    #[test]
    fn claim_settles_pending_into_claimed() {
        let v = vault();
        let mut u = user(&v);
        u.reward_earned_pending = 1234;
        u.reward_earned_claimed = 10;

        let paid = u.settle_claim().unwrap();
        assert_eq!(paid, 1234);
        assert_eq!(u.reward_earned_pending, 0);
        assert_eq!(u.reward_earned_claimed, 1244);

        // settling again is a harmless no-op
        assert_eq!(u.settle_claim().unwrap(), 0);
        assert_eq!(u.reward_earned_claimed, 1244);
    }

    #[test]
    fn user_close_requires_empty_custody_and_zero_pending() {
        let v = vault();
        let mut u = user(&v);
        let acc = Pubkey::new_unique();

        u.record_stake(acc).unwrap();
        assert_eq!(u.ensure_closable(), Err(StakingError::UserNotEmpty.into()));

        u.withdraw_stake(&acc).unwrap();
        u.reward_earned_pending = 5;
        assert_eq!(
            u.ensure_closable(),
            Err(StakingError::PendingRewardOutstanding.into())
        );

        u.settle_claim().unwrap();
        assert!(u.ensure_closable().is_ok());
    }
}
