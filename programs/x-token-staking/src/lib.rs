pub mod account_structs;
/// # x token staking - Reward Vault Staking System
///
/// ## Business Process Flow
///
/// 1. Vault Setup:
///    - An authority creates a vault for a reward token mint, fixing the
///      emission duration and the circulating stake token count
///    - The authority registers up to five funders allowed to deposit rewards
///
/// 2. Funding:
///    - A registered funder deposits reward tokens into the vault's custody
///      account
///    - The per-stake-token emission rate is recomputed for the new window
///      and the vault becomes ready for staking
///
/// 3. User Staking Flow:
///    a. Registration:
///       - A wallet registers a user record bound to the vault
///    b. Staking:
///       - The user places a stake token account under vault custody
///       - Rewards accrue linearly against the staked balance, settled
///         lazily at each operation's checkpoint
///    c. Unstaking:
///       - Custody of the token account returns to the wallet
///       - Rewards accrued while staked stay pending until claimed
///    d. Claiming:
///       - Pending rewards are paid out from vault custody to the user's
///         reward token account
///
/// 4. Teardown:
///    - A user record closes once it holds no stakes and no pending rewards
///    - The vault closes once nothing is staked; leftover rewards go to a
///      refund destination and all further operations are rejected
///
/// Security is maintained through PDAs (Program Derived Addresses) for reward
/// custody, user records, and staked token accounts. All token operations are
/// atomic and validated through Solana's transaction model.
pub mod error;
pub mod events;
pub mod processor;
pub mod rewards;
pub mod state;

use account_structs::*;
use anchor_lang::prelude::*;

declare_id!("Fg6PaFpoGXkYsidMpWTK6W2BeZ7FEfcYkg476zPFsLnS");

#[program]
pub mod x_token_staking {
    use super::*;

    /// Creates a vault for the given reward mint:
    /// - reward_duration: length of the emission window in seconds
    /// - stake_token_count: circulating stake tokens the funded amount is spread over
    pub fn create_vault(
        ctx: Context<CreateVault>,
        reward_duration: u64,
        stake_token_count: u32,
    ) -> Result<()> {
        processor::create_vault(ctx, reward_duration, stake_token_count)
    }

    /// Writes `funder` into the first free funder slot. Vault authority only.
    pub fn add_funder(ctx: Context<ControlFunder>, funder: Pubkey) -> Result<()> {
        processor::add_funder(ctx, funder)
    }

    /// Clears the funder's slot without moving the others. Vault authority only.
    pub fn remove_funder(ctx: Context<ControlFunder>, funder: Pubkey) -> Result<()> {
        processor::remove_funder(ctx, funder)
    }

    /// Deposits reward tokens from a registered funder and recomputes the
    /// emission rate for a fresh window. The first successful call makes the
    /// vault ready for staking.
    pub fn fund(ctx: Context<Fund>, amount: u64) -> Result<()> {
        processor::fund(ctx, amount)
    }

    /// Registers a user record for the signing wallet.
    pub fn create_user(ctx: Context<CreateUser>) -> Result<()> {
        processor::create_user(ctx)
    }

    /// Moves a stake token account under vault custody:
    /// - Settles the user's accrued rewards up to now
    /// - Reassigns the token account's owner to the vault's custody PDA
    pub fn stake(ctx: Context<Stake>) -> Result<()> {
        processor::stake(ctx)
    }

    /// Returns a staked token account to the wallet:
    /// - Settles accrued rewards up to now; pending is preserved
    /// - Hands ownership of the token account back to the staker
    pub fn unstake(ctx: Context<Unstake>) -> Result<()> {
        processor::unstake(ctx)
    }

    /// Pays out the user's pending rewards from vault custody. Claiming with
    /// nothing pending succeeds and transfers nothing.
    pub fn claim(ctx: Context<Claim>) -> Result<()> {
        processor::claim(ctx)
    }

    /// Removes an empty user record and returns its rent.
    pub fn close_user(ctx: Context<CloseUser>) -> Result<()> {
        processor::close_user(ctx)
    }

    /// Closes the vault once nothing is staked, refunding the remaining
    /// reward balance.
    pub fn close_vault(ctx: Context<CloseVault>) -> Result<()> {
        processor::close_vault(ctx)
    }
}
