use crate::error::*;
use crate::state::*;
use anchor_lang::prelude::*;
use anchor_spl::token::{Mint, Token, TokenAccount};

#[derive(Accounts)]
pub struct CreateVault<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(init, payer = authority, space = Vault::LEN)]
    pub vault: Account<'info, Vault>,

    pub reward_mint: Account<'info, Mint>,

    /// The reward custody token account. It lives at a PDA derived from the
    /// vault and is its own authority, so only this program can move reward
    /// tokens out of it.
    #[account(
        init,
        payer = authority,
        seeds = [VAULT_REWARD_SEED, vault.key().as_ref()],
        bump,
        token::mint = reward_mint,
        token::authority = reward_account,
    )]
    pub reward_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
    pub system_program: Program<'info, System>,
    pub rent: Sysvar<'info, Rent>,
}

/// Shared by add_funder and remove_funder.
#[derive(Accounts)]
pub struct ControlFunder<'info> {
    pub authority: Signer<'info>,

    #[account(
        mut,
        has_one = authority @ StakingError::Unauthorized,
    )]
    pub vault: Account<'info, Vault>,
}

#[derive(Accounts)]
pub struct Fund<'info> {
    pub funder: Signer<'info>,

    #[account(mut)]
    pub vault: Account<'info, Vault>,

    #[account(
        mut,
        seeds = [VAULT_REWARD_SEED, vault.key().as_ref()],
        bump = vault.reward_bump,
        token::mint = vault.reward_mint_account,
    )]
    pub reward_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        token::mint = vault.reward_mint_account,
        constraint = funder_account.owner == funder.key() @ StakingError::Unauthorized,
    )]
    pub funder_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
pub struct CreateUser<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(mut)]
    pub vault: Account<'info, Vault>,

    #[account(
        init,
        payer = authority,
        space = User::LEN,
        seeds = [VAULT_USER_SEED, vault.key().as_ref(), authority.key().as_ref()],
        bump,
    )]
    pub user: Account<'info, User>,

    pub system_program: Program<'info, System>,
}

#[derive(Accounts)]
pub struct Stake<'info> {
    #[account(mut)]
    pub staker: Signer<'info>,

    #[account(mut)]
    pub vault: Account<'info, Vault>,

    #[account(
        mut,
        constraint = stake_account.owner == staker.key() @ StakingError::Unauthorized,
        constraint = stake_account.amount > 0 @ StakingError::InvalidAmount,
    )]
    pub stake_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        seeds = [VAULT_USER_SEED, vault.key().as_ref(), staker.key().as_ref()],
        bump = user.bump,
        constraint = user.vault == vault.key() @ StakingError::Unauthorized,
    )]
    pub user: Account<'info, User>,

    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
pub struct Unstake<'info> {
    #[account(mut)]
    pub staker: Signer<'info>,

    #[account(mut)]
    pub vault: Account<'info, Vault>,

    #[account(
        mut,
        constraint = stake_account.owner == stake_authority.key() @ StakingError::NotStaked,
    )]
    pub stake_account: Account<'info, TokenAccount>,

    /// CHECK: custody PDA owning this user's staked token accounts, validated by seeds
    #[account(
        seeds = [VAULT_STAKE_SEED, vault.key().as_ref(), staker.key().as_ref()],
        bump,
    )]
    pub stake_authority: UncheckedAccount<'info>,

    #[account(
        mut,
        seeds = [VAULT_USER_SEED, vault.key().as_ref(), staker.key().as_ref()],
        bump = user.bump,
        constraint = user.vault == vault.key() @ StakingError::Unauthorized,
    )]
    pub user: Account<'info, User>,

    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
pub struct Claim<'info> {
    /// CHECK: claim initiator; must be the vault authority or a registered
    /// funder, checked in the processor. Only its key is read.
    pub claimer: UncheckedAccount<'info>,

    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(mut)]
    pub vault: Account<'info, Vault>,

    #[account(
        mut,
        seeds = [VAULT_REWARD_SEED, vault.key().as_ref()],
        bump = vault.reward_bump,
        token::mint = vault.reward_mint_account,
    )]
    pub reward_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        seeds = [VAULT_USER_SEED, vault.key().as_ref(), authority.key().as_ref()],
        bump = user.bump,
        constraint = user.vault == vault.key() @ StakingError::Unauthorized,
    )]
    pub user: Account<'info, User>,

    #[account(
        mut,
        token::mint = vault.reward_mint_account,
        constraint = reward_destination.owner == authority.key() @ StakingError::Unauthorized,
    )]
    pub reward_destination: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}

#[derive(Accounts)]
pub struct CloseUser<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    #[account(mut)]
    pub vault: Account<'info, Vault>,

    #[account(
        mut,
        close = authority, // return rent to the wallet when done
        seeds = [VAULT_USER_SEED, vault.key().as_ref(), authority.key().as_ref()],
        bump = user.bump,
        constraint = user.vault == vault.key() @ StakingError::Unauthorized,
    )]
    pub user: Account<'info, User>,
}

#[derive(Accounts)]
pub struct CloseVault<'info> {
    #[account(mut)]
    pub authority: Signer<'info>,

    /// CHECK: wallet receiving the remaining reward balance; only its key is read
    pub refundee: UncheckedAccount<'info>,

    #[account(
        mut,
        has_one = authority @ StakingError::Unauthorized,
    )]
    pub vault: Account<'info, Vault>,

    #[account(
        mut,
        seeds = [VAULT_REWARD_SEED, vault.key().as_ref()],
        bump = vault.reward_bump,
        token::mint = vault.reward_mint_account,
    )]
    pub reward_account: Account<'info, TokenAccount>,

    #[account(
        mut,
        token::mint = vault.reward_mint_account,
        constraint = refundee_account.owner == refundee.key() @ StakingError::Unauthorized,
    )]
    pub refundee_account: Account<'info, TokenAccount>,

    pub token_program: Program<'info, Token>,
}
