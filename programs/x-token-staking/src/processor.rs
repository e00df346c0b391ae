use crate::account_structs::*;
use crate::error::StakingError;
use crate::events::*;
use crate::rewards::{self, update_rewards};
use crate::state::{VaultStatus, MAX_FUNDERS, VAULT_REWARD_SEED, VAULT_STAKE_SEED};
use anchor_lang::prelude::*;
use anchor_spl::token::spl_token::instruction::AuthorityType;
use anchor_spl::token::{self, CloseAccount, SetAuthority, Transfer};

pub fn create_vault(
    ctx: Context<CreateVault>,
    reward_duration: u64,
    stake_token_count: u32,
) -> Result<()> {
    require!(reward_duration > 0, StakingError::InvalidDuration);
    require!(stake_token_count > 0, StakingError::InvalidStakeTokenCount);

    let vault = &mut ctx.accounts.vault;
    vault.authority = ctx.accounts.authority.key();
    vault.reward_mint_account = ctx.accounts.reward_mint.key();
    vault.reward_rate = 0;
    vault.reward_duration = reward_duration;
    vault.stake_token_count = stake_token_count;
    vault.funders = [Pubkey::default(); MAX_FUNDERS];
    vault.user_count = 0;
    vault.staked_count = 0;
    vault.status = VaultStatus::Uninitialized;
    vault.last_funded_at = 0;
    vault.reward_bump = ctx.bumps.reward_account;

    msg!(
        "vault {} created for reward mint {}",
        vault.key(),
        vault.reward_mint_account
    );
    Ok(())
}

pub fn add_funder(ctx: Context<ControlFunder>, funder: Pubkey) -> Result<()> {
    let vault = &mut ctx.accounts.vault;
    vault.ensure_open()?;
    vault.add_funder(funder)?;

    msg!("funder {} authorized", funder);
    Ok(())
}

pub fn remove_funder(ctx: Context<ControlFunder>, funder: Pubkey) -> Result<()> {
    let vault = &mut ctx.accounts.vault;
    vault.ensure_open()?;
    vault.remove_funder(&funder)?;

    msg!("funder {} unauthorized", funder);
    Ok(())
}

pub fn fund(ctx: Context<Fund>, amount: u64) -> Result<()> {
    let vault = &ctx.accounts.vault;
    vault.ensure_open()?;
    require!(
        vault.is_funder(&ctx.accounts.funder.key()),
        StakingError::Unauthorized
    );
    require!(amount > 0, StakingError::InvalidAmount);

    token::transfer(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            Transfer {
                from: ctx.accounts.funder_account.to_account_info(),
                to: ctx.accounts.reward_account.to_account_info(),
                authority: ctx.accounts.funder.to_account_info(),
            },
        ),
        amount,
    )?;

    // Each funding replaces the rate and restarts the emission window.
    let now = rewards::now_ts()?;
    let vault = &mut ctx.accounts.vault;
    let pool_rate = rewards::reward_rate(amount, vault.reward_duration)?;
    vault.reward_rate = pool_rate
        .checked_div(vault.stake_token_count as u128)
        .ok_or(StakingError::MathOverflow)?;
    vault.last_funded_at = now;
    if vault.status == VaultStatus::Uninitialized {
        vault.status = VaultStatus::Initialized;
    }

    emit!(FundEvent {
        vault: vault.key(),
        funder: ctx.accounts.funder.key(),
        amount,
        reward_rate: vault.reward_rate,
    });
    Ok(())
}

pub fn create_user(ctx: Context<CreateUser>) -> Result<()> {
    ctx.accounts.vault.ensure_ready()?;

    let now = rewards::now_ts()?;
    let user = &mut ctx.accounts.user;
    user.vault = ctx.accounts.vault.key();
    user.key = ctx.accounts.authority.key();
    user.reward_earned_claimed = 0;
    user.reward_earned_pending = 0;
    user.mint_staked_count = 0;
    user.mint_accounts = vec![];
    user.last_update_time = now;
    user.bump = ctx.bumps.user;

    let vault = &mut ctx.accounts.vault;
    vault.user_count = vault
        .user_count
        .checked_add(1)
        .ok_or(StakingError::MathOverflow)?;

    msg!("user {} registered with vault {}", user.key, user.vault);
    Ok(())
}

pub fn stake(ctx: Context<Stake>) -> Result<()> {
    ctx.accounts.vault.ensure_ready()?;

    // credit the interval up to this instant before custody changes
    let now = rewards::now_ts()?;
    update_rewards(&ctx.accounts.vault, &mut ctx.accounts.user, now)?;

    let stake_key = ctx.accounts.stake_account.key();
    ctx.accounts.user.record_stake(stake_key)?;
    let vault = &mut ctx.accounts.vault;
    vault.staked_count = vault
        .staked_count
        .checked_add(1)
        .ok_or(StakingError::MathOverflow)?;

    // hand the token account over to the vault's custody PDA
    let (stake_authority, _) = Pubkey::find_program_address(
        &[
            VAULT_STAKE_SEED,
            vault.key().as_ref(),
            ctx.accounts.staker.key().as_ref(),
        ],
        ctx.program_id,
    );
    token::set_authority(
        CpiContext::new(
            ctx.accounts.token_program.to_account_info(),
            SetAuthority {
                account_or_mint: ctx.accounts.stake_account.to_account_info(),
                current_authority: ctx.accounts.staker.to_account_info(),
            },
        ),
        AuthorityType::AccountOwner,
        Some(stake_authority),
    )?;

    emit!(StakeEvent {
        vault: ctx.accounts.vault.key(),
        user: ctx.accounts.user.key,
        stake_account: stake_key,
    });
    Ok(())
}

pub fn unstake(ctx: Context<Unstake>) -> Result<()> {
    ctx.accounts.vault.ensure_open()?;

    // the accrual interval for this stake ends here; pending is preserved
    let now = rewards::now_ts()?;
    update_rewards(&ctx.accounts.vault, &mut ctx.accounts.user, now)?;

    let stake_key = ctx.accounts.stake_account.key();
    ctx.accounts.user.withdraw_stake(&stake_key)?;
    let vault = &mut ctx.accounts.vault;
    vault.staked_count = vault
        .staked_count
        .checked_sub(1)
        .ok_or(StakingError::MathOverflow)?;

    let vault_key = ctx.accounts.vault.key();
    let staker_key = ctx.accounts.staker.key();
    let seeds: &[&[u8]] = &[
        VAULT_STAKE_SEED,
        vault_key.as_ref(),
        staker_key.as_ref(),
        &[ctx.bumps.stake_authority],
    ];
    let signer = &[&seeds[..]];
    token::set_authority(
        CpiContext::new_with_signer(
            ctx.accounts.token_program.to_account_info(),
            SetAuthority {
                account_or_mint: ctx.accounts.stake_account.to_account_info(),
                current_authority: ctx.accounts.stake_authority.to_account_info(),
            },
            signer,
        ),
        AuthorityType::AccountOwner,
        Some(staker_key),
    )?;

    emit!(UnstakeEvent {
        vault: vault_key,
        user: ctx.accounts.user.key,
        stake_account: stake_key,
    });
    Ok(())
}

pub fn claim(ctx: Context<Claim>) -> Result<()> {
    let vault = &ctx.accounts.vault;
    vault.ensure_open()?;

    let claimer = ctx.accounts.claimer.key();
    require!(
        claimer == vault.authority || vault.is_funder(&claimer),
        StakingError::Unauthorized
    );

    let now = rewards::now_ts()?;
    update_rewards(&ctx.accounts.vault, &mut ctx.accounts.user, now)?;

    // claiming with nothing pending succeeds without a transfer
    let amount = ctx.accounts.user.settle_claim()?;
    if amount > 0 {
        let vault_key = ctx.accounts.vault.key();
        let seeds: &[&[u8]] = &[
            VAULT_REWARD_SEED,
            vault_key.as_ref(),
            &[ctx.accounts.vault.reward_bump],
        ];
        let signer = &[&seeds[..]];
        token::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.reward_account.to_account_info(),
                    to: ctx.accounts.reward_destination.to_account_info(),
                    authority: ctx.accounts.reward_account.to_account_info(),
                },
                signer,
            ),
            amount,
        )?;
    }

    emit!(ClaimEvent {
        vault: ctx.accounts.vault.key(),
        user: ctx.accounts.user.key,
        amount,
    });
    Ok(())
}

pub fn close_user(ctx: Context<CloseUser>) -> Result<()> {
    ctx.accounts.vault.ensure_open()?;
    ctx.accounts.user.ensure_closable()?;

    let vault = &mut ctx.accounts.vault;
    vault.user_count = vault
        .user_count
        .checked_sub(1)
        .ok_or(StakingError::MathOverflow)?;

    msg!("user {} closed", ctx.accounts.user.key);
    Ok(())
}

pub fn close_vault(ctx: Context<CloseVault>) -> Result<()> {
    let vault = &ctx.accounts.vault;
    vault.ensure_open()?;
    require!(vault.staked_count == 0, StakingError::VaultNotEmpty);

    let vault_key = ctx.accounts.vault.key();
    let seeds: &[&[u8]] = &[
        VAULT_REWARD_SEED,
        vault_key.as_ref(),
        &[ctx.accounts.vault.reward_bump],
    ];
    let signer = &[&seeds[..]];

    // refund whatever reward balance is left, then close the custody account
    let remaining = ctx.accounts.reward_account.amount;
    if remaining > 0 {
        token::transfer(
            CpiContext::new_with_signer(
                ctx.accounts.token_program.to_account_info(),
                Transfer {
                    from: ctx.accounts.reward_account.to_account_info(),
                    to: ctx.accounts.refundee_account.to_account_info(),
                    authority: ctx.accounts.reward_account.to_account_info(),
                },
                signer,
            ),
            remaining,
        )?;
    }
    token::close_account(CpiContext::new_with_signer(
        ctx.accounts.token_program.to_account_info(),
        CloseAccount {
            account: ctx.accounts.reward_account.to_account_info(),
            destination: ctx.accounts.authority.to_account_info(),
            authority: ctx.accounts.reward_account.to_account_info(),
        },
        signer,
    ))?;

    let vault = &mut ctx.accounts.vault;
    vault.status = VaultStatus::Closed;

    emit!(VaultClosedEvent {
        vault: vault_key,
        refundee: ctx.accounts.refundee.key(),
        refunded: remaining,
    });
    Ok(())
}
