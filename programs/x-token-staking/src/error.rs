use anchor_lang::prelude::*;

#[error_code]
pub enum StakingError {
    #[msg("Signer is not authorized for this operation")]
    Unauthorized = 1,
    #[msg("Reward duration cannot be zero")]
    InvalidDuration = 2,
    #[msg("Stake token count cannot be zero")]
    InvalidStakeTokenCount = 3,
    #[msg("Amount must be greater than zero")]
    InvalidAmount = 4,
    #[msg("All funder slots are occupied")]
    CapacityExceeded = 5,
    #[msg("Funder is not present in the registry")]
    FunderNotFound = 6,
    #[msg("Vault authority cannot be added as a funder")]
    OwnerCanNotBeFunder = 7,
    #[msg("Funder is already authorized")]
    FunderAlreadyAuthorized = 8,
    #[msg("Vault has not been funded yet")]
    VaultNotReady = 9,
    #[msg("Vault is closed")]
    VaultClosed = 10,
    #[msg("Vault still has staked accounts")]
    VaultNotEmpty = 11,
    #[msg("User still has staked accounts")]
    UserNotEmpty = 12,
    #[msg("User has unclaimed pending rewards")]
    PendingRewardOutstanding = 13,
    #[msg("Token account is not staked by this user")]
    NotStaked = 14,
    #[msg("Token account is already staked")]
    AlreadyStaked = 15,
    #[msg("Maximum stake count reached")]
    MaxStakeCountReached = 16,
    #[msg("Arithmetic overflow")]
    MathOverflow = 17,
    #[msg("Clock timestamp is out of range")]
    InvalidTimestamp = 18,
}
