use anchor_lang::prelude::*;

#[event]
pub struct FundEvent {
    pub vault: Pubkey,
    pub funder: Pubkey,
    pub amount: u64,
    pub reward_rate: u128,
}

#[event]
pub struct StakeEvent {
    pub vault: Pubkey,
    pub user: Pubkey,
    pub stake_account: Pubkey,
}

#[event]
pub struct UnstakeEvent {
    pub vault: Pubkey,
    pub user: Pubkey,
    pub stake_account: Pubkey,
}

#[event]
pub struct ClaimEvent {
    pub vault: Pubkey,
    pub user: Pubkey,
    pub amount: u64,
}

#[event]
pub struct VaultClosedEvent {
    pub vault: Pubkey,
    pub refundee: Pubkey,
    pub refunded: u64,
}
