#![no_main]

use anchor_lang::prelude::Pubkey;
use libfuzzer_sys::fuzz_target;
use x_token_staking::state::{Vault, VaultStatus, MAX_FUNDERS};

fuzz_target!(|data: &[u8]| {
    let mut vault = Vault {
        authority: Pubkey::new_unique(),
        reward_mint_account: Pubkey::new_unique(),
        reward_rate: 0,
        reward_duration: 1,
        stake_token_count: 1,
        funders: [Pubkey::default(); MAX_FUNDERS],
        user_count: 0,
        staked_count: 0,
        status: VaultStatus::Initialized,
        last_funded_at: 0,
        reward_bump: 255,
    };

    for chunk in data.chunks(2) {
        // odd byte value keeps the key distinct from the empty-slot sentinel
        let key = Pubkey::new_from_array([chunk.get(1).copied().unwrap_or(0) | 1; 32]);
        if chunk[0] % 2 == 0 {
            let _ = vault.add_funder(key);
        } else {
            let _ = vault.remove_funder(&key);
        }

        // occupied slots are unique and never contain the vault authority
        for i in 0..MAX_FUNDERS {
            if vault.funders[i] == Pubkey::default() {
                continue;
            }
            assert_ne!(vault.funders[i], vault.authority);
            for j in i + 1..MAX_FUNDERS {
                assert_ne!(vault.funders[i], vault.funders[j]);
            }
        }
    }
});
