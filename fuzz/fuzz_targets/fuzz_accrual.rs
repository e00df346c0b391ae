#![no_main]

use libfuzzer_sys::fuzz_target;
use x_token_staking::rewards::{earned, reward_rate};
use x_token_staking::state::CALC_PRECISION;

fuzz_target!(|data: &[u8]| {
    if data.len() < 32 {
        return;
    }

    let amount = u64::from_le_bytes(data[0..8].try_into().unwrap_or([0; 8]));
    let duration = u64::from_le_bytes(data[8..16].try_into().unwrap_or([0; 8]));
    let a = u64::from_le_bytes(data[16..24].try_into().unwrap_or([0; 8])) % (1 << 32);
    let b = u64::from_le_bytes(data[24..32].try_into().unwrap_or([0; 8])) % (1 << 32);
    let units = u32::from_le_bytes(data[4..8].try_into().unwrap_or([0; 4])) % 1024;

    let Ok(rate) = reward_rate(amount, duration) else {
        // the only rejection for u64 inputs is a zero window
        assert_eq!(duration, 0);
        return;
    };

    // the funded amount is recovered within one token unit
    let recovered = rate.checked_mul(duration as u128).unwrap() / CALC_PRECISION;
    assert!(recovered <= amount as u128);
    assert!(amount as u128 - recovered <= 1);

    // splitting an interval never disagrees with the combined interval by
    // more than one unit of truncation
    if let (Ok(x), Ok(y), Ok(whole)) = (
        earned(rate, units, a),
        earned(rate, units, b),
        earned(rate, units, a + b),
    ) {
        let split = x as u128 + y as u128;
        assert!(whole as u128 >= split);
        assert!(whole as u128 - split <= 1);
    }
});
