use std::fmt::Display;

use rand::Rng;
use serde::Serialize;

const HEX_DIGITS: usize = 40;

/// A `0x`-prefixed, 40 hex digit contract address.
///
/// The gateway only ever makes these up: they carry no on-chain meaning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ContractAddress(String);

impl ContractAddress {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let digits: String = (0..HEX_DIGITS)
            .map(|_| {
                let nibble = rng.gen_range(0..16u32);
                char::from_digit(nibble, 16).unwrap_or('0')
            })
            .collect();
        Self(format!("0x{digits}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// hex digits without the prefix
    #[cfg(test)]
    fn digits(&self) -> &str {
        &self.0[2..]
    }
}

impl Display for ContractAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
