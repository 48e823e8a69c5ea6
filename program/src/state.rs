// VRF Raffle Program - State
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    clock::UnixTimestamp,
    native_token::LAMPORTS_PER_SOL,
    program_error::ProgramError,
    program_pack::{IsInitialized, Sealed},
    pubkey::Pubkey,
};
use std::fmt;

/// Upper bound on entries per cycle, fixes the raffle account size
pub const MAX_PARTICIPANTS: usize = 100;

/// Lifecycle phase of the raffle
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RafflePhase {
    /// Accepting entries
    Open,
    /// Waiting for the oracle to deliver randomness
    Calculating,
}

impl fmt::Display for RafflePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RafflePhase::Open => write!(f, "OPEN"),
            RafflePhase::Calculating => write!(f, "CALCULATING"),
        }
    }
}

/// Parameters fixed when the raffle is initialized
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct RaffleConfig {
    /// Minimum payment to enter, in lamports
    pub entrance_fee: u64,
    /// Seconds that must pass between the start of a cycle and the next draw
    pub interval: u64,
    /// Oracle key allowed to deliver randomness
    pub coordinator: Pubkey,
    /// Oracle subscription billed for requests
    pub subscription_id: u64,
    /// Key hash selecting the oracle lane
    pub gas_lane: [u8; 32],
    /// Compute budget granted to the fulfillment callback
    pub callback_gas_limit: u32,
}

impl RaffleConfig {
    pub const LEN: usize = 8 + 8 + 32 + 8 + 32 + 4;
}

impl Default for RaffleConfig {
    fn default() -> Self {
        // Local development values: 0.01 SOL entry, 30 second rounds
        Self {
            entrance_fee: LAMPORTS_PER_SOL / 100,
            interval: 30,
            coordinator: Pubkey::default(),
            subscription_id: 588,
            gas_lane: [
                0x79, 0xd3, 0xd8, 0x83, 0x2d, 0x90, 0x45, 0x92, 0xc0, 0xbf, 0x98, 0x18, 0xb6,
                0x21, 0x52, 0x2c, 0x98, 0x8b, 0xb8, 0xb0, 0xc0, 0x5c, 0xdc, 0x3b, 0x15, 0xae,
                0xa1, 0xb6, 0xe8, 0xdb, 0x0c, 0x15,
            ],
            callback_gas_limit: 500_000,
        }
    }
}

/// Raffle account data
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Raffle {
    /// Is the account initialized
    pub(crate) is_initialized: bool,
    /// Signer that created the raffle
    pub(crate) authority: Pubkey,
    pub(crate) config: RaffleConfig,
    pub(crate) phase: RafflePhase,
    /// Entries for the current cycle in arrival order
    pub(crate) participants: Vec<Pubkey>,
    /// Lamports collected since the last payout
    pub(crate) balance: u64,
    /// Start of the current cycle
    pub(crate) last_timestamp: UnixTimestamp,
    /// Outstanding randomness request, set only while calculating
    pub(crate) pending_request: Option<u64>,
    pub(crate) recent_winner: Option<Pubkey>,
    /// Number of randomness requests issued so far
    pub(crate) request_nonce: u64,
}

impl Raffle {
    pub const LEN: usize = 1
        + 32
        + RaffleConfig::LEN
        + 1
        + (4 + 32 * MAX_PARTICIPANTS)
        + 8
        + 8
        + (1 + 8)
        + (1 + 32)
        + 8;

    /// Create a raffle whose first cycle starts at `now`
    pub fn new(config: RaffleConfig, authority: Pubkey, now: UnixTimestamp) -> Self {
        Self {
            is_initialized: true,
            authority,
            config,
            phase: RafflePhase::Open,
            participants: Vec::new(),
            balance: 0,
            last_timestamp: now,
            pending_request: None,
            recent_winner: None,
            request_nonce: 0,
        }
    }

    /// Check the initialization flag without decoding the whole account
    pub fn is_initialized_data(data: &[u8]) -> bool {
        data.first() == Some(&1)
    }

    pub fn unpack(src: &[u8]) -> Result<Self, ProgramError> {
        if !Self::is_initialized_data(src) {
            return Err(ProgramError::UninitializedAccount);
        }
        // Accounts are allocated at full capacity; trailing bytes are ignored
        Self::deserialize(&mut &src[..]).map_err(|_| ProgramError::InvalidAccountData)
    }

    pub fn pack(&self, dst: &mut [u8]) -> Result<(), ProgramError> {
        if dst.len() < Self::LEN {
            return Err(ProgramError::AccountDataTooSmall);
        }
        let mut writer = dst;
        self.serialize(&mut writer)
            .map_err(|_| ProgramError::AccountDataTooSmall)
    }

    pub fn authority(&self) -> &Pubkey {
        &self.authority
    }

    pub fn config(&self) -> &RaffleConfig {
        &self.config
    }

    pub fn phase(&self) -> RafflePhase {
        self.phase
    }

    pub fn entrance_fee(&self) -> u64 {
        self.config.entrance_fee
    }

    pub fn interval(&self) -> u64 {
        self.config.interval
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn participant(&self, index: usize) -> Option<&Pubkey> {
        self.participants.get(index)
    }

    pub fn balance(&self) -> u64 {
        self.balance
    }

    pub fn recent_winner(&self) -> Option<Pubkey> {
        self.recent_winner
    }

    pub fn last_timestamp(&self) -> UnixTimestamp {
        self.last_timestamp
    }

    pub fn pending_request(&self) -> Option<u64> {
        self.pending_request
    }
}

impl Sealed for Raffle {}

impl IsInitialized for Raffle {
    fn is_initialized(&self) -> bool {
        self.is_initialized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_raffle_fits_allocation() {
        let mut raffle = Raffle::new(RaffleConfig::default(), Pubkey::new_unique(), 1_700_000_000);
        raffle.participants = (0..MAX_PARTICIPANTS).map(|_| Pubkey::new_unique()).collect();
        raffle.balance = u64::MAX;
        raffle.pending_request = Some(u64::MAX);
        raffle.recent_winner = Some(Pubkey::new_unique());

        let mut data = vec![0u8; Raffle::LEN];
        raffle.pack(&mut data).unwrap();
        let unpacked = Raffle::unpack(&data).unwrap();
        assert!(unpacked.is_initialized());
        assert_eq!(unpacked, raffle);
    }

    #[test]
    fn repack_after_clearing_ignores_stale_tail() {
        let mut raffle = Raffle::new(RaffleConfig::default(), Pubkey::new_unique(), 10);
        raffle.participants = vec![Pubkey::new_unique(); 5];
        let mut data = vec![0u8; Raffle::LEN];
        raffle.pack(&mut data).unwrap();

        raffle.participants.clear();
        raffle.pack(&mut data).unwrap();
        assert_eq!(Raffle::unpack(&data).unwrap().participant_count(), 0);
    }

    #[test]
    fn zeroed_account_is_uninitialized() {
        let data = vec![0u8; Raffle::LEN];
        assert_eq!(
            Raffle::unpack(&data).unwrap_err(),
            ProgramError::UninitializedAccount
        );
    }

    #[test]
    fn pack_rejects_short_buffer() {
        let raffle = Raffle::new(RaffleConfig::default(), Pubkey::default(), 0);
        let mut data = vec![0u8; Raffle::LEN - 1];
        assert_eq!(
            raffle.pack(&mut data).unwrap_err(),
            ProgramError::AccountDataTooSmall
        );
    }
}
