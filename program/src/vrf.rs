// Randomness oracle integration for the raffle program
use solana_program::{
    hash::{hashv, Hash},
    msg,
    pubkey::Pubkey,
};

use crate::error::RaffleError;
use crate::state::RaffleConfig;

/// Confirmations the oracle waits before answering
pub const REQUEST_CONFIRMATIONS: u16 = 3;

/// One random word picks one winner
pub const NUM_WORDS: u32 = 1;

/// Parameters sent to the oracle for a single draw
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RandomnessRequest {
    pub gas_lane: [u8; 32],
    pub subscription_id: u64,
    pub request_confirmations: u16,
    pub callback_gas_limit: u32,
    pub num_words: u32,
    pub nonce: u64,
}

impl RandomnessRequest {
    pub fn new(config: &RaffleConfig, nonce: u64) -> Self {
        Self {
            gas_lane: config.gas_lane,
            subscription_id: config.subscription_id,
            request_confirmations: REQUEST_CONFIRMATIONS,
            callback_gas_limit: config.callback_gas_limit,
            num_words: NUM_WORDS,
            nonce,
        }
    }
}

/// Source of verifiable randomness. Requests return immediately with an id;
/// the answer arrives later as a separate fulfillment keyed by that id.
pub trait RandomnessCoordinator {
    fn request_random_words(&mut self, request: &RandomnessRequest) -> Result<u64, RaffleError>;
}

/// Coordinator used on-chain. The off-chain oracle watches the program logs
/// for the request line and answers with `FulfillRandomWords`.
pub struct OracleCoordinator {
    coordinator: Pubkey,
    raffle: Pubkey,
}

impl OracleCoordinator {
    pub fn new(coordinator: Pubkey, raffle: Pubkey) -> Self {
        Self { coordinator, raffle }
    }
}

impl RandomnessCoordinator for OracleCoordinator {
    fn request_random_words(&mut self, request: &RandomnessRequest) -> Result<u64, RaffleError> {
        let request_id = derive_request_id(&self.coordinator, &self.raffle, request);
        msg!(
            "RandomWordsRequested: request_id={} coordinator={} gas_lane={} subscription_id={} confirmations={} callback_gas_limit={} num_words={}",
            request_id,
            self.coordinator,
            Hash::new_from_array(request.gas_lane),
            request.subscription_id,
            request.request_confirmations,
            request.callback_gas_limit,
            request.num_words
        );
        Ok(request_id)
    }
}

/// Request ids commit to the coordinator, the raffle and the request nonce,
/// so ids from earlier cycles never match a later request
pub fn derive_request_id(coordinator: &Pubkey, raffle: &Pubkey, request: &RandomnessRequest) -> u64 {
    let hash = hashv(&[
        coordinator.as_ref(),
        raffle.as_ref(),
        &request.gas_lane,
        &request.subscription_id.to_le_bytes(),
        &request.nonce.to_le_bytes(),
    ]);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.to_bytes()[..8]);
    u64::from_le_bytes(bytes)
}

// Get the winning position from a random word
pub fn winner_index(random_word: u64, participants: usize) -> Option<usize> {
    if participants == 0 {
        return None;
    }
    Some((random_word % participants as u64) as usize)
}
