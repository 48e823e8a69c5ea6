// VRF Raffle Program - Errors
use solana_program::{program_error::ProgramError, pubkey::Pubkey};
use thiserror::Error;

use crate::state::RafflePhase;

/// Errors that may be returned by the raffle program
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RaffleError {
    #[error("Entrance fee not met: paid {paid}, required {required}")]
    InsufficientFee { paid: u64, required: u64 },

    #[error("Raffle is not open (phase: {phase})")]
    NotOpen { phase: RafflePhase },

    #[error("Upkeep not needed (balance: {balance}, participants: {participants}, phase: {phase})")]
    UpkeepNotNeeded {
        balance: u64,
        participants: u64,
        phase: RafflePhase,
    },

    #[error("Unknown randomness request {request_id} (pending: {pending:?})")]
    UnknownRequest {
        request_id: u64,
        pending: Option<u64>,
    },

    #[error("Payout of {amount} lamports to {winner} failed")]
    PayoutFailed { winner: Pubkey, amount: u64 },

    #[error("Raffle already initialized")]
    AlreadyInitialized,

    #[error("Raffle is full ({capacity} participants)")]
    RaffleFull { capacity: u64 },

    #[error("Invalid instruction")]
    InvalidInstruction,

    #[error("Only the configured coordinator can fulfill randomness")]
    OnlyCoordinator,

    #[error("Arithmetic overflow")]
    Overflow,
}

impl RaffleError {
    /// Stable code surfaced as `ProgramError::Custom`
    pub fn code(&self) -> u32 {
        match self {
            RaffleError::InsufficientFee { .. } => 0,
            RaffleError::NotOpen { .. } => 1,
            RaffleError::UpkeepNotNeeded { .. } => 2,
            RaffleError::UnknownRequest { .. } => 3,
            RaffleError::PayoutFailed { .. } => 4,
            RaffleError::AlreadyInitialized => 5,
            RaffleError::RaffleFull { .. } => 6,
            RaffleError::InvalidInstruction => 7,
            RaffleError::OnlyCoordinator => 8,
            RaffleError::Overflow => 9,
        }
    }
}

impl From<RaffleError> for ProgramError {
    fn from(e: RaffleError) -> Self {
        ProgramError::Custom(e.code())
    }
}
