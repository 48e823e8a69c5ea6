// VRF Raffle Program - Events
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    entrypoint::ProgramResult, log::sol_log_data, msg, program_error::ProgramError,
    pubkey::Pubkey,
};
use std::fmt;

/// Notifications emitted once an operation has been committed
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RaffleEvent {
    ParticipantAdded { participant: Pubkey, index: u64 },
    TransitionRequested { request_id: u64 },
    WinnerPicked { winner: Pubkey, amount: u64 },
}

impl fmt::Display for RaffleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RaffleEvent::ParticipantAdded { participant, index } => {
                write!(f, "ParticipantAdded: participant={} index={}", participant, index)
            }
            RaffleEvent::TransitionRequested { request_id } => {
                write!(f, "TransitionRequested: request_id={}", request_id)
            }
            RaffleEvent::WinnerPicked { winner, amount } => {
                write!(f, "WinnerPicked: winner={} amount={}", winner, amount)
            }
        }
    }
}

impl RaffleEvent {
    /// Write the event to the transaction log, readable and borsh-encoded
    pub fn emit(&self) -> ProgramResult {
        msg!("{}", self);
        let data = borsh::to_vec(self).map_err(|e| ProgramError::BorshIoError(e.to_string()))?;
        sol_log_data(&[&data]);
        Ok(())
    }
}
