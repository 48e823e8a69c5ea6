// VRF Raffle Program
// Participants pay in, and once the round interval has passed an automation
// trigger requests verifiable randomness; the oracle's answer picks and pays
// the winner, then the next round opens.

pub mod error;
pub mod event;
pub mod instruction;
pub mod lifecycle;
pub mod processor;
pub mod state;
pub mod utils;
pub mod vrf;

#[cfg(not(feature = "no-entrypoint"))]
mod entrypoint;

use solana_program::{account_info::AccountInfo, entrypoint::ProgramResult, pubkey::Pubkey};

pub fn process_instruction(
    program_id: &Pubkey,
    accounts: &[AccountInfo],
    instruction_data: &[u8],
) -> ProgramResult {
    processor::Processor::process(program_id, accounts, instruction_data)
}
