// VRF Raffle Program - Instruction Processor
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    clock::Clock,
    entrypoint::ProgramResult,
    msg,
    program::set_return_data,
    program_error::ProgramError,
    pubkey::Pubkey,
    system_program,
    sysvar::{rent::Rent, Sysvar},
};

use crate::{
    error::RaffleError,
    instruction::RaffleInstruction,
    state::{Raffle, RaffleConfig},
    utils,
    vrf::OracleCoordinator,
};

/// Program state handler.
pub struct Processor;

impl Processor {
    pub fn process(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        instruction_data: &[u8],
    ) -> ProgramResult {
        let instruction = RaffleInstruction::unpack(instruction_data)?;

        match instruction {
            RaffleInstruction::InitializeRaffle {
                entrance_fee,
                interval,
                subscription_id,
                gas_lane,
                callback_gas_limit,
            } => {
                msg!("Instruction: Initialize Raffle");
                Self::process_initialize_raffle(
                    program_id,
                    accounts,
                    entrance_fee,
                    interval,
                    subscription_id,
                    gas_lane,
                    callback_gas_limit,
                )
            }
            RaffleInstruction::EnterRaffle { amount } => {
                msg!("Instruction: Enter Raffle");
                Self::process_enter_raffle(program_id, accounts, amount)
            }
            RaffleInstruction::CheckUpkeep {} => {
                msg!("Instruction: Check Upkeep");
                Self::process_check_upkeep(program_id, accounts)
            }
            RaffleInstruction::PerformUpkeep { perform_data } => {
                msg!("Instruction: Perform Upkeep");
                Self::process_perform_upkeep(program_id, accounts, &perform_data)
            }
            RaffleInstruction::FulfillRandomWords {
                request_id,
                random_word,
            } => {
                msg!("Instruction: Fulfill Random Words");
                Self::process_fulfill_random_words(program_id, accounts, request_id, random_word)
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn process_initialize_raffle(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        entrance_fee: u64,
        interval: u64,
        subscription_id: u64,
        gas_lane: [u8; 32],
        callback_gas_limit: u32,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let authority_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;
        let coordinator_info = next_account_info(account_info_iter)?;

        if !authority_info.is_signer {
            msg!("Authority must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }
        if raffle_info.owner != program_id {
            msg!("Raffle account must be owned by the program");
            return Err(ProgramError::IncorrectProgramId);
        }
        {
            let data = raffle_info.data.borrow();
            if data.len() < Raffle::LEN {
                msg!("Raffle account needs {} bytes, has {}", Raffle::LEN, data.len());
                return Err(ProgramError::AccountDataTooSmall);
            }
            if Raffle::is_initialized_data(&data) {
                return Err(reject(RaffleError::AlreadyInitialized));
            }
        }

        let config = RaffleConfig {
            entrance_fee,
            interval,
            coordinator: *coordinator_info.key,
            subscription_id,
            gas_lane,
            callback_gas_limit,
        };
        let clock = Clock::get()?;
        let raffle = Raffle::new(config, *authority_info.key, clock.unix_timestamp);
        raffle.pack(&mut raffle_info.data.borrow_mut())?;

        msg!(
            "Raffle initialized: authority={} entrance_fee={} interval={}s coordinator={}",
            authority_info.key,
            entrance_fee,
            interval,
            coordinator_info.key
        );
        Ok(())
    }

    fn process_enter_raffle(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        amount: u64,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let participant_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;
        let system_program_info = next_account_info(account_info_iter)?;

        if !participant_info.is_signer {
            msg!("Participant must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }
        if system_program_info.key != &system_program::id() {
            return Err(ProgramError::IncorrectProgramId);
        }

        let mut raffle = Self::load_raffle(program_id, raffle_info)?;
        let event = raffle
            .enter(*participant_info.key, amount)
            .map_err(reject)?;

        utils::collect_lamports(participant_info, raffle_info, system_program_info, amount)?;
        raffle.pack(&mut raffle_info.data.borrow_mut())?;

        event.emit()
    }

    fn process_check_upkeep(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let raffle_info = next_account_info(account_info_iter)?;

        let raffle = Self::load_raffle(program_id, raffle_info)?;
        let clock = Clock::get()?;
        let check = raffle.check_upkeep(clock.unix_timestamp);
        msg!("Upkeep {}", check);

        let data = borsh::to_vec(&check).map_err(|e| ProgramError::BorshIoError(e.to_string()))?;
        set_return_data(&data);
        Ok(())
    }

    fn process_perform_upkeep(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        perform_data: &[u8],
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let caller_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;

        // Anyone can trigger the draw once the upkeep check passes
        if !caller_info.is_signer {
            msg!("Caller must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }

        let mut raffle = Self::load_raffle(program_id, raffle_info)?;

        let clock = Clock::get()?;
        let mut coordinator = OracleCoordinator::new(raffle.config().coordinator, *raffle_info.key);
        let event = raffle
            .request_transition(perform_data, clock.unix_timestamp, &mut coordinator)
            .map_err(reject)?;

        raffle.pack(&mut raffle_info.data.borrow_mut())?;
        event.emit()
    }

    fn process_fulfill_random_words(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        request_id: u64,
        random_word: u64,
    ) -> ProgramResult {
        let account_info_iter = &mut accounts.iter();
        let coordinator_info = next_account_info(account_info_iter)?;
        let raffle_info = next_account_info(account_info_iter)?;
        let winner_info = next_account_info(account_info_iter)?;

        if !coordinator_info.is_signer {
            msg!("Coordinator must sign the transaction");
            return Err(ProgramError::MissingRequiredSignature);
        }

        let mut raffle = Self::load_raffle(program_id, raffle_info)?;
        if coordinator_info.key != &raffle.config().coordinator {
            return Err(reject(RaffleError::OnlyCoordinator));
        }

        let clock = Clock::get()?;
        let rent = Rent::get()?;
        let event = raffle
            .fulfill(request_id, random_word, clock.unix_timestamp, |winner, amount| {
                utils::transfer_lamports(raffle_info, winner_info, winner, amount, &rent)
            })
            .map_err(reject)?;

        raffle.pack(&mut raffle_info.data.borrow_mut())?;
        event.emit()
    }

    fn load_raffle(program_id: &Pubkey, raffle_info: &AccountInfo) -> Result<Raffle, ProgramError> {
        if raffle_info.owner != program_id {
            msg!("Raffle account must be owned by the program");
            return Err(ProgramError::IncorrectProgramId);
        }
        let raffle = Raffle::unpack(&raffle_info.data.borrow())?;
        Ok(raffle)
    }
}

/// Log the diagnostic snapshot before surfacing the error code
fn reject(err: RaffleError) -> ProgramError {
    msg!("Error: {}", err);
    err.into()
}
