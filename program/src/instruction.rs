use solana_program::{
    instruction::{AccountMeta, Instruction},
    program_error::ProgramError,
    pubkey::Pubkey,
    system_program,
};
use std::mem::size_of;

use crate::error::RaffleError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RaffleInstruction {
    /// Initialize a raffle in a pre-allocated account
    ///
    /// Accounts expected:
    /// 0. `[signer]` The authority creating the raffle
    /// 1. `[writable]` The raffle account, owned by this program and uninitialized
    /// 2. `[]` The randomness coordinator allowed to fulfill requests
    InitializeRaffle {
        /// Minimum entry payment in lamports
        entrance_fee: u64,
        /// Seconds between draws
        interval: u64,
        /// Oracle subscription billed for requests
        subscription_id: u64,
        /// Oracle key hash
        gas_lane: [u8; 32],
        /// Compute budget for the fulfillment callback
        callback_gas_limit: u32,
    },

    /// Enter the current cycle
    ///
    /// Accounts expected:
    /// 0. `[signer, writable]` The participant paying the fee
    /// 1. `[writable]` The raffle account
    /// 2. `[]` The system program
    EnterRaffle {
        /// Lamports paid, at least the entrance fee
        amount: u64,
    },

    /// Report whether a draw can start, through logs and return data
    ///
    /// Accounts expected:
    /// 0. `[]` The raffle account
    CheckUpkeep {},

    /// Start a draw and request randomness (anyone may call)
    ///
    /// Accounts expected:
    /// 0. `[signer]` Any user
    /// 1. `[writable]` The raffle account
    PerformUpkeep {
        /// Opaque trigger data from the automation network
        perform_data: Vec<u8>,
    },

    /// Deliver randomness for the pending request and pay the winner
    ///
    /// Accounts expected:
    /// 0. `[signer]` The configured coordinator
    /// 1. `[writable]` The raffle account
    /// 2. `[writable]` The selected winner
    FulfillRandomWords {
        request_id: u64,
        random_word: u64,
    },
}

impl RaffleInstruction {
    /// Unpacks a byte buffer into a RaffleInstruction
    pub fn unpack(input: &[u8]) -> Result<Self, ProgramError> {
        let (tag, rest) = input
            .split_first()
            .ok_or(RaffleError::InvalidInstruction)?;

        Ok(match tag {
            0 => {
                let (entrance_fee, rest) = Self::unpack_u64(rest)?;
                let (interval, rest) = Self::unpack_u64(rest)?;
                let (subscription_id, rest) = Self::unpack_u64(rest)?;
                let (gas_lane, rest) = Self::unpack_bytes32(rest)?;
                let (callback_gas_limit, _) = Self::unpack_u32(rest)?;
                Self::InitializeRaffle {
                    entrance_fee,
                    interval,
                    subscription_id,
                    gas_lane,
                    callback_gas_limit,
                }
            }
            1 => {
                let (amount, _) = Self::unpack_u64(rest)?;
                Self::EnterRaffle { amount }
            }
            2 => Self::CheckUpkeep {},
            3 => {
                let (len, rest) = Self::unpack_u32(rest)?;
                let perform_data = rest
                    .get(..len as usize)
                    .ok_or(RaffleError::InvalidInstruction)?
                    .to_vec();
                Self::PerformUpkeep { perform_data }
            }
            4 => {
                let (request_id, rest) = Self::unpack_u64(rest)?;
                let (random_word, _) = Self::unpack_u64(rest)?;
                Self::FulfillRandomWords {
                    request_id,
                    random_word,
                }
            }
            _ => return Err(RaffleError::InvalidInstruction.into()),
        })
    }

    /// Packs a RaffleInstruction into a byte buffer
    pub fn pack(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(size_of::<Self>());
        match self {
            Self::InitializeRaffle {
                entrance_fee,
                interval,
                subscription_id,
                gas_lane,
                callback_gas_limit,
            } => {
                buf.push(0);
                buf.extend_from_slice(&entrance_fee.to_le_bytes());
                buf.extend_from_slice(&interval.to_le_bytes());
                buf.extend_from_slice(&subscription_id.to_le_bytes());
                buf.extend_from_slice(gas_lane);
                buf.extend_from_slice(&callback_gas_limit.to_le_bytes());
            }
            Self::EnterRaffle { amount } => {
                buf.push(1);
                buf.extend_from_slice(&amount.to_le_bytes());
            }
            Self::CheckUpkeep {} => buf.push(2),
            Self::PerformUpkeep { perform_data } => {
                buf.push(3);
                buf.extend_from_slice(&(perform_data.len() as u32).to_le_bytes());
                buf.extend_from_slice(perform_data);
            }
            Self::FulfillRandomWords {
                request_id,
                random_word,
            } => {
                buf.push(4);
                buf.extend_from_slice(&request_id.to_le_bytes());
                buf.extend_from_slice(&random_word.to_le_bytes());
            }
        }
        buf
    }

    fn unpack_u64(input: &[u8]) -> Result<(u64, &[u8]), ProgramError> {
        let (bytes, rest) = Self::unpack_fixed_bytes::<8>(input)?;
        Ok((u64::from_le_bytes(bytes), rest))
    }

    fn unpack_u32(input: &[u8]) -> Result<(u32, &[u8]), ProgramError> {
        let (bytes, rest) = Self::unpack_fixed_bytes::<4>(input)?;
        Ok((u32::from_le_bytes(bytes), rest))
    }

    fn unpack_bytes32(input: &[u8]) -> Result<([u8; 32], &[u8]), ProgramError> {
        Self::unpack_fixed_bytes::<32>(input)
    }

    fn unpack_fixed_bytes<const N: usize>(input: &[u8]) -> Result<([u8; N], &[u8]), ProgramError> {
        if input.len() < N {
            return Err(RaffleError::InvalidInstruction.into());
        }
        let (head, rest) = input.split_at(N);
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(head);
        Ok((bytes, rest))
    }
}

/// Create initialize_raffle instruction
#[allow(clippy::too_many_arguments)]
pub fn initialize_raffle(
    program_id: &Pubkey,
    authority: &Pubkey,
    raffle_account: &Pubkey,
    coordinator: &Pubkey,
    entrance_fee: u64,
    interval: u64,
    subscription_id: u64,
    gas_lane: [u8; 32],
    callback_gas_limit: u32,
) -> Instruction {
    let data = RaffleInstruction::InitializeRaffle {
        entrance_fee,
        interval,
        subscription_id,
        gas_lane,
        callback_gas_limit,
    }
    .pack();

    let accounts = vec![
        AccountMeta::new_readonly(*authority, true),
        AccountMeta::new(*raffle_account, false),
        AccountMeta::new_readonly(*coordinator, false),
    ];

    Instruction {
        program_id: *program_id,
        accounts,
        data,
    }
}

/// Create enter_raffle instruction
pub fn enter_raffle(
    program_id: &Pubkey,
    participant: &Pubkey,
    raffle_account: &Pubkey,
    amount: u64,
) -> Instruction {
    let data = RaffleInstruction::EnterRaffle { amount }.pack();

    let accounts = vec![
        AccountMeta::new(*participant, true),
        AccountMeta::new(*raffle_account, false),
        AccountMeta::new_readonly(system_program::id(), false),
    ];

    Instruction {
        program_id: *program_id,
        accounts,
        data,
    }
}

/// Create check_upkeep instruction
pub fn check_upkeep(program_id: &Pubkey, raffle_account: &Pubkey) -> Instruction {
    Instruction {
        program_id: *program_id,
        accounts: vec![AccountMeta::new_readonly(*raffle_account, false)],
        data: RaffleInstruction::CheckUpkeep {}.pack(),
    }
}

/// Create perform_upkeep instruction
pub fn perform_upkeep(
    program_id: &Pubkey,
    caller: &Pubkey,
    raffle_account: &Pubkey,
    perform_data: Vec<u8>,
) -> Instruction {
    let data = RaffleInstruction::PerformUpkeep { perform_data }.pack();

    let accounts = vec![
        AccountMeta::new_readonly(*caller, true),
        AccountMeta::new(*raffle_account, false),
    ];

    Instruction {
        program_id: *program_id,
        accounts,
        data,
    }
}

/// Create fulfill_random_words instruction
pub fn fulfill_random_words(
    program_id: &Pubkey,
    coordinator: &Pubkey,
    raffle_account: &Pubkey,
    winner: &Pubkey,
    request_id: u64,
    random_word: u64,
) -> Instruction {
    let data = RaffleInstruction::FulfillRandomWords {
        request_id,
        random_word,
    }
    .pack();

    let accounts = vec![
        AccountMeta::new_readonly(*coordinator, true),
        AccountMeta::new(*raffle_account, false),
        AccountMeta::new(*winner, false),
    ];

    Instruction {
        program_id: *program_id,
        accounts,
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_layout() {
        let instruction = RaffleInstruction::InitializeRaffle {
            entrance_fee: 100,
            interval: 30,
            subscription_id: 588,
            gas_lane: [7u8; 32],
            callback_gas_limit: 500_000,
        };
        let packed = instruction.pack();
        assert_eq!(packed.len(), 1 + 8 + 8 + 8 + 32 + 4);
        assert_eq!(packed[0], 0);
        assert_eq!(&packed[1..9], &100u64.to_le_bytes());
        assert_eq!(RaffleInstruction::unpack(&packed).unwrap(), instruction);
    }

    #[test]
    fn perform_data_is_length_prefixed() {
        let instruction = RaffleInstruction::PerformUpkeep {
            perform_data: vec![0xde, 0xad],
        };
        let packed = instruction.pack();
        assert_eq!(packed, vec![3u8, 2, 0, 0, 0, 0xde, 0xad]);
        assert_eq!(RaffleInstruction::unpack(&packed).unwrap(), instruction);
    }

    #[test]
    fn malformed_input_is_rejected() {
        let invalid = ProgramError::Custom(RaffleError::InvalidInstruction.code());
        assert_eq!(RaffleInstruction::unpack(&[]).unwrap_err(), invalid);
        assert_eq!(RaffleInstruction::unpack(&[9]).unwrap_err(), invalid);
        assert_eq!(RaffleInstruction::unpack(&[1, 0, 0]).unwrap_err(), invalid);
        // Declared perform data longer than the payload
        assert_eq!(RaffleInstruction::unpack(&[3, 4, 0, 0, 0, 1]).unwrap_err(), invalid);
        assert_eq!(RaffleInstruction::unpack(&[4; 12]).unwrap_err(), invalid);
    }
}
