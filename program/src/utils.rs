// VRF Raffle Program - Utility Functions
use solana_program::{
    account_info::AccountInfo, entrypoint::ProgramResult, msg, program::invoke,
    program_error::ProgramError, pubkey::Pubkey, rent::Rent, system_instruction,
};

/// Move lamports from a signer into the raffle account through the system program
pub fn collect_lamports<'a>(
    payer: &AccountInfo<'a>,
    destination: &AccountInfo<'a>,
    system_program: &AccountInfo<'a>,
    amount: u64,
) -> ProgramResult {
    invoke(
        &system_instruction::transfer(payer.key, destination.key, amount),
        &[payer.clone(), destination.clone(), system_program.clone()],
    )
}

/// Debit a program-owned account and credit `recipient`, which must be the
/// account the program selected. The credit must leave the recipient rent
/// exempt, otherwise the runtime would reject the whole transaction.
pub fn transfer_lamports(
    source: &AccountInfo,
    recipient: &AccountInfo,
    expected_recipient: &Pubkey,
    amount: u64,
    rent: &Rent,
) -> ProgramResult {
    if recipient.key != expected_recipient {
        msg!("Recipient {} does not match {}", recipient.key, expected_recipient);
        return Err(ProgramError::InvalidArgument);
    }
    if !recipient.is_writable {
        msg!("Recipient {} is not writable", recipient.key);
        return Err(ProgramError::InvalidArgument);
    }

    let source_lamports = source
        .lamports()
        .checked_sub(amount)
        .ok_or(ProgramError::InsufficientFunds)?;
    let recipient_lamports = recipient
        .lamports()
        .checked_add(amount)
        .ok_or(ProgramError::ArithmeticOverflow)?;
    if !rent.is_exempt(recipient_lamports, recipient.data_len()) {
        msg!(
            "Recipient {} would hold {} lamports, below the rent-exempt minimum {}",
            recipient.key,
            recipient_lamports,
            rent.minimum_balance(recipient.data_len())
        );
        return Err(ProgramError::AccountNotRentExempt);
    }

    **source.try_borrow_mut_lamports()? = source_lamports;
    **recipient.try_borrow_mut_lamports()? = recipient_lamports;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_program::{clock::Epoch, system_program};

    const RENT_FLOOR: u64 = 890_880;

    struct TestAccount {
        key: Pubkey,
        owner: Pubkey,
        lamports: u64,
        data: Vec<u8>,
    }

    impl TestAccount {
        fn new(owner: Pubkey, lamports: u64) -> Self {
            Self {
                key: Pubkey::new_unique(),
                owner,
                lamports,
                data: vec![],
            }
        }

        fn info(&mut self, is_writable: bool) -> AccountInfo<'_> {
            AccountInfo::new(
                &self.key,
                false,
                is_writable,
                &mut self.lamports,
                &mut self.data,
                &self.owner,
                false,
                Epoch::default(),
            )
        }
    }

    #[test]
    fn transfer_moves_lamports() {
        let rent = Rent::default();
        assert_eq!(rent.minimum_balance(0), RENT_FLOOR);
        let mut source = TestAccount::new(Pubkey::new_unique(), 5_000);
        let mut recipient = TestAccount::new(system_program::id(), RENT_FLOOR);
        let expected = recipient.key;
        {
            let source_info = source.info(true);
            let recipient_info = recipient.info(true);
            transfer_lamports(&source_info, &recipient_info, &expected, 3_000, &rent).unwrap();
        }
        assert_eq!(source.lamports, 2_000);
        assert_eq!(recipient.lamports, RENT_FLOOR + 3_000);
    }

    #[test]
    fn transfer_rejects_unusable_recipient() {
        let rent = Rent::default();
        let mut source = TestAccount::new(Pubkey::new_unique(), 5_000);
        let mut recipient = TestAccount::new(system_program::id(), RENT_FLOOR);
        let mut other = TestAccount::new(system_program::id(), RENT_FLOOR);
        let expected = recipient.key;

        let source_info = source.info(true);
        let readonly = recipient.info(false);
        assert_eq!(
            transfer_lamports(&source_info, &readonly, &expected, 100, &rent).unwrap_err(),
            ProgramError::InvalidArgument
        );
        drop(readonly);

        let wrong = other.info(true);
        assert_eq!(
            transfer_lamports(&source_info, &wrong, &expected, 100, &rent).unwrap_err(),
            ProgramError::InvalidArgument
        );
        assert_eq!(source_info.lamports(), 5_000);
    }

    #[test]
    fn transfer_rejects_overdraft() {
        let rent = Rent::default();
        let mut source = TestAccount::new(Pubkey::new_unique(), 99);
        let mut recipient = TestAccount::new(system_program::id(), RENT_FLOOR);
        let expected = recipient.key;

        let source_info = source.info(true);
        let recipient_info = recipient.info(true);
        assert_eq!(
            transfer_lamports(&source_info, &recipient_info, &expected, 100, &rent).unwrap_err(),
            ProgramError::InsufficientFunds
        );
        assert_eq!(recipient_info.lamports(), RENT_FLOOR);
    }

    #[test]
    fn transfer_rejects_credit_below_rent_floor() {
        let rent = Rent::default();
        let mut source = TestAccount::new(Pubkey::new_unique(), 5_000);
        let mut drained = TestAccount::new(system_program::id(), 0);
        let expected = drained.key;

        let source_info = source.info(true);
        let drained_info = drained.info(true);
        assert_eq!(
            transfer_lamports(&source_info, &drained_info, &expected, 150, &rent).unwrap_err(),
            ProgramError::AccountNotRentExempt
        );
        assert_eq!(source_info.lamports(), 5_000);
        assert_eq!(drained_info.lamports(), 0);
    }
}
