// VRF Raffle Program - Lifecycle
//
// Entry, upkeep eligibility, randomness request and winner payout. Every
// operation validates before it writes, so a failed call leaves the raffle
// exactly as it found it.
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{clock::UnixTimestamp, msg, pubkey::Pubkey};
use std::fmt;

use crate::error::RaffleError;
use crate::event::RaffleEvent;
use crate::state::{Raffle, RafflePhase, MAX_PARTICIPANTS};
use crate::vrf::{self, RandomnessCoordinator, RandomnessRequest};

/// Outcome of the upkeep predicate, one flag per condition
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpkeepCheck {
    pub interval_elapsed: bool,
    pub is_open: bool,
    pub has_balance: bool,
    pub has_participants: bool,
}

impl UpkeepCheck {
    pub fn needed(&self) -> bool {
        self.interval_elapsed && self.is_open && self.has_balance && self.has_participants
    }
}

impl fmt::Display for UpkeepCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "needed={} (interval_elapsed={} open={} balance={} participants={})",
            self.needed(),
            self.interval_elapsed,
            self.is_open,
            self.has_balance,
            self.has_participants
        )
    }
}

impl Raffle {
    /// Add a paid entry to the current cycle
    pub fn enter(&mut self, participant: Pubkey, paid_amount: u64) -> Result<RaffleEvent, RaffleError> {
        if paid_amount < self.config.entrance_fee {
            return Err(RaffleError::InsufficientFee {
                paid: paid_amount,
                required: self.config.entrance_fee,
            });
        }
        if self.phase != RafflePhase::Open {
            return Err(RaffleError::NotOpen { phase: self.phase });
        }
        if self.participants.len() >= MAX_PARTICIPANTS {
            return Err(RaffleError::RaffleFull {
                capacity: MAX_PARTICIPANTS as u64,
            });
        }
        let balance = self
            .balance
            .checked_add(paid_amount)
            .ok_or(RaffleError::Overflow)?;

        let index = self.participants.len() as u64;
        self.participants.push(participant);
        self.balance = balance;

        Ok(RaffleEvent::ParticipantAdded { participant, index })
    }

    /// Evaluate whether a draw may start at `now`. Never mutates.
    pub fn check_upkeep(&self, now: UnixTimestamp) -> UpkeepCheck {
        // A clock behind the cycle start counts as no time elapsed
        let elapsed = u64::try_from(now.saturating_sub(self.last_timestamp)).unwrap_or(0);
        UpkeepCheck {
            interval_elapsed: elapsed >= self.config.interval,
            is_open: self.phase == RafflePhase::Open,
            has_balance: self.balance > 0,
            has_participants: !self.participants.is_empty(),
        }
    }

    /// Start a draw: re-check eligibility, request randomness and wait for it.
    /// `perform_data` is the automation network's opaque payload; it is logged
    /// and never trusted over the re-check.
    pub fn request_transition<C: RandomnessCoordinator>(
        &mut self,
        perform_data: &[u8],
        now: UnixTimestamp,
        coordinator: &mut C,
    ) -> Result<RaffleEvent, RaffleError> {
        msg!("Perform data: {} bytes", perform_data.len());
        let check = self.check_upkeep(now);
        if !check.needed() {
            msg!("Upkeep check failed: {}", check);
            return Err(RaffleError::UpkeepNotNeeded {
                balance: self.balance,
                participants: self.participants.len() as u64,
                phase: self.phase,
            });
        }

        let nonce = self
            .request_nonce
            .checked_add(1)
            .ok_or(RaffleError::Overflow)?;
        let request = RandomnessRequest::new(&self.config, nonce);
        let request_id = coordinator.request_random_words(&request)?;

        self.phase = RafflePhase::Calculating;
        self.pending_request = Some(request_id);
        self.request_nonce = nonce;

        Ok(RaffleEvent::TransitionRequested { request_id })
    }

    /// Consume the oracle's answer: pick the winner, pay out the pool and
    /// reopen. `pay` moves the funds; if it fails nothing is committed and
    /// the same request can be fulfilled again.
    pub fn fulfill<F, E>(
        &mut self,
        request_id: u64,
        random_word: u64,
        now: UnixTimestamp,
        pay: F,
    ) -> Result<RaffleEvent, RaffleError>
    where
        F: FnOnce(&Pubkey, u64) -> Result<(), E>,
        E: fmt::Display,
    {
        let unknown = RaffleError::UnknownRequest {
            request_id,
            pending: self.pending_request,
        };
        if self.phase != RafflePhase::Calculating || self.pending_request != Some(request_id) {
            return Err(unknown);
        }
        let index = vrf::winner_index(random_word, self.participants.len()).ok_or(unknown)?;
        let winner = self.participants[index];
        let amount = self.balance;

        let mut staged = self.clone();
        staged.recent_winner = Some(winner);
        staged.participants.clear();
        staged.balance = 0;
        staged.pending_request = None;
        staged.last_timestamp = now;
        staged.phase = RafflePhase::Open;

        if let Err(err) = pay(&winner, amount) {
            msg!("Payout to {} failed: {}", winner, err);
            return Err(RaffleError::PayoutFailed { winner, amount });
        }
        *self = staged;

        Ok(RaffleEvent::WinnerPicked { winner, amount })
    }
}
