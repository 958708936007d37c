//! # Swap Session
//!
//! One caller's swap surface: direction, amount, quote, allowance and the
//! approve → swap sequence.
//!
//! ## Attempts
//! Every input change (amount, direction, network, owner) advances the
//! `AttemptId`. Quote reads and submissions carry the attempt they were
//! started under, so anything that comes back after the inputs moved on is
//! recognized and kept away from the live state.
//!
//! ## Driving
//! Callers either use the async drivers (`refresh`, `perform_primary_action`)
//! or the split-phase calls they are built from (`begin_quote`/`apply_quote`,
//! `begin_primary_action`/`complete_submission`) when responses are delivered
//! out of band.

use std::collections::VecDeque;
use candid::Nat;
use crate::_2_CRITICAL_DATA::allowance::{fetch_allowance, Allowance, AllowanceGate, AllowanceKey};
use crate::_2_CRITICAL_DATA::balances::{fetch_balance, BalanceKey};
use crate::_2_CRITICAL_DATA::quote::{fetch_quote, Quote, QuoteRequest, QuoteState, QuoteStatus, QuoteTracker};
use crate::_3_PAIR_CONFIGURATION::{PairConfig, PairResolver};
use crate::_4_TRADING_EXECUTION::approvals::build_approval;
use crate::_4_TRADING_EXECUTION::slippage::{resolve_minimum_output, MinimumOutput};
use crate::_4_TRADING_EXECUTION::submit_prepared;
use crate::_4_TRADING_EXECUTION::swaps::build_swap;
use crate::_5_INFORMATIONAL::display::{build_view, SwapView};
use crate::infrastructure::clock::{Clock, SystemClock};
use crate::infrastructure::config::{EngineConfig, TradingPolicy};
use crate::infrastructure::math::exchange_rate;
use crate::infrastructure::rpc::{ChainIdentity, ContractReader, TransactionSubmitter};
use crate::infrastructure::{
    to_base_units, Result, SwapError, SystemError, TradingError, MAX_PENDING_EVENTS,
};
use crate::types::{
    Address, AttemptId, PreparedWrite, QuoteExactInputSingleReply, SubmissionId, SubmissionKind,
    SubmissionTicket, TradeDirection, TxHash,
};
use super::phase::Phase;

/// What the primary button does right now
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PrimaryAction {
    Disabled(DisabledReason),
    /// Authorize the router for exactly `amount` of `token`
    Approve { token: String, amount: Nat },
    Swap { amount: Nat },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisabledReason {
    UnsupportedNetwork,
    WalletDisconnected,
    NoAmount,
    AwaitingApproval,
    AwaitingSwap,
    /// Allowance for a token input has not been read yet
    CheckingAllowance,
    MinimumOutputRequired,
}

impl DisabledReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DisabledReason::UnsupportedNetwork => "unsupported network",
            DisabledReason::WalletDisconnected => "wallet disconnected",
            DisabledReason::NoAmount => "no amount entered",
            DisabledReason::AwaitingApproval => "approval in flight",
            DisabledReason::AwaitingSwap => "swap in flight",
            DisabledReason::CheckingAllowance => "allowance not yet known",
            DisabledReason::MinimumOutputRequired => "minimum output not set",
        }
    }
}

/// Outcome of a finished submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalResult {
    pub ticket: SubmissionTicket,
    pub outcome: std::result::Result<TxHash, SwapError>,
    /// The attempt had already been replaced when this arrived
    pub superseded: bool,
}

impl TerminalResult {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Notifications for the caller, oldest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    QuoteUpdated { attempt: AttemptId, amount_out: Nat },
    QuoteFailed { attempt: AttemptId, error: SwapError },
    AuthorizationConfirmed { submission: SubmissionId, tx_hash: TxHash },
    SwapConfirmed { submission: SubmissionId, tx_hash: TxHash },
    SubmissionFailed { submission: SubmissionId, kind: SubmissionKind, error: SwapError },
    LateOutcomeIgnored { submission: SubmissionId, live_attempt: AttemptId },
}

/// A write the session has committed to; hand `prepared` to the submitter
/// and the outcome back to `complete_submission`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub ticket: SubmissionTicket,
    pub prepared: PreparedWrite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteApplication {
    Applied,
    /// Answered superseded inputs
    Discarded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionDisposition {
    /// Belonged to the in-flight submission; the phase is back to idle
    Current,
    /// Arrived after its attempt was replaced; phase untouched
    Superseded,
}

pub struct SwapSession {
    resolver: PairResolver,
    policy: TradingPolicy,
    clock: Box<dyn Clock>,

    chain_id: u64,
    owner: Option<Address>,
    direction: TradeDirection,
    pair: Result<PairConfig>,

    amount_text: String,
    amount: Option<Nat>,
    minimum_output: Option<MinimumOutput>,

    attempt: AttemptId,
    next_submission: u64,

    quotes: QuoteTracker,
    allowances: AllowanceGate,
    balance: Option<(BalanceKey, Nat)>,

    phase: Phase,
    last_result: Option<TerminalResult>,
    events: VecDeque<SessionEvent>,
}

impl SwapSession {
    /// Session on `chain_id` selling the native asset, using wall-clock time
    ///
    /// Fails only on invalid configuration; an unsupported network yields a
    /// session whose primary action is disabled.
    pub fn new(config: EngineConfig, chain_id: u64, owner: Option<Address>) -> Result<Self> {
        Self::with_clock(config, chain_id, owner, Box::new(SystemClock))
    }

    pub fn with_clock(
        config: EngineConfig,
        chain_id: u64,
        owner: Option<Address>,
        clock: Box<dyn Clock>,
    ) -> Result<Self> {
        config.validate()?;
        let policy = config.policy()?;

        let mut resolver = PairResolver::new(config);
        let direction = TradeDirection::default();
        let pair = resolver.resolve(chain_id, direction);

        Ok(Self {
            resolver,
            quotes: QuoteTracker::new(&policy),
            policy,
            clock,
            chain_id,
            owner,
            direction,
            pair,
            amount_text: String::new(),
            amount: None,
            minimum_output: None,
            attempt: AttemptId::default(),
            next_submission: 0,
            allowances: AllowanceGate::new(),
            balance: None,
            phase: Phase::Idle,
            last_result: None,
            events: VecDeque::new(),
        })
    }

    // ===== Inputs =====

    /// Set the amount to sell, as typed
    ///
    /// Malformed input is rejected and leaves the previous amount in place.
    /// The attempt only advances when the base-unit value actually changes.
    pub fn set_amount(&mut self, text: &str) -> Result<()> {
        let decimals = self.pair.as_ref().map_err(Clone::clone)?.decimals_in();
        let amount = to_base_units(text, decimals)?;

        self.amount_text = text.to_string();
        if amount != self.amount {
            self.amount = amount;
            self.quotes.reset();
            self.forget_allowance();
            self.advance_attempt("amount changed");
        }
        Ok(())
    }

    /// Swap input and output roles; the amount is cleared because the same
    /// text means something else under the other token's decimals
    pub fn toggle_direction(&mut self) {
        self.direction = self.direction.toggled();
        log::info!("🔄 Direction toggled: {}", self.direction.as_str());
        self.pair = self.resolver.resolve(self.chain_id, self.direction);
        self.clear_trade_inputs();
        self.advance_attempt("direction toggled");
    }

    pub fn set_network(&mut self, chain_id: u64) {
        if chain_id == self.chain_id {
            return;
        }

        log::info!("🌐 Network changed: {} → {}", self.chain_id, chain_id);
        self.chain_id = chain_id;
        self.pair = self.resolver.resolve(chain_id, self.direction);
        self.allowances.clear();
        self.clear_trade_inputs();
        self.advance_attempt("network changed");
    }

    /// Follow the network the wallet reports
    pub fn sync_network(&mut self, identity: &dyn ChainIdentity) {
        self.set_network(identity.chain_id());
    }

    pub fn set_owner(&mut self, owner: Option<Address>) {
        if owner == self.owner {
            return;
        }

        self.owner = owner;
        self.balance = None;
        self.advance_attempt("owner changed");
    }

    /// Minimum output for the next swap; `None` or zero removes protection
    pub fn set_minimum_output(&mut self, minimum: Option<Nat>) {
        self.minimum_output = minimum.map(MinimumOutput::from);
    }

    // ===== Quotes =====

    /// Start a quote read for the live inputs, if one is due
    pub fn begin_quote(&mut self) -> Option<QuoteRequest> {
        let pair = self.pair.as_ref().ok()?;
        let amount = self.amount.as_ref()?;
        let now = self.clock.now_nanos();
        self.quotes.issue(pair, amount, self.attempt, now)
    }

    /// Record the answer to a read from `begin_quote`
    pub fn apply_quote(
        &mut self,
        request: &QuoteRequest,
        result: Result<QuoteExactInputSingleReply>,
    ) -> QuoteApplication {
        let now = self.clock.now_nanos();

        if let Err(e) = self.quotes.apply(request, self.attempt, result, now) {
            log::debug!("Discarding quote for {}: {}", request.key.amount_in, e);
            return QuoteApplication::Discarded;
        }

        match self.quotes.state() {
            QuoteState::Ready(quote) => {
                if let Ok(pair) = &self.pair {
                    if let Some(rate) = exchange_rate(
                        &quote.key.amount_in, pair.decimals_in(),
                        &quote.amount_out, pair.decimals_out(),
                    ) {
                        log::debug!("📊 Quote: 1 {} ≈ {} {}", pair.symbol_in(), rate, pair.symbol_out());
                    }
                }
                let event = SessionEvent::QuoteUpdated {
                    attempt: request.attempt,
                    amount_out: quote.amount_out.clone(),
                };
                self.push_event(event);
            }
            QuoteState::Failed { error, .. } => {
                let event = SessionEvent::QuoteFailed {
                    attempt: request.attempt,
                    error: error.clone(),
                };
                self.push_event(event);
            }
            QuoteState::Idle | QuoteState::Pending { .. } => {}
        }

        QuoteApplication::Applied
    }

    // ===== Reads =====

    /// Bring quote, allowance and balance up to date for the live inputs
    ///
    /// The three reads run concurrently. A quote failure is recorded in the
    /// quote state rather than returned; an allowance read failure is
    /// returned after everything else has been applied.
    pub async fn refresh(&mut self, reader: &dyn ContractReader) -> Result<()> {
        let pair = self.pair.clone()?;

        let quote_request = self.begin_quote();
        let allowance_key = self.allowance_key()
            .filter(|key| self.allowances.needs_refresh(key));
        let allowance_epoch = self.allowances.epoch();
        let balance_key = self.owner.map(|owner| BalanceKey {
            owner,
            token: pair.token_in.asset.clone(),
        });

        let (quote, allowance, balance) = futures::join!(
            async {
                match &quote_request {
                    Some(request) => Some(fetch_quote(reader, request).await),
                    None => None,
                }
            },
            async {
                match &allowance_key {
                    Some(key) => Some(fetch_allowance(reader, key).await),
                    None => None,
                }
            },
            async {
                match &balance_key {
                    Some(key) => Some(fetch_balance(reader, key.owner, &pair.token_in).await),
                    None => None,
                }
            },
        );

        if let (Some(request), Some(result)) = (&quote_request, quote) {
            self.apply_quote(request, result);
        }

        if let (Some(key), Some(Ok(value))) = (balance_key, balance) {
            self.balance = Some((key, value));
        }

        match (allowance_key, allowance) {
            (Some(key), Some(Ok(value))) => {
                self.allowances.record(key, value, allowance_epoch);
                Ok(())
            }
            (_, Some(Err(e))) => Err(e),
            _ => Ok(()),
        }
    }

    /// Re-read the router's allowance for the live inputs if not cached
    pub async fn refresh_allowance(&mut self, reader: &dyn ContractReader) -> Result<Option<Allowance>> {
        match self.allowance_key() {
            Some(key) => self.allowances.current_allowance(reader, &key).await.map(Some),
            None => Ok(None),
        }
    }

    // ===== Submission =====

    /// Decide what the primary button does for the live inputs
    pub fn primary_action(&self) -> PrimaryAction {
        let pair = match &self.pair {
            Ok(pair) => pair,
            Err(_) => return PrimaryAction::Disabled(DisabledReason::UnsupportedNetwork),
        };

        match &self.phase {
            Phase::AwaitingApproval(_) => return PrimaryAction::Disabled(DisabledReason::AwaitingApproval),
            Phase::AwaitingSwap(_) => return PrimaryAction::Disabled(DisabledReason::AwaitingSwap),
            Phase::Idle => {}
        }

        let owner = match self.owner {
            Some(owner) => owner,
            None => return PrimaryAction::Disabled(DisabledReason::WalletDisconnected),
        };

        let amount = match &self.amount {
            Some(amount) => amount,
            None => return PrimaryAction::Disabled(DisabledReason::NoAmount),
        };

        let key = AllowanceKey::for_pair(pair, owner);
        match self.allowances.requires_authorization(&key, amount) {
            None => PrimaryAction::Disabled(DisabledReason::CheckingAllowance),
            Some(true) => PrimaryAction::Approve {
                token: pair.symbol_in().to_string(),
                amount: amount.clone(),
            },
            Some(false) => {
                let protected = self.minimum_output.as_ref().is_some_and(MinimumOutput::is_protected);
                if self.policy.require_minimum_output && !protected {
                    PrimaryAction::Disabled(DisabledReason::MinimumOutputRequired)
                } else {
                    PrimaryAction::Swap { amount: amount.clone() }
                }
            }
        }
    }

    /// Commit to the primary action and enter its awaiting phase
    ///
    /// Clears the previous terminal result. The returned request must be
    /// submitted and its outcome passed to `complete_submission`.
    pub fn begin_primary_action(&mut self) -> Result<SubmissionRequest> {
        let (kind, prepared, amount) = match self.primary_action() {
            PrimaryAction::Disabled(reason) => return Err(self.disabled_error(reason)),
            PrimaryAction::Approve { amount, .. } => {
                let pair = self.pair.as_ref().map_err(Clone::clone)?;
                (SubmissionKind::Approval, build_approval(pair, &amount)?, amount)
            }
            PrimaryAction::Swap { amount } => {
                let pair = self.pair.as_ref().map_err(Clone::clone)?;
                let owner = self.owner.ok_or(SwapError::System(SystemError::WalletDisconnected))?;
                let quoted = self.quotes.latest().map(|quote| &quote.amount_out);
                let minimum = resolve_minimum_output(
                    self.minimum_output.as_ref(),
                    self.policy.require_minimum_output,
                    quoted,
                )?;
                (SubmissionKind::Swap, build_swap(pair, owner, &amount, &self.policy, &minimum)?, amount)
            }
        };

        let ticket = self.new_ticket(kind, amount)?;
        self.phase.try_begin(ticket.clone())?;
        self.last_result = None;

        Ok(SubmissionRequest { ticket, prepared })
    }

    /// Record how a submission from `begin_primary_action` ended
    pub fn complete_submission(
        &mut self,
        ticket: &SubmissionTicket,
        outcome: std::result::Result<TxHash, SwapError>,
    ) -> SubmissionDisposition {
        let is_current = self.phase.try_finish(ticket);
        let approved = ticket.kind == SubmissionKind::Approval && outcome.is_ok();

        if !is_current {
            log::warn!(
                "⚠️ Late {} outcome for {} (attempt {}, live attempt {})",
                ticket.kind.as_str(), ticket.id, ticket.attempt, self.attempt
            );

            // The allowance changed on chain whatever the session thinks now
            if outcome.is_ok() {
                self.allowances.clear();
            }

            if self.phase.in_flight().is_none() && self.last_result.is_none() {
                self.last_result = Some(TerminalResult {
                    ticket: ticket.clone(),
                    outcome,
                    superseded: true,
                });
            }

            self.push_event(SessionEvent::LateOutcomeIgnored {
                submission: ticket.id,
                live_attempt: self.attempt,
            });
            return SubmissionDisposition::Superseded;
        }

        let event = match &outcome {
            Ok(tx_hash) if approved => {
                self.forget_allowance();
                SessionEvent::AuthorizationConfirmed { submission: ticket.id, tx_hash: *tx_hash }
            }
            Ok(tx_hash) => {
                // Input balance moved, and the swap spent the allowance
                self.balance = None;
                self.forget_allowance();
                SessionEvent::SwapConfirmed { submission: ticket.id, tx_hash: *tx_hash }
            }
            Err(error) => {
                log::warn!("❌ {} {} failed; amount kept for manual retry", ticket.kind.as_str(), ticket.id);
                SessionEvent::SubmissionFailed {
                    submission: ticket.id,
                    kind: ticket.kind,
                    error: error.clone(),
                }
            }
        };

        self.last_result = Some(TerminalResult {
            ticket: ticket.clone(),
            outcome,
            superseded: false,
        });
        self.push_event(event);
        SubmissionDisposition::Current
    }

    /// Submit the primary action and wait for the channel's answer
    ///
    /// ## Process
    /// 1. Commit to approve or swap (`begin_primary_action`)
    /// 2. Submit through `submitter`
    /// 3. Record the outcome (`complete_submission`)
    /// 4. After a successful approval, re-read the allowance so the action
    ///    moves on to "Swap" without new input
    pub async fn perform_primary_action(
        &mut self,
        submitter: &dyn TransactionSubmitter,
        reader: &dyn ContractReader,
    ) -> Result<TxHash> {
        let request = self.begin_primary_action()?;
        let outcome = submit_prepared(submitter, &request.prepared, &request.ticket).await;
        let disposition = self.complete_submission(&request.ticket, outcome.clone());

        if request.ticket.kind == SubmissionKind::Approval
            && outcome.is_ok()
            && disposition == SubmissionDisposition::Current
        {
            if let Err(e) = self.refresh_allowance(reader).await {
                log::warn!("⚠️ Allowance refresh after approval failed: {}", e);
            }
        }

        outcome
    }

    // ===== Notifications =====

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        self.events.drain(..).collect()
    }

    // ===== Accessors =====

    pub fn view(&self) -> SwapView {
        build_view(self)
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn owner(&self) -> Option<Address> {
        self.owner
    }

    pub fn direction(&self) -> TradeDirection {
        self.direction
    }

    pub fn pair(&self) -> Result<&PairConfig> {
        self.pair.as_ref().map_err(Clone::clone)
    }

    pub fn amount_text(&self) -> &str {
        &self.amount_text
    }

    /// Input amount in base units; `None` when nothing is entered
    pub fn amount_base_units(&self) -> Option<&Nat> {
        self.amount.as_ref()
    }

    pub fn minimum_output(&self) -> Option<&MinimumOutput> {
        self.minimum_output.as_ref()
    }

    pub fn attempt(&self) -> AttemptId {
        self.attempt
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_approving(&self) -> bool {
        matches!(self.phase, Phase::AwaitingApproval(_))
    }

    pub fn is_swapping(&self) -> bool {
        matches!(self.phase, Phase::AwaitingSwap(_))
    }

    pub fn quote_status(&self) -> QuoteStatus {
        self.quotes.status(self.clock.now_nanos())
    }

    /// Last successful quote for the live inputs, fresh or stale
    pub fn quote(&self) -> Option<&Quote> {
        self.quotes.latest()
    }

    /// Cached allowance for the live inputs
    pub fn allowance(&self) -> Option<Allowance> {
        self.allowance_key().and_then(|key| self.allowances.cached(&key))
    }

    /// Owner's balance of the input token, once read
    pub fn input_balance(&self) -> Option<&Nat> {
        let (key, balance) = self.balance.as_ref()?;
        let pair = self.pair.as_ref().ok()?;
        let current = self.owner == Some(key.owner) && pair.token_in.asset == key.token;
        current.then_some(balance)
    }

    /// Informational only; never blocks the action
    pub fn exceeds_balance(&self) -> bool {
        match (&self.amount, self.input_balance()) {
            (Some(amount), Some(balance)) => amount > balance,
            _ => false,
        }
    }

    pub fn last_result(&self) -> Option<&TerminalResult> {
        self.last_result.as_ref()
    }

    // ===== Helper Functions =====

    fn allowance_key(&self) -> Option<AllowanceKey> {
        let pair = self.pair.as_ref().ok()?;
        self.owner.map(|owner| AllowanceKey::for_pair(pair, owner))
    }

    /// Drop the cached allowance for the live inputs so the next refresh
    /// reads it again; native input has nothing to forget
    fn forget_allowance(&mut self) {
        if let Some(key) = self.allowance_key().filter(|key| !key.token.is_native()) {
            self.allowances.invalidate(&key);
        }
    }

    fn advance_attempt(&mut self, reason: &str) {
        let previous = self.attempt;
        self.attempt = self.attempt.next();

        if let Some(ticket) = self.phase.abandon() {
            log::warn!(
                "⚠️ {}: {} {} stays on chain but no longer drives the session",
                reason, ticket.kind.as_str(), ticket.id
            );
        }

        log::debug!("Attempt {} → {} ({})", previous, self.attempt, reason);
    }

    /// Reset everything computed under the previous pair
    fn clear_trade_inputs(&mut self) {
        self.amount_text.clear();
        self.amount = None;
        self.minimum_output = None;
        self.balance = None;
        self.last_result = None;
        self.quotes.reset();
    }

    fn new_ticket(&mut self, kind: SubmissionKind, amount: Nat) -> Result<SubmissionTicket> {
        let pair = self.pair.as_ref().map_err(Clone::clone)?;
        self.next_submission += 1;

        Ok(SubmissionTicket {
            id: SubmissionId(self.next_submission),
            attempt: self.attempt,
            kind,
            symbol_in: pair.symbol_in().to_string(),
            symbol_out: pair.symbol_out().to_string(),
            amount,
            decimals_in: pair.decimals_in(),
        })
    }

    fn disabled_error(&self, reason: DisabledReason) -> SwapError {
        match reason {
            DisabledReason::UnsupportedNetwork => match &self.pair {
                Err(e) => e.clone(),
                Ok(_) => SwapError::System(SystemError::ActionDisabled {
                    reason: reason.as_str().to_string(),
                }),
            },
            DisabledReason::WalletDisconnected => SwapError::System(SystemError::WalletDisconnected),
            DisabledReason::MinimumOutputRequired => SwapError::Trading(TradingError::MinimumOutputRequired),
            DisabledReason::AwaitingApproval | DisabledReason::AwaitingSwap => {
                match self.phase.in_flight() {
                    Some(ticket) => SwapError::System(SystemError::SubmissionInProgress {
                        kind: ticket.kind.as_str().to_string(),
                        attempt: ticket.attempt.0,
                    }),
                    None => SwapError::System(SystemError::ActionDisabled {
                        reason: reason.as_str().to_string(),
                    }),
                }
            }
            DisabledReason::NoAmount | DisabledReason::CheckingAllowance => {
                SwapError::System(SystemError::ActionDisabled {
                    reason: reason.as_str().to_string(),
                })
            }
        }
    }

    fn push_event(&mut self, event: SessionEvent) {
        self.events.push_back(event);

        // Keep only the newest entries
        while self.events.len() > MAX_PENDING_EVENTS {
            self.events.pop_front();
        }
    }
}
