//! Display module - Session state formatted for a UI

use candid::{CandidType, Deserialize, Nat};
use serde::Serialize;
use crate::_1_SWAP_ORCHESTRATION::{DisabledReason, PrimaryAction, SwapSession, TerminalResult};
use crate::_2_CRITICAL_DATA::quote::QuoteStatus;
use crate::infrastructure::{from_base_units, FailureKind, QUOTE_PENDING_LABEL};
use crate::types::TradeDirection;

/// Everything a swap form renders, in one snapshot
#[derive(CandidType, Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct SwapView {
    pub chain_id: u64,
    pub direction: TradeDirection,
    /// False disables the whole surface
    pub supported: bool,
    pub symbol_in: String,
    pub symbol_out: String,
    pub sell_amount: String,
    /// Empty when idle, a placeholder while quoting, output units when ready
    pub buy_amount: String,
    pub quote_status: QuoteStatus,
    pub action_label: String,
    pub action_enabled: bool,
    pub is_approving: bool,
    pub is_swapping: bool,
    pub amount_in_base_units: Option<Nat>,
    /// Cached router allowance; `None` when unknown or not applicable
    pub allowance: Option<Nat>,
    pub input_balance: Option<String>,
    pub exceeds_balance: bool,
    pub last_result: Option<ResultView>,
}

#[derive(CandidType, Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub success: bool,
    pub tx_hash: Option<String>,
    /// Classified reason plus the channel's message, verbatim
    pub error: Option<String>,
    pub failure_kind: Option<FailureKind>,
    pub superseded: bool,
}

/// Snapshot `session` for display
pub fn build_view(session: &SwapSession) -> SwapView {
    let pair = session.pair().ok();
    let quote_status = session.quote_status();
    let action = session.primary_action();

    let (symbol_in, symbol_out) = pair
        .map(|p| (p.symbol_in().to_string(), p.symbol_out().to_string()))
        .unwrap_or_default();

    let buy_amount = match (&quote_status, pair) {
        (QuoteStatus::Pending, _) => QUOTE_PENDING_LABEL.to_string(),
        (QuoteStatus::Ready { amount_out, .. }, Some(p)) => from_base_units(amount_out, p.decimals_out()),
        _ => String::new(),
    };

    let input_balance = match (session.input_balance(), pair) {
        (Some(balance), Some(p)) => Some(from_base_units(balance, p.decimals_in())),
        _ => None,
    };

    SwapView {
        chain_id: session.chain_id(),
        direction: session.direction(),
        supported: pair.is_some(),
        symbol_in,
        symbol_out,
        sell_amount: session.amount_text().to_string(),
        buy_amount,
        quote_status,
        action_label: action_label(&action),
        action_enabled: !matches!(action, PrimaryAction::Disabled(_)),
        is_approving: session.is_approving(),
        is_swapping: session.is_swapping(),
        amount_in_base_units: session.amount_base_units().cloned(),
        allowance: session.allowance().and_then(|a| a.as_nat().cloned()),
        input_balance,
        exceeds_balance: session.exceeds_balance(),
        last_result: session.last_result().map(result_view),
    }
}

/// Button text for `action`
pub fn action_label(action: &PrimaryAction) -> String {
    match action {
        PrimaryAction::Approve { token, .. } => format!("Approve {}", token),
        PrimaryAction::Swap { .. } => "Swap".to_string(),
        PrimaryAction::Disabled(reason) => match reason {
            DisabledReason::UnsupportedNetwork => "Unsupported network",
            DisabledReason::WalletDisconnected => "Connect wallet",
            DisabledReason::NoAmount => "Enter an amount",
            DisabledReason::AwaitingApproval => "Approving...",
            DisabledReason::AwaitingSwap => "Swapping...",
            DisabledReason::CheckingAllowance => "Checking allowance...",
            DisabledReason::MinimumOutputRequired => "Set minimum output",
        }
        .to_string(),
    }
}

fn result_view(result: &TerminalResult) -> ResultView {
    match &result.outcome {
        Ok(tx_hash) => ResultView {
            success: true,
            tx_hash: Some(tx_hash.to_string()),
            error: None,
            failure_kind: None,
            superseded: result.superseded,
        },
        Err(e) => ResultView {
            success: false,
            tx_hash: None,
            error: Some(e.to_string()),
            failure_kind: e.failure_kind(),
            superseded: result.superseded,
        },
    }
}
