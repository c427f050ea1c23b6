//! # Pure Transition Table
//!
//! `transition(ctx, state, trigger)` computes the next state, the commands to
//! run and a disposition. It performs no side effects, so every rule can be
//! tested without timers or collaborators.
//!
//! On a stage change the commands cancel the timers the old stage owned before
//! arming the ones the new stage owns.

use stellaris_core::effects::TimerPurpose;

use super::commands::{CeremonyCommand, Disposition, IgnoreReason, RejectReason, ShellRequest};
use super::gate;
use super::intent::{CeremonyIntent, Trigger};
use super::stage::CeremonyStage;
use super::state::CeremonyState;
use crate::config::CeremonyContext;

/// Result of applying a trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// State after the trigger
    pub state: CeremonyState,
    /// Side effects to run, in order
    pub commands: Vec<CeremonyCommand>,
    /// What happened
    pub disposition: Disposition,
}

impl Transition {
    fn unchanged(state: &CeremonyState, disposition: Disposition) -> Self {
        Self {
            state: state.clone(),
            commands: Vec::new(),
            disposition,
        }
    }

    fn ignored(state: &CeremonyState, reason: IgnoreReason) -> Self {
        Self::unchanged(state, Disposition::Ignored(reason))
    }

    fn delegated(state: &CeremonyState, request: ShellRequest) -> Self {
        Self {
            state: state.clone(),
            commands: vec![CeremonyCommand::Shell(request)],
            disposition: Disposition::Delegated,
        }
    }
}

/// Apply `trigger` to `state`.
pub fn transition(ctx: &CeremonyContext, state: &CeremonyState, trigger: &Trigger) -> Transition {
    use CeremonyStage as S;

    match (state.stage, trigger) {
        (_, Trigger::Intent(CeremonyIntent::Reset)) => reset(state),

        (S::AwaitingWallet, Trigger::Intent(CeremonyIntent::ConnectWallet)) => {
            Transition::delegated(state, ShellRequest::ConnectWallet)
        }
        (S::AwaitingWallet, Trigger::WalletOutcome { connected: true }) => {
            let mut next = state.clone();
            next.wallet_connected = true;
            advance(ctx, state, next, S::AwaitingGiveChoice)
        }
        (S::AwaitingWallet, Trigger::WalletOutcome { connected: false }) => {
            Transition::unchanged(state, Disposition::Rejected(RejectReason::WalletDeclined))
        }

        (S::AwaitingGiveChoice, Trigger::Intent(CeremonyIntent::PickGive(token))) => {
            match gate::check_pick(ctx.catalog(), state.received_token.as_ref(), token) {
                Ok(()) => {
                    let mut next = state.clone();
                    next.given_token = Some(token.clone());
                    advance(ctx, state, next, S::RetractingGive)
                }
                Err(reason) => Transition::unchanged(state, Disposition::Rejected(reason)),
            }
        }

        (S::AwaitingReceiveChoice, Trigger::Intent(CeremonyIntent::PickReceive(token))) => {
            match gate::check_pick(ctx.catalog(), state.given_token.as_ref(), token) {
                Ok(()) => {
                    let mut next = state.clone();
                    next.received_token = Some(token.clone());
                    next.secondary_coin_visible = true;
                    advance(ctx, state, next, S::PresentingReceive)
                }
                Err(reason) => Transition::unchanged(state, Disposition::Rejected(reason)),
            }
        }

        (S::RetractingGive, Trigger::TimerElapsed(TimerPurpose::StageAdvance)) => {
            advance(ctx, state, state.clone(), S::AwaitingReceiveChoice)
        }
        (S::PresentingReceive, Trigger::TimerElapsed(TimerPurpose::StageAdvance)) => {
            advance(ctx, state, state.clone(), S::Complete)
        }
        (S::AwaitingReceiveChoice, Trigger::TimerElapsed(TimerPurpose::CoinFade)) => {
            let mut next = state.clone();
            next.secondary_coin_visible = false;
            Transition {
                state: next,
                commands: Vec::new(),
                disposition: Disposition::Updated,
            }
        }
        (_, Trigger::TimerElapsed(_)) => Transition::ignored(state, IgnoreReason::StaleTimer),

        (S::Complete, Trigger::Intent(CeremonyIntent::ViewOnExplorer)) => Transition::delegated(
            state,
            ShellRequest::OpenExplorer {
                url: ctx.explorer_url(),
            },
        ),

        _ => Transition::ignored(state, IgnoreReason::OutOfStage),
    }
}

/// Move to `to`, swapping the timers the old stage owns for the new stage's.
fn advance(
    ctx: &CeremonyContext,
    from: &CeremonyState,
    mut next: CeremonyState,
    to: CeremonyStage,
) -> Transition {
    let mut commands: Vec<CeremonyCommand> = from
        .stage
        .owned_timers()
        .iter()
        .map(|&purpose| CeremonyCommand::CancelTimer { purpose })
        .collect();

    for &purpose in to.owned_timers() {
        if let Some(delay) = ctx.timings().delay_for(to, purpose) {
            commands.push(CeremonyCommand::ArmTimer { purpose, delay });
        }
    }

    if to == CeremonyStage::AwaitingReceiveChoice {
        next.secondary_coin_visible = true;
    }
    next.stage = to;

    Transition {
        state: next,
        commands,
        disposition: Disposition::Advanced {
            from: from.stage,
            to,
        },
    }
}

fn reset(state: &CeremonyState) -> Transition {
    if state.is_fresh() {
        return Transition::ignored(state, IgnoreReason::AlreadyFresh);
    }
    Transition {
        state: CeremonyState::fresh(state.ceremony + 1),
        commands: TimerPurpose::ALL
            .iter()
            .map(|&purpose| CeremonyCommand::CancelTimer { purpose })
            .collect(),
        disposition: Disposition::Advanced {
            from: state.stage,
            to: CeremonyStage::AwaitingWallet,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use stellaris_core::TokenId;

    fn ctx() -> CeremonyContext {
        CeremonyContext::standard()
    }

    fn intent(intent: CeremonyIntent) -> Trigger {
        Trigger::Intent(intent)
    }

    fn run(state: &CeremonyState, triggers: &[Trigger]) -> CeremonyState {
        let ctx = ctx();
        triggers.iter().fold(state.clone(), |state, trigger| {
            transition(&ctx, &state, trigger).state
        })
    }

    fn at_give_choice() -> CeremonyState {
        run(
            &CeremonyState::new(),
            &[Trigger::WalletOutcome { connected: true }],
        )
    }

    fn at_receive_choice(give: &str) -> CeremonyState {
        run(
            &at_give_choice(),
            &[
                intent(CeremonyIntent::PickGive(TokenId::from(give))),
                Trigger::TimerElapsed(TimerPurpose::StageAdvance),
            ],
        )
    }

    #[test]
    fn test_connect_is_delegated() {
        let state = CeremonyState::new();
        let t = transition(&ctx(), &state, &intent(CeremonyIntent::ConnectWallet));
        assert_eq!(t.state, state);
        assert_eq!(t.disposition, Disposition::Delegated);
        assert_eq!(
            t.commands,
            vec![CeremonyCommand::Shell(ShellRequest::ConnectWallet)]
        );
    }

    #[test]
    fn test_wallet_declined_stays_unconnected() {
        let state = CeremonyState::new();
        let t = transition(&ctx(), &state, &Trigger::WalletOutcome { connected: false });
        assert_eq!(t.state, state);
        assert_eq!(
            t.disposition,
            Disposition::Rejected(RejectReason::WalletDeclined)
        );
    }

    #[test]
    fn test_wallet_connected_advances() {
        let state = at_give_choice();
        assert_eq!(state.stage(), CeremonyStage::AwaitingGiveChoice);
        assert!(state.wallet_connected());
        assert!(state.invariants_hold());
    }

    #[test]
    fn test_pick_give_arms_retract_timer() {
        let state = at_give_choice();
        let t = transition(
            &ctx(),
            &state,
            &intent(CeremonyIntent::PickGive(TokenId::from("BTC"))),
        );
        assert_eq!(t.state.stage(), CeremonyStage::RetractingGive);
        assert_eq!(t.state.given_token(), Some(&TokenId::from("BTC")));
        assert_eq!(
            t.commands,
            vec![CeremonyCommand::ArmTimer {
                purpose: TimerPurpose::StageAdvance,
                delay: Duration::from_millis(900),
            }]
        );
    }

    #[test]
    fn test_retract_elapses_into_receive_choice() {
        let state = run(
            &at_give_choice(),
            &[intent(CeremonyIntent::PickGive(TokenId::from("BTC")))],
        );
        let t = transition(
            &ctx(),
            &state,
            &Trigger::TimerElapsed(TimerPurpose::StageAdvance),
        );
        assert_eq!(t.state.stage(), CeremonyStage::AwaitingReceiveChoice);
        assert!(t.state.secondary_coin_visible());
        assert_eq!(
            t.commands,
            vec![
                CeremonyCommand::CancelTimer {
                    purpose: TimerPurpose::StageAdvance
                },
                CeremonyCommand::ArmTimer {
                    purpose: TimerPurpose::CoinFade,
                    delay: Duration::from_millis(4000),
                },
            ]
        );
    }

    #[test]
    fn test_pick_receive_cancels_fade_before_arming_present() {
        let state = at_receive_choice("BTC");
        let t = transition(
            &ctx(),
            &state,
            &intent(CeremonyIntent::PickReceive(TokenId::from("APT"))),
        );
        assert_eq!(t.state.stage(), CeremonyStage::PresentingReceive);
        assert_eq!(t.state.received_token(), Some(&TokenId::from("APT")));
        assert_eq!(
            t.commands,
            vec![
                CeremonyCommand::CancelTimer {
                    purpose: TimerPurpose::CoinFade
                },
                CeremonyCommand::ArmTimer {
                    purpose: TimerPurpose::StageAdvance,
                    delay: Duration::from_millis(1100),
                },
            ]
        );
    }

    #[test]
    fn test_duplicate_receive_rejected() {
        let state = at_receive_choice("ETH");
        let t = transition(
            &ctx(),
            &state,
            &intent(CeremonyIntent::PickReceive(TokenId::from("ETH"))),
        );
        assert_eq!(t.state, state);
        assert!(t.commands.is_empty());
        assert_eq!(
            t.disposition,
            Disposition::Rejected(RejectReason::DuplicateToken(TokenId::from("ETH")))
        );
    }

    #[test]
    fn test_unknown_token_rejected() {
        let state = at_give_choice();
        let t = transition(
            &ctx(),
            &state,
            &intent(CeremonyIntent::PickGive(TokenId::from("DOGE"))),
        );
        assert_eq!(t.state, state);
        assert_eq!(
            t.disposition,
            Disposition::Rejected(RejectReason::UnknownToken(TokenId::from("DOGE")))
        );
    }

    #[test]
    fn test_fade_hides_secondary_coin() {
        let state = at_receive_choice("BTC");
        let t = transition(&ctx(), &state, &Trigger::TimerElapsed(TimerPurpose::CoinFade));
        assert_eq!(t.disposition, Disposition::Updated);
        assert_eq!(t.state.stage(), CeremonyStage::AwaitingReceiveChoice);
        assert!(!t.state.secondary_coin_visible());
    }

    #[test]
    fn test_out_of_stage_intents_ignored() {
        let state = CeremonyState::new();
        for i in [
            CeremonyIntent::PickGive(TokenId::from("BTC")),
            CeremonyIntent::PickReceive(TokenId::from("APT")),
            CeremonyIntent::ViewOnExplorer,
        ] {
            let t = transition(&ctx(), &state, &intent(i));
            assert_eq!(t.disposition, Disposition::Ignored(IgnoreReason::OutOfStage));
            assert_eq!(t.state, state);
        }

        let state = at_give_choice();
        let t = transition(&ctx(), &state, &intent(CeremonyIntent::ConnectWallet));
        assert_eq!(t.disposition, Disposition::Ignored(IgnoreReason::OutOfStage));
    }

    #[test]
    fn test_timer_in_wrong_stage_is_stale() {
        let state = at_give_choice();
        let t = transition(
            &ctx(),
            &state,
            &Trigger::TimerElapsed(TimerPurpose::StageAdvance),
        );
        assert_eq!(t.disposition, Disposition::Ignored(IgnoreReason::StaleTimer));
    }

    #[test]
    fn test_explorer_from_summary() {
        let state = run(
            &at_receive_choice("BTC"),
            &[
                intent(CeremonyIntent::PickReceive(TokenId::from("APT"))),
                Trigger::TimerElapsed(TimerPurpose::StageAdvance),
            ],
        );
        assert_eq!(state.stage(), CeremonyStage::Complete);
        let t = transition(&ctx(), &state, &intent(CeremonyIntent::ViewOnExplorer));
        assert_eq!(t.state, state);
        assert_eq!(
            t.commands,
            vec![CeremonyCommand::Shell(ShellRequest::OpenExplorer {
                url: "https://explorer.aptoslabs.com/?network=mainnet".to_string()
            })]
        );
    }

    #[test]
    fn test_reset_fresh_is_noop() {
        let state = CeremonyState::new();
        let t = transition(&ctx(), &state, &intent(CeremonyIntent::Reset));
        assert_eq!(t.disposition, Disposition::Ignored(IgnoreReason::AlreadyFresh));
        assert_eq!(t.state, state);
    }

    #[test]
    fn test_reset_cancels_all_timers() {
        let state = at_receive_choice("BTC");
        let t = transition(&ctx(), &state, &intent(CeremonyIntent::Reset));
        assert_eq!(t.state, CeremonyState::fresh(2));
        assert_eq!(t.commands.len(), TimerPurpose::ALL.len());
        assert!(t
            .commands
            .iter()
            .all(|c| matches!(c, CeremonyCommand::CancelTimer { .. })));
    }
}
