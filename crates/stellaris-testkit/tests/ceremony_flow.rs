//! End-to-end ceremony flows on simulated time

use assert_matches::assert_matches;
use stellaris_app::{
    CeremonyContext, CeremonyStage, Disposition, IgnoreReason, Panel, RejectReason, StageTimings,
};
use stellaris_core::effects::{TimerFired, TimerHandle, TimerPurpose};
use stellaris_core::TokenId;
use stellaris_testkit::{CeremonyHarness, ScriptedWallet};

fn id(symbol: &str) -> TokenId {
    TokenId::from(symbol)
}

/// Harness moved to `stage` along the BTC to APT path
fn harness_at(stage: CeremonyStage) -> CeremonyHarness {
    let mut h = CeremonyHarness::new();
    let path = [
        CeremonyStage::AwaitingGiveChoice,
        CeremonyStage::RetractingGive,
        CeremonyStage::AwaitingReceiveChoice,
        CeremonyStage::PresentingReceive,
        CeremonyStage::Complete,
    ];
    for next in path {
        if h.stage() == stage {
            break;
        }
        match next {
            CeremonyStage::AwaitingGiveChoice => h.connect().unwrap(),
            CeremonyStage::RetractingGive => h.pick_give("BTC").unwrap(),
            CeremonyStage::AwaitingReceiveChoice => h.advance_ms(900).unwrap().remove(0),
            CeremonyStage::PresentingReceive => h.pick_receive("APT").unwrap(),
            _ => h.advance_ms(1100).unwrap().remove(0),
        };
    }
    assert_eq!(h.stage(), stage);
    h
}

#[test]
fn test_btc_to_apt_completes() {
    let mut h = CeremonyHarness::new();

    h.connect().unwrap();
    assert_eq!(h.stage(), CeremonyStage::AwaitingGiveChoice);
    assert!(h.state().wallet_connected());

    h.pick_give("BTC").unwrap();
    assert_eq!(h.stage(), CeremonyStage::RetractingGive);
    assert_eq!(h.view().panel, None);

    h.advance_ms(900).unwrap();
    assert_eq!(h.stage(), CeremonyStage::AwaitingReceiveChoice);
    let view = h.view();
    assert_eq!(view.panel, Some(Panel::ReceivePicker));
    assert!(view
        .receive_options
        .iter()
        .any(|o| o.id == id("BTC") && o.disabled));

    h.pick_receive("APT").unwrap();
    assert_eq!(h.stage(), CeremonyStage::PresentingReceive);

    h.advance_ms(1100).unwrap();
    assert_eq!(h.stage(), CeremonyStage::Complete);
    assert_eq!(h.state().given_token(), Some(&id("BTC")));
    assert_eq!(h.state().received_token(), Some(&id("APT")));
    assert_eq!(h.timers().pending_count(), 0);

    let summary = h.view().summary.unwrap();
    assert_eq!(summary.headline(), "You gave BTC and received APT");
}

#[test]
fn test_eth_duplicate_receive_rejected() {
    let mut h = CeremonyHarness::new();
    h.connect().unwrap();
    h.pick_give("ETH").unwrap();
    h.advance_ms(900).unwrap();

    let before = h.state().clone();
    let disposition = h.pick_receive("ETH").unwrap();
    assert_eq!(
        disposition,
        Disposition::Rejected(RejectReason::DuplicateToken(id("ETH")))
    );
    assert_eq!(h.stage(), CeremonyStage::AwaitingReceiveChoice);
    assert_eq!(h.state().received_token(), None);
    assert_eq!(h.state(), &before);
}

#[test]
fn test_retract_fires_exactly_once() {
    let mut h = harness_at(CeremonyStage::RetractingGive);

    assert!(h.advance_ms(899).unwrap().is_empty());
    assert_eq!(h.stage(), CeremonyStage::RetractingGive);

    let fired = h.advance_ms(1).unwrap();
    assert_eq!(
        fired,
        vec![Disposition::Advanced {
            from: CeremonyStage::RetractingGive,
            to: CeremonyStage::AwaitingReceiveChoice
        }]
    );

    // Only the fade timer remains, and nothing else advances the stage
    assert!(h.timers().is_pending(TimerPurpose::CoinFade));
    assert!(!h.timers().is_pending(TimerPurpose::StageAdvance));
    h.advance_ms(100_000).unwrap();
    assert_eq!(h.stage(), CeremonyStage::AwaitingReceiveChoice);
}

#[test]
fn test_pick_before_fade_prevents_fade() {
    let mut h = harness_at(CeremonyStage::AwaitingReceiveChoice);
    h.advance_ms(3999).unwrap();
    assert!(h.state().secondary_coin_visible());

    h.pick_receive("USDC").unwrap();
    assert!(!h.timers().is_pending(TimerPurpose::CoinFade));

    let fired = h.settle().unwrap();
    assert_eq!(fired.len(), 1);
    assert_eq!(h.stage(), CeremonyStage::Complete);
    assert!(h
        .history()
        .iter()
        .all(|d| *d != Disposition::Updated));
}

#[test]
fn test_fade_hides_coin_after_delay() {
    let mut h = harness_at(CeremonyStage::AwaitingReceiveChoice);
    let fired = h.advance_ms(4000).unwrap();
    assert_eq!(fired, vec![Disposition::Updated]);
    assert!(!h.state().secondary_coin_visible());
    assert_eq!(h.view().pose.right_coin.keyframe.opacity, 0.0);
    assert_eq!(h.stage(), CeremonyStage::AwaitingReceiveChoice);
}

#[test]
fn test_reset_from_every_stage() {
    for &stage in CeremonyStage::all() {
        let mut h = harness_at(stage);
        let disposition = h.reset().unwrap();

        if stage == CeremonyStage::AwaitingWallet {
            assert_eq!(
                disposition,
                Disposition::Ignored(IgnoreReason::AlreadyFresh)
            );
            assert_eq!(h.state().ceremony(), 1);
        } else {
            assert_eq!(
                disposition,
                Disposition::Advanced {
                    from: stage,
                    to: CeremonyStage::AwaitingWallet
                }
            );
            assert_eq!(h.state().ceremony(), 2);
        }

        assert!(h.state().is_fresh());
        assert_eq!(h.state().given_token(), None);
        assert_eq!(h.state().received_token(), None);
        assert_eq!(h.timers().pending_count(), 0, "timers left after reset from {stage:?}");

        h.advance_ms(10_000).unwrap();
        assert_eq!(h.stage(), CeremonyStage::AwaitingWallet);
    }
}

#[test]
fn test_stale_timer_after_reset_is_discarded() {
    let mut h = harness_at(CeremonyStage::PresentingReceive);
    let live = h.machine().live_timer(TimerPurpose::StageAdvance).unwrap();
    h.reset().unwrap();

    let disposition = h
        .inject_timer(TimerFired {
            purpose: TimerPurpose::StageAdvance,
            handle: live,
        })
        .unwrap();
    assert_eq!(disposition, Disposition::Ignored(IgnoreReason::StaleTimer));
    assert_eq!(h.stage(), CeremonyStage::AwaitingWallet);

    let forged = TimerFired {
        purpose: TimerPurpose::CoinFade,
        handle: TimerHandle::from_raw(9_999),
    };
    assert_eq!(
        h.inject_timer(forged).unwrap(),
        Disposition::Ignored(IgnoreReason::StaleTimer)
    );
}

#[test]
fn test_declined_wallet_then_retry() {
    let mut h = CeremonyHarness::new().with_wallet(ScriptedWallet::with_script([false], true));

    assert_eq!(
        h.connect().unwrap(),
        Disposition::Rejected(RejectReason::WalletDeclined)
    );
    assert_eq!(h.stage(), CeremonyStage::AwaitingWallet);
    assert!(!h.state().wallet_connected());

    h.connect().unwrap();
    assert_eq!(h.stage(), CeremonyStage::AwaitingGiveChoice);
    assert_eq!(h.wallet().attempts(), 2);
}

#[test]
fn test_out_of_stage_intents_are_ignored() {
    let mut h = CeremonyHarness::new();
    assert_eq!(
        h.pick_give("BTC").unwrap(),
        Disposition::Ignored(IgnoreReason::OutOfStage)
    );

    let mut h = harness_at(CeremonyStage::RetractingGive);
    assert_eq!(
        h.pick_receive("APT").unwrap(),
        Disposition::Ignored(IgnoreReason::OutOfStage)
    );
    assert_eq!(
        h.pick_give("ETH").unwrap(),
        Disposition::Ignored(IgnoreReason::OutOfStage)
    );
    assert_eq!(h.state().given_token(), Some(&id("BTC")));
    assert!(h.opened_urls().is_empty());
}

#[test]
fn test_explorer_link_from_summary() {
    let mut h = harness_at(CeremonyStage::Complete);
    assert_eq!(h.view_on_explorer().unwrap(), Disposition::Delegated);
    assert_eq!(
        h.opened_urls(),
        vec!["https://explorer.aptoslabs.com/?network=mainnet".to_string()]
    );
    assert_eq!(h.stage(), CeremonyStage::Complete);
}

#[test]
fn test_custom_timings() {
    let ctx = CeremonyContext::standard()
        .with_timings(StageTimings {
            retract_ms: 10,
            coin_fade_ms: 20,
            present_ms: 30,
        })
        .unwrap();
    let mut h = CeremonyHarness::with_context(ctx);
    h.connect().unwrap();
    h.pick_give("APT").unwrap();
    h.advance_ms(10).unwrap();
    assert_eq!(h.stage(), CeremonyStage::AwaitingReceiveChoice);
    h.pick_receive("BTC").unwrap();
    h.advance_ms(30).unwrap();
    assert_eq!(h.stage(), CeremonyStage::Complete);

    assert_matches!(
        CeremonyContext::standard().with_timings(StageTimings::uniform(0)),
        Err(_)
    );
}

#[test]
fn test_ceremonies_are_numbered() {
    let mut h = harness_at(CeremonyStage::Complete);
    h.reset().unwrap();
    h.connect().unwrap();
    h.pick_give("USDC").unwrap();
    h.reset().unwrap();
    assert_eq!(h.view().ceremony, 3);
}
