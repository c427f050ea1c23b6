//! Async runtime tests with paused tokio time

use std::sync::Arc;
use std::time::Duration;

use stellaris_app::{CeremonyContext, CeremonyRuntime, CeremonyStage, CeremonyView, Panel};
use stellaris_core::TokenId;
use stellaris_testkit::{RecordingExplorer, ScriptedWallet};

fn ctx() -> Arc<CeremonyContext> {
    Arc::new(CeremonyContext::standard())
}

fn at(stage: CeremonyStage) -> impl FnMut(&CeremonyView) -> bool {
    move |view| view.stage == stage
}

#[tokio::test(start_paused = true)]
async fn test_runtime_completes_with_real_timers() {
    let explorer = RecordingExplorer::new();
    let (runtime, handle) = CeremonyRuntime::new(ctx(), ScriptedWallet::accepting(), explorer.clone());
    let task = tokio::spawn(runtime.run());

    let started = tokio::time::Instant::now();
    handle.connect_wallet().unwrap();
    handle.pick_give("BTC").unwrap();
    handle
        .wait_for(at(CeremonyStage::AwaitingReceiveChoice))
        .await
        .unwrap();
    assert!(started.elapsed() >= Duration::from_millis(900));

    handle.pick_receive("APT").unwrap();
    let view = handle.wait_for(at(CeremonyStage::Complete)).await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(2000));
    assert!(started.elapsed() < Duration::from_millis(4000));
    assert_eq!(view.panel, Some(Panel::Summary));
    assert_eq!(view.given_token, Some(TokenId::from("BTC")));
    assert_eq!(view.received_token, Some(TokenId::from("APT")));

    handle.view_on_explorer().unwrap();
    handle.shutdown().unwrap();
    task.await.unwrap().unwrap();
    assert_eq!(explorer.opened().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_runtime_rejects_duplicate_receive() {
    let (runtime, handle) =
        CeremonyRuntime::new(ctx(), ScriptedWallet::accepting(), RecordingExplorer::new());
    let task = tokio::spawn(runtime.run());

    handle.connect_wallet().unwrap();
    handle.pick_give("ETH").unwrap();
    handle
        .wait_for(at(CeremonyStage::AwaitingReceiveChoice))
        .await
        .unwrap();

    handle.pick_receive("ETH").unwrap();
    tokio::time::sleep(Duration::from_millis(2000)).await;
    let view = handle.view();
    assert_eq!(view.stage, CeremonyStage::AwaitingReceiveChoice);
    assert_eq!(view.received_token, None);

    handle.shutdown().unwrap();
    task.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_runtime_reset_cancels_pending_advance() {
    let (runtime, handle) =
        CeremonyRuntime::new(ctx(), ScriptedWallet::accepting(), RecordingExplorer::new());
    let task = tokio::spawn(runtime.run());

    handle.connect_wallet().unwrap();
    handle.pick_give("USDC").unwrap();
    handle.reset().unwrap();
    let view = handle.wait_for(|v| v.ceremony == 2).await.unwrap();
    assert_eq!(view.stage, CeremonyStage::AwaitingWallet);

    tokio::time::sleep(Duration::from_secs(10)).await;
    let view = handle.view();
    assert_eq!(view.stage, CeremonyStage::AwaitingWallet);
    assert_eq!(view.given_token, None);

    drop(handle);
    task.await.unwrap().unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_runtime_wallet_decline() {
    let wallet = ScriptedWallet::with_script([false], true);
    let (runtime, handle) = CeremonyRuntime::new(ctx(), wallet.clone(), RecordingExplorer::new());
    let task = tokio::spawn(runtime.run());

    handle.connect_wallet().unwrap();
    handle.connect_wallet().unwrap();
    let view = handle
        .wait_for(at(CeremonyStage::AwaitingGiveChoice))
        .await
        .unwrap();
    assert!(view.wallet_connected);
    assert_eq!(wallet.attempts(), 2);

    handle.shutdown().unwrap();
    task.await.unwrap().unwrap();
}
