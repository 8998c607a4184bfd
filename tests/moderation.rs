//! Group moderation reactor and antilink enforcement tests.

mod common;

use std::sync::Arc;

use common::{group_roster, test_config, text_message, FakeClient};
use warden::bot::Dispatcher;
use warden::client::{BotIdentity, RoleAction, RoleChangeEvent};
use warden::commands;
use warden::config::ModerationStrictness;
use warden::events::{LinkGuard, ModerationReactor};
use warden::store::Stores;
use warden::theme::ThemeManager;

const BOT_ID: &str = "42000000000@s.whatsapp.net";
const BOT_LID: &str = "90010020030@lid";
const ADMIN: &str = "33600000001@s.whatsapp.net";
const MEMBER: &str = "33600000002@s.whatsapp.net";
const GROUP: &str = "123456-789@g.us";

fn identity() -> BotIdentity {
    BotIdentity {
        id: BOT_ID.to_string(),
        lid: Some(BOT_LID.to_string()),
    }
}

async fn open_stores() -> (Arc<Stores>, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let stores = Arc::new(Stores::open(dir.path()).await.unwrap());
    (stores, dir)
}

fn promote_event(targets: &[&str]) -> RoleChangeEvent {
    RoleChangeEvent {
        group_id: GROUP.to_string(),
        participants: targets.iter().map(|t| t.to_string()).collect(),
        action: RoleAction::Promote,
    }
}

#[tokio::test]
async fn disabled_toggle_means_no_reaction() {
    let (stores, _dir) = open_stores().await;
    let client = FakeClient::new();
    client.set_metadata(group_roster(GROUP, &[(BOT_ID, true), (MEMBER, false)]));

    let reactor = ModerationReactor::new(client.clone(), stores, ModerationStrictness::Assume);
    reactor
        .handle(promote_event(&[MEMBER]), Some(identity()))
        .await
        .unwrap();

    assert!(client.role_calls.lock().is_empty());
    assert_eq!(client.outbound_count(), 0);
}

#[tokio::test]
async fn promotion_is_reversed_with_notice() {
    let (stores, _dir) = open_stores().await;
    stores
        .toggles
        .update(|t| t.antipromote.enable(GROUP))
        .await
        .unwrap();

    let client = FakeClient::new();
    client.set_metadata(group_roster(GROUP, &[(BOT_ID, true), (MEMBER, false)]));

    let reactor = ModerationReactor::new(client.clone(), stores, ModerationStrictness::Assume);
    reactor
        .handle(promote_event(&[MEMBER]), Some(identity()))
        .await
        .unwrap();

    let calls = client.role_calls.lock().clone();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, GROUP);
    assert_eq!(calls[0].1, vec![MEMBER.to_string()]);
    assert_eq!(calls[0].2, RoleAction::Demote);

    let texts = client.texts();
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("ANTI-PROMOTE"));
}

#[tokio::test]
async fn demotion_is_reversed() {
    let (stores, _dir) = open_stores().await;
    stores
        .toggles
        .update(|t| t.antidemote.enable(GROUP))
        .await
        .unwrap();

    let client = FakeClient::new();
    client.set_metadata(group_roster(GROUP, &[(BOT_ID, true), (ADMIN, false)]));

    let reactor = ModerationReactor::new(client.clone(), stores, ModerationStrictness::Assume);
    reactor
        .handle(
            RoleChangeEvent {
                group_id: GROUP.to_string(),
                participants: vec![ADMIN.to_string()],
                action: RoleAction::Demote,
            },
            Some(identity()),
        )
        .await
        .unwrap();

    let calls = client.role_calls.lock().clone();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].2, RoleAction::Promote);
    assert!(client.texts()[0].contains("ANTI-DEMOTE"));
}

#[tokio::test]
async fn bot_itself_is_never_compensated() {
    let (stores, _dir) = open_stores().await;
    stores
        .toggles
        .update(|t| t.antipromote.enable(GROUP))
        .await
        .unwrap();

    let client = FakeClient::new();
    client.set_metadata(group_roster(GROUP, &[(BOT_LID, true), (MEMBER, false)]));

    let reactor = ModerationReactor::new(client.clone(), stores, ModerationStrictness::Assume);
    // The roster lists the bot under its linked id.
    reactor
        .handle(promote_event(&[BOT_LID, MEMBER]), Some(identity()))
        .await
        .unwrap();

    let calls = client.role_calls.lock().clone();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1, vec![MEMBER.to_string()]);
}

#[tokio::test]
async fn non_admin_bot_stays_out() {
    let (stores, _dir) = open_stores().await;
    stores
        .toggles
        .update(|t| t.antipromote.enable(GROUP))
        .await
        .unwrap();

    let client = FakeClient::new();
    client.set_metadata(group_roster(GROUP, &[(BOT_ID, false), (MEMBER, false)]));

    let reactor = ModerationReactor::new(client.clone(), stores, ModerationStrictness::Assume);
    reactor
        .handle(promote_event(&[MEMBER]), Some(identity()))
        .await
        .unwrap();

    assert!(client.role_calls.lock().is_empty());
}

#[tokio::test]
async fn unmatched_identity_acts_in_assume_mode_only() {
    // The roster does not list the bot under either identity.
    let roster = group_roster(GROUP, &[(MEMBER, false), (ADMIN, true)]);

    for (strictness, expected_calls) in [
        (ModerationStrictness::Strict, 0),
        (ModerationStrictness::Assume, 1),
    ] {
        let (stores, _dir) = open_stores().await;
        stores
            .toggles
            .update(|t| t.antipromote.enable(GROUP))
            .await
            .unwrap();

        let client = FakeClient::new();
        client.set_metadata(roster.clone());

        let reactor = ModerationReactor::new(client.clone(), stores, strictness);
        reactor
            .handle(promote_event(&[MEMBER]), Some(identity()))
            .await
            .unwrap();

        assert_eq!(client.role_calls.lock().len(), expected_calls);
    }
}

#[tokio::test]
async fn antilink_deletes_and_warns() {
    let (stores, _dir) = open_stores().await;
    stores
        .toggles
        .update(|t| t.antilink.enable(GROUP))
        .await
        .unwrap();

    let client = FakeClient::new();
    client.set_metadata(group_roster(GROUP, &[(BOT_ID, true), (MEMBER, false)]));

    let guard = LinkGuard::new(client.clone(), stores);
    let msg = text_message(GROUP, Some(MEMBER), "join https://spam.example.org now");
    guard.inspect(&msg, Some(&identity())).await.unwrap();

    assert_eq!(client.deletions(), 1);
    let texts = client.texts();
    assert_eq!(texts.len(), 1);
    assert!(texts[0].contains("not allowed"));
}

#[tokio::test]
async fn antilink_ignores_clean_messages_and_direct_chats() {
    let (stores, _dir) = open_stores().await;
    stores
        .toggles
        .update(|t| t.antilink.enable(GROUP))
        .await
        .unwrap();

    let client = FakeClient::new();
    client.set_metadata(group_roster(GROUP, &[(BOT_ID, true), (MEMBER, false)]));

    let guard = LinkGuard::new(client.clone(), stores);
    guard
        .inspect(&text_message(GROUP, Some(MEMBER), "no links here"), Some(&identity()))
        .await
        .unwrap();
    guard
        .inspect(
            &text_message(MEMBER, None, "see https://example.org"),
            Some(&identity()),
        )
        .await
        .unwrap();

    assert_eq!(client.outbound_count(), 0);
}

#[tokio::test]
async fn invite_only_toggle_ignores_plain_links() {
    let (stores, _dir) = open_stores().await;
    stores
        .toggles
        .update(|t| t.antilink_whatsapp.enable(GROUP))
        .await
        .unwrap();

    let client = FakeClient::new();
    client.set_metadata(group_roster(GROUP, &[(BOT_ID, true), (MEMBER, false)]));

    let guard = LinkGuard::new(client.clone(), stores);
    guard
        .inspect(
            &text_message(GROUP, Some(MEMBER), "see https://example.org"),
            Some(&identity()),
        )
        .await
        .unwrap();
    assert_eq!(client.deletions(), 0);

    guard
        .inspect(
            &text_message(GROUP, Some(MEMBER), "join chat.whatsapp.com/AbC123"),
            Some(&identity()),
        )
        .await
        .unwrap();
    assert_eq!(client.deletions(), 1);
}

#[tokio::test]
async fn group_admin_can_arm_toggles_through_dispatch() {
    let dir = tempfile::tempdir().unwrap();
    let config = Arc::new(test_config(dir.path()));
    let stores = Arc::new(Stores::open(&config.data_dir).await.unwrap());
    let themes = Arc::new(ThemeManager::load(&config.theme_dir, &config.bot_theme));
    let client = FakeClient::new();
    client.set_metadata(group_roster(GROUP, &[(BOT_ID, true), (ADMIN, true), (MEMBER, false)]));

    let dispatcher = Arc::new(Dispatcher::new(
        client.clone(),
        Arc::clone(&stores),
        Arc::new(commands::default_registry()),
        themes,
        config,
    ));
    dispatcher.set_identity(identity());

    // An admin arms anti-promote.
    dispatcher
        .handle_message(text_message(GROUP, Some(ADMIN), ".antipromote on"))
        .await
        .unwrap();
    assert!(stores.toggles.load().await.antipromote.enabled(GROUP));

    // A plain member cannot.
    dispatcher
        .handle_message(text_message(GROUP, Some(MEMBER), ".antidemote on"))
        .await
        .unwrap();
    assert!(!stores.toggles.load().await.antidemote.enabled(GROUP));
    assert!(client
        .texts()
        .iter()
        .any(|t| t.contains("must be a group admin")));
}
