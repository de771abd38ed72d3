use chatkeep::error::ChatError;
use chatkeep::models::{Role, DEFAULT_CHAT_TITLE};
use chatkeep::session::{SessionContext, SessionManager};
use chatkeep::store::{ChatStore, SqliteChatStore};
use std::collections::HashSet;
use tempfile::TempDir;

fn open_store() -> (TempDir, SqliteChatStore) {
    let temp_dir = TempDir::new().unwrap();
    let store = SqliteChatStore::open(temp_dir.path().join("chatbot.db")).unwrap();
    (temp_dir, store)
}

#[test]
fn test_create_chat_defaults() {
    let (_dir, store) = open_store();

    let chat_id = store.create_chat("alice").unwrap();
    let chat = store.get_chat(&chat_id).unwrap().unwrap();

    assert_eq!(chat.owner, "alice");
    assert_eq!(chat.title, DEFAULT_CHAT_TITLE);
    assert_eq!(chat.summary, None);
    assert_eq!(store.chat_title(&chat_id).unwrap(), DEFAULT_CHAT_TITLE);
}

#[test]
fn test_chats_are_scoped_to_owner() {
    let (_dir, store) = open_store();

    let a1 = store.create_chat("alice").unwrap();
    let b1 = store.create_chat("bob").unwrap();
    let a2 = store.create_chat("alice").unwrap();

    let alice: Vec<String> = store
        .list_chats("alice")
        .unwrap()
        .into_iter()
        .map(|c| c.chat_id)
        .collect();
    assert_eq!(alice, vec![a1, a2]);

    let bob: Vec<String> = store
        .list_chats("bob")
        .unwrap()
        .into_iter()
        .map(|c| c.chat_id)
        .collect();
    assert_eq!(bob, vec![b1]);
}

#[test]
fn test_delete_leaves_remaining_chats_and_no_orphans() {
    let (_dir, store) = open_store();

    let ids: Vec<String> = (0..6).map(|_| store.create_chat("alice").unwrap()).collect();
    for (i, id) in ids.iter().enumerate() {
        store.append_message(id, Role::User, &format!("message {}", i)).unwrap();
        store.append_message(id, Role::Assistant, "reply").unwrap();
    }

    let deleted: HashSet<&String> = [&ids[0], &ids[3], &ids[5]].into_iter().collect();
    for id in &deleted {
        store.delete_chat(id).unwrap();
    }

    let remaining: HashSet<String> = store
        .list_chats("alice")
        .unwrap()
        .into_iter()
        .map(|c| c.chat_id)
        .collect();
    let expected: HashSet<String> = ids
        .iter()
        .filter(|id| !deleted.contains(id))
        .cloned()
        .collect();
    assert_eq!(remaining, expected);

    for id in &deleted {
        assert!(store.list_messages(id).unwrap().is_empty());
        assert!(store.get_chat(id).unwrap().is_none());
    }
    for id in &expected {
        assert_eq!(store.list_messages(id).unwrap().len(), 2);
    }
}

#[test]
fn test_messages_round_trip_in_order() {
    let (_dir, store) = open_store();
    let chat_id = store.create_chat("alice").unwrap();
    let sent = vec![
        (Role::User, "first"),
        (Role::Assistant, "second\nwith a newline"),
        (Role::User, "third 🚀"),
        (Role::Assistant, ""),
        (Role::User, "fifth"),
    ];

    for (role, content) in &sent {
        store.append_message(&chat_id, *role, content).unwrap();
    }

    let stored = store.list_messages(&chat_id).unwrap();
    let read_back: Vec<(Role, &str)> = stored.iter().map(|m| (m.role, m.content.as_str())).collect();
    assert_eq!(read_back, sent);
    assert!(stored.windows(2).all(|w| w[0].id < w[1].id));
    assert!(stored.iter().all(|m| m.chat_id == chat_id));
}

#[test]
fn test_update_summary_overwrites() {
    let (_dir, store) = open_store();
    let chat_id = store.create_chat("alice").unwrap();

    store.update_summary(&chat_id, "- one").unwrap();
    store.update_summary(&chat_id, "- two").unwrap();

    let chat = store.get_chat(&chat_id).unwrap().unwrap();
    assert_eq!(chat.summary.as_deref(), Some("- two"));
}

#[test]
fn test_missing_chat_errors() {
    let (_dir, store) = open_store();

    assert!(matches!(store.chat_title("nope"), Err(ChatError::ChatNotFound(_))));
    assert!(matches!(store.rename_chat("nope", "x"), Err(ChatError::ChatNotFound(_))));
    assert!(matches!(store.update_summary("nope", "x"), Err(ChatError::ChatNotFound(_))));
}

#[test]
fn test_duplicate_title_check_is_scoped() {
    let (_dir, store) = open_store();
    let a1 = store.create_chat("alice").unwrap();
    store.rename_chat(&a1, "Trip").unwrap();
    store.create_chat("bob").unwrap();

    assert!(store.is_duplicate_title("alice", "Trip", None).unwrap());
    assert!(!store.is_duplicate_title("alice", "Trip", Some(&a1)).unwrap());
    assert!(!store.is_duplicate_title("bob", "Trip", None).unwrap());
}

#[test]
fn test_rename_rejects_duplicate_and_accepts_unique() {
    let (_dir, store) = open_store();
    let sessions = SessionManager::new(&store);
    let mut ctx = SessionContext::login("alice").unwrap();

    let first = sessions.new_chat(&mut ctx).unwrap();
    let second = sessions.new_chat(&mut ctx).unwrap();
    sessions.rename_chat(&ctx, &first, "Recipes").unwrap();

    let err = sessions.rename_chat(&ctx, &second, "Recipes").unwrap_err();
    assert!(matches!(err, ChatError::DuplicateTitle(_)));
    assert_eq!(store.chat_title(&second).unwrap(), DEFAULT_CHAT_TITLE);

    sessions.rename_chat(&ctx, &second, "  Travel  ").unwrap();
    assert_eq!(store.chat_title(&second).unwrap(), "Travel");

    // Renaming to its own title is not a collision
    sessions.rename_chat(&ctx, &first, "Recipes").unwrap();
}

#[test]
fn test_rename_rejects_empty_title() {
    let (_dir, store) = open_store();
    let sessions = SessionManager::new(&store);
    let mut ctx = SessionContext::login("alice").unwrap();
    let chat_id = sessions.new_chat(&mut ctx).unwrap();

    let err = sessions.rename_chat(&ctx, &chat_id, "   ").unwrap_err();

    assert!(matches!(err, ChatError::EmptyTitle));
    assert!(err.is_validation());
    assert!(matches!(store.rename_chat(&chat_id, ""), Err(ChatError::EmptyTitle)));
}

#[test]
fn test_same_title_allowed_for_different_owners() {
    let (_dir, store) = open_store();
    let sessions = SessionManager::new(&store);
    let mut alice = SessionContext::login("alice").unwrap();
    let mut bob = SessionContext::login("bob").unwrap();

    let a = sessions.new_chat(&mut alice).unwrap();
    let b = sessions.new_chat(&mut bob).unwrap();
    sessions.rename_chat(&alice, &a, "Notes").unwrap();
    sessions.rename_chat(&bob, &b, "Notes").unwrap();
}

#[test]
fn test_login_trims_and_rejects_blank_names() {
    assert_eq!(SessionContext::login("  alice ").unwrap().user(), "alice");
    assert!(matches!(SessionContext::login("  "), Err(ChatError::EmptyUsername)));
}

#[test]
fn test_resolve_creates_first_chat() {
    let (_dir, store) = open_store();
    let sessions = SessionManager::new(&store);
    let mut ctx = SessionContext::login("alice").unwrap();

    let chats = sessions.resolve(&mut ctx).unwrap();

    assert_eq!(chats.len(), 1);
    assert_eq!(ctx.current_chat_id(), Some(chats[0].chat_id.as_str()));

    // A second resolve must not create another chat
    let again = sessions.resolve(&mut ctx).unwrap();
    assert_eq!(again, chats);
}

#[test]
fn test_resolve_heals_after_out_of_band_delete() {
    let (_dir, store) = open_store();
    let sessions = SessionManager::new(&store);
    let mut ctx = SessionContext::login("alice").unwrap();

    let first = sessions.new_chat(&mut ctx).unwrap();
    let second = sessions.new_chat(&mut ctx).unwrap();
    assert_eq!(ctx.current_chat_id(), Some(second.as_str()));

    // Another process removes the chat being viewed
    store.delete_chat(&second).unwrap();

    sessions.resolve(&mut ctx).unwrap();
    assert_eq!(ctx.current_chat_id(), Some(first.as_str()));
}

#[test]
fn test_resolve_recreates_when_all_chats_deleted() {
    let (_dir, store) = open_store();
    let sessions = SessionManager::new(&store);
    let mut ctx = SessionContext::login("alice").unwrap();

    let only = sessions.current_chat(&mut ctx).unwrap();
    store.delete_chat(&only).unwrap();

    let chats = sessions.resolve(&mut ctx).unwrap();
    assert_eq!(chats.len(), 1);
    assert_ne!(chats[0].chat_id, only);
    assert_eq!(ctx.current_chat_id(), Some(chats[0].chat_id.as_str()));
}

#[test]
fn test_open_chat_of_other_user_is_not_found() {
    let (_dir, store) = open_store();
    let sessions = SessionManager::new(&store);
    let mut alice = SessionContext::login("alice").unwrap();
    let mut bob = SessionContext::login("bob").unwrap();
    let bobs_chat = sessions.new_chat(&mut bob).unwrap();
    let alices_chat = sessions.current_chat(&mut alice).unwrap();

    let err = sessions.open_chat(&mut alice, &bobs_chat).unwrap_err();

    assert!(matches!(err, ChatError::ChatNotFound(_)));
    assert_eq!(alice.current_chat_id(), Some(alices_chat.as_str()));
}
