//! Property-based tests for Tab Manager operations.
//!
//! For any sequence of opens, closes, reopens and switches, the strip is never
//! empty once a tab exists, exactly one open tab is active, and tab counts
//! follow the close/reopen rules.

use gove::engine::headless::HeadlessEngine;
use gove::managers::session_store::SessionState;
use gove::managers::tab_manager::{TabManager, TabManagerTrait};
use gove::types::settings::ShellSettings;
use gove::types::tab::TabId;
use proptest::prelude::*;

/// Operations that can be performed on the TabManager.
#[derive(Debug, Clone)]
enum TabOp {
    Open,
    Close(usize), // index into the current strip, modulo its length
    CloseStale,
    Reopen,
    Activate(usize),
    TogglePrivate,
}

/// Strategy for generating a sequence of tab operations.
fn arb_tab_ops() -> impl Strategy<Value = Vec<TabOp>> {
    prop::collection::vec(
        prop_oneof![
            3 => Just(TabOp::Open),
            3 => (0..20usize).prop_map(TabOp::Close),
            1 => Just(TabOp::CloseStale),
            2 => Just(TabOp::Reopen),
            2 => (0..20usize).prop_map(TabOp::Activate),
            1 => Just(TabOp::TogglePrivate),
        ],
        1..60,
    )
}

fn new_manager() -> TabManager<HeadlessEngine> {
    TabManager::new(HeadlessEngine::new(), SessionState::new(), ShellSettings::default())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn tab_count_follows_close_and_reopen_rules(ops in arb_tab_ops()) {
        let mut manager = new_manager();
        manager.open_tab("https://start.test/", "Start");
        let mut expected: usize = 1;
        let mut buffered = false;

        for op in &ops {
            match op {
                TabOp::Open => {
                    manager.new_tab();
                    expected += 1;
                }
                TabOp::Close(i) => {
                    let id = manager.tab_at(i % manager.tab_count()).unwrap();
                    let closed = manager.close_tab(id);
                    prop_assert_eq!(closed, expected > 1);
                    if closed {
                        expected -= 1;
                        buffered = true;
                    }
                }
                TabOp::CloseStale => {
                    prop_assert!(!manager.close_tab(TabId::new()));
                }
                TabOp::Reopen => {
                    let reopened = manager.reopen_last_closed();
                    prop_assert_eq!(reopened.is_some(), buffered);
                    if buffered {
                        expected += 1;
                        buffered = false;
                    }
                }
                TabOp::Activate(i) => {
                    let id = manager.tab_at(i % manager.tab_count()).unwrap();
                    prop_assert!(manager.set_active(id).is_ok());
                    prop_assert_eq!(manager.active_tab().unwrap().id, id);
                }
                TabOp::TogglePrivate => {
                    manager.toggle_global_private_mode();
                }
            }
            manager.pump();
            prop_assert_eq!(manager.tab_count(), expected);
        }
    }

    #[test]
    fn exactly_one_open_tab_is_active(ops in arb_tab_ops()) {
        let mut manager = new_manager();
        manager.open_tab("https://start.test/", "Start");

        for op in &ops {
            match op {
                TabOp::Open => { manager.new_tab(); }
                TabOp::Close(i) => {
                    let id = manager.tab_at(i % manager.tab_count()).unwrap();
                    manager.close_tab(id);
                }
                TabOp::CloseStale => { manager.close_tab(TabId::new()); }
                TabOp::Reopen => { manager.reopen_last_closed(); }
                TabOp::Activate(i) => {
                    let id = manager.tab_at(i % manager.tab_count()).unwrap();
                    manager.set_active(id).unwrap();
                }
                TabOp::TogglePrivate => { manager.toggle_global_private_mode(); }
            }
            manager.pump();

            prop_assert!(manager.tab_count() >= 1);
            let active = manager.active_tab();
            prop_assert!(active.is_some());
            let active = active.unwrap();
            let tabs = manager.tabs();
            prop_assert_eq!(tabs.iter().filter(|t| t.id == active.id).count(), 1);
            let index = manager.active_index().unwrap();
            prop_assert_eq!(tabs[index].id, active.id);
        }
    }

    #[test]
    fn tab_ids_stay_unique(ops in arb_tab_ops()) {
        let mut manager = new_manager();
        manager.open_tab("https://start.test/", "Start");

        for op in &ops {
            match op {
                TabOp::Open => { manager.new_tab(); }
                TabOp::Close(i) => {
                    let id = manager.tab_at(i % manager.tab_count()).unwrap();
                    manager.close_tab(id);
                }
                TabOp::Reopen => { manager.reopen_last_closed(); }
                _ => {}
            }
        }

        let mut ids: Vec<TabId> = manager.tabs().iter().map(|t| t.id).collect();
        let total = ids.len();
        ids.sort_by_key(|id| id.to_string());
        ids.dedup();
        prop_assert_eq!(ids.len(), total);
    }
}
