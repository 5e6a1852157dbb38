//! Provider synchronization against a shared registry.

mod common;

use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;

use common::ProbeProvider;

use cirrus::services::ScheduledAccounts;
use cirrus::{AccountCredentials, AgentRegistry, CredentialReloadHandler, ProviderSynchronizer};

const CLASSES: &[&str] = &["ImageAgent", "NetworkAgent", "KeyPairAgent"];

fn credentials() -> Vec<AccountCredentials> {
    vec![
        AccountCredentials::new("prod", "alicloud", ["cn-hangzhou", "cn-beijing"]),
        AccountCredentials::new("test", "alicloud", ["cn-hangzhou"]),
        AccountCredentials::new("hw", "huaweicloud", ["cn-north-4"]),
    ]
}

#[test]
fn concurrent_synchronization_registers_each_agent_once() {
    let registry = Arc::new(AgentRegistry::new());
    let sync = ProviderSynchronizer::new(
        Arc::new(ProbeProvider {
            id: "alicloud",
            classes: CLASSES,
        }),
        Arc::clone(&registry),
    );
    let creds = credentials();

    let reports = thread::scope(|scope| {
        let workers: Vec<_> = (0..8)
            .map(|_| scope.spawn(|| sync.synchronize(&creds)))
            .collect();
        workers
            .into_iter()
            .map(|w| w.join().unwrap())
            .collect::<Vec<_>>()
    });

    assert_eq!(registry.len(), 3 * CLASSES.len());
    let registered: usize = reports.iter().map(|r| r.registered.len()).sum();
    assert_eq!(registered, registry.len());
    assert_eq!(
        registry.scheduled_accounts("alicloud").accounts,
        ["prod", "test"].into_iter().map(String::from).collect::<BTreeSet<_>>()
    );
}

#[test]
fn repeated_reloads_are_idempotent() {
    let registry = Arc::new(AgentRegistry::new());
    let handler = CredentialReloadHandler::new(vec![
        ProviderSynchronizer::new(
            Arc::new(ProbeProvider {
                id: "alicloud",
                classes: CLASSES,
            }),
            Arc::clone(&registry),
        ),
        ProviderSynchronizer::new(
            Arc::new(ProbeProvider {
                id: "huaweicloud",
                classes: &["FlavorAgent"],
            }),
            Arc::clone(&registry),
        ),
    ]);

    handler.on_credentials_changed(&credentials());
    let first = registry.agent_types();
    assert_eq!(first.len(), 3 * CLASSES.len() + 1);
    assert!(first.contains("hw/cn-north-4/FlavorAgent"));

    let reports = handler.on_credentials_changed(&credentials());
    assert!(reports.iter().all(|r| r.registered.is_empty()));
    assert_eq!(registry.agent_types(), first);
}

#[test]
fn new_account_on_reload_adds_only_its_agents() {
    let registry = Arc::new(AgentRegistry::new());
    let sync = ProviderSynchronizer::new(
        Arc::new(ProbeProvider {
            id: "alicloud",
            classes: CLASSES,
        }),
        Arc::clone(&registry),
    );
    sync.synchronize(&credentials());

    let mut creds = credentials();
    creds.push(AccountCredentials::new("staging", "alicloud", ["cn-shanghai"]));
    let report = sync.synchronize(&creds);
    assert_eq!(report.registered.len(), CLASSES.len());
    assert!(report.registered.iter().all(|t| t.starts_with("staging/")));
    assert_eq!(report.skipped_accounts.len(), 2);
}

#[test]
fn removed_credentials_keep_their_agents() {
    let registry = Arc::new(AgentRegistry::new());
    let sync = ProviderSynchronizer::new(
        Arc::new(ProbeProvider {
            id: "alicloud",
            classes: CLASSES,
        }),
        Arc::clone(&registry),
    );
    sync.synchronize(&credentials());
    let before = registry.len();

    sync.synchronize(&[]);
    assert_eq!(registry.len(), before);

    assert!(registry.remove("test/cn-hangzhou/ImageAgent").is_some());
    assert_eq!(registry.len(), before - 1);
}

#[test]
fn stale_snapshot_never_duplicates() {
    let registry = Arc::new(AgentRegistry::new());
    let sync = ProviderSynchronizer::new(
        Arc::new(ProbeProvider {
            id: "alicloud",
            classes: CLASSES,
        }),
        Arc::clone(&registry),
    );
    let creds = credentials();
    sync.synchronize(&creds);

    let report = sync.synchronize_with(&creds, &ScheduledAccounts::default());
    assert!(report.registered.is_empty());
    assert_eq!(report.duplicates, 3 * CLASSES.len());
    assert_eq!(registry.len(), 3 * CLASSES.len());
}
