mod common;

use common::{connect_call, edit_call, get_call, Behavior, RecordingConnector, SwitchCall};
use psvm_core::cisco::{snippets, NexusPlugin};
use psvm_core::config::DriverConfig;
use psvm_core::error::PsvmError;
use psvm_core::interface::InterfaceKind;
use psvm_core::model::Network;
use psvm_core::plugin::SwitchPlugin;
use std::collections::BTreeSet;
use std::sync::Arc;

const SWITCH_IP: &str = "10.17.0.2";
const USERNAME: &str = "admin";
const PASSWORD: &str = "secret";

fn plugin_with(connector: Arc<RecordingConnector>) -> NexusPlugin {
    NexusPlugin::with_connector(
        DriverConfig::new(SWITCH_IP, USERNAME, PASSWORD),
        BTreeSet::from([1]),
        connector,
    )
}

fn networks(vlans: &[u16]) -> Vec<Network> {
    vlans.iter().map(|&vlan| Network { vlan }).collect()
}

// Scenario: adding one VLAN runs the full create/activate/no-shutdown/trunk
// sequence inside a single login.
#[test]
fn add_vlan_issues_create_activate_noshutdown_trunk() {
    let connector = RecordingConnector::new();
    let plugin = plugin_with(connector.clone());

    plugin.add_vlan_to_switch("po101", 777).unwrap();

    assert_eq!(
        connector.calls(),
        vec![
            connect_call(SWITCH_IP, USERNAME, PASSWORD),
            edit_call(snippets::create_vlan("777")),
            edit_call(snippets::vlan_active("777")),
            edit_call(snippets::vlan_no_shutdown("777")),
            edit_call(snippets::trunk_add(InterfaceKind::PortChannel, "101", "777")),
            SwitchCall::CloseSession,
        ]
    );
}

// Scenario: deleting a VLAN only removes it from this trunk; no global
// `no vlan` is issued.
#[test]
fn delete_vlan_only_untrunks() {
    let connector = RecordingConnector::new();
    let plugin = plugin_with(connector.clone());

    plugin.delete_vlan_from_switch("po101", 777).unwrap();

    assert_eq!(
        connector.calls(),
        vec![
            connect_call(SWITCH_IP, USERNAME, PASSWORD),
            edit_call(snippets::trunk_remove(InterfaceKind::PortChannel, "101", "777")),
            SwitchCall::CloseSession,
        ]
    );
}

#[test]
fn add_vlan_on_ethernet_interface_uses_ethernet_schema() {
    let connector = RecordingConnector::new();
    let plugin = plugin_with(connector.clone());

    plugin.add_vlan_to_switch("e1/3", 42).unwrap();

    let calls = connector.calls();
    assert_eq!(
        calls[4],
        edit_call(snippets::trunk_add(InterfaceKind::Ethernet, "1/3", "42"))
    );
}

#[test]
fn unparseable_interface_label_fails_before_connecting() {
    let connector = RecordingConnector::new();
    let plugin = plugin_with(connector.clone());

    let err = plugin.add_vlan_to_switch("vlan7", 42).unwrap_err();
    assert!(matches!(err, PsvmError::UnsupportedInterfaceKind(_)));
    assert!(connector.calls().is_empty());
}

// Scenario: a failed connect is a logged skip, not an error, and nothing is
// attempted against the switch.
#[test]
fn add_vlan_skips_when_driver_cannot_connect() {
    let connector = RecordingConnector::with_behavior(Behavior::default().with_connect_errors(
        vec![PsvmError::ConnectionError("no route to host".to_string())],
    ));
    let plugin = plugin_with(connector.clone());

    plugin.add_vlan_to_switch("po101", 777).unwrap();

    assert_eq!(connector.connect_attempts(), 1);
    assert_eq!(connector.close_count(), 0);
    assert_eq!(connector.calls().len(), 1);
}

// Scenario: sync against present={134,137}, expected={111,134,138},
// keep={1} provisions 111,138 and removes 137, all in one session.
#[test]
fn sync_applies_minimal_diff() {
    let connector = RecordingConnector::with_behavior(
        Behavior::default().with_get_reply("running-config", common::SHOW_RUN_INT_REPLY),
    );
    let plugin = plugin_with(connector.clone());

    plugin.sync("po101", &networks(&[111, 134, 138])).unwrap();

    assert_eq!(
        connector.calls(),
        vec![
            connect_call(SWITCH_IP, USERNAME, PASSWORD),
            get_call(snippets::show_running_interface("port-channel101")),
            edit_call(snippets::create_vlan("111,138")),
            edit_call(snippets::vlan_active("111,138")),
            edit_call(snippets::vlan_no_shutdown("111,138")),
            edit_call(snippets::trunk_add(InterfaceKind::PortChannel, "101", "111,138")),
            edit_call(snippets::trunk_remove(InterfaceKind::PortChannel, "101", "137")),
            SwitchCall::CloseSession,
        ]
    );
}

// Scenario: the keep set is never removed, but a kept VLAN that is also
// expected is provisioned like any other.
#[test]
fn sync_never_removes_keep_vlans() {
    let connector = RecordingConnector::with_behavior(
        Behavior::default().with_get_reply(
            "running-config",
            "<rpc-reply><data>\n switchport trunk allowed vlan 1,134,137\n</data></rpc-reply>",
        ),
    );
    let plugin = plugin_with(connector.clone());

    plugin.sync("po101", &networks(&[134])).unwrap();

    // 1 survives via keep; 137 goes; nothing is missing.
    assert_eq!(
        connector.calls(),
        vec![
            connect_call(SWITCH_IP, USERNAME, PASSWORD),
            get_call(snippets::show_running_interface("port-channel101")),
            edit_call(snippets::trunk_remove(InterfaceKind::PortChannel, "101", "137")),
            SwitchCall::CloseSession,
        ]
    );
}

#[test]
fn sync_with_no_diff_only_reads() {
    let connector = RecordingConnector::with_behavior(
        Behavior::default().with_get_reply("running-config", common::SHOW_RUN_INT_REPLY),
    );
    let plugin = plugin_with(connector.clone());

    plugin.sync("po101", &networks(&[134, 137])).unwrap();

    assert_eq!(
        connector.calls(),
        vec![
            connect_call(SWITCH_IP, USERNAME, PASSWORD),
            get_call(snippets::show_running_interface("port-channel101")),
            SwitchCall::CloseSession,
        ]
    );
}

// Scenario: a swallowable activation error is logged and sync carries on
// through no-shutdown and trunk-add.
#[test]
fn sync_swallows_known_activation_errors() {
    let connector = RecordingConnector::with_behavior(
        Behavior::default()
            .with_get_reply("running-config", common::SHOW_RUN_INT_REPLY)
            .with_edit_error("<state>", "VLAN with the same name exists"),
    );
    let plugin = plugin_with(connector.clone());

    plugin.sync("po101", &networks(&[111, 134, 138])).unwrap();

    let calls = connector.calls();
    assert_eq!(calls.len(), 8);
    assert_eq!(
        calls[4],
        edit_call(snippets::vlan_no_shutdown("111,138"))
    );
    assert_eq!(*calls.last().unwrap(), SwitchCall::CloseSession);
}

// Scenario: an activation error outside the swallowable list aborts the
// sync, and the session is still closed.
#[test]
fn sync_propagates_unknown_activation_errors() {
    let connector = RecordingConnector::with_behavior(
        Behavior::default()
            .with_get_reply("running-config", common::SHOW_RUN_INT_REPLY)
            .with_edit_error("<state>", "Permission denied"),
    );
    let plugin = plugin_with(connector.clone());

    let err = plugin.sync("po101", &networks(&[111, 134, 138])).unwrap_err();
    assert!(matches!(err, PsvmError::ConfigFailed { .. }));

    let calls = connector.calls();
    // create and the failing activate were issued; no-shutdown and trunk-add
    // were not, and close-session still happened.
    assert_eq!(calls[2], edit_call(snippets::create_vlan("111,138")));
    assert_eq!(calls[3], edit_call(snippets::vlan_active("111,138")));
    assert_eq!(*calls.last().unwrap(), SwitchCall::CloseSession);
    assert_eq!(calls.len(), 5);
}

// Scenario: a large non-contiguous diff is batched into requests of at most
// 400 range tokens, all within the same session.
#[test]
fn sync_chunks_large_vlan_lists() {
    let connector = RecordingConnector::with_behavior(
        Behavior::default().with_get_reply("running-config", common::EMPTY_DATA_REPLY),
    );
    let plugin = plugin_with(connector.clone());

    // 450 odd VLANs compress to 450 singleton tokens.
    let vlans: Vec<u16> = (0..450).map(|i| (2 * i + 3) as u16).collect();
    plugin.sync("po101", &networks(&vlans)).unwrap();

    let first_expr: String = vlans[..400]
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",");
    let second_expr: String = vlans[400..]
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",");

    assert_eq!(
        connector.calls(),
        vec![
            connect_call(SWITCH_IP, USERNAME, PASSWORD),
            get_call(snippets::show_running_interface("port-channel101")),
            edit_call(snippets::create_vlan(&first_expr)),
            edit_call(snippets::vlan_active(&first_expr)),
            edit_call(snippets::vlan_no_shutdown(&first_expr)),
            edit_call(snippets::trunk_add(InterfaceKind::PortChannel, "101", &first_expr)),
            edit_call(snippets::create_vlan(&second_expr)),
            edit_call(snippets::vlan_active(&second_expr)),
            edit_call(snippets::vlan_no_shutdown(&second_expr)),
            edit_call(snippets::trunk_add(InterfaceKind::PortChannel, "101", &second_expr)),
            SwitchCall::CloseSession,
        ]
    );
}
