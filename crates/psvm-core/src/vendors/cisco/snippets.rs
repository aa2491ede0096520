//! NX-OS NETCONF request bodies.
//!
//! The `__XML__MODE_*` nesting follows the vendor's exec-configure schema.
//! The rendered strings, whitespace included, are part of the wire contract
//! with existing switch-reply fixtures; the tests below pin them literally.

use crate::interface::InterfaceKind;

/// Wrap an exec-configure body in the standard edit-config envelope.
fn exec_conf(inner: &str) -> String {
    format!(
        "
      <config xmlns:xc=\"urn:ietf:params:xml:ns:netconf:base:1.0\">
        <configure>
          <__XML__MODE__exec_configure>{}
          </__XML__MODE__exec_configure>
        </configure>
      </config>
",
        inner
    )
}

/// Create the VLAN(s) named by `vlan_expr` (a single id or a compressed
/// range expression).
pub fn create_vlan(vlan_expr: &str) -> String {
    exec_conf(&format!(
        "
            <vlan>
              <vlan-id-create-delete>
                <__XML__PARAM_value>{}</__XML__PARAM_value>
                <__XML__MODE_vlan>
                </__XML__MODE_vlan>
              </vlan-id-create-delete>
            </vlan>
",
        vlan_expr
    ))
}

/// Set the VLAN state to active. Issued immediately after create.
pub fn vlan_active(vlan_expr: &str) -> String {
    exec_conf(&format!(
        "
            <vlan>
              <vlan-id-create-delete>
                <__XML__PARAM_value>{}</__XML__PARAM_value>
                <__XML__MODE_vlan>
                  <state>
                    <vstate>active</vstate>
                  </state>
                </__XML__MODE_vlan>
              </vlan-id-create-delete>
            </vlan>
",
        vlan_expr
    ))
}

/// Clear the VLAN shutdown state. Issued immediately after activate.
pub fn vlan_no_shutdown(vlan_expr: &str) -> String {
    exec_conf(&format!(
        "
            <vlan>
              <vlan-id-create-delete>
                <__XML__PARAM_value>{}</__XML__PARAM_value>
                <__XML__MODE_vlan>
                  <no>
                    <shutdown/>
                  </no>
                </__XML__MODE_vlan>
              </vlan-id-create-delete>
            </vlan>
",
        vlan_expr
    ))
}

/// Delete the VLAN(s) globally on the switch.
pub fn no_vlan(vlan_expr: &str) -> String {
    exec_conf(&format!(
        "
            <no>
            <vlan>
              <vlan-id-create-delete>
                <__XML__PARAM_value>{}</__XML__PARAM_value>
              </vlan-id-create-delete>
            </vlan>
            </no>
",
        vlan_expr
    ))
}

fn trunk_allowed(
    kind: InterfaceKind,
    interface_id: &str,
    vlan_expr: &str,
    verb: &str,
    param: &str,
) -> String {
    let etype = kind.canonical_name();
    let mode = kind.xml_mode();
    exec_conf(&format!(
        "
          <interface>
            <{etype}>
              <interface>{interface_id}</interface>
              <__XML__MODE_{mode}>
                <switchport>
                  <trunk>
                    <allowed>
                      <vlan>
                        <{verb}>
                          <{param}>{vlan_expr}</{param}>
                        </{verb}>
                      </vlan>
                    </allowed>
                  </trunk>
                </switchport>
              </__XML__MODE_{mode}>
            </{etype}>
          </interface>
",
        etype = etype,
        interface_id = interface_id,
        mode = mode,
        verb = verb,
        param = param,
        vlan_expr = vlan_expr
    ))
}

/// Add `vlan_expr` to the trunk allowed list of one interface.
pub fn trunk_add(kind: InterfaceKind, interface_id: &str, vlan_expr: &str) -> String {
    trunk_allowed(kind, interface_id, vlan_expr, "add", "add-vlans")
}

/// Remove `vlan_expr` from the trunk allowed list of one interface.
pub fn trunk_remove(kind: InterfaceKind, interface_id: &str, vlan_expr: &str) -> String {
    trunk_allowed(kind, interface_id, vlan_expr, "remove", "remove-vlans")
}

/// Subtree filter requesting the running config of one interface.
pub fn show_running_interface(full_name: &str) -> String {
    format!(
        "
      <show xmlns=\"http://www.cisco.com/nxos:1.0:vlan_mgr_cli\">
        <running-config>
          <interface/>
            <interface>{}</interface>
        </running-config>
      </show>
",
        full_name
    )
}

/// Subtree filter requesting global spanning-tree instance usage.
pub fn show_span_usage() -> String {
    "
      <show xmlns=\"http://www.cisco.com/nxos:1.0:if_manager\">
        <spanning-tree>
          <internal>
            <info>
              <global/>
            </info>
          </internal>
        </spanning-tree>
      </show>
"
    .to_string()
}
