//! Parsers for NX-OS NETCONF replies.
//!
//! The interesting payloads come back as running-config text embedded in the
//! `<data>` element, so parsing is line-oriented: unknown lines are ignored
//! and whitespace is insignificant.

use crate::error::PsvmError;
use crate::vlan_ranges;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;

lazy_static! {
    static ref DATA_ELEMENT: Regex = Regex::new(r"(?s)<data[^>]*>(.*?)</data>").unwrap();
}

const VLAN_ALLOW_LINE: &str = "switchport trunk allowed vlan";
const SPAN_USAGE_LINE: &str = "Total ports*vlans";

/// Extract the allowed-VLAN set from a show-running-interface reply.
///
/// The last `switchport trunk allowed vlan` line wins if several appear; a
/// reply without one yields the empty set. The literal `none` is the
/// switch's empty list.
pub fn parse_allowed_vlans(reply: &str) -> Result<BTreeSet<u16>, PsvmError> {
    let mut last_expr: Option<&str> = None;
    for data in DATA_ELEMENT.captures_iter(reply) {
        for line in data.get(1).map_or("", |m| m.as_str()).lines() {
            if line.contains(VLAN_ALLOW_LINE) {
                if let Some((_, expr)) = line.rsplit_once(VLAN_ALLOW_LINE) {
                    last_expr = Some(expr.trim());
                }
            }
        }
    }
    match last_expr {
        Some(expr) => vlan_ranges::expand_ranges(expr),
        None => Ok(BTreeSet::new()),
    }
}

/// Extract the ports*vlans spanning-tree usage figure from a
/// show-spanning-tree reply, if the switch reported one.
pub fn parse_span_usage(reply: &str) -> Option<String> {
    for data in DATA_ELEMENT.captures_iter(reply) {
        for line in data.get(1).map_or("", |m| m.as_str()).lines() {
            if line.contains(SPAN_USAGE_LINE) {
                return line.rsplit(':').next().map(|s| s.trim().to_string());
            }
        }
    }
    None
}
