//! Conversions between VLAN id sets and the compact hyphenated range
//! expressions NX-OS uses on the wire ("1,3-5,10").

use crate::error::PsvmError;
use std::collections::BTreeSet;

/// Valid 802.1Q VLAN ids.
pub const VLAN_MIN: u16 = 1;
pub const VLAN_MAX: u16 = 4094;

fn parse_vlan_id(token: &str) -> Result<u16, PsvmError> {
    let id: u16 = token
        .parse()
        .map_err(|_| PsvmError::InvalidVlanExpression(token.to_string()))?;
    if !(VLAN_MIN..=VLAN_MAX).contains(&id) {
        return Err(PsvmError::InvalidVlanExpression(token.to_string()));
    }
    Ok(id)
}

/// Expand a comma/hyphen VLAN expression into a sorted set of ids.
///
/// The literal `none` (a switch's way of saying "empty allowed list") is
/// dropped. Malformed tokens and ids outside 1-4094 fail closed.
pub fn expand_ranges(expr: &str) -> Result<BTreeSet<u16>, PsvmError> {
    let mut vlans = BTreeSet::new();
    for token in expr.split(',') {
        let token = token.trim();
        if token.is_empty() || token == "none" {
            continue;
        }
        match token.split_once('-') {
            Some((start, end)) => {
                let start = parse_vlan_id(start.trim())?;
                let end = parse_vlan_id(end.trim())?;
                if start > end {
                    return Err(PsvmError::InvalidVlanExpression(token.to_string()));
                }
                vlans.extend(start..=end);
            }
            None => {
                vlans.insert(parse_vlan_id(token)?);
            }
        }
    }
    Ok(vlans)
}

/// Collapse a VLAN set into range tokens: maximal runs of consecutive ids
/// become "a-b", singletons stay bare. Output is sorted ascending and
/// round-trips through [`expand_ranges`].
pub fn compress_ranges(vlans: &BTreeSet<u16>) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut run: Option<(u16, u16)> = None;

    for &vlan in vlans {
        run = match run {
            Some((first, last)) if vlan == last + 1 => Some((first, vlan)),
            Some((first, last)) => {
                tokens.push(render_run(first, last));
                Some((vlan, vlan))
            }
            None => Some((vlan, vlan)),
        };
    }
    if let Some((first, last)) = run {
        tokens.push(render_run(first, last));
    }
    tokens
}

fn render_run(first: u16, last: u16) -> String {
    if first == last {
        first.to_string()
    } else {
        format!("{}-{}", first, last)
    }
}

/// Comma-join a slice of range tokens for one batched switch request.
pub fn join_tokens(tokens: &[String]) -> String {
    tokens.join(",")
}
