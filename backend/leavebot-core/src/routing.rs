// src/routing.rs
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

use crate::leave::LeaveRecord;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelMapError {
    #[error("Channel mapping is empty")]
    Empty,
    #[error("Channel mapping contains an entry with an empty unit name")]
    EmptyUnit,
    #[error("Incomplete channel mapping: no channel configured for '{0}'")]
    MissingChannel(String),
    #[error("Malformed channel mapping entry '{0}', expected 'Unit=#channel'")]
    Malformed(String),
    #[error("Unit '{0}' is mapped more than once")]
    DuplicateUnit(String),
}

// --- Channel Map ---

/// Ordered organizational unit -> channel mapping. Declaration order is the
/// order reports are produced in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelMap {
    entries: Vec<(String, String)>,
}

impl ChannelMap {
    /// Builds and validates the mapping; any empty value fails the whole map.
    pub fn new<U, C>(entries: impl IntoIterator<Item = (U, C)>) -> Result<Self, ChannelMapError>
    where
        U: Into<String>,
        C: Into<String>,
    {
        let entries: Vec<(String, String)> = entries
            .into_iter()
            .map(|(unit, channel)| (unit.into().trim().to_string(), channel.into().trim().to_string()))
            .collect();

        if entries.is_empty() {
            return Err(ChannelMapError::Empty);
        }
        for (idx, (unit, channel)) in entries.iter().enumerate() {
            if unit.is_empty() {
                return Err(ChannelMapError::EmptyUnit);
            }
            if channel.is_empty() {
                return Err(ChannelMapError::MissingChannel(unit.clone()));
            }
            if entries[..idx].iter().any(|(seen, _)| seen.eq_ignore_ascii_case(unit)) {
                return Err(ChannelMapError::DuplicateUnit(unit.clone()));
            }
        }

        Ok(Self { entries })
    }

    /// Parses `UK=#uk-leave,India=#india-leave`.
    pub fn parse(raw: &str) -> Result<Self, ChannelMapError> {
        let mut entries = Vec::new();
        for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (unit, channel) = part
                .split_once('=')
                .ok_or_else(|| ChannelMapError::Malformed(part.to_string()))?;
            entries.push((unit.to_string(), channel.to_string()));
        }
        Self::new(entries)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(u, c)| (u.as_str(), c.as_str()))
    }

    /// Channel for an already-normalized unit, matched case-insensitively.
    pub fn channel_for(&self, org_unit: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(unit, _)| unit.to_lowercase() == org_unit.to_lowercase())
            .map(|(_, channel)| channel.as_str())
    }
}

// --- Groups ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelGroup {
    pub channel: String,
    pub records: Vec<LeaveRecord>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyGroupPolicy {
    /// Channels without active leave get no report.
    Skip,
    /// Channels without active leave get the "nobody is out" report.
    SendPlaceholder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routing {
    /// Everything goes to one channel.
    Single(String),
    /// Records are routed by their organizational unit.
    ByUnit {
        map: ChannelMap,
        fallback_channel: Option<String>,
    },
}

impl Routing {
    /// Partitions `records` into per-channel groups.
    ///
    /// Units are visited in mapping order and each keeps its input order.
    /// Units sharing a channel are merged into that channel's group.
    pub fn group(&self, records: &[LeaveRecord], empty_policy: EmptyGroupPolicy) -> Vec<ChannelGroup> {
        let mut groups: Vec<ChannelGroup> = Vec::new();

        match self {
            Routing::Single(channel) => {
                groups.push(ChannelGroup {
                    channel: channel.clone(),
                    records: records.to_vec(),
                });
            }
            Routing::ByUnit {
                map,
                fallback_channel,
            } => {
                for (unit, channel) in map.entries() {
                    let unit = unit.to_lowercase();
                    let matched = records.iter().filter(|r| r.org_unit == unit).cloned();
                    group_for(&mut groups, channel).records.extend(matched);
                }

                let unmatched: Vec<&LeaveRecord> = records
                    .iter()
                    .filter(|r| map.channel_for(&r.org_unit).is_none())
                    .collect();
                if !unmatched.is_empty() {
                    log_unmatched(&unmatched, fallback_channel.as_deref());
                    if let Some(fallback) = fallback_channel {
                        group_for(&mut groups, fallback)
                            .records
                            .extend(unmatched.into_iter().cloned());
                    }
                }
            }
        }

        if empty_policy == EmptyGroupPolicy::Skip {
            groups.retain(|g| !g.records.is_empty());
        }
        for group in &groups {
            debug!("Channel {} has {} active leave(s)", group.channel, group.records.len());
        }
        groups
    }
}

fn group_for<'a>(groups: &'a mut Vec<ChannelGroup>, channel: &str) -> &'a mut ChannelGroup {
    let idx = match groups.iter().position(|g| g.channel == channel) {
        Some(idx) => idx,
        None => {
            groups.push(ChannelGroup {
                channel: channel.to_string(),
                records: Vec::new(),
            });
            groups.len() - 1
        }
    };
    &mut groups[idx]
}

fn log_unmatched(unmatched: &[&LeaveRecord], fallback: Option<&str>) {
    let mut per_unit: BTreeMap<&str, usize> = BTreeMap::new();
    for record in unmatched {
        *per_unit.entry(record.org_unit.as_str()).or_default() += 1;
    }
    for (unit, count) in per_unit {
        match fallback {
            Some(channel) => warn!(
                "{} active leave(s) for unmapped unit '{}' routed to fallback channel {}",
                count, unit, channel
            ),
            None => warn!(
                "{} active leave(s) for unmapped unit '{}' dropped (no channel configured)",
                count, unit
            ),
        }
    }
}
