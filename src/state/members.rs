//! Channel rosters.
//!
//! All channels share one lock: every event is applied under a single write
//! guard and every traversal runs under a single read guard, so readers never
//! observe half of an event (a NICK applied to some channels but not others).
//!
//! Reads take the guard with `read_recursive`, so a visitor may call other
//! read methods (on this store or the feature registry) even while a writer
//! is queued. Visitors must not apply events.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use super::channel::{Channel, MemberModes, Membership};
use super::features::FeatureRegistry;

/// Per-channel rosters of tracked users.
pub struct MembershipStore {
    channels: RwLock<HashMap<String, Channel>>,
    features: Arc<FeatureRegistry>,
    evict_empty: bool,
}

impl MembershipStore {
    pub fn new(features: Arc<FeatureRegistry>, evict_empty: bool) -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            features,
            evict_empty,
        }
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Pre-create an empty channel record. Returns false if it already exists.
    ///
    /// Placeholders are only evicted once a departure empties them.
    pub fn create_channel(&self, name: &str) -> bool {
        let mut channels = self.channels.write();
        if channels.contains_key(name) {
            return false;
        }
        channels.insert(name.to_string(), Channel::new(name));
        true
    }

    /// Apply one `RPL_NAMREPLY` nick list (`@alice +bob carol`).
    ///
    /// Each entry overwrites any existing membership for that nick; the host
    /// is reset to unknown.
    pub fn on_names_reply(&self, channel: &str, nick_list: &str) {
        let table = self.features.prefix_modes();
        let mut channels = self.channels.write();
        let chan = channels
            .entry(channel.to_string())
            .or_insert_with(|| Channel::new(channel));

        for token in nick_list.split_whitespace() {
            let (letters, nick) = table.strip_glyphs(token);
            if nick.is_empty() {
                debug!(channel = %channel, token = %token, "Names entry without nickname");
                continue;
            }
            let modes = MemberModes::from_letters(letters, &table);
            chan.insert(nick.to_string(), Membership { host: None, modes });
        }
    }

    /// A user joined. Any previously tracked modes are cleared.
    pub fn on_join(&self, channel: &str, nick: &str, host: Option<&str>) {
        let mut channels = self.channels.write();
        let chan = channels
            .entry(channel.to_string())
            .or_insert_with(|| Channel::new(channel));
        chan.insert(
            nick.to_string(),
            Membership {
                host: host.map(str::to_string),
                modes: MemberModes::default(),
            },
        );
        debug!(channel = %channel, nick = %nick, "Member joined");
    }

    /// A user left one channel.
    pub fn on_part(&self, channel: &str, nick: &str) {
        self.depart(channel, nick);
    }

    /// A user was kicked from one channel.
    pub fn on_kick(&self, channel: &str, nick: &str) {
        self.depart(channel, nick);
    }

    fn depart(&self, channel: &str, nick: &str) {
        let mut channels = self.channels.write();
        let Some(chan) = channels.get_mut(channel) else {
            return;
        };
        if chan.remove(nick).is_none() {
            return;
        }
        debug!(channel = %channel, nick = %nick, "Member departed");
        if self.evict_empty && chan.is_empty() {
            channels.remove(channel);
            debug!(channel = %channel, "Evicted empty channel");
        }
    }

    /// A user quit the network: remove them from every roster.
    pub fn on_quit(&self, nick: &str) {
        let mut channels = self.channels.write();
        let mut emptied = Vec::new();
        for (name, chan) in channels.iter_mut() {
            if chan.remove(nick).is_some() && chan.is_empty() {
                emptied.push(name.clone());
            }
        }
        if self.evict_empty {
            for name in &emptied {
                channels.remove(name);
                debug!(channel = %name, "Evicted empty channel");
            }
        }
    }

    /// A user changed nickname. NICK names no channel, so every roster that
    /// tracks `old` is rewritten; modes carry over and the host is refreshed.
    /// A stale entry already filed under `new` is overwritten.
    pub fn on_nick_change(&self, old: &str, new: &str, host: Option<&str>) {
        let mut channels = self.channels.write();
        let mut moved = 0usize;
        for chan in channels.values_mut() {
            if let Some(mut membership) = chan.remove(old) {
                if let Some(host) = host {
                    membership.host = Some(host.to_string());
                }
                chan.insert(new.to_string(), membership);
                moved += 1;
            }
        }
        debug!(old = %old, new = %new, channels = moved, "Nick change applied");
    }

    /// Apply a single-target membership MODE (`+o alice`).
    ///
    /// Only membership modes from the current `PREFIX` table take effect. An
    /// unknown target is created only when the token grants at least one
    /// mode. Returns whether the token named a membership mode.
    pub fn on_mode_change(&self, channel: &str, token: &str, target: &str) -> bool {
        let table = self.features.prefix_modes();
        if !token.chars().any(|c| table.is_mode(c)) {
            return false;
        }

        let mut channels = self.channels.write();
        if let Some(member) = channels
            .get_mut(channel)
            .and_then(|chan| chan.member_mut(target))
        {
            member.modes.apply(token, &table);
            debug!(channel = %channel, nick = %target, modes = %member.modes, "Member modes changed");
            return true;
        }

        let mut modes = MemberModes::default();
        modes.apply(token, &table);
        if modes.is_empty() {
            return true;
        }
        debug!(channel = %channel, nick = %target, modes = %modes, "Member modes set on untracked nick");
        channels
            .entry(channel.to_string())
            .or_insert_with(|| Channel::new(channel))
            .insert(target.to_string(), Membership { host: None, modes });
        true
    }

    /// Forget everything (e.g. on reconnect).
    pub fn clear(&self) {
        self.channels.write().clear();
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    /// Cloned snapshot of one channel.
    pub fn channel(&self, name: &str) -> Option<Channel> {
        self.channels.read_recursive().get(name).cloned()
    }

    pub fn contains_channel(&self, name: &str) -> bool {
        self.channels.read_recursive().contains_key(name)
    }

    /// Cloned membership of `nick` in `channel`.
    pub fn member(&self, channel: &str, nick: &str) -> Option<Membership> {
        self.channels
            .read_recursive()
            .get(channel)
            .and_then(|chan| chan.member(nick))
            .cloned()
    }

    /// Visit every channel under one read lock.
    pub fn iter_channels<F: FnMut(&Channel)>(&self, mut visit: F) {
        let channels = self.channels.read_recursive();
        for chan in channels.values() {
            visit(chan);
        }
    }

    /// Visit one channel's roster under one read lock. Returns false if the
    /// channel is not tracked.
    pub fn iter_members<F: FnMut(&str, &Membership)>(&self, channel: &str, mut visit: F) -> bool {
        let channels = self.channels.read_recursive();
        let Some(chan) = channels.get(channel) else {
            return false;
        };
        for (nick, membership) in chan.members() {
            visit(nick, membership);
        }
        true
    }

    /// Channels whose roster contains `nick`, sorted.
    pub fn channels_of(&self, nick: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .channels
            .read_recursive()
            .values()
            .filter(|chan| chan.contains(nick))
            .map(|chan| chan.name().to_string())
            .collect();
        names.sort_unstable();
        names
    }

    /// Tracked channel names, sorted.
    pub fn channel_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.channels.read_recursive().keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Cloned snapshot of every channel.
    pub fn snapshot(&self) -> HashMap<String, Channel> {
        self.channels.read_recursive().clone()
    }

    pub fn len(&self) -> usize {
        self.channels.read_recursive().len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.read_recursive().is_empty()
    }
}

impl std::fmt::Debug for MembershipStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MembershipStore")
            .field("channels", &self.channels.read_recursive().len())
            .field("evict_empty", &self.evict_empty)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrackerConfig;
    use crate::telemetry::TracingSink;

    fn store(evict_empty: bool) -> MembershipStore {
        let config = TrackerConfig::default();
        let features = Arc::new(FeatureRegistry::new(
            &config.defaults,
            config.malformed_tokens,
            Arc::new(TracingSink),
        ));
        MembershipStore::new(features, evict_empty)
    }

    fn modes_of(store: &MembershipStore, channel: &str, nick: &str) -> Option<String> {
        store.member(channel, nick).map(|m| m.modes.to_string())
    }

    #[test]
    fn visitor_can_read_while_writer_waits() {
        let store = store(true);
        store.on_names_reply("#x", "@alice");
        let store = &store;

        let mut seen = None;
        std::thread::scope(|s| {
            store.iter_channels(|_| {
                s.spawn(move || store.on_join("#x", "bob", None));
                std::thread::sleep(std::time::Duration::from_millis(50));
                seen = store.member("#x", "alice").map(|m| m.modes.to_string());
                assert_eq!(store.features.nick_len(), None);
                assert!(store.member("#x", "bob").is_none());
            });
        });

        assert_eq!(seen.as_deref(), Some("+o"));
        assert!(store.member("#x", "bob").is_some());
    }

    #[test]
    fn names_reply_decodes_default_prefixes() {
        let store = store(true);
        store.on_names_reply("#x", "@alice +bob carol");

        assert_eq!(modes_of(&store, "#x", "alice").as_deref(), Some("+o"));
        assert_eq!(modes_of(&store, "#x", "bob").as_deref(), Some("+v"));
        assert_eq!(modes_of(&store, "#x", "carol").as_deref(), Some(""));
        assert_eq!(store.member("#x", "alice").unwrap().host, None);
        assert_eq!(store.channel("#x").unwrap().nicks(), vec!["alice", "bob", "carol"]);
    }

    #[test]
    fn names_reply_handles_multi_prefix_and_junk() {
        let store = store(true);
        store.on_names_reply("#x", "  @+dave   @  ");
        assert_eq!(modes_of(&store, "#x", "dave").as_deref(), Some("+ov"));
        assert_eq!(store.channel("#x").unwrap().len(), 1);
    }

    #[test]
    fn names_reply_overwrites_known_host() {
        let store = store(true);
        store.on_join("#x", "alice", Some("a.example"));
        store.on_names_reply("#x", "@alice");
        let m = store.member("#x", "alice").unwrap();
        assert_eq!(m.host, None);
        assert_eq!(m.modes.to_string(), "+o");
    }

    #[test]
    fn join_then_part_leaves_other_channels_alone() {
        let store = store(true);
        store.on_join("#x", "n", Some("h"));
        store.on_join("#y", "n", Some("h"));
        store.on_join("#x", "other", None);

        store.on_part("#x", "n");

        assert!(store.member("#x", "n").is_none());
        assert!(store.member("#x", "other").is_some());
        assert!(store.member("#y", "n").is_some());
    }

    #[test]
    fn rejoin_clears_modes() {
        let store = store(true);
        store.on_names_reply("#x", "@alice");
        store.on_join("#x", "alice", Some("new.host"));
        let m = store.member("#x", "alice").unwrap();
        assert!(m.modes.is_empty());
        assert_eq!(m.host.as_deref(), Some("new.host"));
    }

    #[test]
    fn departure_evicts_empty_channel_when_enabled() {
        let evicting = store(true);
        evicting.on_join("#x", "n", None);
        evicting.on_part("#x", "n");
        assert!(!evicting.contains_channel("#x"));

        let keeping = store(false);
        keeping.on_join("#x", "n", None);
        keeping.on_part("#x", "n");
        assert!(keeping.contains_channel("#x"));
        assert!(keeping.channel("#x").unwrap().is_empty());
    }

    #[test]
    fn placeholder_survives_unrelated_quit() {
        let store = store(true);
        assert!(store.create_channel("#wait"));
        assert!(!store.create_channel("#wait"));
        store.on_join("#x", "n", None);
        store.on_quit("n");
        assert!(store.contains_channel("#wait"));
        assert!(!store.contains_channel("#x"));
    }

    #[test]
    fn part_of_untracked_nick_keeps_placeholder() {
        let store = store(true);
        store.create_channel("#wait");
        store.on_part("#wait", "ghost");
        assert!(store.contains_channel("#wait"));
    }

    #[test]
    fn kick_removes_target() {
        let store = store(true);
        store.on_names_reply("#x", "@op victim");
        store.on_kick("#x", "victim");
        assert!(store.member("#x", "victim").is_none());
        assert!(store.member("#x", "op").is_some());
    }

    #[test]
    fn quit_removes_everywhere_and_is_idempotent() {
        let store = store(false);
        store.on_names_reply("#a", "carol dave");
        store.on_names_reply("#b", "+carol");

        store.on_quit("carol");
        assert_eq!(store.channels_of("carol"), Vec::<String>::new());
        assert!(store.member("#a", "dave").is_some());

        store.on_quit("carol");
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn nick_change_renames_in_every_roster() {
        let store = store(true);
        store.on_names_reply("#a", "@carol");
        store.on_names_reply("#b", "+carol");
        store.on_names_reply("#c", "someone");

        store.on_nick_change("carol", "carolyn", Some("c.example"));

        assert!(store.member("#a", "carol").is_none());
        assert!(store.member("#b", "carol").is_none());
        let a = store.member("#a", "carolyn").unwrap();
        assert_eq!(a.modes.to_string(), "+o");
        assert_eq!(a.host.as_deref(), Some("c.example"));
        assert_eq!(modes_of(&store, "#b", "carolyn").as_deref(), Some("+v"));
        assert!(store.member("#c", "carolyn").is_none());
        assert_eq!(store.channels_of("carolyn"), vec!["#a", "#b"]);
    }

    #[test]
    fn nick_change_overwrites_stale_entry() {
        let store = store(true);
        store.on_names_reply("#a", "@old +new");
        store.on_nick_change("old", "new", None);
        let m = store.member("#a", "new").unwrap();
        assert_eq!(m.modes.to_string(), "+o");
        assert_eq!(store.channel("#a").unwrap().len(), 1);
    }

    #[test]
    fn mode_change_updates_and_creates() {
        let store = store(true);
        store.on_join("#x", "alice", Some("h"));

        assert!(store.on_mode_change("#x", "+o", "alice"));
        assert_eq!(modes_of(&store, "#x", "alice").as_deref(), Some("+o"));
        assert_eq!(store.member("#x", "alice").unwrap().host.as_deref(), Some("h"));

        assert!(store.on_mode_change("#x", "+v", "bob"));
        assert_eq!(modes_of(&store, "#x", "bob").as_deref(), Some("+v"));

        assert!(store.on_mode_change("#x", "-o", "alice"));
        assert_eq!(modes_of(&store, "#x", "alice").as_deref(), Some(""));
    }

    #[test]
    fn mode_change_converges_with_names_representation() {
        let store = store(true);
        store.on_names_reply("#x", "+alice");
        store.on_mode_change("#x", "+o", "alice");
        assert_eq!(modes_of(&store, "#x", "alice").as_deref(), Some("+ov"));

        store.on_names_reply("#y", "@+alice");
        assert_eq!(
            store.member("#x", "alice").unwrap().modes,
            store.member("#y", "alice").unwrap().modes
        );
    }

    #[test]
    fn non_membership_modes_are_ignored() {
        let store = store(true);
        assert!(!store.on_mode_change("#x", "+b", "*!*@spam.example"));
        assert!(!store.on_mode_change("#x", "+l", "10"));
        assert!(store.is_empty());

        assert!(store.on_mode_change("#x", "-v", "ghost"));
        assert!(store.is_empty());
    }

    #[test]
    fn iter_members_reports_missing_channel() {
        let store = store(true);
        store.on_names_reply("#x", "a b c");
        let mut seen = Vec::new();
        assert!(store.iter_members("#x", |nick, _| seen.push(nick.to_string())));
        seen.sort();
        assert_eq!(seen, vec!["a", "b", "c"]);
        assert!(!store.iter_members("#nope", |_, _| {}));

        let mut count = 0;
        store.iter_channels(|_| count += 1);
        assert_eq!(count, 1);
        assert_eq!(store.channel_names(), vec!["#x"]);
        store.clear();
        assert!(store.is_empty());
    }
}
