//! ISUPPORT feature registry.
//!
//! Features are upserted as `RPL_ISUPPORT` tokens arrive. Recognized features
//! have decoders registered by name; a decoder runs every time its feature is
//! (re)announced and may attach a typed [`FeatureValue`].

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use slirc_proto::{IsupportToken, PrefixModes, classify};
use tracing::debug;

use crate::config::MalformedTokenPolicy;
use crate::error::StateError;
use crate::telemetry::DiagnosticSink;

/// Typed form of a recognized feature.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FeatureValue {
    /// Decoded `PREFIX`.
    PrefixModes(Arc<PrefixModes>),
    /// Decoded `NICKLEN`.
    NickLen(usize),
}

/// A single ISUPPORT feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    pub name: String,
    pub enabled: bool,
    /// Raw value as announced; empty for bare flags.
    pub value: String,
    pub decoded: Option<FeatureValue>,
}

impl Feature {
    fn announced(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            enabled: true,
            value: value.to_string(),
            decoded: None,
        }
    }

    pub fn prefix_modes(&self) -> Option<&Arc<PrefixModes>> {
        match &self.decoded {
            Some(FeatureValue::PrefixModes(table)) => Some(table),
            _ => None,
        }
    }

    pub fn nick_len(&self) -> Option<usize> {
        match self.decoded {
            Some(FeatureValue::NickLen(n)) => Some(n),
            _ => None,
        }
    }
}

/// Decoder for a recognized feature.
///
/// Runs under the registry write lock with the freshly announced feature. It
/// may normalize `feature.value`; returning `None` keeps whatever decoded
/// value the feature already had.
pub trait FeatureDecoder: Send + Sync {
    fn decode(&self, feature: &mut Feature, sink: &dyn DiagnosticSink) -> Option<FeatureValue>;
}

impl<F> FeatureDecoder for F
where
    F: Fn(&mut Feature, &dyn DiagnosticSink) -> Option<FeatureValue> + Send + Sync,
{
    fn decode(&self, feature: &mut Feature, sink: &dyn DiagnosticSink) -> Option<FeatureValue> {
        self(feature, sink)
    }
}

/// `PREFIX` → [`PrefixModes`].
struct PrefixDecoder;

impl FeatureDecoder for PrefixDecoder {
    fn decode(&self, feature: &mut Feature, sink: &dyn DiagnosticSink) -> Option<FeatureValue> {
        let table = PrefixModes::parse(&feature.value);
        if !table.is_complete() {
            sink.report(&StateError::PrefixMismatch(feature.value.clone()));
        }
        Some(FeatureValue::PrefixModes(Arc::new(table)))
    }
}

/// `NICKLEN` → unsigned length.
struct NickLenDecoder;

impl FeatureDecoder for NickLenDecoder {
    fn decode(&self, feature: &mut Feature, sink: &dyn DiagnosticSink) -> Option<FeatureValue> {
        match feature.value.parse::<usize>() {
            Ok(n) => Some(FeatureValue::NickLen(n)),
            Err(_) => {
                sink.report(&StateError::InvalidNumber {
                    feature: feature.name.clone(),
                    value: feature.value.clone(),
                });
                None
            }
        }
    }
}

/// Fills in the conventional mode letter when announced without a value
/// (`EXCEPTS` → `e`, `INVEX` → `I`).
struct DefaultLetter(&'static str);

impl FeatureDecoder for DefaultLetter {
    fn decode(&self, feature: &mut Feature, _sink: &dyn DiagnosticSink) -> Option<FeatureValue> {
        if feature.value.is_empty() {
            feature.value = self.0.to_string();
        }
        None
    }
}

fn fallback_prefix() -> &'static Arc<PrefixModes> {
    static DEFAULT: OnceLock<Arc<PrefixModes>> = OnceLock::new();
    DEFAULT.get_or_init(|| Arc::new(PrefixModes::parse(PrefixModes::DEFAULT)))
}

/// Registry of announced features plus the decoder table.
///
/// Lock order is decoders, then features; nothing else is locked while
/// either is held. Reads use `read_recursive` so a visitor inside
/// [`iter_features`](Self::iter_features) can call other read methods.
pub struct FeatureRegistry {
    features: RwLock<HashMap<String, Feature>>,
    decoders: RwLock<HashMap<String, Vec<Arc<dyn FeatureDecoder>>>>,
    policy: MalformedTokenPolicy,
    sink: Arc<dyn DiagnosticSink>,
}

impl FeatureRegistry {
    /// Create a registry with the built-in decoders and seed it with
    /// `defaults` through the normal upsert path, so decoders run for them.
    pub fn new(
        defaults: &BTreeMap<String, String>,
        policy: MalformedTokenPolicy,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        let mut decoders: HashMap<String, Vec<Arc<dyn FeatureDecoder>>> = HashMap::new();
        decoders.insert("PREFIX".into(), vec![Arc::new(PrefixDecoder)]);
        decoders.insert("NICKLEN".into(), vec![Arc::new(NickLenDecoder)]);
        decoders.insert("EXCEPTS".into(), vec![Arc::new(DefaultLetter("e"))]);
        decoders.insert("INVEX".into(), vec![Arc::new(DefaultLetter("I"))]);

        let registry = Self {
            features: RwLock::new(HashMap::new()),
            decoders: RwLock::new(decoders),
            policy,
            sink,
        };
        {
            let decoders = registry.decoders.read();
            let mut features = registry.features.write();
            for (name, value) in defaults {
                registry.upsert(&decoders, &mut features, name, value);
            }
        }
        registry
    }

    /// Add a decoder for `name`. Decoders for the same name run in
    /// registration order; the last one returning `Some` wins.
    ///
    /// Already-announced features are not re-decoded.
    pub fn register_decoder(&self, name: &str, decoder: Arc<dyn FeatureDecoder>) {
        self.decoders
            .write()
            .entry(name.to_string())
            .or_default()
            .push(decoder);
    }

    /// Apply one ISUPPORT token batch, token by token, in order.
    ///
    /// Never fails: malformed tokens are reported to the sink and handled per
    /// the configured [`MalformedTokenPolicy`].
    pub fn apply_announcement<S: AsRef<str>>(&self, tokens: &[S]) {
        let decoders = self.decoders.read();
        let mut features = self.features.write();

        for (i, raw) in tokens.iter().enumerate() {
            match classify(raw.as_ref()) {
                None => {}
                Some(IsupportToken::Malformed(token)) => match self.policy {
                    MalformedTokenPolicy::SkipToken => {
                        self.sink
                            .report(&StateError::MalformedToken(token.to_string()));
                    }
                    MalformedTokenPolicy::AbortBatch => {
                        self.sink.report(&StateError::BatchAborted {
                            token: token.to_string(),
                            dropped: tokens.len() - i,
                        });
                        return;
                    }
                },
                Some(IsupportToken::Negated(name)) => {
                    if features.remove(name).is_some() {
                        debug!(feature = %name, "Feature withdrawn");
                    }
                }
                Some(IsupportToken::Set { key, value }) => {
                    self.upsert(&decoders, &mut features, key, value);
                }
                Some(IsupportToken::Flag(key)) => {
                    self.upsert(&decoders, &mut features, key, "");
                }
            }
        }
    }

    fn upsert(
        &self,
        decoders: &HashMap<String, Vec<Arc<dyn FeatureDecoder>>>,
        features: &mut HashMap<String, Feature>,
        name: &str,
        value: &str,
    ) {
        let feature = features
            .entry(name.to_string())
            .and_modify(|f| {
                f.enabled = true;
                f.value = value.to_string();
            })
            .or_insert_with(|| Feature::announced(name, value));

        if let Some(list) = decoders.get(name) {
            for decoder in list {
                if let Some(decoded) = decoder.decode(feature, self.sink.as_ref()) {
                    feature.decoded = Some(decoded);
                }
            }
        }
        debug!(feature = %name, value = %feature.value, "Feature announced");
    }

    /// Cloned snapshot of one feature.
    pub fn get(&self, name: &str) -> Option<Feature> {
        self.features.read_recursive().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.features.read_recursive().contains_key(name)
    }

    /// Visit every feature under one read lock; the visitor sees a coherent
    /// snapshot and cannot mutate it.
    pub fn iter_features<F: FnMut(&Feature)>(&self, mut visit: F) {
        let features = self.features.read_recursive();
        for feature in features.values() {
            visit(feature);
        }
    }

    /// Cloned snapshot of all features, ordered by name.
    pub fn snapshot(&self) -> BTreeMap<String, Feature> {
        self.features
            .read_recursive()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.features.read_recursive().len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.read_recursive().is_empty()
    }

    /// The current membership mode table.
    ///
    /// Falls back to `(ov)@+` if `PREFIX` was withdrawn or never decoded.
    pub fn prefix_modes(&self) -> Arc<PrefixModes> {
        self.features
            .read_recursive()
            .get("PREFIX")
            .and_then(Feature::prefix_modes)
            .cloned()
            .unwrap_or_else(|| Arc::clone(fallback_prefix()))
    }

    /// Maximum nickname length, if announced and valid.
    pub fn nick_len(&self) -> Option<usize> {
        self.features.read_recursive().get("NICKLEN").and_then(Feature::nick_len)
    }

    /// Channel type prefixes (`CHANTYPES`), `#` if not announced.
    pub fn chantypes(&self) -> String {
        self.features
            .read_recursive()
            .get("CHANTYPES")
            .map(|f| f.value.clone())
            .unwrap_or_else(|| "#".to_string())
    }

    /// Whether `name` starts with one of the announced channel types.
    pub fn is_channel_name(&self, name: &str) -> bool {
        let features = self.features.read_recursive();
        let types = features.get("CHANTYPES").map_or("#", |f| f.value.as_str());
        name.chars().next().is_some_and(|c| types.contains(c))
    }
}

impl std::fmt::Debug for FeatureRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeatureRegistry")
            .field("features", &self.features.read_recursive().len())
            .field("policy", &self.policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrackerConfig;
    use parking_lot::Mutex;

    #[derive(Default)]
    struct Collect(Mutex<Vec<StateError>>);

    impl DiagnosticSink for Collect {
        fn report(&self, err: &StateError) {
            self.0.lock().push(err.clone());
        }
    }

    fn registry(policy: MalformedTokenPolicy) -> (FeatureRegistry, Arc<Collect>) {
        let sink = Arc::new(Collect::default());
        let reg = FeatureRegistry::new(&TrackerConfig::default().defaults, policy, sink.clone());
        (reg, sink)
    }

    #[test]
    fn visitor_can_read_while_writer_waits() {
        let (reg, _sink) = registry(MalformedTokenPolicy::SkipToken);
        let reg = &reg;

        let mut spawned = false;
        let mut lens = Vec::new();
        std::thread::scope(|s| {
            reg.iter_features(|_| {
                if !spawned {
                    spawned = true;
                    s.spawn(move || reg.apply_announcement(&["NICKLEN=30"]));
                    std::thread::sleep(std::time::Duration::from_millis(50));
                }
                lens.push(reg.nick_len());
                assert_eq!(reg.prefix_modes().glyph_for('o'), Some('@'));
            });
        });

        assert_eq!(lens, vec![None, None]);
        assert_eq!(reg.nick_len(), Some(30));
    }

    #[test]
    fn bootstrap_defaults_are_decoded() {
        let (reg, sink) = registry(MalformedTokenPolicy::SkipToken);
        let table = reg.prefix_modes();
        assert_eq!(table.glyph_for('o'), Some('@'));
        assert_eq!(table.glyph_for('v'), Some('+'));
        assert_eq!(reg.chantypes(), "#");
        assert_eq!(reg.len(), 2);
        assert!(sink.0.lock().is_empty());
    }

    #[test]
    fn applies_each_token_shape() {
        let (reg, _) = registry(MalformedTokenPolicy::SkipToken);
        reg.apply_announcement(&["NETWORK=Straylight", "WHOX", "PREFIX=(qaohv)~&@%+", "-CHANTYPES"]);

        let network = reg.get("NETWORK").unwrap();
        assert!(network.enabled);
        assert_eq!(network.value, "Straylight");
        assert_eq!(network.decoded, None);

        let whox = reg.get("WHOX").unwrap();
        assert!(whox.enabled);
        assert_eq!(whox.value, "");

        assert_eq!(reg.prefix_modes().letter_for('~'), Some('q'));
        assert!(!reg.contains("CHANTYPES"));
        assert_eq!(reg.chantypes(), "#");
    }

    #[test]
    fn negating_an_absent_feature_is_a_noop() {
        let (reg, _) = registry(MalformedTokenPolicy::SkipToken);
        reg.apply_announcement(&["-NOSUCH"]);
        assert_eq!(reg.len(), 2);
    }

    #[test]
    fn whitespace_token_is_skipped_alone() {
        let (reg, sink) = registry(MalformedTokenPolicy::SkipToken);
        reg.apply_announcement(&["A=1", "B 2", "C=3"]);
        assert!(reg.contains("A"));
        assert!(!reg.contains("B"));
        assert!(reg.contains("C"));
        assert_eq!(
            sink.0.lock().as_slice(),
            &[StateError::MalformedToken("B 2".into())]
        );
    }

    #[test]
    fn abort_policy_drops_rest_of_batch() {
        let (reg, sink) = registry(MalformedTokenPolicy::AbortBatch);
        reg.apply_announcement(&["A=1", "B 2", "C=3"]);
        assert!(reg.contains("A"));
        assert!(!reg.contains("C"));
        assert_eq!(
            sink.0.lock().as_slice(),
            &[StateError::BatchAborted { token: "B 2".into(), dropped: 2 }]
        );
    }

    #[test]
    fn nicklen_keeps_previous_value_on_garbage() {
        let (reg, sink) = registry(MalformedTokenPolicy::SkipToken);
        assert_eq!(reg.nick_len(), None);

        reg.apply_announcement(&["NICKLEN=30"]);
        assert_eq!(reg.nick_len(), Some(30));

        reg.apply_announcement(&["NICKLEN=lots"]);
        assert_eq!(reg.nick_len(), Some(30));
        assert_eq!(reg.get("NICKLEN").unwrap().value, "lots");
        assert_eq!(sink.0.lock().len(), 1);
    }

    #[test]
    fn prefix_reannouncement_rebuilds_table() {
        let (reg, _) = registry(MalformedTokenPolicy::SkipToken);
        reg.apply_announcement(&["PREFIX=(qaohv)~&@%+"]);
        reg.apply_announcement(&["PREFIX=(ov)@+"]);
        let table = reg.prefix_modes();
        assert_eq!(table.len(), 2);
        assert_eq!(table.letter_for('~'), None);
    }

    #[test]
    fn mismatched_prefix_is_partial_and_reported() {
        let (reg, sink) = registry(MalformedTokenPolicy::SkipToken);
        reg.apply_announcement(&["PREFIX=(qov)~@"]);
        let table = reg.prefix_modes();
        assert_eq!(table.glyph_for('o'), Some('@'));
        assert_eq!(table.glyph_for('v'), None);
        assert_eq!(
            sink.0.lock().as_slice(),
            &[StateError::PrefixMismatch("(qov)~@".into())]
        );
    }

    #[test]
    fn withdrawn_prefix_falls_back_to_default() {
        let (reg, _) = registry(MalformedTokenPolicy::SkipToken);
        reg.apply_announcement(&["PREFIX=(q)~", "-PREFIX"]);
        assert_eq!(reg.prefix_modes().glyph_for('o'), Some('@'));
    }

    #[test]
    fn excepts_and_invex_get_conventional_letters() {
        let (reg, _) = registry(MalformedTokenPolicy::SkipToken);
        reg.apply_announcement(&["EXCEPTS", "INVEX=J"]);
        assert_eq!(reg.get("EXCEPTS").unwrap().value, "e");
        assert_eq!(reg.get("INVEX").unwrap().value, "J");
    }

    #[test]
    fn custom_decoder_runs_on_announcement() {
        let (reg, _) = registry(MalformedTokenPolicy::SkipToken);
        reg.register_decoder(
            "CHANNELLEN",
            Arc::new(|f: &mut Feature, _: &dyn DiagnosticSink| {
                f.value.parse().ok().map(FeatureValue::NickLen)
            }),
        );
        reg.apply_announcement(&["CHANNELLEN=64"]);
        assert_eq!(reg.get("CHANNELLEN").unwrap().nick_len(), Some(64));
    }

    #[test]
    fn iter_features_visits_every_entry() {
        let (reg, _) = registry(MalformedTokenPolicy::SkipToken);
        reg.apply_announcement(&["A", "B=2"]);
        let mut names = Vec::new();
        reg.iter_features(|f| names.push(f.name.clone()));
        names.sort();
        assert_eq!(names, vec!["A", "B", "CHANTYPES", "PREFIX"]);
        assert_eq!(reg.snapshot().len(), 4);
    }

    #[test]
    fn channel_names_follow_chantypes() {
        let (reg, _) = registry(MalformedTokenPolicy::SkipToken);
        assert!(reg.is_channel_name("#rust"));
        assert!(!reg.is_channel_name("&local"));
        reg.apply_announcement(&["CHANTYPES=#&"]);
        assert!(reg.is_channel_name("&local"));
        assert!(!reg.is_channel_name("nick"));
        assert!(!reg.is_channel_name(""));
    }
}
