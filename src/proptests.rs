use std::collections::BTreeMap;

use proptest::prelude::*;
use proptest_derive::Arbitrary;

use crate::embed::{embed_key, extract_key};
use crate::nibble::take_n_bits;
use crate::QpTrie;

/// Model implementation the trie is compared against.
#[derive(Default)]
struct Model {
    map: BTreeMap<Vec<u8>, u64>,
}

impl Model {
    fn insert(&mut self, key: Vec<u8>, value: u64) -> Option<u64> {
        self.map.insert(key, value)
    }

    fn get(&self, key: &[u8]) -> Option<&u64> {
        self.map.get(key)
    }

    fn len(&self) -> usize {
        self.map.len()
    }
}

/// Actions to run against both implementations.
#[derive(Arbitrary, Debug, Clone)]
enum Action {
    Insert(KeyValue),
    Get(Key),
}

/// Wrapper for key generation with a custom strategy.
#[derive(Debug, Clone)]
struct Key(Vec<u8>);

/// Wrapper for a key-value pair.
#[derive(Debug, Clone)]
struct KeyValue {
    key: Key,
    value: u64,
}

impl Arbitrary for Key {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            // Empty key
            Just(Key(vec![])),
            // Short keys that embed into the bitpack
            prop::collection::vec(any::<u8>(), 1..8).prop_map(Key),
            // Medium keys
            prop::collection::vec(any::<u8>(), 8..64).prop_map(Key),
            // Keys with natural delimiters to exercise chunk compression
            "[a-z]{4,8}/[a-z]{1,8}".prop_map(|s| Key(s.into_bytes())),
            "[a-z]{4,8}:[a-z]{1,8}".prop_map(|s| Key(s.into_bytes())),
            // Keys with shared prefixes
            "[a-z]{4,8}".prop_map(|prefix| {
                let mut key = prefix.into_bytes();
                key.extend_from_slice(b"/suffix");
                Key(key)
            }),
        ]
        .boxed()
    }
}

impl Arbitrary for KeyValue {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (any::<Key>(), any::<u64>())
            .prop_map(|(key, value)| KeyValue { key, value })
            .boxed()
    }
}

/// Test harness that executes actions on both the trie and the model.
#[derive(Default)]
struct Test {
    trie: QpTrie<u64>,
    model: Model,
}

impl Test {
    fn execute(&mut self, action: Action) {
        match action {
            Action::Insert(kv) => {
                let key = kv.key.0;
                let trie_result = self.trie.insert(&key, kv.value);
                let model_result = self.model.insert(key.clone(), kv.value);
                assert_eq!(trie_result, model_result, "insert mismatch: key={key:?}");
            }
            Action::Get(key) => {
                let key = key.0;
                let trie_result = self.trie.get(&key);
                let model_result = self.model.get(&key);
                assert_eq!(trie_result, model_result, "get mismatch: key={key:?}");
            }
        }

        assert_eq!(
            self.trie.len(),
            self.model.len(),
            "length mismatch after action"
        );
        self.trie.assert_invariants();
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        failure_persistence: None,
        ..ProptestConfig::default()
    })]

    #[test]
    fn behaves_like_btreemap(actions in prop::collection::vec(any::<Action>(), 1..64)) {
        let mut test = Test::default();
        for action in actions {
            test.execute(action);
        }
    }

    #[test]
    fn insert_then_get_all(pairs in prop::collection::vec(any::<KeyValue>(), 1..40)) {
        let mut trie: QpTrie<u64> = QpTrie::new();
        let mut model: BTreeMap<Vec<u8>, u64> = BTreeMap::new();

        for kv in &pairs {
            trie.insert(&kv.key.0, kv.value);
            model.insert(kv.key.0.clone(), kv.value);
        }
        trie.assert_invariants();

        for (key, value) in &model {
            prop_assert_eq!(trie.get(key), Some(value));
        }
    }

    #[test]
    fn insertion_order_is_irrelevant(pairs in prop::collection::vec(any::<KeyValue>(), 1..32)) {
        // last write wins, so deduplicate up front to make both orders agree
        let mut model: BTreeMap<Vec<u8>, u64> = BTreeMap::new();
        for kv in &pairs {
            model.insert(kv.key.0.clone(), kv.value);
        }

        let forward: QpTrie<u64> = model.iter().map(|(k, v)| (k.clone(), *v)).collect();
        let backward: QpTrie<u64> = model.iter().rev().map(|(k, v)| (k.clone(), *v)).collect();

        for (key, value) in &model {
            prop_assert_eq!(forward.get(key), Some(value));
            prop_assert_eq!(backward.get(key), Some(value));
        }
        prop_assert_eq!(forward.len(), backward.len());
    }

    #[test]
    fn bit_cursor_reads_compose(
        key in prop::collection::vec(any::<u8>(), 1..12),
        shift in 0usize..8,
        first in 0usize..16,
        second in 0usize..16,
    ) {
        let avail = key.len() * 8 - shift;
        // reading past the end turns the remainder into the end-of-key
        // sentinel, which composes differently; keep the first read inside
        // the key
        prop_assume!(first < avail);

        let (low, rest, mid_shift) = take_n_bits(&key, shift, first);
        let (high, _, _) = take_n_bits(rest, mid_shift, second);
        let (both, _, _) = take_n_bits(&key, shift, first + second);

        prop_assert_eq!(both, low | high << first);
    }

    #[test]
    fn embed_codec_round_trips(key in prop::collection::vec(any::<u8>(), 0..8)) {
        let bitpack = embed_key(&key);
        let extracted = extract_key(bitpack);
        prop_assert_eq!(extracted.as_slice(), &key[..]);
    }
}
