//! Stress tests for the order registry.
//!
//! These tests verify:
//! 1. The four indices agree with a naive model under random create/cancel
//! 2. Throughput of registry operations stays in a sane range
//! 3. Determinism: the same operation sequence gives the same state root
//!
//! ## Running Stress Tests
//!
//! ```bash
//! # Run all stress tests (release mode recommended)
//! cargo test --release --test stress_test -- --nocapture
//! ```

use std::time::Instant;

use alloy_primitives::{Address, B256, U256};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use limit_orderbook::registry::IndexKeys;
use limit_orderbook::{Domain, IndexId, Order, OrderIndices, OrderSignature};

// ============================================================================
// TEST CONSTANTS
// ============================================================================

/// Hashes inserted by the registry stress run
const STRESS_HASH_COUNT: usize = 200_000;

/// Distinct makers and tokens the random keys are drawn from
const MAKERS: u8 = 16;
const TOKENS: u8 = 8;

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn random_keys(rng: &mut ChaCha8Rng) -> IndexKeys {
    let source = rng.gen_range(1..=TOKENS);
    let mut destination = rng.gen_range(1..=TOKENS);
    if destination == source {
        destination = destination % TOKENS + 1;
    }
    IndexKeys {
        maker: Address::repeat_byte(0x80 + rng.gen_range(0..MAKERS)),
        source_token: Address::repeat_byte(source),
        destination_token: Address::repeat_byte(destination),
    }
}

fn random_hash(rng: &mut ChaCha8Rng) -> B256 {
    let mut bytes = [0u8; 32];
    rng.fill(&mut bytes);
    B256::from(bytes)
}

/// Insertion-ordered reference the indices are checked against
#[derive(Default)]
struct Model {
    entries: Vec<(B256, IndexKeys)>,
}

impl Model {
    fn matching(&self, id: &IndexId) -> Vec<B256> {
        self.entries
            .iter()
            .filter(|(_, keys)| match id {
                IndexId::All => true,
                IndexId::Maker(maker) => keys.maker == *maker,
                IndexId::SourceToken(token) => keys.source_token == *token,
                IndexId::DestinationToken(token) => keys.destination_token == *token,
            })
            .map(|(hash, _)| *hash)
            .collect()
    }
}

fn every_index() -> Vec<IndexId> {
    let mut ids = vec![IndexId::All];
    for m in 0..MAKERS {
        ids.push(IndexId::Maker(Address::repeat_byte(0x80 + m)));
    }
    for t in 1..=TOKENS {
        ids.push(IndexId::SourceToken(Address::repeat_byte(t)));
        ids.push(IndexId::DestinationToken(Address::repeat_byte(t)));
    }
    ids
}

fn assert_matches_model(indices: &OrderIndices, model: &Model) {
    for id in every_index() {
        let expected = model.matching(&id);
        assert_eq!(indices.size(&id), expected.len(), "size of {id:?}");
        assert_eq!(indices.page(&id, 0, expected.len() + 1), expected, "page of {id:?}");
    }
}

/// Create orders from one maker key and cancel a random share of them,
/// returning the final state root
fn run_deterministic_sequence(seed: u64, count: usize) -> B256 {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let maker = alloy_signer_local::PrivateKeySigner::from_bytes(&B256::repeat_byte(0x42)).unwrap();
    let mut book = limit_orderbook::OrderBook::new(Domain::with_defaults(
        31337,
        Address::repeat_byte(0xbb),
    ));

    let mut hashes = Vec::with_capacity(count);
    for i in 0..count {
        let source = rng.gen_range(1..=TOKENS);
        let destination = source % TOKENS + 1;
        let order = Order::new(
            maker.address(),
            Address::repeat_byte(source),
            Address::repeat_byte(destination),
            U256::from(rng.gen_range(1u64..=1_000_000)),
            U256::from(rng.gen_range(1u64..=1_000_000)),
            1_700_000_000 + i as u64,
        );
        let signature = OrderSignature::sign(&maker, &book.hash(&order)).unwrap();
        hashes.push(book.create_order(order, signature).unwrap());

        if rng.gen_bool(0.3) {
            let victim = hashes[rng.gen_range(0..hashes.len())];
            if book.is_live(&victim) {
                book.cancel_order(maker.address(), &victim).unwrap();
            }
        }
    }
    book.state_root()
}

// ============================================================================
// STRESS TESTS
// ============================================================================

/// Random inserts and removes keep all four indices consistent.
#[test]
fn stress_indices_against_model() {
    println!("\n=== STRESS TEST: Indices vs Model ===\n");

    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let mut indices = OrderIndices::with_capacity(1_024);
    let mut model = Model::default();

    for round in 0..5_000 {
        if model.entries.is_empty() || rng.gen_bool(0.6) {
            let keys = random_keys(&mut rng);
            let hash = random_hash(&mut rng);
            indices.insert(&keys, hash).unwrap();
            model.entries.push((hash, keys));
        } else {
            let (hash, keys) = model.entries.remove(rng.gen_range(0..model.entries.len()));
            indices.remove(&keys, &hash).unwrap();
            assert!(!indices.contains(&hash));
        }

        if round % 500 == 0 {
            assert_matches_model(&indices, &model);
        }
    }
    assert_matches_model(&indices, &model);

    // Pages stitch together into the full list
    let all = model.matching(&IndexId::All);
    let mut stitched = Vec::new();
    let mut offset = 0;
    loop {
        let page = indices.page(&IndexId::All, offset, 37);
        if page.is_empty() {
            break;
        }
        offset += page.len();
        stitched.extend(page);
    }
    assert_eq!(stitched, all);

    // Cursor pages stitch together the same way
    let mut stitched = Vec::new();
    loop {
        let page = indices
            .page_after(&IndexId::All, stitched.last(), 37)
            .unwrap();
        if page.is_empty() {
            break;
        }
        stitched.extend(page);
    }
    assert_eq!(stitched, all);

    println!("  Live hashes: {}", model.entries.len());
    println!("\n=== STRESS TEST PASSED ===\n");
}

/// Bulk insert then remove every hash.
#[test]
fn stress_bulk_insert_remove() {
    println!("\n=== STRESS TEST: {} hashes ===\n", STRESS_HASH_COUNT);

    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let entries: Vec<_> = (0..STRESS_HASH_COUNT)
        .map(|_| (random_hash(&mut rng), random_keys(&mut rng)))
        .collect();
    let mut indices = OrderIndices::with_capacity(STRESS_HASH_COUNT);

    let start = Instant::now();
    for (hash, keys) in &entries {
        indices.insert(keys, *hash).unwrap();
    }
    let inserted = start.elapsed();
    assert_eq!(indices.size(&IndexId::All), STRESS_HASH_COUNT);

    let start = Instant::now();
    for (hash, keys) in entries.iter().rev() {
        indices.remove(keys, hash).unwrap();
    }
    let removed = start.elapsed();

    for id in every_index() {
        assert_eq!(indices.size(&id), 0, "{id:?} not empty");
    }

    println!("  Insert: {:>12.2?}", inserted);
    println!("  Remove: {:>12.2?}", removed);
    println!("\n=== STRESS TEST PASSED ===\n");
}

/// Same sequence, same state root.
#[test]
fn verify_determinism() {
    println!("\n=== DETERMINISM TEST ===\n");

    const TEST_COUNT: usize = 300;
    const SEED: u64 = 12345;

    let root1 = run_deterministic_sequence(SEED, TEST_COUNT);
    let root2 = run_deterministic_sequence(SEED, TEST_COUNT);

    println!("  Run 1 state root: {}", hex::encode(root1));
    println!("  Run 2 state root: {}", hex::encode(root2));
    assert_eq!(root1, root2, "State roots must match for determinism");

    let root3 = run_deterministic_sequence(SEED + 1, TEST_COUNT);
    println!("  Different seed:   {}", hex::encode(root3));
    assert_ne!(root1, root3, "Different seeds should produce different roots");

    println!("\n=== DETERMINISM VERIFIED ===\n");
}
