//! Benchmarks for the order registry and settlement path.
//!
//! ## Running Benchmarks
//!
//! ```bash
//! # Run all benchmarks
//! cargo bench
//!
//! # Run specific benchmark
//! cargo bench -- indices
//! ```
//!
//! Results are saved to `target/criterion/` with HTML reports.

use criterion::{
    black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput,
};
use std::time::Duration;

use alloy_primitives::{Address, B256, U256};
use alloy_signer_local::PrivateKeySigner;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use limit_orderbook::env::TokenLedger;
use limit_orderbook::registry::IndexKeys;
use limit_orderbook::sim::SimChain;
use limit_orderbook::{
    Domain, FeeConfig, FillRequest, IndexId, Order, OrderBook, OrderIndices, OrderSignature,
    Settlement, TxContext,
};

const NOW: u64 = 1_700_000_000;

// ============================================================================
// HELPER FUNCTIONS - Deterministic input generation
// ============================================================================

/// Hashes spread over 16 makers and 8 token pairs
fn generate_entries(count: usize, seed: u64) -> Vec<(B256, IndexKeys)> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let mut bytes = [0u8; 32];
            rng.fill(&mut bytes);
            let token = rng.gen_range(1..=8u8);
            let keys = IndexKeys {
                maker: Address::repeat_byte(0x80 + rng.gen_range(0..16u8)),
                source_token: Address::repeat_byte(token),
                destination_token: Address::repeat_byte(token + 8),
            };
            (B256::from(bytes), keys)
        })
        .collect()
}

fn populated(entries: &[(B256, IndexKeys)]) -> OrderIndices {
    let mut indices = OrderIndices::with_capacity(entries.len());
    for (hash, keys) in entries {
        indices.insert(keys, *hash).unwrap();
    }
    indices
}

fn maker() -> PrivateKeySigner {
    PrivateKeySigner::from_bytes(&B256::repeat_byte(0x42)).unwrap()
}

fn book() -> OrderBook {
    OrderBook::new(Domain::with_defaults(31337, Address::repeat_byte(0xbb)))
}

fn order(maker: &PrivateKeySigner, nonce: u64) -> Order {
    Order::new(
        maker.address(),
        Address::repeat_byte(0x0e),
        Address::repeat_byte(0x0d),
        U256::from(1_000u64),
        U256::from(900u64),
        NOW + 3_600 + nonce,
    )
}

// ============================================================================
// BENCHMARK: Index Operations
// ============================================================================

fn bench_indices(c: &mut Criterion) {
    let mut group = c.benchmark_group("indices");
    group.measurement_time(Duration::from_secs(5));

    let entries = generate_entries(10_000, 42);
    let extra = generate_entries(1, 43)[0];

    group.bench_function("insert_into_10k", |b| {
        b.iter_batched(
            || populated(&entries),
            |mut indices| black_box(indices.insert(&extra.1, extra.0)),
            BatchSize::LargeInput,
        );
    });

    group.bench_function("remove_middle_of_10k", |b| {
        let (hash, keys) = entries[5_000];
        b.iter_batched(
            || populated(&entries),
            |mut indices| black_box(indices.remove(&keys, &hash)),
            BatchSize::LargeInput,
        );
    });

    let indices = populated(&entries);
    let maker = entries[0].1.maker;
    for offset in [0usize, 100, 500] {
        group.bench_with_input(BenchmarkId::new("page_of_maker", offset), &offset, |b, &offset| {
            b.iter(|| black_box(indices.page(&IndexId::Maker(maker), offset, 50)));
        });
    }

    group.finish();
}

// ============================================================================
// BENCHMARK: Order Book
// ============================================================================

fn bench_order_book(c: &mut Criterion) {
    let mut group = c.benchmark_group("order_book");
    group.measurement_time(Duration::from_secs(5));

    let maker = maker();
    let signed: Vec<_> = {
        let book = book();
        (0..1_000)
            .map(|i| {
                let order = order(&maker, i);
                let signature = OrderSignature::sign(&maker, &book.hash(&order)).unwrap();
                (order, signature)
            })
            .collect()
    };

    group.throughput(Throughput::Elements(signed.len() as u64));
    group.bench_function("create_1k_orders", |b| {
        b.iter_batched(
            || (book(), signed.clone()),
            |(mut book, signed)| {
                for (order, signature) in signed {
                    black_box(book.create_order(order, signature).unwrap());
                }
                book.number_of_all_hashes()
            },
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

// ============================================================================
// BENCHMARK: Settlement
// ============================================================================

fn bench_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("settlement");
    group.measurement_time(Duration::from_secs(5));

    let maker = maker();
    let settlement_address = Address::repeat_byte(0x5e);
    let settlement =
        Settlement::new(settlement_address, Address::repeat_byte(0x0f), FeeConfig::default())
            .unwrap();
    let order = order(&maker, 0);

    let mut chain = SimChain::new(NOW);
    let lp = Address::repeat_byte(0x01);
    chain.mint(order.source_token, lp, U256::from(1_000_000u64)).unwrap();
    chain.mint(order.destination_token, lp, U256::from(1_000_000u64)).unwrap();
    chain
        .add_liquidity(
            lp,
            order.source_token,
            order.destination_token,
            U256::from(1_000_000u64),
            U256::from(1_000_000u64),
        )
        .unwrap();
    chain.mint(order.source_token, maker.address(), U256::from(1_000u64)).unwrap();
    chain
        .approve(order.source_token, maker.address(), settlement_address, U256::MAX)
        .unwrap();

    let signature = OrderSignature::sign(&maker, &book().hash(&order)).unwrap();
    let request = FillRequest::full(order, signature);
    let tx = TxContext::direct(Address::repeat_byte(0x2f), NOW);

    group.bench_function("fill_order", |b| {
        b.iter_batched(
            || {
                let mut book = book();
                book.create_order(order, signature).unwrap();
                (book, chain.clone())
            },
            |(mut book, mut chain)| {
                black_box(settlement.fill_order(&mut book, &mut chain, &tx, &request).unwrap())
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_indices, bench_order_book, bench_fill);
criterion_main!(benches);
