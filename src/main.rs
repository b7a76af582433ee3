//! Limit Orderbook - Binary Entry Point
//!
//! Walks one order through its lifecycle on the in-memory chain: a WETH/DAI
//! pool at 1:100, an order asking 1% above the pool price, a fill that is
//! refused, a price move, and a fill that settles.
//!
//! Usage: `limit-orderbook [config.toml]`. Log verbosity follows `RUST_LOG`,
//! falling back to the configured `log_level`.

use alloy_primitives::{Address, B256, U256};
use alloy_signer_local::PrivateKeySigner;
use tracing_subscriber::EnvFilter;

use limit_orderbook::env::{SwapRouter, TokenLedger};
use limit_orderbook::sim::SimChain;
use limit_orderbook::types::amount::{format_units, parse_units};
use limit_orderbook::{Config, FillRequest, Order, OrderSignature, TxContext};

const DECIMALS: u32 = 18;
const START: u64 = 1_700_000_000;

fn units(s: &str) -> Result<U256, Box<dyn std::error::Error>> {
    parse_units(s, DECIMALS).ok_or_else(|| format!("bad amount: {s}").into())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_file(path)?,
        None => Config::new(
            31337,
            Address::repeat_byte(0xbb),
            Address::repeat_byte(0x5e),
            Address::repeat_byte(0x01),
        ),
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    println!("===========================================");
    println!("  Limit Orderbook - settlement walkthrough");
    println!("===========================================");
    println!();

    let mut book = config.order_book();
    let settlement = config.settlement()?;
    let mut chain = SimChain::new(START);

    let weth = Address::repeat_byte(0x0e);
    let dai = Address::repeat_byte(0x0d);
    let lp = Address::repeat_byte(0x1f);
    let relayer = Address::repeat_byte(0x2f);
    let maker = PrivateKeySigner::from_bytes(&B256::repeat_byte(0x42))?;

    // 100 WETH : 10,000 DAI
    chain.mint(weth, lp, units("200")?)?;
    chain.mint(dai, lp, units("20000")?)?;
    chain.add_liquidity(lp, weth, dai, units("100")?, units("10000")?)?;
    chain.mint(weth, maker.address(), units("1")?)?;
    chain.approve(weth, maker.address(), settlement.address(), units("1")?)?;

    // Ask 1% more than the pool pays for a hundredth of the order
    let slice = units("0.01")?;
    let quoted = chain.get_amounts_out(slice, &[weth, dai])?[1];
    let order = Order::new(
        maker.address(),
        weth,
        dai,
        units("1")?,
        quoted * U256::from(101),
        START + 24 * 3600,
    );
    let signature = OrderSignature::sign(&maker, &book.hash(&order))?;
    let hash = book.create_order(order, signature)?;
    println!("Order created: {hash}");
    println!(
        "  sells {} WETH for at least {} DAI",
        format_units(order.amount_in, DECIMALS),
        format_units(order.min_amount_out, DECIMALS)
    );
    println!();

    let request = FillRequest::new(order, signature, slice, vec![weth, dai]);
    let tx = TxContext::direct(relayer, chain.timestamp());
    match settlement.fill_order(&mut book, &mut chain, &tx, &request) {
        Ok(_) => println!("Unexpected fill at the starting price"),
        Err(err) => println!("Fill refused at 1:100: {err}"),
    }

    // Someone sells 1,000 DAI into the pool, making WETH dearer
    let whale = Address::repeat_byte(0x3f);
    chain.mint(dai, whale, units("1000")?)?;
    let router = chain.router_address();
    chain.approve(dai, whale, router, units("1000")?)?;
    chain.swap_exact_tokens_for_tokens(
        whale,
        units("1000")?,
        U256::ZERO,
        &[dai, weth],
        whale,
        START,
    )?;
    let (reserve_weth, reserve_dai) = chain.reserves(weth, dai).unwrap_or_default();
    println!(
        "Pool moved to {} WETH : {} DAI",
        format_units(reserve_weth, DECIMALS),
        format_units(reserve_dai, DECIMALS)
    );

    let receipt = settlement.fill_order(&mut book, &mut chain, &tx, &request)?;
    println!("Order filled:");
    println!("  amount in:  {} WETH", format_units(receipt.amount_in, DECIMALS));
    println!("  amount out: {} DAI", format_units(receipt.amount_out, DECIMALS));
    println!("  relayer fee: {} WETH", format_units(receipt.relayer_fee(), DECIMALS));
    if let Some(price) = receipt.execution_price() {
        println!("  price: {} DAI/WETH", price.round_dp(4));
    }
    println!(
        "  filled {} of {} WETH",
        format_units(book.filled_amount_in_of_hash(&hash), DECIMALS),
        format_units(order.amount_in, DECIMALS)
    );
    println!();

    for event in book.take_events() {
        println!("Event: {event:?}");
    }
    println!("State root: {}", book.state_root());
    println!(
        "Relayer WETH balance: {}",
        format_units(chain.balance_of(weth, relayer), DECIMALS)
    );

    Ok(())
}
