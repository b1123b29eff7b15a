//! Holder pooling as seen through values
//!
//! Pools are per thread and every test runs on its own thread, so the
//! counters start from zero in each test.

use mallorn::pool::{self, holder_stats};
use mallorn::*;
use pretty_assertions::assert_eq;

#[test]
fn test_default_chunk_size() {
    assert_eq!(pool::config(), PoolConfig::default());
    let _v = Value::new(1u32);
    let stats = holder_stats::<u32>();
    assert_eq!(stats.live, 1);
    assert_eq!(stats.free, 63);
    assert_eq!(stats.chunks, 1);
}

#[test]
fn test_values_return_holders_on_last_drop() {
    pool::configure(PoolConfig::with_chunk_size(4));
    let a = Value::new(1i16);
    let b = a.clone();
    assert_eq!(holder_stats::<i16>().live, 1);

    drop(a);
    assert_eq!(holder_stats::<i16>().live, 1);
    drop(b);
    assert_eq!(holder_stats::<i16>().live, 0);
    assert_eq!(holder_stats::<i16>().free, 4);
}

#[test]
fn test_pool_grows_in_chunks() {
    pool::configure(PoolConfig::with_chunk_size(8));
    let values: Vec<Value> = (0..20i8).map(Value::from).collect();
    let stats = holder_stats::<i8>();
    assert_eq!(stats.live, 20);
    assert_eq!(stats.chunks, 3);
    assert_eq!(stats.free, 4);
    drop(values);
    assert_eq!(holder_stats::<i8>().free, 24);
}

#[test]
fn test_clone_slot_churn_reuses_cells() {
    pool::configure(PoolConfig::with_chunk_size(2));
    let mut v = Value::new(0u16);
    for i in 1..100u16 {
        *v.access::<u16>().unwrap() = i;
    }
    assert_eq!(v.get::<u16>().unwrap(), 99);
    // One live holder plus at most one in flight during each copy
    assert_eq!(holder_stats::<u16>().chunks, 1);
}

#[test]
fn test_raw_assign_returns_replaced_holder() {
    pool::configure(PoolConfig::with_chunk_size(4));
    let mut a = Value::new(String::from("a"));
    let b = Value::new(String::from("b"));
    a.assign_raw(&b).unwrap();
    assert_eq!(holder_stats::<String>().live, 2);
}

#[test]
fn test_nested_values_release_through_pool() {
    pool::configure(PoolConfig::with_chunk_size(4));
    let nested = Value::array(vec![Value::from(1i64), Value::from(2i64)]);
    assert_eq!(holder_stats::<i64>().live, 2);
    drop(nested);
    assert_eq!(holder_stats::<i64>().live, 0);
    assert_eq!(holder_stats::<Vec<Value>>().live, 0);
}

#[test]
fn test_disabled_pool_still_works() {
    pool::configure(PoolConfig::disabled());
    let a = Value::new(3.5f64);
    let mut b = a.clone();
    *b.access::<f64>().unwrap() = 1.0;
    assert_eq!(a.get::<f64>().unwrap(), 3.5);
    assert_eq!(holder_stats::<f64>().free, 0);
    drop((a, b));
    assert_eq!(holder_stats::<f64>().live, 0);
}

#[test]
fn test_release_free_keeps_live_values() {
    pool::configure(PoolConfig::with_chunk_size(16));
    let keep = Value::new('k');
    drop(Value::new('d'));
    assert_eq!(pool::release_free(), 15);
    assert_eq!(holder_stats::<char>().live, 1);
    assert_eq!(keep.to_string(), "k");
}
