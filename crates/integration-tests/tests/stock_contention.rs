//! Stock contention between concurrent buyers.
//!
//! The sale is a conditional decrement with a floor, so when two buyers
//! race for the last unit exactly one wins and stock never goes negative.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use dona_onca_core::store::{CatalogStore, MemoryStore, StoreError};
use dona_onca_core::ProductId;

use dona_onca_integration_tests::fixtures::product;

#[tokio::test]
async fn two_buyers_race_for_the_last_unit() {
    let store = Arc::new(MemoryStore::with_products(vec![product(1, 9900, 1)]));

    let a = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.sell(ProductId::new(1), 1).await })
    };
    let b = {
        let store = Arc::clone(&store);
        tokio::spawn(async move { store.sell(ProductId::new(1), 1).await })
    };

    let results = [a.await.unwrap(), b.await.unwrap()];
    let winners = results.iter().filter(|r| r.is_ok()).count();

    assert_eq!(winners, 1);
    assert!(results.iter().any(|r| matches!(
        r,
        Err(StoreError::InsufficientStock { available: 0, .. })
    )));
    assert_eq!(store.stock_of(ProductId::new(1)), Some(0));
}

#[tokio::test]
async fn oversized_sale_fails_whole_instead_of_clamping() {
    let store = MemoryStore::with_products(vec![product(1, 9900, 3)]);

    let err = store.sell(ProductId::new(1), 5).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::InsufficientStock {
            requested: 5,
            available: 3,
            ..
        }
    ));

    // The failed sale deducted nothing.
    assert_eq!(store.stock_of(ProductId::new(1)), Some(3));
}

#[tokio::test]
async fn many_buyers_never_drive_stock_negative() {
    let store = Arc::new(MemoryStore::with_products(vec![product(1, 9900, 4)]));

    let mut handles = Vec::new();
    for _ in 0..10 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(
            async move { store.sell(ProductId::new(1), 1).await },
        ));
    }

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap().is_ok() {
            winners += 1;
        }
    }

    assert_eq!(winners, 4);
    assert_eq!(store.stock_of(ProductId::new(1)), Some(0));
}
