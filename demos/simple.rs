use std::sync::Arc;

use keyline::{Registry, RowTable};

fn main() {
    println!("keyline Simple Example");

    let trades = Arc::new(RowTable::new());
    let quotes = Arc::new(RowTable::new());
    for ts in [0.0, 10.0, 20.0] {
        trades.append(ts).expect("Failed to append trade");
    }
    for ts in [5.0, 10.0, 15.0] {
        quotes.append(ts).expect("Failed to append quote");
    }

    let mut registry = Registry::new();
    registry.add_source(trades.clone());
    registry.add_source(quotes.clone());
    registry.set_dirty();
    registry.update().expect("Failed to update registry");

    println!("Merged keys: {:?}", registry.keys());
    println!("Index of 10: {:?}", registry.get_index(10.0));
    println!("Index of 7:  {:?}", registry.get_index(7.0));
    println!("Key at 1.4:  {:?}", registry.get_key(1.4));

    let selection = registry.get_selection(6.0, 16.0);
    println!(
        "Visible [6, 16]: first={:?} last={:?} (context {:?}..{:?})",
        selection.first_index,
        selection.last_index,
        selection.pre_first_index,
        selection.post_last_index
    );

    let mut iter = registry.get_iterator(6.0, 16.0);
    while iter.advance() {
        println!("  #{:?} -> {:?}", iter.current_index(), iter.current_key());
    }

    trades.append(30.0).expect("Failed to append trade");
    registry.set_dirty();
    registry.update().expect("Failed to update registry");
    println!("After append: {:?}", registry.keys());

    println!("{}", registry.statistics().report());
}
