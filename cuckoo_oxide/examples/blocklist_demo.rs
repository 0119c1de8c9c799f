//! Blocklist Demo: gating lookups with a cuckoo filter
//!
//! This example demonstrates using the filter in front of an expensive
//! membership check (a database table, a remote policy service): definite
//! negatives skip the backend entirely, and entries can be delisted again
//! because cuckoo filters support deletion.

use cuckoo_oxide::common::hash::item_hash;
use cuckoo_oxide::CuckooFilter;

fn main() {
    println!("=== Cuckoo Filter Blocklist Demo ===\n");

    let filter = CuckooFilter::builder(10_000)
        .with_false_positive_probability(0.001)
        .build()
        .expect("Failed to build filter");

    println!(
        "Configuration: {} buckets x {} entries x {} bits ({} bytes)\n",
        filter.buckets(),
        filter.entries_per_bucket(),
        filter.bits_per_entry(),
        filter.memory_usage()
    );

    // Load the blocklist
    let blocked = ["10.0.0.66", "192.168.3.41", "172.16.9.8"];
    for addr in &blocked {
        filter.insert(item_hash(addr.as_bytes()));
    }
    println!("Loaded {} blocked addresses", filter.len());

    // Gate incoming addresses
    let incoming = ["10.0.0.1", "10.0.0.66", "203.0.113.7", "172.16.9.8"];
    println!("\nChecking incoming addresses:");
    for addr in &incoming {
        let verdict = if filter.contains(item_hash(addr.as_bytes())) {
            "might be blocked -> consult backend"
        } else {
            "definitely clean -> skip backend"
        };
        println!("  {:<14} {}", addr, verdict);
    }

    // Delist one address
    filter.remove(item_hash(b"172.16.9.8"));
    println!(
        "\nAfter delisting 172.16.9.8: contains = {}",
        filter.contains(item_hash(b"172.16.9.8"))
    );
    println!("Load factor: {:.4}%", filter.load_factor() * 100.0);
}
