//
// Copyright (c) 2025 Nathan Fiedler
//
use dynamic_list::DynamicList;
use std::time::Instant;

fn benchmark_dynamic_list(coll: &mut DynamicList<usize>, size: usize, ops: usize) {
    let start = Instant::now();
    for value in 0..size {
        coll.push(value);
    }
    let duration = start.elapsed();
    println!("list create: {:?}", duration);

    // sequenced access for the entire collection
    let start = Instant::now();
    for (index, value) in coll.iter().enumerate() {
        assert_eq!(*value, index);
    }
    let duration = start.elapsed();
    println!("list ordered: {:?}", duration);

    // random remove and insert operations
    let start = Instant::now();
    for _ in 0..ops {
        let from = rand::random_range(0..size);
        let to = rand::random_range(0..size - 1);
        let value = coll.remove(from).expect("index in range");
        coll.insert(to, value).expect("index in range");
    }
    let duration = start.elapsed();
    println!("list {ops} remove/insert: {:?}", duration);

    // insert a batch at the midpoint, then take it back out again
    let start = Instant::now();
    let middle = size / 2;
    coll.insert_all(middle, 0..ops).expect("index in range");
    for _ in 0..ops {
        coll.remove(middle).expect("index in range");
    }
    let duration = start.elapsed();
    println!("list {ops} batch insert/remove: {:?}", duration);

    // popping all elements, shrinking along the way
    let unused = coll.capacity() - coll.len();
    println!("unused capacity: {unused}");
    let start = Instant::now();
    while !coll.is_empty() {
        coll.pop();
    }
    let duration = start.elapsed();
    println!("list pop-all: {:?}", duration);
    println!("list capacity: {}", coll.capacity());
}

fn benchmark_vector(size: usize, ops: usize) {
    let start = Instant::now();
    let mut coll: Vec<usize> = Vec::new();
    for value in 0..size {
        coll.push(value);
    }
    let duration = start.elapsed();
    println!("vector create: {:?}", duration);

    let start = Instant::now();
    for (index, value) in coll.iter().enumerate() {
        assert_eq!(*value, index);
    }
    let duration = start.elapsed();
    println!("vector ordered: {:?}", duration);

    let start = Instant::now();
    for _ in 0..ops {
        let from = rand::random_range(0..size);
        let to = rand::random_range(0..size - 1);
        let value = coll.remove(from);
        coll.insert(to, value);
    }
    let duration = start.elapsed();
    println!("vector {ops} remove/insert: {:?}", duration);

    let start = Instant::now();
    let middle = size / 2;
    coll.splice(middle..middle, 0..ops);
    for _ in 0..ops {
        coll.remove(middle);
    }
    let duration = start.elapsed();
    println!("vector {ops} batch insert/remove: {:?}", duration);

    let unused = coll.capacity() - coll.len();
    println!("unused capacity: {unused}");
    let start = Instant::now();
    while !coll.is_empty() {
        coll.pop();
    }
    let duration = start.elapsed();
    println!("vector pop-all: {:?}", duration);
    println!("vector capacity: {}", coll.capacity());
}

fn main() {
    // debug level shows each expand and compact of the block array
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();
    let size = 100_000_000;
    println!("creating DynamicList of {size} elements...");
    let mut coll: DynamicList<usize> = DynamicList::new();
    benchmark_dynamic_list(&mut coll, size, 200_000);
    let size = 5_000_000;
    println!("creating Vec of {size} elements...");
    benchmark_vector(size, 20_000);
}
