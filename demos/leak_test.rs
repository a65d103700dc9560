//
// Copyright (c) 2025 Nathan Fiedler
//
use dynamic_list::DynamicList;

fn test_dynamic_list() {
    // push a bunch, pop nearly all to exercise compact() and clear()
    let mut list: DynamicList<usize> = DynamicList::new();
    for value in 0..1024 {
        list.push(value);
    }
    assert_eq!(list.len(), 1024);
    for _ in 0..1000 {
        list.pop();
    }
    list.clear();

    // heap-allocated objects moved around by the block cascade
    let mut list: DynamicList<String> = DynamicList::new();
    for _ in 0..1024 {
        let value = ulid::Ulid::new().to_string();
        list.insert(list.len() / 2, value).expect("index in range");
    }
    for _ in 0..512 {
        list.remove(list.len() / 3).expect("index in range");
    }
    let copy = list.clone();
    while !list.is_empty() {
        list.pop();
    }
    drop(copy);

    // whole blocks placed by a batch insert
    let mut list: DynamicList<String> = DynamicList::with_block_bits(2);
    list.push(String::from("first"));
    let batch: Vec<String> = (0..100).map(|_| ulid::Ulid::new().to_string()).collect();
    list.insert_all(0, batch).expect("index in range");
    list.clear();

    // IntoIterator: add enough values to allocate a bunch of blocks
    let mut list: DynamicList<String> = DynamicList::new();
    for _ in 0..512 {
        let value = ulid::Ulid::new().to_string();
        list.push(value);
    }
    // skip enough elements to pass over a few blocks then drop
    for (index, _) in list.into_iter().skip(96).enumerate() {
        if index == 96 {
            // exit the iterator early intentionally
            break;
        }
    }
}

//
// Create and drop collections and iterators in order to test for memory leaks.
// Must allocate Strings in order to fully test the drop implementation.
//
fn main() {
    println!("starting dynamic list testing...");
    test_dynamic_list();
    println!("completed dynamic list testing");
}
