//! Order-preserving edits on the playlist under construction.

use crate::config::DuplicatePolicy;

/// Appends `item` unless the policy rejects duplicates and it is already
/// present. Returns whether the list changed.
pub fn add<T: PartialEq>(list: &mut Vec<T>, item: T, policy: DuplicatePolicy) -> bool {
    if policy == DuplicatePolicy::Reject && list.contains(&item) {
        return false;
    }
    list.push(item);
    true
}

/// Removes the first occurrence of `item`.
pub fn remove_first<T: PartialEq>(list: &mut Vec<T>, item: &T) -> bool {
    match list.iter().position(|existing| existing == item) {
        Some(index) => {
            list.remove(index);
            true
        }
        None => false,
    }
}

/// Moves the element at `from` to `to`, shifting everything in between.
///
/// Out-of-range indices are rejected and leave the list untouched.
pub fn move_item<T>(list: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from >= list.len() || to >= list.len() {
        return false;
    }
    if from == to {
        return true;
    }

    let moved = list.remove(from);
    list.insert(to, moved);
    true
}
