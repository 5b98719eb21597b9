//! Model-based properties: every list is checked against a `Vec` doing the
//! same work.

use nexus_blist::{BList, BoundedBList, Full};
use proptest::prelude::*;

const PROPTEST_CASES: u32 = 256;
const VALUE_MAX: u32 = 64;

#[derive(Debug, Clone)]
enum Op {
    PushBack(u32),
    PushFront(u32),
    RemoveAt(usize),
    RemoveValue(u32),
}

/// Operations that keep a list sorted.
#[derive(Debug, Clone)]
enum SortedOp {
    Insert(u32),
    RemoveAt(usize),
    RemoveValue(u32),
}

fn sorted_op() -> impl Strategy<Value = SortedOp> {
    prop_oneof![
        3 => (0..VALUE_MAX).prop_map(SortedOp::Insert),
        1 => (0usize..80).prop_map(SortedOp::RemoveAt),
        1 => (0..VALUE_MAX).prop_map(SortedOp::RemoveValue),
    ]
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..VALUE_MAX).prop_map(Op::PushBack),
        (0..VALUE_MAX).prop_map(Op::PushFront),
        (0usize..80).prop_map(Op::RemoveAt),
        (0..VALUE_MAX).prop_map(Op::RemoveValue),
    ]
}

/// Block-level shape checks that hold after any sequence of operations.
fn check_shape<const N: usize>(list: &BList<u32, N>) -> Result<(), TestCaseError> {
    let lens: Vec<usize> = list.blocks().map(|b| b.len()).collect();
    prop_assert!(lens.iter().all(|&n| n > 0 && n <= N), "bad block lengths {:?}", lens);
    prop_assert_eq!(lens.iter().sum::<usize>(), list.len());
    prop_assert_eq!(lens.len(), list.block_count());
    prop_assert_eq!(list.stats().node_count, list.block_count());
    prop_assert_eq!(list.head().is_none(), list.is_empty());
    prop_assert_eq!(list.tail().is_none(), list.is_empty());

    let reversed: Vec<usize> = list.blocks().rev().map(|b| b.len()).collect();
    prop_assert_eq!(reversed.into_iter().rev().collect::<Vec<_>>(), lens);
    Ok(())
}

fn sorted_inserts<const N: usize>(values: &[u32]) -> Result<(), TestCaseError> {
    let mut list: BList<u32, N> = BList::new();
    for &v in values {
        list.insert(v);
        check_shape(&list)?;
    }

    let mut expected = values.to_vec();
    expected.sort_unstable();
    prop_assert_eq!(list.iter().copied().collect::<Vec<_>>(), expected);
    Ok(())
}

fn mixed_ops<const N: usize>(ops: &[Op]) -> Result<(), TestCaseError> {
    let mut list: BList<u32, N> = BList::new();
    let mut model: Vec<u32> = Vec::new();

    for op in ops {
        match *op {
            Op::PushBack(v) => {
                list.push_back(v);
                model.push(v);
            }
            Op::PushFront(v) => {
                list.push_front(v);
                model.insert(0, v);
            }
            Op::RemoveAt(i) => {
                let expected = (i < model.len()).then(|| model.remove(i));
                prop_assert_eq!(list.remove(i).ok(), expected);
            }
            Op::RemoveValue(v) => {
                let expected = model.iter().position(|&x| x == v).map(|i| model.remove(i));
                prop_assert_eq!(list.remove_by_value(&v), expected);
            }
        }
        check_shape(&list)?;
        prop_assert_eq!(list.len(), model.len());
    }

    prop_assert_eq!(list.iter().copied().collect::<Vec<_>>(), model.clone());
    prop_assert_eq!(
        list.iter().rev().copied().collect::<Vec<_>>(),
        model.iter().rev().copied().collect::<Vec<_>>()
    );
    for (i, v) in model.iter().enumerate() {
        prop_assert_eq!(list.get(i), Ok(v));
    }
    Ok(())
}

fn sorted_ops<const N: usize>(ops: &[SortedOp]) -> Result<(), TestCaseError> {
    let mut list: BList<u32, N> = BList::new();
    let mut model: Vec<u32> = Vec::new();

    for op in ops {
        match *op {
            SortedOp::Insert(v) => {
                list.insert(v);
                let pos = model.partition_point(|x| *x <= v);
                model.insert(pos, v);
            }
            SortedOp::RemoveAt(i) => {
                let expected = (i < model.len()).then(|| model.remove(i));
                prop_assert_eq!(list.remove(i).ok(), expected);
            }
            SortedOp::RemoveValue(v) => {
                let expected = model.iter().position(|&x| x == v).map(|i| model.remove(i));
                prop_assert_eq!(list.remove_by_value(&v), expected);
            }
        }
        check_shape(&list)?;
        prop_assert_eq!(list.iter().copied().collect::<Vec<_>>(), model.clone());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(PROPTEST_CASES))]

    #[test]
    fn prop_insert_sorted_n1(values in prop::collection::vec(0..VALUE_MAX, 0..64)) {
        sorted_inserts::<1>(&values)?;
    }

    #[test]
    fn prop_insert_sorted_n2(values in prop::collection::vec(0..VALUE_MAX, 0..64)) {
        sorted_inserts::<2>(&values)?;
    }

    #[test]
    fn prop_insert_sorted_n3(values in prop::collection::vec(0..VALUE_MAX, 0..64)) {
        sorted_inserts::<3>(&values)?;
    }

    #[test]
    fn prop_insert_sorted_n7(values in prop::collection::vec(0..VALUE_MAX, 0..128)) {
        sorted_inserts::<7>(&values)?;
    }

    #[test]
    fn prop_single_slot_blocks(values in prop::collection::vec(0..VALUE_MAX, 1..48)) {
        let mut list: BList<u32, 1> = BList::new();
        for v in values {
            list.insert(v);
            prop_assert_eq!(list.block_count(), list.len());
        }
    }

    #[test]
    fn prop_mixed_ops_match_vec_n1(ops in prop::collection::vec(op(), 0..96)) {
        mixed_ops::<1>(&ops)?;
    }

    #[test]
    fn prop_mixed_ops_match_vec_n3(ops in prop::collection::vec(op(), 0..96)) {
        mixed_ops::<3>(&ops)?;
    }

    #[test]
    fn prop_mixed_ops_match_vec_n8(ops in prop::collection::vec(op(), 0..96)) {
        mixed_ops::<8>(&ops)?;
    }

    #[test]
    fn prop_sorted_ops_match_vec_n1(ops in prop::collection::vec(sorted_op(), 0..96)) {
        sorted_ops::<1>(&ops)?;
    }

    #[test]
    fn prop_sorted_ops_match_vec_n2(ops in prop::collection::vec(sorted_op(), 0..96)) {
        sorted_ops::<2>(&ops)?;
    }

    #[test]
    fn prop_sorted_ops_match_vec_n3(ops in prop::collection::vec(sorted_op(), 0..96)) {
        sorted_ops::<3>(&ops)?;
    }

    #[test]
    fn prop_sorted_ops_match_vec_n4(ops in prop::collection::vec(sorted_op(), 0..96)) {
        sorted_ops::<4>(&ops)?;
    }

    #[test]
    fn prop_sorted_ops_match_vec_n5(ops in prop::collection::vec(sorted_op(), 0..96)) {
        sorted_ops::<5>(&ops)?;
    }

    #[test]
    fn prop_bounded_sorted_ops_match_vec(
        ops in prop::collection::vec(sorted_op(), 0..96),
        limit in 1usize..6,
    ) {
        let mut list: BoundedBList<u32, 3> = BoundedBList::with_block_limit(limit);
        let mut model: Vec<u32> = Vec::new();

        for op in &ops {
            match *op {
                SortedOp::Insert(v) => match list.try_insert(v) {
                    Ok(()) => {
                        let pos = model.partition_point(|x| *x <= v);
                        model.insert(pos, v);
                    }
                    Err(Full(back)) => {
                        prop_assert_eq!(back, v);
                    }
                },
                SortedOp::RemoveAt(i) => {
                    let expected = (i < model.len()).then(|| model.remove(i));
                    prop_assert_eq!(list.remove(i).ok(), expected);
                }
                SortedOp::RemoveValue(v) => {
                    let expected = model.iter().position(|&x| x == v).map(|i| model.remove(i));
                    prop_assert_eq!(list.remove_by_value(&v), expected);
                }
            }
            prop_assert!(list.block_count() <= limit);
            prop_assert!(list.blocks().all(|b| !b.is_empty()));
            prop_assert_eq!(list.iter().copied().collect::<Vec<_>>(), model.clone());
        }
    }

    #[test]
    fn prop_removed_value_not_found(
        values in prop::collection::vec(0..VALUE_MAX, 1..64),
        pick in any::<prop::sample::Index>(),
    ) {
        let mut list: BList<u32, 4> = BList::new();
        for &v in &values {
            list.insert(v);
        }

        let target = values[pick.index(values.len())];
        let copies = values.iter().filter(|&&v| v == target).count();
        for _ in 0..copies {
            let index = list.find(&target);
            prop_assert!(index.is_some());
            prop_assert_eq!(list.remove(index.unwrap()), Ok(target));
        }
        prop_assert_eq!(list.find(&target), None);
        prop_assert_eq!(list.len(), values.len() - copies);
    }

    #[test]
    fn prop_clone_is_independent(
        values in prop::collection::vec(0..VALUE_MAX, 0..64),
        extra in prop::collection::vec(0..VALUE_MAX, 1..16),
    ) {
        let mut original: BList<u32, 3> = BList::new();
        for &v in &values {
            original.insert(v);
        }
        let before: Vec<u32> = original.iter().copied().collect();

        let mut copy = original.clone();
        prop_assert_eq!(&copy, &original);
        for &v in &extra {
            copy.insert(v);
        }
        if !copy.is_empty() {
            copy.remove(0).unwrap();
        }

        prop_assert_eq!(original.iter().copied().collect::<Vec<_>>(), before);
        prop_assert_eq!(original.len(), values.len());
        check_shape(&original)?;
    }

    #[test]
    fn prop_out_of_range_remove_is_noop(
        values in prop::collection::vec(0..VALUE_MAX, 0..32),
        past in 0usize..1000,
    ) {
        let mut list: BList<u32, 3> = values.iter().copied().collect();
        let shape: Vec<usize> = list.blocks().map(|b| b.len()).collect();

        let index = list.len() + past;
        prop_assert!(list.remove(index).is_err());
        prop_assert!(list.remove(usize::MAX).is_err());

        prop_assert_eq!(list.iter().copied().collect::<Vec<_>>(), values);
        prop_assert_eq!(list.blocks().map(|b| b.len()).collect::<Vec<_>>(), shape);
    }

    #[test]
    fn prop_bounded_failure_leaves_list_unchanged(
        values in prop::collection::vec(0..VALUE_MAX, 0..64),
        limit in 1usize..6,
    ) {
        let mut list: BoundedBList<u32, 3> = BoundedBList::with_block_limit(limit);
        let mut accepted = Vec::new();

        for v in values {
            let before: Vec<u32> = list.iter().copied().collect();
            match list.try_insert(v) {
                Ok(()) => accepted.push(v),
                Err(Full(back)) => {
                    prop_assert_eq!(back, v);
                    prop_assert_eq!(list.iter().copied().collect::<Vec<_>>(), before);
                }
            }
            prop_assert!(list.block_count() <= limit);
        }

        accepted.sort_unstable();
        prop_assert_eq!(list.iter().copied().collect::<Vec<_>>(), accepted);
    }
}
