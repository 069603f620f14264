//! Properties of the roster store over arbitrary operation sequences.

use proptest::prelude::*;
use sigsheet_roster::reconcile::is_complete;
use sigsheet_roster::{
    encode_snapshot, ImageData, MemoryStorage, Roster, RosterError, RosterStore, SlotIndex,
    StorageBackend,
};
use std::sync::Arc;

const KEY: &str = "spreadsheetData";

#[derive(Debug, Clone)]
enum Op {
    Sign(usize, String),
    Clear,
    Restore,
}

fn op(len: usize) -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => (0..len, "[A-Za-z0-9+/]{1,12}").prop_map(|(i, tag)| Op::Sign(i, tag)),
        1 => Just(Op::Clear),
        1 => Just(Op::Restore),
    ]
}

fn image(tag: &str) -> ImageData {
    ImageData::new(format!("data:image/png;base64,{tag}")).unwrap()
}

fn fresh_store(len: usize) -> (MemoryStorage, RosterStore) {
    let storage = MemoryStorage::new();
    let mut store = RosterStore::new(Arc::new(storage.clone()), KEY, len);
    store.restore().unwrap();
    (storage, store)
}

proptest! {
    #[test]
    fn prop_sign_touches_exactly_one_slot(
        len in 1..20usize,
        signed in proptest::collection::vec(any::<bool>(), 20),
        target in 0..20usize,
    ) {
        let target = target % len;
        let (_storage, mut store) = fresh_store(len);
        for i in (0..len).filter(|&i| signed[i] && i != target) {
            store.set_signature(SlotIndex::new(i), image("BASE")).unwrap();
        }
        let before = store.snapshot();

        store.set_signature(SlotIndex::new(target), image("NEW")).unwrap();
        let after = store.snapshot();

        for (index, slot) in after.iter() {
            if index == SlotIndex::new(target) {
                prop_assert_eq!(slot.image(), Some(&image("NEW")));
            } else {
                prop_assert_eq!(Some(slot), before.slot(index));
            }
        }
    }

    #[test]
    fn prop_second_signature_rejected(len in 1..20usize, target in 0..20usize) {
        let target = SlotIndex::new(target % len);
        let (_storage, mut store) = fresh_store(len);

        store.set_signature(target, image("FIRST")).unwrap();
        let err = store.set_signature(target, image("SECOND")).unwrap_err();

        let is_already_signed = matches!(err, RosterError::AlreadySigned { index } if index == target);
        prop_assert!(is_already_signed);
        let snapshot = store.snapshot();
        prop_assert_eq!(snapshot.slot(target).unwrap().image(), Some(&image("FIRST")));
    }

    #[test]
    fn prop_complete_iff_no_unsigned(len in 1..12usize, ops in proptest::collection::vec(op(12), 0..40)) {
        let (_storage, mut store) = fresh_store(len);
        for op in ops {
            match op {
                Op::Sign(i, tag) => { let _ = store.set_signature(SlotIndex::new(i), image(&tag)); }
                Op::Clear => store.clear().unwrap(),
                Op::Restore => store.restore().unwrap(),
            }
            let snapshot = store.snapshot();
            prop_assert_eq!(snapshot.len(), len);
            let unsigned = snapshot.slots().iter().filter(|s| !s.is_signed()).count();
            prop_assert_eq!(is_complete(&snapshot), unsigned == 0);
        }
    }

    #[test]
    fn prop_clear_resets_everything(len in 1..20usize, ops in proptest::collection::vec(op(20), 0..30)) {
        let (storage, mut store) = fresh_store(len);
        for op in ops {
            if let Op::Sign(i, tag) = op {
                let _ = store.set_signature(SlotIndex::new(i), image(&tag));
            }
        }

        store.clear().unwrap();
        prop_assert_eq!(store.snapshot(), Roster::empty(len));

        let mut reloaded = RosterStore::new(Arc::new(storage), KEY, len);
        reloaded.restore().unwrap();
        prop_assert_eq!(reloaded.snapshot(), Roster::empty(len));
    }

    #[test]
    fn prop_restore_of_other_length_falls_back(len in 1..20usize, stored in 0..25usize) {
        prop_assume!(stored != len);
        let storage = MemoryStorage::new();
        storage.set(KEY, &encode_snapshot(&Roster::empty(stored)).unwrap()).unwrap();

        let mut store = RosterStore::new(Arc::new(storage), KEY, len);
        let result = store.restore();

        let is_corrupt = matches!(result, Err(RosterError::CorruptState { .. }));
        prop_assert!(is_corrupt);
        prop_assert_eq!(store.snapshot(), Roster::empty(len));
    }
}

#[test]
fn out_of_range_slot_is_rejected() {
    let (storage, mut store) = fresh_store(15);
    let err = store
        .set_signature(SlotIndex::new(15), image("AA"))
        .unwrap_err();

    assert!(matches!(err, RosterError::SlotOutOfRange { len: 15, .. }));
    assert_eq!(store.snapshot(), Roster::empty(15));
    assert_eq!(storage.get(KEY).unwrap(), None);
}

#[test]
fn last_write_wins_across_instances() {
    let storage = MemoryStorage::new();
    let mut tab_a = RosterStore::new(Arc::new(storage.handle()), KEY, 2);
    let mut tab_b = RosterStore::new(Arc::new(storage.handle()), KEY, 2);
    tab_a.restore().unwrap();
    tab_b.restore().unwrap();

    // Both tabs start from the same empty snapshot and sign the same slot.
    tab_a.set_signature(SlotIndex::new(0), image("FROMA")).unwrap();
    tab_b.set_signature(SlotIndex::new(0), image("FROMB")).unwrap();

    tab_a.restore().unwrap();
    assert_eq!(
        tab_a.snapshot().slot(SlotIndex::new(0)).unwrap().image(),
        Some(&image("FROMB"))
    );
}
