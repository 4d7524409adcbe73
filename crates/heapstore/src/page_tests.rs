#[cfg(test)]
mod tests {
    use crate::page::SlottedPage;
    use common::error::StorageError;
    use common::testutil::{get_random_byte_vec, get_rng, init};
    use common::BLOCK_SZ;

    fn new_page() -> SlottedPage {
        SlottedPage::new([0u8; BLOCK_SZ], 1, true)
    }

    #[test]
    fn basic_add_and_get() {
        init();
        let mut page = new_page();
        let id1 = page.add(b"hello\0").unwrap();
        let id2 = page.add(b"goodbye\0").unwrap();
        assert_eq!(id1, 1);
        assert_eq!(id2, 2);
        assert_eq!(page.get(id1).unwrap(), b"hello\0".to_vec());
        assert_eq!(page.get(id2).unwrap(), b"goodbye\0".to_vec());
    }

    #[test]
    fn grow_put() {
        init();
        let mut page = new_page();
        let id1 = page.add(b"hello\0").unwrap();
        let id2 = page.add(b"goodbye\0").unwrap();
        page.put(id1, b"something much bigger\0").unwrap();
        assert_eq!(page.get(id1).unwrap(), b"something much bigger\0".to_vec());
        assert_eq!(page.get(id2).unwrap(), b"goodbye\0".to_vec());
    }

    #[test]
    fn shrink_put() {
        init();
        let mut page = new_page();
        let id1 = page.add(b"hello\0").unwrap();
        let id2 = page.add(b"goodbye\0").unwrap();
        page.put(id1, b"something much bigger\0").unwrap();
        page.put(id1, b"hello\0").unwrap();
        assert_eq!(page.get(id1).unwrap(), b"hello\0".to_vec());
        assert_eq!(page.get(id2).unwrap(), b"goodbye\0".to_vec());
    }

    #[test]
    fn delete_and_enumerate() {
        init();
        let mut page = new_page();
        let id1 = page.add(b"hello\0").unwrap();
        let id2 = page.add(b"goodbye\0").unwrap();
        page.put(id1, b"something much bigger\0").unwrap();
        page.put(id1, b"hello\0").unwrap();

        assert_eq!(page.ids(), vec![id1, id2]);
        page.del(id1).unwrap();
        assert_eq!(page.ids(), vec![id2]);
        assert!(page.get(id1).is_none());
    }

    #[test]
    fn no_room_leaves_page_unchanged() {
        init();
        let mut page = new_page();
        page.add(b"hello\0").unwrap();
        let id2 = page.add(b"goodbye\0").unwrap();

        let before = *page.as_bytes();
        let huge = vec![b'x'; BLOCK_SZ - 10];
        let err = page.add(&huge).unwrap_err();
        assert!(matches!(err, StorageError::NoRoom(_)));
        assert_eq!(*page.as_bytes(), before);
        assert_eq!(page.get(id2).unwrap(), b"goodbye\0".to_vec());
    }

    #[test]
    fn has_room_matches_add_outcome() {
        init();
        let mut rng = get_rng();
        let mut page = new_page();
        for _ in 0..50 {
            let bytes = get_random_byte_vec(&mut rng, 32);
            let could_fit = page.has_room(bytes.len());
            let result = page.add(&bytes);
            assert_eq!(result.is_ok(), could_fit);
        }
    }

    #[test]
    fn zero_length_record_is_not_a_tombstone() {
        init();
        let mut page = new_page();
        let id = page.add(b"").unwrap();
        assert_eq!(page.get(id), Some(Vec::new()));
        assert_eq!(page.ids(), vec![id]);
    }

    #[test]
    fn num_records_never_shrinks_after_delete() {
        init();
        let mut page = new_page();
        let id1 = page.add(b"a").unwrap();
        let id2 = page.add(b"b").unwrap();
        page.del(id1).unwrap();
        let id3 = page.add(b"c").unwrap();
        assert_eq!(vec![id2, id3], page.ids());
        assert_ne!(id3, id1);
    }

    #[test]
    fn reconstructs_from_existing_image() {
        init();
        let mut page = new_page();
        page.add(b"hello\0").unwrap();
        let bytes = *page.as_bytes();

        let reopened = SlottedPage::new(bytes, page.block_id(), false);
        assert_eq!(reopened.ids(), page.ids());
        assert_eq!(reopened.get(1), page.get(1));
    }
}
