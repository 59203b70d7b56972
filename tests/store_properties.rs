use proptest::prelude::*;
use richdoc::{
    BlockContent, BlockDraft, BlockId, DocumentEdit, DocumentStore, MarginsPatch, SettingsPatch,
};
use std::collections::HashSet;
use std::sync::Arc;
mod strategies;

use strategies::{document, draft, inches, text};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(proptest_config::cases()))]

    #[test]
    fn prop_add_then_delete_restores_blocks(doc in document(), new_block in draft()) {
        let before = doc.content.blocks.clone();
        let mut store = DocumentStore::new(doc);
        let (id, added) = store.add_block(new_block);
        prop_assert_eq!(added.blocks().len(), before.len() + 1);
        prop_assert_eq!(&added.blocks().last().unwrap().id, &id);

        let removed = store.delete_block(&id);
        prop_assert_eq!(removed.blocks(), before.as_slice());
    }

    #[test]
    fn prop_missing_id_is_a_no_op(doc in document(), text in text()) {
        let missing = BlockId::from("no-such-block");
        prop_assert_eq!(
            doc.apply(&DocumentEdit::UpdateBlock {
                id: missing.clone(),
                content: BlockContent::Paragraph(text),
            }, chrono::Utc::now()),
            None
        );

        let mut store = DocumentStore::new(doc.clone());
        let before = store.snapshot();
        let after = store.delete_block(&missing);
        prop_assert!(Arc::ptr_eq(&before, &after));
        prop_assert_eq!(&*after, &doc);
    }

    #[test]
    fn prop_margin_patch_merges_per_side(doc in document(), top in inches()) {
        let original = doc.content.settings.clone();
        let mut store = DocumentStore::new(doc);
        let updated = store.update_settings(SettingsPatch {
            margins: Some(MarginsPatch { top: Some(top), ..MarginsPatch::default() }),
            ..SettingsPatch::default()
        });
        let settings = updated.settings();
        prop_assert_eq!(settings.margins.top, top);
        prop_assert_eq!(settings.margins.bottom, original.margins.bottom);
        prop_assert_eq!(settings.margins.left, original.margins.left);
        prop_assert_eq!(settings.margins.right, original.margins.right);
        prop_assert_eq!(settings.paper_size, original.paper_size);
        prop_assert_eq!(&settings.default_font, &original.default_font);
    }

    #[test]
    fn prop_added_ids_are_distinct(doc in document(), count in 1usize..40) {
        let mut store = DocumentStore::new(doc);
        for n in 0..count {
            store.add_block(BlockDraft::paragraph(format!("p{n}")));
        }
        let ids: HashSet<&BlockId> = store.document().blocks().iter().map(|b| &b.id).collect();
        prop_assert_eq!(ids.len(), store.document().blocks().len());
    }

    #[test]
    fn prop_update_keeps_order_and_ids(doc in document(), text in text()) {
        let paragraph = doc
            .blocks()
            .iter()
            .find(|block| matches!(block.content, BlockContent::Paragraph(_)))
            .map(|block| block.id.clone());
        prop_assume!(paragraph.is_some());
        let id = paragraph.unwrap();
        let ids: Vec<BlockId> = doc.blocks().iter().map(|b| b.id.clone()).collect();

        let mut store = DocumentStore::new(doc);
        let updated = store.update_block(&id, BlockContent::Paragraph(text.clone()));
        let after: Vec<BlockId> = updated.blocks().iter().map(|b| b.id.clone()).collect();
        prop_assert_eq!(after, ids);
        prop_assert_eq!(updated.block(&id).unwrap().text(), Some(text.as_str()));
    }
}

#[test]
fn test_snapshots_are_immutable() {
    let mut store = DocumentStore::default();
    let (id, first) = store.add_block(BlockDraft::paragraph("one"));
    store.update_block(&id, BlockContent::Paragraph("two".into()));
    store.replace_title("Renamed");
    assert_eq!(first.block(&id).unwrap().text(), Some("one"));
    assert_eq!(first.title, "Untitled Document");
}
