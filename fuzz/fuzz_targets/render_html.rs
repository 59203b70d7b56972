#![no_main]

use libfuzzer_sys::fuzz_target;
use richdoc::{BlockDraft, DocumentStore, HeadingLevel};

fuzz_target!(|data: &[u8]| {
    let mut store = DocumentStore::default();
    for chunk in data.chunks(8) {
        let text = String::from_utf8_lossy(&chunk[1..]).into_owned();
        let draft = match chunk[0] % 5 {
            0 => BlockDraft::paragraph(text),
            1 => BlockDraft::heading(text, HeadingLevel::from(chunk[0] / 5)),
            2 => BlockDraft::table(chunk.len() % 4, chunk[0] as usize % 4),
            3 => BlockDraft::image(text, ""),
            _ => BlockDraft::divider(),
        };
        let (id, _) = store.add_block(draft);
        if chunk[0] % 7 == 0 {
            store.delete_block(&id);
        }
    }
    let page = richdoc::serialize_html(store.document());
    assert!(page.ends_with("</body>\n</html>"));
    let _ = richdoc::render_preview(store.document());
});
