#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use proptest::collection::vec;
use proptest::option;
use proptest::prelude::*;
use richdoc::{
    Alignment, BlockContent, BlockDraft, BlockId, Dimension, Document, Formatting, Heading,
    HeadingLevel, Image, Margins, Orientation, PaperSize, Settings, Table,
};

pub fn text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 <>&\"'\u{e9}\u{1F600}]{0,24}"
}

pub fn inches() -> impl Strategy<Value = f64> {
    0.0f64..3.0
}

pub fn dimension() -> impl Strategy<Value = Dimension> {
    prop_oneof![
        Just(Dimension::Auto),
        (0.5f64..4000.0).prop_map(Dimension::Pixels),
    ]
}

pub fn table() -> impl Strategy<Value = Table> {
    (0usize..4, 0usize..4)
        .prop_flat_map(|(rows, cols)| {
            (
                Just(rows),
                Just(cols),
                vec(vec(text(), 0..=cols), 0..=rows),
            )
        })
        .prop_map(|(rows, cols, data)| Table { rows, cols, data })
}

pub fn block_content() -> impl Strategy<Value = BlockContent> {
    prop_oneof![
        text().prop_map(BlockContent::Paragraph),
        (text(), 1u8..=3).prop_map(|(text, level)| BlockContent::Heading(Heading {
            text,
            level: HeadingLevel::from(level),
        })),
        table().prop_map(BlockContent::Table),
        (text(), text(), dimension(), dimension()).prop_map(|(src, alt, width, height)| {
            BlockContent::Image(Image {
                src,
                alt,
                width,
                height,
            })
        }),
        Just(BlockContent::Divider),
        vec(text(), 0..3)
            .prop_map(|items| BlockContent::List(serde_json::json!({ "items": items }))),
        ("x-[a-z]{1,6}", text()).prop_map(|(kind, note)| BlockContent::Unknown {
            kind,
            payload: serde_json::json!({ "note": note }),
        }),
    ]
}

pub fn alignment() -> impl Strategy<Value = Alignment> {
    prop_oneof![
        Just(Alignment::Left),
        Just(Alignment::Center),
        Just(Alignment::Right),
        Just(Alignment::Justify),
    ]
}

pub fn formatting() -> impl Strategy<Value = Formatting> {
    (
        option::of(1.0f64..200.0),
        option::of("[A-Za-z ]{1,12}"),
        option::of(any::<bool>()),
        option::of(any::<bool>()),
        option::of(any::<bool>()),
        option::of("#[0-9a-f]{6}"),
        option::of(alignment()),
    )
        .prop_map(
            |(font_size, font_family, bold, italic, underline, color, alignment)| Formatting {
                font_size,
                font_family,
                bold,
                italic,
                underline,
                strikethrough: None,
                color,
                background_color: None,
                alignment,
            },
        )
}

pub fn draft() -> impl Strategy<Value = BlockDraft> {
    (block_content(), option::of(formatting())).prop_map(|(content, formatting)| BlockDraft {
        content,
        formatting,
    })
}

pub fn settings() -> impl Strategy<Value = Settings> {
    (
        prop_oneof![
            Just(PaperSize::A4),
            Just(PaperSize::A3),
            Just(PaperSize::A5),
            Just(PaperSize::Letter),
            Just(PaperSize::Legal),
        ],
        prop_oneof![Just(Orientation::Portrait), Just(Orientation::Landscape)],
        "[A-Za-z ]{1,16}",
        0.5f64..3.5,
        (inches(), inches(), inches(), inches()),
    )
        .prop_map(
            |(paper_size, orientation, default_font, line_spacing, (top, bottom, left, right))| {
                Settings {
                    paper_size,
                    orientation,
                    default_font,
                    line_spacing,
                    margins: Margins {
                        top,
                        bottom,
                        left,
                        right,
                    },
                }
            },
        )
}

pub fn timestamp() -> impl Strategy<Value = DateTime<Utc>> {
    (0i64..4_000_000_000, 0u32..1_000_000_000)
        .prop_map(|(secs, nanos)| Utc.timestamp_opt(secs, nanos).unwrap())
}

pub fn document() -> impl Strategy<Value = Document> {
    (
        "[a-zA-Z0-9_-]{1,21}",
        text(),
        vec(draft(), 0..8),
        settings(),
        timestamp(),
        "[a-z-]{1,12}",
    )
        .prop_map(|(id, title, drafts, settings, last_modified, owner_id)| {
            let mut doc = Document::new_at(last_modified);
            doc.id = id;
            doc.title = title;
            doc.owner_id = owner_id;
            doc.content.settings = settings;
            doc.content.blocks = drafts
                .into_iter()
                .enumerate()
                .map(|(index, draft)| draft.into_block(BlockId::from(format!("b{index}"))))
                .collect();
            doc
        })
}
