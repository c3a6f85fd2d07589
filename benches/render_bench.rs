// benches/render_bench.rs
//! Benchmarks for the forest builder and the HTML render path.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use feishu2html::model::{
    Block, BlockCommon, BulletBlock, CalloutBlock, PageBlock, TextBlock, TextBlockContent,
    TextElement, TextElementStyle,
};
use feishu2html::{build_forest, render_blocks, BlockId};
use indexmap::IndexMap;

fn id(s: &str) -> BlockId {
    BlockId::parse(s).unwrap()
}

/// A page with `sections` callouts, each holding a paragraph and `breadth` bullets.
fn sample_document(sections: usize, breadth: usize) -> (IndexMap<BlockId, Block>, BlockId) {
    let root = id("page");
    let mut blocks = IndexMap::new();
    let mut section_ids = Vec::with_capacity(sections);

    for s in 0..sections {
        let section_id = id(&format!("callout-{}", s));
        let para_id = id(&format!("para-{}", s));
        let mut children = vec![para_id.clone()];

        blocks.insert(
            para_id.clone(),
            Block::Text(TextBlock {
                common: BlockCommon::new(para_id).with_parent(section_id.clone()),
                content: TextBlockContent::new(vec![
                    TextElement::text("Section <intro> & "),
                    TextElement::TextRun {
                        content: format!("emphasis {}", s),
                        style: Some(TextElementStyle::bold().with_italic()),
                    },
                ]),
            }),
        );

        for b in 0..breadth {
            let bullet_id = id(&format!("bullet-{}-{}", s, b));
            children.push(bullet_id.clone());
            blocks.insert(
                bullet_id.clone(),
                Block::Bullet(BulletBlock {
                    common: BlockCommon::new(bullet_id).with_parent(section_id.clone()),
                    content: TextBlockContent::new(vec![TextElement::text(format!("item {}", b))]),
                }),
            );
        }

        blocks.insert(
            section_id.clone(),
            Block::Callout(CalloutBlock {
                common: BlockCommon::new(section_id.clone())
                    .with_parent(root.clone())
                    .with_children(children),
                background_color: None,
                border_color: None,
                text_color: None,
                emoji_id: Some("bulb".to_string()),
            }),
        );
        section_ids.push(section_id);
    }

    blocks.insert(
        root.clone(),
        Block::Page(PageBlock {
            common: BlockCommon::new(root.clone()).with_children(section_ids),
            content: TextBlockContent::new(vec![TextElement::text("Benchmark")]),
        }),
    );
    (blocks, root)
}

fn bench_build_forest(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_forest");
    for sections in [10, 100, 500] {
        let (blocks, root) = sample_document(sections, 5);
        group.bench_with_input(BenchmarkId::from_parameter(sections), &sections, |b, _| {
            b.iter(|| build_forest(black_box(&blocks), black_box(&[root.clone()])))
        });
    }
    group.finish();
}

fn bench_render_blocks(c: &mut Criterion) {
    let mut group = c.benchmark_group("render_blocks");
    for sections in [10, 100, 500] {
        let (blocks, root) = sample_document(sections, 5);
        let forest = build_forest(&blocks, &[root]);
        group.bench_with_input(BenchmarkId::from_parameter(sections), &sections, |b, _| {
            b.iter(|| render_blocks(black_box(&blocks), black_box(&forest)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_build_forest, bench_render_blocks);
criterion_main!(benches);
