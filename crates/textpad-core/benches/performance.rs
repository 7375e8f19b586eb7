use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use textpad_core::search::{backward_search, find_all, forward_search};
use textpad_core::{Command, CommandExecutor, Editor, FindCommand};

fn large_text(line_count: usize) -> String {
    let mut out = String::with_capacity(line_count * 64);
    for i in 0..line_count {
        out.push_str(&format!(
            "{i:06} the quick brown fox jumps over the lazy dog (textpad benchmark line)\n"
        ));
    }
    out.pop();
    out
}

fn bench_forward_search_wrap(c: &mut Criterion) {
    let text = large_text(50_000);
    let len = text.chars().count();
    // "000000" only occurs on the first line, so every search scans to the end and wraps.
    c.bench_function("forward_search/50k_lines_wrap", |b| {
        b.iter(|| black_box(forward_search(black_box(&text), len / 2, "000000")))
    });
}

fn bench_backward_search(c: &mut Criterion) {
    let text = large_text(50_000);
    let len = text.chars().count();
    c.bench_function("backward_search/50k_lines", |b| {
        b.iter(|| black_box(backward_search(black_box(&text), len, "025000")))
    });
}

fn bench_find_all(c: &mut Criterion) {
    let text = large_text(50_000);
    c.bench_function("find_all/50k_lines", |b| {
        b.iter(|| black_box(find_all(black_box(&text), "fox").count()))
    });
}

fn bench_find_all_with_highlight(c: &mut Criterion) {
    let text = large_text(50_000);
    let mut editor = Editor::new(&text);
    c.bench_function("editor_find_all/50k_lines", |b| {
        b.iter(|| {
            let matches = editor.find_all(black_box("lazy"));
            editor.take_notices();
            black_box(matches.count());
        })
    });
}

fn bench_replace_chain(c: &mut Criterion) {
    let text = large_text(2_000);
    c.bench_function("replace_chain/2k_lines_100_steps", |b| {
        b.iter_batched(
            || {
                let mut executor = CommandExecutor::new(&text);
                executor
                    .execute(Command::Find(FindCommand::ReplaceFindNext {
                        pattern: "fox".to_string(),
                    }))
                    .unwrap();
                executor
            },
            |mut executor| {
                for _ in 0..100 {
                    executor
                        .execute(Command::Find(FindCommand::ReplaceAndFind {
                            replacement: "cat".to_string(),
                        }))
                        .unwrap();
                }
                black_box(executor.editor().len_chars());
            },
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(
    benches,
    bench_forward_search_wrap,
    bench_backward_search,
    bench_find_all,
    bench_find_all_with_highlight,
    bench_replace_chain
);
criterion_main!(benches);
