// Criterion benchmarks over a small synthetic dictionary.
//
// Run:
//   cargo bench -p orto

use criterion::{criterion_group, criterion_main, Criterion};
use orto::Dictionary;

const AFF: &str = "\
TRY esianrtolcdugmphbyfvkwzESIANRTOLCDUGMPHBYFVKWZ
PFX A Y 1
PFX A 0 re .
SFX S Y 2
SFX S 0 s [^s]
SFX S 0 es s
COMPOUNDFLAG C
REP 2
REP f ph
REP ph f
";

fn build_dic() -> String {
    let stems = [
        "work/AS", "play/AS", "load/AS", "view/AS", "form/AS", "test/AS",
        "foot/C", "ball/C", "hand/C", "book/C", "shelf/C", "light/C",
        "house", "mouse", "garden", "window", "bottle", "letter",
    ];
    let mut dic = format!("{}\n", stems.len());
    for stem in stems {
        dic.push_str(stem);
        dic.push('\n');
    }
    dic
}

fn bench_spell(c: &mut Criterion) {
    let dict = Dictionary::from_slices(AFF, &build_dic()).unwrap();
    let words = [
        "work", "reworks", "Footballs", "handbook", "bookshelf",
        "garden", "windows", "bottel", "lihgt", "nonsense",
    ];
    c.bench_function("spell_mixed_words", |b| {
        b.iter(|| {
            let mut correct = 0usize;
            for w in &words {
                if dict.spell(w) {
                    correct += 1;
                }
            }
            correct
        })
    });
}

fn bench_suggest(c: &mut Criterion) {
    let dict = Dictionary::from_slices(AFF, &build_dic()).unwrap();
    c.bench_function("suggest_typo", |b| {
        b.iter(|| dict.suggest("bottel").len())
    });
}

criterion_group!(benches, bench_spell, bench_suggest);
criterion_main!(benches);
